// Shared fakes for unit tests.

use crate::api::http::{HttpRequest, HttpResponse, HttpTransport};
use crate::cache::Clock;
use crate::error::AppError;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

type Handler = Box<dyn Fn(&HttpRequest) -> Result<HttpResponse, AppError> + Send + Sync>;

#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<String, Handler>>,
    calls: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, url: &str, status: u16, body: &str) -> Self {
        let body = body.to_string();
        self.on_with(url, move |_| Ok(reply(status, &body)))
    }

    pub fn on_with<F>(self, url: &str, handler: F) -> Self
    where
        F: Fn(&HttpRequest) -> Result<HttpResponse, AppError> + Send + Sync + 'static,
    {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), Box::new(handler));
        self
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|r| r.url == url).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.calls.lock().unwrap().clone()
    }
}

impl HttpTransport for MockTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, AppError> {
        self.calls.lock().unwrap().push(request.clone());
        match self.routes.lock().unwrap().get(&request.url) {
            Some(handler) => handler(request),
            None => Err(AppError::UpstreamUnavailable(format!(
                "no route for {}",
                request.url
            ))),
        }
    }
}

pub fn reply(status: u16, body: &str) -> HttpResponse {
    HttpResponse {
        status,
        body: body.to_string(),
        retry_after: None,
    }
}

pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Self {
        ManualClock {
            now: Mutex::new(Utc.with_ymd_and_hms(2024, 12, 1, 12, 0, 0).unwrap()),
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap();
        *now = *now + by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

pub const VERSIONS_JSON: &str = r#"["14.25.1", "14.24.1", "14.23.1"]"#;

pub const CHAMPIONS_JSON: &str = r#"{
  "type": "champion",
  "version": "14.25.1",
  "data": {
    "Garen": {"id": "Garen", "key": "86", "name": "Garen", "title": "the Might of Demacia", "tags": ["Fighter", "Tank"]},
    "Ahri": {"id": "Ahri", "key": "103", "name": "Ahri", "title": "the Nine-Tailed Fox", "tags": ["Mage", "Assassin"]},
    "MonkeyKing": {"id": "MonkeyKing", "key": "62", "name": "Wukong", "title": "the Monkey King", "tags": ["Fighter"]},
    "LeeSin": {"id": "LeeSin", "key": "64", "name": "Lee Sin", "title": "the Blind Monk", "tags": ["Fighter"]},
    "Jinx": {"id": "Jinx", "key": "222", "name": "Jinx", "title": "the Loose Cannon", "tags": ["Marksman"]},
    "Thresh": {"id": "Thresh", "key": "412", "name": "Thresh", "title": "the Chain Warden", "tags": ["Support"]},
    "Azir": {"id": "Azir", "key": "268", "name": "Azir", "title": "the Emperor of the Sands", "tags": ["Mage"]},
    "Darius": {"id": "Darius", "key": "122", "name": "Darius", "title": "the Hand of Noxus", "tags": ["Fighter"]}
  }
}"#;
