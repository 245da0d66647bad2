use crate::config::Config;
use crate::error::AppError;
use governor::{
    clock::{Clock, DefaultClock},
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::thread;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/139.0.0.0 Safari/537.36";
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        HttpRequest {
            method: Method::Get,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post_json(url: impl Into<String>, body: Value) -> Self {
        HttpRequest {
            method: Method::Post,
            body: Some(body),
            ..Self::get(url)
        }
    }

    pub fn query(mut self, name: &str, value: impl Into<String>) -> Self {
        self.query.push((name.to_string(), value.into()));
        self
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    #[allow(dead_code)]
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
    pub retry_after: Option<String>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        serde_json::from_str(&self.body).map_err(AppError::from)
    }

    /// 429 becomes `RateLimited` (with the server's wait hint), any other
    /// non-2xx becomes `UpstreamError`.
    pub fn error_for_status(self, url: &str) -> Result<Self, AppError> {
        if self.is_success() {
            return Ok(self);
        }
        if self.status == 429 {
            let retry_after_secs = self
                .retry_after
                .as_deref()
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            return Err(AppError::RateLimited { retry_after_secs });
        }
        Err(AppError::UpstreamError(format!(
            "{} returned HTTP {}",
            url, self.status
        )))
    }
}

/// The only way the clients reach the network.
pub trait HttpTransport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, AppError>;
}

pub struct UreqTransport {
    agent: ureq::Agent,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl UreqTransport {
    pub fn new(config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build();
        let rate_limiter = RateLimiter::direct(Quota::per_second(config.requests_per_second));
        UreqTransport {
            agent,
            rate_limiter,
        }
    }

    fn wait_for_permit(&self) {
        while let Err(not_until) = self.rate_limiter.check() {
            let wait = not_until.wait_time_from(DefaultClock::default().now());
            thread::sleep(wait);
        }
    }
}

impl HttpTransport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, AppError> {
        self.wait_for_permit();

        let mut req = match request.method {
            Method::Get => self.agent.get(&request.url),
            Method::Post => self.agent.post(&request.url),
        };
        for (name, value) in &request.query {
            req = req.query(name, value);
        }
        for (name, value) in &request.headers {
            req = req.set(name, value);
        }

        tracing::debug!(url = %request.url, method = ?request.method, "sending request");

        let result = match &request.body {
            Some(body) => req.send_json(body),
            None => req.call(),
        };

        let response = match result {
            Ok(resp) => resp,
            // Non-2xx still carries a body; callers decide what the status means
            Err(ureq::Error::Status(_, resp)) => resp,
            Err(e) => return Err(AppError::UpstreamUnavailable(e.to_string())),
        };

        let status = response.status();
        let retry_after = response.header("Retry-After").map(str::to_string);
        let body = response
            .into_string()
            .map_err(|e| AppError::UpstreamUnavailable(e.to_string()))?;

        Ok(HttpResponse {
            status,
            body,
            retry_after,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn response(status: u16, retry_after: Option<&str>) -> HttpResponse {
        HttpResponse {
            status,
            body: String::new(),
            retry_after: retry_after.map(str::to_string),
        }
    }

    #[test]
    fn success_passes_through() {
        assert!(response(204, None).error_for_status("u").is_ok());
    }

    #[test]
    fn too_many_requests_carries_wait_hint() {
        let err = response(429, Some("17")).error_for_status("u").unwrap_err();
        assert_eq!(err, AppError::RateLimited { retry_after_secs: 17 });

        let err = response(429, Some("later")).error_for_status("u").unwrap_err();
        assert_eq!(err, AppError::RateLimited { retry_after_secs: 60 });
    }

    #[test]
    fn other_statuses_are_upstream_errors() {
        let err = response(503, None).error_for_status("https://x").unwrap_err();
        assert_matches!(err, AppError::UpstreamError(msg) if msg.contains("503"));
    }

    #[test]
    fn request_builder_keeps_query_pairs() {
        let req = HttpRequest::get("https://x").query("q", "garen").query("key", "k1");
        assert_eq!(req.query_value("key"), Some("k1"));
        assert_eq!(req.query_value("missing"), None);
        assert_eq!(req.method, Method::Get);
    }
}
