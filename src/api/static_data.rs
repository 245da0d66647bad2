use crate::api::endpoints;
use crate::api::http::{HttpRequest, HttpTransport};
use crate::api::models::DataDragonChampions;
use crate::cache::{cache_key, CacheStore, ROSTER_TTL, VERSION_TTL};
use crate::config::Config;
use crate::error::AppError;
use crate::model::{Champion, ChampionRoster, GameVersion};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Game version and champion roster from the Data Dragon CDN.
#[derive(Clone)]
pub struct StaticDataClient {
    transport: Arc<dyn HttpTransport>,
    cache: Arc<CacheStore>,
    locale: String,
    fallback_version: GameVersion,
}

impl StaticDataClient {
    pub fn new(transport: Arc<dyn HttpTransport>, cache: Arc<CacheStore>, config: &Config) -> Self {
        StaticDataClient {
            transport,
            cache,
            locale: config.locale.clone(),
            fallback_version: GameVersion(config.fallback_version.clone()),
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn get_current_version(&self) -> Result<GameVersion, AppError> {
        let key = cache_key("current_version", &());
        if let Some(version) = self.cache.get::<GameVersion>(&key, VERSION_TTL) {
            return Ok(version);
        }

        let url = endpoints::versions();
        let response = self
            .transport
            .execute(&HttpRequest::get(&url))?
            .error_for_status(&url)?;
        let versions: Vec<String> = response.json()?;

        let latest = versions
            .into_iter()
            .next()
            .map(GameVersion)
            .ok_or_else(|| AppError::ParseFailure("versions list is empty".to_string()))?;

        self.cache.set(&key, &latest);
        Ok(latest)
    }

    /// Latest version, or the configured last-known-good one when the
    /// versions endpoint fails. Rate limiting is never masked.
    pub fn current_version_or_fallback(&self) -> Result<GameVersion, AppError> {
        match self.get_current_version() {
            Err(e @ AppError::RateLimited { .. }) => Err(e),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    fallback = %self.fallback_version,
                    "using fallback game version"
                );
                Ok(self.fallback_version.clone())
            }
            ok => ok,
        }
    }

    pub fn get_champion_roster(&self, version: &GameVersion) -> Result<ChampionRoster, AppError> {
        let key = cache_key("champion_roster", &(version.as_str(), &self.locale));
        if let Some(roster) = self.cache.get::<ChampionRoster>(&key, ROSTER_TTL) {
            return Ok(roster);
        }

        let url = endpoints::champion_list(version.as_str(), &self.locale);
        let response = self
            .transport
            .execute(&HttpRequest::get(&url))?
            .error_for_status(&url)?;
        let payload: DataDragonChampions = response.json()?;

        let mut champions = BTreeMap::new();
        for (slug, info) in payload.data {
            let numeric_id = match info.key.parse::<u32>() {
                Ok(id) => id,
                Err(_) => {
                    tracing::warn!(champion = %slug, key = %info.key, "skipping champion with non-numeric key");
                    continue;
                }
            };
            champions.insert(
                slug,
                Champion {
                    key: info.id,
                    name: info.name,
                    numeric_id,
                    title: info.title,
                    tags: info.tags,
                },
            );
        }

        let roster = ChampionRoster {
            version: version.clone(),
            champions,
        };
        self.cache.set(&key, &roster);
        Ok(roster)
    }

    /// Roster for whatever version `current_version_or_fallback` settles on.
    pub fn current_roster(&self) -> Result<ChampionRoster, AppError> {
        let version = self.current_version_or_fallback()?;
        self.get_champion_roster(&version)
    }

    pub fn resolve_champion(&self, name: &str) -> Result<(GameVersion, Champion), AppError> {
        let roster = self.current_roster()?;
        let champion = roster
            .find_by_name(name)
            .cloned()
            .ok_or_else(|| AppError::ChampionNotFound(name.to_string()))?;
        Ok((roster.version, champion))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ManualClock, MockTransport, CHAMPIONS_JSON, VERSIONS_JSON};
    use assert_matches::assert_matches;

    const CHAMPIONS_URL: &str =
        "https://ddragon.leagueoflegends.com/cdn/14.25.1/data/en_US/champion.json";

    fn client(transport: MockTransport) -> (Arc<MockTransport>, Arc<ManualClock>, StaticDataClient) {
        let transport = Arc::new(transport);
        let clock = Arc::new(ManualClock::new());
        let cache = Arc::new(CacheStore::with_clock(clock.clone()));
        let client = StaticDataClient::new(transport.clone(), cache, &Config::default());
        (transport, clock, client)
    }

    #[test]
    fn current_version_is_first_entry_and_cached_for_an_hour() {
        let (transport, clock, client) =
            client(MockTransport::new().on(&endpoints::versions(), 200, VERSIONS_JSON));

        assert_eq!(client.get_current_version().unwrap().as_str(), "14.25.1");
        assert_eq!(client.get_current_version().unwrap().as_str(), "14.25.1");
        assert_eq!(transport.calls_to(&endpoints::versions()), 1);

        clock.advance(chrono::Duration::minutes(61));
        client.get_current_version().unwrap();
        assert_eq!(transport.calls_to(&endpoints::versions()), 2);
    }

    #[test]
    fn version_failure_is_unavailable_and_fallback_is_configured() {
        let (_, _, client) = client(MockTransport::new());

        assert_matches!(client.get_current_version(), Err(AppError::UpstreamUnavailable(_)));
        assert_eq!(client.current_version_or_fallback().unwrap().as_str(), "14.25.1");
    }

    #[test]
    fn roster_is_keyed_by_slug() {
        let (transport, _, client) = client(MockTransport::new().on(CHAMPIONS_URL, 200, CHAMPIONS_JSON));
        let version = GameVersion("14.25.1".to_string());

        let roster = client.get_champion_roster(&version).unwrap();
        assert_eq!(roster.len(), 8);
        let wukong = &roster.champions["MonkeyKing"];
        assert_eq!(wukong.name, "Wukong");
        assert_eq!(wukong.numeric_id, 62);
        assert_eq!(wukong.tags, vec!["Fighter".to_string()]);

        let again = client.get_champion_roster(&version).unwrap();
        assert_eq!(again, roster);
        assert_eq!(transport.calls_to(CHAMPIONS_URL), 1);
    }

    #[test]
    fn resolve_champion_reports_unknown_names() {
        let (_, _, client) = client(
            MockTransport::new()
                .on(&endpoints::versions(), 200, VERSIONS_JSON)
                .on(CHAMPIONS_URL, 200, CHAMPIONS_JSON),
        );

        let (_, lee) = client.resolve_champion("lee sin").unwrap();
        assert_eq!(lee.key, "LeeSin");
        assert_matches!(client.resolve_champion("Leesin"), Err(AppError::ChampionNotFound(_)));
    }
}
