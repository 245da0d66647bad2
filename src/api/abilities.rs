use crate::api::endpoints;
use crate::api::http::{HttpRequest, HttpTransport};
use crate::api::models::{ChampionDetail, ChampionDetailFile, PassiveDto, SpellDto};
use crate::api::static_data::StaticDataClient;
use crate::cache::{cache_key, CacheStore, ABILITIES_TTL};
use crate::error::AppError;
use crate::model::{Ability, Champion, Cooldown, GameVersion, Slot};
use regex::Regex;
use std::sync::{Arc, OnceLock};

const FALLBACK_COOLDOWN_SLOTS: usize = 5;

fn template_placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{\{.*?\}\}").expect("placeholder pattern is valid"))
}

/// Replaces every `{{ ... }}` placeholder with `[VALUE]`; other markup is kept.
pub fn strip_placeholders(text: &str) -> String {
    template_placeholder().replace_all(text, "[VALUE]").into_owned()
}

/// Splits a burn string like "12/11/10/9/8". Non-numeric parts become `Unknown`.
pub fn parse_cooldown_burn(burn: Option<&str>) -> Vec<Cooldown> {
    match burn.map(str::trim).filter(|b| !b.is_empty()) {
        Some(burn) => burn
            .split('/')
            .map(|part| match part.trim().parse::<f64>() {
                Ok(seconds) => Cooldown::Seconds(seconds),
                Err(_) => Cooldown::Unknown,
            })
            .collect(),
        None => vec![Cooldown::Unknown; FALLBACK_COOLDOWN_SLOTS],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AbilitySource {
    /// Pre-cleaned descriptions and numeric cooldown arrays.
    BigBrain,
    /// Raw tooltips with template placeholders.
    DataDragon,
}

pub struct AbilityClient {
    transport: Arc<dyn HttpTransport>,
    cache: Arc<CacheStore>,
    static_data: StaticDataClient,
}

impl AbilityClient {
    pub fn new(transport: Arc<dyn HttpTransport>, cache: Arc<CacheStore>, static_data: StaticDataClient) -> Self {
        AbilityClient {
            transport,
            cache,
            static_data,
        }
    }

    /// Passive first, then Q/W/E/R.
    ///
    /// An unknown champion name is an error. When the roster or both ability
    /// sources fail the result is an empty list, which is not cached.
    pub fn get_abilities(&self, champion_name: &str) -> Result<Vec<Ability>, AppError> {
        let key = cache_key("abilities", &champion_name.trim().to_lowercase());
        if let Some(cached) = self.cache.get::<Vec<Ability>>(&key, ABILITIES_TTL) {
            return Ok(cached);
        }

        let (version, champion) = match self.static_data.resolve_champion(champion_name) {
            Ok(resolved) => resolved,
            Err(e @ (AppError::ChampionNotFound(_) | AppError::RateLimited { .. })) => return Err(e),
            Err(e) => {
                tracing::warn!(champion = champion_name, error = %e, "champion roster unavailable");
                return Ok(Vec::new());
            }
        };

        let abilities = match self.fetch(AbilitySource::BigBrain, &version, &champion) {
            Ok(abilities) => abilities,
            Err(e) => {
                tracing::info!(champion = %champion.key, error = %e, "primary ability source failed, using Data Dragon");
                match self.fetch(AbilitySource::DataDragon, &version, &champion) {
                    Ok(abilities) => abilities,
                    Err(e) => {
                        tracing::warn!(champion = %champion.key, error = %e, "no ability source available");
                        return Ok(Vec::new());
                    }
                }
            }
        };

        self.cache.set(&key, &abilities);
        Ok(abilities)
    }

    fn fetch(&self, source: AbilitySource, version: &GameVersion, champion: &Champion) -> Result<Vec<Ability>, AppError> {
        let locale = self.static_data.locale();
        let url = match source {
            AbilitySource::BigBrain => endpoints::bigbrain_champion_detail(version.as_str(), locale, &champion.key),
            AbilitySource::DataDragon => endpoints::champion_detail(version.as_str(), locale, &champion.key),
        };

        let response = self
            .transport
            .execute(&HttpRequest::get(&url))?
            .error_for_status(&url)?;
        let mut file: ChampionDetailFile = response.json()?;

        let detail = file
            .data
            .remove(&champion.key)
            .ok_or_else(|| AppError::ParseFailure(format!("{} has no entry for {}", url, champion.key)))?;

        Ok(build_abilities(source, version, &detail))
    }
}

fn build_abilities(source: AbilitySource, version: &GameVersion, detail: &ChampionDetail) -> Vec<Ability> {
    let mut abilities = Vec::with_capacity(5);
    if let Some(passive) = &detail.passive {
        abilities.push(passive_ability(source, version, passive));
    }
    for (slot, spell) in Slot::ACTIVE.iter().zip(detail.spells.iter()) {
        abilities.push(spell_ability(source, version, *slot, spell));
    }
    abilities
}

fn passive_ability(source: AbilitySource, version: &GameVersion, passive: &PassiveDto) -> Ability {
    let description = match source {
        AbilitySource::BigBrain => passive.description.clone(),
        AbilitySource::DataDragon => strip_placeholders(&passive.description),
    };
    Ability {
        slot: Slot::Passive,
        name: passive.name.clone(),
        description,
        icon_url: endpoints::passive_icon(version.as_str(), &passive.image.full),
        cooldowns: Vec::new(),
    }
}

fn spell_ability(source: AbilitySource, version: &GameVersion, slot: Slot, spell: &SpellDto) -> Ability {
    let (description, cooldowns) = match source {
        AbilitySource::BigBrain => (
            spell.description.clone(),
            spell.cooldown.iter().map(|s| Cooldown::Seconds(*s)).collect(),
        ),
        AbilitySource::DataDragon => {
            let raw = if spell.tooltip.is_empty() { &spell.description } else { &spell.tooltip };
            (strip_placeholders(raw), parse_cooldown_burn(spell.cooldown_burn.as_deref()))
        }
    };
    Ability {
        slot,
        name: spell.name.clone(),
        description,
        icon_url: endpoints::spell_icon(version.as_str(), &spell.image.full),
        cooldowns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::testing::{ManualClock, MockTransport, CHAMPIONS_JSON, VERSIONS_JSON};
    use assert_matches::assert_matches;

    const CHAMPIONS_URL: &str =
        "https://ddragon.leagueoflegends.com/cdn/14.25.1/data/en_US/champion.json";
    const BIGBRAIN_GAREN: &str =
        "https://static.bigbrain.gg/assets/lol/riot_static/14.25.1/data/en_US/champion/Garen.json";
    const DDRAGON_GAREN: &str =
        "https://ddragon.leagueoflegends.com/cdn/14.25.1/data/en_US/champion/Garen.json";

    const GAREN_CLEAN: &str = r#"{"data": {"Garen": {
      "passive": {"name": "Perseverance", "description": "Garen <b>regenerates</b> health.", "image": {"full": "Garen_Passive.png"}},
      "spells": [
        {"name": "Decisive Strike", "description": "Garen breaks free.", "cooldown": [8, 8, 8, 8, 8], "image": {"full": "GarenQ.png"}},
        {"name": "Courage", "description": "Garen gains armor.", "cooldown": [23, 21, 19, 17, 15], "image": {"full": "GarenW.png"}},
        {"name": "Judgment", "description": "Garen spins.", "cooldown": [9, 8.25, 7.5, 6.75, 6], "image": {"full": "GarenE.png"}},
        {"name": "Demacian Justice", "description": "Garen executes.", "cooldown": [120, 100, 80], "image": {"full": "GarenR.png"}}
      ]
    }}}"#;

    const GAREN_RAW: &str = r#"{"data": {"Garen": {
      "passive": {"name": "Perseverance", "description": "Regenerates {{ regen }} health.", "image": {"full": "Garen_Passive.png"}},
      "spells": [
        {"name": "Decisive Strike", "tooltip": "Deals {{ damage }} physical damage", "cooldownBurn": "8", "image": {"full": "GarenQ.png"}},
        {"name": "Courage", "tooltip": "Gains {{ armor }} and {{ mr }}.", "cooldownBurn": "23/21/19/17/15", "image": {"full": "GarenW.png"}},
        {"name": "Judgment", "tooltip": "<spellName>Spins</spellName>", "image": {"full": "GarenE.png"}},
        {"name": "Demacian Justice", "description": "Executes {{ dmg }}.", "cooldownBurn": "120/100/80", "image": {"full": "GarenR.png"}}
      ]
    }}}"#;

    fn build(transport: MockTransport) -> (Arc<MockTransport>, Arc<ManualClock>, AbilityClient) {
        let transport = Arc::new(transport);
        let clock = Arc::new(ManualClock::new());
        let cache = Arc::new(CacheStore::with_clock(clock.clone()));
        let static_data = StaticDataClient::new(transport.clone(), cache.clone(), &Config::default());
        (transport.clone(), clock, AbilityClient::new(transport, cache, static_data))
    }

    fn with_roster(transport: MockTransport) -> MockTransport {
        transport
            .on(&endpoints::versions(), 200, VERSIONS_JSON)
            .on(CHAMPIONS_URL, 200, CHAMPIONS_JSON)
    }

    fn client(transport: MockTransport) -> (Arc<MockTransport>, AbilityClient) {
        let (transport, _, client) = build(with_roster(transport));
        (transport, client)
    }

    fn slots(abilities: &[Ability]) -> Vec<Slot> {
        abilities.iter().map(|a| a.slot).collect()
    }

    #[test]
    fn placeholder_cleanup() {
        assert_eq!(
            strip_placeholders("Deals {{ damage }} physical damage"),
            "Deals [VALUE] physical damage"
        );
        assert_eq!(
            strip_placeholders("<b>{{a}}</b> then {{ b }}"),
            "<b>[VALUE]</b> then [VALUE]"
        );
        assert_eq!(
            strip_placeholders("Heals {{ heal\n  * 2 }} over time"),
            "Heals [VALUE] over time"
        );
    }

    #[test]
    fn cooldown_burn_parsing() {
        assert_eq!(
            parse_cooldown_burn(Some("12/11/10")),
            vec![Cooldown::Seconds(12.0), Cooldown::Seconds(11.0), Cooldown::Seconds(10.0)]
        );
        assert_eq!(parse_cooldown_burn(Some("6/x")), vec![Cooldown::Seconds(6.0), Cooldown::Unknown]);
        assert_eq!(parse_cooldown_burn(None), vec![Cooldown::Unknown; 5]);
    }

    #[test]
    fn primary_source_keeps_descriptions_verbatim() {
        let (transport, client) = client(MockTransport::new().on(BIGBRAIN_GAREN, 200, GAREN_CLEAN));

        let abilities = client.get_abilities("garen").unwrap();
        assert_eq!(slots(&abilities), vec![Slot::Passive, Slot::Q, Slot::W, Slot::E, Slot::R]);
        assert_eq!(abilities[0].description, "Garen <b>regenerates</b> health.");
        assert!(abilities[0].cooldowns.is_empty());
        assert_eq!(abilities[3].cooldowns[1], Cooldown::Seconds(8.25));
        assert_eq!(
            abilities[4].icon_url,
            "https://ddragon.leagueoflegends.com/cdn/14.25.1/img/spell/GarenR.png"
        );
        assert_eq!(transport.calls_to(DDRAGON_GAREN), 0);
    }

    #[test]
    fn falls_back_to_data_dragon_with_cleanup() {
        let (transport, client) = client(
            MockTransport::new()
                .on(BIGBRAIN_GAREN, 503, "")
                .on(DDRAGON_GAREN, 200, GAREN_RAW),
        );

        let abilities = client.get_abilities("Garen").unwrap();
        assert_eq!(slots(&abilities), vec![Slot::Passive, Slot::Q, Slot::W, Slot::E, Slot::R]);
        assert_eq!(abilities[0].description, "Regenerates [VALUE] health.");
        assert_eq!(abilities[1].description, "Deals [VALUE] physical damage");
        assert_eq!(abilities[2].cooldowns.len(), 5);
        assert_eq!(abilities[3].description, "<spellName>Spins</spellName>");
        assert_eq!(abilities[3].cooldowns, vec![Cooldown::Unknown; 5]);
        assert_eq!(abilities[4].description, "Executes [VALUE].");
        assert_eq!(
            abilities[0].icon_url,
            "https://ddragon.leagueoflegends.com/cdn/14.25.1/img/passive/Garen_Passive.png"
        );
        assert_eq!(transport.calls_to(DDRAGON_GAREN), 1);
    }

    #[test]
    fn fallback_result_is_cached_under_the_same_key() {
        let (transport, client) = client(
            MockTransport::new()
                .on(BIGBRAIN_GAREN, 500, "")
                .on(DDRAGON_GAREN, 200, GAREN_RAW),
        );

        let first = client.get_abilities("Garen").unwrap();
        let second = client.get_abilities("GAREN").unwrap();
        assert_eq!(first, second);
        assert_eq!(transport.calls_to(BIGBRAIN_GAREN), 1);
        assert_eq!(transport.calls_to(DDRAGON_GAREN), 1);
    }

    #[test]
    fn unknown_champion_is_an_error() {
        let (_, client) = client(MockTransport::new());
        assert_matches!(client.get_abilities("Notachamp"), Err(AppError::ChampionNotFound(_)));
    }

    #[test]
    fn both_sources_failing_degrades_to_empty_and_retries() {
        let (transport, client) = client(MockTransport::new());

        assert!(client.get_abilities("Garen").unwrap().is_empty());
        assert!(client.get_abilities("Garen").unwrap().is_empty());
        assert_eq!(transport.calls_to(BIGBRAIN_GAREN), 2);
    }

    #[test]
    fn cached_abilities_expire_after_an_hour() {
        let (transport, clock, client) = build(with_roster(MockTransport::new().on(BIGBRAIN_GAREN, 200, GAREN_CLEAN)));

        client.get_abilities("Garen").unwrap();
        clock.advance(chrono::Duration::minutes(59));
        client.get_abilities("Garen").unwrap();
        assert_eq!(transport.calls_to(BIGBRAIN_GAREN), 1);

        clock.advance(chrono::Duration::minutes(2));
        client.get_abilities("Garen").unwrap();
        assert_eq!(transport.calls_to(BIGBRAIN_GAREN), 2);
    }

    #[test]
    fn roster_outage_degrades_to_empty() {
        let (transport, _, client) = build(
            MockTransport::new()
                .on(&endpoints::versions(), 200, VERSIONS_JSON)
                .on(CHAMPIONS_URL, 503, "")
                .on(BIGBRAIN_GAREN, 200, GAREN_CLEAN),
        );

        assert!(client.get_abilities("Garen").unwrap().is_empty());
        assert!(client.get_abilities("Garen").unwrap().is_empty());
        assert_eq!(transport.calls_to(CHAMPIONS_URL), 2);
        assert_eq!(transport.calls_to(BIGBRAIN_GAREN), 0);
    }

    #[test]
    fn roster_rate_limit_still_propagates() {
        let (_, _, client) = build(
            MockTransport::new()
                .on(&endpoints::versions(), 200, VERSIONS_JSON)
                .on(CHAMPIONS_URL, 429, ""),
        );

        assert_eq!(
            client.get_abilities("Garen").unwrap_err(),
            AppError::RateLimited { retry_after_secs: 60 }
        );
    }

    #[test]
    fn malformed_primary_payload_triggers_fallback() {
        let (_, client) = client(
            MockTransport::new()
                .on(BIGBRAIN_GAREN, 200, r#"{"data": {"Ahri": {}}}"#)
                .on(DDRAGON_GAREN, 200, GAREN_RAW),
        );

        let abilities = client.get_abilities("Garen").unwrap();
        assert_eq!(abilities[1].description, "Deals [VALUE] physical damage");
    }
}
