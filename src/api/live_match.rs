use crate::api::endpoints;
use crate::api::http::{HttpRequest, HttpTransport};
use crate::api::models::{GraphQlResponse, LiveGameData, LivePlayerDto};
use crate::api::static_data::StaticDataClient;
use crate::cache::{cache_key, CacheStore, LIVE_MATCH_TTL};
use crate::error::AppError;
use crate::model::{ChampionRoster, LiveMatch, MatchParticipant, Role};
use serde_json::json;
use std::sync::Arc;

const LIVE_GAME_QUERY: &str = r#"
query GetLiveGame($regionId: String!, $riotUserName: String!, $riotTagLine: String!) {
  getLiveGame(regionId: $regionId, riotUserName: $riotUserName, riotTagLine: $riotTagLine) {
    gameLengthSeconds
    gameType
    queueId
    teamA {
      championId
      riotUserName
      riotTagLine
      currentRole
    }
    teamB {
      championId
      riotUserName
      riotTagLine
      currentRole
    }
  }
}
"#;

/// Splits `GameName#TagLine` at the last `#`.
pub fn parse_riot_id(account: &str) -> Result<(&str, &str), AppError> {
    let (name, tag) = account.rsplit_once('#').ok_or(AppError::InvalidRiotId)?;
    if name.trim().is_empty() || tag.trim().is_empty() {
        return Err(AppError::InvalidRiotId);
    }
    Ok((name, tag))
}

pub struct LiveMatchClient {
    transport: Arc<dyn HttpTransport>,
    cache: Arc<CacheStore>,
    static_data: StaticDataClient,
    region: String,
}

impl LiveMatchClient {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        cache: Arc<CacheStore>,
        static_data: StaticDataClient,
        region: &str,
    ) -> Self {
        LiveMatchClient {
            transport,
            cache,
            static_data,
            region: region.to_string(),
        }
    }

    pub fn get_live_match(&self, account: &str) -> Result<LiveMatch, AppError> {
        let key = cache_key("live_match", account);
        if let Some(cached) = self.cache.get::<LiveMatch>(&key, LIVE_MATCH_TTL) {
            return Ok(cached);
        }

        let (game_name, tag_line) = parse_riot_id(account)?;
        let request = HttpRequest::post_json(
            endpoints::UGG_API,
            json!({
                "operationName": "GetLiveGame",
                "variables": {
                    "riotUserName": game_name,
                    "riotTagLine": tag_line,
                    "regionId": self.region,
                },
                "query": LIVE_GAME_QUERY,
            }),
        )
        .header("accept", "*/*")
        .header("content-type", "application/json")
        .header("origin", "https://u.gg")
        .header(
            "referer",
            endpoints::ugg_live_game_referer(&self.region, game_name, tag_line),
        )
        .header("x-app-type", "web");

        let response = self.transport.execute(&request)?;
        if response.status == 404 {
            return Err(AppError::NoActiveMatch);
        }
        let response = response.error_for_status(endpoints::UGG_API)?;
        let payload: GraphQlResponse<LiveGameData> = response.json()?;

        if let Some(error) = payload.errors.first() {
            let message = if error.message.is_empty() {
                "Unknown error".to_string()
            } else {
                error.message.clone()
            };
            return Err(AppError::UpstreamError(message));
        }

        let game = payload
            .data
            .and_then(|d| d.get_live_game)
            .ok_or(AppError::NoActiveMatch)?;

        let wanted_name = game_name.to_lowercase();
        let wanted_tag = tag_line.to_lowercase();
        let is_requester = |p: &LivePlayerDto| {
            p.riot_user_name.to_lowercase() == wanted_name && p.riot_tag_line.to_lowercase() == wanted_tag
        };

        // Whichever raw team holds the requester is the ally side
        let (ally_raw, enemy_raw, me) = if let Some(me) = game.team_a.iter().find(|p| is_requester(*p)) {
            (&game.team_a, &game.team_b, me)
        } else if let Some(me) = game.team_b.iter().find(|p| is_requester(*p)) {
            (&game.team_b, &game.team_a, me)
        } else {
            return Err(AppError::PlayerNotInMatch(account.to_string()));
        };

        let roster = self.static_data.current_roster()?;

        let live_match = LiveMatch {
            my_champion: to_participant(me, &roster),
            ally_team: build_team(ally_raw, &roster),
            enemy_team: build_team(enemy_raw, &roster),
            game_mode: game.game_type.clone().unwrap_or_else(|| "unknown".to_string()),
            queue_id: game.queue_id,
            game_length_seconds: game.game_length_seconds,
            game_start_time: self.cache.now() - chrono::Duration::seconds(game.game_length_seconds),
            version: roster.version.clone(),
        };

        self.cache.set(&key, &live_match);
        Ok(live_match)
    }
}

fn to_participant(player: &LivePlayerDto, roster: &ChampionRoster) -> MatchParticipant {
    let champion = roster.find_by_numeric_id(player.champion_id);
    if champion.is_none() {
        tracing::warn!(champion_id = player.champion_id, "champion id missing from roster");
    }
    MatchParticipant {
        champion_id: player.champion_id,
        champion_name: champion
            .map(|c| c.name.clone())
            .unwrap_or_else(|| format!("Champion{}", player.champion_id)),
        champion_key: champion.map(|c| c.key.clone()),
        summoner_name: format!("{}#{}", player.riot_user_name, player.riot_tag_line),
        role: Role::parse(player.current_role.as_deref()),
    }
}

/// Stable sort by role priority, so equal roles keep arrival order.
fn build_team(players: &[LivePlayerDto], roster: &ChampionRoster) -> Vec<MatchParticipant> {
    let mut team: Vec<MatchParticipant> = players.iter().map(|p| to_participant(p, roster)).collect();
    team.sort_by_key(|p| p.role.priority());
    team
}
