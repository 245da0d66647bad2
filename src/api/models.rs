use serde::Deserialize;
use std::collections::HashMap;

// Data Dragon champion list (champion.json)
#[derive(Debug, Deserialize)]
pub struct DataDragonChampions {
    pub data: HashMap<String, ChampionInfo>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChampionInfo {
    pub id: String,
    pub name: String,
    /// Numeric id, as a string.
    pub key: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

// Per-champion file (champion/{key}.json), same shape on both ability sources
#[derive(Debug, Deserialize)]
pub struct ChampionDetailFile {
    pub data: HashMap<String, ChampionDetail>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChampionDetail {
    #[serde(default)]
    pub passive: Option<PassiveDto>,
    #[serde(default)]
    pub spells: Vec<SpellDto>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PassiveDto {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub image: ImageDto,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SpellDto {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tooltip: String,
    #[serde(default)]
    pub cooldown: Vec<f64>,
    #[serde(default)]
    pub cooldown_burn: Option<String>,
    pub image: ImageDto,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImageDto {
    pub full: String,
}

// u.gg GraphQL live game
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveGameData {
    #[serde(default)]
    pub get_live_game: Option<LiveGameDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveGameDto {
    #[serde(default)]
    pub game_length_seconds: i64,
    #[serde(default)]
    pub game_type: Option<String>,
    #[serde(default)]
    pub queue_id: i64,
    #[serde(default)]
    pub team_a: Vec<LivePlayerDto>,
    #[serde(default)]
    pub team_b: Vec<LivePlayerDto>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LivePlayerDto {
    pub champion_id: u32,
    pub riot_user_name: String,
    pub riot_tag_line: String,
    #[serde(default)]
    pub current_role: Option<String>,
}

// YouTube Data API search
#[derive(Debug, Deserialize)]
pub struct YoutubeSearchResponse {
    #[serde(default)]
    pub items: Vec<YoutubeSearchItem>,
}

#[derive(Debug, Deserialize)]
pub struct YoutubeSearchItem {
    pub id: YoutubeItemId,
    #[serde(default)]
    pub snippet: Option<YoutubeSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YoutubeItemId {
    pub kind: String,
    #[serde(default)]
    pub video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YoutubeSnippet {
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnails: HashMap<String, YoutubeThumbnail>,
    #[serde(default)]
    pub channel_title: String,
}

#[derive(Debug, Deserialize)]
pub struct YoutubeThumbnail {
    pub url: String,
}
