use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameVersion(pub String);

impl GameVersion {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Champion {
    /// Stable slug, e.g. "MonkeyKing". Join key for every other source.
    pub key: String,
    pub name: String,
    pub numeric_id: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChampionRoster {
    pub version: GameVersion,
    /// Keyed by slug.
    pub champions: BTreeMap<String, Champion>,
}

impl ChampionRoster {
    pub fn find_by_name(&self, name: &str) -> Option<&Champion> {
        let wanted = name.trim().to_lowercase();
        self.champions
            .values()
            .find(|champ| champ.name.to_lowercase() == wanted)
    }

    pub fn find_by_numeric_id(&self, id: u32) -> Option<&Champion> {
        self.champions.values().find(|champ| champ.numeric_id == id)
    }

    pub fn sorted_by_name(&self) -> Vec<&Champion> {
        let mut champions: Vec<&Champion> = self.champions.values().collect();
        champions.sort_by(|a, b| a.name.cmp(&b.name));
        champions
    }

    pub fn len(&self) -> usize {
        self.champions.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Slot {
    #[serde(rename = "P")]
    Passive,
    Q,
    W,
    E,
    R,
}

impl Slot {
    pub const ACTIVE: [Slot; 4] = [Slot::Q, Slot::W, Slot::E, Slot::R];

    pub fn letter(self) -> char {
        match self {
            Slot::Passive => 'P',
            Slot::Q => 'Q',
            Slot::W => 'W',
            Slot::E => 'E',
            Slot::R => 'R',
        }
    }

    /// Only the levelable slots; the passive never appears in a skill order.
    pub fn from_letter(letter: char) -> Option<Slot> {
        match letter.to_ascii_uppercase() {
            'Q' => Some(Slot::Q),
            'W' => Some(Slot::W),
            'E' => Some(Slot::E),
            'R' => Some(Slot::R),
            _ => None,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Cooldown {
    Seconds(f64),
    Unknown,
}

impl fmt::Display for Cooldown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cooldown::Seconds(s) => write!(f, "{}", s),
            Cooldown::Unknown => f.write_str("?"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    pub slot: Slot,
    pub name: String,
    pub description: String,
    pub icon_url: String,
    /// Empty for the passive.
    pub cooldowns: Vec<Cooldown>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillOrderSource {
    Primary,
    Secondary,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillOrder {
    /// One slot per character level, starting at level 1.
    pub sequence: Vec<Slot>,
    pub source: SkillOrderSource,
}

impl SkillOrder {
    pub const FULL_LENGTH: usize = 18;

    pub fn empty() -> Self {
        SkillOrder {
            sequence: Vec::new(),
            source: SkillOrderSource::Fallback,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Shorter sequences come from incomplete source pages.
    pub fn is_complete(&self) -> bool {
        self.sequence.len() >= Self::FULL_LENGTH
    }

    #[allow(dead_code)]
    pub fn count(&self, slot: Slot) -> usize {
        self.sequence.iter().filter(|s| **s == slot).count()
    }

    pub fn letters(&self) -> String {
        self.sequence.iter().map(|s| s.letter()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Top,
    Jungle,
    Mid,
    Adc,
    Supp,
    Unknown,
}

impl Role {
    pub fn parse(raw: Option<&str>) -> Role {
        match raw.map(|r| r.trim().to_lowercase()).as_deref() {
            Some("top") => Role::Top,
            Some("jungle") => Role::Jungle,
            Some("mid") => Role::Mid,
            Some("adc") => Role::Adc,
            Some("supp") => Role::Supp,
            _ => Role::Unknown,
        }
    }

    /// Sort priority within a team. Unknown roles tie with support, so a
    /// stable sort keeps both in arrival order at the end.
    pub fn priority(self) -> u8 {
        match self {
            Role::Top => 1,
            Role::Jungle => 2,
            Role::Mid => 3,
            Role::Adc => 4,
            Role::Supp | Role::Unknown => 5,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Top => "top",
            Role::Jungle => "jungle",
            Role::Mid => "mid",
            Role::Adc => "adc",
            Role::Supp => "supp",
            Role::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchParticipant {
    pub champion_id: u32,
    pub champion_name: String,
    /// None when the id is missing from the roster.
    pub champion_key: Option<String>,
    pub summoner_name: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveMatch {
    pub my_champion: MatchParticipant,
    pub ally_team: Vec<MatchParticipant>,
    pub enemy_team: Vec<MatchParticipant>,
    pub game_mode: String,
    pub queue_id: i64,
    pub game_length_seconds: i64,
    pub game_start_time: DateTime<Utc>,
    pub version: GameVersion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoResult {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub thumbnail: Option<String>,
    pub published_at: Option<String>,
    pub channel_id: String,
    pub channel_title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoPick {
    pub video: VideoResult,
    /// Start of the abilities chapter, in seconds. Only looked up for guides.
    pub abilities_start: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecommendations {
    pub guide: Option<VideoPick>,
    pub matchup: Option<VideoPick>,
    pub fallback_reason: Option<String>,
}
