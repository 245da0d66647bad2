use crate::api::endpoints;
use crate::api::http::{HttpRequest, HttpTransport};
use crate::api::models::{YoutubeSearchItem, YoutubeSearchResponse};
use crate::cache::{cache_key, CacheStore, VIDEO_TTL};
use crate::config::Config;
use crate::error::AppError;
use crate::model::{VideoPick, VideoRecommendations, VideoResult};
use regex::Regex;
use std::sync::{Arc, OnceLock};

const VIDEO_KIND: &str = "youtube#video";
const THUMBNAIL_PREFERENCE: [&str; 3] = ["high", "medium", "default"];

/// Channels known for champion-specific matchup content.
const MATCHUP_CREATORS: &[(&str, &str)] = &[("aatrox", "Naayil"), ("tryndamere", "Foggedftw2")];

pub fn guide_query(champion: &str) -> String {
    format!("3 Minute League of Legends {} Guide", champion)
}

fn timestamp() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+):(\d{2})").expect("timestamp pattern is valid"))
}

fn first_timestamp(line: &str) -> Option<u32> {
    let caps = timestamp().captures(line)?;
    let minutes: u32 = caps.get(1)?.as_str().parse().ok()?;
    let seconds: u32 = caps.get(2)?.as_str().parse().ok()?;
    minutes.checked_mul(60)?.checked_add(seconds)
}

/// Start of the abilities chapter in a guide description, in seconds.
///
/// Looks for a timestamped line mentioning abilities or spells (the first
/// line is the intro and is skipped); otherwise takes the second timestamp
/// in the description, which is usually the abilities section.
pub fn parse_abilities_timestamp(description: &str) -> Option<u32> {
    let chapter = description.lines().skip(1).find_map(|line| {
        let lower = line.to_lowercase();
        if lower.contains("abilit") || lower.contains("spell") {
            first_timestamp(line)
        } else {
            None
        }
    });
    chapter.or_else(|| description.lines().filter_map(first_timestamp).nth(1))
}

fn to_video(item: YoutubeSearchItem) -> Option<VideoResult> {
    if item.id.kind != VIDEO_KIND {
        return None;
    }
    let video_id = item.id.video_id?;
    let snippet = item.snippet?;
    let thumbnail = THUMBNAIL_PREFERENCE
        .iter()
        .find_map(|size| snippet.thumbnails.get(*size))
        .map(|t| t.url.clone());

    Some(VideoResult {
        video_id,
        title: snippet.title,
        description: snippet.description,
        thumbnail,
        published_at: snippet.published_at,
        channel_id: snippet.channel_id,
        channel_title: snippet.channel_title,
    })
}

pub struct VideoSearchClient {
    transport: Arc<dyn HttpTransport>,
    cache: Arc<CacheStore>,
    api_keys: Vec<String>,
}

impl VideoSearchClient {
    pub fn new(transport: Arc<dyn HttpTransport>, cache: Arc<CacheStore>, config: &Config) -> Self {
        let api_keys = [&config.youtube_api_key, &config.youtube_backup_key]
            .into_iter()
            .flatten()
            .cloned()
            .collect();
        VideoSearchClient {
            transport,
            cache,
            api_keys,
        }
    }

    pub fn has_credentials(&self) -> bool {
        !self.api_keys.is_empty()
    }

    /// Video hits only; channels and playlists are dropped.
    ///
    /// When every key fails the empty result is cached for the full TTL so a
    /// broken key is not retried on every call.
    pub fn search(&self, query: &str, max_results: u32) -> Vec<VideoResult> {
        if !self.has_credentials() {
            tracing::debug!(query, "no video API key configured");
            return Vec::new();
        }

        let key = cache_key("video_search", &(query, max_results));
        if let Some(cached) = self.cache.get::<Vec<VideoResult>>(&key, VIDEO_TTL) {
            return cached;
        }

        let mut videos = Vec::new();
        for (attempt, api_key) in self.api_keys.iter().enumerate() {
            match self.search_with_key(query, max_results, api_key) {
                Ok(found) => {
                    videos = found;
                    break;
                }
                Err(e) => {
                    tracing::warn!(query, attempt, error = %e, "video search failed");
                }
            }
        }

        self.cache.set(&key, &videos);
        videos
    }

    fn search_with_key(&self, query: &str, max_results: u32, api_key: &str) -> Result<Vec<VideoResult>, AppError> {
        let request = HttpRequest::get(endpoints::YOUTUBE_SEARCH)
            .query("part", "snippet")
            .query("type", "video")
            .query("maxResults", max_results.to_string())
            .query("q", query)
            .query("key", api_key);

        let response = self
            .transport
            .execute(&request)?
            .error_for_status(endpoints::YOUTUBE_SEARCH)?;
        let payload: YoutubeSearchResponse = response.json()?;

        Ok(payload.items.into_iter().filter_map(to_video).collect())
    }

    fn first_hit(&self, query: &str) -> Option<VideoResult> {
        self.search(query, 1).into_iter().next()
    }

    /// A guide for `selected` and a matchup video for `mine` against it.
    ///
    /// The matchup tries a specialist creator (when one is known for `mine`),
    /// then a generic matchup search, then a plain guide for `mine`.
    pub fn recommend(&self, selected: &str, mine: &str) -> VideoRecommendations {
        let guide = self.first_hit(&guide_query(selected)).map(|video| {
            let abilities_start = parse_abilities_timestamp(&video.description);
            VideoPick {
                video,
                abilities_start,
            }
        });

        let mut matchup = None;
        let mut fallback_reason = None;

        let creator = MATCHUP_CREATORS
            .iter()
            .find(|(champion, _)| champion.eq_ignore_ascii_case(mine.trim()))
            .map(|(_, creator)| *creator);

        if let Some(creator) = creator {
            matchup = self.first_hit(&format!("{} {} vs {}", creator, mine, selected));
            if matchup.is_none() {
                fallback_reason = Some(format!("No results for {} matchup", creator));
            }
        }
        if matchup.is_none() {
            matchup = self.first_hit(&format!("{} vs {} matchup", mine, selected));
            if matchup.is_none() {
                fallback_reason = Some("No specific matchup videos found".to_string());
            }
        }
        if matchup.is_none() {
            matchup = self.first_hit(&format!("{} guide", mine));
            if matchup.is_none() {
                fallback_reason = Some("No matchup or guide videos found".to_string());
            }
        }

        VideoRecommendations {
            guide,
            fallback_reason: if matchup.is_none() { fallback_reason } else { None },
            matchup: matchup.map(|video| VideoPick {
                video,
                abilities_start: None,
            }),
        }
    }
}
