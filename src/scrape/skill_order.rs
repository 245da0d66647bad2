use crate::api::endpoints;
use crate::api::http::{HttpRequest, HttpTransport};
use crate::cache::{cache_key, CacheStore, SKILL_ORDER_TTL};
use crate::error::AppError;
use crate::model::{SkillOrder, SkillOrderSource, Slot};
use crate::scrape::parsers::{self, GRID_PARSERS};
use std::sync::Arc;

/// Fewer active grid cells than this means the page rendered client-side.
const MIN_ACTIVE_CELLS: usize = 6;

/// Points per skill over a full 18-level game.
const TARGET_COUNTS: [(Slot, usize); 4] = [(Slot::Q, 5), (Slot::W, 5), (Slot::E, 5), (Slot::R, 3)];

/// Generic max-Q build used when the secondary page cannot be parsed at all.
#[rustfmt::skip]
const FALLBACK_ORDER: [Slot; 18] = [
    Slot::Q, Slot::W, Slot::E, Slot::Q, Slot::Q, Slot::R,
    Slot::Q, Slot::W, Slot::Q, Slot::W, Slot::R, Slot::W,
    Slot::W, Slot::E, Slot::E, Slot::R, Slot::E, Slot::E,
];

/// Lowercase letters only: "Kai'Sa" -> "kaisa", "Dr. Mundo" -> "drmundo".
pub fn champion_slug(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Orders (level, slot) pairs by level, first pair wins on a shared level,
/// then tops up each skill to its full-game count in Q, W, E, R priority and
/// drops anything beyond it. The result always holds 5 Q, 5 W, 5 E and 3 R.
pub fn repair_sequence(pairs: &[(u8, Slot)]) -> Vec<Slot> {
    let mut by_level: Vec<(u8, Slot)> = Vec::with_capacity(pairs.len());
    for (level, slot) in pairs {
        if !by_level.iter().any(|(l, _)| l == level) {
            by_level.push((*level, *slot));
        }
    }
    by_level.sort_by_key(|(level, _)| *level);

    let mut sequence: Vec<Slot> = Vec::with_capacity(parsers::LEVELS);
    for (_, slot) in by_level {
        let target = target_count(slot);
        if sequence.iter().filter(|s| **s == slot).count() < target {
            sequence.push(slot);
        }
    }

    for (slot, target) in TARGET_COUNTS {
        let have = sequence.iter().filter(|s| **s == slot).count();
        sequence.extend(std::iter::repeat(slot).take(target.saturating_sub(have)));
    }
    sequence
}

fn target_count(slot: Slot) -> usize {
    TARGET_COUNTS
        .iter()
        .find(|(s, _)| *s == slot)
        .map(|(_, n)| *n)
        .unwrap_or(0)
}

/// Skill level-up order scraped from community stats sites.
pub struct SkillOrderClient {
    transport: Arc<dyn HttpTransport>,
    cache: Arc<CacheStore>,
}

impl SkillOrderClient {
    pub fn new(transport: Arc<dyn HttpTransport>, cache: Arc<CacheStore>) -> Self {
        SkillOrderClient { transport, cache }
    }

    /// Never fails: an empty order means both sites were unreachable, and
    /// it is not cached so the next call tries again.
    pub fn get_skill_order(&self, champion_name: &str, force_refresh: bool) -> SkillOrder {
        let slug = champion_slug(champion_name);
        let key = cache_key("skill_order", &slug);

        if !force_refresh {
            if let Some(cached) = self.cache.get::<SkillOrder>(&key, SKILL_ORDER_TTL) {
                return cached;
            }
        }

        let order = match self.scrape_primary(&slug) {
            Ok(Some(order)) => order,
            Ok(None) => self.scrape_secondary(&slug),
            Err(e) => {
                tracing::warn!(champion = %slug, error = %e, "primary skill order scrape failed");
                self.scrape_secondary(&slug)
            }
        };

        if order.is_empty() {
            tracing::warn!(champion = %slug, "no skill order available, not caching");
        } else {
            self.cache.set(&key, &order);
        }
        order
    }

    fn fetch_html(&self, url: &str) -> Result<String, AppError> {
        let request = HttpRequest::get(url).header("accept", "text/html,application/xhtml+xml");
        let response = self.transport.execute(&request)?.error_for_status(url)?;
        Ok(response.body)
    }

    /// `Ok(None)` when the page holds no usable grid.
    fn scrape_primary(&self, slug: &str) -> Result<Option<SkillOrder>, AppError> {
        let html = self.fetch_html(&endpoints::skill_order_primary(slug))?;

        let Some((variant, cells)) = parsers::run_chain(&html, GRID_PARSERS) else {
            tracing::info!(champion = %slug, "no known skill grid layout in primary page");
            return Ok(None);
        };

        let (levels, resolved) = parsers::grid_to_levels(&cells);
        if resolved < MIN_ACTIVE_CELLS {
            tracing::info!(champion = %slug, variant, resolved, "too few active cells, page is likely client-rendered");
            return Ok(None);
        }

        // Index i must stay level i + 1, so stop at the first missing level
        let sequence: Vec<Slot> = levels.iter().map_while(|level| *level).collect();
        if sequence.len() < MIN_ACTIVE_CELLS {
            tracing::info!(champion = %slug, variant, resolved, leading = sequence.len(), "grid has gaps in the early levels");
            return Ok(None);
        }

        tracing::debug!(champion = %slug, variant, resolved, "parsed primary skill grid");
        Ok(Some(SkillOrder {
            sequence,
            source: SkillOrderSource::Primary,
        }))
    }

    fn scrape_secondary(&self, slug: &str) -> SkillOrder {
        let html = match self.fetch_html(&endpoints::skill_order_secondary(slug)) {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(champion = %slug, error = %e, "secondary skill order page unavailable");
                return SkillOrder::empty();
            }
        };

        match parsers::parse_leveled_rows(&html) {
            Ok(pairs) => SkillOrder {
                sequence: repair_sequence(&pairs),
                source: SkillOrderSource::Secondary,
            },
            Err(e) => {
                tracing::warn!(champion = %slug, error = %e, "secondary skill order unparseable, using generic order");
                SkillOrder {
                    sequence: FALLBACK_ORDER.to_vec(),
                    source: SkillOrderSource::Fallback,
                }
            }
        }
    }
}
