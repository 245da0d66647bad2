//! Structural parsers for the two skill-order pages.
//!
//! Each markup variant is a pure `fn(&str) -> Option<T>`; a chain tries the
//! variants in order and keeps the first one that matches. Adding or retiring
//! support for a site redesign means editing one table.

use crate::error::AppError;
use crate::model::Slot;
use regex::Regex;
use std::sync::OnceLock;

pub const LEVELS: usize = 18;

/// One skill cell from the level grid, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub active: bool,
}

pub type GridParser = fn(&str) -> Option<Vec<GridCell>>;

/// Known layouts of the level grid, most recent first.
pub const GRID_PARSERS: &[(&str, GridParser)] = &[
    ("td-class-first", parse_grid_class_first),
    ("td-active-first", parse_grid_active_first),
    ("any-attribute-order", parse_grid_any_attribute_order),
];

/// Runs parsers in order and returns the first non-empty result with the
/// name of the variant that produced it.
pub fn run_chain<T>(html: &str, parsers: &[(&'static str, fn(&str) -> Option<Vec<T>>)]) -> Option<(&'static str, Vec<T>)> {
    parsers.iter().find_map(|(name, parser)| {
        parser(html)
            .filter(|found| !found.is_empty())
            .map(|found| (*name, found))
    })
}

fn has_class_token(class_attr: &str, token: &str) -> bool {
    class_attr.split_whitespace().any(|t| t == token)
}

fn collect_cells(re: &Regex, html: &str) -> Option<Vec<GridCell>> {
    let cells: Vec<GridCell> = re
        .captures_iter(html)
        .map(|caps| GridCell {
            active: caps
                .name("class")
                .map(|m| has_class_token(m.as_str(), "active"))
                .unwrap_or(false),
        })
        .collect();
    // A layout that matches cells but marks none active is the wrong layout
    if cells.iter().any(|c| c.active) {
        Some(cells)
    } else {
        None
    }
}

// <td class="skillCell active">
fn parse_grid_class_first(html: &str) -> Option<Vec<GridCell>> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r#"<td\s+class="(?P<class>skillCell(?:\s+[^"]*)?)""#).expect("grid pattern is valid")
    });
    collect_cells(re, html)
}

// <td class="active skillCell">
fn parse_grid_active_first(html: &str) -> Option<Vec<GridCell>> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r#"<td\s+class="(?P<class>(?:[^"]*\s)?skillCell(?:\s[^"]*)?)""#).expect("grid pattern is valid")
    });
    collect_cells(re, html)
}

// <td data-level="3" class="skill-cell level-cell active"> and <div> grids
fn parse_grid_any_attribute_order(html: &str) -> Option<Vec<GridCell>> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r#"<(?:td|div)\b[^>]*?\sclass="(?P<class>[^"]*\bskill-?[cC]ell\b[^"]*)""#)
            .expect("grid pattern is valid")
    });
    collect_cells(re, html)
}

/// Maps grid cells to a level-indexed slot array.
///
/// Cell `i` belongs to skill row `i / 18` (Q, W, E, R) and level `i % 18`.
/// When two active cells land on the same level the first one in document
/// order wins. Returns the filled levels and how many active cells mapped to
/// a skill row.
pub fn grid_to_levels(cells: &[GridCell]) -> ([Option<Slot>; LEVELS], usize) {
    let mut levels: [Option<Slot>; LEVELS] = [None; LEVELS];
    let mut resolved = 0;

    for (index, cell) in cells.iter().enumerate() {
        if !cell.active {
            continue;
        }
        let Some(slot) = Slot::ACTIVE.get(index / LEVELS).copied() else {
            continue;
        };
        resolved += 1;
        let level = index % LEVELS;
        if levels[level].is_none() {
            levels[level] = Some(slot);
        }
    }

    (levels, resolved)
}

/// Level-up events grouped per skill: a `data-skill="Q"` marker followed by
/// rows reading "leveled at level N", up to the next marker.
pub fn parse_leveled_rows(html: &str) -> Result<Vec<(u8, Slot)>, AppError> {
    static GROUP: OnceLock<Regex> = OnceLock::new();
    static ROW: OnceLock<Regex> = OnceLock::new();
    let group = GROUP.get_or_init(|| Regex::new(r#"data-skill="([QWERqwer])""#).expect("group pattern is valid"));
    let row = ROW.get_or_init(|| Regex::new(r"(?i)leveled at level\s*(\d{1,2})").expect("row pattern is valid"));

    let markers: Vec<(usize, usize, Slot)> = group
        .captures_iter(html)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let letter = caps.get(1)?.as_str().chars().next()?;
            Some((whole.start(), whole.end(), Slot::from_letter(letter)?))
        })
        .collect();

    if markers.is_empty() {
        return Err(AppError::ParseFailure("no skill groups in page".to_string()));
    }

    let mut pairs = Vec::new();
    for (i, (_, body_start, slot)) in markers.iter().enumerate() {
        let body_end = markers.get(i + 1).map(|(start, _, _)| *start).unwrap_or(html.len());
        for caps in row.captures_iter(&html[*body_start..body_end]) {
            let level = caps.get(1).and_then(|m| m.as_str().parse::<u8>().ok());
            if let Some(level) = level.filter(|l| (1..=LEVELS as u8).contains(l)) {
                pairs.push((level, *slot));
            }
        }
    }

    if pairs.is_empty() {
        return Err(AppError::ParseFailure("skill groups contain no level rows".to_string()));
    }
    Ok(pairs)
}
