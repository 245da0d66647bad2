use crate::model::{
    Ability, ChampionRoster, GameVersion, LiveMatch, MatchParticipant, SkillOrder, SkillOrderSource, Slot,
    VideoPick, VideoRecommendations, VideoResult,
};
use crate::trivia::challenge::Challenge;
use chrono::Utc;
use colored::*;
use tabled::{settings::Style, Table, Tabled};

const DESCRIPTION_WIDTH: usize = 70;

#[derive(Tabled)]
struct ChampionRow {
    champion: String,
    key: String,
    id: u32,
    tags: String,
}

#[derive(Tabled)]
struct ParticipantRow {
    role: String,
    champion: String,
    player: String,
}

#[derive(Tabled)]
struct AbilityRow {
    slot: String,
    name: String,
    cooldowns: String,
    description: String,
}

#[derive(Tabled)]
struct VideoRow {
    #[tabled(rename = "#")]
    number: String,
    title: String,
    channel: String,
    url: String,
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let cut: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

fn slot_colored(slot: Slot) -> ColoredString {
    let letter = slot.letter().to_string();
    match slot {
        Slot::Q => letter.cyan(),
        Slot::W => letter.green(),
        Slot::E => letter.yellow(),
        Slot::R => letter.red().bold(),
        Slot::Passive => letter.normal(),
    }
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
}

pub fn display_info(message: &str) {
    println!("{} {}", "ℹ️".cyan(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

pub fn display_warning(message: &str) {
    println!("{} {}", "⚠️".yellow(), message);
}

pub fn display_version(version: &GameVersion) {
    println!("{} {}", "🎮 Current game version:".bold().cyan(), version);
}

pub fn display_roster(roster: &ChampionRoster) {
    println!(
        "\n{}",
        format!("📚 CHAMPIONS ({} on {})", roster.len(), roster.version).bold().cyan()
    );
    println!("{}\n", "=".repeat(60).cyan());

    let rows: Vec<ChampionRow> = roster
        .sorted_by_name()
        .into_iter()
        .map(|champ| ChampionRow {
            champion: champ.name.clone(),
            key: champ.key.clone(),
            id: champ.numeric_id,
            tags: champ.tags.join(", "),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

fn team_table(team: &[MatchParticipant], me: &MatchParticipant) -> Table {
    let rows: Vec<ParticipantRow> = team
        .iter()
        .map(|p| {
            let player = if p.summoner_name == me.summoner_name {
                p.summoner_name.bold().to_string()
            } else {
                p.summoner_name.clone()
            };
            ParticipantRow {
                role: p.role.to_string(),
                champion: p.champion_name.clone(),
                player,
            }
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table
}

pub fn display_live_match(live: &LiveMatch) {
    let elapsed = Utc::now().signed_duration_since(live.game_start_time);

    println!("\n{}", "🔴 LIVE GAME".bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());
    println!(
        "{} {} (queue {}) · {}m {:02}s in",
        "Mode:".bold(),
        live.game_mode,
        live.queue_id,
        elapsed.num_minutes(),
        elapsed.num_seconds().rem_euclid(60)
    );
    println!(
        "{} {}\n",
        "Playing:".bold(),
        live.my_champion.champion_name.green().bold()
    );

    println!("{}", "Allies".bold().green());
    println!("{}\n", team_table(&live.ally_team, &live.my_champion));
    println!("{}", "Enemies".bold().red());
    println!("{}\n", team_table(&live.enemy_team, &live.my_champion));
}

pub fn display_abilities(champion: &str, abilities: &[Ability]) {
    println!("\n{}", format!("✨ ABILITIES: {}", champion).bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());

    if abilities.is_empty() {
        println!("{}", "No ability data available right now".yellow());
        return;
    }

    let rows: Vec<AbilityRow> = abilities
        .iter()
        .map(|a| AbilityRow {
            slot: a.slot.letter().to_string(),
            name: a.name.clone(),
            cooldowns: if a.cooldowns.is_empty() {
                "-".to_string()
            } else {
                a.cooldowns
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join("/")
            },
            description: truncate(&a.description, DESCRIPTION_WIDTH),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

pub fn display_skill_order(champion: &str, order: &SkillOrder) {
    println!("\n{}", format!("📈 SKILL ORDER: {}", champion).bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());

    if order.is_empty() {
        println!("{}", "Skill order sources are unreachable, try again later".yellow());
        return;
    }

    let levels: Vec<String> = (1..=order.sequence.len()).map(|l| format!("{:>2}", l)).collect();
    let slots: Vec<String> = order
        .sequence
        .iter()
        .map(|s| format!(" {}", slot_colored(*s)))
        .collect();
    println!("{} {}", "Level:".bold(), levels.join(" "));
    println!("{} {}", "Skill:".bold(), slots.join(" "));

    let source = match order.source {
        SkillOrderSource::Primary => "community stats grid",
        SkillOrderSource::Secondary => "community build page",
        SkillOrderSource::Fallback => "generic order (sources unreadable)",
    };
    println!("\n{} {}", "Source:".bold(), source);
    if !order.is_complete() {
        display_warning(&format!("Only {} of 18 levels were available", order.sequence.len()));
    }
    println!();
}

pub fn display_videos(query: &str, videos: &[VideoResult]) {
    println!("\n{}", format!("🎬 VIDEOS: {}", query).bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());

    if videos.is_empty() {
        println!("{}", "No videos found (is YOUTUBE_API_KEY set?)".yellow());
        return;
    }

    let rows: Vec<VideoRow> = videos
        .iter()
        .enumerate()
        .map(|(idx, v)| VideoRow {
            number: format!("{}", idx + 1),
            title: truncate(&v.title, 50),
            channel: v.channel_title.clone(),
            url: watch_url(&v.video_id),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

fn display_pick(label: &str, pick: Option<&VideoPick>) {
    match pick {
        Some(pick) => {
            let url = match pick.abilities_start {
                Some(start) => format!("{}&t={}s", watch_url(&pick.video.video_id), start),
                None => watch_url(&pick.video.video_id),
            };
            println!("{} {} ({})", label.bold(), pick.video.title, pick.video.channel_title.dimmed());
            println!("   {}", url.underline());
        }
        None => println!("{} {}", label.bold(), "none".dimmed()),
    }
}

pub fn display_recommendations(selected: &str, mine: &str, recs: &VideoRecommendations) {
    println!("\n{}", format!("🎬 {} vs {}", mine, selected).bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());

    display_pick("Guide:  ", recs.guide.as_ref());
    display_pick("Matchup:", recs.matchup.as_ref());
    if let Some(reason) = &recs.fallback_reason {
        display_warning(reason);
    }
    println!();
}

pub fn display_challenge(challenge: &Challenge) {
    println!("\n{}", "❓ WHO AM I?".bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());

    for slot in [Slot::Passive, Slot::Q, Slot::W, Slot::E, Slot::R] {
        if let Some(clue) = challenge.ability_clue(slot) {
            println!("{} {}", format!("[{}]", slot.letter()).bold(), truncate(&clue, 100));
        }
    }
    if !challenge.skill_order.is_empty() {
        println!("\n{} {}", "Skill order:".bold(), challenge.skill_order.letters());
    }
    println!();
}

pub fn display_guess_result(guess: &str, challenge: &Challenge) {
    if challenge.check(guess) {
        display_success(&format!("Correct! It was {}", challenge.champion));
    } else {
        println!("{} {} is not it", "✗".red(), guess);
    }
}
