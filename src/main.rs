mod api;
mod cache;
mod config;
mod display;
mod error;
mod model;
mod scrape;
#[cfg(test)]
mod testing;
mod trivia;

use anyhow::Context;
use api::abilities::AbilityClient;
use api::http::{HttpTransport, UreqTransport};
use api::live_match::LiveMatchClient;
use api::static_data::StaticDataClient;
use api::videos::VideoSearchClient;
use cache::CacheStore;
use clap::{Parser, Subcommand};
use config::Config;
use display::output::{
    display_abilities, display_challenge, display_error, display_guess_result, display_info,
    display_live_match, display_recommendations, display_roster, display_skill_order, display_success,
    display_version, display_videos,
};
use error::AppError;
use indicatif::ProgressBar;
use scrape::skill_order::SkillOrderClient;
use std::sync::Arc;
use std::time::Duration;
use trivia::challenge::ChallengeBuilder;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "League Companion")]
#[command(about = "Live game rosters, abilities, skill orders and guide videos", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the current game version
    Version,

    /// List every champion in the current version
    Champions,

    /// Show both teams of the game an account is currently playing
    Live {
        /// Riot ID (GameName#TagLine)
        account: String,
    },

    /// Show a champion's passive and Q/W/E/R
    Abilities {
        champion: String,
    },

    /// Show a champion's level 1-18 skill order
    Skills {
        champion: String,

        /// Ignore the cached order and scrape again
        #[arg(long)]
        refresh: bool,
    },

    /// Search for videos
    Search {
        query: String,

        /// Number of results to request
        #[arg(short = 'n', long, default_value = "5")]
        max_results: u32,
    },

    /// Guide and matchup videos for your champion against another
    Videos {
        /// Champion to learn about
        selected: String,

        /// Champion you are playing
        mine: String,
    },

    /// Guess a champion from its masked ability descriptions
    Trivia {
        champion: String,

        /// Your guess
        #[arg(short, long)]
        guess: Option<String>,
    },
}

struct Services {
    static_data: StaticDataClient,
    live_match: LiveMatchClient,
    abilities: AbilityClient,
    skill_orders: SkillOrderClient,
    videos: VideoSearchClient,
}

impl Services {
    fn new(config: &Config) -> Self {
        let transport: Arc<dyn HttpTransport> = Arc::new(UreqTransport::new(config));
        let cache = Arc::new(CacheStore::new());

        let static_data = StaticDataClient::new(transport.clone(), cache.clone(), config);
        Services {
            live_match: LiveMatchClient::new(transport.clone(), cache.clone(), static_data.clone(), &config.region),
            abilities: AbilityClient::new(transport.clone(), cache.clone(), static_data.clone()),
            skill_orders: SkillOrderClient::new(transport.clone(), cache.clone()),
            videos: VideoSearchClient::new(transport, cache, config),
            static_data,
        }
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "league_companion=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        let message = match e.downcast_ref::<AppError>() {
            Some(AppError::RateLimited { retry_after_secs }) => {
                format!("⛔ Rate limited. Try again in {} seconds.", retry_after_secs)
            }
            _ => format!("{:#}", e),
        };
        display_error(&message);
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    let services = Services::new(&config);

    match args.command {
        Command::Version => {
            let version = services.static_data.get_current_version()?;
            display_version(&version);
        }
        Command::Champions => {
            let pb = spinner("Fetching champion roster");
            let roster = services.static_data.current_roster();
            pb.finish_and_clear();
            display_roster(&roster?);
        }
        Command::Live { account } => {
            display_info(&format!("Looking up live game for {} in {}", account, config.region));
            let pb = spinner("Querying live game");
            let live = services.live_match.get_live_match(&account);
            pb.finish_and_clear();
            display_live_match(&live?);
        }
        Command::Abilities { champion } => {
            let pb = spinner("Fetching abilities");
            let abilities = services.abilities.get_abilities(&champion);
            pb.finish_and_clear();
            display_abilities(&champion, &abilities?);
        }
        Command::Skills { champion, refresh } => {
            let pb = spinner("Scraping skill order");
            let order = services.skill_orders.get_skill_order(&champion, refresh);
            pb.finish_and_clear();
            display_skill_order(&champion, &order);
        }
        Command::Search { query, max_results } => {
            let videos = services.videos.search(&query, max_results);
            display_videos(&query, &videos);
        }
        Command::Videos { selected, mine } => {
            let pb = spinner("Searching videos");
            let recs = services.videos.recommend(&selected, &mine);
            pb.finish_and_clear();
            display_recommendations(&selected, &mine, &recs);
        }
        Command::Trivia { champion, guess } => {
            let pb = spinner("Preparing challenge");
            let challenge = ChallengeBuilder::new(&services.abilities, &services.skill_orders).build(&champion);
            pb.finish_and_clear();
            let challenge = challenge?;
            if !challenge.is_playable() {
                anyhow::bail!("No clues available for {} right now", champion);
            }
            display_challenge(&challenge);
            match guess {
                Some(guess) => display_guess_result(&guess, &challenge),
                None => display_success("Run again with --guess <name> to answer"),
            }
        }
    }

    Ok(())
}
