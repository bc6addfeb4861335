use std::sync::Arc;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use timecapsule::{calendar::Season, cli, config, types::PkceToken, utils, warning};
use tokio::sync::Mutex;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightGreen.on_default())
        .placeholder(AnsiColor::BrightBlue.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// List the years and seasons you can pick from
    Seasons(SeasonsOptions),

    /// Sample songs you added during a season
    Capsule(CapsuleOptions),

    /// Get recommendations seeded from your playlists
    Recommend(RecommendOptions),

    /// Show how many playlists have been created
    Stats,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct SeasonsOptions {
    /// Only show this year
    #[clap(long)]
    pub year: Option<i32>,
}

#[derive(Parser, Debug, Clone)]
pub struct CapsuleOptions {
    /// Year of the time frame
    #[clap(long)]
    pub year: i32,

    /// Season of the time frame (winter, spring, summer, fall)
    #[clap(long)]
    pub season: Season,

    /// Number of songs to sample (at most 100)
    #[clap(long, default_value_t = 20, allow_negative_numbers = true)]
    pub limit: i64,

    /// Save the sample as a new playlist with this name
    #[clap(long)]
    pub name: Option<String>,

    /// Description of the new playlist
    #[clap(long, requires = "name")]
    pub description: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct RecommendOptions {
    /// Genre to seed with; can be repeated (at most 3)
    #[clap(long = "genre", required = true, value_parser = utils::parse_genre, num_args = 1)]
    pub genres: Vec<utils::Genre>,

    /// Save the recommendations as a new playlist with this name
    #[clap(long)]
    pub name: Option<String>,

    /// Rows to save, e.g. 1,3,5 (default: all)
    #[clap(long, requires = "name", value_delimiter = ',', value_parser = utils::parse_pick)]
    pub pick: Vec<usize>,

    /// Description of the new playlist
    #[clap(long, requires = "name")]
    pub description: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => {
            let oauth_result: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
            cli::auth(Arc::clone(&oauth_result)).await;
        }
        Command::Seasons(opt) => cli::seasons(opt.year),
        Command::Capsule(opt) => {
            cli::capsule(opt.year, opt.season, opt.limit, opt.name, opt.description).await
        }
        Command::Recommend(opt) => {
            let picks = if opt.pick.is_empty() {
                None
            } else {
                Some(opt.pick)
            };
            cli::recommend(opt.genres, opt.name, picks, opt.description).await
        }
        Command::Stats => cli::stats().await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
