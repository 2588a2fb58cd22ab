mod commands;
mod config;
mod render;
mod utils;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::commands::sync::SyncOptions;
use crate::config::Config;

const VERBOSE_FILTER: &str =
    "trellocal=debug,trellocal_core=debug,trellocal_trello=debug,trellocal_google=debug";

#[derive(Parser)]
#[command(name = "trellocal")]
#[command(about = "Mirror the cards of a Trello list onto a dedicated Google Calendar")]
#[command(long_about = "\
Mirror the cards of a Trello list onto a dedicated Google Calendar.

Every event on CALENDAR_TASKS_ID is deleted on each run before the cards
are written back, so use a calendar that holds nothing else.

Configuration comes from the environment (or a .env file):
  CALENDAR_MAIN_ID, CALENDAR_TASKS_ID, API_KEY, TOKEN, LIST_ID, ESTIMATE_FIELD_ID
Optional:
  SCHEDULE_MODE (due|slots), SCHEDULE_START, SLOT_EVENT_NAME,
  GOOGLE_CLIENT_SECRET_FILE, GOOGLE_TOKEN_FILE")]
struct Cli {
    /// Read and schedule, print the plan, change nothing
    #[arg(long)]
    dry_run: bool,

    /// Don't write scheduled start/due dates back to Trello cards (slots mode)
    #[arg(long)]
    no_card_dates: bool,

    /// Debug logging to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    dotenv::dotenv().ok();
    init_tracing(cli.verbose);

    let config = Config::from_env()?;

    commands::sync::run(
        &config,
        SyncOptions {
            dry_run: cli.dry_run,
            write_card_dates: !cli.no_card_dates,
        },
    )
    .await
}

fn init_tracing(verbose: bool) {
    let default = if verbose { VERBOSE_FILTER } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
