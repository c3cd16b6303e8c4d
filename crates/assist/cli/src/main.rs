//! Targeting assistant command-line front end.
//!
//! Drives the targeting runtime against a JSON scene fixture: configure an
//! item, run its targeting with scripted or interactive picks, and inspect
//! saved configs.
//!
//! ```bash
//! target-assist configure --scene demos/skirmish.json i-blast --type "Area(Enemies)"
//! target-assist invoke --scene demos/skirmish.json i-blast --pick 250,150
//! target-assist show
//! ```

mod commands;
mod console;
mod dirs;
mod logging;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use commands::{Configure, Invoke, Session, Show, UseItem};

/// Targeting assistant for DX3rd scenes
#[derive(Parser)]
#[command(name = "target-assist")]
#[command(about = "Pick targets for items on a scene fixture", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory for saved targeting configs (default: ASSIST_DATA_DIR or
    /// the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Also log to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Configure how an item picks its targets
    Configure(Configure),

    /// Run the saved targeting of an item
    Invoke(Invoke),

    /// React to an item used from a chat card
    UseItem(UseItem),

    /// Show saved targeting configs
    Show(Show),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (for ASSIST_* settings)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _guard = logging::setup_logging(cli.verbose)?;

    let data_dir = cli.data_dir.unwrap_or_else(dirs::data_dir);
    let session = Session::open(&data_dir)?;

    match cli.command {
        Command::Configure(cmd) => cmd.execute(&session),
        Command::Invoke(cmd) => cmd.execute(&session).await,
        Command::UseItem(cmd) => cmd.execute(&session).await,
        Command::Show(cmd) => cmd.execute(&session),
    }
}
