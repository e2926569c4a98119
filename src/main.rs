use std::sync::Arc;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spsync::{cli, config, error, types::PkceToken};
use tokio::sync::Mutex;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
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

    /// Reconcile a playlist against a song list and apply the changes
    Sync(SyncOptions),

    /// Show the add/remove/move plan without touching the playlist
    Diff(DiffOptions),

    /// Compare a playlist position-by-position against a song list
    Verify(VerifyOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct SyncOptions {
    /// Song list file, one "Artist - Title" per line
    #[clap(long, default_value = "songs.txt")]
    pub file: String,

    /// Name of the target playlist (created when missing)
    #[clap(long)]
    pub playlist: String,

    /// Re-read and verify the playlist after syncing
    #[clap(long)]
    pub verify: bool,

    /// Compute and print the plan, mutate nothing
    #[clap(long)]
    pub dry_run: bool,

    /// Write a human-readable report to this path
    #[clap(long)]
    pub report: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct DiffOptions {
    /// Song list file, one "Artist - Title" per line
    #[clap(long, default_value = "songs.txt")]
    pub file: String,

    /// Name of the playlist to diff against
    #[clap(long)]
    pub playlist: String,
}

#[derive(Parser, Debug, Clone)]
pub struct VerifyOptions {
    /// Song list file, one "Artist - Title" per line
    #[clap(long, default_value = "songs.txt")]
    pub file: String,

    /// Name of the playlist to verify
    #[clap(long)]
    pub playlist: String,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => {
            let oauth_result: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
            cli::auth(Arc::clone(&oauth_result)).await;
        }
        Command::Sync(opt) => {
            cli::sync(opt.file, opt.playlist, opt.verify, opt.dry_run, opt.report).await
        }
        Command::Diff(opt) => cli::diff(opt.file, opt.playlist).await,
        Command::Verify(opt) => cli::verify(opt.file, opt.playlist).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
