use std::sync::Arc;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

use yt2spot::{
    cli, config, error,
    transfer::{MAX_BATCH_SIZE, TransferOptions},
    types::PkceToken,
};

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
    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[clap(short, long, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Copy a YouTube playlist to Spotify
    Transfer(TransferArgs),

    /// Show how a title is cleaned, split and scored
    Inspect(InspectArgs),

    /// Check configuration and cached credentials
    Status,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct TransferArgs {
    /// YouTube playlist URL or id
    playlist: String,

    /// Name of the Spotify playlist (derived from the YouTube title otherwise)
    #[clap(long)]
    name: Option<String>,

    /// Create the playlist as private
    #[clap(long)]
    private: bool,

    /// Candidates to request per title; more than 1 enables scoring
    #[clap(long, default_value_t = 1)]
    candidates: usize,

    /// Minimum score a candidate needs when scoring is enabled
    #[clap(long, default_value_t = 0.0)]
    threshold: f64,

    /// Lookups to run at the same time
    #[clap(long, default_value_t = 1)]
    concurrency: usize,

    /// Tracks per add request (at most 100)
    #[clap(long, default_value_t = MAX_BATCH_SIZE)]
    batch_size: usize,

    /// Only transfer the first N videos
    #[clap(long)]
    max_items: Option<usize>,

    /// Match titles without creating or changing any playlist
    #[clap(long)]
    dry_run: bool,

    /// Create the playlist even if one with the same name exists
    #[clap(long)]
    force: bool,

    /// Print the report as JSON
    #[clap(long)]
    json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    /// Raw video title
    title: String,

    /// Candidate track title to score against
    #[clap(long)]
    candidate_title: Option<String>,

    /// Candidate track artist
    #[clap(long, requires = "candidate_title")]
    candidate_artist: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "warn,yt2spot=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Auth => {
            let oauth_result: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
            cli::auth(Arc::clone(&oauth_result)).await;
        }
        Command::Transfer(args) => {
            let request = cli::TransferRequest {
                playlist: args.playlist,
                name: args.name,
                private: args.private,
                max_items: args.max_items,
                dry_run: args.dry_run,
                force: args.force,
                json: args.json,
                options: TransferOptions {
                    candidates: args.candidates,
                    acceptance_threshold: args.threshold,
                    batch_size: args.batch_size,
                    concurrency: args.concurrency,
                },
            };
            cli::transfer(request).await
        }
        Command::Inspect(args) => {
            cli::inspect(&args.title, args.candidate_title, args.candidate_artist)
        }
        Command::Status => cli::status().await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
