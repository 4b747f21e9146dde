mod commands;
mod error;
mod exec;
mod media;
mod rclone;
mod sources;
mod transcribe;
mod vtt;

use clap::{Parser, Subcommand};

use commands::playlist::PlaylistArgs;
use commands::process::ProcessArgs;
use commands::rclone_env::RcloneEnvArgs;
use error::PipelineError;

/// The pipeline behind the Tribuna archive: scrapes the broadcasters'
/// pages, downloads and transcribes the streams and publishes the rehosted
/// playlists.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape, download and transcribe every debate of the input list
    Process(ProcessArgs),
    /// Upload a debate's segments and write its rehosted playlist
    Playlist(PlaylistArgs),
    /// Print Drive credentials extracted from a base64 rclone config
    RcloneEnv(RcloneEnvArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tribuna::init_logging();

    if let Err(e) = run(&cli).await {
        eprintln!("{e}");
        std::process::exit(-1);
    }
}

async fn run(cli: &Cli) -> Result<(), PipelineError> {
    match &cli.command {
        Commands::Process(args) => commands::process::run(args).await,
        Commands::Playlist(args) => commands::playlist::run(args),
        Commands::RcloneEnv(args) => commands::rclone_env::run(args),
    }
}
