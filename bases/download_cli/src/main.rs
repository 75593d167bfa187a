// bases/download_cli/src/main.rs
mod app;
mod args;
mod output;

use app::{App, Outcome};
use args::{rewrite_legacy_help, Args, Config};
use clap::Parser;
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

const LOG_TARGETS: [&str; 5] = [
    "yt_playlist_mp3",
    "playlist_pipeline",
    "song_metadata",
    "media_downloader",
    "mp3_tagger",
];

/// Our own crates at `info`, or `debug` when verbose; everything else stays quiet
fn default_filter(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    LOG_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",")
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = match Args::try_parse_from(rewrite_legacy_help(std::env::args_os())) {
        Ok(args) => args,
        Err(error) => {
            // Help and version go to stdout and are not failures
            let code = if error.use_stderr() { 1 } else { 0 };
            error.print()?;
            std::process::exit(code);
        }
    };
    let config = Config::from_args(args);

    let filter = default_filter(config.verbose);
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .init();

    let Some(url) = config.url.clone() else {
        eprintln!("Usage: yt-playlist-mp3 <PLAYLIST_URL>");
        eprintln!("Run with --help for all options");
        std::process::exit(1);
    };

    let app = App::new(config);
    match app.run(&url).await {
        Ok(Outcome::Completed(summary)) => {
            app.output().print_summary(&summary);
            Ok(())
        }
        Ok(Outcome::Declined) => {
            println!("Quitting program...");
            std::process::exit(1);
        }
        Err(error) => {
            app.output().print_error(&error);
            std::process::exit(1);
        }
    }
}
