// bases/download_cli/src/args.rs
use clap::Parser;
use playlist_pipeline::PipelineConfig;
use std::ffi::OsString;
use std::path::PathBuf;

/// Download every video of a playlist as a tagged MP3
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "yt-playlist-mp3", author, version, about, long_about = None)]
pub struct Args {
    /// Playlist URL
    #[arg(value_name = "PLAYLIST_URL")]
    pub url: Option<String>,

    /// Start downloading without asking for confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Print error causes and the tags written to every file
    #[arg(short, long)]
    pub verbose: bool,

    /// Directory the mp4/, thumb/ and mp3/ directories are created in
    #[arg(long)]
    pub base_dir: Option<PathBuf>,

    /// Staging directory for downloaded videos (removed afterwards)
    #[arg(long)]
    pub video_dir: Option<PathBuf>,

    /// Staging directory for cover images (removed afterwards)
    #[arg(long)]
    pub thumbnail_dir: Option<PathBuf>,

    /// Directory the tagged MP3 files are written to
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Musixmatch API key; without one only platform metadata is used
    #[arg(long, env = "MUSIXMATCH_API_KEY", hide_env_values = true)]
    pub musixmatch_api_key: Option<String>,
}

/// Run configuration assembled from the command line
#[derive(Debug, Clone)]
pub struct Config {
    pub url: Option<String>,
    pub assume_yes: bool,
    pub verbose: bool,
    pub pipeline: PipelineConfig,
    pub musixmatch_api_key: Option<String>,
}

impl Config {
    pub fn from_args(args: Args) -> Self {
        let mut pipeline = match &args.base_dir {
            Some(base) => PipelineConfig::rooted_at(base),
            None => PipelineConfig::default(),
        };
        if let Some(dir) = args.video_dir {
            pipeline.temp_video_dir = dir;
        }
        if let Some(dir) = args.thumbnail_dir {
            pipeline.temp_thumbnail_dir = dir;
        }
        if let Some(dir) = args.output_dir {
            pipeline.output_dir = dir;
        }

        let musixmatch_api_key = args
            .musixmatch_api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        Self {
            url: args.url,
            assume_yes: args.yes,
            verbose: args.verbose,
            pipeline,
            musixmatch_api_key,
        }
    }
}

/// Accept the single-dash `-help` spelling next to `-h` and `--help`
pub fn rewrite_legacy_help<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            if arg == "-help" {
                OsString::from("--help")
            } else {
                arg
            }
        })
        .collect()
}
