// bases/download_cli/src/app.rs
use crate::args::Config;
use crate::output::OutputHandler;
use color_eyre::Result;
use media_downloader::{Ffmpeg, MediaDownloader, Transcoder};
use mp3_tagger::Id3TagWriter;
use playlist_pipeline::{Collaborators, Pipeline, RunSummary};
use song_metadata::{http_client, HttpThumbnailFetcher, MetadataService, MusixmatchClient};
use std::io::{BufRead, Write};
use std::sync::Arc;

pub enum Outcome {
    Completed(RunSummary),
    Declined,
}

pub struct App {
    config: Config,
    output: Arc<OutputHandler>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let output = Arc::new(OutputHandler::new(config.verbose));
        Self { config, output }
    }

    pub fn output(&self) -> &OutputHandler {
        &self.output
    }

    /// Enumerate the playlist, ask for confirmation and run the pipeline
    pub async fn run(&self, url: &str) -> Result<Outcome> {
        self.config.pipeline.validate()?;

        let downloader = MediaDownloader::new().await?;
        let transcoder = Ffmpeg::new();
        transcoder.check_available().await?;

        let videos = downloader.playlist(url).await?;
        self.output.print_video_count(videos.len());

        if !self.config.assume_yes && !confirm(videos.len())? {
            return Ok(Outcome::Declined);
        }
        self.output
            .print_download_start(&self.config.pipeline.output_dir);

        let http_client = http_client()?;
        let metadata_service = match &self.config.musixmatch_api_key {
            Some(key) => {
                let client = MusixmatchClient::new(http_client.clone(), key.clone());
                Some(Arc::new(client) as Arc<dyn MetadataService + Send + Sync>)
            }
            None => {
                tracing::info!("No Musixmatch API key, using platform metadata only");
                None
            }
        };

        let pipeline = Pipeline::new(
            self.config.pipeline.clone(),
            Collaborators {
                downloader,
                transcoder: Arc::new(transcoder),
                thumbnails: Arc::new(HttpThumbnailFetcher::new(http_client)),
                metadata_service,
                tagger: Arc::new(Id3TagWriter),
            },
        )
        .with_progress(self.output.clone());

        let summary = pipeline.run(&videos).await?;
        Ok(Outcome::Completed(summary))
    }
}

/// Ask on the terminal whether `count` videos should be downloaded
fn confirm(count: usize) -> std::io::Result<bool> {
    println!("{} videos will be downloaded. Proceed? (Y/N)", count);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(is_affirmative(&answer))
}

fn is_affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("y\n", true)]
    #[case("Y", true)]
    #[case("  y  \r\n", true)]
    #[case("yes", false)]
    #[case("n", false)]
    #[case("", false)]
    fn test_is_affirmative(#[case] answer: &str, #[case] expected: bool) {
        assert_eq!(is_affirmative(answer), expected);
    }
}
