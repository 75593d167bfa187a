// bases/download_cli/src/output.rs
use mp3_tagger::read_tags;
use playlist_pipeline::{
    error_chain, percent_complete, ItemError, Progress, RunSummary, TaggedAudio,
};
use std::error::Error;
use std::path::Path;
use video_primitives::VideoId;

/// Prints progress and results for a person watching the terminal
pub struct OutputHandler {
    verbose: bool,
}

impl OutputHandler {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn print_video_count(&self, count: usize) {
        println!("Found {} videos in playlist", count);
    }

    pub fn print_download_start(&self, output_dir: &Path) {
        for line in download_start_lines(output_dir) {
            println!("{}", line);
        }
    }

    pub fn print_summary(&self, summary: &RunSummary) {
        for line in summary_lines(summary) {
            println!("{}", line);
        }
    }

    pub fn print_error(&self, error: &color_eyre::Report) {
        eprintln!("Error: {}", error);

        if self.verbose {
            eprintln!("\nError details:");
            error.chain().skip(1).for_each(|cause| {
                eprintln!("  caused by: {}", cause);
            });
        }
    }

    fn print_tags(&self, tagged: &TaggedAudio) {
        println!("Saved {}", tagged.path.display());
        match read_tags(&tagged.path) {
            Ok(tags) => {
                println!("  Title:  {}", tags.title.as_deref().unwrap_or("-"));
                println!("  Artist: {}", tags.artist.as_deref().unwrap_or("-"));
                println!("  Album:  {}", tags.album.as_deref().unwrap_or("-"));
                println!(
                    "  Cover:  {}",
                    if tags.has_front_cover() { "yes" } else { "no" }
                );
            }
            Err(e) => eprintln!("  Could not read tags back: {}", e),
        }
    }
}

impl Progress for OutputHandler {
    fn item_started(&self, position: usize, total: usize, _video: &VideoId) {
        println!("{}", progress_line(position, total));
    }

    fn converting(&self, _video: &VideoId, name: &str) {
        println!("Converting file {} to mp3...", name);
    }

    fn tagging(&self, _video: &VideoId) {
        println!("Cleaning up metadata...");
    }

    fn item_done(&self, tagged: &TaggedAudio) {
        if self.verbose {
            self.print_tags(tagged);
        }
    }

    fn item_failed(&self, video: &VideoId, error: &ItemError) {
        if !self.verbose {
            eprintln!("Failed to process {}: {}", video, error_chain(error));
            return;
        }

        eprintln!("Failed to process {}: {}", video, error);
        let mut cause = error.source();
        while let Some(e) = cause {
            eprintln!("  caused by: {}", e);
            cause = e.source();
        }
    }

    fn cleanup_started(&self) {
        println!("Deleting temp folders...");
    }
}

pub fn progress_line(position: usize, total: usize) -> String {
    format!(
        "Downloading video ({} / {}) ({:.2}%)",
        position,
        total,
        percent_complete(position, total)
    )
}

pub fn download_start_lines(output_dir: &Path) -> [String; 2] {
    [
        format!(
            "Downloading! Your mp3 output will be available at {}",
            output_dir.display()
        ),
        "This might take a while, leave it running.".to_string(),
    ]
}

pub fn summary_lines(summary: &RunSummary) -> Vec<String> {
    let mut lines = vec![format!(
        "Finished: {} succeeded, {} failed",
        summary.succeeded(),
        summary.failed.len()
    )];
    lines.extend(
        summary
            .failed
            .iter()
            .map(|(video, error)| {
                format!("  {} ({}): {}", video, video.watch_url(), error_chain(error))
            }),
    );
    lines
}
