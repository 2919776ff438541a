pub mod whisper;

pub use whisper::{WhisperClient, WhisperModel};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::error::{PodsplitError, Result};

/// Text returned by a transcription service for one audio file.
#[derive(Debug, Clone)]
pub struct Transcript {
    pub text: String,
    pub language: Option<String>,
}

#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: &Path) -> Result<Transcript>;
    fn name(&self) -> &'static str;
    fn max_file_size(&self) -> usize;
}

/// Outcome of transcribing one file.
#[derive(Debug)]
pub struct FileResult {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub error: Option<String>,
}

/// Transcribe a batch of segment files with bounded concurrency, writing
/// each transcript as `<stem>.txt` beside its input. Per-file failures are
/// collected rather than aborting the batch.
pub async fn transcribe_files(
    transcriber: Arc<dyn Transcriber>,
    inputs: Vec<PathBuf>,
    concurrency: usize,
    show_progress: bool,
) -> Result<Vec<FileResult>> {
    if concurrency == 0 {
        return Err(PodsplitError::InvalidArgument(
            "concurrency must be greater than 0".to_string(),
        ));
    }

    if inputs.is_empty() {
        return Ok(vec![]);
    }

    info!(
        "Transcribing {} files with {} concurrent requests using {}",
        inputs.len(),
        concurrency,
        transcriber.name()
    );

    let progress_bar = if show_progress {
        let pb = ProgressBar::new(inputs.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let semaphore = Arc::new(Semaphore::new(concurrency));
    let mut futures = FuturesUnordered::new();

    for input in inputs {
        let sem = semaphore.clone();
        let transcriber = transcriber.clone();
        let pb = progress_bar.clone();

        futures.push(async move {
            let _permit = sem.acquire().await.expect("Semaphore closed");

            debug!("Transcribing {}", input.display());
            let result = transcribe_one(transcriber.as_ref(), &input).await;

            if let Some(ref pb) = pb {
                pb.inc(1);
            }

            match result {
                Ok(output) => FileResult {
                    input,
                    output: Some(output),
                    error: None,
                },
                Err(e) => {
                    warn!("Transcription failed: {e}");
                    FileResult {
                        input,
                        output: None,
                        error: Some(e.to_string()),
                    }
                }
            }
        });
    }

    let mut results = Vec::new();
    while let Some(result) = futures.next().await {
        results.push(result);
    }

    if let Some(pb) = progress_bar {
        pb.finish_with_message("Transcription complete");
    }

    // Deliver results in input order rather than completion order.
    results.sort_by(|a, b| a.input.cmp(&b.input));

    let succeeded = results.iter().filter(|r| r.output.is_some()).count();
    info!("Transcribed {}/{} files", succeeded, results.len());

    Ok(results)
}

async fn transcribe_one(transcriber: &dyn Transcriber, input: &Path) -> Result<PathBuf> {
    let transcript = transcriber.transcribe(input).await?;

    let output = input.with_extension("txt");
    tokio::fs::write(&output, &transcript.text).await?;

    debug!(
        "Wrote {} characters to {}",
        transcript.text.len(),
        output.display()
    );
    Ok(output)
}
