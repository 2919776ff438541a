use std::path::Path;
use std::process::Command;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{PodsplitError, Result};

use super::ANALYSIS_SAMPLE_RATE;

/// Check if FFmpeg is installed and accessible.
pub fn check_ffmpeg() -> Result<()> {
    let output = Command::new("ffmpeg")
        .arg("-version")
        .output()
        .map_err(|e| {
            PodsplitError::Decode(format!(
                "FFmpeg not found. Please install FFmpeg and ensure it's in your PATH. Error: {e}"
            ))
        })?;

    if !output.status.success() {
        return Err(PodsplitError::Decode("FFmpeg check failed".to_string()));
    }

    debug!("FFmpeg is available");
    Ok(())
}

/// Check if FFprobe is installed and accessible.
pub fn check_ffprobe() -> Result<()> {
    let output = Command::new("ffprobe")
        .arg("-version")
        .output()
        .map_err(|e| {
            PodsplitError::Decode(format!(
                "FFprobe not found. Please install FFmpeg (includes FFprobe). Error: {e}"
            ))
        })?;

    if !output.status.success() {
        return Err(PodsplitError::Decode("FFprobe check failed".to_string()));
    }

    debug!("FFprobe is available");
    Ok(())
}

/// Get the duration of an audio container using FFprobe.
///
/// A failure here means the source is not a readable audio file.
pub fn probe_duration(input: &Path) -> Result<Duration> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(input)
        .output()
        .map_err(|e| PodsplitError::Decode(format!("Failed to run FFprobe: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PodsplitError::Decode(format!(
            "Unreadable audio file {}: {}",
            input.display(),
            stderr.trim()
        )));
    }

    let duration_str = String::from_utf8_lossy(&output.stdout);
    let duration_secs: f64 = duration_str.trim().parse().map_err(|e| {
        PodsplitError::Decode(format!(
            "Failed to parse duration '{}': {e}",
            duration_str.trim()
        ))
    })?;

    Ok(Duration::from_secs_f64(duration_secs))
}

/// Produce the analysis copy of a recording: mono, 16-bit PCM WAV at the
/// detector's sample rate. Elapsed time is preserved.
pub async fn resample_for_analysis(input: &Path, output: &Path) -> Result<()> {
    if !input.exists() {
        return Err(PodsplitError::FileNotFound(input.display().to_string()));
    }

    info!("Resampling {} for analysis", input.display());

    let status = Command::new("ffmpeg")
        .args(["-y", "-i"])
        .arg(input)
        .args(["-vn", "-acodec", "pcm_s16le", "-ar"])
        .arg(ANALYSIS_SAMPLE_RATE.to_string())
        .args(["-ac", "1"])
        .arg(output)
        .status()
        .map_err(|e| PodsplitError::Analysis(format!("Failed to run FFmpeg: {e}")))?;

    if !status.success() {
        return Err(PodsplitError::Analysis(format!(
            "FFmpeg resampling failed for {}",
            input.display()
        )));
    }

    if !output.exists() {
        return Err(PodsplitError::Analysis(
            "Analysis copy was not created".to_string(),
        ));
    }

    Ok(())
}

/// Write one span of the source recording to its own file. The output codec
/// follows the destination extension, which the caller keeps equal to the
/// source extension.
pub async fn export_span(
    input: &Path,
    output: &Path,
    start: Duration,
    duration: Duration,
) -> Result<()> {
    if duration.is_zero() {
        return Err(PodsplitError::Export(
            "Segment duration is zero".to_string(),
        ));
    }

    let start_secs = format!("{:.3}", start.as_secs_f64());
    let duration_secs = format!("{:.3}", duration.as_secs_f64());

    debug!(
        "Exporting span start={} duration={} to {}",
        start_secs,
        duration_secs,
        output.display()
    );

    let status = Command::new("ffmpeg")
        .args(["-y", "-ss"])
        .arg(&start_secs)
        .arg("-t")
        .arg(&duration_secs)
        .arg("-i")
        .arg(input)
        .arg("-vn")
        .arg(output)
        .status()
        .map_err(|e| PodsplitError::Export(format!("Failed to run FFmpeg: {e}")))?;

    if !status.success() {
        return Err(PodsplitError::Export(format!(
            "FFmpeg export failed for {}",
            output.display()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ffmpeg_available() -> bool {
        Command::new("ffmpeg")
            .arg("-version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    #[test]
    fn test_check_ffmpeg() {
        if !ffmpeg_available() {
            eprintln!("Skipping test: FFmpeg not available");
            return;
        }
        assert!(check_ffmpeg().is_ok());
    }

    #[test]
    fn test_probe_duration_missing_file() {
        if !Command::new("ffprobe")
            .arg("-version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
        {
            eprintln!("Skipping test: FFprobe not available");
            return;
        }

        let result = probe_duration(Path::new("/nonexistent/episode.mp3"));
        assert!(matches!(result, Err(PodsplitError::Decode(_))));
    }

    #[tokio::test]
    async fn test_resample_missing_file() {
        let result = resample_for_analysis(
            Path::new("/nonexistent/episode.mp3"),
            Path::new("/tmp/analysis.wav"),
        )
        .await;

        assert!(matches!(result, Err(PodsplitError::FileNotFound(_))));
    }

    #[tokio::test]
    async fn test_export_span_rejects_zero_duration() {
        let result = export_span(
            Path::new("/tmp/in.mp3"),
            Path::new("/tmp/out.mp3"),
            Duration::from_secs(10),
            Duration::ZERO,
        )
        .await;

        assert!(matches!(result, Err(PodsplitError::Export(_))));
    }
}
