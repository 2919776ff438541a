use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;
use tracing::{debug, info};

use crate::error::{PodsplitError, Result};

use super::ffmpeg::{check_ffmpeg, check_ffprobe, export_span, probe_duration, resample_for_analysis};
use super::vad::{detect_voice_intervals, VadConfig};
use super::{SegmentSpan, SpeakingPair, VoiceInterval};

/// Configuration for voice-aligned segmentation.
#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    /// Soft ceiling on segment duration. A segment may exceed it only when
    /// a single speaking pair is itself longer than the target.
    pub target_duration: Duration,

    /// Voice-activity detector settings for the analysis pass.
    pub vad: VadConfig,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            target_duration: Duration::from_secs(20 * 60),
            vad: VadConfig::default(),
        }
    }
}

/// Group a flat interval list into speaking pairs, two at a time, in order.
/// A trailing unpaired interval becomes a pair of one.
pub fn pair_intervals(intervals: Vec<VoiceInterval>) -> Vec<SpeakingPair> {
    let mut pairs = Vec::with_capacity(intervals.len().div_ceil(2));
    let mut iter = intervals.into_iter();

    while let Some(first) = iter.next() {
        pairs.push(SpeakingPair {
            first,
            second: iter.next(),
        });
    }

    pairs
}

/// Partition the source timeline into segment spans by accumulating whole
/// speaking pairs up to the target duration.
///
/// Pair lengths are measured on the analysis timeline and applied as equal
/// offsets on the source timeline; resampling preserves elapsed time, so the
/// two axes agree. The accumulator flushes whenever appending the next pair
/// would overflow the target, and once more at end of input if non-empty. A
/// pair longer than the target on its own becomes a segment of its own
/// rather than being split.
pub fn partition(pairs: &[SpeakingPair], target_duration: Duration) -> Result<Vec<SegmentSpan>> {
    if target_duration.is_zero() {
        return Err(PodsplitError::InvalidArgument(
            "target duration must be positive".to_string(),
        ));
    }

    let mut spans: Vec<SegmentSpan> = Vec::new();
    let mut cursor = Duration::ZERO;
    let mut acc_start = Duration::ZERO;
    let mut acc_len = Duration::ZERO;

    for pair in pairs {
        let chunk_len = pair.duration();

        if acc_len + chunk_len > target_duration {
            if !acc_len.is_zero() {
                spans.push(SegmentSpan {
                    start: acc_start,
                    end: cursor,
                    index: spans.len() + 1,
                });
            }
            acc_start = cursor;
            acc_len = Duration::ZERO;
        }

        acc_len += chunk_len;
        cursor += chunk_len;
    }

    if !acc_len.is_zero() {
        spans.push(SegmentSpan {
            start: acc_start,
            end: cursor,
            index: spans.len() + 1,
        });
    }

    Ok(spans)
}

/// Output path for one segment: `<stem>_<index>.<ext>` beside the source.
fn span_output_path(source: &Path, index: usize) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = source
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();

    let file_name = if extension.is_empty() {
        format!("{stem}_{index}")
    } else {
        format!("{stem}_{index}.{extension}")
    };

    source.with_file_name(file_name)
}

/// Split a recording into voice-aligned segments and write each one beside
/// the source file. Returns the written paths in export order.
///
/// When the detector finds no voice at all this returns an empty list: there
/// is nothing to export, which is not an error.
pub async fn segment_on_voice(source: &Path, config: &SegmenterConfig) -> Result<Vec<PathBuf>> {
    check_ffmpeg()?;
    check_ffprobe()?;

    if !source.exists() {
        return Err(PodsplitError::FileNotFound(source.display().to_string()));
    }

    let source_duration = probe_duration(source)?;
    info!(
        "Segmenting {} ({:.1}s) with target {:.0}s",
        source.display(),
        source_duration.as_secs_f64(),
        config.target_duration.as_secs_f64()
    );

    let temp_dir = TempDir::new()?;
    let analysis_path = temp_dir.path().join("analysis.wav");
    resample_for_analysis(source, &analysis_path).await?;

    let intervals = detect_voice_intervals(&analysis_path, &config.vad)?;
    let pairs = pair_intervals(intervals);
    let spans = partition(&pairs, config.target_duration)?;

    if spans.is_empty() {
        info!("No voice detected in {}, nothing to export", source.display());
        return Ok(vec![]);
    }

    debug!("Partitioned into {} segments", spans.len());

    let mut outputs = Vec::with_capacity(spans.len());
    for span in &spans {
        let output = span_output_path(source, span.index);
        export_span(source, &output, span.start, span.duration()).await?;
        info!(
            "Wrote segment {} ({:.1}s): {}",
            span.index,
            span.duration().as_secs_f64(),
            output.display()
        );
        outputs.push(output);
    }

    Ok(outputs)
}
