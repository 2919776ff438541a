pub mod ffmpeg;
pub mod segment;
pub mod vad;

pub use ffmpeg::{
    check_ffmpeg, check_ffprobe, export_span, probe_duration, resample_for_analysis,
};
pub use segment::{pair_intervals, partition, segment_on_voice, SegmenterConfig};
pub use vad::{detect_voice_intervals, VadConfig};

use std::time::Duration;

/// Sample rate of the analysis copy fed to the voice-activity detector.
pub const ANALYSIS_SAMPLE_RATE: u32 = 32_000;

/// Whether a detected interval carries speech or silence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalKind {
    Speech,
    Silence,
}

/// A half-open time range `[start, end)` on the analysis timeline, tagged by
/// the detector. Interval lists are ascending, non-overlapping, and
/// contiguous over the analysed span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceInterval {
    pub start: Duration,
    pub end: Duration,
    pub kind: IntervalKind,
}

impl VoiceInterval {
    pub fn duration(&self) -> Duration {
        self.end.saturating_sub(self.start)
    }
}

/// Two consecutive detector intervals, consumed as one unit of accumulation.
/// The last pair of an odd-length list holds a single interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakingPair {
    pub first: VoiceInterval,
    pub second: Option<VoiceInterval>,
}

impl SpeakingPair {
    /// Combined length of the member intervals.
    ///
    /// This is the sum of each interval's own duration, not
    /// `second.end - first.start`. The two agree for the contiguous lists
    /// our detector produces; for a detector that emitted gapped intervals
    /// they would not, and the sum is what gets sliced from the source.
    pub fn duration(&self) -> Duration {
        let mut total = self.first.duration();
        if let Some(second) = &self.second {
            total += second.duration();
        }
        total
    }
}

/// A contiguous span of the source recording destined for one output file.
///
/// `start` and `duration()` were computed on the analysis timeline but apply
/// verbatim to the source: resampling changes the sample rate of the analysis
/// copy, not elapsed time, so millisecond offsets are shared between the two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentSpan {
    pub start: Duration,
    pub end: Duration,
    /// 1-based position in export order, used for output naming.
    pub index: usize,
}

impl SegmentSpan {
    pub fn duration(&self) -> Duration {
        self.end.saturating_sub(self.start)
    }
}
