//! Segmentation planning
//!
//! Turns (total duration, max segment length) into an ordered list of
//! contiguous segment windows. The planner makes no filesystem or process
//! calls; it is pure arithmetic consumed by the executor.

use crate::error::{SplitError, SplitResult};

pub mod naming;

pub use naming::NamingTemplate;

/// Bounds for the configured maximum segment length, in seconds.
pub const MIN_SEGMENT_LENGTH: f64 = 60.0;
pub const MAX_SEGMENT_LENGTH: f64 = 7200.0;

/// Tolerance for treating a duration as an exact multiple of the segment
/// length, absorbing floating-point noise from probed durations.
const REMAINDER_EPSILON: f64 = 1e-9;

/// One planned segment: a half-open [start, start+duration) window.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentWindow {
    /// 1-based segment index
    pub index: usize,
    /// Offset into the source, in seconds
    pub start: f64,
    /// Window length, in seconds; always > 0 and <= the configured maximum
    pub duration: f64,
}

/// Ordered, contiguous segment windows covering the full source duration.
#[derive(Debug, Clone)]
pub struct SegmentationPlan {
    windows: Vec<SegmentWindow>,
}

impl SegmentationPlan {
    /// Number of planned segments.
    pub fn segment_count(&self) -> usize {
        self.windows.len()
    }

    /// Windows in ascending index order.
    pub fn windows(&self) -> &[SegmentWindow] {
        &self.windows
    }
}

/// Compute the segment windows for a source of `total_duration` seconds.
///
/// Every window but the last spans exactly `max_segment_length`; the last
/// carries the remainder. A duration that divides evenly produces no
/// trailing zero-length window.
pub fn plan_segments(total_duration: f64, max_segment_length: f64) -> SplitResult<SegmentationPlan> {
    if !(MIN_SEGMENT_LENGTH..=MAX_SEGMENT_LENGTH).contains(&max_segment_length) {
        return Err(SplitError::config(format!(
            "max segment length must be between {}s and {}s, got {}s",
            MIN_SEGMENT_LENGTH, MAX_SEGMENT_LENGTH, max_segment_length
        )));
    }
    if total_duration <= 0.0 || !total_duration.is_finite() {
        return Err(SplitError::config(format!(
            "source duration must be positive, got {}s",
            total_duration
        )));
    }

    let full_segments = (total_duration / max_segment_length).floor() as usize;
    let remainder = total_duration % max_segment_length;
    let count = full_segments + usize::from(remainder > REMAINDER_EPSILON);

    let mut windows = Vec::with_capacity(count);
    for i in 0..count {
        let start = i as f64 * max_segment_length;
        let duration = if i + 1 == count {
            total_duration - start
        } else {
            max_segment_length
        };
        windows.push(SegmentWindow {
            index: i + 1,
            start,
            duration,
        });
    }

    Ok(SegmentationPlan { windows })
}
