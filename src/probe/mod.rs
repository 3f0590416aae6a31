//! Media metadata types and concatenation compatibility checks

use serde::{Deserialize, Serialize};

pub mod compat;

pub use compat::{check_compatibility, Compatibility};

/// Immutable facts about one media file, derived once by probing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaInfo {
    /// Duration in seconds
    pub duration: f64,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Video codec identifier (e.g. "h264")
    pub codec: String,
    /// Frame rate in frames per second
    pub fps: f64,
    /// Bitrate in bits per second
    pub bitrate: u64,
    /// Container format name (e.g. "mov,mp4,m4a,3gp,3g2,mj2")
    pub format: String,
}

impl MediaInfo {
    /// Resolution as a (width, height) pair.
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
