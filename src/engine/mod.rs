//! External media-processing boundary
//!
//! The pipeline depends only on the [`MediaEngine`] trait; the underlying
//! tool is opaque. [`FfmpegEngine`] is the production implementation backed
//! by `ffprobe`/`ffmpeg` subprocesses.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::SplitResult;
use crate::probe::MediaInfo;

pub mod command;
pub mod ffmpeg;

pub use command::FfmpegCommand;
pub use ffmpeg::FfmpegEngine;

/// One transcode invocation: cut a window out of the input and encode it.
#[derive(Debug, Clone)]
pub struct TranscodeSpec {
    /// Source file
    pub input: PathBuf,
    /// Destination file
    pub output: PathBuf,
    /// Start offset into the source, in seconds
    pub start: f64,
    /// Window duration, in seconds
    pub duration: f64,
    /// Encoding parameters
    pub quality: QualityParams,
}

/// Encoding parameters threaded immutably through the executor.
#[derive(Debug, Clone)]
pub struct QualityParams {
    /// Video codec (e.g. "h264")
    pub codec: String,
    /// Encoder preset (e.g. "medium")
    pub preset: String,
    /// Constant Rate Factor, 0-51
    pub crf: u8,
    /// Encoder thread count, 1-16
    pub threads: u8,
}

/// Boundary to the external transcoding tool.
#[async_trait]
pub trait MediaEngine: Send + Sync {
    /// Extract metadata from a media file without decoding it.
    async fn probe(&self, path: &Path) -> SplitResult<MediaInfo>;

    /// Materialize one segment window as an encoded output file.
    async fn transcode(&self, spec: &TranscodeSpec) -> SplitResult<()>;

    /// Losslessly concatenate the inputs, in order, via stream copy.
    async fn concat_copy(&self, inputs: &[PathBuf], output: &Path) -> SplitResult<()>;
}
