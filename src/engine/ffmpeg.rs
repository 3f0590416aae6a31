//! FFmpeg/FFprobe-backed implementation of the media engine

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, info};

use crate::engine::{FfmpegCommand, MediaEngine, TranscodeSpec};
use crate::error::{SplitError, SplitResult};
use crate::probe::MediaInfo;

/// Audio settings are fixed for all segment outputs.
const AUDIO_CODEC: &str = "aac";
const AUDIO_BITRATE: &str = "192k";

/// Production media engine driving the ffmpeg/ffprobe binaries.
pub struct FfmpegEngine;

impl FfmpegEngine {
    /// Create an engine, verifying both tools are on PATH.
    pub fn new() -> SplitResult<Self> {
        which::which("ffmpeg").map_err(|_| SplitError::ToolNotFound {
            tool: "ffmpeg".to_string(),
        })?;
        which::which("ffprobe").map_err(|_| SplitError::ToolNotFound {
            tool: "ffprobe".to_string(),
        })?;
        Ok(Self)
    }
}

/// FFprobe JSON output shape.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    format_name: Option<String>,
    duration: Option<String>,
    bit_rate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    duration: Option<String>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
}

/// Parse a frame-rate expression such as "30000/1001" or "29.97".
fn parse_frame_rate(s: &str) -> Option<f64> {
    if let Some((num, den)) = s.split_once('/') {
        let num: f64 = num.parse().ok()?;
        let den: f64 = den.parse().ok()?;
        if den > 0.0 {
            return Some(num / den);
        }
    }
    s.parse().ok()
}

/// Escape a path for an ffmpeg concat list entry (single-quoted).
fn concat_list_entry(path: &Path) -> String {
    let escaped = path.to_string_lossy().replace('\'', "'\\''");
    format!("file '{}'\n", escaped)
}

#[async_trait]
impl MediaEngine for FfmpegEngine {
    async fn probe(&self, path: &Path) -> SplitResult<MediaInfo> {
        debug!("Probing {}", path.display());

        let output = Command::new("ffprobe")
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(SplitError::probe(path.display().to_string(), stderr));
        }

        let probe: FfprobeOutput = serde_json::from_slice(&output.stdout)
            .map_err(|e| SplitError::probe(path.display().to_string(), e.to_string()))?;

        let video = probe
            .streams
            .iter()
            .find(|s| s.codec_type == "video")
            .ok_or_else(|| {
                SplitError::probe(path.display().to_string(), "no video stream found")
            })?;

        // Container-level duration is authoritative; stream duration is the
        // fallback for containers that only carry it per stream.
        let duration = probe
            .format
            .duration
            .as_deref()
            .or(video.duration.as_deref())
            .and_then(|d| d.parse::<f64>().ok())
            .ok_or_else(|| {
                SplitError::probe(path.display().to_string(), "missing duration")
            })?;

        let fps = video
            .avg_frame_rate
            .as_deref()
            .or(video.r_frame_rate.as_deref())
            .and_then(parse_frame_rate)
            .unwrap_or(0.0);

        Ok(MediaInfo {
            duration,
            width: video.width.unwrap_or(0),
            height: video.height.unwrap_or(0),
            codec: video.codec_name.clone().unwrap_or_default(),
            fps,
            bitrate: probe
                .format
                .bit_rate
                .as_deref()
                .and_then(|b| b.parse().ok())
                .unwrap_or(0),
            format: probe.format.format_name.unwrap_or_default(),
        })
    }

    async fn transcode(&self, spec: &TranscodeSpec) -> SplitResult<()> {
        info!(
            "Transcoding {} [{:.3}s +{:.3}s] -> {}",
            spec.input.display(),
            spec.start,
            spec.duration,
            spec.output.display()
        );

        FfmpegCommand::new(&spec.input, &spec.output)
            .seek(spec.start)
            .duration(spec.duration)
            .video_codec(&spec.quality.codec)
            .preset(&spec.quality.preset)
            .crf(spec.quality.crf)
            .threads(spec.quality.threads)
            .audio_codec(AUDIO_CODEC)
            .audio_bitrate(AUDIO_BITRATE)
            .run(&format!(
                "ffmpeg transcode failed for {}",
                spec.output.display()
            ))
            .await
    }

    async fn concat_copy(&self, inputs: &[PathBuf], output: &Path) -> SplitResult<()> {
        info!(
            "Concatenating {} files -> {}",
            inputs.len(),
            output.display()
        );

        // The playlist lives only for the duration of the invocation; the
        // tempfile is removed on drop.
        let mut list = tempfile::Builder::new()
            .prefix("concat_list_")
            .suffix(".txt")
            .tempfile()?;
        for input in inputs {
            list.write_all(concat_list_entry(input).as_bytes())?;
        }
        list.flush()?;

        FfmpegCommand::new(list.path(), output)
            .concat_demuxer()
            .stream_copy()
            .run(&format!("ffmpeg concat failed for {}", output.display()))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_rate_expressions() {
        assert!((parse_frame_rate("30/1").unwrap() - 30.0).abs() < 0.01);
        assert!((parse_frame_rate("30000/1001").unwrap() - 29.97).abs() < 0.01);
        assert!((parse_frame_rate("29.97").unwrap() - 29.97).abs() < 0.01);
        assert!(parse_frame_rate("0/0").is_none());
    }

    #[test]
    fn concat_entries_escape_quotes() {
        let entry = concat_list_entry(Path::new("/tmp/it's here.mp4"));
        assert_eq!(entry, "file '/tmp/it'\\''s here.mp4'\n");
    }

    #[test]
    fn probe_json_parses() {
        let json = r#"{
            "format": {"format_name": "mov,mp4", "duration": "120.5", "bit_rate": "800000"},
            "streams": [
                {"codec_type": "video", "codec_name": "h264", "width": 1920,
                 "height": 1080, "r_frame_rate": "30/1"},
                {"codec_type": "audio", "codec_name": "aac"}
            ]
        }"#;
        let parsed: FfprobeOutput = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.streams.len(), 2);
        assert_eq!(parsed.format.duration.as_deref(), Some("120.5"));
    }
}
