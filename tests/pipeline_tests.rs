//! Pipeline semantics tests against an in-memory fake engine
//!
//! The fake records every call and writes real (empty) output files into a
//! temp directory, so the executor's abort policy and the concat stage's
//! per-unit degradation can be observed on disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use streamsplit_cli::config::{Config, IntroOutroConfig, OutputConfig, ProcessingConfig};
use streamsplit_cli::engine::{MediaEngine, TranscodeSpec};
use streamsplit_cli::error::{SplitError, SplitResult};
use streamsplit_cli::probe::{check_compatibility, Compatibility, MediaInfo};
use streamsplit_cli::Splitter;

// Test utilities

fn media_info(duration: f64, width: u32, height: u32, codec: &str) -> MediaInfo {
    MediaInfo {
        duration,
        width,
        height,
        codec: codec.to_string(),
        fps: 30.0,
        bitrate: 4_000_000,
        format: "mov,mp4,m4a,3gp,3g2,mj2".to_string(),
    }
}

/// Fake media engine with scriptable failures.
#[derive(Default)]
struct FakeEngine {
    /// Probe results keyed by file name
    media: HashMap<String, MediaInfo>,
    /// Fail the nth transcode call (1-based)
    fail_transcode_at: Option<usize>,
    /// Fail concat when the destination name contains this substring
    fail_concat_containing: Option<String>,
    /// Fail probing files whose name contains this substring
    fail_probe_containing: Option<String>,
    transcode_calls: Mutex<Vec<TranscodeSpec>>,
    concat_calls: Mutex<Vec<(Vec<PathBuf>, PathBuf)>>,
}

impl FakeEngine {
    fn with_media(mut self, file_name: &str, info: MediaInfo) -> Self {
        self.media.insert(file_name.to_string(), info);
        self
    }

    fn transcode_count(&self) -> usize {
        self.transcode_calls.lock().unwrap().len()
    }

    fn concat_count(&self) -> usize {
        self.concat_calls.lock().unwrap().len()
    }
}

fn file_name(path: &Path) -> String {
    path.file_name().unwrap().to_string_lossy().into_owned()
}

#[async_trait]
impl MediaEngine for FakeEngine {
    async fn probe(&self, path: &Path) -> SplitResult<MediaInfo> {
        let name = file_name(path);
        if let Some(marker) = &self.fail_probe_containing {
            if name.contains(marker.as_str()) {
                return Err(SplitError::probe(name, "scripted probe failure"));
            }
        }
        self.media
            .get(&name)
            .cloned()
            .ok_or_else(|| SplitError::probe(name, "no scripted media info"))
    }

    async fn transcode(&self, spec: &TranscodeSpec) -> SplitResult<()> {
        let mut calls = self.transcode_calls.lock().unwrap();
        calls.push(spec.clone());
        if Some(calls.len()) == self.fail_transcode_at {
            return Err(SplitError::process(
                "scripted transcode failure",
                Some("fake stderr".to_string()),
            ));
        }
        std::fs::write(&spec.output, b"segment")?;
        Ok(())
    }

    async fn concat_copy(&self, inputs: &[PathBuf], output: &Path) -> SplitResult<()> {
        self.concat_calls
            .lock()
            .unwrap()
            .push((inputs.to_vec(), output.to_path_buf()));
        if let Some(marker) = &self.fail_concat_containing {
            if file_name(output).contains(marker.as_str()) {
                return Err(SplitError::process("scripted concat failure", None));
            }
        }
        std::fs::write(output, b"stitched")?;
        Ok(())
    }
}

/// Create a config over a temp dir with a real (dummy) input file.
fn test_config(dir: &TempDir, max_segment_length: f64) -> Config {
    let input = dir.path().join("stream.mp4");
    std::fs::write(&input, b"fake video data").unwrap();
    Config {
        input_path: input,
        output: OutputConfig {
            directory: dir.path().join("segments"),
            format: "mp4".to_string(),
            naming_pattern: "{title}_part{index:02d}".to_string(),
            max_segment_length,
        },
        intro_outro: IntroOutroConfig::default(),
        processing: ProcessingConfig::default(),
    }
}

fn with_intro(dir: &TempDir, mut config: Config) -> Config {
    let intro = dir.path().join("intro.mp4");
    std::fs::write(&intro, b"intro").unwrap();
    config.intro_outro.intro_path = Some(intro);
    config
}

// Full pipeline

#[tokio::test]
async fn splits_into_planned_segments() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, 60.0);
    config.validate().unwrap();

    // 150s at 60s max -> 3 segments, last one 30s
    let engine = Arc::new(FakeEngine::default().with_media(
        "stream.mp4",
        media_info(150.0, 1920, 1080, "h264"),
    ));

    let outcome = Splitter::new(config.clone(), engine.clone()).run().await.unwrap();

    assert_eq!(outcome.output_files.len(), 3);
    assert_eq!(engine.transcode_count(), 3);
    assert_eq!(engine.concat_count(), 0, "no intro/outro -> concat is a no-op");
    for path in &outcome.output_files {
        assert!(path.exists());
    }

    let calls = engine.transcode_calls.lock().unwrap();
    assert_eq!(calls[0].start, 0.0);
    assert_eq!(calls[1].start, 60.0);
    assert_eq!(calls[2].start, 120.0);
    assert!((calls[2].duration - 30.0).abs() < 1e-9);

    let report = std::fs::read_to_string(&outcome.report_path).unwrap();
    assert!(report.contains("Number of segments: 3"));
    assert!(report.contains("stream_part01.mp4"));
}

#[tokio::test]
async fn executor_aborts_batch_on_first_failure() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, 60.0);
    config.validate().unwrap();

    // 5 planned segments, the 2nd fails
    let engine = Arc::new(
        FakeEngine {
            fail_transcode_at: Some(2),
            ..FakeEngine::default()
        }
        .with_media("stream.mp4", media_info(300.0, 1920, 1080, "h264")),
    );

    let err = Splitter::new(config.clone(), engine.clone())
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, SplitError::Process { .. }));
    assert_eq!(engine.transcode_count(), 2, "segments 3-5 never attempted");
    assert!(
        config.output.directory.join("stream_part01.mp4").exists(),
        "prior segment stays on disk"
    );
    assert!(!config.output.directory.join("stream_part03.mp4").exists());
}

#[tokio::test]
async fn executor_discards_partials_when_policy_set() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(&dir, 60.0);
    config.processing.keep_partial_segments = false;
    config.validate().unwrap();

    let engine = Arc::new(
        FakeEngine {
            fail_transcode_at: Some(3),
            ..FakeEngine::default()
        }
        .with_media("stream.mp4", media_info(300.0, 1920, 1080, "h264")),
    );

    Splitter::new(config.clone(), engine).run().await.unwrap_err();
    assert!(!config.output.directory.join("stream_part01.mp4").exists());
    assert!(!config.output.directory.join("stream_part02.mp4").exists());
}

#[tokio::test]
async fn concat_failure_keeps_original_and_continues() {
    let dir = TempDir::new().unwrap();
    let config = with_intro(&dir, test_config(&dir, 60.0));
    config.validate().unwrap();

    let info = media_info(300.0, 1920, 1080, "h264");
    let engine = Arc::new(
        FakeEngine {
            fail_concat_containing: Some("part03".to_string()),
            ..FakeEngine::default()
        }
        .with_media("stream.mp4", info.clone())
        .with_media("intro.mp4", media_info(5.0, 1920, 1080, "h264")),
    );

    let outcome = Splitter::new(config.clone(), engine.clone()).run().await.unwrap();

    // 5 segments total; 1,2,4,5 stitched, 3 survives unstitched
    assert_eq!(outcome.output_files.len(), 5);
    assert_eq!(engine.concat_count(), 5);

    let names: Vec<String> = outcome.output_files.iter().map(|p| file_name(p)).collect();
    assert_eq!(names[0], "final_stream_part01.mp4");
    assert_eq!(names[2], "stream_part03.mp4");
    assert_eq!(names[4], "final_stream_part05.mp4");

    // Stitched originals removed, failed original kept
    assert!(!config.output.directory.join("stream_part01.mp4").exists());
    assert!(config.output.directory.join("stream_part03.mp4").exists());
    assert!(config.output.directory.join("final_stream_part05.mp4").exists());
}

#[tokio::test]
async fn concat_manifest_orders_intro_segment_outro() {
    let dir = TempDir::new().unwrap();
    let mut config = with_intro(&dir, test_config(&dir, 60.0));
    let outro = dir.path().join("outro.mp4");
    std::fs::write(&outro, b"outro").unwrap();
    config.intro_outro.outro_path = Some(outro);
    config.validate().unwrap();

    let engine = Arc::new(
        FakeEngine::default()
            .with_media("stream.mp4", media_info(90.0, 1280, 720, "h264"))
            .with_media("intro.mp4", media_info(5.0, 1280, 720, "h264"))
            .with_media("outro.mp4", media_info(5.0, 1280, 720, "h264")),
    );

    Splitter::new(config, engine.clone()).run().await.unwrap();

    let calls = engine.concat_calls.lock().unwrap();
    assert_eq!(calls.len(), 2);
    let (inputs, _) = &calls[0];
    let names: Vec<String> = inputs.iter().map(|p| file_name(p)).collect();
    assert_eq!(names, ["intro.mp4", "stream_part01.mp4", "outro.mp4"]);
}

// Compatibility gate

#[tokio::test]
async fn incompatible_intro_blocks_run_before_any_work() {
    let dir = TempDir::new().unwrap();
    let config = with_intro(&dir, test_config(&dir, 60.0));
    config.validate().unwrap();

    // Intro has a different resolution
    let engine = Arc::new(
        FakeEngine::default()
            .with_media("stream.mp4", media_info(300.0, 1920, 1080, "h264"))
            .with_media("intro.mp4", media_info(5.0, 1280, 720, "h264")),
    );

    let err = Splitter::new(config, engine.clone()).run().await.unwrap_err();
    assert!(matches!(err, SplitError::IncompatibleMedia { .. }));
    assert_eq!(engine.transcode_count(), 0);
    assert_eq!(engine.concat_count(), 0);
}

#[tokio::test]
async fn compatibility_single_path_needs_no_probe() {
    let engine = FakeEngine::default(); // would fail any probe
    let path = Path::new("only.mp4");
    let compat = check_compatibility(&engine, &[path]).await;
    assert!(compat.is_compatible());
}

#[tokio::test]
async fn compatibility_codec_mismatch_is_a_value_not_an_error() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.mp4");
    let b = dir.path().join("b.mp4");
    std::fs::write(&a, b"a").unwrap();
    std::fs::write(&b, b"b").unwrap();

    let engine = FakeEngine::default()
        .with_media("a.mp4", media_info(10.0, 1920, 1080, "h264"))
        .with_media("b.mp4", media_info(10.0, 1920, 1080, "hevc"));

    match check_compatibility(&engine, &[&a, &b]).await {
        Compatibility::Incompatible { reason } => assert!(reason.contains("codec")),
        Compatibility::Compatible => panic!("codec mismatch must be incompatible"),
    }
}

#[tokio::test]
async fn compatibility_fails_closed_on_probe_error() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.mp4");
    let b = dir.path().join("broken.mp4");
    std::fs::write(&a, b"a").unwrap();
    std::fs::write(&b, b"b").unwrap();

    let engine = FakeEngine {
        fail_probe_containing: Some("broken".to_string()),
        ..FakeEngine::default()
    }
    .with_media("a.mp4", media_info(10.0, 1920, 1080, "h264"));

    let compat = check_compatibility(&engine, &[&a, &b]).await;
    assert!(!compat.is_compatible());
}

// Cancellation

#[tokio::test]
async fn cancelled_run_stops_at_segment_boundary() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, 60.0);
    config.validate().unwrap();

    let engine = Arc::new(FakeEngine::default().with_media(
        "stream.mp4",
        media_info(300.0, 1920, 1080, "h264"),
    ));

    let splitter = Splitter::new(config, engine.clone());
    splitter.cancel_token().cancel();

    let err = splitter.run().await.unwrap_err();
    assert!(matches!(err, SplitError::Cancelled));
    assert_eq!(engine.transcode_count(), 0);
}
