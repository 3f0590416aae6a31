//! Command implementations

use std::process::Stdio;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::info;

use crate::cli::args::{InspectArgs, ServeArgs, SplitArgs};
use crate::config::{
    Config, IntroOutroConfig, OutputConfig, ProcessingConfig, QualityPreset,
};
use crate::engine::{FfmpegEngine, MediaEngine};
use crate::jobs::InMemoryJobStore;
use crate::pipeline::Splitter;
use crate::probe::MediaInfo;
use crate::utils::{
    estimate_file_size, format_duration, human_readable_size, parse_time_expression,
};
use crate::web::{self, ServeOptions};

/// Execute the split command
pub async fn split(args: SplitArgs) -> Result<()> {
    let config = if let Some(path) = &args.config {
        println!("Loading configuration from: {}", path.display());
        Config::load(path).context("Failed to load configuration")?
    } else {
        build_config(&args)?
    };

    if let Some(path) = &args.save_config {
        config.save(path).context("Failed to save configuration")?;
        println!("Configuration saved to: {}", path.display());
    }

    println!("Input file: {}", config.input_path.display());
    println!("Output directory: {}", config.output.directory.display());
    println!("Max segment length: {}s", config.output.max_segment_length);
    if let Some(intro) = &config.intro_outro.intro_path {
        println!("Intro: {}", intro.display());
    }
    if let Some(outro) = &config.intro_outro.outro_path {
        println!("Outro: {}", outro.display());
    }

    let engine = Arc::new(FfmpegEngine::new()?);
    let splitter = Splitter::new(config.clone(), engine);
    let outcome = splitter.run().await.context("Processing failed")?;

    println!("\n{}", "=".repeat(50));
    println!("Processing complete!");
    println!("Created {} segments", outcome.output_files.len());
    println!("Output directory: {}", config.output.directory.display());
    println!("Report: {}", outcome.report_path.display());
    Ok(())
}

/// Build a configuration from command-line arguments.
fn build_config(args: &SplitArgs) -> Result<Config> {
    let max_length = parse_time_expression(&args.max_length)
        .with_context(|| format!("Invalid max length '{}'", args.max_length))?;
    let quality = parse_quality(&args.quality)?;

    let config = Config {
        input_path: args.input.clone(),
        output: OutputConfig {
            directory: args.output_dir.clone(),
            format: args.format.clone(),
            naming_pattern: args.naming_pattern.clone(),
            max_segment_length: max_length,
        },
        intro_outro: IntroOutroConfig {
            intro_path: args.intro.clone(),
            outro_path: args.outro.clone(),
        },
        processing: ProcessingConfig {
            quality,
            codec: args.codec.clone(),
            threads: args.threads,
            preset: args.preset.clone(),
            crf: args.crf.unwrap_or_else(|| quality.default_crf()),
            keep_partial_segments: !args.discard_partial,
        },
    };
    config.validate()?;
    Ok(config)
}

fn parse_quality(value: &str) -> Result<QualityPreset> {
    match value {
        "high" => Ok(QualityPreset::High),
        "medium" => Ok(QualityPreset::Medium),
        "low" => Ok(QualityPreset::Low),
        other => bail!("Invalid quality preset: {}", other),
    }
}

/// Execute the inspect command
pub async fn inspect(args: InspectArgs) -> Result<()> {
    if !args.input.exists() {
        bail!("Input file does not exist: {}", args.input.display());
    }

    let engine = FfmpegEngine::new()?;
    let media_info = engine
        .probe(&args.input)
        .await
        .context("Failed to inspect input file")?;

    if args.json {
        let json = serde_json::to_string_pretty(&media_info)
            .context("Failed to serialize media info to JSON")?;
        println!("{}", json);
    } else {
        display_media_info(&args, &media_info);
    }
    Ok(())
}

/// Display media information in human-readable format
fn display_media_info(args: &InspectArgs, info: &MediaInfo) {
    println!("Media Information");
    println!("=================");
    println!("File: {}", args.input.display());
    println!("Format: {}", info.format);
    println!(
        "Duration: {} ({:.3}s)",
        format_duration(info.duration),
        info.duration
    );
    println!("Resolution: {}x{}", info.width, info.height);
    println!("Codec: {}", info.codec);
    println!("Frame Rate: {:.2} fps", info.fps);
    println!("Bit Rate: {} bps", info.bitrate);
    println!(
        "Estimated Size: {}",
        human_readable_size(estimate_file_size(info.duration, info.bitrate))
    );
}

/// Execute the check command
pub async fn check() -> Result<()> {
    let mut missing = false;
    for tool in ["ffmpeg", "ffprobe"] {
        match which::which(tool) {
            Ok(path) => {
                println!("{} found: {}", tool, path.display());
                if let Some(version) = tool_version(tool).await {
                    println!("  {}", version);
                }
            }
            Err(_) => {
                println!("{} not found in PATH", tool);
                missing = true;
            }
        }
    }

    if missing {
        bail!("Install FFmpeg to use this tool: https://ffmpeg.org/download.html");
    }
    Ok(())
}

/// First line of `<tool> -version`, if it runs.
async fn tool_version(tool: &str) -> Option<String> {
    let output = tokio::process::Command::new(tool)
        .arg("-version")
        .stdin(Stdio::null())
        .output()
        .await
        .ok()?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout.lines().next().map(|l| l.to_string())
}

/// Execute the serve command
pub async fn serve(args: ServeArgs) -> Result<()> {
    let engine = Arc::new(FfmpegEngine::new()?);
    let store = Arc::new(InMemoryJobStore::new());

    let options = ServeOptions {
        host: args.host,
        port: args.port,
        upload_dir: args.upload_dir,
        output_dir: args.output_dir,
        static_dir: args.static_dir,
    };

    info!("Starting job-status service");
    web::serve(options, store, engine).await
}
