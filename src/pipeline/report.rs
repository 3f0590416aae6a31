//! Processing report generation

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use crate::config::Config;
use crate::error::SplitResult;

/// Write a human-readable manifest of the run into the output directory.
pub fn write_report(config: &Config, output_files: &[PathBuf]) -> SplitResult<PathBuf> {
    let report_path = config.output.directory.join("processing_report.txt");
    let mut f = File::create(&report_path)?;

    writeln!(f, "StreamSplit - Processing Report")?;
    writeln!(f, "{}", "=".repeat(50))?;
    writeln!(f)?;
    writeln!(f, "Input file: {}", config.input_path.display())?;
    writeln!(
        f,
        "Processing date: {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(f, "Number of segments: {}", output_files.len())?;
    writeln!(
        f,
        "Max segment length: {}s",
        config.output.max_segment_length
    )?;
    writeln!(f)?;

    if let Some(intro) = &config.intro_outro.intro_path {
        writeln!(f, "Intro: {}", intro.display())?;
    }
    if let Some(outro) = &config.intro_outro.outro_path {
        writeln!(f, "Outro: {}", outro.display())?;
    }

    writeln!(f, "\nGenerated files:")?;
    for (i, path) in output_files.iter().enumerate() {
        writeln!(f, "{}. {}", i + 1, file_name(path))?;
    }

    info!("Report generated: {}", report_path.display());
    Ok(report_path)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
