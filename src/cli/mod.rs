//! CLI module for StreamSplit
//!
//! This module handles command-line argument parsing and command execution.

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// StreamSplit CLI
///
/// Split long livestream recordings into bounded-length segments, with
/// optional intro/outro stitching.
#[derive(Parser)]
#[command(name = "streamsplit")]
#[command(about = "StreamSplit - Split long livestream recordings into smaller segments")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Split a recording into segments
    Split(args::SplitArgs),
    /// Inspect media file information
    Inspect(args::InspectArgs),
    /// Check that ffmpeg and ffprobe are installed and accessible
    Check,
    /// Run the job-status web service
    Serve(args::ServeArgs),
}
