//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

fn threads_in_range(s: &str) -> Result<u8, String> {
    clap_num::number_range(s, 1, 16)
}

fn crf_in_range(s: &str) -> Result<u8, String> {
    clap_num::number_range(s, 0, 51)
}

fn default_threads() -> u8 {
    num_cpus::get().clamp(1, 16) as u8
}

/// Arguments for the split command
#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Input video file
    pub input: PathBuf,

    /// Output directory for segments
    #[arg(short, long, default_value = "./segments")]
    pub output_dir: PathBuf,

    /// Maximum segment length (e.g. 20m, 1200, 1h30m)
    #[arg(short = 'l', long, default_value = "20m")]
    pub max_length: String,

    /// Path to intro video file
    #[arg(long)]
    pub intro: Option<PathBuf>,

    /// Path to outro video file
    #[arg(long)]
    pub outro: Option<PathBuf>,

    /// Output format for segments
    #[arg(short, long, default_value = "mp4", value_parser = ["mp4", "mkv", "avi", "mov"])]
    pub format: String,

    /// Naming pattern for output files
    #[arg(long, default_value = "{title}_part{index:02d}_{date}")]
    pub naming_pattern: String,

    /// Output quality preset
    #[arg(long, default_value = "high", value_parser = ["high", "medium", "low"])]
    pub quality: String,

    /// Constant Rate Factor (0-51); defaults to the preset's value
    #[arg(long, value_parser = crf_in_range)]
    pub crf: Option<u8>,

    /// Video codec
    #[arg(long, default_value = "h264")]
    pub codec: String,

    /// Encoder preset
    #[arg(long, default_value = "medium")]
    pub preset: String,

    /// Number of threads for processing (1-16)
    #[arg(long, value_parser = threads_in_range, default_value_t = default_threads())]
    pub threads: u8,

    /// Remove already-written segments if a later segment fails
    #[arg(long)]
    pub discard_partial: bool,

    /// Configuration file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Save the effective configuration to a file
    #[arg(long)]
    pub save_config: Option<PathBuf>,
}

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Input video file
    pub input: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8000)]
    pub port: u16,

    /// Directory uploaded files are spooled into
    #[arg(long, default_value = "uploads")]
    pub upload_dir: PathBuf,

    /// Directory job outputs are written under
    #[arg(long, default_value = "outputs")]
    pub output_dir: PathBuf,

    /// Directory of static frontend files
    #[arg(long)]
    pub static_dir: Option<PathBuf>,
}
