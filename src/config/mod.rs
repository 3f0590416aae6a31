//! Configuration loading, validation, and (de)serialization
//!
//! A [`Config`] is built either from CLI arguments or from a YAML/JSON
//! file, then validated once. Everything downstream treats it as
//! immutable.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engine::QualityParams;
use crate::error::{SplitError, SplitResult};
use crate::planner::{MAX_SEGMENT_LENGTH, MIN_SEGMENT_LENGTH};

/// Input container formats the splitter accepts.
pub const SUPPORTED_EXTENSIONS: [&str; 7] = ["mp4", "mkv", "avi", "mov", "flv", "webm", "ts"];

/// Quality preset selecting a default CRF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    High,
    Medium,
    Low,
}

impl QualityPreset {
    /// Default Constant Rate Factor for this preset.
    pub fn default_crf(self) -> u8 {
        match self {
            QualityPreset::High => 18,
            QualityPreset::Medium => 23,
            QualityPreset::Low => 28,
        }
    }
}

/// Output settings: where segments land and how they are named.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory, created on validation
    pub directory: PathBuf,
    /// Output container format
    pub format: String,
    /// Naming pattern with {title}/{date}/{index} tokens
    pub naming_pattern: String,
    /// Maximum segment length in seconds
    pub max_segment_length: f64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./segments"),
            format: "mp4".to_string(),
            naming_pattern: "{title}_part{index:02d}_{date}".to_string(),
            max_segment_length: 1200.0,
        }
    }
}

/// Optional intro/outro clips stitched onto every segment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroOutroConfig {
    pub intro_path: Option<PathBuf>,
    pub outro_path: Option<PathBuf>,
}

impl IntroOutroConfig {
    /// True when at least one clip is configured.
    pub fn is_configured(&self) -> bool {
        self.intro_path.is_some() || self.outro_path.is_some()
    }
}

fn default_threads() -> u8 {
    num_cpus::get().clamp(1, 16) as u8
}

/// Encoding parameters for segment transcoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Quality preset; supplies the default CRF
    pub quality: QualityPreset,
    /// Video codec
    pub codec: String,
    /// Encoder thread count, 1-16
    pub threads: u8,
    /// Encoder preset (ultrafast .. veryslow)
    pub preset: String,
    /// Constant Rate Factor, 0-51
    pub crf: u8,
    /// Keep already-written segment files when a later segment fails
    pub keep_partial_segments: bool,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            quality: QualityPreset::High,
            codec: "h264".to_string(),
            threads: default_threads(),
            preset: "medium".to_string(),
            crf: 23,
            keep_partial_segments: true,
        }
    }
}

impl ProcessingConfig {
    /// Flatten into the engine's quality parameters.
    pub fn quality_params(&self) -> QualityParams {
        QualityParams {
            codec: self.codec.clone(),
            preset: self.preset.clone(),
            crf: self.crf,
            threads: self.threads,
        }
    }
}

/// Main configuration bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Source recording to split
    pub input_path: PathBuf,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub intro_outro: IntroOutroConfig,
    #[serde(default)]
    pub processing: ProcessingConfig,
}

impl Config {
    /// Load from a YAML or JSON file, chosen by extension, then validate.
    pub fn load(path: &Path) -> SplitResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            other => {
                return Err(SplitError::config(format!(
                    "unsupported config format: {:?} (expected .yaml, .yml, or .json)",
                    other.unwrap_or("")
                )))
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Save to a YAML or JSON file, chosen by extension.
    pub fn save(&self, path: &Path) -> SplitResult<()> {
        let content = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::to_string(self)?,
            Some("json") => serde_json::to_string_pretty(self)?,
            other => {
                return Err(SplitError::config(format!(
                    "unsupported config format: {:?} (expected .yaml, .yml, or .json)",
                    other.unwrap_or("")
                )))
            }
        };
        fs::write(path, content)?;
        Ok(())
    }

    /// Validate all fields and create the output directory.
    pub fn validate(&self) -> SplitResult<()> {
        if !self.input_path.exists() {
            return Err(SplitError::config(format!(
                "input file not found: {}",
                self.input_path.display()
            )));
        }
        if !self.input_path.is_file() {
            return Err(SplitError::config(format!(
                "input path is not a file: {}",
                self.input_path.display()
            )));
        }

        let extension = self
            .input_path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(SplitError::config(format!(
                "unsupported file format: .{}",
                extension
            )));
        }

        if !(MIN_SEGMENT_LENGTH..=MAX_SEGMENT_LENGTH).contains(&self.output.max_segment_length) {
            return Err(SplitError::config(format!(
                "max segment length must be between {}s and {}s, got {}s",
                MIN_SEGMENT_LENGTH, MAX_SEGMENT_LENGTH, self.output.max_segment_length
            )));
        }

        if !(1..=16).contains(&self.processing.threads) {
            return Err(SplitError::config(format!(
                "thread count must be between 1 and 16, got {}",
                self.processing.threads
            )));
        }
        if self.processing.crf > 51 {
            return Err(SplitError::config(format!(
                "CRF must be between 0 and 51, got {}",
                self.processing.crf
            )));
        }

        for (label, path) in [
            ("intro", &self.intro_outro.intro_path),
            ("outro", &self.intro_outro.outro_path),
        ] {
            if let Some(path) = path {
                if !path.exists() {
                    return Err(SplitError::config(format!(
                        "{} file not found: {}",
                        label,
                        path.display()
                    )));
                }
            }
        }

        fs::create_dir_all(&self.output.directory)?;
        Ok(())
    }
}
