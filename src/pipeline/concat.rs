//! Intro/outro concatenation
//!
//! Stitches the configured intro and/or outro onto every produced segment
//! via stream copy. Unlike the executor, this stage degrades per unit: a
//! failed stitch keeps the original segment in the output list and the run
//! continues.

use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::config::IntroOutroConfig;
use crate::engine::MediaEngine;
use crate::error::SplitResult;
use crate::pipeline::CancelToken;

/// Ordered inputs and destination for stitching one segment.
#[derive(Debug, Clone)]
pub struct ConcatManifest {
    /// 1-3 paths: intro?, segment, outro?
    pub inputs: Vec<PathBuf>,
    /// Stitched output path
    pub destination: PathBuf,
}

impl ConcatManifest {
    /// Build the manifest for one segment. Missing intro/outro files are
    /// skipped rather than failing the unit.
    fn build(segment: &Path, intro_outro: &IntroOutroConfig) -> Self {
        let mut inputs = Vec::with_capacity(3);
        if let Some(intro) = &intro_outro.intro_path {
            if intro.exists() {
                inputs.push(intro.clone());
            }
        }
        inputs.push(segment.to_path_buf());
        if let Some(outro) = &intro_outro.outro_path {
            if outro.exists() {
                inputs.push(outro.clone());
            }
        }

        let file_name = segment
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let destination = segment.with_file_name(format!("final_{}", file_name));

        Self {
            inputs,
            destination,
        }
    }
}

pub struct ConcatStage<'a> {
    engine: &'a dyn MediaEngine,
    intro_outro: &'a IntroOutroConfig,
    cancel: &'a CancelToken,
}

impl<'a> ConcatStage<'a> {
    pub fn new(
        engine: &'a dyn MediaEngine,
        intro_outro: &'a IntroOutroConfig,
        cancel: &'a CancelToken,
    ) -> Self {
        Self {
            engine,
            intro_outro,
            cancel,
        }
    }

    /// Stitch every segment in order, returning the final file list.
    ///
    /// On success the original segment is deleted once the stitched file is
    /// confirmed on disk, to avoid doubling disk usage. On failure the
    /// original survives unmodified.
    pub async fn process(&self, segments: Vec<PathBuf>) -> SplitResult<Vec<PathBuf>> {
        let mut final_files = Vec::with_capacity(segments.len());

        for (i, segment) in segments.into_iter().enumerate() {
            self.cancel.check()?;

            let manifest = ConcatManifest::build(&segment, self.intro_outro);
            match self
                .engine
                .concat_copy(&manifest.inputs, &manifest.destination)
                .await
            {
                Ok(()) if manifest.destination.exists() => {
                    if let Err(e) = std::fs::remove_file(&segment) {
                        error!(
                            "Failed to remove unstitched segment {}: {}",
                            segment.display(),
                            e
                        );
                    }
                    info!(
                        "Created video with intro/outro: {}",
                        manifest.destination.display()
                    );
                    final_files.push(manifest.destination);
                }
                Ok(()) => {
                    error!(
                        "Stitched output missing for segment {}: {}",
                        i + 1,
                        manifest.destination.display()
                    );
                    final_files.push(segment);
                }
                Err(e) => {
                    error!("Error processing segment {}: {}", i + 1, e);
                    final_files.push(segment);
                }
            }
        }

        Ok(final_files)
    }
}
