//! Processing pipeline
//!
//! One run flows segmentation -> execution -> concatenation -> report on a
//! single logical control path, with blocking calls out to the external
//! engine per segment and per stitch. The compatibility check gates the
//! concatenation stage before any work begins.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Local;
use tracing::info;

use crate::config::Config;
use crate::engine::MediaEngine;
use crate::error::{SplitError, SplitResult};
use crate::planner::{plan_segments, NamingTemplate};
use crate::probe::check_compatibility;
use crate::utils::format_duration;

pub mod concat;
pub mod executor;
pub mod report;

pub use concat::ConcatStage;
pub use executor::SegmentExecutor;

/// Cooperative cancellation flag, honored at segment/stitch boundaries.
///
/// The external tool offers no fine-grained interrupt, so an in-flight
/// invocation always runs to completion; the next boundary observes the
/// flag and aborts the run.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of the run.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Error out if cancellation was requested.
    pub fn check(&self) -> SplitResult<()> {
        if self.is_cancelled() {
            Err(SplitError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Result of a completed run.
#[derive(Debug)]
pub struct SplitOutcome {
    /// Final output files, in segment order
    pub output_files: Vec<PathBuf>,
    /// Path of the written processing report
    pub report_path: PathBuf,
}

/// Orchestrates one full split run over a validated configuration.
pub struct Splitter {
    config: Config,
    engine: Arc<dyn MediaEngine>,
    cancel: CancelToken,
}

impl Splitter {
    pub fn new(config: Config, engine: Arc<dyn MediaEngine>) -> Self {
        Self {
            config,
            engine,
            cancel: CancelToken::new(),
        }
    }

    /// Token for cancelling this run from another task.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Execute the full pipeline and return the final file list.
    pub async fn run(&self) -> SplitResult<SplitOutcome> {
        let config = &self.config;
        info!("Starting to process: {}", config.input_path.display());

        // Compatibility gates the concatenation stage before any segment
        // work is attempted.
        if config.intro_outro.is_configured() {
            let mut paths = vec![config.input_path.as_path()];
            if let Some(intro) = &config.intro_outro.intro_path {
                paths.push(intro.as_path());
            }
            if let Some(outro) = &config.intro_outro.outro_path {
                paths.push(outro.as_path());
            }
            let compat = check_compatibility(self.engine.as_ref(), &paths).await;
            if let crate::probe::Compatibility::Incompatible { reason } = compat {
                return Err(SplitError::IncompatibleMedia { reason });
            }
        }

        let media_info = self.engine.probe(&config.input_path).await?;
        info!("Video duration: {}", format_duration(media_info.duration));
        info!(
            "Will create segments of max {}s",
            config.output.max_segment_length
        );

        let plan = plan_segments(media_info.duration, config.output.max_segment_length)?;
        info!("Creating {} segments", plan.segment_count());

        let template = NamingTemplate::resolve(
            &config.output.naming_pattern,
            &config.input_path,
            Local::now().date_naive(),
        )?;

        let executor = SegmentExecutor::new(self.engine.as_ref(), config, &self.cancel);
        let segment_files = executor.execute(&plan, &template).await?;

        let output_files = if config.intro_outro.is_configured() {
            let stage = ConcatStage::new(self.engine.as_ref(), &config.intro_outro, &self.cancel);
            stage.process(segment_files).await?
        } else {
            segment_files
        };

        let report_path = report::write_report(config, &output_files)?;

        info!(
            "Processing complete! Created {} segments",
            output_files.len()
        );
        Ok(SplitOutcome {
            output_files,
            report_path,
        })
    }
}
