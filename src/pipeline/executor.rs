//! Segment execution
//!
//! Materializes each planned window as an output file, strictly in index
//! order. The first failure aborts the whole batch; depending on policy,
//! files written by earlier segments are kept on disk or cleaned up.

use std::path::PathBuf;

use tracing::{error, info};

use crate::config::Config;
use crate::engine::{MediaEngine, TranscodeSpec};
use crate::error::SplitResult;
use crate::pipeline::CancelToken;
use crate::planner::{NamingTemplate, SegmentationPlan};

pub struct SegmentExecutor<'a> {
    engine: &'a dyn MediaEngine,
    config: &'a Config,
    cancel: &'a CancelToken,
}

impl<'a> SegmentExecutor<'a> {
    pub fn new(engine: &'a dyn MediaEngine, config: &'a Config, cancel: &'a CancelToken) -> Self {
        Self {
            engine,
            config,
            cancel,
        }
    }

    /// Transcode every window in the plan, returning files in index order.
    ///
    /// Windows are independent; sequential execution is a simplicity
    /// choice, not a correctness requirement. Cancellation is observed
    /// between segments, never mid-transcode.
    pub async fn execute(
        &self,
        plan: &SegmentationPlan,
        template: &NamingTemplate,
    ) -> SplitResult<Vec<PathBuf>> {
        let quality = self.config.processing.quality_params();
        let mut produced = Vec::with_capacity(plan.segment_count());

        for window in plan.windows() {
            if let Err(cancelled) = self.cancel.check() {
                self.cleanup_on_failure(&produced);
                return Err(cancelled);
            }

            let output = template.render_path(
                &self.config.output.directory,
                window.index,
                &self.config.output.format,
            );

            let spec = TranscodeSpec {
                input: self.config.input_path.clone(),
                output: output.clone(),
                start: window.start,
                duration: window.duration,
                quality: quality.clone(),
            };

            if let Err(e) = self.engine.transcode(&spec).await {
                error!(
                    "Error creating segment {}/{}: {}",
                    window.index,
                    plan.segment_count(),
                    e
                );
                self.cleanup_on_failure(&produced);
                return Err(e);
            }

            info!("Created segment: {}", output.display());
            produced.push(output);
        }

        Ok(produced)
    }

    /// Apply the partial-batch policy after an aborted run.
    fn cleanup_on_failure(&self, produced: &[PathBuf]) {
        if self.config.processing.keep_partial_segments {
            return;
        }
        for path in produced {
            if let Err(e) = std::fs::remove_file(path) {
                error!("Failed to remove partial segment {}: {}", path.display(), e);
            }
        }
    }
}
