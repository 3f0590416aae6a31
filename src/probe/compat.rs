//! Concatenation compatibility checking
//!
//! Stream-copy concatenation only works when every clip shares the same
//! resolution and codec. The check is fail-closed: a file that cannot be
//! probed is treated as incompatible rather than surfacing an error.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::{debug, warn};

use crate::engine::MediaEngine;

/// Outcome of a compatibility check. A mismatch is a value, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compatibility {
    Compatible,
    Incompatible { reason: String },
}

impl Compatibility {
    pub fn is_compatible(&self) -> bool {
        matches!(self, Compatibility::Compatible)
    }

    fn incompatible(reason: impl Into<String>) -> Self {
        Compatibility::Incompatible {
            reason: reason.into(),
        }
    }
}

/// Check whether the given files can be losslessly concatenated.
///
/// Zero or one path is trivially compatible and triggers no probing.
/// For two or more, every existing path is probed and the distinct
/// resolutions and codecs must each collapse to a single value.
pub async fn check_compatibility(engine: &dyn MediaEngine, paths: &[&Path]) -> Compatibility {
    if paths.len() < 2 {
        return Compatibility::Compatible;
    }

    let mut infos = Vec::with_capacity(paths.len());
    for path in paths.iter().filter(|p| p.exists()) {
        match engine.probe(path).await {
            Ok(info) => infos.push(info),
            Err(e) => {
                warn!("Probe failed for {}: {}", path.display(), e);
                return Compatibility::incompatible(format!(
                    "could not probe {}",
                    path.display()
                ));
            }
        }
    }

    let resolutions: BTreeSet<(u32, u32)> = infos.iter().map(|i| i.resolution()).collect();
    if resolutions.len() > 1 {
        warn!("Videos have different resolutions: {:?}", resolutions);
        return Compatibility::incompatible(format!(
            "resolutions differ: {:?}",
            resolutions
        ));
    }

    let codecs: BTreeSet<&str> = infos.iter().map(|i| i.codec.as_str()).collect();
    if codecs.len() > 1 {
        warn!("Videos have different codecs: {:?}", codecs);
        return Compatibility::incompatible(format!("codecs differ: {:?}", codecs));
    }

    debug!("{} files are concat-compatible", paths.len());
    Compatibility::Compatible
}
