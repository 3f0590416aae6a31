//! Shared application state

use std::sync::Arc;

use crate::engine::MediaEngine;
use crate::jobs::JobStore;
use crate::web::ServeOptions;

/// Shared state threaded through every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn JobStore>,
    pub engine: Arc<dyn MediaEngine>,
    pub options: Arc<ServeOptions>,
}
