//! API shared state

use std::sync::Arc;

use crate::storage::StorageBackend;

/// Shared state passed to all API handlers.
///
/// Holds the same pooled backend the collector task writes through; the
/// pool handles concurrent checkouts from both sides.
#[derive(Clone)]
pub struct ApiState {
    pub backend: Arc<dyn StorageBackend>,
}

impl ApiState {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }
}
