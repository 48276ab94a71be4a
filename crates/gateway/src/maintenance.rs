//! Lock-free maintenance-mode flag.
//!
//! Handlers consult the flag at the top of their bodies and return a fixed
//! maintenance payload when it is active. The check sits INSIDE handler
//! execution rather than in the dispatcher, so a maintenance response passes
//! through the same cache machinery as any other response — including being
//! cached. A stale maintenance payload can therefore outlive the maintenance
//! window until its endpoint tag is invalidated; operators clearing the flag
//! should also purge `agoraRestEndpoint`.

use std::sync::Arc;

use arc_swap::ArcSwap;

/// Shared maintenance-mode state, cheap to read on every request.
#[derive(Clone, Debug)]
pub struct MaintenanceMode {
    inner: Arc<ArcSwap<bool>>,
}

impl MaintenanceMode {
    pub fn new(active: bool) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(active)),
        }
    }

    /// Lock-free read of the current state.
    pub fn is_active(&self) -> bool {
        **self.inner.load()
    }

    /// Flip the flag at runtime.
    pub fn set(&self, active: bool) {
        self.inner.store(Arc::new(active));
    }
}

impl Default for MaintenanceMode {
    fn default() -> Self {
        Self::new(false)
    }
}
