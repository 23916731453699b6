//! Shared handle to the active configuration
//!
//! Collection threads take a snapshot with [`ConfigHandle::load`] and
//! resolve against it without locking. A reload builds a complete new
//! [`ResolvedConfiguration`] and swaps the pointer; readers holding the old
//! snapshot keep using it until they drop it.

use crate::errors::ConfigResult;
use crate::loader;
use crate::resolver::ResolvedConfiguration;
use arc_swap::ArcSwap;
use std::sync::Arc;

/// Cloneable handle publishing the current configuration
#[derive(Clone)]
pub struct ConfigHandle {
    inner: Arc<ArcSwap<ResolvedConfiguration>>,
}

impl ConfigHandle {
    pub fn new(initial: ResolvedConfiguration) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(initial)),
        }
    }

    /// Parse and resolve `text` into a new handle
    pub fn from_text(text: &str) -> ConfigResult<Self> {
        loader::load(text).map(Self::new)
    }

    /// Current configuration
    #[inline]
    pub fn load(&self) -> Arc<ResolvedConfiguration> {
        self.inner.load_full()
    }

    /// Publish an already resolved configuration, returning the previous one
    pub fn store(&self, next: ResolvedConfiguration) -> Arc<ResolvedConfiguration> {
        self.inner.swap(Arc::new(next))
    }

    /// Parse and resolve `text`, then publish it.
    ///
    /// On error nothing is published and the previous configuration stays
    /// active.
    pub fn reload(&self, text: &str) -> ConfigResult<Arc<ResolvedConfiguration>> {
        let next = match loader::load(text) {
            Ok(config) => Arc::new(config),
            Err(e) => {
                tracing::warn!(error = %e, "Configuration reload rejected");
                return Err(e);
            }
        };

        self.inner.store(Arc::clone(&next));
        tracing::info!(
            matchers = next.matchers().len(),
            "Configuration reloaded"
        );
        Ok(next)
    }
}

impl std::fmt::Debug for ConfigHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigHandle").finish_non_exhaustive()
    }
}
