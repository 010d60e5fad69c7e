//! Provider registry: an ordered sequence of `(provider, share)` pairs.

use std::sync::Arc;

use crate::providers::ContextProvider;

/// One registered provider and its budget share.
struct Registration {
    provider: Arc<dyn ContextProvider>,
    share: f64,
}

/// Ordered sequence of registered providers with their budget shares.
///
/// Registration order is preserved and drives both
/// [`crate::manager::ContextManager::get_context_parts`]'s iteration order
/// and [`crate::manager::ContextManager::set_context_budget`]'s
/// distribution — matching the router's routing/resolution pattern this
/// is grounded on, which also resolves in a fixed, declared order rather
/// than re-sorting at call time.
#[derive(Default)]
pub struct Registry {
    registrations: Vec<Registration>,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider with its budget share. Negative shares are
    /// clamped to zero.
    pub fn register(&mut self, provider: Arc<dyn ContextProvider>, share: f64) {
        self.registrations.push(Registration {
            provider,
            share: share.max(0.0),
        });
    }

    /// The registered providers, in registration order.
    pub fn providers(&self) -> impl Iterator<Item = &Arc<dyn ContextProvider>> {
        self.registrations.iter().map(|r| &r.provider)
    }

    /// The registered `(provider, share)` pairs, in registration order.
    pub fn registrations(&self) -> impl Iterator<Item = (&Arc<dyn ContextProvider>, f64)> {
        self.registrations.iter().map(|r| (&r.provider, r.share))
    }

    /// Sum of all registered shares.
    #[must_use]
    pub fn total_share(&self) -> f64 {
        self.registrations.iter().map(|r| r.share).sum()
    }
}
