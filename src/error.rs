//! Error types for the context assembly core.

use thiserror::Error;

/// Errors surfaced while assembling context parts.
///
/// Event handling itself never produces an error the publisher can see
/// (panics are trapped, malformed payloads are dropped); this type covers
/// the one place the core *does* propagate a failure outward: a provider's
/// [`crate::providers::ContextProvider::get_part`] call during
/// [`crate::manager::ContextManager::get_context_parts`].
#[derive(Debug, Error)]
pub enum ManagerError {
    /// A provider failed to produce its context part; the whole assembly
    /// pass is aborted and no partial map is returned.
    #[error("provider `{key}` failed to produce its context part: {source}")]
    ProviderFailed {
        /// The provider's part key (`"chat"`, `"project"`, `"files"`, `"todo"`, ...).
        key: &'static str,
        /// The underlying cause.
        #[source]
        source: anyhow::Error,
    },
}
