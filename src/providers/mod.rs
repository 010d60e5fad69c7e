//! Context part providers: `Chat`, `Project`, `Files`, `Todo`.
//!
//! Each subscribes to bus events at construction, maintains private state
//! behind a lock, and exposes the uniform [`ContextProvider`] shape the
//! context manager drives.

pub mod chat;
pub mod files;
pub mod project;
pub mod todo;

pub use chat::ChatProvider;
pub use files::FilesProvider;
pub use project::ProjectProvider;
pub use todo::TodoProvider;

use std::any::Any;
use std::path::PathBuf;
use std::time::Instant;

use async_trait::async_trait;

use crate::error::ManagerError;

/// A single named, trimmed chunk of text produced by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContextPart {
    /// The provider's key (`"chat"`, `"project"`, `"files"`, `"todo"`, ...).
    pub key: String,
    /// The rendered content.
    pub content: String,
}

/// A chat turn: one user message paired with the assistant's response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// The user's message.
    pub user: String,
    /// The assistant's response.
    pub assistant: String,
}

/// Ambient values every provider's `get_part` may consult.
///
/// Deliberately minimal: the core only ever reads `cwd` (see `spec.md`
/// §6's "ambient context values") plus the optional deadline named in
/// §5. A caller embedding this core in a richer context object composes
/// around this struct rather than through it.
#[derive(Debug, Clone)]
pub struct AssemblyContext {
    /// The working directory context discovery is rooted at.
    pub cwd: PathBuf,
    /// Optional deadline for I/O-bound providers (project sidecar reads).
    pub deadline: Option<Instant>,
}

impl AssemblyContext {
    /// Build a context with no deadline.
    #[must_use]
    pub fn new(cwd: PathBuf) -> Self {
        Self { cwd, deadline: None }
    }

    /// Whether the deadline, if any, has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// The uniform shape every context part provider implements.
///
/// `set_token_budget`/`clear_part` are synchronous, state-only calls;
/// `get_part` is `async` because a provider's first read of a sidecar
/// file may be genuine I/O gated by [`AssemblyContext::deadline`].
#[async_trait]
pub trait ContextProvider: Send + Sync {
    /// This provider's part key.
    fn key(&self) -> &'static str;

    /// Set (or update) the token budget this provider should trim to.
    /// Idempotent; providers that don't fit a budget may ignore it.
    fn set_token_budget(&self, budget: i64);

    /// Render this provider's current state as a context part.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::ProviderFailed`] if rendering fails.
    async fn get_part(&self, ctx: &AssemblyContext) -> Result<ContextPart, ManagerError>;

    /// Clear this provider's private state.
    fn clear_part(&self);

    /// Type-erased self-reference, used by
    /// [`crate::manager::ContextManager::seed_chat_history`] to find the
    /// provider that accepts pre-seeded chat history without widening
    /// this trait with a capability every provider would have to stub.
    fn as_any(&self) -> &dyn Any;
}

/// Capability exposed by providers that accept pre-seeded chat history
/// (today, just [`ChatProvider`]).
pub trait SeedableChatHistory {
    /// Replace this provider's history with `messages`, discarding any
    /// prior content.
    fn seed(&self, messages: Vec<Message>);
}
