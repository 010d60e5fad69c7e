//! Pluggable trimming strategies over the three shapes of content the
//! aggregator needs to budget: a single blob ([`soft::SoftTrim`]), a
//! chronologically ordered sequence ([`sliding_window::SlidingWindow`]),
//! and a most-recent-first ordered sequence with an item cap
//! ([`lru::Lru`]).
//!
//! These are three small, independent structs rather than one trait —
//! their inputs differ in kind (blob vs ordered messages vs ordered
//! items), and forcing a shared abstraction across them would hide that
//! difference rather than express it.

pub mod lru;
pub mod sliding_window;
pub mod soft;

pub use lru::Lru;
pub use sliding_window::SlidingWindow;
pub use soft::SoftTrim;

/// Hard-truncate `content` to `budget * 4` characters, reporting `budget`
/// tokens used. Shared by [`SoftTrim`]'s two "still over budget" cases.
pub(crate) fn hard_truncate(content: &str, budget: u64) -> (String, u64) {
    let max_chars = budget.saturating_mul(4);
    let max_chars = usize::try_from(max_chars).unwrap_or(usize::MAX);
    let truncated: String = content.chars().take(max_chars).collect();
    (truncated, budget)
}
