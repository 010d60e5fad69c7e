//! Sliding-window trimming for chronologically ordered items: keep the
//! most recent items that fit the budget, walking from the newest
//! backwards so the suffix of the sequence (the most relevant, recent
//! part) survives trimming.

use crate::token::estimate_tokens;

/// Keep the newest items of an ordered sequence that fit a token budget.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlidingWindow;

impl SlidingWindow {
    /// Walk `items` from newest (last) to oldest (first), accumulating
    /// `format`-ed token estimates, and stop before exceeding `budget`.
    /// Returns the kept items in their original (oldest-first) order.
    ///
    /// `budget <= 0` returns an empty vector. An item whose own estimate
    /// exceeds the remaining budget is dropped, not truncated — the
    /// window stops there rather than splitting an item.
    #[must_use]
    pub fn apply<T: Clone>(&self, items: &[T], budget: i64, format: impl Fn(&T) -> String) -> Vec<T> {
        let budget = u64::try_from(budget.max(0)).unwrap_or(0);
        if budget == 0 || items.is_empty() {
            return Vec::new();
        }

        let mut kept = Vec::new();
        let mut used: u64 = 0;
        for item in items.iter().rev() {
            let cost = estimate_tokens(&format(item));
            let next = used.saturating_add(cost);
            if next > budget {
                break;
            }
            used = next;
            kept.push(item.clone());
        }
        kept.reverse();
        kept
    }
}
