//! LRU-style trimming for a most-recent-first ordered sequence: keep a
//! prefix bounded by both an item cap and a token budget.

use crate::token::estimate_tokens;

/// Keep the first `max_items` entries of a most-recent-first ordered
/// sequence that also fit a token budget.
#[derive(Debug, Clone, Copy)]
pub struct Lru {
    /// Maximum number of items to keep, regardless of budget. `0` means
    /// unlimited — only the token budget bounds the result.
    pub max_items: usize,
}

impl Default for Lru {
    fn default() -> Self {
        Self { max_items: 50 }
    }
}

impl Lru {
    /// Walk `items` forward (most-recent-first), accumulating `format`-ed
    /// token estimates, stopping at the first of: the item cap (unless
    /// `max_items` is `0`, meaning unlimited), or the token budget. Order
    /// is preserved.
    #[must_use]
    pub fn apply<T: Clone>(&self, items: &[T], budget: i64, format: impl Fn(&T) -> String) -> Vec<T> {
        let budget = u64::try_from(budget.max(0)).unwrap_or(0);
        if budget == 0 || items.is_empty() {
            return Vec::new();
        }

        let cap = if self.max_items == 0 { usize::MAX } else { self.max_items };
        let mut kept = Vec::new();
        let mut used: u64 = 0;
        for item in items.iter().take(cap) {
            let cost = estimate_tokens(&format(item));
            let next = used.saturating_add(cost);
            if next > budget {
                break;
            }
            used = next;
            kept.push(item.clone());
        }
        kept
    }
}
