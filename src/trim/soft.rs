//! Soft trimming for a single content blob: drop a middle slice and
//! replace it with a marker, preferring to keep both ends intact.

use crate::token::estimate_tokens;

use super::hard_truncate;

/// Keep `head_chars` characters from the start and `tail_chars` from the
/// end of over-budget content, replacing the middle with a marker.
#[derive(Debug, Clone, Copy)]
pub struct SoftTrim {
    /// Characters kept from the start of the content.
    pub head_chars: usize,
    /// Characters kept from the end of the content.
    pub tail_chars: usize,
}

impl Default for SoftTrim {
    fn default() -> Self {
        Self {
            head_chars: 2_000,
            tail_chars: 2_000,
        }
    }
}

impl SoftTrim {
    /// Apply the trim. Returns the (possibly trimmed) content and the
    /// token estimate of what's returned.
    ///
    /// Steps:
    /// 1. If `content` already fits `budget`, return it unchanged.
    /// 2. If `budget <= 0`, return an empty string.
    /// 3. If `content` is short enough that `head_chars + tail_chars`
    ///    would overlap or exceed its length, fall through to a hard
    ///    character truncation at `budget * 4` chars.
    /// 4. Otherwise, splice `head` + marker + `tail` and if that still
    ///    doesn't fit the budget, hard-truncate it too.
    #[must_use]
    pub fn apply(&self, content: &str, budget: i64) -> (String, u64) {
        let estimate = estimate_tokens(content);
        let budget = u64::try_from(budget.max(0)).unwrap_or(0);

        if estimate <= budget {
            return (content.to_string(), estimate);
        }
        if budget == 0 {
            return (String::new(), 0);
        }

        let total_chars = content.chars().count();
        if self.head_chars.saturating_add(self.tail_chars) >= total_chars {
            return hard_truncate(content, budget);
        }

        let head: String = content.chars().take(self.head_chars).collect();
        let tail: String = content
            .chars()
            .skip(total_chars.saturating_sub(self.tail_chars))
            .collect();
        let omitted_chars = total_chars
            .saturating_sub(self.head_chars)
            .saturating_sub(self.tail_chars);
        let omitted_tokens = estimate_tokens(
            &content
                .chars()
                .skip(self.head_chars)
                .take(omitted_chars)
                .collect::<String>(),
        );
        let marker =
            format!("\n\n... [{omitted_chars} characters / ~{omitted_tokens} tokens omitted] ...\n\n");

        let spliced = format!("{head}{marker}{tail}");
        let spliced_estimate = estimate_tokens(&spliced);
        if spliced_estimate <= budget {
            (spliced, spliced_estimate)
        } else {
            hard_truncate(&spliced, budget)
        }
    }
}
