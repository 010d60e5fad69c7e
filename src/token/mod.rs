//! Token estimation and model context-window registry.
//!
//! Token counting never calls a real tokenizer: the estimate is a cheap,
//! deterministic heuristic (1 token ≈ 4 characters), intentionally
//! conservative so trimming behaviour stays reproducible in tests. See
//! `wintermute`'s `agent/context.rs::CHARS_PER_TOKEN`, which this estimator
//! generalizes from messages to arbitrary strings.

/// Default fraction of a model's context window usable for context parts.
pub const DEFAULT_RATIO: f32 = 0.7;

/// Context window returned for unrecognised model names.
pub const FALLBACK_CONTEXT_WINDOW: u32 = 128_000;

/// Estimate the token count of `content` as `ceil(len(content) / 4)`.
///
/// `""` maps to `0`. Byte length is used rather than a grapheme or
/// tokenizer-accurate count — this is deliberately an over-estimate for
/// most English text, never an under-estimate of the conservative floor
/// `ceil(len/4)` the testable properties require.
#[must_use]
pub fn estimate_tokens(content: &str) -> u64 {
    let len = u64::try_from(content.len()).unwrap_or(u64::MAX);
    if len == 0 {
        return 0;
    }
    len.saturating_add(3) / 4
}

/// `(lowercase prefix, context window in tokens)`, longest-prefix-wins.
///
/// Covers the Anthropic Claude family, OpenAI GPT/o-series, Google Gemini,
/// and common locally-hosted models. Ordering within the table doesn't
/// matter — lookup scores every matching prefix and keeps the longest.
const MODEL_WINDOWS: &[(&str, u32)] = &[
    ("claude-opus-4", 200_000),
    ("claude-sonnet-4", 200_000),
    ("claude-haiku-4", 200_000),
    ("claude-3-5-sonnet", 200_000),
    ("claude-3-5-haiku", 200_000),
    ("claude-3-opus", 200_000),
    ("claude-3-sonnet", 200_000),
    ("claude-3-haiku", 200_000),
    ("claude-2.1", 200_000),
    ("claude-2", 100_000),
    ("claude-instant", 100_000),
    ("gpt-4o-mini", 128_000),
    ("gpt-4o", 128_000),
    ("gpt-4-turbo", 128_000),
    ("gpt-4-32k", 32_768),
    ("gpt-4", 8_192),
    ("gpt-3.5-turbo-16k", 16_385),
    ("gpt-3.5-turbo", 16_385),
    ("o1-mini", 128_000),
    ("o1-preview", 128_000),
    ("o1", 200_000),
    ("o3-mini", 200_000),
    ("o3", 200_000),
    ("gemini-2.5-pro", 1_000_000),
    ("gemini-2.5-flash", 1_000_000),
    ("gemini-1.5-pro", 2_000_000),
    ("gemini-1.5-flash", 1_000_000),
    ("gemini-1.0-pro", 32_000),
    ("llama-3.1", 128_000),
    ("llama-3", 8_192),
    ("llama-2", 4_096),
    ("mistral-large", 128_000),
    ("mixtral-8x7b", 32_768),
    ("qwen2.5", 32_768),
    ("deepseek-v3", 64_000),
    ("deepseek-r1", 64_000),
];

/// Resolve a model name to its context window, in tokens.
///
/// Resolution rule: an exact (case-insensitive) match wins; otherwise the
/// longest matching prefix wins. Unknown models fall back to
/// [`FALLBACK_CONTEXT_WINDOW`].
#[must_use]
pub fn lookup_context_window(model_name: &str) -> u32 {
    let needle = model_name.to_lowercase();

    if let Some(&(_, window)) = MODEL_WINDOWS.iter().find(|(prefix, _)| *prefix == needle) {
        return window;
    }

    MODEL_WINDOWS
        .iter()
        .filter(|(prefix, _)| needle.starts_with(prefix))
        .max_by_key(|(prefix, _)| prefix.len())
        .map_or(FALLBACK_CONTEXT_WINDOW, |&(_, window)| window)
}

/// Compute the usable token budget.
///
/// Returns `explicit` when it is positive; otherwise derives the budget as
/// `lookup_context_window(model) * ratio`, where `ratio` is replaced by
/// [`DEFAULT_RATIO`] when it is `<= 0.0` or `> 1.0`.
#[must_use]
pub fn context_budget(explicit: i64, model: &str, ratio: f32) -> i64 {
    if explicit > 0 {
        return explicit;
    }

    let ratio = if ratio <= 0.0 || ratio > 1.0 {
        DEFAULT_RATIO
    } else {
        ratio
    };
    let window = u64::from(lookup_context_window(model));

    // Fixed-point scaling (parts-per-thousand) keeps this integer-only and
    // avoids float-to-int rounding corner cases for large windows.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let ratio_milli = (f64::from(ratio) * 1000.0).round() as u64;
    let scaled = window.saturating_mul(ratio_milli) / 1000;

    #[allow(clippy::cast_possible_wrap)]
    let budget = scaled as i64;
    budget
}
