use geniecore::token::{context_budget, lookup_context_window};
use geniecore::trim::{SlidingWindow, SoftTrim};

#[test]
fn soft_trim_boundary_keeps_head_tail_and_marker() {
    let trim = SoftTrim {
        head_chars: 10,
        tail_chars: 10,
    };
    let content = format!("ABCDEFGHIJ{}0123456789", "x".repeat(100));
    let (out, _) = trim.apply(&content, 20);

    assert!(out.starts_with("ABCDEFGHIJ"));
    assert!(out.ends_with("0123456789"));
    assert!(out.contains("omitted"));
}

#[test]
fn sliding_window_keeps_exact_suffix_of_ten() {
    let window = SlidingWindow;
    let messages: Vec<String> = (1..=10).map(|i| format!("message {i}")).collect();
    // Each "message N" costs 3 estimated tokens; budget 9 fits exactly 3.
    let kept = window.apply(&messages, 9, |m| m.clone());
    assert_eq!(
        kept,
        vec![
            "message 8".to_string(),
            "message 9".to_string(),
            "message 10".to_string(),
        ]
    );
}

#[test]
fn model_lookup_boundary_values() {
    assert_eq!(lookup_context_window("gpt-4"), 8_192);
    assert_eq!(lookup_context_window("gpt-4o"), 128_000);
    assert_eq!(lookup_context_window("gpt-4o-mini"), 128_000);
    assert_eq!(lookup_context_window("Claude-Sonnet-4-20250514"), 200_000);
}

#[test]
fn context_budget_round_trips_through_default_ratio() {
    let explicit_zero = context_budget(0, "gpt-4", 0.7);
    let explicit_default_ratio = context_budget(0, "gpt-4", -1.0);
    assert_eq!(explicit_zero, explicit_default_ratio);
}
