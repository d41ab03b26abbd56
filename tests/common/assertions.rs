//! Domain-specific assertion macros for nlogx harnesses.
//!
//! These wrap `pretty_assertions` and add context-rich failure messages that
//! make it clear *which* record diverged and *where* in the pipeline.

// ---------------------------------------------------------------------------
// Record assertions
// ---------------------------------------------------------------------------

/// Assert that two record sequences are identical, reporting the first index
/// that differs.
///
/// ```rust
/// assert_same_records!(left, right);
/// ```
#[macro_export]
macro_rules! assert_same_records {
    ($left:expr, $right:expr) => {{
        let left: &[nlogx_core::NormalizedRecord] = &$left;
        let right: &[nlogx_core::NormalizedRecord] = &$right;
        if let Some(i) = left.iter().zip(right.iter()).position(|(a, b)| a != b) {
            pretty_assertions::assert_eq!(left[i], right[i], "records differ at index {}", i);
        }
        assert_eq!(
            left.len(),
            right.len(),
            "assert_same_records! failed: sequences have different lengths"
        );
    }};
}

/// Assert that the rendered output has exactly `n` lines.
///
/// ```rust
/// assert_line_count!(output, 3);
/// ```
#[macro_export]
macro_rules! assert_line_count {
    ($output:expr, $n:expr) => {{
        let output: &str = &$output;
        let expected: usize = $n;
        let actual = output.lines().count();
        if actual != expected {
            panic!(
                "assert_line_count! failed:\n  expected: {}\n  actual:   {}\n  output:\n{}",
                expected, actual, output
            );
        }
    }};
}

// ---------------------------------------------------------------------------
// Raw record helpers
// ---------------------------------------------------------------------------

/// The nine fields of a raw record, in positional order.
pub fn raw_fields(raw: &nlogx_core::RawRecord) -> [&str; 9] {
    [
        raw.address.as_str(),
        raw.identity.as_str(),
        raw.user.as_str(),
        raw.timestamp.as_str(),
        raw.request.as_str(),
        raw.status.as_str(),
        raw.size.as_str(),
        raw.referrer.as_str(),
        raw.agent.as_str(),
    ]
}
