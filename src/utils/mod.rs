//! Input sanitization helpers shared across modules.

/// Trim leading/trailing whitespace and collapse internal whitespace runs
/// (tabs and newlines included) into single spaces.
pub fn sanitize(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}
