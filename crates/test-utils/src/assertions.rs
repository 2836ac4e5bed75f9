//! Snapshot formatting for resolver calls and progress messages
//!
//! Both helpers produce one numbered line per entry so insta snapshots stay
//! readable.

use catalog_synth::TypeKind;

/// Format resolver calls for snapshot testing.
///
/// # Example
///
/// ```ignore
/// use catalog_test_utils::format_calls;
///
/// insta::assert_snapshot!(format_calls(&resolver.calls()), @r"
/// [1] input IdInput
/// [2] output User
/// ");
/// ```
pub fn format_calls(calls: &[(TypeKind, String)]) -> String {
    if calls.is_empty() {
        return String::from("(no calls)");
    }

    calls
        .iter()
        .enumerate()
        .map(|(i, (kind, name))| format!("[{}] {kind} {name}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format progress messages for snapshot testing.
pub fn format_messages<T: AsRef<str>>(messages: &[T]) -> String {
    if messages.is_empty() {
        return String::from("(no messages)");
    }

    messages
        .iter()
        .enumerate()
        .map(|(i, m)| format!("[{}] {}", i + 1, m.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}
