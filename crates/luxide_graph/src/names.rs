//! Name allocation for extracted entities

use indexmap::IndexMap;

/// First name of the form `"{base} N"` (N = 1, 2, ...) not already used as
/// a key in `table`.
///
/// Gaps are filled: with `"Box 1"` and `"Box 3"` taken, the result is
/// `"Box 2"`.
pub fn next_unique_name<V>(table: &IndexMap<String, V>, base: &str) -> String {
    (1usize..)
        .map(|n| format!("{} {}", base, n))
        .find(|candidate| !table.contains_key(candidate))
        .unwrap_or_else(|| base.to_string())
}
