// ABOUTME: Minimal glob matcher supporting only the `*` wildcard
// ABOUTME: Used by tool policy patterns (allow_only / allow_all_except / custom overrides)

/// Match `name` against `pattern`, where `*` in `pattern` matches any
/// (possibly empty) sequence of characters. No other wildcard syntax is
/// supported — tool-policy patterns are plain names with optional `*`.
///
/// `get_*` matches `get_database_health` but not `set_health`; a bare `*`
/// matches every name.
#[must_use]
pub fn glob_match(pattern: &str, name: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let name: Vec<char> = name.chars().collect();
    match_from(&pattern, &name)
}

fn match_from(pattern: &[char], name: &[char]) -> bool {
    match pattern.split_first() {
        None => name.is_empty(),
        Some(('*', rest)) => {
            // A `*` matches zero or more characters: try every split point.
            (0..=name.len()).any(|i| match_from(rest, &name[i..]))
        }
        Some((c, rest)) => match name.split_first() {
            Some((n, name_rest)) if n == c => match_from(rest, name_rest),
            _ => false,
        },
    }
}

/// Returns true if any pattern in `patterns` matches `name`.
#[must_use]
pub fn any_match<'a>(patterns: impl IntoIterator<Item = &'a str>, name: &str) -> bool {
    patterns.into_iter().any(|p| glob_match(p, name))
}
