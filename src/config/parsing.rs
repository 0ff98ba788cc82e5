//! Line-level helpers for `key = value` settings files.

/// What: Check whether a settings line carries no assignment.
///
/// Inputs:
/// - `line`: Raw line
///
/// Output:
/// - `true` for blank lines and lines starting with `#`, `//` or `;`.
pub fn skip_comment_or_empty(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty()
        || trimmed.starts_with('#')
        || trimmed.starts_with("//")
        || trimmed.starts_with(';')
}

/// What: Split a line on its first `=`.
///
/// Inputs:
/// - `line`: Line in `key = value` form
///
/// Output:
/// - `Some((normalized_key, value))`, or `None` without an `=`.
///
/// Details:
/// - Keys are lower-cased with `.`, `-` and spaces mapped to `_`.
/// - The value has any inline comment removed and is trimmed.
pub fn parse_key_value(line: &str) -> Option<(String, &str)> {
    let (raw_key, raw_val) = line.trim().split_once('=')?;
    let key = raw_key.trim().to_lowercase().replace(['.', '-', ' '], "_");
    Some((key, strip_inline_comment(raw_val)))
}

/// What: Drop a trailing `# ...` or `// ...` comment from a value.
///
/// Details:
/// - Only markers preceded by whitespace count, so `http://x` and `a#b` survive.
pub fn strip_inline_comment(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut cut = s.len();
    for (i, &b) in bytes.iter().enumerate() {
        let marker = b == b'#' || (b == b'/' && bytes.get(i + 1) == Some(&b'/'));
        if marker && i > 0 && bytes[i - 1].is_ascii_whitespace() {
            cut = i;
            break;
        }
    }
    s[..cut].trim()
}

/// Interpret `true`/`1`/`yes`/`on` (any case) as `true`.
pub fn parse_bool(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}
