//! Filesystem-safe path segments for vendor subpaths.

/// Longest file name most filesystems accept, in bytes.
const NAME_MAX: usize = 255;

/// Characters kept verbatim. Everything else becomes `_`.
fn is_portable(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '@' | '+' | '=' | '%' | '~' | ',')
}

/// Maps each run of non-portable characters (and `_`) to a single `_`, strips
/// leading and trailing `.` and `_`, and caps the length at [`NAME_MAX`].
/// An all-dots input yields an empty string.
pub fn sanitize_segment(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if is_portable(c) {
            out.push(c);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    let mut out = out.trim_matches(|c| c == '.' || c == '_').to_string();
    // ASCII only, so every index is a char boundary.
    out.truncate(NAME_MAX);
    out
}
