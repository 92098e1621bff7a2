//! File-stem sanitization for names derived from URLs.

/// Longest stem kept, in bytes; leaves room for the hash suffix under NAME_MAX.
const STEM_MAX: usize = 200;

/// Sanitizes a candidate file stem.
///
/// - Keeps ASCII alphanumerics, `.`, `-` and `_`; everything else becomes `_`
/// - Collapses consecutive underscores
/// - Trims leading/trailing dots and underscores
/// - Limits length to [`STEM_MAX`] bytes
pub fn sanitize_file_stem(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;

    for c in name.chars() {
        let replacement = if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
            c
        } else {
            '_'
        };

        if replacement == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(replacement);
            prev_underscore = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');
    // Only ASCII remains, so any index is a char boundary.
    trimmed[..trimmed.len().min(STEM_MAX)].to_string()
}
