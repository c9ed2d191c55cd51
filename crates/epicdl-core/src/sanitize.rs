//! File stems derived from image tokens.
//!
//! Tokens come from a remote feed and name files directly, so anything that
//! could leave the output directory is replaced before use.

const NAME_MAX: usize = 255;

/// Longest stem that still leaves room for `.json.part` / `.png.part`.
const STEM_MAX: usize = NAME_MAX - 16;

/// Used when a token sanitizes to nothing (empty, `..`, only separators).
pub const EMPTY_TOKEN_STEM: &str = "unnamed";

/// Sanitizes an image token for use as a file stem on Linux.
///
/// - Replaces NUL, `/`, `\`, whitespace and control characters with `_`
/// - Collapses runs of replaced characters into one `_`
/// - Trims leading/trailing dots and underscores (no hidden files, no `..`)
/// - Caps the length at a char boundary
///
/// Well-formed tokens such as `epic_1b_20200923001751` pass through unchanged.
pub fn file_stem(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    let mut prev_replaced = false;

    for c in token.chars() {
        if c == '\0' || c == '/' || c == '\\' || c.is_control() || c.is_whitespace() {
            if !prev_replaced {
                out.push('_');
            }
            prev_replaced = true;
        } else {
            out.push(c);
            prev_replaced = false;
        }
    }

    let trimmed = out.trim_matches(['.', '_']);
    if trimmed.is_empty() {
        return EMPTY_TOKEN_STEM.to_string();
    }

    let mut take = trimmed.len().min(STEM_MAX);
    while !trimmed.is_char_boundary(take) {
        take -= 1;
    }
    trimmed[..take].to_string()
}
