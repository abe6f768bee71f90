//! Markup stripping for free-text form values.

use std::sync::LazyLock;

use regex::Regex;

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is a valid regex"));

/// Make a form value safe to store and to interpolate into markup.
///
/// Only `&`, `<` and `>` are escaped; quotes, apostrophes and slashes are
/// ordinary text and pass through. Anything still shaped like a tag is then
/// removed, along with any stray angle bracket. The result never contains
/// `<` or `>`.
pub fn sanitize(input: &str) -> String {
    let escaped = escape_text(input.trim());
    let stripped = TAG_PATTERN.replace_all(&escaped, "");
    stripped.replace(['<', '>'], "").trim().to_string()
}

/// Entity-encode text content. `&` goes first so the other entities survive.
fn escape_text(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
