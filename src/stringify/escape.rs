// Context-sensitive escaping for Markdown serialization.
//
// Escapes only the characters that would trigger formatting where they
// appear: syntax characters anywhere in phrasing text, plus block-start
// constructs (bullets, heading hashes, blockquote markers, ordered-list
// numbers) when the text opens a block. Raw-HTML nodes (embed markers)
// never pass through here.

use std::sync::LazyLock;

use regex::Regex;

static PHRASING_SPECIAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\\`*_\[\]<])").expect("static pattern"));

static BREAK_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([-+#>])").expect("static pattern"));

static BREAK_ORDERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)([.)])").expect("static pattern"));

/// Escape Markdown syntax characters in phrasing content.
pub(crate) fn escape_phrasing(value: &str) -> String {
    PHRASING_SPECIAL.replace_all(value, r"\$1").into_owned()
}

/// Escape characters that only matter at the start of a block.
pub(crate) fn escape_at_break_start(value: String) -> String {
    if let Some(m) = BREAK_ORDERED.captures(&value) {
        return format!("{}\\{}{}", &m[1], &m[2], &value[m[0].len()..]);
    }
    if BREAK_MARKER.is_match(&value) {
        let mut escaped = String::with_capacity(value.len() + 1);
        escaped.push('\\');
        escaped.push_str(&value);
        return escaped;
    }
    value
}
