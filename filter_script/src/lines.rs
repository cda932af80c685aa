//! Line-level helpers shared by the preprocessor, boundary detector and
//! block translator.

use filter_data::BlockAction;
use regex::Regex;
use std::sync::LazyLock;

/// Line terminator used for every rendered script.
pub(crate) const CRLF: &str = "\r\n";

/// Indentation written in front of every property line.
pub(crate) const INDENT: &str = "    ";

pub(crate) const COMMENT_MARKER: char = '#';

/// `Show`/`Hide`, optionally in the preprocessor's `Disabled` form, followed by
/// whitespace, a comment or the end of the line.
static ACTION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(Show|Hide)(Disabled)?(?:\s|#|$)").expect("valid action regex"));

/// Split text into lines, accepting CRLF, LF and lone CR terminators.
/// A trailing terminator does not produce an extra empty line.
///
/// ```
/// use filter_script::split_lines;
///
/// assert_eq!(split_lines("a\r\nb\rc\nd"), vec!["a", "b", "c", "d"]);
/// assert_eq!(split_lines("a\n\nb\n"), vec!["a", "", "b"]);
/// assert!(split_lines("").is_empty());
/// ```
pub fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' => {
                lines.push(&text[start..i]);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            },
            b'\n' => {
                lines.push(&text[start..i]);
                start = i + 1;
            },
            _ => {},
        }
        i += 1;
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

pub(crate) fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

pub(crate) fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with(COMMENT_MARKER)
}

/// Remove exactly one comment marker (and the indentation before it).
/// Returns `None` for lines that are not comments.
pub(crate) fn strip_one_marker(line: &str) -> Option<&str> {
    line.trim_start().strip_prefix(COMMENT_MARKER)
}

/// Parse an action line into its action, whether it carried the `Disabled`
/// suffix, and the text after the keyword.
pub(crate) fn action_line(line: &str) -> Option<(BlockAction, bool, &str)> {
    let caps = ACTION_LINE.captures(line)?;
    let keyword = caps.get(1)?;
    let action = BlockAction::from_keyword(keyword.as_str())?;
    let disabled = caps.get(2);
    let end = disabled.map_or(keyword.end(), |m| m.end());
    Some((action, disabled.is_some(), &line[end..]))
}

pub(crate) fn is_action_line(line: &str) -> bool {
    ACTION_LINE.is_match(line)
}

/// Split a trimmed property line into its keyword and the remainder.
pub(crate) fn split_keyword(trimmed: &str) -> (&str, &str) {
    let end = trimmed
        .find(|c: char| c.is_whitespace() || c == COMMENT_MARKER)
        .unwrap_or(trimmed.len());
    trimmed.split_at(end)
}

/// Split a value into the part before a `#` and the comment after it.
pub(crate) fn split_comment(rest: &str) -> (&str, Option<&str>) {
    match rest.find(COMMENT_MARKER) {
        Some(pos) => (&rest[..pos], Some(&rest[pos + 1..])),
        None => (rest, None),
    }
}
