//! Disabled-block preprocessing.
//!
//! The script format has no token for a disabled rule. Authors disable a block
//! by commenting out every one of its lines. Before boundary detection those
//! blocks are rewritten so the rest of the pipeline can treat them like active
//! blocks:
//!
//! ```text
//! #Show                 ShowDisabled
//! #    Quality > 10  =>     Quality > 10
//! ```
//!
//! Older tooling also wrapped disabled blocks in a pair of sentinel lines.
//! Those are tolerated either way; whether to strip them is up to the caller.

use log::debug;

use crate::lines::{is_action_line, is_blank, split_lines, strip_one_marker};

pub const LEGACY_SENTINEL_START: &str = "#Disabled Block Start";
pub const LEGACY_SENTINEL_END: &str = "#Disabled Block End";

pub(crate) fn is_legacy_sentinel(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed == LEGACY_SENTINEL_START || trimmed == LEGACY_SENTINEL_END
}

/// True when the text still carries sentinel lines from older tooling.
pub fn contains_legacy_sentinels(text: &str) -> bool {
    split_lines(text).into_iter().any(is_legacy_sentinel)
}

/// Remove legacy sentinel lines, keeping every other line. The result uses
/// `\n` terminators; the translator reads any newline style.
pub fn strip_legacy_sentinels(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in split_lines(text).into_iter().filter(|line| !is_legacy_sentinel(line)) {
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Mark the lines that belong to an active block: an uncommented action line
/// plus the following non-blank lines up to the next action line.
pub(crate) fn active_block_runs<S: AsRef<str>>(lines: &[S]) -> Vec<bool> {
    let mut inside = false;
    lines
        .iter()
        .map(|line| {
            let line = line.as_ref();
            if is_action_line(line) {
                inside = true;
            } else if is_blank(line) {
                inside = false;
            }
            inside
        })
        .collect()
}

/// Turn `Show ...`/`Hide ...` (already stripped of one marker) into its
/// disabled form.
fn disabled_action(uncommented: &str) -> Option<String> {
    let body = uncommented.trim_start();
    for keyword in ["Show", "Hide"] {
        if let Some(rest) = body.strip_prefix(keyword)
            && (rest.is_empty() || rest.starts_with(char::is_whitespace))
        {
            return Some(format!("{keyword}Disabled{rest}"));
        }
    }
    None
}

/// Rewrite fully commented rule blocks into `ShowDisabled`/`HideDisabled`
/// blocks with one comment level removed from each of their lines.
///
/// A disabled block starts at a comment line outside any active block whose
/// text, minus one marker, begins with `Show` or `Hide`. It runs until the
/// next line that is not a comment or is a legacy sentinel.
///
/// ```
/// use filter_script::preprocess_disabled_blocks;
///
/// let lines = ["#Show # Maps", "#    MapTier > 5", "", "# plain note"];
/// assert_eq!(
///     preprocess_disabled_blocks(&lines),
///     vec!["ShowDisabled # Maps", "    MapTier > 5", "", "# plain note"]
/// );
/// ```
pub fn preprocess_disabled_blocks<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let active = active_block_runs(lines);
    let mut out = Vec::with_capacity(lines.len());
    let mut in_disabled = false;
    let mut disabled_blocks = 0usize;

    for (index, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        let Some(uncommented) = strip_one_marker(line).filter(|_| !is_legacy_sentinel(line)) else {
            in_disabled = false;
            out.push(line.to_string());
            continue;
        };
        if active[index] {
            out.push(line.to_string());
            continue;
        }
        if let Some(rewritten) = disabled_action(uncommented) {
            in_disabled = true;
            disabled_blocks += 1;
            out.push(rewritten);
        } else if in_disabled {
            out.push(uncommented.to_string());
        } else {
            out.push(line.to_string());
        }
    }

    if disabled_blocks > 0 {
        debug!("preprocessor found {disabled_blocks} disabled block(s)");
    }
    out
}
