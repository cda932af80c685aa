//! Segment boundary detection over preprocessed lines.

use crate::lines::{is_action_line, is_blank, is_comment};
use crate::preprocess::active_block_runs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryKind {
    ScriptDescription,
    RuleBlock,
    CommentBlock,
}

/// A half-open line range `start..end` holding one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundary {
    pub kind: BoundaryKind,
    pub start: usize,
    pub end: usize,
}

impl Boundary {
    pub fn lines<'a, S: AsRef<str>>(&self, lines: &'a [S]) -> &'a [S] {
        &lines[self.start..self.end]
    }
}

/// A comment directly above the first action line of the file is only taken
/// as that block's description when the action line sits past this index.
/// Closer to the top, the comment stays with the script description.
const FIRST_BLOCK_DESCRIPTION_MIN_INDEX: usize = 2;

/// Split preprocessed lines into segments.
///
/// The first boundary is always the script description, starting at line 0
/// and running to the first rule block (it may be empty). Every line belongs
/// to exactly one boundary.
///
/// Inside a rule block, a comment opens a comment block once the block's
/// property run has ended, whether at a blank line or after stray text that
/// follows one.
///
/// ```
/// use filter_script::{BoundaryKind, detect_boundaries};
///
/// let lines = ["# my filter", "", "Show", "    Quality > 5", "", "# notes", "Hide"];
/// let kinds: Vec<_> = detect_boundaries(&lines).iter().map(|b| (b.kind, b.start, b.end)).collect();
/// assert_eq!(
///     kinds,
///     vec![
///         (BoundaryKind::ScriptDescription, 0, 2),
///         (BoundaryKind::RuleBlock, 2, 5),
///         (BoundaryKind::RuleBlock, 5, 7),
///     ]
/// );
/// ```
pub fn detect_boundaries<S: AsRef<str>>(lines: &[S]) -> Vec<Boundary> {
    let mut starts: Vec<(BoundaryKind, usize)> = vec![(BoundaryKind::ScriptDescription, 0)];
    let active = active_block_runs(lines);
    let mut previous = "";

    for (index, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        if is_blank(line) {
            previous = line;
            continue;
        }
        let current = starts.last().map_or(BoundaryKind::ScriptDescription, |(kind, _)| *kind);

        if is_comment(line) {
            let opens = match current {
                BoundaryKind::ScriptDescription => false,
                BoundaryKind::RuleBlock => !active[index],
                BoundaryKind::CommentBlock => is_blank(previous),
            };
            if opens {
                starts.push((BoundaryKind::CommentBlock, index));
            }
            previous = line;
            continue;
        }

        if is_action_line(line) {
            let absorb = is_comment(previous)
                && (current != BoundaryKind::ScriptDescription || index > FIRST_BLOCK_DESCRIPTION_MIN_INDEX);
            let start = if absorb { index - 1 } else { index };
            // The absorbed comment may have opened a comment block of its own.
            if absorb && starts.last() == Some(&(BoundaryKind::CommentBlock, start)) {
                starts.pop();
            }
            starts.push((BoundaryKind::RuleBlock, start));
        }
        previous = line;
    }

    let mut boundaries = Vec::with_capacity(starts.len());
    for (i, (kind, start)) in starts.iter().enumerate() {
        let end = starts.get(i + 1).map_or(lines.len(), |(_, next)| *next);
        boundaries.push(Boundary {
            kind: *kind,
            start: *start,
            end,
        });
    }
    boundaries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(lines: &[&str]) -> Vec<(BoundaryKind, usize, usize)> {
        detect_boundaries(lines).iter().map(|b| (b.kind, b.start, b.end)).collect()
    }

    #[test]
    fn empty_input_is_an_empty_description() {
        assert_eq!(kinds(&[]), vec![(BoundaryKind::ScriptDescription, 0, 0)]);
    }

    #[test]
    fn comment_above_action_becomes_part_of_the_block() {
        let lines = ["# header", "", "Show", "", "", "# gems", "Show", "    Class Gems"];
        assert_eq!(
            kinds(&lines),
            vec![
                (BoundaryKind::ScriptDescription, 0, 2),
                (BoundaryKind::RuleBlock, 2, 5),
                (BoundaryKind::RuleBlock, 5, 8),
            ]
        );
    }

    #[test]
    fn comment_after_blank_opens_a_comment_block() {
        let lines = ["Show", "", "# Section: Maps", "# more text", "", "Hide"];
        assert_eq!(
            kinds(&lines),
            vec![
                (BoundaryKind::ScriptDescription, 0, 0),
                (BoundaryKind::RuleBlock, 0, 2),
                (BoundaryKind::CommentBlock, 2, 5),
                (BoundaryKind::RuleBlock, 5, 6),
            ]
        );
    }

    #[test]
    fn comment_after_stray_text_opens_a_comment_block() {
        let lines = ["Show", "", "garbage", "# note to self", "", "Hide"];
        assert_eq!(
            kinds(&lines),
            vec![
                (BoundaryKind::ScriptDescription, 0, 0),
                (BoundaryKind::RuleBlock, 0, 3),
                (BoundaryKind::CommentBlock, 3, 5),
                (BoundaryKind::RuleBlock, 5, 6),
            ]
        );
    }

    #[test]
    fn comment_inside_a_block_stays_in_it() {
        let lines = ["Show", "    Quality 5", "# aside", "    Sockets 6"];
        assert_eq!(
            kinds(&lines),
            vec![(BoundaryKind::ScriptDescription, 0, 0), (BoundaryKind::RuleBlock, 0, 4)]
        );
    }

    #[test]
    fn first_block_near_the_top_leaves_comment_to_the_description() {
        let lines = ["# my filter", "Show"];
        assert_eq!(
            kinds(&lines),
            vec![(BoundaryKind::ScriptDescription, 0, 1), (BoundaryKind::RuleBlock, 1, 2)]
        );

        let lines = ["# my filter", "", "# first block", "Show"];
        assert_eq!(
            kinds(&lines),
            vec![(BoundaryKind::ScriptDescription, 0, 2), (BoundaryKind::RuleBlock, 2, 4)]
        );
    }

    #[test]
    fn junk_lines_are_never_dropped() {
        let lines = ["Show", "    NotAKeyword 5", "", "garbage", "Hide"];
        let boundaries = detect_boundaries(&lines);
        let covered: usize = boundaries.iter().map(|b| b.end - b.start).sum();
        assert_eq!(covered, lines.len());
    }

    #[test]
    fn disabled_actions_open_blocks() {
        let lines = ["Show", "", "ShowDisabled", "    Quality 5", "Show"];
        assert_eq!(
            kinds(&lines),
            vec![
                (BoundaryKind::ScriptDescription, 0, 0),
                (BoundaryKind::RuleBlock, 0, 2),
                (BoundaryKind::RuleBlock, 2, 4),
                (BoundaryKind::RuleBlock, 4, 5),
            ]
        );
    }
}
