//! Whole-script translation.

use filter_data::{Script, Segment};
use log::{debug, info, warn};

use crate::block::{parse_comment_block, parse_rule_lines, render_block, render_comment_block};
use crate::boundary::{Boundary, BoundaryKind, detect_boundaries};
use crate::hierarchy::BlockGroupHierarchyBuilder;
use crate::lines::{COMMENT_MARKER, CRLF, split_lines, strip_one_marker};
use crate::preprocess::{
    contains_legacy_sentinels, is_legacy_sentinel, preprocess_disabled_blocks, strip_legacy_sentinels,
};
use crate::{SentinelPolicy, TranslateError, TranslatorSettings};

/// Parses script text into a [`Script`] and renders it back.
#[derive(Debug, Clone, Default)]
pub struct ScriptTranslator {
    settings: TranslatorSettings,
}

impl ScriptTranslator {
    pub fn new(settings: TranslatorSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &TranslatorSettings {
        &self.settings
    }

    /// Parse a whole script.
    ///
    /// Lines that do not fit the format are skipped, so any text parses.
    ///
    /// # Errors
    /// Only on internal misuse of the hierarchy builder, see
    /// [`TranslateError::HierarchyNotInitialised`].
    pub fn parse_script(&self, text: &str) -> Result<Script, TranslateError> {
        let stripped;
        let text = match self.settings.legacy_sentinels {
            SentinelPolicy::Strip => {
                stripped = strip_legacy_sentinels(text);
                stripped.as_str()
            },
            SentinelPolicy::Keep => {
                if contains_legacy_sentinels(text) {
                    warn!("script contains legacy disabled-block sentinels; they are parsed as comments");
                }
                text
            },
        };

        let lines = preprocess_disabled_blocks(&split_lines(text));
        let boundaries = detect_boundaries(&lines);

        let mut script = Script::new();
        script.block_groups_enabled = self.settings.block_groups_enabled;

        let mut builder = BlockGroupHierarchyBuilder::new();
        builder.initialise(script.groups.root());
        let translated = translate_segments(&lines, &boundaries, &mut script, &builder);
        builder.cleanup();
        translated?;

        script.groups.recompute();
        info!(
            "parsed script: {} rule block(s), {} comment block(s), {} group node(s), {} theme component(s)",
            script.rule_blocks().count(),
            script.comment_blocks().count(),
            script.groups.len(),
            script.theme.len()
        );
        Ok(script)
    }

    /// Render a script as CRLF text ending with a line terminator.
    pub fn render_script(&self, script: &Script) -> String {
        let mut out = String::new();

        if !script.description.is_empty() {
            for line in script.description.split('\n') {
                out.push(COMMENT_MARKER);
                if !line.is_empty() {
                    out.push(' ');
                    out.push_str(line);
                }
                out.push_str(CRLF);
            }
            out.push_str(CRLF);
        }

        let mut previous: Option<&Segment> = None;
        for segment in &script.segments {
            if let Some(previous) = previous
                && self.needs_blank_line(previous, segment)
            {
                out.push_str(CRLF);
            }
            match segment {
                Segment::Rule(block) => out.push_str(&render_block(block, &script.groups)),
                Segment::Comment(comment) => out.push_str(&render_comment_block(comment)),
            }
            out.push_str(CRLF);
            previous = Some(segment);
        }
        out
    }

    /// Comment blocks and disabled blocks are only found again on reparse when
    /// a blank line separates them from their neighbours.
    fn needs_blank_line(&self, previous: &Segment, next: &Segment) -> bool {
        match (previous, next) {
            (Segment::Rule(a), Segment::Rule(b)) => self.settings.extra_line_between_blocks || !a.enabled || !b.enabled,
            _ => true,
        }
    }
}

fn translate_segments(
    lines: &[String],
    boundaries: &[Boundary],
    script: &mut Script,
    builder: &BlockGroupHierarchyBuilder,
) -> Result<(), TranslateError> {
    for boundary in boundaries {
        let segment_lines = boundary.lines(lines);
        match boundary.kind {
            BoundaryKind::ScriptDescription => {
                script.description = description_from(segment_lines);
            },
            BoundaryKind::RuleBlock => {
                let block = parse_rule_lines(segment_lines, script, builder)?;
                script.segments.push(Segment::Rule(block));
            },
            BoundaryKind::CommentBlock => {
                let comment = parse_comment_block(&segment_lines.join("\n"));
                script.segments.push(Segment::Comment(comment));
            },
        }
    }
    Ok(())
}

fn description_from(lines: &[String]) -> String {
    let mut text = Vec::new();
    for line in lines {
        match strip_one_marker(line) {
            Some(_) if is_legacy_sentinel(line) => {},
            Some(stripped) => text.push(stripped.trim()),
            None if line.trim().is_empty() => {},
            None => debug!("dropping non-comment line '{line}' before the first rule block"),
        }
    }
    text.join("\n")
}
