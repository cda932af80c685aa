//! Rule block and comment block translation.
//!
//! A rule block is parsed line by line: an optional description comment, the
//! action line, then one item per property line. Lines that cannot be parsed
//! are skipped and logged at `debug`, never rejected.

mod render;
mod values;

use filter_data::{
    BlockAction, BlockGroupTree, BlockItem, CommentBlock, ItemKind, ItemValue, MAX_SOUND_VOLUME, RuleBlock, Script,
    ThemeComponents, ValueShape,
};
use log::{debug, warn};

use crate::TranslateError;
use crate::hierarchy::BlockGroupHierarchyBuilder;
use crate::lines::{
    COMMENT_MARKER, CRLF, INDENT, action_line, is_blank, is_comment, split_comment, split_keyword, split_lines,
    strip_one_marker,
};
use crate::preprocess::{is_legacy_sentinel, preprocess_disabled_blocks};

use render::render_item;

/// Separator between the segments of a block group path comment.
const GROUP_PATH_SEPARATOR: &str = " - ";

/// Parse a single block of text, such as a pasted clipboard selection, in the
/// context of `script`. Group paths and theme labels are merged into the
/// script's tree and theme.
///
/// # Errors
/// Propagates [`TranslateError::HierarchyNotInitialised`], which cannot occur
/// for a script whose group tree has a root.
pub fn parse_block(text: &str, script: &mut Script) -> Result<RuleBlock, TranslateError> {
    let lines = preprocess_disabled_blocks(&split_lines(text));
    let mut builder = BlockGroupHierarchyBuilder::new();
    builder.initialise(script.groups.root());
    let parsed = parse_rule_lines(&lines, script, &builder);
    builder.cleanup();
    let block = parsed?;
    script.groups.recompute();
    Ok(block)
}

/// Translate the lines of one rule-block segment. `builder` must already be
/// initialised on `script.groups`.
pub(crate) fn parse_rule_lines<S: AsRef<str>>(
    lines: &[S],
    script: &mut Script,
    builder: &BlockGroupHierarchyBuilder,
) -> Result<RuleBlock, TranslateError> {
    let mut block = RuleBlock::new(BlockAction::Show);
    let mut seen_action = false;

    for line in lines {
        let trimmed = line.as_ref().trim();
        if trimmed.is_empty() {
            continue;
        }

        if is_comment(trimmed) {
            if !seen_action && !is_legacy_sentinel(trimmed) {
                let text = line.as_ref().trim_start().trim_start_matches(COMMENT_MARKER).trim_start();
                block.description = (!is_blank(text)).then(|| text.to_string());
            }
            continue;
        }

        if let Some((action, disabled, rest)) = action_line(trimmed) {
            if seen_action {
                debug!("ignoring second action line '{trimmed}' in one block");
                continue;
            }
            seen_action = true;
            block.action = action;
            block.enabled = !disabled;
            apply_action_comment(&mut block, rest, script, builder)?;
            continue;
        }

        let (keyword, rest) = split_keyword(trimmed);
        match ItemKind::from_keyword(keyword) {
            Some(kind) => {
                if !add_item(&mut block.items, kind, rest, &mut script.theme) {
                    debug!("skipping {kind} line '{trimmed}'");
                }
            },
            None => debug!("skipping unrecognised line '{trimmed}'"),
        }
    }

    if !seen_action {
        debug!("block without an action line, treating it as Show");
    }
    Ok(block)
}

/// Route the text after `#` on an action line either into the group tree or
/// onto the action item as a literal comment.
fn apply_action_comment(
    block: &mut RuleBlock,
    rest: &str,
    script: &mut Script,
    builder: &BlockGroupHierarchyBuilder,
) -> Result<(), TranslateError> {
    let Some(comment) = split_comment(rest).1.map(str::trim_end) else {
        return Ok(());
    };

    if script.block_groups_enabled {
        let segments: Vec<&str> = comment
            .split(GROUP_PATH_SEPARATOR)
            .map(str::trim)
            .filter(|segment| !segment.trim_start_matches('~').trim().is_empty())
            .collect();
        if !segments.is_empty() {
            let leaf = builder.integrate(&mut script.groups, &segments, block.action.is_show(), block.enabled)?;
            block.group = Some(leaf);
            return Ok(());
        }
    }

    if !comment.is_empty() {
        block.set_action_comment(Some(comment.to_string()));
    }
    Ok(())
}

/// Parse `rest` as a value of `kind` and add it to `items`, honouring the
/// kind's replacement and count rules. Returns false when the line was dropped.
fn add_item(items: &mut Vec<BlockItem>, kind: ItemKind, rest: &str, theme: &mut ThemeComponents) -> bool {
    let value = match kind.shape() {
        ValueShape::Action => None,
        ValueShape::Numeric => values::parse_numeric(kind, rest)
            .inspect(|predicate| check_range(kind, predicate.operand))
            .map(ItemValue::Numeric),
        ValueShape::StringList => values::parse_string_list(rest).map(ItemValue::StringList),
        ValueShape::Boolean => values::parse_boolean(rest).map(ItemValue::Boolean),
        ValueShape::Color => values::parse_color(rest).map(|(color, label)| {
            if let Some(label) = &label {
                theme.register(kind, label, color);
            }
            ItemValue::Color { color, label }
        }),
        ValueShape::Integer => values::parse_integer(rest).inspect(|v| check_range(kind, *v)).map(ItemValue::Integer),
        ValueShape::Sound => values::parse_sound(rest).map(|(id, volume)| {
            if volume > MAX_SOUND_VOLUME {
                warn!("{kind} volume {volume} is above {MAX_SOUND_VOLUME}");
            }
            ItemValue::Sound { id, volume }
        }),
        ValueShape::Presence => Some(ItemValue::Presence {
            comment: values::parse_presence(rest),
        }),
    };
    let Some(value) = value else {
        return false;
    };

    if kind.replaces_previous() {
        let shared = kind.shares_slot_with();
        items.retain(|item| item.kind != kind && Some(item.kind) != shared);
    } else if items.iter().filter(|item| item.kind == kind).count() >= kind.max_allowed() {
        return false;
    }
    items.push(BlockItem::new(kind, value));
    true
}

fn check_range(kind: ItemKind, value: i32) {
    if let Some((min, max)) = kind.range()
        && !(min..=max).contains(&value)
    {
        warn!("{kind} value {value} is outside {min}..={max}");
    }
}

/// Render a rule block as CRLF-joined lines, without a trailing terminator.
/// `groups` resolves the block's group reference into its path.
pub fn render_block(block: &RuleBlock, groups: &BlockGroupTree) -> String {
    let mut lines = Vec::with_capacity(block.items.len() + 1);

    if let Some(description) = &block.description {
        lines.push(format!("{COMMENT_MARKER}{description}"));
    }

    let mut action = block.action.keyword().to_string();
    match block.group.and_then(|leaf| groups.path_label(leaf)) {
        Some(path) => {
            action.push_str(" # ");
            action.push_str(&path);
        },
        None => {
            if let Some(comment) = block.action_comment() {
                action.push_str(" #");
                action.push_str(comment);
            }
        },
    }
    lines.push(action);

    for item in block.sorted_items() {
        if item.kind == ItemKind::Action {
            continue;
        }
        let text = render_item(item);
        if !text.is_empty() {
            lines.push(format!("{INDENT}{text}"));
        }
    }

    if !block.enabled {
        for line in &mut lines {
            line.insert(0, COMMENT_MARKER);
        }
    }
    lines.join(CRLF)
}

/// Replace every styling item in `items` with the styling lines found in
/// `text`. Non-styling lines in `text` are ignored.
pub fn replace_style_items_from_text(items: &mut Vec<BlockItem>, text: &str, theme: &mut ThemeComponents) {
    items.retain(|item| !item.kind.is_style());
    for line in split_lines(text) {
        let (keyword, rest) = split_keyword(line.trim());
        match ItemKind::from_keyword(keyword).filter(|kind| kind.is_style()) {
            Some(kind) => {
                add_item(items, kind, rest, theme);
            },
            None => debug!("not a styling line: '{line}'"),
        }
    }
}

/// Strip one comment marker, and one space after it, from every line.
/// Trailing blank lines are dropped.
pub fn parse_comment_block(text: &str) -> CommentBlock {
    let mut lines: Vec<&str> = split_lines(text)
        .into_iter()
        .map(|line| match strip_one_marker(line) {
            Some(stripped) => stripped.strip_prefix(' ').unwrap_or(stripped),
            None => line,
        })
        .collect();
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }
    CommentBlock::new(lines.join("\n"))
}

pub fn render_comment_block(comment: &CommentBlock) -> String {
    comment
        .text
        .split('\n')
        .map(|line| {
            if line.is_empty() {
                COMMENT_MARKER.to_string()
            } else {
                format!("{COMMENT_MARKER} {line}")
            }
        })
        .collect::<Vec<_>>()
        .join(CRLF)
}

#[cfg(test)]
mod tests {
    use super::*;
    use filter_data::{Color, DEFAULT_SOUND_VOLUME, FilterOperator, NumericFilterPredicate, TriState};

    fn parse(text: &str) -> (RuleBlock, Script) {
        let mut script = Script::new();
        let block = parse_block(text, &mut script).expect("parse");
        (block, script)
    }

    fn values_of(block: &RuleBlock, kind: ItemKind) -> Vec<ItemValue> {
        block.items_of(kind).map(|item| item.value.clone()).collect()
    }

    #[test]
    fn numeric_lines_with_and_without_operator_match() {
        let (explicit, _) = parse("Show\r\n    Quality = 15");
        let (implicit, _) = parse("Show\r\n    Quality 15");
        assert_eq!(explicit.items, implicit.items);
        assert_eq!(
            values_of(&implicit, ItemKind::Quality),
            vec![ItemValue::Numeric(NumericFilterPredicate::new(FilterOperator::Equal, 15))]
        );
        let (_, script) = parse("");
        assert!(render_block(&implicit, &script.groups).ends_with("    Quality = 15"));
    }

    #[test]
    fn booleans_canonicalise() {
        for text in ["Show\n Corrupted true", "Show\n Corrupted TRUE"] {
            let (block, script) = parse(text);
            assert_eq!(values_of(&block, ItemKind::Corrupted), vec![ItemValue::Boolean(true)]);
            assert_eq!(render_block(&block, &script.groups), "Show\r\n    Corrupted True");
        }
    }

    #[test]
    fn later_single_valued_lines_replace_earlier_ones() {
        let (block, _) = parse("Show\n Corrupted True\n Corrupted False\n SetFontSize 30\n SetFontSize 40");
        assert_eq!(values_of(&block, ItemKind::Corrupted), vec![ItemValue::Boolean(false)]);
        assert_eq!(values_of(&block, ItemKind::SetFontSize), vec![ItemValue::Integer(40)]);
    }

    #[test]
    fn numeric_items_accumulate_up_to_their_limit() {
        let (block, _) = parse("Show\n ItemLevel >= 60\n ItemLevel < 75\n ItemLevel != 70");
        assert_eq!(block.count_of(ItemKind::ItemLevel), 2);
    }

    #[test]
    fn only_one_string_list_per_kind() {
        let (block, _) = parse("Show\n Class \"Test Class 1\" TestOneWordClass\n Class Rings");
        assert_eq!(
            values_of(&block, ItemKind::Class),
            vec![ItemValue::StringList(vec!["Test Class 1".into(), "TestOneWordClass".into()])]
        );
    }

    #[test]
    fn colours_default_alpha_and_register_labels() {
        let (block, script) = parse("Show\n SetTextColor 255 20 100\n SetBorderColor 65 0 255 12 # Frame");
        assert_eq!(
            values_of(&block, ItemKind::SetTextColor),
            vec![ItemValue::Color { color: Color::rgba(255, 20, 100, 240), label: None }]
        );
        assert_eq!(
            values_of(&block, ItemKind::SetBorderColor),
            vec![ItemValue::Color { color: Color::rgba(65, 0, 255, 12), label: Some("Frame".into()) }]
        );
        let component = script.theme.find(ItemKind::SetBorderColor, "Frame").expect("component");
        assert_eq!(component.color, Color::rgba(65, 0, 255, 12));
    }

    #[test]
    fn repeated_colour_keeps_only_the_last_line() {
        let (block, script) = parse("Show\n SetTextColor 1 1 1\n SetTextColor 2 2 2 # L");
        assert_eq!(block.count_of(ItemKind::SetTextColor), 1);
        assert_eq!(
            values_of(&block, ItemKind::SetTextColor),
            vec![ItemValue::Color { color: Color::rgb(2, 2, 2), label: Some("L".into()) }]
        );
        assert_eq!(script.theme.len(), 1);
        assert!(script.theme.find(ItemKind::SetTextColor, "L").is_some());
    }

    #[test]
    fn sound_kinds_replace_each_other() {
        let (block, _) = parse("Show\n PlayAlertSound 3 200\n PlayAlertSoundPositional ShAlchemy");
        assert_eq!(block.count_of(ItemKind::PlayAlertSound), 0);
        assert_eq!(
            values_of(&block, ItemKind::PlayAlertSoundPositional),
            vec![ItemValue::Sound { id: "ShAlchemy".into(), volume: DEFAULT_SOUND_VOLUME }]
        );
    }

    #[test]
    fn presence_items_ignore_stray_booleans() {
        let (block, script) = parse("Show\n DisableDropSound True # hush");
        assert_eq!(
            values_of(&block, ItemKind::DisableDropSound),
            vec![ItemValue::Presence { comment: Some("hush".into()) }]
        );
        assert_eq!(render_block(&block, &script.groups), "Show\r\n    DisableDropSound # hush");
    }

    #[test]
    fn junk_and_malformed_lines_are_skipped() {
        let (block, _) = parse("Show\n NotAKeyword 5\n Quality high\n SetTextColor 1 2\n garbage");
        assert_eq!(block.items.len(), 1);
    }

    #[test]
    fn last_leading_comment_is_the_description() {
        let (block, script) = parse("# first\r\n## second  \r\nHide\r\n# aside\r\n    Quality 5");
        assert_eq!(block.description.as_deref(), Some("second  "));
        assert!(render_block(&block, &script.groups).starts_with("#second  \r\nHide"));
        assert_eq!(block.action, BlockAction::Hide);
        assert_eq!(block.count_of(ItemKind::Quality), 1);
    }

    #[test]
    fn group_path_feeds_the_hierarchy() {
        let (block, script) = parse("Show # Currency - ~Orbs - Chaos\n Class Currency");
        let leaf = block.group.expect("group");
        assert!(script.groups[leaf].is_leaf_marker());
        assert_eq!(script.groups.path(leaf), vec!["Currency", "Orbs", "Chaos"]);
        assert_eq!(script.groups.path_label(leaf).as_deref(), Some("Currency - ~Orbs - Chaos"));
        assert_eq!(block.action_comment(), None);
        assert_eq!(
            render_block(&block, &script.groups),
            "Show # Currency - ~Orbs - Chaos\r\n    Class \"Currency\""
        );
    }

    #[test]
    fn without_block_groups_the_comment_is_literal() {
        let mut script = Script::new();
        script.block_groups_enabled = false;
        let block = parse_block("Show #  A - B", &mut script).expect("parse");
        assert_eq!(block.group, None);
        assert_eq!(block.action_comment(), Some("  A - B"));
        assert_eq!(script.groups.len(), 1);
        assert_eq!(render_block(&block, &script.groups), "Show #  A - B");
    }

    #[test]
    fn disabled_block_matches_its_enabled_counterpart() {
        let enabled = "Show # Maps\r\n    MapTier >= 10\r\n    SetFontSize 40";
        let disabled = "#Show # Maps\r\n#    MapTier >= 10\r\n#    SetFontSize 40";
        let (on, _) = parse(enabled);
        let (off, script) = parse(disabled);
        assert!(on.enabled);
        assert!(!off.enabled);
        assert_eq!(on.items.len(), off.items.len());
        assert_eq!(render_block(&off, &script.groups), disabled);

        let leaf = off.group.expect("group");
        let maps = script.groups[leaf].parent.expect("parent");
        assert_eq!(script.groups[maps].enabled, TriState::Unchecked);
    }

    #[test]
    fn rendering_sorts_items_and_round_trips() {
        let text = "#Nice rings\nShow # Jewellery - Rings\n SetFontSize 45\n Class Rings\n ItemLevel > 70\n Rarity >= rare";
        let (block, script) = parse(text);
        let rendered = render_block(&block, &script.groups);
        assert_eq!(
            rendered,
            "#Nice rings\r\nShow # Jewellery - Rings\r\n    ItemLevel > 70\r\n    Rarity >= Rare\r\n    Class \"Rings\"\r\n    SetFontSize 45"
        );

        let mut again = Script::new();
        let reparsed = parse_block(&rendered, &mut again).expect("reparse");
        assert_eq!(render_block(&reparsed, &again.groups), rendered);
    }

    #[test]
    fn pasting_styles_replaces_only_styling_items() {
        let (mut block, mut script) = parse("Show\n Class Rings\n SetTextColor 1 1 1\n PlayAlertSound 1");
        replace_style_items_from_text(
            &mut block.items,
            "SetBackgroundColor 0 0 0 255 # Dark\nClass Amulets\nPlayAlertSoundPositional 4 100",
            &mut script.theme,
        );
        let kinds: Vec<_> = block.items.iter().map(|item| item.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ItemKind::Action,
                ItemKind::Class,
                ItemKind::SetBackgroundColor,
                ItemKind::PlayAlertSoundPositional
            ]
        );
        assert!(script.theme.find(ItemKind::SetBackgroundColor, "Dark").is_some());
    }

    #[test]
    fn comment_blocks_strip_one_marker_per_line() {
        let comment = parse_comment_block("# Section: Maps\r\n#\r\n## nested\r\n\r\n");
        assert_eq!(comment.text, "Section: Maps\n\n# nested");
        assert_eq!(comment.section_label(), Some("Maps"));
        let rendered = render_comment_block(&comment);
        assert_eq!(rendered, "# Section: Maps\r\n#\r\n# # nested");
        assert_eq!(parse_comment_block(&rendered), comment);
    }
}
