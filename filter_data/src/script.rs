//! Scripts, rule blocks and comment blocks.

use serde::{Deserialize, Serialize};

use crate::{BlockAction, BlockGroupTree, BlockItem, Color, GroupId, ItemKind, ItemValue, ThemeComponents};

/// One `Show`/`Hide` directive with its conditions and styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleBlock {
    pub action: BlockAction,
    /// False for blocks written fully commented out.
    pub enabled: bool,
    pub description: Option<String>,
    /// Leaf marker in the owning script's group tree.
    pub group: Option<GroupId>,
    /// Items in encounter order; the action item comes first.
    pub items: Vec<BlockItem>,
}

impl RuleBlock {
    /// An enabled block holding only its action item.
    ///
    /// ```
    /// use filter_data::{BlockAction, ItemKind, RuleBlock};
    ///
    /// let block = RuleBlock::new(BlockAction::Hide);
    /// assert!(block.enabled);
    /// assert_eq!(block.items.len(), 1);
    /// assert_eq!(block.items[0].kind, ItemKind::Action);
    /// ```
    pub fn new(action: BlockAction) -> Self {
        Self {
            action,
            enabled: true,
            description: None,
            group: None,
            items: vec![BlockItem::action(None)],
        }
    }

    pub fn count_of(&self, kind: ItemKind) -> usize {
        self.items.iter().filter(|item| item.kind == kind).count()
    }

    pub fn items_of(&self, kind: ItemKind) -> impl Iterator<Item = &BlockItem> {
        self.items.iter().filter(move |item| item.kind == kind)
    }

    /// Literal comment carried on the action line, if any.
    pub fn action_comment(&self) -> Option<&str> {
        self.items.iter().find_map(|item| match &item.value {
            ItemValue::Action { comment } => comment.as_deref(),
            _ => None,
        })
    }

    pub fn set_action_comment(&mut self, text: Option<String>) {
        match self.items.iter_mut().find(|item| item.kind == ItemKind::Action) {
            Some(item) => item.value = ItemValue::Action { comment: text },
            None => self.items.insert(0, BlockItem::action(text)),
        }
    }

    /// Items in rendering order. Items of equal sort order keep encounter order.
    pub fn sorted_items(&self) -> Vec<&BlockItem> {
        let mut sorted: Vec<&BlockItem> = self.items.iter().collect();
        sorted.sort_by_key(|item| item.sort_order());
        sorted
    }
}

/// Free-form comment text between rule blocks, markers stripped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentBlock {
    pub text: String,
}

impl CommentBlock {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Label of a section header written as `Section: <label>` on the first line.
    pub fn section_label(&self) -> Option<&str> {
        let first = self.text.lines().next()?.trim();
        let label = first.strip_prefix("Section:")?.trim();
        (!label.is_empty()).then_some(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Segment {
    Rule(RuleBlock),
    Comment(CommentBlock),
}

/// A whole loot filter script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub description: String,
    pub block_groups_enabled: bool,
    pub segments: Vec<Segment>,
    pub groups: BlockGroupTree,
    pub theme: ThemeComponents,
}

impl Default for Script {
    fn default() -> Self {
        Self::new()
    }
}

impl Script {
    pub fn new() -> Self {
        Self {
            description: String::new(),
            block_groups_enabled: true,
            segments: Vec::new(),
            groups: BlockGroupTree::new(),
            theme: ThemeComponents::new(),
        }
    }

    pub fn rule_blocks(&self) -> impl Iterator<Item = &RuleBlock> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Rule(block) => Some(block),
            Segment::Comment(_) => None,
        })
    }

    pub fn rule_blocks_mut(&mut self) -> impl Iterator<Item = &mut RuleBlock> {
        rule_blocks_of(&mut self.segments)
    }

    pub fn comment_blocks(&self) -> impl Iterator<Item = &CommentBlock> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Comment(comment) => Some(comment),
            Segment::Rule(_) => None,
        })
    }

    /// Show or hide every block tagged inside `group`, then refresh the
    /// tree's tri-states.
    pub fn set_group_show(&mut self, group: GroupId, show: bool) {
        self.groups.set_show(group, show);
        for block in blocks_within(&mut self.segments, &self.groups, group) {
            block.action = BlockAction::from_show(show);
        }
        self.groups.recompute();
    }

    /// Enable or disable every block tagged inside `group`, then refresh the
    /// tree's tri-states.
    pub fn set_group_enabled(&mut self, group: GroupId, enabled: bool) {
        self.groups.set_enabled(group, enabled);
        for block in blocks_within(&mut self.segments, &self.groups, group) {
            block.enabled = enabled;
        }
        self.groups.recompute();
    }

    /// Recolour a theme component and every colour item that references it.
    /// Returns the number of items updated, or `None` for an unknown component.
    pub fn apply_theme_component(&mut self, kind: ItemKind, name: &str, color: Color) -> Option<usize> {
        if !self.theme.set_color(kind, name, color) {
            return None;
        }
        let mut updated = 0;
        for block in self.rule_blocks_mut() {
            for item in block.items.iter_mut().filter(|item| item.kind == kind) {
                if let ItemValue::Color { color: current, label } = &mut item.value
                    && label.as_deref() == Some(name)
                {
                    *current = color;
                    updated += 1;
                }
            }
        }
        Some(updated)
    }
}

fn rule_blocks_of(segments: &mut [Segment]) -> impl Iterator<Item = &mut RuleBlock> {
    segments.iter_mut().filter_map(|segment| match segment {
        Segment::Rule(block) => Some(block),
        Segment::Comment(_) => None,
    })
}

/// Rule blocks whose leaf marker sits at or below `group`.
fn blocks_within<'a>(
    segments: &'a mut [Segment],
    groups: &'a BlockGroupTree,
    group: GroupId,
) -> impl Iterator<Item = &'a mut RuleBlock> {
    rule_blocks_of(segments).filter(move |block| block.group.is_some_and(|leaf| groups.is_within(leaf, group)))
}
