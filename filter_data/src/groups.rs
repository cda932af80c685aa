//! Block groups: a tree of hierarchical tags attached to rule blocks.
//!
//! Nodes live in an arena owned by [`BlockGroupTree`] and refer to each other
//! by [`GroupId`]. A node is always pushed after its parent, so walking the
//! arena backwards visits children before parents; [`BlockGroupTree::recompute`]
//! relies on that.
//!
//! Nameless nodes are leaf markers. Each rule block that carries a group path
//! gets its own marker under the named node it was tagged with, so the marker
//! holds that block's show/enabled state and the named nodes above aggregate
//! their markers.

use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Handle to a node inside a [`BlockGroupTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(usize);

impl GroupId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A checkbox value that also represents "some of each".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriState {
    Checked,
    Unchecked,
    Indeterminate,
}

impl TriState {
    /// Keep the value when `incoming` agrees, otherwise widen to indeterminate.
    pub fn widen(self, incoming: bool) -> Self {
        if self == TriState::from(incoming) { self } else { TriState::Indeterminate }
    }

    /// Summarise a set of child states. `None` when there are no children.
    pub fn aggregate<I: IntoIterator<Item = TriState>>(states: I) -> Option<TriState> {
        let mut states = states.into_iter();
        let first = states.next()?;
        Some(states.fold(first, |acc, state| if acc == state { acc } else { TriState::Indeterminate }))
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        if value { TriState::Checked } else { TriState::Unchecked }
    }
}

impl std::fmt::Display for TriState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TriState::Checked => "x",
            TriState::Unchecked => " ",
            TriState::Indeterminate => "-",
        })
    }
}

/// One node of the block-group tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockGroup {
    pub name: String,
    pub parent: Option<GroupId>,
    pub children: Vec<GroupId>,
    pub advanced: bool,
    pub show: TriState,
    pub enabled: TriState,
}

impl BlockGroup {
    pub fn is_leaf_marker(&self) -> bool {
        self.name.is_empty() && self.parent.is_some()
    }
}

/// Arena of block groups rooted at a single `Root` node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockGroupTree {
    nodes: Vec<BlockGroup>,
}

impl Default for BlockGroupTree {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockGroupTree {
    pub const ROOT_NAME: &'static str = "Root";

    pub fn new() -> Self {
        Self {
            nodes: vec![BlockGroup {
                name: Self::ROOT_NAME.to_string(),
                parent: None,
                children: Vec::new(),
                advanced: false,
                show: TriState::Checked,
                enabled: TriState::Checked,
            }],
        }
    }

    pub fn root(&self) -> GroupId {
        GroupId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    pub fn get(&self, id: GroupId) -> Option<&BlockGroup> {
        self.nodes.get(id.0)
    }

    /// Named children of `parent`, skipping leaf markers.
    pub fn named_children(&self, parent: GroupId) -> impl Iterator<Item = GroupId> + '_ {
        self[parent].children.iter().copied().filter(|child| !self[*child].is_leaf_marker())
    }

    /// Find the named child of `parent` whose name matches exactly.
    pub fn find_child(&self, parent: GroupId, name: &str) -> Option<GroupId> {
        self.named_children(parent).find(|child| self[*child].name == name)
    }

    /// Attach a new node under `parent`. An empty name creates a leaf marker.
    pub fn add_child(&mut self, parent: GroupId, name: &str, advanced: bool, show: bool, enabled: bool) -> GroupId {
        let id = GroupId(self.nodes.len());
        self.nodes.push(BlockGroup {
            name: name.to_string(),
            parent: Some(parent),
            children: Vec::new(),
            advanced,
            show: show.into(),
            enabled: enabled.into(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn widen(&mut self, id: GroupId, show: bool, enabled: bool) {
        let node = &mut self.nodes[id.0];
        node.show = node.show.widen(show);
        node.enabled = node.enabled.widen(enabled);
    }

    /// Turn `advanced` on for a node and everything beneath it.
    pub fn mark_advanced(&mut self, id: GroupId) {
        for node in self.subtree(id) {
            self.nodes[node.0].advanced = true;
        }
    }

    /// `id` and all of its descendants, parents before children.
    pub fn subtree(&self, id: GroupId) -> Vec<GroupId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self[next].children.iter().rev().copied());
        }
        out
    }

    /// True when `id` is `ancestor` or lies beneath it.
    pub fn is_within(&self, id: GroupId, ancestor: GroupId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self[node].parent;
        }
        false
    }

    /// Names of the named groups from the top of the tree down to `id`,
    /// excluding the root and leaf markers.
    pub fn path(&self, id: GroupId) -> Vec<&str> {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            let group = &self[node];
            if group.parent.is_some() && !group.name.is_empty() {
                names.push(group.name.as_str());
            }
            current = group.parent;
        }
        names.reverse();
        names
    }

    /// The path comment text for `id`: names joined with `" - "`, with `~` in
    /// front of the node where the chain turns advanced.
    ///
    /// ```
    /// use filter_data::BlockGroupTree;
    ///
    /// let mut tree = BlockGroupTree::new();
    /// let root = tree.root();
    /// let a = tree.add_child(root, "Currency", false, true, true);
    /// let b = tree.add_child(a, "Rare", true, true, true);
    /// let c = tree.add_child(b, "Orbs", true, true, true);
    /// assert_eq!(tree.path_label(c).as_deref(), Some("Currency - ~Rare - Orbs"));
    /// assert_eq!(tree.path_label(root), None);
    /// ```
    pub fn path_label(&self, id: GroupId) -> Option<String> {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            let group = &self[node];
            let Some(parent) = group.parent else { break };
            if !group.name.is_empty() {
                if group.advanced && !self[parent].advanced {
                    segments.push(format!("~{}", group.name));
                } else {
                    segments.push(group.name.clone());
                }
            }
            current = Some(parent);
        }
        if segments.is_empty() {
            return None;
        }
        segments.reverse();
        Some(segments.join(" - "))
    }

    /// Assign `show` to a node and all of its descendants.
    pub fn set_show(&mut self, id: GroupId, show: bool) {
        for node in self.subtree(id) {
            self.nodes[node.0].show = show.into();
        }
    }

    /// Assign `enabled` to a node and all of its descendants.
    pub fn set_enabled(&mut self, id: GroupId, enabled: bool) {
        for node in self.subtree(id) {
            self.nodes[node.0].enabled = enabled.into();
        }
    }

    /// Recompute every node with children from those children, bottom-up.
    /// Nodes without children keep their own state.
    pub fn recompute(&mut self) {
        for index in (0..self.nodes.len()).rev() {
            let children = &self.nodes[index].children;
            let show = TriState::aggregate(children.iter().map(|c| self.nodes[c.0].show));
            let enabled = TriState::aggregate(children.iter().map(|c| self.nodes[c.0].enabled));
            let node = &mut self.nodes[index];
            if let Some(show) = show {
                node.show = show;
            }
            if let Some(enabled) = enabled {
                node.enabled = enabled;
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (GroupId, &BlockGroup)> {
        self.nodes.iter().enumerate().map(|(i, node)| (GroupId(i), node))
    }
}

impl Index<GroupId> for BlockGroupTree {
    type Output = BlockGroup;

    fn index(&self, id: GroupId) -> &BlockGroup {
        &self.nodes[id.0]
    }
}
