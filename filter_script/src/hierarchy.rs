//! Incremental construction of the block-group tree from path comments.

use filter_data::{BlockGroupTree, GroupId};
use log::trace;

use crate::TranslateError;

/// Grows a [`BlockGroupTree`] one path at a time.
///
/// The builder holds a working root only between [`initialise`] and
/// [`cleanup`]; one builder serves one parse at a time.
///
/// [`initialise`]: BlockGroupHierarchyBuilder::initialise
/// [`cleanup`]: BlockGroupHierarchyBuilder::cleanup
#[derive(Debug, Default)]
pub struct BlockGroupHierarchyBuilder {
    root: Option<GroupId>,
}

impl BlockGroupHierarchyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initialise(&mut self, root: GroupId) {
        self.root = Some(root);
    }

    pub fn cleanup(&mut self) {
        self.root = None;
    }

    pub fn is_initialised(&self) -> bool {
        self.root.is_some()
    }

    /// Walk `segments` down from the working root, creating missing groups,
    /// and hang a fresh leaf marker under the last one.
    ///
    /// A leading `~` marks a segment advanced; advanced is inherited by
    /// everything beneath an advanced group. A group that already exists keeps
    /// its show/enabled state when it agrees with the caller and becomes
    /// indeterminate when it does not.
    ///
    /// Returns the leaf marker. Its parent is the named group the calling
    /// block is tagged with.
    ///
    /// # Errors
    /// [`TranslateError::HierarchyNotInitialised`] outside an
    /// `initialise`/`cleanup` bracket.
    pub fn integrate<S: AsRef<str>>(
        &self,
        tree: &mut BlockGroupTree,
        segments: &[S],
        show: bool,
        enabled: bool,
    ) -> Result<GroupId, TranslateError> {
        let mut parent = self.root.ok_or(TranslateError::HierarchyNotInitialised)?;

        for segment in segments {
            let raw = segment.as_ref().trim();
            let (name, marked) = match raw.strip_prefix('~') {
                Some(rest) => (rest.trim_start(), true),
                None => (raw, false),
            };
            if name.is_empty() {
                continue;
            }
            let advanced = marked || tree[parent].advanced;

            parent = match tree.find_child(parent, name) {
                Some(existing) => {
                    tree.widen(existing, show, enabled);
                    if advanced && !tree[existing].advanced {
                        tree.mark_advanced(existing);
                    }
                    existing
                },
                None => {
                    trace!("new block group '{name}' (advanced: {advanced})");
                    tree.add_child(parent, name, advanced, show, enabled)
                },
            };
        }

        let advanced = tree[parent].advanced;
        Ok(tree.add_child(parent, "", advanced, show, enabled))
    }
}
