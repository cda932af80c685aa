//! Shared data model for loot filter scripts.

pub mod groups;
pub mod items;
pub mod script;
pub mod theme;

pub use groups::{BlockGroup, BlockGroupTree, GroupId, TriState};
pub use items::*;
pub use script::{CommentBlock, RuleBlock, Script, Segment};
pub use theme::{ThemeComponent, ThemeComponents};
