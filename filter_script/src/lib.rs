//! filter_script: lossless translation between loot filter text and the
//! `filter_data` model.
//!
//! The pipeline for a whole file is:
//! - split lines (CRLF, LF and CR are all accepted),
//! - rewrite fully commented blocks into `ShowDisabled`/`HideDisabled` form,
//! - detect segment boundaries (script description, rule blocks, comment blocks),
//! - translate each segment, growing the block-group tree as path comments are met.
//!
//! Rendering runs the other way and always writes CRLF with four-space indents.

mod block;
mod boundary;
mod error;
mod hierarchy;
mod lines;
mod preprocess;
mod script;
mod settings;

pub use block::{parse_block, parse_comment_block, render_block, render_comment_block, replace_style_items_from_text};
pub use boundary::{Boundary, BoundaryKind, detect_boundaries};
pub use error::TranslateError;
pub use hierarchy::BlockGroupHierarchyBuilder;
pub use lines::split_lines;
pub use preprocess::{contains_legacy_sentinels, preprocess_disabled_blocks, strip_legacy_sentinels};
pub use script::ScriptTranslator;
pub use settings::{SentinelPolicy, TranslatorSettings};
