//! IDE features: High-level APIs for editor integrations.
//!
//! This module sits between the resource graph (HIR) and an editor. Each
//! function answers one editor request from the current database.
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: Take data in, return data out
//! 2. **No protocol types**: Uses our own types, converted at the boundary
//! 3. **Composable**: Built on top of graph queries
//!
//! ## Usage
//!
//! The recommended way to use this module is through `AnalysisHost`:
//!
//! ```ignore
//! use skosttl::ide::AnalysisHost;
//!
//! let mut host = AnalysisHost::new();
//! host.load_directory(Path::new("vocabularies"), None, &CancellationToken::new())?;
//!
//! let analysis = host.analysis();
//! let outline = analysis.outline();
//! ```

mod analysis;
pub mod edits;
mod hover;
pub mod navigation;
mod outline;

pub use analysis::{Analysis, AnalysisError, AnalysisHost};
pub use edits::{InsertMode, TextEdit, insert_text, new_concept_snippet};
pub use hover::{HoverResult, hover};
pub use navigation::{
    NavigationTarget, find_implementations, find_references, goto_definition,
    intersection_resources,
};
pub use outline::{OutlineNode, build_outline, compare_nodes, default_icon, link_tree_nodes};
