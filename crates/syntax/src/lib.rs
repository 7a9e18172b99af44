//! Syntax trees stored as flat arenas.
//!
//! Nodes live in a single vector and refer to each other by [`NodeId`], so
//! parent and child links never form ownership cycles. Node ranges are
//! expressed in document [`Position`]s (UTF-16 columns) rather than bytes,
//! which lets scope handlers compare them directly against selections.
//!
//! Trees are built either by hand through [`TreeBuilder`] or, with the
//! `tree-sitter` feature, converted from a parsed tree-sitter tree.
//!
//! [`Position`]: pinpoint_primitives::Position

/// Incremental construction of arena trees.
mod builder;
/// Conversion from tree-sitter parse trees.
#[cfg(feature = "tree-sitter")]
mod convert;
/// Arena tree storage and traversal.
mod tree;

pub use builder::{BuildError, TreeBuilder};
#[cfg(feature = "tree-sitter")]
pub use convert::from_tree_sitter;
pub use tree::{NodeId, SyntaxNode, SyntaxTree};
