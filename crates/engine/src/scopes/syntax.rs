//! Scopes defined by syntax node kinds.
//!
//! A language's configuration maps a scope name to node patterns:
//!
//! * `kind` matches named nodes of that kind;
//! * `parent.kind` matches `kind` nodes directly under a `parent` node;
//! * `parent.*` matches any named child of a `parent` node.
//!
//! A matched node whose parent is listed in `wrapping-parents` (such as
//! `export_statement`) is widened to the parent's range.

use pinpoint_primitives::{Direction, Position, Range};
use pinpoint_syntax::{NodeId, SyntaxTree};
use rustc_hash::FxHashSet;

use super::{ScopeHandler, ScopeIteratorRequirements, ScopeType, TargetScope};
use crate::config::ScopeConfig;
use crate::host::TextEditor;
use crate::targets::{RemovalStyle, Target, TargetKind};

#[derive(Debug, Clone, PartialEq, Eq)]
enum NodePattern {
	Kind(String),
	Child { parent: String, kind: String },
	AnyChild { parent: String },
}

impl NodePattern {
	fn parse(pattern: &str) -> Self {
		match pattern.split_once('.') {
			None => Self::Kind(pattern.to_string()),
			Some((parent, "*")) => Self::AnyChild {
				parent: parent.to_string(),
			},
			Some((parent, kind)) => Self::Child {
				parent: parent.to_string(),
				kind: kind.to_string(),
			},
		}
	}

	fn matches(&self, tree: &SyntaxTree, node: NodeId) -> bool {
		if !tree.is_named(node) {
			return false;
		}
		let parent_kind = || tree.parent(node).map(|parent| tree.kind(parent));
		match self {
			Self::Kind(kind) => tree.kind(node) == kind,
			Self::Child { parent, kind } => tree.kind(node) == kind && parent_kind() == Some(parent.as_str()),
			Self::AnyChild { parent } => parent_kind() == Some(parent.as_str()),
		}
	}
}

/// Scopes of one configured syntax scope type.
pub struct SyntaxScopeHandler {
	scope_type: ScopeType,
	name: String,
	patterns: Vec<NodePattern>,
	wrapping_parents: Vec<String>,
	delimiter: String,
}

impl SyntaxScopeHandler {
	pub fn new(name: &str, config: &ScopeConfig) -> Self {
		Self {
			scope_type: ScopeType::simple(name),
			name: name.to_string(),
			patterns: config.nodes.iter().map(|p| NodePattern::parse(p)).collect(),
			wrapping_parents: config.wrapping_parents.clone(),
			delimiter: config.delimiter.clone(),
		}
	}

	fn domain_of(&self, tree: &SyntaxTree, node: NodeId) -> Range {
		match tree.parent(node) {
			Some(parent) if self.wrapping_parents.iter().any(|kind| kind == tree.kind(parent)) => tree.range(parent),
			_ => tree.range(node),
		}
	}
}

impl ScopeHandler for SyntaxScopeHandler {
	fn scope_type(&self) -> &ScopeType {
		&self.scope_type
	}

	fn iteration_scope_type(&self) -> ScopeType {
		ScopeType::SyntaxIteration(self.name.clone())
	}

	fn is_hierarchical(&self) -> bool {
		true
	}

	fn generate_scope_candidates<'a>(
		&'a self,
		editor: &'a dyn TextEditor,
		_position: Position,
		_direction: Direction,
		_hints: &ScopeIteratorRequirements,
	) -> Box<dyn Iterator<Item = TargetScope> + 'a> {
		let Some(tree) = editor.syntax_tree() else {
			return Box::new(std::iter::empty());
		};
		let id = editor.id();
		let mut seen = FxHashSet::default();
		let scopes: Vec<TargetScope> = tree
			.nodes()
			.filter(|&node| self.patterns.iter().any(|pattern| pattern.matches(tree, node)))
			.map(|node| self.domain_of(tree, node))
			.filter(|domain| seen.insert(*domain))
			.map(|domain| {
				let kind = TargetKind::Scope {
					delimiter: self.delimiter.clone(),
					removal: RemovalStyle::Smart,
				};
				TargetScope::new(id, domain, Target::new(id, domain, false, kind))
			})
			.collect();
		Box::new(scopes.into_iter())
	}
}

/// Regions that bound enumeration of a syntax scope: configured iteration
/// nodes with their bracketing punctuation trimmed, and the root node.
pub struct SyntaxIterationScopeHandler {
	scope_type: ScopeType,
	kinds: Vec<String>,
}

impl SyntaxIterationScopeHandler {
	pub fn new(name: &str, config: &ScopeConfig) -> Self {
		Self {
			scope_type: ScopeType::SyntaxIteration(name.to_string()),
			kinds: config.iteration.clone(),
		}
	}
}

/// The node's range without leading and trailing anonymous children.
fn inner_range(tree: &SyntaxTree, node: NodeId) -> Range {
	let range = tree.range(node);
	let children: Vec<NodeId> = tree.children(node).collect();
	let first_named = children.iter().position(|&child| tree.is_named(child));
	let last_named = children.iter().rposition(|&child| tree.is_named(child));
	match (first_named, last_named) {
		(Some(first), Some(last)) => {
			let start = if first > 0 {
				tree.range(children[first - 1]).end
			} else {
				range.start
			};
			let end = children.get(last + 1).map_or(range.end, |&child| tree.range(child).start);
			Range::new(start, end)
		}
		// Only punctuation, e.g. `{}`: the gap between the first and last token.
		_ if children.len() >= 2 => Range::new(
			tree.range(children[0]).end,
			tree.range(children[children.len() - 1]).start,
		),
		_ => range,
	}
}

impl ScopeHandler for SyntaxIterationScopeHandler {
	fn scope_type(&self) -> &ScopeType {
		&self.scope_type
	}

	fn iteration_scope_type(&self) -> ScopeType {
		self.scope_type.clone()
	}

	fn is_hierarchical(&self) -> bool {
		true
	}

	fn generate_scope_candidates<'a>(
		&'a self,
		editor: &'a dyn TextEditor,
		_position: Position,
		_direction: Direction,
		_hints: &ScopeIteratorRequirements,
	) -> Box<dyn Iterator<Item = TargetScope> + 'a> {
		let Some(tree) = editor.syntax_tree() else {
			return Box::new(std::iter::empty());
		};
		let id = editor.id();
		let root = tree.root();
		let scopes: Vec<TargetScope> = tree
			.nodes()
			.filter(|&node| node == root || self.kinds.iter().any(|kind| kind == tree.kind(node)))
			.map(|node| {
				let range = if node == root { tree.range(node) } else { inner_range(tree, node) };
				TargetScope::new(id, tree.range(node), Target::raw(id, range, false))
			})
			.collect();
		Box::new(scopes.into_iter())
	}
}
