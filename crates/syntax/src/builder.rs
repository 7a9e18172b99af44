use pinpoint_primitives::{Position, Range};
use smallvec::SmallVec;
use thiserror::Error;

use crate::tree::{NodeId, SyntaxNode, SyntaxTree};

/// Errors raised when a builder is finished in an inconsistent state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
	#[error("no root node was opened")]
	Empty,
	#[error("{open} node(s) left open, innermost `{kind}`")]
	Unclosed { open: usize, kind: &'static str },
	#[error("close called with no open node")]
	UnbalancedClose,
	#[error("a second root `{kind}` was opened")]
	MultipleRoots { kind: &'static str },
	#[error("node `{kind}` ends at {end}, before its start {start}")]
	InvertedRange {
		kind: &'static str,
		start: Position,
		end: Position,
	},
}

/// Builds a [`SyntaxTree`] from nested open/close calls.
///
/// Nodes are appended in pre-order as they are opened, which is the layout
/// [`SyntaxTree`] expects. Errors are deferred to [`TreeBuilder::finish`] so
/// construction can be chained.
///
/// ```
/// use pinpoint_primitives::{Position, Range};
/// use pinpoint_syntax::TreeBuilder;
///
/// let tree = TreeBuilder::new()
/// 	.open("program", Position::new(0, 0))
/// 	.leaf("identifier", Range::from_coords(0, 0, 0, 3))
/// 	.close(Position::new(0, 3))
/// 	.finish()
/// 	.unwrap();
/// assert_eq!(tree.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct TreeBuilder {
	nodes: Vec<SyntaxNode>,
	stack: Vec<NodeId>,
	pending_field: Option<&'static str>,
	error: Option<BuildError>,
}

impl TreeBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Labels the next node pushed with a field name.
	pub fn field(&mut self, name: &'static str) -> &mut Self {
		self.pending_field = Some(name);
		self
	}

	/// Opens a named node starting at `start`.
	pub fn open(&mut self, kind: &'static str, start: Position) -> &mut Self {
		let id = self.push(kind, Range::empty(start), true);
		if let Some(id) = id {
			self.stack.push(id);
		}
		self
	}

	/// Closes the innermost open node at `end`.
	pub fn close(&mut self, end: Position) -> &mut Self {
		let Some(id) = self.stack.pop() else {
			self.fail(BuildError::UnbalancedClose);
			return self;
		};
		let node = &mut self.nodes[id.idx()];
		if end < node.range.start {
			let err = BuildError::InvertedRange {
				kind: node.kind,
				start: node.range.start,
				end,
			};
			self.fail(err);
			return self;
		}
		node.range.end = end;
		self
	}

	/// Adds a named childless node.
	pub fn leaf(&mut self, kind: &'static str, range: Range) -> &mut Self {
		self.push(kind, range, true);
		self
	}

	/// Adds an anonymous childless node, such as punctuation.
	pub fn token(&mut self, kind: &'static str, range: Range) -> &mut Self {
		self.push(kind, range, false);
		self
	}

	/// Opens a node whose named flag is given explicitly.
	pub fn open_with(&mut self, kind: &'static str, start: Position, is_named: bool) -> &mut Self {
		if let Some(id) = self.push(kind, Range::empty(start), is_named) {
			self.stack.push(id);
		}
		self
	}

	/// Consumes the builder state and returns the finished tree.
	pub fn finish(&mut self) -> Result<SyntaxTree, BuildError> {
		if let Some(err) = self.error.take() {
			return Err(err);
		}
		if let Some(&innermost) = self.stack.last() {
			return Err(BuildError::Unclosed {
				open: self.stack.len(),
				kind: self.nodes[innermost.idx()].kind,
			});
		}
		if self.nodes.is_empty() {
			return Err(BuildError::Empty);
		}
		tracing::trace!(nodes = self.nodes.len(), "syntax.tree.built");
		Ok(SyntaxTree {
			nodes: std::mem::take(&mut self.nodes),
		})
	}

	fn push(&mut self, kind: &'static str, range: Range, is_named: bool) -> Option<NodeId> {
		let parent = self.stack.last().copied();
		if parent.is_none() && !self.nodes.is_empty() {
			self.fail(BuildError::MultipleRoots { kind });
			return None;
		}
		let id = NodeId(self.nodes.len() as u32);
		self.nodes.push(SyntaxNode {
			kind,
			range,
			is_named,
			field: self.pending_field.take(),
			parent,
			children: SmallVec::new(),
		});
		if let Some(parent) = parent {
			self.nodes[parent.idx()].children.push(id);
		}
		Some(id)
	}

	fn fail(&mut self, err: BuildError) {
		self.error.get_or_insert(err);
	}
}
