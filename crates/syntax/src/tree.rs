use pinpoint_primitives::{Position, Range};
use smallvec::SmallVec;

/// Index of a node inside its [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
	#[inline]
	pub fn idx(self) -> usize {
		self.0 as usize
	}
}

/// A single node record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
	/// Grammar node type, e.g. `"return_statement"`.
	pub kind: &'static str,
	/// Extent of the node in the document.
	pub range: Range,
	/// False for punctuation and other anonymous tokens.
	pub is_named: bool,
	/// Field name under which the parent holds this node.
	pub field: Option<&'static str>,
	pub parent: Option<NodeId>,
	pub children: SmallVec<[NodeId; 4]>,
}

/// An immutable syntax tree.
///
/// Node `0` is always the root. Children appear in document order, and the
/// arena itself is in pre-order, so iterating [`SyntaxTree::nodes`] visits
/// parents before their descendants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree {
	pub(crate) nodes: Vec<SyntaxNode>,
}

impl SyntaxTree {
	pub fn root(&self) -> NodeId {
		NodeId(0)
	}

	/// Number of nodes, named and anonymous.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn node(&self, id: NodeId) -> &SyntaxNode {
		&self.nodes[id.idx()]
	}

	pub fn kind(&self, id: NodeId) -> &'static str {
		self.node(id).kind
	}

	pub fn range(&self, id: NodeId) -> Range {
		self.node(id).range
	}

	pub fn parent(&self, id: NodeId) -> Option<NodeId> {
		self.node(id).parent
	}

	pub fn is_named(&self, id: NodeId) -> bool {
		self.node(id).is_named
	}

	/// All children in document order, including anonymous ones.
	pub fn children(&self, id: NodeId) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
		self.node(id).children.iter().copied()
	}

	/// Named children in document order.
	pub fn named_children(&self, id: NodeId) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
		self.children(id).filter(|&child| self.is_named(child))
	}

	/// Returns the first child stored under `field`.
	pub fn child_for_field_name(&self, id: NodeId, field: &str) -> Option<NodeId> {
		self.children(id).find(|&child| self.node(child).field == Some(field))
	}

	/// Walks from `id` (exclusive) to the root.
	pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
		std::iter::successors(self.parent(id), |&node| self.parent(node))
	}

	/// Iterates every node id in pre-order.
	pub fn nodes(&self) -> impl ExactSizeIterator<Item = NodeId> + '_ {
		(0..self.nodes.len() as u32).map(NodeId)
	}

	/// Returns the smallest named node whose range contains `range`.
	///
	/// Ties between nested nodes with identical ranges resolve to the deepest.
	pub fn named_descendant_for_range(&self, range: Range) -> Option<NodeId> {
		let root = self.root();
		if !self.range(root).contains_range(&range) {
			return None;
		}
		let mut current = root;
		'descend: loop {
			for child in self.named_children(current) {
				if self.range(child).contains_range(&range) {
					current = child;
					continue 'descend;
				}
			}
			return Some(current);
		}
	}

	/// Returns every named node whose range contains `pos`, innermost first.
	pub fn named_nodes_at(&self, pos: Position) -> Vec<NodeId> {
		let Some(leaf) = self.named_descendant_for_range(Range::empty(pos)) else {
			return Vec::new();
		};
		std::iter::once(leaf)
			.chain(self.ancestors(leaf))
			.filter(|&node| self.is_named(node))
			.collect()
	}
}
