use pinpoint_primitives::{Position, TextDocument};

use crate::builder::{BuildError, TreeBuilder};
use crate::tree::SyntaxTree;

/// Copies a tree-sitter tree into an arena tree.
///
/// `document` must hold the exact text `tree` was parsed from; byte offsets
/// are translated to UTF-16 positions through its rope.
pub fn from_tree_sitter(tree: &tree_sitter::Tree, document: &TextDocument) -> Result<SyntaxTree, BuildError> {
	let rope = document.rope();
	let to_position = |byte: usize| -> Position {
		let byte = byte.min(rope.len_bytes());
		document.position_at(rope.char_to_utf16_cu(rope.byte_to_char(byte)))
	};

	let mut builder = TreeBuilder::new();
	let mut cursor = tree.walk();
	loop {
		let node = cursor.node();
		if let Some(field) = cursor.field_name() {
			builder.field(field);
		}
		builder.open_with(node.kind(), to_position(node.start_byte()), node.is_named());

		if cursor.goto_first_child() {
			continue;
		}

		// Close the leaf, then unwind until a sibling is available.
		builder.close(to_position(node.end_byte()));
		loop {
			if cursor.goto_next_sibling() {
				break;
			}
			if !cursor.goto_parent() {
				tracing::trace!(language = document.language_id(), "syntax.tree.converted");
				return builder.finish();
			}
			builder.close(to_position(cursor.node().end_byte()));
		}
	}
}
