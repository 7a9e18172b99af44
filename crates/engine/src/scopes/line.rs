use pinpoint_primitives::{Direction, Position};

use super::{ScopeHandler, ScopeIteratorRequirements, ScopeType, TargetScope};
use crate::host::TextEditor;
use crate::targets::Target;

/// Each document line. The domain is the full line; the target is its
/// trimmed content.
pub struct LineScopeHandler {
	scope_type: ScopeType,
}

impl LineScopeHandler {
	pub fn new() -> Self {
		Self {
			scope_type: ScopeType::simple("line"),
		}
	}
}

impl Default for LineScopeHandler {
	fn default() -> Self {
		Self::new()
	}
}

impl ScopeHandler for LineScopeHandler {
	fn scope_type(&self) -> &ScopeType {
		&self.scope_type
	}

	fn iteration_scope_type(&self) -> ScopeType {
		ScopeType::simple("paragraph")
	}

	fn generate_scope_candidates<'a>(
		&'a self,
		editor: &'a dyn TextEditor,
		position: Position,
		direction: Direction,
		_hints: &ScopeIteratorRequirements,
	) -> Box<dyn Iterator<Item = TargetScope> + 'a> {
		let id = editor.id();
		let doc = editor.document();
		let last = doc.line_count() - 1;
		let lines: Box<dyn Iterator<Item = usize>> = if direction.is_forward() {
			Box::new(position.line.min(last)..=last)
		} else {
			Box::new((0..=position.line.min(last)).rev())
		};
		Box::new(lines.map(move |number| {
			let line = doc.line_at(number);
			let content = if line.is_empty_or_whitespace() {
				line.range
			} else {
				line.trimmed_range()
			};
			TargetScope::new(id, line.range, Target::line(id, content))
		}))
	}
}

#[cfg(test)]
mod tests {
	use pinpoint_primitives::{DocumentId, Range, TextDocument};
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::host::{EditorId, MemoryEditor};
	use crate::scopes::{scope_relative_to_position, scopes_touching_position};

	#[test]
	fn test_line_content_is_trimmed() {
		let editor = MemoryEditor::new(EditorId(1), TextDocument::new(DocumentId(1), "plaintext", "a\n  bc  \nd"));
		let handler = LineScopeHandler::new();
		let touching = scopes_touching_position(&handler, &editor, Position::new(1, 0));
		assert_eq!(touching.len(), 1);
		assert_eq!(touching[0].domain, Range::from_coords(1, 0, 1, 6));
		assert_eq!(touching[0].targets[0].content_range, Range::from_coords(1, 2, 1, 4));
		let next = scope_relative_to_position(&handler, &editor, Position::new(1, 3), 1, Direction::Forward).unwrap();
		assert_eq!(next.domain.start.line, 2);
	}
}
