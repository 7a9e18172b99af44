use std::rc::Rc;

use pinpoint_primitives::{Direction, Position, Range};

use super::{ScopeHandler, ScopeIteratorRequirements, ScopeType, TargetScope, line_wise};
use crate::host::TextEditor;
use crate::targets::Target;
use crate::tokenizer::Tokenizer;

/// Tokens as produced by the [`Tokenizer`], one line at a time.
pub struct TokenScopeHandler {
	scope_type: ScopeType,
	tokenizer: Rc<Tokenizer>,
}

impl TokenScopeHandler {
	pub fn new(tokenizer: Rc<Tokenizer>) -> Self {
		Self {
			scope_type: ScopeType::simple("token"),
			tokenizer,
		}
	}
}

impl ScopeHandler for TokenScopeHandler {
	fn scope_type(&self) -> &ScopeType {
		&self.scope_type
	}

	fn iteration_scope_type(&self) -> ScopeType {
		ScopeType::simple("line")
	}

	fn generate_scope_candidates<'a>(
		&'a self,
		editor: &'a dyn TextEditor,
		position: Position,
		direction: Direction,
		_hints: &ScopeIteratorRequirements,
	) -> Box<dyn Iterator<Item = TargetScope> + 'a> {
		let id = editor.id();
		let ranges = line_wise(editor, position, direction, move |line| {
			self.tokenizer
				.tokenize(&line.text)
				.into_iter()
				.map(|token| Range::from_coords(line.line_number, token.start, line.line_number, token.end))
				.collect()
		});
		Box::new(ranges.map(move |range| TargetScope::new(id, range, Target::token(id, range))))
	}

	/// Identifiers win over punctuation; otherwise no preference.
	fn is_preferred_over(&self, editor: &dyn TextEditor, a: &TargetScope, b: &TargetScope) -> Option<bool> {
		let doc = editor.document();
		let a_ident = self.tokenizer.is_identifier(&doc.get_text(Some(a.domain)));
		let b_ident = self.tokenizer.is_identifier(&doc.get_text(Some(b.domain)));
		match (a_ident, b_ident) {
			(true, false) => Some(true),
			(false, true) => Some(false),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use pinpoint_primitives::{DocumentId, TextDocument};
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::host::{EditorId, MemoryEditor};
	use crate::scopes::{preferred_scope, scope_relative_to_position, scopes_touching_position};

	fn setup(text: &str) -> (TokenScopeHandler, MemoryEditor) {
		let tokenizer = Rc::new(Tokenizer::new(&["_".to_string()]).unwrap());
		let editor = MemoryEditor::new(EditorId(1), TextDocument::new(DocumentId(1), "plaintext", text));
		(TokenScopeHandler::new(tokenizer), editor)
	}

	fn text_of(editor: &MemoryEditor, scope: &TargetScope) -> String {
		editor.document().get_text(Some(scope.domain))
	}

	#[test]
	fn test_touching_prefers_identifier() {
		let (handler, editor) = setup("foo. bar");
		let touching = scopes_touching_position(&handler, &editor, Position::new(0, 3));
		assert_eq!(touching.len(), 2);
		let preferred = preferred_scope(&handler, &editor, touching).unwrap();
		assert_eq!(text_of(&editor, &preferred), "foo");
	}

	#[test]
	fn test_next_token_across_lines() {
		let (handler, editor) = setup("a\n\n  b c");
		let next = scope_relative_to_position(&handler, &editor, Position::new(0, 1), 1, Direction::Forward).unwrap();
		assert_eq!(next.domain, Range::from_coords(2, 2, 2, 3));
		let prev = scope_relative_to_position(&handler, &editor, Position::new(2, 2), 1, Direction::Backward).unwrap();
		assert_eq!(prev.domain, Range::from_coords(0, 0, 0, 1));
	}
}
