use pinpoint_primitives::graphemes::graphemes_utf16;
use pinpoint_primitives::{Direction, Position, Range};

use super::{ScopeHandler, ScopeIteratorRequirements, ScopeType, TargetScope, line_wise};
use crate::host::TextEditor;
use crate::targets::{RemovalStyle, Target, TargetKind};

/// One grapheme cluster per scope. Line breaks are not characters.
pub struct CharacterScopeHandler {
	scope_type: ScopeType,
}

impl CharacterScopeHandler {
	pub fn new() -> Self {
		Self {
			scope_type: ScopeType::simple("character"),
		}
	}
}

impl Default for CharacterScopeHandler {
	fn default() -> Self {
		Self::new()
	}
}

impl ScopeHandler for CharacterScopeHandler {
	fn scope_type(&self) -> &ScopeType {
		&self.scope_type
	}

	fn iteration_scope_type(&self) -> ScopeType {
		ScopeType::simple("token")
	}

	fn generate_scope_candidates<'a>(
		&'a self,
		editor: &'a dyn TextEditor,
		position: Position,
		direction: Direction,
		_hints: &ScopeIteratorRequirements,
	) -> Box<dyn Iterator<Item = TargetScope> + 'a> {
		let id = editor.id();
		let ranges = line_wise(editor, position, direction, |line| {
			graphemes_utf16(&line.text)
				.map(|g| Range::from_coords(line.line_number, g.start, line.line_number, g.end))
				.collect()
		});
		Box::new(ranges.map(move |range| {
			let kind = TargetKind::Scope {
				delimiter: String::new(),
				removal: RemovalStyle::Content,
			};
			TargetScope::new(id, range, Target::new(id, range, false, kind))
		}))
	}

	/// Prefer a non-whitespace character over whitespace.
	fn is_preferred_over(&self, editor: &dyn TextEditor, a: &TargetScope, b: &TargetScope) -> Option<bool> {
		let doc = editor.document();
		let a_space = doc.get_text(Some(a.domain)).trim().is_empty();
		let b_space = doc.get_text(Some(b.domain)).trim().is_empty();
		match (a_space, b_space) {
			(false, true) => Some(true),
			(true, false) => Some(false),
			_ => None,
		}
	}
}
