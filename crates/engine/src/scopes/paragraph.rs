use pinpoint_primitives::{Direction, Position, Range, TextDocument};

use super::{ScopeHandler, ScopeIteratorRequirements, ScopeType, TargetScope};
use crate::host::TextEditor;
use crate::targets::{Target, TargetKind};

/// Maximal runs of non-blank lines.
pub struct ParagraphScopeHandler {
	scope_type: ScopeType,
}

impl ParagraphScopeHandler {
	pub fn new() -> Self {
		Self {
			scope_type: ScopeType::simple("paragraph"),
		}
	}
}

impl Default for ParagraphScopeHandler {
	fn default() -> Self {
		Self::new()
	}
}

/// Returns `(full line range, trimmed content range)` for every paragraph.
fn paragraphs(doc: &TextDocument) -> Vec<(Range, Range)> {
	let mut found = Vec::new();
	let mut start: Option<usize> = None;
	let count = doc.line_count();
	for number in 0..=count {
		let blank = number == count || doc.line_at(number).is_empty_or_whitespace();
		match (start, blank) {
			(None, false) => start = Some(number),
			(Some(first), true) => {
				let first_line = doc.line_at(first);
				let last_line = doc.line_at(number - 1);
				found.push((
					Range::new(first_line.range.start, last_line.range.end),
					Range::new(first_line.trimmed_range().start, last_line.trimmed_range().end),
				));
				start = None;
			}
			_ => {}
		}
	}
	found
}

impl ScopeHandler for ParagraphScopeHandler {
	fn scope_type(&self) -> &ScopeType {
		&self.scope_type
	}

	fn iteration_scope_type(&self) -> ScopeType {
		ScopeType::simple("document")
	}

	fn generate_scope_candidates<'a>(
		&'a self,
		editor: &'a dyn TextEditor,
		position: Position,
		direction: Direction,
		_hints: &ScopeIteratorRequirements,
	) -> Box<dyn Iterator<Item = TargetScope> + 'a> {
		let id = editor.id();
		let mut found = paragraphs(editor.document());
		if direction.is_forward() {
			found.retain(|(domain, _)| domain.end >= position);
		} else {
			found.retain(|(domain, _)| domain.start <= position);
			found.reverse();
		}
		Box::new(found.into_iter().map(move |(domain, content)| {
			TargetScope::new(id, domain, Target::new(id, content, false, TargetKind::Paragraph))
		}))
	}
}
