use pinpoint_primitives::{Direction, Position};

use super::{ScopeHandler, ScopeIteratorRequirements, ScopeType, TargetScope};
use crate::host::TextEditor;
use crate::targets::delimiters::shrink_to_content;
use crate::targets::{Target, TargetKind};

/// The whole document; its content excludes leading and trailing blank space.
pub struct DocumentScopeHandler {
	scope_type: ScopeType,
}

impl DocumentScopeHandler {
	pub fn new() -> Self {
		Self {
			scope_type: ScopeType::simple("document"),
		}
	}
}

impl Default for DocumentScopeHandler {
	fn default() -> Self {
		Self::new()
	}
}

impl ScopeHandler for DocumentScopeHandler {
	fn scope_type(&self) -> &ScopeType {
		&self.scope_type
	}

	fn iteration_scope_type(&self) -> ScopeType {
		ScopeType::simple("document")
	}

	fn generate_scope_candidates<'a>(
		&'a self,
		editor: &'a dyn TextEditor,
		_position: Position,
		_direction: Direction,
		_hints: &ScopeIteratorRequirements,
	) -> Box<dyn Iterator<Item = TargetScope> + 'a> {
		let id = editor.id();
		let doc = editor.document();
		let domain = doc.range();
		let content = match shrink_to_content(doc, domain) {
			content if content.is_empty() => domain,
			content => content,
		};
		Box::new(std::iter::once(TargetScope::new(
			id,
			domain,
			Target::new(id, content, false, TargetKind::Document),
		)))
	}
}
