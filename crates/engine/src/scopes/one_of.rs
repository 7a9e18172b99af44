use pinpoint_primitives::{Direction, Position};

use super::{ScopeHandler, ScopeIteratorRequirements, ScopeType, TargetScope};
use crate::host::TextEditor;

/// Union of several scope types, treated as one hierarchical type.
pub struct OneOfScopeHandler {
	scope_type: ScopeType,
	handlers: Vec<Box<dyn ScopeHandler>>,
}

impl OneOfScopeHandler {
	pub fn new(scope_type: ScopeType, handlers: Vec<Box<dyn ScopeHandler>>) -> Self {
		Self { scope_type, handlers }
	}
}

impl ScopeHandler for OneOfScopeHandler {
	fn scope_type(&self) -> &ScopeType {
		&self.scope_type
	}

	fn iteration_scope_type(&self) -> ScopeType {
		ScopeType::OneOf {
			scope_types: self.handlers.iter().map(|handler| handler.iteration_scope_type()).collect(),
		}
	}

	fn is_hierarchical(&self) -> bool {
		true
	}

	fn generate_scope_candidates<'a>(
		&'a self,
		editor: &'a dyn TextEditor,
		position: Position,
		direction: Direction,
		hints: &ScopeIteratorRequirements,
	) -> Box<dyn Iterator<Item = TargetScope> + 'a> {
		let hints = *hints;
		Box::new(
			self.handlers
				.iter()
				.flat_map(move |handler| handler.generate_scope_candidates(editor, position, direction, &hints)),
		)
	}

	/// The first child with an opinion decides.
	fn is_preferred_over(&self, editor: &dyn TextEditor, a: &TargetScope, b: &TargetScope) -> Option<bool> {
		self.handlers
			.iter()
			.find_map(|handler| handler.is_preferred_over(editor, a, b))
	}
}
