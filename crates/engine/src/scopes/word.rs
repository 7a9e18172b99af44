use std::rc::Rc;

use pinpoint_primitives::{Direction, Position, Range};

use super::{ScopeHandler, ScopeIteratorRequirements, ScopeType, TargetScope, line_wise};
use crate::host::TextEditor;
use crate::targets::{RemovalStyle, Target, TargetKind};
use crate::tokenizer::Tokenizer;

/// Sub-words of identifier tokens: `fooBar_baz` holds `foo`, `Bar` and `baz`.
///
/// Tokens that are not identifiers form a single word.
pub struct WordScopeHandler {
	scope_type: ScopeType,
	tokenizer: Rc<Tokenizer>,
}

impl WordScopeHandler {
	pub fn new(tokenizer: Rc<Tokenizer>) -> Self {
		Self {
			scope_type: ScopeType::simple("word"),
			tokenizer,
		}
	}
}

impl ScopeHandler for WordScopeHandler {
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
		let ranges = line_wise(editor, position, direction, move |line| {
			let n = line.line_number;
			let mut words = Vec::new();
			for token in self.tokenizer.tokenize(&line.text) {
				if self.tokenizer.is_identifier(token.text) {
					words.extend(
						self.tokenizer
							.split_words(token.text)
							.into_iter()
							.map(|(start, end)| Range::from_coords(n, token.start + start, n, token.start + end)),
					);
				} else {
					words.push(Range::from_coords(n, token.start, n, token.end));
				}
			}
			words
		});
		Box::new(ranges.map(move |range| {
			let kind = TargetKind::Scope {
				delimiter: String::new(),
				removal: RemovalStyle::Content,
			};
			TargetScope::new(id, range, Target::new(id, range, false, kind))
		}))
	}
}
