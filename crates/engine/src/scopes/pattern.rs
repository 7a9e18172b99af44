//! Scopes defined by a regular expression matched line by line.

use pinpoint_primitives::graphemes::byte_to_utf16;
use pinpoint_primitives::{Direction, Position, Range};

use super::{ScopeHandler, ScopeIteratorRequirements, ScopeType, TargetScope, line_wise};
use crate::host::TextEditor;
use crate::targets::{RemovalStyle, Target, TargetKind};

pub const NON_WHITESPACE_SEQUENCE: &str = r"\S+";

/// Scheme, then everything up to whitespace or a closing bracket, minus
/// trailing punctuation.
pub const URL: &str = r#"(?:https?|ftp|file)://[^\s<>"'()\[\]{}]*[^\s<>"'()\[\]{}.,;:!?]"#;

/// Matches of one pattern; matches never span a line break.
pub struct RegexScopeHandler {
	scope_type: ScopeType,
	regex: fancy_regex::Regex,
}

impl RegexScopeHandler {
	pub fn new(scope_type: ScopeType, pattern: &str) -> Result<Self, fancy_regex::Error> {
		Ok(Self {
			scope_type,
			regex: fancy_regex::Regex::new(pattern)?,
		})
	}

	fn matches(&self, text: &str) -> Vec<(usize, usize)> {
		let mut found = Vec::new();
		for m in self.regex.find_iter(text) {
			match m {
				Ok(m) if m.start() < m.end() => {
					found.push((byte_to_utf16(text, m.start()), byte_to_utf16(text, m.end())));
				}
				Ok(_) => {}
				Err(err) => {
					tracing::warn!(scope_type = %self.scope_type, error = %err, "Regex scope gave up on line");
					break;
				}
			}
		}
		found
	}
}

impl ScopeHandler for RegexScopeHandler {
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
			let n = line.line_number;
			self.matches(&line.text)
				.into_iter()
				.map(|(start, end)| Range::from_coords(n, start, n, end))
				.collect()
		});
		Box::new(ranges.map(move |range| {
			let kind = TargetKind::Scope {
				delimiter: " ".to_string(),
				removal: RemovalStyle::Token,
			};
			TargetScope::new(id, range, Target::new(id, range, false, kind))
		}))
	}
}
