//! Delimiter pairs: brackets and quotes.

use pinpoint_primitives::{Direction, Position, Range};

use super::{Containment, ForceDirection, ScopeHandler, ScopeIteratorRequirements, ScopeType, TargetScope};
use crate::error::{CommandError, Result};
use crate::host::TextEditor;
use crate::targets::{Target, TargetKind};

pub mod delimiters;
pub mod occurrences;

use delimiters::DelimiterInfo;
use occurrences::{Pair, find_pairs, forced_pair};

/// Pairs of one delimiter kind or group.
pub struct SurroundingPairScopeHandler {
	scope_type: ScopeType,
	delimiter: String,
	delimiters: Vec<&'static DelimiterInfo>,
	force_direction: Option<ForceDirection>,
	require_strong_containment: bool,
	/// Syntax node kinds that are string literals.
	string_nodes: Vec<String>,
}

impl SurroundingPairScopeHandler {
	pub fn new(scope_type: ScopeType, string_nodes: Vec<String>) -> Result<Self> {
		let (delimiter, force_direction, require_strong_containment) = match &scope_type {
			ScopeType::SurroundingPair {
				delimiter,
				force_direction,
				require_strong_containment,
			} => (delimiter.clone(), *force_direction, *require_strong_containment),
			ScopeType::SurroundingPairInterior { delimiter } => (delimiter.clone(), None, false),
			other => {
				return Err(CommandError::InvalidCommand(format!(
					"{other} is not a surrounding pair scope"
				)));
			}
		};
		let delimiters = delimiters::resolve(&delimiter)
			.ok_or_else(|| CommandError::InvalidCommand(format!("unknown delimiter `{delimiter}`")))?;
		Ok(Self {
			scope_type,
			delimiter,
			delimiters,
			force_direction,
			require_strong_containment,
			string_nodes,
		})
	}

	/// Every pair in the editor, honouring forced direction at `position`.
	fn pairs(&self, editor: &dyn TextEditor, position: Position) -> Vec<Pair> {
		let doc = editor.document();
		let strings: Option<Vec<Range>> = editor
			.syntax_tree()
			.filter(|_| !self.string_nodes.is_empty())
			.map(|tree| {
				tree.nodes()
					.filter(|&node| self.string_nodes.iter().any(|kind| kind == tree.kind(node)))
					.map(|node| tree.range(node))
					.collect()
			});
		let mut pairs = find_pairs(doc, strings.as_deref(), &self.delimiters);
		if let Some(force) = self.force_direction
			&& let Some(forced) = forced_pair(doc, position, force, &self.delimiters)
		{
			let shares_delimiter =
				|pair: &Pair| [pair.open, pair.close].iter().any(|r| *r == forced.open || *r == forced.close);
			pairs.retain(|pair| !shares_delimiter(pair));
			pairs.push(forced);
		}
		pairs
	}
}

fn pair_target_scope(editor: &dyn TextEditor, pair: &Pair) -> TargetScope {
	let id = editor.id();
	let domain = pair.domain();
	let kind = TargetKind::SurroundingPair {
		interior: pair.interior(),
		boundary: [pair.open, pair.close],
	};
	TargetScope::new(id, domain, Target::new(id, domain, false, kind))
}

impl ScopeHandler for SurroundingPairScopeHandler {
	fn scope_type(&self) -> &ScopeType {
		&self.scope_type
	}

	fn iteration_scope_type(&self) -> ScopeType {
		ScopeType::SurroundingPairInterior {
			delimiter: self.delimiter.clone(),
		}
	}

	fn is_hierarchical(&self) -> bool {
		true
	}

	fn generate_scope_candidates<'a>(
		&'a self,
		editor: &'a dyn TextEditor,
		position: Position,
		_direction: Direction,
		hints: &ScopeIteratorRequirements,
	) -> Box<dyn Iterator<Item = TargetScope> + 'a> {
		let mut pairs = self.pairs(editor, position);
		if self.require_strong_containment && hints.containment == Some(Containment::Required) {
			pairs.retain(|pair| pair.interior().contains_position(position));
		}
		tracing::trace!(delimiter = %self.delimiter, pairs = pairs.len(), "Matched delimiter pairs");
		Box::new(pairs.into_iter().map(move |pair| pair_target_scope(editor, &pair)))
	}
}

/// Pair interiors, plus the whole document as the outermost region.
pub struct SurroundingPairInteriorScopeHandler {
	pairs: SurroundingPairScopeHandler,
}

impl SurroundingPairInteriorScopeHandler {
	pub fn new(scope_type: ScopeType, string_nodes: Vec<String>) -> Result<Self> {
		Ok(Self {
			pairs: SurroundingPairScopeHandler::new(scope_type, string_nodes)?,
		})
	}
}

impl ScopeHandler for SurroundingPairInteriorScopeHandler {
	fn scope_type(&self) -> &ScopeType {
		&self.pairs.scope_type
	}

	fn iteration_scope_type(&self) -> ScopeType {
		self.pairs.scope_type.clone()
	}

	fn is_hierarchical(&self) -> bool {
		true
	}

	fn generate_scope_candidates<'a>(
		&'a self,
		editor: &'a dyn TextEditor,
		position: Position,
		_direction: Direction,
		_hints: &ScopeIteratorRequirements,
	) -> Box<dyn Iterator<Item = TargetScope> + 'a> {
		let id = editor.id();
		let whole = editor.document().range();
		let document = TargetScope::new(id, whole, Target::raw(id, whole, false));
		let interiors = self.pairs.pairs(editor, position).into_iter().map(move |pair| {
			let interior = pair.interior();
			TargetScope::new(
				id,
				pair.domain(),
				Target::new(id, interior, false, TargetKind::Interior),
			)
		});
		Box::new(interiors.chain(std::iter::once(document)))
	}
}

#[cfg(test)]
mod tests {
	use pinpoint_primitives::{DocumentId, TextDocument};
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::host::{EditorId, MemoryEditor};
	use crate::scopes::{generate_scopes, iteration_scopes_touching_position, scopes_touching_position};

	fn editor(text: &str) -> MemoryEditor {
		MemoryEditor::new(EditorId(1), TextDocument::new(DocumentId(1), "plaintext", text))
	}

	fn pair_type(delimiter: &str, require_strong_containment: bool) -> ScopeType {
		ScopeType::SurroundingPair {
			delimiter: delimiter.to_string(),
			force_direction: None,
			require_strong_containment,
		}
	}

	#[test]
	fn test_minimal_containing_pair() {
		let ed = editor("f(a, [b, (c)])");
		let handler = SurroundingPairScopeHandler::new(pair_type("any", false), Vec::new()).unwrap();
		let touching = scopes_touching_position(&handler, &ed, Position::new(0, 7));
		assert_eq!(touching.len(), 1);
		assert_eq!(touching[0].domain, Range::from_coords(0, 5, 0, 13));
		let [open, close] = touching[0].targets[0].boundary().unwrap();
		assert_eq!(open.content_range, Range::from_coords(0, 5, 0, 6));
		assert_eq!(close.content_range, Range::from_coords(0, 12, 0, 13));
	}

	#[test]
	fn test_strong_containment_rejects_touching_delimiter() {
		let ed = editor("x (a) y");
		let weak = SurroundingPairScopeHandler::new(pair_type("parentheses", false), Vec::new()).unwrap();
		assert_eq!(scopes_touching_position(&weak, &ed, Position::new(0, 2)).len(), 1);
		let strong = SurroundingPairScopeHandler::new(pair_type("parentheses", true), Vec::new()).unwrap();
		assert!(scopes_touching_position(&strong, &ed, Position::new(0, 2)).is_empty());
		assert_eq!(scopes_touching_position(&strong, &ed, Position::new(0, 3)).len(), 1);
	}

	#[test]
	fn test_unknown_delimiter_is_rejected() {
		let result = SurroundingPairScopeHandler::new(pair_type("chevrons", false), Vec::new());
		assert!(matches!(result, Err(CommandError::InvalidCommand(_))));
	}

	#[test]
	fn test_interior_iteration_scope() {
		let ed = editor("a (b c) d");
		let handler =
			SurroundingPairInteriorScopeHandler::new(ScopeType::SurroundingPairInterior { delimiter: "any".into() }, Vec::new())
				.unwrap();
		let inside = iteration_scopes_touching_position(&handler, &ed, Position::new(0, 4));
		assert_eq!(inside[0].range, Range::from_coords(0, 3, 0, 6));
		let outside = iteration_scopes_touching_position(&handler, &ed, Position::new(0, 0));
		assert_eq!(outside[0].range, ed.document().range());
	}

	#[test]
	fn test_pair_spanning_document_comes_before_document() {
		let ed = editor("((a)(b))");
		let handler =
			SurroundingPairInteriorScopeHandler::new(ScopeType::SurroundingPairInterior { delimiter: "any".into() }, Vec::new())
				.unwrap();
		let outward: Vec<Range> = generate_scopes(
			&handler,
			&ed,
			Position::new(0, 5),
			Direction::Forward,
			ScopeIteratorRequirements {
				containment: Some(Containment::Required),
				..Default::default()
			},
		)
		.map(|scope| scope.targets[0].content_range)
		.collect();
		assert_eq!(outward, vec![Range::from_coords(0, 5, 0, 6), Range::from_coords(0, 1, 0, 7)]);
	}
}
