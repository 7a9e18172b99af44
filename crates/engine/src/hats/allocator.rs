use pinpoint_primitives::{Position, Range, graphemes};
use rustc_hash::FxHashSet;

use super::{HatKey, normalize_grapheme};
use crate::error::Result;
use crate::host::{EditorId, Editors};
use crate::scopes::ScopeRegistry;

/// A hat placed on one visible token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HatAssignment {
	pub key: HatKey,
	pub editor: EditorId,
	/// The whole token.
	pub range: Range,
	/// The grapheme the hat sits on.
	pub grapheme_range: Range,
}

struct Candidate {
	editor: EditorId,
	range: Range,
	/// (not in active editor, line distance, column distance) from the primary cursor.
	rank: (bool, usize, usize),
	graphemes: Vec<(String, Range)>,
}

/// Assigns hats to the tokens visible in every editor.
///
/// Tokens nearest the active editor's primary cursor are served first. Each
/// takes the cheapest style for which one of its graphemes is still free;
/// styles are tried in ascending penalty, graphemes left to right. Tokens
/// that find nothing free stay bare.
pub fn allocate_hats(editors: &Editors, registry: &ScopeRegistry) -> Result<Vec<HatAssignment>> {
	let mut styles: Vec<_> = registry.config().hat_styles.iter().collect();
	styles.sort_by_key(|style| style.penalty);

	let active = editors.active_id().ok();
	let mut candidates = Vec::new();
	for id in editors.ids() {
		let editor = editors.get(id)?;
		let doc = editor.document();
		let tokenizer = registry.tokenizer(doc.language_id())?;
		let cursor = editor.selections().first().map(|sel| sel.active).unwrap_or_default();
		let mut seen = FxHashSet::default();

		for visible in editor.visible_ranges() {
			let visible = doc.validate_range(*visible);
			for line in visible.start.line..=visible.end.line {
				let text = doc.line_at(line).text;
				for token in tokenizer.tokenize(&text) {
					let range = Range::from_coords(line, token.start, line, token.end);
					if !visible.contains_range(&range) || !seen.insert(range) {
						continue;
					}
					let graphemes = graphemes::graphemes_utf16(token.text)
						.map(|g| {
							let start = Position::new(line, token.start + g.start);
							let end = Position::new(line, token.start + g.end);
							(normalize_grapheme(g.text), Range::new(start, end))
						})
						.collect();
					candidates.push(Candidate {
						editor: id,
						range,
						rank: (Some(id) != active, line.abs_diff(cursor.line), token.start.abs_diff(cursor.character)),
						graphemes,
					});
				}
			}
		}
	}
	candidates.sort_by_key(|candidate| (candidate.rank, candidate.editor, candidate.range.start));

	let mut taken: FxHashSet<HatKey> = FxHashSet::default();
	let mut assignments = Vec::new();
	for candidate in candidates {
		let free = styles.iter().find_map(|style| {
			candidate.graphemes.iter().find_map(|(character, range)| {
				let key = HatKey {
					hat_style: style.name.clone(),
					character: character.clone(),
				};
				(!taken.contains(&key)).then_some((key, *range))
			})
		});
		if let Some((key, grapheme_range)) = free {
			taken.insert(key.clone());
			assignments.push(HatAssignment {
				key,
				editor: candidate.editor,
				range: candidate.range,
				grapheme_range,
			});
		}
	}
	tracing::debug!(hats = assignments.len(), "Allocated hats");
	Ok(assignments)
}
