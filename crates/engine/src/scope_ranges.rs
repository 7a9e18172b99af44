//! Scope ranges for visualization.
//!
//! Lists every scope of a type in an editor, with the content and removal
//! range of each of its targets, so a host can draw them. Iteration scopes
//! are listed with the scopes they enumerate.

use pinpoint_primitives::{Direction, Range, TextDocument};
use rustc_hash::FxHashSet;

use crate::error::Result;
use crate::host::{EditorId, Editors, TextEditor};
use crate::scopes::{ScopeHandler, ScopeIteratorRequirements, ScopeRegistry, ScopeType, TargetScope, generate_scopes};

/// Ranges of one target of a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRanges {
	pub content: Range,
	pub removal: Range,
}

/// One scope and its targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeRanges {
	pub domain: Range,
	pub targets: Vec<TargetRanges>,
}

/// One iteration scope and the scopes enumerated inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationScopeRanges {
	pub range: Range,
	pub scopes: Vec<ScopeRanges>,
}

/// Every scope of `scope_type` in `editor`, outermost first at each start.
///
/// With `visible_only` only scopes meeting a visible range are listed.
pub fn provide_scope_ranges(
	editors: &Editors,
	registry: &ScopeRegistry,
	editor: EditorId,
	scope_type: &ScopeType,
	visible_only: bool,
) -> Result<Vec<ScopeRanges>> {
	let editor = editors.get(editor)?;
	let handler = registry.handler(scope_type, editor)?;
	let scopes = all_scopes(handler.as_ref(), editor, &search_ranges(editor, visible_only));
	let doc = editor.document();
	tracing::trace!(scope_type = %scope_type, count = scopes.len(), visible_only, "Scope ranges");
	Ok(scopes.iter().map(|scope| scope_ranges(doc, scope)).collect())
}

/// Every iteration scope of `scope_type` in `editor`, each with the scopes
/// it would enumerate.
pub fn provide_iteration_scope_ranges(
	editors: &Editors,
	registry: &ScopeRegistry,
	editor: EditorId,
	scope_type: &ScopeType,
	visible_only: bool,
) -> Result<Vec<IterationScopeRanges>> {
	let editor = editors.get(editor)?;
	let handler = registry.handler(scope_type, editor)?;
	let iteration_handler = registry.handler(&handler.iteration_scope_type(), editor)?;
	let doc = editor.document();

	let iteration_scopes = all_scopes(iteration_handler.as_ref(), editor, &search_ranges(editor, visible_only));
	let mut out = Vec::with_capacity(iteration_scopes.len());
	for iteration in iteration_scopes {
		let range = iteration
			.targets
			.first()
			.map_or(iteration.domain, |target| target.content_range);
		let scopes = scopes_within(handler.as_ref(), editor, range)
			.iter()
			.map(|scope| scope_ranges(doc, scope))
			.collect();
		out.push(IterationScopeRanges { range, scopes });
	}
	Ok(out)
}

fn search_ranges(editor: &dyn TextEditor, visible_only: bool) -> Vec<Range> {
	if visible_only {
		editor.visible_ranges().to_vec()
	} else {
		vec![editor.document().range()]
	}
}

fn scope_ranges(doc: &TextDocument, scope: &TargetScope) -> ScopeRanges {
	ScopeRanges {
		domain: scope.domain,
		targets: scope
			.targets
			.iter()
			.map(|target| TargetRanges {
				content: target.content_range,
				removal: target.removal_range(doc),
			})
			.collect(),
	}
}

/// Scopes meeting any of `ranges`, nested ones included, without repeats.
fn all_scopes(handler: &dyn ScopeHandler, editor: &dyn TextEditor, ranges: &[Range]) -> Vec<TargetScope> {
	let mut seen = FxHashSet::default();
	let mut scopes = Vec::new();
	for range in ranges {
		let found = generate_scopes(
			handler,
			editor,
			range.start,
			Direction::Forward,
			ScopeIteratorRequirements {
				distal_position: Some(range.end),
				include_descendant_scopes: true,
				..Default::default()
			},
		)
		.filter(|scope| meets(range, &scope.domain));
		for scope in found {
			if seen.insert(scope.domain) {
				scopes.push(scope);
			}
		}
	}
	scopes.sort_by_key(|scope| (scope.domain.start, std::cmp::Reverse(scope.domain.end)));
	scopes
}

/// Top-level scopes inside `range`, as an every-scope enumeration sees them.
fn scopes_within(handler: &dyn ScopeHandler, editor: &dyn TextEditor, range: Range) -> Vec<TargetScope> {
	generate_scopes(
		handler,
		editor,
		range.start,
		Direction::Forward,
		ScopeIteratorRequirements {
			distal_position: Some(range.end),
			skip_ancestor_scopes: true,
			..Default::default()
		},
	)
	.filter(|scope| !scope.domain.strictly_contains_range(&range) && meets(&range, &scope.domain))
	.collect()
}

fn meets(range: &Range, domain: &Range) -> bool {
	range.contains_range(domain) || domain.overlaps(range)
}
