use pinpoint_primitives::{Direction, Range};

use super::{ModifierStage, StageContext, containing_scope_targets};
use crate::error::{CommandError, Result};
use crate::host::TextEditor;
use crate::scopes::{ScopeHandler, ScopeIteratorRequirements, ScopeType, TargetScope, generate_scopes};
use crate::targets::Target;

/// Every scope of a type inside the input's iteration scope.
pub struct EveryScopeStage<'m> {
	scope_type: &'m ScopeType,
}

impl<'m> EveryScopeStage<'m> {
	pub fn new(scope_type: &'m ScopeType) -> Self {
		Self { scope_type }
	}
}

impl ModifierStage for EveryScopeStage<'_> {
	fn run(&self, ctx: &StageContext<'_>, target: Target) -> Result<Vec<Target>> {
		every_scope_targets(ctx, &target, self.scope_type)
	}
}

/// Scopes of `scope_type` in the region `target` stands for, left to right.
///
/// A target with an explicit range is enumerated as is; otherwise the
/// enumeration covers the innermost containing iteration scope of
/// `scope_type` that has any scopes in it.
pub fn every_scope_targets(ctx: &StageContext<'_>, target: &Target, scope_type: &ScopeType) -> Result<Vec<Target>> {
	let scopes = every_scope(ctx, target, scope_type)?;
	Ok(scopes
		.iter()
		.flat_map(|scope| scope.get_targets(target.is_reversed))
		.collect())
}

pub(super) fn every_scope(ctx: &StageContext<'_>, target: &Target, scope_type: &ScopeType) -> Result<Vec<TargetScope>> {
	let (editor, handler) = ctx.handler(target, scope_type)?;
	let not_found = || CommandError::NoContainingScope(scope_type.clone());

	if target.has_explicit_range() {
		let scopes = scopes_within(handler.as_ref(), editor, &[target.content_range]);
		tracing::trace!(scope_type = %scope_type, count = scopes.len(), "Every scope");
		return if scopes.is_empty() { Err(not_found()) } else { Ok(scopes) };
	}

	// An iteration scope with nothing inside, such as the interior of the
	// innermost pair around the caret, gives way to its ancestors.
	let iteration_type = handler.iteration_scope_type();
	for ancestor_index in 0.. {
		let ranges: Vec<Range> = match containing_scope_targets(ctx, target, &iteration_type, ancestor_index) {
			Ok(iterations) => iterations.iter().map(|iteration| iteration.content_range).collect(),
			Err(CommandError::NoContainingScope(_)) => break,
			Err(err) => return Err(err),
		};
		let scopes = scopes_within(handler.as_ref(), editor, &ranges);
		tracing::trace!(scope_type = %scope_type, ancestor_index, count = scopes.len(), "Every scope");
		if !scopes.is_empty() {
			return Ok(scopes);
		}
	}
	Err(not_found())
}

/// Outermost scopes inside each of `ranges`, left to right.
fn scopes_within(handler: &dyn ScopeHandler, editor: &dyn TextEditor, ranges: &[Range]) -> Vec<TargetScope> {
	let mut scopes = Vec::new();
	for range in ranges {
		let found = generate_scopes(
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
		.filter(|scope| !scope.domain.strictly_contains_range(range) && within(range, &scope.domain));
		scopes.extend(found);
	}
	scopes
}

/// True if `domain` has something inside `range`: an overlap, or an empty
/// domain on or inside its edges. An empty `range` accepts what touches it.
fn within(range: &Range, domain: &Range) -> bool {
	if range.is_empty() || domain.is_empty() {
		return range.contains_range(domain) || domain.contains_range(range);
	}
	domain.overlaps(range)
}

#[cfg(test)]
mod tests {
	use pinpoint_primitives::Range;
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	use super::*;
	use crate::stages::Modifier;
	use crate::stages::test_support::{Fixture, token};

	fn every(scope_type: ScopeType) -> Modifier {
		Modifier::EveryScope { scope_type }
	}

	#[test]
	fn test_every_token_on_line() {
		let fx = Fixture::new("  let x = 1;\nnext");
		let out = fx.run(&every(token()), fx.cursor(0, 7)).unwrap();
		assert_eq!(fx.texts(&out), vec!["let", "x", "=", "1", ";"]);
	}

	#[test]
	fn test_explicit_range_bounds_enumeration() {
		let fx = Fixture::new("aa bb cc dd");
		let out = fx
			.run(&every(token()), fx.selection(Range::from_coords(0, 3, 0, 8)))
			.unwrap();
		assert_eq!(fx.texts(&out), vec!["bb", "cc"]);
	}

	#[test]
	fn test_every_pair_inside_interior() {
		let fx = Fixture::new("f((a) (b) c)");
		let out = fx
			.run(&every(ScopeType::surrounding_pair("parentheses")), fx.cursor(0, 10))
			.unwrap();
		assert_eq!(fx.texts(&out), vec!["(a)", "(b)"]);
	}

	#[rstest]
	#[case(2)]
	#[case(3)]
	#[case(4)]
	#[case(5)]
	#[case(6)]
	#[case(8)]
	#[case(9)]
	fn test_every_pair_from_inside_sibling(#[case] character: usize) {
		let fx = Fixture::new("f((a) (b) c)");
		let out = fx
			.run(&every(ScopeType::surrounding_pair("parentheses")), fx.cursor(0, character))
			.unwrap();
		assert_eq!(fx.texts(&out), vec!["(a)", "(b)"]);
	}

	#[test]
	fn test_ordinal_pair_from_inside_sibling() {
		let fx = Fixture::new("((a)(b))");
		let last = Modifier::OrdinalScope {
			scope_type: ScopeType::surrounding_pair("parentheses"),
			start: -1,
			length: 1,
			is_every: false,
		};
		for character in [2, 4, 5] {
			let out = fx.run(&last, fx.cursor(0, character)).unwrap();
			assert_eq!(fx.texts(&out), vec!["(b)"]);
		}
	}

	#[test]
	fn test_every_line_in_paragraph() {
		let fx = Fixture::new("one\n  two\n\nthree");
		let out = fx.run(&every(ScopeType::simple("line")), fx.cursor(1, 3)).unwrap();
		assert_eq!(fx.texts(&out), vec!["one", "two"]);
	}

	#[test]
	fn test_nothing_to_enumerate() {
		let fx = Fixture::new("x  y");
		let pairs = ScopeType::surrounding_pair("parentheses");
		assert_eq!(
			fx.run(&every(pairs.clone()), fx.selection(Range::from_coords(0, 1, 0, 3))),
			Err(CommandError::NoContainingScope(pairs))
		);
	}
}
