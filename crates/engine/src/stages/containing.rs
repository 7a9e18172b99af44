use pinpoint_primitives::{Direction, Position};

use super::{ModifierStage, StageContext, scope_range_targets};
use crate::error::{CommandError, Result};
use crate::host::TextEditor;
use crate::scopes::{
	Containment, ScopeHandler, ScopeIteratorRequirements, ScopeType, TargetScope, generate_scopes, preferred_scope,
	scopes_overlapping_range, scopes_touching_position,
};
use crate::targets::{Target, TargetKind};

/// The scope of a type containing the input, or an ancestor of it.
pub struct ContainingScopeStage<'m> {
	scope_type: &'m ScopeType,
	ancestor_index: usize,
}

impl<'m> ContainingScopeStage<'m> {
	pub fn new(scope_type: &'m ScopeType, ancestor_index: usize) -> Self {
		Self {
			scope_type,
			ancestor_index,
		}
	}
}

impl ModifierStage for ContainingScopeStage<'_> {
	fn run(&self, ctx: &StageContext<'_>, target: Target) -> Result<Vec<Target>> {
		containing_scope_targets(ctx, &target, self.scope_type, self.ancestor_index)
	}
}

/// Resolves the containing `scope_type` of `target`.
///
/// An empty input takes the preferred scope touching it. A non-empty input
/// takes the innermost scope around its start; when that does not reach the
/// input's end, the result runs from it to the innermost scope around the end.
/// An input starting or ending outside every scope takes the scopes it overlaps.
/// A scope whose domain is exactly the input is its own containing scope.
pub fn containing_scope_targets(
	ctx: &StageContext<'_>,
	target: &Target,
	scope_type: &ScopeType,
	ancestor_index: usize,
) -> Result<Vec<Target>> {
	let (editor, handler) = ctx.handler(target, scope_type)?;
	let range = target.content_range;
	let not_found = || CommandError::NoContainingScope(scope_type.clone());

	if range.is_empty() {
		let touching = scopes_touching_position(handler.as_ref(), editor, range.start);
		let preferred = preferred_scope(handler.as_ref(), editor, touching).ok_or_else(not_found)?;
		let scope = if ancestor_index == 0 {
			preferred
		} else {
			expand(handler.as_ref(), editor, range.start, Direction::Forward, true)
				.filter(|scope| scope.domain.contains_range(&preferred.domain))
				.nth(ancestor_index)
				.ok_or_else(not_found)?
		};
		return Ok(scope.get_targets(target.is_reversed).into_vec());
	}

	let around_start: Vec<TargetScope> =
		expand(handler.as_ref(), editor, range.start, Direction::Forward, false).collect();
	if around_start.is_empty() {
		return overlapping(handler.as_ref(), editor, target, ancestor_index).ok_or_else(not_found);
	}
	let exact = around_start.iter().position(|scope| scope.domain == range);
	let start_index = exact.unwrap_or(0) + ancestor_index;
	let start_scope = around_start.get(start_index).ok_or_else(not_found)?;
	if start_scope.domain.contains_position(range.end) {
		tracing::trace!(scope_type = %scope_type, domain = %start_scope.domain, "Containing scope");
		return Ok(start_scope.get_targets(target.is_reversed).into_vec());
	}

	let Some(end_scope) = expand(handler.as_ref(), editor, range.end, Direction::Backward, false).nth(ancestor_index)
	else {
		return overlapping(handler.as_ref(), editor, target, ancestor_index).ok_or_else(not_found);
	};
	Ok(scope_range_targets(target.is_reversed, start_scope, &end_scope))
}

/// Targets from the first through the last scope overlapping `target`, for
/// an input whose start or end sits outside every scope.
fn overlapping(
	handler: &dyn ScopeHandler,
	editor: &dyn TextEditor,
	target: &Target,
	ancestor_index: usize,
) -> Option<Vec<Target>> {
	if ancestor_index > 0 {
		return None;
	}
	let scopes = scopes_overlapping_range(handler, editor, target.content_range);
	let (first, last) = (scopes.first()?, scopes.last()?);
	Some(scope_range_targets(target.is_reversed, first, last))
}

/// Scopes containing `position`, each one containing the one before it.
fn expand<'a>(
	handler: &'a dyn ScopeHandler,
	editor: &'a dyn TextEditor,
	position: Position,
	direction: Direction,
	allow_adjacent_scopes: bool,
) -> impl Iterator<Item = TargetScope> + 'a {
	generate_scopes(
		handler,
		editor,
		position,
		direction,
		ScopeIteratorRequirements {
			containment: Some(Containment::Required),
			allow_adjacent_scopes,
			..Default::default()
		},
	)
}

/// Widens an empty untyped target to the token it touches.
///
/// Runs after every other stage of a primitive target. A target with no
/// token nearby, such as a caret on a blank line, passes through unchanged.
pub struct ContainingTokenIfUntypedEmptyStage;

impl ModifierStage for ContainingTokenIfUntypedEmptyStage {
	fn run(&self, ctx: &StageContext<'_>, target: Target) -> Result<Vec<Target>> {
		if !matches!(target.kind, TargetKind::Untyped { .. }) || !target.content_range.is_empty() {
			return Ok(vec![target]);
		}
		match containing_scope_targets(ctx, &target, &ScopeType::simple("token"), 0) {
			Ok(tokens) => Ok(tokens),
			Err(CommandError::NoContainingScope(_)) => Ok(vec![target]),
			Err(err) => Err(err),
		}
	}
}

#[cfg(test)]
mod tests {
	use pinpoint_primitives::Range;
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::stages::Modifier;
	use crate::stages::test_support::{Fixture, token};

	fn covers(targets: &[Target], range: Range) -> bool {
		targets.iter().any(|target| target.content_range == range)
	}

	fn containing(scope_type: ScopeType) -> Modifier {
		Modifier::ContainingScope {
			scope_type,
			ancestor_index: 0,
		}
	}

	#[test]
	fn test_containing_token_prefers_identifier() {
		let fx = Fixture::new("foo. bar");
		let out = fx.run(&containing(token()), fx.cursor(0, 3)).unwrap();
		assert_eq!(fx.texts(&out), vec!["foo"]);
	}

	#[test]
	fn test_non_empty_range_spans_overlapping_scopes() {
		let fx = Fixture::new("alpha beta gamma");
		let out = fx
			.run(&containing(token()), fx.selection(Range::from_coords(0, 2, 0, 8)))
			.unwrap();
		assert_eq!(out.len(), 1);
		assert_eq!(out[0].content_range, Range::from_coords(0, 0, 0, 10));
		assert_eq!(out[0].kind, TargetKind::Token);
	}

	#[test]
	fn test_range_with_whitespace_edge_takes_overlapped_token() {
		let fx = Fixture::new("foo bar baz");
		let leading = fx
			.run(&containing(token()), fx.selection(Range::from_coords(0, 3, 0, 7)))
			.unwrap();
		assert_eq!(fx.texts(&leading), vec!["bar"]);
		let trailing = fx
			.run(&containing(token()), fx.selection(Range::from_coords(0, 4, 0, 8)))
			.unwrap();
		assert_eq!(fx.texts(&trailing), vec!["bar"]);
		let both = fx
			.run(&containing(token()), fx.selection(Range::from_coords(0, 3, 0, 8)))
			.unwrap();
		assert_eq!(fx.texts(&both), vec!["bar"]);

		let blank = fx.selection(Range::from_coords(0, 3, 0, 4));
		assert_eq!(fx.run(&containing(token()), blank), Err(CommandError::NoContainingScope(token())));
	}

	#[test]
	fn test_containing_is_idempotent_for_pairs() {
		let fx = Fixture::new("f((a)  (b))");
		let pair = ScopeType::surrounding_pair("parentheses");
		let adjacent = fx.run(&containing(pair.clone()), fx.cursor(0, 5)).unwrap();
		assert_eq!(fx.texts(&adjacent), vec!["(a)"]);
		let once = fx.run(&containing(pair.clone()), fx.cursor(0, 6)).unwrap();
		assert_eq!(fx.texts(&once), vec!["((a)  (b))"]);
		let twice = fx.run(&containing(pair), once[0].clone()).unwrap();
		assert_eq!(twice[0].content_range, once[0].content_range);
	}

	#[test]
	fn test_ancestor_index_walks_outward() {
		let fx = Fixture::new("[ ( { x } ) ]");
		let any = ScopeType::surrounding_pair("any");
		let parent = Modifier::ContainingScope {
			scope_type: any.clone(),
			ancestor_index: 1,
		};
		let out = fx.run(&parent, fx.cursor(0, 6)).unwrap();
		assert!(covers(&out, Range::from_coords(0, 2, 0, 11)));
		let too_far = Modifier::ContainingScope {
			scope_type: any.clone(),
			ancestor_index: 3,
		};
		assert_eq!(
			fx.run(&too_far, fx.cursor(0, 6)),
			Err(CommandError::NoContainingScope(any))
		);
	}

	#[test]
	fn test_no_containing_scope() {
		let fx = Fixture::new("plain text");
		let pair = ScopeType::surrounding_pair("parentheses");
		assert_eq!(
			fx.run(&containing(pair.clone()), fx.cursor(0, 2)),
			Err(CommandError::NoContainingScope(pair))
		);
	}

	#[test]
	fn test_untyped_empty_becomes_token() {
		let fx = Fixture::new("one two\n\n");
		let stage = ContainingTokenIfUntypedEmptyStage;
		let out = stage.run(&fx.ctx(), fx.cursor(0, 5)).unwrap();
		assert_eq!(fx.texts(&out), vec!["two"]);
		let blank = stage.run(&fx.ctx(), fx.cursor(1, 0)).unwrap();
		assert_eq!(blank, vec![fx.cursor(1, 0)]);
	}
}
