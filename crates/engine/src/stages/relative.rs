use pinpoint_primitives::{Direction, Position, Range};

use super::{ModifierStage, StageContext, scope_range_targets};
use crate::error::{CommandError, Result};
use crate::host::TextEditor;
use crate::scopes::{
	ScopeHandler, ScopeType, TargetScope, preferred_scope, scope_relative_to_position, scopes_overlapping_range,
	scopes_touching_position,
};
use crate::targets::Target;

/// Scopes counted from the input in one direction.
pub struct RelativeScopeStage<'m> {
	pub scope_type: &'m ScopeType,
	pub offset: usize,
	pub length: usize,
	pub direction: Direction,
	pub is_every: bool,
}

impl ModifierStage for RelativeScopeStage<'_> {
	fn run(&self, ctx: &StageContext<'_>, target: Target) -> Result<Vec<Target>> {
		if self.length == 0 {
			return Err(CommandError::OutOfRange);
		}
		let (editor, handler) = ctx.handler(&target, self.scope_type)?;
		let scopes = if self.offset == 0 {
			self.including_intersecting(handler.as_ref(), editor, target.content_range)?
		} else {
			self.not_including_intersecting(handler.as_ref(), editor, target.content_range)?
		};
		tracing::trace!(
			scope_type = %self.scope_type,
			offset = self.offset,
			length = self.length,
			found = scopes.len(),
			"Relative scope"
		);
		Ok(self.to_targets(target.is_reversed, scopes))
	}
}

impl RelativeScopeStage<'_> {
	/// Offset 0: the scopes the input intersects, extended in the walk
	/// direction until `length` scopes are covered.
	fn including_intersecting(
		&self,
		handler: &dyn ScopeHandler,
		editor: &dyn TextEditor,
		range: Range,
	) -> Result<Vec<TargetScope>> {
		let mut scopes = index0_scopes(handler, editor, range);
		if scopes.is_empty() {
			return Err(CommandError::NoContainingScope(self.scope_type.clone()));
		}
		if scopes.len() > self.length {
			return Err(CommandError::TooFewScopes {
				requested: self.length,
				available: scopes.len(),
				scope_type: self.scope_type.clone(),
			});
		}
		let missing = self.length - scopes.len();
		let from = index0_distal_position(self.direction, &scopes);
		let extra = self.walk(handler, editor, from, 1, missing)?;
		if self.direction.is_forward() {
			scopes.extend(extra);
		} else {
			scopes.splice(0..0, extra.into_iter().rev());
		}
		Ok(scopes)
	}

	/// Offset >= 1. The scopes the input intersects are stepped over first,
	/// unless the input sits strictly inside exactly one of them.
	fn not_including_intersecting(
		&self,
		handler: &dyn ScopeHandler,
		editor: &dyn TextEditor,
		range: Range,
	) -> Result<Vec<TargetScope>> {
		let index0 = index0_scopes(handler, editor, range);
		let skip_index0 = match index0.as_slice() {
			[] => false,
			[only] => !only.domain.strictly_contains_range(&range),
			_ => true,
		};
		let from = if skip_index0 {
			index0_distal_position(self.direction, &index0)
		} else {
			range.edge(self.direction.is_forward())
		};
		let mut scopes = self.walk(handler, editor, from, self.offset, self.length)?;
		if !self.direction.is_forward() {
			scopes.reverse();
		}
		Ok(scopes)
	}

	/// `count` scopes, the first being the `offset`-th from `from`, each next
	/// one counted from the far edge of the one before.
	fn walk(
		&self,
		handler: &dyn ScopeHandler,
		editor: &dyn TextEditor,
		from: Position,
		offset: usize,
		count: usize,
	) -> Result<Vec<TargetScope>> {
		let forward = self.direction.is_forward();
		let mut scopes: Vec<TargetScope> = Vec::with_capacity(count);
		let (mut position, mut nth) = (from, offset);
		for _ in 0..count {
			let scope = scope_relative_to_position(handler, editor, position, nth, self.direction)?;
			position = scope.domain.edge(forward);
			nth = 1;
			scopes.push(scope);
		}
		Ok(scopes)
	}

	/// One target per scope, or one continuous target from first to last.
	fn to_targets(&self, is_reversed: bool, scopes: Vec<TargetScope>) -> Vec<Target> {
		if self.is_every {
			return scopes
				.iter()
				.flat_map(|scope| scope.get_targets(is_reversed))
				.collect();
		}
		match (scopes.first(), scopes.last()) {
			(Some(first), Some(last)) => scope_range_targets(is_reversed, first, last),
			_ => Vec::new(),
		}
	}
}

/// Scopes at relative index 0. An empty input has at most one: the scope
/// the containing-scope modifier would pick.
fn index0_scopes(handler: &dyn ScopeHandler, editor: &dyn TextEditor, range: Range) -> Vec<TargetScope> {
	if range.is_empty() {
		let touching = scopes_touching_position(handler, editor, range.start);
		return preferred_scope(handler, editor, touching).into_iter().collect();
	}
	scopes_overlapping_range(handler, editor, range)
}

/// The far edge of the index-0 scopes in the walk direction.
fn index0_distal_position(direction: Direction, scopes: &[TargetScope]) -> Position {
	let edge = if direction.is_forward() { scopes.last() } else { scopes.first() };
	edge.map_or_else(Position::default, |scope| scope.domain.edge(direction.is_forward()))
}
