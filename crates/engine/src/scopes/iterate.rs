//! Ordered, filtered scope enumeration shared by every handler.
//!
//! Walking from a position in a direction, a scope is reached either where
//! its domain starts or, if the walk began inside it, where its domain ends.
//! At any one point empty domains come first, then domains that are ending
//! (innermost first), then the smallest domain that is starting. Everything
//! here is a lazy iterator so callers can stop after the first hit.

use pinpoint_primitives::{Direction, Position, Range};

use super::{Containment, IterationScope, ScopeHandler, ScopeIteratorRequirements, TargetScope};
use crate::error::{CommandError, Result};
use crate::host::TextEditor;

/// Yields the scopes of `handler` that satisfy `requirements`, in walk order.
pub fn generate_scopes<'a>(
	handler: &'a dyn ScopeHandler,
	editor: &'a dyn TextEditor,
	position: Position,
	direction: Direction,
	requirements: ScopeIteratorRequirements,
) -> impl Iterator<Item = TargetScope> + 'a {
	let candidates = handler.generate_scope_candidates(editor, position, direction, &requirements);
	let hierarchical = handler.is_hierarchical();
	let candidates: Box<dyn Iterator<Item = TargetScope> + 'a> = if hierarchical {
		Box::new(HierarchicalOrder::new(
			candidates.collect(),
			position,
			direction,
			requirements.include_descendant_scopes,
		))
	} else {
		candidates
	};
	ScopeFilter {
		candidates,
		position,
		direction,
		requirements,
		hierarchical,
		previous: None,
		done: false,
	}
}

/// Applies the requirement filters and the early-stop rule.
struct ScopeFilter<'a> {
	candidates: Box<dyn Iterator<Item = TargetScope> + 'a>,
	position: Position,
	direction: Direction,
	requirements: ScopeIteratorRequirements,
	hierarchical: bool,
	/// Domain of the last yielded scope.
	previous: Option<Range>,
	done: bool,
}

impl Iterator for ScopeFilter<'_> {
	type Item = TargetScope;

	fn next(&mut self) -> Option<TargetScope> {
		if self.done {
			return None;
		}
		for scope in self.candidates.by_ref() {
			let keep = should_return_scope(self.position, self.direction, &self.requirements, self.previous, &scope);
			let stop = !self.hierarchical && can_stop_early(self.position, self.direction, &self.requirements, &scope);
			if stop {
				self.done = true;
			}
			if keep {
				self.previous = Some(scope.domain);
				return Some(scope);
			}
			if stop {
				return None;
			}
		}
		self.done = true;
		None
	}
}

fn should_return_scope(
	position: Position,
	direction: Direction,
	requirements: &ScopeIteratorRequirements,
	previous: Option<Range>,
	scope: &TargetScope,
) -> bool {
	let domain = scope.domain;
	let forward = direction.is_forward();

	match requirements.containment {
		Some(Containment::Required) if !domain.contains_position(position) => return false,
		Some(Containment::Disallowed) if domain.contains_position(position) => return false,
		Some(Containment::DisallowedIfStrict) if domain.strictly_contains_position(position) => return false,
		_ => {}
	}

	if !requirements.allow_adjacent_scopes && !domain.is_empty() {
		let adjacent = if forward {
			domain.end == position
		} else {
			domain.start == position
		};
		if adjacent {
			return false;
		}
	}

	if requirements.skip_ancestor_scopes && previous.is_some_and(|prev| domain.contains_range(&prev)) {
		return false;
	}

	if let Some(distal) = requirements.distal_position {
		let beyond = if forward {
			domain.start > distal
		} else {
			domain.end < distal
		};
		if beyond {
			return false;
		}
	}

	true
}

/// Once a non-hierarchical walk has passed the point where further scopes
/// could still qualify, the rest of the candidates are skipped.
fn can_stop_early(
	position: Position,
	direction: Direction,
	requirements: &ScopeIteratorRequirements,
	scope: &TargetScope,
) -> bool {
	let domain = scope.domain;
	let forward = direction.is_forward();
	if requirements.containment == Some(Containment::Required)
		&& (if forward {
			domain.end > position
		} else {
			domain.start < position
		}) {
		return true;
	}
	requirements.distal_position.is_some_and(|distal| {
		if forward {
			domain.end >= distal
		} else {
			domain.start <= distal
		}
	})
}

/// Arranges an unordered set of possibly nested scopes into walk order.
struct HierarchicalOrder {
	pending: Vec<TargetScope>,
	yielded: Vec<Range>,
	position: Position,
	direction: Direction,
	include_descendants: bool,
}

impl HierarchicalOrder {
	fn new(pending: Vec<TargetScope>, position: Position, direction: Direction, include_descendants: bool) -> Self {
		Self {
			pending,
			yielded: Vec::new(),
			position,
			direction,
			include_descendants,
		}
	}

	/// Where the walk reaches `domain`: its near edge if ahead, its far edge
	/// if the walk is inside it.
	fn event(&self, domain: &Range) -> (Position, bool) {
		if self.direction.is_forward() {
			if domain.start >= self.position {
				(domain.start, true)
			} else {
				(domain.end, false)
			}
		} else if domain.end <= self.position {
			(domain.end, true)
		} else {
			(domain.start, false)
		}
	}
}

impl Iterator for HierarchicalOrder {
	type Item = TargetScope;

	fn next(&mut self) -> Option<TargetScope> {
		let forward = self.direction.is_forward();
		let position = self.position;
		self.pending.retain(|scope| {
			if forward {
				scope.domain.end >= position
			} else {
				scope.domain.start <= position
			}
		});
		if !self.include_descendants {
			let yielded = &self.yielded;
			self.pending
				.retain(|scope| !yielded.iter().any(|done| done.contains_range(&scope.domain)));
		}

		let events: Vec<(Position, bool)> = self.pending.iter().map(|scope| self.event(&scope.domain)).collect();
		let point = if forward {
			events.iter().map(|(at, _)| *at).min()?
		} else {
			events.iter().map(|(at, _)| *at).max()?
		};
		let at_point = |i: &usize| events[*i].0 == point;
		let indices: Vec<usize> = (0..self.pending.len()).filter(at_point).collect();

		let empty = indices.iter().copied().find(|&i| self.pending[i].domain.is_empty());
		// Ending domains: the innermost is the one reached last from the walk start.
		let ending = indices.iter().copied().filter(|&i| !events[i].1).min_by(|&a, &b| {
			let (a, b) = (self.pending[a].domain, self.pending[b].domain);
			if forward {
				b.start.cmp(&a.start)
			} else {
				a.end.cmp(&b.end)
			}
		});
		let starting = indices
			.iter()
			.copied()
			.filter(|&i| events[i].1 && !self.pending[i].domain.is_empty())
			.min_by(|&a, &b| {
				let (a, b) = (self.pending[a].domain, self.pending[b].domain);
				if forward {
					a.end.cmp(&b.end).then(b.start.cmp(&a.start))
				} else {
					b.start.cmp(&a.start).then(a.end.cmp(&b.end))
				}
			});

		// Ties between equal domains go to the handler's candidate order.
		let chosen = empty.or(ending).or(starting)?;
		let scope = self.pending.remove(chosen);
		// Descendants are only reachable if the walk stays at the start.
		self.position = match (self.include_descendants, forward) {
			(true, _) => point,
			(false, true) => scope.domain.end,
			(false, false) => scope.domain.start,
		};
		self.yielded.push(scope.domain);
		Some(scope)
	}
}

/// Minimal scopes touching `position`: containing it or adjacent to it.
pub fn scopes_touching_position(
	handler: &dyn ScopeHandler,
	editor: &dyn TextEditor,
	position: Position,
) -> Vec<TargetScope> {
	generate_scopes(
		handler,
		editor,
		position,
		Direction::Forward,
		ScopeIteratorRequirements {
			containment: Some(Containment::Required),
			allow_adjacent_scopes: true,
			skip_ancestor_scopes: true,
			..Default::default()
		},
	)
	.collect()
}

/// Minimal scopes whose domain shares at least one character with `range`.
pub fn scopes_overlapping_range(handler: &dyn ScopeHandler, editor: &dyn TextEditor, range: Range) -> Vec<TargetScope> {
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
	.filter(|scope| scope.domain.overlaps(&range))
	.collect()
}

/// Minimal iteration scopes touching `position`, from the iteration handler.
pub fn iteration_scopes_touching_position(
	iteration_handler: &dyn ScopeHandler,
	editor: &dyn TextEditor,
	position: Position,
) -> Vec<IterationScope> {
	scopes_touching_position(iteration_handler, editor, position)
		.into_iter()
		.map(|scope| IterationScope {
			editor: scope.editor,
			domain: scope.domain,
			range: scope
				.targets
				.first()
				.map_or(scope.domain, |target| target.content_range),
		})
		.collect()
}

/// The `offset`-th scope (1-based) lying wholly ahead of `position`.
///
/// Scopes containing `position` strictly, or merely ending at it, are not
/// counted.
pub fn scope_relative_to_position(
	handler: &dyn ScopeHandler,
	editor: &dyn TextEditor,
	position: Position,
	offset: usize,
	direction: Direction,
) -> Result<TargetScope> {
	if offset == 0 {
		return Err(CommandError::OutOfRange);
	}
	generate_scopes(
		handler,
		editor,
		position,
		direction,
		ScopeIteratorRequirements {
			containment: Some(Containment::DisallowedIfStrict),
			..Default::default()
		},
	)
	.nth(offset - 1)
	.ok_or(CommandError::OutOfRange)
}

/// Picks one scope out of those touching a position.
///
/// The handler decides when it has a preference; otherwise the scope to the
/// right wins.
pub fn preferred_scope(
	handler: &dyn ScopeHandler,
	editor: &dyn TextEditor,
	scopes: Vec<TargetScope>,
) -> Option<TargetScope> {
	scopes
		.into_iter()
		.reduce(|a, b| match handler.is_preferred_over(editor, &a, &b) {
			Some(true) => a,
			Some(false) | None => b,
		})
}
