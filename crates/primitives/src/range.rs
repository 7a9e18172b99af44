use serde::{Deserialize, Serialize};

use crate::position::Position;
use crate::selection::Selection;

/// An ordered span between two positions.
///
/// Construction always orders the endpoints, so `start <= end` holds for every
/// value. A range may be empty (`start == end`), in which case it denotes a
/// caret location. Direction is not part of a range; see [`Selection`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
	/// The earlier endpoint.
	pub start: Position,
	/// The later endpoint.
	pub end: Position,
}

impl Range {
	/// Creates a range between two positions, in either order.
	pub fn new(a: Position, b: Position) -> Self {
		if a <= b {
			Self { start: a, end: b }
		} else {
			Self { start: b, end: a }
		}
	}

	/// Creates a range from raw line/column pairs.
	pub fn from_coords(start_line: usize, start_character: usize, end_line: usize, end_character: usize) -> Self {
		Self::new(
			Position::new(start_line, start_character),
			Position::new(end_line, end_character),
		)
	}

	/// Creates a zero-width range at `pos`.
	#[inline]
	pub fn empty(pos: Position) -> Self {
		Self { start: pos, end: pos }
	}

	/// Returns true if `start == end`.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.start == self.end
	}

	/// Returns true if both endpoints sit on the same line.
	#[inline]
	pub fn is_single_line(&self) -> bool {
		self.start.line == self.end.line
	}

	/// Returns true if `pos` lies within the range, endpoints included.
	#[inline]
	pub fn contains_position(&self, pos: Position) -> bool {
		self.start <= pos && pos <= self.end
	}

	/// Returns true if `pos` lies strictly between the endpoints.
	#[inline]
	pub fn strictly_contains_position(&self, pos: Position) -> bool {
		self.start < pos && pos < self.end
	}

	/// Returns true if `other` lies within this range, endpoints included.
	#[inline]
	pub fn contains_range(&self, other: &Range) -> bool {
		self.start <= other.start && other.end <= self.end
	}

	/// Returns true if both of `other`'s endpoints lie strictly inside this range.
	#[inline]
	pub fn strictly_contains_range(&self, other: &Range) -> bool {
		self.start < other.start && other.end < self.end
	}

	/// Returns the overlap of two ranges, which may be empty when they touch.
	///
	/// Returns `None` if the ranges are disjoint.
	pub fn intersection(&self, other: &Range) -> Option<Range> {
		let start = self.start.max(other.start);
		let end = self.end.min(other.end);
		(start <= end).then_some(Range { start, end })
	}

	/// Returns true if the ranges share at least one character.
	pub fn overlaps(&self, other: &Range) -> bool {
		self.intersection(other).is_some_and(|r| !r.is_empty())
	}

	/// Returns the smallest range covering both ranges.
	pub fn union(&self, other: &Range) -> Range {
		Range {
			start: self.start.min(other.start),
			end: self.end.max(other.end),
		}
	}

	/// Returns a range with a new start, reordering if needed.
	pub fn with_start(&self, start: Position) -> Range {
		Range::new(start, self.end)
	}

	/// Returns a range with a new end, reordering if needed.
	pub fn with_end(&self, end: Position) -> Range {
		Range::new(self.start, end)
	}

	/// Returns the end when travelling forward, the start otherwise.
	#[inline]
	pub fn edge(&self, forward: bool) -> Position {
		if forward { self.end } else { self.start }
	}

	/// Converts this range into a selection with the requested direction.
	pub fn to_selection(&self, is_reversed: bool) -> Selection {
		if is_reversed {
			Selection::new(self.end, self.start)
		} else {
			Selection::new(self.start, self.end)
		}
	}
}

impl std::fmt::Display for Range {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}-{}", self.start, self.end)
	}
}
