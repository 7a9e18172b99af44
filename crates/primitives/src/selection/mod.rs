use serde::{Deserialize, Serialize};

use crate::position::Position;
use crate::range::Range;

#[cfg(test)]
mod tests;

/// A range with a direction, defined by anchor and active positions.
///
/// The anchor is the fixed end; the active end is where the caret sits. A
/// selection is reversed when its active end precedes its anchor. Unlike
/// [`Range`], selections are not normalized, so a reversed selection
/// round-trips its direction through every conversion in this crate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
	/// The fixed end of the selection.
	pub anchor: Position,
	/// The moving end of the selection (caret position).
	pub active: Position,
}

impl Selection {
	/// Creates a selection from anchor to active.
	#[inline]
	pub const fn new(anchor: Position, active: Position) -> Self {
		Self { anchor, active }
	}

	/// Creates a zero-width selection (caret) at `pos`.
	#[inline]
	pub const fn caret(pos: Position) -> Self {
		Self::new(pos, pos)
	}

	/// Creates a selection covering `range` in the requested direction.
	pub fn from_range(range: Range, is_reversed: bool) -> Self {
		range.to_selection(is_reversed)
	}

	/// Returns true if the active end comes before the anchor.
	///
	/// Empty selections are never reversed.
	#[inline]
	pub fn is_reversed(&self) -> bool {
		self.active < self.anchor
	}

	/// Returns true if anchor equals active.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.anchor == self.active
	}

	/// Returns the earlier of anchor and active.
	#[inline]
	pub fn start(&self) -> Position {
		self.anchor.min(self.active)
	}

	/// Returns the later of anchor and active.
	#[inline]
	pub fn end(&self) -> Position {
		self.anchor.max(self.active)
	}

	/// Returns the undirected extent of the selection.
	#[inline]
	pub fn range(&self) -> Range {
		Range::new(self.anchor, self.active)
	}

	/// Returns a selection with anchor and active swapped.
	pub fn flip(&self) -> Self {
		Self::new(self.active, self.anchor)
	}

	/// Returns a selection over `range` that keeps this selection's direction.
	pub fn with_range(&self, range: Range) -> Self {
		range.to_selection(self.is_reversed())
	}
}

impl From<Range> for Selection {
	fn from(range: Range) -> Self {
		range.to_selection(false)
	}
}

impl std::fmt::Display for Selection {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}->{}", self.anchor, self.active)
	}
}
