use serde::{Deserialize, Serialize};

/// A location in a document.
///
/// `character` counts UTF-16 code units from the start of the line, matching
/// the coordinate space host editors report. Positions order by line first,
/// then by character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
	/// Zero-based line index.
	pub line: usize,
	/// Zero-based UTF-16 column.
	pub character: usize,
}

impl Position {
	/// Creates a position from a line and UTF-16 column.
	#[inline]
	pub const fn new(line: usize, character: usize) -> Self {
		Self { line, character }
	}

	/// Returns a copy with a different column.
	#[inline]
	pub fn with_character(self, character: usize) -> Self {
		Self { character, ..self }
	}

	/// Returns the position `delta` columns to the right on the same line.
	#[inline]
	pub fn translate(self, delta: isize) -> Self {
		Self {
			line: self.line,
			character: self.character.saturating_add_signed(delta),
		}
	}

	#[inline]
	pub fn is_before(self, other: Self) -> bool {
		self < other
	}

	#[inline]
	pub fn is_after(self, other: Self) -> bool {
		self > other
	}
}

impl std::fmt::Display for Position {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}:{}", self.line, self.character)
	}
}
