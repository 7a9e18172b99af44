use thiserror::Error;

use crate::position::Position;
use crate::range::Range;

/// A single text change: replace `range` with `text`.
///
/// Insertions use an empty range, deletions an empty `text`. `is_replace`
/// marks edits that substitute content wholesale; ranges tracked inside such
/// an edit expand to cover the new text instead of collapsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
	pub range: Range,
	pub text: String,
	pub is_replace: bool,
}

impl Edit {
	/// Inserts `text` at `pos`.
	pub fn insert(pos: Position, text: impl Into<String>) -> Self {
		Self {
			range: Range::empty(pos),
			text: text.into(),
			is_replace: false,
		}
	}

	/// Replaces the content of `range` with `text`, growing tracked ranges inside it.
	pub fn replace(range: Range, text: impl Into<String>) -> Self {
		Self {
			range,
			text: text.into(),
			is_replace: true,
		}
	}

	/// Removes the content of `range`.
	pub fn delete(range: Range) -> Self {
		Self {
			range,
			text: String::new(),
			is_replace: false,
		}
	}

	/// Overwrites `range` with `text` without replace semantics.
	pub fn splice(range: Range, text: impl Into<String>) -> Self {
		Self {
			range,
			text: text.into(),
			is_replace: false,
		}
	}
}

/// Errors raised while applying an edit batch to a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
	/// Two non-insertion edits in the same batch cover a common character.
	#[error("edits overlap at {first} and {second}")]
	Overlapping { first: Range, second: Range },
	/// An edit range refers to a line past the end of the document.
	#[error("edit range {range} is outside the document")]
	OutOfBounds { range: Range },
	/// The host refused the batch.
	#[error("edit rejected: {0}")]
	Rejected(String),
}
