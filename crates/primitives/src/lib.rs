//! Core types for addressing text: positions, ranges, selections, documents and edits.

/// Walking direction for scope enumeration and relative modifiers.
pub mod direction;
/// Text documents backed by a rope, addressed in UTF-16 positions.
pub mod document;
/// Edit batches and their application errors.
pub mod edit;
/// Grapheme cluster helpers.
pub mod graphemes;
/// Document positions.
pub mod position;
/// Ordered position ranges.
pub mod range;
/// Directional selections.
pub mod selection;

pub use direction::Direction;
pub use document::{DocumentId, TextDocument, TextLine};
pub use edit::{Edit, EditError};
pub use position::Position;
pub use range::Range;
pub use ropey::{Rope, RopeSlice};
pub use selection::Selection;
