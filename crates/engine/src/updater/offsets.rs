//! Offset arithmetic for a single edit batch.
//!
//! Everything here works on UTF-16 offsets into the pre-edit text. A batch is
//! mapped in one pass: edits are sorted by document order and each boundary
//! accumulates the displacement of every edit that lies wholly before it.

use pinpoint_primitives::{Edit, TextDocument, graphemes};
use serde::{Deserialize, Serialize};

/// How one end of a tracked range reacts to text inserted exactly at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Expansion {
	/// The boundary stays outside the new text.
	Open,
	/// The range grows to take in the new text.
	#[default]
	Closed,
}

/// Expansion of both ends of a tracked range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ExpansionBehavior {
	pub start: Expansion,
	pub end: Expansion,
}

impl ExpansionBehavior {
	pub const CLOSED_CLOSED: Self = Self::new(Expansion::Closed, Expansion::Closed);
	pub const CLOSED_OPEN: Self = Self::new(Expansion::Closed, Expansion::Open);
	pub const OPEN_CLOSED: Self = Self::new(Expansion::Open, Expansion::Closed);
	pub const OPEN_OPEN: Self = Self::new(Expansion::Open, Expansion::Open);

	pub const fn new(start: Expansion, end: Expansion) -> Self {
		Self { start, end }
	}
}

/// Which end of a range a boundary is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
	Start,
	End,
}

/// An edit expressed in pre-edit offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OffsetEdit {
	pub start: usize,
	pub end: usize,
	/// Length of the new text.
	pub len: usize,
	pub is_replace: bool,
}

impl OffsetEdit {
	fn delta(&self) -> isize {
		self.len as isize - (self.end - self.start) as isize
	}

	fn is_insertion(&self) -> bool {
		self.start == self.end
	}
}

/// Converts `edits` to offsets in `doc`, sorted by position.
///
/// The sort is stable, so insertions at one point keep their given order,
/// which is also the order their text ends up in the document.
pub(crate) fn offset_edits(doc: &TextDocument, edits: &[Edit]) -> Vec<OffsetEdit> {
	let mut out: Vec<OffsetEdit> = edits
		.iter()
		.map(|edit| OffsetEdit {
			start: doc.offset_at(edit.range.start),
			end: doc.offset_at(edit.range.end),
			len: graphemes::utf16_len(&edit.text),
			is_replace: edit.is_replace,
		})
		.collect();
	out.sort_by_key(|edit| (edit.start, edit.end));
	out
}

fn shifted(offset: usize, shift: isize) -> usize {
	offset.saturating_add_signed(shift)
}

/// Maps one boundary through the whole batch.
pub(crate) fn map_offset(edits: &[OffsetEdit], offset: usize, side: Side, expansion: Expansion) -> usize {
	let mut shift = 0isize;
	for edit in edits {
		if edit.start > offset {
			break;
		}
		if edit.end < offset {
			shift += edit.delta();
			continue;
		}
		if edit.is_insertion() {
			let follows = matches!(
				(side, expansion),
				(Side::Start, Expansion::Open) | (Side::End, Expansion::Closed)
			);
			if !follows {
				return shifted(offset, shift);
			}
			shift += edit.delta();
			continue;
		}
		if offset == edit.start {
			return shifted(offset, shift);
		}
		if offset == edit.end {
			shift += edit.delta();
			continue;
		}
		// Strictly inside a deleted or replaced span.
		let base = shifted(edit.start, shift);
		return match side {
			Side::Start => base + edit.len,
			Side::End => base,
		};
	}
	shifted(offset, shift)
}

/// Maps a tracked `[start, end]` through the batch.
///
/// A range lying inside a replace edit becomes the replacement text. A start
/// that would pass its end collapses onto the end.
pub(crate) fn map_range(edits: &[OffsetEdit], start: usize, end: usize, behavior: ExpansionBehavior) -> (usize, usize) {
	let replaced = edits
		.iter()
		.position(|edit| edit.is_replace && edit.start <= start && end <= edit.end);
	if let Some(index) = replaced {
		let edit = edits[index];
		let shift: isize = edits[..index].iter().map(OffsetEdit::delta).sum();
		let base = shifted(edit.start, shift);
		return (base, base + edit.len);
	}
	let new_end = map_offset(edits, end, Side::End, behavior.end);
	let new_start = map_offset(edits, start, Side::Start, behavior.start);
	(new_start.min(new_end), new_end)
}
