use ropey::{Rope, RopeSlice};

use crate::edit::{Edit, EditError};
use crate::graphemes::{first_non_whitespace, last_non_whitespace_end, utf16_len};
use crate::position::Position;
use crate::range::Range;


/// Identifies a document across edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DocumentId(pub u64);

impl std::fmt::Display for DocumentId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "doc#{}", self.0)
	}
}

/// A single line of a document, as seen at the time it was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
	/// Zero-based line index.
	pub line_number: usize,
	/// Line content without its line break.
	pub text: String,
	/// Extent of the content, excluding the line break.
	pub range: Range,
	/// Extent of the content plus the line break, if any.
	pub range_including_line_break: Range,
	/// Column of the first non-whitespace character; equals the line length
	/// for blank lines.
	pub first_non_whitespace_character_index: usize,
	/// Column just past the last non-whitespace character.
	pub last_non_whitespace_character_index: usize,
}

impl TextLine {
	/// Returns true if the line holds only whitespace.
	pub fn is_empty_or_whitespace(&self) -> bool {
		self.text.trim().is_empty()
	}

	/// Returns the range spanning the line's non-whitespace content.
	pub fn trimmed_range(&self) -> Range {
		if self.is_empty_or_whitespace() {
			return Range::empty(self.range.start);
		}
		Range::new(
			self.range.start.with_character(self.first_non_whitespace_character_index),
			self.range.start.with_character(self.last_non_whitespace_character_index),
		)
	}
}

/// A text buffer addressed by UTF-16 [`Position`]s.
///
/// Text is stored in a [`Rope`]; UTF-16 offsets are computed through ropey's
/// code unit index so conversions stay logarithmic. Offsets returned by
/// [`TextDocument::offset_at`] count UTF-16 code units from the document start.
#[derive(Debug, Clone)]
pub struct TextDocument {
	id: DocumentId,
	language_id: String,
	version: u64,
	text: Rope,
}

impl TextDocument {
	/// Creates a document with version 1.
	pub fn new(id: DocumentId, language_id: impl Into<String>, text: &str) -> Self {
		Self {
			id,
			language_id: language_id.into(),
			version: 1,
			text: Rope::from_str(text),
		}
	}

	pub fn id(&self) -> DocumentId {
		self.id
	}

	/// Language identifier used to pick syntax scope definitions.
	pub fn language_id(&self) -> &str {
		&self.language_id
	}

	/// Monotonic counter bumped on every applied edit batch.
	pub fn version(&self) -> u64 {
		self.version
	}

	/// Returns the underlying rope.
	pub fn rope(&self) -> &Rope {
		&self.text
	}

	/// Returns the number of lines; a trailing line break starts a final empty line.
	pub fn line_count(&self) -> usize {
		self.text.len_lines()
	}

	/// Returns the document length in UTF-16 code units.
	pub fn len_utf16(&self) -> usize {
		self.text.len_utf16_cu()
	}

	/// Returns the range covering the whole document.
	pub fn range(&self) -> Range {
		Range::new(Position::default(), self.end_position())
	}

	/// Returns the position after the last character.
	pub fn end_position(&self) -> Position {
		let last = self.line_count() - 1;
		Position::new(last, self.line_len_utf16(last))
	}

	/// Returns line `line`, clamped to the last line.
	pub fn line_at(&self, line: usize) -> TextLine {
		let line = line.min(self.line_count() - 1);
		let slice = self.text.line(line);
		let content = line_content(slice);
		let text: String = content.into();
		let len = utf16_len(&text);
		let start = Position::new(line, 0);
		let end_with_break = if line + 1 < self.line_count() {
			Position::new(line + 1, 0)
		} else {
			Position::new(line, len)
		};
		TextLine {
			line_number: line,
			first_non_whitespace_character_index: first_non_whitespace(&text),
			last_non_whitespace_character_index: last_non_whitespace_end(&text),
			range: Range::new(start, Position::new(line, len)),
			range_including_line_break: Range::new(start, end_with_break),
			text,
		}
	}

	/// Returns the text inside `range`, or the whole document for `None`.
	pub fn get_text(&self, range: Option<Range>) -> String {
		match range {
			None => self.text.to_string(),
			Some(range) => self.slice(range).into(),
		}
	}

	/// Returns a rope slice over `range`.
	pub fn slice(&self, range: Range) -> RopeSlice<'_> {
		let start = self.char_at(range.start);
		let end = self.char_at(range.end);
		self.text.slice(start..end)
	}

	/// Converts a position to a UTF-16 offset from the document start.
	///
	/// Lines past the end map to the document length and columns past the end
	/// of a line map to the end of that line's content.
	pub fn offset_at(&self, pos: Position) -> usize {
		if pos.line >= self.line_count() {
			return self.len_utf16();
		}
		let line_start = self.text.char_to_utf16_cu(self.text.line_to_char(pos.line));
		line_start + pos.character.min(self.line_len_utf16(pos.line))
	}

	/// Converts a UTF-16 offset back into a position, clamping to the document end.
	pub fn position_at(&self, offset: usize) -> Position {
		let offset = offset.min(self.len_utf16());
		let char_idx = self.text.utf16_cu_to_char(offset);
		let line = self.text.char_to_line(char_idx);
		let line_start = self.text.char_to_utf16_cu(self.text.line_to_char(line));
		let character = (offset - line_start).min(self.line_len_utf16(line));
		Position::new(line, character)
	}

	/// Clamps `pos` into the document.
	pub fn validate_position(&self, pos: Position) -> Position {
		self.position_at(self.offset_at(pos))
	}

	/// Clamps both ends of `range` into the document.
	pub fn validate_range(&self, range: Range) -> Range {
		Range::new(self.validate_position(range.start), self.validate_position(range.end))
	}

	/// Applies a batch of edits expressed in pre-edit coordinates.
	///
	/// Edits are applied from the end of the document backwards, so earlier
	/// edits never shift the coordinates of later ones. Insertions at the same
	/// point are applied in reverse of their given order, leaving the first
	/// given text first in the document.
	pub fn apply_edits(&mut self, edits: &[Edit]) -> Result<(), EditError> {
		for edit in edits {
			if edit.range.end.line >= self.line_count() {
				return Err(EditError::OutOfBounds { range: edit.range });
			}
		}

		let mut order: Vec<usize> = (0..edits.len()).collect();
		order.sort_by(|&a, &b| {
			let (ea, eb) = (&edits[a], &edits[b]);
			(ea.range.start, ea.range.end, a).cmp(&(eb.range.start, eb.range.end, b))
		});
		for pair in order.windows(2) {
			let (first, second) = (&edits[pair[0]], &edits[pair[1]]);
			if first.range.end > second.range.start {
				return Err(EditError::Overlapping {
					first: first.range,
					second: second.range,
				});
			}
		}

		for &idx in order.iter().rev() {
			let edit = &edits[idx];
			let start = self.char_at(edit.range.start);
			let end = self.char_at(edit.range.end);
			if end > start {
				self.text.remove(start..end);
			}
			if !edit.text.is_empty() {
				self.text.insert(start, &edit.text);
			}
		}
		self.version += 1;
		Ok(())
	}

	/// Replaces the entire content, bumping the version.
	pub fn set_text(&mut self, text: &str) {
		self.text = Rope::from_str(text);
		self.version += 1;
	}

	fn char_at(&self, pos: Position) -> usize {
		self.text.utf16_cu_to_char(self.offset_at(pos))
	}

	fn line_len_utf16(&self, line: usize) -> usize {
		let slice = line_content(self.text.line(line));
		slice.len_utf16_cu()
	}
}

/// Strips the trailing line break from a rope line.
fn line_content(line: RopeSlice<'_>) -> RopeSlice<'_> {
	let len = line.len_chars();
	let break_len = match (len.checked_sub(2).map(|i| line.char(i)), len.checked_sub(1).map(|i| line.char(i))) {
		(Some('\r'), Some('\n')) => 2,
		(_, Some('\n' | '\r' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}')) => 1,
		_ => 0,
	};
	line.slice(..len - break_len)
}
