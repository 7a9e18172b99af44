//! Delimiter and removal-range rules shared by target kinds.
//!
//! Token-like targets are delimited by horizontal whitespace on their own
//! line; line-like targets by line breaks; paragraphs by runs of blank lines.

use pinpoint_primitives::{Position, Range, TextDocument};

fn is_horizontal_space(ch: char) -> bool {
	ch.is_whitespace() && ch != '\n' && ch != '\r'
}

/// Whitespace run immediately before `range.start`, on the same line.
pub fn leading_whitespace(doc: &TextDocument, range: Range) -> Option<Range> {
	let line = doc.line_at(range.start.line);
	let col = range.start.character.min(line.range.end.character);
	let before = prefix_utf16(&line.text, col);
	let trimmed = before.trim_end_matches(is_horizontal_space);
	let width = utf16(before) - utf16(trimmed);
	(width > 0).then(|| Range::new(range.start.with_character(col - width), range.start.with_character(col)))
}

/// Whitespace run immediately after `range.end`, on the same line.
pub fn trailing_whitespace(doc: &TextDocument, range: Range) -> Option<Range> {
	let line = doc.line_at(range.end.line);
	let col = range.end.character.min(line.range.end.character);
	let after = suffix_utf16(&line.text, col);
	let trimmed = after.trim_start_matches(is_horizontal_space);
	let width = utf16(after) - utf16(trimmed);
	(width > 0).then(|| Range::new(range.end.with_character(col), range.end.with_character(col + width)))
}

/// Removal range for token-like content.
///
/// Trailing whitespace is consumed when another token follows it on the
/// line; otherwise leading whitespace is consumed when a token precedes it.
/// Content alone is removed when it has no neighbours.
pub fn token_removal_range(doc: &TextDocument, range: Range) -> Range {
	if let Some(trailing) = trailing_whitespace(doc, range)
		&& trailing.end < doc.line_at(trailing.end.line).range.end
	{
		return range.union(&trailing);
	}
	if let Some(leading) = leading_whitespace(doc, range)
		&& leading.start.character > 0
	{
		return range.union(&leading);
	}
	range
}

/// Content of whole lines spanned by `range`, without line breaks.
pub fn full_line_range(doc: &TextDocument, range: Range) -> Range {
	Range::new(Position::new(range.start.line, 0), doc.line_at(range.end.line).range.end)
}

/// Line break before the first line of `range`.
pub fn line_leading_delimiter(doc: &TextDocument, range: Range) -> Option<Range> {
	(range.start.line > 0).then(|| {
		Range::new(
			doc.line_at(range.start.line - 1).range.end,
			Position::new(range.start.line, 0),
		)
	})
}

/// Line break after the last line of `range`.
pub fn line_trailing_delimiter(doc: &TextDocument, range: Range) -> Option<Range> {
	(range.end.line + 1 < doc.line_count()).then(|| {
		Range::new(
			doc.line_at(range.end.line).range.end,
			Position::new(range.end.line + 1, 0),
		)
	})
}

/// Whole lines plus one adjacent line break, preferring the following one.
pub fn line_removal_range(doc: &TextDocument, range: Range) -> Range {
	let full = full_line_range(doc, range);
	if let Some(trailing) = line_trailing_delimiter(doc, full) {
		return full.union(&trailing);
	}
	match line_leading_delimiter(doc, full) {
		Some(leading) => full.union(&leading),
		None => full,
	}
}

/// Blank lines between the previous paragraph and `range`.
pub fn paragraph_leading_delimiter(doc: &TextDocument, range: Range) -> Option<Range> {
	if range.start.line == 0 {
		return None;
	}
	let start = (0..range.start.line)
		.rev()
		.find(|&line| !doc.line_at(line).is_empty_or_whitespace())
		.map_or(Position::new(0, 0), |line| doc.line_at(line).range.end);
	Some(Range::new(start, Position::new(range.start.line, 0)))
}

/// Blank lines between `range` and the next paragraph.
pub fn paragraph_trailing_delimiter(doc: &TextDocument, range: Range) -> Option<Range> {
	let last = doc.line_count() - 1;
	if range.end.line >= last {
		return None;
	}
	let end = (range.end.line + 1..=last)
		.find(|&line| !doc.line_at(line).is_empty_or_whitespace())
		.map_or(doc.end_position(), |line| Position::new(line, 0));
	Some(Range::new(doc.line_at(range.end.line).range.end, end))
}

/// Whole paragraph lines plus the blank lines after it, or before it when it
/// ends the document.
pub fn paragraph_removal_range(doc: &TextDocument, range: Range) -> Range {
	let full = full_line_range(doc, range);
	if let Some(trailing) = paragraph_trailing_delimiter(doc, full) {
		return full.union(&trailing);
	}
	match paragraph_leading_delimiter(doc, full) {
		Some(leading) => full.union(&leading),
		None => full,
	}
}

/// Returns true if `range` covers exactly the trimmed content of its lines.
pub fn is_whole_lines(doc: &TextDocument, range: Range) -> bool {
	let start = doc.line_at(range.start.line);
	let end = doc.line_at(range.end.line);
	!start.is_empty_or_whitespace()
		&& !end.is_empty_or_whitespace()
		&& start.trimmed_range().start == range.start
		&& end.trimmed_range().end == range.end
}

/// Shrinks `range` to exclude surrounding whitespace.
pub fn shrink_to_content(doc: &TextDocument, range: Range) -> Range {
	let text = doc.get_text(Some(range));
	let leading = utf16(&text) - utf16(text.trim_start());
	let trailing = utf16(&text) - utf16(text.trim_end());
	if leading + trailing >= utf16(&text) {
		return Range::empty(range.start);
	}
	let start_offset = doc.offset_at(range.start) + leading;
	let end_offset = doc.offset_at(range.end) - trailing;
	Range::new(doc.position_at(start_offset), doc.position_at(end_offset))
}

fn utf16(text: &str) -> usize {
	pinpoint_primitives::graphemes::utf16_len(text)
}

fn prefix_utf16(text: &str, col: usize) -> &str {
	&text[..pinpoint_primitives::graphemes::utf16_to_byte(text, col)]
}

fn suffix_utf16(text: &str, col: usize) -> &str {
	&text[pinpoint_primitives::graphemes::utf16_to_byte(text, col)..]
}
