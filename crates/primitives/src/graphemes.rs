//! UTF-16 aware string helpers.
//!
//! Hosts address text in UTF-16 code units while Rust strings are UTF-8. These
//! helpers translate between the two within a single string, usually one line.

use unicode_segmentation::UnicodeSegmentation;

/// Returns the length of `text` in UTF-16 code units.
#[inline]
pub fn utf16_len(text: &str) -> usize {
	text.chars().map(char::len_utf16).sum()
}

/// Converts a UTF-8 byte offset into a UTF-16 code unit offset.
///
/// Offsets past the end clamp to the end of `text`.
pub fn byte_to_utf16(text: &str, byte: usize) -> usize {
	let byte = byte.min(text.len());
	utf16_len(&text[..floor_char_boundary(text, byte)])
}

/// Converts a UTF-16 code unit offset into a UTF-8 byte offset.
///
/// An offset falling inside a surrogate pair snaps back to the start of that
/// character. Offsets past the end clamp to `text.len()`.
pub fn utf16_to_byte(text: &str, utf16: usize) -> usize {
	let mut units = 0;
	for (byte, ch) in text.char_indices() {
		let next = units + ch.len_utf16();
		if next > utf16 {
			return byte;
		}
		units = next;
	}
	text.len()
}

fn floor_char_boundary(text: &str, mut byte: usize) -> usize {
	while byte > 0 && !text.is_char_boundary(byte) {
		byte -= 1;
	}
	byte
}

/// A grapheme cluster with its UTF-16 extent inside the source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grapheme<'a> {
	/// UTF-16 offset of the first code unit.
	pub start: usize,
	/// UTF-16 offset one past the last code unit.
	pub end: usize,
	/// The cluster text.
	pub text: &'a str,
}

/// Splits `text` into extended grapheme clusters, reporting UTF-16 extents.
pub fn graphemes_utf16(text: &str) -> impl Iterator<Item = Grapheme<'_>> {
	let mut offset = 0;
	text.graphemes(true).map(move |cluster| {
		let start = offset;
		offset += utf16_len(cluster);
		Grapheme {
			start,
			end: offset,
			text: cluster,
		}
	})
}

/// Returns the UTF-16 column of the first non-whitespace character, or the
/// line length if the line is blank.
pub fn first_non_whitespace(text: &str) -> usize {
	let trimmed = text.trim_start();
	utf16_len(&text[..text.len() - trimmed.len()])
}

/// Returns the UTF-16 column just past the last non-whitespace character.
pub fn last_non_whitespace_end(text: &str) -> usize {
	utf16_len(text.trim_end())
}
