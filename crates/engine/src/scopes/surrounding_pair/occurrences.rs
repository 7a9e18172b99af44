//! Finding delimiter occurrences and matching them into pairs.
//!
//! Quotes are matched first, one line at a time: inside an open quote only
//! the same quote kind closes it. The resulting strings (or the syntax
//! tree's string nodes, when known) partition the document into contexts,
//! and brackets only pair with brackets of the same context, so a `(` inside
//! a string literal never matches a `)` outside it.

use pinpoint_primitives::graphemes::utf16_len;
use pinpoint_primitives::{Position, Range, TextDocument, TextLine};
use rustc_hash::FxHashMap;

use super::delimiters::{DELIMITERS, DelimiterInfo};
use crate::scopes::ForceDirection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
	Open,
	Close,
	/// Symmetric delimiter; the side depends on its neighbours.
	Either,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
	pub info: &'static DelimiterInfo,
	pub side: Side,
	pub range: Range,
}

/// A matched delimiter pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pair {
	pub info: &'static DelimiterInfo,
	pub open: Range,
	pub close: Range,
}

impl Pair {
	fn new(open: &Occurrence, close: &Occurrence) -> Self {
		Self {
			info: open.info,
			open: open.range,
			close: close.range,
		}
	}

	/// Both delimiters and everything between them.
	pub fn domain(&self) -> Range {
		Range::new(self.open.start, self.close.end)
	}

	pub fn interior(&self) -> Range {
		Range::new(self.open.end, self.close.start)
	}
}

/// Every delimiter occurrence on `line`, longest match first.
///
/// Quotes preceded by an odd number of backslashes are skipped, as are
/// escaped delimiters whose backslash is itself escaped.
pub fn scan_line(line: &TextLine) -> Vec<Occurrence> {
	let text = line.text.as_str();
	let n = line.line_number;
	let mut found = Vec::new();
	let mut byte = 0;
	let mut col = 0;
	let mut backslashes = 0usize;
	'scan: while byte < text.len() {
		let rest = &text[byte..];
		for info in DELIMITERS {
			let matched = if rest.starts_with(info.left) {
				Some((info.left, if info.is_symmetric() { Side::Either } else { Side::Open }))
			} else if !info.is_symmetric() && rest.starts_with(info.right) {
				Some((info.right, Side::Close))
			} else {
				None
			};
			let Some((delimiter_text, side)) = matched else {
				continue;
			};
			let escapable = info.is_quote() || info.left.starts_with('\\');
			if escapable && backslashes % 2 == 1 {
				continue;
			}
			let width = utf16_len(delimiter_text);
			found.push(Occurrence {
				info,
				side,
				range: Range::from_coords(n, col, n, col + width),
			});
			byte += delimiter_text.len();
			col += width;
			backslashes = 0;
			continue 'scan;
		}
		let Some(ch) = rest.chars().next() else {
			break;
		};
		backslashes = if ch == '\\' { backslashes + 1 } else { 0 };
		byte += ch.len_utf8();
		col += ch.len_utf16();
	}
	found
}

/// Pairs quotes on one line; an unclosed quote is dropped.
fn quote_pairs(occurrences: &[Occurrence]) -> Vec<Pair> {
	let mut pairs = Vec::new();
	let mut open: Option<&Occurrence> = None;
	for occ in occurrences.iter().filter(|occ| occ.info.is_quote()) {
		match open {
			None => open = Some(occ),
			Some(first) if first.info.name == occ.info.name => {
				pairs.push(Pair::new(first, occ));
				open = None;
			}
			Some(_) => {}
		}
	}
	pairs
}

/// Pairs consecutive occurrences of each escaped symmetric delimiter.
fn escaped_symmetric_pairs(occurrences: &[Occurrence]) -> Vec<Pair> {
	let mut pairs = Vec::new();
	let mut open: FxHashMap<&'static str, &Occurrence> = FxHashMap::default();
	for occ in occurrences
		.iter()
		.filter(|occ| occ.side == Side::Either && !occ.info.is_quote())
	{
		match open.remove(occ.info.name) {
			Some(first) => pairs.push(Pair::new(first, occ)),
			None => {
				open.insert(occ.info.name, occ);
			}
		}
	}
	pairs
}

/// Index of the innermost context strictly enclosing `range`.
fn context_of(contexts: &[Range], range: Range) -> Option<usize> {
	contexts
		.iter()
		.enumerate()
		.filter(|(_, ctx)| ctx.start < range.start && range.end < ctx.end)
		.min_by_key(|(_, ctx)| (ctx.end, std::cmp::Reverse(ctx.start)))
		.map(|(i, _)| i)
}

/// Matches every pair of the `wanted` kinds in `doc`, ordered by start.
///
/// `string_ranges` are string literal ranges from a syntax tree; without
/// them, quoted text found on each line serves the same purpose.
pub fn find_pairs(doc: &TextDocument, string_ranges: Option<&[Range]>, wanted: &[&'static DelimiterInfo]) -> Vec<Pair> {
	let lines: Vec<Vec<Occurrence>> = (0..doc.line_count()).map(|n| scan_line(&doc.line_at(n))).collect();

	let mut pairs: Vec<Pair> = Vec::new();
	let mut textual_strings = Vec::new();
	for occurrences in &lines {
		let quotes = quote_pairs(occurrences);
		textual_strings.extend(quotes.iter().map(Pair::domain));
		pairs.extend(quotes);
		pairs.extend(escaped_symmetric_pairs(occurrences));
	}
	let contexts = string_ranges.unwrap_or(&textual_strings);

	let mut stacks: FxHashMap<(&'static str, Option<usize>), Vec<Occurrence>> = FxHashMap::default();
	for occ in lines.iter().flatten().filter(|occ| occ.side != Side::Either) {
		let key = (occ.info.name, context_of(contexts, occ.range));
		match occ.side {
			Side::Open => stacks.entry(key).or_default().push(*occ),
			Side::Close => {
				if let Some(open) = stacks.get_mut(&key).and_then(Vec::pop) {
					pairs.push(Pair::new(&open, occ));
				}
			}
			Side::Either => {}
		}
	}

	pairs.retain(|pair| wanted.iter().any(|info| info.name == pair.info.name));
	pairs.sort_by_key(|pair| (pair.open.start, std::cmp::Reverse(pair.close.end)));
	pairs
}

/// Reads a symmetric delimiter touching `position` as a closing (`Left`) or
/// opening (`Right`) delimiter and pairs it with its neighbour on the line.
pub fn forced_pair(
	doc: &TextDocument,
	position: Position,
	force: ForceDirection,
	wanted: &[&'static DelimiterInfo],
) -> Option<Pair> {
	let occurrences: Vec<Occurrence> = scan_line(&doc.line_at(position.line))
		.into_iter()
		.filter(|occ| occ.side == Side::Either && wanted.iter().any(|info| info.name == occ.info.name))
		.collect();
	let index = occurrences
		.iter()
		.position(|occ| occ.range.contains_position(position))?;
	let touching = &occurrences[index];
	let same_kind = |occ: &&Occurrence| occ.info.name == touching.info.name;
	match force {
		ForceDirection::Left => occurrences[..index]
			.iter()
			.rev()
			.find(same_kind)
			.map(|open| Pair::new(open, touching)),
		ForceDirection::Right => occurrences[index + 1..]
			.iter()
			.find(same_kind)
			.map(|close| Pair::new(touching, close)),
	}
}
