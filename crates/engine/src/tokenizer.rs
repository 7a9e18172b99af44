//! Splits lines into tokens and tokens into sub-words.
//!
//! A token is, in priority order: a fixed multi-character operator, a decimal
//! number, an identifier (word characters joined by word separators), a run
//! of one repeatable symbol, or any other single non-space symbol.

use pinpoint_primitives::graphemes::{byte_to_utf16, utf16_len};

/// Multi-character operators that always form one token.
const FIXED_TOKENS: &[&str] = &[
	"!==", "!=", "+=", "-=", "*=", "/=", "%=", "<=", ">=", "=>", "->", "??", "\"\"\"", "```", "/*", "*/",
	"<!--", "-->",
];

/// Symbols whose runs collapse into a single token, e.g. `---` or `::`.
const REPEATABLE_SYMBOLS: &[&str] = &["-", "+", "*", "/", "=", "<", ">", "_", "#", ".", "|", "&", ":"];

const IDENTIFIER_WORD_CLASS: &str = r"[\p{L}\p{M}\p{N}]";

/// Digits, a dot, digits; not part of a longer dotted sequence.
const NUMBER_PATTERN: &str = r"(?<![.\d])\d+\.\d+(?![.\d])";

const SINGLE_SYMBOL_PATTERN: &str = r"[^\s\w]";

/// A token found on one line, in UTF-16 columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineToken<'a> {
	pub start: usize,
	pub end: usize,
	pub text: &'a str,
}

/// Compiled token and identifier matchers for one set of word separators.
#[derive(Debug)]
pub struct Tokenizer {
	token: fancy_regex::Regex,
	identifier: regex::Regex,
	identifier_pattern: String,
	separators: Vec<String>,
}

impl Tokenizer {
	/// Builds matchers for `word_separators`.
	pub fn new(word_separators: &[String]) -> Result<Self, String> {
		let separators: Vec<String> = word_separators.iter().map(|sep| regex::escape(sep)).collect();
		let mut identifier_parts = vec![IDENTIFIER_WORD_CLASS.to_string()];
		identifier_parts.extend(separators.iter().cloned());
		let identifier_pattern = format!("(?:{})+", identifier_parts.join("|"));

		let fixed = FIXED_TOKENS.iter().map(|tok| regex::escape(tok)).collect::<Vec<_>>().join("|");
		let repeatable = REPEATABLE_SYMBOLS
			.iter()
			.map(|sym| format!("{}+", regex::escape(sym)))
			.collect::<Vec<_>>()
			.join("|");

		// Alternation order decides ties.
		let token_pattern =
			[fixed.as_str(), NUMBER_PATTERN, &identifier_pattern, &repeatable, SINGLE_SYMBOL_PATTERN].join("|");

		let token = fancy_regex::Regex::new(&token_pattern).map_err(|err| err.to_string())?;
		let identifier = regex::Regex::new(&format!("^{identifier_pattern}$")).map_err(|err| err.to_string())?;
		Ok(Self {
			token,
			identifier,
			identifier_pattern,
			separators: word_separators.to_vec(),
		})
	}

	/// Returns the tokens of `line` in order.
	pub fn tokenize<'a>(&self, line: &'a str) -> Vec<LineToken<'a>> {
		let mut tokens = Vec::new();
		for found in self.token.find_iter(line) {
			match found {
				Ok(m) => tokens.push(LineToken {
					start: byte_to_utf16(line, m.start()),
					end: byte_to_utf16(line, m.end()),
					text: m.as_str(),
				}),
				Err(err) => {
					tracing::warn!(error = %err, "Tokenizer gave up on line");
					break;
				}
			}
		}
		tokens
	}

	/// Unanchored pattern matching one identifier.
	pub fn identifier_pattern(&self) -> &str {
		&self.identifier_pattern
	}

	/// Returns true if `text` is entirely an identifier.
	pub fn is_identifier(&self, text: &str) -> bool {
		self.identifier.is_match(text)
	}

	/// Splits an identifier into sub-words at separators and case changes.
	///
	/// Offsets are UTF-16 columns relative to the start of `text`.
	pub fn split_words(&self, text: &str) -> Vec<(usize, usize)> {
		let mut words = Vec::new();
		let mut offset = 0;
		let mut rest = text;
		while !rest.is_empty() {
			let sep = self
				.separators
				.iter()
				.filter(|sep| !sep.is_empty())
				.filter_map(|sep| rest.find(sep.as_str()).map(|at| (at, sep.len())))
				.min();
			let (segment, skip) = match sep {
				Some((at, len)) => (&rest[..at], at + len),
				None => (rest, rest.len()),
			};
			for (start, end) in split_case(segment) {
				words.push((offset + start, offset + end));
			}
			offset += utf16_len(&rest[..skip]);
			rest = &rest[skip..];
		}
		words
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
	Upper,
	Lower,
	Digit,
	Other,
}

fn classify(ch: char) -> CharClass {
	if ch.is_uppercase() {
		CharClass::Upper
	} else if ch.is_lowercase() {
		CharClass::Lower
	} else if ch.is_numeric() {
		CharClass::Digit
	} else {
		CharClass::Other
	}
}

/// camelCase / PascalCase / ACRONYMWord / digit-run splitting.
fn split_case(segment: &str) -> Vec<(usize, usize)> {
	let chars: Vec<(usize, char)> = {
		let mut col = 0;
		segment
			.chars()
			.map(|ch| {
				let at = col;
				col += ch.len_utf16();
				(at, ch)
			})
			.collect()
	};
	let end = utf16_len(segment);
	let mut words = Vec::new();
	let mut start = match chars.first() {
		Some(&(col, _)) => col,
		None => return words,
	};
	for i in 1..chars.len() {
		let prev = classify(chars[i - 1].1);
		let cur = classify(chars[i].1);
		let next = chars.get(i + 1).map(|&(_, ch)| classify(ch));
		let boundary = match (prev, cur) {
			(CharClass::Lower, CharClass::Upper) => true,
			(CharClass::Upper, CharClass::Upper) => next == Some(CharClass::Lower),
			(CharClass::Digit, CharClass::Digit) => false,
			(CharClass::Digit, _) | (_, CharClass::Digit) => true,
			_ => false,
		};
		if boundary {
			words.push((start, chars[i].0));
			start = chars[i].0;
		}
	}
	words.push((start, end));
	words
}
