//! The delimiter table.

/// One kind of paired delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimiterInfo {
	pub name: &'static str,
	pub left: &'static str,
	pub right: &'static str,
	/// Quote-like delimiters open and close on the same line.
	pub single_line: bool,
}

impl DelimiterInfo {
	/// Opening and closing text are identical.
	pub fn is_symmetric(&self) -> bool {
		self.left == self.right
	}

	pub fn is_quote(&self) -> bool {
		QUOTES.contains(&self.name)
	}
}

const fn pair(name: &'static str, left: &'static str, right: &'static str, single_line: bool) -> DelimiterInfo {
	DelimiterInfo {
		name,
		left,
		right,
		single_line,
	}
}

/// Every known delimiter. Escaped variants precede their plain forms so a
/// longest-match scan sees them first.
pub const DELIMITERS: &[DelimiterInfo] = &[
	pair("escapedParentheses", "\\(", "\\)", false),
	pair("escapedDoubleQuotes", "\\\"", "\\\"", true),
	pair("escapedSingleQuotes", "\\'", "\\'", true),
	pair("parentheses", "(", ")", false),
	pair("squareBrackets", "[", "]", false),
	pair("curlyBrackets", "{", "}", false),
	pair("angleBrackets", "<", ">", false),
	pair("doubleQuotes", "\"", "\"", true),
	pair("singleQuotes", "'", "'", true),
	pair("backtickQuotes", "`", "`", true),
];

const QUOTES: &[&str] = &["doubleQuotes", "singleQuotes", "backtickQuotes"];

const COLLECTION_BOUNDARIES: &[&str] = &["parentheses", "squareBrackets", "curlyBrackets", "angleBrackets"];

pub fn delimiter(name: &str) -> Option<&'static DelimiterInfo> {
	DELIMITERS.iter().find(|info| info.name == name)
}

/// Resolves a delimiter name or group name to its members.
///
/// Groups are `any`, `string` (the three quote kinds) and
/// `collectionBoundary` (the four bracket kinds).
pub fn resolve(name: &str) -> Option<Vec<&'static DelimiterInfo>> {
	let names: &[&str] = match name {
		"any" => return Some(DELIMITERS.iter().collect()),
		"string" => QUOTES,
		"collectionBoundary" => COLLECTION_BOUNDARIES,
		single => return delimiter(single).map(|info| vec![info]),
	};
	Some(names.iter().filter_map(|name| delimiter(name)).collect())
}
