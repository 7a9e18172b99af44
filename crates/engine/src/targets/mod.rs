//! Resolved targets.
//!
//! A [`Target`] is a content range in one editor plus a [`TargetKind`] that
//! decides how the range behaves when something is removed from it or
//! inserted next to it. Every derived range is computed on demand against the
//! current document, so a target stays correct as long as its content range
//! is kept up to date by the range updater.

use pinpoint_primitives::{Range, Selection, TextDocument};

use crate::host::EditorId;

pub mod delimiters;
mod range;

pub use range::{anchor_active_target, continuous_range_target, range_target_from_indices};

/// How a scope-backed target extends its removal range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalStyle {
	/// Remove exactly the content.
	Content,
	/// Consume one adjacent whitespace run, as for tokens.
	Token,
	/// Whole-line content removes whole lines, anything else behaves like
	/// [`RemovalStyle::Token`].
	Smart,
}

/// Where a position modifier places its empty target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetPosition {
	Before,
	After,
	Start,
	End,
}

/// Behaviour attached to a content range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetKind {
	/// A plain selection that has not been given a type yet.
	Untyped { has_explicit_range: bool },
	/// A range taken verbatim; nothing beyond the content is ever touched.
	Raw,
	Token,
	Line,
	Paragraph,
	Document,
	/// A scope produced by a named handler (syntax scopes, words, regex
	/// matches, characters).
	Scope { delimiter: String, removal: RemovalStyle },
	/// A delimiter pair. `content_range` spans both delimiters.
	SurroundingPair { interior: Range, boundary: [Range; 2] },
	/// The range strictly inside a pair.
	Interior,
	/// An empty target before, after, at the start or at the end of another.
	Position { position: TargetPosition, insertion_delimiter: String },
	/// A continuous range between two targets of different kinds.
	Range {
		start: Box<Target>,
		end: Box<Target>,
		exclude_start: bool,
		exclude_end: bool,
	},
}

/// A resolved, typed range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
	pub editor: EditorId,
	pub is_reversed: bool,
	pub content_range: Range,
	pub kind: TargetKind,
}

impl Target {
	pub fn new(editor: EditorId, content_range: Range, is_reversed: bool, kind: TargetKind) -> Self {
		Self {
			editor,
			is_reversed,
			content_range,
			kind,
		}
	}

	/// A target built from a selection with no explicit type.
	pub fn untyped(editor: EditorId, selection: Selection, has_explicit_range: bool) -> Self {
		Self::new(
			editor,
			selection.range(),
			selection.is_reversed(),
			TargetKind::Untyped { has_explicit_range },
		)
	}

	pub fn raw(editor: EditorId, content_range: Range, is_reversed: bool) -> Self {
		Self::new(editor, content_range, is_reversed, TargetKind::Raw)
	}

	pub fn token(editor: EditorId, content_range: Range) -> Self {
		Self::new(editor, content_range, false, TargetKind::Token)
	}

	pub fn line(editor: EditorId, content_range: Range) -> Self {
		Self::new(editor, content_range, false, TargetKind::Line)
	}

	/// Returns a copy covering `range`, keeping editor, direction and kind.
	pub fn with_content_range(&self, range: Range) -> Self {
		Self {
			content_range: range,
			..self.clone()
		}
	}

	pub fn with_reversed(mut self, is_reversed: bool) -> Self {
		self.is_reversed = is_reversed;
		self
	}

	/// Short name of the kind, used in logs and by the continuous-range rules.
	pub fn type_name(&self) -> &'static str {
		match &self.kind {
			TargetKind::Untyped { .. } => "untyped",
			TargetKind::Raw => "raw",
			TargetKind::Token => "token",
			TargetKind::Line => "line",
			TargetKind::Paragraph => "paragraph",
			TargetKind::Document => "document",
			TargetKind::Scope { .. } => "scope",
			TargetKind::SurroundingPair { .. } => "surroundingPair",
			TargetKind::Interior => "interior",
			TargetKind::Position { .. } => "position",
			TargetKind::Range { .. } => "range",
		}
	}

	/// False only for untyped targets built from an empty or implicit selection.
	pub fn has_explicit_range(&self) -> bool {
		match &self.kind {
			TargetKind::Untyped { has_explicit_range } => *has_explicit_range,
			_ => true,
		}
	}

	/// Returns true if the content is made of whole lines.
	pub fn is_line(&self, doc: &TextDocument) -> bool {
		match &self.kind {
			TargetKind::Line | TargetKind::Paragraph | TargetKind::Document => true,
			TargetKind::Scope {
				removal: RemovalStyle::Smart,
				..
			} => delimiters::is_whole_lines(doc, self.content_range),
			TargetKind::Range { start, end, .. } => start.is_line(doc) && end.is_line(doc),
			_ => false,
		}
	}

	/// Text placed between this target and something inserted next to it.
	pub fn insertion_delimiter(&self, doc: &TextDocument) -> String {
		match &self.kind {
			TargetKind::Untyped { .. } | TargetKind::Token | TargetKind::SurroundingPair { .. } => " ".to_string(),
			TargetKind::Interior => " ".to_string(),
			TargetKind::Raw => String::new(),
			TargetKind::Line | TargetKind::Document => "\n".to_string(),
			TargetKind::Paragraph => "\n\n".to_string(),
			TargetKind::Scope { delimiter, removal } => {
				if *removal == RemovalStyle::Smart && delimiter == " " && self.is_line(doc) {
					"\n".to_string()
				} else {
					delimiter.clone()
				}
			}
			TargetKind::Position {
				insertion_delimiter, ..
			} => insertion_delimiter.clone(),
			TargetKind::Range { start, .. } => start.insertion_delimiter(doc),
		}
	}

	/// Separator run immediately before the content, if any.
	pub fn leading_delimiter_range(&self, doc: &TextDocument) -> Option<Range> {
		match &self.kind {
			TargetKind::Raw | TargetKind::Document | TargetKind::Interior | TargetKind::Position { .. } => None,
			TargetKind::Scope {
				removal: RemovalStyle::Content,
				..
			} => None,
			TargetKind::Line => delimiters::line_leading_delimiter(doc, self.content_range),
			TargetKind::Paragraph => delimiters::paragraph_leading_delimiter(doc, self.content_range),
			TargetKind::Range { start, .. } => start.leading_delimiter_range(doc),
			_ if self.is_line(doc) => delimiters::line_leading_delimiter(doc, self.content_range),
			_ => delimiters::leading_whitespace(doc, self.content_range),
		}
	}

	/// Separator run immediately after the content, if any.
	pub fn trailing_delimiter_range(&self, doc: &TextDocument) -> Option<Range> {
		match &self.kind {
			TargetKind::Raw | TargetKind::Document | TargetKind::Interior | TargetKind::Position { .. } => None,
			TargetKind::Scope {
				removal: RemovalStyle::Content,
				..
			} => None,
			TargetKind::Line => delimiters::line_trailing_delimiter(doc, self.content_range),
			TargetKind::Paragraph => delimiters::paragraph_trailing_delimiter(doc, self.content_range),
			TargetKind::Range { end, .. } => end.trailing_delimiter_range(doc),
			_ if self.is_line(doc) => delimiters::line_trailing_delimiter(doc, self.content_range),
			_ => delimiters::trailing_whitespace(doc, self.content_range),
		}
	}

	/// Range deleted by a remove action. Always contains the content range.
	pub fn removal_range(&self, doc: &TextDocument) -> Range {
		let content = self.content_range;
		let removal = match &self.kind {
			TargetKind::Raw | TargetKind::Interior | TargetKind::Position { .. } => content,
			TargetKind::Scope {
				removal: RemovalStyle::Content,
				..
			} => content,
			TargetKind::Untyped { has_explicit_range } => {
				if *has_explicit_range || doc.get_text(Some(content)).trim().is_empty() {
					content
				} else {
					delimiters::token_removal_range(doc, content)
				}
			}
			TargetKind::Document => doc.range(),
			TargetKind::Line => delimiters::line_removal_range(doc, content),
			TargetKind::Paragraph => delimiters::paragraph_removal_range(doc, content),
			TargetKind::Range {
				start,
				end,
				exclude_start,
				exclude_end,
			} => {
				let from = if *exclude_start {
					content.start
				} else {
					start.removal_range(doc).start
				};
				let to = if *exclude_end {
					content.end
				} else {
					end.removal_range(doc).end
				};
				Range::new(from, to)
			}
			_ if self.is_line(doc) => delimiters::line_removal_range(doc, content),
			_ => delimiters::token_removal_range(doc, content),
		};
		removal.union(&content)
	}

	/// The opening and closing delimiters of a pair target.
	pub fn boundary(&self) -> Option<[Target; 2]> {
		match &self.kind {
			TargetKind::SurroundingPair { boundary, .. } => Some(boundary.map(|range| Target {
				editor: self.editor,
				is_reversed: self.is_reversed,
				content_range: range,
				kind: TargetKind::Token,
			})),
			_ => None,
		}
	}

	/// The range strictly inside a pair target.
	pub fn interior(&self) -> Option<Target> {
		match &self.kind {
			TargetKind::SurroundingPair { interior, .. } => Some(Target {
				editor: self.editor,
				is_reversed: self.is_reversed,
				content_range: *interior,
				kind: TargetKind::Interior,
			}),
			_ => None,
		}
	}

	/// The content as an editor selection, honouring direction.
	pub fn selection(&self) -> Selection {
		self.content_range.to_selection(self.is_reversed)
	}

	pub fn text(&self, doc: &TextDocument) -> String {
		doc.get_text(Some(self.content_range))
	}
}
