//! Marks: where a command starts.
//!
//! A mark resolves to zero or more targets in document order as the mark
//! defines it: editor order for cursors, storage order for the that-mark and
//! source-mark. Typed marks (hats, line numbers) produce typed targets; the
//! rest produce untyped ones.

use pinpoint_primitives::{Range, Selection};
use serde::{Deserialize, Serialize};

use crate::error::{CommandError, Result};
use crate::hats::{HatKey, HatTokenMap};
use crate::host::{EditorId, Editors, TextEditor};
use crate::targets::{Target, anchor_active_target};

mod stored;

pub use stored::{StoredMarks, StoredTargets};

/// How a line-number mark counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineNumberKind {
	/// Zero-based line index.
	Absolute,
	/// Offset from the primary selection's active line.
	Relative,
	/// The nearest line whose number ends in the given two digits.
	Modulo100,
}

/// A command's starting point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Mark {
	Cursor,
	That,
	Source,
	Nothing,
	DecoratedSymbol {
		hat_style: String,
		character: String,
	},
	LineNumber {
		#[serde(rename = "lineNumberType")]
		kind: LineNumberKind,
		#[serde(rename = "lineNumber")]
		line: isize,
	},
	Range {
		anchor: Box<Mark>,
		active: Box<Mark>,
		#[serde(default)]
		exclude_anchor: bool,
		#[serde(default)]
		exclude_active: bool,
	},
	Explicit {
		editor: EditorId,
		range: Range,
	},
}

/// Session state a mark may read.
pub struct MarkContext<'a> {
	pub editors: &'a Editors,
	pub hats: &'a HatTokenMap,
	pub stored: &'a StoredMarks,
	pub use_pre_phrase_snapshot: bool,
}

/// Resolves `mark` to targets.
pub fn resolve_mark(ctx: &MarkContext<'_>, mark: &Mark) -> Result<Vec<Target>> {
	let targets = match mark {
		Mark::Cursor => {
			let editor = ctx.editors.active()?;
			editor
				.selections()
				.iter()
				.map(|sel| Target::untyped(editor.id(), *sel, !sel.is_empty()))
				.collect()
		}
		Mark::That => stored_targets(ctx, ctx.stored.that.as_ref(), "that")?,
		Mark::Source => stored_targets(ctx, ctx.stored.source.as_ref(), "source")?,
		Mark::Nothing => Vec::new(),
		Mark::DecoratedSymbol { hat_style, character } => vec![hat_target(ctx, &HatKey::new(hat_style.as_str(), character))?],
		Mark::LineNumber { kind, line } => vec![line_number_target(ctx.editors.active()?, *kind, *line)?],
		Mark::Range {
			anchor,
			active,
			exclude_anchor,
			exclude_active,
		} => {
			let anchors = resolve_mark(ctx, anchor)?;
			let actives = resolve_mark(ctx, active)?;
			if anchors.len() != actives.len() {
				return Err(CommandError::InvalidRange(format!(
					"{} anchor target(s) but {} active target(s)",
					anchors.len(),
					actives.len()
				)));
			}
			anchors
				.iter()
				.zip(&actives)
				.map(|(anchor, active)| anchor_active_target(anchor, active, *exclude_anchor, *exclude_active))
				.collect::<Result<_>>()?
		}
		Mark::Explicit { editor, range } => {
			let doc = ctx.editors.get(*editor)?.document();
			let range = doc.validate_range(*range);
			vec![Target::untyped(*editor, Selection::from_range(range, false), true)]
		}
	};
	tracing::trace!(?mark, count = targets.len(), "Resolved mark");
	Ok(targets)
}

fn stored_targets(ctx: &MarkContext<'_>, stored: Option<&StoredTargets>, name: &str) -> Result<Vec<Target>> {
	let stored = stored.ok_or_else(|| CommandError::MarkNotFound(format!("{name} mark")))?;
	stored
		.selections()
		.into_iter()
		.map(|(editor, selection)| {
			ctx.editors.get(editor)?;
			Ok(Target::untyped(editor, selection, true))
		})
		.collect()
}

fn hat_target(ctx: &MarkContext<'_>, key: &HatKey) -> Result<Target> {
	let not_found = || CommandError::MarkNotFound(format!("hat {key}"));
	let token = ctx.hats.get_token(key, ctx.use_pre_phrase_snapshot).ok_or_else(not_found)?;
	let doc = ctx.editors.get(token.editor)?.document();
	// Typed over or deleted since the hat was placed.
	if doc.get_text(Some(token.range)) != token.text {
		return Err(not_found());
	}
	Ok(Target::token(token.editor, token.range))
}

fn line_number_target(editor: &dyn TextEditor, kind: LineNumberKind, line: isize) -> Result<Target> {
	let doc = editor.document();
	let line_count = doc.line_count();
	let primary = editor.selections().first().map(|sel| sel.active.line).unwrap_or_default();
	let index = match kind {
		LineNumberKind::Absolute => usize::try_from(line).ok(),
		LineNumberKind::Relative => primary.checked_add_signed(line),
		LineNumberKind::Modulo100 => {
			let visible = editor.visible_ranges().first().copied().unwrap_or_else(|| doc.range());
			let wanted = usize::try_from(line.rem_euclid(100)).unwrap_or_default();
			nearest_modulo100(visible.start.line, visible.end.line, primary, wanted)
				.or_else(|| nearest_modulo100(0, line_count - 1, primary, wanted))
		}
	};
	let index = index.filter(|index| *index < line_count).ok_or(CommandError::OutOfRange)?;
	Ok(Target::line(editor.id(), doc.line_at(index).range))
}

/// The line in `[first, last]` closest to `near` whose number mod 100 is
/// `wanted`; the earlier line wins a tie.
fn nearest_modulo100(first: usize, last: usize, near: usize, wanted: usize) -> Option<usize> {
	(first..=last)
		.filter(|line| line % 100 == wanted)
		.min_by_key(|line| (line.abs_diff(near), *line))
}
