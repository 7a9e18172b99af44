use pinpoint_primitives::{Edit, Position, Range, Selection};
use serde::{Deserialize, Serialize};

use super::{ActionContext, ActionOutcome, apply_selections, by_editor, merge_ranges};
use crate::error::{CommandError, Result};
use crate::host::EditorId;
use crate::targets::Target;
use crate::updater::{EditsUpdater, ExpansionBehavior};

/// Replacement text for [`super::Action::ReplaceWithText`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReplaceWith {
	/// One text for every target, or one text per target.
	Texts(Vec<String>),
	/// Consecutive numbers starting at `start`.
	Numbers { start: i64 },
}

impl ReplaceWith {
	fn texts(&self, count: usize) -> Result<Vec<String>> {
		match self {
			Self::Texts(texts) if texts.len() == count => Ok(texts.clone()),
			Self::Texts(texts) if texts.len() == 1 => Ok(vec![texts[0].clone(); count]),
			Self::Texts(texts) => Err(CommandError::InvalidCommand(format!(
				"{} replacement text(s) for {count} target(s)",
				texts.len()
			))),
			Self::Numbers { start } => (0..count)
				.map(|i| {
					i64::try_from(i)
						.ok()
						.and_then(|i| start.checked_add(i))
						.map(|n| n.to_string())
						.ok_or_else(|| CommandError::InvalidCommand(format!("numbers from {start} overflow")))
				})
				.collect(),
		}
	}
}

/// Applies one editor's batch, carrying `ranges` and the editor's
/// selections across it.
fn edit_editor(
	ctx: &mut ActionContext<'_>,
	editor: EditorId,
	edits: Vec<Edit>,
	ranges: Vec<Range>,
	behavior: ExpansionBehavior,
	selection_behavior: ExpansionBehavior,
) -> Result<Vec<Range>> {
	let host = ctx.editors.get_mut(editor)?;
	let mut updated = EditsUpdater::new(ctx.updater, host, edits)
		.ranges(ranges, behavior)
		.update_editor_selections(selection_behavior)
		.run()?;
	Ok(updated.ranges.pop().unwrap_or_default())
}

fn carets(editor: EditorId, ranges: Vec<Range>) -> impl Iterator<Item = (EditorId, Selection)> {
	ranges.into_iter().map(move |range| (editor, range.to_selection(false)))
}

pub(super) fn remove(ctx: &mut ActionContext<'_>, targets: &[Target]) -> Result<ActionOutcome> {
	let mut that = Vec::new();
	for (editor, group) in by_editor(targets.iter().map(|target| (target.editor, target))) {
		let doc = ctx.editors.get(editor)?.document();
		let ranges = merge_ranges(group.iter().map(|target| target.removal_range(doc)).collect());
		let edits = ranges.iter().map(|range| Edit::delete(*range)).collect();
		let updated = edit_editor(
			ctx,
			editor,
			edits,
			ranges,
			ExpansionBehavior::CLOSED_CLOSED,
			ExpansionBehavior::CLOSED_CLOSED,
		)?;
		that.extend(carets(editor, updated));
	}
	Ok(ActionOutcome::that(that))
}

pub(super) fn clear_and_set_selection(ctx: &mut ActionContext<'_>, targets: &[Target]) -> Result<ActionOutcome> {
	let mut that = Vec::new();
	for (editor, group) in by_editor(targets.iter().map(|target| (target.editor, target.content_range))) {
		let ranges = merge_ranges(group);
		let edits = ranges.iter().map(|range| Edit::delete(*range)).collect();
		let updated = edit_editor(
			ctx,
			editor,
			edits,
			ranges,
			ExpansionBehavior::CLOSED_CLOSED,
			ExpansionBehavior::CLOSED_CLOSED,
		)?;
		that.extend(carets(editor, updated));
	}
	apply_selections(ctx.editors, &that)?;
	Ok(ActionOutcome::that(that))
}

pub(super) fn replace_with_text(ctx: &mut ActionContext<'_>, targets: &[Target], replace_with: &ReplaceWith) -> Result<ActionOutcome> {
	let texts = replace_with.texts(targets.len())?;
	let mut that = Vec::new();
	let items = targets.iter().zip(texts).map(|(target, text)| (target.editor, (target, text)));
	for (editor, group) in by_editor(items) {
		let edits = group
			.iter()
			.map(|(target, text)| Edit::replace(target.content_range, text.as_str()))
			.collect();
		let ranges = group.iter().map(|(target, _)| target.content_range).collect();
		let updated = edit_editor(
			ctx,
			editor,
			edits,
			ranges,
			ExpansionBehavior::CLOSED_CLOSED,
			ExpansionBehavior::CLOSED_CLOSED,
		)?;
		that.extend(carets(editor, updated));
	}
	Ok(ActionOutcome::that(that))
}

pub(super) fn wrap(ctx: &mut ActionContext<'_>, targets: &[Target], left: &str, right: &str) -> Result<ActionOutcome> {
	let mut that = Vec::new();
	for (editor, group) in by_editor(targets.iter().map(|target| (target.editor, target))) {
		let mut edits = Vec::with_capacity(group.len() * 2);
		for target in &group {
			edits.push(Edit::insert(target.content_range.start, left));
			edits.push(Edit::insert(target.content_range.end, right));
		}
		let ranges = group.iter().map(|target| target.content_range).collect();
		// Closed ends take in both delimiters.
		let updated = edit_editor(
			ctx,
			editor,
			edits,
			ranges,
			ExpansionBehavior::CLOSED_CLOSED,
			ExpansionBehavior::OPEN_OPEN,
		)?;
		let wrapped = group
			.iter()
			.zip(updated)
			.map(|(target, range)| (editor, range.to_selection(target.is_reversed)));
		that.extend(wrapped);
	}
	Ok(ActionOutcome::that(that))
}

pub(super) fn insert_empty_lines(ctx: &mut ActionContext<'_>, targets: &[Target], after: bool) -> Result<ActionOutcome> {
	let mut that = Vec::new();
	for (editor, group) in by_editor(targets.iter().map(|target| (target.editor, target))) {
		let doc = ctx.editors.get(editor)?.document();
		let mut points: Vec<Position> = group
			.iter()
			.map(|target| {
				if after {
					doc.line_at(target.content_range.end.line).range.end
				} else {
					doc.line_at(target.content_range.start.line).range.start
				}
			})
			.collect();
		points.sort();
		points.dedup();
		let edits = points.iter().map(|point| Edit::insert(*point, "\n")).collect();
		let ranges = points.iter().map(|point| Range::empty(*point)).collect();
		// The new line sits before the break when inserting above, after it
		// when inserting below. Carets stay with the text they were on.
		let (behavior, carets_behavior) = if after {
			(ExpansionBehavior::OPEN_CLOSED, ExpansionBehavior::CLOSED_OPEN)
		} else {
			(ExpansionBehavior::CLOSED_OPEN, ExpansionBehavior::OPEN_CLOSED)
		};
		let updated = edit_editor(ctx, editor, edits, ranges, behavior, carets_behavior)?;
		that.extend(carets(editor, updated));
	}
	Ok(ActionOutcome::that(that))
}
