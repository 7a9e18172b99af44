use std::collections::BTreeMap;

use pinpoint_primitives::graphemes::utf16_len;
use pinpoint_primitives::{Edit, Range, Selection, TextDocument};

use super::{ActionContext, ActionOutcome, merge_ranges};
use crate::error::{CommandError, Result};
use crate::host::{EditorId, Editors};
use crate::targets::{Target, TargetKind, TargetPosition};
use crate::updater::{EditsUpdater, ExpansionBehavior};

/// One editor's share of a bring or move.
#[derive(Default)]
struct EditorPlan {
	edits: Vec<Edit>,
	/// Destination index, tracked range, and the UTF-16 lengths of the
	/// delimiter inserted before and after the text.
	destinations: Vec<(usize, Range, usize, usize)>,
	sources: Vec<(usize, Range)>,
	removals: Vec<Range>,
}

/// Copies source text over the destinations, removing the sources on a move.
///
/// Sources and destinations pair up one to one. A single destination
/// receives every source joined by the first source's delimiter; a single
/// source is copied to every destination.
pub(super) fn bring_move(
	ctx: &mut ActionContext<'_>,
	sources: &[Target],
	destinations: &[Target],
	is_move: bool,
) -> Result<ActionOutcome> {
	let texts = source_texts(ctx.editors, sources, destinations.len())?;

	let mut plans: BTreeMap<EditorId, EditorPlan> = BTreeMap::new();
	for (index, (destination, text)) in destinations.iter().zip(texts).enumerate() {
		let plan = plans.entry(destination.editor).or_default();
		let (edit, lead, trail) = destination_edit(destination, text);
		let tracked = if edit.is_replace {
			edit.range
		} else {
			Range::empty(edit.range.start)
		};
		plan.edits.push(edit);
		plan.destinations.push((index, tracked, lead, trail));
	}
	for (index, source) in sources.iter().enumerate() {
		let doc = ctx.editors.get(source.editor)?.document();
		let plan = plans.entry(source.editor).or_default();
		plan.sources.push((index, source.content_range));
		if is_move {
			plan.removals.push(source.removal_range(doc));
		}
	}

	let mut that: Vec<Option<(EditorId, Selection)>> = vec![None; destinations.len()];
	let mut source: Vec<Option<(EditorId, Selection)>> = vec![None; sources.len()];
	for (editor, mut plan) in plans {
		plan.edits
			.extend(merge_ranges(std::mem::take(&mut plan.removals)).into_iter().map(Edit::delete));
		let host = ctx.editors.get_mut(editor)?;
		let updated = EditsUpdater::new(ctx.updater, host, plan.edits)
			.ranges(
				plan.destinations.iter().map(|(_, range, ..)| *range).collect(),
				ExpansionBehavior::CLOSED_CLOSED,
			)
			.ranges(
				plan.sources.iter().map(|(_, range)| *range).collect(),
				ExpansionBehavior::CLOSED_CLOSED,
			)
			.update_editor_selections(ExpansionBehavior::OPEN_CLOSED)
			.run()?;
		let mut groups = updated.ranges.into_iter();
		let (placed, moved) = (groups.next().unwrap_or_default(), groups.next().unwrap_or_default());

		let doc = ctx.editors.get(editor)?.document();
		for ((index, _, lead, trail), range) in plan.destinations.iter().zip(placed) {
			let range = trim(doc, range, *lead, *trail);
			that[*index] = Some((editor, range.to_selection(destinations[*index].is_reversed)));
		}
		for ((index, _), range) in plan.sources.iter().zip(moved) {
			source[*index] = Some((editor, range.to_selection(sources[*index].is_reversed)));
		}
	}
	tracing::debug!(sources = sources.len(), destinations = destinations.len(), is_move, "Bring/move");

	Ok(ActionOutcome {
		that: that.into_iter().flatten().collect(),
		source: Some(source.into_iter().flatten().collect()),
	})
}

/// The text each destination receives, in destination order.
fn source_texts(editors: &Editors, sources: &[Target], destinations: usize) -> Result<Vec<String>> {
	let mut texts = Vec::with_capacity(sources.len());
	for source in sources {
		texts.push(source.text(editors.get(source.editor)?.document()));
	}
	match (texts.len(), destinations) {
		(n, m) if n == m => Ok(texts),
		(_, 1) => {
			let first = sources.first().ok_or(CommandError::InvalidCommand("nothing to bring".into()))?;
			let delimiter = first.insertion_delimiter(editors.get(first.editor)?.document());
			Ok(vec![texts.join(&delimiter)])
		}
		(1, m) => Ok(vec![texts.remove(0); m]),
		(n, m) => Err(CommandError::InvalidCommand(format!(
			"cannot pair {n} source(s) with {m} destination(s)"
		))),
	}
}

/// The edit placing `text` at `destination`, with the delimiter lengths it
/// adds before and after the text.
fn destination_edit(destination: &Target, text: String) -> (Edit, usize, usize) {
	let range = destination.content_range;
	match &destination.kind {
		TargetKind::Position {
			position: TargetPosition::Before,
			insertion_delimiter,
		} => (
			Edit::insert(range.start, format!("{text}{insertion_delimiter}")),
			0,
			utf16_len(insertion_delimiter),
		),
		TargetKind::Position {
			position: TargetPosition::After,
			insertion_delimiter,
		} => (
			Edit::insert(range.end, format!("{insertion_delimiter}{text}")),
			utf16_len(insertion_delimiter),
			0,
		),
		TargetKind::Position { .. } => (Edit::insert(range.start, text), 0, 0),
		_ => (Edit::replace(range, text), 0, 0),
	}
}

/// Cuts the inserted delimiters off the tracked range.
fn trim(doc: &TextDocument, range: Range, lead: usize, trail: usize) -> Range {
	if lead == 0 && trail == 0 {
		return range;
	}
	let start = doc.offset_at(range.start) + lead;
	let end = doc.offset_at(range.end).saturating_sub(trail).max(start);
	Range::new(doc.position_at(start), doc.position_at(end))
}
