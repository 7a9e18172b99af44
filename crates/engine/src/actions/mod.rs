//! Actions: what a command does to its targets.
//!
//! Every action that edits goes through [`EditsUpdater`], so the ranges it
//! reports back (the new that-mark, the source-mark) and the editor's own
//! selections are carried across its edit batch. Edit batches are applied
//! once per editor and never retried.

use std::collections::BTreeMap;
use std::rc::Rc;

use pinpoint_primitives::{Range, Selection};
use serde::{Deserialize, Serialize};

use crate::error::{CommandError, Result};
use crate::host::{EditorId, Editors};
use crate::targets::Target;
use crate::updater::RangeUpdater;

mod bring_move;
mod edit;
mod selection;

pub use edit::ReplaceWith;

/// An action and its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
	tag = "name",
	content = "args",
	rename_all = "camelCase",
	rename_all_fields = "camelCase"
)]
pub enum Action {
	SetSelection,
	SetSelectionBefore,
	SetSelectionAfter,
	/// Deletes the content and leaves a caret in its place.
	ClearAndSetSelection,
	Remove,
	ReplaceWithText {
		replace_with: ReplaceWith,
	},
	WrapWithPairedDelimiter {
		left: String,
		right: String,
	},
	/// Copies the first target list over the second.
	Bring,
	/// Like [`Action::Bring`], then removes the sources.
	Move,
	InsertEmptyLineBefore,
	InsertEmptyLineAfter,
}

impl Action {
	/// Number of target lists the action consumes.
	pub fn target_count(&self) -> usize {
		match self {
			Self::Bring | Self::Move => 2,
			_ => 1,
		}
	}
}

/// Marks an action leaves behind for the next command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionOutcome {
	pub that: Vec<(EditorId, Selection)>,
	pub source: Option<Vec<(EditorId, Selection)>>,
}

impl ActionOutcome {
	fn that(that: Vec<(EditorId, Selection)>) -> Self {
		Self { that, source: None }
	}
}

/// Mutable session state an action works on.
pub struct ActionContext<'a> {
	pub editors: &'a mut Editors,
	pub updater: &'a Rc<RangeUpdater>,
}

/// Runs `action` over resolved target lists, one list per descriptor.
pub fn run_action(ctx: &mut ActionContext<'_>, action: &Action, targets: Vec<Vec<Target>>) -> Result<ActionOutcome> {
	if targets.len() != action.target_count() {
		return Err(CommandError::InvalidCommand(format!(
			"{action:?} takes {} target list(s), got {}",
			action.target_count(),
			targets.len()
		)));
	}
	let mut lists = targets.into_iter();
	let first = lists.next().unwrap_or_default();
	tracing::debug!(?action, targets = first.len(), "Running action");

	match action {
		Action::SetSelection => selection::set_selection(ctx, &first, selection::Placement::Content),
		Action::SetSelectionBefore => selection::set_selection(ctx, &first, selection::Placement::Before),
		Action::SetSelectionAfter => selection::set_selection(ctx, &first, selection::Placement::After),
		Action::ClearAndSetSelection => edit::clear_and_set_selection(ctx, &first),
		Action::Remove => edit::remove(ctx, &first),
		Action::ReplaceWithText { replace_with } => edit::replace_with_text(ctx, &first, replace_with),
		Action::WrapWithPairedDelimiter { left, right } => edit::wrap(ctx, &first, left, right),
		Action::InsertEmptyLineBefore => edit::insert_empty_lines(ctx, &first, false),
		Action::InsertEmptyLineAfter => edit::insert_empty_lines(ctx, &first, true),
		Action::Bring | Action::Move => {
			let destinations = lists.next().unwrap_or_default();
			bring_move::bring_move(ctx, &first, &destinations, matches!(action, Action::Move))
		}
	}
}

/// Groups items by editor, keeping their relative order.
fn by_editor<T>(items: impl IntoIterator<Item = (EditorId, T)>) -> BTreeMap<EditorId, Vec<T>> {
	let mut groups: BTreeMap<EditorId, Vec<T>> = BTreeMap::new();
	for (editor, item) in items {
		groups.entry(editor).or_default().push(item);
	}
	groups
}

/// Sorts `ranges` and merges the ones that overlap.
fn merge_ranges(mut ranges: Vec<Range>) -> Vec<Range> {
	ranges.sort_by_key(|range| (range.start, range.end));
	let mut merged: Vec<Range> = Vec::with_capacity(ranges.len());
	for range in ranges {
		match merged.last_mut() {
			Some(last) if range.start < last.end || range == *last => *last = last.union(&range),
			_ => merged.push(range),
		}
	}
	merged
}

/// Writes selections into their editors and focuses the first one's editor.
fn apply_selections(editors: &mut Editors, selections: &[(EditorId, Selection)]) -> Result<()> {
	for (editor, group) in by_editor(selections.iter().copied()) {
		editors.get_mut(editor)?.set_selections(group);
	}
	if let Some((first, _)) = selections.first() {
		editors.set_active(*first)?;
		editors.get_mut(*first)?.focus();
	}
	Ok(())
}
