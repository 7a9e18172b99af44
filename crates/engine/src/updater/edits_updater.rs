use std::cell::RefCell;
use std::rc::Rc;

use pinpoint_primitives::{Edit, Range, Selection};

use super::{ExpansionBehavior, RangeUpdater, SelectionInfo};
use crate::error::Result;
use crate::host::EditableTextEditor;

/// Applies `edits` to `editor` and forwards the change to `updater`.
///
/// The batch is atomic: when the host refuses it nothing is forwarded and
/// the error is returned as is.
pub fn perform_edits(updater: &RangeUpdater, editor: &mut dyn EditableTextEditor, edits: &[Edit]) -> Result<()> {
	let before = editor.document().clone();
	editor.apply_edits(edits)?;
	updater.handle_document_change(&before, edits, editor.document());
	Ok(())
}

/// Ranges handed back by [`EditsUpdater::run`], in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdatedSelections {
	pub selections: Vec<Vec<Selection>>,
	pub ranges: Vec<Vec<Range>>,
}

/// One edit batch plus the selections and ranges to carry across it.
///
/// ```ignore
/// let updated = EditsUpdater::new(&updater, editor, edits)
/// 	.selections(that_mark, ExpansionBehavior::OPEN_OPEN)
/// 	.update_editor_selections(ExpansionBehavior::CLOSED_CLOSED)
/// 	.run()?;
/// ```
pub struct EditsUpdater<'a> {
	updater: &'a Rc<RangeUpdater>,
	editor: &'a mut dyn EditableTextEditor,
	edits: Vec<Edit>,
	selections: Vec<(Vec<Selection>, ExpansionBehavior)>,
	ranges: Vec<(Vec<Range>, ExpansionBehavior)>,
	editor_selections: Option<ExpansionBehavior>,
}

impl<'a> EditsUpdater<'a> {
	pub fn new(updater: &'a Rc<RangeUpdater>, editor: &'a mut dyn EditableTextEditor, edits: Vec<Edit>) -> Self {
		Self {
			updater,
			editor,
			edits,
			selections: Vec::new(),
			ranges: Vec::new(),
			editor_selections: None,
		}
	}

	pub fn selections(mut self, selections: Vec<Selection>, behavior: ExpansionBehavior) -> Self {
		self.selections.push((selections, behavior));
		self
	}

	pub fn ranges(mut self, ranges: Vec<Range>, behavior: ExpansionBehavior) -> Self {
		self.ranges.push((ranges, behavior));
		self
	}

	/// Also carries the editor's own selections across the batch and writes
	/// them back afterwards.
	pub fn update_editor_selections(mut self, behavior: ExpansionBehavior) -> Self {
		self.editor_selections = Some(behavior);
		self
	}

	pub fn run(self) -> Result<UpdatedSelections> {
		let doc = self.editor.document();
		let mut selection_groups = self.selections;
		if let Some(behavior) = self.editor_selections {
			selection_groups.push((self.editor.selections().to_vec(), behavior));
		}

		let mut lengths = Vec::with_capacity(selection_groups.len() + self.ranges.len());
		let mut infos = Vec::new();
		for (selections, behavior) in &selection_groups {
			lengths.push(selections.len());
			infos.extend(selections.iter().map(|sel| SelectionInfo::from_selection(doc, *sel, *behavior)));
		}
		for (ranges, behavior) in &self.ranges {
			lengths.push(ranges.len());
			infos.extend(ranges.iter().map(|range| SelectionInfo::from_range(doc, *range, *behavior)));
		}

		let shared = Rc::new(RefCell::new(infos));
		let registration = self.updater.register(doc.id(), shared.clone());
		perform_edits(self.updater, &mut *self.editor, &self.edits)?;
		drop(registration);

		let updated = shared.take();
		let mut rest = updated.as_slice();
		let mut groups = lengths.into_iter().map(|len| {
			let (group, tail) = rest.split_at(len);
			rest = tail;
			group
		});

		let mut selections: Vec<Vec<Selection>> = groups
			.by_ref()
			.take(selection_groups.len())
			.map(|group| group.iter().map(SelectionInfo::selection).collect())
			.collect();
		let ranges = groups
			.map(|group| group.iter().map(|info| info.range).collect())
			.collect();

		if self.editor_selections.is_some()
			&& let Some(editor_selections) = selections.pop()
		{
			self.editor.set_selections(editor_selections);
		}
		Ok(UpdatedSelections { selections, ranges })
	}
}
