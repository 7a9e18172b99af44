use std::cell::RefCell;
use std::rc::Rc;

use pinpoint_primitives::Selection;

use crate::error::Result;
use crate::host::{EditorId, Editors};
use crate::updater::{ExpansionBehavior, RangeUpdater, Registration, SelectionInfo, SharedSelectionInfos};

struct StoredSelection {
	editor: EditorId,
	info: SharedSelectionInfos,
	_registration: Registration,
}

/// Selections kept from one command to the next, tracked across edits.
#[derive(Default)]
pub struct StoredTargets {
	entries: Vec<StoredSelection>,
}

impl StoredTargets {
	/// Starts tracking `selections`, keeping their order.
	///
	/// Both ends are open so text typed right next to a stored selection does
	/// not become part of it.
	pub fn track(updater: &Rc<RangeUpdater>, editors: &Editors, selections: &[(EditorId, Selection)]) -> Result<Self> {
		let mut entries = Vec::with_capacity(selections.len());
		for (editor, selection) in selections {
			let doc = editors.get(*editor)?.document();
			let info = SelectionInfo::from_selection(doc, *selection, ExpansionBehavior::OPEN_OPEN);
			let shared = Rc::new(RefCell::new(vec![info]));
			let registration = updater.register(doc.id(), shared.clone());
			entries.push(StoredSelection {
				editor: *editor,
				info: shared,
				_registration: registration,
			});
		}
		Ok(Self { entries })
	}

	/// Current selections, in the order they were stored.
	pub fn selections(&self) -> Vec<(EditorId, Selection)> {
		self.entries
			.iter()
			.filter_map(|entry| Some((entry.editor, entry.info.borrow().first()?.selection())))
			.collect()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// The that-mark and source-mark of a session.
#[derive(Default)]
pub struct StoredMarks {
	pub that: Option<StoredTargets>,
	pub source: Option<StoredTargets>,
}
