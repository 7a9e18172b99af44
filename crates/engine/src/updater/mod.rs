//! Range update engine.
//!
//! Anything that must survive an edit (hats, that-marks, targets of an
//! action in progress, editor selections) is registered here as a shared
//! list of [`SelectionInfo`]s. When a document changes, every registered list
//! for that document is rewritten in place, so the owner sees the new ranges
//! through its own handle. Registration lasts as long as the returned
//! [`Registration`] guard.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use pinpoint_primitives::{DocumentId, Edit, Range, Selection, TextDocument};
use rustc_hash::FxHashMap;

mod edits_updater;
mod offsets;

pub use edits_updater::{EditsUpdater, UpdatedSelections, perform_edits};
pub use offsets::{Expansion, ExpansionBehavior};

/// Document offsets of a tracked range, in UTF-16 code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Offsets {
	pub start: usize,
	pub end: usize,
}

/// A range tracked across edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionInfo {
	pub range: Range,
	pub is_forward: bool,
	pub expansion_behavior: ExpansionBehavior,
	/// Offsets of `range` in the current text.
	pub offsets: Offsets,
	/// Text covered when the range was registered.
	pub original_text: String,
}

impl SelectionInfo {
	pub fn from_selection(doc: &TextDocument, selection: Selection, expansion_behavior: ExpansionBehavior) -> Self {
		Self::new(doc, selection.range(), !selection.is_reversed(), expansion_behavior)
	}

	pub fn from_range(doc: &TextDocument, range: Range, expansion_behavior: ExpansionBehavior) -> Self {
		Self::new(doc, range, true, expansion_behavior)
	}

	fn new(doc: &TextDocument, range: Range, is_forward: bool, expansion_behavior: ExpansionBehavior) -> Self {
		Self {
			range,
			is_forward,
			expansion_behavior,
			offsets: Offsets {
				start: doc.offset_at(range.start),
				end: doc.offset_at(range.end),
			},
			original_text: doc.get_text(Some(range)),
		}
	}

	pub fn selection(&self) -> Selection {
		self.range.to_selection(!self.is_forward)
	}
}

/// A list of tracked ranges shared between its owner and the updater.
pub type SharedSelectionInfos = Rc<RefCell<Vec<SelectionInfo>>>;

struct Registered {
	key: u64,
	infos: SharedSelectionInfos,
}

/// Keeps registered ranges current across document changes.
#[derive(Default)]
pub struct RangeUpdater {
	lists: RefCell<FxHashMap<DocumentId, Vec<Registered>>>,
	next_key: Cell<u64>,
}

impl RangeUpdater {
	pub fn new() -> Rc<Self> {
		Rc::new(Self::default())
	}

	/// Tracks `infos` in `document` until the returned guard is dropped.
	pub fn register(self: &Rc<Self>, document: DocumentId, infos: SharedSelectionInfos) -> Registration {
		let key = self.next_key.get();
		self.next_key.set(key + 1);
		self.lists
			.borrow_mut()
			.entry(document)
			.or_default()
			.push(Registered { key, infos });
		Registration {
			updater: Rc::downgrade(self),
			document,
			key,
		}
	}

	/// Number of lists currently registered for `document`.
	pub fn registered_count(&self, document: DocumentId) -> usize {
		self.lists.borrow().get(&document).map_or(0, Vec::len)
	}

	fn deregister(&self, document: DocumentId, key: u64) {
		let mut lists = self.lists.borrow_mut();
		if let Some(list) = lists.get_mut(&document) {
			list.retain(|registered| registered.key != key);
			if list.is_empty() {
				lists.remove(&document);
			}
		}
	}

	/// Rewrites every range registered for the changed document.
	///
	/// `edits` are in the coordinates of `before`; `after` is the text once
	/// the whole batch has been applied. Changes made by the host itself,
	/// such as typing, come through here the same way as engine edits.
	pub fn handle_document_change(&self, before: &TextDocument, edits: &[Edit], after: &TextDocument) {
		let lists = self.lists.borrow();
		let Some(list) = lists.get(&before.id()) else {
			return;
		};
		let edits = offsets::offset_edits(before, edits);
		let mut tracked = 0;
		for registered in list {
			for info in registered.infos.borrow_mut().iter_mut() {
				let (start, end) = offsets::map_range(&edits, info.offsets.start, info.offsets.end, info.expansion_behavior);
				info.offsets = Offsets { start, end };
				info.range = Range::new(after.position_at(start), after.position_at(end));
				tracked += 1;
			}
		}
		tracing::debug!(document = ?before.id(), edits = edits.len(), tracked, "Updated tracked ranges");
	}
}

/// Deregisters a tracked list when dropped.
#[must_use = "dropping the registration stops tracking immediately"]
pub struct Registration {
	updater: Weak<RangeUpdater>,
	document: DocumentId,
	key: u64,
}

impl Drop for Registration {
	fn drop(&mut self) {
		if let Some(updater) = self.updater.upgrade() {
			updater.deregister(self.document, self.key);
		}
	}
}
