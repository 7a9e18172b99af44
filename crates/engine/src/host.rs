//! Host editor capability surface.
//!
//! The engine never talks to a concrete editor. It reads document state
//! through [`TextEditor`] and mutates it through [`EditableTextEditor`]; both
//! are synchronous, and every call into them is a point where the host may
//! interleave its own work between engine steps. [`MemoryEditor`] is the
//! in-process implementation used by tests and embedders.

use pinpoint_primitives::{Edit, EditError, Range, Selection, TextDocument};
use pinpoint_syntax::SyntaxTree;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{CommandError, Result};

/// Identifies an open editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditorId(pub u32);

impl std::fmt::Display for EditorId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "editor#{}", self.0)
	}
}

/// Read access to an editor and its document.
pub trait TextEditor {
	fn id(&self) -> EditorId;

	fn document(&self) -> &TextDocument;

	/// Current selections; the first one is primary.
	fn selections(&self) -> &[Selection];

	/// Ranges currently scrolled into view.
	fn visible_ranges(&self) -> &[Range];

	/// Syntax tree for the current document text, if the host has one.
	fn syntax_tree(&self) -> Option<&SyntaxTree>;
}

/// Mutating access to an editor.
pub trait EditableTextEditor: TextEditor {
	/// Applies a batch atomically: either every edit lands or none does.
	fn apply_edits(&mut self, edits: &[Edit]) -> std::result::Result<(), EditError>;

	fn set_selections(&mut self, selections: Vec<Selection>);

	/// Brings the editor to the front.
	fn focus(&mut self);
}

/// Produces syntax trees for document text.
pub trait SyntaxParser {
	fn parse(&mut self, document: &TextDocument) -> Option<SyntaxTree>;
}

/// The open editors and which one has focus.
#[derive(Default)]
pub struct Editors {
	editors: FxHashMap<EditorId, Box<dyn EditableTextEditor>>,
	active: Option<EditorId>,
}

impl Editors {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds an editor; the first one opened becomes active.
	pub fn open(&mut self, editor: Box<dyn EditableTextEditor>) -> EditorId {
		let id = editor.id();
		self.editors.insert(id, editor);
		self.active.get_or_insert(id);
		id
	}

	pub fn close(&mut self, id: EditorId) -> Option<Box<dyn EditableTextEditor>> {
		if self.active == Some(id) {
			self.active = None;
		}
		self.editors.remove(&id)
	}

	pub fn get(&self, id: EditorId) -> Result<&dyn TextEditor> {
		let editor: &dyn TextEditor = &**self.editors.get(&id).ok_or(CommandError::UnknownEditor(id))?;
		Ok(editor)
	}

	pub fn get_mut(&mut self, id: EditorId) -> Result<&mut dyn EditableTextEditor> {
		let editor = self.editors.get_mut(&id).ok_or(CommandError::UnknownEditor(id))?;
		Ok(&mut **editor)
	}

	pub fn active_id(&self) -> Result<EditorId> {
		self.active.ok_or(CommandError::NoActiveEditor)
	}

	pub fn active(&self) -> Result<&dyn TextEditor> {
		self.get(self.active_id()?)
	}

	pub fn set_active(&mut self, id: EditorId) -> Result<()> {
		if !self.editors.contains_key(&id) {
			return Err(CommandError::UnknownEditor(id));
		}
		self.active = Some(id);
		Ok(())
	}

	/// Editor ids in ascending order.
	pub fn ids(&self) -> Vec<EditorId> {
		let mut ids: Vec<EditorId> = self.editors.keys().copied().collect();
		ids.sort_unstable();
		ids
	}
}

/// An editor that lives entirely in memory.
///
/// When a [`SyntaxParser`] is attached the tree is refreshed after every
/// edit batch. A tree supplied directly with [`MemoryEditor::with_syntax_tree`]
/// describes only the initial text and is dropped on the first edit.
pub struct MemoryEditor {
	id: EditorId,
	document: TextDocument,
	selections: Vec<Selection>,
	visible_ranges: Vec<Range>,
	/// Whole document stays visible across edits.
	show_all: bool,
	tree: Option<SyntaxTree>,
	parser: Option<Box<dyn SyntaxParser>>,
	focused: bool,
	/// Refuse every edit batch; lets callers exercise host failures.
	reject_edits: bool,
}

impl MemoryEditor {
	/// Creates an editor with a caret at the document start and the whole
	/// document visible.
	pub fn new(id: EditorId, document: TextDocument) -> Self {
		let visible = vec![document.range()];
		Self {
			id,
			document,
			selections: vec![Selection::default()],
			visible_ranges: visible,
			show_all: true,
			tree: None,
			parser: None,
			focused: false,
			reject_edits: false,
		}
	}

	pub fn with_selections(mut self, selections: Vec<Selection>) -> Self {
		self.selections = selections;
		self
	}

	pub fn with_visible_ranges(mut self, ranges: Vec<Range>) -> Self {
		self.visible_ranges = ranges;
		self.show_all = false;
		self
	}

	pub fn with_syntax_tree(mut self, tree: SyntaxTree) -> Self {
		self.tree = Some(tree);
		self
	}

	/// Attaches a parser and parses the current text immediately.
	pub fn with_parser(mut self, mut parser: Box<dyn SyntaxParser>) -> Self {
		self.tree = parser.parse(&self.document);
		self.parser = Some(parser);
		self
	}

	pub fn set_reject_edits(&mut self, reject: bool) {
		self.reject_edits = reject;
	}

	pub fn is_focused(&self) -> bool {
		self.focused
	}
}

impl std::fmt::Debug for MemoryEditor {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MemoryEditor")
			.field("id", &self.id)
			.field("document", &self.document)
			.field("selections", &self.selections)
			.field("has_tree", &self.tree.is_some())
			.finish_non_exhaustive()
	}
}

impl TextEditor for MemoryEditor {
	fn id(&self) -> EditorId {
		self.id
	}

	fn document(&self) -> &TextDocument {
		&self.document
	}

	fn selections(&self) -> &[Selection] {
		&self.selections
	}

	fn visible_ranges(&self) -> &[Range] {
		&self.visible_ranges
	}

	fn syntax_tree(&self) -> Option<&SyntaxTree> {
		self.tree.as_ref()
	}
}

impl EditableTextEditor for MemoryEditor {
	fn apply_edits(&mut self, edits: &[Edit]) -> std::result::Result<(), EditError> {
		if self.reject_edits {
			return Err(EditError::Rejected("editor is read-only".to_string()));
		}
		self.document.apply_edits(edits)?;
		self.tree = self.parser.as_mut().and_then(|parser| parser.parse(&self.document));
		if self.show_all {
			self.visible_ranges = vec![self.document.range()];
		} else {
			for range in &mut self.visible_ranges {
				*range = self.document.validate_range(*range);
			}
		}
		Ok(())
	}

	fn set_selections(&mut self, selections: Vec<Selection>) {
		self.selections = selections;
	}

	fn focus(&mut self) {
		self.focused = true;
	}
}
