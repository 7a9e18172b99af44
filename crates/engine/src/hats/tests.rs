use std::cell::RefCell;
use std::rc::Rc;

use pinpoint_primitives::{DocumentId, Edit, Position, Range, Selection, TextDocument};
use pretty_assertions::assert_eq;

use super::*;
use crate::config::EngineConfig;
use crate::host::{Editors, MemoryEditor, TextEditor};
use crate::scopes::ScopeRegistry;
use crate::updater::{RangeUpdater, perform_edits};

struct TestSignal(Rc<RefCell<Option<String>>>);

impl PhraseSignal for TestSignal {
	fn version(&self) -> Option<String> {
		self.0.borrow().clone()
	}
}

fn editor(text: &str) -> MemoryEditor {
	MemoryEditor::new(EditorId(1), TextDocument::new(DocumentId(1), "plaintext", text))
}

#[test]
fn test_hats_follow_edits() {
	let updater = RangeUpdater::new();
	let mut map = HatTokenMap::new(updater.clone());
	let mut ed = editor("foo bar");
	map.add_token(HatKey::new("default", "B"), EditorId(1), ed.document(), Range::from_coords(0, 4, 0, 7));

	let key = HatKey::new("default", "b");
	assert_eq!(key.to_string(), "default.b");
	perform_edits(&updater, &mut ed, &[Edit::insert(Position::new(0, 0), "let ")]).unwrap();
	let token = map.get_token(&key, false).unwrap();
	assert_eq!(token.range, Range::from_coords(0, 8, 0, 11));
	assert_eq!(token.text, "bar");

	// Typing right after the token does not grow it.
	perform_edits(&updater, &mut ed, &[Edit::insert(Position::new(0, 11), "s")]).unwrap();
	assert_eq!(map.get_token(&key, false).unwrap().range, Range::from_coords(0, 8, 0, 11));

	map.clear();
	assert!(map.entries().is_empty());
	assert_eq!(updater.registered_count(DocumentId(1)), 0);
}

#[test]
fn test_pre_phrase_snapshot() {
	let updater = RangeUpdater::new();
	let version = Rc::new(RefCell::new(None));
	let mut map = HatTokenMap::new(updater.clone());
	map.set_phrase_signal(Box::new(TestSignal(version.clone())));
	let doc = TextDocument::new(DocumentId(1), "plaintext", "one two");
	let key = HatKey::new("default", "o");
	map.add_token(key.clone(), EditorId(1), &doc, Range::from_coords(0, 0, 0, 3));

	// No version yet: the snapshot request falls back to the active map.
	map.observe_phrase_signal();
	assert_eq!(map.get_token(&key, true).unwrap().text, "one");

	*version.borrow_mut() = Some("1".to_string());
	map.observe_phrase_signal();
	map.clear();
	map.add_token(key.clone(), EditorId(1), &doc, Range::from_coords(0, 5, 0, 6));
	assert_eq!(map.get_token(&key, true).unwrap().text, "one");
	assert_eq!(map.get_token(&key, false).unwrap().text, "w");

	// Same version: the old snapshot stays.
	map.observe_phrase_signal();
	assert_eq!(map.get_token(&key, true).unwrap().text, "one");

	*version.borrow_mut() = Some("2".to_string());
	map.observe_phrase_signal();
	assert_eq!(map.get_token(&key, true).unwrap().text, "w");
}

#[test]
fn test_allocator_prefers_cheap_styles_near_cursor() {
	let mut editors = Editors::new();
	editors.open(Box::new(editor("aa ab b")));
	let registry = ScopeRegistry::new(Rc::new(EngineConfig::default()));

	let hats = allocate_hats(&editors, &registry).unwrap();
	let keys: Vec<String> = hats.iter().map(|hat| hat.key.to_string()).collect();
	assert_eq!(keys, vec!["default.a", "default.b", "blue.b"]);
	assert_eq!(hats[1].range, Range::from_coords(0, 3, 0, 5));
	assert_eq!(hats[1].grapheme_range, Range::from_coords(0, 4, 0, 5));
}

#[test]
fn test_allocator_serves_active_editor_and_visible_text_first() {
	let mut editors = Editors::new();
	let active = editor("x\nhidden x").with_visible_ranges(vec![Range::from_coords(0, 0, 0, 1)]);
	let active = active.with_selections(vec![Selection::caret(Position::new(0, 1))]);
	editors.open(Box::new(active));
	editors.open(Box::new(MemoryEditor::new(
		EditorId(2),
		TextDocument::new(DocumentId(2), "plaintext", "x"),
	)));
	let registry = ScopeRegistry::new(Rc::new(EngineConfig::default()));

	let hats = allocate_hats(&editors, &registry).unwrap();
	assert_eq!(hats.len(), 2);
	assert_eq!((hats[0].editor, hats[0].key.hat_style.as_str()), (EditorId(1), "default"));
	assert_eq!((hats[1].editor, hats[1].key.hat_style.as_str()), (EditorId(2), "blue"));
}
