use std::cell::Cell;
use std::rc::Rc;

use pinpoint_engine::actions::Action;
use pinpoint_engine::hats::PhraseSignal;
use pinpoint_engine::host::MemoryEditor;
use pinpoint_engine::marks::Mark;
use pinpoint_engine::scopes::ScopeType;
use pinpoint_engine::stages::Modifier;
use pinpoint_engine::targets::TargetPosition;
use pinpoint_engine::{Command, CommandError, Session, TargetDescriptor};
use pinpoint_primitives::{DocumentId, Edit, Position, Range, Selection, TextDocument};
use pretty_assertions::assert_eq;

use crate::common::{ED, caret, text, text_session};

fn hat(style: &str, character: &str) -> Mark {
	Mark::DecoratedSymbol {
		hat_style: style.into(),
		character: character.into(),
	}
}

fn token_at(start: usize, end: usize, mut modifiers: Vec<Modifier>) -> TargetDescriptor {
	modifiers.insert(
		0,
		Modifier::ContainingScope {
			scope_type: ScopeType::simple("token"),
			ancestor_index: 0,
		},
	);
	TargetDescriptor::primitive(
		Mark::Explicit {
			editor: ED,
			range: Range::from_coords(0, start, 0, end),
		},
		modifiers,
	)
}

fn selections(session: &Session) -> Vec<Selection> {
	session.editor(ED).unwrap().selections().to_vec()
}

#[test]
fn test_remove_by_hat() {
	let mut session = text_session("hello world", vec![caret(0, 0)]);
	let keys: Vec<String> = session
		.allocate_hats()
		.unwrap()
		.iter()
		.map(|assignment| assignment.key.to_string())
		.collect();
	assert_eq!(keys, vec!["default.h", "default.w"]);

	session
		.run_json(
			r#"{"version": 3, "action": {"name": "remove"},
			"targets": [{"type": "primitive", "mark": {"type": "decoratedSymbol", "hatStyle": "default", "character": "w"}}]}"#,
		)
		.unwrap();
	assert_eq!(text(&session), "hello");
}

#[test]
fn test_legacy_command_runs_after_upgrade() {
	let mut session = text_session("hello world", vec![caret(0, 0)]);
	session.allocate_hats().unwrap();
	session
		.run_json(
			r#"{"version": 1, "action": {"name": "setSelection"},
			"targets": [{"type": "primitive",
				"mark": {"type": "decoratedSymbol", "symbolColor": "default", "character": "h"},
				"modifier": {"type": "containingScope", "scopeType": {"type": "line"}}}]}"#,
		)
		.unwrap();
	assert_eq!(selections(&session), vec![Selection::new(Position::new(0, 0), Position::new(0, 11))]);

	let future = r#"{"version": 9, "action": {"name": "remove"}, "targets": []}"#;
	assert_eq!(session.run_json(future), Err(CommandError::UnsupportedCommandVersion(9)));
}

#[test]
fn test_hats_survive_typing() {
	let mut session = text_session("foo bar", vec![caret(0, 0)]);
	session.allocate_hats().unwrap();
	session
		.apply_host_edits(ED, &[Edit::insert(Position::new(0, 0), "x")])
		.unwrap();

	let command = Command::new(Action::SetSelection, vec![TargetDescriptor::primitive(hat("default", "b"), vec![])]);
	session.run_command(&command).unwrap();
	assert_eq!(selections(&session), vec![Selection::new(Position::new(0, 5), Position::new(0, 8))]);

	// Typing right before "foo" leaves its hat on "foo".
	let command = Command::new(Action::SetSelection, vec![TargetDescriptor::primitive(hat("default", "f"), vec![])]);
	session.run_command(&command).unwrap();
	assert_eq!(selections(&session), vec![Selection::new(Position::new(0, 1), Position::new(0, 4))]);
}

struct Phrase(Rc<Cell<u32>>);

impl PhraseSignal for Phrase {
	fn version(&self) -> Option<String> {
		Some(self.0.get().to_string())
	}
}

#[test]
fn test_pre_phrase_snapshot_outlives_reallocation() {
	let mut session = text_session("foo bar", vec![caret(0, 0)]);
	let phrase = Rc::new(Cell::new(1));
	session.hats_mut().set_phrase_signal(Box::new(Phrase(phrase.clone())));
	session.allocate_hats().unwrap();

	let select_bar = |snapshot: bool| {
		let mut command = Command::new(Action::SetSelection, vec![TargetDescriptor::primitive(hat("default", "b"), vec![])]);
		command.use_pre_phrase_snapshot = snapshot;
		command
	};
	session.run_command(&select_bar(true)).unwrap();

	// Hats repainted mid-phrase: "bar" is gone from the live map.
	session.hats_mut().clear();
	assert!(matches!(
		session.run_command(&select_bar(false)),
		Err(CommandError::MarkNotFound(_))
	));
	let outcome = session.run_command(&select_bar(true)).unwrap();
	assert_eq!(outcome.that[0].1.range(), Range::from_coords(0, 4, 0, 7));
}

#[test]
fn test_move_token_after_another() {
	let mut session = text_session("a b c", vec![caret(0, 0)]);
	let command = Command::new(
		Action::Move,
		vec![
			token_at(0, 1, vec![]),
			token_at(4, 5, vec![Modifier::Position {
				position: TargetPosition::After,
			}]),
		],
	);
	let outcome = session.run_command(&command).unwrap();
	assert_eq!(text(&session), "b c a");
	assert_eq!(outcome.that[0].1.range(), Range::from_coords(0, 4, 0, 5));
	assert_eq!(session.source_mark(), vec![(ED, Selection::caret(Position::new(0, 0)))]);

	let bring_back = Command::new(
		Action::Bring,
		vec![
			TargetDescriptor::primitive(Mark::That, vec![]),
			TargetDescriptor::primitive(Mark::Source, vec![]),
		],
	);
	// The source caret widens to the token it touches.
	session.run_command(&bring_back).unwrap();
	assert_eq!(text(&session), "a c a");
}

#[test]
fn test_failed_edit_keeps_previous_marks() {
	let mut session = Session::default();
	let mut editor = MemoryEditor::new(ED, TextDocument::new(DocumentId(1), "plaintext", "foo bar"));
	editor.set_reject_edits(true);
	session.open_editor(Box::new(editor));

	let command = Command::new(Action::Remove, vec![token_at(0, 3, vec![])]);
	assert!(matches!(session.run_command(&command), Err(CommandError::EditFailed(_))));
	assert_eq!(text(&session), "foo bar");
	assert!(session.that_mark().is_empty());
}

#[test]
fn test_scope_ranges_from_session() {
	let session = text_session("a (b) c", vec![caret(0, 0)]);
	let tokens = session.scope_ranges(ED, &ScopeType::simple("token"), true).unwrap();
	assert_eq!(tokens.len(), 5);
	let groups = session
		.iteration_scope_ranges(ED, &ScopeType::simple("token"), false)
		.unwrap();
	assert_eq!(groups.len(), 1);
	assert_eq!(groups[0].scopes.len(), 5);
}
