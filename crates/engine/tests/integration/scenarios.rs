use pinpoint_engine::actions::Action;
use pinpoint_engine::marks::Mark;
use pinpoint_engine::scopes::ScopeType;
use pinpoint_engine::stages::Modifier;
use pinpoint_engine::{Command, CommandError, TargetDescriptor};
use pinpoint_primitives::{Direction, Edit, Range};
use pretty_assertions::assert_eq;

use crate::common::{ED, caret, javascript_session, resolve, text, text_session, texts};

const FUNCTION: &str = "function foo() {\n  return 1;\n}\n";

fn cursor_with(modifiers: Vec<Modifier>) -> TargetDescriptor {
	TargetDescriptor::primitive(Mark::Cursor, modifiers)
}

#[test]
fn test_containing_statement_is_exactly_return() {
	let session = javascript_session(FUNCTION, vec![caret(1, 5)]);
	let targets = resolve(
		&session,
		cursor_with(vec![Modifier::ContainingScope {
			scope_type: ScopeType::simple("statement"),
			ancestor_index: 0,
		}]),
	)
	.unwrap();
	assert_eq!(targets.len(), 1);
	assert_eq!(targets[0].content_range, Range::from_coords(1, 2, 1, 11));
	assert_eq!(texts(&session, &targets), vec!["return 1;"]);
}

#[test]
fn test_every_statement_in_function_body() {
	let session = javascript_session(FUNCTION, vec![caret(1, 5)]);
	let targets = resolve(
		&session,
		cursor_with(vec![Modifier::EveryScope {
			scope_type: ScopeType::simple("statement"),
		}]),
	)
	.unwrap();
	assert_eq!(texts(&session, &targets), vec!["return 1;"]);
}

#[test]
fn test_syntax_scopes_follow_edits() {
	let mut session = javascript_session(FUNCTION, vec![caret(1, 5)]);
	session
		.run_json(
			r#"{"version": 3, "action": {"name": "replaceWithText", "args": {"replaceWith": ["return foo();"]}},
			"targets": [{"type": "primitive", "mark": {"type": "cursor"},
				"modifiers": [{"type": "containingScope", "scopeType": {"type": "statement"}}]}]}"#,
		)
		.unwrap();
	assert_eq!(text(&session), "function foo() {\n  return foo();\n}\n");
	assert_eq!(session.that_mark()[0].1.range(), Range::from_coords(1, 2, 1, 15));

	let outer = resolve(
		&session,
		TargetDescriptor::primitive(
			Mark::That,
			vec![Modifier::ContainingScope {
				scope_type: ScopeType::simple("statement"),
				ancestor_index: 1,
			}],
		),
	)
	.unwrap();
	assert_eq!(outer[0].content_range, Range::from_coords(0, 0, 2, 1));
}

#[test]
fn test_syntax_scope_needs_a_tree() {
	let session = text_session("return 1;", vec![caret(0, 2)]);
	let result = resolve(
		&session,
		cursor_with(vec![Modifier::ContainingScope {
			scope_type: ScopeType::simple("statement"),
			ancestor_index: 0,
		}]),
	);
	assert!(matches!(result, Err(CommandError::UnsupportedLanguage(_))));
}

#[test]
fn test_next_token_after_identifier_is_the_dot() {
	let session = text_session("foo. bar", vec![caret(0, 3)]);
	let targets = resolve(
		&session,
		cursor_with(vec![Modifier::RelativeScope {
			scope_type: ScopeType::simple("token"),
			offset: 1,
			length: 1,
			direction: Direction::Forward,
			is_every: false,
		}]),
	)
	.unwrap();
	assert_eq!(texts(&session, &targets), vec!["."]);
}

#[test]
fn test_that_mark_shifts_across_host_replacement() {
	let mut session = text_session("abcXXdefgh", vec![caret(0, 0)]);
	let explicit = |start: usize, end: usize| {
		TargetDescriptor::primitive(
			Mark::Explicit {
				editor: ED,
				range: Range::from_coords(0, start, 0, end),
			},
			vec![],
		)
	};
	let command = Command::new(
		Action::SetSelection,
		vec![TargetDescriptor::List {
			elements: vec![explicit(0, 3), explicit(5, 8)],
		}],
	);
	session.run_command(&command).unwrap();

	session
		.apply_host_edits(ED, &[Edit::splice(Range::from_coords(0, 3, 0, 5), "_")])
		.unwrap();
	assert_eq!(text(&session), "abc_defgh");
	let ranges: Vec<Range> = session.that_mark().iter().map(|(_, sel)| sel.range()).collect();
	assert_eq!(ranges, vec![Range::from_coords(0, 0, 0, 3), Range::from_coords(0, 4, 0, 7)]);
}
