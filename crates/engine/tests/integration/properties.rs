use std::cell::RefCell;
use std::rc::Rc;

use pinpoint_engine::CommandError;
use pinpoint_engine::config::EngineConfig;
use pinpoint_engine::host::{EditorId, Editors, MemoryEditor, TextEditor};
use pinpoint_engine::scopes::{ScopeRegistry, ScopeType, scopes_touching_position};
use pinpoint_engine::stages::{Modifier, ModifierStage, StageContext, stage_for};
use pinpoint_engine::targets::Target;
use pinpoint_engine::updater::{ExpansionBehavior, RangeUpdater, SelectionInfo, perform_edits};
use pinpoint_primitives::{Direction, DocumentId, Edit, Position, Range, Selection, TextDocument};
use proptest::prelude::*;

const ED: EditorId = EditorId(1);

fn editor(text: &str) -> MemoryEditor {
	MemoryEditor::new(ED, TextDocument::new(DocumentId(1), "plaintext", text))
}

fn setup(text: &str) -> (Editors, ScopeRegistry) {
	let mut editors = Editors::new();
	editors.open(Box::new(editor(text)));
	(editors, ScopeRegistry::new(Rc::new(EngineConfig::default())))
}

fn caret_target(position: Position) -> Target {
	Target::untyped(ED, Selection::caret(position), false)
}

/// Tracks `range` in `ed`, applies `edits`, and returns the tracked range.
fn track_through(ed: &mut MemoryEditor, range: Range, behavior: ExpansionBehavior, edits: &[Edit]) -> SelectionInfo {
	let updater = RangeUpdater::new();
	let info = SelectionInfo::from_range(ed.document(), range, behavior);
	let shared = Rc::new(RefCell::new(vec![info]));
	let _registration = updater.register(ed.document().id(), shared.clone());
	perform_edits(&updater, ed, edits).expect("edit applies");
	shared.borrow()[0].clone()
}

fn arb_words() -> impl Strategy<Value = Vec<&'static str>> {
	prop::collection::vec(prop::sample::select(vec!["foo", "bar_baz", ".", "(", ")", "42", "x", "=="]), 1..12)
}

/// Top-level items inside one outer pair: single characters, or pairs
/// holding only characters.
fn arb_pair_row() -> impl Strategy<Value = Vec<String>> {
	prop::collection::vec(
		prop_oneof![
			"[a ]".prop_map(String::from),
			"[a ]{0,3}".prop_map(|inner| format!("({inner})")),
		],
		1..8,
	)
}

proptest! {
	/// An insertion exactly at an empty tracked range grows it only through
	/// a closed end.
	#[test]
	fn prop_insertion_at_boundary(text in "[a-z \n]{0,30}", at in 0usize..31, inserted in "[a-z]{1,6}") {
		let at = at.min(text.len());
		let mut open = editor(&text);
		let position = open.document().position_at(at);
		let edit = [Edit::insert(position, inserted.as_str())];

		let kept = track_through(&mut open, Range::empty(position), ExpansionBehavior::OPEN_OPEN, &edit);
		prop_assert_eq!(kept.offsets.start, at);
		prop_assert_eq!(kept.offsets.end, at);

		let mut closed = editor(&text);
		let grown = track_through(&mut closed, Range::empty(position), ExpansionBehavior::CLOSED_CLOSED, &edit);
		prop_assert_eq!(grown.offsets.start, at);
		prop_assert_eq!(grown.offsets.end, at + inserted.len());
	}

	/// Edits that stay clear of a tracked range never change its text, and
	/// edits after it never move it.
	#[test]
	fn prop_outside_edits_preserve_range(
		text in "[a-z \n]{6,40}",
		a in 0usize..40,
		b in 0usize..40,
		replacement in "[a-z\n]{0,4}",
		after in any::<bool>(),
		closed in any::<bool>(),
	) {
		let len = text.len();
		let (a, b) = (a.min(len), b.min(len));
		let (start, end) = (a.min(b), a.max(b));
		let (edit_start, edit_end) = if after { (end + 1, (end + 3).min(len)) } else { (0, start.saturating_sub(1)) };
		prop_assume!(edit_start <= edit_end && edit_end <= len);
		prop_assume!(if after { edit_start > end } else { edit_end < start });

		let behavior = if closed { ExpansionBehavior::CLOSED_CLOSED } else { ExpansionBehavior::OPEN_OPEN };
		let mut ed = editor(&text);
		let doc = ed.document().clone();
		let range = Range::new(doc.position_at(start), doc.position_at(end));
		let edit_range = Range::new(doc.position_at(edit_start), doc.position_at(edit_end));
		let info = track_through(&mut ed, range, behavior, &[Edit::splice(edit_range, replacement.as_str())]);

		prop_assert_eq!(ed.document().get_text(Some(info.range)), doc.get_text(Some(range)));
		if after {
			prop_assert_eq!(info.range, range);
		}
	}

	/// Stepping to the next token never goes back or overlaps.
	#[test]
	fn prop_next_token_moves_forward(words in arb_words(), joiner in prop::sample::select(vec![" ", "", "  "])) {
		let text = words.join(joiner);
		let (editors, registry) = setup(&text);
		let ctx = StageContext::new(&editors, &registry);
		let next = Modifier::RelativeScope {
			scope_type: ScopeType::simple("token"),
			offset: 1,
			length: 1,
			direction: Direction::Forward,
			is_every: false,
		};

		let mut current = caret_target(Position::new(0, 0));
		let mut previous_end: Option<Position> = None;
		for _ in 0..=text.len() {
			match stage_for(&next).run(&ctx, current.clone()) {
				Ok(mut targets) => {
					prop_assert_eq!(targets.len(), 1);
					let target = targets.remove(0);
					if let Some(end) = previous_end {
						prop_assert!(target.content_range.start >= end);
					}
					prop_assert!(target.content_range.start >= current.content_range.start);
					previous_end = Some(target.content_range.end);
					current = target;
				}
				Err(err) => {
					prop_assert_eq!(err, CommandError::OutOfRange);
					break;
				}
			}
		}
	}

	/// The containing scope of a containing scope is itself.
	#[test]
	fn prop_containing_scope_is_idempotent(
		text in "[a-c() .]{1,24}",
		at in 0usize..25,
		scope in prop::sample::select(vec!["token", "line", "parentheses", "any"]),
	) {
		let scope_type = match scope {
			"token" | "line" => ScopeType::simple(scope),
			delimiter => ScopeType::surrounding_pair(delimiter),
		};
		let (editors, registry) = setup(&text);
		let ctx = StageContext::new(&editors, &registry);
		let containing = Modifier::ContainingScope { scope_type, ancestor_index: 0 };

		let position = Position::new(0, at.min(text.len()));
		if let Ok(once) = stage_for(&containing).run(&ctx, caret_target(position)) {
			for target in once {
				let twice = stage_for(&containing).run(&ctx, target.clone()).expect("scope contains itself");
				prop_assert_eq!(twice.len(), 1);
				prop_assert_eq!(twice[0].content_range, target.content_range);
			}
		}
	}

	/// Every-scope finds exactly the scopes some position on the line touches.
	#[test]
	fn prop_every_token_matches_touching(words in arb_words()) {
		let text = words.join(" ");
		let (editors, registry) = setup(&text);
		let ctx = StageContext::new(&editors, &registry);
		let token = ScopeType::simple("token");
		let every = Modifier::EveryScope { scope_type: token.clone() };

		let mut enumerated: Vec<Range> = stage_for(&every)
			.run(&ctx, caret_target(Position::new(0, 0)))
			.expect("line has tokens")
			.iter()
			.map(|target| target.content_range)
			.collect();

		let ed = editors.get(ED).expect("editor is open");
		let handler = registry.handler(&token, ed).expect("token handler");
		let mut touched: Vec<Range> = (0..=text.len())
			.flat_map(|character| scopes_touching_position(handler.as_ref(), ed, Position::new(0, character)))
			.map(|scope| scope.domain)
			.collect();

		enumerated.sort_by_key(|range| (range.start, range.end));
		touched.sort_by_key(|range| (range.start, range.end));
		touched.dedup();
		prop_assert_eq!(enumerated, touched);
	}

	/// From a caret in or next to an inner pair, every-scope finds exactly
	/// the pairs some position inside the outer pair touches.
	#[test]
	fn prop_every_pair_matches_touching(items in arb_pair_row(), pick in any::<prop::sample::Index>()) {
		let text = format!("({})", items.concat());
		let mut inner = Vec::new();
		let mut at = 1;
		for item in &items {
			if item.starts_with('(') {
				inner.push(Range::from_coords(0, at, 0, at + item.len()));
			}
			at += item.len();
		}
		prop_assume!(!inner.is_empty());

		let (editors, registry) = setup(&text);
		let ctx = StageContext::new(&editors, &registry);
		let parentheses = ScopeType::surrounding_pair("parentheses");
		let every = Modifier::EveryScope { scope_type: parentheses.clone() };

		let ed = editors.get(ED).expect("editor is open");
		let handler = registry.handler(&parentheses, ed).expect("pair handler");
		let outer = Range::from_coords(0, 0, 0, text.len());
		let mut touched: Vec<Range> = (1..text.len())
			.flat_map(|character| scopes_touching_position(handler.as_ref(), ed, Position::new(0, character)))
			.map(|scope| scope.domain)
			.filter(|domain| *domain != outer)
			.collect();
		touched.sort_by_key(|range| (range.start, range.end));
		touched.dedup();
		prop_assert_eq!(&touched, &inner);

		let chosen = inner[pick.index(inner.len())];
		for character in chosen.start.character..=chosen.end.character {
			let enumerated: Vec<Range> = stage_for(&every)
				.run(&ctx, caret_target(Position::new(0, character)))
				.expect("outer pair holds pairs")
				.iter()
				.map(|target| target.content_range)
				.collect();
			prop_assert_eq!(&enumerated, &inner);
		}
	}
}
