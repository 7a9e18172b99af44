//! Shared setup for engine integration tests.

use pinpoint_engine::host::{EditorId, MemoryEditor, SyntaxParser, TextEditor};
use pinpoint_engine::targets::Target;
use pinpoint_engine::{Command, Session, TargetDescriptor};
use pinpoint_primitives::{DocumentId, Position, Selection, TextDocument};
use pinpoint_syntax::SyntaxTree;

pub const ED: EditorId = EditorId(1);

/// Re-parses JavaScript after every edit.
pub struct JavaScriptParser {
	parser: tree_sitter::Parser,
}

impl JavaScriptParser {
	pub fn new() -> Self {
		let mut parser = tree_sitter::Parser::new();
		parser
			.set_language(&tree_sitter_javascript::LANGUAGE.into())
			.expect("javascript grammar loads");
		Self { parser }
	}
}

impl SyntaxParser for JavaScriptParser {
	fn parse(&mut self, document: &TextDocument) -> Option<SyntaxTree> {
		let tree = self.parser.parse(document.get_text(None), None)?;
		pinpoint_syntax::from_tree_sitter(&tree, document).ok()
	}
}

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt::try_init();
}

pub fn caret(line: usize, character: usize) -> Selection {
	Selection::caret(Position::new(line, character))
}

/// A session over one plain-text editor.
pub fn text_session(text: &str, selections: Vec<Selection>) -> Session {
	init_tracing();
	let mut session = Session::default();
	let editor = MemoryEditor::new(ED, TextDocument::new(DocumentId(1), "plaintext", text)).with_selections(selections);
	session.open_editor(Box::new(editor));
	session
}

/// A session over one JavaScript editor with a live parser.
pub fn javascript_session(text: &str, selections: Vec<Selection>) -> Session {
	init_tracing();
	let mut session = Session::default();
	let editor = MemoryEditor::new(ED, TextDocument::new(DocumentId(1), "javascript", text))
		.with_selections(selections)
		.with_parser(Box::new(JavaScriptParser::new()));
	session.open_editor(Box::new(editor));
	session
}

pub fn text(session: &Session) -> String {
	session.editor(ED).expect("editor is open").document().get_text(None)
}

pub fn texts(session: &Session, targets: &[Target]) -> Vec<String> {
	let doc = session.editor(ED).expect("editor is open").document();
	targets.iter().map(|target| target.text(doc)).collect()
}

/// Resolves one descriptor through the session.
pub fn resolve(session: &Session, descriptor: TargetDescriptor) -> pinpoint_engine::Result<Vec<Target>> {
	let command = Command::new(pinpoint_engine::actions::Action::SetSelection, vec![descriptor]);
	Ok(session.resolve_targets(&command)?.remove(0))
}
