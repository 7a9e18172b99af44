//! Resolves a [`ScopeType`] to the handler that produces its scopes.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use super::character::CharacterScopeHandler;
use super::document::DocumentScopeHandler;
use super::line::LineScopeHandler;
use super::one_of::OneOfScopeHandler;
use super::paragraph::ParagraphScopeHandler;
use super::pattern::{NON_WHITESPACE_SEQUENCE, RegexScopeHandler, URL};
use super::surrounding_pair::{SurroundingPairInteriorScopeHandler, SurroundingPairScopeHandler};
use super::syntax::{SyntaxIterationScopeHandler, SyntaxScopeHandler};
use super::token::TokenScopeHandler;
use super::word::WordScopeHandler;
use super::{ScopeHandler, ScopeType};
use crate::config::{ConfigError, EngineConfig, LanguageConfig, ScopeConfig};
use crate::error::{CommandError, Result};
use crate::host::TextEditor;
use crate::tokenizer::Tokenizer;

/// Builds scope handlers for editors, caching one tokenizer per separator set.
pub struct ScopeRegistry {
	config: Rc<EngineConfig>,
	tokenizers: RefCell<FxHashMap<Vec<String>, Rc<Tokenizer>>>,
}

impl ScopeRegistry {
	pub fn new(config: Rc<EngineConfig>) -> Self {
		Self {
			config,
			tokenizers: RefCell::new(FxHashMap::default()),
		}
	}

	pub fn config(&self) -> &EngineConfig {
		&self.config
	}

	/// Returns the tokenizer for `language_id`'s word separators.
	pub fn tokenizer(&self, language_id: &str) -> Result<Rc<Tokenizer>> {
		let separators = self.config.word_separators_for(language_id).to_vec();
		if let Some(tokenizer) = self.tokenizers.borrow().get(&separators) {
			return Ok(Rc::clone(tokenizer));
		}
		let tokenizer = Rc::new(Tokenizer::new(&separators).map_err(ConfigError::Parse)?);
		self.tokenizers
			.borrow_mut()
			.insert(separators, Rc::clone(&tokenizer));
		Ok(tokenizer)
	}

	/// Returns the handler for `scope_type` in `editor`'s language.
	pub fn handler(&self, scope_type: &ScopeType, editor: &dyn TextEditor) -> Result<Box<dyn ScopeHandler>> {
		let language_id = editor.document().language_id();
		let language = self.config.language(language_id);
		let string_nodes = || language.map(|lang| lang.string_nodes.clone()).unwrap_or_default();

		let handler: Box<dyn ScopeHandler> = match scope_type {
			ScopeType::Simple(name) => match name.as_str() {
				"token" => Box::new(TokenScopeHandler::new(self.tokenizer(language_id)?)),
				"word" => Box::new(WordScopeHandler::new(self.tokenizer(language_id)?)),
				"character" => Box::new(CharacterScopeHandler::new()),
				"line" => Box::new(LineScopeHandler::new()),
				"paragraph" => Box::new(ParagraphScopeHandler::new()),
				"document" => Box::new(DocumentScopeHandler::new()),
				"nonWhitespaceSequence" => regex_handler(scope_type, NON_WHITESPACE_SEQUENCE)?,
				"url" => regex_handler(scope_type, URL)?,
				"identifier" => {
					let tokenizer = self.tokenizer(language_id)?;
					regex_handler(scope_type, tokenizer.identifier_pattern())?
				}
				_ => Box::new(SyntaxScopeHandler::new(
					name,
					syntax_scope(language, language_id, scope_type, editor)?,
				)),
			},
			ScopeType::SurroundingPair { .. } => {
				Box::new(SurroundingPairScopeHandler::new(scope_type.clone(), string_nodes())?)
			}
			ScopeType::SurroundingPairInterior { .. } => {
				Box::new(SurroundingPairInteriorScopeHandler::new(scope_type.clone(), string_nodes())?)
			}
			ScopeType::CustomRegex { regex } => regex_handler(scope_type, regex)?,
			ScopeType::OneOf { scope_types } => {
				let children = scope_types
					.iter()
					.map(|child| self.handler(child, editor))
					.collect::<Result<Vec<_>>>()?;
				Box::new(OneOfScopeHandler::new(scope_type.clone(), children))
			}
			ScopeType::SyntaxIteration(name) => {
				let config = syntax_scope(language, language_id, &ScopeType::simple(name.as_str()), editor)?;
				Box::new(SyntaxIterationScopeHandler::new(name, config))
			}
		};
		tracing::trace!(%scope_type, language = language_id, "Resolved scope handler");
		Ok(handler)
	}
}

fn regex_handler(scope_type: &ScopeType, pattern: &str) -> Result<Box<dyn ScopeHandler>> {
	RegexScopeHandler::new(scope_type.clone(), pattern)
		.map(|handler| Box::new(handler) as Box<dyn ScopeHandler>)
		.map_err(|err| CommandError::InvalidCommand(format!("invalid regex `{pattern}`: {err}")))
}

/// Looks up a syntax scope definition, requiring a parsed tree to use it with.
fn syntax_scope<'c>(
	language: Option<&'c LanguageConfig>,
	language_id: &str,
	scope_type: &ScopeType,
	editor: &dyn TextEditor,
) -> Result<&'c ScopeConfig> {
	let language = language.ok_or_else(|| CommandError::UnsupportedLanguage(language_id.to_string()))?;
	let config = language
		.scopes
		.get(scope_type.name())
		.ok_or_else(|| CommandError::UnsupportedScopeType {
			language: language_id.to_string(),
			scope_type: scope_type.clone(),
		})?;
	if editor.syntax_tree().is_none() {
		return Err(CommandError::UnsupportedLanguage(language_id.to_string()));
	}
	Ok(config)
}

#[cfg(test)]
mod tests {
	use pinpoint_primitives::{DocumentId, Position, Range, TextDocument};
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::host::{EditorId, MemoryEditor};
	use crate::scopes::scopes_touching_position;

	fn registry() -> ScopeRegistry {
		ScopeRegistry::new(Rc::new(EngineConfig::default()))
	}

	fn editor(language: &str, text: &str) -> MemoryEditor {
		MemoryEditor::new(EditorId(1), TextDocument::new(DocumentId(1), language, text))
	}

	#[test]
	fn test_builtin_handlers_resolve() {
		let registry = registry();
		let ed = editor("plaintext", "see https://example.com/a, ok");
		for name in ["token", "word", "character", "line", "paragraph", "document", "identifier"] {
			let handler = registry.handler(&ScopeType::simple(name), &ed).unwrap();
			assert_eq!(handler.scope_type(), &ScopeType::simple(name));
		}
		let url = registry.handler(&ScopeType::simple("url"), &ed).unwrap();
		let found = scopes_touching_position(url.as_ref(), &ed, Position::new(0, 8));
		assert_eq!(found[0].domain, Range::from_coords(0, 4, 0, 25));
	}

	#[test]
	fn test_tokenizers_are_cached() {
		let registry = registry();
		let a = registry.tokenizer("plaintext").unwrap();
		let b = registry.tokenizer("markdown").unwrap();
		assert!(Rc::ptr_eq(&a, &b));
	}

	#[test]
	fn test_syntax_scope_errors() {
		let registry = registry();
		let statement = ScopeType::simple("statement");
		let plain = editor("plaintext", "x");
		assert_eq!(
			registry.handler(&statement, &plain).err(),
			Some(CommandError::UnsupportedLanguage("plaintext".into()))
		);

		let js = editor("javascript", "x");
		assert_eq!(
			registry.handler(&ScopeType::simple("nonsense"), &js).err(),
			Some(CommandError::UnsupportedScopeType {
				language: "javascript".into(),
				scope_type: ScopeType::simple("nonsense"),
			})
		);
		// Defined scope, but nothing parsed the document.
		assert_eq!(
			registry.handler(&statement, &js).err(),
			Some(CommandError::UnsupportedLanguage("javascript".into()))
		);
	}

	#[test]
	fn test_invalid_custom_regex() {
		let registry = registry();
		let ed = editor("plaintext", "x");
		let scope_type = ScopeType::CustomRegex { regex: "(".into() };
		assert!(matches!(
			registry.handler(&scope_type, &ed).err(),
			Some(CommandError::InvalidCommand(_))
		));
	}

	#[test]
	fn test_one_of_propagates_child_errors() {
		let registry = registry();
		let ed = editor("plaintext", "x");
		let scope_type = ScopeType::OneOf {
			scope_types: vec![ScopeType::simple("token"), ScopeType::simple("statement")],
		};
		assert!(registry.handler(&scope_type, &ed).is_err());
	}
}
