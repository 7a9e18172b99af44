//! Error types for command resolution and execution.

use pinpoint_primitives::EditError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::host::EditorId;
use crate::scopes::ScopeType;

/// Errors that abort a command.
///
/// Every stage and scope handler propagates these unchanged; only the
/// cascading modifier catches them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
	/// A hat, that-mark or source-mark does not currently exist.
	#[error("mark not found: {0}")]
	MarkNotFound(String),

	/// No scope of the requested type touches the input.
	#[error("couldn't find containing {0}")]
	NoContainingScope(ScopeType),

	/// More scopes already intersect the input than were requested.
	#[error("requested {requested} {scope_type} scope(s) but {available} already intersect the target")]
	TooFewScopes {
		requested: usize,
		available: usize,
		scope_type: ScopeType,
	},

	/// An ordinal or relative index points outside the available scopes.
	#[error("scope index out of range")]
	OutOfRange,

	/// The editor's language has no scope definitions, or no syntax tree.
	#[error("unsupported language: {0}")]
	UnsupportedLanguage(String),

	/// The language has no definition for the requested scope type.
	#[error("scope type {scope_type} is not supported for language {language}")]
	UnsupportedScopeType { language: String, scope_type: ScopeType },

	/// A leading or trailing delimiter was requested but none exists.
	#[error("target has no {0} delimiter")]
	NoDelimiter(&'static str),

	/// Range construction failed, e.g. mismatched anchor and active counts.
	#[error("invalid range: {0}")]
	InvalidRange(String),

	/// The command payload could not be interpreted.
	#[error("invalid command: {0}")]
	InvalidCommand(String),

	/// The command declares a version this engine does not know.
	#[error("unsupported command version {0}")]
	UnsupportedCommandVersion(u32),

	/// A target or mark refers to an editor that is not open.
	#[error("unknown editor {0}")]
	UnknownEditor(EditorId),

	/// A command needs the focused editor but none is open.
	#[error("no active editor")]
	NoActiveEditor,

	/// The host refused or failed to apply an edit batch.
	#[error("edit failed: {0}")]
	EditFailed(#[from] EditError),

	/// Configuration could not be loaded.
	#[error(transparent)]
	Config(#[from] ConfigError),
}

/// Result type for command operations.
pub type Result<T> = std::result::Result<T, CommandError>;
