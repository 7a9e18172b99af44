//! Command payloads.
//!
//! A command arrives as JSON. Payloads written against an older version are
//! upgraded step by step to the current shape before they are deserialized,
//! so the rest of the engine only ever sees [`Command`].

use serde::{Deserialize, Serialize};

use crate::actions::Action;
use crate::error::{CommandError, Result};
use crate::marks::Mark;
use crate::stages::Modifier;

mod upgrade;

pub use upgrade::upgrade_command;

/// The command shape this engine reads natively.
pub const CURRENT_COMMAND_VERSION: u32 = 3;

/// One action applied to the targets it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
	pub version: u32,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub spoken_form: Option<String>,
	/// Read hats from the snapshot taken when the current phrase began.
	#[serde(default)]
	pub use_pre_phrase_snapshot: bool,
	pub action: Action,
	pub targets: Vec<TargetDescriptor>,
}

impl Command {
	pub fn new(action: Action, targets: Vec<TargetDescriptor>) -> Self {
		Self {
			version: CURRENT_COMMAND_VERSION,
			spoken_form: None,
			use_pre_phrase_snapshot: false,
			action,
			targets,
		}
	}

	/// Parses a command of any supported version.
	pub fn from_json(text: &str) -> Result<Self> {
		let value: serde_json::Value = serde_json::from_str(text).map_err(invalid)?;
		let value = upgrade_command(value)?;
		serde_json::from_value(value).map_err(invalid)
	}
}

fn invalid(err: serde_json::Error) -> CommandError {
	CommandError::InvalidCommand(err.to_string())
}

/// What a command refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TargetDescriptor {
	/// A mark narrowed by modifiers, applied left to right.
	Primitive {
		mark: Mark,
		#[serde(default)]
		modifiers: Vec<Modifier>,
	},
	/// Two primitive targets joined into one continuous range.
	Range {
		anchor: Box<TargetDescriptor>,
		active: Box<TargetDescriptor>,
		#[serde(default)]
		exclude_anchor: bool,
		#[serde(default)]
		exclude_active: bool,
	},
	/// Targets resolved independently and concatenated.
	List { elements: Vec<TargetDescriptor> },
}

impl TargetDescriptor {
	pub fn primitive(mark: Mark, modifiers: Vec<Modifier>) -> Self {
		Self::Primitive { mark, modifiers }
	}
}
