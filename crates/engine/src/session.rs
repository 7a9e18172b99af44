//! The engine session: every piece of state a command touches, owned in one
//! place and passed down explicitly.

use std::rc::Rc;

use pinpoint_primitives::{Edit, Selection};

use crate::actions::{ActionContext, run_action};
use crate::command::Command;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::hats::{HatAssignment, HatTokenMap, allocate_hats};
use crate::host::{EditableTextEditor, EditorId, Editors, TextEditor};
use crate::marks::{StoredMarks, StoredTargets};
use crate::pipeline::{PipelineContext, resolve_targets};
use crate::scope_ranges::{IterationScopeRanges, ScopeRanges, provide_iteration_scope_ranges, provide_scope_ranges};
use crate::scopes::{ScopeRegistry, ScopeType};
use crate::targets::Target;
use crate::updater::{RangeUpdater, perform_edits};

/// What a command resolved to and the marks it left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
	/// Targets per descriptor, as they were before the action ran.
	pub targets: Vec<Vec<Target>>,
	pub that: Vec<(EditorId, Selection)>,
	pub source: Option<Vec<(EditorId, Selection)>>,
}

/// Editors, hats, stored marks and the updater that keeps them in sync.
pub struct Session {
	config: Rc<EngineConfig>,
	editors: Editors,
	updater: Rc<RangeUpdater>,
	hats: HatTokenMap,
	stored: StoredMarks,
	registry: ScopeRegistry,
}

impl Default for Session {
	fn default() -> Self {
		Self::new(EngineConfig::default())
	}
}

impl Session {
	pub fn new(config: EngineConfig) -> Self {
		let config = Rc::new(config);
		let updater = RangeUpdater::new();
		Self {
			registry: ScopeRegistry::new(config.clone()),
			hats: HatTokenMap::new(updater.clone()),
			config,
			editors: Editors::new(),
			updater,
			stored: StoredMarks::default(),
		}
	}

	/// Builds a session from user configuration layered over the defaults.
	pub fn from_toml(user: &str) -> Result<Self> {
		Ok(Self::new(EngineConfig::from_toml(user)?))
	}

	pub fn config(&self) -> &EngineConfig {
		&self.config
	}

	/// Adds an editor; the first one opened becomes active.
	pub fn open_editor(&mut self, editor: Box<dyn EditableTextEditor>) -> EditorId {
		let id = self.editors.open(editor);
		tracing::debug!(editor = %id, "Opened editor");
		id
	}

	pub fn close_editor(&mut self, editor: EditorId) -> Option<Box<dyn EditableTextEditor>> {
		self.editors.close(editor)
	}

	pub fn editors(&self) -> &Editors {
		&self.editors
	}

	pub fn editor(&self, editor: EditorId) -> Result<&dyn TextEditor> {
		self.editors.get(editor)
	}

	pub fn set_active_editor(&mut self, editor: EditorId) -> Result<()> {
		self.editors.set_active(editor)
	}

	pub fn set_selections(&mut self, editor: EditorId, selections: Vec<Selection>) -> Result<()> {
		self.editors.get_mut(editor)?.set_selections(selections);
		Ok(())
	}

	/// Applies edits that did not come from a command, such as typing, and
	/// brings every tracked range up to date.
	pub fn apply_host_edits(&mut self, editor: EditorId, edits: &[Edit]) -> Result<()> {
		perform_edits(&self.updater, self.editors.get_mut(editor)?, edits)
	}

	pub fn hats(&self) -> &HatTokenMap {
		&self.hats
	}

	pub fn hats_mut(&mut self) -> &mut HatTokenMap {
		&mut self.hats
	}

	/// Replaces every hat with a fresh allocation over the visible tokens.
	pub fn allocate_hats(&mut self) -> Result<Vec<HatAssignment>> {
		let assignments = allocate_hats(&self.editors, &self.registry)?;
		self.hats.clear();
		for assignment in &assignments {
			let doc = self.editors.get(assignment.editor)?.document();
			self.hats
				.add_token(assignment.key.clone(), assignment.editor, doc, assignment.range);
		}
		tracing::debug!(hats = assignments.len(), "Allocated hats");
		Ok(assignments)
	}

	/// The that-mark as it currently stands.
	pub fn that_mark(&self) -> Vec<(EditorId, Selection)> {
		self.stored.that.as_ref().map(StoredTargets::selections).unwrap_or_default()
	}

	pub fn source_mark(&self) -> Vec<(EditorId, Selection)> {
		self.stored.source.as_ref().map(StoredTargets::selections).unwrap_or_default()
	}

	/// Resolves the command's targets without running its action.
	pub fn resolve_targets(&self, command: &Command) -> Result<Vec<Vec<Target>>> {
		let ctx = PipelineContext {
			editors: &self.editors,
			registry: &self.registry,
			hats: &self.hats,
			stored: &self.stored,
			use_pre_phrase_snapshot: command.use_pre_phrase_snapshot,
		};
		resolve_targets(&ctx, &command.targets)
	}

	/// Resolves targets, runs the action, and stores the marks it returns.
	pub fn run_command(&mut self, command: &Command) -> Result<CommandOutcome> {
		self.hats.observe_phrase_signal();
		tracing::debug!(spoken_form = ?command.spoken_form, action = ?command.action, "Running command");

		let targets = self.resolve_targets(command)?;
		let mut ctx = ActionContext {
			editors: &mut self.editors,
			updater: &self.updater,
		};
		let outcome = run_action(&mut ctx, &command.action, targets.clone())?;

		self.stored.that = Some(StoredTargets::track(&self.updater, &self.editors, &outcome.that)?);
		if let Some(source) = &outcome.source {
			self.stored.source = Some(StoredTargets::track(&self.updater, &self.editors, source)?);
		}
		Ok(CommandOutcome {
			targets,
			that: outcome.that,
			source: outcome.source,
		})
	}

	/// Parses a JSON command of any supported version and runs it.
	pub fn run_json(&mut self, text: &str) -> Result<CommandOutcome> {
		self.run_command(&Command::from_json(text)?)
	}

	pub fn scope_ranges(&self, editor: EditorId, scope_type: &ScopeType, visible_only: bool) -> Result<Vec<ScopeRanges>> {
		provide_scope_ranges(&self.editors, &self.registry, editor, scope_type, visible_only)
	}

	pub fn iteration_scope_ranges(
		&self,
		editor: EditorId,
		scope_type: &ScopeType,
		visible_only: bool,
	) -> Result<Vec<IterationScopeRanges>> {
		provide_iteration_scope_ranges(&self.editors, &self.registry, editor, scope_type, visible_only)
	}
}
