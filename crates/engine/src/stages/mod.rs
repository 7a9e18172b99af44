//! Modifier stages.
//!
//! Each [`Modifier`] compiles to a [`ModifierStage`], a function from one
//! target to zero or more targets. A command's modifiers run left to right,
//! every output of one stage feeding the next. Any stage error aborts the
//! whole chain; only [`Modifier::Cascading`] recovers from one.

use pinpoint_primitives::Direction;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::host::{Editors, TextEditor};
use crate::scopes::{ScopeHandler, ScopeRegistry, ScopeType, TargetScope};
use crate::targets::{Target, TargetPosition, continuous_range_target};

mod cascading;
mod containing;
mod every;
mod filters;
mod interior;
mod ordinal;
mod position;
mod range;
mod relative;

pub use cascading::CascadingStage;
pub use containing::{ContainingScopeStage, ContainingTokenIfUntypedEmptyStage, containing_scope_targets};
pub use every::{EveryScopeStage, every_scope_targets};
pub use filters::{KeepContentFilterStage, KeepEmptyFilterStage, ToRawSelectionStage};
pub use interior::{ExcludeInteriorStage, InteriorOnlyStage, LeadingStage, TrailingStage};
pub use ordinal::OrdinalScopeStage;
pub use position::PositionStage;
pub use range::RangeModifierStage;
pub use relative::RelativeScopeStage;

fn one() -> usize {
	1
}

/// How a command narrows, widens or relates its mark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Modifier {
	ContainingScope {
		scope_type: ScopeType,
		/// 0 is the innermost containing scope, 1 its parent, and so on.
		#[serde(default)]
		ancestor_index: usize,
	},
	EveryScope {
		scope_type: ScopeType,
	},
	/// Scopes by position inside the containing iteration scope; a negative
	/// `start` counts from the end.
	OrdinalScope {
		scope_type: ScopeType,
		start: isize,
		#[serde(default = "one")]
		length: usize,
		#[serde(default)]
		is_every: bool,
	},
	/// Scopes counted from the input. Offset 0 includes the scopes the input
	/// already intersects.
	RelativeScope {
		scope_type: ScopeType,
		offset: usize,
		#[serde(default = "one")]
		length: usize,
		direction: Direction,
		#[serde(default)]
		is_every: bool,
	},
	InteriorOnly,
	ExcludeInterior,
	Leading,
	Trailing,
	/// Resolves both ends from the same input and joins them.
	Range {
		anchor: Box<Modifier>,
		active: Box<Modifier>,
		#[serde(default)]
		exclude_anchor: bool,
		#[serde(default)]
		exclude_active: bool,
	},
	/// The first alternative that succeeds.
	Cascading {
		modifiers: Vec<Modifier>,
	},
	Position {
		position: TargetPosition,
	},
	ToRawSelection,
	KeepContentFilter,
	KeepEmptyFilter,
}

/// State a stage may consult.
pub struct StageContext<'a> {
	pub editors: &'a Editors,
	pub registry: &'a ScopeRegistry,
}

impl<'a> StageContext<'a> {
	pub fn new(editors: &'a Editors, registry: &'a ScopeRegistry) -> Self {
		Self { editors, registry }
	}

	/// The editor `target` lives in, with the handler for `scope_type` there.
	pub fn handler(&self, target: &Target, scope_type: &ScopeType) -> Result<(&'a dyn TextEditor, Box<dyn ScopeHandler>)> {
		let editor = self.editors.get(target.editor)?;
		let handler = self.registry.handler(scope_type, editor)?;
		Ok((editor, handler))
	}
}

/// One step of target resolution.
pub trait ModifierStage {
	fn run(&self, ctx: &StageContext<'_>, target: Target) -> Result<Vec<Target>>;
}

/// Builds the stage for `modifier`.
pub fn stage_for(modifier: &Modifier) -> Box<dyn ModifierStage + '_> {
	match modifier {
		Modifier::ContainingScope {
			scope_type,
			ancestor_index,
		} => Box::new(ContainingScopeStage::new(scope_type, *ancestor_index)),
		Modifier::EveryScope { scope_type } => Box::new(EveryScopeStage::new(scope_type)),
		Modifier::OrdinalScope {
			scope_type,
			start,
			length,
			is_every,
		} => Box::new(OrdinalScopeStage {
			scope_type,
			start: *start,
			length: *length,
			is_every: *is_every,
		}),
		Modifier::RelativeScope {
			scope_type,
			offset,
			length,
			direction,
			is_every,
		} => Box::new(RelativeScopeStage {
			scope_type,
			offset: *offset,
			length: *length,
			direction: *direction,
			is_every: *is_every,
		}),
		Modifier::InteriorOnly => Box::new(InteriorOnlyStage),
		Modifier::ExcludeInterior => Box::new(ExcludeInteriorStage),
		Modifier::Leading => Box::new(LeadingStage),
		Modifier::Trailing => Box::new(TrailingStage),
		Modifier::Range {
			anchor,
			active,
			exclude_anchor,
			exclude_active,
		} => Box::new(RangeModifierStage {
			anchor,
			active,
			exclude_anchor: *exclude_anchor,
			exclude_active: *exclude_active,
		}),
		Modifier::Cascading { modifiers } => Box::new(CascadingStage { modifiers }),
		Modifier::Position { position } => Box::new(PositionStage { position: *position }),
		Modifier::ToRawSelection => Box::new(ToRawSelectionStage),
		Modifier::KeepContentFilter => Box::new(KeepContentFilterStage),
		Modifier::KeepEmptyFilter => Box::new(KeepEmptyFilterStage),
	}
}

/// Feeds every target through every stage in order.
pub fn run_stages(ctx: &StageContext<'_>, stages: &[Box<dyn ModifierStage + '_>], targets: Vec<Target>) -> Result<Vec<Target>> {
	stages.iter().try_fold(targets, |targets, stage| {
		let mut out = Vec::with_capacity(targets.len());
		for target in targets {
			out.extend(stage.run(ctx, target)?);
		}
		Ok(out)
	})
}

/// Targets of `scope`, or one continuous target from `a` through `b`.
fn scope_range_targets(is_reversed: bool, a: &TargetScope, b: &TargetScope) -> Vec<Target> {
	if a.domain == b.domain {
		return a.get_targets(is_reversed).into_vec();
	}
	let (first, last) = if a.domain.start <= b.domain.start { (a, b) } else { (b, a) };
	let first_targets = first.get_targets(is_reversed);
	let last_targets = last.get_targets(is_reversed);
	match (first_targets.first(), last_targets.last()) {
		(Some(start), Some(end)) => vec![continuous_range_target(is_reversed, start, end, true, true)],
		_ => Vec::new(),
	}
}

#[cfg(test)]
pub(crate) mod test_support {
	use std::rc::Rc;

	use pinpoint_primitives::{DocumentId, Position, Range, Selection, TextDocument};

	use super::*;
	use crate::config::EngineConfig;
	use crate::host::{EditorId, MemoryEditor};

	pub struct Fixture {
		pub editors: Editors,
		pub registry: ScopeRegistry,
	}

	impl Fixture {
		pub fn new(text: &str) -> Self {
			Self::with_editor(MemoryEditor::new(
				EditorId(1),
				TextDocument::new(DocumentId(1), "plaintext", text),
			))
		}

		pub fn with_editor(editor: MemoryEditor) -> Self {
			let mut editors = Editors::new();
			editors.open(Box::new(editor));
			Self {
				editors,
				registry: ScopeRegistry::new(Rc::new(EngineConfig::default())),
			}
		}

		pub fn ctx(&self) -> StageContext<'_> {
			StageContext::new(&self.editors, &self.registry)
		}

		pub fn cursor(&self, line: usize, character: usize) -> Target {
			let pos = Position::new(line, character);
			Target::untyped(EditorId(1), Selection::new(pos, pos), false)
		}

		pub fn selection(&self, range: Range) -> Target {
			Target::untyped(EditorId(1), Selection::from_range(range, false), true)
		}

		pub fn run(&self, modifier: &Modifier, target: Target) -> Result<Vec<Target>> {
			stage_for(modifier).run(&self.ctx(), target)
		}

		pub fn texts(&self, targets: &[Target]) -> Vec<String> {
			let doc = self.editors.get(EditorId(1)).map(|ed| ed.document().clone());
			let doc = doc.expect("fixture editor");
			targets.iter().map(|target| target.text(&doc)).collect()
		}
	}

	pub fn token() -> ScopeType {
		ScopeType::simple("token")
	}
}

#[cfg(test)]
mod tests {
	use pinpoint_primitives::Range;
	use pretty_assertions::assert_eq;

	use super::test_support::{Fixture, token};
	use super::*;

	#[test]
	fn test_modifier_wire_format() {
		let json = r#"{"type":"relativeScope","scopeType":{"type":"token"},"offset":1,"direction":"forward"}"#;
		let modifier: Modifier = serde_json::from_str(json).unwrap();
		assert_eq!(
			modifier,
			Modifier::RelativeScope {
				scope_type: token(),
				offset: 1,
				length: 1,
				direction: Direction::Forward,
				is_every: false,
			}
		);

		let range: Modifier = serde_json::from_str(
			r#"{"type":"range","anchor":{"type":"leading"},"active":{"type":"trailing"},"excludeActive":true}"#,
		)
		.unwrap();
		assert!(matches!(range, Modifier::Range { exclude_active: true, exclude_anchor: false, .. }));
	}

	#[test]
	fn test_stages_compose_left_to_right() {
		let fx = Fixture::new("alpha beta\ngamma");
		let line = Modifier::ContainingScope {
			scope_type: ScopeType::simple("line"),
			ancestor_index: 0,
		};
		let every = Modifier::EveryScope { scope_type: token() };
		let stages = vec![stage_for(&line), stage_for(&every)];
		let out = run_stages(&fx.ctx(), &stages, vec![fx.cursor(0, 1)]).unwrap();
		assert_eq!(fx.texts(&out), vec!["alpha", "beta"]);
		assert_eq!(out[1].content_range, Range::from_coords(0, 6, 0, 10));
	}
}
