use super::{ModifierStage, StageContext};
use crate::error::Result;
use crate::targets::Target;

/// Drops the type of a target, keeping its exact range.
pub struct ToRawSelectionStage;

impl ModifierStage for ToRawSelectionStage {
	fn run(&self, _ctx: &StageContext<'_>, target: Target) -> Result<Vec<Target>> {
		Ok(vec![Target::raw(target.editor, target.content_range, target.is_reversed)])
	}
}

/// Keeps targets with non-whitespace content.
pub struct KeepContentFilterStage;

impl ModifierStage for KeepContentFilterStage {
	fn run(&self, ctx: &StageContext<'_>, target: Target) -> Result<Vec<Target>> {
		let doc = ctx.editors.get(target.editor)?.document();
		if target.text(doc).trim().is_empty() {
			return Ok(Vec::new());
		}
		Ok(vec![target])
	}
}

/// Keeps targets with an empty content range.
pub struct KeepEmptyFilterStage;

impl ModifierStage for KeepEmptyFilterStage {
	fn run(&self, _ctx: &StageContext<'_>, target: Target) -> Result<Vec<Target>> {
		if target.content_range.is_empty() {
			Ok(vec![target])
		} else {
			Ok(Vec::new())
		}
	}
}
