use super::{Modifier, ModifierStage, StageContext, stage_for};
use crate::error::{CommandError, Result};
use crate::targets::{Target, anchor_active_target};

/// Resolves two modifiers against the same input and spans the results.
pub struct RangeModifierStage<'m> {
	pub anchor: &'m Modifier,
	pub active: &'m Modifier,
	pub exclude_anchor: bool,
	pub exclude_active: bool,
}

impl ModifierStage for RangeModifierStage<'_> {
	fn run(&self, ctx: &StageContext<'_>, target: Target) -> Result<Vec<Target>> {
		let anchor = single(stage_for(self.anchor).run(ctx, target.clone())?, "anchor")?;
		let active = single(stage_for(self.active).run(ctx, target)?, "active")?;
		Ok(vec![anchor_active_target(
			&anchor,
			&active,
			self.exclude_anchor,
			self.exclude_active,
		)?])
	}
}

fn single(mut targets: Vec<Target>, end: &str) -> Result<Target> {
	match targets.len() {
		1 => Ok(targets.remove(0)),
		n => Err(CommandError::InvalidRange(format!("expected one {end} target, found {n}"))),
	}
}
