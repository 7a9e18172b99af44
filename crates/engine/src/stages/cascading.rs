use super::{Modifier, ModifierStage, StageContext, stage_for};
use crate::error::{CommandError, Result};
use crate::targets::Target;

/// Tries each modifier in turn; the first to succeed wins.
pub struct CascadingStage<'m> {
	pub modifiers: &'m [Modifier],
}

impl ModifierStage for CascadingStage<'_> {
	fn run(&self, ctx: &StageContext<'_>, target: Target) -> Result<Vec<Target>> {
		let mut last_error = None;
		for modifier in self.modifiers {
			match stage_for(modifier).run(ctx, target.clone()) {
				Ok(targets) => return Ok(targets),
				Err(err) => {
					tracing::trace!(error = %err, "Cascading alternative failed");
					last_error = Some(err);
				}
			}
		}
		Err(last_error.unwrap_or_else(|| CommandError::InvalidCommand("cascading modifier has no alternatives".into())))
	}
}
