use super::{ModifierStage, StageContext, containing_scope_targets};
use crate::error::{CommandError, Result};
use crate::scopes::ScopeType;
use crate::targets::Target;

/// Pair targets for `target`: itself when it already is one, otherwise the
/// pair of any kind around it.
fn with_boundary(ctx: &StageContext<'_>, target: Target) -> Result<Vec<Target>> {
	if target.boundary().is_some() {
		return Ok(vec![target]);
	}
	containing_scope_targets(ctx, &target, &ScopeType::surrounding_pair("any"), 0)
}

/// The inside of a pair, without its delimiters.
pub struct InteriorOnlyStage;

impl ModifierStage for InteriorOnlyStage {
	fn run(&self, ctx: &StageContext<'_>, target: Target) -> Result<Vec<Target>> {
		Ok(with_boundary(ctx, target)?
			.iter()
			.filter_map(Target::interior)
			.collect())
	}
}

/// The two delimiters of a pair, without its inside.
pub struct ExcludeInteriorStage;

impl ModifierStage for ExcludeInteriorStage {
	fn run(&self, ctx: &StageContext<'_>, target: Target) -> Result<Vec<Target>> {
		Ok(with_boundary(ctx, target)?
			.iter()
			.filter_map(Target::boundary)
			.flatten()
			.collect())
	}
}

/// The separator run before the content.
pub struct LeadingStage;

impl ModifierStage for LeadingStage {
	fn run(&self, ctx: &StageContext<'_>, target: Target) -> Result<Vec<Target>> {
		let doc = ctx.editors.get(target.editor)?.document();
		let range = target
			.leading_delimiter_range(doc)
			.ok_or(CommandError::NoDelimiter("leading"))?;
		Ok(vec![Target::raw(target.editor, range, target.is_reversed)])
	}
}

/// The separator run after the content.
pub struct TrailingStage;

impl ModifierStage for TrailingStage {
	fn run(&self, ctx: &StageContext<'_>, target: Target) -> Result<Vec<Target>> {
		let doc = ctx.editors.get(target.editor)?.document();
		let range = target
			.trailing_delimiter_range(doc)
			.ok_or(CommandError::NoDelimiter("trailing"))?;
		Ok(vec![Target::raw(target.editor, range, target.is_reversed)])
	}
}
