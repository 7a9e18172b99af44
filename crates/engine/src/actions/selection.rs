use pinpoint_primitives::Selection;

use super::{ActionContext, ActionOutcome, apply_selections};
use crate::error::Result;
use crate::targets::Target;

pub(super) enum Placement {
	Content,
	Before,
	After,
}

pub(super) fn set_selection(ctx: &mut ActionContext<'_>, targets: &[Target], placement: Placement) -> Result<ActionOutcome> {
	let selections: Vec<_> = targets
		.iter()
		.map(|target| {
			let selection = match placement {
				Placement::Content => target.selection(),
				Placement::Before => Selection::caret(target.content_range.start),
				Placement::After => Selection::caret(target.content_range.end),
			};
			(target.editor, selection)
		})
		.collect();
	apply_selections(ctx.editors, &selections)?;
	Ok(ActionOutcome::that(selections))
}
