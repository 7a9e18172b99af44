use pinpoint_primitives::Range;

use super::{ModifierStage, StageContext};
use crate::error::Result;
use crate::targets::{Target, TargetKind, TargetPosition};

/// An empty target at one edge of the input.
///
/// `before` and `after` remember the input's insertion delimiter so text
/// inserted there is separated from it; `start` and `end` insert flush.
pub struct PositionStage {
	pub position: TargetPosition,
}

impl ModifierStage for PositionStage {
	fn run(&self, ctx: &StageContext<'_>, target: Target) -> Result<Vec<Target>> {
		let doc = ctx.editors.get(target.editor)?.document();
		let content = target.content_range;
		let (at, insertion_delimiter) = match self.position {
			TargetPosition::Before => (content.start, target.insertion_delimiter(doc)),
			TargetPosition::After => (content.end, target.insertion_delimiter(doc)),
			TargetPosition::Start => (content.start, String::new()),
			TargetPosition::End => (content.end, String::new()),
		};
		Ok(vec![Target::new(
			target.editor,
			Range::empty(at),
			target.is_reversed,
			TargetKind::Position {
				position: self.position,
				insertion_delimiter,
			},
		)])
	}
}
