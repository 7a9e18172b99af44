use pinpoint_primitives::{Position, Range};

use super::{Target, TargetKind};
use crate::error::{CommandError, Result};

/// Builds one target spanning `start` through `end`.
///
/// `start` must not begin after `end`. Two targets of the same line-like or
/// token-like kind merge into that kind; anything else becomes a
/// [`TargetKind::Range`] that remembers both ends for removal.
pub fn continuous_range_target(
	is_reversed: bool,
	start: &Target,
	end: &Target,
	include_start: bool,
	include_end: bool,
) -> Target {
	let from: Position = if include_start {
		start.content_range.start
	} else {
		start.content_range.end
	};
	let to: Position = if include_end {
		end.content_range.end
	} else {
		end.content_range.start
	};
	let content_range = Range::new(from, to);

	if include_start && include_end {
		let merged = match (&start.kind, &end.kind) {
			(TargetKind::Token, TargetKind::Token) => Some(TargetKind::Token),
			(TargetKind::Line, TargetKind::Line | TargetKind::Paragraph) => Some(TargetKind::Line),
			(TargetKind::Paragraph, TargetKind::Line) => Some(TargetKind::Line),
			(TargetKind::Paragraph, TargetKind::Paragraph) => Some(TargetKind::Paragraph),
			(TargetKind::Untyped { has_explicit_range: a }, TargetKind::Untyped { has_explicit_range: b }) => {
				Some(TargetKind::Untyped {
					has_explicit_range: *a || *b,
				})
			}
			(a @ TargetKind::Scope { .. }, b @ TargetKind::Scope { .. }) if a == b => Some(a.clone()),
			_ => None,
		};
		if let Some(kind) = merged {
			return Target::new(start.editor, content_range, is_reversed, kind);
		}
	}

	Target::new(
		start.editor,
		content_range,
		is_reversed,
		TargetKind::Range {
			start: Box::new(start.clone()),
			end: Box::new(end.clone()),
			exclude_start: !include_start,
			exclude_end: !include_end,
		},
	)
}

/// Joins an anchor and an active target into one continuous target.
///
/// Direction comes from document order: the result is reversed when the
/// active target starts before the anchor.
pub fn anchor_active_target(anchor: &Target, active: &Target, exclude_anchor: bool, exclude_active: bool) -> Result<Target> {
	if anchor.editor != active.editor {
		return Err(CommandError::InvalidRange(format!(
			"range spans {} and {}",
			anchor.editor, active.editor
		)));
	}
	let is_reversed = active.content_range.start < anchor.content_range.start;
	let (start, end, include_start, include_end) = if is_reversed {
		(active, anchor, !exclude_active, !exclude_anchor)
	} else {
		(anchor, active, !exclude_anchor, !exclude_active)
	};
	Ok(continuous_range_target(is_reversed, start, end, include_start, include_end))
}

/// Returns the range from `targets[start]` to `targets[end]`, inclusive.
pub fn range_target_from_indices(is_reversed: bool, targets: &[Target], start: usize, end: usize) -> Result<Target> {
	if start > end || end >= targets.len() {
		return Err(CommandError::OutOfRange);
	}
	if start == end {
		return Ok(targets[start].clone());
	}
	Ok(continuous_range_target(is_reversed, &targets[start], &targets[end], true, true))
}

#[cfg(test)]
mod tests {
	use pinpoint_primitives::{DocumentId, TextDocument};
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::host::EditorId;
	use crate::targets::RemovalStyle;

	fn t(range: Range, kind: TargetKind) -> Target {
		Target::new(EditorId(1), range, false, kind)
	}

	#[test]
	fn test_same_kind_tokens_merge() {
		let a = t(Range::from_coords(0, 0, 0, 3), TargetKind::Token);
		let b = t(Range::from_coords(0, 4, 0, 7), TargetKind::Token);
		let merged = continuous_range_target(false, &a, &b, true, true);
		assert_eq!(merged.kind, TargetKind::Token);
		assert_eq!(merged.content_range, Range::from_coords(0, 0, 0, 7));
	}

	#[test]
	fn test_mixed_kinds_build_range_target() {
		let d = TextDocument::new(DocumentId(1), "plaintext", "foo bar baz");
		let a = t(Range::from_coords(0, 0, 0, 3), TargetKind::Token);
		let b = t(
			Range::from_coords(0, 4, 0, 7),
			TargetKind::Scope {
				delimiter: " ".to_string(),
				removal: RemovalStyle::Content,
			},
		);
		let range = continuous_range_target(true, &a, &b, true, true);
		assert_eq!(range.type_name(), "range");
		assert!(range.is_reversed);
		assert_eq!(range.removal_range(&d), Range::from_coords(0, 0, 0, 7));
	}

	#[test]
	fn test_exclusion_uses_inner_edges() {
		let a = t(Range::from_coords(0, 0, 0, 3), TargetKind::Token);
		let b = t(Range::from_coords(0, 8, 0, 11), TargetKind::Token);
		let range = continuous_range_target(false, &a, &b, false, false);
		assert_eq!(range.content_range, Range::from_coords(0, 3, 0, 8));
	}

	#[test]
	fn test_anchor_after_active_reverses() {
		let anchor = t(Range::from_coords(0, 8, 0, 11), TargetKind::Token);
		let active = t(Range::from_coords(0, 0, 0, 3), TargetKind::Token);
		let range = anchor_active_target(&anchor, &active, false, true).unwrap();
		assert!(range.is_reversed);
		// The excluded active end is the start of the document-ordered range.
		assert_eq!(range.content_range, Range::from_coords(0, 3, 0, 11));

		let other = Target::new(EditorId(2), Range::from_coords(0, 0, 0, 1), false, TargetKind::Token);
		assert!(matches!(
			anchor_active_target(&anchor, &other, false, false),
			Err(CommandError::InvalidRange(_))
		));
	}

	#[test]
	fn test_indices_out_of_range() {
		let targets = vec![t(Range::from_coords(0, 0, 0, 1), TargetKind::Token)];
		assert_eq!(range_target_from_indices(false, &targets, 0, 1), Err(CommandError::OutOfRange));
		assert_eq!(range_target_from_indices(false, &targets, 0, 0).unwrap(), targets[0]);
	}
}
