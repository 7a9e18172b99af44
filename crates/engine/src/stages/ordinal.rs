use super::{ModifierStage, StageContext, every_scope_targets};
use crate::error::{CommandError, Result};
use crate::scopes::ScopeType;
use crate::targets::{Target, range_target_from_indices};

/// Scopes picked by index out of the every-scope enumeration.
pub struct OrdinalScopeStage<'m> {
	pub scope_type: &'m ScopeType,
	pub start: isize,
	pub length: usize,
	pub is_every: bool,
}

impl ModifierStage for OrdinalScopeStage<'_> {
	fn run(&self, ctx: &StageContext<'_>, target: Target) -> Result<Vec<Target>> {
		let targets = every_scope_targets(ctx, &target, self.scope_type)?;
		let (start, end) = ordinal_indices(self.start, self.length, targets.len())?;
		if self.is_every {
			return Ok(targets[start..=end].to_vec());
		}
		Ok(vec![range_target_from_indices(target.is_reversed, &targets, start, end)?])
	}
}

/// Inclusive indices for `start`/`length` over `count` items.
fn ordinal_indices(start: isize, length: usize, count: usize) -> Result<(usize, usize)> {
	if length == 0 {
		return Err(CommandError::OutOfRange);
	}
	let first = if start < 0 {
		count.checked_sub(start.unsigned_abs())
	} else {
		Some(start.unsigned_abs())
	};
	let first = first.ok_or(CommandError::OutOfRange)?;
	let last = first + length - 1;
	if last >= count {
		return Err(CommandError::OutOfRange);
	}
	Ok((first, last))
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	use super::*;
	use crate::stages::Modifier;
	use crate::stages::test_support::{Fixture, token};

	#[rstest]
	#[case(0, 1, 5, Ok((0, 0)))]
	#[case(-1, 1, 5, Ok((4, 4)))]
	#[case(-2, 2, 5, Ok((3, 4)))]
	#[case(1, 3, 5, Ok((1, 3)))]
	#[case(4, 2, 5, Err(CommandError::OutOfRange))]
	#[case(-6, 1, 5, Err(CommandError::OutOfRange))]
	#[case(0, 0, 5, Err(CommandError::OutOfRange))]
	#[case(2, 0, 5, Err(CommandError::OutOfRange))]
	fn test_ordinal_indices(
		#[case] start: isize,
		#[case] length: usize,
		#[case] count: usize,
		#[case] expected: Result<(usize, usize)>,
	) {
		assert_eq!(ordinal_indices(start, length, count), expected);
	}

	fn ordinal(start: isize, length: usize, is_every: bool) -> Modifier {
		Modifier::OrdinalScope {
			scope_type: token(),
			start,
			length,
			is_every,
		}
	}

	#[test]
	fn test_last_token_of_line() {
		let fx = Fixture::new("alpha beta gamma");
		let out = fx.run(&ordinal(-1, 1, false), fx.cursor(0, 0)).unwrap();
		assert_eq!(fx.texts(&out), vec!["gamma"]);
	}

	#[test]
	fn test_first_two_tokens_as_range_or_list() {
		let fx = Fixture::new("alpha beta gamma");
		let range = fx.run(&ordinal(0, 2, false), fx.cursor(0, 12)).unwrap();
		assert_eq!(fx.texts(&range), vec!["alpha beta"]);
		let every = fx.run(&ordinal(0, 2, true), fx.cursor(0, 12)).unwrap();
		assert_eq!(fx.texts(&every), vec!["alpha", "beta"]);
	}
}
