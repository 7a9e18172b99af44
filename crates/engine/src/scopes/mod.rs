//! Scope types and the scope-handler contract.
//!
//! A [`ScopeHandler`] produces candidate scopes around a position; the
//! functions in [`iterate`] turn those candidates into the filtered, ordered
//! sequences that modifier stages consume.

use pinpoint_primitives::{Direction, Position, Range};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::host::{EditorId, TextEditor};
use crate::targets::Target;

pub mod character;
pub mod document;
pub mod iterate;
pub mod line;
pub mod one_of;
pub mod paragraph;
pub mod pattern;
pub mod registry;
pub mod surrounding_pair;
pub mod syntax;
pub mod token;
pub mod word;

pub use iterate::{
	generate_scopes, iteration_scopes_touching_position, preferred_scope, scope_relative_to_position,
	scopes_overlapping_range, scopes_touching_position,
};
pub use registry::ScopeRegistry;

/// Which side a symmetric delimiter should be read as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ForceDirection {
	Left,
	Right,
}

/// A kind of region a command can refer to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawScopeType", into = "RawScopeType")]
pub enum ScopeType {
	/// A named scope kind: `token`, `line`, `statement`, ...
	Simple(String),
	SurroundingPair {
		delimiter: String,
		force_direction: Option<ForceDirection>,
		require_strong_containment: bool,
	},
	/// The interiors of pairs; iteration scope of [`ScopeType::SurroundingPair`].
	SurroundingPairInterior { delimiter: String },
	CustomRegex { regex: String },
	OneOf { scope_types: Vec<ScopeType> },
	/// Iteration scope of a syntax scope named by the payload.
	SyntaxIteration(String),
}

impl ScopeType {
	pub fn simple(name: impl Into<String>) -> Self {
		Self::Simple(name.into())
	}

	pub fn surrounding_pair(delimiter: impl Into<String>) -> Self {
		Self::SurroundingPair {
			delimiter: delimiter.into(),
			force_direction: None,
			require_strong_containment: false,
		}
	}

	pub fn name(&self) -> &str {
		match self {
			Self::Simple(name) => name,
			Self::SurroundingPair { .. } => "surroundingPair",
			Self::SurroundingPairInterior { .. } => "surroundingPairInterior",
			Self::CustomRegex { .. } => "customRegex",
			Self::OneOf { .. } => "oneOf",
			Self::SyntaxIteration(_) => "syntaxIteration",
		}
	}
}

impl std::fmt::Display for ScopeType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Simple(name) => f.write_str(name),
			Self::SurroundingPair { delimiter, .. } => write!(f, "surroundingPair({delimiter})"),
			Self::SurroundingPairInterior { delimiter } => write!(f, "interior({delimiter})"),
			Self::CustomRegex { regex } => write!(f, "regex /{regex}/"),
			Self::OneOf { scope_types } => {
				f.write_str("oneOf(")?;
				for (i, scope_type) in scope_types.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{scope_type}")?;
				}
				f.write_str(")")
			}
			Self::SyntaxIteration(name) => write!(f, "{name} iteration"),
		}
	}
}

/// Wire form of [`ScopeType`]: `{"type": "...", ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawScopeType {
	#[serde(rename = "type")]
	kind: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	delimiter: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	force_direction: Option<ForceDirection>,
	#[serde(default, skip_serializing_if = "std::ops::Not::not")]
	require_strong_containment: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	regex: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	scope_types: Option<Vec<ScopeType>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	scope_name: Option<String>,
}

impl TryFrom<RawScopeType> for ScopeType {
	type Error = String;

	fn try_from(raw: RawScopeType) -> Result<Self, Self::Error> {
		let missing = |field: &str| format!("scope type `{}` requires `{field}`", raw.kind);
		Ok(match raw.kind.as_str() {
			"surroundingPair" => Self::SurroundingPair {
				delimiter: raw.delimiter.clone().ok_or_else(|| missing("delimiter"))?,
				force_direction: raw.force_direction,
				require_strong_containment: raw.require_strong_containment,
			},
			"surroundingPairInterior" => Self::SurroundingPairInterior {
				delimiter: raw.delimiter.clone().ok_or_else(|| missing("delimiter"))?,
			},
			"customRegex" => Self::CustomRegex {
				regex: raw.regex.clone().ok_or_else(|| missing("regex"))?,
			},
			"oneOf" => Self::OneOf {
				scope_types: raw.scope_types.clone().ok_or_else(|| missing("scopeTypes"))?,
			},
			"syntaxIteration" => Self::SyntaxIteration(raw.scope_name.clone().ok_or_else(|| missing("scopeName"))?),
			"" => return Err("scope type name is empty".to_string()),
			_ => Self::Simple(raw.kind),
		})
	}
}

impl From<ScopeType> for RawScopeType {
	fn from(scope_type: ScopeType) -> Self {
		let mut raw = RawScopeType {
			kind: scope_type.name().to_string(),
			delimiter: None,
			force_direction: None,
			require_strong_containment: false,
			regex: None,
			scope_types: None,
			scope_name: None,
		};
		match scope_type {
			ScopeType::Simple(_) => {}
			ScopeType::SurroundingPair {
				delimiter,
				force_direction,
				require_strong_containment,
			} => {
				raw.delimiter = Some(delimiter);
				raw.force_direction = force_direction;
				raw.require_strong_containment = require_strong_containment;
			}
			ScopeType::SurroundingPairInterior { delimiter } => raw.delimiter = Some(delimiter),
			ScopeType::CustomRegex { regex } => raw.regex = Some(regex),
			ScopeType::OneOf { scope_types } => raw.scope_types = Some(scope_types),
			ScopeType::SyntaxIteration(name) => raw.scope_name = Some(name),
		}
		raw
	}
}

/// One occurrence of a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetScope {
	pub editor: EditorId,
	/// Range used for adjacency, containment and ordering.
	pub domain: Range,
	/// Targets materialized from this scope, never reversed.
	pub targets: SmallVec<[Target; 1]>,
}

impl TargetScope {
	pub fn new(editor: EditorId, domain: Range, target: Target) -> Self {
		Self {
			editor,
			domain,
			targets: smallvec::smallvec![target],
		}
	}

	/// Targets with the requested direction applied.
	pub fn get_targets(&self, is_reversed: bool) -> SmallVec<[Target; 1]> {
		self.targets
			.iter()
			.cloned()
			.map(|target| target.with_reversed(is_reversed))
			.collect()
	}
}

/// The enclosing region within which sibling scopes are enumerated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationScope {
	pub editor: EditorId,
	pub domain: Range,
	/// The range whose scopes are enumerated.
	pub range: Range,
}

/// Whether a yielded scope must contain the search position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Containment {
	Required,
	Disallowed,
	/// Scopes may touch the position but not strictly contain it.
	DisallowedIfStrict,
}

/// Filters applied by [`generate_scopes`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeIteratorRequirements {
	pub containment: Option<Containment>,
	/// Yield non-empty scopes that merely end (forward) or start (backward)
	/// at the search position.
	pub allow_adjacent_scopes: bool,
	/// Skip a scope whose domain contains the previously yielded one.
	pub skip_ancestor_scopes: bool,
	/// Hierarchical handlers also yield scopes nested in yielded ones.
	pub include_descendant_scopes: bool,
	/// Scopes starting beyond this position are not yielded.
	pub distal_position: Option<Position>,
}

/// Lazily scans lines outward from `position`, yielding the ranges `scan`
/// finds on each line in walk order.
///
/// `scan` must return non-overlapping ranges sorted by start.
pub(crate) fn line_wise<'a, F>(
	editor: &'a dyn TextEditor,
	position: Position,
	direction: Direction,
	scan: F,
) -> impl Iterator<Item = Range> + 'a
where
	F: Fn(&pinpoint_primitives::TextLine) -> Vec<Range> + 'a,
{
	let doc = editor.document();
	let last = doc.line_count().saturating_sub(1);
	let forward = direction.is_forward();
	let lines: Box<dyn Iterator<Item = usize>> = if forward {
		Box::new(position.line..=last)
	} else {
		Box::new((0..=position.line.min(last)).rev())
	};
	lines.flat_map(move |number| {
		let mut ranges = scan(&doc.line_at(number));
		if forward {
			ranges.retain(|range| range.end >= position);
		} else {
			ranges.retain(|range| range.start <= position);
			ranges.reverse();
		}
		ranges
	})
}

/// Produces scopes of one type.
///
/// Candidates need not be filtered. Non-hierarchical handlers yield them in
/// domain order: forward, every scope whose domain ends at or after the
/// position, by end; backward, every scope whose domain starts at or before
/// it, by descending start. Hierarchical handlers may yield candidates in any
/// order; [`generate_scopes`] arranges them.
pub trait ScopeHandler {
	fn scope_type(&self) -> &ScopeType;

	/// Scope type whose instances bound `every` and ordinal enumeration.
	fn iteration_scope_type(&self) -> ScopeType;

	/// True if scopes of this type may contain one another.
	fn is_hierarchical(&self) -> bool {
		false
	}

	fn generate_scope_candidates<'a>(
		&'a self,
		editor: &'a dyn TextEditor,
		position: Position,
		direction: Direction,
		hints: &ScopeIteratorRequirements,
	) -> Box<dyn Iterator<Item = TargetScope> + 'a>;

	/// Breaks ties between two scopes touching the same position.
	///
	/// `Some(true)` keeps `a`, `Some(false)` keeps `b`, `None` has no opinion.
	fn is_preferred_over(&self, _editor: &dyn TextEditor, _a: &TargetScope, _b: &TargetScope) -> Option<bool> {
		None
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn test_scope_type_wire_format() {
		let parsed: ScopeType = serde_json::from_str(r#"{"type":"statement"}"#).unwrap();
		assert_eq!(parsed, ScopeType::simple("statement"));

		let pair: ScopeType =
			serde_json::from_str(r#"{"type":"surroundingPair","delimiter":"any","forceDirection":"left"}"#).unwrap();
		assert_eq!(
			pair,
			ScopeType::SurroundingPair {
				delimiter: "any".to_string(),
				force_direction: Some(ForceDirection::Left),
				require_strong_containment: false,
			}
		);

		let one_of = ScopeType::OneOf {
			scope_types: vec![ScopeType::simple("token"), ScopeType::surrounding_pair("parentheses")],
		};
		let json = serde_json::to_string(&one_of).unwrap();
		assert_eq!(
			json,
			r#"{"type":"oneOf","scopeTypes":[{"type":"token"},{"type":"surroundingPair","delimiter":"parentheses"}]}"#
		);
		assert_eq!(serde_json::from_str::<ScopeType>(&json).unwrap(), one_of);
	}

	#[test]
	fn test_missing_fields_are_rejected() {
		assert!(serde_json::from_str::<ScopeType>(r#"{"type":"customRegex"}"#).is_err());
		assert!(serde_json::from_str::<ScopeType>(r#"{"type":""}"#).is_err());
	}

	#[test]
	fn test_display() {
		assert_eq!(ScopeType::simple("line").to_string(), "line");
		assert_eq!(ScopeType::surrounding_pair("any").to_string(), "surroundingPair(any)");
	}
}
