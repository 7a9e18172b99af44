//! Target resolution: from a [`TargetDescriptor`] to concrete targets.
//!
//! A primitive descriptor resolves its mark, then runs its modifiers left to
//! right, then widens any empty untyped target to the token it touches.
//! Range descriptors join their two sides pairwise and list descriptors
//! concatenate their elements. The first error aborts the whole resolution.

use crate::command::TargetDescriptor;
use crate::error::{CommandError, Result};
use crate::hats::HatTokenMap;
use crate::host::Editors;
use crate::marks::{MarkContext, StoredMarks, resolve_mark};
use crate::scopes::ScopeRegistry;
use crate::stages::{ContainingTokenIfUntypedEmptyStage, ModifierStage, StageContext, run_stages, stage_for};
use crate::targets::{Target, anchor_active_target};

/// Read-only session state resolution consults.
pub struct PipelineContext<'a> {
	pub editors: &'a Editors,
	pub registry: &'a ScopeRegistry,
	pub hats: &'a HatTokenMap,
	pub stored: &'a StoredMarks,
	pub use_pre_phrase_snapshot: bool,
}

impl PipelineContext<'_> {
	fn marks(&self) -> MarkContext<'_> {
		MarkContext {
			editors: self.editors,
			hats: self.hats,
			stored: self.stored,
			use_pre_phrase_snapshot: self.use_pre_phrase_snapshot,
		}
	}

	fn stages(&self) -> StageContext<'_> {
		StageContext::new(self.editors, self.registry)
	}
}

/// Resolves every descriptor, one target list each.
pub fn resolve_targets(ctx: &PipelineContext<'_>, descriptors: &[TargetDescriptor]) -> Result<Vec<Vec<Target>>> {
	descriptors
		.iter()
		.map(|descriptor| resolve_descriptor(ctx, descriptor))
		.collect()
}

/// Resolves one descriptor.
pub fn resolve_descriptor(ctx: &PipelineContext<'_>, descriptor: &TargetDescriptor) -> Result<Vec<Target>> {
	match descriptor {
		TargetDescriptor::Primitive { mark, modifiers } => {
			let marked = resolve_mark(&ctx.marks(), mark)?;
			let mut stages: Vec<Box<dyn ModifierStage + '_>> = modifiers.iter().map(stage_for).collect();
			stages.push(Box::new(ContainingTokenIfUntypedEmptyStage));
			let targets = run_stages(&ctx.stages(), &stages, marked)?;
			tracing::debug!(?mark, modifiers = modifiers.len(), targets = targets.len(), "Resolved primitive target");
			Ok(targets)
		}
		TargetDescriptor::Range {
			anchor,
			active,
			exclude_anchor,
			exclude_active,
		} => {
			let anchors = resolve_descriptor(ctx, anchor)?;
			let actives = resolve_descriptor(ctx, active)?;
			if anchors.len() != actives.len() {
				return Err(CommandError::InvalidRange(format!(
					"{} anchor target(s) but {} active target(s)",
					anchors.len(),
					actives.len()
				)));
			}
			anchors
				.iter()
				.zip(&actives)
				.map(|(anchor, active)| anchor_active_target(anchor, active, *exclude_anchor, *exclude_active))
				.collect()
		}
		TargetDescriptor::List { elements } => {
			let mut targets = Vec::new();
			for element in elements {
				targets.extend(resolve_descriptor(ctx, element)?);
			}
			Ok(targets)
		}
	}
}

#[cfg(test)]
mod tests {
	use std::rc::Rc;

	use pinpoint_primitives::{DocumentId, Position, Range, Selection, TextDocument};
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::config::EngineConfig;
	use crate::host::{EditorId, MemoryEditor, TextEditor};
	use crate::marks::Mark;
	use crate::scopes::ScopeType;
	use crate::stages::Modifier;
	use crate::targets::TargetKind;
	use crate::updater::RangeUpdater;

	struct Bench {
		editors: Editors,
		registry: ScopeRegistry,
		hats: HatTokenMap,
		stored: StoredMarks,
	}

	impl Bench {
		fn new(text: &str, selections: Vec<Selection>) -> Self {
			let mut editors = Editors::new();
			let doc = TextDocument::new(DocumentId(1), "plaintext", text);
			editors.open(Box::new(MemoryEditor::new(EditorId(1), doc).with_selections(selections)));
			Self {
				editors,
				registry: ScopeRegistry::new(Rc::new(EngineConfig::default())),
				hats: HatTokenMap::new(RangeUpdater::new()),
				stored: StoredMarks::default(),
			}
		}

		fn resolve(&self, descriptor: &TargetDescriptor) -> Result<Vec<String>> {
			let ctx = PipelineContext {
				editors: &self.editors,
				registry: &self.registry,
				hats: &self.hats,
				stored: &self.stored,
				use_pre_phrase_snapshot: false,
			};
			let doc = self.editors.get(EditorId(1))?.document();
			Ok(resolve_descriptor(&ctx, descriptor)?
				.iter()
				.map(|target| target.text(doc))
				.collect())
		}
	}

	fn caret(line: usize, character: usize) -> Selection {
		Selection::caret(Position::new(line, character))
	}

	#[test]
	fn test_bare_cursor_widens_to_token() {
		let bench = Bench::new("alpha beta", vec![caret(0, 7)]);
		let texts = bench.resolve(&TargetDescriptor::primitive(Mark::Cursor, vec![])).unwrap();
		assert_eq!(texts, vec!["beta"]);
	}

	#[test]
	fn test_modifiers_run_in_order() {
		let bench = Bench::new("f(a b) c", vec![caret(0, 3)]);
		let descriptor = TargetDescriptor::primitive(
			Mark::Cursor,
			vec![
				Modifier::ContainingScope {
					scope_type: ScopeType::surrounding_pair("parentheses"),
					ancestor_index: 0,
				},
				Modifier::InteriorOnly,
				Modifier::EveryScope {
					scope_type: ScopeType::simple("token"),
				},
			],
		);
		assert_eq!(bench.resolve(&descriptor).unwrap(), vec!["a", "b"]);
	}

	#[test]
	fn test_range_and_list_descriptors() {
		let bench = Bench::new("one two three", vec![caret(0, 0)]);
		let explicit = |start: usize, end: usize| {
			TargetDescriptor::primitive(
				Mark::Explicit {
					editor: EditorId(1),
					range: Range::from_coords(0, start, 0, end),
				},
				vec![],
			)
		};
		let range = TargetDescriptor::Range {
			anchor: Box::new(explicit(8, 13)),
			active: Box::new(explicit(0, 3)),
			exclude_anchor: false,
			exclude_active: true,
		};
		assert_eq!(bench.resolve(&range).unwrap(), vec![" two three"]);

		let list = TargetDescriptor::List {
			elements: vec![explicit(4, 7), explicit(0, 3)],
		};
		assert_eq!(bench.resolve(&list).unwrap(), vec!["two", "one"]);
	}

	#[test]
	fn test_range_sides_must_pair_up() {
		let bench = Bench::new("a b", vec![caret(0, 0), caret(0, 2)]);
		let range = TargetDescriptor::Range {
			anchor: Box::new(TargetDescriptor::primitive(Mark::Cursor, vec![])),
			active: Box::new(TargetDescriptor::primitive(Mark::Nothing, vec![])),
			exclude_anchor: false,
			exclude_active: false,
		};
		assert!(matches!(bench.resolve(&range), Err(CommandError::InvalidRange(_))));
	}

	#[test]
	fn test_stage_error_aborts_resolution() {
		let bench = Bench::new("plain", vec![caret(0, 1)]);
		let descriptor = TargetDescriptor::List {
			elements: vec![
				TargetDescriptor::primitive(Mark::Cursor, vec![]),
				TargetDescriptor::primitive(Mark::Cursor, vec![Modifier::InteriorOnly]),
			],
		};
		assert_eq!(
			bench.resolve(&descriptor),
			Err(CommandError::NoContainingScope(ScopeType::surrounding_pair("any")))
		);
	}

	#[test]
	fn test_line_number_mark_is_typed() {
		let bench = Bench::new("a\nb\nc", vec![caret(0, 0)]);
		let ctx = PipelineContext {
			editors: &bench.editors,
			registry: &bench.registry,
			hats: &bench.hats,
			stored: &bench.stored,
			use_pre_phrase_snapshot: false,
		};
		let descriptor = TargetDescriptor::primitive(
			Mark::LineNumber {
				kind: crate::marks::LineNumberKind::Absolute,
				line: 2,
			},
			vec![],
		);
		let targets = resolve_descriptor(&ctx, &descriptor).unwrap();
		assert_eq!(targets[0].kind, TargetKind::Line);
		assert_eq!(targets[0].content_range, Range::from_coords(2, 0, 2, 1));
	}
}
