//! Hat token map.
//!
//! A hat is a `(style, character)` address painted over one character of a
//! visible token. The map from hats to tokens is live: every token range is
//! tracked by the range updater, so edits from any source keep it current.
//! Hosts that bracket a spoken phrase with a [`PhraseSignal`] get a snapshot
//! of the map taken when the phrase started, letting every command in the
//! phrase address the hats the user saw.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use pinpoint_primitives::{DocumentId, Range, TextDocument};

use crate::host::EditorId;
use crate::updater::{ExpansionBehavior, RangeUpdater, Registration, SelectionInfo, SharedSelectionInfos};

mod allocator;

pub use allocator::{HatAssignment, allocate_hats};

/// Address of one hat.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HatKey {
	pub hat_style: String,
	/// Normalized grapheme under the hat.
	pub character: String,
}

impl HatKey {
	pub fn new(hat_style: impl Into<String>, character: &str) -> Self {
		Self {
			hat_style: hat_style.into(),
			character: normalize_grapheme(character),
		}
	}
}

impl std::fmt::Display for HatKey {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}.{}", self.hat_style, self.character)
	}
}

/// Lowercases a grapheme so `A` and `a` share hats.
pub fn normalize_grapheme(grapheme: &str) -> String {
	grapheme.to_lowercase()
}

/// The token a hat currently points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HatToken {
	pub editor: EditorId,
	pub range: Range,
	/// Token text when the hat was placed.
	pub text: String,
}

struct TrackedToken {
	editor: EditorId,
	document: DocumentId,
	info: SharedSelectionInfos,
	_registration: Registration,
}

impl TrackedToken {
	fn token(&self) -> Option<HatToken> {
		let infos = self.info.borrow();
		let info = infos.first()?;
		Some(HatToken {
			editor: self.editor,
			range: info.range,
			text: info.original_text.clone(),
		})
	}
}

/// One generation of hats.
#[derive(Default)]
pub struct IndividualHatMap {
	tokens: BTreeMap<HatKey, TrackedToken>,
}

impl IndividualHatMap {
	fn add(&mut self, updater: &Rc<RangeUpdater>, key: HatKey, editor: EditorId, doc: &TextDocument, range: Range) {
		let info = SelectionInfo::from_range(doc, range, ExpansionBehavior::OPEN_OPEN);
		self.insert_tracked(updater, key, editor, doc.id(), info);
	}

	fn insert_tracked(
		&mut self,
		updater: &Rc<RangeUpdater>,
		key: HatKey,
		editor: EditorId,
		document: DocumentId,
		info: SelectionInfo,
	) {
		let shared = Rc::new(RefCell::new(vec![info]));
		let registration = updater.register(document, shared.clone());
		self.tokens.insert(
			key,
			TrackedToken {
				editor,
				document,
				info: shared,
				_registration: registration,
			},
		);
	}

	pub fn get(&self, key: &HatKey) -> Option<HatToken> {
		self.tokens.get(key).and_then(TrackedToken::token)
	}

	/// Entries ordered by hat style, then character.
	pub fn entries(&self) -> Vec<(HatKey, HatToken)> {
		self.tokens
			.iter()
			.filter_map(|(key, tracked)| Some((key.clone(), tracked.token()?)))
			.collect()
	}

	pub fn len(&self) -> usize {
		self.tokens.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}

	/// An independent copy whose ranges are tracked from now on.
	fn snapshot(&self, updater: &Rc<RangeUpdater>) -> Self {
		let mut copy = Self::default();
		for (key, tracked) in &self.tokens {
			let Some(info) = tracked.info.borrow().first().cloned() else {
				continue;
			};
			copy.insert_tracked(updater, key.clone(), tracked.editor, tracked.document, info);
		}
		copy
	}
}

/// Reports the version of the current spoken phrase.
///
/// A new version means a new phrase started since the last look.
pub trait PhraseSignal {
	fn version(&self) -> Option<String>;
}

/// The session's hats, with an optional pre-phrase snapshot.
pub struct HatTokenMap {
	updater: Rc<RangeUpdater>,
	active: IndividualHatMap,
	pre_phrase: Option<IndividualHatMap>,
	signal: Option<Box<dyn PhraseSignal>>,
	last_signal_version: Option<String>,
}

impl HatTokenMap {
	pub fn new(updater: Rc<RangeUpdater>) -> Self {
		Self {
			updater,
			active: IndividualHatMap::default(),
			pre_phrase: None,
			signal: None,
			last_signal_version: None,
		}
	}

	pub fn set_phrase_signal(&mut self, signal: Box<dyn PhraseSignal>) {
		self.signal = Some(signal);
	}

	/// Places a hat over `range` in `editor`, replacing any previous holder.
	pub fn add_token(&mut self, key: HatKey, editor: EditorId, doc: &TextDocument, range: Range) {
		self.active.add(&self.updater, key, editor, doc, range);
	}

	/// Drops every hat of the active map.
	pub fn clear(&mut self) {
		self.active = IndividualHatMap::default();
	}

	pub fn entries(&self) -> Vec<(HatKey, HatToken)> {
		self.active.entries()
	}

	/// Takes a snapshot if the phrase signal reports a version not seen yet.
	pub fn observe_phrase_signal(&mut self) {
		let Some(signal) = &self.signal else {
			return;
		};
		let version = signal.version();
		if version == self.last_signal_version {
			return;
		}
		tracing::debug!(?version, hats = self.active.len(), "New phrase, taking hat snapshot");
		if version.is_some() {
			self.pre_phrase = Some(self.active.snapshot(&self.updater));
		}
		self.last_signal_version = version;
	}

	/// The map a command should read.
	pub fn readable_map(&self, use_pre_phrase_snapshot: bool) -> &IndividualHatMap {
		if !use_pre_phrase_snapshot {
			return &self.active;
		}
		if self.last_signal_version.is_none() {
			tracing::warn!("Pre-phrase snapshot requested but no phrase signal was seen");
			return &self.active;
		}
		match &self.pre_phrase {
			Some(snapshot) => snapshot,
			None => {
				tracing::warn!("Pre-phrase snapshot requested but none has been taken");
				&self.active
			}
		}
	}

	pub fn get_token(&self, key: &HatKey, use_pre_phrase_snapshot: bool) -> Option<HatToken> {
		self.readable_map(use_pre_phrase_snapshot).get(key)
	}
}

#[cfg(test)]
mod tests;
