use std::collections::HashMap;

use log::debug;

use super::state::{State, StateId};
use crate::error::ChainError;

/// First-order word chain.
///
/// The `Chain` owns every [`State`] in an insertion-ordered arena. States refer
/// to each other through [`StateId`]s, so nothing can outlive the chain and
/// nothing is shared between two chains.
///
/// # Responsibilities
/// - Intern words as unique states
/// - Accumulate transition frequencies between consecutive words
/// - Expose states in insertion order for uniform sampling
///
/// # Invariants
/// - Exactly one state per distinct word
/// - `index[word]` is the position of that word's state in `states`
/// - `non_terminal` counts the non-terminal states of `states`
#[derive(Debug, Default)]
pub struct Chain {
	/// States in order of first appearance.
	states: Vec<State>,

	/// Word to state lookup.
	index: HashMap<Box<str>, StateId>,

	non_terminal: usize,
}

impl Chain {
	/// Creates an empty chain.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the state of `word`, creating it on first encounter.
	///
	/// `word` is expected to be a non-empty token.
	///
	/// # Errors
	/// Returns `ChainError::Allocation` if the new state cannot be stored. The
	/// chain is left unchanged in that case.
	pub fn intern(&mut self, word: &str) -> Result<StateId, ChainError> {
		if let Some(id) = self.find(word) {
			return Ok(id);
		}

		// Reserve everything up front: the pushes below cannot fail.
		let state = State::new(word)?;
		let mut key = String::new();
		key.try_reserve_exact(word.len())?;
		key.push_str(word);
		self.states.try_reserve(1)?;
		self.index.try_reserve(1)?;

		let id = StateId(self.states.len());
		if !state.is_terminal() {
			self.non_terminal += 1;
		}
		self.states.push(state);
		self.index.insert(key.into_boxed_str(), id);
		Ok(id)
	}

	/// Looks up an already interned word.
	pub fn find(&self, word: &str) -> Option<StateId> {
		self.index.get(word).copied()
	}

	/// Records that `current` followed `previous`.
	///
	/// A terminal `previous` absorbs the link: nothing is recorded.
	///
	/// # Errors
	/// Returns `ChainError::Allocation` if the transition table of `previous`
	/// cannot grow. Both states stay valid.
	///
	/// # Panics
	/// Panics if `previous` does not belong to this chain.
	pub fn link(&mut self, previous: StateId, current: StateId) -> Result<(), ChainError> {
		self.states[previous.0].record(current)
	}

	/// Feeds a stream of already tokenized words into the chain.
	///
	/// Every word is interned and each consecutive pair is linked.
	/// Returns the number of words consumed.
	///
	/// # Errors
	/// Stops at the first allocation failure. States built before the failure
	/// remain in the chain.
	pub fn ingest<I, S>(&mut self, words: I) -> Result<usize, ChainError>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut previous: Option<StateId> = None;
		let mut count = 0;

		for word in words {
			let current = self.intern(word.as_ref())?;
			if let Some(previous) = previous {
				self.link(previous, current)?;
			}
			previous = Some(current);
			count += 1;
		}

		debug!(
			"ingested {} words into {} states ({} non-terminal)",
			count,
			self.states.len(),
			self.non_terminal
		);
		Ok(count)
	}

	/// Number of distinct states.
	pub fn len(&self) -> usize {
		self.states.len()
	}

	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	/// Number of states a sequence may start from.
	pub fn non_terminal_count(&self) -> usize {
		self.non_terminal
	}

	/// Returns the state behind `id`, if it belongs to this chain.
	pub fn state(&self, id: StateId) -> Option<&State> {
		self.states.get(id.0)
	}

	/// States in insertion order.
	pub fn states(&self) -> impl Iterator<Item = (StateId, &State)> {
		self.states.iter().enumerate().map(|(i, state)| (StateId(i), state))
	}

	/// Indexes a state known to belong to this chain.
	pub(crate) fn state_at(&self, id: StateId) -> &State {
		&self.states[id.0]
	}

	/// Text of the state behind `id`.
	///
	/// # Panics
	/// Panics if `id` does not belong to this chain.
	pub fn text(&self, id: StateId) -> &str {
		self.states[id.0].text()
	}

	/// Releases every state, every transition table and the registry.
	///
	/// The chain is consumed: no operation can follow.
	pub fn teardown(self) {
		let states = self.states.len();
		let transitions: usize = self.states.iter().map(|state| state.transitions().len()).sum();
		drop(self);
		debug!("released {} states and {} transitions", states, transitions);
	}
}
