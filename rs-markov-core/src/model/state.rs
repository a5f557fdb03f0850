use crate::error::ChainError;

/// Last character marking a word as the end of a sentence.
pub const TERMINAL_MARKER: char = '.';

/// Handle to a state interned in a [`Chain`](super::chain::Chain).
///
/// A `StateId` is the position of the state in the chain's insertion order.
/// It is only meaningful for the chain that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub(crate) usize);

impl StateId {
	/// Position of the state in the chain's insertion order.
	pub fn index(self) -> usize {
		self.0
	}
}

/// Weighted edge toward a successor state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
	/// Non-owning reference into the same chain.
	pub successor: StateId,
	/// How many times `successor` followed the owning state. Always >= 1.
	pub frequency: u64,
}

/// Represents a state of the word chain.
///
/// A `State` owns one interned word (`text`) and the table of all observed
/// transitions from this word to the next one.
///
/// ## Invariants
/// - `text` never changes after creation
/// - No two transitions share the same successor
/// - Transitions are kept in order of first observation
/// - A terminal state never records a transition
#[derive(Clone, Debug)]
pub struct State {
	text: Box<str>,
	transitions: Vec<Transition>,
}

impl State {
	/// Creates a new state without transitions, copying `word` fallibly.
	pub(crate) fn new(word: &str) -> Result<Self, ChainError> {
		let mut text = String::new();
		text.try_reserve_exact(word.len())?;
		text.push_str(word);
		Ok(Self { text: text.into_boxed_str(), transitions: Vec::new() })
	}

	/// The interned word.
	pub fn text(&self) -> &str {
		&self.text
	}

	/// Outgoing transitions, in order of first observation.
	pub fn transitions(&self) -> &[Transition] {
		&self.transitions
	}

	/// Whether the word ends a sentence.
	pub fn is_terminal(&self) -> bool {
		is_terminal_word(&self.text)
	}

	/// A non-terminal state that was never followed by anything.
	///
	/// Typically the last word of the ingested text.
	pub fn is_dead_end(&self) -> bool {
		!self.is_terminal() && self.transitions.is_empty()
	}

	/// Sum of all transition frequencies.
	pub fn total_frequency(&self) -> u64 {
		self.transitions.iter().map(|transition| transition.frequency).sum()
	}

	/// Frequency of the transition toward `successor`, 0 if never observed.
	pub fn frequency_of(&self, successor: StateId) -> u64 {
		self.transitions
			.iter()
			.find(|transition| transition.successor == successor)
			.map_or(0, |transition| transition.frequency)
	}

	/// Records an occurrence of a transition toward `successor`.
	///
	/// - Terminal states absorb: nothing is recorded and no memory is touched.
	/// - If the transition already exists, its frequency is increased.
	/// - Otherwise, a new transition is appended with a frequency of 1.
	///
	/// # Errors
	/// Returns `ChainError::Allocation` if the table cannot grow. The table is
	/// left unchanged in that case.
	pub(crate) fn record(&mut self, successor: StateId) -> Result<(), ChainError> {
		if self.is_terminal() {
			return Ok(());
		}

		if let Some(transition) = self
			.transitions
			.iter_mut()
			.find(|transition| transition.successor == successor)
		{
			transition.frequency += 1;
			return Ok(());
		}

		self.transitions.try_reserve(1)?;
		self.transitions.push(Transition { successor, frequency: 1 });
		Ok(())
	}
}

/// Syntactic sentence-end check: the last character is [`TERMINAL_MARKER`].
pub fn is_terminal_word(word: &str) -> bool {
	word.ends_with(TERMINAL_MARKER)
}
