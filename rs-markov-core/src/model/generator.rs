use std::fmt;

use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::chain::Chain;
use super::sampler::{uniform_start, weighted_next};
use super::state::StateId;
use crate::error::ChainError;

/// Why a sequence stopped growing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stop {
	/// The last token ends a sentence.
	Terminal,
	/// The sequence reached `max_length` tokens.
	Capped,
	/// The last token is non-terminal but was never followed by anything.
	DeadEnd,
}

/// One generated sequence of tokens, borrowed from the chain.
///
/// Displays as its tokens joined by single spaces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sequence<'c> {
	tokens: Vec<&'c str>,
	stop: Stop,
}

impl<'c> Sequence<'c> {
	pub fn tokens(&self) -> &[&'c str] {
		&self.tokens
	}

	pub fn stop(&self) -> Stop {
		self.stop
	}

	pub fn len(&self) -> usize {
		self.tokens.len()
	}

	/// Never true for a generated sequence: the start token is always emitted.
	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}
}

impl fmt::Display for Sequence<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut tokens = self.tokens.iter();
		if let Some(first) = tokens.next() {
			f.write_str(first)?;
		}
		for token in tokens {
			write!(f, " {token}")?;
		}
		Ok(())
	}
}

/// Walks a [`Chain`] to produce word sequences.
///
/// # Responsibilities
/// - Own the random source (seeded once, never reseeded)
/// - Choose a non-terminal start state when none is given
/// - Follow weighted transitions until a terminal state, a dead end or
///   `max_length` tokens
#[derive(Debug)]
pub struct Generator<R = StdRng> {
	rng: R,
}

impl Generator<StdRng> {
	/// Creates a reproducible generator: the same seed on the same chain
	/// always yields the same sequences.
	pub fn seeded(seed: u64) -> Self {
		Self::new(StdRng::seed_from_u64(seed))
	}
}

impl<R: Rng> Generator<R> {
	/// Creates a generator around an injected random source.
	pub fn new(rng: R) -> Self {
		Self { rng }
	}

	/// Draws start states until a non-terminal one comes up.
	///
	/// # Errors
	/// - `ChainError::EmptyChain` if the chain has no state
	/// - `ChainError::NoValidStartState` if every state is terminal; checked
	///   before drawing, so the retry loop always terminates
	fn random_start(&mut self, chain: &Chain) -> Result<StateId, ChainError> {
		if chain.is_empty() {
			return Err(ChainError::EmptyChain);
		}
		if chain.non_terminal_count() == 0 {
			return Err(ChainError::NoValidStartState { states: chain.len() });
		}

		loop {
			// Cannot be `None`: the chain is not empty.
			let Some(id) = uniform_start(chain, &mut self.rng) else {
				return Err(ChainError::EmptyChain);
			};
			if !chain.state_at(id).is_terminal() {
				return Ok(id);
			}
			trace!("start state {:?} is terminal, drawing again", chain.text(id));
		}
	}

	/// Generates one sequence.
	///
	/// If `start` is `None`, a random non-terminal state is chosen. A given
	/// `start` is used as-is, even if terminal (one-token sequence).
	///
	/// # Errors
	/// - `ChainError::InvalidLength` if `max_length` is 0
	/// - `ChainError::EmptyChain` or `ChainError::NoValidStartState` if no
	///   start state can be drawn
	///
	/// # Panics
	/// Panics if `start` does not belong to `chain`.
	pub fn generate<'c>(
		&mut self,
		chain: &'c Chain,
		start: Option<StateId>,
		max_length: usize,
	) -> Result<Sequence<'c>, ChainError> {
		if max_length == 0 {
			return Err(ChainError::InvalidLength(max_length));
		}
		let mut current = match start {
			Some(id) => id,
			None => self.random_start(chain)?,
		};

		let mut tokens = vec![chain.text(current)];
		let stop = loop {
			let state = chain.state_at(current);
			if state.is_terminal() {
				break Stop::Terminal;
			}
			if tokens.len() >= max_length {
				break Stop::Capped;
			}
			match weighted_next(state, &mut self.rng) {
				Some(next) => {
					trace!("{:?} -> {:?}", state.text(), chain.text(next));
					tokens.push(chain.text(next));
					current = next;
				}
				None => break Stop::DeadEnd,
			}
		};

		Ok(Sequence { tokens, stop })
	}

	/// Generates `count` sequences, each from a random start state.
	pub fn generate_many<'c>(
		&mut self,
		chain: &'c Chain,
		count: usize,
		max_length: usize,
	) -> Result<Vec<Sequence<'c>>, ChainError> {
		(0..count).map(|_| self.generate(chain, None, max_length)).collect()
	}
}
