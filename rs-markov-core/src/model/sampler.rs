use rand::Rng;

use super::chain::Chain;
use super::state::{State, StateId};

/// Picks a state uniformly at random over the chain's insertion order.
///
/// Terminal states are not filtered out; that is the caller's job.
/// Returns `None` if the chain has no states.
pub fn uniform_start<R: Rng>(chain: &Chain, rng: &mut R) -> Option<StateId> {
	if chain.is_empty() {
		return None;
	}
	let index = rng.random_range(0..chain.len());
	chain.states().nth(index).map(|(id, _)| id)
}

/// Picks the next state using weighted random sampling.
///
/// The probability of selecting a successor is proportional to its
/// frequency. A single draw `r` in `[0, total)` is walked through the
/// table by cumulative subtraction: the first transition whose frequency
/// exceeds what is left of `r` is selected.
///
/// Returns `None` if the state has no transitions.
pub fn weighted_next<R: Rng>(state: &State, rng: &mut R) -> Option<StateId> {
	let total = state.total_frequency();
	if total == 0 {
		return None;
	}

	let mut r = rng.random_range(0..total);
	for transition in state.transitions() {
		if r < transition.frequency {
			return Some(transition.successor);
		}
		r -= transition.frequency;
	}

	// Unreachable while frequencies sum to `total`.
	state.transitions().last().map(|transition| transition.successor)
}
