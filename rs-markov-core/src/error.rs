use std::collections::TryReserveError;

use thiserror::Error;

/// Errors raised while building or walking a [`Chain`](crate::model::chain::Chain).
///
/// Only `Allocation` can happen during ingestion. The other variants are
/// generation-time conditions on the shape of the chain or on the request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
	/// Memory for a new state, its text, or a transition slot could not be reserved.
	#[error("allocation failure: {0}")]
	Allocation(#[from] TryReserveError),

	/// Every state of the chain is terminal, so no sequence can be started.
	#[error("no valid start state: all {states} states are terminal")]
	NoValidStartState { states: usize },

	/// Generation was requested on a chain without any state.
	#[error("the chain is empty")]
	EmptyChain,

	/// A sequence must be allowed at least one token.
	#[error("max length must be >= 1, got {0}")]
	InvalidLength(usize),
}
