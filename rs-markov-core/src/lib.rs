//! First-order word chain text generation library.
//!
//! This crate provides a weighted Markov chain over words, including:
//! - Word interning and transition counting (`Chain`)
//! - Uniform and frequency-weighted sampling
//! - Sequence generation with terminal-word detection and a length cap
//! - A whitespace tokenizer for plain text corpora
//!
//! The random source is always injected, so a seed fully determines the
//! generated sequences.

/// Chain construction, sampling and generation.
pub mod model;

/// Error type shared by the chain and the generator.
pub mod error;

/// Text file reading and word tokenization.
pub mod corpus;

pub use error::ChainError;
pub use model::chain::Chain;
pub use model::generator::{Generator, Sequence, Stop};
pub use model::state::{State, StateId, Transition};
