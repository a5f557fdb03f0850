//! Top-level module for the word chain.
//!
//! - Interned states and their transition tables (`State`)
//! - The owning registry of states (`Chain`)
//! - Random start and weighted successor selection (`sampler`)
//! - The sequence walker (`Generator`)

/// Insertion-ordered registry of unique states.
///
/// Interns words, links consecutive words and releases everything on teardown.
pub mod chain;

/// Single interned word with its weighted transition table.
pub mod state;

/// Uniform start selection and cumulative-weight successor selection.
pub mod sampler;

/// High-level interface walking a chain into token sequences.
pub mod generator;
