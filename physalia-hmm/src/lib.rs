//! Supervised discrete hidden Markov models for the Physalia ecosystem.
//!
//! Estimates HMM parameters (prior, transition, and emission probabilities)
//! from fully labeled training sequences and decodes the most probable
//! hidden-state path for new symbol sequences with the Viterbi algorithm.
//! First-order (one previous state) and second-order (two previous states)
//! models share a single context-encoded implementation.
//!
//! States and symbols are arbitrary hashable types; all tables run on dense
//! integer indices internally, and all decoding arithmetic is log-domain to
//! avoid underflow on long sequences.
//!
//! # Quick start
//!
//! ```
//! use physalia_hmm::{Hmm, LabeledSequence};
//!
//! // Two states, one labeled instance: [A, B, B] emitting [x, y, y].
//! let corpus = vec![LabeledSequence::new(
//!     vec!['A', 'B', 'B'],
//!     vec!['x', 'y', 'y'],
//! )?];
//! let model = Hmm::first_order(&['A', 'B'], &corpus)?;
//!
//! let path = model.viterbi(&['x', 'y'])?;
//! assert_eq!(path, vec!['A', 'B']);
//! # Ok::<(), physalia_core::PhysaliaError>(())
//! ```

pub mod model;
pub mod state;
pub mod viterbi;

pub use model::{Hmm, LabeledSequence, ModelOrder};
pub use state::StateEmission;
