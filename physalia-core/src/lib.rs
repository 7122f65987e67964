//! Shared primitives for the Physalia sequence-labeling ecosystem.
//!
//! `physalia-core` provides the foundation the other Physalia crates build on:
//!
//! - **Error types** — [`PhysaliaError`] and [`Result`] for structured error handling
//! - **Counting** — [`CountMap`] for frequency tallies over hashable keys
//! - **Matrices** — [`Matrix`] dense row-major `f64` tables with row normalization

pub mod counter;
pub mod error;
pub mod matrix;

pub use counter::CountMap;
pub use error::{PhysaliaError, Result};
pub use matrix::{l1_normalize, Matrix};
