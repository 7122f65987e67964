//! Per-state emission tables.

use std::collections::HashMap;
use std::hash::Hash;

/// One hidden state paired with its emission distribution.
///
/// The table only holds symbols that were actually observed with the state
/// during training; looking up any other symbol yields probability 0.0.
#[derive(Debug, Clone)]
pub struct StateEmission<S, Y> {
    state: S,
    emissions: HashMap<Y, f64>,
}

impl<S, Y: Eq + Hash> StateEmission<S, Y> {
    /// Pair a state with its emission probability table.
    pub fn new(state: S, emissions: HashMap<Y, f64>) -> Self {
        Self { state, emissions }
    }

    /// The state value.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Emission probability of `symbol`, or 0.0 if the state was never
    /// observed emitting it.
    pub fn emit_prob(&self, symbol: &Y) -> f64 {
        self.emissions.get(symbol).copied().unwrap_or(0.0)
    }

    /// Number of distinct symbols observed with this state.
    pub fn n_symbols(&self) -> usize {
        self.emissions.len()
    }

    /// Iterate over `(symbol, probability)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&Y, f64)> {
        self.emissions.iter().map(|(y, &p)| (y, p))
    }
}
