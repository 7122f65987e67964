//! Trained hidden Markov models and supervised parameter estimation.
//!
//! A model is built exactly once from a labeled corpus and is immutable
//! afterwards; estimation runs in the order prior → emissions → transitions,
//! all through the dense state index map assigned from the caller's roster
//! order.
//!
//! Both supported orders share one estimation path: a decoding context of
//! `k` previous states (`k` = 1 or 2) is encoded as a single integer in
//! `[0, n^k)`, so the order-2 tables are ordinary matrices with `n^2` rows.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use physalia_core::{CountMap, Matrix, PhysaliaError, Result};

use crate::state::StateEmission;

/// Markov order of a model: how many previous states the next state
/// depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelOrder {
    /// Next state depends on the single previous state.
    First,
    /// Next state depends on the previous two states.
    Second,
}

impl ModelOrder {
    /// Number of states in one decoding context (1 or 2). This is also the
    /// minimum length of any training or decoding sequence for the order.
    pub fn context_len(self) -> usize {
        match self {
            ModelOrder::First => 1,
            ModelOrder::Second => 2,
        }
    }
}

/// One training instance: a state sequence and the symbol sequence it
/// emitted, position by position.
#[derive(Debug, Clone)]
pub struct LabeledSequence<S, Y> {
    states: Vec<S>,
    symbols: Vec<Y>,
}

impl<S, Y> LabeledSequence<S, Y> {
    /// Pair a state sequence with its emitted symbols.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the two sequences differ in length.
    pub fn new(states: Vec<S>, symbols: Vec<Y>) -> Result<Self> {
        if states.len() != symbols.len() {
            return Err(PhysaliaError::InvalidInput(format!(
                "state sequence length {} != symbol sequence length {}",
                states.len(),
                symbols.len()
            )));
        }
        Ok(Self { states, symbols })
    }

    /// Length of the instance (states and symbols alike).
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether the instance is empty.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The state sequence.
    pub fn states(&self) -> &[S] {
        &self.states
    }

    /// The emitted symbol sequence.
    pub fn symbols(&self) -> &[Y] {
        &self.symbols
    }
}

/// Encode a window of state indices as one integer in `[0, n^len)`.
///
/// An empty window encodes to 0; `[i, j]` encodes to `i * n + j`.
#[inline]
pub(crate) fn encode_context(window: &[usize], n: usize) -> usize {
    window.iter().fold(0, |acc, &i| acc * n + i)
}

/// A trained discrete hidden Markov model.
///
/// Owns the state index map, the ordered state roster with one emission
/// table per state, the prior, and the transition table. Immutable after
/// construction; decoding allocates its own scratch, so a model can be
/// shared across threads and queried concurrently.
#[derive(Debug, Clone)]
pub struct Hmm<S, Y> {
    pub(crate) order: ModelOrder,
    pub(crate) state_index: HashMap<S, usize>,
    /// Roster in index order; `states[i].state()` is the state with index `i`.
    pub(crate) states: Vec<StateEmission<S, Y>>,
    /// `n^(k-1) × n`, rows normalized. For a first-order model this is the
    /// single-row prior vector; for second order, row = first state of an
    /// instance, column = second.
    pub(crate) prior: Matrix,
    /// `n^k × n`, rows normalized. Row = encoded context, column = next state.
    pub(crate) transition: Matrix,
}

impl<S, Y> Hmm<S, Y>
where
    S: Eq + Hash + Clone + Debug,
    Y: Eq + Hash + Clone,
{
    /// Train a first-order model: the next state depends on one previous
    /// state. Every training instance must have length ≥ 1.
    ///
    /// `states` is the full state roster in the order indices are assigned;
    /// supplying it as an ordered slice keeps the index map (and therefore
    /// decoding) reproducible across runs.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` — empty roster or duplicate roster entries
    /// - `InsufficientSequenceLength` — an instance shorter than 1
    /// - `UnknownState` — an instance mentions a state not in the roster
    pub fn first_order(states: &[S], corpus: &[LabeledSequence<S, Y>]) -> Result<Self> {
        Self::train(ModelOrder::First, states, corpus)
    }

    /// Train a second-order model: the next state depends on the previous
    /// two states. Every training instance must have length ≥ 2.
    ///
    /// # Errors
    ///
    /// Same as [`first_order`](Self::first_order), with minimum length 2.
    pub fn second_order(states: &[S], corpus: &[LabeledSequence<S, Y>]) -> Result<Self> {
        Self::train(ModelOrder::Second, states, corpus)
    }

    fn train(order: ModelOrder, roster: &[S], corpus: &[LabeledSequence<S, Y>]) -> Result<Self> {
        if roster.is_empty() {
            return Err(PhysaliaError::InvalidInput("state roster is empty".into()));
        }

        let mut state_index = HashMap::with_capacity(roster.len());
        for (i, state) in roster.iter().enumerate() {
            if state_index.insert(state.clone(), i).is_some() {
                return Err(PhysaliaError::InvalidInput(format!(
                    "duplicate state in roster: {state:?}"
                )));
            }
        }

        let n = roster.len();
        let k = order.context_len();

        // Reject structural problems before any counting, and map every
        // instance onto dense indices once.
        let mut index_seqs = Vec::with_capacity(corpus.len());
        for seq in corpus {
            if seq.len() < k {
                return Err(PhysaliaError::InsufficientSequenceLength {
                    required: k,
                    actual: seq.len(),
                });
            }
            let indices = seq
                .states()
                .iter()
                .map(|s| {
                    state_index
                        .get(s)
                        .copied()
                        .ok_or_else(|| PhysaliaError::UnknownState(format!("{s:?}")))
                })
                .collect::<Result<Vec<usize>>>()?;
            index_seqs.push(indices);
        }

        let prior = estimate_prior(k, n, &index_seqs);

        let states = roster
            .iter()
            .map(|state| StateEmission::new(state.clone(), emission_table(state, corpus)))
            .collect();

        let transition = estimate_transitions(k, n, &index_seqs);

        Ok(Self {
            order,
            state_index,
            states,
            prior,
            transition,
        })
    }

    /// The model order.
    pub fn order(&self) -> ModelOrder {
        self.order
    }

    /// Number of hidden states.
    pub fn n_states(&self) -> usize {
        self.states.len()
    }

    /// The state roster in index order, each paired with its emission table.
    pub fn states(&self) -> &[StateEmission<S, Y>] {
        &self.states
    }

    /// Dense index of `state`.
    ///
    /// # Errors
    ///
    /// `UnknownState` if the state is not in the roster.
    pub fn state_index(&self, state: &S) -> Result<usize> {
        self.state_index
            .get(state)
            .copied()
            .ok_or_else(|| PhysaliaError::UnknownState(format!("{state:?}")))
    }

    /// Emission probability of `symbol` from `state`; 0.0 for a symbol the
    /// state was never observed emitting.
    ///
    /// # Errors
    ///
    /// `UnknownState` if the state is not in the roster.
    pub fn emission_prob(&self, state: &S, symbol: &Y) -> Result<f64> {
        let i = self.state_index(state)?;
        Ok(self.states[i].emit_prob(symbol))
    }

    /// The prior table: `n^(k-1) × n`, rows normalized.
    pub fn prior(&self) -> &Matrix {
        &self.prior
    }

    /// The transition table: `n^k × n`, row = encoded context, rows
    /// normalized. A context never observed has an all-zero row.
    pub fn transition(&self) -> &Matrix {
        &self.transition
    }
}

/// Count sequence-initial contexts and row-normalize.
fn estimate_prior(k: usize, n: usize, index_seqs: &[Vec<usize>]) -> Matrix {
    let mut prior = Matrix::zeros(n.pow(k as u32 - 1), n);
    for seq in index_seqs {
        let row = encode_context(&seq[..k - 1], n);
        prior.add(row, seq[k - 1], 1.0);
    }
    prior.normalize_rows();
    prior
}

/// Count context → next-state transitions over every window of k+1
/// consecutive positions and row-normalize. Instances shorter than k+1
/// contribute nothing; a context never observed keeps an all-zero row.
fn estimate_transitions(k: usize, n: usize, index_seqs: &[Vec<usize>]) -> Matrix {
    let mut transition = Matrix::zeros(n.pow(k as u32), n);
    for seq in index_seqs {
        for window in seq.windows(k + 1) {
            transition.add(encode_context(&window[..k], n), window[k], 1.0);
        }
    }
    transition.normalize_rows();
    transition
}

/// Tally the symbols co-occurring with `state` across the corpus and divide
/// by the state's total count. A state never seen in the corpus yields an
/// empty table.
fn emission_table<S, Y>(state: &S, corpus: &[LabeledSequence<S, Y>]) -> HashMap<Y, f64>
where
    S: Eq,
    Y: Eq + Hash + Clone,
{
    let mut counts: CountMap<Y> = CountMap::new();
    for seq in corpus {
        for (current, symbol) in seq.states().iter().zip(seq.symbols()) {
            if current == state {
                counts.increment(symbol.clone());
            }
        }
    }
    let total = counts.total() as f64;
    counts
        .iter()
        .map(|(symbol, count)| (symbol.clone(), count as f64 / total))
        .collect()
}
