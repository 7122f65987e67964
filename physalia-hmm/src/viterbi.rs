//! Log-domain Viterbi decoding.
//!
//! One dynamic program serves both model orders: the DP state is a context
//! of the last `k` hidden states encoded as an integer in `[0, n^k)`. For
//! `k = 1` this is the textbook recursion; for `k = 2` the tables simply
//! grow to `n^2` columns and the predecessor links store encoded pairs.
//!
//! All probability products are log-domain sums. `ln(0)` is negative
//! infinity, which eliminates impossible paths outright; when every
//! candidate at a step is impossible the lowest index wins, so decoding
//! still terminates with a full-length (if arbitrary) path.

use std::fmt::Debug;
use std::hash::Hash;

use physalia_core::{PhysaliaError, Result};

use crate::model::Hmm;

/// The `d`-th state (0-based, oldest first) of the context encoded as `ctx`.
#[inline]
fn context_state(ctx: usize, n: usize, k: usize, d: usize) -> usize {
    (ctx / n.pow((k - 1 - d) as u32)) % n
}

impl<S, Y> Hmm<S, Y>
where
    S: Eq + Hash + Clone + Debug,
    Y: Eq + Hash + Clone,
{
    /// Decode the most probable hidden-state sequence for `symbols`.
    ///
    /// The result has the same length as the input. Decoding is pure: the
    /// model is not mutated, scratch tables are private to the call, and
    /// repeated calls return identical paths (ties always resolve to the
    /// lowest state index).
    ///
    /// Symbols never observed during training are not an error; they emit
    /// with probability 0.0 from every state and simply eliminate paths.
    ///
    /// # Errors
    ///
    /// `InsufficientSequenceLength` if `symbols` is shorter than the model
    /// order's minimum (1 for first order, 2 for second).
    pub fn viterbi(&self, symbols: &[Y]) -> Result<Vec<S>> {
        let k = self.order.context_len();
        if symbols.len() < k {
            return Err(PhysaliaError::InsufficientSequenceLength {
                required: k,
                actual: symbols.len(),
            });
        }

        let n = self.n_states();
        let n_ctx = n.pow(k as u32);
        let stride = n.pow(k as u32 - 1);
        let len = symbols.len();

        // gamma[t][c]: log-prob of the best path ending in context c at t.
        // phi[t][c]: the predecessor context that achieved it.
        let mut gamma = vec![vec![f64::NEG_INFINITY; n_ctx]; len];
        let mut phi = vec![vec![0usize; n_ctx]; len];

        // Initialization at t = k-1: the prior of the opening context joined
        // with the emissions of the first k symbols.
        for ctx in 0..n_ctx {
            let mut score = self.prior.get(ctx / n, ctx % n).ln();
            for (d, symbol) in symbols.iter().take(k).enumerate() {
                let state = context_state(ctx, n, k, d);
                score += self.states[state].emit_prob(symbol).ln();
            }
            gamma[k - 1][ctx] = score;
        }

        // Recursion. The predecessors of `target` are exactly the contexts
        // whose last k-1 states equal target's first k-1 states.
        for t in k..len {
            for target in 0..n_ctx {
                let suffix = target / n;
                let to = target % n;
                let mut best_val = f64::NEG_INFINITY;
                let mut best_src = suffix; // the i = 0 predecessor; wins all-impossible ties
                for i in 0..n {
                    let src = i * stride + suffix;
                    let v = gamma[t - 1][src] + self.transition.get(src, to).ln();
                    if v > best_val {
                        best_val = v;
                        best_src = src;
                    }
                }
                gamma[t][target] = best_val + self.states[to].emit_prob(&symbols[t]).ln();
                phi[t][target] = best_src;
            }
        }

        // Termination: first-index argmax over the final row.
        let mut best_ctx = 0usize;
        let mut best_score = f64::NEG_INFINITY;
        for (ctx, &score) in gamma[len - 1].iter().enumerate() {
            if score > best_score {
                best_score = score;
                best_ctx = ctx;
            }
        }

        // Backtrack down to the opening context.
        let mut path_ctx = vec![0usize; len];
        path_ctx[len - 1] = best_ctx;
        for t in (k..len).rev() {
            path_ctx[t - 1] = phi[t][path_ctx[t]];
        }

        // The opening context carries the first k-1 states of the output;
        // from there on each context contributes its newest state.
        let mut path = Vec::with_capacity(len);
        for d in 0..k - 1 {
            let state = context_state(path_ctx[k - 1], n, k, d);
            path.push(self.states[state].state().clone());
        }
        for &ctx in &path_ctx[k - 1..] {
            path.push(self.states[ctx % n].state().clone());
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LabeledSequence;

    fn seq(states: &str, symbols: &str) -> LabeledSequence<char, char> {
        LabeledSequence::new(states.chars().collect(), symbols.chars().collect()).unwrap()
    }

    /// The concrete scenario model: one instance [A,B,B] emitting [x,y,y].
    fn scenario_model() -> Hmm<char, char> {
        Hmm::first_order(&['A', 'B'], &[seq("ABB", "xyy")]).unwrap()
    }

    // -----------------------------------------------------------------------
    // First order
    // -----------------------------------------------------------------------

    #[test]
    fn first_order_concrete_decode() {
        let model = scenario_model();
        let path = model.viterbi(&['x', 'y']).unwrap();
        assert_eq!(path, vec!['A', 'B']);
    }

    #[test]
    fn path_length_equals_input_length() {
        let corpus = vec![seq("AAAA", "xxxx"), seq("BBBB", "yyyy"), seq("AABB", "xxyy")];
        let model = Hmm::first_order(&['A', 'B'], &corpus).unwrap();
        for len in 1..=8 {
            let symbols: Vec<char> = (0..len).map(|i| if i % 2 == 0 { 'x' } else { 'y' }).collect();
            let path = model.viterbi(&symbols).unwrap();
            assert_eq!(path.len(), len);
        }
    }

    #[test]
    fn deterministic_emissions_recover_training_path() {
        let corpus = vec![seq("AAAA", "xxxx"), seq("BBBB", "yyyy"), seq("AABB", "xxyy")];
        let model = Hmm::first_order(&['A', 'B'], &corpus).unwrap();
        let path = model.viterbi(&"xxyy".chars().collect::<Vec<_>>()).unwrap();
        assert_eq!(path, "AABB".chars().collect::<Vec<_>>());
    }

    #[test]
    fn decode_is_idempotent() {
        let corpus = vec![seq("ABAB", "xyxy"), seq("BABA", "yxyx"), seq("AABB", "xyxy")];
        let model = Hmm::first_order(&['A', 'B'], &corpus).unwrap();
        let symbols: Vec<char> = "xyxxyy".chars().collect();
        let first = model.viterbi(&symbols).unwrap();
        for _ in 0..5 {
            assert_eq!(model.viterbi(&symbols).unwrap(), first);
        }
    }

    #[test]
    fn decode_length_one_uses_prior_only() {
        let model = scenario_model();
        assert_eq!(model.viterbi(&['x']).unwrap(), vec!['A']);
        // 'y' is impossible from A (the only state with prior mass), and B
        // has zero prior: every candidate is -inf, so index 0 wins.
        assert_eq!(model.viterbi(&['y']).unwrap(), vec!['A']);
    }

    #[test]
    fn decode_too_short_rejected() {
        let model = scenario_model();
        let err = model.viterbi(&[]).unwrap_err();
        assert!(matches!(
            err,
            PhysaliaError::InsufficientSequenceLength {
                required: 1,
                actual: 0
            }
        ));
    }

    #[test]
    fn unseen_symbol_still_yields_full_path() {
        let model = scenario_model();
        // 'q' was never observed: every path through t=1 is impossible and
        // the tie-break alone picks the answer, deterministically.
        let path = model.viterbi(&['x', 'q']).unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path, vec!['A', 'A']);
        assert_eq!(model.viterbi(&['x', 'q']).unwrap(), path);
    }

    #[test]
    fn impossible_transition_eliminates_path() {
        // Training never shows B -> A, so decoding x after y must not
        // route back through that transition.
        let corpus = vec![seq("ABB", "xyy"), seq("AB", "xy")];
        let model = Hmm::first_order(&['A', 'B'], &corpus).unwrap();
        let path = model.viterbi(&"xyy".chars().collect::<Vec<_>>()).unwrap();
        assert_eq!(path, "ABB".chars().collect::<Vec<_>>());
    }

    // -----------------------------------------------------------------------
    // Second order
    // -----------------------------------------------------------------------

    #[test]
    fn second_order_concrete_decode() {
        let model = Hmm::second_order(&['A', 'B'], &[seq("ABAB", "xyxy")]).unwrap();
        let path = model.viterbi(&"xyxy".chars().collect::<Vec<_>>()).unwrap();
        assert_eq!(path, "ABAB".chars().collect::<Vec<_>>());
    }

    #[test]
    fn second_order_recovers_first_position_from_opening_pair() {
        // Only the opening pair determines position 0; make it unambiguous.
        let corpus = vec![seq("BAA", "yxx"), seq("BAB", "yxy")];
        let model = Hmm::second_order(&['A', 'B'], &corpus).unwrap();
        let path = model.viterbi(&"yxx".chars().collect::<Vec<_>>()).unwrap();
        assert_eq!(path, "BAA".chars().collect::<Vec<_>>());
    }

    #[test]
    fn second_order_path_length_equals_input_length() {
        let corpus = vec![seq("ABAB", "xyxy"), seq("BABA", "yxyx")];
        let model = Hmm::second_order(&['A', 'B'], &corpus).unwrap();
        for len in 2..=7 {
            let symbols: Vec<char> = (0..len).map(|i| if i % 2 == 0 { 'x' } else { 'y' }).collect();
            assert_eq!(model.viterbi(&symbols).unwrap().len(), len);
        }
    }

    #[test]
    fn second_order_decode_length_two_uses_prior_only() {
        let model = Hmm::second_order(&['A', 'B'], &[seq("BA", "yx")]).unwrap();
        let path = model.viterbi(&['y', 'x']).unwrap();
        assert_eq!(path, vec!['B', 'A']);
    }

    #[test]
    fn second_order_too_short_rejected() {
        let model = Hmm::second_order(&['A', 'B'], &[seq("AB", "xy")]).unwrap();
        let err = model.viterbi(&['x']).unwrap_err();
        assert!(matches!(
            err,
            PhysaliaError::InsufficientSequenceLength {
                required: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn second_order_three_states() {
        // A deterministic cycle over three states exercises the pair
        // encoding with n > 2.
        let corpus = vec![seq("ABCABC", "uvwuvw"), seq("BCABCA", "vwuvwu")];
        let model = Hmm::second_order(&['A', 'B', 'C'], &corpus).unwrap();
        let path = model.viterbi(&"uvwuv".chars().collect::<Vec<_>>()).unwrap();
        assert_eq!(path, "ABCAB".chars().collect::<Vec<_>>());
    }

    // -----------------------------------------------------------------------
    // Context encoding helpers
    // -----------------------------------------------------------------------

    #[test]
    fn context_state_decomposes_pairs() {
        // ctx = 1*3 + 2 encodes (1, 2) with n = 3
        assert_eq!(context_state(5, 3, 2, 0), 1);
        assert_eq!(context_state(5, 3, 2, 1), 2);
        // k = 1: the context is the state itself
        assert_eq!(context_state(2, 3, 1, 0), 2);
    }
}
