//! Reconciles two consecutive observations into full 48-bit states.
//!
//! The first observation fixes the top bits of a state `c`; its low
//! `u = 48 - known_bits` bits are open. Every completion is advanced once and
//! kept when the result shows the second observation's top bits.

use std::thread;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{SearchConfig, SearchStrategy};
use crate::lcg::{self, MULTIPLIER, STATE_BITS};
use crate::observation::Observation;

/// States consistent with both observations, taken *after* the second one.
/// Ambiguous lists are in ascending order of the first state.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "states", rename_all = "snake_case")]
pub enum SearchOutcome {
    Empty,
    Unique(u64),
    Ambiguous(Vec<u64>),
}

impl From<Vec<u64>> for SearchOutcome {
    fn from(mut states: Vec<u64>) -> Self {
        match states.len() {
            0 => SearchOutcome::Empty,
            1 => SearchOutcome::Unique(states.remove(0)),
            _ => SearchOutcome::Ambiguous(states),
        }
    }
}

impl SearchOutcome {
    pub fn states(&self) -> &[u64] {
        match self {
            SearchOutcome::Empty => &[],
            SearchOutcome::Unique(s) => std::slice::from_ref(s),
            SearchOutcome::Ambiguous(states) => states,
        }
    }
}

pub fn search(first: Observation, second: Observation, cfg: &SearchConfig) -> SearchOutcome {
    let states = match cfg.strategy {
        SearchStrategy::WrapCount if window_narrower_than_multiplier(second) => {
            wrap_count(first, second)
        }
        _ => brute_force(first, second, cfg.workers),
    };
    debug!(
        first = first.value,
        second = second.value,
        unknown_bits = first.unknown_bits(),
        strategy = ?cfg.strategy,
        candidates = states.len(),
        "search finished"
    );
    SearchOutcome::from(states)
}

/// Wrap counting finds at most one hit per wrap, which only holds while the
/// second observation's window is narrower than the multiplier.
fn window_narrower_than_multiplier(second: Observation) -> bool {
    (1u64 << second.unknown_bits()) < MULTIPLIER
}

fn first_range(first: Observation) -> (u64, u64) {
    let u = first.unknown_bits();
    let start = (first.value as u64) << u;
    (start, start + (1u64 << u))
}

fn scan(from: u64, to: u64, second: Observation) -> Vec<u64> {
    (from..to)
        .map(lcg::advance)
        .filter(|&next| second.matches(next))
        .collect()
}

/// Splits the range into contiguous slices, one per worker, and concatenates
/// the results in slice order so the output equals a sequential scan.
fn brute_force(first: Observation, second: Observation, workers: usize) -> Vec<u64> {
    let (start, end) = first_range(first);
    let workers = workers.max(1) as u64;
    if workers == 1 {
        return scan(start, end, second);
    }

    let chunk = (end - start).div_ceil(workers);
    thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|i| start + i * chunk)
            .take_while(|&from| from < end)
            .map(|from| {
                let to = (from + chunk).min(end);
                s.spawn(move || scan(from, to, second))
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
            .collect()
    })
}

/// Writing the candidate as `base + x`, its successor is
/// `(K + x·M) mod 2^48` with `K = advance(base)`. For each wrap count `k` the
/// successor lands in the target window `[lo, hi)` only for
/// `x = ceil((lo + k·2^48 - K) / M)`, since the window is narrower than `M`.
fn wrap_count(first: Observation, second: Observation) -> Vec<u64> {
    let span = 1i128 << first.unknown_bits();
    let base = (first.value as u64) << first.unknown_bits();
    let k0 = lcg::advance(base) as i128;
    let lo = (second.value as i128) << second.unknown_bits();
    let hi = lo + (1i128 << second.unknown_bits());
    let m = MULTIPLIER as i128;

    let max_wrap = (k0 + (span - 1) * m) >> STATE_BITS;
    let mut states = Vec::new();
    for k in 0..=max_wrap {
        let wrapped = k << STATE_BITS;
        let need = lo + wrapped - k0;
        let x = if need <= 0 { 0 } else { (need + m - 1) / m };
        if x >= span {
            break;
        }
        let next = k0 + x * m - wrapped;
        if next < hi {
            states.push(next as u64);
        }
    }
    states
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::{self, Observation};
    use crate::random::JavaRandom;

    fn brute() -> SearchConfig {
        SearchConfig::sequential()
    }

    fn wrap() -> SearchConfig {
        SearchConfig::sequential().with_strategy(SearchStrategy::WrapCount)
    }

    #[test]
    fn recovers_state_after_two_ints() {
        let mut r = JavaRandom::new(42);
        let d = observation::two_ints(r.next_int(), r.next_int());
        let outcome = search(d.observations[0], d.observations[1], &brute());
        assert_eq!(outcome, SearchOutcome::Unique(r.state()));
    }

    #[test]
    fn strategies_agree_on_int_pairs() {
        for seed in 0..40u64 {
            let mut r = JavaRandom::new(seed.wrapping_mul(0x9E37_79B9));
            let d = observation::two_ints(r.next_int(), r.next_int());
            let (a, b) = (d.observations[0], d.observations[1]);
            let expected = search(a, b, &brute());
            assert_eq!(search(a, b, &wrap()), expected, "seed {seed}");
            assert!(expected.states().contains(&r.state()));
        }
    }

    #[test]
    fn strategies_agree_on_unrelated_values() {
        let pairs = [(0u32, 12_345u32), (0xDEAD_BEEF, 0x0BAD_F00D), (u32::MAX, 0)];
        for (v1, v2) in pairs {
            let (a, b) = (Observation::new(v1, 32), Observation::new(v2, 32));
            assert_eq!(search(a, b, &wrap()), search(a, b, &brute()));
        }
    }

    #[test]
    fn strategies_agree_on_a_double() {
        let mut r = JavaRandom::new(2024);
        let d = observation::double(r.next_double()).unwrap();
        let (a, b) = (d.observations[0], d.observations[1]);
        let par = SearchConfig::sequential().with_workers(4);
        let expected = search(a, b, &par);
        assert_eq!(search(a, b, &wrap()), expected);
        assert!(expected.states().contains(&r.state()));
    }

    #[test]
    fn ambiguous_floats_keep_ascending_order_across_workers() {
        // Seed 0 yields two candidates for its first two floats.
        let mut r = JavaRandom::new(0);
        let d = observation::two_floats(r.next_float(), r.next_float()).unwrap();
        let (a, b) = (d.observations[0], d.observations[1]);

        let fast = search(a, b, &wrap());
        let SearchOutcome::Ambiguous(states) = &fast else {
            panic!("expected ambiguity, got {fast:?}");
        };
        assert_eq!(states.len(), 2);
        assert!(states.contains(&r.state()));

        let parallel = search(a, b, &SearchConfig::sequential().with_workers(8));
        assert_eq!(parallel, fast);
    }

    #[test]
    fn wide_second_window_falls_back_to_brute_force() {
        // Full first int, then only the top 8 bits of the next one: the
        // window spans 2^40 states, wider than the multiplier.
        let mut r = JavaRandom::new(7);
        let a = Observation::new(r.next_int() as u32, 32);
        let b = Observation::new(r.next(8) as u32, 8);
        assert!(!window_narrower_than_multiplier(b));

        let expected = search(a, b, &brute());
        assert!(expected.states().len() > 100);
        assert!(expected.states().contains(&r.state()));
        assert_eq!(search(a, b, &wrap()), expected);
    }

    #[test]
    fn outcome_from_state_lists() {
        assert_eq!(SearchOutcome::from(vec![]), SearchOutcome::Empty);
        assert_eq!(SearchOutcome::from(vec![7]), SearchOutcome::Unique(7));
        assert_eq!(SearchOutcome::from(vec![1, 2]).states(), &[1, 2]);
    }
}
