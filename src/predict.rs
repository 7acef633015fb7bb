use tracing::{debug, warn};

use crate::config::SearchConfig;
use crate::error::{PredictError, Result};
use crate::lcg;
use crate::observation::{self, Decomposition, Observation};
use crate::random::JavaRandom;
use crate::search::{search, SearchOutcome};

/// Rebuilds `java.util.Random` instances from values they produced.
///
/// Every `from_*` method returns a generator whose next call of the same kind
/// yields the value that followed the ones passed in.
#[derive(Clone, Debug, Default)]
pub struct Predictor {
    config: SearchConfig,
}

impl Predictor {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Two consecutive `nextFloat()` values. Usually ambiguous: only 24 bits
    /// of each state are visible.
    pub fn from_two_floats(&self, f1: f32, f2: f32) -> Result<JavaRandom> {
        self.predict(&observation::two_floats(f1, f2)?)
    }

    /// Three consecutive `nextFloat()` values; the third settles ambiguity.
    pub fn from_three_floats(&self, f1: f32, f2: f32, f3: f32) -> Result<JavaRandom> {
        self.predict(&observation::three_floats(f1, f2, f3)?)
    }

    /// One `nextDouble()` (or `Math.random()`) value.
    pub fn from_double(&self, d: f64) -> Result<JavaRandom> {
        self.predict(&observation::double(d)?)
    }

    /// One `nextLong()` value.
    pub fn from_long(&self, n: i64) -> Result<JavaRandom> {
        self.predict(&observation::long(n))
    }

    /// Two consecutive `nextInt()` values. Does not work for `nextInt(bound)`.
    pub fn from_two_ints(&self, n1: i32, n2: i32) -> Result<JavaRandom> {
        self.predict(&observation::two_ints(n1, n2))
    }

    /// The output of one `nextBytes(arr)` call, at least 8 bytes long. Only
    /// the first 8 bytes are searched.
    pub fn from_bytes(&self, arr: &[u8]) -> Result<JavaRandom> {
        self.predict(&observation::bytes(arr)?)
    }

    /// Runs the search on the first two observations and resolves the outcome.
    pub fn predict(&self, d: &Decomposition) -> Result<JavaRandom> {
        let [first, second, rest @ ..] = d.observations.as_slice() else {
            return Err(PredictError::InvalidArgument(format!(
                "need at least two observations, got {}",
                d.observations.len()
            )));
        };
        for o in &d.observations {
            o.check()?;
        }
        let third = rest.first().copied();

        match search(*first, *second, &self.config) {
            SearchOutcome::Empty => Err(PredictError::NoSeed),
            SearchOutcome::Unique(state) => {
                // A third value, if any, is already behind this state.
                let skip = d.trailing_draws + usize::from(third.is_some());
                Ok(build(state, skip))
            }
            SearchOutcome::Ambiguous(states) => match third {
                Some(third) => disambiguate(&states, third)
                    .map(|state| build(state, d.trailing_draws))
                    .ok_or(PredictError::NoSeed),
                None => Err(PredictError::MultipleSeeds(
                    states
                        .iter()
                        .map(|&s| lcg::unscramble(lcg::advance_by(s, d.trailing_draws)))
                        .collect(),
                )),
            },
        }
    }
}

/// State after the third draw for the first candidate that produces `third`.
/// More than one survivor is not an error; the earliest wins.
fn disambiguate(states: &[u64], third: Observation) -> Option<u64> {
    let mut survivors = states
        .iter()
        .map(|&s| lcg::advance(s))
        .filter(|&next| third.matches(next));
    let chosen = survivors.next()?;
    let extra = survivors.count();
    if extra > 0 {
        warn!(
            candidates = states.len(),
            extra,
            "third value left several states, keeping the first"
        );
    }
    Some(chosen)
}

fn build(state: u64, skip: usize) -> JavaRandom {
    let mut r = JavaRandom::from_state(state);
    r.skip(skip);
    debug!(seed = r.seed(), skipped = skip, "generator rebuilt");
    r
}

pub fn from_two_floats(f1: f32, f2: f32) -> Result<JavaRandom> {
    Predictor::default().from_two_floats(f1, f2)
}

pub fn from_three_floats(f1: f32, f2: f32, f3: f32) -> Result<JavaRandom> {
    Predictor::default().from_three_floats(f1, f2, f3)
}

pub fn from_double(d: f64) -> Result<JavaRandom> {
    Predictor::default().from_double(d)
}

pub fn from_long(n: i64) -> Result<JavaRandom> {
    Predictor::default().from_long(n)
}

pub fn from_two_ints(n1: i32, n2: i32) -> Result<JavaRandom> {
    Predictor::default().from_two_ints(n1, n2)
}

pub fn from_bytes(arr: &[u8]) -> Result<JavaRandom> {
    Predictor::default().from_bytes(arr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchStrategy;

    fn fast() -> Predictor {
        Predictor::new(SearchConfig::sequential().with_strategy(SearchStrategy::WrapCount))
    }

    #[test]
    fn disambiguate_keeps_first_survivor() {
        let a = JavaRandom::new(1).state();
        let b = JavaRandom::new(2).state();
        let third = Observation::new(lcg::top_bits(lcg::advance(b), 24) as u32, 24);
        assert_eq!(disambiguate(&[a, b], third), Some(lcg::advance(b)));
        assert_eq!(disambiguate(&[b, b], third), Some(lcg::advance(b)));
        let miss = Observation::new((third.value + 1) & 0xFF_FFFF, 24);
        assert_eq!(disambiguate(&[b], miss), None);
    }

    #[test]
    fn multiple_seeds_are_positioned_like_a_unique_result() {
        // Seed 0: the first two floats fit two states.
        let mut r = JavaRandom::new(0);
        let (f1, f2) = (r.next_float(), r.next_float());
        let err = fast().from_two_floats(f1, f2).unwrap_err();
        let PredictError::MultipleSeeds(seeds) = &err else {
            panic!("expected ambiguity, got {err:?}");
        };
        assert_eq!(seeds.len(), 2);
        assert!(seeds.contains(&r.seed()));
        assert_eq!(err.to_string(), "number sequence has 2 possible seeds");
    }

    #[test]
    fn multiple_seeds_skip_trailing_byte_draws() {
        let mut victim = JavaRandom::new(0);
        let (f1, f2) = (victim.next_float(), victim.next_float());
        victim.skip(2);

        let d = Decomposition {
            shape: observation::Shape::Bytes,
            trailing_draws: 2,
            ..observation::two_floats(f1, f2).unwrap()
        };
        let err = fast().predict(&d).unwrap_err();
        let seeds = err.seeds();
        assert_eq!(seeds.len(), 2);
        assert!(seeds.iter().any(|&s| JavaRandom::new(s) == victim));
    }

    #[test]
    fn out_of_range_observations_are_rejected_before_searching() {
        let wide_first = Decomposition {
            shape: observation::Shape::TwoInts,
            observations: vec![
                Observation { value: 0, known_bits: 49 },
                Observation::new(0, 32),
            ],
            trailing_draws: 0,
        };
        let brute = Predictor::new(SearchConfig::sequential());
        assert!(matches!(brute.predict(&wide_first), Err(PredictError::InvalidArgument(_))));

        let oversized_value = Decomposition {
            shape: observation::Shape::TwoFloats,
            observations: vec![
                Observation::new(5, 24),
                Observation { value: 1 << 24, known_bits: 24 },
            ],
            trailing_draws: 0,
        };
        assert!(matches!(
            fast().predict(&oversized_value),
            Err(PredictError::InvalidArgument(_))
        ));

        let bad_third = Decomposition {
            shape: observation::Shape::ThreeFloats,
            observations: vec![
                Observation::new(5, 24),
                Observation::new(6, 24),
                Observation { value: 7, known_bits: 0 },
            ],
            trailing_draws: 0,
        };
        assert!(matches!(fast().predict(&bad_third), Err(PredictError::InvalidArgument(_))));
    }

    #[test]
    fn short_decomposition_is_rejected() {
        let d = Decomposition {
            shape: observation::Shape::TwoInts,
            observations: vec![Observation::new(1, 32)],
            trailing_draws: 0,
        };
        assert!(matches!(fast().predict(&d), Err(PredictError::InvalidArgument(_))));
    }
}
