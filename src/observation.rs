//! Turns observed generator outputs into partial-state fragments.
//!
//! Every `java.util.Random` output is built from the top bits of one or more
//! consecutive states. An [`Observation`] records one such fragment together
//! with how many of the 48 state bits it pins down.

use serde::{Deserialize, Serialize};

use crate::error::{PredictError, Result};
use crate::lcg;

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Observation {
    pub value: u32,
    pub known_bits: u32,
}

impl Observation {
    pub fn new(value: u32, known_bits: u32) -> Self {
        debug_assert!((1..=32).contains(&known_bits));
        debug_assert!(known_bits == 32 || value < (1u32 << known_bits));
        Self { value, known_bits }
    }

    /// Rejects fragments that no single draw can produce: `known_bits` outside
    /// `1..=32`, or a `value` wider than `known_bits`.
    pub fn check(&self) -> Result<()> {
        if !(1..=32).contains(&self.known_bits) {
            return Err(PredictError::InvalidArgument(format!(
                "known_bits must be in 1..=32, got {}",
                self.known_bits
            )));
        }
        if self.known_bits < 32 && self.value >> self.known_bits != 0 {
            return Err(PredictError::InvalidArgument(format!(
                "value {:#x} does not fit in {} bits",
                self.value, self.known_bits
            )));
        }
        Ok(())
    }

    /// Low state bits this fragment leaves open.
    pub fn unknown_bits(&self) -> u32 {
        lcg::STATE_BITS - self.known_bits
    }

    /// Whether `state` could have produced this fragment.
    #[inline]
    pub fn matches(&self, state: u64) -> bool {
        lcg::top_bits(state, self.known_bits) == self.value as u64
    }
}

/// Which generator calls produced the observed values.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    TwoFloats,
    ThreeFloats,
    Double,
    Long,
    TwoInts,
    Bytes,
}

/// Observations in call order, plus draws consumed after the last one that a
/// predicted generator has to skip.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Decomposition {
    pub shape: Shape,
    pub observations: Vec<Observation>,
    pub trailing_draws: usize,
}

impl Decomposition {
    fn new(shape: Shape, observations: Vec<Observation>) -> Self {
        Self { shape, observations, trailing_draws: 0 }
    }
}

/// `⌊x · 2^bits⌋` for an `x` in `[0, 1)`; anything else is not a generator
/// output.
fn fraction_bits(x: f64, bits: u32) -> Result<u64> {
    if !(0.0..1.0).contains(&x) {
        return Err(PredictError::NoSeed);
    }
    Ok((x * (1u64 << bits) as f64) as u64)
}

fn float_observation(f: f32) -> Result<Observation> {
    // f32 → f64 is exact, and so is the power-of-two scale.
    let v = fraction_bits(f as f64, 24)?;
    Ok(Observation::new(v as u32, 24))
}

pub fn two_floats(f1: f32, f2: f32) -> Result<Decomposition> {
    Ok(Decomposition::new(
        Shape::TwoFloats,
        vec![float_observation(f1)?, float_observation(f2)?],
    ))
}

pub fn three_floats(f1: f32, f2: f32, f3: f32) -> Result<Decomposition> {
    Ok(Decomposition::new(
        Shape::ThreeFloats,
        vec![
            float_observation(f1)?,
            float_observation(f2)?,
            float_observation(f3)?,
        ],
    ))
}

/// `nextDouble` is `(next(26) << 27 | next(27)) / 2^53`.
pub fn double(d: f64) -> Result<Decomposition> {
    let n = fraction_bits(d, 53)?;
    Ok(Decomposition::new(
        Shape::Double,
        vec![
            Observation::new((n >> 27) as u32, 26),
            Observation::new((n & ((1 << 27) - 1)) as u32, 27),
        ],
    ))
}

/// `nextLong` is `(hi << 32) + lo` with `lo` signed, so a negative `lo`
/// borrows one from the high word; add it back.
pub fn long(n: i64) -> Decomposition {
    let lo = n as i32;
    let hi = ((n >> 32) as i32).wrapping_add(i32::from(lo < 0));
    Decomposition::new(
        Shape::Long,
        vec![Observation::new(hi as u32, 32), Observation::new(lo as u32, 32)],
    )
}

pub fn two_ints(n1: i32, n2: i32) -> Decomposition {
    Decomposition::new(
        Shape::TwoInts,
        vec![Observation::new(n1 as u32, 32), Observation::new(n2 as u32, 32)],
    )
}

/// Only the first 8 bytes are searched; every further 4-byte group (a partial
/// one included) is one more draw to skip.
pub fn bytes(arr: &[u8]) -> Result<Decomposition> {
    if arr.len() < 8 {
        return Err(PredictError::InvalidArgument(format!(
            "need at least 8 bytes, got {}",
            arr.len()
        )));
    }
    let word = |i: usize| u32::from_le_bytes([arr[i], arr[i + 1], arr[i + 2], arr[i + 3]]);
    Ok(Decomposition {
        shape: Shape::Bytes,
        observations: vec![Observation::new(word(0), 32), Observation::new(word(4), 32)],
        trailing_draws: (arr.len() - 8).div_ceil(4),
    })
}
