use rand::{Error as RandError, RngCore, SeedableRng};

use crate::error::{PredictError, Result};
use crate::lcg;

const FLOAT_UNIT: f32 = 1.0 / (1u32 << 24) as f32;
const DOUBLE_UNIT: f64 = 1.0 / (1u64 << 53) as f64;

/// Bit-exact clone of `java.util.Random`.
///
/// This is also the type handed back by the predictor: a generator whose next
/// call reproduces the next value of the observed sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct JavaRandom {
    state: u64,
    next_next_gaussian: Option<f64>,
}

impl JavaRandom {
    /// Same as `new Random(seed)`.
    pub fn new(seed: u64) -> Self {
        Self::from_state(lcg::scramble(seed))
    }

    /// Wraps a raw 48-bit register without scrambling it.
    pub fn from_state(state: u64) -> Self {
        Self {
            state: state & lcg::MASK,
            next_next_gaussian: None,
        }
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.state = lcg::scramble(seed);
        self.next_next_gaussian = None;
    }

    /// Current register in seed form, i.e. `JavaRandom::new(r.seed()) == r`
    /// (ignoring a cached gaussian).
    pub fn seed(&self) -> u64 {
        lcg::unscramble(self.state)
    }

    pub fn state(&self) -> u64 {
        self.state
    }

    /// Advances the register and returns its top `bits` bits, sign-extended
    /// the way Java's `(int)` cast does for `bits == 32`.
    pub fn next(&mut self, bits: u32) -> i32 {
        self.state = lcg::advance(self.state);
        lcg::top_bits(self.state, bits) as u32 as i32
    }

    /// Discards `n` 32-bit draws.
    pub fn skip(&mut self, n: usize) {
        self.state = lcg::advance_by(self.state, n);
    }

    pub fn next_int(&mut self) -> i32 {
        self.next(32)
    }

    /// `nextInt(bound)`, including the rejection loop for non power-of-two
    /// bounds.
    pub fn next_int_bounded(&mut self, bound: i32) -> Result<i32> {
        if bound <= 0 {
            return Err(PredictError::InvalidArgument(format!(
                "bound must be positive, got {bound}"
            )));
        }
        let mut r = self.next(31);
        let m = bound - 1;
        if bound & m == 0 {
            return Ok(((bound as i64 * r as i64) >> 31) as i32);
        }
        let mut u = r;
        loop {
            r = u % bound;
            if u.wrapping_sub(r).wrapping_add(m) >= 0 {
                return Ok(r);
            }
            u = self.next(31);
        }
    }

    pub fn next_long(&mut self) -> i64 {
        let hi = self.next(32) as i64;
        let lo = self.next(32) as i64;
        (hi << 32).wrapping_add(lo)
    }

    pub fn next_boolean(&mut self) -> bool {
        self.next(1) != 0
    }

    pub fn next_float(&mut self) -> f32 {
        self.next(24) as f32 * FLOAT_UNIT
    }

    pub fn next_double(&mut self) -> f64 {
        let hi = self.next(26) as i64;
        let lo = self.next(27) as i64;
        ((hi << 27) + lo) as f64 * DOUBLE_UNIT
    }

    /// Fills `bytes` four at a time from `next_int`, low byte first. A partial
    /// trailing group still consumes a whole draw.
    pub fn next_bytes(&mut self, bytes: &mut [u8]) {
        for chunk in bytes.chunks_mut(4) {
            let word = self.next_int().to_le_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
    }

    /// Marsaglia polar method with the cached second value, as in Java.
    /// `ln`/`sqrt` come from the platform libm, so the last ulp may differ from
    /// `StrictMath`; the number of draws consumed does not.
    pub fn next_gaussian(&mut self) -> f64 {
        if let Some(g) = self.next_next_gaussian.take() {
            return g;
        }
        loop {
            let v1 = 2.0 * self.next_double() - 1.0;
            let v2 = 2.0 * self.next_double() - 1.0;
            let s = v1 * v1 + v2 * v2;
            if s < 1.0 && s != 0.0 {
                let multiplier = (-2.0 * s.ln() / s).sqrt();
                self.next_next_gaussian = Some(v2 * multiplier);
                return v1 * multiplier;
            }
        }
    }
}

impl RngCore for JavaRandom {
    fn next_u32(&mut self) -> u32 {
        self.next_int() as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.next_long() as u64
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.next_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), RandError> {
        self.next_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for JavaRandom {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    // The default expands the u64 through PCG; Java takes it verbatim.
    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}
