//! The 48-bit linear-congruential recurrence behind `java.util.Random`.
//!
//! x_{n+1} = (a * x_n + c) mod 2^48, with the public constants below.
//! Every function here is closed-form arithmetic on `u64` values that stay
//! inside the 48-bit domain.

pub const MULTIPLIER: u64 = 0x5_DEEC_E66D;
pub const ADDEND: u64 = 0xB;
pub const STATE_BITS: u32 = 48;
pub const MASK: u64 = (1 << STATE_BITS) - 1;

/// One step of the recurrence.
#[inline]
pub fn advance(state: u64) -> u64 {
    state.wrapping_mul(MULTIPLIER).wrapping_add(ADDEND) & MASK
}

/// Steps the recurrence `n` times.
pub fn advance_by(mut state: u64, n: usize) -> u64 {
    for _ in 0..n {
        state = advance(state);
    }
    state
}

/// The top `width` bits of a 48-bit state. `width` must be in `1..=48`.
#[inline]
pub fn top_bits(state: u64, width: u32) -> u64 {
    debug_assert!((1..=STATE_BITS).contains(&width), "width out of range: {width}");
    (state >> (STATE_BITS - width)) & ((1u64 << width) - 1)
}

/// Seed → internal register, as `Random::setSeed` does it.
#[inline]
pub fn scramble(seed: u64) -> u64 {
    (seed ^ MULTIPLIER) & MASK
}

/// Internal register → a seed that reproduces it. Same XOR as `scramble`.
#[inline]
pub fn unscramble(state: u64) -> u64 {
    (state ^ MULTIPLIER) & MASK
}
