//! Random Streams
//!
//! Generated history must be reproducible from a seed, so it draws from
//! [`Mulberry32`]. The live ticker has no such requirement and draws from
//! [`ThreadEntropy`]. Both sit behind [`UniformSource`].

use rand::Rng;

use crate::market::{Range, Symbol};

/// A source of uniform draws in `[0, 1)`
pub trait UniformSource {
    fn next_unit(&mut self) -> f64;
}

/// Mulberry32: a 32-bit state, a Weyl increment and two xorshift-multiply
/// rounds.
///
/// ```text
/// state += 0x6D2B79F5
/// t  = (state ^ state >> 15) * (state | 1)
/// t ^= t + (t ^ t >> 7) * (t | 61)
/// out = t ^ t >> 14
/// ```
///
/// All arithmetic wraps at 32 bits.
#[derive(Clone, Debug)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub const fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub const fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }
}

impl UniformSource for Mulberry32 {
    fn next_unit(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }
}

/// Non-reproducible draws from the thread-local generator
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadEntropy;

impl UniformSource for ThreadEntropy {
    fn next_unit(&mut self) -> f64 {
        rand::thread_rng().gen_range(0.0..1.0)
    }
}

/// Default seed for a (symbol, range) pair when the caller supplies none.
///
/// Character-code sums of both tokens, weighted by 31 and 97.
pub fn seed_for(symbol: Symbol, range: Range) -> u32 {
    let weight = |token: &str| token.bytes().fold(0u32, |acc, b| acc.wrapping_add(u32::from(b)));
    weight(symbol.as_ref())
        .wrapping_mul(31)
        .wrapping_add(weight(range.as_ref()).wrapping_mul(97))
}
