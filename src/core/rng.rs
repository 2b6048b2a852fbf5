use rand::rand_core::impls;
use rand::RngCore;

/// LCG multiplier of the 64-bit state.
const MULTIPLIER: u64 = 6_364_136_223_846_793_005;

/// Seeded PCG-family generator: a 64-bit LCG state with a random-shift output
/// permutation, yielding 32-bit words.
///
/// The recurrence is fixed bit-for-bit so a seed pins every electron trajectory
/// of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pcg {
    state: u64,
}

impl Pcg {
    /// Seed the generator: `state = 2·seed + 1` computed in 32 bits (so the
    /// top seed bit is lost), then discard one output.
    pub fn new(seed: u32) -> Self {
        let mut rng = Self {
            state: u64::from(seed.wrapping_mul(2).wrapping_add(1)),
        };
        rng.next_word();
        rng
    }

    /// Advance the state and return the next 32-bit output.
    #[inline]
    pub fn next_word(&mut self) -> u32 {
        let mut x = self.state;
        let count = (x >> 61) as u32;
        self.state = x.wrapping_mul(MULTIPLIER);
        x ^= x >> 22;
        (x >> (22 + count)) as u32
    }

    /// Uniform sample `next_word() / u32::MAX`. Note the upper end is inclusive.
    #[inline]
    pub fn uniform(&mut self) -> f64 {
        f64::from(self.next_word()) / f64::from(u32::MAX)
    }
}

impl RngCore for Pcg {
    fn next_u32(&mut self) -> u32 {
        self.next_word()
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        impls::fill_bytes_via_next(self, dst)
    }
}
