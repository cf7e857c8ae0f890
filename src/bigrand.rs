//! Random sampling of big integers.

use alloc::vec;

use rand::Rng;

use crate::biginteger::{BigInteger, Sign};
use crate::digits::{BITS, Word, bit_length_mag};

/// A trait for sampling random [`BigInteger`] values.
///
/// The `rand` feature must be enabled to use this.
pub trait RandBigInteger {
    /// Generate a random value of at most `bit_size` magnitude bits and
    /// random sign.
    fn gen_biginteger(&mut self, bit_size: u64) -> BigInteger;

    /// Generate a random value in `[0, bound)`. Panics if `bound <= 0`.
    fn gen_biginteger_below(&mut self, bound: &BigInteger) -> BigInteger;

    /// Generate a random value in `[lbound, ubound)`. Panics when the upper
    /// bound is not greater than the lower bound.
    fn gen_biginteger_range(&mut self, lbound: &BigInteger, ubound: &BigInteger) -> BigInteger;
}

fn gen_magnitude<R: Rng + ?Sized>(rng: &mut R, bit_size: u64) -> BigInteger {
    let words = bit_size.div_ceil(BITS as u64) as usize;
    let rem = (bit_size % BITS as u64) as u32;
    let mut data = vec![0 as Word; words.max(1)];
    if words > 0 {
        rng.fill(&mut data[..]);
        if rem > 0 {
            let last = data.len() - 1;
            data[last] >>= BITS - rem;
        }
    }
    BigInteger::from_parts(Sign::Plus, data)
}

impl<R: Rng + ?Sized> RandBigInteger for R {
    fn gen_biginteger(&mut self, bit_size: u64) -> BigInteger {
        loop {
            let magnitude = gen_magnitude(self, bit_size);
            if magnitude.is_zero() {
                // Zero has no sign to pick, so give it half the draws it
                // would otherwise get.
                if self.random() {
                    continue;
                }
                return magnitude;
            }
            return if self.random() { magnitude } else { -magnitude };
        }
    }

    fn gen_biginteger_below(&mut self, bound: &BigInteger) -> BigInteger {
        assert!(bound.is_positive(), "bound must be positive");
        let bits = bit_length_mag(&bound.mag);
        loop {
            let n = gen_magnitude(self, bits);
            if &n < bound {
                return n;
            }
        }
    }

    fn gen_biginteger_range(&mut self, lbound: &BigInteger, ubound: &BigInteger) -> BigInteger {
        assert!(lbound < ubound, "empty range");
        let delta = ubound - lbound;
        lbound + self.gen_biginteger_below(&delta)
    }
}

#[cfg(test)]
mod bigrand_tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    #[test]
    fn test_gen_biginteger_respects_bit_size() {
        let mut rng = XorShiftRng::from_seed([1u8; 16]);
        for bits in [0u64, 1, 31, 32, 33, 200] {
            for _ in 0..20 {
                let v = rng.gen_biginteger(bits);
                assert!(v.abs().bit_length() <= bits, "{} bits", bits);
            }
        }
    }

    #[test]
    fn test_gen_below_and_range() {
        let mut rng = XorShiftRng::from_seed([2u8; 16]);
        let bound = BigInteger::from(1_000_003u32);
        for _ in 0..100 {
            let v = rng.gen_biginteger_below(&bound);
            assert!(!v.is_negative() && v < bound);
        }
        let lo = BigInteger::from(-50i32);
        let hi = BigInteger::from(50i32);
        for _ in 0..100 {
            let v = rng.gen_biginteger_range(&lo, &hi);
            assert!(v >= lo && v < hi);
        }
    }
}
