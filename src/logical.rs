//! Bitwise operations with infinite two's-complement semantics.
//!
//! A negative value behaves as if its sign bit extended forever to the left:
//! `-1` is all ones, `-1 & x == x`, and `!x == -x - 1`.

use alloc::vec::Vec;
use core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

use crate::biginteger::{BigInteger, Sign};
use crate::digits::{BITS, Word, add_word, sub_mag, test_bit_mag};
use crate::Result;

/// The low `n` words of the two's-complement form of `x`.
fn to_twos(x: &BigInteger, n: usize) -> Vec<Word> {
    let mut out: Vec<Word> = x.mag.clone();
    out.resize(n, 0);
    if x.is_negative() {
        let mut carry = true;
        for w in out.iter_mut() {
            let (v, c) = (!*w).overflowing_add(carry as Word);
            *w = v;
            carry = c;
        }
    }
    out
}

/// Reads a two's-complement word vector whose top bit is the sign.
fn from_twos(mut words: Vec<Word>) -> BigInteger {
    let negative = words.last().is_some_and(|&w| w >> (BITS - 1) == 1);
    if negative {
        let mut carry = true;
        for w in words.iter_mut() {
            let (v, c) = (!*w).overflowing_add(carry as Word);
            *w = v;
            carry = c;
        }
        BigInteger::from_parts(Sign::Minus, words)
    } else {
        BigInteger::from_parts(Sign::Plus, words)
    }
}

fn bitwise(a: &BigInteger, b: &BigInteger, op: impl Fn(Word, Word) -> Word) -> BigInteger {
    // One spare word holds the sign.
    let n = a.mag.len().max(b.mag.len()) + 1;
    let x = to_twos(a, n);
    let y = to_twos(b, n);
    from_twos(x.iter().zip(&y).map(|(&p, &q)| op(p, q)).collect())
}

impl BigInteger {
    /// `self & other`
    pub fn and(&self, other: &Self) -> Self {
        bitwise(self, other, |p, q| p & q)
    }

    /// `self | other`
    pub fn or(&self, other: &Self) -> Self {
        bitwise(self, other, |p, q| p | q)
    }

    /// `self ^ other`
    pub fn xor(&self, other: &Self) -> Self {
        bitwise(self, other, |p, q| p ^ q)
    }

    /// `self & !other`
    pub fn and_not(&self, other: &Self) -> Self {
        bitwise(self, other, |p, q| p & !q)
    }

    /// `!self`, which equals `-self - 1`.
    pub fn not(&self) -> Self {
        match self.sign {
            Sign::Minus => BigInteger::from_parts(Sign::Plus, sub_mag(&self.mag, &[1])),
            _ => BigInteger::from_parts(Sign::Minus, add_word(&self.mag, 1)),
        }
    }

    /// Bit `n` of the two's-complement form.
    pub fn test_bit(&self, n: u64) -> bool {
        if self.is_negative() {
            // Bit n of -m is the complement of bit n of m - 1.
            !test_bit_mag(&sub_mag(&self.mag, &[1]), n)
        } else {
            test_bit_mag(&self.mag, n)
        }
    }

    /// `self` with bit `n` set.
    ///
    /// # Errors
    /// Returns `ArithmeticError::InvalidOperation` if bit `n` lies beyond
    /// [`MAX_MAGNITUDE_WORDS`](crate::MAX_MAGNITUDE_WORDS).
    pub fn set_bit(&self, n: u64) -> Result<Self> {
        Ok(self.or(&BigInteger::one().try_shift_left(n)?))
    }

    pub fn clear_bit(&self, n: u64) -> Result<Self> {
        Ok(self.and_not(&BigInteger::one().try_shift_left(n)?))
    }

    pub fn flip_bit(&self, n: u64) -> Result<Self> {
        Ok(self.xor(&BigInteger::one().try_shift_left(n)?))
    }

    /// Number of bits in the two's-complement form that differ from the
    /// sign bit.
    pub fn bit_count(&self) -> u64 {
        let ones = |mag: &[Word]| mag.iter().map(|w| w.count_ones() as u64).sum::<u64>();
        if self.is_negative() {
            ones(&sub_mag(&self.mag, &[1]))
        } else {
            ones(&self.mag)
        }
    }
}

macro_rules! forward_bitop {
    (impl $imp:ident, $method:ident, $assign:ident, $assign_method:ident, $inner:ident) => {
        impl $imp<&BigInteger> for &BigInteger {
            type Output = BigInteger;

            #[inline]
            fn $method(self, rhs: &BigInteger) -> BigInteger {
                BigInteger::$inner(self, rhs)
            }
        }

        impl $imp<BigInteger> for BigInteger {
            type Output = BigInteger;

            #[inline]
            fn $method(self, rhs: BigInteger) -> BigInteger {
                BigInteger::$inner(&self, &rhs)
            }
        }

        impl $imp<&BigInteger> for BigInteger {
            type Output = BigInteger;

            #[inline]
            fn $method(self, rhs: &BigInteger) -> BigInteger {
                BigInteger::$inner(&self, rhs)
            }
        }

        impl $assign<&BigInteger> for BigInteger {
            #[inline]
            fn $assign_method(&mut self, rhs: &BigInteger) {
                *self = BigInteger::$inner(self, rhs);
            }
        }
    };
}

forward_bitop!(impl BitAnd, bitand, BitAndAssign, bitand_assign, and);
forward_bitop!(impl BitOr, bitor, BitOrAssign, bitor_assign, or);
forward_bitop!(impl BitXor, bitxor, BitXorAssign, bitxor_assign, xor);

impl Not for BigInteger {
    type Output = BigInteger;

    fn not(self) -> BigInteger {
        BigInteger::not(&self)
    }
}

impl Not for &BigInteger {
    type Output = BigInteger;

    fn not(self) -> BigInteger {
        BigInteger::not(self)
    }
}
