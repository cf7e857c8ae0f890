use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::{Product, Sum};
use core::ops::{
    Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, RemAssign, Shl, ShlAssign, Shr,
    ShrAssign, Sub, SubAssign,
};
use core::str::FromStr;
use core::sync::atomic::{AtomicU32, Ordering as AtomicOrdering};

use num_integer::Integer;
use num_traits::float::FloatCore;
use num_traits::{FromPrimitive, Num, One, Signed, ToPrimitive, Zero};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::digits::{
    self, BITS, Word, add_mag, any_low_bits, bit_length_mag, cmp_mag, from_u64, from_u128,
    is_zero, low_u64, normalize, shl_bits, shr_bits, sub_mag, trailing_zeros_mag,
};
use crate::division::{div_rem_mag, div_rem_word};
use crate::multiplication::{mul_add_word_in_place, mul_mag, square};
use crate::powers::check_magnitude_words;
use crate::{ArithmeticError, Result};

/// Sign of a [`BigInteger`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sign {
    Minus,
    NoSign,
    Plus,
}

impl Sign {
    #[inline]
    pub const fn signum(self) -> i32 {
        match self {
            Sign::Minus => -1,
            Sign::NoSign => 0,
            Sign::Plus => 1,
        }
    }
}

impl Neg for Sign {
    type Output = Sign;

    #[inline]
    fn neg(self) -> Sign {
        match self {
            Sign::Minus => Sign::Plus,
            Sign::NoSign => Sign::NoSign,
            Sign::Plus => Sign::Minus,
        }
    }
}

impl Mul for Sign {
    type Output = Sign;

    #[inline]
    fn mul(self, rhs: Sign) -> Sign {
        match (self, rhs) {
            (Sign::NoSign, _) | (_, Sign::NoSign) => Sign::NoSign,
            (a, b) if a == b => Sign::Plus,
            _ => Sign::Minus,
        }
    }
}

const FIRST_NONZERO_UNSET: u32 = u32::MAX;

/// Arbitrary-precision signed integer.
///
/// Stored as a sign and a canonical little-endian magnitude of 32-bit words:
/// no leading zero word, and zero is exactly `[0]` with [`Sign::NoSign`].
/// Values are immutable; the only interior state is a memoized index of the
/// lowest non-zero word, which any thread may compute and store.
pub struct BigInteger {
    pub(crate) sign: Sign,
    pub(crate) mag: Vec<Word>,
    first_nonzero: AtomicU32,
}

// ============================================================================
// Constructors and Raw Access
// ============================================================================

impl BigInteger {
    /// Builds a value from a sign and any magnitude, normalizing both.
    pub(crate) fn from_parts(sign: Sign, mut mag: Vec<Word>) -> Self {
        normalize(&mut mag);
        let sign = if is_zero(&mag) {
            Sign::NoSign
        } else if sign == Sign::NoSign {
            Sign::Plus
        } else {
            sign
        };
        Self {
            sign,
            mag,
            first_nonzero: AtomicU32::new(FIRST_NONZERO_UNSET),
        }
    }

    /// Creates a value from a sign and little-endian magnitude words.
    ///
    /// A zero magnitude yields zero regardless of `sign`; a non-zero magnitude
    /// with [`Sign::NoSign`] is treated as positive.
    pub fn from_sign_magnitude(sign: Sign, words: Vec<u32>) -> Self {
        Self::from_parts(sign, words)
    }

    /// Creates a non-negative value from little-endian words.
    pub fn from_words_le(words: &[u32]) -> Self {
        Self::from_parts(Sign::Plus, words.to_vec())
    }

    #[inline]
    pub fn zero() -> Self {
        Self::from_parts(Sign::NoSign, vec![0])
    }

    #[inline]
    pub fn one() -> Self {
        Self::from_parts(Sign::Plus, vec![1])
    }

    #[inline]
    pub fn ten() -> Self {
        Self::from_parts(Sign::Plus, vec![10])
    }

    /// The little-endian magnitude words (never empty).
    #[inline]
    pub fn words(&self) -> &[u32] {
        &self.mag
    }

    #[inline]
    pub fn sign(&self) -> Sign {
        self.sign
    }

    /// Returns -1, 0 or 1.
    #[inline]
    pub fn signum(&self) -> i32 {
        self.sign.signum()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.sign == Sign::NoSign
    }

    #[inline]
    pub fn is_one(&self) -> bool {
        self.sign == Sign::Plus && self.mag.len() == 1 && self.mag[0] == 1
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.sign == Sign::Minus
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.sign == Sign::Plus
    }

    /// Index of the lowest non-zero magnitude word, memoized.
    pub(crate) fn first_nonzero_word(&self) -> usize {
        let cached = self.first_nonzero.load(AtomicOrdering::Relaxed);
        if cached != FIRST_NONZERO_UNSET {
            return cached as usize;
        }
        let idx = digits::first_nonzero(&self.mag);
        self.first_nonzero.store(idx as u32, AtomicOrdering::Relaxed);
        idx
    }

    pub fn abs(&self) -> Self {
        match self.sign {
            Sign::Minus => Self::from_parts(Sign::Plus, self.mag.clone()),
            _ => self.clone(),
        }
    }

    pub fn negate(&self) -> Self {
        Self::from_parts(-self.sign, self.mag.clone())
    }
}

impl Clone for BigInteger {
    fn clone(&self) -> Self {
        Self {
            sign: self.sign,
            mag: self.mag.clone(),
            first_nonzero: AtomicU32::new(self.first_nonzero.load(AtomicOrdering::Relaxed)),
        }
    }
}

impl Default for BigInteger {
    fn default() -> Self {
        Self::zero()
    }
}

// ============================================================================
// Equality, Hashing, Ordering
// ============================================================================

impl PartialEq for BigInteger {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.sign == other.sign && self.mag == other.mag
    }
}

impl Eq for BigInteger {}

impl Hash for BigInteger {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sign.hash(state);
        self.mag.hash(state);
    }
}

impl Ord for BigInteger {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.sign.cmp(&other.sign) {
            Ordering::Equal => {}
            other => return other,
        }
        match self.sign {
            Sign::Plus => cmp_mag(&self.mag, &other.mag),
            Sign::Minus => cmp_mag(&other.mag, &self.mag),
            Sign::NoSign => Ordering::Equal,
        }
    }
}

impl PartialOrd for BigInteger {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ============================================================================
// Arithmetic Operations - Addition / Subtraction
// ============================================================================

fn add_signed(a_sign: Sign, a: &[Word], b_sign: Sign, b: &[Word]) -> BigInteger {
    match (a_sign, b_sign) {
        (Sign::NoSign, _) => BigInteger::from_parts(b_sign, b.to_vec()),
        (_, Sign::NoSign) => BigInteger::from_parts(a_sign, a.to_vec()),
        (x, y) if x == y => BigInteger::from_parts(x, add_mag(a, b)),
        _ => match cmp_mag(a, b) {
            Ordering::Equal => BigInteger::zero(),
            Ordering::Greater => BigInteger::from_parts(a_sign, sub_mag(a, b)),
            Ordering::Less => BigInteger::from_parts(b_sign, sub_mag(b, a)),
        },
    }
}

impl BigInteger {
    fn add_ref(&self, rhs: &Self) -> Self {
        add_signed(self.sign, &self.mag, rhs.sign, &rhs.mag)
    }

    fn sub_ref(&self, rhs: &Self) -> Self {
        add_signed(self.sign, &self.mag, -rhs.sign, &rhs.mag)
    }

    fn mul_ref(&self, rhs: &Self) -> Self {
        if self.is_zero() || rhs.is_zero() {
            return Self::zero();
        }
        Self::from_parts(self.sign * rhs.sign, mul_mag(&self.mag, &rhs.mag))
    }

    /// Returns `self * self` using the dedicated squaring routine.
    pub fn square(&self) -> Self {
        if self.is_zero() {
            return Self::zero();
        }
        Self::from_parts(Sign::Plus, square(&self.mag))
    }
}

// ============================================================================
// Arithmetic Operations - Division
// ============================================================================

impl BigInteger {
    /// Truncating quotient and remainder.
    ///
    /// The quotient rounds toward zero and the remainder takes the sign of
    /// the dividend, like the primitive `/` and `%` operators.
    ///
    /// # Errors
    /// Returns `ArithmeticError::DivisionByZero` if `divisor` is zero.
    pub fn try_div_rem(&self, divisor: &Self) -> Result<(Self, Self)> {
        if divisor.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        if self.is_zero() {
            return Ok((Self::zero(), Self::zero()));
        }
        let (q, r) = div_rem_mag(&self.mag, &divisor.mag);
        Ok((
            Self::from_parts(self.sign * divisor.sign, q),
            Self::from_parts(self.sign, r),
        ))
    }

    /// Truncating division.
    pub fn try_div(&self, divisor: &Self) -> Result<Self> {
        self.try_div_rem(divisor).map(|(q, _)| q)
    }

    /// Remainder with the sign of the dividend.
    pub fn try_rem(&self, divisor: &Self) -> Result<Self> {
        self.try_div_rem(divisor).map(|(_, r)| r)
    }

    /// Checked division. Returns `None` if `divisor` is zero.
    #[inline]
    pub fn checked_div(&self, divisor: &Self) -> Option<Self> {
        self.try_div(divisor).ok()
    }

    /// Checked remainder. Returns `None` if `divisor` is zero.
    #[inline]
    pub fn checked_rem(&self, divisor: &Self) -> Option<Self> {
        self.try_rem(divisor).ok()
    }

    /// Non-negative residue in `[0, m)`.
    ///
    /// # Errors
    /// Returns `ArithmeticError::InvalidModulus` unless `m > 0`.
    pub fn modulo(&self, m: &Self) -> Result<Self> {
        if !m.is_positive() {
            return Err(ArithmeticError::InvalidModulus);
        }
        let r = self.try_rem(m)?;
        Ok(if r.is_negative() { r.add_ref(m) } else { r })
    }

    /// Divides by a small non-zero word, returning the word remainder.
    pub(crate) fn div_rem_small(&self, d: Word) -> (Self, Word) {
        let (q, r) = div_rem_word(&self.mag, d);
        (Self::from_parts(self.sign, q), r)
    }
}

// ============================================================================
// Power
// ============================================================================

impl BigInteger {
    /// Raises `self` to `exp` by square-and-multiply.
    ///
    /// # Errors
    /// Returns `ArithmeticError::InvalidOperation` if the result would exceed
    /// [`MAX_MAGNITUDE_WORDS`](crate::MAX_MAGNITUDE_WORDS).
    pub fn pow(&self, exp: u32) -> Result<Self> {
        if exp == 0 {
            return Ok(Self::one());
        }
        if self.is_zero() || exp == 1 || (self.mag.len() == 1 && self.mag[0] == 1) {
            let sign = if self.is_negative() && exp % 2 == 0 {
                Sign::Plus
            } else {
                self.sign
            };
            return Ok(Self::from_parts(sign, self.mag.clone()));
        }
        let bits = self.bit_length_abs() as u128 * exp as u128;
        check_magnitude_words(bits / BITS as u128 + 1)?;

        // Factor out powers of two so the loop only squares odd parts.
        let tz = trailing_zeros_mag(&self.mag);
        let odd = shr_bits(&self.mag, tz);
        let mut acc: Vec<Word> = vec![1];
        let mut base = odd;
        let mut e = exp;
        while e > 0 {
            if e & 1 == 1 {
                acc = mul_mag(&acc, &base);
            }
            e >>= 1;
            if e > 0 {
                base = square(&base);
            }
        }
        let mag = shl_bits(&acc, tz * exp as u64);
        let sign = if self.is_negative() && exp % 2 == 1 {
            Sign::Minus
        } else {
            Sign::Plus
        };
        Ok(Self::from_parts(sign, mag))
    }
}

// ============================================================================
// Shifts and Bit Length
// ============================================================================

impl BigInteger {
    /// Bit length of the magnitude (0 for zero).
    #[inline]
    pub(crate) fn bit_length_abs(&self) -> u64 {
        bit_length_mag(&self.mag)
    }

    /// Number of bits in the minimal two's-complement representation,
    /// excluding the sign bit.
    ///
    /// Equals the magnitude's bit length for non-negative values; for a
    /// negative power of two it is one less (`-8` fits in `1000`).
    pub fn bit_length(&self) -> u64 {
        let len = self.bit_length_abs();
        if self.is_negative() && trailing_zeros_mag(&self.mag) + 1 == len {
            len - 1
        } else {
            len
        }
    }

    /// Index of the lowest set bit, or `None` for zero.
    pub fn lowest_set_bit(&self) -> Option<u64> {
        if self.is_zero() {
            None
        } else {
            let i = self.first_nonzero_word();
            Some(i as u64 * BITS as u64 + self.mag[i].trailing_zeros() as u64)
        }
    }

    /// Returns `self * 2^n`.
    ///
    /// # Errors
    /// Returns `ArithmeticError::InvalidOperation` if the result would exceed
    /// [`MAX_MAGNITUDE_WORDS`](crate::MAX_MAGNITUDE_WORDS).
    pub fn try_shift_left(&self, n: u64) -> Result<Self> {
        if self.is_zero() || n == 0 {
            return Ok(self.clone());
        }
        check_magnitude_words((self.bit_length_abs() as u128 + n as u128) / BITS as u128 + 1)?;
        Ok(Self::from_parts(self.sign, shl_bits(&self.mag, n)))
    }

    /// Returns `self * 2^n`.
    ///
    /// # Panics
    /// Panics when [`try_shift_left`](Self::try_shift_left) would fail.
    #[inline]
    pub fn shift_left(&self, n: u64) -> Self {
        self.try_shift_left(n)
            .expect("attempt to shift left with overflow")
    }

    /// Returns `floor(self / 2^n)`, the arithmetic shift of the
    /// two's-complement form.
    pub fn shift_right(&self, n: u64) -> Self {
        if self.is_zero() || n == 0 {
            return self.clone();
        }
        let shifted = shr_bits(&self.mag, n);
        if self.is_negative() {
            let first = self.first_nonzero_word() as u64 * BITS as u64;
            let mag = if first < n && any_low_bits(&self.mag, n) {
                add_mag(&shifted, &[1])
            } else {
                shifted
            };
            Self::from_parts(Sign::Minus, mag)
        } else {
            Self::from_parts(Sign::Plus, shifted)
        }
    }
}

impl Shl<u32> for &BigInteger {
    type Output = BigInteger;

    #[inline]
    fn shl(self, rhs: u32) -> BigInteger {
        self.shift_left(rhs as u64)
    }
}

impl Shl<u32> for BigInteger {
    type Output = BigInteger;

    #[inline]
    fn shl(self, rhs: u32) -> BigInteger {
        self.shift_left(rhs as u64)
    }
}

impl Shr<u32> for &BigInteger {
    type Output = BigInteger;

    #[inline]
    fn shr(self, rhs: u32) -> BigInteger {
        self.shift_right(rhs as u64)
    }
}

impl Shr<u32> for BigInteger {
    type Output = BigInteger;

    #[inline]
    fn shr(self, rhs: u32) -> BigInteger {
        self.shift_right(rhs as u64)
    }
}

impl ShlAssign<u32> for BigInteger {
    fn shl_assign(&mut self, rhs: u32) {
        *self = self.shift_left(rhs as u64);
    }
}

impl ShrAssign<u32> for BigInteger {
    fn shr_assign(&mut self, rhs: u32) {
        *self = self.shift_right(rhs as u64);
    }
}

// ============================================================================
// Native Conversions
// ============================================================================

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {$(
        impl From<$t> for BigInteger {
            #[inline]
            fn from(value: $t) -> Self {
                Self::from_parts(Sign::Plus, from_u64(value as u64))
            }
        }
    )*};
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {$(
        impl From<$t> for BigInteger {
            #[inline]
            fn from(value: $t) -> Self {
                let sign = if value < 0 { Sign::Minus } else { Sign::Plus };
                Self::from_parts(sign, from_u64((value as i64).unsigned_abs()))
            }
        }
    )*};
}

impl_from_unsigned!(u8, u16, u32, u64, usize);
impl_from_signed!(i8, i16, i32, i64, isize);

impl From<u128> for BigInteger {
    fn from(value: u128) -> Self {
        Self::from_parts(Sign::Plus, from_u128(value))
    }
}

impl From<i128> for BigInteger {
    fn from(value: i128) -> Self {
        let sign = if value < 0 { Sign::Minus } else { Sign::Plus };
        Self::from_parts(sign, from_u128(value.unsigned_abs()))
    }
}

impl BigInteger {
    /// Low 64 bits of the two's-complement form.
    ///
    /// Values outside `i64` are truncated, as a primitive `as` cast would.
    pub fn to_i64_wrapping(&self) -> i64 {
        let low = low_u64(&self.mag);
        if self.is_negative() {
            low.wrapping_neg() as i64
        } else {
            low as i64
        }
    }

    /// Low 32 bits of the two's-complement form.
    #[inline]
    pub fn to_i32_wrapping(&self) -> i32 {
        self.to_i64_wrapping() as i32
    }

    /// Low 64 bits of the two's-complement form, as unsigned.
    #[inline]
    pub fn to_u64_wrapping(&self) -> u64 {
        self.to_i64_wrapping() as u64
    }

    /// Exact conversion to `i64`.
    ///
    /// # Errors
    /// Returns `ArithmeticError::Overflow` if the value is outside `i64`.
    pub fn to_i64_exact(&self) -> Result<i64> {
        if self.bit_length() < 64 {
            Ok(self.to_i64_wrapping())
        } else {
            Err(ArithmeticError::Overflow)
        }
    }

    /// Exact conversion to `i32`.
    pub fn to_i32_exact(&self) -> Result<i32> {
        if self.bit_length() < 32 {
            Ok(self.to_i32_wrapping())
        } else {
            Err(ArithmeticError::Overflow)
        }
    }

    /// Exact conversion to `u64`.
    pub fn to_u64_exact(&self) -> Result<u64> {
        if !self.is_negative() && self.bit_length() <= 64 {
            Ok(low_u64(&self.mag))
        } else {
            Err(ArithmeticError::Overflow)
        }
    }

    /// Exact conversion to `i128`, if the value fits.
    pub(crate) fn to_i128(&self) -> Option<i128> {
        if self.bit_length() >= 128 {
            return None;
        }
        let mut abs: u128 = 0;
        for (i, &w) in self.mag.iter().enumerate().take(4) {
            abs |= (w as u128) << (BITS as usize * i);
        }
        Some(if self.is_negative() {
            (abs as i128).wrapping_neg()
        } else {
            abs as i128
        })
    }

    /// Nearest `f64`, rounding half to even; saturates to ±infinity.
    pub fn to_f64(&self) -> f64 {
        let len = self.bit_length_abs();
        let abs = if len <= 64 {
            low_u64(&self.mag) as f64
        } else if len > 1024 {
            f64::INFINITY
        } else {
            // Keep the top 64 bits and fold every discarded bit into a sticky
            // bit, so the single u64 -> f64 rounding is still correct.
            let shift = len - 64;
            let mut top = low_u64(&shr_bits(&self.mag, shift));
            if any_low_bits(&self.mag, shift) {
                top |= 1;
            }
            let mut value = top as f64;
            let mut remaining = shift as i32;
            while remaining > 0 {
                let step = remaining.min(1000);
                value *= f64::powi(2.0, step);
                remaining -= step;
            }
            value
        };
        if self.is_negative() { -abs } else { abs }
    }
}

impl ToPrimitive for BigInteger {
    fn to_i64(&self) -> Option<i64> {
        self.to_i64_exact().ok()
    }

    fn to_u64(&self) -> Option<u64> {
        self.to_u64_exact().ok()
    }

    fn to_i128(&self) -> Option<i128> {
        BigInteger::to_i128(self)
    }

    fn to_f64(&self) -> Option<f64> {
        Some(BigInteger::to_f64(self))
    }
}

impl FromPrimitive for BigInteger {
    fn from_i64(n: i64) -> Option<Self> {
        Some(Self::from(n))
    }

    fn from_u64(n: u64) -> Option<Self> {
        Some(Self::from(n))
    }

    fn from_i128(n: i128) -> Option<Self> {
        Some(Self::from(n))
    }

    fn from_u128(n: u128) -> Option<Self> {
        Some(Self::from(n))
    }

    /// Truncates toward zero; `None` for NaN and infinities.
    fn from_f64(n: f64) -> Option<Self> {
        if !n.is_finite() {
            return None;
        }
        let bits = n.to_bits();
        let exponent = ((bits >> 52) & 0x7FF) as i64;
        let fraction = bits & ((1u64 << 52) - 1);
        if exponent < 1023 {
            return Some(Self::zero());
        }
        let mantissa = fraction | (1u64 << 52);
        let shift = exponent - 1075;
        let abs = Self::from(mantissa);
        let abs = if shift >= 0 {
            abs.shift_left(shift as u64)
        } else {
            abs.shift_right((-shift) as u64)
        };
        Some(if n < 0.0 { abs.negate() } else { abs })
    }
}

// ============================================================================
// Byte Conversions
// ============================================================================

impl BigInteger {
    /// Minimal big-endian two's-complement bytes.
    pub fn to_signed_bytes_be(&self) -> Vec<u8> {
        let byte_len = (self.bit_length() / 8 + 1) as usize;
        let mut out = vec![0u8; byte_len];
        let negative = self.is_negative();
        // Two's complement of the magnitude, computed byte by byte from the
        // least significant end.
        let mut carry = 1u16;
        for i in 0..byte_len {
            let word = self.mag.get(i / 4).copied().unwrap_or(0);
            let byte = (word >> (8 * (i % 4))) as u8;
            out[byte_len - 1 - i] = if negative {
                let v = (!byte) as u16 + carry;
                carry = v >> 8;
                v as u8
            } else {
                byte
            };
        }
        out
    }

    /// Parses big-endian two's-complement bytes.
    pub fn from_signed_bytes_be(bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            return Self::zero();
        }
        let negative = bytes[0] & 0x80 != 0;
        let mut mag = vec![0 as Word; bytes.len().div_ceil(4)];
        let mut carry = 1u16;
        for (i, &b) in bytes.iter().rev().enumerate() {
            let byte = if negative {
                let v = (!b) as u16 + carry;
                carry = v >> 8;
                v as u8
            } else {
                b
            };
            mag[i / 4] |= (byte as Word) << (8 * (i % 4));
        }
        let sign = if negative { Sign::Minus } else { Sign::Plus };
        Self::from_parts(sign, mag)
    }
}

// ============================================================================
// String Parsing and Formatting
// ============================================================================

/// Largest power of `radix` that fits in a word, and its exponent.
fn radix_chunk(radix: u32) -> (Word, usize) {
    let mut power: u64 = radix as u64;
    let mut digits = 1;
    while power * radix as u64 <= u32::MAX as u64 {
        power *= radix as u64;
        digits += 1;
    }
    (power as Word, digits)
}

impl BigInteger {
    /// Parses digits in `radix` (2..=36) with an optional leading `+` or `-`.
    ///
    /// # Errors
    /// Returns `ArithmeticError::InvalidFormat` for an empty string, a bad
    /// digit or an unsupported radix.
    pub fn from_str_radix(s: &str, radix: u32) -> Result<Self> {
        if !(2..=36).contains(&radix) {
            return Err(ArithmeticError::InvalidFormat);
        }
        let bytes = s.as_bytes();
        let (sign, digits) = match bytes.first() {
            Some(b'-') => (Sign::Minus, &bytes[1..]),
            Some(b'+') => (Sign::Plus, &bytes[1..]),
            _ => (Sign::Plus, bytes),
        };
        Self::from_digit_bytes(sign, digits, radix)
    }

    /// Builds a value from ASCII digits (no sign) in `radix`.
    pub(crate) fn from_digit_bytes(sign: Sign, digits: &[u8], radix: u32) -> Result<Self> {
        if digits.is_empty() {
            return Err(ArithmeticError::InvalidFormat);
        }
        let (chunk_pow, chunk_len) = radix_chunk(radix);
        let mut mag: Vec<Word> = Vec::with_capacity(digits.len() / chunk_len + 1);
        let first = digits.len() % chunk_len;
        let mut start = 0;
        let mut end = if first == 0 { chunk_len } else { first };
        while start < digits.len() {
            let mut chunk: Word = 0;
            for &b in &digits[start..end] {
                let d = (b as char)
                    .to_digit(radix)
                    .ok_or(ArithmeticError::InvalidFormat)?;
                chunk = chunk * radix + d;
            }
            let mul = if start == 0 {
                radix.pow((end - start) as u32)
            } else {
                chunk_pow
            };
            mul_add_word_in_place(&mut mag, mul, chunk);
            start = end;
            end += chunk_len;
        }
        Ok(Self::from_parts(sign, mag))
    }

    /// Formats the value in `radix` (2..=36), lowercase digits.
    ///
    /// # Panics
    /// Panics if `radix` is outside `2..=36`.
    pub fn to_str_radix(&self, radix: u32) -> String {
        assert!((2..=36).contains(&radix), "radix must be in 2..=36");
        if self.is_zero() {
            return String::from("0");
        }
        let (chunk_pow, chunk_len) = radix_chunk(radix);
        let mut chunks: Vec<Word> = Vec::new();
        let mut rest = self.mag.clone();
        while !is_zero(&rest) {
            let (q, r) = div_rem_word(&rest, chunk_pow);
            chunks.push(r);
            rest = q;
        }
        let mut out: Vec<u8> = Vec::with_capacity(chunks.len() * chunk_len + 1);
        if self.is_negative() {
            out.push(b'-');
        }
        for (i, &chunk) in chunks.iter().rev().enumerate() {
            let mut buf = [b'0'; 32];
            let mut n = chunk;
            let mut pos = chunk_len;
            while n > 0 {
                pos -= 1;
                buf[pos] = char::from_digit(n % radix, radix).unwrap_or('0') as u8;
                n /= radix;
            }
            // Leading chunk is unpadded; the rest keep their zeros.
            let from = if i == 0 { pos } else { 0 };
            out.extend_from_slice(&buf[from..chunk_len]);
        }
        String::from_utf8(out).unwrap_or_default()
    }
}

impl FromStr for BigInteger {
    type Err = ArithmeticError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_radix(s, 10)
    }
}

impl fmt::Display for BigInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.to_str_radix(10);
        let (non_negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (false, rest),
            None => (true, s.as_str()),
        };
        f.pad_integral(non_negative, "", digits)
    }
}

impl fmt::Debug for BigInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            // {:#?} shows raw internals
            f.debug_struct("BigInteger")
                .field("sign", &self.sign)
                .field("mag", &self.mag)
                .finish()
        } else {
            write!(f, "BigInteger({})", self)
        }
    }
}

impl fmt::LowerHex for BigInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.to_str_radix(16);
        let (non_negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (false, rest),
            None => (true, s.as_str()),
        };
        f.pad_integral(non_negative, "0x", digits)
    }
}

// ============================================================================
// Operator Overloading
// ============================================================================

macro_rules! forward_binop {
    (impl $imp:ident, $method:ident, $inner:expr) => {
        impl $imp<&BigInteger> for &BigInteger {
            type Output = BigInteger;

            #[inline]
            fn $method(self, rhs: &BigInteger) -> BigInteger {
                $inner(self, rhs)
            }
        }

        impl $imp<BigInteger> for &BigInteger {
            type Output = BigInteger;

            #[inline]
            fn $method(self, rhs: BigInteger) -> BigInteger {
                $inner(self, &rhs)
            }
        }

        impl $imp<&BigInteger> for BigInteger {
            type Output = BigInteger;

            #[inline]
            fn $method(self, rhs: &BigInteger) -> BigInteger {
                $inner(&self, rhs)
            }
        }

        impl $imp<BigInteger> for BigInteger {
            type Output = BigInteger;

            #[inline]
            fn $method(self, rhs: BigInteger) -> BigInteger {
                $inner(&self, &rhs)
            }
        }
    };
}

macro_rules! forward_assign {
    (impl $imp:ident, $method:ident, $op:tt) => {
        impl $imp<&BigInteger> for BigInteger {
            #[inline]
            fn $method(&mut self, rhs: &BigInteger) {
                *self = &*self $op rhs;
            }
        }

        impl $imp<BigInteger> for BigInteger {
            #[inline]
            fn $method(&mut self, rhs: BigInteger) {
                *self = &*self $op &rhs;
            }
        }
    };
}

fn div_or_panic(a: &BigInteger, b: &BigInteger) -> BigInteger {
    a.try_div(b).expect("attempt to divide by zero")
}

fn rem_or_panic(a: &BigInteger, b: &BigInteger) -> BigInteger {
    a.try_rem(b)
        .expect("attempt to calculate the remainder with a divisor of zero")
}

forward_binop!(impl Add, add, BigInteger::add_ref);
forward_binop!(impl Sub, sub, BigInteger::sub_ref);
forward_binop!(impl Mul, mul, BigInteger::mul_ref);
forward_binop!(impl Div, div, div_or_panic);
forward_binop!(impl Rem, rem, rem_or_panic);

forward_assign!(impl AddAssign, add_assign, +);
forward_assign!(impl SubAssign, sub_assign, -);
forward_assign!(impl MulAssign, mul_assign, *);
forward_assign!(impl DivAssign, div_assign, /);
forward_assign!(impl RemAssign, rem_assign, %);

impl Neg for BigInteger {
    type Output = BigInteger;

    #[inline]
    fn neg(mut self) -> BigInteger {
        self.sign = -self.sign;
        self
    }
}

impl Neg for &BigInteger {
    type Output = BigInteger;

    #[inline]
    fn neg(self) -> BigInteger {
        self.negate()
    }
}

impl Sum for BigInteger {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a BigInteger> for BigInteger {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, x| acc + x)
    }
}

impl Product for BigInteger {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::one(), |acc, x| acc * x)
    }
}

impl<'a> Product<&'a BigInteger> for BigInteger {
    fn product<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::one(), |acc, x| acc * x)
    }
}

// ============================================================================
// num-traits / num-integer
// ============================================================================

impl Zero for BigInteger {
    #[inline]
    fn zero() -> Self {
        BigInteger::zero()
    }

    #[inline]
    fn is_zero(&self) -> bool {
        BigInteger::is_zero(self)
    }
}

impl One for BigInteger {
    #[inline]
    fn one() -> Self {
        BigInteger::one()
    }
}

impl Num for BigInteger {
    type FromStrRadixErr = ArithmeticError;

    fn from_str_radix(s: &str, radix: u32) -> Result<Self> {
        BigInteger::from_str_radix(s, radix)
    }
}

impl Signed for BigInteger {
    fn abs(&self) -> Self {
        BigInteger::abs(self)
    }

    fn abs_sub(&self, other: &Self) -> Self {
        if self <= other {
            Self::zero()
        } else {
            self - other
        }
    }

    fn signum(&self) -> Self {
        Self::from(BigInteger::signum(self))
    }

    fn is_positive(&self) -> bool {
        BigInteger::is_positive(self)
    }

    fn is_negative(&self) -> bool {
        BigInteger::is_negative(self)
    }
}

impl Integer for BigInteger {
    fn div_floor(&self, other: &Self) -> Self {
        let (q, r) = self
            .try_div_rem(other)
            .expect("attempt to divide by zero");
        if !r.is_zero() && (r.sign != other.sign) {
            q - Self::one()
        } else {
            q
        }
    }

    fn mod_floor(&self, other: &Self) -> Self {
        let r = rem_or_panic(self, other);
        if !r.is_zero() && (r.sign != other.sign) {
            r + other
        } else {
            r
        }
    }

    fn gcd(&self, other: &Self) -> Self {
        BigInteger::gcd(self, other)
    }

    fn lcm(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }
        let g = BigInteger::gcd(self, other);
        (self / &g * other).abs()
    }

    fn is_multiple_of(&self, other: &Self) -> bool {
        if other.is_zero() {
            return self.is_zero();
        }
        rem_or_panic(self, other).is_zero()
    }

    fn is_even(&self) -> bool {
        self.mag[0] & 1 == 0
    }

    fn is_odd(&self) -> bool {
        self.mag[0] & 1 == 1
    }

    fn div_rem(&self, other: &Self) -> (Self, Self) {
        self.try_div_rem(other).expect("attempt to divide by zero")
    }
}

// ============================================================================
// Serde Support
// ============================================================================

#[cfg(feature = "serde")]
impl Serialize for BigInteger {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            self.to_signed_bytes_be().serialize(serializer)
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for BigInteger {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Self::from_str(&s).map_err(de::Error::custom)
        } else {
            let bytes = Vec::<u8>::deserialize(deserializer)?;
            Ok(Self::from_signed_bytes_be(&bytes))
        }
    }
}

#[cfg(feature = "zeroize")]
impl zeroize::Zeroize for BigInteger {
    fn zeroize(&mut self) {
        self.mag.zeroize();
        self.mag.push(0);
        self.sign = Sign::NoSign;
        self.first_nonzero.store(FIRST_NONZERO_UNSET, AtomicOrdering::Relaxed);
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn test_serialize_json() {
        let v = BigInteger::from_str("-123456789012345678901234567890").unwrap();
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, r#""-123456789012345678901234567890""#);
        let back: BigInteger = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }

    #[test]
    fn test_bincode_round_trip() {
        let v = BigInteger::from_str("98765432109876543210").unwrap();
        let bytes = bincode::serialize(&v).unwrap();
        let back: BigInteger = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, v);
    }
}

#[cfg(test)]
mod property_tests {
    use std::string::ToString;

    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_matches_i128(a in any::<i64>(), b in any::<i64>()) {
            let x = BigInteger::from(a);
            let y = BigInteger::from(b);
            prop_assert_eq!((&x + &y).to_i128(), Some(a as i128 + b as i128));
            prop_assert_eq!((&x - &y).to_i128(), Some(a as i128 - b as i128));
            prop_assert_eq!((&x * &y).to_i128(), Some(a as i128 * b as i128));
            if b != 0 {
                let (q, r) = x.try_div_rem(&y).unwrap();
                prop_assert_eq!(q.to_i128(), Some(a as i128 / b as i128));
                prop_assert_eq!(r.to_i128(), Some(a as i128 % b as i128));
            }
        }

        #[test]
        fn prop_string_round_trip(a in any::<i128>()) {
            let x = BigInteger::from(a);
            prop_assert_eq!(x.to_string(), a.to_string());
            prop_assert_eq!(BigInteger::from_str(&a.to_string()).unwrap(), x);
        }

        #[test]
        fn prop_shift_right_is_floor_division(a in any::<i64>(), n in 0u32..70) {
            let x = BigInteger::from(a);
            let expected = (a as i128) >> n.min(127);
            prop_assert_eq!((&x >> n).to_i128(), Some(expected));
        }

        #[test]
        fn prop_wrapping_matches_cast(a in any::<i128>()) {
            let x = BigInteger::from(a);
            prop_assert_eq!(x.to_i64_wrapping(), a as i64);
            prop_assert_eq!(x.to_i32_wrapping(), a as i32);
        }
    }
}
