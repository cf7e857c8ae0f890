//! Powers of ten and five, digit counting, and the magnitude size ceiling.

use alloc::boxed::Box;
use alloc::vec::Vec;

use once_cell::race::OnceBox;

use crate::biginteger::{BigInteger, Sign};
use crate::digits::bit_length_mag;
use crate::multiplication::mul_u64;
use crate::{ArithmeticError, Result};

/// Largest magnitude, in 32-bit words, any operation may produce.
///
/// Requests whose result would exceed it fail with
/// [`ArithmeticError::InvalidOperation`] before allocating.
pub const MAX_MAGNITUDE_WORDS: usize = 1 << 25;

/// 10^0 ..= 10^19, every power of ten that fits in a `u64`.
pub(crate) const TEN_POW_U64: [u64; 20] = {
    let mut table = [1u64; 20];
    let mut i = 1;
    while i < 20 {
        table[i] = table[i - 1] * 10;
        i += 1;
    }
    table
};

/// 5^0 ..= 5^27, every power of five that fits in a `u64`.
pub(crate) const FIVE_POW_U64: [u64; 28] = {
    let mut table = [1u64; 28];
    let mut i = 1;
    while i < 28 {
        table[i] = table[i - 1] * 5;
        i += 1;
    }
    table
};

const CACHED_POWERS: usize = 64;

static TEN_POW_CACHE: OnceBox<Vec<BigInteger>> = OnceBox::new();
static FIVE_POW_CACHE: OnceBox<Vec<BigInteger>> = OnceBox::new();

fn build_table(base: u32) -> Box<Vec<BigInteger>> {
    let mut table = Vec::with_capacity(CACHED_POWERS);
    let mut p = BigInteger::one();
    for _ in 0..CACHED_POWERS {
        table.push(p.clone());
        p = BigInteger::from_parts(Sign::Plus, mul_u64(&p.mag, base as u64));
    }
    Box::new(table)
}

/// Fails when a result of `words` words would pass [`MAX_MAGNITUDE_WORDS`].
pub(crate) fn check_magnitude_words(words: u128) -> Result<()> {
    if words > MAX_MAGNITUDE_WORDS as u128 {
        tracing::debug!(words = %words, limit = MAX_MAGNITUDE_WORDS, "magnitude ceiling exceeded");
        Err(ArithmeticError::InvalidOperation)
    } else {
        Ok(())
    }
}

/// Upper bound on the bits of `10^n`.
#[inline]
fn ten_pow_bits(n: u64) -> u128 {
    n as u128 * 3_321_929 / 1_000_000 + 1
}

/// Returns `10^n`.
///
/// # Errors
/// Returns `ArithmeticError::InvalidOperation` if the power would exceed the
/// magnitude ceiling.
pub(crate) fn ten_pow(n: u64) -> Result<BigInteger> {
    if n < CACHED_POWERS as u64 {
        let table = TEN_POW_CACHE.get_or_init(|| build_table(10));
        return Ok(table[n as usize].clone());
    }
    check_magnitude_words(ten_pow_bits(n) / 32 + 1)?;
    // 10^n = 5^n * 2^n
    Ok(five_pow(n)?.shift_left(n))
}

/// Returns `5^n`.
pub(crate) fn five_pow(n: u64) -> Result<BigInteger> {
    if n < CACHED_POWERS as u64 {
        let table = FIVE_POW_CACHE.get_or_init(|| build_table(5));
        return Ok(table[n as usize].clone());
    }
    check_magnitude_words(n as u128 * 2_321_929 / 1_000_000 / 32 + 2)?;
    let exp = u32::try_from(n).map_err(|_| ArithmeticError::InvalidOperation)?;
    BigInteger::from(5u32).pow(exp)
}

/// Returns `value * 10^n`.
pub(crate) fn multiply_by_ten_pow(value: &BigInteger, n: u64) -> Result<BigInteger> {
    if value.is_zero() || n == 0 {
        return Ok(value.clone());
    }
    if n < TEN_POW_U64.len() as u64 {
        return Ok(BigInteger::from_parts(
            value.sign,
            mul_u64(&value.mag, TEN_POW_U64[n as usize]),
        ));
    }
    check_magnitude_words((bit_length_mag(&value.mag) as u128 + ten_pow_bits(n)) / 32 + 1)?;
    Ok(value * &ten_pow(n)?)
}

/// Returns `value * 5^n`.
pub(crate) fn multiply_by_five_pow(value: &BigInteger, n: u64) -> Result<BigInteger> {
    if value.is_zero() || n == 0 {
        return Ok(value.clone());
    }
    if n < FIVE_POW_U64.len() as u64 {
        return Ok(BigInteger::from_parts(
            value.sign,
            mul_u64(&value.mag, FIVE_POW_U64[n as usize]),
        ));
    }
    Ok(value * &five_pow(n)?)
}

// ============================================================================
// Digit counting
// ============================================================================

/// Decimal digits of a `u64` (1 for zero).
pub(crate) fn u64_digits(v: u64) -> u32 {
    match TEN_POW_U64.iter().position(|&p| v < p) {
        Some(0) => 1,
        Some(i) => i as u32,
        None => 20,
    }
}

/// floor(log10(2) * 10^15)
const LOG10_2_SCALED: u128 = 301_029_995_663_981;

/// Decimal digits of `(bit_length - 1) * log10(2) + 1`, a lower bound on the
/// digits of any value with that bit length.
#[inline]
pub(crate) fn approx_digits_from_bits(bit_length: u64) -> u64 {
    if bit_length == 0 {
        return 1;
    }
    ((bit_length - 1) as u128 * LOG10_2_SCALED / 1_000_000_000_000_000) as u64 + 1
}

/// Exact number of decimal digits in `|value|` (1 for zero).
pub(crate) fn decimal_digits(value: &BigInteger) -> u64 {
    if let Some(v) = crate::digits::to_u64(&value.mag) {
        return u64_digits(v) as u64;
    }
    let mut digits = approx_digits_from_bits(bit_length_mag(&value.mag));
    // The estimate never overshoots and is at most one short.
    while let Ok(p) = ten_pow(digits) {
        if crate::digits::cmp_mag(&value.mag, &p.mag) == core::cmp::Ordering::Less {
            break;
        }
        digits += 1;
    }
    digits
}
