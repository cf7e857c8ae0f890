//! Magnitude words and the elementary operations every other engine builds on.
//!
//! A magnitude is a little-endian slice of 32-bit words. A *canonical*
//! magnitude has no leading (most significant) zero word, except the single
//! word `[0]` that represents zero.

use alloc::vec;
use alloc::vec::Vec;
use core::cmp::Ordering;

/// One magnitude word.
pub(crate) type Word = u32;

/// Twice the width of a [`Word`], used for carries and products.
pub(crate) type DoubleWord = u64;

/// Bits per word.
pub(crate) const BITS: u32 = 32;

#[inline(always)]
pub(crate) const fn lo(d: DoubleWord) -> Word {
    d as Word
}

#[inline(always)]
pub(crate) const fn hi(d: DoubleWord) -> Word {
    (d >> BITS) as Word
}

// ============================================================================
// Normalization
// ============================================================================

/// Strips leading zero words, leaving `[0]` for zero.
#[inline]
pub(crate) fn normalize(mag: &mut Vec<Word>) {
    while mag.len() > 1 && mag[mag.len() - 1] == 0 {
        mag.pop();
    }
    if mag.is_empty() {
        mag.push(0);
    }
}

/// Length of `mag` once leading zero words are ignored (at least 1).
#[inline]
pub(crate) fn significant_len(mag: &[Word]) -> usize {
    let mut len = mag.len();
    while len > 1 && mag[len - 1] == 0 {
        len -= 1;
    }
    len.max(1)
}

#[inline]
pub(crate) fn is_zero(mag: &[Word]) -> bool {
    mag.iter().all(|&w| w == 0)
}

/// Index of the lowest non-zero word, or `mag.len()` for zero.
#[inline]
pub(crate) fn first_nonzero(mag: &[Word]) -> usize {
    mag.iter().position(|&w| w != 0).unwrap_or(mag.len())
}

// ============================================================================
// Comparison
// ============================================================================

/// Compares two magnitudes: length first, then most significant word first.
///
/// Leading zero words are tolerated so callers may pass scratch buffers.
pub(crate) fn cmp_mag(a: &[Word], b: &[Word]) -> Ordering {
    let a = &a[..significant_len(a)];
    let b = &b[..significant_len(b)];
    match a.len().cmp(&b.len()) {
        Ordering::Equal => {}
        other => return other,
    }
    for (x, y) in a.iter().rev().zip(b.iter().rev()) {
        match x.cmp(y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

// ============================================================================
// Addition / Subtraction
// ============================================================================

/// Returns `a + b`.
pub(crate) fn add_mag(a: &[Word], b: &[Word]) -> Vec<Word> {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut out = Vec::with_capacity(long.len() + 1);
    let mut carry: DoubleWord = 0;
    for i in 0..long.len() {
        let s = long[i] as DoubleWord + short.get(i).copied().unwrap_or(0) as DoubleWord + carry;
        out.push(lo(s));
        carry = s >> BITS;
    }
    if carry != 0 {
        out.push(carry as Word);
    }
    normalize(&mut out);
    out
}

/// `acc += b << (shift * BITS)`, growing `acc` as needed.
pub(crate) fn add_shifted_assign(acc: &mut Vec<Word>, b: &[Word], shift: usize) {
    let b = &b[..significant_len(b)];
    if is_zero(b) {
        return;
    }
    if acc.len() < shift + b.len() {
        acc.resize(shift + b.len(), 0);
    }
    let mut carry: DoubleWord = 0;
    for (i, &w) in b.iter().enumerate() {
        let s = acc[shift + i] as DoubleWord + w as DoubleWord + carry;
        acc[shift + i] = lo(s);
        carry = s >> BITS;
    }
    let mut i = shift + b.len();
    while carry != 0 {
        if i == acc.len() {
            acc.push(0);
        }
        let s = acc[i] as DoubleWord + carry;
        acc[i] = lo(s);
        carry = s >> BITS;
        i += 1;
    }
}

/// Returns `a - b`. Requires `a >= b`.
pub(crate) fn sub_mag(a: &[Word], b: &[Word]) -> Vec<Word> {
    debug_assert!(cmp_mag(a, b) != Ordering::Less);
    let mut out = a.to_vec();
    sub_assign_mag(&mut out, b);
    normalize(&mut out);
    out
}

/// `a -= b` in place. Requires `a >= b`; `a` is left unnormalized.
pub(crate) fn sub_assign_mag(a: &mut [Word], b: &[Word]) {
    let b = &b[..significant_len(b)];
    let mut borrow: i64 = 0;
    for i in 0..a.len() {
        let rhs = b.get(i).copied().unwrap_or(0) as i64;
        if i >= b.len() && borrow == 0 {
            break;
        }
        let d = a[i] as i64 - rhs + borrow;
        a[i] = d as Word;
        borrow = d >> BITS;
    }
    debug_assert!(borrow == 0, "magnitude subtraction underflow");
}

/// Returns `|a - b|` and whether `a < b`.
pub(crate) fn abs_diff(a: &[Word], b: &[Word]) -> (Vec<Word>, bool) {
    match cmp_mag(a, b) {
        Ordering::Less => (sub_mag(b, a), true),
        _ => (sub_mag(a, b), false),
    }
}

/// Adds a single word, returning a new canonical magnitude.
pub(crate) fn add_word(a: &[Word], w: Word) -> Vec<Word> {
    add_mag(a, &[w])
}

// ============================================================================
// Shifts and bit queries
// ============================================================================

/// Returns `mag << n` (bits).
pub(crate) fn shl_bits(mag: &[Word], n: u64) -> Vec<Word> {
    if is_zero(mag) {
        return vec![0];
    }
    let words = (n / BITS as u64) as usize;
    let bits = (n % BITS as u64) as u32;
    let mag = &mag[..significant_len(mag)];
    let mut out = Vec::with_capacity(words + mag.len() + 1);
    out.resize(words, 0);
    if bits == 0 {
        out.extend_from_slice(mag);
    } else {
        let mut carry: Word = 0;
        for &w in mag {
            out.push((w << bits) | carry);
            carry = w >> (BITS - bits);
        }
        if carry != 0 {
            out.push(carry);
        }
    }
    normalize(&mut out);
    out
}

/// Returns `mag >> n` (bits), truncating.
pub(crate) fn shr_bits(mag: &[Word], n: u64) -> Vec<Word> {
    let words = n / BITS as u64;
    if words >= mag.len() as u64 {
        return vec![0];
    }
    let words = words as usize;
    let bits = (n % BITS as u64) as u32;
    let src = &mag[words..];
    let mut out = Vec::with_capacity(src.len());
    if bits == 0 {
        out.extend_from_slice(src);
    } else {
        for i in 0..src.len() {
            let high = src.get(i + 1).copied().unwrap_or(0);
            out.push((src[i] >> bits) | (high << (BITS - bits)));
        }
    }
    normalize(&mut out);
    out
}

/// True if any of the lowest `n` bits of `mag` is set.
pub(crate) fn any_low_bits(mag: &[Word], n: u64) -> bool {
    let words = (n / BITS as u64).min(mag.len() as u64) as usize;
    if mag[..words].iter().any(|&w| w != 0) {
        return true;
    }
    let bits = (n % BITS as u64) as u32;
    bits != 0 && words < mag.len() && mag[words] & ((1 << bits) - 1) != 0
}

/// Number of significant bits of a magnitude (0 for zero).
#[inline]
pub(crate) fn bit_length_mag(mag: &[Word]) -> u64 {
    let len = significant_len(mag);
    let top = mag[len - 1];
    if top == 0 {
        return 0;
    }
    (len as u64 - 1) * BITS as u64 + (BITS - top.leading_zeros()) as u64
}

/// Number of trailing zero bits (0 for zero).
#[inline]
pub(crate) fn trailing_zeros_mag(mag: &[Word]) -> u64 {
    let i = first_nonzero(mag);
    if i == mag.len() {
        return 0;
    }
    i as u64 * BITS as u64 + mag[i].trailing_zeros() as u64
}

#[inline]
pub(crate) fn test_bit_mag(mag: &[Word], n: u64) -> bool {
    let word = (n / BITS as u64) as usize;
    word < mag.len() && (mag[word] >> (n % BITS as u64)) & 1 == 1
}

// ============================================================================
// Native conversions
// ============================================================================

/// Builds a canonical magnitude from a `u64`.
#[inline]
pub(crate) fn from_u64(v: u64) -> Vec<Word> {
    if v >> BITS == 0 {
        vec![v as Word]
    } else {
        vec![v as Word, (v >> BITS) as Word]
    }
}

/// Builds a canonical magnitude from a `u128`.
pub(crate) fn from_u128(mut v: u128) -> Vec<Word> {
    let mut out = Vec::with_capacity(4);
    while v != 0 {
        out.push(v as Word);
        v >>= BITS;
    }
    normalize(&mut out);
    out
}

/// The low 64 bits of a magnitude.
#[inline]
pub(crate) fn low_u64(mag: &[Word]) -> u64 {
    let lo = mag.first().copied().unwrap_or(0) as u64;
    let hi = mag.get(1).copied().unwrap_or(0) as u64;
    lo | (hi << BITS)
}

/// The magnitude as a `u64`, if it fits.
#[inline]
pub(crate) fn to_u64(mag: &[Word]) -> Option<u64> {
    if significant_len(mag) > 2 {
        None
    } else {
        Some(low_u64(mag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_leading_zero_words() {
        let mut v = vec![1, 2, 0, 0];
        normalize(&mut v);
        assert_eq!(v, vec![1, 2]);

        let mut z = vec![0, 0, 0];
        normalize(&mut z);
        assert_eq!(z, vec![0]);

        let mut e = Vec::new();
        normalize(&mut e);
        assert_eq!(e, vec![0]);
    }

    #[test]
    fn test_cmp_mag_length_first() {
        assert_eq!(cmp_mag(&[0, 1], &[u32::MAX]), Ordering::Greater);
        assert_eq!(cmp_mag(&[5, 7], &[6, 7]), Ordering::Less);
        assert_eq!(cmp_mag(&[5, 7, 0], &[5, 7]), Ordering::Equal);
        assert_eq!(cmp_mag(&[0], &[0, 0]), Ordering::Equal);
    }

    #[test]
    fn test_add_carry_propagates() {
        assert_eq!(add_mag(&[u32::MAX, u32::MAX], &[1]), vec![0, 0, 1]);
        assert_eq!(add_mag(&[1], &[2, 3]), vec![3, 3]);
    }

    #[test]
    fn test_sub_borrow_propagates() {
        assert_eq!(sub_mag(&[0, 0, 1], &[1]), vec![u32::MAX, u32::MAX]);
        assert_eq!(sub_mag(&[7, 3], &[7, 3]), vec![0]);
    }

    #[test]
    fn test_abs_diff_reports_order() {
        let (d, neg) = abs_diff(&[3], &[10]);
        assert_eq!(d, vec![7]);
        assert!(neg);
        let (d, neg) = abs_diff(&[10], &[3]);
        assert_eq!(d, vec![7]);
        assert!(!neg);
    }

    #[test]
    fn test_add_shifted_assign() {
        let mut acc = vec![1];
        add_shifted_assign(&mut acc, &[u32::MAX], 1);
        assert_eq!(acc, vec![1, u32::MAX]);
        add_shifted_assign(&mut acc, &[1], 1);
        assert_eq!(acc, vec![1, 0, 1]);
    }

    #[test]
    fn test_shifts() {
        assert_eq!(shl_bits(&[1], 33), vec![0, 2]);
        assert_eq!(shl_bits(&[0x8000_0000], 1), vec![0, 1]);
        assert_eq!(shr_bits(&[0, 2], 33), vec![1]);
        assert_eq!(shr_bits(&[5], 64), vec![0]);
        assert_eq!(shr_bits(&[0, 1], 1), vec![0x8000_0000]);
    }

    #[test]
    fn test_bit_queries() {
        assert_eq!(bit_length_mag(&[0]), 0);
        assert_eq!(bit_length_mag(&[1]), 1);
        assert_eq!(bit_length_mag(&[0, 1]), 33);
        assert_eq!(trailing_zeros_mag(&[0, 8]), 35);
        assert!(test_bit_mag(&[0, 8], 35));
        assert!(!test_bit_mag(&[0, 8], 200));
        assert!(any_low_bits(&[0, 8], 36));
        assert!(!any_low_bits(&[0, 8], 35));
    }

    #[test]
    fn test_native_round_trip() {
        assert_eq!(from_u64(u64::MAX), vec![u32::MAX, u32::MAX]);
        assert_eq!(to_u64(&from_u64(0x1_0000_0001)), Some(0x1_0000_0001));
        assert_eq!(to_u64(&[1, 2, 3]), None);
        assert_eq!(from_u128(1u128 << 64), vec![0, 0, 1]);
        assert_eq!(from_u128(0), vec![0]);
    }
}
