//! Magnitude multiplication: schoolbook, squaring and Karatsuba.

use alloc::vec;
use alloc::vec::Vec;

use crate::digits::{
    BITS, DoubleWord, Word, abs_diff, add_shifted_assign, hi, is_zero, lo, normalize,
    significant_len, sub_assign_mag,
};

/// Operand length (in words) at which multiplication switches from the
/// schoolbook loop to Karatsuba splitting.
///
/// This is a tuning knob only: both paths produce identical results.
pub const KARATSUBA_THRESHOLD: usize = 63;

// ============================================================================
// Entry point
// ============================================================================

/// Returns the canonical magnitude of `a * b`.
pub(crate) fn mul_mag(a: &[Word], b: &[Word]) -> Vec<Word> {
    let a = &a[..significant_len(a)];
    let b = &b[..significant_len(b)];
    if is_zero(a) || is_zero(b) {
        return vec![0];
    }
    if core::ptr::eq(a, b) {
        return square(a);
    }
    let mut out = if a.len() >= b.len() {
        karatsuba(a, b)
    } else {
        karatsuba(b, a)
    };
    normalize(&mut out);
    out
}

/// Multiplies a magnitude by a single word.
pub(crate) fn mul_word(a: &[Word], w: Word) -> Vec<Word> {
    if w == 0 || is_zero(a) {
        return vec![0];
    }
    let mut out = Vec::with_capacity(a.len() + 1);
    let mut carry: DoubleWord = 0;
    for &x in a {
        let p = x as DoubleWord * w as DoubleWord + carry;
        out.push(lo(p));
        carry = hi(p) as DoubleWord;
    }
    if carry != 0 {
        out.push(carry as Word);
    }
    normalize(&mut out);
    out
}

/// `mag = mag * m + add` in place. Used by radix parsing.
pub(crate) fn mul_add_word_in_place(mag: &mut Vec<Word>, m: Word, add: Word) {
    let mut carry = add as DoubleWord;
    for x in mag.iter_mut() {
        let p = *x as DoubleWord * m as DoubleWord + carry;
        *x = lo(p);
        carry = hi(p) as DoubleWord;
    }
    if carry != 0 {
        mag.push(carry as Word);
    }
}

/// Multiplies a magnitude by a `u64`.
pub(crate) fn mul_u64(a: &[Word], v: u64) -> Vec<Word> {
    if v >> BITS == 0 {
        mul_word(a, v as Word)
    } else {
        mul_mag(a, &[v as Word, (v >> BITS) as Word])
    }
}

// ============================================================================
// Schoolbook
// ============================================================================

/// `out += a * b` where `out` has room for `a.len() + b.len()` words.
fn schoolbook_into(a: &[Word], b: &[Word], out: &mut [Word]) {
    for (i, &x) in a.iter().enumerate() {
        if x == 0 {
            continue;
        }
        let mut carry: DoubleWord = 0;
        for (j, &y) in b.iter().enumerate() {
            let t = x as DoubleWord * y as DoubleWord + out[i + j] as DoubleWord + carry;
            out[i + j] = lo(t);
            carry = hi(t) as DoubleWord;
        }
        let mut k = i + b.len();
        while carry != 0 {
            let t = out[k] as DoubleWord + carry;
            out[k] = lo(t);
            carry = hi(t) as DoubleWord;
            k += 1;
        }
    }
}

pub(crate) fn schoolbook(a: &[Word], b: &[Word]) -> Vec<Word> {
    let mut out = vec![0; a.len() + b.len()];
    schoolbook_into(a, b, &mut out);
    normalize(&mut out);
    out
}

/// Squares a magnitude, computing each cross product once.
pub(crate) fn square(a: &[Word]) -> Vec<Word> {
    let a = &a[..significant_len(a)];
    if a.len() >= KARATSUBA_THRESHOLD {
        let mut out = karatsuba(a, a);
        normalize(&mut out);
        return out;
    }
    let n = a.len();
    let mut out = vec![0 as Word; 2 * n];

    // Off-diagonal products a[i]*a[j], i < j.
    for i in 0..n {
        let mut carry: DoubleWord = 0;
        for j in (i + 1)..n {
            let t = a[i] as DoubleWord * a[j] as DoubleWord + out[i + j] as DoubleWord + carry;
            out[i + j] = lo(t);
            carry = hi(t) as DoubleWord;
        }
        out[i + n] = carry as Word;
    }

    // Double them.
    let mut top: Word = 0;
    for w in out.iter_mut() {
        let next = *w >> (BITS - 1);
        *w = (*w << 1) | top;
        top = next;
    }

    // Add the diagonal squares.
    let mut carry: DoubleWord = 0;
    for i in 0..n {
        let sq = a[i] as DoubleWord * a[i] as DoubleWord;
        let t = out[2 * i] as DoubleWord + lo(sq) as DoubleWord + carry;
        out[2 * i] = lo(t);
        let t = out[2 * i + 1] as DoubleWord + hi(sq) as DoubleWord + hi(t) as DoubleWord;
        out[2 * i + 1] = lo(t);
        carry = hi(t) as DoubleWord;
    }

    normalize(&mut out);
    out
}

// ============================================================================
// Karatsuba
// ============================================================================

/// Karatsuba multiplication. Requires `a.len() >= b.len()`.
///
/// Splits at half of `a`'s length: with `a = a1·B^n + a0` and
/// `b = b1·B^n + b0`, `z1 = (a1 − a0)(b0 − b1) + a1·b1 + a0·b0`.
fn karatsuba(a: &[Word], b: &[Word]) -> Vec<Word> {
    debug_assert!(a.len() >= b.len());
    if b.len() < KARATSUBA_THRESHOLD {
        return schoolbook(a, b);
    }
    let _span = tracing::trace_span!("karatsuba", a_words = a.len(), b_words = b.len()).entered();

    let n = a.len() / 2;
    let (a0, a1) = a.split_at(n);
    let (b0, b1) = if b.len() > n { b.split_at(n) } else { (b, &[][..]) };
    let a0 = &a0[..significant_len(a0)];
    let b0 = &b0[..significant_len(b0)];

    let z2 = if b1.is_empty() { vec![0] } else { mul_ordered(a1, b1) };
    let z0 = mul_ordered(a0, b0);

    let (da, da_neg) = abs_diff(a1, a0);
    let (db, db_neg) = if b1.is_empty() {
        (b0.to_vec(), false)
    } else {
        abs_diff(b0, b1)
    };
    let cross = mul_ordered(&da, &db);

    // z1 = z2 + z0 ± cross, and z1 >= 0 always.
    let mut z1 = z2.clone();
    add_shifted_assign(&mut z1, &z0, 0);
    if da_neg == db_neg {
        add_shifted_assign(&mut z1, &cross, 0);
    } else {
        sub_assign_mag(&mut z1, &cross);
    }

    let mut out = Vec::with_capacity(a.len() + b.len() + 1);
    out.extend_from_slice(&z0);
    add_shifted_assign(&mut out, &z1, n);
    add_shifted_assign(&mut out, &z2, 2 * n);
    out
}

/// Recursive step that keeps the longer operand first.
fn mul_ordered(x: &[Word], y: &[Word]) -> Vec<Word> {
    let x = &x[..significant_len(x)];
    let y = &y[..significant_len(y)];
    if is_zero(x) || is_zero(y) {
        return vec![0];
    }
    if x.len() >= y.len() {
        karatsuba(x, y)
    } else {
        karatsuba(y, x)
    }
}
