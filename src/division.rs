//! Magnitude division: single-word and normalized multi-word long division.

use alloc::vec;
use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::digits::{
    BITS, DoubleWord, Word, cmp_mag, normalize, shl_bits, shr_bits, significant_len,
};

/// Divides a magnitude by a single non-zero word.
pub(crate) fn div_rem_word(a: &[Word], d: Word) -> (Vec<Word>, Word) {
    debug_assert!(d != 0);
    let mut q = vec![0 as Word; a.len()];
    let mut rem: DoubleWord = 0;
    for i in (0..a.len()).rev() {
        let cur = (rem << BITS) | a[i] as DoubleWord;
        q[i] = (cur / d as DoubleWord) as Word;
        rem = cur % d as DoubleWord;
    }
    normalize(&mut q);
    (q, rem as Word)
}

/// Remainder of a magnitude divided by a single non-zero word.
pub(crate) fn rem_word(a: &[Word], d: Word) -> Word {
    debug_assert!(d != 0);
    let mut rem: DoubleWord = 0;
    for &w in a.iter().rev() {
        rem = ((rem << BITS) | w as DoubleWord) % d as DoubleWord;
    }
    rem as Word
}

/// Quotient and remainder of two magnitudes, truncating. `b` must be non-zero.
pub(crate) fn div_rem_mag(a: &[Word], b: &[Word]) -> (Vec<Word>, Vec<Word>) {
    let a = &a[..significant_len(a)];
    let b = &b[..significant_len(b)];
    debug_assert!(b.iter().any(|&w| w != 0), "division by zero magnitude");

    match cmp_mag(a, b) {
        Ordering::Less => return (vec![0], a.to_vec()),
        Ordering::Equal => return (vec![1], vec![0]),
        Ordering::Greater => {}
    }
    if b.len() == 1 {
        let (q, r) = div_rem_word(a, b[0]);
        return (q, vec![r]);
    }
    long_divide(a, b)
}

/// Multi-word long division (Knuth, TAOCP vol. 2, 4.3.1, Algorithm D).
///
/// Requires `a > b` and `b.len() >= 2`.
fn long_divide(a: &[Word], b: &[Word]) -> (Vec<Word>, Vec<Word>) {
    let _span = tracing::trace_span!("long_divide", a_words = a.len(), b_words = b.len()).entered();

    let n = b.len();
    let shift = b[n - 1].leading_zeros();

    // Normalize so the divisor's top word has its high bit set.
    let mut v = shl_bits(b, shift as u64);
    v.resize(n, 0);
    let mut u = shl_bits(a, shift as u64);
    u.resize(a.len() + 1, 0);

    let m = a.len() - n;
    let mut q = vec![0 as Word; m + 1];
    let v_top = v[n - 1] as DoubleWord;
    let v_next = v[n - 2] as DoubleWord;
    let base: DoubleWord = 1 << BITS;

    for j in (0..=m).rev() {
        let num = ((u[j + n] as DoubleWord) << BITS) | u[j + n - 1] as DoubleWord;
        let mut q_hat = num / v_top;
        let mut r_hat = num % v_top;

        while q_hat >= base || q_hat * v_next > ((r_hat << BITS) | u[j + n - 2] as DoubleWord) {
            q_hat -= 1;
            r_hat += v_top;
            if r_hat >= base {
                break;
            }
        }

        // u[j..=j+n] -= q_hat * v
        let mut borrow: i64 = 0;
        let mut carry: DoubleWord = 0;
        for i in 0..n {
            let p = q_hat * v[i] as DoubleWord + carry;
            carry = p >> BITS;
            let t = u[i + j] as i64 - (p & 0xFFFF_FFFF) as i64 + borrow;
            u[i + j] = t as Word;
            borrow = t >> BITS;
        }
        let t = u[j + n] as i64 - carry as i64 + borrow;
        u[j + n] = t as Word;

        // Trial digit was one too large: add the divisor back.
        if t < 0 {
            q_hat -= 1;
            let mut c: DoubleWord = 0;
            for i in 0..n {
                let s = u[i + j] as DoubleWord + v[i] as DoubleWord + c;
                u[i + j] = s as Word;
                c = s >> BITS;
            }
            u[j + n] = u[j + n].wrapping_add(c as Word);
        }

        q[j] = q_hat as Word;
    }

    normalize(&mut q);
    u.truncate(n);
    let r = shr_bits(&u, shift as u64);
    (q, r)
}
