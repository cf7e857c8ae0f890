//! Modular arithmetic: binary GCD, Montgomery exponentiation and inversion.

use alloc::vec;
use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::biginteger::{BigInteger, Sign};
use crate::digits::{
    BITS, DoubleWord, Word, bit_length_mag, cmp_mag, from_u64, hi, is_zero, lo, normalize,
    shl_bits, shr_bits, significant_len, sub_mag, test_bit_mag, to_u64, trailing_zeros_mag,
};
use crate::division::div_rem_mag;
use crate::{ArithmeticError, Result};

// ============================================================================
// GCD
// ============================================================================

/// Stein's algorithm on machine words.
fn gcd_u64(mut u: u64, mut v: u64) -> u64 {
    if u == 0 {
        return v;
    }
    if v == 0 {
        return u;
    }
    let shift = (u | v).trailing_zeros();
    u >>= u.trailing_zeros();
    loop {
        v >>= v.trailing_zeros();
        if u > v {
            core::mem::swap(&mut u, &mut v);
        }
        v -= u;
        if v == 0 {
            return u << shift;
        }
    }
}

/// Lengths differ by more than a factor of 1.2.
#[inline]
fn unbalanced(a: &[Word], b: &[Word]) -> bool {
    let (la, lb) = (a.len(), b.len());
    la * 5 > lb * 6 || lb * 5 > la * 6
}

/// Binary GCD of two canonical magnitudes.
fn gcd_mag(a: &[Word], b: &[Word]) -> Vec<Word> {
    if is_zero(a) {
        return b.to_vec();
    }
    if is_zero(b) {
        return a.to_vec();
    }
    let tz_a = trailing_zeros_mag(a);
    let tz_b = trailing_zeros_mag(b);
    let shift = tz_a.min(tz_b);
    let mut u = shr_bits(a, tz_a);
    let mut v = shr_bits(b, tz_b);

    // Both u and v are odd at the top of the loop.
    let g = loop {
        if let (Some(x), Some(y)) = (to_u64(&u), to_u64(&v)) {
            break from_u64(gcd_u64(x, y));
        }
        if unbalanced(&u, &v) {
            // One remainder step shrinks the longer operand far faster than
            // repeated subtraction would.
            if cmp_mag(&u, &v) == Ordering::Less {
                core::mem::swap(&mut u, &mut v);
            }
            let (_, r) = div_rem_mag(&u, &v);
            if is_zero(&r) {
                break v;
            }
            let tz = trailing_zeros_mag(&r);
            u = shr_bits(&r, tz);
            continue;
        }
        match cmp_mag(&u, &v) {
            Ordering::Equal => break u,
            Ordering::Greater => core::mem::swap(&mut u, &mut v),
            Ordering::Less => {}
        }
        let d = sub_mag(&v, &u);
        let tz = trailing_zeros_mag(&d);
        v = shr_bits(&d, tz);
    };
    shl_bits(&g, shift)
}

impl BigInteger {
    /// Greatest common divisor of `|self|` and `|other|`; `gcd(0, 0) == 0`.
    pub fn gcd(&self, other: &Self) -> Self {
        BigInteger::from_parts(Sign::Plus, gcd_mag(&self.mag, &other.mag))
    }
}

// ============================================================================
// Montgomery arithmetic (odd modulus)
// ============================================================================

/// Montgomery context for an odd modulus of `n` words, with `R = 2^(32n)`.
struct Montgomery<'a> {
    m: &'a [Word],
    /// -m^-1 mod 2^32
    m_inv: Word,
    /// R^2 mod m, used to enter Montgomery form
    r2: Vec<Word>,
}

impl<'a> Montgomery<'a> {
    fn new(m: &'a [Word]) -> Self {
        debug_assert!(m[0] & 1 == 1);
        // Newton iteration: each step doubles the correct low bits.
        let mut inv: Word = 1;
        for _ in 0..5 {
            inv = inv.wrapping_mul(2u32.wrapping_sub(m[0].wrapping_mul(inv)));
        }
        let n = m.len();
        let mut r2 = vec![0 as Word; 2 * n];
        r2.push(1);
        let (_, r2) = div_rem_mag(&r2, m);
        Self {
            m,
            m_inv: inv.wrapping_neg(),
            r2: pad(&r2, n),
        }
    }

    /// Returns `a * b * R^-1 mod m` for `a, b < m` of exactly `n` words.
    fn mul(&self, a: &[Word], b: &[Word]) -> Vec<Word> {
        let m = self.m;
        let n = m.len();
        let mut t = vec![0 as Word; n + 2];
        for &ai in a.iter() {
            let mut carry: DoubleWord = 0;
            for j in 0..n {
                let s = t[j] as DoubleWord + ai as DoubleWord * b[j] as DoubleWord + carry;
                t[j] = lo(s);
                carry = hi(s) as DoubleWord;
            }
            let s = t[n] as DoubleWord + carry;
            t[n] = lo(s);
            t[n + 1] = hi(s);

            let q = t[0].wrapping_mul(self.m_inv);
            let s = t[0] as DoubleWord + q as DoubleWord * m[0] as DoubleWord;
            let mut carry = hi(s) as DoubleWord;
            for j in 1..n {
                let s = t[j] as DoubleWord + q as DoubleWord * m[j] as DoubleWord + carry;
                t[j - 1] = lo(s);
                carry = hi(s) as DoubleWord;
            }
            let s = t[n] as DoubleWord + carry;
            t[n - 1] = lo(s);
            t[n] = t[n + 1] + hi(s);
            t[n + 1] = 0;
        }
        if t[n] != 0 || cmp_mag(&t[..n], m) != Ordering::Less {
            sub_in_place(&mut t[..=n], m);
        }
        t.truncate(n);
        t
    }

    fn to_montgomery(&self, a: &[Word]) -> Vec<Word> {
        self.mul(&pad(a, self.m.len()), &self.r2)
    }

    fn from_montgomery(&self, a: &[Word]) -> Vec<Word> {
        let mut one = vec![0 as Word; self.m.len()];
        one[0] = 1;
        let mut out = self.mul(a, &one);
        normalize(&mut out);
        out
    }

    /// `base^exp mod m` with `base < m`, scanning `exp` from its top bit.
    fn pow(&self, base: &[Word], exp: &[Word]) -> Vec<Word> {
        let _span = tracing::trace_span!("montgomery_pow", words = self.m.len()).entered();
        let b = self.to_montgomery(base);
        let mut acc = self.to_montgomery(&[1]);
        let bits = bit_length_mag(exp);
        for i in (0..bits).rev() {
            acc = self.mul(&acc, &acc);
            if test_bit_mag(exp, i) {
                acc = self.mul(&acc, &b);
            }
        }
        self.from_montgomery(&acc)
    }
}

/// Zero-extends (or trims leading zeros of) `a` to exactly `n` words.
fn pad(a: &[Word], n: usize) -> Vec<Word> {
    let mut out = a[..significant_len(a)].to_vec();
    out.resize(n, 0);
    out
}

/// `a -= b` where `a` may carry one extra top word.
fn sub_in_place(a: &mut [Word], b: &[Word]) {
    let mut borrow: i64 = 0;
    for i in 0..a.len() {
        let d = a[i] as i64 - b.get(i).copied().unwrap_or(0) as i64 + borrow;
        a[i] = d as Word;
        borrow = d >> BITS;
    }
}

// ============================================================================
// Power-of-two modulus
// ============================================================================

/// Keeps the low `bits` bits of a magnitude.
fn low_bits(a: &[Word], bits: u64) -> Vec<Word> {
    let words = (bits / BITS as u64) as usize;
    let rem = (bits % BITS as u64) as u32;
    let mut out: Vec<Word> = a.iter().copied().take(words + 1).collect();
    if out.len() > words {
        if rem == 0 {
            out.truncate(words);
        } else {
            out[words] &= (1 << rem) - 1;
        }
    }
    normalize(&mut out);
    out
}

/// `base^exp mod 2^bits`.
fn pow2_mod_pow(base: &[Word], exp: &[Word], bits: u64) -> Vec<Word> {
    let base = low_bits(base, bits);
    let mut acc: Vec<Word> = vec![1];
    for i in (0..bit_length_mag(exp)).rev() {
        acc = low_bits(&crate::multiplication::square(&acc), bits);
        if test_bit_mag(exp, i) {
            acc = low_bits(&crate::multiplication::mul_mag(&acc, &base), bits);
        }
    }
    low_bits(&acc, bits)
}

/// Inverse of an odd `q` modulo `2^bits`, by Newton iteration.
fn pow2_inverse(q: &BigInteger, bits: u64) -> BigInteger {
    let two = BigInteger::from(2u32);
    let mut inv = BigInteger::one();
    let mut precision = 1u64;
    while precision < bits {
        precision = (precision * 2).min(bits);
        let t = BigInteger::from_parts(Sign::Plus, low_bits(&(q * &inv).mag, precision));
        let correction = (&two - &t).modulo_pow2(precision);
        inv = BigInteger::from_parts(Sign::Plus, low_bits(&(&inv * &correction).mag, precision));
    }
    inv
}

impl BigInteger {
    /// Non-negative residue modulo `2^bits`.
    fn modulo_pow2(&self, bits: u64) -> BigInteger {
        let low = BigInteger::from_parts(Sign::Plus, low_bits(&self.mag, bits));
        if self.is_negative() && !low.is_zero() {
            BigInteger::one().shift_left(bits) - low
        } else {
            low
        }
    }
}

// ============================================================================
// ModPow / ModInverse
// ============================================================================

impl BigInteger {
    /// Returns `self^exponent mod m` in `[0, m)`.
    ///
    /// Odd moduli use Montgomery multiplication. Even moduli are split into
    /// an odd part and a power of two whose results are recombined. A
    /// negative exponent inverts `self` first.
    ///
    /// # Errors
    /// Returns `ArithmeticError::InvalidModulus` unless `m > 0`, and
    /// `ArithmeticError::NotInvertible` for a negative exponent when `self`
    /// and `m` are not coprime.
    pub fn mod_pow(&self, exponent: &BigInteger, m: &BigInteger) -> Result<BigInteger> {
        if !m.is_positive() {
            return Err(ArithmeticError::InvalidModulus);
        }
        if m.is_one() {
            return Ok(BigInteger::zero());
        }
        if exponent.is_zero() {
            return Ok(BigInteger::one());
        }
        let base = if exponent.is_negative() {
            self.mod_inverse(m)?
        } else {
            self.modulo(m)?
        };
        if base.is_zero() {
            return Ok(BigInteger::zero());
        }
        let exp = &exponent.mag;

        if m.mag[0] & 1 == 1 {
            let mont = Montgomery::new(&m.mag);
            return Ok(BigInteger::from_parts(Sign::Plus, mont.pow(&base.mag, exp)));
        }

        // m = q * 2^j with q odd
        let j = trailing_zeros_mag(&m.mag);
        let q = m.shift_right(j);
        let x2 = BigInteger::from_parts(Sign::Plus, pow2_mod_pow(&base.mag, exp, j));
        if q.is_one() {
            return Ok(x2);
        }
        let base_q = base.modulo(&q)?;
        let mont = Montgomery::new(&q.mag);
        let x1 = BigInteger::from_parts(Sign::Plus, mont.pow(&base_q.mag, exp));

        // result = x1 + q * ((x2 - x1) * q^-1 mod 2^j)
        let q_inv = pow2_inverse(&q, j);
        let y = ((&x2 - &x1) * &q_inv).modulo_pow2(j);
        Ok(x1 + &q * &y)
    }

    /// Returns `self^-1 mod m` in `[0, m)`.
    ///
    /// # Errors
    /// Returns `ArithmeticError::InvalidModulus` unless `m > 0`, and
    /// `ArithmeticError::NotInvertible` when `gcd(self, m) != 1`.
    pub fn mod_inverse(&self, m: &BigInteger) -> Result<BigInteger> {
        if !m.is_positive() {
            return Err(ArithmeticError::InvalidModulus);
        }
        if m.is_one() {
            return Ok(BigInteger::zero());
        }
        let a = self.modulo(m)?;
        if a.is_zero() {
            return Err(ArithmeticError::NotInvertible);
        }
        if a.is_one() {
            return Ok(a);
        }
        if m.mag[0] & 1 == 1 {
            almost_montgomery_inverse(&a, m)
        } else {
            euclid_inverse(&a, m)
        }
    }
}

/// Kaliski's almost Montgomery inverse for an odd modulus.
///
/// Phase one yields `a^-1 * 2^k mod m`; phase two halves it `k` times.
fn almost_montgomery_inverse(a: &BigInteger, m: &BigInteger) -> Result<BigInteger> {
    let mut u = m.clone();
    let mut v = a.clone();
    let mut r = BigInteger::zero();
    let mut s = BigInteger::one();
    let mut k: u64 = 0;

    while !v.is_zero() {
        if u.mag[0] & 1 == 0 {
            u = u.shift_right(1);
            s = s.shift_left(1);
        } else if v.mag[0] & 1 == 0 {
            v = v.shift_right(1);
            r = r.shift_left(1);
        } else if u > v {
            u = (&u - &v).shift_right(1);
            r = &r + &s;
            s = s.shift_left(1);
        } else {
            v = (&v - &u).shift_right(1);
            s = &s + &r;
            r = r.shift_left(1);
        }
        k += 1;
    }
    if !u.is_one() {
        return Err(ArithmeticError::NotInvertible);
    }
    if &r >= m {
        r = &r - m;
    }
    let mut x = m - &r;
    for _ in 0..k {
        if x.mag[0] & 1 == 1 {
            x = &x + m;
        }
        x = x.shift_right(1);
    }
    Ok(x)
}

/// Extended Euclid, used for even moduli.
fn euclid_inverse(a: &BigInteger, m: &BigInteger) -> Result<BigInteger> {
    let (mut old_r, mut r) = (a.clone(), m.clone());
    let (mut old_s, mut s) = (BigInteger::one(), BigInteger::zero());
    while !r.is_zero() {
        let (q, rem) = old_r.try_div_rem(&r)?;
        old_r = core::mem::replace(&mut r, rem);
        let next = &old_s - &(&q * &s);
        old_s = core::mem::replace(&mut s, next);
    }
    if !old_r.is_one() {
        return Err(ArithmeticError::NotInvertible);
    }
    old_s.modulo(m)
}

#[cfg(test)]
mod modular_tests {
    use super::*;
    use core::str::FromStr;
    use proptest::prelude::*;

    fn big(s: &str) -> BigInteger {
        BigInteger::from_str(s).unwrap()
    }

    /// Reference: repeated multiply-then-reduce.
    fn naive_mod_pow(a: &BigInteger, e: u32, m: &BigInteger) -> BigInteger {
        let mut acc = BigInteger::one().modulo(m).unwrap();
        for _ in 0..e {
            acc = (&acc * a).modulo(m).unwrap();
        }
        acc
    }

    #[test]
    fn test_gcd_basics() {
        assert_eq!(big("0").gcd(&big("0")), big("0"));
        assert_eq!(big("0").gcd(&big("-7")), big("7"));
        assert_eq!(big("-12").gcd(&big("18")), big("6"));
        assert_eq!(big("17").gcd(&big("5")), big("1"));
        let a = big("2").pow(200).unwrap() * big("3");
        let b = big("2").pow(150).unwrap() * big("9");
        assert_eq!(a.gcd(&b), big("2").pow(150).unwrap() * big("3"));
    }

    #[test]
    fn test_gcd_unbalanced_lengths() {
        let p = big("340282366920938463463374607431768211507");
        let a = &p * &big("10").pow(120).unwrap();
        let b = &p * &big("7");
        assert_eq!(a.gcd(&b), p);
    }

    #[test]
    fn test_gcd_u64_fast_path() {
        assert_eq!(gcd_u64(48, 180), 12);
        assert_eq!(gcd_u64(0, 9), 9);
        assert_eq!(gcd_u64(u64::MAX, u64::MAX - 1), 1);
    }

    #[test]
    fn test_mod_pow_odd_modulus() {
        assert_eq!(big("4").mod_pow(&big("13"), &big("497")).unwrap(), big("445"));
        assert_eq!(big("2").mod_pow(&big("0"), &big("9")).unwrap(), big("1"));
        let m = big("1000000007");
        assert_eq!(big("2").mod_pow(&big("1000000006"), &m).unwrap(), big("1"));
    }

    #[test]
    fn test_mod_pow_even_modulus() {
        assert_eq!(big("3").mod_pow(&big("200"), &big("1000")).unwrap(), big("1"));
        assert_eq!(big("7").mod_pow(&big("5"), &big("64")).unwrap(), big("39"));
        assert_eq!(big("7").mod_pow(&big("5"), &big("96")).unwrap(), naive_mod_pow(&big("7"), 5, &big("96")));
        assert_eq!(big("6").mod_pow(&big("4"), &big("1024")).unwrap(), big("272"));
    }

    #[test]
    fn test_mod_pow_signs() {
        // (-2)^3 = -8 = 2 mod 5
        assert_eq!(big("-2").mod_pow(&big("3"), &big("5")).unwrap(), big("2"));
        // 3^-1 mod 7 = 5
        assert_eq!(big("3").mod_pow(&big("-1"), &big("7")).unwrap(), big("5"));
        assert_eq!(big("3").mod_pow(&big("-2"), &big("7")).unwrap(), big("4"));
        assert_eq!(big("2").mod_pow(&big("-1"), &big("4")), Err(ArithmeticError::NotInvertible));
    }

    #[test]
    fn test_mod_pow_errors_and_degenerate_modulus() {
        assert_eq!(big("3").mod_pow(&big("2"), &big("0")), Err(ArithmeticError::InvalidModulus));
        assert_eq!(big("3").mod_pow(&big("2"), &big("-5")), Err(ArithmeticError::InvalidModulus));
        assert_eq!(big("3").mod_pow(&big("2"), &big("1")).unwrap(), big("0"));
        assert_eq!(big("10").mod_pow(&big("3"), &big("5")).unwrap(), big("0"));
    }

    #[test]
    fn test_mod_pow_multi_word_modulus() {
        let m = big("170141183460469231731687303715884105727"); // 2^127 - 1
        let a = big("123456789123456789123456789");
        // Fermat: a^(p-1) = 1 mod p for prime p
        assert_eq!(a.mod_pow(&(&m - &big("1")), &m).unwrap(), big("1"));
        let even = &m * &big("4096");
        assert_eq!(a.mod_pow(&big("37"), &even).unwrap(), naive_mod_pow(&a, 37, &even));
    }

    #[test]
    fn test_mod_inverse() {
        assert_eq!(big("3").mod_inverse(&big("11")).unwrap(), big("4"));
        assert_eq!(big("-3").mod_inverse(&big("11")).unwrap(), big("7"));
        assert_eq!(big("3").mod_inverse(&big("16")).unwrap(), big("11"));
        assert_eq!(big("2").mod_inverse(&big("4")), Err(ArithmeticError::NotInvertible));
        assert_eq!(big("6").mod_inverse(&big("9")), Err(ArithmeticError::NotInvertible));
        assert_eq!(big("0").mod_inverse(&big("9")), Err(ArithmeticError::NotInvertible));
        assert_eq!(big("5").mod_inverse(&big("1")).unwrap(), big("0"));
        assert_eq!(big("5").mod_inverse(&big("-7")), Err(ArithmeticError::InvalidModulus));
    }

    #[test]
    fn test_pow2_inverse() {
        let q = big("12345678901234567891");
        let inv = pow2_inverse(&q, 100);
        assert_eq!((&q * &inv).modulo_pow2(100), big("1"));
    }

    proptest! {
        #[test]
        fn prop_mod_inverse_identity(a in 1u64.., m in 2u64..) {
            let a = BigInteger::from(a);
            let m = BigInteger::from(m);
            if a.gcd(&m).is_one() {
                let inv = a.mod_inverse(&m).unwrap();
                prop_assert_eq!((&a * &inv).modulo(&m).unwrap(), BigInteger::one());
            } else {
                prop_assert_eq!(a.mod_inverse(&m), Err(ArithmeticError::NotInvertible));
            }
        }

        #[test]
        fn prop_mod_pow_matches_repeated_multiply(a in any::<i32>(), e in 0u32..40, m in 1u32..5000) {
            let a = BigInteger::from(a);
            let m = BigInteger::from(m);
            prop_assert_eq!(a.mod_pow(&BigInteger::from(e), &m).unwrap(), naive_mod_pow(&a, e, &m));
        }

        #[test]
        fn prop_gcd_recurrence(a in any::<i128>(), b in any::<i128>()) {
            let a = BigInteger::from(a);
            let b = BigInteger::from(b);
            let g = a.gcd(&b);
            if !g.is_zero() {
                prop_assert!(a.try_rem(&g).unwrap().is_zero());
                prop_assert!(b.try_rem(&g).unwrap().is_zero());
            }
            if !b.is_zero() {
                prop_assert_eq!(g, b.gcd(&a.try_rem(&b).unwrap()));
            }
        }
    }
}
