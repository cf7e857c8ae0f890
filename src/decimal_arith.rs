//! The `BigDecimal` arithmetic protocol: scale alignment, the exact
//! operation, then optional rounding to a `MathContext`.

use alloc::borrow::Cow;
use core::cmp::Ordering;
use core::iter::{Product, Sum};
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::bigdecimal::{BigDecimal, Unscaled, narrow_scale, strip_zeros_to_scale};
use crate::biginteger::BigInteger;
use crate::powers::{TEN_POW_U64, multiply_by_five_pow, ten_pow, u64_digits};
use crate::rounding::{MathContext, RoundingMode, fraction_indicator, resolve};
use crate::{ArithmeticError, Result};

// ============================================================================
// Rounding Primitives
// ============================================================================

/// Divides `dividend` by `divisor` and rounds the quotient by `mode`.
///
/// Returns the quotient and whether the division was exact.
pub(crate) fn divide_and_round(
    dividend: &Unscaled,
    divisor: &Unscaled,
    mode: RoundingMode,
) -> Result<(Unscaled, bool)> {
    match (dividend, divisor) {
        (_, Unscaled::Small(0)) => Err(ArithmeticError::DivisionByZero),
        (Unscaled::Small(a), Unscaled::Small(b)) => {
            let (a, b) = (*a as i128, *b as i128);
            let (q, r) = (a / b, a % b);
            if r == 0 {
                return Ok((Unscaled::from_i128(q), true));
            }
            let sign = if (a < 0) == (b < 0) { 1 } else { -1 };
            let fraction = fraction_indicator(sign, false, (2 * r.abs()).cmp(&b.abs()));
            let increment = resolve(q & 1 != 0, fraction, mode)?;
            Ok((Unscaled::from_i128(q + increment as i128), false))
        }
        _ => {
            let (a, b) = (dividend.big(), divisor.big());
            let (q, r) = a.try_div_rem(&b)?;
            if r.is_zero() {
                return Ok((Unscaled::from_big(q), true));
            }
            let sign = a.signum() * b.signum();
            let half_cmp = r.abs().shift_left(1).cmp(&b.abs());
            let odd = q.words()[0] & 1 != 0;
            let increment = resolve(odd, fraction_indicator(sign, false, half_cmp), mode)?;
            let q = if increment == 0 {
                q
            } else {
                q + BigInteger::from(increment)
            };
            Ok((Unscaled::from_big(q), false))
        }
    }
}

/// Drops the last `n` decimal digits of `value`, rounding by `mode`.
pub(crate) fn divide_by_ten_pow(value: &Unscaled, n: u64, mode: RoundingMode) -> Result<Unscaled> {
    if n == 0 {
        return Ok(value.clone());
    }
    if value.is_zero() {
        return Ok(Unscaled::Small(0));
    }
    if n > value.digits() {
        // |value| < 10^(n-1): the quotient is 0 and the fraction is below
        // one half.
        let increment = resolve(false, value.signum() * 4, mode)?;
        return Ok(Unscaled::Small(increment as i64));
    }
    let divisor = if n < 19 {
        Unscaled::Small(TEN_POW_U64[n as usize] as i64)
    } else {
        Unscaled::Big(ten_pow(n)?)
    };
    Ok(divide_and_round(value, &divisor, mode)?.0)
}

/// Rounds `value` to `mc.precision()` significant digits.
///
/// A carry that adds a digit (`999 -> 1000`) triggers one more pass.
pub(crate) fn round_to_context(value: BigDecimal, mc: &MathContext) -> Result<BigDecimal> {
    let target = mc.precision() as u64;
    if target == 0 {
        return Ok(value);
    }
    let mut precision = value.precision() as u64;
    if precision <= target {
        return Ok(value);
    }
    let mut scale = value.scale as i64;
    let mut int_val = value.int_val;
    while precision > target {
        let drop = precision - target;
        scale -= drop as i64;
        int_val = divide_by_ten_pow(&int_val, drop, mc.rounding_mode())?;
        precision = int_val.digits();
    }
    Ok(BigDecimal::with_precision(int_val, narrow_scale(scale)?, precision as u32))
}

/// Brings both unscaled values to the larger of the two scales.
fn align(lhs: &BigDecimal, rhs: &BigDecimal) -> Result<(Unscaled, Unscaled, i32)> {
    match lhs.scale.cmp(&rhs.scale) {
        Ordering::Equal => Ok((lhs.int_val.clone(), rhs.int_val.clone(), lhs.scale)),
        Ordering::Greater => {
            let raise = (lhs.scale as i64 - rhs.scale as i64) as u64;
            Ok((lhs.int_val.clone(), rhs.int_val.mul_ten_pow(raise)?, lhs.scale))
        }
        Ordering::Less => {
            let raise = (rhs.scale as i64 - lhs.scale as i64) as u64;
            Ok((lhs.int_val.mul_ten_pow(raise)?, rhs.int_val.clone(), rhs.scale))
        }
    }
}

/// Collapses the operand whose digits all lie well below the rounding
/// position of the sum into a single sticky unit.
fn pre_align<'a>(
    lhs: &'a BigDecimal,
    augend: &'a BigDecimal,
    mc: &MathContext,
) -> Result<(Cow<'a, BigDecimal>, Cow<'a, BigDecimal>)> {
    if lhs.scale == augend.scale {
        return Ok((Cow::Borrowed(lhs), Cow::Borrowed(augend)));
    }
    let lhs_is_big = lhs.scale < augend.scale;
    let (big, small) = if lhs_is_big { (lhs, augend) } else { (augend, lhs) };

    let est_result_ulp_scale = big.scale as i64 - big.precision() as i64 + mc.precision() as i64;
    let small_high_digit_pos = small.scale as i64 - small.precision() as i64 + 1;
    if small_high_digit_pos > big.scale as i64 + 2 && small_high_digit_pos > est_result_ulp_scale + 2 {
        let sticky_scale = narrow_scale((big.scale as i64).max(est_result_ulp_scale) + 3)?;
        let sticky = BigDecimal::from_i64_scaled(small.signum() as i64, sticky_scale);
        return Ok(if lhs_is_big {
            (Cow::Borrowed(lhs), Cow::Owned(sticky))
        } else {
            (Cow::Owned(sticky), Cow::Borrowed(augend))
        });
    }
    Ok((Cow::Borrowed(lhs), Cow::Borrowed(augend)))
}

/// Exact integer part of `dividend / divisor`, truncated toward zero.
fn integer_quotient(dividend: &BigDecimal, divisor: &BigDecimal) -> Result<Unscaled> {
    let diff = dividend.scale as i64 - divisor.scale as i64;
    let (q, _) = if diff >= 0 {
        dividend.int_val.div_rem(&divisor.int_val.mul_ten_pow(diff as u64)?)?
    } else {
        dividend
            .int_val
            .mul_ten_pow(diff.unsigned_abs())?
            .div_rem(&divisor.int_val)?
    };
    Ok(q)
}

/// Compares `|xs| × 10^(−xscale)` with `|ys| × 10^(−yscale)`.
fn compare_normalized(xs: &Unscaled, xscale: i64, ys: &Unscaled, yscale: i64) -> Result<Ordering> {
    let sdiff = xscale - yscale;
    if sdiff < 0 {
        Ok(xs.mul_ten_pow(sdiff.unsigned_abs())?.cmp_abs(ys))
    } else {
        Ok(xs.cmp_abs(&ys.mul_ten_pow(sdiff as u64)?))
    }
}

// ============================================================================
// Addition and Subtraction
// ============================================================================

impl BigDecimal {
    /// Exact sum; the result scale is the larger operand scale.
    pub fn try_add(&self, augend: &Self) -> Result<Self> {
        let (x, y, scale) = align(self, augend)?;
        Ok(Self::from_unscaled(x.add(&y), scale))
    }

    /// Sum rounded to `mc`.
    pub fn add_with_context(&self, augend: &Self, mc: &MathContext) -> Result<Self> {
        if mc.is_unlimited() {
            return self.try_add(augend);
        }
        let (lhs_zero, augend_zero) = (self.is_zero(), augend.is_zero());
        if lhs_zero || augend_zero {
            let preferred = self.scale.max(augend.scale);
            if lhs_zero && augend_zero {
                return Ok(Self::zero_with_scale(preferred));
            }
            let result = if lhs_zero { augend.round(mc)? } else { self.round(mc)? };
            return match result.scale.cmp(&preferred) {
                Ordering::Equal => Ok(result),
                Ordering::Greater => strip_zeros_to_scale(result.int_val, result.scale, preferred as i64),
                Ordering::Less => {
                    let precision_diff = mc.precision() as i64 - result.precision() as i64;
                    let scale_diff = preferred as i64 - result.scale as i64;
                    let target = if precision_diff >= scale_diff {
                        preferred
                    } else {
                        narrow_scale(result.scale as i64 + precision_diff)?
                    };
                    result.set_scale(target, RoundingMode::Unnecessary)
                }
            };
        }
        let (lhs, rhs) = pre_align(self, augend, mc)?;
        let (x, y, scale) = align(&lhs, &rhs)?;
        round_to_context(Self::from_unscaled(x.add(&y), scale), mc)
    }

    /// Exact difference; the result scale is the larger operand scale.
    pub fn subtract(&self, subtrahend: &Self) -> Result<Self> {
        self.try_add(&subtrahend.negate())
    }

    /// Difference rounded to `mc`.
    pub fn subtract_with_context(&self, subtrahend: &Self, mc: &MathContext) -> Result<Self> {
        self.add_with_context(&subtrahend.negate(), mc)
    }

    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        self.try_add(other).ok()
    }

    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn checked_sub(&self, other: &Self) -> Option<Self> {
        self.subtract(other).ok()
    }
}

// ============================================================================
// Multiplication
// ============================================================================

impl BigDecimal {
    /// Exact product; scales add.
    ///
    /// # Errors
    /// `ScaleOverflow` / `ScaleUnderflow` when the summed scale leaves the
    /// 32-bit range.
    pub fn multiply(&self, multiplicand: &Self) -> Result<Self> {
        let scale = narrow_scale(self.scale as i64 + multiplicand.scale as i64)?;
        Ok(Self::from_unscaled(self.int_val.mul(&multiplicand.int_val), scale))
    }

    /// Product rounded to `mc`.
    pub fn multiply_with_context(&self, multiplicand: &Self, mc: &MathContext) -> Result<Self> {
        round_to_context(self.multiply(multiplicand)?, mc)
    }

    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn checked_mul(&self, other: &Self) -> Option<Self> {
        self.multiply(other).ok()
    }
}

// ============================================================================
// Division
// ============================================================================

impl BigDecimal {
    /// Exact quotient.
    ///
    /// The reduced divisor must have the form `2^k · 5^l`; the result then
    /// has scale `self.scale − divisor.scale + max(k, l)`.
    ///
    /// # Errors
    /// - `DivisionByZero` if `divisor` is zero.
    /// - `NonTerminatingExpansion` if the quotient has no finite decimal form.
    pub fn divide(&self, divisor: &Self) -> Result<Self> {
        if divisor.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        let diff_scale = self.scale as i64 - divisor.scale as i64;
        if self.is_zero() {
            return Ok(Self::zero_with_scale(narrow_scale(diff_scale)?));
        }

        let (p, q) = (self.int_val.big(), divisor.int_val.big());
        let g = p.gcd(&q);
        let mut p = p.try_div(&g)?;
        let mut q = q.try_div(&g)?;

        let k = q.lowest_set_bit().unwrap_or(0);
        q = q.shift_right(k);
        let mut l = 0u64;
        loop {
            let (quotient, rem) = q.div_rem_small(5);
            if rem != 0 {
                break;
            }
            q = quotient;
            l += 1;
        }
        if !q.abs().is_one() {
            tracing::debug!(
                dividend_scale = self.scale,
                divisor_scale = divisor.scale,
                "non-terminating decimal expansion"
            );
            return Err(ArithmeticError::NonTerminatingExpansion);
        }
        if q.is_negative() {
            p = -p;
        }

        let scale = narrow_scale(diff_scale + k.max(l) as i64)?;
        let unscaled = if k > l {
            multiply_by_five_pow(&p, k - l)?
        } else {
            p.try_shift_left(l - k)?
        };
        Ok(Self::new(unscaled, scale))
    }

    /// Quotient with the given result scale, rounded by `mode`.
    pub fn divide_with_scale(&self, divisor: &Self, scale: i32, mode: RoundingMode) -> Result<Self> {
        if divisor.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        let needed = scale as i64 + divisor.scale as i64;
        let (dividend, div) = if needed > self.scale as i64 {
            let raise = (needed - self.scale as i64) as u64;
            (Cow::Owned(self.int_val.mul_ten_pow(raise)?), Cow::Borrowed(&divisor.int_val))
        } else {
            let raise = (self.scale as i64 - needed) as u64;
            (Cow::Borrowed(&self.int_val), Cow::Owned(divisor.int_val.mul_ten_pow(raise)?))
        };
        let (q, _) = divide_and_round(&dividend, &div, mode)?;
        Ok(Self::from_unscaled(q, scale))
    }

    /// Quotient with `self`'s scale, rounded by `mode`.
    pub fn divide_with_rounding(&self, divisor: &Self, mode: RoundingMode) -> Result<Self> {
        self.divide_with_scale(divisor, self.scale, mode)
    }

    /// Quotient rounded to `mc`.
    ///
    /// An exact quotient keeps the scale closest to
    /// `self.scale − divisor.scale` that its digits allow.
    pub fn divide_with_context(&self, divisor: &Self, mc: &MathContext) -> Result<Self> {
        if mc.is_unlimited() {
            return self.divide(divisor);
        }
        if divisor.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        let preferred = self.scale as i64 - divisor.scale as i64;
        if self.is_zero() {
            return Ok(Self::zero_with_scale(narrow_scale(preferred)?));
        }

        // Normalize both operands to [0.1, 1); the dividend must end up the
        // smaller of the two so the quotient has exactly mcp digits.
        let xscale = self.precision() as i64;
        let mut yscale = divisor.precision() as i64;
        if compare_normalized(&self.int_val, xscale, &divisor.int_val, yscale)? == Ordering::Greater {
            yscale -= 1;
        }
        let mcp = mc.precision() as i64;
        let scl = narrow_scale(preferred + yscale - xscale + mcp)?;
        let shift = mcp + yscale - xscale;
        let (dividend, div) = if shift > 0 {
            (Cow::Owned(self.int_val.mul_ten_pow(shift as u64)?), Cow::Borrowed(&divisor.int_val))
        } else {
            (Cow::Borrowed(&self.int_val), Cow::Owned(divisor.int_val.mul_ten_pow(shift.unsigned_abs())?))
        };
        let (q, exact) = divide_and_round(&dividend, &div, mc.rounding_mode())?;
        let quotient = if exact && preferred != scl as i64 {
            strip_zeros_to_scale(q, scl, preferred)?
        } else {
            Self::from_unscaled(q, scl)
        };
        round_to_context(quotient, mc)
    }

    /// Integer part of the exact quotient, truncated toward zero, at the
    /// scale `self.scale − divisor.scale` when its digits allow.
    pub fn divide_to_integral_value(&self, divisor: &Self) -> Result<Self> {
        if divisor.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        let preferred = self.scale as i64 - divisor.scale as i64;
        if self.compare_magnitude(divisor) == Ordering::Less {
            return Ok(Self::zero_with_scale(narrow_scale(preferred)?));
        }
        let q = integer_quotient(self, divisor)?;
        if preferred >= 0 {
            Self::from_unscaled(q, 0).set_scale(narrow_scale(preferred)?, RoundingMode::Unnecessary)
        } else {
            strip_zeros_to_scale(q, 0, preferred)
        }
    }

    /// [`divide_to_integral_value`](Self::divide_to_integral_value) whose
    /// result must fit `mc.precision()` digits.
    ///
    /// # Errors
    /// Returns `ArithmeticError::DivisionImpossible` when the integral
    /// quotient needs more digits than the context allows.
    pub fn divide_to_integral_value_with_context(&self, divisor: &Self, mc: &MathContext) -> Result<Self> {
        if divisor.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        if mc.is_unlimited() || self.compare_magnitude(divisor) == Ordering::Less {
            return self.divide_to_integral_value(divisor);
        }
        let preferred = self.scale as i64 - divisor.scale as i64;
        let stripped = strip_zeros_to_scale(integer_quotient(self, divisor)?, 0, i64::MIN)?;
        let mcp = mc.precision() as i64;
        let precision = stripped.precision() as i64;
        if precision > mcp {
            return Err(ArithmeticError::DivisionImpossible);
        }
        let s = stripped.scale as i64;
        let precision_diff = mcp - precision;
        if preferred > s && precision_diff > 0 {
            let target = narrow_scale(s + precision_diff.min(preferred - s))?;
            stripped.set_scale(target, RoundingMode::Unnecessary)
        } else {
            Ok(stripped)
        }
    }

    /// `self − divisor × divide_to_integral_value(divisor)`.
    ///
    /// The sign follows `self`, and the quotient never needs a finite decimal
    /// expansion.
    pub fn remainder(&self, divisor: &Self) -> Result<Self> {
        Ok(self.divide_and_remainder(divisor)?.1)
    }

    pub fn remainder_with_context(&self, divisor: &Self, mc: &MathContext) -> Result<Self> {
        Ok(self.divide_and_remainder_with_context(divisor, mc)?.1)
    }

    /// The integral quotient and the remainder.
    pub fn divide_and_remainder(&self, divisor: &Self) -> Result<(Self, Self)> {
        let quotient = self.divide_to_integral_value(divisor)?;
        let remainder = self.subtract(&quotient.multiply(divisor)?)?;
        Ok((quotient, remainder))
    }

    pub fn divide_and_remainder_with_context(&self, divisor: &Self, mc: &MathContext) -> Result<(Self, Self)> {
        let quotient = self.divide_to_integral_value_with_context(divisor, mc)?;
        let remainder = self.subtract(&quotient.multiply(divisor)?)?;
        Ok((quotient, remainder))
    }

    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn checked_div(&self, other: &Self) -> Option<Self> {
        self.divide(other).ok()
    }
}

// ============================================================================
// Power
// ============================================================================

impl BigDecimal {
    /// Exact `self^n` with scale `self.scale × n`.
    ///
    /// # Errors
    /// Returns `ArithmeticError::InvalidOperation` unless
    /// `0 <= n <= MAX_POW_EXPONENT`.
    pub fn pow(&self, n: i32) -> Result<Self> {
        if !(0..=Self::MAX_POW_EXPONENT).contains(&n) {
            return Err(ArithmeticError::InvalidOperation);
        }
        let scale = narrow_scale(self.scale as i64 * n as i64)?;
        if let Unscaled::Small(v) = self.int_val {
            if let Some(p) = v.checked_pow(n as u32) {
                return Ok(Self::from_unscaled(Unscaled::Small(p), scale));
            }
        }
        Ok(Self::new(self.int_val.big().pow(n as u32)?, scale))
    }

    /// `self^n` rounded to `mc`; negative `n` gives the reciprocal.
    ///
    /// Intermediate products carry `mc.precision()` plus the exponent's
    /// digit count plus one digits.
    pub fn pow_with_context(&self, n: i32, mc: &MathContext) -> Result<Self> {
        if !(-Self::MAX_POW_EXPONENT..=Self::MAX_POW_EXPONENT).contains(&n) {
            return Err(ArithmeticError::InvalidOperation);
        }
        if n == 0 {
            return Ok(Self::ONE);
        }
        let mag = n.unsigned_abs();
        let work = if mc.is_unlimited() {
            *mc
        } else {
            let elength = u64_digits(mag as u64);
            if elength > mc.precision() {
                return Err(ArithmeticError::InvalidOperation);
            }
            let precision = mc
                .precision()
                .checked_add(elength + 1)
                .ok_or(ArithmeticError::InvalidOperation)?;
            MathContext::new(precision, mc.rounding_mode())
        };

        let mut acc = Self::ONE;
        let mut seen = false;
        for bit in (0..31).rev() {
            if (mag >> bit) & 1 == 1 {
                seen = true;
                acc = acc.multiply_with_context(self, &work)?;
            }
            if bit > 0 && seen {
                acc = acc.multiply_with_context(&acc, &work)?;
            }
        }
        if n < 0 {
            acc = Self::ONE.divide_with_context(&acc, &work)?;
        }
        round_to_context(acc, mc)
    }
}

// ============================================================================
// Sign and Context Rounding
// ============================================================================

impl BigDecimal {
    /// `-self`, keeping the scale.
    pub fn negate(&self) -> Self {
        Self::from_unscaled(self.int_val.negate(), self.scale)
    }

    pub fn negate_with_context(&self, mc: &MathContext) -> Result<Self> {
        self.negate().round(mc)
    }

    /// `|self|`, keeping the scale.
    pub fn abs(&self) -> Self {
        if self.signum() < 0 { self.negate() } else { self.clone() }
    }

    pub fn abs_with_context(&self, mc: &MathContext) -> Result<Self> {
        self.abs().round(mc)
    }

    /// `+self` rounded to `mc`.
    pub fn plus(&self, mc: &MathContext) -> Result<Self> {
        self.round(mc)
    }
}

// ============================================================================
// Operator Overloading
// ============================================================================

macro_rules! forward_decimal_binop {
    (impl $imp:ident, $method:ident, $assign:ident, $assign_method:ident, $inner:ident, $msg:literal) => {
        impl $imp<&BigDecimal> for &BigDecimal {
            type Output = BigDecimal;

            #[inline]
            fn $method(self, rhs: &BigDecimal) -> BigDecimal {
                BigDecimal::$inner(self, rhs).expect($msg)
            }
        }

        impl $imp<BigDecimal> for BigDecimal {
            type Output = BigDecimal;

            #[inline]
            fn $method(self, rhs: BigDecimal) -> BigDecimal {
                BigDecimal::$inner(&self, &rhs).expect($msg)
            }
        }

        impl $imp<&BigDecimal> for BigDecimal {
            type Output = BigDecimal;

            #[inline]
            fn $method(self, rhs: &BigDecimal) -> BigDecimal {
                BigDecimal::$inner(&self, rhs).expect($msg)
            }
        }

        impl $imp<BigDecimal> for &BigDecimal {
            type Output = BigDecimal;

            #[inline]
            fn $method(self, rhs: BigDecimal) -> BigDecimal {
                BigDecimal::$inner(self, &rhs).expect($msg)
            }
        }

        impl $assign<&BigDecimal> for BigDecimal {
            #[inline]
            fn $assign_method(&mut self, rhs: &BigDecimal) {
                *self = BigDecimal::$inner(self, rhs).expect($msg);
            }
        }

        impl $assign<BigDecimal> for BigDecimal {
            #[inline]
            fn $assign_method(&mut self, rhs: BigDecimal) {
                *self = BigDecimal::$inner(self, &rhs).expect($msg);
            }
        }
    };
}

forward_decimal_binop!(impl Add, add, AddAssign, add_assign, try_add, "attempt to add with overflow");
forward_decimal_binop!(impl Sub, sub, SubAssign, sub_assign, subtract, "attempt to subtract with overflow");
forward_decimal_binop!(impl Mul, mul, MulAssign, mul_assign, multiply, "attempt to multiply with overflow");

impl Neg for BigDecimal {
    type Output = BigDecimal;

    #[inline]
    fn neg(self) -> BigDecimal {
        BigDecimal::negate(&self)
    }
}

impl Neg for &BigDecimal {
    type Output = BigDecimal;

    #[inline]
    fn neg(self) -> BigDecimal {
        BigDecimal::negate(self)
    }
}

// ============================================================================
// Iterator Trait Implementations
// ============================================================================

impl Sum for BigDecimal {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a BigDecimal> for BigDecimal {
    fn sum<I: Iterator<Item = &'a BigDecimal>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + x)
    }
}

impl Product for BigDecimal {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ONE, |acc, x| acc * x)
    }
}

impl<'a> Product<&'a BigDecimal> for BigDecimal {
    fn product<I: Iterator<Item = &'a BigDecimal>>(iter: I) -> Self {
        iter.fold(Self::ONE, |acc, x| acc * x)
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn decimal() -> impl Strategy<Value = BigDecimal> {
        (any::<i64>(), -20i32..20).prop_map(|(v, s)| BigDecimal::from_i64_scaled(v, s))
    }

    fn wide_decimal() -> impl Strategy<Value = BigDecimal> {
        (any::<i128>(), 0i32..40).prop_map(|(v, s)| BigDecimal::new(BigInteger::from(v), s))
    }

    fn nonzero_decimal() -> impl Strategy<Value = BigDecimal> {
        decimal().prop_filter("non-zero", |d| !d.is_zero())
    }

    fn rounding_mode() -> impl Strategy<Value = RoundingMode> {
        prop_oneof![
            Just(RoundingMode::Up),
            Just(RoundingMode::Down),
            Just(RoundingMode::Ceiling),
            Just(RoundingMode::Floor),
            Just(RoundingMode::HalfUp),
            Just(RoundingMode::HalfDown),
            Just(RoundingMode::HalfEven),
        ]
    }

    proptest! {
        #[test]
        fn prop_add_zero_is_identity(v in any::<i64>(), s in 0i32..30) {
            let x = BigDecimal::from_i64_scaled(v, s);
            prop_assert_eq!(x.try_add(&BigDecimal::ZERO).unwrap(), x);
        }

        #[test]
        fn prop_add_subtract_inverse(x in wide_decimal(), y in decimal()) {
            let back = x.try_add(&y).unwrap().subtract(&y).unwrap();
            prop_assert_eq!(back.compare_to(&x), Ordering::Equal);
        }

        #[test]
        fn prop_add_commutes(x in decimal(), y in wide_decimal()) {
            prop_assert_eq!(x.try_add(&y).unwrap(), y.try_add(&x).unwrap());
        }

        #[test]
        fn prop_multiply_scale_composes(x in decimal(), y in decimal()) {
            let p = x.multiply(&y).unwrap();
            prop_assert_eq!(p.scale(), x.scale() + y.scale());
            prop_assert_eq!(p.unscaled_value(), x.unscaled_value() * y.unscaled_value());
        }

        #[test]
        fn prop_multiply_one_is_identity(x in wide_decimal()) {
            prop_assert_eq!(x.multiply(&BigDecimal::ONE).unwrap(), x);
        }

        #[test]
        fn prop_round_is_idempotent(x in wide_decimal(), p in 1u32..30, k in 0u32..10, mode in rounding_mode()) {
            let ctx = MathContext::new(p, mode);
            let once = x.round(&ctx).unwrap();
            prop_assert!(once.precision() <= p);
            prop_assert_eq!(&once.round(&ctx).unwrap(), &once);
            let looser = MathContext::new(p + k, mode);
            prop_assert_eq!(&once.round(&looser).unwrap(), &once);
            prop_assert_eq!(&once.round(&MathContext::UNLIMITED).unwrap(), &once);
        }

        #[test]
        fn prop_set_scale_brackets_value(x in wide_decimal(), s in -5i32..20) {
            let down = x.set_scale(s, RoundingMode::Floor).unwrap();
            let up = x.set_scale(s, RoundingMode::Ceiling).unwrap();
            prop_assert_ne!(down.compare_to(&x), Ordering::Greater);
            prop_assert_ne!(up.compare_to(&x), Ordering::Less);
            prop_assert!(up.subtract(&down).unwrap().compare_to(&x.ulp().max(&up.ulp())) != Ordering::Greater);
        }

        #[test]
        fn prop_integral_quotient_and_remainder(x in wide_decimal(), y in nonzero_decimal()) {
            let (q, r) = x.divide_and_remainder(&y).unwrap();
            let rebuilt = q.multiply(&y).unwrap().try_add(&r).unwrap();
            prop_assert_eq!(rebuilt.compare_to(&x), Ordering::Equal);
            prop_assert_eq!(r.abs().compare_to(&y.abs()), Ordering::Less);
            prop_assert!(r.is_zero() || r.signum() == x.signum());
        }

        #[test]
        fn prop_divide_with_context_precision(x in decimal(), y in nonzero_decimal(), p in 1u32..25, mode in rounding_mode()) {
            let q = x.divide_with_context(&y, &MathContext::new(p, mode)).unwrap();
            prop_assert!(q.precision() <= p);
        }

        #[test]
        fn prop_exact_divide_by_power_of_two(v in any::<i64>(), k in 0u32..40) {
            let x = BigDecimal::from_i64_scaled(v, 0);
            let d = BigDecimal::from(1i64 << k);
            let q = x.divide(&d).unwrap();
            prop_assert_eq!(q.multiply(&d).unwrap().compare_to(&x), Ordering::Equal);
        }
    }
}
