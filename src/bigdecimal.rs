use alloc::borrow::Cow;
use alloc::string::ToString;
use core::cmp::Ordering;
use core::hash::{Hash, Hasher};
use core::sync::atomic::{AtomicU32, Ordering as AtomicOrdering};

#[cfg(feature = "serde")]
use core::str::FromStr;
#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::biginteger::BigInteger;
use crate::decimal_arith::{divide_by_ten_pow, round_to_context};
use crate::digits::cmp_mag;
use crate::powers::{TEN_POW_U64, decimal_digits, multiply_by_five_pow, multiply_by_ten_pow, u64_digits};
use crate::rounding::{MathContext, RoundingMode};
use crate::{ArithmeticError, Result};

// ============================================================================
// Unscaled Value
// ============================================================================

/// The integer mantissa of a [`BigDecimal`].
///
/// Canonical: `Big` only holds values outside the `i64` range, so equal
/// values always have equal representations.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Unscaled {
    Small(i64),
    Big(BigInteger),
}

impl Unscaled {
    pub(crate) fn from_big(value: BigInteger) -> Self {
        match value.to_i64_exact() {
            Ok(v) => Unscaled::Small(v),
            Err(_) => Unscaled::Big(value),
        }
    }

    pub(crate) fn from_i128(value: i128) -> Self {
        match i64::try_from(value) {
            Ok(v) => Unscaled::Small(v),
            Err(_) => Unscaled::Big(BigInteger::from(value)),
        }
    }

    pub(crate) fn big(&self) -> Cow<'_, BigInteger> {
        match self {
            Unscaled::Small(v) => Cow::Owned(BigInteger::from(*v)),
            Unscaled::Big(b) => Cow::Borrowed(b),
        }
    }

    pub(crate) fn into_big(self) -> BigInteger {
        match self {
            Unscaled::Small(v) => BigInteger::from(v),
            Unscaled::Big(b) => b,
        }
    }

    #[inline]
    pub(crate) fn signum(&self) -> i32 {
        match self {
            Unscaled::Small(v) => v.signum() as i32,
            Unscaled::Big(b) => b.signum(),
        }
    }

    #[inline]
    pub(crate) fn is_zero(&self) -> bool {
        matches!(self, Unscaled::Small(0))
    }

    #[inline]
    pub(crate) fn is_odd(&self) -> bool {
        match self {
            Unscaled::Small(v) => v & 1 != 0,
            Unscaled::Big(b) => b.words()[0] & 1 != 0,
        }
    }

    /// Decimal digits of the magnitude (1 for zero).
    pub(crate) fn digits(&self) -> u64 {
        match self {
            Unscaled::Small(v) => u64_digits(v.unsigned_abs()) as u64,
            Unscaled::Big(b) => decimal_digits(b),
        }
    }

    pub(crate) fn negate(&self) -> Self {
        match self {
            Unscaled::Small(v) => match v.checked_neg() {
                Some(n) => Unscaled::Small(n),
                None => Unscaled::Big(-BigInteger::from(*v)),
            },
            Unscaled::Big(b) => Unscaled::from_big(-b),
        }
    }

    pub(crate) fn abs(&self) -> Self {
        if self.signum() < 0 { self.negate() } else { self.clone() }
    }

    pub(crate) fn add(&self, other: &Self) -> Self {
        if let (Unscaled::Small(a), Unscaled::Small(b)) = (self, other) {
            if let Some(sum) = a.checked_add(*b) {
                return Unscaled::Small(sum);
            }
        }
        Unscaled::from_big(&*self.big() + &*other.big())
    }

    pub(crate) fn mul(&self, other: &Self) -> Self {
        if let (Unscaled::Small(a), Unscaled::Small(b)) = (self, other) {
            if let Some(product) = a.checked_mul(*b) {
                return Unscaled::Small(product);
            }
        }
        Unscaled::from_big(&*self.big() * &*other.big())
    }

    /// `self * 10^n`
    pub(crate) fn mul_ten_pow(&self, n: u64) -> Result<Self> {
        if n == 0 || self.is_zero() {
            return Ok(self.clone());
        }
        if let Unscaled::Small(v) = self {
            if n < 19 {
                if let Some(p) = v.checked_mul(TEN_POW_U64[n as usize] as i64) {
                    return Ok(Unscaled::Small(p));
                }
            }
        }
        Ok(Unscaled::from_big(multiply_by_ten_pow(&self.big(), n)?))
    }

    /// Compares magnitudes.
    pub(crate) fn cmp_abs(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Unscaled::Small(a), Unscaled::Small(b)) => a.unsigned_abs().cmp(&b.unsigned_abs()),
            _ => cmp_mag(self.big().words(), other.big().words()),
        }
    }

    pub(crate) fn cmp_signed(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Unscaled::Small(a), Unscaled::Small(b)) => a.cmp(b),
            _ => Ord::cmp(&*self.big(), &*other.big()),
        }
    }

    /// Truncating quotient and remainder.
    pub(crate) fn div_rem(&self, divisor: &Self) -> Result<(Self, Self)> {
        match (self, divisor) {
            (_, Unscaled::Small(0)) => Err(ArithmeticError::DivisionByZero),
            (Unscaled::Small(a), Unscaled::Small(b)) => {
                // i128 keeps i64::MIN / -1 representable.
                let (a, b) = (*a as i128, *b as i128);
                Ok((Unscaled::from_i128(a / b), Unscaled::from_i128(a % b)))
            }
            _ => {
                let (q, r) = self.big().try_div_rem(&divisor.big())?;
                Ok((Unscaled::from_big(q), Unscaled::from_big(r)))
            }
        }
    }

    /// Quotient and remainder by ten.
    pub(crate) fn div_rem_ten(&self) -> (Self, u32) {
        match self {
            Unscaled::Small(v) => (Unscaled::Small(v / 10), (v % 10).unsigned_abs() as u32),
            Unscaled::Big(b) => {
                let (q, r) = b.div_rem_small(10);
                (Unscaled::from_big(q), r)
            }
        }
    }
}

// ============================================================================
// Core Type
// ============================================================================

/// Arbitrary-precision signed decimal: `unscaled × 10^(−scale)`.
///
/// Equality and hashing are scale-sensitive (`1.0 != 1.00`); numeric
/// comparison ignores scale, see [`BigDecimal::compare_to`]. There is no
/// `Ord` impl because the two notions disagree.
pub struct BigDecimal {
    pub(crate) int_val: Unscaled,
    pub(crate) scale: i32,
    /// Digit count of `int_val`, 0 until first computed.
    precision: AtomicU32,
}

const PRECISION_UNKNOWN: u32 = 0;

/// Exact powers of ten representable as `f64`.
const F64_TEN_POW: [f64; 23] = [
    1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15, 1e16,
    1e17, 1e18, 1e19, 1e20, 1e21, 1e22,
];

// The constants carry a fresh, unset precision cell on every use.
#[allow(clippy::declare_interior_mutable_const)]
impl BigDecimal {
    /// 0 with scale 0.
    pub const ZERO: Self = Self::from_i64_scaled(0, 0);

    /// 1 with scale 0.
    pub const ONE: Self = Self::from_i64_scaled(1, 0);

    /// 10 with scale 0.
    pub const TEN: Self = Self::from_i64_scaled(10, 0);

    /// Largest exponent accepted by [`BigDecimal::pow`].
    pub const MAX_POW_EXPONENT: i32 = 999_999_999;
}

impl BigDecimal {
    /// Creates `unscaled × 10^(−scale)` from an `i64` mantissa.
    #[inline]
    pub const fn from_i64_scaled(unscaled: i64, scale: i32) -> Self {
        Self {
            int_val: Unscaled::Small(unscaled),
            scale,
            precision: AtomicU32::new(PRECISION_UNKNOWN),
        }
    }

    /// Creates `unscaled × 10^(−scale)`.
    pub fn new(unscaled: BigInteger, scale: i32) -> Self {
        Self::from_unscaled(Unscaled::from_big(unscaled), scale)
    }

    #[inline]
    pub(crate) fn from_unscaled(int_val: Unscaled, scale: i32) -> Self {
        Self::with_precision(int_val, scale, PRECISION_UNKNOWN)
    }

    #[inline]
    pub(crate) fn with_precision(int_val: Unscaled, scale: i32, precision: u32) -> Self {
        Self {
            int_val,
            scale,
            precision: AtomicU32::new(precision),
        }
    }

    #[inline]
    pub(crate) fn zero_with_scale(scale: i32) -> Self {
        Self::with_precision(Unscaled::Small(0), scale, 1)
    }

    /// The unscaled value as a [`BigInteger`].
    pub fn unscaled_value(&self) -> BigInteger {
        self.int_val.big().into_owned()
    }

    #[inline]
    pub fn scale(&self) -> i32 {
        self.scale
    }

    /// Number of decimal digits in the unscaled value (1 for zero).
    ///
    /// Computed on first use and memoized.
    pub fn precision(&self) -> u32 {
        let cached = self.precision.load(AtomicOrdering::Relaxed);
        if cached != PRECISION_UNKNOWN {
            return cached;
        }
        let digits = self.int_val.digits() as u32;
        self.precision.store(digits, AtomicOrdering::Relaxed);
        digits
    }

    /// Returns -1, 0 or 1.
    #[inline]
    pub fn signum(&self) -> i32 {
        self.int_val.signum()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.int_val.is_zero()
    }

    /// One unit in the last place: `1 × 10^(−scale)`.
    pub fn ulp(&self) -> Self {
        Self::with_precision(Unscaled::Small(1), self.scale, 1)
    }

    #[inline]
    fn cached_precision(&self) -> u32 {
        self.precision.load(AtomicOrdering::Relaxed)
    }
}

/// Narrows a computed scale to 32 bits.
///
/// A scale above `i32::MAX` means the value is too small to represent
/// (`ScaleUnderflow`); below `i32::MIN` it is too large (`ScaleOverflow`).
pub(crate) fn narrow_scale(scale: i64) -> Result<i32> {
    if scale > i32::MAX as i64 {
        Err(ArithmeticError::ScaleUnderflow)
    } else if scale < i32::MIN as i64 {
        Err(ArithmeticError::ScaleOverflow)
    } else {
        Ok(scale as i32)
    }
}

impl Clone for BigDecimal {
    fn clone(&self) -> Self {
        Self::with_precision(self.int_val.clone(), self.scale, self.cached_precision())
    }
}

impl Default for BigDecimal {
    fn default() -> Self {
        Self::ZERO
    }
}

impl PartialEq for BigDecimal {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.scale == other.scale && self.int_val == other.int_val
    }
}

impl Eq for BigDecimal {}

impl Hash for BigDecimal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.int_val.hash(state);
        self.scale.hash(state);
    }
}

// ============================================================================
// Comparison
// ============================================================================

impl BigDecimal {
    /// Numeric three-way comparison, ignoring scale: `1.0` and `1.00`
    /// compare equal.
    pub fn compare_to(&self, other: &Self) -> Ordering {
        if self.scale == other.scale {
            return self.int_val.cmp_signed(&other.int_val);
        }
        let (xs, ys) = (self.signum(), other.signum());
        if xs != ys {
            return xs.cmp(&ys);
        }
        if xs == 0 {
            return Ordering::Equal;
        }
        let cmp = self.compare_magnitude(other);
        if xs > 0 { cmp } else { cmp.reverse() }
    }

    /// Compares `|self|` with `|other|`.
    pub(crate) fn compare_magnitude(&self, other: &Self) -> Ordering {
        let sdiff = self.scale as i64 - other.scale as i64;
        if sdiff != 0 {
            // Adjusted exponents decide unless they tie.
            let xae = self.precision() as i64 - self.scale as i64;
            let yae = other.precision() as i64 - other.scale as i64;
            match xae.cmp(&yae) {
                Ordering::Equal => {}
                ord => return ord,
            }
            // Equal adjusted exponents bound the alignment to the precision
            // difference, so these multiplications stay small.
            let aligned = if sdiff < 0 {
                self.int_val
                    .mul_ten_pow(sdiff.unsigned_abs())
                    .map(|x| x.cmp_abs(&other.int_val))
            } else {
                other
                    .int_val
                    .mul_ten_pow(sdiff as u64)
                    .map(|y| self.int_val.cmp_abs(&y))
            };
            if let Ok(ord) = aligned {
                return ord;
            }
        }
        self.int_val.cmp_abs(&other.int_val)
    }

    /// The numerically smaller of the two; `self` on a tie.
    pub fn min(&self, other: &Self) -> Self {
        if self.compare_to(other) != Ordering::Greater {
            self.clone()
        } else {
            other.clone()
        }
    }

    /// The numerically larger of the two; `self` on a tie.
    pub fn max(&self, other: &Self) -> Self {
        if self.compare_to(other) != Ordering::Less {
            self.clone()
        } else {
            other.clone()
        }
    }
}

// ============================================================================
// Scale Operations
// ============================================================================

/// Removes trailing decimal zeros while the scale stays above `preferred`.
///
/// # Errors
/// Returns `ArithmeticError::ScaleOverflow` if a removable zero would take
/// the scale below `i32::MIN`.
pub(crate) fn strip_zeros_to_scale(mut int_val: Unscaled, mut scale: i32, preferred: i64) -> Result<BigDecimal> {
    while (scale as i64) > preferred
        && int_val.cmp_abs(&Unscaled::Small(10)) != Ordering::Less
        && !int_val.is_odd()
    {
        let (q, r) = int_val.div_rem_ten();
        if r != 0 {
            break;
        }
        int_val = q;
        scale = narrow_scale(scale as i64 - 1)?;
    }
    Ok(BigDecimal::from_unscaled(int_val, scale))
}

impl BigDecimal {
    /// Returns a value with the given scale, rounding with `mode` when digits
    /// are discarded.
    ///
    /// # Errors
    /// Returns `ArithmeticError::RoundingNecessary` if `mode` is
    /// [`RoundingMode::Unnecessary`] and a non-zero digit would be lost.
    pub fn set_scale(&self, new_scale: i32, mode: RoundingMode) -> Result<Self> {
        let old = self.scale;
        if new_scale == old {
            return Ok(self.clone());
        }
        if self.is_zero() {
            return Ok(Self::zero_with_scale(new_scale));
        }
        if new_scale > old {
            let raise = (new_scale as i64 - old as i64) as u64;
            let precision = self.cached_precision();
            let int_val = self.int_val.mul_ten_pow(raise)?;
            let precision = if precision == PRECISION_UNKNOWN {
                PRECISION_UNKNOWN
            } else {
                precision + raise as u32
            };
            Ok(Self::with_precision(int_val, new_scale, precision))
        } else {
            let drop = (old as i64 - new_scale as i64) as u64;
            let int_val = divide_by_ten_pow(&self.int_val, drop, mode)?;
            Ok(Self::from_unscaled(int_val, new_scale))
        }
    }

    /// [`set_scale`](Self::set_scale) that fails rather than round.
    pub fn set_scale_exact(&self, new_scale: i32) -> Result<Self> {
        self.set_scale(new_scale, RoundingMode::Unnecessary)
    }

    /// Moves the decimal point `n` places left; the result scale is never
    /// negative.
    pub fn move_point_left(&self, n: i32) -> Result<Self> {
        self.move_point(self.scale as i64 + n as i64, n)
    }

    /// Moves the decimal point `n` places right; the result scale is never
    /// negative.
    pub fn move_point_right(&self, n: i32) -> Result<Self> {
        self.move_point(self.scale as i64 - n as i64, n)
    }

    fn move_point(&self, new_scale: i64, n: i32) -> Result<Self> {
        if n == 0 {
            return Ok(self.clone());
        }
        let moved = Self::with_precision(
            self.int_val.clone(),
            narrow_scale(new_scale)?,
            self.cached_precision(),
        );
        if moved.scale < 0 {
            moved.set_scale(0, RoundingMode::Unnecessary)
        } else {
            Ok(moved)
        }
    }

    /// Returns `self × 10^n` by adjusting the scale only.
    pub fn scale_by_power_of_ten(&self, n: i32) -> Result<Self> {
        Ok(Self::with_precision(
            self.int_val.clone(),
            narrow_scale(self.scale as i64 - n as i64)?,
            self.cached_precision(),
        ))
    }

    /// Numerically equal value with all trailing zeros removed; zero becomes
    /// `0` with scale 0.
    ///
    /// # Errors
    /// Returns `ArithmeticError::ScaleOverflow` when removing a zero would
    /// push the scale below `i32::MIN`.
    pub fn strip_trailing_zeros(&self) -> Result<Self> {
        if self.is_zero() {
            return Ok(Self::ZERO);
        }
        strip_zeros_to_scale(self.int_val.clone(), self.scale, i64::MIN)
    }

    /// Rounds to the precision of `mc`.
    pub fn round(&self, mc: &MathContext) -> Result<Self> {
        round_to_context(self.clone(), mc)
    }
}

// ============================================================================
// Integer Conversions
// ============================================================================

impl BigDecimal {
    /// Integer part, truncating any fraction.
    ///
    /// # Errors
    /// Returns `ArithmeticError::InvalidOperation` if a large negative scale
    /// would need more than [`MAX_MAGNITUDE_WORDS`](crate::MAX_MAGNITUDE_WORDS).
    pub fn to_big_integer(&self) -> Result<BigInteger> {
        self.integer_part(RoundingMode::Down)
    }

    /// Integer value, failing if there is a non-zero fraction.
    pub fn to_big_integer_exact(&self) -> Result<BigInteger> {
        self.integer_part(RoundingMode::Unnecessary)
    }

    fn integer_part(&self, mode: RoundingMode) -> Result<BigInteger> {
        if self.scale <= 0 {
            return multiply_by_ten_pow(&self.int_val.big(), self.scale.unsigned_abs() as u64);
        }
        Ok(divide_by_ten_pow(&self.int_val, self.scale as u64, mode)?.into_big())
    }

    /// Low 64 bits of the integer part, like a primitive `as` cast.
    pub fn to_i64(&self) -> i64 {
        if self.scale <= 0 {
            let shift = self.scale.unsigned_abs();
            // 10^64 carries a factor of 2^64, clearing every low bit.
            if shift >= 64 {
                return 0;
            }
            let low = self.int_val.big().to_u64_wrapping();
            let mut factor: u64 = 1;
            for _ in 0..shift {
                factor = factor.wrapping_mul(10);
            }
            return low.wrapping_mul(factor) as i64;
        }
        match divide_by_ten_pow(&self.int_val, self.scale as u64, RoundingMode::Down) {
            Ok(Unscaled::Small(v)) => v,
            Ok(Unscaled::Big(b)) => b.to_i64_wrapping(),
            Err(_) => 0,
        }
    }

    /// Low 32 bits of the integer part.
    #[inline]
    pub fn to_i32(&self) -> i32 {
        self.to_i64() as i32
    }

    /// Exact conversion to `i64`.
    ///
    /// # Errors
    /// `RoundingNecessary` for a non-zero fraction, `Overflow` when the
    /// integer value is outside `i64`.
    pub fn to_i64_exact(&self) -> Result<i64> {
        if self.is_zero() {
            return Ok(0);
        }
        let int_digits = self.precision() as i64 - self.scale as i64;
        if int_digits <= 0 {
            return Err(ArithmeticError::RoundingNecessary);
        }
        if int_digits > 19 {
            return Err(ArithmeticError::Overflow);
        }
        match self.set_scale(0, RoundingMode::Unnecessary)?.int_val {
            Unscaled::Small(v) => Ok(v),
            Unscaled::Big(_) => Err(ArithmeticError::Overflow),
        }
    }

    pub fn to_i32_exact(&self) -> Result<i32> {
        i32::try_from(self.to_i64_exact()?).map_err(|_| ArithmeticError::Overflow)
    }

    pub fn to_i16_exact(&self) -> Result<i16> {
        i16::try_from(self.to_i64_exact()?).map_err(|_| ArithmeticError::Overflow)
    }

    pub fn to_i8_exact(&self) -> Result<i8> {
        i8::try_from(self.to_i64_exact()?).map_err(|_| ArithmeticError::Overflow)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {$(
        impl From<$t> for BigDecimal {
            #[inline]
            fn from(value: $t) -> Self {
                Self::from_i64_scaled(value as i64, 0)
            }
        }
    )*};
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for BigDecimal {
    fn from(value: u64) -> Self {
        Self::from_unscaled(Unscaled::from_i128(value as i128), 0)
    }
}

impl From<i128> for BigDecimal {
    fn from(value: i128) -> Self {
        Self::from_unscaled(Unscaled::from_i128(value), 0)
    }
}

impl From<BigInteger> for BigDecimal {
    fn from(value: BigInteger) -> Self {
        Self::new(value, 0)
    }
}

impl From<&BigInteger> for BigDecimal {
    fn from(value: &BigInteger) -> Self {
        Self::new(value.clone(), 0)
    }
}

// ============================================================================
// Floating Point Conversions
// ============================================================================

impl BigDecimal {
    /// The exact binary value of `value` as a decimal.
    ///
    /// `0.1` becomes `0.1000000000000000055511151231257827021181583404541015625`.
    ///
    /// # Errors
    /// Returns `ArithmeticError::InvalidFormat` for NaN and infinities.
    pub fn try_from_f64(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(ArithmeticError::InvalidFormat);
        }
        let bits = value.to_bits();
        let negative = bits >> 63 != 0;
        let biased = ((bits >> 52) & 0x7FF) as i64;
        let fraction = bits & ((1u64 << 52) - 1);
        let mut significand = if biased == 0 {
            fraction << 1
        } else {
            fraction | (1u64 << 52)
        };
        let mut exponent = biased - 1075;
        if significand == 0 {
            return Ok(Self::ZERO);
        }
        let tz = significand.trailing_zeros();
        significand >>= tz;
        exponent += tz as i64;

        let unscaled = BigInteger::from(significand);
        let unscaled = if negative { -unscaled } else { unscaled };
        let (int_val, scale) = match exponent.cmp(&0) {
            Ordering::Equal => (unscaled, 0),
            // significand × 2^-e = significand × 5^e / 10^e
            Ordering::Less => (
                multiply_by_five_pow(&unscaled, exponent.unsigned_abs())?,
                exponent.unsigned_abs() as i32,
            ),
            Ordering::Greater => (unscaled.shift_left(exponent as u64), 0),
        };
        Ok(Self::new(int_val, scale))
    }

    /// The exact value of `value` rounded to `mc`.
    pub fn from_f64_rounded(value: f64, mc: &MathContext) -> Result<Self> {
        Self::try_from_f64(value)?.round(mc)
    }

    /// Nearest `f64`, correctly rounded; ±infinity beyond range.
    pub fn to_f64(&self) -> f64 {
        if let Unscaled::Small(v) = self.int_val {
            // Both operands are exact doubles, so one IEEE operation rounds
            // correctly.
            if v.unsigned_abs() < (1u64 << 53) && (0..=22).contains(&self.scale) {
                return v as f64 / F64_TEN_POW[self.scale as usize];
            }
        }
        self.to_string().parse::<f64>().unwrap_or(f64::NAN)
    }

    /// Nearest `f32`, correctly rounded.
    pub fn to_f32(&self) -> f32 {
        self.to_string().parse::<f32>().unwrap_or(f32::NAN)
    }
}

impl TryFrom<f64> for BigDecimal {
    type Error = ArithmeticError;

    fn try_from(value: f64) -> Result<Self> {
        Self::try_from_f64(value)
    }
}

impl TryFrom<f32> for BigDecimal {
    type Error = ArithmeticError;

    fn try_from(value: f32) -> Result<Self> {
        Self::try_from_f64(value as f64)
    }
}

// ============================================================================
// Serde Support
// ============================================================================

#[cfg(feature = "serde")]
impl Serialize for BigDecimal {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            (self.unscaled_value(), self.scale).serialize(serializer)
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for BigDecimal {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let s = alloc::string::String::deserialize(deserializer)?;
            Self::from_str(&s).map_err(de::Error::custom)
        } else {
            let (unscaled, scale) = <(BigInteger, i32)>::deserialize(deserializer)?;
            Ok(Self::new(unscaled, scale))
        }
    }
}
