//! Rounding modes, the fraction-indicator resolver, and `MathContext`.

use core::fmt;
use core::str::FromStr;

use crate::{ArithmeticError, Result};

/// How a discarded fraction adjusts the retained digits.
///
/// The examples in each variant show results of rounding to an integer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RoundingMode {
    /// Away from zero: `2.1 -> 3`, `-2.1 -> -3`.
    Up,
    /// Toward zero (truncation): `2.9 -> 2`, `-2.9 -> -2`.
    Down,
    /// Toward positive infinity: `2.1 -> 3`, `-2.9 -> -2`.
    Ceiling,
    /// Toward negative infinity: `2.9 -> 2`, `-2.1 -> -3`.
    Floor,
    /// Nearest neighbor, ties away from zero: `2.5 -> 3`.
    HalfUp,
    /// Nearest neighbor, ties toward zero: `2.5 -> 2`.
    HalfDown,
    /// Nearest neighbor, ties to the even neighbor: `2.5 -> 2`, `3.5 -> 4`.
    HalfEven,
    /// Asserts the result is exact; any discarded fraction is an error.
    Unnecessary,
}

impl RoundingMode {
    const NAMES: [(RoundingMode, &'static str); 8] = [
        (RoundingMode::Up, "UP"),
        (RoundingMode::Down, "DOWN"),
        (RoundingMode::Ceiling, "CEILING"),
        (RoundingMode::Floor, "FLOOR"),
        (RoundingMode::HalfUp, "HALF_UP"),
        (RoundingMode::HalfDown, "HALF_DOWN"),
        (RoundingMode::HalfEven, "HALF_EVEN"),
        (RoundingMode::Unnecessary, "UNNECESSARY"),
    ];

    fn name(self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(mode, _)| *mode == self)
            .map_or("", |(_, name)| *name)
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RoundingMode {
    type Err = ArithmeticError;

    fn from_str(s: &str) -> Result<Self> {
        Self::NAMES
            .iter()
            .find(|(_, name)| *name == s)
            .map(|(mode, _)| *mode)
            .ok_or(ArithmeticError::InvalidFormat)
    }
}

// ============================================================================
// Resolver
// ============================================================================

/// Encodes a discarded fraction as a small signed indicator.
///
/// Returns 0 when nothing was discarded, otherwise `sign * 4`, `sign * 5` or
/// `sign * 6` for a fraction below, at or above one half, where `sign` is the
/// sign of the exact result and `half_cmp` compares twice the discarded
/// remainder against the divisor.
#[inline]
pub(crate) fn fraction_indicator(sign: i32, remainder_is_zero: bool, half_cmp: core::cmp::Ordering) -> i32 {
    if remainder_is_zero {
        0
    } else {
        sign * (5 + half_cmp as i32)
    }
}

/// Decides the increment (-1, 0 or 1) to apply to a truncated quotient.
///
/// `odd` is the parity of the truncated quotient and `fraction` the indicator
/// built by [`fraction_indicator`].
///
/// # Errors
/// Returns `ArithmeticError::RoundingNecessary` when `mode` is
/// [`RoundingMode::Unnecessary`] and the fraction is non-zero.
pub(crate) fn resolve(odd: bool, fraction: i32, mode: RoundingMode) -> Result<i32> {
    let signum = fraction.signum();
    let increment = match mode {
        RoundingMode::Unnecessary => {
            if fraction != 0 {
                return Err(ArithmeticError::RoundingNecessary);
            }
            0
        }
        RoundingMode::Up => signum,
        RoundingMode::Down => 0,
        RoundingMode::Ceiling => signum.max(0),
        RoundingMode::Floor => signum.min(0),
        RoundingMode::HalfUp if fraction.abs() >= 5 => signum,
        RoundingMode::HalfDown if fraction.abs() > 5 => signum,
        RoundingMode::HalfEven if fraction.abs() + odd as i32 > 5 => signum,
        _ => 0,
    };
    Ok(increment)
}

// ============================================================================
// MathContext
// ============================================================================

/// A target precision (significant digits) and a rounding mode.
///
/// A precision of 0 means unlimited: operations are exact.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MathContext {
    precision: u32,
    rounding_mode: RoundingMode,
}

impl MathContext {
    /// Exact arithmetic.
    pub const UNLIMITED: MathContext = MathContext::new(0, RoundingMode::HalfUp);
    /// IEEE 754-2008 decimal32: 7 digits, half even.
    pub const DECIMAL32: MathContext = MathContext::new(7, RoundingMode::HalfEven);
    /// IEEE 754-2008 decimal64: 16 digits, half even.
    pub const DECIMAL64: MathContext = MathContext::new(16, RoundingMode::HalfEven);
    /// IEEE 754-2008 decimal128: 34 digits, half even.
    pub const DECIMAL128: MathContext = MathContext::new(34, RoundingMode::HalfEven);

    #[inline]
    pub const fn new(precision: u32, rounding_mode: RoundingMode) -> Self {
        Self {
            precision,
            rounding_mode,
        }
    }

    /// Context with the given precision and [`RoundingMode::HalfUp`].
    #[inline]
    pub const fn with_precision(precision: u32) -> Self {
        Self::new(precision, RoundingMode::HalfUp)
    }

    #[inline]
    pub const fn precision(&self) -> u32 {
        self.precision
    }

    #[inline]
    pub const fn rounding_mode(&self) -> RoundingMode {
        self.rounding_mode
    }

    #[inline]
    pub const fn is_unlimited(&self) -> bool {
        self.precision == 0
    }
}

impl Default for MathContext {
    fn default() -> Self {
        Self::UNLIMITED
    }
}

impl fmt::Display for MathContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "precision={} roundingMode={}",
            self.precision, self.rounding_mode
        )
    }
}

/// Parses the [`Display`](fmt::Display) form, e.g.
/// `precision=34 roundingMode=HALF_EVEN`.
impl FromStr for MathContext {
    type Err = ArithmeticError;

    fn from_str(s: &str) -> Result<Self> {
        let rest = s
            .strip_prefix("precision=")
            .ok_or(ArithmeticError::InvalidFormat)?;
        let (digits, mode) = rest
            .split_once(" roundingMode=")
            .ok_or(ArithmeticError::InvalidFormat)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ArithmeticError::InvalidFormat);
        }
        let precision = digits
            .parse::<u32>()
            .map_err(|_| ArithmeticError::InvalidFormat)?;
        Ok(Self::new(precision, mode.parse()?))
    }
}
