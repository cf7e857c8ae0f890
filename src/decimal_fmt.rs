//! Decimal string parsing and the three output notations.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use crate::bigdecimal::{BigDecimal, Unscaled, narrow_scale};
use crate::biginteger::{BigInteger, Sign};
use crate::rounding::{MathContext, RoundingMode};
use crate::{ArithmeticError, Result};

/// Exponent magnitudes beyond this cannot produce a 32-bit scale.
const EXPONENT_CAP: i64 = 1 << 40;

/// Plain notation is used down to this adjusted exponent.
const PLAIN_MIN_ADJUSTED: i64 = -6;

// ============================================================================
// String Parsing
// ============================================================================

/// Parses an optionally signed run of exponent digits.
fn parse_exponent(s: &str) -> Result<i64> {
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    if digits.is_empty() {
        return Err(ArithmeticError::InvalidFormat);
    }
    let mut value: i64 = 0;
    for b in digits.bytes() {
        let d = b.wrapping_sub(b'0');
        if d > 9 {
            return Err(ArithmeticError::InvalidFormat);
        }
        value = (value * 10 + d as i64).min(EXPONENT_CAP);
    }
    Ok(if negative { -value } else { value })
}

impl BigDecimal {
    /// Parses a decimal string using `separator` as the decimal point.
    ///
    /// Accepts an optional sign, digits with at most one separator and an
    /// optional `e`/`E` exponent with its own optional sign. The scale is the
    /// number of fraction digits minus the exponent; leading zeros do not
    /// count toward the precision.
    ///
    /// # Errors
    /// - `InvalidFormat` for anything else.
    /// - `ScaleOverflow` / `ScaleUnderflow` if the scale leaves the 32-bit
    ///   range.
    pub fn from_str_with_separator(s: &str, separator: char) -> Result<Self> {
        if separator.is_ascii_digit() || matches!(separator, 'e' | 'E' | '+' | '-') {
            return Err(ArithmeticError::InvalidFormat);
        }
        let s = s.trim();
        let (negative, body) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };

        let mut digits: Vec<u8> = Vec::with_capacity(body.len());
        let mut seen_digit = false;
        let mut seen_separator = false;
        let mut fraction_digits: i64 = 0;
        let mut exponent: i64 = 0;

        let mut chars = body.chars();
        while let Some(c) = chars.next() {
            match c {
                '0'..='9' => {
                    seen_digit = true;
                    if c != '0' || !digits.is_empty() {
                        digits.push(c as u8);
                    }
                    if seen_separator {
                        fraction_digits += 1;
                    }
                }
                'e' | 'E' => {
                    exponent = parse_exponent(chars.as_str())?;
                    break;
                }
                c if c == separator && !seen_separator => seen_separator = true,
                _ => return Err(ArithmeticError::InvalidFormat),
            }
        }
        if !seen_digit {
            return Err(ArithmeticError::InvalidFormat);
        }

        let scale = narrow_scale(fraction_digits - exponent)?;
        let precision = digits.len().max(1) as u32;
        let int_val = if digits.len() <= 18 {
            let magnitude = digits
                .iter()
                .fold(0i64, |acc, &b| acc * 10 + (b - b'0') as i64);
            Unscaled::Small(if negative { -magnitude } else { magnitude })
        } else {
            let sign = if negative { Sign::Minus } else { Sign::Plus };
            Unscaled::from_big(BigInteger::from_digit_bytes(sign, &digits, 10)?)
        };
        Ok(Self::with_precision(int_val, scale, precision))
    }

    /// Parses `s` and rounds the result to `mc`.
    pub fn from_str_with_context(s: &str, mc: &MathContext) -> Result<Self> {
        Self::from_str(s)?.round(mc)
    }

    /// Parse from a UTF-8 byte slice.
    pub fn from_utf8_bytes(bytes: &[u8]) -> Result<Self> {
        let s = core::str::from_utf8(bytes).map_err(|_| ArithmeticError::InvalidFormat)?;
        Self::from_str(s)
    }

    /// The decimal form of the shortest string that round-trips `value`,
    /// keeping at least one fraction digit: `1.0` has scale 1 and `1e10`
    /// becomes `1.0E+10`.
    ///
    /// # Errors
    /// Returns `ArithmeticError::InvalidFormat` for NaN and infinities.
    pub fn from_f64_shortest(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(ArithmeticError::InvalidFormat);
        }
        if value == 0.0 {
            return Ok(Self::zero_with_scale(1));
        }
        // `{:e}` yields the shortest round-trip digits as `d.ddde<exp>`.
        let sci = alloc::format!("{:e}", value.abs());
        let (mantissa, exp) = sci.split_once('e').ok_or(ArithmeticError::InvalidFormat)?;
        let exp: i64 = exp.parse().map_err(|_| ArithmeticError::InvalidFormat)?;
        let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
        let fraction_len = digits.len() as i64 - 1;

        // Between 10^-3 and 10^7 the text form is plain, otherwise
        // scientific; either way it shows at least one fraction digit.
        let plain = (1e-3..1e7).contains(&value.abs());
        let shown = if plain { fraction_len - exp } else { fraction_len };
        let text_scale = shown.max(1);
        let scale = if plain { text_scale } else { text_scale - exp };

        let mut unscaled: i64 = digits.parse().map_err(|_| ArithmeticError::InvalidFormat)?;
        unscaled *= 10i64.pow((text_scale - shown) as u32);
        if value < 0.0 {
            unscaled = -unscaled;
        }
        Ok(Self::from_i64_scaled(unscaled, narrow_scale(scale)?))
    }
}

impl FromStr for BigDecimal {
    type Err = ArithmeticError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_with_separator(s, '.')
    }
}

// ============================================================================
// Formatting
// ============================================================================

#[derive(Copy, Clone, PartialEq, Eq)]
enum Notation {
    Scientific,
    Engineering,
}

fn push_zeros(buf: &mut String, count: i64) {
    for _ in 0..count {
        buf.push('0');
    }
}

impl BigDecimal {
    /// Magnitude digits of the unscaled value.
    fn coefficient(&self) -> String {
        match &self.int_val {
            Unscaled::Small(v) => v.unsigned_abs().to_string(),
            Unscaled::Big(b) => b.abs().to_str_radix(10),
        }
    }

    /// Inserts the decimal point `scale` digits from the right of `coeff`.
    fn push_with_point(buf: &mut String, coeff: &str, scale: i64) {
        let len = coeff.len() as i64;
        let pad = scale - len;
        if pad >= 0 {
            buf.push_str("0.");
            push_zeros(buf, pad);
            buf.push_str(coeff);
        } else {
            let split = (len - scale) as usize;
            buf.push_str(&coeff[..split]);
            buf.push('.');
            buf.push_str(&coeff[split..]);
        }
    }

    fn layout(&self, notation: Notation) -> String {
        let coeff = self.coefficient();
        let mut buf = String::with_capacity(coeff.len() + 16);
        if self.signum() < 0 {
            buf.push('-');
        }
        if self.scale == 0 {
            buf.push_str(&coeff);
            return buf;
        }
        let len = coeff.len() as i64;
        let scale = self.scale as i64;
        let mut adjusted = -scale + (len - 1);
        if scale > 0 && adjusted >= PLAIN_MIN_ADJUSTED {
            Self::push_with_point(&mut buf, &coeff, scale);
            return buf;
        }

        match notation {
            Notation::Scientific => {
                buf.push_str(&coeff[..1]);
                if len > 1 {
                    buf.push('.');
                    buf.push_str(&coeff[1..]);
                }
            }
            Notation::Engineering => {
                let mut sig = adjusted.rem_euclid(3);
                adjusted -= sig;
                sig += 1;
                if self.is_zero() {
                    match sig {
                        1 => buf.push('0'),
                        2 => {
                            buf.push_str("0.00");
                            adjusted += 3;
                        }
                        _ => {
                            buf.push_str("0.0");
                            adjusted += 3;
                        }
                    }
                } else if sig >= len {
                    buf.push_str(&coeff);
                    push_zeros(&mut buf, sig - len);
                } else {
                    let split = sig as usize;
                    buf.push_str(&coeff[..split]);
                    buf.push('.');
                    buf.push_str(&coeff[split..]);
                }
            }
        }
        if adjusted != 0 {
            buf.push('E');
            if adjusted > 0 {
                buf.push('+');
            }
            buf.push_str(&adjusted.to_string());
        }
        buf
    }

    /// Engineering notation: like [`Display`](fmt::Display), but any
    /// exponent is a multiple of three.
    pub fn to_engineering_string(&self) -> String {
        self.layout(Notation::Engineering)
    }

    /// The value without an exponent field.
    ///
    /// A negative scale appends zeros; a zero with negative scale prints `0`.
    pub fn to_plain_string(&self) -> String {
        let coeff = self.coefficient();
        let mut buf = String::with_capacity(coeff.len() + 2);
        if self.signum() < 0 {
            buf.push('-');
        }
        match self.scale {
            0 => buf.push_str(&coeff),
            s if s < 0 => {
                if self.is_zero() {
                    return String::from("0");
                }
                buf.push_str(&coeff);
                push_zeros(&mut buf, -(s as i64));
            }
            s => Self::push_with_point(&mut buf, &coeff, s as i64),
        }
        buf
    }
}

fn pad(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    let (non_negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (false, rest),
        None => (true, s),
    };
    f.pad_integral(non_negative, "", digits)
}

/// Scientific notation when the scale is negative or the adjusted exponent
/// is below -6, plain otherwise. `{:.N}` prints plain with `N` fraction
/// digits, rounding half up.
impl fmt::Display for BigDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(precision) = f.precision() {
            let scale = i32::try_from(precision).map_err(|_| fmt::Error)?;
            let rounded = self
                .set_scale(scale, RoundingMode::HalfUp)
                .map_err(|_| fmt::Error)?;
            return pad(f, &rounded.to_plain_string());
        }
        pad(f, &self.layout(Notation::Scientific))
    }
}

impl fmt::Debug for BigDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            // {:#?} shows raw internals
            f.debug_struct("BigDecimal")
                .field("int_val", &self.int_val)
                .field("scale", &self.scale)
                .field("precision", &self.precision())
                .finish()
        } else {
            write!(f, "BigDecimal({})", self)
        }
    }
}
