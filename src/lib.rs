//! Arbitrary-precision integer and scaled-decimal arithmetic
//!
//! This library provides two exact numeric types built on one digit engine:
//!
//! - **`BigInteger`**: sign + little-endian 32-bit magnitude words
//!   - Schoolbook and Karatsuba multiplication, normalized long division
//!   - Binary GCD, Montgomery `mod_pow` / `mod_inverse`
//!   - Use cases: cryptographic key arithmetic, exact rational numerators
//!
//! - **`BigDecimal`**: unscaled `BigInteger` × 10^(−scale)
//!   - 32-bit scale, lazily memoized precision, 64-bit fast path
//!   - Eight rounding modes driven by a [`MathContext`]
//!   - Use cases: financial-grade precision, exact decimal expansion
//!
//! ## Features
//!
//! - **Exact by default**: no operation silently approximates; rounding only
//!   happens when a [`MathContext`] or [`RoundingMode`] asks for it
//! - **Immutable values**: every operation returns a new instance
//! - **no_std compatible**: needs only `alloc`
//! - **Serde support** (`serde` feature), random sampling (`rand` feature),
//!   key wiping (`zeroize` feature)
//!
//! ## Example
//!
//! ```rust
//! use bigdec::{BigDecimal, BigInteger, MathContext, RoundingMode};
//! use core::str::FromStr;
//!
//! let price = BigDecimal::from_str("1234.56").unwrap();
//! let quantity = BigDecimal::from(100);
//! assert_eq!(price.multiply(&quantity).unwrap().to_string(), "123456.00");
//!
//! let third = BigDecimal::from(1)
//!     .divide_with_context(&BigDecimal::from(3), &MathContext::new(5, RoundingMode::HalfEven))
//!     .unwrap();
//! assert_eq!(third.to_string(), "0.33333");
//!
//! let r = BigInteger::from(4).mod_pow(&BigInteger::from(13), &BigInteger::from(497)).unwrap();
//! assert_eq!(r, BigInteger::from(445));
//! ```

#![no_std]
#![cfg_attr(test, allow(unused_imports))]

#[cfg(test)]
extern crate std;

extern crate alloc;

mod bigdecimal;
mod biginteger;
#[cfg(feature = "rand")]
mod bigrand;
mod decimal_arith;
mod decimal_fmt;
mod digits;
mod division;
mod logical;
mod modular;
mod multiplication;
mod powers;
mod rounding;

pub use bigdecimal::BigDecimal;
pub use biginteger::{BigInteger, Sign};
#[cfg(feature = "rand")]
pub use bigrand::RandBigInteger;
pub use multiplication::KARATSUBA_THRESHOLD;
pub use powers::MAX_MAGNITUDE_WORDS;
pub use rounding::{MathContext, RoundingMode};

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticError {
    #[error("invalid numeric format")]
    InvalidFormat,

    #[error("division by zero")]
    DivisionByZero,

    #[error("non-terminating decimal expansion; no exact representable decimal result")]
    NonTerminatingExpansion,

    #[error("rounding necessary")]
    RoundingNecessary,

    #[error("overflow: value does not fit the target type")]
    Overflow,

    #[error("scale overflow: value too large for a 32-bit scale")]
    ScaleOverflow,

    #[error("scale underflow: value too small for a 32-bit scale")]
    ScaleUnderflow,

    #[error("modulus must be positive")]
    InvalidModulus,

    #[error("value is not invertible for the given modulus")]
    NotInvertible,

    #[error("division impossible: integral quotient exceeds the context precision")]
    DivisionImpossible,

    #[error("invalid operation")]
    InvalidOperation,
}

pub type Result<T> = core::result::Result<T, ArithmeticError>;
