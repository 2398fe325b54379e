//! QPSK modulation of codewords and soft demodulation of received symbols
//!
//! Each pair of code bits `(b0, b1)` is mapped to one symbol whose real part is `+1/sqrt(2)` if
//! `b0` is `One` and `-1/sqrt(2)` otherwise, and whose imaginary part depends likewise on `b1`.
//! The demodulator returns the real and imaginary parts of each received symbol, unscaled, as the
//! LLR values of the corresponding code bits.
//!
//! # Examples
//!
//! ```
//! use pucch_f2::{qpsk, Bit, BlockCode};
//! use Bit::{One, Zero};
//!
//! let code = BlockCode::new(2)?;
//! let syms = qpsk::modulate(&code.encode(&[One, Zero])?)?;
//! let code_bits_llr = qpsk::demodulate(&syms)?;
//! assert!(code_bits_llr[0] > 0.0 && code_bits_llr[1] > 0.0);
//! assert_eq!(code.decode(&code_bits_llr)?, [One, Zero]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::f64::consts::FRAC_1_SQRT_2;

use itertools::Itertools;
use num_complex::Complex64;

use crate::{Bit, Error, CODEWORD_LEN};

/// Number of QPSK symbols per codeword
pub const NUM_SYMBOLS: usize = CODEWORD_LEN / 2;

/// Returns QPSK symbols for given code bits.
///
/// # Parameters
///
/// - `code_bits`: Code bits to be modulated.
///
/// # Returns
///
/// - `syms`: [`NUM_SYMBOLS`] unit-energy QPSK symbols.
///
/// # Errors
///
/// Returns an error if `code_bits.len()` is not equal to [`CODEWORD_LEN`].
pub fn modulate(code_bits: &[Bit]) -> Result<Vec<Complex64>, Error> {
    if code_bits.len() != CODEWORD_LEN {
        return Err(Error::InvalidInput(format!(
            "Expected {CODEWORD_LEN} code bits (found {})",
            code_bits.len()
        )));
    }
    Ok(code_bits
        .iter()
        .tuples()
        .map(|(&b0, &b1)| Complex64::new(axis_value(b0), axis_value(b1)))
        .collect())
}

/// Returns code bit LLR values for given received symbols.
///
/// # Parameters
///
/// - `syms`: Received QPSK symbols.
///
/// # Returns
///
/// - `code_bits_llr`: [`CODEWORD_LEN`] LLR values, with positive values indicating that `One` is
///   more likely. These are the real and imaginary parts of each symbol in turn.
///
/// # Errors
///
/// Returns an error if `syms.len()` is not equal to [`NUM_SYMBOLS`].
pub fn demodulate(syms: &[Complex64]) -> Result<Vec<f64>, Error> {
    if syms.len() != NUM_SYMBOLS {
        return Err(Error::InvalidInput(format!(
            "Expected {NUM_SYMBOLS} QPSK symbols (found {})",
            syms.len()
        )));
    }
    Ok(syms.iter().flat_map(|s| [s.re, s.im]).collect())
}

/// Returns in-phase or quadrature component for given bit.
fn axis_value(bit: Bit) -> f64 {
    match bit {
        Bit::Zero => -FRAC_1_SQRT_2,
        Bit::One => FRAC_1_SQRT_2,
    }
}
