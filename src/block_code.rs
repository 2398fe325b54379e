//! Encoder and maximum-likelihood decoder for the (20, N) block code of PUCCH format 2

use crate::{Bit, Error};

/// Number of code bits in a codeword
pub const CODEWORD_LEN: usize = 20;

/// Supported numbers of information bits
pub const SUPPORTED_NUM_INFO_BITS: [usize; 5] = [2, 4, 6, 8, 11];

/// Number of columns in the code table
const NUM_TABLE_COLUMNS: usize = 13;

/// Basis sequences for the code, one row per code bit, with column `0` as the MSB
const CODE_TABLE: [usize; CODEWORD_LEN] = [
    0b1100000000110,
    0b1110000001110,
    0b1001001011111,
    0b1011000010111,
    0b1111000100111,
    0b1100101110111,
    0b1010101011111,
    0b1001100110111,
    0b1101100101111,
    0b1011101001111,
    0b1010011101111,
    0b1110011010111,
    0b1001010111111,
    0b1101010101111,
    0b1000110100101,
    0b1100111101101,
    0b1110111001011,
    0b1001110010011,
    0b1101111100000,
    0b1000011000000,
];

/// Block code mapping `N` information bits to [`CODEWORD_LEN`] code bits
///
/// The generator matrix is made up of the first `N` columns of the code table.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct BlockCode {
    /// Number of information bits
    num_info_bits: usize,
    /// Generator matrix rows, with bit `j` of each mask holding column `j` of the code table
    row_masks: Vec<usize>,
}

impl BlockCode {
    /// Returns block code for a given number of information bits.
    ///
    /// # Parameters
    ///
    /// - `num_info_bits`: Number of information bits. Must be one of the values in
    ///   [`SUPPORTED_NUM_INFO_BITS`].
    ///
    /// # Errors
    ///
    /// Returns an error if `num_info_bits` is not supported.
    ///
    /// # Examples
    ///
    /// ```
    /// use pucch_f2::BlockCode;
    ///
    /// let code = BlockCode::new(11)?;
    /// assert!(BlockCode::new(3).is_err());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(num_info_bits: usize) -> Result<Self, Error> {
        if !SUPPORTED_NUM_INFO_BITS.contains(&num_info_bits) {
            return Err(Error::InvalidInput(format!(
                "Number of information bits must be one of {SUPPORTED_NUM_INFO_BITS:?} (found \
                {num_info_bits})"
            )));
        }
        Ok(Self {
            num_info_bits,
            row_masks: CODE_TABLE
                .iter()
                .map(|&row| row_mask(row, num_info_bits))
                .collect(),
        })
    }

    /// Returns number of information bits.
    #[must_use]
    pub fn num_info_bits(&self) -> usize {
        self.num_info_bits
    }

    /// Returns code bits for given information bits.
    ///
    /// # Parameters
    ///
    /// - `info_bits`: Information bits to be encoded.
    ///
    /// # Returns
    ///
    /// - `code_bits`: [`CODEWORD_LEN`] code bits, each the XOR of the information bits selected
    ///   by the corresponding row of the generator matrix.
    ///
    /// # Errors
    ///
    /// Returns an error if `info_bits.len()` is not equal to the number of information bits.
    ///
    /// # Examples
    ///
    /// ```
    /// use pucch_f2::{Bit, BlockCode};
    /// use Bit::{One, Zero};
    ///
    /// let code = BlockCode::new(2)?;
    /// let code_bits = code.encode(&[One, Zero])?;
    /// assert_eq!(code_bits, [One; 20]);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn encode(&self, info_bits: &[Bit]) -> Result<Vec<Bit>, Error> {
        if info_bits.len() != self.num_info_bits {
            return Err(Error::InvalidInput(format!(
                "Expected {} information bits (found {})",
                self.num_info_bits,
                info_bits.len()
            )));
        }
        Ok(self.code_bits(info_index(info_bits)))
    }

    /// Returns information bit decisions for given code bit LLR values.
    ///
    /// Decoding is by exhaustive search over all `2^N` candidates, in increasing order of their
    /// index (bit `j` of the index is information bit `j`). The candidate whose code bits have
    /// the largest correlation with the LLR values wins; among tied candidates, the one with the
    /// smallest index wins.
    ///
    /// # Parameters
    ///
    /// - `code_bits_llr`: Log-likelihood-ratio (LLR) values for the code bits, with positive
    ///   values indicating that `One` is more likely.
    ///
    /// # Returns
    ///
    /// - `info_bits_hat`: Decisions on the information bits.
    ///
    /// # Errors
    ///
    /// Returns an error if `code_bits_llr.len()` is not equal to [`CODEWORD_LEN`].
    ///
    /// # Examples
    ///
    /// ```
    /// use pucch_f2::{Bit, BlockCode};
    /// use Bit::{One, Zero};
    ///
    /// let code = BlockCode::new(2)?;
    /// let info_bits_hat = code.decode(&[0.7; 20])?;
    /// assert_eq!(info_bits_hat, [One, Zero]);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn decode(&self, code_bits_llr: &[f64]) -> Result<Vec<Bit>, Error> {
        if code_bits_llr.len() != CODEWORD_LEN {
            return Err(Error::InvalidInput(format!(
                "Expected {CODEWORD_LEN} code bit LLR values (found {})",
                code_bits_llr.len()
            )));
        }
        let mut best_index = 0;
        let mut best_metric = f64::NEG_INFINITY;
        for index in 0 .. 1 << self.num_info_bits {
            let metric = self.correlation_metric(index, code_bits_llr);
            // Strict comparison: earliest candidate wins ties
            if metric > best_metric {
                best_metric = metric;
                best_index = index;
            }
        }
        Ok(info_bits_from_index(best_index, self.num_info_bits))
    }

    /// Returns code bits for the information bits with given index.
    fn code_bits(&self, info_index: usize) -> Vec<Bit> {
        self.row_masks
            .iter()
            .map(|&mask| bitxor(info_index & mask))
            .collect()
    }

    /// Returns sum of LLR values over the positions in which the code bits for the information
    /// bits with given index are `One`.
    fn correlation_metric(&self, info_index: usize, code_bits_llr: &[f64]) -> f64 {
        self.row_masks
            .iter()
            .zip(code_bits_llr)
            .filter(|&(&mask, _)| bitxor(info_index & mask) == Bit::One)
            .map(|(_, &llr)| llr)
            .sum()
    }
}

/// Returns generator matrix row mask from given code table row.
fn row_mask(table_row: usize, num_info_bits: usize) -> usize {
    (0 .. num_info_bits)
        .filter(|&j| (table_row >> (NUM_TABLE_COLUMNS - 1 - j)) & 1 == 1)
        .fold(0, |mask, j| mask | (1 << j))
}

/// Returns index of given information bits, with bit `j` of the index being `info_bits[j]`.
fn info_index(info_bits: &[Bit]) -> usize {
    info_bits
        .iter()
        .enumerate()
        .fold(0, |index, (j, &bit)| index | ((bit as usize) << j))
}

/// Returns information bits with given index.
fn info_bits_from_index(info_index: usize, num_info_bits: usize) -> Vec<Bit> {
    (0 .. num_info_bits)
        .map(|j| bitxor((info_index >> j) & 1))
        .collect()
}

/// Returns XOR of bits in the binary representation of given integer.
fn bitxor(num: usize) -> Bit {
    match num.count_ones() % 2 {
        0 => Bit::Zero,
        _ => Bit::One,
    }
}
