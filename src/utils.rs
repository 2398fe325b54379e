//! # Some useful functions for simulating code performance
//!
//! The [`random_bits`] function returns a given number of random bits, and the [`error_count`]
//! function returns the number of errors in a sequence with respect to a reference sequence.
//!
//! # Examples
//!
//! The code below illustrates the usage of the functions in this module.
//! ```
//! use pucch_f2::{qpsk, utils, AwgnChannel, BlockCode};
//!
//! let mut rng = rand::rng();
//! let code = BlockCode::new(8)?;
//! let channel = AwgnChannel::new(10.0);
//! let info_bits = utils::random_bits(code.num_info_bits(), &mut rng);
//! let syms = qpsk::modulate(&code.encode(&info_bits)?)?;
//! let code_bits_llr = qpsk::demodulate(&channel.apply(&syms, &mut rng)?)?;
//! let info_bits_hat = code.decode(&code_bits_llr)?;
//! let err_count = utils::error_count(&info_bits_hat, &info_bits);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use rand::Rng;

use crate::Bit;

/// Returns given number of random bits.
///
/// # Parameters
///
/// - `num_bits`: Number of random bits to be generated.
///
/// - `rng`: Random number generator to be used.
///
/// # Returns
///
/// - `bits`: Random bits, each equally likely to be `Zero` or `One`.
pub fn random_bits<R: Rng + ?Sized>(num_bits: usize, rng: &mut R) -> Vec<Bit> {
    (0 .. num_bits)
        .map(|_| Bit::from(rng.random_bool(0.5)))
        .collect()
}

/// Returns number of errors in a sequence with respect to a reference sequence.
///
/// # Parameters
///
/// - `seq`: Sequence in which errors must be counted.
///
/// - `ref_seq`: Reference sequence to which the given sequence is compared.
///
/// # Returns
///
/// - `err_count`: Number of positions in which the two sequences differ. If they are of different
///   lengths, then the longer sequence is effectively truncated to the length of the shorter one.
pub fn error_count<T: PartialEq>(seq: &[T], ref_seq: &[T]) -> usize {
    ref_seq
        .iter()
        .zip(seq.iter())
        .filter(|&(x, y)| x != y)
        .count()
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::BlockCode;
    use Bit::{One, Zero};

    #[test]
    fn test_random_bits() {
        let mut rng = StdRng::seed_from_u64(11);
        assert!(random_bits(0, &mut rng).is_empty());
        let num_bits = 10000;
        let bits = random_bits(num_bits, &mut rng);
        assert_eq!(bits.len(), num_bits);
        let num_zeros = bits.iter().filter(|&b| *b == Zero).count();
        let num_ones = bits.iter().filter(|&b| *b == One).count();
        assert!(num_zeros > 9 * num_bits / 20 && num_ones > 9 * num_bits / 20);
    }

    #[test]
    fn test_random_bits_reproducible_with_seed() {
        let bits = random_bits(64, &mut StdRng::seed_from_u64(12));
        assert_eq!(bits, random_bits(64, &mut StdRng::seed_from_u64(12)));
    }

    #[test]
    fn test_error_count() {
        assert_eq!(error_count(&[], &[One, Zero]), 0);
        assert_eq!(error_count(&[One, Zero], &[]), 0);
        // Longer `seq`
        let ref_seq = [One, Zero, Zero, One, One, One, Zero, Zero];
        let seq = [One, One, Zero, Zero, One, One, Zero, Zero, Zero, One];
        assert_eq!(error_count(&seq, &ref_seq), 2);
        // Shorter `seq`
        let ref_seq = [One, Zero, Zero, One, One, One, Zero, Zero, Zero, One];
        let seq = [One, One, Zero, Zero, One, One, Zero, Zero];
        assert_eq!(error_count(&seq, &ref_seq), 2);
    }

    #[test]
    fn test_error_count_of_decoded_info_bits() {
        let code = BlockCode::new(4).unwrap();
        let info_bits = [One, Zero, One, One];
        let mut code_bits_llr: Vec<f64> = code
            .encode(&info_bits)
            .unwrap()
            .into_iter()
            .map(|bit| if bit == One { 1.0 } else { -1.0 })
            .collect();
        assert_eq!(error_count(&code.decode(&code_bits_llr).unwrap(), &info_bits), 0);
        // Strongly favour the all-ones codeword, which differs from `info_bits` in one position
        let all_ones_code_bits = code.encode(&[One; 4]).unwrap();
        for (llr, bit) in code_bits_llr.iter_mut().zip(&all_ones_code_bits) {
            *llr = if *bit == One { 5.0 } else { -5.0 };
        }
        assert_eq!(error_count(&code.decode(&code_bits_llr).unwrap(), &info_bits), 1);
        // Length mismatch with a truncated decision
        assert_eq!(error_count(&[One, One], &info_bits), 1);
    }
}
