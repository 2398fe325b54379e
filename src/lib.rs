//! This crate implements the short-block channel coding used to protect the control bits of
//! PUCCH format 2, together with the QPSK modulation and AWGN channel needed to simulate it.
//!
//! The block code maps `N` information bits (`N` in `{2, 4, 6, 8, 11}`) to a 20-bit codeword,
//! using the first `N` columns of a fixed 20-by-13 code table as generator matrix. Decoding is by
//! exhaustive maximum-likelihood search over all `2^N` candidates. Each codeword is sent as 10
//! QPSK symbols, and the real and imaginary parts of the received symbols are used directly as
//! the LLR values of the code bits.
//!
//! # Examples
//!
//! ```
//! use pucch_f2::{qpsk, AwgnChannel, Bit, BlockCode};
//! use Bit::{One, Zero};
//!
//! let code = BlockCode::new(4)?;
//! let channel = AwgnChannel::new(20.0);
//! let info_bits = [One, Zero, One, One];
//! let syms = qpsk::modulate(&code.encode(&info_bits)?)?;
//! let noisy_syms = channel.apply(&syms, &mut rand::rng())?;
//! let info_bits_hat = code.decode(&qpsk::demodulate(&noisy_syms)?)?;
//! assert_eq!(info_bits_hat, info_bits);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(
    clippy::complexity,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_allocation,
    unused_import_braces,
    unused_qualifications
)]

mod block_code;
mod channel;
mod common;
pub mod qpsk;
pub mod request;
pub mod sim;
pub mod utils;

pub use block_code::{BlockCode, CODEWORD_LEN, SUPPORTED_NUM_INFO_BITS};
pub use channel::AwgnChannel;
pub use common::{Bit, Error};

#[cfg(test)]
mod tests_of_pipeline {
    use num_complex::Complex64;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use Bit::{One, Zero};

    #[test]
    fn test_end_to_end_without_noise() {
        let code = BlockCode::new(2).unwrap();
        let info_bits = [One, Zero];
        let code_bits = code.encode(&info_bits).unwrap();
        assert_eq!(code_bits[.. 2], [One, One]);
        let syms = qpsk::modulate(&code_bits).unwrap();
        assert!(syms[0].re > 0.0 && syms[0].im > 0.0);
        let code_bits_llr = qpsk::demodulate(&syms).unwrap();
        assert!(code_bits_llr[0] > 0.0 && code_bits_llr[1] > 0.0);
        assert_eq!(code.decode(&code_bits_llr).unwrap(), info_bits);
    }

    #[test]
    fn test_round_trip_all_info_bits() {
        for num_info_bits in SUPPORTED_NUM_INFO_BITS {
            let code = BlockCode::new(num_info_bits).unwrap();
            let step = if num_info_bits <= 8 { 1 } else { 7 };
            for index in (0_usize .. 1 << num_info_bits).step_by(step) {
                let info_bits: Vec<Bit> = (0 .. num_info_bits)
                    .map(|j| Bit::from((index >> j) & 1 == 1))
                    .collect();
                let syms = qpsk::modulate(&code.encode(&info_bits).unwrap()).unwrap();
                let info_bits_hat = code.decode(&qpsk::demodulate(&syms).unwrap()).unwrap();
                assert_eq!(info_bits_hat, info_bits);
            }
        }
    }

    #[test]
    fn test_round_trip_over_channel_at_high_snr() {
        let mut rng = StdRng::seed_from_u64(41);
        let code = BlockCode::new(11).unwrap();
        let channel = AwgnChannel::new(25.0);
        for _ in 0 .. 50 {
            let info_bits = utils::random_bits(11, &mut rng);
            let syms = qpsk::modulate(&code.encode(&info_bits).unwrap()).unwrap();
            let noisy_syms = channel.apply(&syms, &mut rng).unwrap();
            let info_bits_hat = code.decode(&qpsk::demodulate(&noisy_syms).unwrap()).unwrap();
            assert_eq!(info_bits_hat, info_bits);
        }
    }

    #[test]
    fn test_length_validation() {
        let code = BlockCode::new(6).unwrap();
        assert!(code.encode(&[Zero; 5]).is_err());
        assert!(code.encode(&[Zero; 7]).is_err());
        assert!(code.decode(&[0.0; 19]).is_err());
        assert!(code.decode(&[0.0; 21]).is_err());
        assert!(qpsk::modulate(&[Zero; 19]).is_err());
        assert!(qpsk::modulate(&[Zero; 21]).is_err());
        assert!(qpsk::demodulate(&[Complex64::new(0.0, 0.0); 9]).is_err());
        assert!(qpsk::demodulate(&[Complex64::new(0.0, 0.0); 11]).is_err());
        assert!(AwgnChannel::new(0.0)
            .apply(&[], &mut StdRng::seed_from_u64(42))
            .is_err());
    }
}
