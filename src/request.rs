//! JSON request and response documents for coding, decoding and channel simulation
//!
//! A request names its mode in the `"mode"` field, and [`process`] maps it to the corresponding
//! response. QPSK symbols appear in documents as text of the form `"a+bj"` or `"a-bj"`.
//!
//! # Examples
//!
//! ```
//! use pucch_f2::request::{self, Request, Response};
//!
//! let request: Request = serde_json::from_str(
//!     r#"{"mode": "coding", "num_of_pucch_f2_bits": 2, "pucch_f2_bits": [true, false]}"#,
//! )?;
//! let response = request::process(&request, &mut rand::rng())?;
//! assert_eq!(
//!     response,
//!     Response::Coding {
//!         qpsk_symbols: vec!["0.707107+0.707107j".to_string(); 10],
//!     }
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};

use num_complex::Complex64;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::sim::{self, SimParams};
use crate::{qpsk, Bit, BlockCode, Error};

/// Default signal-to-noise ratio (dB) for channel simulation requests
pub const DEFAULT_SNR_DB: f64 = 10.0;

/// Request document
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
#[serde(tag = "mode")]
pub enum Request {
    /// Encode and modulate information bits
    #[serde(rename = "coding")]
    Coding {
        /// Number of information bits
        #[serde(rename = "num_of_pucch_f2_bits")]
        num_info_bits: usize,
        /// Information bits
        #[serde(rename = "pucch_f2_bits")]
        info_bits: Vec<bool>,
    },
    /// Demodulate and decode QPSK symbols
    #[serde(rename = "decoding")]
    Decoding {
        /// Number of information bits
        #[serde(rename = "num_of_pucch_f2_bits")]
        num_info_bits: usize,
        /// QPSK symbols as text
        qpsk_symbols: Vec<String>,
    },
    /// Simulate random blocks over QPSK-AWGN channel
    #[serde(rename = "channel simulation")]
    ChannelSimulation {
        /// Number of information bits
        #[serde(rename = "num_of_pucch_f2_bits")]
        num_info_bits: usize,
        /// Number of blocks to be simulated
        iterations: i64,
        /// Signal-to-noise ratio (dB)
        #[serde(default = "default_snr_db")]
        snr_db: f64,
    },
}

/// Response document
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
#[serde(tag = "mode")]
pub enum Response {
    /// Result of coding
    #[serde(rename = "coding")]
    Coding {
        /// QPSK symbols as text
        qpsk_symbols: Vec<String>,
    },
    /// Result of decoding
    #[serde(rename = "decoding")]
    Decoding {
        /// Number of information bits
        #[serde(rename = "num_of_pucch_f2_bits")]
        num_info_bits: usize,
        /// Decisions on the information bits
        #[serde(rename = "pucch_f2_bits")]
        info_bits: Vec<bool>,
    },
    /// Result of channel simulation
    #[serde(rename = "channel simulation")]
    ChannelSimulation {
        /// Number of information bits
        #[serde(rename = "num_of_pucch_f2_bits")]
        num_info_bits: usize,
        /// Block error rate
        bler: f64,
        /// Number of blocks decoded correctly
        success: u32,
        /// Number of blocks decoded in error
        failed: u32,
    },
}

fn default_snr_db() -> f64 {
    DEFAULT_SNR_DB
}

/// Returns response to given request.
///
/// # Parameters
///
/// - `request`: Request to be processed.
///
/// - `rng`: Random number generator to be used (only by channel simulation).
///
/// # Errors
///
/// Returns an error if the number of information bits is not supported, if a coding request does
/// not hold exactly that many bits, if a decoding request does not hold exactly
/// [`qpsk::NUM_SYMBOLS`] well-formed symbols, or if a channel simulation request does not hold a
/// positive number of iterations.
pub fn process<R: Rng + ?Sized>(request: &Request, rng: &mut R) -> Result<Response, Error> {
    match *request {
        Request::Coding {
            num_info_bits,
            ref info_bits,
        } => {
            debug!(num_info_bits, "Processing coding request");
            let code = BlockCode::new(num_info_bits)?;
            let info_bits: Vec<Bit> = info_bits.iter().map(|&b| Bit::from(b)).collect();
            let syms = qpsk::modulate(&code.encode(&info_bits)?)?;
            Ok(Response::Coding {
                qpsk_symbols: syms.into_iter().map(format_symbol).collect(),
            })
        }
        Request::Decoding {
            num_info_bits,
            ref qpsk_symbols,
        } => {
            debug!(num_info_bits, "Processing decoding request");
            let code = BlockCode::new(num_info_bits)?;
            let syms = qpsk_symbols
                .iter()
                .map(|text| parse_symbol(text))
                .collect::<Result<Vec<Complex64>, Error>>()?;
            let info_bits_hat = code.decode(&qpsk::demodulate(&syms)?)?;
            Ok(Response::Decoding {
                num_info_bits,
                info_bits: info_bits_hat.into_iter().map(bool::from).collect(),
            })
        }
        Request::ChannelSimulation {
            num_info_bits,
            iterations,
            snr_db,
        } => {
            debug!(num_info_bits, iterations, snr_db, "Processing channel simulation request");
            let num_blocks = u32::try_from(iterations)
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| {
                    Error::InvalidInput(format!(
                        "Number of iterations must be a positive integer (found {iterations})"
                    ))
                })?;
            let params = SimParams {
                num_info_bits,
                snr_db,
                num_blocks,
            };
            let results = sim::run(&params, rng)?;
            Ok(Response::ChannelSimulation {
                num_info_bits,
                bler: results.bler(),
                success: results.success_count(),
                failed: results.failure_count(),
            })
        }
    }
}

/// Returns request read from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not hold a valid request.
pub fn read_request(json_filename: &str) -> Result<Request, Error> {
    let reader = BufReader::new(File::open(json_filename)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Writes response to a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_response(response: &Response, json_filename: &str) -> Result<(), Error> {
    let mut writer = BufWriter::new(File::create(json_filename)?);
    serde_json::to_writer_pretty(&mut writer, response)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Returns text for given QPSK symbol.
///
/// The text is `"a+bj"`, or `"a-bj"` if the imaginary part is negative, with six decimal places
/// for each part.
///
/// # Examples
///
/// ```
/// use num_complex::Complex64;
/// use pucch_f2::request::format_symbol;
///
/// assert_eq!(format_symbol(Complex64::new(0.5, -0.25)), "0.500000-0.250000j");
/// ```
#[must_use]
pub fn format_symbol(sym: Complex64) -> String {
    if sym.im.is_sign_negative() {
        format!("{:.6}{:.6}j", sym.re, sym.im)
    } else {
        format!("{:.6}+{:.6}j", sym.re, sym.im)
    }
}

/// Returns QPSK symbol for given text.
///
/// The real and imaginary parts are separated by the first `+` or `-` after the first character,
/// and the text must end in `j`.
///
/// # Errors
///
/// Returns an error if the text is not of the form `"a+bj"` or `"a-bj"`.
///
/// # Examples
///
/// ```
/// use num_complex::Complex64;
/// use pucch_f2::request::parse_symbol;
///
/// assert_eq!(parse_symbol("-0.5+0.25j")?, Complex64::new(-0.5, 0.25));
/// assert!(parse_symbol("-0.5").is_err());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_symbol(text: &str) -> Result<Complex64, Error> {
    let invalid =
        || Error::InvalidInput(format!("Invalid complex number {text:?} (expected \"a+bj\")"));
    let body = text.strip_suffix('j').ok_or_else(invalid)?;
    let i_sep = body
        .char_indices()
        .skip(1)
        .find(|&(_, c)| c == '+' || c == '-')
        .map(|(i, _)| i)
        .ok_or_else(invalid)?;
    let re = body[.. i_sep].parse::<f64>().map_err(|_| invalid())?;
    let im = body[i_sep ..].parse::<f64>().map_err(|_| invalid())?;
    Ok(Complex64::new(re, im))
}
