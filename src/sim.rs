//! Simulator to evaluate performance of the PUCCH format 2 block code over a QPSK-AWGN channel
//!
//! # Examples
//!
//! ```
//! use pucch_f2::sim::{self, SimParams};
//!
//! let params = SimParams {
//!     num_info_bits: 4,
//!     snr_db: 10.0,
//!     num_blocks: 100,
//! };
//! let results = sim::run(&params, &mut rand::rng())?;
//! assert_eq!(results.success_count() + results.failure_count(), 100);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fs::File;
use std::io::BufWriter;

use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{qpsk, utils, AwgnChannel, BlockCode, Error};

/// Parameters for block code simulation over QPSK-AWGN channel
#[derive(Clone, PartialEq, Debug, Copy, Deserialize, Serialize)]
pub struct SimParams {
    /// Number of information bits per block
    pub num_info_bits: usize,
    /// Signal-to-noise ratio (dB) at QPSK-AWGN channel output
    pub snr_db: f64,
    /// Number of blocks to be transmitted
    pub num_blocks: u32,
}

/// Results from block code simulation over QPSK-AWGN channel
#[derive(Clone, PartialEq, Debug, Copy, Deserialize, Serialize)]
pub struct SimResults {
    /// Simulation parameters
    pub params: SimParams,
    /// Number of blocks transmitted
    pub num_blocks: u32,
    /// Number of blocks decoded in error
    pub num_block_errors: u32,
    /// Number of information bits decoded in error
    pub num_bit_errors: u64,
}

impl SimResults {
    /// Returns initialized simulation results.
    fn new(params: &SimParams) -> Self {
        Self {
            params: *params,
            num_blocks: 0,
            num_block_errors: 0,
            num_bit_errors: 0,
        }
    }

    /// Updates simulation results after a block.
    fn update_after_block(&mut self, num_bit_errors_in_block: usize) {
        self.num_blocks += 1;
        if num_bit_errors_in_block > 0 {
            self.num_block_errors += 1;
            self.num_bit_errors += num_bit_errors_in_block as u64;
        }
    }

    /// Returns results combining these with results from disjoint blocks of the same simulation.
    fn merged_with(mut self, other: &Self) -> Self {
        self.num_blocks += other.num_blocks;
        self.num_block_errors += other.num_block_errors;
        self.num_bit_errors += other.num_bit_errors;
        self
    }

    /// Returns number of blocks decoded correctly.
    #[must_use]
    pub fn success_count(&self) -> u32 {
        self.num_blocks - self.num_block_errors
    }

    /// Returns number of blocks decoded in error.
    #[must_use]
    pub fn failure_count(&self) -> u32 {
        self.num_block_errors
    }

    /// Returns block error rate.
    #[must_use]
    pub fn bler(&self) -> f64 {
        f64::from(self.num_block_errors) / f64::from(self.num_blocks)
    }

    /// Returns bit error rate.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ber(&self) -> f64 {
        self.num_bit_errors as f64
            / (f64::from(self.num_blocks) * self.params.num_info_bits as f64)
    }
}

impl std::fmt::Display for SimResults {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} info bits, SNR = {:.2} dB: {} blocks, {} block errors (BLER = {:.3e}, BER = {:.3e})",
            self.params.num_info_bits,
            self.params.snr_db,
            self.num_blocks,
            self.num_block_errors,
            self.bler(),
            self.ber(),
        )
    }
}

/// Runs simulation of block code over QPSK-AWGN channel.
///
/// Blocks are simulated in parallel. A single base seed is drawn from `rng`, and each block uses
/// its own random number generator seeded from the base seed and the block index, so results
/// depend only on the state of `rng` and not on the number of threads.
///
/// # Parameters
///
/// - `params`: Parameters for the simulation.
///
/// - `rng`: Random number generator to be used.
///
/// # Returns
///
/// - `results`: Results from the simulation.
///
/// # Errors
///
/// Returns an error if `params.num_blocks` is `0`, if `params.snr_db` is not finite, or if
/// `params.num_info_bits` is not supported.
pub fn run<R: Rng + ?Sized>(params: &SimParams, rng: &mut R) -> Result<SimResults, Error> {
    check_sim_params(params)?;
    let code = BlockCode::new(params.num_info_bits)?;
    let channel = AwgnChannel::new(params.snr_db);
    debug!(
        num_info_bits = params.num_info_bits,
        snr_db = params.snr_db,
        num_blocks = params.num_blocks,
        "Starting simulation"
    );
    let base_seed: u64 = rng.random();
    let results = (0 .. params.num_blocks)
        .into_par_iter()
        .try_fold(
            || SimResults::new(params),
            |mut results, block_index| {
                let mut block_rng = StdRng::seed_from_u64(block_seed(base_seed, block_index));
                results.update_after_block(run_block(&code, &channel, &mut block_rng)?);
                Ok::<_, Error>(results)
            },
        )
        .try_reduce(|| SimResults::new(params), |a, b| Ok(a.merged_with(&b)))?;
    Ok(results)
}

/// Runs simulations of block code over QPSK-AWGN channel and saves results to a JSON file.
///
/// # Parameters
///
/// - `all_params`: Parameters for each simulation scenario of interest.
///
/// - `rng`: Random number generator to be used.
///
/// - `json_filename`: Name of the JSON file to which all simulation results must be written.
///
/// # Returns
///
/// - `all_results`: Results for each simulation scenario, in the order of `all_params`.
///
/// # Errors
///
/// Returns an error if any simulation fails, or if the results cannot be written to the JSON
/// file.
pub fn run_snr_sweep<R: Rng + ?Sized>(
    all_params: &[SimParams],
    rng: &mut R,
    json_filename: &str,
) -> Result<Vec<SimResults>, Error> {
    let mut all_results = Vec::with_capacity(all_params.len());
    for params in all_params {
        let results = run(params, rng)?;
        info!("{results}");
        all_results.push(results);
    }
    save_all_results(&all_results, json_filename)?;
    Ok(all_results)
}

/// Checks validity of simulation parameters.
fn check_sim_params(params: &SimParams) -> Result<(), Error> {
    if params.num_blocks == 0 {
        return Err(Error::InvalidInput(
            "Number of blocks must be a positive integer".to_string(),
        ));
    }
    if !params.snr_db.is_finite() {
        return Err(Error::InvalidInput(format!(
            "SNR must be finite (found {} dB)",
            params.snr_db
        )));
    }
    Ok(())
}

/// Returns seed for the random number generator of a given block.
fn block_seed(base_seed: u64, block_index: u32) -> u64 {
    base_seed.wrapping_add(u64::from(block_index))
}

/// Returns number of information bit errors after sending a random block over the channel.
fn run_block<R: Rng + ?Sized>(
    code: &BlockCode,
    channel: &AwgnChannel,
    rng: &mut R,
) -> Result<usize, Error> {
    let info_bits = utils::random_bits(code.num_info_bits(), rng);
    let syms = qpsk::modulate(&code.encode(&info_bits)?)?;
    let code_bits_llr = qpsk::demodulate(&channel.apply(&syms, rng)?)?;
    let info_bits_hat = code.decode(&code_bits_llr)?;
    Ok(utils::error_count(&info_bits_hat, &info_bits))
}

/// Saves all simulation results to a JSON file.
fn save_all_results(all_results: &[SimResults], json_filename: &str) -> Result<(), Error> {
    let writer = BufWriter::new(File::create(json_filename)?);
    serde_json::to_writer_pretty(writer, all_results)?;
    info!("Saved {} simulation results to {json_filename}", all_results.len());
    Ok(())
}
