//! This crate processes coding, decoding and channel simulation requests for the PUCCH format 2
//! block code, and simulates its BLER-versus-SNR performance over a QPSK-AWGN channel.
//! Requests are read from a JSON file and responses written to another; sweep parameters are
//! specified on the command line, and sweep results are saved to a JSON file.
//!
//! Build the executable with `cargo build --release` and then run `./target/release/pucch-f2 -h`
//! for help on the command-line interface. Set `RUST_LOG` (e.g. `RUST_LOG=debug`) to change the
//! logging level.

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

use anyhow::{Context, Result};
use clap::{crate_name, crate_version, value_parser, Arg, ArgMatches, Command};
use pucch_f2::{request, sim};
use std::time::Instant;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Main function
fn main() -> Result<()> {
    init_logging();
    let timer = Instant::now();
    let matches = command_line_parser().get_matches();
    if let Err(err) = run_subcommand(&matches) {
        error!("{err:#}");
        return Err(err);
    }
    info!("Elapsed time: {:.3?}", timer.elapsed());
    Ok(())
}

/// Runs the subcommand selected on the command line.
fn run_subcommand(matches: &ArgMatches) -> Result<()> {
    let mut rng = rand::rng();
    match matches.subcommand() {
        Some(("run", sub_matches)) => {
            let input_filename = input_filename_from_matches(sub_matches);
            let output_filename = output_filename_from_matches(sub_matches);
            let req = request::read_request(&input_filename)
                .with_context(|| format!("Cannot read request from {input_filename}"))?;
            let response = request::process(&req, &mut rng)
                .with_context(|| format!("Cannot process request from {input_filename}"))?;
            request::write_response(&response, &output_filename)
                .with_context(|| format!("Cannot write response to {output_filename}"))?;
            info!("Response written to {output_filename}");
        }
        Some(("sweep", sub_matches)) => {
            let json_filename = json_filename_from_matches(sub_matches);
            sim::run_snr_sweep(&all_sim_params(sub_matches), &mut rng, &json_filename)
                .with_context(|| format!("Cannot complete SNR sweep for {json_filename}"))?;
        }
        _ => unreachable!("Subcommand is required"),
    }
    Ok(())
}

/// Installs logger writing to standard error, with level taken from `RUST_LOG` (default `info`).
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Returns command line parser.
fn command_line_parser() -> Command {
    Command::new(crate_name!())
        .version(crate_version!())
        .about("Codes, decodes and simulates the PUCCH format 2 block code over a QPSK-AWGN channel")
        .subcommand_required(true)
        .subcommand(
            Command::new("run")
                .about("Processes a JSON request (coding, decoding or channel simulation)")
                .arg(input_filename())
                .arg(output_filename()),
        )
        .subcommand(
            Command::new("sweep")
                .about("Evaluates BLER over a range of SNR values")
                .arg(num_info_bits())
                .arg(first_snr_db())
                .arg(snr_step_db())
                .arg(num_snr())
                .arg(num_blocks())
                .arg(json_filename()),
        )
}

/// Returns argument for name of JSON file from which request must be read.
fn input_filename() -> Arg {
    Arg::new("input_filename")
        .required(true)
        .help("Name of JSON file from which request must be read")
}

/// Returns argument for name of JSON file to which response must be written.
fn output_filename() -> Arg {
    Arg::new("output_filename")
        .short('o')
        .default_value("result.json")
        .help("Name of JSON file to which response must be written")
}

/// Returns argument for number of information bits per block.
fn num_info_bits() -> Arg {
    Arg::new("num_info_bits")
        .short('i')
        .value_parser(value_parser!(usize))
        .default_value("11")
        .help("Number of information bits per block (2, 4, 6, 8 or 11)")
}

/// Returns argument for first SNR (dB).
fn first_snr_db() -> Arg {
    Arg::new("first_snr_db")
        .short('r')
        .value_parser(value_parser!(f64))
        .allow_negative_numbers(true)
        .default_value("-20.0")
        .help("First SNR (dB)")
}

/// Returns argument for SNR step (dB).
fn snr_step_db() -> Arg {
    Arg::new("snr_step_db")
        .short('p')
        .value_parser(value_parser!(f64))
        .allow_negative_numbers(true)
        .default_value("1.0")
        .help("SNR step (dB)")
}

/// Returns argument for number of SNR values.
fn num_snr() -> Arg {
    Arg::new("num_snr")
        .short('s')
        .value_parser(value_parser!(u32))
        .default_value("30")
        .help("Number of SNR values")
}

/// Returns argument for number of blocks to be transmitted per SNR value.
fn num_blocks() -> Arg {
    Arg::new("num_blocks")
        .short('b')
        .value_parser(value_parser!(u32))
        .default_value("1000")
        .help("Number of blocks to be transmitted per SNR value")
}

/// Returns argument for name of JSON file to which sweep results must be saved.
fn json_filename() -> Arg {
    Arg::new("json_filename")
        .short('f')
        .default_value("results.json")
        .help("Name of JSON file to which sweep results must be saved")
}

/// Returns simulation parameters based on command-line arguments.
fn all_sim_params(matches: &ArgMatches) -> Vec<sim::SimParams> {
    all_snr_db_from_matches(matches)
        .into_iter()
        .map(|snr_db| sim::SimParams {
            num_info_bits: num_info_bits_from_matches(matches),
            snr_db,
            num_blocks: num_blocks_from_matches(matches),
        })
        .collect()
}

// OK to unwrap in the `*_from_matches` functions below: every argument they read is either
// required or has a default value, and has a value parser of the requested type.

/// Returns name of JSON file from which request must be read.
fn input_filename_from_matches(matches: &ArgMatches) -> String {
    matches
        .get_one::<String>("input_filename")
        .unwrap()
        .to_string()
}

/// Returns name of JSON file to which response must be written.
fn output_filename_from_matches(matches: &ArgMatches) -> String {
    matches
        .get_one::<String>("output_filename")
        .unwrap()
        .to_string()
}

/// Returns number of information bits per block.
fn num_info_bits_from_matches(matches: &ArgMatches) -> usize {
    *matches.get_one("num_info_bits").unwrap()
}

/// Returns all SNR (dB) values.
fn all_snr_db_from_matches(matches: &ArgMatches) -> Vec<f64> {
    let first_snr_db: f64 = *matches.get_one("first_snr_db").unwrap();
    let snr_step_db: f64 = *matches.get_one("snr_step_db").unwrap();
    let num_snr: u32 = *matches.get_one("num_snr").unwrap();
    (0 .. num_snr)
        .map(|n| first_snr_db + snr_step_db * f64::from(n))
        .collect()
}

/// Returns number of blocks to be transmitted per SNR value.
fn num_blocks_from_matches(matches: &ArgMatches) -> u32 {
    *matches.get_one("num_blocks").unwrap()
}

/// Returns name of JSON file to which sweep results must be saved.
fn json_filename_from_matches(matches: &ArgMatches) -> String {
    matches
        .get_one::<String>("json_filename")
        .unwrap()
        .to_string()
}

#[cfg(test)]
mod tests {
    use float_eq::assert_float_eq;

    use super::*;

    fn sweep_command_line_for_test() -> Vec<&'static str> {
        vec![
            crate_name!(),
            "sweep",
            "-i",
            "8",
            "-r",
            "-4.0",
            "-p",
            "0.5",
            "-s",
            "6",
            "-b",
            "200",
            "-f",
            "results.json",
        ]
    }

    #[test]
    fn test_command_line_parser() {
        assert!(command_line_parser()
            .try_get_matches_from(sweep_command_line_for_test())
            .is_ok());
        assert!(command_line_parser()
            .try_get_matches_from([crate_name!(), "run", "input.json", "-o", "out.json"])
            .is_ok());
        // Missing subcommand or request file
        assert!(command_line_parser()
            .try_get_matches_from([crate_name!()])
            .is_err());
        assert!(command_line_parser()
            .try_get_matches_from([crate_name!(), "run"])
            .is_err());
    }

    #[test]
    fn test_run_subcommand_missing_request_file() {
        let input_filename = std::env::temp_dir().join("pucch_f2_missing_request.json");
        let output_filename = std::env::temp_dir().join("pucch_f2_missing_request_result.json");
        let matches = command_line_parser().get_matches_from([
            crate_name!(),
            "run",
            input_filename.to_str().unwrap(),
            "-o",
            output_filename.to_str().unwrap(),
        ]);
        let err = run_subcommand(&matches).unwrap_err();
        assert!(err.to_string().starts_with("Cannot read request from"));
        assert!(!output_filename.exists());
    }

    #[test]
    fn test_run_filenames() {
        let matches = command_line_parser().get_matches_from([crate_name!(), "run", "input.json"]);
        let (_, sub_matches) = matches.subcommand().unwrap();
        assert_eq!(input_filename_from_matches(sub_matches), "input.json");
        assert_eq!(output_filename_from_matches(sub_matches), "result.json");
    }

    #[test]
    fn test_all_sim_params() {
        let matches = command_line_parser().get_matches_from(sweep_command_line_for_test());
        let (_, sub_matches) = matches.subcommand().unwrap();
        let all_params = all_sim_params(sub_matches);
        let all_snr_db = [-4.0, -3.5, -3.0, -2.5, -2.0, -1.5];
        assert_eq!(all_params.len(), 6);
        for (idx, params) in all_params.iter().enumerate() {
            assert_eq!(params.num_info_bits, 8);
            assert_float_eq!(params.snr_db, all_snr_db[idx], abs <= 1e-12);
            assert_eq!(params.num_blocks, 200);
        }
        assert_eq!(json_filename_from_matches(sub_matches), "results.json");
    }
}
