mod arm_aggregation;
mod call;
mod cli;
mod cna_state;
mod cutoffs;
mod errors;
mod gene_projection;
mod genome_altered;
mod genome_features;
mod globals;
mod input_tables;
mod int_range;
mod logger;
mod onco_filter;
mod os_utils;
mod output_tables;
mod run_stats;
mod segment_index;

use std::{error, process};

use hhmmss::Hhmmss;
use log::info;

use crate::call::{run_call, run_cutoffs};
use crate::cli::Commands;
use crate::globals::{PROGRAM_NAME, PROGRAM_VERSION};
use crate::logger::setup_output_dir_and_logger;

fn run(settings: &cli::Settings) -> Result<(), Box<dyn error::Error>> {
    info!("Starting {PROGRAM_NAME} {PROGRAM_VERSION}");
    info!(
        "cmdline: {}",
        std::env::args().collect::<Vec<_>>().join(" ")
    );
    info!("Running on {} threads", settings.shared.thread_count);

    let start = std::time::Instant::now();

    match &settings.command {
        Commands::Call(x) => {
            run_call(&settings.shared, x)?;
        }
        Commands::Cutoffs(x) => {
            run_cutoffs(x)?;
        }
    }

    info!(
        "{PROGRAM_NAME} completed. Total Runtime: {}",
        start.elapsed().hhmmssxxx()
    );
    Ok(())
}

fn main() {
    let settings = cli::validate_and_fix_settings(cli::parse_settings());

    // Setup logger, including creation of the output directory for the log file:
    setup_output_dir_and_logger(
        settings.get_output_dir(),
        settings.shared.clobber,
        settings.shared.debug,
    );

    if let Err(err) = run(&settings) {
        log::error!("{err}");
        process::exit(exitcode::DATAERR);
    }
}
