//! Track stats for the whole copy number calling run
//!

use std::collections::BTreeMap;
use std::fs::File;

use camino::Utf8Path;
use log::info;
use serde::{Deserialize, Serialize};
use simple_error::{SimpleResult, try_with};
use strum::IntoEnumIterator;

use crate::cna_state::CnaState;
use crate::cutoffs::Cutoffs;

pub const RUN_STATS_FILENAME: &str = "run.stats.json";

/// Count of records in each copy number state, keyed on the state label
///
/// All states are present in the map, including those with a count of zero.
///
pub fn get_state_counts(calls: impl Iterator<Item = CnaState>) -> BTreeMap<String, usize> {
    let mut counts = CnaState::iter()
        .map(|x| (x.to_string(), 0))
        .collect::<BTreeMap<_, _>>();
    for call in calls {
        *counts.entry(call.to_string()).or_default() += 1;
    }
    counts
}

#[derive(Default, Deserialize, Serialize)]
pub struct GeneStats {
    pub input_gene_count: usize,
    pub called_gene_count: usize,

    /// Genes without any overlapping segment, these are left out of all gene tables
    pub no_overlap_gene_count: usize,

    pub duplicate_symbol_count: usize,
    pub state_counts: BTreeMap<String, usize>,
    pub oncogenic_gene_count: usize,
    pub oncogenic_non_diploid_gene_count: usize,
}

#[derive(Default, Deserialize, Serialize)]
pub struct ArmStats {
    pub called_arm_count: usize,
    pub state_counts: BTreeMap<String, usize>,

    /// Segments on chromosomes missing from the centromere table
    pub unknown_chromosome_segment_count: usize,
}

#[derive(Deserialize, Serialize)]
pub struct CallRunStats {
    pub sample_name: String,
    pub cutoffs: Cutoffs,
    pub segment_count: usize,
    pub fraction_genome_altered: f64,
    pub gene_stats: GeneStats,
    pub arm_stats: ArmStats,
}

/// Write run_stats structure out in json format
pub fn write_call_run_stats(output_dir: &Utf8Path, run_stats: &CallRunStats) -> SimpleResult<()> {
    let filename = output_dir.join(RUN_STATS_FILENAME);

    info!("Writing run statistics to file: '{filename}'");

    let f = try_with!(
        File::create(&filename),
        "Unable to create run statistics json file: '{filename}'"
    );

    try_with!(
        serde_json::to_writer_pretty(&f, &run_stats),
        "Unable to write run statistics json file: '{filename}'"
    );
    Ok(())
}
