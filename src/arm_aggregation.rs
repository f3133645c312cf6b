//! Aggregation of sample segments onto chromosome arms
//!

use std::collections::HashMap;

use rayon::prelude::*;

use crate::cna_state::CnaState;
use crate::cutoffs::Cutoffs;
use crate::errors::CnaError;
use crate::genome_features::{Centromere, Segment, canonical_chrom_label};

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, strum::Display)]
pub enum ArmLabel {
    #[strum(to_string = "p")]
    P,
    #[strum(to_string = "q")]
    Q,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ArmCall {
    pub chrom: String,
    pub arm: ArmLabel,
    pub log2_value: f64,
    /// Total segment length contributing to this arm
    pub covered_length: i64,
    pub call: CnaState,
}

#[derive(Debug, Default)]
pub struct ArmAggregationResult {
    /// Calls for every arm with segment coverage, in centromere table order with p before q
    pub arm_calls: Vec<ArmCall>,

    /// Segments which could not be assigned to an arm
    pub unknown_chromosome_errors: Vec<CnaError>,
}

/// Accumulates a length weighted log2 ratio mean
#[derive(Default)]
struct ArmAccumulator {
    covered_length: i64,
    weighted_sum: f64,
}

impl ArmAccumulator {
    fn add(&mut self, length: i64, log2_ratio: f64) {
        self.covered_length += length;
        self.weighted_sum += length as f64 * log2_ratio;
    }

    fn to_arm_call(&self, chrom: &str, arm: ArmLabel, cutoffs: &Cutoffs) -> Option<ArmCall> {
        if self.covered_length == 0 {
            return None;
        }
        let log2_value = self.weighted_sum / self.covered_length as f64;
        Some(ArmCall {
            chrom: chrom.to_string(),
            arm,
            log2_value,
            covered_length: self.covered_length,
            call: cutoffs.classify(log2_value),
        })
    }
}

/// Aggregate the segments of one chromosome into p and q arm calls
///
/// A segment straddling the centromere is split at the centromere boundary, each part contributing
/// to its own arm in proportion to its length.
///
fn aggregate_chrom_arms(
    centromere: &Centromere,
    chrom_segments: &[&Segment],
    cutoffs: &Cutoffs,
) -> Vec<ArmCall> {
    // The 1-indexed centromere position is the last p arm base, which is also the 0-indexed
    // start of the q arm:
    let boundary = centromere.position;

    let mut p_arm = ArmAccumulator::default();
    let mut q_arm = ArmAccumulator::default();
    for segment in chrom_segments {
        let (left, right) = segment.range.split_at(boundary);
        if let Some(left) = left {
            p_arm.add(left.size(), segment.log2_ratio);
        }
        if let Some(right) = right {
            q_arm.add(right.size(), segment.log2_ratio);
        }
    }

    [
        p_arm.to_arm_call(&centromere.chrom, ArmLabel::P, cutoffs),
        q_arm.to_arm_call(&centromere.chrom, ArmLabel::Q, cutoffs),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Make a discrete copy number call for each chromosome arm with segment coverage
///
/// Segments on chromosomes missing from the centromere table are reported as `UnknownChromosome`
/// errors in the result, but do not prevent calls on the other chromosomes. Chromosomes are
/// processed in parallel on the current rayon thread pool.
///
pub fn aggregate_arms(
    segments: &[Segment],
    centromeres: &[Centromere],
    cutoffs: &Cutoffs,
) -> ArmAggregationResult {
    let mut result = ArmAggregationResult::default();

    let mut centromere_chroms = HashMap::new();
    for centromere in centromeres {
        centromere_chroms
            .entry(canonical_chrom_label(&centromere.chrom))
            .or_insert(centromere);
    }

    let mut chrom_segments: HashMap<&str, Vec<&Segment>> = HashMap::new();
    for segment in segments {
        let chrom = canonical_chrom_label(&segment.chrom);
        if centromere_chroms.contains_key(chrom) {
            chrom_segments.entry(chrom).or_default().push(segment);
        } else {
            result
                .unknown_chromosome_errors
                .push(CnaError::unknown_chromosome(&segment.chrom, &segment.range));
        }
    }

    // Sum in coordinate order so that the result doesn't depend on input row order
    for x in chrom_segments.values_mut() {
        x.sort_by_key(|s| s.range);
    }

    let empty = Vec::new();
    let mut seen_chroms = std::collections::HashSet::new();
    let target_centromeres = centromeres
        .iter()
        .filter(|x| seen_chroms.insert(canonical_chrom_label(&x.chrom)))
        .collect::<Vec<_>>();

    result.arm_calls = target_centromeres
        .par_iter()
        .map(|centromere| {
            let segments = chrom_segments
                .get(canonical_chrom_label(&centromere.chrom))
                .unwrap_or(&empty);
            aggregate_chrom_arms(centromere, segments, cutoffs)
        })
        .flatten()
        .collect();

    result
}
