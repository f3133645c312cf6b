//! Projection of sample segments onto gene coordinates
//!

use std::collections::HashSet;

use rayon::prelude::*;

use crate::cna_state::CnaState;
use crate::cutoffs::Cutoffs;
use crate::genome_features::Gene;
use crate::int_range::get_overlap_size;
use crate::segment_index::SegmentIndex;

#[derive(Clone, Debug, PartialEq)]
pub struct GeneCall {
    pub symbol: String,
    pub log2_value: f64,
    pub call: CnaState,
}

/// Result of segment projection for a single gene
#[derive(Clone, Debug, PartialEq)]
pub enum GeneProjection {
    Call(GeneCall),
    /// No segment overlaps the gene, so it has no defined copy number
    NoOverlap,
}

#[derive(Debug, Default)]
pub struct GeneProjectionResult {
    /// Calls for every gene with segment coverage, in gene table order
    pub gene_calls: Vec<GeneCall>,

    /// Symbols of genes without any overlapping segment
    pub no_overlap_symbols: Vec<String>,

    /// Symbols of gene records skipped because an earlier record had the same symbol
    pub duplicate_symbols: Vec<String>,
}

/// Overlap-length weighted mean log2 ratio of all segments intersecting the gene
///
/// The weights are normalized by the total overlap so that a single covering segment reproduces
/// its value exactly, and gaps between segments inside the gene don't bias the value toward 0.
///
fn get_gene_log2_value(segment_index: &SegmentIndex, gene: &Gene) -> Option<f64> {
    let overlaps = segment_index.find_overlaps(&gene.chrom, &gene.range);
    match overlaps.as_slice() {
        [] => None,
        [segment] => Some(segment.log2_ratio),
        _ => {
            let mut total_overlap = 0;
            let mut weighted_sum = 0.0;
            for segment in overlaps.iter() {
                let overlap = get_overlap_size(&segment.range, &gene.range);
                total_overlap += overlap;
                weighted_sum += overlap as f64 * segment.log2_ratio;
            }
            if total_overlap == 0 {
                None
            } else {
                Some(weighted_sum / total_overlap as f64)
            }
        }
    }
}

pub fn project_gene(segment_index: &SegmentIndex, gene: &Gene, cutoffs: &Cutoffs) -> GeneProjection {
    match get_gene_log2_value(segment_index, gene) {
        Some(log2_value) => GeneProjection::Call(GeneCall {
            symbol: gene.symbol.clone(),
            log2_value,
            call: cutoffs.classify(log2_value),
        }),
        None => GeneProjection::NoOverlap,
    }
}

/// Project segment log2 ratios onto every gene and make a discrete call for each covered gene
///
/// Genes are processed in parallel on the current rayon thread pool. Output order follows the
/// gene table.
///
pub fn project_genes(
    segment_index: &SegmentIndex,
    genes: &[Gene],
    cutoffs: &Cutoffs,
) -> GeneProjectionResult {
    let mut result = GeneProjectionResult::default();

    let mut seen = HashSet::new();
    let mut unique_genes = Vec::with_capacity(genes.len());
    for gene in genes {
        if seen.insert(gene.symbol.as_str()) {
            unique_genes.push(gene);
        } else {
            result.duplicate_symbols.push(gene.symbol.clone());
        }
    }

    let projections = unique_genes
        .par_iter()
        .map(|gene| project_gene(segment_index, gene, cutoffs))
        .collect::<Vec<_>>();

    for (gene, projection) in unique_genes.into_iter().zip(projections) {
        match projection {
            GeneProjection::Call(x) => result.gene_calls.push(x),
            GeneProjection::NoOverlap => result.no_overlap_symbols.push(gene.symbol.clone()),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cutoffs::{CutoffSettings, compute_cutoffs};
    use crate::genome_features::Segment;

    fn get_cutoffs(purity: f64) -> Cutoffs {
        compute_cutoffs(purity, &CutoffSettings::default()).unwrap()
    }

    #[test]
    fn test_single_segment_value_is_exact() {
        let segments = vec![Segment::new("chr1", 1, 10_000, 0.123456789).unwrap()];
        let index = SegmentIndex::new(&segments);
        let genes = vec![Gene::new("G1", "chr1", 199, 300).unwrap()];

        let result = project_genes(&index, &genes, &get_cutoffs(1.0));
        assert_eq!(result.gene_calls.len(), 1);
        assert_eq!(result.gene_calls[0].log2_value, 0.123456789);
    }

    #[test]
    fn test_equal_split_is_mean() {
        let segments = vec![
            Segment::new("chr1", 1, 100, -1.0).unwrap(),
            Segment::new("chr1", 101, 200, 0.5).unwrap(),
        ];
        let index = SegmentIndex::new(&segments);
        let genes = vec![Gene::new("G1", "chr1", 50, 150).unwrap()];

        let result = project_genes(&index, &genes, &get_cutoffs(1.0));
        approx::assert_ulps_eq!(result.gene_calls[0].log2_value, -0.25, max_ulps = 4);
    }

    #[test]
    fn test_unequal_split_is_weighted() {
        let segments = vec![
            Segment::new("chr1", 1, 100, 1.0).unwrap(),
            Segment::new("chr1", 101, 200, 0.0).unwrap(),
        ];
        let index = SegmentIndex::new(&segments);
        // 75 bases in the first segment, 25 in the second
        let genes = vec![Gene::new("G1", "chr1", 25, 125).unwrap()];

        let result = project_genes(&index, &genes, &get_cutoffs(1.0));
        approx::assert_ulps_eq!(result.gene_calls[0].log2_value, 0.75, max_ulps = 4);
    }

    #[test]
    fn test_gap_inside_gene() {
        let segments = vec![
            Segment::new("chr1", 1, 100, 1.0).unwrap(),
            Segment::new("chr1", 201, 300, 0.0).unwrap(),
        ];
        let index = SegmentIndex::new(&segments);
        let genes = vec![Gene::new("G1", "chr1", 50, 250).unwrap()];

        let result = project_genes(&index, &genes, &get_cutoffs(1.0));
        approx::assert_ulps_eq!(result.gene_calls[0].log2_value, 0.5, max_ulps = 4);
    }

    #[test]
    fn test_overlapping_segments_inside_gene() {
        // Segments share bases 101-110
        let segments = vec![
            Segment::new("chr1", 1, 110, 1.0).unwrap(),
            Segment::new("chr1", 101, 200, 0.0).unwrap(),
        ];
        let index = SegmentIndex::new(&segments);
        let genes = vec![Gene::new("G1", "chr1", 50, 150).unwrap()];

        let result = project_genes(&index, &genes, &get_cutoffs(1.0));
        assert_eq!(result.gene_calls.len(), 1);

        // 60 bases at 1.0 and 50 bases at 0.0, normalized by the 110 covered bases
        approx::assert_ulps_eq!(result.gene_calls[0].log2_value, 60.0 / 110.0, max_ulps = 4);
    }

    #[test]
    fn test_no_overlap_excluded() {
        let segments = vec![Segment::new("chr1", 1, 100, 1.0).unwrap()];
        let index = SegmentIndex::new(&segments);
        let genes = vec![
            Gene::new("G1", "chr1", 49, 60).unwrap(),
            Gene::new("G2", "chr1", 100, 200).unwrap(),
            Gene::new("G3", "chr2", 0, 10).unwrap(),
        ];

        let result = project_genes(&index, &genes, &get_cutoffs(1.0));
        assert_eq!(result.gene_calls.len(), 1);
        assert_eq!(result.gene_calls[0].symbol, "G1");
        assert_eq!(result.no_overlap_symbols, vec!["G2", "G3"]);
    }

    #[test]
    fn test_duplicate_symbols() {
        let segments = vec![Segment::new("chr1", 1, 100, 1.0).unwrap()];
        let index = SegmentIndex::new(&segments);
        let genes = vec![
            Gene::new("G1", "chr1", 49, 60).unwrap(),
            Gene::new("G1", "chr1", 69, 80).unwrap(),
        ];

        let result = project_genes(&index, &genes, &get_cutoffs(1.0));
        assert_eq!(result.gene_calls.len(), 1);
        assert_eq!(result.duplicate_symbols, vec!["G1"]);
    }

    #[test]
    fn test_shallow_deletion_scenario() {
        let cutoffs = get_cutoffs(0.5);
        approx::assert_ulps_eq!(cutoffs.log_r_htzd, 0.875f64.log2(), max_ulps = 4);

        let segments = vec![
            Segment::new("chr1", 1, 1_000_000, -0.8).unwrap(),
            Segment::new("chr1", 1_000_001, 2_000_000, 0.3).unwrap(),
        ];
        let index = SegmentIndex::new(&segments);
        let genes = vec![Gene::new("G", "chr1", 500_000, 1_500_000).unwrap()];

        let result = project_genes(&index, &genes, &cutoffs);
        let call = &result.gene_calls[0];
        approx::assert_abs_diff_eq!(call.log2_value, -0.25, epsilon = 1e-5);
        assert_eq!(call.call, CnaState::ShallowDeletion);
    }

    #[test]
    fn test_projection_is_deterministic() {
        let segments = (0..50)
            .map(|i| {
                Segment::new("chr3", i * 1000 + 1, (i + 1) * 1000, (i as f64 * 0.37).sin())
                    .unwrap()
            })
            .collect::<Vec<_>>();
        let genes = (0..40)
            .map(|i| Gene::new(&format!("G{i}"), "chr3", i * 1100, i * 1100 + 2500).unwrap())
            .collect::<Vec<_>>();
        let cutoffs = get_cutoffs(0.8);

        let index = SegmentIndex::new(&segments);
        let first = project_genes(&index, &genes, &cutoffs);
        let second = project_genes(&SegmentIndex::new(&segments), &genes, &cutoffs);
        assert_eq!(first.gene_calls, second.gene_calls);
        assert_eq!(first.no_overlap_symbols, second.no_overlap_symbols);
    }
}
