//! Per-chromosome interval lookup over the segment table
//!

use std::collections::HashMap;

use bio::data_structures::interval_tree::IntervalTree;

use crate::genome_features::{Segment, canonical_chrom_label};
use crate::int_range::IntRange;

/// Segments of a single chromosome which can be efficiently queried by overlap
///
/// The tree payload is the index of the segment in the source segment table.
///
#[derive(Default)]
struct ChromSegments {
    tree: IntervalTree<i64, usize>,
}

/// Overlap lookup for a full sample segment table
///
pub struct SegmentIndex<'a> {
    segments: &'a [Segment],
    chroms: HashMap<String, ChromSegments>,
}

impl<'a> SegmentIndex<'a> {
    pub fn new(segments: &'a [Segment]) -> Self {
        let mut chroms: HashMap<String, ChromSegments> = HashMap::new();
        for (segment_index, segment) in segments.iter().enumerate() {
            // Empty ranges can't be stored in the tree, and contribute no overlap in any case
            if segment.range.size() <= 0 {
                continue;
            }
            chroms
                .entry(canonical_chrom_label(&segment.chrom).to_string())
                .or_default()
                .tree
                .insert(segment.range.start..segment.range.end, segment_index);
        }
        Self { segments, chroms }
    }

    /// Find all segments intersecting `range` on `chrom`
    ///
    /// Segments are returned in (start, end, table index) order regardless of tree traversal
    /// order, so that downstream floating point sums are reproducible.
    ///
    pub fn find_overlaps(&self, chrom: &str, range: &IntRange) -> Vec<&'a Segment> {
        let Some(chrom_segments) = self.chroms.get(canonical_chrom_label(chrom)) else {
            return Vec::new();
        };
        if range.size() <= 0 {
            return Vec::new();
        }
        let mut indices = chrom_segments
            .tree
            .find(range.start..range.end)
            .map(|x| *x.data())
            .collect::<Vec<_>>();
        indices.sort_by_key(|&i| (self.segments[i].range, i));
        indices.into_iter().map(|i| &self.segments[i]).collect()
    }
}
