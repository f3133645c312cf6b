use std::num::NonZeroU64;

use crate::genome_features::Segment;

pub const DEFAULT_MIN_ALTERED_LOG2_MAGNITUDE: f64 = 0.2;
pub const DEFAULT_GENOME_SIZE: NonZeroU64 = NonZeroU64::new(3_000_000_000).unwrap();

/// Fraction of the genome covered by segments with a log2 ratio magnitude of at least
/// `min_log2_magnitude`
///
/// `genome_size` is a nominal size and the fraction is not clipped to 1.
///
/// Segment length is the difference of its 1-indexed end and start positions, so a single base
/// segment contributes nothing.
///
pub fn get_fraction_genome_altered(
    segments: &[Segment],
    min_log2_magnitude: f64,
    genome_size: NonZeroU64,
) -> f64 {
    let altered_length = segments
        .iter()
        .filter(|x| x.log2_ratio.abs() >= min_log2_magnitude)
        .map(|x| x.range.end - x.range.one_based_start())
        .sum::<i64>();
    altered_length as f64 / genome_size.get() as f64
}
