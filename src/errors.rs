//! Error kinds raised by the copy number calling core
//!

use crate::int_range::IntRange;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum CnaError {
    #[error("Tumor purity must be in the range (0,1], observed purity value: {0}")]
    InvalidPurity(f64),

    #[error(
        "Cutoffs derived from purity {purity} are not strictly increasing: HMZD {hmzd} HTZD {htzd} GAIN {gain} AMP {amp}"
    )]
    DegenerateCutoffs {
        purity: f64,
        hmzd: f64,
        htzd: f64,
        gain: f64,
        amp: f64,
    },

    #[error("Invalid cutoff settings: {0}")]
    InvalidCutoffSettings(String),

    #[error("Malformed {label} interval on chromosome '{chrom}': start {start} end {end}")]
    MalformedInterval {
        label: String,
        chrom: String,
        start: i64,
        end: i64,
    },

    #[error("Non-finite log2 ratio {value} for segment {chrom}:{start}-{end}")]
    NonFiniteLog2Ratio {
        chrom: String,
        start: i64,
        end: i64,
        value: f64,
    },

    #[error("Chromosome '{chrom}' of segment {chrom}:{start}-{end} is not in the centromere table")]
    UnknownChromosome { chrom: String, start: i64, end: i64 },
}

impl CnaError {
    /// Build an `UnknownChromosome` error using 1-indexed coordinates for the message
    pub fn unknown_chromosome(chrom: &str, range: &IntRange) -> Self {
        CnaError::UnknownChromosome {
            chrom: chrom.to_string(),
            start: range.one_based_start(),
            end: range.end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_context() {
        let msg = CnaError::InvalidPurity(1.5).to_string();
        assert!(msg.contains("1.5"));

        let msg = CnaError::unknown_chromosome("chrUn", &IntRange::from_one_based(100, 200)).to_string();
        assert!(msg.contains("chrUn:100-200"));
    }
}
