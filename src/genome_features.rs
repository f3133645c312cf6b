//! Genomic feature records consumed by the calling core
//!
//! All records are validated on construction and are immutable afterwards.
//!

use std::fmt;

use crate::errors::CnaError;
use crate::int_range::IntRange;

/// Canonical chromosome key used to match records between tables
///
/// A leading 'chr' prefix is ignored, so that 'chr7' and '7' refer to the same chromosome.
///
pub fn canonical_chrom_label(chrom: &str) -> &str {
    chrom.strip_prefix("chr").unwrap_or(chrom)
}

fn malformed_interval(label: &str, chrom: &str, start: i64, end: i64) -> CnaError {
    CnaError::MalformedInterval {
        label: label.to_string(),
        chrom: chrom.to_string(),
        start,
        end,
    }
}

/// Check and convert a 1-indexed, fully-closed interval
fn check_one_based_interval(
    label: &str,
    chrom: &str,
    start: i64,
    end: i64,
) -> Result<IntRange, CnaError> {
    if start < 1 || end < start {
        return Err(malformed_interval(label, chrom, start, end));
    }
    Ok(IntRange::from_one_based(start, end))
}

/// Check a bed style 0-indexed, half-closed interval
fn check_bed_interval(label: &str, chrom: &str, start: i64, end: i64) -> Result<IntRange, CnaError> {
    if start < 0 || end <= start {
        return Err(malformed_interval(label, chrom, start, end));
    }
    Ok(IntRange::from_pair(start, end))
}

/// A contiguous region of one chromosome with a single log2 copy ratio
#[derive(Clone, PartialEq)]
pub struct Segment {
    pub chrom: String,
    pub range: IntRange,
    pub log2_ratio: f64,
}

impl Segment {
    /// Create segment from 1-indexed, fully-closed coordinates
    ///
    pub fn new(chrom: &str, start: i64, end: i64, log2_ratio: f64) -> Result<Self, CnaError> {
        let range = check_one_based_interval("segment", chrom, start, end)?;
        if !log2_ratio.is_finite() {
            return Err(CnaError::NonFiniteLog2Ratio {
                chrom: chrom.to_string(),
                start,
                end,
                value: log2_ratio,
            });
        }
        Ok(Self {
            chrom: chrom.to_string(),
            range,
            log2_ratio,
        })
    }
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Segment: {}:{:?} log2: {}",
            self.chrom, self.range, self.log2_ratio
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Gene {
    pub symbol: String,
    pub chrom: String,
    pub range: IntRange,
}

impl Gene {
    /// Create gene from bed coordinates: 0-indexed, half-closed [start,end)
    ///
    pub fn new(symbol: &str, chrom: &str, start: i64, end: i64) -> Result<Self, CnaError> {
        let range = check_bed_interval("gene", chrom, start, end)?;
        Ok(Self {
            symbol: symbol.to_string(),
            chrom: chrom.to_string(),
            range,
        })
    }
}

/// Boundary between the p and q arms of one chromosome
///
/// `position` is 1-indexed, and is the last position of the p arm.
///
#[derive(Clone, Debug, PartialEq)]
pub struct Centromere {
    pub chrom: String,
    pub position: i64,
}

impl Centromere {
    pub fn new(chrom: &str, position: i64) -> Result<Self, CnaError> {
        if position < 0 {
            return Err(CnaError::MalformedInterval {
                label: "centromere".to_string(),
                chrom: chrom.to_string(),
                start: position,
                end: position,
            });
        }
        Ok(Self {
            chrom: chrom.to_string(),
            position,
        })
    }
}
