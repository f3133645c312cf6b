use std::fmt;

/// A simple type for integer ranges
///
/// All ranges follow the bed file range convention: 0-indexed, half-closed, [start,end)
///
/// Input tables in this tool use 1-indexed fully-closed coordinates, these are converted with
/// [`IntRange::from_one_based`] so that range size and overlap arithmetic never needs a +1 term.
///
#[derive(Clone, Copy, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub struct IntRange {
    pub start: i64,
    pub end: i64,
}

impl IntRange {
    pub fn from_pair(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Convert from a 1-indexed, fully-closed [start,end] interval
    ///
    pub fn from_one_based(start: i64, end: i64) -> Self {
        Self {
            start: start - 1,
            end,
        }
    }

    pub fn size(&self) -> i64 {
        self.end - self.start
    }

    /// 1-indexed start position, matching the input table convention
    pub fn one_based_start(&self) -> i64 {
        self.start + 1
    }

    /// Return true if the ranges intersect (adjacency does not count)
    ///
    pub fn intersect_range(&self, other: &IntRange) -> bool {
        other.end > self.start && other.start < self.end
    }

    /// Split the range at `pos`, returning the parts to the left and right of the split point
    ///
    /// Either side is None if the range has no extent on that side of `pos`.
    ///
    pub fn split_at(&self, pos: i64) -> (Option<IntRange>, Option<IntRange>) {
        let left = if self.start < pos {
            Some(IntRange::from_pair(self.start, std::cmp::min(self.end, pos)))
        } else {
            None
        };
        let right = if self.end > pos {
            Some(IntRange::from_pair(std::cmp::max(self.start, pos), self.end))
        } else {
            None
        };
        (left, right)
    }
}

impl fmt::Debug for IntRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}-{})", self.start, self.end)
    }
}

pub fn get_overlap_range(r1: &IntRange, r2: &IntRange) -> Option<IntRange> {
    if !r1.intersect_range(r2) {
        return None;
    }
    Some(IntRange {
        start: std::cmp::max(r1.start, r2.start),
        end: std::cmp::min(r1.end, r2.end),
    })
}

/// Size of the intersection of two ranges, 0 if they don't intersect
///
pub fn get_overlap_size(r1: &IntRange, r2: &IntRange) -> i64 {
    get_overlap_range(r1, r2).map(|x| x.size()).unwrap_or(0)
}
