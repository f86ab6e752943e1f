//! Work ranges and index-space partitioning

use smallvec::SmallVec;
use std::fmt;
use std::ops::Range;

/// Inline capacity for partitions; worker counts above this spill to the heap.
pub(crate) const INLINE_RANGES: usize = 8;

/// Partition of an index space, one entry per dispatched worker
pub type Partition = SmallVec<[WorkRange; INLINE_RANGES]>;

/// Half-open index interval `[start, end)` owned by one worker
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorkRange {
    /// First index
    pub start: usize,
    /// One past the last index
    pub end: usize,
}

impl WorkRange {
    /// Create a range; `end` below `start` yields an empty range at `start`.
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Number of indices in the range
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the range has no indices
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The indices as a std range
    #[inline]
    pub fn indices(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl fmt::Display for WorkRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Split `[start, end)` into at most `workers` contiguous ranges.
///
/// Each worker gets `ceil(size / workers)` indices; the last non-empty range
/// is truncated at `end`. Ranges that would start at or past `end` are not
/// returned, so fewer than `workers` ranges come back when `size < workers`.
/// The returned ranges are in order, disjoint, and cover `[start, end)`.
///
/// `workers` must be positive; executors validate it before calling.
pub fn partition(start: usize, end: usize, workers: usize) -> Partition {
    debug_assert!(workers > 0);
    let size = end.saturating_sub(start);
    if size == 0 || workers == 0 {
        return Partition::new();
    }

    let chunk = size.div_ceil(workers);
    (0..workers)
        .map(|w| WorkRange::new(start + w * chunk, (start + (w + 1) * chunk).min(end)))
        .take_while(|r| !r.is_empty())
        .collect()
}
