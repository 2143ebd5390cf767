//! Destination position maps.

use std::ops::Range;

/// Ordered destination positions for the elements of one chunk.
///
/// Element `i` of a chunk lands at position `get(i)` of the destination buffer.
/// Contiguous groups use the compact [`SlicingIndex::Range`] shape; arbitrary
/// scatter maps use [`SlicingIndex::Positions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlicingIndex {
    /// `len` consecutive positions starting at `start`.
    Range { start: usize, len: usize },
    /// Explicit positions, in chunk order.
    Positions(Vec<usize>),
}

impl SlicingIndex {
    pub fn range(start: usize, len: usize) -> Self {
        SlicingIndex::Range { start, len }
    }

    /// The identity index over a whole frame of `n` rows.
    pub fn full(n: usize) -> Self {
        SlicingIndex::Range { start: 0, len: n }
    }

    pub fn from_positions(positions: Vec<usize>) -> Self {
        SlicingIndex::Positions(positions)
    }

    pub fn len(&self) -> usize {
        match self {
            SlicingIndex::Range { len, .. } => *len,
            SlicingIndex::Positions(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Destination position of chunk element `i`.
    pub fn get(&self, i: usize) -> Option<usize> {
        match self {
            SlicingIndex::Range { start, len } if i < *len => start.checked_add(i),
            SlicingIndex::Range { .. } => None,
            SlicingIndex::Positions(p) => p.get(i).copied(),
        }
    }

    pub fn iter(&self) -> SlicingIter<'_> {
        match self {
            SlicingIndex::Range { start, len } => {
                SlicingIter::Range(*start..start.saturating_add(*len))
            }
            SlicingIndex::Positions(p) => SlicingIter::Positions(p.iter()),
        }
    }

    /// Largest destination position, `None` for an empty index.
    ///
    /// A range running past `usize::MAX` reports `usize::MAX`, which no column
    /// can hold.
    pub fn max_position(&self) -> Option<usize> {
        match self {
            SlicingIndex::Range { start, len } => len
                .checked_sub(1)
                .map(|last| start.checked_add(last).unwrap_or(usize::MAX)),
            SlicingIndex::Positions(p) => p.iter().copied().max(),
        }
    }

    pub fn to_positions(&self) -> Vec<usize> {
        self.iter().collect()
    }
}

impl From<Vec<usize>> for SlicingIndex {
    fn from(positions: Vec<usize>) -> Self {
        SlicingIndex::Positions(positions)
    }
}

impl From<Range<usize>> for SlicingIndex {
    fn from(range: Range<usize>) -> Self {
        SlicingIndex::Range {
            start: range.start,
            len: range.end.saturating_sub(range.start),
        }
    }
}

/// Iterator over the positions of a [`SlicingIndex`].
#[derive(Debug, Clone)]
pub enum SlicingIter<'a> {
    Range(Range<usize>),
    Positions(std::slice::Iter<'a, usize>),
}

impl Iterator for SlicingIter<'_> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        match self {
            SlicingIter::Range(r) => r.next(),
            SlicingIter::Positions(it) => it.next().copied(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            SlicingIter::Range(r) => r.size_hint(),
            SlicingIter::Positions(it) => it.size_hint(),
        }
    }
}

impl ExactSizeIterator for SlicingIter<'_> {}

impl<'a> IntoIterator for &'a SlicingIndex {
    type Item = usize;
    type IntoIter = SlicingIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
