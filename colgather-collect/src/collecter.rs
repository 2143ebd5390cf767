//! The collecter contract and the destination bookkeeping shared by every
//! implementation.

use std::fmt;

use colgather_result::{Error, Result};
use colgather_types::{CollecterKind, Vector};
use roaring::RoaringTreemap;

use crate::SlicingIndex;

/// Options controlling how a collecter validates incoming chunks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectOptions {
    /// Reject a chunk whose index touches a position already written, or names the
    /// same position twice. When disabled the last write wins and a warning is logged.
    pub reject_overwrites: bool,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            reject_overwrites: true,
        }
    }
}

/// A fixed-size destination column filled by scattering chunks into it.
///
/// Chunks are placed with [`Collecter::collect`] after the caller has checked
/// [`Collecter::compatible`]. A chunk that is not compatible but satisfies
/// [`Collecter::can_promote`] requires a wider collecter, see [`crate::promote`].
///
/// A `collect` that fails leaves the collecter exactly as it was before the call.
pub trait Collecter: fmt::Debug {
    /// Write `chunk[i]` at destination position `index[i]` for every `i`.
    fn collect(&mut self, index: &SlicingIndex, chunk: &Vector) -> Result<()>;

    /// The destination column with its class tags (and levels) attached.
    ///
    /// Unwritten positions hold the missing-value sentinel.
    fn get(&self) -> Vector;

    /// Consume the collecter and hand over the finalized column.
    fn into_vector(self: Box<Self>) -> Vector;

    /// Whether `probe` has exactly this collecter's element type.
    fn compatible(&self, probe: &Vector) -> bool;

    /// Whether a wider collecter could hold both the values collected so far and `probe`.
    ///
    /// Never true when [`Collecter::compatible`] is.
    fn can_promote(&self, probe: &Vector) -> bool;

    fn kind(&self) -> CollecterKind;

    /// Length of the destination column.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn options(&self) -> &CollectOptions;

    /// Destination positions written so far, ascending.
    fn written_positions(&self) -> SlicingIndex;
}

/// Size and write-set bookkeeping for a destination buffer.
#[derive(Debug, Clone)]
pub(crate) struct Destination {
    len: usize,
    written: RoaringTreemap,
    options: CollectOptions,
}

impl Destination {
    pub(crate) fn new(len: usize, options: CollectOptions) -> Self {
        Self {
            len,
            written: RoaringTreemap::new(),
            options,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn options(&self) -> &CollectOptions {
        &self.options
    }

    pub(crate) fn written_positions(&self) -> SlicingIndex {
        SlicingIndex::from_positions(self.written.iter().map(|p| p as usize).collect())
    }

    /// Validate `index` against a chunk of `chunk_len` elements without writing.
    ///
    /// Returns the positions the chunk will claim, to be passed to [`Self::commit`]
    /// once the write has happened.
    pub(crate) fn prepare(&self, index: &SlicingIndex, chunk_len: usize) -> Result<RoaringTreemap> {
        if index.len() != chunk_len {
            return Err(Error::InvalidArgumentError(format!(
                "slicing index has {} positions but the chunk has {} values",
                index.len(),
                chunk_len
            )));
        }
        if let Some(max) = index.max_position().filter(|&max| max >= self.len) {
            return Err(Error::InvalidArgumentError(format!(
                "position {max} out of bounds for a column of length {}",
                self.len
            )));
        }

        let mut claimed = RoaringTreemap::new();
        let mut overlap = None;
        for p in index {
            let p = p as u64;
            if (!claimed.insert(p) || self.written.contains(p)) && overlap.is_none() {
                overlap = Some(p);
            }
        }
        if let Some(p) = overlap {
            if self.options.reject_overwrites {
                return Err(Error::InvalidArgumentError(format!(
                    "position {p} would be written twice"
                )));
            }
            tracing::warn!("overwriting position {} of a {}-row column", p, self.len);
        }
        Ok(claimed)
    }

    pub(crate) fn commit(&mut self, claimed: RoaringTreemap) {
        self.written |= claimed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_checks_length_and_bounds() {
        let dest = Destination::new(4, CollectOptions::default());
        assert!(matches!(
            dest.prepare(&SlicingIndex::range(0, 2), 3),
            Err(Error::InvalidArgumentError(_))
        ));
        assert!(matches!(
            dest.prepare(&SlicingIndex::range(2, 3), 3),
            Err(Error::InvalidArgumentError(_))
        ));
        assert!(matches!(
            dest.prepare(&SlicingIndex::range(usize::MAX, 2), 2),
            Err(Error::InvalidArgumentError(_))
        ));
        assert!(dest.prepare(&SlicingIndex::range(1, 3), 3).is_ok());
        assert!(dest.prepare(&SlicingIndex::full(0), 0).is_ok());
    }

    #[test]
    fn overwrites_are_rejected_by_default() {
        let mut dest = Destination::new(4, CollectOptions::default());
        let claimed = dest.prepare(&SlicingIndex::from(vec![0, 2]), 2).unwrap();
        dest.commit(claimed);
        assert!(dest.prepare(&SlicingIndex::from(vec![1, 2]), 2).is_err());
        assert!(dest.prepare(&SlicingIndex::from(vec![1, 1]), 2).is_err());
        assert_eq!(dest.written_positions().to_positions(), vec![0, 2]);
    }

    #[test]
    fn overwrites_allowed_when_configured() {
        let mut dest = Destination::new(
            3,
            CollectOptions {
                reject_overwrites: false,
            },
        );
        let claimed = dest.prepare(&SlicingIndex::full(3), 3).unwrap();
        dest.commit(claimed);
        let claimed = dest.prepare(&SlicingIndex::from(vec![1]), 1).unwrap();
        dest.commit(claimed);
        assert_eq!(dest.written_positions().to_positions(), vec![0, 1, 2]);
    }
}
