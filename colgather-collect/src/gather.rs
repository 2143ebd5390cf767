//! Driving a collecter over a sequence of chunks.

use colgather_result::{Error, Result};
use colgather_types::{CollecterKind, Vector};

use crate::SlicingIndex;
use crate::collecter::{CollectOptions, Collecter};
use crate::factory::collecter_with_options;
use crate::promote::promote;

/// Incremental column materialization.
///
/// The first chunk pushed is the model that picks the collecter. Later chunks are
/// collected when compatible, trigger a promotion when the current collecter can
/// be widened for them, and fail with [`Error::IncompatibleType`] otherwise.
#[derive(Debug)]
pub struct Gatherer {
    n: usize,
    options: CollectOptions,
    current: Option<Box<dyn Collecter>>,
    promotions: usize,
}

impl Gatherer {
    pub fn new(n: usize) -> Self {
        Self::with_options(n, CollectOptions::default())
    }

    pub fn with_options(n: usize, options: CollectOptions) -> Self {
        Self {
            n,
            options,
            current: None,
            promotions: 0,
        }
    }

    /// Collect `chunk` at `index`, promoting the current collecter when needed.
    ///
    /// A chunk that fails for any reason leaves the gatherer as it was.
    pub fn push(&mut self, index: &SlicingIndex, chunk: &Vector) -> Result<()> {
        let Some(current) = self.current.as_mut() else {
            let mut first = collecter_with_options(chunk, self.n, self.options.clone())?;
            first.collect(index, chunk)?;
            self.current = Some(first);
            return Ok(());
        };
        if current.compatible(chunk) {
            return current.collect(index, chunk);
        }
        if !current.can_promote(chunk) {
            return Err(Error::incompatible(current.kind(), chunk.describe()));
        }
        let wider = promote(&**current, index, chunk)?;
        self.current = Some(wider);
        self.promotions += 1;
        Ok(())
    }

    /// Kind of the current collecter, `None` before the first chunk.
    pub fn kind(&self) -> Option<CollecterKind> {
        self.current.as_ref().map(|c| c.kind())
    }

    /// Number of promotions performed so far.
    pub fn promotions(&self) -> usize {
        self.promotions
    }

    pub fn finish(self) -> Result<Vector> {
        self.current
            .map(|c| c.into_vector())
            .ok_or_else(|| Error::InvalidArgumentError("no chunks to gather".into()))
    }
}

/// Gather `chunks` into one column of `n` rows, with default options.
///
/// ```
/// use colgather_collect::{SlicingIndex, gather};
/// use colgather_types::Vector;
///
/// let column = gather(
///     3,
///     vec![
///         (SlicingIndex::from(vec![2]), Vector::logical(vec![Some(true)])),
///         (SlicingIndex::from(vec![0, 1]), Vector::double(vec![Some(0.5), None])),
///     ],
/// )
/// .unwrap();
/// assert_eq!(column.as_double(), Some(&[Some(0.5), None, Some(1.0)][..]));
/// ```
pub fn gather<I>(n: usize, chunks: I) -> Result<Vector>
where
    I: IntoIterator<Item = (SlicingIndex, Vector)>,
{
    gather_with_options(n, chunks, CollectOptions::default())
}

pub fn gather_with_options<I>(n: usize, chunks: I, options: CollectOptions) -> Result<Vector>
where
    I: IntoIterator<Item = (SlicingIndex, Vector)>,
{
    let mut gatherer = Gatherer::with_options(n, options);
    for (index, chunk) in chunks {
        gatherer.push(&index, &chunk)?;
    }
    gatherer.finish()
}
