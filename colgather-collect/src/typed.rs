//! Collecters whose finalized column carries a fixed class-tag list.

use colgather_result::{Error, Result};
use colgather_types::{Attributes, CollecterKind, Vector};

use crate::SlicingIndex;
use crate::collecter::{CollectOptions, Collecter};
use crate::primitive::{Primitive, PrimitiveCollecter};

/// A [`PrimitiveCollecter`] plus the class tags of a date or date-time column.
///
/// Probes must carry the same leading class tag; matching storage alone is not
/// enough, and typed columns never widen.
#[derive(Debug, Clone)]
pub struct TypedCollecter<T: Primitive> {
    inner: PrimitiveCollecter<T>,
    kind: CollecterKind,
}

impl TypedCollecter<f64> {
    /// Calendar dates, class `Date`.
    pub fn date(n: usize, options: CollectOptions) -> Self {
        Self::new(n, CollecterKind::Date, options)
    }

    /// Date-times, class `POSIXct`, `POSIXt`.
    pub fn posixct(n: usize, options: CollectOptions) -> Self {
        Self::new(n, CollecterKind::PosixCt, options)
    }
}

impl<T: Primitive> TypedCollecter<T> {
    fn new(n: usize, kind: CollecterKind, options: CollectOptions) -> Self {
        debug_assert_eq!(kind.storage(), T::KIND.storage());
        Self {
            inner: PrimitiveCollecter::with_options(n, options),
            kind,
        }
    }

    fn attributes(&self) -> Attributes {
        Attributes {
            class: self.kind.class_tags().iter().map(|c| c.to_string()).collect(),
            levels: None,
        }
    }
}

impl<T: Primitive> Collecter for TypedCollecter<T> {
    fn collect(&mut self, index: &SlicingIndex, chunk: &Vector) -> Result<()> {
        if !self.compatible(chunk) {
            return Err(Error::incompatible(self.kind, chunk.describe()));
        }
        let source = T::values(chunk).ok_or_else(|| {
            Error::Internal(format!("{} chunk passed the {} check", chunk.describe(), self.kind))
        })?;
        self.inner.scatter(index, source)
    }

    fn get(&self) -> Vector {
        Vector::new(T::wrap(self.inner.data().to_vec()), self.attributes())
    }

    fn into_vector(self: Box<Self>) -> Vector {
        let attrs = self.attributes();
        Vector::new(T::wrap(self.inner.into_data()), attrs)
    }

    fn compatible(&self, probe: &Vector) -> bool {
        let tags = self.kind.class_tags();
        probe.type_tag() == T::KIND.storage() && tags.first().is_some_and(|t| probe.inherits(t))
    }

    fn can_promote(&self, _probe: &Vector) -> bool {
        false
    }

    fn kind(&self) -> CollecterKind {
        self.kind
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn options(&self) -> &CollectOptions {
        self.inner.options()
    }

    fn written_positions(&self) -> SlicingIndex {
        self.inner.written_positions()
    }
}
