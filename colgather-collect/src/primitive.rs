//! Scatter-write collecters over a single primitive storage type, and the
//! per-type overrides of the promotion lattice.

use colgather_result::{Error, Result};
use colgather_types::{CollecterKind, TypeTag, Vector, VectorData};

use crate::SlicingIndex;
use crate::collecter::{CollectOptions, Collecter, Destination};

/// A primitive element type a collecter can buffer.
///
/// `compatible` and `can_promote` default to "same storage type" and "never";
/// element types that sit on the numeric widening ladder override them.
pub trait Primitive: Clone + std::fmt::Debug + 'static {
    const KIND: CollecterKind;

    /// View a chunk's values when its storage matches this type.
    fn values(chunk: &Vector) -> Option<&[Option<Self>]>;

    fn wrap(values: Vec<Option<Self>>) -> VectorData;

    fn compatible(probe: &Vector) -> bool {
        probe.type_tag() == Self::KIND.storage()
    }

    fn can_promote(_probe: &Vector) -> bool {
        false
    }
}

impl Primitive for bool {
    const KIND: CollecterKind = CollecterKind::Logical;

    fn values(chunk: &Vector) -> Option<&[Option<bool>]> {
        chunk.as_logical()
    }

    fn wrap(values: Vec<Option<bool>>) -> VectorData {
        VectorData::Logical(values)
    }

    // Logical widens along the numeric ladder only; it never enters the factor track.
    // Any double storage qualifies, dates and date-times included.
    fn can_promote(probe: &Vector) -> bool {
        (probe.type_tag() == TypeTag::Integer && !probe.is_factor())
            || probe.type_tag() == TypeTag::Double
    }
}

impl Primitive for i32 {
    const KIND: CollecterKind = CollecterKind::Integer;

    fn values(chunk: &Vector) -> Option<&[Option<i32>]> {
        chunk.as_integer()
    }

    fn wrap(values: Vec<Option<i32>>) -> VectorData {
        VectorData::Integer(values)
    }

    // Factor-tagged integers belong to the factor collecter.
    fn compatible(probe: &Vector) -> bool {
        probe.type_tag() == TypeTag::Integer && !probe.is_factor()
    }

    fn can_promote(probe: &Vector) -> bool {
        probe.type_tag() == TypeTag::Double
            || (probe.type_tag() == TypeTag::Integer && probe.is_factor())
    }
}

impl Primitive for f64 {
    const KIND: CollecterKind = CollecterKind::Double;

    fn values(chunk: &Vector) -> Option<&[Option<f64>]> {
        chunk.as_double()
    }

    fn wrap(values: Vec<Option<f64>>) -> VectorData {
        VectorData::Double(values)
    }
}

impl Primitive for String {
    const KIND: CollecterKind = CollecterKind::String;

    fn values(chunk: &Vector) -> Option<&[Option<String>]> {
        chunk.as_string()
    }

    fn wrap(values: Vec<Option<String>>) -> VectorData {
        VectorData::String(values)
    }
}

/// Buffer of `T` filled by pure scatter writes, no transformation.
#[derive(Debug, Clone)]
pub struct PrimitiveCollecter<T: Primitive> {
    data: Vec<Option<T>>,
    dest: Destination,
}

impl<T: Primitive> PrimitiveCollecter<T> {
    pub fn new(n: usize) -> Self {
        Self::with_options(n, CollectOptions::default())
    }

    pub fn with_options(n: usize, options: CollectOptions) -> Self {
        Self {
            data: vec![None; n],
            dest: Destination::new(n, options),
        }
    }

    /// Scatter `source` through `index` after validating the write.
    pub(crate) fn scatter(&mut self, index: &SlicingIndex, source: &[Option<T>]) -> Result<()> {
        let claimed = self.dest.prepare(index, source.len())?;
        for (value, p) in source.iter().zip(index) {
            self.data[p] = value.clone();
        }
        self.dest.commit(claimed);
        tracing::trace!("collected {} {} values", source.len(), T::KIND);
        Ok(())
    }

    pub(crate) fn data(&self) -> &[Option<T>] {
        &self.data
    }

    pub(crate) fn into_data(self) -> Vec<Option<T>> {
        self.data
    }
}

impl<T: Primitive> Collecter for PrimitiveCollecter<T> {
    fn collect(&mut self, index: &SlicingIndex, chunk: &Vector) -> Result<()> {
        if !T::compatible(chunk) {
            return Err(Error::incompatible(T::KIND, chunk.describe()));
        }
        let source = T::values(chunk).ok_or_else(|| {
            Error::Internal(format!("{} chunk passed the {} check", chunk.describe(), T::KIND))
        })?;
        self.scatter(index, source)
    }

    fn get(&self) -> Vector {
        Vector::new(T::wrap(self.data.clone()), Default::default())
    }

    fn into_vector(self: Box<Self>) -> Vector {
        Vector::new(T::wrap(self.data), Default::default())
    }

    fn compatible(&self, probe: &Vector) -> bool {
        T::compatible(probe)
    }

    fn can_promote(&self, probe: &Vector) -> bool {
        T::can_promote(probe)
    }

    fn kind(&self) -> CollecterKind {
        T::KIND
    }

    fn len(&self) -> usize {
        self.dest.len()
    }

    fn options(&self) -> &CollectOptions {
        self.dest.options()
    }

    fn written_positions(&self) -> SlicingIndex {
        self.dest.written_positions()
    }
}
