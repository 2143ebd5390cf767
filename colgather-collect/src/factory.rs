//! Selection of the concrete collecter for a model value.

use colgather_result::{Error, Result};
use colgather_types::{CollecterKind, Vector};

use crate::collecter::{CollectOptions, Collecter};
use crate::factor::FactorCollecter;
use crate::primitive::PrimitiveCollecter;
use crate::typed::TypedCollecter;

/// Build the collecter for `model` sized for `n` rows, with default options.
///
/// ```
/// use colgather_collect::collecter;
/// use colgather_types::{CollecterKind, Vector};
///
/// let c = collecter(&Vector::date(vec![Some(19000.0)]), 10).unwrap();
/// assert_eq!(c.kind(), CollecterKind::Date);
/// assert_eq!(c.len(), 10);
/// ```
pub fn collecter(model: &Vector, n: usize) -> Result<Box<dyn Collecter>> {
    collecter_with_options(model, n, CollectOptions::default())
}

/// Build the collecter for `model` sized for `n` rows.
///
/// The model only picks the collecter; its values are not collected. Fails with
/// [`Error::UnsupportedType`] before allocating when no collecter handles the
/// model's type.
pub fn collecter_with_options(
    model: &Vector,
    n: usize,
    options: CollectOptions,
) -> Result<Box<dyn Collecter>> {
    let kind = CollecterKind::of(model).ok_or_else(|| {
        Error::unsupported(format!("no collecter for {}", model.describe()))
    })?;
    tracing::debug!("building {} collecter for {} rows", kind, n);
    Ok(collecter_for_kind(kind, n, options))
}

/// Build an empty collecter of the given kind.
pub fn collecter_for_kind(
    kind: CollecterKind,
    n: usize,
    options: CollectOptions,
) -> Box<dyn Collecter> {
    match kind {
        CollecterKind::Logical => Box::new(PrimitiveCollecter::<bool>::with_options(n, options)),
        CollecterKind::Integer => Box::new(PrimitiveCollecter::<i32>::with_options(n, options)),
        CollecterKind::Double => Box::new(PrimitiveCollecter::<f64>::with_options(n, options)),
        CollecterKind::String => Box::new(PrimitiveCollecter::<String>::with_options(n, options)),
        CollecterKind::Factor => Box::new(FactorCollecter::with_options(n, options)),
        CollecterKind::Date => Box::new(TypedCollecter::date(n, options)),
        CollecterKind::PosixCt => Box::new(TypedCollecter::posixct(n, options)),
    }
}
