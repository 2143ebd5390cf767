//! Column collection with type reconciliation.
//!
//! A column of `n` rows is materialized by scattering independently typed chunks
//! (typically one per group) into a pre-sized destination buffer. Each chunk comes
//! with a [`SlicingIndex`] naming the destination row of every element.
//!
//! The [`collecter`] factory picks a concrete [`Collecter`] from a model chunk:
//!
//! | Model | Collecter |
//! |---|---|
//! | logical | [`PrimitiveCollecter<bool>`] |
//! | integer | [`PrimitiveCollecter<i32>`] |
//! | integer, class `factor` | [`FactorCollecter`] |
//! | double | [`PrimitiveCollecter<f64>`] |
//! | double, class `Date` / `POSIXct` | [`TypedCollecter<f64>`] |
//! | character | [`PrimitiveCollecter<String>`] |
//!
//! Chunks that do not match the current collecter exactly may still be absorbed
//! by a wider one. The promotion lattice is:
//!
//! - logical -> integer, double (dates and date-times included)
//! - integer -> double (dates and date-times included), factor
//! - factor -> character
//!
//! Date and date-time columns never widen themselves. [`promote`] performs the swap and
//! [`gather`] drives a whole sequence of chunks.

pub mod collecter;
pub mod factor;
pub mod factory;
pub mod gather;
pub mod index;
pub mod primitive;
pub mod promote;
pub mod typed;

pub use collecter::{CollectOptions, Collecter};
pub use factor::{FactorCollecter, LevelsMap};
pub use factory::{collecter, collecter_for_kind, collecter_with_options};
pub use gather::{Gatherer, gather, gather_with_options};
pub use index::{SlicingIndex, SlicingIter};
pub use primitive::{Primitive, PrimitiveCollecter};
pub use promote::promote;
pub use typed::TypedCollecter;
