//! colgather: column materialization from independently typed chunks.
//!
//! This crate is the entrypoint of the colgather workspace. It re-exports the
//! collecters, the runtime value vocabulary and the error types from the
//! underlying `colgather-*` crates.
//!
//! # Quick Start
//!
//! Gather per-group results into one column, letting the integer chunk widen
//! the logical one:
//!
//! ```rust
//! use colgather::{SlicingIndex, Vector, gather};
//!
//! let column = gather(
//!     4,
//!     vec![
//!         (SlicingIndex::from(vec![0, 2]), Vector::logical(vec![Some(true), None])),
//!         (SlicingIndex::from(vec![1, 3]), Vector::integer(vec![Some(5), Some(6)])),
//!     ],
//! )
//! .unwrap();
//! assert_eq!(column.as_integer(), Some(&[Some(1), Some(5), None, Some(6)][..]));
//! ```
//!
//! # Architecture
//!
//! - **Values** (`colgather-types`): type tags, class tags, factor levels.
//! - **Collection** (`colgather-collect`): collecters, the factory, promotion and the gather driver.
//! - **Interop** (`colgather-arrow`, feature `arrow`): conversion to and from Arrow arrays.
//! - **Errors** (`colgather-result`): the shared [`Error`] enum.

pub use colgather_collect::{
    CollectOptions, Collecter, FactorCollecter, Gatherer, LevelsMap, PrimitiveCollecter,
    SlicingIndex, TypedCollecter, collecter, collecter_with_options, gather, gather_with_options,
    promote,
};
pub use colgather_result::{Error, Result};
pub use colgather_types::{Attributes, CollecterKind, TypeTag, Vector, VectorData};

#[cfg(feature = "arrow")]
pub mod arrow {
    //! Conversion between finalized columns and Arrow arrays.

    pub use colgather_arrow::{
        CLASS_METADATA_KEY, data_type_of, field_for, from_arrow, gather_arrow, to_arrow,
    };
}
