//! Error types and result definitions for the colgather workspace.
//!
//! Every colgather crate reports failures through the single [`Error`] enum and the
//! [`Result<T>`] alias defined here, so errors cross crate boundaries with `?` and
//! callers can match on the variant that aborted a column materialization.
//!
//! # Error Categories
//!
//! - **Type reconciliation** ([`Error::IncompatibleType`], [`Error::UnsupportedType`]):
//!   a chunk cannot join the column being collected, or no collecter exists for a model.
//! - **Factor coercion** ([`Error::FactorCoercion`]): an unlabeled integer chunk
//!   references a factor level that has not been established.
//! - **User input errors** ([`Error::InvalidArgumentError`]): malformed indices or values.
//! - **Data format errors** ([`Error::Arrow`]): Arrow interop failures.
//! - **Internal errors** ([`Error::Internal`]): bugs or unexpected states.
//!
//! None of these are transient. A failed collection is abandoned, never retried.

pub mod error;
pub mod result;

pub use error::Error;
pub use result::Result;
