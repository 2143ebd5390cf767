//! Runtime value vocabulary shared across colgather crates.
//!
//! A [`Vector`] is a homogeneous column of values carrying a primitive
//! [`TypeTag`] plus optional [`Attributes`]: an ordered class-tag list (e.g.
//! `["POSIXct", "POSIXt"]`) and, for factors, the level labels. Collecters read
//! these to decide compatibility and attach them again when finalizing.

pub mod vector;

pub use vector::{Attributes, Vector, VectorData};

use std::fmt;

/// Class tag marking an integer vector as categorical.
pub const FACTOR_CLASS: &str = "factor";
/// Class tag for calendar dates stored as days since the Unix epoch.
pub const DATE_CLASS: &str = "Date";
/// Class tags for date-times stored as seconds since the Unix epoch.
pub const POSIXCT_CLASSES: [&str; 2] = ["POSIXct", "POSIXt"];

/// Primitive storage type of a [`Vector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// Three-valued booleans.
    Logical,
    /// 32-bit signed integers. Also the storage of factors.
    Integer,
    /// 64-bit floats. Also the storage of dates and date-times.
    Double,
    /// UTF-8 strings.
    String,
    /// Raw bytes. No collecter handles this type.
    Raw,
}

impl TypeTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::Logical => "logical",
            TypeTag::Integer => "integer",
            TypeTag::Double => "double",
            TypeTag::String => "character",
            TypeTag::Raw => "raw",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The closed set of collecter variants.
///
/// Each variant pairs a primitive storage type with the class tags that the
/// finalized column carries, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollecterKind {
    Logical,
    Integer,
    Double,
    String,
    Factor,
    Date,
    PosixCt,
}

impl CollecterKind {
    /// Primitive storage type of the destination buffer.
    pub fn storage(&self) -> TypeTag {
        match self {
            CollecterKind::Logical => TypeTag::Logical,
            CollecterKind::Integer | CollecterKind::Factor => TypeTag::Integer,
            CollecterKind::Double | CollecterKind::Date | CollecterKind::PosixCt => {
                TypeTag::Double
            }
            CollecterKind::String => TypeTag::String,
        }
    }

    /// Class tags attached to the finalized column.
    pub fn class_tags(&self) -> &'static [&'static str] {
        match self {
            CollecterKind::Factor => &[FACTOR_CLASS],
            CollecterKind::Date => &[DATE_CLASS],
            CollecterKind::PosixCt => &POSIXCT_CLASSES,
            _ => &[],
        }
    }

    /// The kind a collecter built from `model` would have, if any.
    pub fn of(model: &Vector) -> Option<CollecterKind> {
        match model.type_tag() {
            TypeTag::Integer if model.is_factor() => Some(CollecterKind::Factor),
            TypeTag::Integer => Some(CollecterKind::Integer),
            TypeTag::Double if model.inherits(POSIXCT_CLASSES[0]) => Some(CollecterKind::PosixCt),
            TypeTag::Double if model.inherits(DATE_CLASS) => Some(CollecterKind::Date),
            TypeTag::Double => Some(CollecterKind::Double),
            TypeTag::Logical => Some(CollecterKind::Logical),
            TypeTag::String => Some(CollecterKind::String),
            TypeTag::Raw => None,
        }
    }
}

impl fmt::Display for CollecterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CollecterKind::Logical => "logical",
            CollecterKind::Integer => "integer",
            CollecterKind::Double => "double",
            CollecterKind::String => "character",
            CollecterKind::Factor => "factor",
            CollecterKind::Date => "Date",
            CollecterKind::PosixCt => "POSIXct",
        };
        f.write_str(name)
    }
}
