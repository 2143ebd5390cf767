//! Arrow <-> colgather vector bridge.
//!
//! Writer:
//!   - Converts a finalized [`Vector`] into an Arrow array plus a field whose
//!     `"class"` metadata keeps the class tags.
//!   - Factors become `Dictionary(Int32, Utf8)` with 0-based keys, dates
//!     `Date32`, date-times `Timestamp(Microsecond)`.
//!
//! Reader:
//!   - Converts Arrow arrays into chunks ready for collection.
//!   - Accepts the writer's types plus `LargeUtf8`, `Date64` and timestamps in
//!     any unit.

#![forbid(unsafe_code)]

use std::collections::HashMap;
use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, BooleanArray, Date32Array, Date64Array, DictionaryArray, Float64Array,
    Int32Array, LargeStringArray, StringArray, TimestampMicrosecondArray,
    TimestampMillisecondArray, TimestampNanosecondArray, TimestampSecondArray, UInt8Array,
};
use arrow::datatypes::{DataType, Field, Int32Type, TimeUnit};

use colgather_collect::{Gatherer, SlicingIndex};
use colgather_result::{Error, Result};
use colgather_types::{CollecterKind, DATE_CLASS, POSIXCT_CLASSES, Vector, VectorData};

/// Field metadata key holding the comma-separated class tags.
pub const CLASS_METADATA_KEY: &str = "class";

const SECONDS_PER_DAY: f64 = 86_400.0;
const MICROS_PER_SECOND: f64 = 1_000_000.0;

/* ============================== WRITER ============================== */

/// Arrow type a vector converts to.
pub fn data_type_of(vector: &Vector) -> Result<DataType> {
    let data_type = match arrow_shape(vector)? {
        Shape::Factor => {
            DataType::Dictionary(Box::new(DataType::Int32), Box::new(DataType::Utf8))
        }
        Shape::Date => DataType::Date32,
        Shape::PosixCt => DataType::Timestamp(TimeUnit::Microsecond, None),
        Shape::Plain => match vector.data() {
            VectorData::Logical(_) => DataType::Boolean,
            VectorData::Integer(_) => DataType::Int32,
            VectorData::Double(_) => DataType::Float64,
            VectorData::String(_) => DataType::Utf8,
            VectorData::Raw(_) => DataType::UInt8,
        },
    };
    Ok(data_type)
}

/// Nullable field named `name` for `vector`, carrying its class tags as metadata.
pub fn field_for(name: &str, vector: &Vector) -> Result<Field> {
    let field = Field::new(name, data_type_of(vector)?, true);
    if vector.class().is_empty() {
        return Ok(field);
    }
    let metadata = HashMap::from([(CLASS_METADATA_KEY.to_string(), vector.class().join(","))]);
    Ok(field.with_metadata(metadata))
}

/// Convert `vector` into an Arrow array.
pub fn to_arrow(vector: &Vector) -> Result<ArrayRef> {
    let array: ArrayRef = match (arrow_shape(vector)?, vector.data()) {
        (Shape::Factor, VectorData::Integer(codes)) => {
            let levels = vector.levels().ok_or_else(|| {
                Error::InvalidArgumentError("factor vector has no levels".into())
            })?;
            let keys = Int32Array::from(
                codes
                    .iter()
                    .map(|code| code.map(|c| c - 1))
                    .collect::<Vec<_>>(),
            );
            let values: StringArray = levels.iter().map(|l| Some(l.as_str())).collect();
            Arc::new(DictionaryArray::<Int32Type>::try_new(keys, Arc::new(values))?)
        }
        (Shape::Date, VectorData::Double(days)) => Arc::new(Date32Array::from(
            days.iter()
                .map(|d| d.map(date32_of).transpose())
                .collect::<Result<Vec<_>>>()?,
        )),
        (Shape::PosixCt, VectorData::Double(secs)) => Arc::new(TimestampMicrosecondArray::from(
            secs.iter()
                .map(|s| s.map(timestamp_micros_of).transpose())
                .collect::<Result<Vec<_>>>()?,
        )),
        (Shape::Plain, VectorData::Logical(v)) => Arc::new(BooleanArray::from(v.clone())),
        (Shape::Plain, VectorData::Integer(v)) => Arc::new(Int32Array::from(v.clone())),
        (Shape::Plain, VectorData::Double(v)) => Arc::new(Float64Array::from(v.clone())),
        (Shape::Plain, VectorData::String(v)) => {
            Arc::new(v.iter().map(|s| s.as_deref()).collect::<StringArray>())
        }
        (Shape::Plain, VectorData::Raw(v)) => Arc::new(UInt8Array::from(v.clone())),
        (_, data) => {
            return Err(Error::Internal(format!(
                "{} storage does not match its class tags",
                data.type_tag()
            )));
        }
    };
    Ok(array)
}

/// Whole days since the epoch, floored.
fn date32_of(days: f64) -> Result<i32> {
    let floored = days.floor();
    if floored.is_finite() && floored >= f64::from(i32::MIN) && floored <= f64::from(i32::MAX) {
        Ok(floored as i32)
    } else {
        Err(Error::InvalidArgumentError(format!(
            "date {days} does not fit a Date32 day count"
        )))
    }
}

/// Microseconds since the epoch, rounded.
fn timestamp_micros_of(seconds: f64) -> Result<i64> {
    let micros = (seconds * MICROS_PER_SECOND).round();
    // i64::MAX is not exactly representable; as f64 it rounds up to 2^63.
    if micros.is_finite() && micros >= i64::MIN as f64 && micros < i64::MAX as f64 {
        Ok(micros as i64)
    } else {
        Err(Error::InvalidArgumentError(format!(
            "date-time {seconds} does not fit a microsecond timestamp"
        )))
    }
}

/// How the class tags of a vector change its Arrow representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Plain,
    Factor,
    Date,
    PosixCt,
}

fn arrow_shape(vector: &Vector) -> Result<Shape> {
    match CollecterKind::of(vector) {
        Some(CollecterKind::Factor) => Ok(Shape::Factor),
        Some(CollecterKind::Date) => Ok(Shape::Date),
        Some(CollecterKind::PosixCt) => Ok(Shape::PosixCt),
        Some(_) | None
            if vector.is_factor()
                || vector.inherits(DATE_CLASS)
                || vector.inherits(POSIXCT_CLASSES[0]) =>
        {
            Err(Error::InvalidArgumentError(format!(
                "{} has class tags that do not fit its {} storage",
                vector.describe(),
                vector.type_tag()
            )))
        }
        Some(_) | None => Ok(Shape::Plain),
    }
}

/* ============================== READER ============================== */

fn downcast<'a, T: Array + 'static>(array: &'a dyn Array, what: &str) -> Result<&'a T> {
    array
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| Error::Internal(format!("expected {what} array")))
}

/// Convert an Arrow array into a vector.
pub fn from_arrow(array: &dyn Array) -> Result<Vector> {
    let vector = match array.data_type() {
        DataType::Boolean => {
            Vector::logical(downcast::<BooleanArray>(array, "Boolean")?.iter().collect())
        }
        DataType::Int32 => Vector::integer(downcast::<Int32Array>(array, "Int32")?.iter().collect()),
        DataType::Float64 => {
            Vector::double(downcast::<Float64Array>(array, "Float64")?.iter().collect())
        }
        DataType::Utf8 => Vector::string(
            downcast::<StringArray>(array, "Utf8")?
                .iter()
                .map(|s| s.map(str::to_string))
                .collect(),
        ),
        DataType::LargeUtf8 => Vector::string(
            downcast::<LargeStringArray>(array, "LargeUtf8")?
                .iter()
                .map(|s| s.map(str::to_string))
                .collect(),
        ),
        DataType::Dictionary(key, value)
            if key.as_ref() == &DataType::Int32 && value.as_ref() == &DataType::Utf8 =>
        {
            factor_from_dictionary(downcast::<DictionaryArray<Int32Type>>(array, "Dictionary")?)?
        }
        DataType::Date32 => Vector::date(
            downcast::<Date32Array>(array, "Date32")?
                .iter()
                .map(|d| d.map(f64::from))
                .collect(),
        ),
        DataType::Date64 => Vector::date(
            downcast::<Date64Array>(array, "Date64")?
                .iter()
                .map(|ms| ms.map(|ms| (ms as f64 / 1_000.0 / SECONDS_PER_DAY).floor()))
                .collect(),
        ),
        DataType::Timestamp(unit, _) => {
            let seconds: Vec<Option<f64>> = match unit {
                TimeUnit::Second => downcast::<TimestampSecondArray>(array, "Timestamp(s)")?
                    .iter()
                    .map(|t| t.map(|t| t as f64))
                    .collect(),
                TimeUnit::Millisecond => {
                    downcast::<TimestampMillisecondArray>(array, "Timestamp(ms)")?
                        .iter()
                        .map(|t| t.map(|t| t as f64 / 1e3))
                        .collect()
                }
                TimeUnit::Microsecond => {
                    downcast::<TimestampMicrosecondArray>(array, "Timestamp(us)")?
                        .iter()
                        .map(|t| t.map(|t| t as f64 / 1e6))
                        .collect()
                }
                TimeUnit::Nanosecond => {
                    downcast::<TimestampNanosecondArray>(array, "Timestamp(ns)")?
                        .iter()
                        .map(|t| t.map(|t| t as f64 / 1e9))
                        .collect()
                }
            };
            Vector::posixct(seconds)
        }
        DataType::UInt8 => {
            let bytes = downcast::<UInt8Array>(array, "UInt8")?;
            if bytes.null_count() > 0 {
                return Err(Error::InvalidArgumentError(
                    "raw vectors cannot hold nulls".into(),
                ));
            }
            Vector::raw(bytes.values().to_vec())
        }
        other => {
            return Err(Error::unsupported(format!(
                "no vector representation for Arrow type {other}"
            )));
        }
    };
    Ok(vector)
}

fn factor_from_dictionary(dict: &DictionaryArray<Int32Type>) -> Result<Vector> {
    let values = downcast::<StringArray>(dict.values().as_ref(), "Utf8 dictionary values")?;
    if values.null_count() > 0 {
        return Err(Error::InvalidArgumentError(
            "dictionary values used as factor levels cannot be null".into(),
        ));
    }
    let levels = values.iter().flatten().map(str::to_string).collect();
    let codes = dict.keys().iter().map(|k| k.map(|k| k + 1)).collect();
    Vector::factor(codes, levels)
}

/* ============================== GATHER ============================== */

/// Gather Arrow chunks into one column of `n` rows named `name`.
///
/// Each chunk is converted with [`from_arrow`] and fed through a [`Gatherer`],
/// so chunk types are reconciled and promoted exactly as for native vectors.
pub fn gather_arrow<I>(name: &str, n: usize, chunks: I) -> Result<(Field, ArrayRef)>
where
    I: IntoIterator<Item = (SlicingIndex, ArrayRef)>,
{
    let mut gatherer = Gatherer::new(n);
    let mut count = 0usize;
    for (index, array) in chunks {
        gatherer.push(&index, &from_arrow(array.as_ref())?)?;
        count += 1;
    }
    tracing::debug!(
        "gathered {} Arrow chunks into column '{}' ({} promotions)",
        count,
        name,
        gatherer.promotions()
    );
    let column = gatherer.finish()?;
    Ok((field_for(name, &column)?, to_arrow(&column)?))
}
