//! Homogeneous runtime vectors and their attached metadata.

use colgather_result::{Error, Result};
use rustc_hash::FxHashMap;

use crate::{DATE_CLASS, FACTOR_CLASS, POSIXCT_CLASSES, TypeTag};

/// Storage of a [`Vector`], one variant per [`TypeTag`].
///
/// `None` is the missing-value sentinel. Raw bytes have no missing value.
#[derive(Debug, Clone, PartialEq)]
pub enum VectorData {
    Logical(Vec<Option<bool>>),
    Integer(Vec<Option<i32>>),
    Double(Vec<Option<f64>>),
    String(Vec<Option<String>>),
    Raw(Vec<u8>),
}

impl VectorData {
    pub fn type_tag(&self) -> TypeTag {
        match self {
            VectorData::Logical(_) => TypeTag::Logical,
            VectorData::Integer(_) => TypeTag::Integer,
            VectorData::Double(_) => TypeTag::Double,
            VectorData::String(_) => TypeTag::String,
            VectorData::Raw(_) => TypeTag::Raw,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            VectorData::Logical(v) => v.len(),
            VectorData::Integer(v) => v.len(),
            VectorData::Double(v) => v.len(),
            VectorData::String(v) => v.len(),
            VectorData::Raw(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Descriptive metadata attached to a vector.
///
/// Never consulted when values are written, only when deciding which collecter
/// a vector belongs to and when a finalized column is handed back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    /// Ordered class tags, most specific first.
    pub class: Vec<String>,
    /// Factor level labels. Code `k` refers to `levels[k - 1]`.
    pub levels: Option<Vec<String>>,
}

/// A homogeneous column of values plus its attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Vector {
    data: VectorData,
    attrs: Attributes,
}

impl Vector {
    pub fn new(data: VectorData, attrs: Attributes) -> Self {
        Self { data, attrs }
    }

    pub fn logical(values: Vec<Option<bool>>) -> Self {
        Self::new(VectorData::Logical(values), Attributes::default())
    }

    pub fn integer(values: Vec<Option<i32>>) -> Self {
        Self::new(VectorData::Integer(values), Attributes::default())
    }

    pub fn double(values: Vec<Option<f64>>) -> Self {
        Self::new(VectorData::Double(values), Attributes::default())
    }

    pub fn string(values: Vec<Option<String>>) -> Self {
        Self::new(VectorData::String(values), Attributes::default())
    }

    pub fn raw(bytes: Vec<u8>) -> Self {
        Self::new(VectorData::Raw(bytes), Attributes::default())
    }

    /// Build a factor from 1-based codes and their level labels.
    ///
    /// Every non-missing code must reference a level.
    pub fn factor(codes: Vec<Option<i32>>, levels: Vec<String>) -> Result<Self> {
        let nlevels = levels.len();
        if let Some(bad) = codes
            .iter()
            .flatten()
            .find(|&&code| code < 1 || code as usize > nlevels)
        {
            return Err(Error::InvalidArgumentError(format!(
                "factor code {bad} is outside of its {nlevels} levels"
            )));
        }
        Ok(Self::new(
            VectorData::Integer(codes),
            Attributes {
                class: vec![FACTOR_CLASS.to_string()],
                levels: Some(levels),
            },
        ))
    }

    /// Build a factor whose levels are the distinct labels in first-seen order.
    pub fn factor_from_labels(labels: Vec<Option<String>>) -> Self {
        let mut lookup: FxHashMap<String, i32> = FxHashMap::default();
        let mut levels = Vec::new();
        let codes = labels
            .into_iter()
            .map(|label| {
                label.map(|label| {
                    *lookup.entry(label).or_insert_with_key(|label| {
                        levels.push(label.clone());
                        levels.len() as i32
                    })
                })
            })
            .collect();
        Self::new(
            VectorData::Integer(codes),
            Attributes {
                class: vec![FACTOR_CLASS.to_string()],
                levels: Some(levels),
            },
        )
    }

    /// Calendar dates as days since the Unix epoch.
    pub fn date(days: Vec<Option<f64>>) -> Self {
        Self::double(days).with_class([DATE_CLASS])
    }

    /// Date-times as seconds since the Unix epoch.
    pub fn posixct(seconds: Vec<Option<f64>>) -> Self {
        Self::double(seconds).with_class(POSIXCT_CLASSES)
    }

    /// Replace the class tags.
    pub fn with_class<I, S>(mut self, class: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attrs.class = class.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the factor level labels.
    pub fn with_levels(mut self, levels: Option<Vec<String>>) -> Self {
        self.attrs.levels = levels;
        self
    }

    pub fn type_tag(&self) -> TypeTag {
        self.data.type_tag()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &VectorData {
        &self.data
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attrs
    }

    pub fn into_parts(self) -> (VectorData, Attributes) {
        (self.data, self.attrs)
    }

    pub fn class(&self) -> &[String] {
        &self.attrs.class
    }

    pub fn levels(&self) -> Option<&[String]> {
        self.attrs.levels.as_deref()
    }

    /// Whether `class` appears anywhere in the class-tag list.
    pub fn inherits(&self, class: &str) -> bool {
        self.attrs.class.iter().any(|c| c == class)
    }

    pub fn is_factor(&self) -> bool {
        self.inherits(FACTOR_CLASS)
    }

    pub fn as_logical(&self) -> Option<&[Option<bool>]> {
        match &self.data {
            VectorData::Logical(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<&[Option<i32>]> {
        match &self.data {
            VectorData::Integer(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<&[Option<f64>]> {
        match &self.data {
            VectorData::Double(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&[Option<String>]> {
        match &self.data {
            VectorData::String(v) => Some(v),
            _ => None,
        }
    }

    /// Decode a labelled factor into its labels.
    ///
    /// Returns `None` when this is not an integer vector carrying levels.
    pub fn factor_labels(&self) -> Option<Vec<Option<String>>> {
        let codes = self.as_integer()?;
        let levels = self.levels()?;
        Some(
            codes
                .iter()
                .map(|code| {
                    code.and_then(|c| c.checked_sub(1))
                        .and_then(|c| usize::try_from(c).ok())
                        .and_then(|idx| levels.get(idx).cloned())
                })
                .collect(),
        )
    }

    /// Copy the values at `positions`, keeping the attributes.
    pub fn take(&self, positions: &[usize]) -> Result<Vector> {
        let len = self.len();
        if let Some(&bad) = positions.iter().find(|&&p| p >= len) {
            return Err(Error::InvalidArgumentError(format!(
                "position {bad} out of bounds for vector of length {len}"
            )));
        }
        let data = match &self.data {
            VectorData::Logical(v) => VectorData::Logical(positions.iter().map(|&p| v[p]).collect()),
            VectorData::Integer(v) => VectorData::Integer(positions.iter().map(|&p| v[p]).collect()),
            VectorData::Double(v) => VectorData::Double(positions.iter().map(|&p| v[p]).collect()),
            VectorData::String(v) => {
                VectorData::String(positions.iter().map(|&p| v[p].clone()).collect())
            }
            VectorData::Raw(v) => VectorData::Raw(positions.iter().map(|&p| v[p]).collect()),
        };
        Ok(Vector::new(data, self.attrs.clone()))
    }

    /// Short human-readable description used in diagnostics.
    pub fn describe(&self) -> String {
        match self.attrs.class.first() {
            Some(class) => format!("{class} vector"),
            None => format!("{} vector", self.type_tag()),
        }
    }
}
