//! Categorical collecter with level unification across chunks.
//!
//! Each chunk brings its own level labels and internal codes. The collecter
//! keeps one [`LevelsMap`] for the whole column and rewrites every incoming
//! code to the column-wide code of its label, allocating new codes in the order
//! labels are first seen. Two chunks that both contain `"red"` therefore end up
//! sharing a single code even if their own codes for it differed.
//!
//! Chunks without level labels are accepted as raw codes, but only when every
//! code refers to a level some earlier labelled chunk already established.

use colgather_result::{Error, Result};
use colgather_types::{Attributes, CollecterKind, FACTOR_CLASS, TypeTag, Vector, VectorData};
use rustc_hash::FxHashMap;

use crate::SlicingIndex;
use crate::collecter::{CollectOptions, Collecter, Destination};

/// Bijection between level labels and dense 1-based codes.
#[derive(Debug, Clone, Default)]
pub struct LevelsMap {
    codes: FxHashMap<String, i32>,
}

impl LevelsMap {
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// The next unused code.
    pub fn current_level(&self) -> i32 {
        self.codes.len() as i32 + 1
    }

    pub fn code_of(&self, label: &str) -> Option<i32> {
        self.codes.get(label).copied()
    }

    /// Code for `label`, allocating the next one if the label is new.
    pub fn resolve(&mut self, label: &str) -> i32 {
        if let Some(code) = self.codes.get(label) {
            return *code;
        }
        let code = self.current_level();
        self.codes.insert(label.to_string(), code);
        code
    }

    /// Labels ordered by code, so label `k - 1` carries code `k`.
    pub fn labels(&self) -> Vec<String> {
        let mut labels = vec![String::new(); self.codes.len()];
        for (label, &code) in &self.codes {
            labels[(code - 1) as usize] = label.clone();
        }
        labels
    }
}

/// Collecter for factor columns.
#[derive(Debug, Clone)]
pub struct FactorCollecter {
    data: Vec<Option<i32>>,
    levels: LevelsMap,
    dest: Destination,
}

impl FactorCollecter {
    pub fn new(n: usize) -> Self {
        Self::with_options(n, CollectOptions::default())
    }

    pub fn with_options(n: usize, options: CollectOptions) -> Self {
        Self {
            data: vec![None; n],
            levels: LevelsMap::default(),
            dest: Destination::new(n, options),
        }
    }

    pub fn levels(&self) -> &LevelsMap {
        &self.levels
    }

    pub fn current_level(&self) -> i32 {
        self.levels.current_level()
    }

    fn attributes(&self) -> Attributes {
        Attributes {
            class: vec![FACTOR_CLASS.to_string()],
            levels: Some(self.levels.labels()),
        }
    }

    fn collect_labelled(
        &mut self,
        index: &SlicingIndex,
        codes: &[Option<i32>],
        labels: &[String],
    ) -> Result<()> {
        if let Some(bad) = codes
            .iter()
            .flatten()
            .find(|&&code| code < 1 || code as usize > labels.len())
        {
            return Err(Error::InvalidArgumentError(format!(
                "factor code {bad} is outside of its {} levels",
                labels.len()
            )));
        }
        let claimed = self.dest.prepare(index, codes.len())?;

        let before = self.levels.len();
        // Chunk code -> column code, resolved on first use so that allocation
        // follows the order in which labels appear in the data.
        let mut translated: Vec<Option<i32>> = vec![None; labels.len()];
        for (code, p) in codes.iter().zip(index) {
            let resolved = match code {
                Some(code) => {
                    let slot = (code - 1) as usize;
                    let levels = &mut self.levels;
                    Some(*translated[slot].get_or_insert_with(|| levels.resolve(&labels[slot])))
                }
                None => None,
            };
            self.data[p] = resolved;
        }
        self.dest.commit(claimed);

        let added = self.levels.len() - before;
        if added > 0 {
            tracing::debug!(
                "factor chunk of {} values added {} levels ({} total)",
                codes.len(),
                added,
                self.levels.len()
            );
        }
        Ok(())
    }

    fn collect_codes(&mut self, index: &SlicingIndex, codes: &[Option<i32>]) -> Result<()> {
        let current = self.levels.current_level();
        if let Some(bad) = codes
            .iter()
            .flatten()
            .find(|&&code| code < 1 || code >= current)
        {
            return Err(Error::FactorCoercion(format!(
                "code {bad} does not reference one of the {} established levels",
                current - 1
            )));
        }
        let claimed = self.dest.prepare(index, codes.len())?;
        for (code, p) in codes.iter().zip(index) {
            self.data[p] = *code;
        }
        self.dest.commit(claimed);
        tracing::trace!("collected {} factor codes", codes.len());
        Ok(())
    }
}

impl Collecter for FactorCollecter {
    /// Labelled chunks are unified through the level map; unlabelled integer
    /// chunks are taken verbatim when every code is already established.
    fn collect(&mut self, index: &SlicingIndex, chunk: &Vector) -> Result<()> {
        let codes = chunk
            .as_integer()
            .ok_or_else(|| Error::incompatible(CollecterKind::Factor, chunk.describe()))?;
        match chunk.levels() {
            Some(labels) => self.collect_labelled(index, codes, labels),
            None => self.collect_codes(index, codes),
        }
    }

    fn get(&self) -> Vector {
        Vector::new(VectorData::Integer(self.data.clone()), self.attributes())
    }

    fn into_vector(self: Box<Self>) -> Vector {
        let attrs = self.attributes();
        Vector::new(VectorData::Integer(self.data), attrs)
    }

    fn compatible(&self, probe: &Vector) -> bool {
        probe.type_tag() == TypeTag::Integer && probe.is_factor()
    }

    /// Strings can absorb any factor.
    fn can_promote(&self, probe: &Vector) -> bool {
        probe.type_tag() == TypeTag::String
    }

    fn kind(&self) -> CollecterKind {
        CollecterKind::Factor
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
