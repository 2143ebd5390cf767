//! Replacing a collecter with a wider one.
//!
//! Promotion never widens a buffer in place. A new collecter is built for the
//! probe's type, the probe is collected first, and only then are the values
//! accumulated by the old collecter replayed into it at their original
//! positions. Collecting the probe first matters for factors: a labelled probe
//! establishes the levels that the replayed plain integers must reference.

use colgather_result::{Error, Result};
use colgather_types::{CollecterKind, Vector, VectorData};
use roaring::RoaringTreemap;

use crate::SlicingIndex;
use crate::collecter::Collecter;
use crate::factory::collecter_with_options;

/// Build a collecter wide enough for both the values of `current` and `probe`,
/// collecting `probe` at `index` on the way.
///
/// `current` is only read, so on any error it is still usable as it was.
/// Positions that `index` rewrites are not replayed: with overwrites allowed the
/// probe is the last write and wins.
///
/// Fails with [`Error::IncompatibleType`] when `current` cannot be promoted to
/// hold `probe`.
pub fn promote(
    current: &dyn Collecter,
    index: &SlicingIndex,
    probe: &Vector,
) -> Result<Box<dyn Collecter>> {
    if !current.can_promote(probe) {
        return Err(Error::incompatible(current.kind(), probe.describe()));
    }
    let mut next = collecter_with_options(probe, current.len(), current.options().clone())?;
    next.collect(index, probe)?;

    let rewritten: RoaringTreemap = index.iter().map(|p| p as u64).collect();
    let (kept, overwritten): (Vec<usize>, Vec<usize>) = current
        .written_positions()
        .iter()
        .partition(|&p| !rewritten.contains(p as u64));
    if let Some(&p) = overwritten.first() {
        if current.options().reject_overwrites {
            return Err(Error::InvalidArgumentError(format!(
                "position {p} would be written twice"
            )));
        }
        tracing::warn!(
            "promotion overwrites {} positions of a {}-row column",
            overwritten.len(),
            current.len()
        );
    }

    let previous = current.get().take(&kept)?;
    let replay = widen(previous, next.kind())?;
    next.collect(&SlicingIndex::from_positions(kept), &replay)?;

    tracing::debug!(
        "promoted {} collecter to {} ({} values replayed)",
        current.kind(),
        next.kind(),
        replay.len()
    );
    Ok(next)
}

/// Convert finalized values into the element type of a `target` collecter.
fn widen(values: Vector, target: CollecterKind) -> Result<Vector> {
    let is_factor = values.is_factor();
    let labels = values.factor_labels();
    let (data, _) = values.into_parts();
    let widened = match (data, target) {
        (VectorData::Logical(v), CollecterKind::Integer) => {
            Vector::integer(v.into_iter().map(|b| b.map(i32::from)).collect())
        }
        // Doubles keep the target's class tags so date and date-time collecters
        // accept the replay.
        (VectorData::Logical(v), CollecterKind::Double | CollecterKind::Date | CollecterKind::PosixCt) => {
            Vector::double(v.into_iter().map(|b| b.map(|b| f64::from(u8::from(b)))).collect())
                .with_class(target.class_tags().iter().copied())
        }
        (VectorData::Integer(v), CollecterKind::Double | CollecterKind::Date | CollecterKind::PosixCt)
            if !is_factor =>
        {
            Vector::double(v.into_iter().map(|i| i.map(f64::from)).collect())
                .with_class(target.class_tags().iter().copied())
        }
        // Plain integers re-enter as raw codes, checked against the probe's levels.
        (VectorData::Integer(v), CollecterKind::Factor) if !is_factor => Vector::integer(v),
        (VectorData::Integer(_), CollecterKind::String) if is_factor => {
            let labels = labels.ok_or_else(|| {
                Error::Internal("factor collecter produced a column without levels".into())
            })?;
            Vector::string(labels)
        }
        (data, target) => {
            return Err(Error::Internal(format!(
                "no conversion from {} values to a {} collecter",
                data.type_tag(),
                target
            )));
        }
    };
    Ok(widened)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collecter;
    use crate::collecter::CollectOptions;

    #[test]
    fn logical_to_integer_replays_as_zero_one() {
        let mut c = collecter(&Vector::logical(vec![]), 4).unwrap();
        c.collect(
            &SlicingIndex::range(0, 3),
            &Vector::logical(vec![Some(true), Some(false), None]),
        )
        .unwrap();
        let probe = Vector::integer(vec![Some(42)]);
        let c = promote(c.as_ref(), &SlicingIndex::range(3, 1), &probe).unwrap();
        assert_eq!(c.kind(), CollecterKind::Integer);
        assert_eq!(
            c.get().as_integer(),
            Some(&[Some(1), Some(0), None, Some(42)][..])
        );
    }

    #[test]
    fn integer_to_double() {
        let mut c = collecter(&Vector::integer(vec![]), 3).unwrap();
        c.collect(&SlicingIndex::from(vec![2]), &Vector::integer(vec![Some(7)]))
            .unwrap();
        let c = promote(
            c.as_ref(),
            &SlicingIndex::from(vec![0]),
            &Vector::double(vec![Some(0.5)]),
        )
        .unwrap();
        assert_eq!(c.get().as_double(), Some(&[Some(0.5), None, Some(7.0)][..]));
    }

    #[test]
    fn integer_to_factor_needs_established_codes() {
        let probe = Vector::factor_from_labels(vec![Some("a".into()), Some("b".into())]);

        let mut ok = collecter(&Vector::integer(vec![]), 3).unwrap();
        ok.collect(&SlicingIndex::range(2, 1), &Vector::integer(vec![Some(2)]))
            .unwrap();
        let ok = promote(ok.as_ref(), &SlicingIndex::range(0, 2), &probe).unwrap();
        let out = ok.get();
        assert_eq!(out.as_integer(), Some(&[Some(1), Some(2), Some(2)][..]));
        assert_eq!(out.levels(), Some(&["a".to_string(), "b".to_string()][..]));

        let mut bad = collecter(&Vector::integer(vec![]), 3).unwrap();
        bad.collect(&SlicingIndex::range(2, 1), &Vector::integer(vec![Some(3)]))
            .unwrap();
        let err = promote(bad.as_ref(), &SlicingIndex::range(0, 2), &probe).unwrap_err();
        assert!(matches!(err, Error::FactorCoercion(_)));
    }

    #[test]
    fn factor_to_string_keeps_labels() {
        let mut c = collecter(&Vector::factor_from_labels(vec![]), 3).unwrap();
        c.collect(
            &SlicingIndex::range(0, 2),
            &Vector::factor_from_labels(vec![Some("x".into()), None]),
        )
        .unwrap();
        let c = promote(
            c.as_ref(),
            &SlicingIndex::range(2, 1),
            &Vector::string(vec![Some("free".into())]),
        )
        .unwrap();
        assert_eq!(c.kind(), CollecterKind::String);
        assert_eq!(
            c.get().as_string(),
            Some(&[Some("x".to_string()), None, Some("free".to_string())][..])
        );
    }

    #[test]
    fn refuses_when_not_promotable() {
        let c = collecter(&Vector::date(vec![]), 2).unwrap();
        let err = promote(c.as_ref(), &SlicingIndex::full(2), &Vector::double(vec![None, None]))
            .unwrap_err();
        assert!(matches!(err, Error::IncompatibleType { .. }));
    }

    #[test]
    fn failed_promotion_leaves_current_untouched() {
        let mut c = collecter(&Vector::logical(vec![]), 3).unwrap();
        c.collect(&SlicingIndex::from(vec![0]), &Vector::logical(vec![Some(true)]))
            .unwrap();
        let err = promote(
            c.as_ref(),
            &SlicingIndex::from(vec![7]),
            &Vector::integer(vec![Some(1)]),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidArgumentError(_)));
        assert_eq!(c.get().as_logical(), Some(&[Some(true), None, None][..]));
        assert_eq!(c.written_positions().to_positions(), vec![0]);
    }

    #[test]
    fn probe_wins_rewritten_positions() {
        let lenient = CollectOptions {
            reject_overwrites: false,
        };
        let mut c = collecter_with_options(&Vector::logical(vec![]), 2, lenient).unwrap();
        c.collect(&SlicingIndex::from(vec![0]), &Vector::logical(vec![Some(true)]))
            .unwrap();
        let c = promote(
            c.as_ref(),
            &SlicingIndex::range(0, 2),
            &Vector::integer(vec![Some(42), Some(7)]),
        )
        .unwrap();
        assert_eq!(c.get().as_integer(), Some(&[Some(42), Some(7)][..]));
    }

    #[test]
    fn rewritten_positions_rejected_by_default() {
        let mut c = collecter(&Vector::logical(vec![]), 2).unwrap();
        c.collect(&SlicingIndex::from(vec![0]), &Vector::logical(vec![Some(true)]))
            .unwrap();
        let err = promote(
            c.as_ref(),
            &SlicingIndex::range(0, 2),
            &Vector::integer(vec![Some(42), Some(7)]),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidArgumentError(_)));
    }

    #[test]
    fn integer_and_logical_widen_into_dates() {
        let mut c = collecter(&Vector::integer(vec![]), 3).unwrap();
        c.collect(&SlicingIndex::from(vec![1]), &Vector::integer(vec![Some(19000)]))
            .unwrap();
        let c = promote(
            c.as_ref(),
            &SlicingIndex::from(vec![0]),
            &Vector::date(vec![Some(18000.0)]),
        )
        .unwrap();
        assert_eq!(c.kind(), CollecterKind::Date);
        let out = c.get();
        assert_eq!(out.class(), &["Date".to_string()]);
        assert_eq!(out.as_double(), Some(&[Some(18000.0), Some(19000.0), None][..]));

        let mut c = collecter(&Vector::logical(vec![]), 2).unwrap();
        c.collect(&SlicingIndex::from(vec![0]), &Vector::logical(vec![Some(true)]))
            .unwrap();
        let c = promote(
            c.as_ref(),
            &SlicingIndex::from(vec![1]),
            &Vector::posixct(vec![Some(0.5)]),
        )
        .unwrap();
        assert_eq!(c.kind(), CollecterKind::PosixCt);
        assert_eq!(c.get().as_double(), Some(&[Some(1.0), Some(0.5)][..]));
    }
}
