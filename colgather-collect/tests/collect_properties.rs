use colgather_collect::{
    CollectOptions, Collecter, FactorCollecter, SlicingIndex, collecter, collecter_for_kind,
    gather, promote,
};
use colgather_result::Error;
use colgather_test_utils::{factor_of, init_tracing_for_tests, random_partition, strings};
use colgather_types::{CollecterKind, Vector};

/* --------------------------- Shared helpers ---------------------------- */

const ALL_KINDS: [CollecterKind; 7] = [
    CollecterKind::Logical,
    CollecterKind::Integer,
    CollecterKind::Double,
    CollecterKind::String,
    CollecterKind::Factor,
    CollecterKind::Date,
    CollecterKind::PosixCt,
];

/// One probe of every shape the lattice distinguishes.
fn probes() -> Vec<Vector> {
    vec![
        Vector::logical(vec![Some(true)]),
        Vector::integer(vec![Some(1)]),
        factor_of(&["a"]),
        Vector::integer(vec![Some(1)]).with_class(["factor"]),
        Vector::double(vec![Some(1.0)]),
        Vector::date(vec![Some(1.0)]),
        Vector::posixct(vec![Some(1.0)]),
        strings(&[Some("a")]),
        Vector::raw(vec![1]),
    ]
}

/* ------------------------------ Properties ------------------------------ */

#[test]
fn scatter_identity_with_sentinel_tail() {
    init_tracing_for_tests();
    let chunk = Vector::double(vec![Some(1.5), None, Some(-3.0)]);
    let mut c = collecter(&chunk, 5).unwrap();
    c.collect(&SlicingIndex::full(3), &chunk).unwrap();
    assert_eq!(
        c.get().as_double(),
        Some(&[Some(1.5), None, Some(-3.0), None, None][..])
    );
}

#[test]
fn partition_coverage_places_every_value() {
    init_tracing_for_tests();
    let n = 500;
    for seed in 0..5 {
        let parts = random_partition(n, 9, seed);
        let chunks: Vec<(SlicingIndex, Vector)> = parts
            .into_iter()
            .map(|rows| {
                // Each row's value is derived from its destination so the result
                // can be checked without tracking which chunk wrote it.
                let values = rows.iter().map(|&r| Some(r as i32 * 3)).collect();
                (SlicingIndex::from(rows), Vector::integer(values))
            })
            .collect();
        let out = gather(n, chunks).unwrap();
        let expected: Vec<Option<i32>> = (0..n).map(|r| Some(r as i32 * 3)).collect();
        assert_eq!(out.as_integer(), Some(&expected[..]), "seed {seed}");
    }
}

#[test]
fn compatible_and_can_promote_are_exclusive() {
    for kind in ALL_KINDS {
        let c = collecter_for_kind(kind, 1, CollectOptions::default());
        for probe in probes() {
            assert!(
                !(c.compatible(&probe) && c.can_promote(&probe)),
                "{kind} collecter vs {}",
                probe.describe()
            );
        }
    }
}

#[test]
fn factor_unification_across_chunks() {
    init_tracing_for_tests();
    let mut c = collecter(&factor_of(&["x"]), 4).unwrap();
    c.collect(&SlicingIndex::from(vec![3, 0]), &factor_of(&["x", "y"]))
        .unwrap();
    // Chunk B has its own codes: "y" is 1 and "z" is 2 there.
    c.collect(&SlicingIndex::from(vec![1, 2]), &factor_of(&["y", "z"]))
        .unwrap();
    let out = c.get();
    assert_eq!(
        out.levels(),
        Some(&["x".to_string(), "y".to_string(), "z".to_string()][..])
    );
    assert_eq!(
        out.as_integer(),
        Some(&[Some(2), Some(2), Some(3), Some(1)][..])
    );
    assert_eq!(
        out.factor_labels().unwrap(),
        vec![
            Some("y".to_string()),
            Some("y".to_string()),
            Some("z".to_string()),
            Some("x".to_string())
        ]
    );
}

#[test]
fn factor_coercion_guard() {
    let mut c = FactorCollecter::new(6);
    c.collect(&SlicingIndex::range(0, 2), &factor_of(&["p", "q"]))
        .unwrap();
    assert_eq!(c.current_level(), 3);

    let err = c
        .collect(&SlicingIndex::range(2, 2), &Vector::integer(vec![Some(1), Some(3)]))
        .unwrap_err();
    assert!(matches!(err, Error::FactorCoercion(_)));

    // The rejected chunk left nothing behind, not even its valid leading value.
    assert_eq!(
        c.get().as_integer(),
        Some(&[Some(1), Some(2), None, None, None, None][..])
    );
    assert_eq!(c.written_positions().to_positions(), vec![0, 1]);

    c.collect(
        &SlicingIndex::range(2, 3),
        &Vector::integer(vec![Some(1), Some(2), None]),
    )
    .unwrap();
    let out = c.get();
    assert_eq!(
        out.as_integer(),
        Some(&[Some(1), Some(2), Some(1), Some(2), None, None][..])
    );
    assert_eq!(out.levels().map(|l| l.len()), Some(2));
}

#[test]
fn factor_coercion_rejects_non_positive_codes() {
    let mut c = FactorCollecter::new(2);
    c.collect(&SlicingIndex::range(0, 1), &factor_of(&["p"])).unwrap();
    let err = c
        .collect(&SlicingIndex::range(1, 1), &Vector::integer(vec![Some(0)]))
        .unwrap_err();
    assert!(matches!(err, Error::FactorCoercion(_)));
}

#[test]
fn date_and_posixct_isolation() {
    let date = collecter(&Vector::date(vec![]), 2).unwrap();
    let plain = Vector::double(vec![Some(19000.0)]);
    assert!(!date.compatible(&plain));
    for probe in probes() {
        assert!(!date.can_promote(&probe));
    }
    let time = collecter(&Vector::posixct(vec![]), 2).unwrap();
    assert!(!time.compatible(&plain));
    for probe in probes() {
        assert!(!time.can_promote(&probe));
    }
}

#[test]
fn promotion_ladder_logical_to_integer() {
    init_tracing_for_tests();
    let logical = Vector::logical(vec![Some(true), None, Some(false)]);
    let mut c = collecter(&logical, 5).unwrap();
    c.collect(&SlicingIndex::from(vec![4, 2, 0]), &logical).unwrap();

    let ints = Vector::integer(vec![Some(10), Some(-4)]);
    assert!(!c.compatible(&ints));
    assert!(c.can_promote(&ints));

    let c = promote(c.as_ref(), &SlicingIndex::from(vec![1, 3]), &ints).unwrap();
    assert_eq!(c.kind(), CollecterKind::Integer);
    assert_eq!(
        c.get().as_integer(),
        Some(&[Some(0), Some(10), None, Some(-4), Some(1)][..])
    );
}

#[test]
fn logical_never_enters_the_factor_track() {
    let c = collecter(&Vector::logical(vec![]), 1).unwrap();
    assert!(!c.can_promote(&factor_of(&["a"])));
    let err = gather(
        2,
        vec![
            (SlicingIndex::range(0, 1), Vector::logical(vec![Some(true)])),
            (SlicingIndex::range(1, 1), factor_of(&["a"])),
        ],
    )
    .unwrap_err();
    assert!(matches!(err, Error::IncompatibleType { .. }));
}

#[test]
fn gather_integer_then_factor_then_strings() {
    init_tracing_for_tests();
    let out = gather(
        5,
        vec![
            (SlicingIndex::range(0, 1), Vector::integer(vec![Some(1)])),
            (SlicingIndex::range(1, 2), factor_of(&["lo", "hi"])),
            (SlicingIndex::range(3, 2), strings(&[Some("free"), None])),
        ],
    )
    .unwrap();
    assert!(out.class().is_empty());
    assert_eq!(
        out.as_string(),
        Some(
            &[
                Some("lo".to_string()),
                Some("lo".to_string()),
                Some("hi".to_string()),
                Some("free".to_string()),
                None
            ][..]
        )
    );
}

#[test]
fn gather_rejects_double_writes() {
    let err = gather(
        3,
        vec![
            (SlicingIndex::range(0, 2), Vector::integer(vec![Some(1), Some(2)])),
            (SlicingIndex::range(1, 2), Vector::integer(vec![Some(3), Some(4)])),
        ],
    )
    .unwrap_err();
    assert!(matches!(err, Error::InvalidArgumentError(_)));
}

#[test]
fn date_columns_keep_their_class() {
    let out = gather(
        3,
        vec![
            (SlicingIndex::from(vec![2]), Vector::date(vec![Some(3.0)])),
            (SlicingIndex::from(vec![0]), Vector::date(vec![Some(1.0)])),
        ],
    )
    .unwrap();
    assert_eq!(out.class(), &["Date".to_string()]);
    assert_eq!(out.as_double(), Some(&[Some(1.0), None, Some(3.0)][..]));

    let err = gather(
        2,
        vec![
            (SlicingIndex::from(vec![0]), Vector::date(vec![Some(1.0)])),
            (SlicingIndex::from(vec![1]), Vector::double(vec![Some(2.0)])),
        ],
    )
    .unwrap_err();
    assert!(matches!(err, Error::IncompatibleType { .. }));
}
