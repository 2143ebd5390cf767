//! Fixtures shared by the colgather test suites.

use std::sync::Once;

use colgather_types::Vector;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

static INIT: Once = Once::new();

/// Install a fmt subscriber for test binaries. Safe to call multiple times.
///
/// Honours `RUST_LOG`; defaults to `info`.
pub fn init_tracing_for_tests() {
    INIT.call_once(|| {
        use tracing_subscriber::filter::EnvFilter;
        use tracing_subscriber::fmt;
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        // Another harness may have installed a global subscriber already.
        let _ = fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_test_writer()
            .try_init();
    });
}

/// A factor whose levels are the labels in first-seen order.
pub fn factor_of(labels: &[&str]) -> Vector {
    Vector::factor_from_labels(labels.iter().map(|l| Some(l.to_string())).collect())
}

/// A character vector, `None` entries missing.
pub fn strings(values: &[Option<&str>]) -> Vector {
    Vector::string(values.iter().map(|v| v.map(str::to_string)).collect())
}

/// Split `0..n` into `parts` disjoint, shuffled position lists that together
/// cover every row. Some parts may be empty.
pub fn random_partition(n: usize, parts: usize, seed: u64) -> Vec<Vec<usize>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows: Vec<usize> = (0..n).collect();
    rows.shuffle(&mut rng);
    let mut out = vec![Vec::new(); parts.max(1)];
    let len = out.len();
    for row in rows {
        out[rng.random_range(0..len)].push(row);
    }
    out
}

#[cfg(feature = "auto-init")]
mod auto {
    // Runs at binary init time so individual tests need not call init.
    use ctor::ctor;

    #[ctor]
    fn init() {
        super::init_tracing_for_tests();
    }
}
