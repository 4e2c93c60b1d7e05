//! Measures how tall each tree grows as more keys go in.
//!
//! The plain BST is fed distinct keys in random order (its average case) while the balanced
//! trees are fed ascending keys, which would be the worst case for the plain BST. Each series is
//! a list of `(number of keys, height)` pairs.
//!
//! # Examples
//!
//! ```
//! use search_trees::experiment::{self, ExperimentConfig};
//!
//! let config = ExperimentConfig {
//!     sizes: vec![1, 10, 100],
//!     seed: 7,
//! };
//! let report = experiment::run(&config);
//!
//! assert_eq!(report.series.len(), 3);
//! assert_eq!(report.series[1].name, "AVL_Ordered");
//! assert_eq!(report.series[1].points, [(1, 1), (10, 4), (100, 7)]);
//! ```

use std::fmt;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{avl, bst, rbtree, OrderedStore};

/// The collection sizes measured when nothing else is asked for.
pub const DEFAULT_SIZES: [usize; 27] = [
    1, 10, 20, 30, 40, 50, 90, 100, 150, 200, 250, 300, 350, 400, 450, 500, 550, 600, 650, 700,
    750, 800, 850, 900, 950, 1000, 1024,
];

/// What to measure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExperimentConfig {
    /// Every collection size to build a tree of, in the order they are reported.
    pub sizes: Vec<usize>,
    /// Seeds the random keys fed to the plain BST so runs are repeatable.
    pub seed: u64,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            sizes: DEFAULT_SIZES.to_vec(),
            seed: 0x5EED,
        }
    }
}

/// One line of the chart: a tree flavour and the heights measured for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Series {
    /// Which tree and which key order, e.g. `BST_Random`.
    pub name: &'static str,
    /// `(number of keys, height)` for every configured size.
    pub points: Vec<(usize, usize)>,
}

/// Everything [`run`] measured.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    /// One series per tree flavour: `BST_Random`, `AVL_Ordered` and `RB_Ordered`.
    pub series: Vec<Series>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, series) in self.series.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{} tree:", series.name.replace('_', " "))?;
            for (n, height) in &series.points {
                writeln!(f, "n = {n}, height = {height}")?;
            }
        }
        Ok(())
    }
}

/// `1..=n`.
pub fn sequential_keys(n: usize) -> Vec<u64> {
    (1..=n as u64).collect()
}

/// `n` distinct keys drawn uniformly from `1..n * 10` (`1..10` when `n` is tiny), in random
/// order.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use search_trees::experiment::random_distinct_keys;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(1);
/// let mut keys = random_distinct_keys(50, &mut rng);
///
/// assert_eq!(keys.len(), 50);
/// assert!(keys.iter().all(|key| (1..500).contains(key)));
/// keys.sort();
/// keys.dedup();
/// assert_eq!(keys.len(), 50);
/// ```
pub fn random_distinct_keys<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<u64> {
    let upper = (n * 10).max(10);
    rand::seq::index::sample(rng, upper - 1, n)
        .into_iter()
        .map(|i| i as u64 + 1)
        .collect()
}

/// Builds a fresh `T` out of `keys`, inserted in order, and returns its height.
pub fn measure<T>(keys: &[u64]) -> usize
where
    T: OrderedStore<u64> + Default,
{
    let mut tree = T::default();
    for key in keys {
        tree.insert(*key);
    }
    tree.height()
}

/// Runs every configured size against all three trees.
pub fn run(config: &ExperimentConfig) -> Report {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut bst_random = Vec::with_capacity(config.sizes.len());
    let mut avl_ordered = Vec::with_capacity(config.sizes.len());
    let mut rb_ordered = Vec::with_capacity(config.sizes.len());

    for &n in &config.sizes {
        let random = random_distinct_keys(n, &mut rng);
        let ordered = sequential_keys(n);

        let heights = (
            measure::<bst::Tree<u64>>(&random),
            measure::<avl::Tree<u64>>(&ordered),
            measure::<rbtree::RbTree<u64>>(&ordered),
        );
        debug!(
            "n = {n}: bst {}, avl {}, red-black {}",
            heights.0, heights.1, heights.2
        );

        bst_random.push((n, heights.0));
        avl_ordered.push((n, heights.1));
        rb_ordered.push((n, heights.2));
    }

    Report {
        series: vec![
            Series {
                name: "BST_Random",
                points: bst_random,
            },
            Series {
                name: "AVL_Ordered",
                points: avl_ordered,
            },
            Series {
                name: "RB_Ordered",
                points: rb_ordered,
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_keys_are_one_based() {
        assert_eq!(sequential_keys(0), Vec::<u64>::new());
        assert_eq!(sequential_keys(4), [1, 2, 3, 4]);
    }

    #[test]
    fn random_keys_for_one_come_from_one_to_nine() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let keys = random_distinct_keys(1, &mut rng);
            assert_eq!(keys.len(), 1);
            assert!((1..10).contains(&keys[0]));
        }
    }

    #[test]
    fn plain_bst_degenerates_on_sorted_keys() {
        for n in [0, 1, 10, 500] {
            assert_eq!(measure::<bst::Tree<u64>>(&sequential_keys(n)), n);
        }
    }

    #[test]
    fn default_run_is_bounded() {
        let config = ExperimentConfig::default();
        let report = run(&config);

        assert_eq!(report.series.len(), 3);
        for series in &report.series {
            assert_eq!(series.points.len(), DEFAULT_SIZES.len());
            for ((n, height), size) in series.points.iter().zip(DEFAULT_SIZES) {
                assert_eq!(*n, size);
                assert!(*height >= 1 && *height <= *n);
            }
        }

        let log2 = |n: usize| ((n + 1) as f64).log2();
        for (n, height) in &report.series[1].points {
            assert!(*height as f64 <= 1.5 * log2(*n));
        }
        for (n, height) in &report.series[2].points {
            assert!(*height as f64 <= 2.0 * log2(*n));
        }
    }

    #[test]
    fn runs_are_repeatable() {
        let config = ExperimentConfig {
            sizes: vec![10, 100],
            seed: 99,
        };

        assert_eq!(run(&config), run(&config));
    }

    #[test]
    fn report_display() {
        let report = Report {
            series: vec![
                Series {
                    name: "BST_Random",
                    points: vec![(1, 1), (10, 5)],
                },
                Series {
                    name: "AVL_Ordered",
                    points: vec![(1, 1)],
                },
            ],
        };

        assert_eq!(
            report.to_string(),
            "BST Random tree:\nn = 1, height = 1\nn = 10, height = 5\n\n\
             AVL Ordered tree:\nn = 1, height = 1\n"
        );
    }
}
