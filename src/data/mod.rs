//! Test-data pools shared by every simulated user.
//!
//! A [`DataPool`] is a cloneable handle over a shared cursor into a list of
//! rows. Pools are built from [`ScenarioSettings`], which decides whether the
//! rows are table sampled (random subset, random order) or replayed in source
//! order. [`Exhaustion`] decides what happens when the cursor reaches the end.

use std::sync::{Arc, Mutex, PoisonError};

use rand::{Rng, SeedableRng, seq::SliceRandom};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::settings::ScenarioSettings;

pub mod records;
pub mod source;

pub use records::{BeneId, ContractData, HashedMbi};

/// Percentage of source rows kept when table sampling is enabled.
pub const TABLE_SAMPLE_PERCENT: usize = 25;

/// Behaviour once every row of a pool has been handed out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exhaustion {
    /// Start again from the first row.
    Recycle,
    /// Report exhaustion by returning `None`.
    Stop,
}

impl Exhaustion {
    /// Policy matching a user's "end on no data" flag.
    ///
    /// Users that keep running when data runs out recycle their pools.
    #[must_use]
    pub const fn for_end_on_no_data(end_on_no_data: bool) -> Self {
        if end_on_no_data { Self::Stop } else { Self::Recycle }
    }
}

/// How rows are selected when a pool is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sampling {
    /// Keep every row in source order.
    Disabled,
    /// Keep a random [`TABLE_SAMPLE_PERCENT`] subset in random order.
    Table {
        /// Optional seed for reproducible subsets.
        seed: Option<u64>,
    },
}

impl Sampling {
    fn from_flag(enabled: bool, settings: &ScenarioSettings) -> Self {
        if enabled {
            Self::Table {
                seed: settings.sampling_seed(),
            }
        } else {
            Self::Disabled
        }
    }
}

struct PoolState<T> {
    rows: Vec<T>,
    cursor: usize,
}

/// Shared pool of test rows.
pub struct DataPool<T> {
    name: &'static str,
    exhaustion: Exhaustion,
    state: Arc<Mutex<PoolState<T>>>,
}

impl<T> Clone for DataPool<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            exhaustion: self.exhaustion,
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> std::fmt::Debug for DataPool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataPool")
            .field("name", &self.name)
            .field("exhaustion", &self.exhaustion)
            .field("len", &self.len())
            .finish()
    }
}

impl<T: Clone> DataPool<T> {
    /// Build a pool from `rows`.
    #[must_use]
    pub fn new(name: &'static str, mut rows: Vec<T>, sampling: Sampling, exhaustion: Exhaustion) -> Self {
        let total = rows.len();
        match sampling {
            Sampling::Disabled => {}
            Sampling::Table { seed: Some(seed) } => {
                table_sample(&mut rows, &mut ChaCha8Rng::seed_from_u64(seed));
            }
            Sampling::Table { seed: None } => table_sample(&mut rows, &mut rand::rng()),
        }
        debug!(pool = name, total, kept = rows.len(), ?sampling, "data pool built");
        Self {
            name,
            exhaustion,
            state: Arc::new(Mutex::new(PoolState { rows, cursor: 0 })),
        }
    }

    /// Hand out the next row.
    ///
    /// Returns `None` when the pool is empty, or when it is exhausted and the
    /// policy is [`Exhaustion::Stop`].
    pub fn next_row(&self) -> Option<T> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.cursor >= state.rows.len() {
            if self.exhaustion == Exhaustion::Stop || state.rows.is_empty() {
                return None;
            }
            debug!(pool = self.name, "data pool recycled");
            state.cursor = 0;
        }
        let row = state.rows[state.cursor].clone();
        state.cursor += 1;
        Some(row)
    }
}

impl<T> DataPool<T> {
    /// Name used in logs and [`crate::error::TaskError::NoData`].
    #[must_use]
    pub fn name(&self) -> &'static str { self.name }

    /// Exhaustion policy of the pool.
    #[must_use]
    pub fn exhaustion(&self) -> Exhaustion { self.exhaustion }

    /// Number of rows held by the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .rows
            .len()
    }

    /// Returns true if the pool holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

impl DataPool<BeneId> {
    /// Beneficiary id pool, sampled according to `settings`.
    #[must_use]
    pub fn bene_ids(settings: &ScenarioSettings, rows: Vec<BeneId>, exhaustion: Exhaustion) -> Self {
        let sampling = Sampling::from_flag(settings.sampling().bene_ids, settings);
        Self::new("bene_ids", rows, sampling, exhaustion)
    }
}

impl DataPool<HashedMbi> {
    /// Hashed MBI pool, sampled according to `settings`.
    #[must_use]
    pub fn hashed_mbis(settings: &ScenarioSettings, rows: Vec<HashedMbi>, exhaustion: Exhaustion) -> Self {
        let sampling = Sampling::from_flag(settings.sampling().hashed_mbis, settings);
        Self::new("hashed_mbis", rows, sampling, exhaustion)
    }
}

impl DataPool<ContractData> {
    /// Contract pool, sampled according to `settings`.
    #[must_use]
    pub fn contracts(settings: &ScenarioSettings, rows: Vec<ContractData>, exhaustion: Exhaustion) -> Self {
        let sampling = Sampling::from_flag(settings.sampling().contract_data, settings);
        Self::new("contract_data", rows, sampling, exhaustion)
    }
}

fn table_sample<T, R: Rng + ?Sized>(rows: &mut Vec<T>, rng: &mut R) {
    if rows.is_empty() {
        return;
    }
    let keep = (rows.len() * TABLE_SAMPLE_PERCENT).div_ceil(100).max(1);
    rows.shuffle(rng);
    rows.truncate(keep);
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::validation::ValidationGoal;

    fn numbers(n: u32) -> Vec<u32> { (0..n).collect() }

    #[test]
    fn disabled_sampling_replays_source_order() {
        let pool = DataPool::new("n", numbers(4), Sampling::Disabled, Exhaustion::Stop);
        let drawn: Vec<_> = std::iter::from_fn(|| pool.next_row()).collect();
        assert_eq!(drawn, numbers(4));
    }

    #[test]
    fn stop_policy_reports_exhaustion() {
        let pool = DataPool::new("n", numbers(1), Sampling::Disabled, Exhaustion::Stop);
        assert_eq!(pool.next_row(), Some(0));
        assert_eq!(pool.next_row(), None);
        assert_eq!(pool.next_row(), None);
    }

    #[test]
    fn recycle_policy_restarts_from_first_row() {
        let pool = DataPool::new("n", numbers(2), Sampling::Disabled, Exhaustion::Recycle);
        let drawn: Vec<_> = (0..5).filter_map(|_| pool.next_row()).collect();
        assert_eq!(drawn, vec![0, 1, 0, 1, 0]);
    }

    #[test]
    fn empty_pool_never_yields_even_when_recycling() {
        let pool: DataPool<u32> = DataPool::new("n", Vec::new(), Sampling::Disabled, Exhaustion::Recycle);
        assert!(pool.is_empty());
        assert_eq!(pool.next_row(), None);
    }

    #[test]
    fn clones_share_the_cursor() {
        let pool = DataPool::new("n", numbers(3), Sampling::Disabled, Exhaustion::Stop);
        let other = pool.clone();
        assert_eq!(pool.next_row(), Some(0));
        assert_eq!(other.next_row(), Some(1));
        assert_eq!(pool.next_row(), Some(2));
    }

    #[rstest]
    #[case(100, 25)]
    #[case(10, 3)]
    #[case(1, 1)]
    fn table_sampling_keeps_a_quarter(#[case] total: u32, #[case] expected: usize) {
        let pool = DataPool::new(
            "n",
            numbers(total),
            Sampling::Table { seed: Some(7) },
            Exhaustion::Stop,
        );
        assert_eq!(pool.len(), expected);
    }

    #[test]
    fn seeded_sampling_is_reproducible() {
        let build = || {
            let pool = DataPool::new("n", numbers(40), Sampling::Table { seed: Some(11) }, Exhaustion::Stop);
            std::iter::from_fn(move || pool.next_row()).collect::<Vec<_>>()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn settings_flag_selects_sampling() {
        let settings = ScenarioSettings::builder()
            .table_sample_bene_ids(false)
            .validation_goal(ValidationGoal::SlaV1Baseline)
            .build()
            .expect("goal is set");
        let rows: Vec<BeneId> = (0..8).map(|i| BeneId::new(format!("-{i}"))).collect();
        let pool = DataPool::bene_ids(&settings, rows.clone(), Exhaustion::Stop);
        assert_eq!(pool.len(), rows.len());
        assert_eq!(pool.next_row(), Some(rows[0].clone()));

        let mbis: Vec<HashedMbi> = (0..8).map(|i| HashedMbi::new(format!("h{i}"))).collect();
        let sampled = DataPool::hashed_mbis(&settings, mbis, Exhaustion::Stop);
        assert_eq!(sampled.len(), 2);
    }

    proptest! {
        #[test]
        fn recycled_pool_cycles_through_every_row(len in 1u32..50, draws in 1usize..200) {
            let pool = DataPool::new("n", numbers(len), Sampling::Disabled, Exhaustion::Recycle);
            for i in 0..draws {
                let expected = u32::try_from(i % len as usize).expect("fits in u32");
                prop_assert_eq!(pool.next_row(), Some(expected));
            }
        }

        #[test]
        fn sampled_rows_come_from_the_source(len in 1u32..200, seed in any::<u64>()) {
            let pool = DataPool::new("n", numbers(len), Sampling::Table { seed: Some(seed) }, Exhaustion::Stop);
            let mut seen = Vec::new();
            while let Some(row) = pool.next_row() {
                prop_assert!(row < len);
                prop_assert!(!seen.contains(&row));
                seen.push(row);
            }
        }
    }
}
