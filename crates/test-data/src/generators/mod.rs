//! Entity generators for fixture data.
//!
//! This module provides generators for creating marketplace rows:
//! - [`UserGenerator`]: Generate shoppers and store owners
//! - [`StoreGenerator`]: Create stores with placeholder logos
//! - [`ItemGenerator`]: Create catalog items with cover and gallery images
//! - [`OrderGenerator`]: Generate orders with date-consistent statuses
//! - [`ClickGenerator`]: Generate item click events
//! - [`SearchGenerator`]: Generate store and in-store item searches
//!
//! Every generated row carries an explicit id so that foreign keys are known
//! before anything is written to the database.

pub mod click;
pub mod item;
pub mod order;
pub mod search;
pub mod store;
pub mod user;

use std::ops::RangeInclusive;

use rand::Rng;
use rand::distributions::uniform::SampleUniform;
use rand_distr::{Distribution, Poisson};

pub use click::{ClickGenConfig, ClickGenerator, GeneratedClick};
pub use item::{GeneratedImage, GeneratedItem, ItemGenConfig, ItemGenerator};
pub use order::{GeneratedOrder, OrderGenConfig, OrderGenerator, status_for};
pub use search::{GeneratedSearch, GeneratedSearchItem, SearchGenConfig, SearchGenerator};
pub use store::{GeneratedStore, StoreGenConfig, StoreGenerator};
pub use user::{GeneratedUser, UserGenConfig, UserGenerator};

/// Hands out sequential row ids starting at 1, matching SQLite AUTOINCREMENT.
#[derive(Debug, Clone)]
pub struct IdSequence {
    next: i64,
}

impl IdSequence {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> i64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}

/// Draws a Poisson-distributed count; a non-positive mean yields zero.
pub(crate) fn sample_count(mean: f64, rng: &mut impl Rng) -> usize {
    Poisson::new(mean)
        .map(|poisson| poisson.sample(rng) as usize)
        .unwrap_or(0)
}

/// Draws uniformly from `range`, or `None` when the range is empty (`start > end`).
pub(crate) fn sample_range<T>(range: &RangeInclusive<T>, rng: &mut impl Rng) -> Option<T>
where
    T: SampleUniform + PartialOrd + Clone,
{
    if range.is_empty() {
        None
    } else {
        Some(rng.gen_range(range.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_sequence_starts_at_one() {
        let mut ids = IdSequence::new();
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.next_id(), 2);
        assert_eq!(ids.next_id(), 3);
    }

    #[test]
    fn test_sample_count_zero_mean() {
        let mut rng = rand::thread_rng();
        assert_eq!(sample_count(0.0, &mut rng), 0);
        assert_eq!(sample_count(-1.0, &mut rng), 0);
    }

    #[test]
    fn test_sample_range_inverted() {
        let mut rng = rand::thread_rng();
        #[allow(clippy::reversed_empty_ranges)]
        let inverted = 5..=2;
        assert_eq!(sample_range(&inverted, &mut rng), None);
        assert_eq!(sample_range(&(3..=3), &mut rng), Some(3));
    }
}
