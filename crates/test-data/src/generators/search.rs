//! Search history generation.

use rand::Rng;
use time::{Duration, PrimitiveDateTime};

use super::{GeneratedItem, GeneratedStore, IdSequence, sample_count};

/// Generated store search (the storefront search box looks stores up by name).
#[derive(Debug, Clone)]
pub struct GeneratedSearch {
    pub id: i64,
    pub user_id: i64,
    pub search_query: String,
    pub time_of_search: PrimitiveDateTime,
}

/// Generated item search inside one store.
#[derive(Debug, Clone)]
pub struct GeneratedSearchItem {
    pub id: i64,
    pub user_id: i64,
    pub store_id: i64,
    pub query: String,
}

/// Configuration for search generation.
#[derive(Debug, Clone)]
pub struct SearchGenConfig {
    /// Average number of store searches per user.
    pub avg_store_searches_per_user: f64,
    /// Average number of in-store item searches per user.
    pub avg_item_searches_per_user: f64,
    /// Searches happen within this many hours before the reference time.
    pub lookback_hours: i64,
}

impl Default for SearchGenConfig {
    fn default() -> Self {
        Self {
            avg_store_searches_per_user: 3.0,
            avg_item_searches_per_user: 2.0,
            lookback_hours: 24 * 14,
        }
    }
}

/// Generates search history.
pub struct SearchGenerator {
    config: SearchGenConfig,
}

impl SearchGenerator {
    pub fn new() -> Self {
        Self {
            config: SearchGenConfig::default(),
        }
    }

    pub fn with_config(config: SearchGenConfig) -> Self {
        Self { config }
    }

    /// Generates store-name searches for one user.
    pub fn generate_store_searches(
        &self,
        user_id: i64,
        stores: &[GeneratedStore],
        now: PrimitiveDateTime,
        ids: &mut IdSequence,
        rng: &mut impl Rng,
    ) -> Vec<GeneratedSearch> {
        if stores.is_empty() {
            return Vec::new();
        }

        let lookback_secs = self.config.lookback_hours.max(0).saturating_mul(3600);
        let count = sample_count(self.config.avg_store_searches_per_user, rng);

        (0..count)
            .map(|_| {
                let store = &stores[rng.gen_range(0..stores.len())];
                let offset = Duration::seconds(rng.gen_range(0..=lookback_secs));
                GeneratedSearch {
                    id: ids.next_id(),
                    user_id,
                    search_query: store.name.clone(),
                    time_of_search: now.checked_sub(offset).unwrap_or(now),
                }
            })
            .collect()
    }

    /// Generates item searches for one user, each scoped to the store selling
    /// the item and using one word of the item name as the query.
    pub fn generate_item_searches(
        &self,
        user_id: i64,
        items: &[GeneratedItem],
        ids: &mut IdSequence,
        rng: &mut impl Rng,
    ) -> Vec<GeneratedSearchItem> {
        if items.is_empty() {
            return Vec::new();
        }

        let count = sample_count(self.config.avg_item_searches_per_user, rng);

        (0..count)
            .map(|_| {
                let item = &items[rng.gen_range(0..items.len())];
                let words: Vec<&str> = item.name.split_whitespace().collect();
                let query = if words.is_empty() {
                    item.name.clone()
                } else {
                    words[rng.gen_range(0..words.len())].to_lowercase()
                };

                GeneratedSearchItem {
                    id: ids.next_id(),
                    user_id,
                    store_id: item.store_id,
                    query,
                }
            })
            .collect()
    }
}

impl Default for SearchGenerator {
    fn default() -> Self {
        Self::new()
    }
}
