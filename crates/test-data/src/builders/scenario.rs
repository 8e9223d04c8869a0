//! Fluent builder for constructing marketplace scenarios.

use std::ops::RangeInclusive;
use std::time::Instant;

use rand::Rng;
use sqlx::SqlitePool;
use time::{OffsetDateTime, PrimitiveDateTime};

use crate::db::{SeedError, Seeder};
use crate::generators::{
    ClickGenConfig, ClickGenerator, GeneratedClick, GeneratedImage, GeneratedItem, GeneratedOrder,
    GeneratedSearch, GeneratedSearchItem, GeneratedStore, GeneratedUser, IdSequence, ItemGenConfig,
    ItemGenerator, OrderGenConfig, OrderGenerator, SearchGenConfig, SearchGenerator,
    StoreGenConfig, StoreGenerator, UserGenConfig, UserGenerator, sample_range,
};
use crate::placeholder::ImageSize;

/// Result of building (and optionally seeding) a scenario.
#[derive(Debug, Default)]
pub struct ScenarioResult {
    pub users: Vec<GeneratedUser>,
    pub stores: Vec<GeneratedStore>,
    pub items: Vec<GeneratedItem>,
    pub images: Vec<GeneratedImage>,
    pub orders: Vec<GeneratedOrder>,
    pub clicks: Vec<GeneratedClick>,
    pub searches: Vec<GeneratedSearch>,
    pub search_items: Vec<GeneratedSearchItem>,
    /// Metrics from scenario generation (populated if metrics tracking enabled).
    pub metrics: Option<ScenarioMetrics>,
}

impl ScenarioResult {
    /// Total number of rows across all tables.
    pub fn total_rows(&self) -> usize {
        self.users.len()
            + self.stores.len()
            + self.items.len()
            + self.images.len()
            + self.orders.len()
            + self.clicks.len()
            + self.searches.len()
            + self.search_items.len()
    }

    /// Total length of all placeholder data URIs, in bytes.
    pub fn placeholder_bytes(&self) -> usize {
        self.stores.iter().map(|s| s.image.len()).sum::<usize>()
            + self
                .items
                .iter()
                .filter_map(|i| i.image.as_ref())
                .map(String::len)
                .sum::<usize>()
            + self.images.iter().map(|i| i.image.len()).sum::<usize>()
    }

    pub(crate) fn collect_metrics(&self, start: Instant) -> ScenarioMetrics {
        ScenarioMetrics {
            generation_time_ms: start.elapsed().as_millis() as u64,
            seeding_time_ms: 0,
            user_count: self.users.len(),
            store_count: self.stores.len(),
            item_count: self.items.len(),
            image_count: self.images.len(),
            order_count: self.orders.len(),
            click_count: self.clicks.len(),
            search_count: self.searches.len() + self.search_items.len(),
            placeholder_bytes: self.placeholder_bytes(),
        }
    }

    /// Seeds the scenario and records the seeding time in the metrics.
    pub(crate) async fn seed_into(
        &mut self,
        pool: &SqlitePool,
        reset: bool,
    ) -> Result<(), SeedError> {
        let start = Instant::now();

        Seeder::new(pool.clone())
            .with_reset(reset)
            .seed(self)
            .await?;

        if let Some(metrics) = self.metrics.as_mut() {
            metrics.seeding_time_ms = start.elapsed().as_millis() as u64;
        }
        Ok(())
    }
}

/// Performance metrics from scenario generation.
#[derive(Debug, Clone)]
pub struct ScenarioMetrics {
    /// Time spent generating data (milliseconds).
    pub generation_time_ms: u64,
    /// Time spent seeding database (milliseconds, 0 if build_data used).
    pub seeding_time_ms: u64,
    pub user_count: usize,
    pub store_count: usize,
    pub item_count: usize,
    /// Number of gallery images.
    pub image_count: usize,
    pub order_count: usize,
    pub click_count: usize,
    /// Store and item searches combined.
    pub search_count: usize,
    /// Total size of all placeholder data URIs.
    pub placeholder_bytes: usize,
}

/// Builder for creating complete marketplace scenarios.
///
/// # Example
///
/// ```rust,ignore
/// let result = ScenarioBuilder::new()
///     .with_users(20)
///     .with_stores(4)
///     .with_items_per_store(3..=8)
///     .with_activity(true)
///     .build(&pool, &mut rng)
///     .await?;
/// ```
pub struct ScenarioBuilder {
    // Users
    user_count: usize,
    user_config: UserGenConfig,

    // Catalog
    store_count: usize,
    store_config: StoreGenConfig,
    items_per_store: RangeInclusive<usize>,
    item_config: ItemGenConfig,

    // Orders, clicks, searches
    generate_activity: bool,
    order_config: OrderGenConfig,
    click_config: ClickGenConfig,
    search_config: SearchGenConfig,

    // Misc
    now: Option<PrimitiveDateTime>,
    reset: bool,
    track_metrics: bool,
}

impl Default for ScenarioBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioBuilder {
    /// Creates a new scenario builder with default settings.
    pub fn new() -> Self {
        Self {
            user_count: 10,
            user_config: UserGenConfig::default(),
            store_count: 3,
            store_config: StoreGenConfig::default(),
            items_per_store: 2..=6,
            item_config: ItemGenConfig::default(),
            generate_activity: true,
            order_config: OrderGenConfig::default(),
            click_config: ClickGenConfig::default(),
            search_config: SearchGenConfig::default(),
            now: None,
            reset: false,
            track_metrics: false,
        }
    }

    /// Sets the number of users to generate.
    pub fn with_users(mut self, count: usize) -> Self {
        self.user_count = count;
        self
    }

    /// Sets the user generation configuration.
    pub fn with_user_config(mut self, config: UserGenConfig) -> Self {
        self.user_config = config;
        self
    }

    /// Sets the number of stores to generate.
    pub fn with_stores(mut self, count: usize) -> Self {
        self.store_count = count;
        self
    }

    /// Sets the store generation configuration.
    pub fn with_store_config(mut self, config: StoreGenConfig) -> Self {
        self.store_config = config;
        self
    }

    /// Sets the size of store logos and gallery images.
    pub fn with_image_size(mut self, size: ImageSize) -> Self {
        self.store_config.image_size = size;
        self.item_config.gallery_size = size;
        self
    }

    /// Sets the range of items per store. An empty range creates no items.
    pub fn with_items_per_store(mut self, range: RangeInclusive<usize>) -> Self {
        self.items_per_store = range;
        self
    }

    /// Sets the item generation configuration.
    pub fn with_item_config(mut self, config: ItemGenConfig) -> Self {
        self.item_config = config;
        self
    }

    /// Enables or disables orders, clicks and searches.
    pub fn with_activity(mut self, enabled: bool) -> Self {
        self.generate_activity = enabled;
        self
    }

    /// Sets the order generation configuration.
    pub fn with_order_config(mut self, config: OrderGenConfig) -> Self {
        self.order_config = config;
        self
    }

    /// Sets the click generation configuration.
    pub fn with_click_config(mut self, config: ClickGenConfig) -> Self {
        self.click_config = config;
        self
    }

    /// Sets the search generation configuration.
    pub fn with_search_config(mut self, config: SearchGenConfig) -> Self {
        self.search_config = config;
        self
    }

    /// Pins the reference time that orders, clicks and searches lead up to.
    /// Defaults to the current UTC time.
    pub fn with_now(mut self, now: PrimitiveDateTime) -> Self {
        self.now = Some(now);
        self
    }

    /// Deletes existing rows before seeding.
    pub fn with_reset(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }

    /// Enables metrics tracking for performance analysis.
    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.track_metrics = enabled;
        self
    }

    /// Builds the scenario (generates data but doesn't seed database).
    pub fn build_data(&self, rng: &mut impl Rng) -> Result<ScenarioResult, SeedError> {
        let start_time = self.track_metrics.then(Instant::now);
        let now = self.now.unwrap_or_else(current_time);

        // Users
        let user_gen = UserGenerator::with_config(self.user_config.clone());
        let users = user_gen.generate_batch(self.user_count, &mut IdSequence::new(), rng)?;
        let user_ids: Vec<i64> = users.iter().map(|u| u.id).collect();

        // Stores
        let store_gen = StoreGenerator::with_config(self.store_config.clone());
        let stores =
            store_gen.generate_batch(self.store_count, &user_ids, &mut IdSequence::new(), rng)?;

        // Items and gallery images
        let item_gen = ItemGenerator::with_config(self.item_config.clone());
        let mut item_ids = IdSequence::new();
        let mut image_ids = IdSequence::new();
        let mut items = Vec::new();
        let mut images = Vec::new();

        for store in &stores {
            let count = sample_range(&self.items_per_store, rng).unwrap_or(0);
            let (store_items, store_images) =
                item_gen.generate_for_store(store, count, &mut item_ids, &mut image_ids, rng)?;
            items.extend(store_items);
            images.extend(store_images);
        }

        // Activity
        let mut result = ScenarioResult {
            users,
            stores,
            items,
            images,
            ..Default::default()
        };

        if self.generate_activity {
            self.add_activity(&mut result, now, rng);
        }

        result.metrics = start_time.map(|start| result.collect_metrics(start));
        Ok(result)
    }

    /// Builds and seeds the scenario into the database.
    pub async fn build(
        self,
        pool: &SqlitePool,
        rng: &mut impl Rng,
    ) -> Result<ScenarioResult, SeedError> {
        let mut result = self.build_data(rng)?;
        result.seed_into(pool, self.reset).await?;
        Ok(result)
    }

    fn add_activity(
        &self,
        result: &mut ScenarioResult,
        now: PrimitiveDateTime,
        rng: &mut impl Rng,
    ) {
        let order_gen = OrderGenerator::with_config(self.order_config.clone());
        let click_gen = ClickGenerator::with_config(self.click_config.clone());
        let search_gen = SearchGenerator::with_config(self.search_config.clone());

        let mut order_ids = IdSequence::new();
        let mut click_ids = IdSequence::new();
        let mut search_ids = IdSequence::new();
        let mut search_item_ids = IdSequence::new();

        for user in &result.users {
            result.orders.extend(order_gen.generate_for_user(
                user.id,
                &result.items,
                now.date(),
                &mut order_ids,
                rng,
            ));
            result.clicks.extend(click_gen.generate_for_user(
                user.id,
                &result.items,
                now,
                &mut click_ids,
                rng,
            ));
            result.searches.extend(search_gen.generate_store_searches(
                user.id,
                &result.stores,
                now,
                &mut search_ids,
                rng,
            ));
            result.search_items.extend(search_gen.generate_item_searches(
                user.id,
                &result.items,
                &mut search_item_ids,
                rng,
            ));
        }
    }
}

/// Preset scenarios for common needs.
impl ScenarioBuilder {
    /// A storefront with enough variety to exercise listing pages and
    /// store statistics.
    ///
    /// - 25 users, 6 stores owned by random users
    /// - 4-10 items per store with wide, tall and square covers
    /// - Orders, clicks and searches for every user
    pub fn storefront_demo() -> Self {
        Self::new()
            .with_users(25)
            .with_stores(6)
            .with_items_per_store(4..=10)
            .with_activity(true)
            .with_metrics(true)
    }

    /// A catalog without any user activity.
    pub fn catalog_only() -> Self {
        Self::new()
            .with_users(3)
            .with_stores(2)
            .with_items_per_store(3..=5)
            .with_activity(false)
    }
}

/// Current UTC time as a naive timestamp.
pub(crate) fn current_time() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    PrimitiveDateTime::new(now.date(), now.time())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;
    use time::macros::datetime;

    /// Small images and plain passwords keep tests fast.
    fn fast_builder() -> ScenarioBuilder {
        ScenarioBuilder::new()
            .with_user_config(UserGenConfig {
                hash_passwords: false,
                ..Default::default()
            })
            .with_item_config(ItemGenConfig {
                cover_sizes: vec![ImageSize::new(4, 4)],
                ..Default::default()
            })
            .with_image_size(ImageSize::new(4, 4))
            .with_now(datetime!(2024-06-15 12:00:00))
    }

    #[test]
    fn test_build_data_counts() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = fast_builder()
            .with_users(8)
            .with_stores(3)
            .with_items_per_store(2..=2)
            .build_data(&mut rng)
            .unwrap();

        assert_eq!(result.users.len(), 8);
        assert_eq!(result.stores.len(), 3);
        assert_eq!(result.items.len(), 6);
        assert!(result.total_rows() >= 17);
    }

    #[test]
    fn test_references_resolve() {
        let mut rng = StdRng::seed_from_u64(2);
        let result = fast_builder()
            .with_users(10)
            .with_stores(4)
            .build_data(&mut rng)
            .unwrap();

        let user_ids: HashSet<i64> = result.users.iter().map(|u| u.id).collect();
        let store_ids: HashSet<i64> = result.stores.iter().map(|s| s.id).collect();
        let item_ids: HashSet<i64> = result.items.iter().map(|i| i.id).collect();

        for store in &result.stores {
            assert!(user_ids.contains(&store.owner_id.unwrap()));
        }
        for item in &result.items {
            assert!(store_ids.contains(&item.store_id));
        }
        for image in &result.images {
            assert!(item_ids.contains(&image.item_id));
            assert!(store_ids.contains(&image.store_id));
        }
        for order in &result.orders {
            assert!(user_ids.contains(&order.user_id));
            assert!(item_ids.contains(&order.item_id));
        }
        for click in &result.clicks {
            assert!(user_ids.contains(&click.user_id));
            assert!(item_ids.contains(&click.item_id));
        }
        for search in &result.search_items {
            assert!(store_ids.contains(&search.store_id));
        }
    }

    #[test]
    fn test_ids_are_unique_per_table() {
        let mut rng = StdRng::seed_from_u64(3);
        let result = fast_builder().with_users(12).build_data(&mut rng).unwrap();

        let order_ids: HashSet<i64> = result.orders.iter().map(|o| o.id).collect();
        assert_eq!(order_ids.len(), result.orders.len());

        let click_ids: HashSet<i64> = result.clicks.iter().map(|c| c.id).collect();
        assert_eq!(click_ids.len(), result.clicks.len());

        let image_ids: HashSet<i64> = result.images.iter().map(|i| i.id).collect();
        assert_eq!(image_ids.len(), result.images.len());
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let a = fast_builder()
            .build_data(&mut StdRng::seed_from_u64(77))
            .unwrap();
        let b = fast_builder()
            .build_data(&mut StdRng::seed_from_u64(77))
            .unwrap();

        let names = |r: &ScenarioResult| r.items.iter().map(|i| i.name.clone()).collect::<Vec<_>>();
        assert_eq!(names(&a), names(&b));
        assert_eq!(a.stores[0].image, b.stores[0].image);
        assert_eq!(a.clicks.len(), b.clicks.len());
    }

    #[test]
    fn test_activity_disabled() {
        let mut rng = StdRng::seed_from_u64(4);
        let result = fast_builder()
            .with_activity(false)
            .build_data(&mut rng)
            .unwrap();

        assert!(result.orders.is_empty());
        assert!(result.clicks.is_empty());
        assert!(result.searches.is_empty());
        assert!(result.search_items.is_empty());
    }

    #[test]
    fn test_metrics_tracking() {
        let mut rng = StdRng::seed_from_u64(5);

        let without = fast_builder().build_data(&mut rng).unwrap();
        assert!(without.metrics.is_none());

        let with = fast_builder().with_metrics(true).build_data(&mut rng).unwrap();
        let metrics = with.metrics.as_ref().unwrap();
        assert_eq!(metrics.user_count, with.users.len());
        assert_eq!(metrics.item_count, with.items.len());
        assert_eq!(metrics.placeholder_bytes, with.placeholder_bytes());
        assert!(metrics.placeholder_bytes > 0);
        assert_eq!(metrics.seeding_time_ms, 0);
    }

    #[test]
    fn test_invalid_image_size_fails() {
        let mut rng = StdRng::seed_from_u64(6);
        let result = fast_builder()
            .with_image_size(ImageSize::new(0, 0))
            .build_data(&mut rng);

        assert!(matches!(result, Err(SeedError::Placeholder(_))));
    }

    #[test]
    #[allow(clippy::reversed_empty_ranges)]
    fn test_inverted_items_per_store() {
        let mut rng = StdRng::seed_from_u64(11);
        let result = fast_builder()
            .with_items_per_store(6..=2)
            .build_data(&mut rng)
            .unwrap();

        assert_eq!(result.stores.len(), 3);
        assert!(result.items.is_empty());
        assert!(result.orders.is_empty());
        assert!(result.clicks.is_empty());
    }

    #[test]
    fn test_preset_storefront_demo() {
        let builder = ScenarioBuilder::storefront_demo();
        assert_eq!(builder.user_count, 25);
        assert_eq!(builder.store_count, 6);
        assert_eq!(builder.items_per_store, 4..=10);
        assert!(builder.generate_activity);
        assert!(builder.track_metrics);
    }

    #[test]
    fn test_preset_catalog_only() {
        let builder = ScenarioBuilder::catalog_only();
        assert!(!builder.generate_activity);
        assert_eq!(builder.store_count, 2);
    }
}
