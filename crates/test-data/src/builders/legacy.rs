//! The hand-written fixture of the first seeding script.

use std::time::Instant;

use rand::Rng;
use sqlx::SqlitePool;
use time::{Duration, PrimitiveDateTime};

use marketplace::auth::hash_password;
use marketplace::models::OrderStatus;

use super::ScenarioResult;
use super::scenario::current_time;
use crate::db::SeedError;
use crate::generators::{
    GeneratedClick, GeneratedItem, GeneratedOrder, GeneratedStore, GeneratedUser,
};
use crate::placeholder::{ImageSize, generate_data_uri};

/// Item rows as (name, price, description, category, cover size).
const ITEMS: [(&str, i64, &str, &str, ImageSize); 4] = [
    ("Example Item 2", 200, "This is an example item 2.", "Pets", ImageSize::new(512, 480)),
    ("Example Item 3", 300, "This is an example item 3.", "Cars", ImageSize::new(1024, 480)),
    ("Example Item 4", 400, "This is an example item 4.", "Cars", ImageSize::new(512, 2048)),
    ("Example Item 5", 500, "This is an example item 5.", "Cars", ImageSize::new(1080, 480)),
];

/// Builds the fixed rows of the first seeding script: one user, one store,
/// four items, one order and one click.
///
/// Columns added by the storefront migration get fixed values: the store is
/// owned by the single user, has category `General` and a placeholder logo.
pub struct LegacyFixture {
    store_image_size: ImageSize,
    hash_passwords: bool,
    now: Option<PrimitiveDateTime>,
    reset: bool,
    track_metrics: bool,
}

impl Default for LegacyFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl LegacyFixture {
    pub fn new() -> Self {
        Self {
            store_image_size: ImageSize::default(),
            hash_passwords: false,
            now: None,
            reset: false,
            track_metrics: false,
        }
    }

    /// Sets the size of the store logo.
    pub fn with_image_size(mut self, size: ImageSize) -> Self {
        self.store_image_size = size;
        self
    }

    /// Stores an argon2 hash instead of the plain fixture password.
    pub fn with_hashed_passwords(mut self, enabled: bool) -> Self {
        self.hash_passwords = enabled;
        self
    }

    /// Pins the time used for the order and click. Defaults to now (UTC).
    pub fn with_now(mut self, now: PrimitiveDateTime) -> Self {
        self.now = Some(now);
        self
    }

    /// Deletes existing rows before seeding.
    pub fn with_reset(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }

    /// Enables metrics tracking.
    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.track_metrics = enabled;
        self
    }

    /// Builds the fixture rows without touching the database.
    pub fn build_data(&self, rng: &mut impl Rng) -> Result<ScenarioResult, SeedError> {
        let start_time = self.track_metrics.then(Instant::now);
        let now = self.now.unwrap_or_else(current_time);
        let today = now.date();

        let password = if self.hash_passwords {
            hash_password("password123")?
        } else {
            "password123".to_string()
        };

        let user = GeneratedUser {
            id: 1,
            username: "john".to_string(),
            password,
            mail: "johndoe@example.com".to_string(),
            address: Some("123 Main St".to_string()),
        };

        let store = GeneratedStore {
            id: 1,
            name: "Store1".to_string(),
            address: "456 Market St".to_string(),
            category: "General".to_string(),
            image: generate_data_uri(self.store_image_size, rng)?,
            owner_id: Some(user.id),
        };

        let items = ITEMS
            .iter()
            .zip(1..)
            .map(|(&(name, price, description, category, size), id)| -> Result<_, SeedError> {
                Ok(GeneratedItem {
                    id,
                    name: name.to_string(),
                    price,
                    description: description.to_string(),
                    discount: None,
                    category: Some(category.to_string()),
                    image: Some(generate_data_uri(size, rng)?),
                    store_id: store.id,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let order = GeneratedOrder {
            id: 1,
            user_id: user.id,
            store_id: Some(store.id),
            item_id: 1,
            quantity: 2,
            time_of_purchase: today,
            estimated_delivery: today.checked_add(Duration::days(7)),
            status: OrderStatus::Processing,
        };

        let click = GeneratedClick {
            id: 1,
            user_id: user.id,
            item_id: 1,
            store_id: Some(store.id),
            time_of_click: now,
        };

        let mut result = ScenarioResult {
            users: vec![user],
            stores: vec![store],
            items,
            orders: vec![order],
            clicks: vec![click],
            ..Default::default()
        };
        result.metrics = start_time.map(|start| result.collect_metrics(start));
        Ok(result)
    }

    /// Builds the fixture and seeds it into the database.
    pub async fn build(
        &self,
        pool: &SqlitePool,
        rng: &mut impl Rng,
    ) -> Result<ScenarioResult, SeedError> {
        let mut result = self.build_data(rng)?;
        result.seed_into(pool, self.reset).await?;
        Ok(result)
    }
}
