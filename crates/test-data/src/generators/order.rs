//! Order generation with statuses consistent with purchase and delivery dates.

use rand::Rng;
use time::{Date, Duration};

use marketplace::models::OrderStatus;

use super::{GeneratedItem, IdSequence, sample_count};

/// Generated order ready for database insertion.
#[derive(Debug, Clone)]
pub struct GeneratedOrder {
    pub id: i64,
    pub user_id: i64,
    pub store_id: Option<i64>,
    pub item_id: i64,
    pub quantity: i64,
    pub time_of_purchase: Date,
    pub estimated_delivery: Option<Date>,
    pub status: OrderStatus,
}

/// Configuration for order generation.
#[derive(Debug, Clone)]
pub struct OrderGenConfig {
    /// Average number of orders per user.
    pub avg_orders_per_user: f64,
    /// Maximum quantity per order line.
    pub max_quantity: i64,
    /// Orders are placed within this many days before the reference date.
    pub lookback_days: i64,
    /// Days between purchase and estimated delivery.
    pub delivery_days: i64,
    /// Probability that an order was cancelled.
    pub cancel_probability: f64,
}

impl Default for OrderGenConfig {
    fn default() -> Self {
        Self {
            avg_orders_per_user: 2.0,
            max_quantity: 5,
            lookback_days: 60,
            delivery_days: 7,
            cancel_probability: 0.05,
        }
    }
}

/// Derives the status an order has on `today`.
pub fn status_for(purchased: Date, delivery: Option<Date>, today: Date, cancelled: bool) -> OrderStatus {
    if cancelled {
        OrderStatus::Cancelled
    } else if delivery.is_some_and(|d| d <= today) {
        OrderStatus::Delivered
    } else if purchased < today {
        OrderStatus::Shipped
    } else {
        OrderStatus::Processing
    }
}

/// Generates orders placed by users.
pub struct OrderGenerator {
    config: OrderGenConfig,
}

impl OrderGenerator {
    pub fn new() -> Self {
        Self {
            config: OrderGenConfig::default(),
        }
    }

    pub fn with_config(config: OrderGenConfig) -> Self {
        Self { config }
    }

    /// Generates a single order for `item` purchased on `purchased`.
    pub fn generate(
        &self,
        id: i64,
        user_id: i64,
        item: &GeneratedItem,
        purchased: Date,
        today: Date,
        rng: &mut impl Rng,
    ) -> GeneratedOrder {
        let estimated_delivery = purchased.checked_add(Duration::days(self.config.delivery_days));
        let cancelled = rng.r#gen::<f64>() < self.config.cancel_probability;

        GeneratedOrder {
            id,
            user_id,
            store_id: Some(item.store_id),
            item_id: item.id,
            quantity: rng.gen_range(1..=self.config.max_quantity.max(1)),
            time_of_purchase: purchased,
            estimated_delivery,
            status: status_for(purchased, estimated_delivery, today, cancelled),
        }
    }

    /// Generates a Poisson-distributed number of orders for one user.
    pub fn generate_for_user(
        &self,
        user_id: i64,
        items: &[GeneratedItem],
        today: Date,
        ids: &mut IdSequence,
        rng: &mut impl Rng,
    ) -> Vec<GeneratedOrder> {
        if items.is_empty() {
            return Vec::new();
        }

        let count = sample_count(self.config.avg_orders_per_user, rng);
        (0..count)
            .map(|_| {
                let item = &items[rng.gen_range(0..items.len())];
                let days_ago = rng.gen_range(0..=self.config.lookback_days.max(0));
                let purchased = today.checked_sub(Duration::days(days_ago)).unwrap_or(today);
                self.generate(ids.next_id(), user_id, item, purchased, today, rng)
            })
            .collect()
    }
}

impl Default for OrderGenerator {
    fn default() -> Self {
        Self::new()
    }
}
