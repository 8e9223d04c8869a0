//! Click event generation.

use rand::Rng;
use time::{Duration, PrimitiveDateTime};

use super::{GeneratedItem, IdSequence, sample_count};

/// Generated click on an item.
#[derive(Debug, Clone)]
pub struct GeneratedClick {
    pub id: i64,
    pub user_id: i64,
    pub item_id: i64,
    pub store_id: Option<i64>,
    pub time_of_click: PrimitiveDateTime,
}

/// Configuration for click generation.
#[derive(Debug, Clone)]
pub struct ClickGenConfig {
    /// Average number of clicks per user.
    pub avg_clicks_per_user: f64,
    /// Clicks happen within this many hours before the reference time.
    pub lookback_hours: i64,
}

impl Default for ClickGenConfig {
    fn default() -> Self {
        Self {
            avg_clicks_per_user: 12.0,
            lookback_hours: 24 * 30,
        }
    }
}

/// Generates click analytics events.
pub struct ClickGenerator {
    config: ClickGenConfig,
}

impl ClickGenerator {
    pub fn new() -> Self {
        Self {
            config: ClickGenConfig::default(),
        }
    }

    pub fn with_config(config: ClickGenConfig) -> Self {
        Self { config }
    }

    /// Generates clicks by one user on random items, all at or before `now`.
    pub fn generate_for_user(
        &self,
        user_id: i64,
        items: &[GeneratedItem],
        now: PrimitiveDateTime,
        ids: &mut IdSequence,
        rng: &mut impl Rng,
    ) -> Vec<GeneratedClick> {
        if items.is_empty() {
            return Vec::new();
        }

        let lookback_secs = self.config.lookback_hours.max(0).saturating_mul(3600);
        let count = sample_count(self.config.avg_clicks_per_user, rng);

        let mut clicks: Vec<GeneratedClick> = (0..count)
            .map(|_| {
                let item = &items[rng.gen_range(0..items.len())];
                let offset = Duration::seconds(rng.gen_range(0..=lookback_secs));
                GeneratedClick {
                    id: 0,
                    user_id,
                    item_id: item.id,
                    store_id: Some(item.store_id),
                    time_of_click: now.checked_sub(offset).unwrap_or(now),
                }
            })
            .collect();

        // Ids follow time order so the table reads like an event log.
        clicks.sort_by_key(|c| c.time_of_click);
        for click in &mut clicks {
            click.id = ids.next_id();
        }

        clicks
    }
}

impl Default for ClickGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn items() -> Vec<GeneratedItem> {
        (1..=3)
            .map(|id| GeneratedItem {
                id,
                name: format!("Item {id}"),
                price: 10,
                description: String::new(),
                discount: None,
                category: None,
                image: None,
                store_id: 100 + id,
            })
            .collect()
    }

    #[test]
    fn test_clicks_reference_items() {
        let click_gen = ClickGenerator::with_config(ClickGenConfig {
            avg_clicks_per_user: 30.0,
            lookback_hours: 48,
        });
        let mut rng = rand::thread_rng();
        let mut ids = IdSequence::new();
        let now = datetime!(2024-06-15 12:00:00);

        let clicks = click_gen.generate_for_user(5, &items(), now, &mut ids, &mut rng);

        assert!(!clicks.is_empty());
        for click in &clicks {
            assert_eq!(click.user_id, 5);
            assert_eq!(click.store_id, Some(100 + click.item_id));
            assert!(click.time_of_click <= now);
            assert!(click.time_of_click >= now - Duration::hours(48));
        }
    }

    #[test]
    fn test_click_ids_follow_time() {
        let click_gen = ClickGenerator::with_config(ClickGenConfig {
            avg_clicks_per_user: 30.0,
            ..Default::default()
        });
        let mut rng = rand::thread_rng();
        let mut ids = IdSequence::new();
        let now = datetime!(2024-06-15 12:00:00);

        let clicks = click_gen.generate_for_user(1, &items(), now, &mut ids, &mut rng);

        for pair in clicks.windows(2) {
            assert!(pair[0].id < pair[1].id);
            assert!(pair[0].time_of_click <= pair[1].time_of_click);
        }
    }

    #[test]
    fn test_huge_lookback_saturates() {
        let click_gen = ClickGenerator::with_config(ClickGenConfig {
            avg_clicks_per_user: 10.0,
            lookback_hours: i64::MAX,
        });
        let mut rng = rand::thread_rng();
        let mut ids = IdSequence::new();
        let now = datetime!(2024-06-15 12:00:00);

        let clicks = click_gen.generate_for_user(1, &items(), now, &mut ids, &mut rng);

        for click in &clicks {
            assert!(click.time_of_click <= now);
        }
    }
}
