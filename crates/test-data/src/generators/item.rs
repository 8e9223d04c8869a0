//! Catalog item generation with cover and gallery placeholders.

use std::ops::RangeInclusive;

use fake::{Fake, faker::lorem::en::Sentence, faker::lorem::en::Word};
use rand::Rng;
use rand_distr::{Distribution, Normal};

use super::{GeneratedStore, IdSequence, sample_range};
use crate::config::COVER_SIZES;
use crate::placeholder::{ImageSize, PlaceholderError, generate_data_uri};

/// Generated item ready for database insertion.
#[derive(Debug, Clone)]
pub struct GeneratedItem {
    pub id: i64,
    pub name: String,
    /// Price in whole currency units.
    pub price: i64,
    pub description: String,
    /// Discount in percent.
    pub discount: Option<i64>,
    pub category: Option<String>,
    /// Cover image as a PNG data URI.
    pub image: Option<String>,
    pub store_id: i64,
}

/// Gallery image row for the `images` table.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub id: i64,
    pub image: String,
    pub store_id: i64,
    pub item_id: i64,
}

/// Configuration for item generation.
#[derive(Debug, Clone)]
pub struct ItemGenConfig {
    /// Mean price.
    pub price_mean: f64,
    /// Standard deviation of the price.
    pub price_std: f64,
    /// Prices are clamped into this range. An empty range yields its start.
    pub price_range: RangeInclusive<i64>,
    /// Probability that an item carries a discount.
    pub discount_probability: f64,
    /// Possible discount percentages. An empty range disables discounts.
    pub discount_range: RangeInclusive<i64>,
    /// Sizes to pick cover images from.
    pub cover_sizes: Vec<ImageSize>,
    /// Number of gallery images per item. An empty range means none.
    pub gallery_images: RangeInclusive<usize>,
    /// Size of gallery images.
    pub gallery_size: ImageSize,
}

impl Default for ItemGenConfig {
    fn default() -> Self {
        Self {
            price_mean: 250.0,
            price_std: 150.0,
            price_range: 5..=5000,
            discount_probability: 0.25,
            discount_range: 5..=50,
            cover_sizes: COVER_SIZES.to_vec(),
            gallery_images: 0..=3,
            gallery_size: ImageSize::default(),
        }
    }
}

/// Generates items belonging to stores.
pub struct ItemGenerator {
    config: ItemGenConfig,
}

impl ItemGenerator {
    pub fn new() -> Self {
        Self {
            config: ItemGenConfig::default(),
        }
    }

    pub fn with_config(config: ItemGenConfig) -> Self {
        Self { config }
    }

    /// Generates a single item for `store`; the item inherits the store category.
    pub fn generate(
        &self,
        id: i64,
        store: &GeneratedStore,
        rng: &mut impl Rng,
    ) -> Result<GeneratedItem, PlaceholderError> {
        let adjective: String = Word().fake_with_rng(rng);
        let noun: String = Word().fake_with_rng(rng);
        let description: String = Sentence(6..14).fake_with_rng(rng);

        let cover_size = if self.config.cover_sizes.is_empty() {
            ImageSize::default()
        } else {
            self.config.cover_sizes[rng.gen_range(0..self.config.cover_sizes.len())]
        };

        let discount = if rng.r#gen::<f64>() < self.config.discount_probability {
            sample_range(&self.config.discount_range, rng)
        } else {
            None
        };

        Ok(GeneratedItem {
            id,
            name: format!("{} {}", capitalize(&adjective), noun),
            price: self.generate_price(rng),
            description,
            discount,
            category: Some(store.category.clone()),
            image: Some(generate_data_uri(cover_size, rng)?),
            store_id: store.id,
        })
    }

    /// Generates `count` items for `store`, each with its gallery images.
    pub fn generate_for_store(
        &self,
        store: &GeneratedStore,
        count: usize,
        item_ids: &mut IdSequence,
        image_ids: &mut IdSequence,
        rng: &mut impl Rng,
    ) -> Result<(Vec<GeneratedItem>, Vec<GeneratedImage>), PlaceholderError> {
        let mut items = Vec::with_capacity(count);
        let mut images = Vec::new();

        for _ in 0..count {
            let item = self.generate(item_ids.next_id(), store, rng)?;
            images.extend(self.generate_gallery(&item, image_ids, rng)?);
            items.push(item);
        }

        Ok((items, images))
    }

    /// Generates gallery images for an item.
    pub fn generate_gallery(
        &self,
        item: &GeneratedItem,
        image_ids: &mut IdSequence,
        rng: &mut impl Rng,
    ) -> Result<Vec<GeneratedImage>, PlaceholderError> {
        let count = sample_range(&self.config.gallery_images, rng).unwrap_or(0);

        (0..count)
            .map(|_| -> Result<GeneratedImage, PlaceholderError> {
                Ok(GeneratedImage {
                    id: image_ids.next_id(),
                    image: generate_data_uri(self.config.gallery_size, rng)?,
                    store_id: item.store_id,
                    item_id: item.id,
                })
            })
            .collect()
    }

    fn generate_price(&self, rng: &mut impl Rng) -> i64 {
        let (min, max) = (
            *self.config.price_range.start(),
            *self.config.price_range.end(),
        );
        if min > max {
            return min;
        }
        match Normal::new(self.config.price_mean, self.config.price_std) {
            Ok(normal) => (normal.sample(rng).round() as i64).clamp(min, max),
            Err(_) => min,
        }
    }
}

impl Default for ItemGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholder::{PNG_DATA_URI_PREFIX, decode_data_uri};

    fn test_store() -> GeneratedStore {
        GeneratedStore {
            id: 7,
            name: "Store7".into(),
            address: "1 Test St".into(),
            category: "Pets".into(),
            image: String::new(),
            owner_id: Some(1),
        }
    }

    #[test]
    fn test_generate_item() {
        let item_gen = ItemGenerator::new();
        let mut rng = rand::thread_rng();
        let item = item_gen.generate(1, &test_store(), &mut rng).unwrap();

        assert_eq!(item.store_id, 7);
        assert_eq!(item.category.as_deref(), Some("Pets"));
        assert!((5..=5000).contains(&item.price));
        assert!(item.image.unwrap().starts_with(PNG_DATA_URI_PREFIX));
        if let Some(discount) = item.discount {
            assert!((5..=50).contains(&discount));
        }
    }

    #[test]
    fn test_cover_uses_configured_size() {
        let item_gen = ItemGenerator::with_config(ItemGenConfig {
            cover_sizes: vec![ImageSize::new(33, 21)],
            ..Default::default()
        });
        let mut rng = rand::thread_rng();
        let item = item_gen.generate(1, &test_store(), &mut rng).unwrap();

        let png = decode_data_uri(item.image.as_deref().unwrap()).unwrap();
        let reader = png::Decoder::new(png.as_slice()).read_info().unwrap();
        assert_eq!(reader.info().width, 33);
        assert_eq!(reader.info().height, 21);
    }

    #[test]
    fn test_gallery_references_item() {
        let item_gen = ItemGenerator::with_config(ItemGenConfig {
            cover_sizes: vec![ImageSize::new(8, 8)],
            gallery_images: 2..=2,
            gallery_size: ImageSize::new(8, 8),
            ..Default::default()
        });
        let mut rng = rand::thread_rng();
        let mut item_ids = IdSequence::new();
        let mut image_ids = IdSequence::new();

        let (items, images) = item_gen
            .generate_for_store(&test_store(), 3, &mut item_ids, &mut image_ids, &mut rng)
            .unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(images.len(), 6);
        for image in &images {
            assert_eq!(image.store_id, 7);
            assert!(items.iter().any(|i| i.id == image.item_id));
        }
    }

    #[test]
    fn test_always_discounted() {
        let item_gen = ItemGenerator::with_config(ItemGenConfig {
            discount_probability: 1.0,
            discount_range: 10..=10,
            cover_sizes: vec![ImageSize::new(4, 4)],
            ..Default::default()
        });
        let mut rng = rand::thread_rng();
        let item = item_gen.generate(1, &test_store(), &mut rng).unwrap();
        assert_eq!(item.discount, Some(10));
    }

    #[test]
    #[allow(clippy::reversed_empty_ranges)]
    fn test_inverted_ranges_do_not_panic() {
        let item_gen = ItemGenerator::with_config(ItemGenConfig {
            price_range: 100..=10,
            discount_probability: 1.0,
            discount_range: 50..=5,
            cover_sizes: vec![ImageSize::new(4, 4)],
            gallery_images: 3..=1,
            ..Default::default()
        });
        let mut rng = rand::thread_rng();
        let mut item_ids = IdSequence::new();
        let mut image_ids = IdSequence::new();

        let (items, images) = item_gen
            .generate_for_store(&test_store(), 2, &mut item_ids, &mut image_ids, &mut rng)
            .unwrap();

        assert!(images.is_empty());
        for item in &items {
            assert_eq!(item.price, 100);
            assert_eq!(item.discount, None);
        }
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("lorem"), "Lorem");
        assert_eq!(capitalize(""), "");
    }
}
