//! Store generation.

use fake::{
    Fake,
    faker::address::en::{BuildingNumber, StreetName},
    faker::company::en::CompanyName,
};
use rand::Rng;

use super::IdSequence;
use crate::config::CATEGORIES;
use crate::placeholder::{ImageSize, PlaceholderError, generate_data_uri};

/// Generated store ready for database insertion.
#[derive(Debug, Clone)]
pub struct GeneratedStore {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub category: String,
    /// Store logo as a PNG data URI.
    pub image: String,
    pub owner_id: Option<i64>,
}

/// Configuration for store generation.
#[derive(Debug, Clone)]
pub struct StoreGenConfig {
    pub categories: Vec<String>,
    pub image_size: ImageSize,
}

impl Default for StoreGenConfig {
    fn default() -> Self {
        Self {
            categories: CATEGORIES.iter().map(|c| c.to_string()).collect(),
            image_size: ImageSize::default(),
        }
    }
}

/// Generates stores owned by existing users.
pub struct StoreGenerator {
    config: StoreGenConfig,
}

impl StoreGenerator {
    pub fn new() -> Self {
        Self {
            config: StoreGenConfig::default(),
        }
    }

    pub fn with_config(config: StoreGenConfig) -> Self {
        Self { config }
    }

    /// Generates a single store. Store names stay unique within a batch
    /// because the storefront addresses stores by name.
    pub fn generate(
        &self,
        id: i64,
        owner_id: Option<i64>,
        rng: &mut impl Rng,
    ) -> Result<GeneratedStore, PlaceholderError> {
        let company: String = CompanyName().fake_with_rng(rng);
        let number: String = BuildingNumber().fake_with_rng(rng);
        let street: String = StreetName().fake_with_rng(rng);

        let category = if self.config.categories.is_empty() {
            "General".to_string()
        } else {
            self.config.categories[rng.gen_range(0..self.config.categories.len())].clone()
        };

        Ok(GeneratedStore {
            id,
            name: format!("{company} #{id}"),
            address: format!("{number} {street}"),
            category,
            image: generate_data_uri(self.config.image_size, rng)?,
            owner_id,
        })
    }

    /// Generates `count` stores, each owned by a random user from `owner_ids`.
    pub fn generate_batch(
        &self,
        count: usize,
        owner_ids: &[i64],
        ids: &mut IdSequence,
        rng: &mut impl Rng,
    ) -> Result<Vec<GeneratedStore>, PlaceholderError> {
        (0..count)
            .map(|_| {
                let owner_id = if owner_ids.is_empty() {
                    None
                } else {
                    Some(owner_ids[rng.gen_range(0..owner_ids.len())])
                };
                self.generate(ids.next_id(), owner_id, rng)
            })
            .collect()
    }
}

impl Default for StoreGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholder::PNG_DATA_URI_PREFIX;
    use std::collections::HashSet;

    #[test]
    fn test_generate_store() {
        let store_gen = StoreGenerator::new();
        let mut rng = rand::thread_rng();
        let store = store_gen.generate(3, Some(1), &mut rng).unwrap();

        assert_eq!(store.id, 3);
        assert_eq!(store.owner_id, Some(1));
        assert!(store.image.starts_with(PNG_DATA_URI_PREFIX));
        assert!(CATEGORIES.contains(&store.category.as_str()));
    }

    #[test]
    fn test_batch_owners_and_names() {
        let store_gen = StoreGenerator::new();
        let mut rng = rand::thread_rng();
        let mut ids = IdSequence::new();
        let owners = [10, 11, 12];

        let stores = store_gen
            .generate_batch(20, &owners, &mut ids, &mut rng)
            .unwrap();

        assert_eq!(stores.len(), 20);
        for store in &stores {
            assert!(owners.contains(&store.owner_id.unwrap()));
        }

        let names: HashSet<_> = stores.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names.len(), 20);
    }

    #[test]
    fn test_batch_without_owners() {
        let store_gen = StoreGenerator::new();
        let mut rng = rand::thread_rng();
        let mut ids = IdSequence::new();

        let stores = store_gen.generate_batch(2, &[], &mut ids, &mut rng).unwrap();
        assert!(stores.iter().all(|s| s.owner_id.is_none()));
    }

    #[test]
    fn test_invalid_image_size_propagates() {
        let store_gen = StoreGenerator::with_config(StoreGenConfig {
            image_size: ImageSize::new(0, 10),
            ..Default::default()
        });
        let mut rng = rand::thread_rng();

        assert!(matches!(
            store_gen.generate(1, None, &mut rng),
            Err(PlaceholderError::InvalidDimensions { .. })
        ));
    }
}
