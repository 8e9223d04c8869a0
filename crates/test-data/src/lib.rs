//! Fixture data generation for the marketplace database.
//!
//! This crate generates users, stores, items, orders, clicks and searches,
//! renders solid-colour placeholder images as PNG data URIs, and seeds them
//! into a migrated SQLite database.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use marketplace::Database;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use test_data::prelude::*;
//!
//! let db = Database::connect("sqlite://marketplace.db").await?;
//! db.migrate().await?;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let scenario = ScenarioBuilder::new()
//!     .with_users(20)
//!     .with_stores(4)
//!     .with_items_per_store(3..=8)
//!     .with_image_size(ImageSize::new(64, 64))
//!     .build(db.pool(), &mut rng)
//!     .await?;
//! ```

pub mod builders;
pub mod config;
pub mod db;
pub mod generators;
pub mod placeholder;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::builders::{LegacyFixture, ScenarioBuilder, ScenarioMetrics, ScenarioResult};
    pub use crate::config::{ScenarioKind, SeedConfig};
    pub use crate::db::{SeedError, SeedReport, Seeder};
    pub use crate::generators::{
        ClickGenerator, IdSequence, ItemGenerator, OrderGenerator, SearchGenerator,
        StoreGenerator, UserGenerator,
    };
    pub use crate::placeholder::{
        ImageSize, PlaceholderError, PlaceholderImage, decode_data_uri, generate_data_uri,
    };
}
