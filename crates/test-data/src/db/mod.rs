//! Database integration for seeding fixture data.
//!
//! The [`Seeder`] writes a generated scenario into a migrated SQLite
//! database inside a single transaction, logging progress per table.

mod seeder;

pub use seeder::{SeedError, SeedReport, Seeder, TableReport};
