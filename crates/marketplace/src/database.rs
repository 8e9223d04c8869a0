use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::models::Table;

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the database at `url`, creating the file if it does not exist.
    pub async fn connect(url: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        info!("Connected to database at {url}");
        Ok(Self { pool })
    }

    /// Opens a private in-memory database.
    ///
    /// Every SQLite in-memory connection is its own database, so the pool is
    /// pinned to a single connection that is never recycled.
    pub async fn connect_in_memory() -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        debug!("Migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn count_rows(&self, table: Table) -> Result<i64, AppError> {
        // Table names come from a closed enum, never from user input.
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table.as_str()))
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Row counts for every table, in dependency order.
    pub async fn table_counts(&self) -> Result<Vec<(Table, i64)>, AppError> {
        let mut counts = Vec::with_capacity(Table::ALL.len());
        for table in Table::ALL {
            counts.push((table, self.count_rows(table).await?));
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrations_create_all_tables() {
        let db = Database::connect_in_memory().await.unwrap();
        db.migrate().await.unwrap();

        for (table, count) in db.table_counts().await.unwrap() {
            assert_eq!(count, 0, "{} should start empty", table.as_str());
        }
    }

    #[tokio::test]
    async fn test_storefront_columns_present() {
        let db = Database::connect_in_memory().await.unwrap();
        db.migrate().await.unwrap();

        let columns: Vec<String> =
            sqlx::query_scalar("SELECT name FROM pragma_table_info('stores')")
                .fetch_all(db.pool())
                .await
                .unwrap();

        for expected in ["id", "name", "address", "category", "image", "owner_id"] {
            assert!(
                columns.iter().any(|c| c == expected),
                "stores is missing column {expected}"
            );
        }
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let db = Database::connect_in_memory().await.unwrap();
        db.migrate().await.unwrap();
        db.migrate().await.unwrap();
    }

    #[tokio::test]
    async fn test_foreign_keys_enforced() {
        let db = Database::connect_in_memory().await.unwrap();
        db.migrate().await.unwrap();

        let result = sqlx::query(
            "INSERT INTO items (name, price, description, store_id) VALUES ('x', 1, 'x', 99)",
        )
        .execute(db.pool())
        .await;

        assert!(result.is_err(), "dangling store_id should be rejected");
    }
}
