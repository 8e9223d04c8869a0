//! Database seeding utilities.

use marketplace::AppError;
use marketplace::models::{DATE_FORMAT, TIMESTAMP_FORMAT, Table};
use sqlx::{SqliteConnection, SqlitePool};
use thiserror::Error;
use time::{Date, PrimitiveDateTime};
use tracing::{debug, info};

use crate::builders::ScenarioResult;
use crate::generators::{
    GeneratedClick, GeneratedImage, GeneratedItem, GeneratedOrder, GeneratedSearch,
    GeneratedSearchItem, GeneratedStore, GeneratedUser,
};
use crate::placeholder::PlaceholderError;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Placeholder image error: {0}")]
    Placeholder(#[from] PlaceholderError),
    #[error(transparent)]
    App(#[from] AppError),
    #[error("Date formatting error: {0}")]
    Format(#[from] time::error::Format),
}

/// Rows written to one table during a seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableReport {
    pub table: Table,
    pub inserted: u64,
    /// Rows skipped because a row with the same id already existed.
    pub skipped: u64,
}

impl TableReport {
    fn new(table: Table) -> Self {
        Self {
            table,
            inserted: 0,
            skipped: 0,
        }
    }

    fn record(&mut self, id: i64, rows_affected: u64) {
        if rows_affected == 0 {
            self.skipped += 1;
            debug!("  Skipped {} row {}: id already present", self.table.as_str(), id);
        } else {
            self.inserted += rows_affected;
        }
    }
}

/// Outcome of [`Seeder::seed`], one entry per table in dependency order.
#[derive(Debug, Clone, Default)]
pub struct SeedReport {
    pub tables: Vec<TableReport>,
}

impl SeedReport {
    pub fn inserted(&self) -> u64 {
        self.tables.iter().map(|t| t.inserted).sum()
    }

    /// Rows left out because their id was taken. Without a reset, children of
    /// skipped parents then reference the rows already in the database.
    pub fn skipped(&self) -> u64 {
        self.tables.iter().map(|t| t.skipped).sum()
    }

    pub fn table(&self, table: Table) -> Option<&TableReport> {
        self.tables.iter().find(|t| t.table == table)
    }
}

/// Database seeder for inserting a generated scenario.
///
/// All rows of a scenario are written in one transaction that is committed
/// once at the end, so a failed seed leaves the database untouched.
pub struct Seeder {
    pool: SqlitePool,
    reset: bool,
}

impl Seeder {
    /// Creates a new seeder with the given database pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool, reset: false }
    }

    /// Deletes existing rows from every table before inserting.
    pub fn with_reset(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }

    /// Seeds every table of `scenario` in dependency order.
    pub async fn seed(&self, scenario: &ScenarioResult) -> Result<SeedReport, SeedError> {
        let mut tx = self.pool.begin().await?;

        if self.reset {
            clear_tables(&mut tx).await?;
        }

        let tables = vec![
            insert_users(&mut tx, &scenario.users).await?,
            insert_stores(&mut tx, &scenario.stores).await?,
            insert_items(&mut tx, &scenario.items).await?,
            insert_images(&mut tx, &scenario.images).await?,
            insert_orders(&mut tx, &scenario.orders).await?,
            insert_clicks(&mut tx, &scenario.clicks).await?,
            insert_searches(&mut tx, &scenario.searches).await?,
            insert_search_items(&mut tx, &scenario.search_items).await?,
        ];

        tx.commit().await?;
        info!("Scenario committed");

        for report in tables.iter().filter(|t| t.skipped > 0) {
            info!(
                "  {}: {} rows skipped on existing ids",
                report.table.as_str(),
                report.skipped
            );
        }

        Ok(SeedReport { tables })
    }
}

/// Deletes all rows, children first, and restarts the AUTOINCREMENT counters.
async fn clear_tables(conn: &mut SqliteConnection) -> Result<(), SeedError> {
    info!("Clearing existing rows...");

    for table in Table::ALL.iter().rev() {
        let result = sqlx::query(&format!("DELETE FROM {}", table.as_str()))
            .execute(&mut *conn)
            .await?;
        debug!("  Deleted {} rows from {}", result.rows_affected(), table.as_str());
    }

    sqlx::query("DELETE FROM sqlite_sequence")
        .execute(&mut *conn)
        .await?;

    Ok(())
}

async fn insert_users(
    conn: &mut SqliteConnection,
    users: &[GeneratedUser],
) -> Result<TableReport, SeedError> {
    info!("Seeding {} users...", users.len());
    let mut report = TableReport::new(Table::Users);

    for user in users {
        let result = sqlx::query(
            r#"
            INSERT INTO users (id, username, password, mail, address)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password)
        .bind(&user.mail)
        .bind(&user.address)
        .execute(&mut *conn)
        .await?;
        report.record(user.id, result.rows_affected());
    }

    Ok(report)
}

async fn insert_stores(
    conn: &mut SqliteConnection,
    stores: &[GeneratedStore],
) -> Result<TableReport, SeedError> {
    info!("Seeding {} stores...", stores.len());
    let mut report = TableReport::new(Table::Stores);

    for store in stores {
        let result = sqlx::query(
            r#"
            INSERT INTO stores (id, name, address, category, image, owner_id)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(store.id)
        .bind(&store.name)
        .bind(&store.address)
        .bind(&store.category)
        .bind(&store.image)
        .bind(store.owner_id)
        .execute(&mut *conn)
        .await?;
        report.record(store.id, result.rows_affected());
    }

    Ok(report)
}

async fn insert_items(conn: &mut SqliteConnection, items: &[GeneratedItem]) -> Result<TableReport, SeedError> {
    info!("Seeding {} items...", items.len());
    let mut report = TableReport::new(Table::Items);

    for item in items {
        let result = sqlx::query(
            r#"
            INSERT INTO items (id, name, price, description, discount, category, images, store_id)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(item.id)
        .bind(&item.name)
        .bind(item.price)
        .bind(&item.description)
        .bind(item.discount)
        .bind(&item.category)
        .bind(&item.image)
        .bind(item.store_id)
        .execute(&mut *conn)
        .await?;
        report.record(item.id, result.rows_affected());
    }

    Ok(report)
}

async fn insert_images(
    conn: &mut SqliteConnection,
    images: &[GeneratedImage],
) -> Result<TableReport, SeedError> {
    info!("Seeding {} gallery images...", images.len());
    let mut report = TableReport::new(Table::Images);

    for image in images {
        let result = sqlx::query(
            r#"
            INSERT INTO images (id, image, store_id, item_id)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(image.id)
        .bind(&image.image)
        .bind(image.store_id)
        .bind(image.item_id)
        .execute(&mut *conn)
        .await?;
        report.record(image.id, result.rows_affected());
    }

    Ok(report)
}

async fn insert_orders(
    conn: &mut SqliteConnection,
    orders: &[GeneratedOrder],
) -> Result<TableReport, SeedError> {
    info!("Seeding {} orders...", orders.len());
    let mut report = TableReport::new(Table::Orders);

    for order in orders {
        let estimated_delivery = order.estimated_delivery.map(format_date).transpose()?;

        let result = sqlx::query(
            r#"
            INSERT INTO orders (id, user_id, store_id, item_id, quantity,
                                time_of_purchase, estimated_delivery, status)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(order.id)
        .bind(order.user_id)
        .bind(order.store_id)
        .bind(order.item_id)
        .bind(order.quantity)
        .bind(format_date(order.time_of_purchase)?)
        .bind(estimated_delivery)
        .bind(order.status.as_str())
        .execute(&mut *conn)
        .await?;
        report.record(order.id, result.rows_affected());
    }

    Ok(report)
}

async fn insert_clicks(
    conn: &mut SqliteConnection,
    clicks: &[GeneratedClick],
) -> Result<TableReport, SeedError> {
    info!("Seeding {} clicks...", clicks.len());
    let mut report = TableReport::new(Table::Clicks);

    for click in clicks {
        let result = sqlx::query(
            r#"
            INSERT INTO clicks (id, user_id, item_id, store_id, time_of_click)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(click.id)
        .bind(click.user_id)
        .bind(click.item_id)
        .bind(click.store_id)
        .bind(format_timestamp(click.time_of_click)?)
        .execute(&mut *conn)
        .await?;
        report.record(click.id, result.rows_affected());
    }

    Ok(report)
}

async fn insert_searches(
    conn: &mut SqliteConnection,
    searches: &[GeneratedSearch],
) -> Result<TableReport, SeedError> {
    info!("Seeding {} searches...", searches.len());
    let mut report = TableReport::new(Table::Searches);

    for search in searches {
        let result = sqlx::query(
            r#"
            INSERT INTO searches (id, user_id, search_query, time_of_search)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(search.id)
        .bind(search.user_id)
        .bind(&search.search_query)
        .bind(format_timestamp(search.time_of_search)?)
        .execute(&mut *conn)
        .await?;
        report.record(search.id, result.rows_affected());
    }

    Ok(report)
}

async fn insert_search_items(
    conn: &mut SqliteConnection,
    search_items: &[GeneratedSearchItem],
) -> Result<TableReport, SeedError> {
    info!("Seeding {} item searches...", search_items.len());
    let mut report = TableReport::new(Table::SearchesItems);

    for search in search_items {
        let result = sqlx::query(
            r#"
            INSERT INTO searches_items (id, user_id, store_id, query)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(search.id)
        .bind(search.user_id)
        .bind(search.store_id)
        .bind(&search.query)
        .execute(&mut *conn)
        .await?;
        report.record(search.id, result.rows_affected());
    }

    Ok(report)
}

fn format_date(date: Date) -> Result<String, time::error::Format> {
    date.format(DATE_FORMAT)
}

fn format_timestamp(ts: PrimitiveDateTime) -> Result<String, time::error::Format> {
    ts.format(TIMESTAMP_FORMAT)
}
