use sqlx::FromRow;
use time::{Date, PrimitiveDateTime, format_description::BorrowedFormatItem, macros::format_description};

/// Layout used for DATE columns that carry a time of day (clicks, searches).
pub const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Layout used for calendar DATE columns (orders).
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub mail: String,
    pub address: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Store {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub category: String,
    pub image: String,
    pub owner_id: Option<i64>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub description: String,
    pub discount: Option<i64>,
    pub category: Option<String>,
    #[sqlx(rename = "images")]
    pub image: Option<String>,
    pub store_id: Option<i64>,
}

/// Gallery image attached to an item.
#[derive(Debug, Clone, FromRow)]
pub struct ItemImage {
    pub id: i64,
    pub image: String,
    pub store_id: i64,
    pub item_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
pub enum OrderStatus {
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub store_id: Option<i64>,
    pub item_id: i64,
    pub quantity: i64,
    pub time_of_purchase: Date,
    pub estimated_delivery: Option<Date>,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, FromRow)]
pub struct Click {
    pub id: i64,
    pub user_id: i64,
    pub item_id: i64,
    pub store_id: Option<i64>,
    pub time_of_click: PrimitiveDateTime,
}

/// Store search recorded from the storefront search box.
#[derive(Debug, Clone, FromRow)]
pub struct Search {
    pub id: i64,
    pub user_id: i64,
    pub search_query: String,
    pub time_of_search: PrimitiveDateTime,
}

/// Item search scoped to one store.
#[derive(Debug, Clone, FromRow)]
pub struct SearchItem {
    pub id: i64,
    pub user_id: i64,
    pub store_id: i64,
    pub query: String,
}

/// Tables in dependency order: every table only references tables before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Users,
    Stores,
    Items,
    Images,
    Orders,
    Clicks,
    Searches,
    SearchesItems,
}

impl Table {
    pub const ALL: [Table; 8] = [
        Table::Users,
        Table::Stores,
        Table::Items,
        Table::Images,
        Table::Orders,
        Table::Clicks,
        Table::Searches,
        Table::SearchesItems,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Users => "users",
            Table::Stores => "stores",
            Table::Items => "items",
            Table::Images => "images",
            Table::Orders => "orders",
            Table::Clicks => "clicks",
            Table::Searches => "searches",
            Table::SearchesItems => "searches_items",
        }
    }
}
