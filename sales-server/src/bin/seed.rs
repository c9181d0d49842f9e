//! CSV bulk loader — the only write path into the sale table.
//!
//! Clears the table, then streams the dataset CSV in batches inside
//! transactions. Numeric fields fall back to safe defaults on parse
//! failure instead of aborting the load (rows in the source dataset are
//! occasionally sloppy).
//!
//! Usage: `seed <path-to-csv>` (or set `SEED_CSV_PATH`).

use std::path::PathBuf;

use serde::Deserialize;
use sqlx::SqlitePool;
use sqlx::types::Json;

use sales_server::db::models::Sale;
use sales_server::db::repository::sale;
use sales_server::query::filter::normalize_tokens;
use sales_server::utils::id::snowflake_id;
use sales_server::utils::time::{now_millis, parse_date_start};

const BATCH_SIZE: usize = 5000;

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Customer ID")]
    customer_id: String,
    #[serde(rename = "Customer Name")]
    customer_name: String,
    #[serde(rename = "Phone Number")]
    phone_number: String,
    #[serde(rename = "Gender")]
    gender: String,
    #[serde(rename = "Age")]
    age: String,
    #[serde(rename = "Customer Region")]
    customer_region: String,
    #[serde(rename = "Customer Type")]
    customer_type: String,
    #[serde(rename = "Product ID")]
    product_id: String,
    #[serde(rename = "Product Name")]
    product_name: String,
    #[serde(rename = "Brand")]
    brand: String,
    #[serde(rename = "Product Category")]
    product_category: String,
    #[serde(rename = "Tags")]
    tags: String,
    #[serde(rename = "Quantity")]
    quantity: String,
    #[serde(rename = "Price per Unit")]
    price_per_unit: String,
    #[serde(rename = "Discount Percentage")]
    discount_percentage: String,
    #[serde(rename = "Total Amount")]
    total_amount: String,
    #[serde(rename = "Final Amount")]
    final_amount: String,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Payment Method")]
    payment_method: String,
    #[serde(rename = "Order Status")]
    order_status: String,
    #[serde(rename = "Delivery Type")]
    delivery_type: String,
    #[serde(rename = "Store ID")]
    store_id: String,
    #[serde(rename = "Store Location")]
    store_location: String,
    #[serde(rename = "Salesperson ID")]
    salesperson_id: String,
    #[serde(rename = "Employee Name")]
    employee_name: String,
}

impl CsvRow {
    fn into_sale(self) -> Sale {
        Sale {
            id: snowflake_id(),
            customer_id: self.customer_id,
            customer_name: self.customer_name,
            phone_number: self.phone_number,
            gender: self.gender,
            age: self.age.trim().parse().unwrap_or(25),
            customer_region: self.customer_region,
            customer_type: self.customer_type,
            product_id: self.product_id,
            product_name: self.product_name,
            brand: self.brand,
            product_category: self.product_category,
            tags: Json(normalize_tokens(self.tags.split(','))),
            quantity: self.quantity.trim().parse().unwrap_or(1),
            price_per_unit: self.price_per_unit.trim().parse().unwrap_or(0.0),
            discount_percentage: self.discount_percentage.trim().parse().unwrap_or(0.0),
            total_amount: self.total_amount.trim().parse().unwrap_or(0.0),
            final_amount: self.final_amount.trim().parse().unwrap_or(0.0),
            date: parse_date_start(&self.date).unwrap_or_else(now_millis),
            payment_method: self.payment_method,
            order_status: self.order_status,
            delivery_type: self.delivery_type,
            store_id: self.store_id,
            store_location: self.store_location,
            salesperson_id: self.salesperson_id,
            employee_name: self.employee_name,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    sales_server::init_logger();

    let csv_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("SEED_CSV_PATH").ok())
        .map(PathBuf::from)
        .ok_or("Usage: seed <path-to-csv> (or set SEED_CSV_PATH)")?;

    let config = sales_server::Config::from_env();
    let db = sales_server::DbService::new(&config.database_path).await?;

    let removed = sale::delete_all(&db.pool).await?;
    if removed > 0 {
        tracing::info!("Cleared {removed} existing records");
    }

    let mut reader = csv::Reader::from_path(&csv_path)?;
    let mut batch: Vec<Sale> = Vec::with_capacity(BATCH_SIZE);
    let mut inserted = 0usize;

    for result in reader.deserialize::<CsvRow>() {
        batch.push(result?.into_sale());
        if batch.len() >= BATCH_SIZE {
            inserted += flush(&db.pool, &mut batch).await?;
            tracing::info!("Inserted {inserted} records...");
        }
    }
    if !batch.is_empty() {
        inserted += flush(&db.pool, &mut batch).await?;
    }

    tracing::info!("Database seeded with {inserted} records");
    Ok(())
}

/// Insert one batch inside a transaction, then clear it
async fn flush(
    pool: &SqlitePool,
    batch: &mut Vec<Sale>,
) -> Result<usize, Box<dyn std::error::Error>> {
    let mut tx = pool.begin().await?;
    for record in batch.iter() {
        sale::insert(&mut *tx, record).await?;
    }
    tx.commit().await?;
    let count = batch.len();
    batch.clear();
    Ok(count)
}
