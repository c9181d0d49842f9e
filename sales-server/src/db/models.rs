//! Row models for the sale table

use serde::Serialize;
use sqlx::types::Json;

use crate::utils::time::serialize_millis_rfc3339;

/// One sale record — flat, immutable after ingest.
///
/// `date` is stored as UTC epoch milliseconds and serialized as an
/// RFC 3339 string on the wire; `tags` is a JSON array column.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: i64,

    // Customer
    pub customer_id: String,
    pub customer_name: String,
    pub phone_number: String,
    pub gender: String,
    pub age: i64,
    pub customer_region: String,
    pub customer_type: String,

    // Product
    pub product_id: String,
    pub product_name: String,
    pub brand: String,
    pub product_category: String,
    pub tags: Json<Vec<String>>,

    // Transaction
    pub quantity: i64,
    pub price_per_unit: f64,
    pub discount_percentage: f64,
    pub total_amount: f64,
    pub final_amount: f64,

    // Operational
    #[serde(serialize_with = "serialize_millis_rfc3339")]
    pub date: i64,
    pub payment_method: String,
    pub order_status: String,
    pub delivery_type: String,
    pub store_id: String,
    pub store_location: String,
    pub salesperson_id: String,
    pub employee_name: String,
}
