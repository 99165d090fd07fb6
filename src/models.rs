use anyhow::Context;
use chrono::{Datelike, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

/// Order status values the operations view reports rates for.
/// The status column is an open string set; anything else is counted but
/// not given a dedicated rate.
pub const STATUS_DELIVERED: &str = "Delivered";
pub const STATUS_RETURNED: &str = "Returned";
pub const STATUS_CANCELLED: &str = "Cancelled";

/// Raw record from CSV ingestion.
///
/// Header aliases resolve the column-name variants seen in the source
/// exports ("Final Sales Amount (INR)" vs "Sales Amount" etc.) before
/// anything downstream sees the row.
#[derive(Debug, Clone, Deserialize)]
pub struct CsvRecord {
    #[serde(rename = "Order ID")]
    pub order_id: String,
    #[serde(rename = "Order Date")]
    pub order_date: String,
    #[serde(rename = "Sales Amount", alias = "Final Sales Amount (INR)", alias = "Sales")]
    pub sales_amount: f64,
    #[serde(rename = "Profit (INR)", alias = "Profit")]
    pub profit: f64,
    #[serde(rename = "Quantity")]
    pub quantity: u32,
    #[serde(rename = "Discount")]
    pub discount: f64,
    #[serde(rename = "Unit Price (INR)", alias = "Unit Price")]
    pub unit_price: Option<f64>,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Product Name")]
    pub product_name: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Payment Method")]
    pub payment_method: String,
    #[serde(rename = "Order Status")]
    pub order_status: String,
}

/// Parsed transaction with time fields derived once at load.
///
/// The derived fields are pure functions of `order_date`; they are never
/// recomputed or mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub order_id: String,
    pub order_date: NaiveDateTime,
    pub sales_amount: f64,
    pub profit: f64,
    pub quantity: u32,
    pub discount: f64,
    pub unit_price: Option<f64>,
    pub category: String,
    pub product_name: String,
    pub state: String,
    pub city: String,
    pub payment_method: String,
    pub order_status: String,

    // Derived time fields
    pub month: String,
    pub year: i32,
    pub year_month: String,
    pub week: u32,
    pub day_of_week: String,
    pub quarter: String,
}

impl Transaction {
    pub fn is_weekend(&self) -> bool {
        matches!(self.order_date.weekday(), Weekday::Sat | Weekday::Sun)
    }
}

/// Parse an order timestamp; date-only values land at midnight.
pub fn parse_order_date(s: &str) -> anyhow::Result<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt);
    }
    if let Ok(d) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d.and_hms_opt(0, 0, 0).unwrap());
    }
    NaiveDateTime::parse_from_str(s, "%d-%m-%Y %H:%M:%S")
        .with_context(|| format!("unparsable order date: {s:?}"))
}

impl CsvRecord {
    pub fn to_transaction(&self) -> anyhow::Result<Transaction> {
        let order_date = parse_order_date(&self.order_date)?;
        let year = order_date.year();
        let month_no = order_date.month();

        Ok(Transaction {
            order_id: self.order_id.clone(),
            order_date,
            sales_amount: self.sales_amount,
            profit: self.profit,
            quantity: self.quantity,
            discount: self.discount,
            unit_price: self.unit_price,
            category: self.category.clone(),
            product_name: self.product_name.clone(),
            state: self.state.clone(),
            city: self.city.clone(),
            payment_method: self.payment_method.clone(),
            order_status: self.order_status.clone(),
            month: order_date.format("%B").to_string(),
            year,
            year_month: format!("{year:04}-{month_no:02}"),
            week: order_date.iso_week().week(),
            day_of_week: order_date.format("%A").to_string(),
            quarter: format!("{year}Q{}", (month_no - 1) / 3 + 1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str) -> CsvRecord {
        CsvRecord {
            order_id: "ORD-1".into(),
            order_date: date.into(),
            sales_amount: 1200.0,
            profit: 150.0,
            quantity: 2,
            discount: 0.1,
            unit_price: Some(600.0),
            category: "Electronics".into(),
            product_name: "Headphones".into(),
            state: "Karnataka".into(),
            city: "Bengaluru".into(),
            payment_method: "UPI".into(),
            order_status: "Delivered".into(),
        }
    }

    #[test]
    fn test_derived_time_fields() {
        let tx = record("2024-03-16 10:30:00").to_transaction().unwrap();
        assert_eq!(tx.month, "March");
        assert_eq!(tx.year, 2024);
        assert_eq!(tx.year_month, "2024-03");
        assert_eq!(tx.week, 11);
        assert_eq!(tx.day_of_week, "Saturday");
        assert_eq!(tx.quarter, "2024Q1");
        assert!(tx.is_weekend());
    }

    #[test]
    fn test_derivation_is_idempotent() {
        let a = record("2023-12-31 23:59:59").to_transaction().unwrap();
        let b = record("2023-12-31 23:59:59").to_transaction().unwrap();
        assert_eq!(a.month, b.month);
        assert_eq!(a.year_month, b.year_month);
        assert_eq!(a.week, b.week);
        assert_eq!(a.quarter, b.quarter);
    }

    #[test]
    fn test_date_only_parses_to_midnight() {
        let tx = record("2024-07-01").to_transaction().unwrap();
        assert_eq!(tx.order_date.format("%H:%M:%S").to_string(), "00:00:00");
        assert_eq!(tx.quarter, "2024Q3");
        assert!(!tx.is_weekend());
    }

    #[test]
    fn test_bad_date_is_an_error() {
        assert!(record("not a date").to_transaction().is_err());
    }
}
