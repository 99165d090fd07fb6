//! Shared builders for unit tests.

use crate::models::{CsvRecord, Transaction};

/// Build a transaction for a calendar date with the common fields set and
/// everything else defaulted. Tests mutate the public fields directly when
/// they need profit, status, or discount variations.
pub fn tx(
    date: &str,
    state: &str,
    city: &str,
    category: &str,
    product: &str,
    sales: f64,
) -> Transaction {
    let record = CsvRecord {
        order_id: format!("ORD-{product}-{date}"),
        order_date: format!("{date} 12:00:00"),
        sales_amount: sales,
        profit: sales * 0.1,
        quantity: 1,
        discount: 0.0,
        unit_price: None,
        category: category.to_string(),
        product_name: product.to_string(),
        state: state.to_string(),
        city: city.to_string(),
        payment_method: "UPI".to_string(),
        order_status: "Delivered".to_string(),
    };
    record.to_transaction().expect("test date must parse")
}
