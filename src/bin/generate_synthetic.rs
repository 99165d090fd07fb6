//! Synthetic sales dataset generator.
//!
//! Produces a transaction CSV the dashboard can load, with controlled
//! random variation across products, regions, discounts, and order
//! statuses. Seeded runs are reproducible.
//!
//! Usage:
//!   cargo run --release --bin generate_synthetic -- [OPTIONS]

use chrono::{Datelike, Duration, NaiveDate, Timelike};
use clap::Parser;
use csv::WriterBuilder;
use rand::prelude::*;
use rand::rngs::StdRng;
use serde::Serialize;
use std::path::PathBuf;

/// Synthetic sales transaction generator
#[derive(Parser, Debug)]
#[command(name = "generate_synthetic")]
#[command(about = "Generate a synthetic sales transaction CSV")]
struct Args {
    /// Number of transactions to generate
    #[arg(long, default_value = "20000")]
    rows: usize,

    /// First order date (YYYY-MM-DD)
    #[arg(long, default_value = "2023-01-01")]
    start_date: NaiveDate,

    /// Number of days the orders spread over
    #[arg(long, default_value = "540")]
    days: i64,

    /// Probability that an order is returned
    #[arg(long, default_value = "0.07")]
    return_rate: f64,

    /// Probability that an order is cancelled
    #[arg(long, default_value = "0.05")]
    cancel_rate: f64,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Output CSV path
    #[arg(long, default_value = "data/synthetic_sales.csv")]
    output: PathBuf,
}

/// Output row with the canonical spreadsheet headers.
#[derive(Debug, Serialize)]
struct OutputRecord {
    #[serde(rename = "Order ID")]
    order_id: String,
    #[serde(rename = "Order Date")]
    order_date: String,
    #[serde(rename = "Sales Amount")]
    sales_amount: f64,
    #[serde(rename = "Profit (INR)")]
    profit: f64,
    #[serde(rename = "Quantity")]
    quantity: u32,
    #[serde(rename = "Discount")]
    discount: f64,
    #[serde(rename = "Unit Price (INR)")]
    unit_price: f64,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Product Name")]
    product_name: String,
    #[serde(rename = "State")]
    state: String,
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "Payment Method")]
    payment_method: String,
    #[serde(rename = "Order Status")]
    order_status: String,
}

/// (product, category, base unit price)
const CATALOG: &[(&str, &str, f64)] = &[
    ("Wireless Earbuds", "Electronics", 2499.0),
    ("Smartphone X2", "Electronics", 18999.0),
    ("Laptop Pro 14", "Electronics", 64999.0),
    ("Bluetooth Speaker", "Electronics", 1799.0),
    ("Power Bank 20k", "Electronics", 1299.0),
    ("Cotton Kurta", "Fashion", 899.0),
    ("Denim Jeans", "Fashion", 1599.0),
    ("Running Shoes", "Fashion", 2799.0),
    ("Silk Saree", "Fashion", 4499.0),
    ("Leather Wallet", "Fashion", 699.0),
    ("Basmati Rice 5kg", "Grocery", 549.0),
    ("Masala Tea 500g", "Grocery", 249.0),
    ("Cold-Pressed Oil 1L", "Grocery", 399.0),
    ("Mixer Grinder", "Home & Kitchen", 3299.0),
    ("Non-Stick Cookware Set", "Home & Kitchen", 2199.0),
    ("Bedsheet King Size", "Home & Kitchen", 1099.0),
    ("Study Desk", "Furniture", 5999.0),
    ("Office Chair", "Furniture", 7499.0),
    ("Yoga Mat", "Sports", 799.0),
    ("Cricket Bat", "Sports", 1899.0),
];

const LOCATIONS: &[(&str, &[&str])] = &[
    ("Karnataka", &["Bengaluru", "Mysuru", "Mangaluru"]),
    ("Maharashtra", &["Mumbai", "Pune", "Nagpur"]),
    ("Delhi", &["New Delhi"]),
    ("Tamil Nadu", &["Chennai", "Coimbatore"]),
    ("West Bengal", &["Kolkata", "Howrah"]),
    ("Telangana", &["Hyderabad", "Warangal"]),
    ("Gujarat", &["Ahmedabad", "Surat"]),
    ("Uttar Pradesh", &["Lucknow", "Kanpur", "Noida"]),
];

const PAYMENT_METHODS: &[&str] = &[
    "UPI",
    "Credit Card",
    "Debit Card",
    "Net Banking",
    "Cash on Delivery",
];

const DISCOUNT_CHOICES: &[f64] = &[0.0, 0.05, 0.10, 0.15, 0.20, 0.25, 0.30, 0.40, 0.55];

fn pick_status(rng: &mut impl Rng, args: &Args) -> &'static str {
    let roll: f64 = rng.gen();
    if roll < args.return_rate {
        "Returned"
    } else if roll < args.return_rate + args.cancel_rate {
        "Cancelled"
    } else if roll < args.return_rate + args.cancel_rate + 0.04 {
        "In Transit"
    } else {
        "Delivered"
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("🔧 Synthetic Sales Data Generator");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Rows:        {}", args.rows);
    println!("Date range:  {} + {} days", args.start_date, args.days);
    println!("Return rate: {:.1}%", args.return_rate * 100.0);
    println!("Cancel rate: {:.1}%", args.cancel_rate * 100.0);
    println!("Output:      {}", args.output.display());
    if let Some(seed) = args.seed {
        println!("Random seed: {seed}");
    }
    println!();

    let mut rng: StdRng = match args.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    if let Some(parent) = args.output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(&args.output)?;

    for i in 0..args.rows {
        let (product, category, base_price) = CATALOG[rng.gen_range(0..CATALOG.len())];
        let (state, cities) = LOCATIONS[rng.gen_range(0..LOCATIONS.len())];
        let city = cities[rng.gen_range(0..cities.len())];

        let day = args.start_date + Duration::days(rng.gen_range(0..args.days));
        let timestamp = day
            .and_hms_opt(rng.gen_range(8..23), rng.gen_range(0..60), rng.gen_range(0..60))
            .unwrap();
        // Weekends see a little extra traffic: occasionally resample a
        // weekday order onto the same week's Saturday.
        let timestamp = if rng.gen_bool(0.1) {
            let shift = 5 - timestamp.weekday().num_days_from_monday().min(5) as i64;
            (timestamp + Duration::days(shift))
                .with_hour(rng.gen_range(9..22))
                .unwrap()
        } else {
            timestamp
        };

        let quantity = rng.gen_range(1..=5u32);
        let discount = DISCOUNT_CHOICES[rng.gen_range(0..DISCOUNT_CHOICES.len())];
        let unit_price = base_price * rng.gen_range(0.9..1.1);
        let sales_amount = (unit_price * quantity as f64 * (1.0 - discount)).round();
        // Margin shrinks as the discount grows; deep discounts can lose money.
        let margin = rng.gen_range(0.05..0.35) - discount * 0.5;
        let profit = (sales_amount * margin).round();

        writer.serialize(OutputRecord {
            order_id: format!("ORD-{:06}", i + 1),
            order_date: timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            sales_amount,
            profit,
            quantity,
            discount,
            unit_price: (unit_price * 100.0).round() / 100.0,
            category: category.to_string(),
            product_name: product.to_string(),
            state: state.to_string(),
            city: city.to_string(),
            payment_method: PAYMENT_METHODS[rng.gen_range(0..PAYMENT_METHODS.len())].to_string(),
            order_status: pick_status(&mut rng, &args).to_string(),
        })?;

        if (i + 1) % 10000 == 0 {
            println!("   Generated {}/{} rows...", i + 1, args.rows);
        }
    }

    writer.flush()?;

    println!("\n✅ Generation complete!");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Rows written: {:>8}", args.rows);
    println!("Output file:  {}", args.output.display());

    Ok(())
}
