//! Console sales dashboard - descriptive analytics over a transaction CSV.
//!
//! Run: ./target/release/dashboard [OPTIONS] [SECTION]
//! Sections: all, overview, scenario, profitability, insights, timeseries, abc, operations

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use sales_analytics::abc;
use sales_analytics::aggregate;
use sales_analytics::dataset::Dataset;
use sales_analytics::filters::{available_cities, FilterSpec};
use sales_analytics::metrics::{
    project_revenue, OperationsSummary, OverviewKpis, ProfitabilitySummary,
};
use tracing::info;

/// Sales analytics dashboard
#[derive(Parser, Debug)]
#[command(name = "dashboard")]
#[command(about = "Descriptive sales analytics over a transaction CSV")]
struct Args {
    /// Section to render
    #[arg(default_value = "all")]
    section: String,

    /// Transaction CSV path
    #[arg(long, default_value = "data/synthetic_sales.csv")]
    data: PathBuf,

    /// Filter: first order date to include (YYYY-MM-DD)
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Filter: last order date to include (YYYY-MM-DD)
    #[arg(long)]
    end_date: Option<NaiveDate>,

    /// Filter: comma-separated states
    #[arg(long, value_delimiter = ',')]
    states: Vec<String>,

    /// Filter: comma-separated cities (defaults to every city in the selected states)
    #[arg(long, value_delimiter = ',')]
    cities: Vec<String>,

    /// Filter: comma-separated categories
    #[arg(long, value_delimiter = ',')]
    categories: Vec<String>,

    /// Row limit for top-N tables
    #[arg(long, default_value = "10")]
    top: usize,

    /// Scenario: expected volume growth percent
    #[arg(long, default_value = "10.0")]
    volume_growth_pct: f64,

    /// Scenario: expected price increase percent
    #[arg(long, default_value = "5.0")]
    price_increase_pct: f64,

    /// Emit the tables as JSON instead of rendering them
    #[arg(long)]
    json: bool,
}

fn print_section_header(title: &str) {
    println!("\n{}", "═".repeat(80));
    println!("  {}", title);
    println!("{}\n", "═".repeat(80));
}

fn print_subsection(title: &str) {
    println!("\n{}", title);
    println!("{}", "─".repeat(70));
}

fn bar(pct: f64) -> String {
    "█".repeat((pct / 2.0).clamp(0.0, 40.0) as usize)
}

fn build_filter(args: &Args, dataset: &Dataset) -> FilterSpec {
    let mut spec = FilterSpec::all(dataset);
    if let Some(start) = args.start_date {
        spec.start_date = start;
    }
    if let Some(end) = args.end_date {
        spec.end_date = end;
    }
    if !args.states.is_empty() {
        spec.states = args.states.iter().cloned().collect();
        // City choices follow the selected states.
        spec.cities = available_cities(dataset, &spec.states).into_iter().collect();
    }
    if !args.cities.is_empty() {
        let requested: HashSet<String> = args.cities.iter().cloned().collect();
        let kept: HashSet<String> = spec.cities.intersection(&requested).cloned().collect();
        spec.cities = kept;
    }
    if !args.categories.is_empty() {
        spec.categories = args.categories.iter().cloned().collect();
    }
    spec
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let args = Args::parse();
    let dataset = Dataset::load(&args.data)?;
    let spec = build_filter(&args, &dataset);
    let view = spec.apply(&dataset);
    info!("filter matched {} of {} transactions", view.len(), dataset.len());

    if args.json {
        return emit_json(&args, &view, &dataset);
    }

    println!("\n{}", "█".repeat(80));
    println!("{}  SALES ANALYTICS DASHBOARD  {}", "█".repeat(25), "█".repeat(25));
    println!("{}", "█".repeat(80));

    if let Some((min, max)) = dataset.date_range() {
        println!("\n  Dataset: {} transactions, {} to {}", dataset.len(), min, max);
        println!("  Filtered view: {} transactions", view.len());
    }
    if view.is_empty() {
        println!("\n  No data available for the selected filters.");
        return Ok(());
    }

    match args.section.as_str() {
        "all" => {
            run_overview(&view, &dataset, args.top);
            run_scenario(&view, args.volume_growth_pct, args.price_increase_pct);
            run_profitability(&view, args.top);
            run_insights(&view);
            run_timeseries(&view);
            run_abc(&view, args.top);
            run_operations(&view, args.top);
        }
        "overview" => run_overview(&view, &dataset, args.top),
        "scenario" => run_scenario(&view, args.volume_growth_pct, args.price_increase_pct),
        "profitability" => run_profitability(&view, args.top),
        "insights" => run_insights(&view),
        "timeseries" => run_timeseries(&view),
        "abc" => run_abc(&view, args.top),
        "operations" => run_operations(&view, args.top),
        other => {
            println!("Unknown section: {other}");
            println!("Available: all, overview, scenario, profitability, insights, timeseries, abc, operations");
        }
    }

    println!("\n{}", "█".repeat(80));
    Ok(())
}

fn run_overview(view: &[sales_analytics::models::Transaction], dataset: &Dataset, top: usize) {
    print_section_header("1. HIGH-LEVEL OVERVIEW");

    let kpis = OverviewKpis::compute(view, dataset.transactions());
    print_subsection("KPIs (growth vs whole dataset)");
    println!("  Total Sales:       ₹{:>14.0}  ({:+.1}%)", kpis.total_sales, kpis.sales_growth_pct);
    println!("  Total Quantity:    {:>15}  ({:+.1}%)", kpis.total_quantity, kpis.quantity_growth_pct);
    println!("  Total Profit:      ₹{:>14.0}  ({:+.1}%)", kpis.total_profit, kpis.profit_growth_pct);
    println!("  Avg Order Value:   ₹{:>14.0}", kpis.avg_order_value);
    println!("  Unique Customers:  {:>15}", kpis.unique_customers);

    print_subsection("Sales by State");
    let states = aggregate::sales_by_state(view);
    for row in &states {
        let pct = if kpis.total_sales > 0.0 { row.total / kpis.total_sales * 100.0 } else { 0.0 };
        println!("  {:18} ₹{:>12.0} ({:>5.1}%) {}", row.key, row.total, pct, bar(pct));
    }

    print_subsection("Category Mix");
    for row in &aggregate::sales_by_category(view) {
        let pct = if kpis.total_sales > 0.0 { row.total / kpis.total_sales * 100.0 } else { 0.0 };
        println!("  {:22} ₹{:>12.0} ({:>5.1}%) {}", row.key, row.total, pct, bar(pct));
    }

    print_subsection("Payment Methods");
    for row in &aggregate::sales_by_payment_method(view) {
        let pct = if kpis.total_sales > 0.0 { row.total / kpis.total_sales * 100.0 } else { 0.0 };
        println!("  {:18} ₹{:>12.0} ({:>5.1}%)", row.key, row.total, pct);
    }

    print_subsection(&format!("Top {top} Products"));
    for row in aggregate::top_products(view, top) {
        println!("  {:26} ₹{:>12.0}", row.key, row.total);
    }

    print_subsection("Daily Sales Trend (last 14 days with orders)");
    let daily = aggregate::daily_sales(view);
    let max_daily = daily.iter().map(|d| d.total).fold(0.0, f64::max);
    for row in daily.iter().rev().take(14).rev() {
        let pct = if max_daily > 0.0 { row.total / max_daily * 80.0 } else { 0.0 };
        println!("  {}  ₹{:>12.0}  {}", row.date, row.total, bar(pct));
    }
}

fn run_scenario(view: &[sales_analytics::models::Transaction], volume_pct: f64, price_pct: f64) {
    print_section_header("2. GROWTH SCENARIO");

    let current: f64 = view.iter().map(|t| t.sales_amount).sum();
    let projected = project_revenue(current, volume_pct, price_pct);
    let difference = projected - current;

    println!("  Volume growth:     {volume_pct:+.1}%");
    println!("  Price increase:    {price_pct:+.1}%");
    println!("  Current revenue:   ₹{current:>14.0}");
    println!("  Projected revenue: ₹{projected:>14.0}");
    if difference >= 0.0 {
        println!("  → Projected to make ₹{difference:.0} more.");
    } else {
        println!("  → Warning: projected to make ₹{:.0} less.", difference.abs());
    }
}

fn run_profitability(view: &[sales_analytics::models::Transaction], top: usize) {
    print_section_header("3. PROFITABILITY");

    let summary = ProfitabilitySummary::compute(view);
    println!("  Profit Margin:    {:>8.2}%", summary.profit_margin_pct);
    println!("  Total Profit:     ₹{:>12.0}", summary.total_profit);
    println!("  Avg Profit/Order: ₹{:>12.0}", summary.avg_profit);

    print_subsection("By Category");
    println!("  {:22} {:>12} {:>12} {:>8} {:>9}", "Category", "Profit", "Sales", "Qty", "Margin%");
    println!("  {}", "─".repeat(68));
    for row in &summary.by_category {
        println!(
            "  {:22} ₹{:>11.0} ₹{:>11.0} {:>8} {:>8.2}%",
            row.category, row.profit, row.sales, row.quantity, row.margin_pct
        );
    }

    print_subsection(&format!("Top {top} Cities by Profit"));
    for row in aggregate::top_cities_by_profit(view, top) {
        println!("  {:18} ₹{:>12.0}", row.key, row.total);
    }

    print_subsection("Monthly Profit Trend");
    for row in aggregate::monthly_profit(view) {
        println!("  {:8} ₹{:>12.0}", row.key, row.total);
    }
}

fn run_insights(view: &[sales_analytics::models::Transaction]) {
    print_section_header("4. INSIGHTS DEEP DIVE");

    print_subsection("Avg Profit per Order by Discount Level");
    for row in aggregate::avg_profit_by_discount_band(view) {
        println!("  {:8} ₹{:>10.0}", row.key, row.avg);
    }

    print_subsection("Distribution of Order Values");
    let bins = aggregate::sales_histogram(view, 30);
    let max_count = bins.iter().map(|b| b.count).max().unwrap_or(1);
    for b in &bins {
        let pct = b.count as f64 / max_count as f64 * 80.0;
        println!("  ₹{:>9.0}-₹{:>9.0}  {:>6}  {}", b.lower, b.upper, b.count, bar(pct));
    }

    print_subsection("Weekday vs Weekend (avg order value)");
    for row in aggregate::weekday_weekend_avg_sales(view) {
        println!("  {:8} ₹{:>10.0}", row.key, row.avg);
    }
}

fn run_timeseries(view: &[sales_analytics::models::Transaction]) {
    print_section_header("5. TIME-SERIES");

    print_subsection("Monthly Performance");
    let monthly = aggregate::monthly_sales(view);
    let max_monthly = monthly.iter().map(|m| m.total).fold(0.0, f64::max);
    for row in &monthly {
        let pct = if max_monthly > 0.0 { row.total / max_monthly * 80.0 } else { 0.0 };
        println!("  {:8} ₹{:>12.0}  {}", row.key, row.total, bar(pct));
    }

    print_subsection("Weekly Performance (ISO week)");
    for row in aggregate::weekly_sales(view) {
        println!("  W{:02} ₹{:>12.0}", row.week, row.total);
    }

    print_subsection("Quarterly Performance");
    for row in aggregate::quarterly_sales(view) {
        println!("  {:8} ₹{:>12.0}", row.key, row.total);
    }

    print_subsection("Seasonal Heatmap (weekday x month, mean sales)");
    let pivot = aggregate::seasonal_pivot(view);
    print!("  {:10}", "");
    for month in &pivot.months {
        print!(" {:>6}", &month[..3]);
    }
    println!();
    for (d, day) in pivot.weekdays.iter().enumerate() {
        print!("  {:10}", day);
        for m in 0..pivot.months.len() {
            match pivot.mean_sales[d][m] {
                Some(v) => print!(" {:>6.0}", v),
                None => print!(" {:>6}", "·"),
            }
        }
        println!();
    }
}

fn run_abc(view: &[sales_analytics::models::Transaction], top: usize) {
    print_section_header("6. DEMAND (ABC / PARETO)");

    let table = abc::classify(view);
    if table.is_empty() {
        println!("  No products to classify.");
        return;
    }

    let mut class_counts = [0usize; 3];
    for row in &table {
        match row.class {
            abc::AbcClass::A => class_counts[0] += 1,
            abc::AbcClass::B => class_counts[1] += 1,
            abc::AbcClass::C => class_counts[2] += 1,
        }
    }
    println!(
        "  Products: {}   Class A: {}   Class B: {}   Class C: {}",
        table.len(),
        class_counts[0],
        class_counts[1],
        class_counts[2]
    );

    print_subsection(&format!("Pareto Table (top {top})"));
    println!(
        "  {:26} {:>12} {:>6} {:>10} {:>8} {:>3}  {}",
        "Product", "Total Sales", "Freq", "AvgProfit", "Cum%", "Cls", "Recommendation"
    );
    println!("  {}", "─".repeat(92));
    for row in table.iter().take(top) {
        println!(
            "  {:26} ₹{:>11.0} {:>6} ₹{:>9.0} {:>7.1}% {:>3}  {}",
            row.product,
            row.total_sales,
            row.frequency,
            row.avg_profit,
            row.cumulative_pct,
            row.class.as_str(),
            row.recommendation
        );
    }
}

fn run_operations(view: &[sales_analytics::models::Transaction], top: usize) {
    print_section_header("7. OPERATIONS & FULFILLMENT");

    let ops = OperationsSummary::compute(view);
    println!("  Fulfillment Rate:   {:>6.1}%", ops.fulfillment_rate_pct);
    println!("  Return Rate:        {:>6.1}%", ops.return_rate_pct);
    println!("  Cancellation Rate:  {:>6.1}%", ops.cancellation_rate_pct);

    print_subsection("Order Status Distribution");
    for row in &ops.status_counts {
        let pct = if ops.total_orders > 0 {
            row.count as f64 / ops.total_orders as f64 * 100.0
        } else {
            0.0
        };
        println!("  {:14} {:>8} ({:>5.1}%) {}", row.status, row.count, pct, bar(pct));
    }

    print_subsection("Returns by Category");
    let by_cat = aggregate::returns_by_category(view);
    if by_cat.is_empty() {
        println!("  No return data available for the selected period.");
    } else {
        for row in &by_cat {
            println!("  {:22} {:>6}", row.key, row.count);
        }
    }

    print_subsection(&format!("Top {top} Returned Products"));
    let top_returns = aggregate::top_returned_products(view, top);
    if top_returns.is_empty() {
        println!("  No returns found to analyze products.");
    } else {
        for row in &top_returns {
            println!("  {:26} {:>6}", row.key, row.count);
        }
    }
}

fn emit_json(
    args: &Args,
    view: &[sales_analytics::models::Transaction],
    dataset: &Dataset,
) -> Result<()> {
    let kpis = OverviewKpis::compute(view, dataset.transactions());
    let current_revenue = kpis.total_sales;
    let output = serde_json::json!({
        "overview": {
            "kpis": kpis,
            "daily_sales": aggregate::daily_sales(view),
            "sales_by_state": aggregate::sales_by_state(view),
            "sales_by_category": aggregate::sales_by_category(view),
            "sales_by_payment_method": aggregate::sales_by_payment_method(view),
            "top_products": aggregate::top_products(view, args.top),
        },
        "scenario": {
            "current_revenue": current_revenue,
            "projected_revenue": project_revenue(
                current_revenue,
                args.volume_growth_pct,
                args.price_increase_pct,
            ),
        },
        "profitability": {
            "summary": ProfitabilitySummary::compute(view),
            "top_cities_by_profit": aggregate::top_cities_by_profit(view, args.top),
            "monthly_profit": aggregate::monthly_profit(view),
        },
        "insights": {
            "avg_profit_by_discount_band": aggregate::avg_profit_by_discount_band(view),
            "order_value_histogram": aggregate::sales_histogram(view, 30),
            "weekday_weekend_avg_sales": aggregate::weekday_weekend_avg_sales(view),
        },
        "timeseries": {
            "monthly_sales": aggregate::monthly_sales(view),
            "weekly_sales": aggregate::weekly_sales(view),
            "quarterly_sales": aggregate::quarterly_sales(view),
            "seasonal_pivot": aggregate::seasonal_pivot(view),
        },
        "abc": abc::classify(view),
        "operations": {
            "summary": OperationsSummary::compute(view),
            "returns_by_category": aggregate::returns_by_category(view),
            "top_returned_products": aggregate::top_returned_products(view, args.top),
        },
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
