//! Metric primitives: KPI scalars, profitability, operations rates, and the
//! scenario projection. All of them accept an empty record set and answer
//! with zeros instead of failing.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::models::{Transaction, STATUS_CANCELLED, STATUS_DELIVERED, STATUS_RETURNED};

/// Percentage change of `current` against `previous`. A zero baseline
/// yields 0 rather than a division by zero; that is a policy, not math.
pub fn growth_rate(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    (current - previous) / previous.abs() * 100.0
}

/// Compounded revenue projection for the scenario calculator.
pub fn project_revenue(current: f64, volume_growth_pct: f64, price_increase_pct: f64) -> f64 {
    current * (1.0 + volume_growth_pct / 100.0) * (1.0 + price_increase_pct / 100.0)
}

/// High-level overview KPIs for a filtered view.
///
/// Growth deltas compare the filtered totals against the unfiltered
/// dataset totals, matching the dashboard's historical behavior (this is
/// subset-vs-whole, not period-over-period).
#[derive(Debug, Clone, Serialize)]
pub struct OverviewKpis {
    pub total_sales: f64,
    pub total_quantity: u64,
    pub total_profit: f64,
    pub avg_order_value: f64,
    pub unique_customers: usize,
    pub sales_growth_pct: f64,
    pub quantity_growth_pct: f64,
    pub profit_growth_pct: f64,
}

impl OverviewKpis {
    pub fn compute(view: &[Transaction], full_dataset: &[Transaction]) -> OverviewKpis {
        let total_sales: f64 = view.iter().map(|t| t.sales_amount).sum();
        let total_quantity: u64 = view.iter().map(|t| t.quantity as u64).sum();
        let total_profit: f64 = view.iter().map(|t| t.profit).sum();
        let avg_order_value = if view.is_empty() {
            0.0
        } else {
            total_sales / view.len() as f64
        };
        let unique_customers = view
            .iter()
            .map(|t| t.order_id.as_str())
            .collect::<HashSet<_>>()
            .len();

        let base_sales: f64 = full_dataset.iter().map(|t| t.sales_amount).sum();
        let base_quantity: u64 = full_dataset.iter().map(|t| t.quantity as u64).sum();
        let base_profit: f64 = full_dataset.iter().map(|t| t.profit).sum();

        OverviewKpis {
            total_sales,
            total_quantity,
            total_profit,
            avg_order_value,
            unique_customers,
            sales_growth_pct: growth_rate(total_sales, base_sales),
            quantity_growth_pct: growth_rate(total_quantity as f64, base_quantity as f64),
            profit_growth_pct: growth_rate(total_profit, base_profit),
        }
    }
}

/// Per-category profitability row, one per distinct category in the input.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryProfit {
    pub category: String,
    pub profit: f64,
    pub sales: f64,
    pub quantity: u64,
    pub margin_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfitabilitySummary {
    pub total_profit: f64,
    pub avg_profit: f64,
    pub profit_margin_pct: f64,
    pub by_category: Vec<CategoryProfit>,
}

impl ProfitabilitySummary {
    pub fn compute(view: &[Transaction]) -> ProfitabilitySummary {
        let total_profit: f64 = view.iter().map(|t| t.profit).sum();
        let total_sales: f64 = view.iter().map(|t| t.sales_amount).sum();
        let avg_profit = if view.is_empty() {
            0.0
        } else {
            total_profit / view.len() as f64
        };
        let profit_margin_pct = if total_sales == 0.0 {
            0.0
        } else {
            total_profit / total_sales * 100.0
        };

        let mut per_category: BTreeMap<&str, (f64, f64, u64)> = BTreeMap::new();
        for t in view {
            let entry = per_category.entry(t.category.as_str()).or_default();
            entry.0 += t.profit;
            entry.1 += t.sales_amount;
            entry.2 += t.quantity as u64;
        }
        let by_category = per_category
            .into_iter()
            .map(|(category, (profit, sales, quantity))| CategoryProfit {
                category: category.to_string(),
                profit,
                sales,
                quantity,
                margin_pct: if sales == 0.0 {
                    0.0
                } else {
                    round2(profit / sales * 100.0)
                },
            })
            .collect();

        ProfitabilitySummary {
            total_profit,
            avg_profit,
            profit_margin_pct,
            by_category,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: usize,
}

/// Order-status funnel for the operations view. Statuses absent from the
/// data count zero; an empty view reports all rates as 0.
#[derive(Debug, Clone, Serialize)]
pub struct OperationsSummary {
    pub total_orders: usize,
    pub status_counts: Vec<StatusCount>,
    pub fulfillment_rate_pct: f64,
    pub return_rate_pct: f64,
    pub cancellation_rate_pct: f64,
}

impl OperationsSummary {
    pub fn compute(view: &[Transaction]) -> OperationsSummary {
        let total_orders = view.len();
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for t in view {
            *counts.entry(t.order_status.as_str()).or_default() += 1;
        }

        let rate = |status: &str| -> f64 {
            if total_orders == 0 {
                return 0.0;
            }
            *counts.get(status).unwrap_or(&0) as f64 / total_orders as f64 * 100.0
        };
        let fulfillment_rate_pct = rate(STATUS_DELIVERED);
        let return_rate_pct = rate(STATUS_RETURNED);
        let cancellation_rate_pct = rate(STATUS_CANCELLED);

        let mut status_counts: Vec<StatusCount> = counts
            .into_iter()
            .map(|(status, count)| StatusCount {
                status: status.to_string(),
                count,
            })
            .collect();
        status_counts.sort_by(|a, b| b.count.cmp(&a.count).then(a.status.cmp(&b.status)));

        OperationsSummary {
            total_orders,
            status_counts,
            fulfillment_rate_pct,
            return_rate_pct,
            cancellation_rate_pct,
        }
    }
}

pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
