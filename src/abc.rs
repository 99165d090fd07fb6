//! ABC / Pareto demand classification.
//!
//! Products are ranked by total revenue; the running cumulative share of the
//! grand total assigns the tier: the products covering the first 80% are A,
//! up to 95% are B, the tail is C. Ties on revenue are broken by product
//! name ascending so the ranking is deterministic regardless of input order.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::Transaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AbcClass {
    A,
    B,
    C,
}

impl AbcClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            AbcClass::A => "A",
            AbcClass::B => "B",
            AbcClass::C => "C",
        }
    }
}

/// Restock guidance per class label. A correct classification never
/// produces the fallback.
pub fn recommendation_label(class: &str) -> &'static str {
    match class {
        "A" => "Restock Immediately",
        "B" => "Maintain Stock",
        "C" => "Monitor / Clearance",
        _ => "Unknown",
    }
}

/// One row of the ABC table, per distinct product in the filtered view.
#[derive(Debug, Clone, Serialize)]
pub struct AbcRow {
    pub product: String,
    pub total_sales: f64,
    pub frequency: usize,
    pub avg_profit: f64,
    pub cumulative_sales: f64,
    pub cumulative_pct: f64,
    pub class: AbcClass,
    pub recommendation: &'static str,
    pub est_inventory: f64,
    pub turnover_ratio: f64,
}

/// Classify every product in the view. An empty view yields an empty table;
/// there is no division by zero on the way there.
pub fn classify(view: &[Transaction]) -> Vec<AbcRow> {
    let mut per_product: HashMap<&str, (f64, usize, f64)> = HashMap::new();
    for t in view {
        let entry = per_product.entry(t.product_name.as_str()).or_default();
        entry.0 += t.sales_amount;
        entry.1 += 1;
        entry.2 += t.profit;
    }
    if per_product.is_empty() {
        return Vec::new();
    }

    let mut products: Vec<(&str, f64, usize, f64)> = per_product
        .into_iter()
        .map(|(name, (sales, count, profit))| (name, sales, count, profit))
        .collect();
    products.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(b.0))
    });

    let grand_total: f64 = products.iter().map(|p| p.1).sum();

    let mut rows = Vec::with_capacity(products.len());
    let mut cumulative = 0.0;
    for (name, total_sales, frequency, profit_sum) in products {
        cumulative += total_sales;
        // A zero-revenue view cannot be ranked by share; everything lands
        // in the tail tier.
        let (cumulative_pct, class) = if grand_total > 0.0 {
            let pct = cumulative / grand_total * 100.0;
            (pct, classify_pct(pct))
        } else {
            (0.0, AbcClass::C)
        };
        // Inventory simulation: assume average stock on hand is 20% of
        // sales volume.
        let est_inventory = total_sales * 0.2;
        let turnover_ratio = if est_inventory > 0.0 {
            total_sales / est_inventory
        } else {
            0.0
        };
        rows.push(AbcRow {
            product: name.to_string(),
            total_sales,
            frequency,
            avg_profit: profit_sum / frequency as f64,
            cumulative_sales: cumulative,
            cumulative_pct,
            class,
            recommendation: recommendation_label(class.as_str()),
            est_inventory,
            turnover_ratio,
        });
    }
    rows
}

/// Upper boundaries are inclusive: exactly 80.0 is still class A.
fn classify_pct(cumulative_pct: f64) -> AbcClass {
    if cumulative_pct <= 80.0 {
        AbcClass::A
    } else if cumulative_pct <= 95.0 {
        AbcClass::B
    } else {
        AbcClass::C
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::tx;

    fn product(name: &str, sales: f64) -> Transaction {
        tx("2024-01-05", "Karnataka", "Bengaluru", "Electronics", name, sales)
    }

    #[test]
    fn test_three_product_scenario() {
        let rows = classify(&[
            product("Alpha", 500.0),
            product("Beta", 300.0),
            product("Gamma", 200.0),
        ]);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].product, "Alpha");
        assert_eq!(rows[0].cumulative_pct, 50.0);
        assert_eq!(rows[0].class, AbcClass::A);
        // Exactly 80% stays inside class A.
        assert_eq!(rows[1].cumulative_pct, 80.0);
        assert_eq!(rows[1].class, AbcClass::A);
        // Above 95% is the tail tier, including the final product at 100%.
        assert_eq!(rows[2].cumulative_pct, 100.0);
        assert_eq!(rows[2].class, AbcClass::C);
    }

    #[test]
    fn test_empty_view_yields_empty_table() {
        assert!(classify(&[]).is_empty());
    }

    #[test]
    fn test_cumulative_pct_monotone_and_ends_at_100() {
        let sales = [812.0, 644.0, 301.0, 250.0, 99.0, 45.0, 12.0, 3.0];
        let rows: Vec<Transaction> = sales
            .iter()
            .enumerate()
            .map(|(i, &s)| product(&format!("P{i:02}"), s))
            .collect();
        let table = classify(&rows);
        for pair in table.windows(2) {
            assert!(pair[1].cumulative_pct >= pair[0].cumulative_pct);
        }
        let last = table.last().unwrap();
        assert!((last.cumulative_pct - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_tiers_partition_by_threshold() {
        let rows: Vec<Transaction> = (0..40)
            .map(|i| product(&format!("P{i:02}"), 1000.0 / (i + 1) as f64))
            .collect();
        let table = classify(&rows);
        for row in &table {
            match row.class {
                AbcClass::A => assert!(row.cumulative_pct <= 80.0),
                AbcClass::B => {
                    assert!(row.cumulative_pct > 80.0 && row.cumulative_pct <= 95.0)
                }
                AbcClass::C => assert!(row.cumulative_pct > 95.0),
            }
            assert_ne!(row.recommendation, "Unknown");
        }
    }

    #[test]
    fn test_tie_break_is_product_name_ascending() {
        let table = classify(&[
            product("Zeta", 100.0),
            product("Alpha", 100.0),
            product("Mid", 100.0),
        ]);
        let order: Vec<&str> = table.iter().map(|r| r.product.as_str()).collect();
        assert_eq!(order, vec!["Alpha", "Mid", "Zeta"]);
    }

    #[test]
    fn test_frequency_and_avg_profit() {
        let mut a = product("Alpha", 100.0);
        a.profit = 30.0;
        let mut b = product("Alpha", 200.0);
        b.profit = 10.0;
        let table = classify(&[a, b]);
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].frequency, 2);
        assert_eq!(table[0].total_sales, 300.0);
        assert_eq!(table[0].avg_profit, 20.0);
        assert_eq!(table[0].turnover_ratio, 5.0);
    }

    #[test]
    fn test_recommendation_labels() {
        assert_eq!(recommendation_label("A"), "Restock Immediately");
        assert_eq!(recommendation_label("B"), "Maintain Stock");
        assert_eq!(recommendation_label("C"), "Monitor / Clearance");
        assert_eq!(recommendation_label("D"), "Unknown");
    }

    #[test]
    fn test_zero_revenue_view_does_not_divide_by_zero() {
        let table = classify(&[product("Alpha", 0.0), product("Beta", 0.0)]);
        assert_eq!(table.len(), 2);
        for row in &table {
            assert_eq!(row.class, AbcClass::C);
            assert!(row.cumulative_pct.is_finite());
        }
    }
}
