//! Group-by reducers feeding the dashboard tabs.
//!
//! Keys absent from the input do not appear in the output, with one
//! exception: the weekday and month axes of the seasonal pivot are
//! reindexed onto their canonical orderings, and cells with no data are
//! reported as `None` so "no sales recorded" is distinguishable from zero.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Transaction, STATUS_RETURNED};

pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Discount bands with fixed edges, half-open `(lower, upper]`. The first
/// lower edge sits just below zero so an exact 0.0 discount lands in the
/// "0-10%" band.
pub const DISCOUNT_BANDS: [(f64, f64, &str); 5] = [
    (-0.01, 0.10, "0-10%"),
    (0.10, 0.20, "10-20%"),
    (0.20, 0.30, "20-30%"),
    (0.30, 0.50, "30-50%"),
    (0.50, 1.00, "50%+"),
];

#[derive(Debug, Clone, Serialize)]
pub struct DatedTotal {
    pub date: NaiveDate,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupTotal {
    pub key: String,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupAvg {
    pub key: String,
    pub avg: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupCount {
    pub key: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeeklyTotal {
    pub week: u32,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Weekday x month mean-sales pivot on the canonical 7x12 axes.
#[derive(Debug, Clone, Serialize)]
pub struct SeasonalPivot {
    pub weekdays: Vec<String>,
    pub months: Vec<String>,
    /// `mean_sales[day][month]`; `None` marks a cell with no transactions.
    pub mean_sales: Vec<Vec<Option<f64>>>,
}

/// Total sales per calendar day, ascending by date. Days without orders
/// are absent, not zero-filled.
pub fn daily_sales(view: &[Transaction]) -> Vec<DatedTotal> {
    let mut per_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for t in view {
        *per_day.entry(t.order_date.date()).or_default() += t.sales_amount;
    }
    per_day
        .into_iter()
        .map(|(date, total)| DatedTotal { date, total })
        .collect()
}

/// Total sales per state, highest first.
pub fn sales_by_state(view: &[Transaction]) -> Vec<GroupTotal> {
    sum_by(view, |t| t.state.as_str(), |t| t.sales_amount, SortOrder::TotalDesc)
}

pub fn sales_by_category(view: &[Transaction]) -> Vec<GroupTotal> {
    sum_by(view, |t| t.category.as_str(), |t| t.sales_amount, SortOrder::KeyAsc)
}

pub fn sales_by_payment_method(view: &[Transaction]) -> Vec<GroupTotal> {
    sum_by(view, |t| t.payment_method.as_str(), |t| t.sales_amount, SortOrder::KeyAsc)
}

/// Top `n` products by total sales.
pub fn top_products(view: &[Transaction], n: usize) -> Vec<GroupTotal> {
    let mut rows = sum_by(view, |t| t.product_name.as_str(), |t| t.sales_amount, SortOrder::TotalDesc);
    rows.truncate(n);
    rows
}

/// Total sales per year-month bucket, chronological.
pub fn monthly_sales(view: &[Transaction]) -> Vec<GroupTotal> {
    sum_by(view, |t| t.year_month.as_str(), |t| t.sales_amount, SortOrder::KeyAsc)
}

/// Total sales per ISO week number, ascending.
pub fn weekly_sales(view: &[Transaction]) -> Vec<WeeklyTotal> {
    let mut per_week: BTreeMap<u32, f64> = BTreeMap::new();
    for t in view {
        *per_week.entry(t.week).or_default() += t.sales_amount;
    }
    per_week
        .into_iter()
        .map(|(week, total)| WeeklyTotal { week, total })
        .collect()
}

pub fn quarterly_sales(view: &[Transaction]) -> Vec<GroupTotal> {
    sum_by(view, |t| t.quarter.as_str(), |t| t.sales_amount, SortOrder::KeyAsc)
}

/// Total profit per year-month bucket, chronological.
pub fn monthly_profit(view: &[Transaction]) -> Vec<GroupTotal> {
    sum_by(view, |t| t.year_month.as_str(), |t| t.profit, SortOrder::KeyAsc)
}

/// Top `n` cities by total profit.
pub fn top_cities_by_profit(view: &[Transaction], n: usize) -> Vec<GroupTotal> {
    let mut rows = sum_by(view, |t| t.city.as_str(), |t| t.profit, SortOrder::TotalDesc);
    rows.truncate(n);
    rows
}

/// Mean order value for weekdays vs weekends. Only day types present in
/// the view appear.
pub fn weekday_weekend_avg_sales(view: &[Transaction]) -> Vec<GroupAvg> {
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for t in view {
        let key = if t.is_weekend() { "Weekend" } else { "Weekday" };
        let entry = sums.entry(key).or_default();
        entry.0 += t.sales_amount;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(key, (sum, count))| GroupAvg {
            key: key.to_string(),
            avg: sum / count as f64,
        })
        .collect()
}

/// Which fixed band a discount fraction falls into; `None` when the value
/// lies outside every band (such rows are omitted from the banded
/// aggregate only).
pub fn discount_band(discount: f64) -> Option<&'static str> {
    discount_band_index(discount).map(|idx| DISCOUNT_BANDS[idx].2)
}

fn discount_band_index(discount: f64) -> Option<usize> {
    DISCOUNT_BANDS
        .iter()
        .position(|(lower, upper, _)| discount > *lower && discount <= *upper)
}

/// Mean profit per discount band, in band order; bands with no orders are
/// omitted.
pub fn avg_profit_by_discount_band(view: &[Transaction]) -> Vec<GroupAvg> {
    let mut sums: BTreeMap<usize, (f64, usize)> = BTreeMap::new();
    for t in view {
        let Some(idx) = discount_band_index(t.discount) else {
            continue;
        };
        let entry = sums.entry(idx).or_default();
        entry.0 += t.profit;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(idx, (sum, count))| GroupAvg {
            key: DISCOUNT_BANDS[idx].2.to_string(),
            avg: sum / count as f64,
        })
        .collect()
}

/// Weekday x month mean sales, reindexed onto the canonical 7x12 axes.
pub fn seasonal_pivot(view: &[Transaction]) -> SeasonalPivot {
    let mut cells: BTreeMap<(usize, usize), (f64, usize)> = BTreeMap::new();
    for t in view {
        let day = WEEKDAYS.iter().position(|d| *d == t.day_of_week);
        let month = MONTHS.iter().position(|m| *m == t.month);
        if let (Some(day), Some(month)) = (day, month) {
            let entry = cells.entry((day, month)).or_default();
            entry.0 += t.sales_amount;
            entry.1 += 1;
        }
    }
    let mean_sales = (0..WEEKDAYS.len())
        .map(|day| {
            (0..MONTHS.len())
                .map(|month| {
                    cells
                        .get(&(day, month))
                        .map(|(sum, count)| sum / *count as f64)
                })
                .collect()
        })
        .collect();
    SeasonalPivot {
        weekdays: WEEKDAYS.iter().map(|s| s.to_string()).collect(),
        months: MONTHS.iter().map(|s| s.to_string()).collect(),
        mean_sales,
    }
}

/// Fixed-width histogram of order values. Empty input yields no bins; a
/// degenerate range yields a single bin holding every order.
pub fn sales_histogram(view: &[Transaction], bins: usize) -> Vec<HistogramBin> {
    if view.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = view.iter().map(|t| t.sales_amount).fold(f64::INFINITY, f64::min);
    let max = view.iter().map(|t| t.sales_amount).fold(f64::NEG_INFINITY, f64::max);
    if max <= min {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: view.len(),
        }];
    }
    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for t in view {
        let idx = (((t.sales_amount - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: min + width * i as f64,
            upper: min + width * (i + 1) as f64,
            count,
        })
        .collect()
}

/// Returned-order count per category, highest first.
pub fn returns_by_category(view: &[Transaction]) -> Vec<GroupCount> {
    count_returns_by(view, |t| t.category.as_str(), usize::MAX)
}

/// Products with the most returns, highest first.
pub fn top_returned_products(view: &[Transaction], n: usize) -> Vec<GroupCount> {
    count_returns_by(view, |t| t.product_name.as_str(), n)
}

fn count_returns_by<'a>(
    view: &'a [Transaction],
    key: impl Fn(&'a Transaction) -> &'a str,
    n: usize,
) -> Vec<GroupCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for t in view.iter().filter(|t| t.order_status == STATUS_RETURNED) {
        *counts.entry(key(t)).or_default() += 1;
    }
    let mut rows: Vec<GroupCount> = counts
        .into_iter()
        .map(|(key, count)| GroupCount {
            key: key.to_string(),
            count,
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    rows.truncate(n);
    rows
}

enum SortOrder {
    KeyAsc,
    TotalDesc,
}

fn sum_by<'a>(
    view: &'a [Transaction],
    key: impl Fn(&'a Transaction) -> &'a str,
    value: impl Fn(&'a Transaction) -> f64,
    order: SortOrder,
) -> Vec<GroupTotal> {
    let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
    for t in view {
        *sums.entry(key(t)).or_default() += value(t);
    }
    let mut rows: Vec<GroupTotal> = sums
        .into_iter()
        .map(|(key, total)| GroupTotal {
            key: key.to_string(),
            total,
        })
        .collect();
    if let SortOrder::TotalDesc = order {
        rows.sort_by(|a, b| {
            b.total
                .partial_cmp(&a.total)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.key.cmp(&b.key))
        });
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::tx;

    #[test]
    fn test_discount_band_edges() {
        assert_eq!(discount_band(0.0), Some("0-10%"));
        assert_eq!(discount_band(0.10), Some("0-10%"));
        assert_eq!(discount_band(0.11), Some("10-20%"));
        assert_eq!(discount_band(0.30), Some("20-30%"));
        assert_eq!(discount_band(0.55), Some("50%+"));
        assert_eq!(discount_band(1.0), Some("50%+"));
        assert_eq!(discount_band(1.5), None);
        assert_eq!(discount_band(-0.2), None);
    }

    #[test]
    fn test_out_of_range_discounts_omitted_from_band_aggregate() {
        let mut a = tx("2024-01-01", "S", "C", "Cat", "P1", 100.0);
        a.discount = 0.05;
        a.profit = 10.0;
        let mut b = tx("2024-01-02", "S", "C", "Cat", "P2", 100.0);
        b.discount = 1.5;
        b.profit = 99.0;

        let bands = avg_profit_by_discount_band(&[a, b]);
        assert_eq!(bands.len(), 1);
        assert_eq!(bands[0].key, "0-10%");
        assert_eq!(bands[0].avg, 10.0);
    }

    #[test]
    fn test_band_aggregate_agrees_with_discount_band() {
        let discounts = [-0.2, 0.0, 0.10, 0.11, 0.30, 0.45, 0.55, 1.0, 1.5];
        let view: Vec<_> = discounts
            .iter()
            .enumerate()
            .map(|(i, &d)| {
                let mut t = tx("2024-01-01", "S", "C", "Cat", &format!("P{i}"), 100.0);
                t.discount = d;
                t
            })
            .collect();
        let bands = avg_profit_by_discount_band(&view);
        let expected: std::collections::BTreeSet<&str> =
            discounts.iter().filter_map(|&d| discount_band(d)).collect();
        let got: std::collections::BTreeSet<&str> =
            bands.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_daily_sales_sums_without_zero_fill() {
        let view = vec![
            tx("2024-01-01", "S", "C", "Cat", "P1", 100.0),
            tx("2024-01-01", "S", "C", "Cat", "P2", 50.0),
            tx("2024-01-05", "S", "C", "Cat", "P3", 25.0),
        ];
        let daily = daily_sales(&view);
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].total, 150.0);
        assert_eq!(daily[1].date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
    }

    #[test]
    fn test_sales_by_state_sorted_descending() {
        let view = vec![
            tx("2024-01-01", "Karnataka", "Bengaluru", "Cat", "P1", 100.0),
            tx("2024-01-02", "Maharashtra", "Mumbai", "Cat", "P2", 300.0),
            tx("2024-01-03", "Karnataka", "Mysuru", "Cat", "P3", 50.0),
        ];
        let rows = sales_by_state(&view);
        assert_eq!(rows[0].key, "Maharashtra");
        assert_eq!(rows[1].key, "Karnataka");
        assert_eq!(rows[1].total, 150.0);
    }

    #[test]
    fn test_top_products_truncates() {
        let view = vec![
            tx("2024-01-01", "S", "C", "Cat", "Small", 10.0),
            tx("2024-01-02", "S", "C", "Cat", "Mid", 20.0),
            tx("2024-01-03", "S", "C", "Cat", "Big", 30.0),
        ];
        let rows = top_products(&view, 2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key, "Big");
        assert_eq!(rows[1].key, "Mid");
    }

    #[test]
    fn test_weekday_weekend_split() {
        // 2024-01-06 is a Saturday, 2024-01-08 a Monday.
        let view = vec![
            tx("2024-01-06", "S", "C", "Cat", "P1", 200.0),
            tx("2024-01-06", "S", "C", "Cat", "P2", 100.0),
            tx("2024-01-08", "S", "C", "Cat", "P3", 50.0),
        ];
        let rows = weekday_weekend_avg_sales(&view);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key, "Weekday");
        assert_eq!(rows[0].avg, 50.0);
        assert_eq!(rows[1].key, "Weekend");
        assert_eq!(rows[1].avg, 150.0);
    }

    #[test]
    fn test_weekday_only_view_omits_weekend_row() {
        let view = vec![tx("2024-01-08", "S", "C", "Cat", "P1", 50.0)];
        let rows = weekday_weekend_avg_sales(&view);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key, "Weekday");
    }

    #[test]
    fn test_seasonal_pivot_reindexes_full_axes() {
        // Single transaction on a Monday in January.
        let view = vec![tx("2024-01-08", "S", "C", "Cat", "P1", 120.0)];
        let pivot = seasonal_pivot(&view);
        assert_eq!(pivot.weekdays.len(), 7);
        assert_eq!(pivot.months.len(), 12);
        assert_eq!(pivot.mean_sales[0][0], Some(120.0));
        // Every other cell is explicit "no data", not zero.
        assert_eq!(pivot.mean_sales[0][1], None);
        assert_eq!(pivot.mean_sales[6][0], None);
    }

    #[test]
    fn test_monthly_and_quarterly_keys_sorted() {
        let view = vec![
            tx("2024-04-01", "S", "C", "Cat", "P1", 10.0),
            tx("2024-01-15", "S", "C", "Cat", "P2", 20.0),
            tx("2024-01-20", "S", "C", "Cat", "P3", 30.0),
        ];
        let monthly = monthly_sales(&view);
        assert_eq!(monthly[0].key, "2024-01");
        assert_eq!(monthly[0].total, 50.0);
        assert_eq!(monthly[1].key, "2024-04");

        let quarterly = quarterly_sales(&view);
        assert_eq!(quarterly[0].key, "2024Q1");
        assert_eq!(quarterly[1].key, "2024Q2");
    }

    #[test]
    fn test_returns_funnel() {
        let mut a = tx("2024-01-01", "S", "C", "Electronics", "Phone", 100.0);
        a.order_status = "Returned".into();
        let mut b = tx("2024-01-02", "S", "C", "Electronics", "Phone", 100.0);
        b.order_status = "Returned".into();
        let mut c = tx("2024-01-03", "S", "C", "Fashion", "Shirt", 100.0);
        c.order_status = "Returned".into();
        let d = tx("2024-01-04", "S", "C", "Fashion", "Shirt", 100.0);

        let view = vec![a, b, c, d];
        let by_cat = returns_by_category(&view);
        assert_eq!(by_cat[0].key, "Electronics");
        assert_eq!(by_cat[0].count, 2);
        assert_eq!(by_cat[1].count, 1);

        let top = top_returned_products(&view, 1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].key, "Phone");
    }

    #[test]
    fn test_returns_funnel_empty_when_no_returns() {
        let view = vec![tx("2024-01-01", "S", "C", "Cat", "P1", 100.0)];
        assert!(returns_by_category(&view).is_empty());
        assert!(top_returned_products(&view, 10).is_empty());
    }

    #[test]
    fn test_sales_histogram() {
        let view: Vec<_> = [10.0, 20.0, 30.0, 40.0]
            .iter()
            .enumerate()
            .map(|(i, &s)| tx("2024-01-01", "S", "C", "Cat", &format!("P{i}"), s))
            .collect();
        let bins = sales_histogram(&view, 3);
        assert_eq!(bins.len(), 3);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 4);
        // Max value lands in the last bin.
        assert_eq!(bins[2].count, 2);

        assert!(sales_histogram(&[], 3).is_empty());
        let flat = sales_histogram(&view[..1], 3);
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].count, 1);
    }
}
