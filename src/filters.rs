//! Global filters: inclusive date range plus state / city / category sets.
//!
//! A filtered view is an independent copy of the matching rows; nothing
//! derived from it is shared back into the dataset.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::dataset::Dataset;
use crate::models::Transaction;

/// Conjunction of the sidebar filters.
#[derive(Debug, Clone)]
pub struct FilterSpec {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub states: HashSet<String>,
    pub cities: HashSet<String>,
    pub categories: HashSet<String>,
}

impl FilterSpec {
    /// A spec that matches the whole dataset: full date range, every state,
    /// city, and category present.
    pub fn all(dataset: &Dataset) -> FilterSpec {
        let (start, end) = dataset
            .date_range()
            .unwrap_or_else(|| (NaiveDate::MIN, NaiveDate::MAX));
        FilterSpec {
            start_date: start,
            end_date: end,
            states: dataset.states().into_iter().collect(),
            cities: dataset.cities().into_iter().collect(),
            categories: dataset.categories().into_iter().collect(),
        }
    }

    fn matches(&self, tx: &Transaction) -> bool {
        let date = tx.order_date.date();
        date >= self.start_date
            && date <= self.end_date
            && self.states.contains(&tx.state)
            && self.cities.contains(&tx.city)
            && self.categories.contains(&tx.category)
    }

    /// Materialize the filtered view.
    pub fn apply(&self, dataset: &Dataset) -> Vec<Transaction> {
        dataset
            .transactions()
            .iter()
            .filter(|tx| self.matches(tx))
            .cloned()
            .collect()
    }
}

/// Cities offered for selection are restricted to the currently selected
/// states, so a stale city choice can never outlive its state.
pub fn available_cities(dataset: &Dataset, selected_states: &HashSet<String>) -> Vec<String> {
    let set: std::collections::BTreeSet<&str> = dataset
        .transactions()
        .iter()
        .filter(|tx| selected_states.contains(&tx.state))
        .map(|tx| tx.city.as_str())
        .collect();
    set.into_iter().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::tx;

    fn dataset() -> Dataset {
        Dataset::from_transactions(vec![
            tx("2024-01-05", "Karnataka", "Bengaluru", "Electronics", "Mouse", 100.0),
            tx("2024-02-10", "Karnataka", "Mysuru", "Fashion", "Shirt", 200.0),
            tx("2024-03-15", "Maharashtra", "Mumbai", "Electronics", "Laptop", 300.0),
            tx("2024-04-20", "Maharashtra", "Pune", "Grocery", "Rice", 400.0),
        ])
    }

    #[test]
    fn test_full_filter_round_trips_the_dataset() {
        let ds = dataset();
        let view = FilterSpec::all(&ds).apply(&ds);
        assert_eq!(view.len(), ds.len());
        for (a, b) in view.iter().zip(ds.transactions()) {
            assert_eq!(a.order_id, b.order_id);
            assert_eq!(a.order_date, b.order_date);
        }
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let ds = dataset();
        let mut spec = FilterSpec::all(&ds);
        spec.start_date = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
        spec.end_date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let view = spec.apply(&ds);
        assert_eq!(view.len(), 2);
        assert_eq!(view[0].product_name, "Shirt");
        assert_eq!(view[1].product_name, "Laptop");
    }

    #[test]
    fn test_state_city_category_conjunction() {
        let ds = dataset();
        let mut spec = FilterSpec::all(&ds);
        spec.states = ["Maharashtra".to_string()].into_iter().collect();
        spec.categories = ["Electronics".to_string()].into_iter().collect();
        let view = spec.apply(&ds);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].city, "Mumbai");
    }

    #[test]
    fn test_available_cities_follow_selected_states() {
        let ds = dataset();
        let states: HashSet<String> = ["Karnataka".to_string()].into_iter().collect();
        assert_eq!(available_cities(&ds, &states), vec!["Bengaluru", "Mysuru"]);

        let none: HashSet<String> = HashSet::new();
        assert!(available_cities(&ds, &none).is_empty());
    }

    #[test]
    fn test_empty_selection_yields_empty_view() {
        let ds = dataset();
        let mut spec = FilterSpec::all(&ds);
        spec.states.clear();
        assert!(spec.apply(&ds).is_empty());
    }
}
