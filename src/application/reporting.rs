use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::domain::{Cents, Record, Totals, compute_category_totals, compute_totals};

/// Ledger-wide totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_transactions: usize,
    pub total_income: Cents,
    pub total_expenses: Cents,
    pub net_balance: Cents,
    pub categories: BTreeSet<String>,
}

/// Totals for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub count: usize,
    pub income: Cents,
    pub expenses: Cents,
    pub net: Cents,
}

impl Summary {
    pub fn from_records(records: &[Record]) -> Self {
        let totals = compute_totals(records);
        Self {
            total_transactions: totals.count,
            total_income: totals.income,
            total_expenses: totals.expenses,
            net_balance: totals.net(),
            categories: records.iter().map(|r| r.category().to_string()).collect(),
        }
    }
}

impl From<Totals> for CategorySummary {
    fn from(totals: Totals) -> Self {
        Self {
            count: totals.count,
            income: totals.income,
            expenses: totals.expenses,
            net: totals.net(),
        }
    }
}

/// Per-category totals, keyed and ordered by category name.
pub fn category_summaries(records: &[Record]) -> BTreeMap<String, CategorySummary> {
    compute_category_totals(records)
        .into_iter()
        .map(|(category, totals)| (category, totals.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_of_nothing_is_zeroed() {
        let summary = Summary::from_records(&[]);
        assert_eq!(summary, Summary::default());
        assert!(summary.categories.is_empty());
    }

    #[test]
    fn test_summary_serializes_with_fixed_fields() {
        let records = vec![Record::create("14/07/2025", "wages", "Pay", 100000, "income").unwrap()];
        let json = serde_json::to_value(Summary::from_records(&records)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "total_transactions": 1,
                "total_income": 100000,
                "total_expenses": 0,
                "net_balance": 100000,
                "categories": ["Wages"],
            })
        );
    }

    #[test]
    fn test_category_summaries() {
        let records = vec![
            Record::create("01/07/2025", "food", "Lunch", 1550, "expense").unwrap(),
            Record::create("02/07/2025", "FOOD", "Voucher", 1000, "income").unwrap(),
        ];
        let summaries = category_summaries(&records);

        assert_eq!(
            summaries.get("Food"),
            Some(&CategorySummary {
                count: 2,
                income: 1000,
                expenses: 1550,
                net: -550,
            })
        );
    }
}
