use std::collections::BTreeMap;

use super::{Cents, Record};

/// Running income/expense totals over a set of records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub count: usize,
    pub income: Cents,
    pub expenses: Cents,
}

impl Totals {
    /// Sums saturate at the `Cents` bounds instead of overflowing.
    pub fn add(&mut self, record: &Record) {
        self.count += 1;
        if record.is_income() {
            self.income = self.income.saturating_add(record.amount());
        } else {
            self.expenses = self.expenses.saturating_add(record.amount());
        }
    }

    /// Income minus expenses.
    pub fn net(&self) -> Cents {
        self.income.saturating_sub(self.expenses)
    }
}

/// Fold a sequence of records into a single set of totals.
pub fn compute_totals<'a>(records: impl IntoIterator<Item = &'a Record>) -> Totals {
    records.into_iter().fold(Totals::default(), |mut totals, record| {
        totals.add(record);
        totals
    })
}

/// Totals per normalized category, keyed by category name.
pub fn compute_category_totals<'a>(
    records: impl IntoIterator<Item = &'a Record>,
) -> BTreeMap<String, Totals> {
    let mut totals: BTreeMap<String, Totals> = BTreeMap::new();

    for record in records {
        totals
            .entry(record.category().to_string())
            .or_default()
            .add(record);
    }

    totals
}
