use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::application::{CategorySummary, Summary};
use crate::domain::{Cents, Record, compute_totals, format_dollars};

const RULE_WIDTH: usize = 80;

/// "$15.50+" for non-negative amounts, "$15.50-" otherwise.
pub fn trailing_sign(cents: Cents) -> String {
    let sign = if cents < 0 { '-' } else { '+' };
    format!("{}{}", format_dollars(cents), sign)
}

/// "$15.50" or "-$15.50".
pub fn signed_dollars(cents: Cents) -> String {
    if cents < 0 {
        format!("-{}", format_dollars(cents))
    } else {
        format_dollars(cents)
    }
}

/// Shorten `s` to at most `max_len` characters, ending in "..." if cut.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Newest first. Entries sharing a date keep their ledger order.
pub fn sorted_newest_first(records: &[Record]) -> Vec<&Record> {
    let mut sorted: Vec<&Record> = records.iter().collect();
    sorted.sort_by(|a, b| b.date().cmp(&a.date()));
    sorted
}

pub fn write_records<W: Write>(out: &mut W, title: &str, records: &[Record]) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", title)?;
    if records.is_empty() {
        writeln!(out, "No transactions found.")?;
        return Ok(());
    }

    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    writeln!(
        out,
        "{:<10}  {:<16}  {:<28}  {:<7}  {:>11}",
        "DATE", "CATEGORY", "DESCRIPTION", "TYPE", "AMOUNT"
    )?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    for record in sorted_newest_first(records) {
        writeln!(
            out,
            "{:<10}  {:<16}  {:<28}  {:<7}  {:>11}",
            record.date_text(),
            truncate(record.category(), 16),
            truncate(record.description(), 28),
            record.transaction_type().label(),
            trailing_sign(record.signed_amount())
        )?;
    }
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;

    let totals = compute_totals(records);
    writeln!(out)?;
    writeln!(out, "Transaction Summary:")?;
    writeln!(out, "Total Income:   {}+", format_dollars(totals.income))?;
    writeln!(out, "Total Expenses: {}-", format_dollars(totals.expenses))?;
    writeln!(out, "Net Balance:    {}", trailing_sign(totals.net()))?;
    Ok(())
}

pub fn write_summary<W: Write>(out: &mut W, summary: &Summary) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "-".repeat(50))?;
    writeln!(out, "Summary Statistics")?;
    writeln!(out, "{}", "-".repeat(50))?;
    writeln!(out, "Total Transactions: {}", summary.total_transactions)?;
    writeln!(out, "Total Income: {}", format_dollars(summary.total_income))?;
    writeln!(out, "Total Expenses: {}", format_dollars(summary.total_expenses))?;
    writeln!(out, "Net Balance: {}", signed_dollars(summary.net_balance))?;
    writeln!(out, "Categories: {}", summary.categories.len())?;
    if !summary.categories.is_empty() {
        let names: Vec<&str> = summary.categories.iter().map(String::as_str).collect();
        writeln!(out, "Category List: {}", names.join(", "))?;
    }
    Ok(())
}

pub fn write_category_summary<W: Write>(
    out: &mut W,
    summaries: &BTreeMap<String, CategorySummary>,
) -> io::Result<()> {
    if summaries.is_empty() {
        writeln!(out, "No categories found.")?;
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "{}", "-".repeat(50))?;
    writeln!(out, "Category Summary")?;
    writeln!(out, "{}", "-".repeat(50))?;
    writeln!(
        out,
        "{:<20} {:>6} {:>12} {:>12} {:>13}",
        "CATEGORY", "COUNT", "INCOME", "EXPENSES", "NET"
    )?;
    writeln!(out, "{}", "-".repeat(67))?;
    for (category, stats) in summaries {
        writeln!(
            out,
            "{:<20} {:>6} {:>12} {:>12} {:>13}",
            truncate(category, 20),
            stats.count,
            format_dollars(stats.income),
            format_dollars(stats.expenses),
            trailing_sign(stats.net)
        )?;
    }
    Ok(())
}
