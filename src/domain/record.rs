use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Cents, format_cents, format_dollars, parse_cents};

/// Every date the ledger reads or writes uses this day/month/year layout.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Date must be in DD/MM/YYYY format, got '{0}'")]
    InvalidDate(String),

    #[error("Transaction type must be 'income' or 'expense', got '{0}'")]
    InvalidTransactionType(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("{0} is required")]
    Required(String),
}

/// Largest amount a single record may carry, in cents.
pub const MAX_AMOUNT: Cents = 10_000_000_000_000;

/// Parse a `DD/MM/YYYY` date.
///
/// chrono's `%Y` also takes short or signed years, so the year part must be
/// exactly four digits.
pub fn parse_date(text: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = text.trim();
    let year = trimmed.rsplit('/').next().unwrap_or_default();
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidDate(text.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(text.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in (wages, refunds, gifts)
    Income,
    /// Money going out
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// Capitalized form used in tables.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(ValidationError::InvalidTransactionType(s.to_string())),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Capitalize the first letter of every word and lower-case the rest.
/// Apostrophes stay inside a word, so "mcdonald's" becomes "Mcdonald's".
pub fn normalize_category(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut at_word_start = true;
    for ch in raw.trim().chars() {
        if ch.is_alphanumeric() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = ch != '\'';
        }
    }
    out
}

/// A single income or expense entry.
///
/// Records are immutable once built. Mistakes are corrected by adding an
/// offsetting entry, never by editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    date: NaiveDate,
    date_text: String,
    category: String,
    description: String,
    amount: Cents,
    transaction_type: TransactionType,
}

/// Row layout of the flat file, in column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRow {
    pub date: String,
    pub category: String,
    pub description: String,
    pub amount: String,
    pub transaction_type: String,
}

/// Presentation projection of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordView {
    pub date: String,
    pub category: String,
    pub description: String,
    pub amount: Cents,
    pub transaction_type: TransactionType,
    pub signed_amount: Cents,
}

impl Record {
    /// Build an expense record.
    pub fn new(
        date_text: &str,
        category: &str,
        description: &str,
        amount: Cents,
    ) -> Result<Self, ValidationError> {
        Self::create(
            date_text,
            category,
            description,
            amount,
            TransactionType::Expense.as_str(),
        )
    }

    /// Build a record of the given type ("income" or "expense", any case).
    ///
    /// The sign of `amount` is discarded; zero and anything above
    /// [`MAX_AMOUNT`] are rejected.
    pub fn create(
        date_text: &str,
        category: &str,
        description: &str,
        amount: Cents,
        type_text: &str,
    ) -> Result<Self, ValidationError> {
        let date = parse_date(date_text)?;
        let amount = amount
            .checked_abs()
            .ok_or_else(|| ValidationError::InvalidAmount(amount.to_string()))?;
        if amount == 0 {
            return Err(ValidationError::InvalidAmount(
                "amount must be greater than 0".to_string(),
            ));
        }
        if amount > MAX_AMOUNT {
            return Err(ValidationError::InvalidAmount(format!(
                "amount must not exceed {}",
                format_dollars(MAX_AMOUNT)
            )));
        }
        let transaction_type: TransactionType = type_text.parse()?;

        Ok(Self {
            date,
            date_text: date_text.trim().to_string(),
            category: normalize_category(category),
            description: description.trim().to_string(),
            amount,
            transaction_type,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The date as it was entered, e.g. "01/07/2025".
    pub fn date_text(&self) -> &str {
        &self.date_text
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Unsigned amount in cents (always > 0)
    pub fn amount(&self) -> Cents {
        self.amount
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }

    /// Positive for income, negative for expenses.
    pub fn signed_amount(&self) -> Cents {
        match self.transaction_type {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }

    pub fn to_row(&self) -> RecordRow {
        RecordRow {
            date: self.date_text.clone(),
            category: self.category.clone(),
            description: self.description.clone(),
            amount: format_cents(self.amount),
            transaction_type: self.transaction_type.as_str().to_string(),
        }
    }

    pub fn to_view(&self) -> RecordView {
        RecordView {
            date: self.date_text.clone(),
            category: self.category.clone(),
            description: self.description.clone(),
            amount: self.amount,
            transaction_type: self.transaction_type,
            signed_amount: self.signed_amount(),
        }
    }
}

impl TryFrom<RecordRow> for Record {
    type Error = ValidationError;

    fn try_from(row: RecordRow) -> Result<Self, Self::Error> {
        let amount = parse_cents(&row.amount)
            .map_err(|e| ValidationError::InvalidAmount(e.to_string()))?;
        Record::create(
            &row.date,
            &row.category,
            &row.description,
            amount,
            &row.transaction_type,
        )
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.is_income() { "+" } else { "-" };
        write!(
            f,
            "{} | {} | {} | {}{}",
            self.date_text,
            self.category,
            self.description,
            sign,
            format_dollars(self.amount)
        )
    }
}
