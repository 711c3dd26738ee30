use std::io::{BufRead, Write};

use anyhow::Result;
use chrono::{Local, NaiveDate};
use thiserror::Error;

use crate::application::{Ledger, LoadStatus};
use crate::domain::{
    Cents, DATE_FORMAT, Record, TransactionType, ValidationError, parse_cents, parse_date,
};
use crate::storage::Store;

use super::render;

/// Raised by prompts when the input stream ends; the shell treats it as exit.
#[derive(Debug, Error)]
#[error("input closed")]
struct InputClosed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Add,
    ViewAll,
    ViewByCategory,
    ViewByDateRange,
    Summary,
    CategorySummary,
    Exit,
}

impl MenuAction {
    const ALL: [MenuAction; 7] = [
        MenuAction::Add,
        MenuAction::ViewAll,
        MenuAction::ViewByCategory,
        MenuAction::ViewByDateRange,
        MenuAction::Summary,
        MenuAction::CategorySummary,
        MenuAction::Exit,
    ];

    fn label(&self) -> &'static str {
        match self {
            MenuAction::Add => "Add New Transaction",
            MenuAction::ViewAll => "View All Transactions",
            MenuAction::ViewByCategory => "View Transactions by Category",
            MenuAction::ViewByDateRange => "View Transactions by Date Range",
            MenuAction::Summary => "View Summary Statistics",
            MenuAction::CategorySummary => "View Category Summary",
            MenuAction::Exit => "Exit",
        }
    }

    /// Only the bare digits `1` to `7` select an action.
    fn from_choice(choice: &str) -> Option<Self> {
        match choice.as_bytes() {
            [digit @ b'1'..=b'7'] => Some(Self::ALL[usize::from(digit - b'1')]),
            _ => None,
        }
    }
}

/// Numbered-menu front end over a [`Ledger`].
///
/// Input and output are plain reader/writer handles so the loop can run
/// against stdin/stdout or in-memory buffers.
pub struct Shell<'a, S: Store, R: BufRead, W: Write> {
    ledger: &'a mut Ledger<S>,
    input: R,
    output: W,
    today: NaiveDate,
}

impl<'a, S: Store, R: BufRead, W: Write> Shell<'a, S, R, W> {
    pub fn new(ledger: &'a mut Ledger<S>, input: R, output: W) -> Self {
        Self {
            ledger,
            input,
            output,
            today: Local::now().date_naive(),
        }
    }

    /// Override the date used when a date prompt is left empty.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Run until the user picks Exit or input ends, then save.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "Welcome to the Personal Expense Tracker!")?;
        self.print_load_report()?;

        loop {
            match self.step() {
                Ok(true) => {}
                Ok(false) => break,
                Err(err) if err.is::<InputClosed>() => {
                    writeln!(self.output)?;
                    break;
                }
                Err(err) => {
                    writeln!(self.output, "An unexpected error occurred: {err:#}")?;
                    writeln!(self.output, "Please try again.")?;
                }
            }
        }

        // An unreadable file may still hold data; leave it alone on exit.
        if matches!(self.ledger.load_report().status, LoadStatus::Failed(_)) {
            writeln!(self.output, "Data file was not readable; leaving it untouched.")?;
        } else {
            writeln!(self.output, "Saving data...")?;
            if let Err(err) = self.ledger.save() {
                writeln!(self.output, "Error saving transactions: {err}")?;
            }
        }
        writeln!(self.output, "Thank you for using the Personal Expense Tracker!")?;
        Ok(())
    }

    /// One menu round. Returns false once the user asks to exit.
    fn step(&mut self) -> Result<bool> {
        self.print_menu()?;
        let action = self.prompt_menu_action()?;
        match action {
            MenuAction::Add => self.add_transaction()?,
            MenuAction::ViewAll => {
                let records = self.ledger.all();
                render::write_records(&mut self.output, "All Transactions", &records)?;
            }
            MenuAction::ViewByCategory => self.view_by_category()?,
            MenuAction::ViewByDateRange => self.view_by_date_range()?,
            MenuAction::Summary => {
                let summary = self.ledger.summary();
                render::write_summary(&mut self.output, &summary)?;
            }
            MenuAction::CategorySummary => {
                let summaries = self.ledger.category_summary();
                render::write_category_summary(&mut self.output, &summaries)?;
            }
            MenuAction::Exit => return Ok(false),
        }

        let rule = "-".repeat(50);
        self.read_line(&format!("\n{rule}\nPress Enter to continue..."))?;
        writeln!(self.output, "{rule}")?;
        Ok(true)
    }

    fn print_load_report(&mut self) -> Result<()> {
        let report = self.ledger.load_report().clone();
        let location = self.ledger.store().location();
        match &report.status {
            LoadStatus::Loaded => {
                writeln!(
                    self.output,
                    "Loaded {} transactions from {}",
                    report.loaded, location
                )?;
            }
            LoadStatus::Missing => {
                writeln!(
                    self.output,
                    "No existing data file found. A new one will be created at {}.",
                    location
                )?;
            }
            LoadStatus::Failed(reason) => {
                writeln!(self.output, "Error loading transactions: {reason}")?;
            }
        }
        for skipped in &report.skipped {
            writeln!(
                self.output,
                "Warning: skipped invalid row on line {}: {}",
                skipped.line, skipped.reason
            )?;
        }
        Ok(())
    }

    fn print_menu(&mut self) -> Result<()> {
        let rule = "=".repeat(50);
        writeln!(self.output)?;
        writeln!(self.output, "{rule}")?;
        writeln!(self.output, "$ Personal Expense Tracker $")?;
        writeln!(self.output, "{rule}")?;
        for (i, action) in MenuAction::ALL.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, action.label())?;
        }
        writeln!(self.output, "{rule}")?;
        Ok(())
    }

    fn add_transaction(&mut self) -> Result<()> {
        let rule = "-".repeat(50);
        writeln!(self.output, "\n{rule}\nAdd New Transaction\n{rule}")?;

        // Saving now would replace the unreadable file with only the new entry.
        if let LoadStatus::Failed(reason) = &self.ledger.load_report().status {
            writeln!(
                self.output,
                "Cannot add transactions: the data file could not be read ({reason})."
            )?;
            return Ok(());
        }

        let date = self.prompt_date("Enter date (DD/MM/YYYY), or press Enter for today: ")?;
        let category = self.read_line("Enter category: ")?;
        let description = self.read_line("Enter description: ")?;
        let amount = self.prompt_amount("Enter amount: $")?;
        let transaction_type = self.prompt_transaction_type()?;

        let required = [("Category", &category), ("Description", &description)];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.is_empty()) {
            writeln!(self.output, "{}", ValidationError::Required(field.to_string()))?;
            return Ok(());
        }

        let record = match Record::create(
            &date,
            &category,
            &description,
            amount,
            transaction_type.as_str(),
        ) {
            Ok(record) => record,
            Err(err) => {
                writeln!(self.output, "Error adding transaction: {err}")?;
                return Ok(());
            }
        };

        let shown = record.to_string();
        match self.ledger.add(record) {
            Ok(()) => {
                writeln!(self.output, "Transaction added successfully!")?;
                writeln!(self.output, "{shown}")?;
            }
            Err(err) => writeln!(self.output, "Error adding transaction: {err}")?,
        }
        Ok(())
    }

    fn view_by_category(&mut self) -> Result<()> {
        let categories: Vec<String> = self.ledger.categories().into_iter().collect();
        if categories.is_empty() {
            writeln!(self.output, "No categories found.")?;
            return Ok(());
        }

        let rule = "-".repeat(50);
        writeln!(self.output, "\n{rule}\nAvailable Categories:\n{rule}")?;
        for (i, category) in categories.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, category)?;
        }

        let choice = self.read_line("\nEnter category number or type category name: ")?;
        let selected = if !choice.is_empty() && choice.chars().all(|c| c.is_ascii_digit()) {
            let picked = choice
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| categories.get(i));
            match picked {
                Some(category) => category.clone(),
                None => {
                    writeln!(self.output, "Invalid category number.")?;
                    return Ok(());
                }
            }
        } else {
            choice
        };

        let records = self.ledger.by_category(&selected);
        render::write_records(
            &mut self.output,
            &format!("Transactions in '{selected}' Category"),
            &records,
        )?;
        Ok(())
    }

    fn view_by_date_range(&mut self) -> Result<()> {
        let rule = "-".repeat(50);
        writeln!(self.output, "\n{rule}\nEnter Date Range\n{rule}")?;
        let start = self.prompt_date("Enter start date (DD/MM/YYYY): ")?;
        let end = self.prompt_date("Enter end date (DD/MM/YYYY): ")?;

        if parse_date(&start)? > parse_date(&end)? {
            writeln!(self.output, "Start date must be before or equal to end date.")?;
            return Ok(());
        }

        match self.ledger.by_date_range(&start, &end) {
            Ok(records) => render::write_records(
                &mut self.output,
                &format!("Transactions from {start} to {end}"),
                &records,
            )?,
            Err(err) => writeln!(
                self.output,
                "Error viewing transactions by date range: {err}"
            )?,
        }
        Ok(())
    }

    fn prompt_menu_action(&mut self) -> Result<MenuAction> {
        loop {
            let choice = self.read_line("Enter your choice (1-7): ")?;
            match MenuAction::from_choice(&choice) {
                Some(action) => return Ok(action),
                None => writeln!(
                    self.output,
                    "Invalid choice. Please enter a number between 1 and 7."
                )?,
            }
        }
    }

    /// Ask for a date until one parses. Empty input means today.
    fn prompt_date(&mut self, prompt: &str) -> Result<String> {
        loop {
            let mut text = self.read_line(prompt)?;
            if text.is_empty() {
                text = self.today.format(DATE_FORMAT).to_string();
                writeln!(self.output, "Using today's date: {text}")?;
            }
            match parse_date(&text) {
                Ok(_) => return Ok(text),
                Err(_) => writeln!(
                    self.output,
                    "Invalid date format. Please use DD/MM/YYYY (e.g., 01/01/2025)"
                )?,
            }
        }
    }

    fn prompt_amount(&mut self, prompt: &str) -> Result<Cents> {
        loop {
            let text = self.read_line(prompt)?;
            match parse_cents(&text) {
                Ok(cents) if cents > 0 => return Ok(cents),
                Ok(_) => writeln!(self.output, "Amount must be greater than 0.")?,
                Err(_) => writeln!(self.output, "Invalid amount. Please enter a valid number.")?,
            }
        }
    }

    fn prompt_transaction_type(&mut self) -> Result<TransactionType> {
        loop {
            writeln!(self.output, "\nTransaction Type:\n1. Income\n2. Expense")?;
            match self.read_line("Choose transaction type (1 or 2): ")?.as_str() {
                "1" => return Ok(TransactionType::Income),
                "2" => return Ok(TransactionType::Expense),
                _ => writeln!(self.output, "Invalid choice. Please enter 1 or 2.")?,
            }
        }
    }

    fn read_line(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => return Err(InputClosed.into()),
            Ok(_) => {}
            Err(err) => {
                tracing::warn!("failed to read input: {err}");
                return Err(InputClosed.into());
            }
        }
        Ok(line.trim().to_string())
    }
}
