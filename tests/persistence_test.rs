mod common;

use std::fs;

use anyhow::Result;
use common::{FailingStore, add_all, july_entries, ledger_path, record, test_ledger};
use pennywise::Ledger;
use pennywise::application::{AppError, LoadStatus};
use tempfile::TempDir;

#[test]
fn test_round_trip_through_file() -> Result<()> {
    let (mut ledger, temp) = test_ledger()?;
    let entries = july_entries();
    add_all(&mut ledger, entries.clone())?;

    let reopened = Ledger::open(ledger_path(&temp));

    assert_eq!(reopened.load_report().status, LoadStatus::Loaded);
    assert_eq!(reopened.load_report().loaded, entries.len());
    assert!(reopened.load_report().skipped.is_empty());
    assert_eq!(reopened.all(), entries);
    assert_eq!(reopened.summary(), ledger.summary());
    Ok(())
}

#[test]
fn test_every_add_rewrites_the_whole_file() -> Result<()> {
    let (mut ledger, temp) = test_ledger()?;
    let path = ledger_path(&temp);

    ledger.add(record("01/07/2025", "food", "Lunch", 1550, "expense"))?;
    let after_one = fs::read_to_string(&path)?;
    assert_eq!(after_one.lines().count(), 2);

    ledger.add(record("14/07/2025", "wages", "Pay", 100000, "income"))?;
    let contents = fs::read_to_string(&path)?;
    assert_eq!(
        contents.lines().collect::<Vec<_>>(),
        vec![
            "date,category,description,amount,transaction_type",
            "01/07/2025,Food,Lunch,15.50,expense",
            "14/07/2025,Wages,Pay,1000.00,income",
        ]
    );
    Ok(())
}

#[test]
fn test_missing_file_starts_empty() -> Result<()> {
    let (ledger, temp) = test_ledger()?;

    assert_eq!(ledger.load_report().status, LoadStatus::Missing);
    assert!(ledger.is_empty());
    // Opening alone does not create the file
    assert!(!ledger_path(&temp).exists());
    Ok(())
}

#[test]
fn test_invalid_rows_are_skipped_and_reported() -> Result<()> {
    let temp = TempDir::new()?;
    let path = ledger_path(&temp);
    fs::write(
        &path,
        "date,category,description,amount,transaction_type\n\
         01/07/2025,Food,Lunch,15.50,expense\n\
         2025-07-02,Food,Bad date,3.00,expense\n\
         03/07/2025,Food,Bad type,3.00,food\n\
         04/07/2025,Food,Bad amount,three,expense\n\
         05/07/2025,Food,Too few columns\n\
         06/07/25,Food,Short year,3.00,expense\n\
         07/07/2025,Wages,Windfall,100000000000.01,income\n\
         14/07/2025,wages,Pay,1000,income\n",
    )?;

    let ledger = Ledger::open(&path);
    let report = ledger.load_report();

    assert_eq!(report.status, LoadStatus::Loaded);
    assert_eq!(report.loaded, 2);
    let skipped_lines: Vec<u64> = report.skipped.iter().map(|s| s.line).collect();
    assert_eq!(skipped_lines, vec![3, 4, 5, 6, 7, 8]);
    assert!(report.skipped[0].reason.contains("DD/MM/YYYY"));
    assert!(report.skipped[1].reason.contains("income"));
    assert!(report.skipped[4].reason.contains("DD/MM/YYYY"));
    assert!(report.skipped[5].reason.contains("must not exceed"));

    let descriptions: Vec<String> = ledger
        .all()
        .iter()
        .map(|r| r.description().to_string())
        .collect();
    assert_eq!(descriptions, vec!["Lunch", "Pay"]);
    Ok(())
}

#[test]
fn test_loaded_rows_are_normalized() -> Result<()> {
    let temp = TempDir::new()?;
    let path = ledger_path(&temp);
    fs::write(
        &path,
        "date,category,description,amount,transaction_type\n\
         01/07/2025,  eating out ,  Pizza  ,-24.5,EXPENSE\n",
    )?;

    let ledger = Ledger::open(&path);
    let records = ledger.all();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].category(), "Eating Out");
    assert_eq!(records[0].description(), "Pizza");
    assert_eq!(records[0].amount(), 2450);
    assert!(records[0].is_expense());
    Ok(())
}

#[test]
fn test_unreadable_store_leaves_ledger_empty() -> Result<()> {
    let temp = TempDir::new()?;
    // A directory where the file should be cannot be read as CSV
    let path = ledger_path(&temp);
    fs::create_dir(&path)?;

    let ledger = Ledger::open(&path);

    assert!(matches!(ledger.load_report().status, LoadStatus::Failed(_)));
    assert!(ledger.is_empty());
    Ok(())
}

#[test]
fn test_failed_save_rolls_back_add() -> Result<()> {
    let mut ledger = Ledger::with_store(FailingStore);

    let err = ledger
        .add(record("01/07/2025", "food", "Lunch", 1550, "expense"))
        .unwrap_err();

    assert!(matches!(err, AppError::Persistence(_)));
    assert!(err.to_string().contains("disk full"));
    assert!(ledger.is_empty());
    assert_eq!(ledger.summary().total_transactions, 0);
    Ok(())
}

#[test]
fn test_failed_save_keeps_previous_file() -> Result<()> {
    let (mut ledger, temp) = test_ledger()?;
    let path = ledger_path(&temp);
    ledger.add(record("01/07/2025", "food", "Lunch", 1550, "expense"))?;
    let before = fs::read_to_string(&path)?;

    fs::create_dir(ledger.store().temp_path())?;
    let result = ledger.add(record("14/07/2025", "wages", "Pay", 100000, "income"));

    assert!(matches!(result, Err(AppError::Persistence(_))));
    assert_eq!(ledger.len(), 1);
    assert_eq!(fs::read_to_string(&path)?, before);
    assert_eq!(Ledger::open(&path).all(), ledger.all());
    Ok(())
}

#[test]
fn test_store_in_missing_directory_fails_on_add() -> Result<()> {
    let temp = TempDir::new()?;
    let mut ledger = Ledger::open(temp.path().join("nope").join("ledger.csv"));
    assert_eq!(ledger.load_report().status, LoadStatus::Missing);

    let result = ledger.add(record("01/07/2025", "food", "Lunch", 1550, "expense"));

    assert!(matches!(result, Err(AppError::Persistence(_))));
    assert!(ledger.is_empty());
    Ok(())
}
