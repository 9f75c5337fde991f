#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;
use crate::db::MemoryStore;
use crate::models::Transaction;

fn argv(parts: &[&str]) -> Vec<String> {
    std::iter::once("expz")
        .chain(parts.iter().copied())
        .map(String::from)
        .collect()
}

fn setup() -> (TransactionStore, Config, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let config = Config::with_dirs(&tmp.path().join("data"), &tmp.path().join("out")).unwrap();
    let store = TransactionStore::load(Box::new(MemoryStore::default()));
    (store, config, tmp)
}

fn run(parts: &[&str], store: &mut TransactionStore, config: &Config) -> Result<()> {
    as_cli(&argv(parts), store, config)
}

// ── Argument helpers ──────────────────────────────────────────

#[test]
fn test_positionals_skip_flag_values() {
    let args: Vec<String> = ["Coffee", "beans", "--at", "2024-01-01", "4.5", "--income"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(positionals(&args), vec!["Coffee", "beans", "4.5"]);
    assert_eq!(flag_value(&args, "--at"), Some("2024-01-01"));
    assert!(has_flag(&args, "--income"));
    assert!(!has_flag(&args, "--csv"));
}

#[test]
fn test_positionals_keep_negative_numbers() {
    let args: Vec<String> = ["Refund", "-12.5"].iter().map(|s| s.to_string()).collect();
    assert_eq!(positionals(&args), vec!["Refund", "-12.5"]);
}

// ── add / edit / delete ───────────────────────────────────────

#[test]
fn test_add_expense_by_default() {
    let (mut store, config, _tmp) = setup();
    run(&["add", "Lunch", "20.50", "--at", "2024-03-01T12:00"], &mut store, &config).unwrap();
    let txn = &store.transactions()[0];
    assert_eq!(txn.text, "Lunch");
    assert_eq!(txn.amount, dec!(-20.5));
    assert_eq!(txn.date_time, "2024-03-01T12:00:00");
}

#[test]
fn test_add_income_multi_word() {
    let (mut store, config, _tmp) = setup();
    run(&["add", "Monthly", "salary", "5000", "--income"], &mut store, &config).unwrap();
    let txn = &store.transactions()[0];
    assert_eq!(txn.text, "Monthly salary");
    assert_eq!(txn.amount, dec!(5000));
}

#[test]
fn test_add_rejects_invalid() {
    let (mut store, config, _tmp) = setup();
    assert!(run(&["add", "Lunch", "0"], &mut store, &config).is_err());
    assert!(run(&["add", "Lunch", "abc"], &mut store, &config).is_err());
    assert!(run(&["add", "20"], &mut store, &config).is_err());
    assert!(run(&["add", "Lunch", "5", "--at", "yesterday"], &mut store, &config).is_err());
    assert!(store.is_empty());
}

#[test]
fn test_edit_and_delete() {
    let (mut store, config, _tmp) = setup();
    run(&["add", "Lunch", "12", "--at", "2024-03-01"], &mut store, &config).unwrap();
    let id = store.transactions()[0].id.to_string();

    run(&["edit", &id, "--amount", "15", "--income"], &mut store, &config).unwrap();
    assert_eq!(store.transactions()[0].amount, dec!(15));
    assert_eq!(store.transactions()[0].text, "Lunch");

    run(&["delete", &id], &mut store, &config).unwrap();
    assert!(store.is_empty());
}

#[test]
fn test_edit_errors() {
    let (mut store, config, _tmp) = setup();
    run(&["add", "Lunch", "12"], &mut store, &config).unwrap();
    let id = store.transactions()[0].id.to_string();

    assert!(run(&["edit", &id], &mut store, &config).is_err());
    assert!(run(&["edit", "42", "--text", "x"], &mut store, &config).is_err());
    assert!(run(&["edit", "nope", "--text", "x"], &mut store, &config).is_err());
    assert!(run(&["edit", &id, "--income", "--expense"], &mut store, &config).is_err());
    assert!(run(&["edit", &id, "--amount", "0"], &mut store, &config).is_err());
    assert_eq!(store.transactions()[0].amount, dec!(-12));
}

#[test]
fn test_delete_unknown_id_fails() {
    let (mut store, config, _tmp) = setup();
    assert!(run(&["delete", "7"], &mut store, &config).is_err());
    assert!(run(&["delete"], &mut store, &config).is_err());
}

// ── Read-only commands ────────────────────────────────────────

#[test]
fn test_summary_and_history_run() {
    let (mut store, config, _tmp) = setup();
    run(&["add", "Lunch", "20.50", "--at", "2024-03-01T12:00"], &mut store, &config).unwrap();
    run(&["summary", "2024-03"], &mut store, &config).unwrap();
    run(&["summary"], &mut store, &config).unwrap();
    run(&["history", "--month", "2024-03"], &mut store, &config).unwrap();
    run(&["history"], &mut store, &config).unwrap();
    assert!(run(&["summary", "2024-13"], &mut store, &config).is_err());
}

#[test]
fn test_unknown_command_fails() {
    let (mut store, config, _tmp) = setup();
    assert!(run(&["frobnicate"], &mut store, &config).is_err());
    run(&["--version"], &mut store, &config).unwrap();
    run(&["help"], &mut store, &config).unwrap();
}

// ── export ────────────────────────────────────────────────────

#[test]
fn test_export_json_to_default_dir() {
    let (mut store, config, _tmp) = setup();
    run(&["add", "Lunch", "20.50", "--at", "2024-03-01T12:00"], &mut store, &config).unwrap();
    run(&["export"], &mut store, &config).unwrap();

    let name = export::backup_file_name(Local::now().date_naive());
    let bytes = std::fs::read(config.export_dir.join(name)).unwrap();
    let parsed: Vec<Transaction> = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(parsed, store.transactions());
}

#[test]
fn test_export_csv_for_month() {
    let (mut store, config, tmp) = setup();
    run(&["add", "Lunch", "20.50", "--at", "2024-03-01T12:00"], &mut store, &config).unwrap();
    run(&["add", "Rent", "900", "--at", "2024-02-01"], &mut store, &config).unwrap();

    let dir = tmp.path().join("csv");
    let dir_arg = dir.to_str().unwrap();
    run(&["export", dir_arg, "--csv", "--month", "2024-03"], &mut store, &config).unwrap();

    let content = std::fs::read_to_string(dir.join("expz-export-2024-03.csv")).unwrap();
    assert_eq!(content.lines().count(), 2);
    assert!(content.contains("Lunch"));
    assert!(!content.contains("Rent"));
}

#[test]
fn test_export_json_rejects_month() {
    let (mut store, config, _tmp) = setup();
    assert!(run(&["export", "--month", "2024-03"], &mut store, &config).is_err());
}
