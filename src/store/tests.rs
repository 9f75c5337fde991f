#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::db::{Database, MemoryStore};
use crate::summary::aggregate;

fn empty_store() -> (TransactionStore, MemoryStore) {
    let kv = MemoryStore::default();
    (TransactionStore::load(Box::new(kv.clone())), kv)
}

fn input(text: &str, amount: &str, is_expense: bool, date_time: &str) -> TransactionInput {
    TransactionInput::new(text, amount, is_expense, date_time)
}

// ── load ──────────────────────────────────────────────────────

#[test]
fn test_load_absent_is_empty() {
    let (store, kv) = empty_store();
    assert!(store.is_empty());
    assert_eq!(store.revision(), 0);
    assert_eq!(kv.writes(), 0);
}

#[test]
fn test_load_not_json_is_empty() {
    let kv = MemoryStore::with_value(STORAGE_KEY, "not-json");
    let store = TransactionStore::load(Box::new(kv.clone()));
    assert!(store.is_empty());
    // Loading never rewrites the bad value.
    assert_eq!(kv.value(STORAGE_KEY).as_deref(), Some("not-json"));
}

#[test]
fn test_load_wrong_shape_is_empty() {
    for raw in [r#"{"id":1}"#, r#"[{"id":"x"}]"#, "42", r#"[{"text":"no id"}]"#] {
        let kv = MemoryStore::with_value(STORAGE_KEY, raw);
        assert!(TransactionStore::load(Box::new(kv)).is_empty(), "{raw}");
    }
}

#[test]
fn test_load_web_client_format() {
    let raw = r#"[
        {"id":1700000000002,"text":"Coffee","amount":-4.5,"dateTime":"2024-03-01T08:15:00.000Z"},
        {"id":1700000000001,"text":"Salary","amount":5000,"dateTime":"2024-02-28T09:00:00.000Z"}
    ]"#;
    let store = TransactionStore::load(Box::new(MemoryStore::with_value("exp-z-data", raw)));
    assert_eq!(store.len(), 2);
    let coffee = store.get(1_700_000_000_002).unwrap();
    assert_eq!(coffee.amount, dec!(-4.5));
    assert_eq!(coffee.date_time, "2024-03-01T08:15:00.000Z");
}

#[test]
fn test_load_skips_out_of_range_records() {
    let raw = r#"[
        {"id":1,"text":"Keep","amount":-4.5,"dateTime":"2024-03-01T08:15:00"},
        {"id":2,"text":"Huge","amount":1e30,"dateTime":"2024-03-01T09:00:00"},
        {"id":3,"text":"Broken","dateTime":"2024-03-01T10:00:00"}
    ]"#;
    let kv = MemoryStore::with_value(STORAGE_KEY, raw);
    let mut store = TransactionStore::load(Box::new(kv.clone()));
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(1).unwrap().text, "Keep");

    store.add(&input("New", "1", true, "2024-03-02")).unwrap();
    let persisted: Vec<Transaction> =
        serde_json::from_str(&kv.value(STORAGE_KEY).unwrap()).unwrap();
    let texts: Vec<&str> = persisted.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["New", "Keep"]);
}

#[test]
fn test_ids_after_load_exceed_loaded_ids() {
    let far_future = i64::MAX / 2;
    let raw = format!(r#"[{{"id":{far_future},"text":"x","amount":1,"dateTime":"2024-01-01"}}]"#);
    let mut store = TransactionStore::load(Box::new(MemoryStore::with_value(STORAGE_KEY, &raw)));
    let txn = store
        .add(&input("y", "2", false, "2024-01-02"))
        .unwrap()
        .unwrap();
    assert_eq!(txn.id, far_future + 1);
}

// ── add ───────────────────────────────────────────────────────

#[test]
fn test_add_expense_and_income() {
    let (mut store, kv) = empty_store();
    let lunch = store
        .add(&input("Lunch", "20.50", true, "2024-03-01T12:00"))
        .unwrap()
        .unwrap();
    assert_eq!(lunch.amount, dec!(-20.5));
    let salary = store
        .add(&input("Salary", "5000", false, "2024-03-01T09:00"))
        .unwrap()
        .unwrap();
    assert_eq!(salary.amount, dec!(5000));

    let totals = aggregate(store.transactions());
    assert_eq!(totals.balance_str(), "4979.50");
    assert_eq!(totals.income_str(), "5000.00");
    assert_eq!(totals.expense_str(), "20.50");
    assert_eq!(kv.writes(), 2);
}

#[test]
fn test_add_prepends() {
    let (mut store, _kv) = empty_store();
    let first = store.add(&input("a", "1", true, "2024-01-01")).unwrap().unwrap();
    let second = store.add(&input("b", "1", true, "2023-01-01")).unwrap().unwrap();
    let ids: Vec<i64> = store.transactions().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[test]
fn test_add_ids_strictly_increase() {
    let (mut store, _kv) = empty_store();
    let mut last = 0;
    for i in 0..50 {
        let txn = store
            .add(&input(&format!("t{i}"), "1", true, "2024-01-01"))
            .unwrap()
            .unwrap();
        assert!(txn.id > last);
        last = txn.id;
    }
}

#[test]
fn test_add_empty_text_is_noop() {
    let (mut store, kv) = empty_store();
    let result = store.add(&input("", "10", true, "2024-01-01")).unwrap();
    assert!(result.is_none());
    assert!(store.is_empty());
    assert_eq!(store.revision(), 0);
    assert_eq!(kv.writes(), 0);
}

#[test]
fn test_add_bad_amount_is_noop() {
    let (mut store, kv) = empty_store();
    assert!(store.add(&input("x", "", true, "2024-01-01")).unwrap().is_none());
    assert!(store.add(&input("x", "abc", true, "2024-01-01")).unwrap().is_none());
    assert!(store.add(&input("x", "0", true, "2024-01-01")).unwrap().is_none());
    assert!(store.is_empty());
    assert_eq!(kv.writes(), 0);
}

#[test]
fn test_maximal_amounts_add_and_aggregate() {
    let (mut store, _kv) = empty_store();
    let cap = crate::models::MAX_AMOUNT.to_string();
    for text in ["Big", "Bigger"] {
        assert!(store
            .add(&input(text, cap.as_str(), false, "2024-03-01T10:00"))
            .unwrap()
            .is_some());
    }
    assert!(store
        .add(&input("Too big", "50000000000000000000000000000", false, "2024-03-01"))
        .unwrap()
        .is_none());

    let totals = aggregate(store.transactions());
    assert_eq!(totals.income, Decimal::from(crate::models::MAX_AMOUNT) * Decimal::TWO);
    assert_eq!(crate::history::group_by_day(store.transactions())[0].total, totals.income);
}

#[test]
fn test_add_persists_full_collection() {
    let (mut store, kv) = empty_store();
    store.add(&input("a", "1", true, "2024-01-01")).unwrap();
    store.add(&input("b", "2", false, "2024-01-02")).unwrap();
    let persisted: Vec<Transaction> =
        serde_json::from_str(&kv.value(STORAGE_KEY).unwrap()).unwrap();
    assert_eq!(persisted, store.transactions());
}

#[test]
fn test_add_then_delete_restores_collection() {
    let raw = r#"[{"id":5,"text":"Old","amount":-3,"dateTime":"2024-01-01T00:00:00"}]"#;
    let mut store = TransactionStore::load(Box::new(MemoryStore::with_value(STORAGE_KEY, raw)));
    let before = store.transactions().to_vec();
    let added = store.add(&input("New", "9", false, "2024-01-02")).unwrap().unwrap();
    store.delete(added.id).unwrap();
    assert_eq!(store.transactions(), before.as_slice());
}

// ── edit ──────────────────────────────────────────────────────

#[test]
fn test_edit_keeps_id_and_persists() {
    let (mut store, kv) = empty_store();
    let txn = store.add(&input("Lunch", "12", true, "2024-03-01T12:00")).unwrap().unwrap();
    let patch = TransactionPatch {
        text: Some("Dinner".into()),
        amount: Some("30".into()),
        ..Default::default()
    };
    let updated = store.edit(txn.id, &patch).unwrap().unwrap();
    assert_eq!(updated.id, txn.id);
    assert_eq!(updated.text, "Dinner");
    assert_eq!(updated.amount, dec!(-30));
    assert_eq!(store.get(txn.id), Some(&updated));
    assert_eq!(kv.writes(), 2);
}

#[test]
fn test_edit_unknown_id_is_noop() {
    let (mut store, kv) = empty_store();
    store.add(&input("a", "1", true, "2024-01-01")).unwrap();
    let patch = TransactionPatch {
        text: Some("b".into()),
        ..Default::default()
    };
    assert!(store.edit(-1, &patch).unwrap().is_none());
    assert_eq!(kv.writes(), 1);
    assert_eq!(store.revision(), 1);
}

#[test]
fn test_edit_invalid_patch_is_noop() {
    let (mut store, kv) = empty_store();
    let txn = store.add(&input("a", "1", true, "2024-01-01")).unwrap().unwrap();
    let patch = TransactionPatch {
        text: Some("   ".into()),
        ..Default::default()
    };
    assert!(store.edit(txn.id, &patch).unwrap().is_none());
    assert_eq!(store.get(txn.id).unwrap().text, "a");
    assert_eq!(kv.writes(), 1);
}

#[test]
fn test_edit_without_change_does_not_persist() {
    let (mut store, kv) = empty_store();
    let txn = store.add(&input("a", "1", true, "2024-01-01")).unwrap().unwrap();
    let patch = TransactionPatch {
        text: Some("a".into()),
        ..Default::default()
    };
    assert_eq!(store.edit(txn.id, &patch).unwrap(), Some(txn));
    assert_eq!(kv.writes(), 1);
    assert_eq!(store.revision(), 1);
}

#[test]
fn test_edit_flips_direction() {
    let (mut store, _kv) = empty_store();
    let txn = store.add(&input("Refund", "15", true, "2024-01-01")).unwrap().unwrap();
    let patch = TransactionPatch {
        is_expense: Some(false),
        ..Default::default()
    };
    assert_eq!(store.edit(txn.id, &patch).unwrap().unwrap().amount, dec!(15));
}

// ── delete ────────────────────────────────────────────────────

#[test]
fn test_delete_removes_and_persists() {
    let (mut store, kv) = empty_store();
    let a = store.add(&input("a", "1", true, "2024-01-01")).unwrap().unwrap();
    let b = store.add(&input("b", "2", true, "2024-01-02")).unwrap().unwrap();
    assert_eq!(store.delete(a.id).unwrap(), Some(a));
    assert_eq!(store.transactions(), std::slice::from_ref(&b));
    assert_eq!(kv.writes(), 3);
}

#[test]
fn test_delete_unknown_id_is_noop() {
    let (mut store, kv) = empty_store();
    assert!(store.delete(99).unwrap().is_none());
    assert_eq!(kv.writes(), 0);
    assert_eq!(store.revision(), 0);
}

// ── Snapshot & persistence ────────────────────────────────────

#[test]
fn test_export_snapshot_does_not_mutate() {
    let (mut store, kv) = empty_store();
    store.add(&input("a", "1", true, "2024-01-01")).unwrap();
    let before = store.transactions().to_vec();
    let snapshot = store.export_snapshot().unwrap();
    let parsed: Vec<Transaction> = serde_json::from_slice(&snapshot).unwrap();
    assert_eq!(parsed, before);
    assert_eq!(store.transactions(), before.as_slice());
    assert_eq!(kv.writes(), 1);
}

#[test]
fn test_revision_bumps_on_each_mutation() {
    let (mut store, _kv) = empty_store();
    let txn = store.add(&input("a", "1", true, "2024-01-01")).unwrap().unwrap();
    assert_eq!(store.revision(), 1);
    store
        .edit(
            txn.id,
            &TransactionPatch {
                amount: Some("2".into()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(store.revision(), 2);
    store.delete(txn.id).unwrap();
    assert_eq!(store.revision(), 3);
}

#[test]
fn test_sqlite_roundtrip_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("expz.db");
    let added = {
        let mut store = TransactionStore::load(Box::new(Database::open(&path).unwrap()));
        store
            .add(&input("Groceries", "55.10", true, "2024-03-05 18:00"))
            .unwrap()
            .unwrap()
    };
    let store = TransactionStore::load(Box::new(Database::open(&path).unwrap()));
    assert_eq!(store.transactions(), std::slice::from_ref(&added));
}
