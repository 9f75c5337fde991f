#![allow(clippy::unwrap_used)]

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rust_decimal_macros::dec;
use std::path::PathBuf;

use super::*;
use crate::db::MemoryStore;
use crate::ui::app::DashboardView;

fn setup() -> (App, TransactionStore) {
    let store = TransactionStore::load(Box::new(MemoryStore::default()));
    let mut app = App::new(PathBuf::from("."));
    app.refresh(&store);
    (app, store)
}

fn press(code: KeyCode, app: &mut App, store: &mut TransactionStore) {
    handle_key(KeyEvent::new(code, KeyModifiers::NONE), app, store).unwrap();
    app.refresh(store);
}

fn type_str(s: &str, app: &mut App, store: &mut TransactionStore) {
    for c in s.chars() {
        press(KeyCode::Char(c), app, store);
    }
}

fn clear_field(app: &mut App, store: &mut TransactionStore) {
    for _ in 0..40 {
        press(KeyCode::Backspace, app, store);
    }
}

#[test]
fn test_add_through_form() {
    let (mut app, mut store) = setup();
    press(KeyCode::Char('a'), &mut app, &mut store);
    assert_eq!(app.input_mode, InputMode::Form);

    type_str("Lunch", &mut app, &mut store);
    press(KeyCode::Tab, &mut app, &mut store);
    type_str("20.50", &mut app, &mut store);
    press(KeyCode::Tab, &mut app, &mut store);
    press(KeyCode::Tab, &mut app, &mut store);
    clear_field(&mut app, &mut store);
    type_str("2024-03-01T12:00", &mut app, &mut store);
    press(KeyCode::Enter, &mut app, &mut store);

    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.form.is_none());
    let txn = &store.transactions()[0];
    assert_eq!(txn.text, "Lunch");
    assert_eq!(txn.amount, dec!(-20.5));
    assert_eq!(txn.date_time, "2024-03-01T12:00:00");
}

#[test]
fn test_invalid_form_stays_open() {
    let (mut app, mut store) = setup();
    press(KeyCode::Char('a'), &mut app, &mut store);
    press(KeyCode::Tab, &mut app, &mut store);
    type_str("10", &mut app, &mut store);
    press(KeyCode::Enter, &mut app, &mut store);

    assert_eq!(app.input_mode, InputMode::Form);
    assert!(app.form.is_some());
    assert!(store.is_empty());

    press(KeyCode::Esc, &mut app, &mut store);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.form.is_none());
}

#[test]
fn test_income_toggle_in_form() {
    let (mut app, mut store) = setup();
    press(KeyCode::Char('a'), &mut app, &mut store);
    type_str("Salary", &mut app, &mut store);
    press(KeyCode::Tab, &mut app, &mut store);
    type_str("5000", &mut app, &mut store);
    press(KeyCode::Tab, &mut app, &mut store);
    press(KeyCode::Right, &mut app, &mut store);
    press(KeyCode::Enter, &mut app, &mut store);

    assert_eq!(store.transactions()[0].amount, dec!(5000));
}

#[test]
fn test_edit_and_delete_from_history() {
    let (mut app, mut store) = setup();
    commands::handle_command("add Lunch 12", &mut app, &mut store).unwrap();
    app.refresh(&store);

    press(KeyCode::Char('2'), &mut app, &mut store);
    assert_eq!(app.screen, Screen::History);
    press(KeyCode::Char('e'), &mut app, &mut store);
    assert_eq!(app.input_mode, InputMode::Form);

    press(KeyCode::Tab, &mut app, &mut store);
    clear_field(&mut app, &mut store);
    type_str("15", &mut app, &mut store);
    press(KeyCode::Enter, &mut app, &mut store);
    let id = store.transactions()[0].id;
    assert_eq!(store.get(id).unwrap().amount, dec!(-15));

    press(KeyCode::Char('D'), &mut app, &mut store);
    assert_eq!(app.input_mode, InputMode::Confirm);
    press(KeyCode::Char('n'), &mut app, &mut store);
    assert_eq!(store.len(), 1);

    press(KeyCode::Char('D'), &mut app, &mut store);
    press(KeyCode::Char('y'), &mut app, &mut store);
    assert!(store.is_empty());
    assert_eq!(app.status_message, "Deleted: Lunch");
}

#[test]
fn test_command_mode() {
    let (mut app, mut store) = setup();
    press(KeyCode::Char(':'), &mut app, &mut store);
    assert_eq!(app.input_mode, InputMode::Command);
    type_str("month 2024-02", &mut app, &mut store);
    press(KeyCode::Enter, &mut app, &mut store);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.current_month, "2024-02");

    press(KeyCode::Char('L'), &mut app, &mut store);
    assert_eq!(app.current_month, "2024-03");
    press(KeyCode::Char('H'), &mut app, &mut store);
    press(KeyCode::Char('H'), &mut app, &mut store);
    assert_eq!(app.current_month, "2024-01");
}

#[test]
fn test_view_toggle_and_quit() {
    let (mut app, mut store) = setup();
    press(KeyCode::Char('v'), &mut app, &mut store);
    assert_eq!(app.view, DashboardView::Balance);
    press(KeyCode::Tab, &mut app, &mut store);
    assert_eq!(app.screen, Screen::History);

    handle_key(
        KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL),
        &mut app,
        &mut store,
    )
    .unwrap();
    assert!(!app.running);
}
