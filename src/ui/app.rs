use chrono::Local;
use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::history::{day_label_now, format_time, group_by_day};
use crate::models::{Transaction, TransactionInput, TransactionPatch};
use crate::store::TransactionStore;
use crate::summary::{self, filter_by_month, shift_month, Totals};
use crate::ui::util::{first_selectable, keep_visible, step_selectable};

/// Months shown in the spending trend.
const TREND_MONTHS: i32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    History,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Dashboard, Self::History]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::History => write!(f, "History"),
        }
    }
}

/// Expenses: the selected month's spending. Balance: all-time totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DashboardView {
    Expenses,
    Balance,
}

impl DashboardView {
    pub(crate) fn toggle(self) -> Self {
        match self {
            Self::Expenses => Self::Balance,
            Self::Balance => Self::Expenses,
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "expenses" | "expense" | "e" => Some(Self::Expenses),
            "balance" | "b" => Some(Self::Balance),
            _ => None,
        }
    }
}

impl std::fmt::Display for DashboardView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expenses => write!(f, "Expenses"),
            Self::Balance => write!(f, "Balance"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Form,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Form => write!(f, "FORM"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PendingAction {
    DeleteTransaction { id: i64, text: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormField {
    Text,
    Amount,
    Direction,
    DateTime,
}

impl FormField {
    pub(crate) const ORDER: [FormField; 4] = [Self::Text, Self::Amount, Self::Direction, Self::DateTime];

    fn step(self, delta: isize) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0) as isize;
        let len = Self::ORDER.len() as isize;
        Self::ORDER[(idx + delta).rem_euclid(len) as usize]
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Text => "Description",
            Self::Amount => "Amount",
            Self::Direction => "Type",
            Self::DateTime => "Date & time",
        }
    }
}

/// Add/edit modal. `editing` holds the original when changing an existing
/// transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TransactionForm {
    pub(crate) editing: Option<Transaction>,
    pub(crate) input: TransactionInput,
    pub(crate) field: FormField,
}

impl TransactionForm {
    pub(crate) fn for_add(now: String) -> Self {
        Self {
            editing: None,
            input: TransactionInput::new("", "", true, now),
            field: FormField::Text,
        }
    }

    pub(crate) fn for_edit(txn: &Transaction) -> Self {
        Self {
            editing: Some(txn.clone()),
            input: TransactionInput::from_transaction(txn),
            field: FormField::Text,
        }
    }

    pub(crate) fn title(&self) -> &'static str {
        if self.editing.is_some() {
            " Edit Transaction "
        } else {
            " Add Transaction "
        }
    }

    pub(crate) fn next_field(&mut self) {
        self.field = self.field.step(1);
    }

    pub(crate) fn prev_field(&mut self) {
        self.field = self.field.step(-1);
    }

    pub(crate) fn toggle_direction(&mut self) {
        self.input.is_expense = !self.input.is_expense;
    }

    pub(crate) fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Text => &self.input.text,
            FormField::Amount => &self.input.amount,
            FormField::Direction => {
                if self.input.is_expense {
                    "Expense"
                } else {
                    "Income"
                }
            }
            FormField::DateTime => &self.input.date_time,
        }
    }

    pub(crate) fn push(&mut self, c: char) {
        match self.field {
            FormField::Text => self.input.text.push(c),
            FormField::Amount => self.input.amount.push(c),
            FormField::DateTime => self.input.date_time.push(c),
            FormField::Direction => {
                if c == ' ' {
                    self.toggle_direction();
                }
            }
        }
    }

    pub(crate) fn pop(&mut self) {
        match self.field {
            FormField::Text => {
                self.input.text.pop();
            }
            FormField::Amount => {
                self.input.amount.pop();
            }
            FormField::DateTime => {
                self.input.date_time.pop();
            }
            FormField::Direction => {}
        }
    }

    /// Every field as a replacement, except an untouched timestamp so stored
    /// values keep their exact text.
    pub(crate) fn to_patch(&self) -> TransactionPatch {
        let unchanged_time = self
            .editing
            .as_ref()
            .is_some_and(|orig| orig.date_time == self.input.date_time);
        TransactionPatch {
            text: Some(self.input.text.clone()),
            amount: Some(self.input.amount.clone()),
            is_expense: Some(self.input.is_expense),
            date_time: (!unchanged_time).then(|| self.input.date_time.clone()),
        }
    }
}

/// One line of the history list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HistoryRow {
    Day {
        label: String,
        total: Decimal,
        count: usize,
    },
    Item {
        id: i64,
        time: String,
        text: String,
        amount: Decimal,
    },
}

impl HistoryRow {
    pub(crate) fn id(&self) -> Option<i64> {
        match self {
            Self::Item { id, .. } => Some(*id),
            Self::Day { .. } => None,
        }
    }
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) current_month: String,
    pub(crate) view: DashboardView,
    pub(crate) export_dir: PathBuf,

    // Derived from the store; see `refresh`
    pub(crate) all_time: Totals,
    pub(crate) monthly: Totals,
    pub(crate) month_count: usize,
    pub(crate) daily_spending: Vec<(String, Decimal)>,
    pub(crate) spending_trend: Vec<(String, Decimal)>,
    pub(crate) history: Vec<HistoryRow>,
    pub(crate) transaction_count: usize,
    cache_key: Option<(u64, String)>,

    // History cursor
    pub(crate) history_index: usize,
    pub(crate) history_scroll: usize,

    pub(crate) form: Option<TransactionForm>,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(export_dir: PathBuf) -> Self {
        Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,
            current_month: summary::current_month(),
            view: DashboardView::Expenses,
            export_dir,

            all_time: Totals::default(),
            monthly: Totals::default(),
            month_count: 0,
            daily_spending: Vec::new(),
            spending_trend: Vec::new(),
            history: Vec::new(),
            transaction_count: 0,
            cache_key: None,

            history_index: 0,
            history_scroll: 0,

            form: None,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    /// Recompute derived views when the store or the selected month changed
    /// since the last call. Returns whether anything was recomputed.
    pub(crate) fn refresh(&mut self, store: &TransactionStore) -> bool {
        let key = (store.revision(), self.current_month.clone());
        if self.cache_key.as_ref() == Some(&key) {
            return false;
        }

        let txns = store.transactions();
        self.all_time = summary::all_time(txns);
        let month_txns = filter_by_month(txns, &self.current_month);
        self.monthly = summary::aggregate(month_txns.iter().copied());
        self.month_count = month_txns.len();

        let mut daily: Vec<(String, Decimal)> = group_by_day(month_txns)
            .iter()
            .map(|g| (g.day.clone(), summary::aggregate(g.transactions.iter().copied()).expense))
            .collect();
        daily.reverse();
        self.daily_spending = daily;

        self.spending_trend = (0..TREND_MONTHS)
            .rev()
            .filter_map(|back| shift_month(&self.current_month, -back))
            .map(|m| {
                let spent = summary::monthly(txns, &m).expense;
                (m, spent)
            })
            .collect();

        self.history = build_history(txns);
        self.transaction_count = txns.len();
        self.cache_key = Some(key);
        self.clamp_history_cursor();
        true
    }

    pub(crate) fn set_month(&mut self, month: String) {
        self.current_month = month;
    }

    pub(crate) fn shift_current_month(&mut self, delta: i32) -> bool {
        match shift_month(&self.current_month, delta) {
            Some(m) => {
                self.current_month = m;
                true
            }
            None => false,
        }
    }

    pub(crate) fn selected_transaction_id(&self) -> Option<i64> {
        self.history.get(self.history_index).and_then(HistoryRow::id)
    }

    pub(crate) fn history_page(&self) -> usize {
        self.visible_rows.max(1)
    }

    pub(crate) fn move_history(&mut self, delta: isize) {
        let rows = &self.history;
        self.history_index =
            step_selectable(self.history_index, delta, rows.len(), |i| rows[i].id().is_some());
        let page = self.history_page();
        keep_visible(self.history_index, &mut self.history_scroll, page);
    }

    pub(crate) fn history_top(&mut self) {
        let rows = &self.history;
        self.history_index =
            first_selectable(rows.len(), false, |i| rows[i].id().is_some()).unwrap_or(0);
        self.history_scroll = 0;
    }

    pub(crate) fn history_bottom(&mut self) {
        let rows = &self.history;
        self.history_index =
            first_selectable(rows.len(), true, |i| rows[i].id().is_some()).unwrap_or(0);
        let page = self.history_page();
        keep_visible(self.history_index, &mut self.history_scroll, page);
    }

    /// Keep the cursor on an item row after the list changed underneath it.
    fn clamp_history_cursor(&mut self) {
        if self.history.get(self.history_index).and_then(HistoryRow::id).is_some() {
            return;
        }
        let rows = &self.history;
        let below = (self.history_index..rows.len()).find(|&i| rows[i].id().is_some());
        let above = (0..self.history_index.min(rows.len())).rev().find(|&i| rows[i].id().is_some());
        self.history_index = below.or(above).unwrap_or(0);
        let page = self.history_page();
        keep_visible(self.history_index, &mut self.history_scroll, page);
    }

    pub(crate) fn open_add_form(&mut self) {
        let now = Local::now().naive_local().format("%Y-%m-%dT%H:%M").to_string();
        self.form = Some(TransactionForm::for_add(now));
        self.input_mode = InputMode::Form;
    }

    pub(crate) fn open_edit_form(&mut self, txn: &Transaction) {
        self.form = Some(TransactionForm::for_edit(txn));
        self.input_mode = InputMode::Form;
    }

    pub(crate) fn close_form(&mut self) {
        self.form = None;
        self.input_mode = InputMode::Normal;
    }

    pub(crate) fn confirm_delete(&mut self, txn: &Transaction) {
        self.confirm_message = format!("Delete '{}'?", txn.text);
        self.pending_action = Some(PendingAction::DeleteTransaction {
            id: txn.id,
            text: txn.text.clone(),
        });
        self.input_mode = InputMode::Confirm;
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}

/// Flatten day groups into header and item rows, newest first.
pub(crate) fn build_history(txns: &[Transaction]) -> Vec<HistoryRow> {
    let mut rows = Vec::new();
    for group in group_by_day(txns) {
        rows.push(HistoryRow::Day {
            label: day_label_now(group.representative()),
            total: group.total,
            count: group.transactions.len(),
        });
        rows.extend(group.transactions.iter().map(|t| HistoryRow::Item {
            id: t.id,
            time: format_time(&t.date_time),
            text: t.text.clone(),
            amount: t.amount,
        }));
    }
    rows
}
