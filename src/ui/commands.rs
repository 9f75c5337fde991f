use std::collections::HashMap;
use std::sync::LazyLock;

use anyhow::Context;
use chrono::Local;
use tracing::{debug, warn};

use super::app::{App, DashboardView, InputMode, Screen};
use crate::config::expand_home;
use crate::export;
use crate::models::{now_date_time, TransactionInput};
use crate::store::TransactionStore;
use crate::summary::{filter_by_month, month_label, month_year, parse_month};
use crate::ui::util::format_signed;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut TransactionStore) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit Exp-Z", cmd_quit, r);
    register_command!("quit", "Quit Exp-Z", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("hist", "Go to History", cmd_history, r);
    register_command!("history", "Go to History", cmd_history, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!(
        "add",
        "Add transaction (e.g. :add Lunch 20.50, :add Salary +5000)",
        cmd_add,
        r
    );
    register_command!(
        "a",
        "Add transaction (e.g. :a Lunch 20.50)",
        cmd_add,
        r
    );
    register_command!(
        "edit",
        "Edit selected transaction (or :edit <id>)",
        cmd_edit,
        r
    );
    register_command!(
        "delete",
        "Delete selected transaction (or :delete <id>)",
        cmd_delete,
        r
    );
    register_command!("month", "Set month (e.g. :month 2024-01)", cmd_month, r);
    register_command!("m", "Set month (e.g. :m 2024-01)", cmd_month, r);
    register_command!("next-month", "Go to next month", cmd_next_month, r);
    register_command!("prev-month", "Go to previous month", cmd_prev_month, r);
    register_command!(
        "view",
        "Dashboard view (e.g. :view balance, :view expenses)",
        cmd_view,
        r
    );
    register_command!(
        "export",
        "Write JSON backup (e.g. :export ~/backups)",
        cmd_export,
        r
    );
    register_command!(
        "export-csv",
        "Export selected month to CSV (e.g. :export-csv ~/exports)",
        cmd_export_csv,
        r
    );

    r
});

pub(crate) fn handle_command(
    input: &str,
    app: &mut App,
    store: &mut TransactionStore,
) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        debug!(command = cmd_name, "running command");
        (cmd.run)(args, app, store)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1)
        .min_by_key(|k| (levenshtein(input, k), **k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Transaction named by `args`, or the one under the history cursor.
fn target_id(args: &str, app: &App) -> Result<i64, String> {
    if args.is_empty() {
        if app.screen != Screen::History {
            return Err("Go to History and select a transaction first".into());
        }
        app.selected_transaction_id()
            .ok_or_else(|| "No transaction selected".to_string())
    } else {
        args.parse()
            .map_err(|_| format!("Invalid transaction id: {args}"))
    }
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _store: &mut TransactionStore) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App, _store: &mut TransactionStore) -> anyhow::Result<()> {
    app.screen = Screen::Dashboard;
    Ok(())
}

fn cmd_history(_args: &str, app: &mut App, _store: &mut TransactionStore) -> anyhow::Result<()> {
    app.screen = Screen::History;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _store: &mut TransactionStore) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

/// Without arguments opens the form. `:add <description> <amount>` records an
/// expense directly; a leading `+` on the amount makes it income.
fn cmd_add(args: &str, app: &mut App, store: &mut TransactionStore) -> anyhow::Result<()> {
    if args.is_empty() {
        app.open_add_form();
        return Ok(());
    }

    let Some((text, amount)) = args.rsplit_once(' ') else {
        app.set_status("Usage: :add <description> <amount>. Example: :add Coffee 4.50");
        return Ok(());
    };
    let (amount, is_expense) = match amount.strip_prefix('+') {
        Some(rest) => (rest, false),
        None => (amount, true),
    };

    let input = TransactionInput::new(text, amount, is_expense, now_date_time());
    match store.add(&input)? {
        Some(txn) => app.set_status(format!(
            "Added: {} {}",
            txn.text,
            format_signed(txn.amount)
        )),
        None => app.set_status(format!("Invalid transaction: '{text}' {amount}")),
    }
    Ok(())
}

fn cmd_edit(args: &str, app: &mut App, store: &mut TransactionStore) -> anyhow::Result<()> {
    let id = match target_id(args, app) {
        Ok(id) => id,
        Err(msg) => {
            app.set_status(msg);
            return Ok(());
        }
    };
    match store.get(id) {
        Some(txn) => app.open_edit_form(txn),
        None => app.set_status(format!("Transaction {id} not found")),
    }
    Ok(())
}

fn cmd_delete(args: &str, app: &mut App, store: &mut TransactionStore) -> anyhow::Result<()> {
    let id = match target_id(args, app) {
        Ok(id) => id,
        Err(msg) => {
            app.set_status(msg);
            return Ok(());
        }
    };
    match store.get(id) {
        Some(txn) => app.confirm_delete(txn),
        None => app.set_status(format!("Transaction {id} not found")),
    }
    Ok(())
}

fn cmd_month(args: &str, app: &mut App, _store: &mut TransactionStore) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_month(crate::summary::current_month());
        app.set_status(format!("Month: {}", month_label(&app.current_month)));
        return Ok(());
    }

    match parse_month(args, month_year(&app.current_month)) {
        Some(m) => {
            app.set_status(format!("Switched to month: {}", month_label(&m)));
            app.set_month(m);
        }
        None => app.set_status("Invalid month format. Use YYYY-MM (e.g. 2024-01)"),
    }
    Ok(())
}

fn cmd_next_month(_args: &str, app: &mut App, _store: &mut TransactionStore) -> anyhow::Result<()> {
    advance_month(app, 1);
    Ok(())
}

fn cmd_prev_month(_args: &str, app: &mut App, _store: &mut TransactionStore) -> anyhow::Result<()> {
    advance_month(app, -1);
    Ok(())
}

fn advance_month(app: &mut App, delta: i32) {
    if app.shift_current_month(delta) {
        app.set_status(format!("Month: {}", month_label(&app.current_month)));
    }
}

fn cmd_view(args: &str, app: &mut App, _store: &mut TransactionStore) -> anyhow::Result<()> {
    let view = if args.is_empty() {
        app.view.toggle()
    } else {
        match DashboardView::parse(args) {
            Some(v) => v,
            None => {
                app.set_status("Unknown view. Use :view expenses or :view balance");
                return Ok(());
            }
        }
    };
    app.view = view;
    app.screen = Screen::Dashboard;
    app.set_status(format!("View: {view}"));
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, store: &mut TransactionStore) -> anyhow::Result<()> {
    let dir = if args.is_empty() {
        app.export_dir.clone()
    } else {
        expand_home(args)
    };

    let written = store
        .export_snapshot()
        .and_then(|snapshot| export::write_backup(&snapshot, &dir, Local::now().date_naive()));
    match written {
        Ok(path) => app.set_status(format!(
            "Backed up {} transactions to {}",
            store.len(),
            path.display()
        )),
        Err(e) => export_failed(app, &e),
    }
    Ok(())
}

fn cmd_export_csv(args: &str, app: &mut App, store: &mut TransactionStore) -> anyhow::Result<()> {
    let dir = if args.is_empty() {
        app.export_dir.clone()
    } else {
        expand_home(args)
    };
    let rows = filter_by_month(store.transactions(), &app.current_month);
    if rows.is_empty() {
        app.set_status("No transactions to export");
        return Ok(());
    }

    let path = dir.join(export::csv_file_name(Some(&app.current_month)));
    let written = std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create export directory: {}", dir.display()))
        .and_then(|()| export::write_csv(rows, &path));
    match written {
        Ok(count) => {
            app.set_status(format!("Exported {count} transactions to {}", path.display()));
        }
        Err(e) => export_failed(app, &e),
    }
    Ok(())
}

/// Export problems stay in the status bar instead of ending the session.
fn export_failed(app: &mut App, err: &anyhow::Error) {
    warn!(error = %format!("{err:#}"), "export failed");
    app.set_status(format!("Export failed: {err:#}"));
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
