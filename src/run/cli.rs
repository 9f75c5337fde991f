use anyhow::{bail, Context, Result};
use chrono::{Datelike, Local};

use crate::config::{expand_home, Config};
use crate::export;
use crate::history::{day_label_now, format_time, group_by_day};
use crate::models::{now_date_time, TransactionInput, TransactionPatch, MAX_AMOUNT};
use crate::store::TransactionStore;
use crate::summary::{self, filter_by_month, month_label, parse_month, Totals};
use crate::ui::util::format_signed;

/// Flags that consume the following argument.
const VALUE_FLAGS: &[&str] = &["--at", "--text", "--amount", "--month"];

pub(crate) fn as_cli(args: &[String], store: &mut TransactionStore, config: &Config) -> Result<()> {
    match args[1].as_str() {
        "add" | "a" => cli_add(&args[2..], store),
        "edit" | "e" => cli_edit(&args[2..], store),
        "delete" | "rm" => cli_delete(&args[2..], store),
        "summary" | "s" => cli_summary(&args[2..], store),
        "history" | "h" => cli_history(&args[2..], store),
        "export" => cli_export(&args[2..], store, config),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("expz {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("Exp-Z - local-only expense tracker");
    println!();
    println!("Usage: expz [command]");
    println!();
    println!("Commands:");
    println!("  (none)                          Launch interactive TUI");
    println!("  add <description> <amount>      Record an expense");
    println!("    --income                      Record income instead");
    println!("    --at <YYYY-MM-DD[THH:MM]>     Timestamp (default: now)");
    println!("  edit <id>                       Change a transaction");
    println!("    --text <t> --amount <a> --at <dt> --income | --expense");
    println!("  delete <id>                     Remove a transaction");
    println!("  summary [YYYY-MM]               All-time and monthly totals");
    println!("  history                         Transactions grouped by day");
    println!("    --month <YYYY-MM>             Only this month");
    println!("  export [dir]                    Write a JSON backup (default: home)");
    println!("    --csv                         Write CSV instead");
    println!("    --month <YYYY-MM>             CSV only: limit to one month");
    println!("  --help, -h                      Show this help");
    println!("  --version, -V                   Show version");
}

// ── Argument helpers ──────────────────────────────────────────

pub(super) fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

pub(super) fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

/// Arguments that are neither flags nor flag values.
pub(super) fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut skip = false;
    for arg in args {
        if skip {
            skip = false;
        } else if VALUE_FLAGS.contains(&arg.as_str()) {
            skip = true;
        } else if !arg.starts_with("--") {
            out.push(arg.as_str());
        }
    }
    out
}

fn parse_id(raw: Option<&str>, usage: &str) -> Result<i64> {
    let raw = raw.ok_or_else(|| anyhow::anyhow!("Usage: {usage}"))?;
    raw.parse()
        .with_context(|| format!("Invalid transaction id: {raw}"))
}

fn month_arg(raw: &str) -> Result<String> {
    parse_month(raw, Local::now().year())
        .ok_or_else(|| anyhow::anyhow!("Invalid month: {raw}. Use YYYY-MM (e.g. 2024-01)"))
}

// ── Commands ──────────────────────────────────────────────────

fn cli_add(args: &[String], store: &mut TransactionStore) -> Result<()> {
    const USAGE: &str = "expz add <description> <amount> [--income] [--at <datetime>]";
    let words = positionals(args);
    let Some((amount, text)) = words.split_last() else {
        bail!("Usage: {USAGE}");
    };
    if text.is_empty() {
        bail!("Usage: {USAGE}");
    }

    let input = TransactionInput::new(
        text.join(" "),
        *amount,
        !has_flag(args, "--income"),
        flag_value(args, "--at").map_or_else(now_date_time, str::to_string),
    );
    let Some(txn) = store.add(&input)? else {
        bail!(
            "Nothing added: need a description, an amount above 0 and at most {MAX_AMOUNT}, \
             and a valid date"
        );
    };
    println!(
        "Added {} {} {} on {} (id {})",
        if txn.is_income() { "income" } else { "expense" },
        txn.text,
        format_signed(txn.amount),
        txn.date_time,
        txn.id
    );
    Ok(())
}

fn cli_edit(args: &[String], store: &mut TransactionStore) -> Result<()> {
    const USAGE: &str =
        "expz edit <id> [--text <t>] [--amount <a>] [--income|--expense] [--at <datetime>]";
    let id = parse_id(positionals(args).first().copied(), USAGE)?;

    let is_expense = match (has_flag(args, "--income"), has_flag(args, "--expense")) {
        (true, true) => bail!("Use only one of --income and --expense"),
        (true, false) => Some(false),
        (false, true) => Some(true),
        (false, false) => None,
    };
    let patch = TransactionPatch {
        text: flag_value(args, "--text").map(str::to_string),
        amount: flag_value(args, "--amount").map(str::to_string),
        is_expense,
        date_time: flag_value(args, "--at").map(str::to_string),
    };
    if patch.is_empty() {
        bail!("Nothing to change. Usage: {USAGE}");
    }

    if store.get(id).is_none() {
        bail!("Transaction {id} not found");
    }
    let Some(txn) = store.edit(id, &patch)? else {
        bail!("Transaction {id} unchanged: the new values are not valid");
    };
    println!(
        "Updated {}: {} {} on {}",
        txn.id,
        txn.text,
        format_signed(txn.amount),
        txn.date_time
    );
    Ok(())
}

fn cli_delete(args: &[String], store: &mut TransactionStore) -> Result<()> {
    let id = parse_id(positionals(args).first().copied(), "expz delete <id>")?;
    match store.delete(id)? {
        Some(txn) => {
            println!("Deleted {} ({})", txn.text, format_signed(txn.amount));
            Ok(())
        }
        None => bail!("Transaction {id} not found"),
    }
}

fn cli_summary(args: &[String], store: &mut TransactionStore) -> Result<()> {
    let month = match positionals(args).first() {
        Some(raw) => month_arg(raw)?,
        None => summary::current_month(),
    };
    let all_time = summary::all_time(store.transactions());
    let monthly = summary::monthly(store.transactions(), &month);

    println!("Exp-Z - {}", month_label(&month));
    println!("{}", "─".repeat(40));
    print_totals("This month", &monthly);
    println!();
    print_totals("All time", &all_time);
    println!("  Transactions: {}", store.len());
    Ok(())
}

fn print_totals(title: &str, totals: &Totals) {
    println!("  {title}");
    println!("    Balance:  {:>12}", totals.balance_str());
    println!("    Income:   {:>12}", totals.income_str());
    println!("    Expenses: {:>12}", totals.expense_str());
}

fn cli_history(args: &[String], store: &mut TransactionStore) -> Result<()> {
    let month = flag_value(args, "--month").map(month_arg).transpose()?;
    let scoped = match &month {
        Some(m) => filter_by_month(store.transactions(), m),
        None => store.transactions().iter().collect(),
    };

    let groups = group_by_day(scoped);
    if groups.is_empty() {
        println!("No transactions");
        return Ok(());
    }

    for group in &groups {
        println!(
            "{:<28} {:>14}",
            day_label_now(group.representative()),
            format_signed(group.total)
        );
        for txn in &group.transactions {
            println!(
                "  {:>8}  {:<30} {:>14}  #{}",
                format_time(&txn.date_time),
                txn.text,
                format_signed(txn.amount),
                txn.id
            );
        }
    }
    Ok(())
}

fn cli_export(args: &[String], store: &mut TransactionStore, config: &Config) -> Result<()> {
    let dir = positionals(args)
        .first()
        .map_or_else(|| config.export_dir.clone(), |d| expand_home(d));

    if has_flag(args, "--csv") {
        let month = flag_value(args, "--month").map(month_arg).transpose()?;
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create export directory: {}", dir.display()))?;
        let path = dir.join(export::csv_file_name(month.as_deref()));
        let rows = match &month {
            Some(m) => filter_by_month(store.transactions(), m),
            None => store.transactions().iter().collect(),
        };
        let count = export::write_csv(rows, &path)?;
        if count == 0 {
            println!("No transactions to export");
        } else {
            println!("Exported {count} transactions to {}", path.display());
        }
        return Ok(());
    }

    if flag_value(args, "--month").is_some() {
        bail!("--month only applies to CSV exports; JSON backups always hold everything");
    }
    let snapshot = store.export_snapshot()?;
    let path = export::write_backup(&snapshot, &dir, Local::now().date_naive())?;
    println!("Backed up {} transactions to {}", store.len(), path.display());
    Ok(())
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
