use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::error;

use crate::config::Config;
use crate::store::TransactionStore;
use crate::ui::app::{App, FormField, InputMode, PendingAction, Screen};
use crate::ui::commands;
use crate::ui::util::format_signed;

pub(crate) fn as_tui(store: &mut TransactionStore, config: &Config) -> Result<()> {
    let mut app = App::new(config.export_dir.clone());
    app.refresh(store);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, store);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        error!(error = %format!("{e:#}"), "tui exited with error");
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    store: &mut TransactionStore,
) -> Result<()> {
    while app.running {
        app.refresh(store);
        terminal.draw(|f| {
            // tab + status + command bars, plus table borders
            let content_height = f.area().height.saturating_sub(5) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.show_help {
                app.show_help = false;
                continue;
            }
            handle_key(key, app, store)?;
        }
    }
    Ok(())
}

/// Route a key press by input mode. Separate from the terminal loop so key
/// handling can be driven without a terminal.
pub(super) fn handle_key(key: KeyEvent, app: &mut App, store: &mut TransactionStore) -> Result<()> {
    match app.input_mode {
        InputMode::Normal => handle_normal_input(key, app, store),
        InputMode::Command => handle_command_input(key, app, store),
        InputMode::Form => handle_form_input(key, app, store),
        InputMode::Confirm => handle_confirm_input(key, app, store),
    }
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: KeyEvent, app: &mut App, store: &mut TransactionStore) -> Result<()> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('c')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            app.running = false;
        }
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('1') => switch_screen(app, Screen::Dashboard),
        KeyCode::Char('2') => switch_screen(app, Screen::History),
        KeyCode::Tab | KeyCode::BackTab => {
            let next = match app.screen {
                Screen::Dashboard => Screen::History,
                Screen::History => Screen::Dashboard,
            };
            switch_screen(app, next);
        }
        KeyCode::Char('j') | KeyCode::Down if app.screen == Screen::History => {
            app.move_history(1);
        }
        KeyCode::Char('k') | KeyCode::Up if app.screen == Screen::History => {
            app.move_history(-1);
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half_page = (app.visible_rows / 2).max(1) as isize;
            app.move_history(half_page);
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half_page = (app.visible_rows / 2).max(1) as isize;
            app.move_history(-half_page);
        }
        KeyCode::Char('g') => app.history_top(),
        KeyCode::Char('G') => app.history_bottom(),
        KeyCode::Char('a') => app.open_add_form(),
        KeyCode::Char('e') | KeyCode::Enter if app.screen == Screen::History => {
            commands::handle_command("edit", app, store)?;
        }
        KeyCode::Char('D') if app.screen == Screen::History => {
            commands::handle_command("delete", app, store)?;
        }
        KeyCode::Char('v') => commands::handle_command("view", app, store)?,
        KeyCode::Char('H') => commands::handle_command("prev-month", app, store)?,
        KeyCode::Char('L') => commands::handle_command("next-month", app, store)?,
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Esc => app.set_status(""),
        _ => {}
    }
    Ok(())
}

fn handle_command_input(key: KeyEvent, app: &mut App, store: &mut TransactionStore) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app, store)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let trimmed = app.command_input.trim_end();
            if let Some(pos) = trimmed.rfind(' ') {
                app.command_input.truncate(pos + 1);
            } else {
                app.command_input.clear();
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_form_input(key: KeyEvent, app: &mut App, store: &mut TransactionStore) -> Result<()> {
    let Some(form) = app.form.as_mut() else {
        app.input_mode = InputMode::Normal;
        return Ok(());
    };

    match key.code {
        KeyCode::Esc => {
            app.close_form();
            app.set_status("Cancelled");
        }
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.prev_field(),
        KeyCode::Left | KeyCode::Right if form.field == FormField::Direction => {
            form.toggle_direction();
        }
        KeyCode::Backspace => form.pop(),
        KeyCode::Enter => submit_form(app, store)?,
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => form.push(c),
        _ => {}
    }
    Ok(())
}

/// Save the form. Invalid input keeps the form open with a hint.
fn submit_form(app: &mut App, store: &mut TransactionStore) -> Result<()> {
    let Some(form) = app.form.as_ref() else {
        return Ok(());
    };

    let saved = match &form.editing {
        Some(original) => store.edit(original.id, &form.to_patch())?,
        None => store.add(&form.input)?,
    };
    let verb = if form.editing.is_some() { "Updated" } else { "Added" };

    match saved {
        Some(txn) => {
            app.close_form();
            app.set_status(format!("{verb}: {} {}", txn.text, format_signed(txn.amount)));
        }
        None => {
            app.set_status("Needs a description, a non-zero amount and a valid date");
        }
    }
    Ok(())
}

fn handle_confirm_input(key: KeyEvent, app: &mut App, store: &mut TransactionStore) -> Result<()> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            if let Some(action) = app.pending_action.take() {
                match action {
                    PendingAction::DeleteTransaction { id, text } => {
                        if store.delete(id)?.is_some() {
                            app.set_status(format!("Deleted: {text}"));
                        } else {
                            app.set_status(format!("Transaction {id} not found"));
                        }
                    }
                }
            }
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.pending_action = None;
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
            app.set_status("Cancelled");
        }
        _ => {}
    }
    Ok(())
}

fn switch_screen(app: &mut App, screen: Screen) {
    app.screen = screen;
    app.set_status(format!("{screen}"));
}

#[cfg(test)]
#[path = "tui_tests.rs"]
mod tests;
