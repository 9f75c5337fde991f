use ratatui::style::{Color, Modifier, Style};
use rust_decimal::Decimal;

use super::app::DashboardView;

pub(crate) const HEADER_BG: Color = Color::Rgb(17, 24, 39);
pub(crate) const HEADER_FG: Color = Color::Rgb(229, 231, 235);
pub(crate) const ACCENT: Color = Color::Rgb(129, 140, 248);
pub(crate) const GREEN: Color = Color::Rgb(74, 222, 128);
pub(crate) const RED: Color = Color::Rgb(248, 113, 113);
pub(crate) const ORANGE: Color = Color::Rgb(251, 146, 60);
pub(crate) const YELLOW: Color = Color::Rgb(250, 204, 21);
pub(crate) const SURFACE: Color = Color::Rgb(31, 41, 55);
pub(crate) const TEXT: Color = Color::Rgb(243, 244, 246);
pub(crate) const TEXT_DIM: Color = Color::Rgb(156, 163, 175);
pub(crate) const OVERLAY: Color = Color::Rgb(55, 65, 81);
pub(crate) const COMMAND_BG: Color = Color::Rgb(11, 15, 25);

pub(crate) fn header_style() -> Style {
    Style::default()
        .fg(HEADER_FG)
        .bg(HEADER_BG)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn title_style() -> Style {
    Style::default().fg(TEXT_DIM).add_modifier(Modifier::BOLD)
}

pub(crate) fn section_style() -> Style {
    Style::default().fg(YELLOW).add_modifier(Modifier::BOLD)
}

pub(crate) fn selected_style() -> Style {
    Style::default().fg(HEADER_BG).bg(ACCENT)
}

pub(crate) fn normal_style() -> Style {
    Style::default().fg(TEXT)
}

pub(crate) fn dim_style() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Green for income, red for spending, plain for zero.
pub(crate) fn amount_style(amount: Decimal) -> Style {
    if amount > Decimal::ZERO {
        Style::default().fg(GREEN)
    } else if amount < Decimal::ZERO {
        Style::default().fg(RED)
    } else {
        normal_style()
    }
}

/// Border accent for the dashboard, one per view.
pub(crate) fn view_accent(view: DashboardView) -> Color {
    match view {
        DashboardView::Expenses => ORANGE,
        DashboardView::Balance => ACCENT,
    }
}

pub(crate) fn day_header_style() -> Style {
    Style::default()
        .fg(HEADER_FG)
        .bg(SURFACE)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn command_bar_style() -> Style {
    Style::default().fg(TEXT).bg(COMMAND_BG)
}

pub(crate) fn status_bar_style() -> Style {
    Style::default().fg(TEXT_DIM).bg(SURFACE)
}
