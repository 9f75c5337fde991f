use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Sparkline, Tabs},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::summary::month_label;
use crate::ui::app::{App, DashboardView};
use crate::ui::theme;
use crate::ui::util::format_amount;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // View toggle + month
            Constraint::Length(5), // Headline figure
            Constraint::Length(5), // Income / expense cards
            Constraint::Min(6),    // Chart
        ])
        .split(area);

    render_view_bar(f, chunks[0], app);
    render_headline(f, chunks[1], app);
    render_split_cards(f, chunks[2], app);
    match app.view {
        DashboardView::Expenses => render_daily_chart(f, chunks[3], app),
        DashboardView::Balance => render_trend_sparkline(f, chunks[3], app),
    }
}

fn bordered(title: &str, accent: Color) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .title(Span::styled(format!(" {title} "), theme::title_style()))
}

fn render_view_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = match app.view {
        DashboardView::Expenses => 0,
        DashboardView::Balance => 1,
    };
    let scope = match app.view {
        DashboardView::Expenses => month_label(&app.current_month),
        DashboardView::Balance => "All time".to_string(),
    };

    let tabs = Tabs::new(vec!["EXPENSES", "BALANCE"])
        .select(selected)
        .style(theme::dim_style())
        .highlight_style(
            Style::default()
                .fg(theme::view_accent(app.view))
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::styled(" | ", Style::default().fg(theme::OVERLAY)))
        .block(bordered(&scope, theme::OVERLAY));
    f.render_widget(tabs, area);
}

fn render_headline(f: &mut Frame, area: Rect, app: &App) {
    let (title, value, color) = match app.view {
        DashboardView::Expenses => ("Monthly Expenses", app.monthly.expense, theme::RED),
        DashboardView::Balance => ("Current Balance", app.all_time.balance, theme::TEXT),
    };

    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format_amount(value),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
    ])
    .centered()
    .block(bordered(title, theme::view_accent(app.view)));
    f.render_widget(text, area);
}

fn render_split_cards(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let (totals, income_title, expense_title) = match app.view {
        DashboardView::Expenses => (&app.monthly, "Month Income", "Month Expense"),
        DashboardView::Balance => (&app.all_time, "Total Income", "Total Expense"),
    };

    render_card(f, cards[0], income_title, format!("+{}", format_amount(totals.income)), theme::GREEN);
    render_card(f, cards[1], expense_title, format!("-{}", format_amount(totals.expense)), theme::RED);
}

fn render_card(f: &mut Frame, area: Rect, title: &str, display: String, color: Color) {
    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            display,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
    ])
    .centered()
    .block(bordered(title, theme::OVERLAY));
    f.render_widget(text, area);
}

fn render_daily_chart(f: &mut Frame, area: Rect, app: &App) {
    let title = "Daily Spending";
    if app.daily_spending.iter().all(|(_, spent)| spent.is_zero()) {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("No spending in {}", month_label(&app.current_month)),
                theme::dim_style(),
            )),
            Line::from(Span::styled(
                "Add one with a, or :add <description> <amount>",
                theme::dim_style(),
            )),
        ])
        .centered()
        .block(bordered(title, theme::OVERLAY));
        f.render_widget(msg, area);
        return;
    }

    let bars: Vec<Bar> = app
        .daily_spending
        .iter()
        .map(|(day, spent)| {
            let label = day.get(8..).unwrap_or(day.as_str()).to_string();
            Bar::default()
                .value(whole_units(*spent))
                .text_value(format!("{spent:.0}"))
                .label(Line::from(label))
                .style(Style::default().fg(theme::ORANGE))
                .value_style(
                    Style::default()
                        .fg(theme::HEADER_BG)
                        .bg(theme::ORANGE)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let chart = BarChart::default()
        .block(bordered(title, theme::OVERLAY))
        .data(BarGroup::default().bars(&bars))
        .bar_width(4)
        .bar_gap(1);
    f.render_widget(chart, area);
}

fn render_trend_sparkline(f: &mut Frame, area: Rect, app: &App) {
    let data: Vec<u64> = app
        .spending_trend
        .iter()
        .map(|(_, spent)| whole_units(*spent))
        .collect();
    let title = match (app.spending_trend.first(), app.spending_trend.last()) {
        (Some((from, _)), Some((to, _))) => format!("Monthly Spending {from} to {to}"),
        _ => "Monthly Spending".to_string(),
    };

    let sparkline = Sparkline::default()
        .block(bordered(&title, theme::OVERLAY))
        .data(&data)
        .style(Style::default().fg(theme::YELLOW));
    f.render_widget(sparkline, area);
}

fn whole_units(amount: Decimal) -> u64 {
    amount.abs().round().to_u64().unwrap_or(0)
}
