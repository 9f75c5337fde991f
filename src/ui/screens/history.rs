use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::ui::app::{App, HistoryRow};
use crate::ui::theme;
use crate::ui::util::{format_signed, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            format!(" History ({}) ", app.transaction_count),
            theme::title_style(),
        ));

    if app.history.is_empty() {
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled("No transactions yet", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Press a to add one, or :add <description> <amount>",
                theme::dim_style(),
            )),
        ];
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    }

    let text_width = area.width.saturating_sub(2 + 10 + 16 + 4) as usize;

    let rows: Vec<Row> = app
        .history
        .iter()
        .enumerate()
        .skip(app.history_scroll)
        .take(area.height.saturating_sub(2) as usize)
        .map(|(i, row)| match row {
            HistoryRow::Day {
                label,
                total,
                count,
            } => Row::new(vec![
                Cell::from(Span::styled(label.clone(), theme::day_header_style())),
                Cell::from(Span::styled(
                    format!("{count} transaction{}", if *count == 1 { "" } else { "s" }),
                    theme::dim_style(),
                )),
                Cell::from(
                    Line::from(Span::styled(
                        format_signed(*total),
                        theme::amount_style(*total).add_modifier(Modifier::BOLD),
                    ))
                    .right_aligned(),
                ),
            ])
            .style(theme::day_header_style()),
            HistoryRow::Item {
                time,
                text,
                amount,
                ..
            } => {
                let style = if i == app.history_index {
                    theme::selected_style()
                } else {
                    theme::normal_style()
                };
                let amount_style = if i == app.history_index {
                    style
                } else {
                    theme::amount_style(*amount)
                };
                Row::new(vec![
                    Cell::from(format!("  {time}")),
                    Cell::from(truncate(text, text_width.max(8))),
                    Cell::from(
                        Line::from(Span::styled(format_signed(*amount), amount_style))
                            .right_aligned(),
                    ),
                ])
                .style(style)
            }
        })
        .collect();

    let widths = [
        Constraint::Length(10),
        Constraint::Min(12),
        Constraint::Length(16),
    ];

    let table = Table::new(rows, widths).block(block);
    f.render_widget(table, area);
}
