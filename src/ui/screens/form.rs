use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::ui::app::{FormField, TransactionForm};
use crate::ui::theme;

/// Centered modal over the current screen.
pub(crate) fn render(f: &mut Frame, area: Rect, form: &TransactionForm) {
    let mut lines = vec![Line::from("")];

    for field in FormField::ORDER {
        let focused = form.field == field;
        let label_style = if focused {
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD)
        } else {
            theme::dim_style()
        };
        let value = form.value(field);
        let value_span = match field {
            FormField::Direction => {
                let color = if form.input.is_expense {
                    theme::RED
                } else {
                    theme::GREEN
                };
                Span::styled(
                    format!("< {value} >"),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )
            }
            _ if focused => Span::styled(format!("{value}_"), theme::command_bar_style()),
            _ => Span::styled(value.to_string(), theme::normal_style()),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<13}", field.label()), label_style),
            value_span,
        ]));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "  Tab/Up/Down field  Space toggle type  Enter save  Esc cancel",
        theme::dim_style(),
    )));
    lines.push(Line::from(Span::styled(
        "  Dates: YYYY-MM-DD or YYYY-MM-DDTHH:MM",
        theme::dim_style(),
    )));

    let popup_height = (lines.len() as u16 + 2).min(area.height);
    let popup_width = 64.min(area.width.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    f.render_widget(Clear, popup_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ACCENT))
        .title(Span::styled(form.title(), theme::header_style()))
        .style(Style::default().bg(theme::HEADER_BG));
    f.render_widget(Paragraph::new(lines).block(block), popup_area);
}
