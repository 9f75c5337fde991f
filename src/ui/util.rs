use rust_decimal::Decimal;

use crate::summary::round_cents;

/// Format an amount with thousand separators and 2 decimal places, sign in
/// front of the currency symbol. e.g. `-1234.5` → `"-$1,234.50"`
pub(crate) fn format_amount(val: Decimal) -> String {
    let sign = if val < Decimal::ZERO { "-" } else { "" };
    format!("{sign}${}", group_thousands(val))
}

/// Like [`format_amount`] but income carries an explicit `+`.
pub(crate) fn format_signed(val: Decimal) -> String {
    let sign = if val > Decimal::ZERO {
        "+"
    } else if val < Decimal::ZERO {
        "-"
    } else {
        ""
    };
    format!("{sign}${}", group_thousands(val))
}

fn group_thousands(val: Decimal) -> String {
    let formatted = format!("{:.2}", round_cents(val).abs());
    let (int_part, dec_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");
    format!("{with_commas}.{dec_part}")
}

/// Truncate to `max` visible characters, ending in "…" when cut.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if s.chars().count() <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max - 1).collect();
    format!("{truncated}…")
}

/// Step from `start` by `delta` rows, landing only on rows accepted by
/// `selectable`. Stays put when there is nowhere to go.
pub(crate) fn step_selectable(
    start: usize,
    delta: isize,
    len: usize,
    selectable: impl Fn(usize) -> bool,
) -> usize {
    let mut idx = start;
    let mut landed = start;
    let mut remaining = delta.unsigned_abs();
    while remaining > 0 {
        let next = if delta > 0 {
            idx.checked_add(1).filter(|&n| n < len)
        } else {
            idx.checked_sub(1)
        };
        let Some(next) = next else { break };
        idx = next;
        if selectable(idx) {
            landed = idx;
            remaining -= 1;
        }
    }
    landed
}

/// First row accepted by `selectable`, searching from the top or the bottom.
pub(crate) fn first_selectable(
    len: usize,
    from_bottom: bool,
    selectable: impl Fn(usize) -> bool,
) -> Option<usize> {
    if from_bottom {
        (0..len).rev().find(|&i| selectable(i))
    } else {
        (0..len).find(|&i| selectable(i))
    }
}

/// Adjust `scroll` so `index` is inside a window of `page` rows.
pub(crate) fn keep_visible(index: usize, scroll: &mut usize, page: usize) {
    if index < *scroll {
        *scroll = index;
    } else if page > 0 && index >= *scroll + page {
        *scroll = index + 1 - page;
    }
}
