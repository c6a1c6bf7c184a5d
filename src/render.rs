use chrono::Local;

use crate::payload::{Payload, PlayerItem};

const PLACEHOLDER: &str = "--";

/// `12345` -> `12,345`; unknown counts render as a placeholder.
pub fn format_count(value: Option<u64>) -> String {
    let Some(value) = value else {
        return PLACEHOLDER.to_string();
    };

    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

pub fn format_sale(item: &PlayerItem) -> String {
    match (item.is_on_sale, item.discount_percent) {
        (Some(true), Some(percent)) => format!("-{percent}%"),
        (Some(false), _) => String::new(),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Renders the payload as a plain-text table, rows in payload order.
pub fn render_table(payload: &Payload) -> String {
    let headers = ["#", "Title", "Players", "Sale", "Store"];
    let rows: Vec<[String; 5]> = payload
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            [
                (i + 1).to_string(),
                item.name.clone(),
                format_count(item.player_count),
                format_sale(item),
                item.store_url.clone().unwrap_or_else(|| PLACEHOLDER.to_string()),
            ]
        })
        .collect();

    let mut widths = headers.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let updated = payload
        .updated_at
        .with_timezone(&Local)
        .format("%Y/%m/%d %H:%M:%S");

    let mut out = format!("Last updated: {updated}\n\n");
    push_row(&mut out, &headers.map(String::from), &widths);
    push_row(&mut out, &widths.map(|w| "-".repeat(w)), &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

// Counts and sale columns are right-aligned.
fn push_row(out: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let line = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(col, (cell, &width))| {
            let pad = " ".repeat(width.saturating_sub(cell.chars().count()));
            if col == 2 || col == 3 {
                format!("{pad}{cell}")
            } else {
                format!("{cell}{pad}")
            }
        })
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}
