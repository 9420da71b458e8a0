use chrono::{DateTime, Datelike, Local, NaiveDate, Utc, Weekday};
use order_tracker_core::models::chart::IncomeSeries;
use order_tracker_core::models::currency::{format_amount, Currency};
use order_tracker_core::models::order::Order;

const BAR_WIDTH: usize = 40;

const MONTHS: [&str; 12] = [
    "Январь", "Февраль", "Март", "Апрель", "Май", "Июнь", "Июль", "Август", "Сентябрь", "Октябрь",
    "Ноябрь", "Декабрь",
];

pub fn status_label(order: &Order) -> &'static str {
    if order.completed {
        "Выполнен"
    } else {
        "В работе"
    }
}

/// Local wall-clock rendering of a stored UTC instant.
pub fn format_datetime(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%d.%m.%Y %H:%M").to_string()
}

pub fn format_date(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%d.%m.%Y").to_string()
}

/// Plain-text table with columns padded to the widest cell.
///
/// Widths are counted in chars so Cyrillic text and currency symbols line up.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| pad(cell, *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&line(headers.to_vec()));
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out
}

fn pad(cell: &str, width: usize) -> String {
    let len = cell.chars().count();
    format!("{cell}{}", " ".repeat(width.saturating_sub(len)))
}

/// Horizontal bar proportional to `value / peak`.
pub fn bar(value: f64, peak: f64, width: usize) -> String {
    if width == 0 || peak <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let filled = ((value / peak) * width as f64).round() as usize;
    // A non-zero value always shows at least one cell
    "█".repeat(filled.clamp(1, width))
}

/// One line per bucket: label, bar, amount. Raw series are labelled with `fallback`.
pub fn render_series(title: &str, series: &IncomeSeries, fallback: Currency) -> String {
    let currency = series.currency.unwrap_or(fallback);
    let peak = series.peak();
    let label_width = series
        .points
        .iter()
        .map(|p| p.label.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = format!(
        "{title} (итого {})\n",
        format_amount(series.total(), currency)
    );
    for point in &series.points {
        let bar = bar(point.income, peak, BAR_WIDTH);
        out.push_str(&format!(
            "  {} │{} {}\n",
            pad(&point.label, label_width),
            pad(&bar, BAR_WIDTH),
            format_amount(point.income, currency)
        ));
    }
    out
}

/// Month grid starting on Monday, with `today` in brackets.
pub fn render_calendar(today: NaiveDate) -> String {
    let mut out = String::new();
    let month_name = MONTHS
        .get(today.month0() as usize)
        .copied()
        .unwrap_or_default();
    out.push_str(&format!("{month_name} {}\n", today.year()));
    out.push_str("  Пн  Вт  Ср  Чт  Пт  Сб  Вс\n");

    let Some(first) = today.with_day(1) else {
        return out;
    };
    let lead = first.weekday().num_days_from_monday() as usize;
    let mut line = "    ".repeat(lead);
    let mut column = lead;

    for day in first.iter_days().take_while(|d| d.month() == today.month()) {
        let cell = if day == today {
            format!("[{:>2}]", day.day())
        } else {
            format!(" {:>2} ", day.day())
        };
        line.push_str(&cell);
        column += 1;
        if day.weekday() == Weekday::Sun {
            out.push_str(line.trim_end());
            out.push('\n');
            line.clear();
            column = 0;
        }
    }
    if column > 0 {
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
