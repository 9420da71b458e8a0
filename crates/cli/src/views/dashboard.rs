use std::io::Write;

use chrono::{DateTime, TimeZone};
use order_tracker_core::models::currency::format_amount;
use order_tracker_core::OrderTracker;

use super::format::{format_date, render_calendar, render_series, render_table, status_label};
use crate::error::Result;

/// Stat cards, recent orders, income charts and the month calendar for `now`.
///
/// Earnings are raw sums of the stored amounts unless `convert` is set, in
/// which case every order is converted into the active currency first.
pub fn render<Tz: TimeZone>(
    tracker: &OrderTracker,
    now: &DateTime<Tz>,
    convert: bool,
    out: &mut impl Write,
) -> Result<()> {
    let (stats, charts) = if convert {
        (tracker.converted_monthly_stats_at(now), tracker.converted_income_charts_at(now))
    } else {
        (tracker.monthly_stats_at(now), tracker.income_charts_at(now))
    };
    let active = tracker.settings().currency;
    let currency = stats.currency.unwrap_or(active);
    let company = &tracker.settings().company_name;

    if company.is_empty() {
        writeln!(out, "Панель управления")?;
    } else {
        writeln!(out, "Панель управления · {company}")?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "Заказы за месяц:        {} (выполнено: {})",
        stats.total_orders, stats.completed_orders
    )?;
    writeln!(out, "Доход за месяц:         {}", format_amount(stats.total_earnings, currency))?;
    writeln!(
        out,
        "Выполненные заказы:     {}",
        format_amount(stats.completed_earnings, currency)
    )?;
    writeln!(out, "Незавершенных заказов:  {}", stats.pending_orders)?;
    writeln!(out)?;

    writeln!(out, "Последние заказы")?;
    let recent = tracker.recent_orders();
    if recent.is_empty() {
        writeln!(out, "Нет заказов. Создайте новый заказ, чтобы начать.")?;
    } else {
        let rows: Vec<Vec<String>> = recent
            .iter()
            .map(|o| {
                vec![
                    format_date(o.date_created),
                    o.client_name.clone(),
                    o.service.clone(),
                    format_amount(o.amount, o.currency),
                    status_label(o).to_string(),
                ]
            })
            .collect();
        write!(
            out,
            "{}",
            render_table(&["Дата", "Клиент", "Услуга", "Сумма", "Статус"], &rows)
        )?;
    }
    writeln!(out)?;

    write!(out, "{}", render_series("Доход за последние 30 дней", &charts.daily, active))?;
    writeln!(out)?;
    write!(out, "{}", render_series("Доход по месяцам", &charts.monthly, active))?;
    writeln!(out)?;
    write!(out, "{}", render_series("Годовой доход", &charts.yearly, active))?;
    writeln!(out)?;

    writeln!(out, "Календарь")?;
    write!(out, "{}", render_calendar(now.date_naive()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use order_tracker_core::models::currency::Currency;
    use order_tracker_core::models::order::OrderDraft;

    #[test]
    fn empty_tracker_renders_zero_cards() {
        let tracker = OrderTracker::in_memory();
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        let mut out = Vec::<u8>::new();
        render(&tracker, &now, false, &mut out).unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Заказы за месяц:        0 (выполнено: 0)"));
        assert!(printed.contains("Нет заказов"));
        assert!(printed.contains("Июнь 2025"));
        assert!(printed.contains("[15]"));
    }

    #[test]
    fn figures_reflect_orders() {
        let mut tracker = OrderTracker::in_memory();
        let created = Utc.with_ymd_and_hms(2025, 6, 10, 9, 0, 0).unwrap();
        let done = tracker
            .create_order_at(OrderDraft::new("Анна", "1", "Полный ремонт", 1000.0), created)
            .unwrap();
        tracker
            .create_order_at(OrderDraft::new("Борис", "2", "Полный ремонт", 500.0), created)
            .unwrap();
        tracker.complete_order_at(&done.id, created).unwrap();

        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        let mut out = Vec::<u8>::new();
        render(&tracker, &now, false, &mut out).unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Заказы за месяц:        2 (выполнено: 1)"));
        assert!(printed.contains("Доход за месяц:         1 500 ₽"));
        assert!(printed.contains("Незавершенных заказов:  1"));
        assert!(printed.contains("Доход за последние 30 дней (итого 1 000 ₽)"));
        assert!(printed.contains("Борис"));
    }

    #[test]
    fn convert_flag_switches_to_converted_sums() {
        let mut tracker = OrderTracker::in_memory();
        let created = Utc.with_ymd_and_hms(2025, 6, 10, 9, 0, 0).unwrap();
        tracker
            .create_order_at(OrderDraft::new("Анна", "1", "Полный ремонт", 1000.0), created)
            .unwrap();
        tracker.set_currency(Currency::Kzt).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();

        let mut raw = Vec::<u8>::new();
        render(&tracker, &now, false, &mut raw).unwrap();
        assert!(String::from_utf8(raw).unwrap().contains("Доход за месяц:         1 000 ₸"));

        let mut converted = Vec::<u8>::new();
        render(&tracker, &now, true, &mut converted).unwrap();
        let printed = String::from_utf8(converted).unwrap();
        assert!(printed.contains("Доход за месяц:         5 500 ₸"));
        assert!(printed.contains("Доход по месяцам (итого 5 500 ₸)"));
    }
}
