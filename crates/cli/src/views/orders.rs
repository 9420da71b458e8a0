use std::io::{BufRead, Write};

use order_tracker_core::errors::CoreError;
use order_tracker_core::models::currency::format_amount;
use order_tracker_core::models::order::{OrderDraft, OrderId, StatusFilter};
use order_tracker_core::models::settings::Settings;
use order_tracker_core::OrderTracker;

use super::format::{format_date, format_datetime, render_table, status_label};
use crate::error::Result;

/// Creation form input as collected from the command line.
#[derive(Debug, Clone)]
pub struct NewOrderInput {
    pub client: String,
    pub phone: String,
    pub service: String,
    pub amount: f64,
    pub notes: Option<String>,
}

/// Map a `--service` value onto the catalog: a 1-based index or a
/// case-insensitive name.
pub fn resolve_service(settings: &Settings, raw: &str) -> Result<String> {
    let raw = raw.trim();
    if let Ok(index) = raw.parse::<usize>() {
        return index
            .checked_sub(1)
            .and_then(|i| settings.services.get(i))
            .cloned()
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "service #{index} does not exist (catalog has {} entries)",
                    settings.services.len()
                ))
                .into()
            });
    }

    settings
        .find_service(raw)
        .map(str::to_string)
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "unknown service '{raw}', choose one of: {}",
                settings.services.join(", ")
            ))
            .into()
        })
}

/// Find an order by full id or by an unambiguous id prefix.
pub fn resolve_id(tracker: &OrderTracker, raw: &str) -> Result<OrderId> {
    let raw = raw.trim();
    let exact = OrderId::from(raw);
    if tracker.get_order(&exact).is_some() {
        return Ok(exact);
    }

    let mut matches = tracker
        .orders()
        .iter()
        .filter(|o| !raw.is_empty() && o.id.as_str().starts_with(raw));
    match (matches.next(), matches.next()) {
        (Some(order), None) => Ok(order.id.clone()),
        _ => Err(CoreError::OrderNotFound(raw.to_string()).into()),
    }
}

pub fn create(tracker: &mut OrderTracker, input: NewOrderInput, out: &mut impl Write) -> Result<()> {
    let service = resolve_service(tracker.settings(), &input.service)?;
    let mut draft = OrderDraft::new(input.client, input.phone, service, input.amount);
    if let Some(notes) = input.notes {
        draft = draft.with_notes(notes);
    }

    let order = tracker.create_order(draft)?;
    let breakdown = tracker.payment_breakdown(&order);

    writeln!(out, "Заказ создан: {}", order.id)?;
    writeln!(out, "Клиент:        {}", order.client_name)?;
    writeln!(out, "Услуга:        {}", order.service)?;
    writeln!(out, "Общая сумма:   {}", format_amount(breakdown.total, breakdown.currency))?;
    writeln!(
        out,
        "Аванс ({}%):   {}",
        breakdown.advance_percent,
        format_amount(breakdown.advance, breakdown.currency)
    )?;
    writeln!(out, "Остаток:       {}", format_amount(breakdown.remainder, breakdown.currency))?;
    Ok(())
}

pub fn list(
    tracker: &OrderTracker,
    filter: StatusFilter,
    search: &str,
    out: &mut impl Write,
) -> Result<()> {
    let orders = tracker.query_orders(filter, search);
    if orders.is_empty() {
        writeln!(out, "Нет заказов для отображения")?;
        return Ok(());
    }

    let rows: Vec<Vec<String>> = orders
        .iter()
        .map(|order| {
            let breakdown = tracker.payment_breakdown(order);
            vec![
                short_id(&order.id),
                format_date(order.date_created),
                order.client_name.clone(),
                order.service.clone(),
                format_amount(order.amount, order.currency),
                format_amount(breakdown.advance, breakdown.currency),
                status_label(order).to_string(),
            ]
        })
        .collect();

    let headers = ["ID", "Дата", "Клиент", "Услуга", "Сумма", "Аванс", "Статус"];
    write!(out, "{}", render_table(&headers, &rows))?;
    writeln!(out, "Всего: {}", orders.len())?;
    Ok(())
}

pub fn show(tracker: &OrderTracker, raw_id: &str, out: &mut impl Write) -> Result<()> {
    let id = resolve_id(tracker, raw_id)?;
    let order = tracker
        .get_order(&id)
        .ok_or_else(|| CoreError::OrderNotFound(raw_id.to_string()))?;
    let breakdown = tracker.payment_breakdown(order);

    writeln!(out, "Детали заказа {}", order.id)?;
    writeln!(out, "Статус:           {}", status_label(order))?;
    writeln!(out, "Клиент:           {}", order.client_name)?;
    writeln!(out, "Телефон:          {}", order.phone)?;
    writeln!(out, "Услуга:           {}", order.service)?;
    writeln!(out, "Дата создания:    {}", format_datetime(order.date_created))?;
    if let Some(done) = order.date_completed {
        writeln!(out, "Дата выполнения:  {}", format_datetime(done))?;
    }
    writeln!(out, "Общая сумма:      {}", format_amount(breakdown.total, breakdown.currency))?;
    writeln!(
        out,
        "Аванс ({}%):      {}",
        breakdown.advance_percent,
        format_amount(breakdown.advance, breakdown.currency)
    )?;
    writeln!(out, "Остаток:          {}", format_amount(breakdown.remainder, breakdown.currency))?;
    if !order.notes.is_empty() {
        writeln!(out, "Заметки:          {}", order.notes)?;
    }
    Ok(())
}

pub fn complete(tracker: &mut OrderTracker, raw_id: &str, out: &mut impl Write) -> Result<()> {
    let id = resolve_id(tracker, raw_id)?;
    if tracker.complete_order(&id)? {
        writeln!(out, "Заказ {id} выполнен")?;
    } else {
        writeln!(out, "Заказ {id} уже выполнен")?;
    }
    Ok(())
}

/// Delete after an interactive yes/no unless `assume_yes`.
pub fn delete(
    tracker: &mut OrderTracker,
    raw_id: &str,
    assume_yes: bool,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let id = resolve_id(tracker, raw_id)?;
    if !assume_yes && !confirm("Вы уверены, что хотите удалить этот заказ? [y/N] ", input, out)? {
        writeln!(out, "Отменено")?;
        return Ok(());
    }

    match tracker.delete_order(&id)? {
        Some(order) => writeln!(out, "Заказ {} ({}) удалён", order.id, order.client_name)?,
        None => return Err(CoreError::OrderNotFound(raw_id.to_string()).into()),
    }
    Ok(())
}

fn confirm(prompt: &str, input: &mut impl BufRead, out: &mut impl Write) -> Result<bool> {
    write!(out, "{prompt}")?;
    out.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(matches!(answer.as_str(), "y" | "yes" | "д" | "да"))
}

fn short_id(id: &OrderId) -> String {
    id.as_str().chars().take(8).collect()
}
