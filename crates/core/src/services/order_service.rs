use chrono::{DateTime, Utc};

use crate::errors::CoreError;
use crate::models::currency::Currency;
use crate::models::order::{Order, OrderDraft, OrderId, StatusFilter};

/// Mutations and queries over the ordered order list.
///
/// Pure business logic with no I/O. Persistence is the caller's job.
pub struct OrderService;

impl OrderService {
    pub fn new() -> Self {
        Self
    }

    /// Validate a draft and append the resulting pending order.
    /// Returns a copy of the stored order.
    pub fn add_order(
        &self,
        orders: &mut Vec<Order>,
        draft: OrderDraft,
        currency: Currency,
        now: DateTime<Utc>,
    ) -> Result<Order, CoreError> {
        draft.validate()?;
        let order = Order::from_draft(draft, currency, now);
        orders.push(order.clone());
        Ok(order)
    }

    /// Complete the order with `id`.
    ///
    /// Returns `true` only when a pending order actually transitioned.
    /// Unknown ids and already-completed orders are a no-op.
    pub fn complete_order(&self, orders: &mut [Order], id: &OrderId, now: DateTime<Utc>) -> bool {
        orders
            .iter_mut()
            .find(|o| &o.id == id)
            .is_some_and(|order| order.mark_completed(now))
    }

    /// Remove every order with `id`, returning the first. Unknown ids are a no-op.
    pub fn delete_order(&self, orders: &mut Vec<Order>, id: &OrderId) -> Option<Order> {
        let idx = orders.iter().position(|o| &o.id == id)?;
        let removed = orders.remove(idx);
        orders.retain(|o| &o.id != id);
        Some(removed)
    }

    /// Orders matching a status filter and a free-text search, newest first.
    ///
    /// Ties on `date_created` keep their insertion order.
    pub fn query<'a>(
        &self,
        orders: &'a [Order],
        filter: StatusFilter,
        search: &str,
    ) -> Vec<&'a Order> {
        let mut result: Vec<&Order> = orders
            .iter()
            .filter(|o| filter.matches(o))
            .filter(|o| o.matches_search(search))
            .collect();
        result.sort_by(|a, b| b.date_created.cmp(&a.date_created));
        result
    }
}

impl Default for OrderService {
    fn default() -> Self {
        Self::new()
    }
}
