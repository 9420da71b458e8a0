use serde::{Deserialize, Serialize};

use super::currency::Currency;

/// Dashboard figures for the current calendar month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStats {
    /// Currency the earnings were converted into; `None` for raw sums
    pub currency: Option<Currency>,

    /// Orders created this month
    pub total_orders: usize,

    /// Orders created this month that are completed
    pub completed_orders: usize,

    /// Sum of amounts of all orders created this month
    pub total_earnings: f64,

    /// Sum of amounts of this month's completed orders
    pub completed_earnings: f64,

    /// Incomplete orders across the whole store, regardless of month
    pub pending_orders: usize,
}

/// Split of an order amount into the suggested advance and the rest.
///
/// All figures are in the order's own currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentBreakdown {
    pub currency: Currency,
    pub total: f64,
    pub advance_percent: f64,
    pub advance: f64,
    pub remainder: f64,
}

impl PaymentBreakdown {
    #[must_use]
    pub fn new(total: f64, advance_percent: f64, currency: Currency) -> Self {
        let advance = total * advance_percent / 100.0;
        Self {
            currency,
            total,
            advance_percent,
            advance,
            remainder: total - advance,
        }
    }
}
