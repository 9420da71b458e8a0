use crate::models::currency::Currency;
use crate::models::order::Order;

/// Converts amounts between the supported currencies.
///
/// Rates are static and pivot through the rouble:
/// `convert(a, from, to) = a / rate(from) * rate(to)`.
pub struct CurrencyService;

impl CurrencyService {
    pub fn new() -> Self {
        Self
    }

    /// Convert `amount` from one currency to another.
    /// E.g., convert(1000.0, Rub, Kzt) → 5500.0
    ///
    /// Same-currency conversion returns the input untouched.
    #[must_use]
    pub fn convert(&self, amount: f64, from: Currency, to: Currency) -> f64 {
        if from == to {
            return amount;
        }
        amount / from.rate() * to.rate()
    }

    /// Value of an order expressed in `target`.
    #[must_use]
    pub fn order_amount_in(&self, order: &Order, target: Currency) -> f64 {
        self.convert(order.amount, order.currency, target)
    }
}

impl Default for CurrencyService {
    fn default() -> Self {
        Self::new()
    }
}
