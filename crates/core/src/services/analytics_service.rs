use chrono::{DateTime, Datelike, TimeZone};

use crate::models::analytics::{MonthlyStats, PaymentBreakdown};
use crate::models::currency::Currency;
use crate::models::order::Order;
use crate::services::currency_service::CurrencyService;

/// How many orders the dashboard lists under "recent".
pub const RECENT_ORDERS_LIMIT: usize = 5;

/// Derives dashboard statistics from the flat order list.
///
/// Every function is pure and total: an empty list yields zeroes, never an
/// error. Calendar questions ("is this order from this month?") are answered
/// in the time zone of the `now` passed in.
pub struct AnalyticsService {
    currency_service: CurrencyService,
}

impl AnalyticsService {
    pub fn new() -> Self {
        Self {
            currency_service: CurrencyService::new(),
        }
    }

    /// Counts and earnings for the calendar month containing `now`.
    ///
    /// Earnings are the plain sum of each order's `amount`, whatever currency
    /// it was recorded in; `pending_orders` counts incomplete orders across
    /// the whole list.
    pub fn monthly_stats<Tz: TimeZone>(&self, orders: &[Order], now: &DateTime<Tz>) -> MonthlyStats {
        self.collect_monthly(orders, now, None)
    }

    /// Same counts as [`Self::monthly_stats`], with every amount converted
    /// into `display` before summing.
    pub fn monthly_stats_in<Tz: TimeZone>(
        &self,
        orders: &[Order],
        now: &DateTime<Tz>,
        display: Currency,
    ) -> MonthlyStats {
        self.collect_monthly(orders, now, Some(display))
    }

    fn collect_monthly<Tz: TimeZone>(
        &self,
        orders: &[Order],
        now: &DateTime<Tz>,
        display: Option<Currency>,
    ) -> MonthlyStats {
        let tz = now.timezone();
        let (year, month) = (now.year(), now.month());

        let mut stats = MonthlyStats {
            currency: display,
            ..MonthlyStats::default()
        };

        for order in orders {
            if !order.completed {
                stats.pending_orders += 1;
            }

            let created = order.date_created.with_timezone(&tz);
            if created.year() != year || created.month() != month {
                continue;
            }

            let amount = match display {
                Some(target) => self.currency_service.order_amount_in(order, target),
                None => order.amount,
            };
            stats.total_orders += 1;
            stats.total_earnings += amount;
            if order.completed {
                stats.completed_orders += 1;
                stats.completed_earnings += amount;
            }
        }

        stats
    }

    /// The `limit` most recently created orders, newest first.
    ///
    /// The sort is stable, so orders sharing a timestamp keep list order.
    pub fn recent_orders<'a>(&self, orders: &'a [Order], limit: usize) -> Vec<&'a Order> {
        let mut sorted: Vec<&Order> = orders.iter().collect();
        sorted.sort_by(|a, b| b.date_created.cmp(&a.date_created));
        sorted.truncate(limit);
        sorted
    }

    /// Suggested advance and remainder for an order, in the order's currency.
    #[must_use]
    pub fn payment_breakdown(&self, order: &Order, advance_percent: f64) -> PaymentBreakdown {
        PaymentBreakdown::new(order.amount, advance_percent, order.currency)
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new()
    }
}
