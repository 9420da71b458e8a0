use chrono::{DateTime, Datelike, Days, Months, NaiveDate, TimeZone};

use crate::models::chart::{Granularity, IncomeCharts, IncomePoint, IncomeSeries};
use crate::models::currency::Currency;
use crate::models::order::Order;
use crate::services::currency_service::CurrencyService;

/// Generates chart-ready income series from the order list.
///
/// Buckets are calendar-aligned in the time zone of `now`: a day bucket runs
/// from local midnight to the next midnight, a month bucket from the 1st to
/// the 1st of the next month, a year bucket from January 1st to January 1st.
/// Only completed orders contribute, attributed by their creation date.
pub struct ChartService {
    currency_service: CurrencyService,
}

impl ChartService {
    pub fn new() -> Self {
        Self {
            currency_service: CurrencyService::new(),
        }
    }

    /// Daily (30), monthly (12) and yearly (5) series ending at `now`,
    /// summing raw order amounts.
    pub fn income_charts<Tz: TimeZone>(&self, orders: &[Order], now: &DateTime<Tz>) -> IncomeCharts {
        self.build_charts(orders, now, None)
    }

    /// [`Self::income_charts`] with every amount converted into `display`.
    pub fn income_charts_in<Tz: TimeZone>(
        &self,
        orders: &[Order],
        now: &DateTime<Tz>,
        display: Currency,
    ) -> IncomeCharts {
        self.build_charts(orders, now, Some(display))
    }

    /// One income series of raw amounts, oldest bucket first, ending with the
    /// bucket that contains `now`.
    pub fn income_series<Tz: TimeZone>(
        &self,
        orders: &[Order],
        granularity: Granularity,
        now: &DateTime<Tz>,
    ) -> IncomeSeries {
        self.build_series(orders, granularity, now, None)
    }

    /// [`Self::income_series`] with every amount converted into `display`.
    pub fn income_series_in<Tz: TimeZone>(
        &self,
        orders: &[Order],
        granularity: Granularity,
        now: &DateTime<Tz>,
        display: Currency,
    ) -> IncomeSeries {
        self.build_series(orders, granularity, now, Some(display))
    }

    fn build_charts<Tz: TimeZone>(
        &self,
        orders: &[Order],
        now: &DateTime<Tz>,
        display: Option<Currency>,
    ) -> IncomeCharts {
        IncomeCharts {
            daily: self.build_series(orders, Granularity::Day, now, display),
            monthly: self.build_series(orders, Granularity::Month, now, display),
            yearly: self.build_series(orders, Granularity::Year, now, display),
        }
    }

    fn build_series<Tz: TimeZone>(
        &self,
        orders: &[Order],
        granularity: Granularity,
        now: &DateTime<Tz>,
        display: Option<Currency>,
    ) -> IncomeSeries {
        let tz = now.timezone();
        let today = now.date_naive();

        // Local creation date and amount of every completed order
        let completed: Vec<(NaiveDate, f64)> = orders
            .iter()
            .filter(|o| o.completed)
            .map(|o| {
                (
                    o.date_created.with_timezone(&tz).date_naive(),
                    match display {
                        Some(target) => self.currency_service.order_amount_in(o, target),
                        None => o.amount,
                    },
                )
            })
            .collect();

        let points = bucket_starts(granularity, today)
            .into_iter()
            .filter_map(|start| {
                let end = next_bucket_start(granularity, start)?;
                let income: f64 = completed
                    .iter()
                    .filter(|(date, _)| *date >= start && *date < end)
                    .map(|(_, amount)| amount)
                    .sum();
                Some(IncomePoint {
                    start,
                    label: start.format(granularity.label_format()).to_string(),
                    income,
                })
            })
            .collect();

        IncomeSeries {
            granularity,
            currency: display,
            points,
        }
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}

/// First day of every bucket in the window, oldest first.
fn bucket_starts(granularity: Granularity, today: NaiveDate) -> Vec<NaiveDate> {
    let window = granularity.window();
    let Some(current) = bucket_start(granularity, today) else {
        return Vec::new();
    };

    (0..window)
        .rev()
        .filter_map(|back| match granularity {
            Granularity::Day => current.checked_sub_days(Days::new(u64::from(back))),
            Granularity::Month => current.checked_sub_months(Months::new(back)),
            Granularity::Year => current.checked_sub_months(Months::new(back * 12)),
        })
        .collect()
}

/// Start of the bucket containing `date`.
fn bucket_start(granularity: Granularity, date: NaiveDate) -> Option<NaiveDate> {
    match granularity {
        Granularity::Day => Some(date),
        Granularity::Month => date.with_day(1),
        Granularity::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1),
    }
}

fn next_bucket_start(granularity: Granularity, start: NaiveDate) -> Option<NaiveDate> {
    match granularity {
        Granularity::Day => start.checked_add_days(Days::new(1)),
        Granularity::Month => start.checked_add_months(Months::new(1)),
        Granularity::Year => start.checked_add_months(Months::new(12)),
    }
}
