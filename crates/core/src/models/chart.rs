use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::currency::Currency;

/// Calendar unit of an income bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    Day,
    Month,
    Year,
}

impl Granularity {
    /// Number of buckets the dashboard shows for this unit.
    #[must_use]
    pub const fn window(self) -> u32 {
        match self {
            Granularity::Day => 30,
            Granularity::Month => 12,
            Granularity::Year => 5,
        }
    }

    /// `chrono` format string for bucket labels.
    #[must_use]
    pub const fn label_format(self) -> &'static str {
        match self {
            Granularity::Day => "%d.%m",
            Granularity::Month => "%m.%Y",
            Granularity::Year => "%Y",
        }
    }
}

/// A single bucket of completed-order income.
///
/// The core computes the numbers; the front end only draws them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomePoint {
    /// First calendar day of the bucket
    pub start: NaiveDate,

    /// Human label (`dd.MM`, `MM.yyyy` or `yyyy`)
    pub label: String,

    /// Income of completed orders created inside the bucket
    pub income: f64,
}

/// A calendar-aligned income series, oldest bucket first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeSeries {
    pub granularity: Granularity,
    /// Currency the income was converted into; `None` for raw sums
    pub currency: Option<Currency>,
    pub points: Vec<IncomePoint>,
}

impl IncomeSeries {
    /// Sum of all buckets.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.income).sum()
    }

    /// Largest single bucket, 0 for an empty or all-zero series.
    #[must_use]
    pub fn peak(&self) -> f64 {
        self.points.iter().map(|p| p.income).fold(0.0, f64::max)
    }
}

/// The three series drawn on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeCharts {
    pub daily: IncomeSeries,
    pub monthly: IncomeSeries,
    pub yearly: IncomeSeries,
}
