use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Currencies an order can be priced in.
///
/// The set is closed: exchange rates, symbols and names are exhaustive
/// `match`es, so adding a variant without its rate does not compile.
/// Serialized as the uppercase 3-letter code (`"RUB"`, `"KZT"`, `"USD"`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Russian rouble, the pivot currency (rate 1.0)
    #[default]
    Rub,
    /// Kazakhstani tenge
    Kzt,
    /// US dollar
    Usd,
}

impl Currency {
    /// Every supported currency, in selector order.
    pub const ALL: [Currency; 3] = [Currency::Rub, Currency::Kzt, Currency::Usd];

    /// Units of this currency per one rouble.
    #[must_use]
    pub const fn rate(self) -> f64 {
        match self {
            Currency::Rub => 1.0,
            Currency::Kzt => 5.5,
            Currency::Usd => 0.011,
        }
    }

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Rub => "RUB",
            Currency::Kzt => "KZT",
            Currency::Usd => "USD",
        }
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Currency::Rub => "₽",
            Currency::Kzt => "₸",
            Currency::Usd => "$",
        }
    }

    /// Display name used by the currency selector.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Currency::Rub => "Рубль",
            Currency::Kzt => "Тенге",
            Currency::Usd => "Доллар",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RUB" => Ok(Currency::Rub),
            "KZT" => Ok(Currency::Kzt),
            "USD" => Ok(Currency::Usd),
            other => Err(CoreError::UnsupportedCurrency(other.to_string())),
        }
    }
}

/// Render an amount as `"<grouped amount> <symbol>"`.
///
/// Thousands are separated with spaces and at most two fraction digits are
/// kept, trailing zeros trimmed: `1500.5` in RUB → `"1 500.5 ₽"`.
#[must_use]
pub fn format_amount(amount: f64, currency: Currency) -> String {
    format!("{} {}", group_thousands(amount), currency.symbol())
}

fn group_thousands(amount: f64) -> String {
    let rounded = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(*ch);
    }

    let negative = amount < 0.0 && (int_part != "0" || !frac.is_empty());
    let sign = if negative { "-" } else { "" };
    if frac.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac}")
    }
}
