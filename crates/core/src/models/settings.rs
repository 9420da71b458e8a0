use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

use super::currency::Currency;

/// Advance-payment percentage used when nothing valid is stored.
pub const DEFAULT_ADVANCE_PERCENT: f64 = 50.0;

/// Service catalog offered on the creation form when none is configured.
pub const DEFAULT_SERVICES: [&str; 6] = [
    "Ремонт кухни",
    "Ремонт ванной",
    "Полный ремонт",
    "Косметический ремонт",
    "Монтаж электрики",
    "Монтаж сантехники",
];

/// Company profile and order-creation defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub company_name: String,
    pub company_phone: String,
    pub company_email: String,

    /// Suggested advance as a percentage of the order amount (0..=100).
    pub advance_payment_percent: f64,

    /// Services offered on the creation form. Never empty once loaded.
    pub services: Vec<String>,

    /// Currency stamped on newly created orders and used for dashboard totals.
    pub currency: Currency,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            company_name: String::new(),
            company_phone: String::new(),
            company_email: String::new(),
            advance_payment_percent: DEFAULT_ADVANCE_PERCENT,
            services: default_services(),
            currency: Currency::default(),
        }
    }
}

impl Settings {
    /// Set the advance percentage, rejecting values outside 0..=100.
    pub fn set_advance_payment_percent(&mut self, percent: f64) -> Result<(), CoreError> {
        validate_advance_percent(percent)?;
        self.advance_payment_percent = percent;
        Ok(())
    }

    /// Append a service to the catalog. The name is trimmed and must not be blank.
    pub fn add_service(&mut self, name: &str) -> Result<(), CoreError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(CoreError::Validation("service name must not be blank".into()));
        }
        self.services.push(trimmed.to_string());
        Ok(())
    }

    /// Remove the service at `index` (0-based) and return it.
    ///
    /// Removing the last remaining service restores the default catalog, since
    /// an empty catalog always falls back to the defaults.
    pub fn remove_service(&mut self, index: usize) -> Result<String, CoreError> {
        if index >= self.services.len() {
            return Err(CoreError::Validation(format!(
                "service index {index} out of range (catalog has {} entries)",
                self.services.len()
            )));
        }
        let removed = self.services.remove(index);
        if self.services.is_empty() {
            self.services = default_services();
        }
        Ok(removed)
    }

    /// Look up a catalog entry by exact (case-insensitive) name.
    #[must_use]
    pub fn find_service(&self, name: &str) -> Option<&str> {
        let wanted = name.trim().to_lowercase();
        self.services
            .iter()
            .find(|s| s.to_lowercase() == wanted)
            .map(String::as_str)
    }
}

/// The built-in service catalog as owned strings.
#[must_use]
pub fn default_services() -> Vec<String> {
    DEFAULT_SERVICES.iter().map(|s| (*s).to_string()).collect()
}

pub(crate) fn validate_advance_percent(percent: f64) -> Result<(), CoreError> {
    if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
        return Err(CoreError::Validation(format!(
            "advance payment must be between 0 and 100 percent, got {percent}"
        )));
    }
    Ok(())
}
