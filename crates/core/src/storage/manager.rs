use std::collections::HashSet;

use crate::errors::CoreError;
use crate::models::currency::Currency;
use crate::models::order::Order;
use crate::models::settings::{self, Settings, DEFAULT_ADVANCE_PERCENT};

use super::kv::KeyValueStore;

/// Key holding the JSON array of orders.
pub const ORDERS_KEY: &str = "orders";
/// Key holding the active currency code.
pub const CURRENCY_KEY: &str = "currency";
pub const COMPANY_NAME_KEY: &str = "companyName";
pub const COMPANY_PHONE_KEY: &str = "companyPhone";
pub const COMPANY_EMAIL_KEY: &str = "companyEmail";
/// Key holding the advance percentage as a decimal string.
pub const ADVANCE_PAYMENT_KEY: &str = "advancePayment";
/// Key holding the JSON array of service names.
pub const SERVICES_KEY: &str = "services";

/// Typed load/save of orders and settings on top of a [`KeyValueStore`].
///
/// Loading fails open: anything missing or malformed comes back as the empty
/// list or the default value, with a warning logged. Saving propagates
/// medium errors.
pub struct StorageManager;

impl StorageManager {
    /// Rehydrate the order list. Absent or unparseable data yields an empty list.
    ///
    /// Records that break an order invariant are dropped one by one with a
    /// warning, as is every record repeating an id already seen. The rest of
    /// the list loads unchanged.
    pub fn load_orders(store: &dyn KeyValueStore) -> Vec<Order> {
        let Some(raw) = store.get(ORDERS_KEY) else {
            return Vec::new();
        };

        let parsed = match serde_json::from_str::<Vec<Order>>(&raw) {
            Ok(orders) => orders,
            Err(e) => {
                tracing::warn!(error = %e, medium = store.name(), "stored orders are malformed, starting empty");
                return Vec::new();
            }
        };

        let mut seen = HashSet::new();
        let orders: Vec<Order> = parsed
            .into_iter()
            .filter(|order| {
                if let Err(e) = order.check_invariants() {
                    tracing::warn!(error = %e, medium = store.name(), "dropping invalid stored order");
                    return false;
                }
                if !seen.insert(order.id.clone()) {
                    tracing::warn!(id = %order.id, medium = store.name(), "dropping stored order with duplicate id");
                    return false;
                }
                true
            })
            .collect();

        tracing::debug!(count = orders.len(), medium = store.name(), "orders loaded");
        orders
    }

    /// Serialize and write the full order list.
    pub fn save_orders(store: &mut dyn KeyValueStore, orders: &[Order]) -> Result<(), CoreError> {
        let payload = serde_json::to_string(orders)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize orders: {e}")))?;
        store.set(ORDERS_KEY, payload)?;
        tracing::debug!(count = orders.len(), medium = store.name(), "orders persisted");
        Ok(())
    }

    /// Read every settings key, substituting defaults for missing or bad values.
    pub fn load_settings(store: &dyn KeyValueStore) -> Settings {
        let defaults = Settings::default();

        Settings {
            company_name: store.get(COMPANY_NAME_KEY).unwrap_or_default(),
            company_phone: store.get(COMPANY_PHONE_KEY).unwrap_or_default(),
            company_email: store.get(COMPANY_EMAIL_KEY).unwrap_or_default(),
            advance_payment_percent: Self::load_advance_percent(store),
            services: Self::load_services(store),
            currency: Self::load_currency(store).unwrap_or(defaults.currency),
        }
    }

    /// Write every settings key.
    pub fn save_settings(store: &mut dyn KeyValueStore, settings: &Settings) -> Result<(), CoreError> {
        store.set(COMPANY_NAME_KEY, settings.company_name.clone())?;
        store.set(COMPANY_PHONE_KEY, settings.company_phone.clone())?;
        store.set(COMPANY_EMAIL_KEY, settings.company_email.clone())?;
        store.set(ADVANCE_PAYMENT_KEY, settings.advance_payment_percent.to_string())?;
        let services = serde_json::to_string(&settings.services)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize services: {e}")))?;
        store.set(SERVICES_KEY, services)?;
        Self::save_currency(store, settings.currency)
    }

    /// Write only the active currency.
    pub fn save_currency(store: &mut dyn KeyValueStore, currency: Currency) -> Result<(), CoreError> {
        store.set(CURRENCY_KEY, currency.code().to_string())
    }

    fn load_currency(store: &dyn KeyValueStore) -> Option<Currency> {
        let raw = store.get(CURRENCY_KEY)?;
        match raw.parse::<Currency>() {
            Ok(currency) => Some(currency),
            Err(e) => {
                tracing::warn!(error = %e, "stored currency is invalid, using default");
                None
            }
        }
    }

    fn load_advance_percent(store: &dyn KeyValueStore) -> f64 {
        let Some(raw) = store.get(ADVANCE_PAYMENT_KEY) else {
            return DEFAULT_ADVANCE_PERCENT;
        };

        match raw.trim().parse::<f64>() {
            Ok(percent) if settings::validate_advance_percent(percent).is_ok() => percent,
            _ => {
                tracing::warn!(value = %raw, "stored advance payment is invalid, using default");
                DEFAULT_ADVANCE_PERCENT
            }
        }
    }

    fn load_services(store: &dyn KeyValueStore) -> Vec<String> {
        let Some(raw) = store.get(SERVICES_KEY) else {
            return settings::default_services();
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(services) => {
                let services: Vec<String> = services
                    .into_iter()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                if services.is_empty() {
                    settings::default_services()
                } else {
                    services
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "stored service catalog is malformed, using defaults");
                settings::default_services()
            }
        }
    }
}
