use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreError;

use super::currency::Currency;

/// Opaque order identifier.
///
/// New orders get a UUID v4 string; any other string loaded from storage is
/// accepted as-is, so ids written by older versions keep working.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Generate a fresh unique id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Completion state filter for the order list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    /// Every order
    #[default]
    All,
    /// Orders still in progress
    Pending,
    /// Finished orders
    Completed,
}

impl StatusFilter {
    #[must_use]
    pub fn matches(self, order: &Order) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => !order.completed,
            StatusFilter::Completed => order.completed,
        }
    }
}

/// The data entered on the creation form, before the store stamps an id,
/// timestamp and currency on it.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub client_name: String,
    pub phone: String,
    pub service: String,
    pub amount: f64,
    pub notes: String,
}

impl OrderDraft {
    pub fn new(
        client_name: impl Into<String>,
        phone: impl Into<String>,
        service: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            client_name: client_name.into(),
            phone: phone.into(),
            service: service.into(),
            amount,
            notes: String::new(),
        }
    }

    /// Attach free-text notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Check the required-field rules of the creation form.
    ///
    /// Client name, phone and service must be non-blank; the amount must be a
    /// finite, non-negative number.
    pub fn validate(&self) -> Result<(), CoreError> {
        let required = [
            ("client name", &self.client_name),
            ("phone", &self.phone),
            ("service", &self.service),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(CoreError::Validation(format!("{field} is required")));
            }
        }

        if !self.amount.is_finite() {
            return Err(CoreError::Validation(format!(
                "amount must be a number, got {}",
                self.amount
            )));
        }
        if self.amount < 0.0 {
            return Err(CoreError::Validation(format!(
                "amount must not be negative, got {}",
                self.amount
            )));
        }

        Ok(())
    }
}

/// One unit of billable client work.
///
/// Serialized with camelCase keys; `dateCompleted` is omitted while the order
/// is still pending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,

    pub client_name: String,

    #[serde(default)]
    pub phone: String,

    pub service: String,

    /// Non-negative amount in `currency`
    pub amount: f64,

    #[serde(default)]
    pub notes: String,

    /// Currency active when the order was created. Never converted afterwards.
    #[serde(default)]
    pub currency: Currency,

    pub date_created: DateTime<Utc>,

    #[serde(default)]
    pub completed: bool,

    /// Set exactly once, on the pending → completed transition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_completed: Option<DateTime<Utc>>,
}

impl Order {
    /// Build a pending order from a validated draft.
    pub fn from_draft(draft: OrderDraft, currency: Currency, now: DateTime<Utc>) -> Self {
        Self {
            id: OrderId::generate(),
            client_name: draft.client_name.trim().to_string(),
            phone: draft.phone.trim().to_string(),
            service: draft.service.trim().to_string(),
            amount: draft.amount,
            notes: draft.notes.trim().to_string(),
            currency,
            date_created: now,
            completed: false,
            date_completed: None,
        }
    }

    /// Move a pending order to completed.
    ///
    /// Returns `false` and leaves the order untouched when it is already
    /// completed. `date_completed` is clamped so it never precedes
    /// `date_created`.
    pub fn mark_completed(&mut self, now: DateTime<Utc>) -> bool {
        if self.completed {
            return false;
        }
        self.completed = true;
        self.date_completed = Some(now.max(self.date_created));
        true
    }

    /// Check the invariants every stored order must hold.
    ///
    /// The amount is finite and non-negative, `date_completed` is present
    /// exactly when `completed` is set, and never precedes `date_created`.
    pub fn check_invariants(&self) -> Result<(), CoreError> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(CoreError::Validation(format!(
                "order {} has invalid amount {}",
                self.id, self.amount
            )));
        }
        match (self.completed, self.date_completed) {
            (true, None) => Err(CoreError::Validation(format!(
                "order {} is completed without a completion date",
                self.id
            ))),
            (false, Some(_)) => Err(CoreError::Validation(format!(
                "order {} is pending but has a completion date",
                self.id
            ))),
            (true, Some(done)) if done < self.date_created => Err(CoreError::Validation(format!(
                "order {} was completed before it was created",
                self.id
            ))),
            _ => Ok(()),
        }
    }

    /// Case-insensitive substring match over client name, service and phone.
    #[must_use]
    pub fn matches_search(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return true;
        }
        self.client_name.to_lowercase().contains(&q)
            || self.service.to_lowercase().contains(&q)
            || self.phone.to_lowercase().contains(&q)
    }
}
