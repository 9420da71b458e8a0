pub mod errors;
pub mod models;
pub mod services;
pub mod storage;

use std::path::Path;

use chrono::{DateTime, Local, TimeZone, Utc};
use models::{
    analytics::{MonthlyStats, PaymentBreakdown},
    chart::{Granularity, IncomeCharts, IncomeSeries},
    currency::Currency,
    order::{Order, OrderDraft, OrderId, StatusFilter},
    settings::Settings,
};
use services::{
    analytics_service::{AnalyticsService, RECENT_ORDERS_LIMIT},
    chart_service::ChartService,
    currency_service::CurrencyService,
    order_service::OrderService,
};
use storage::kv::{FileStore, KeyValueStore, MemoryStore};
use storage::manager::StorageManager;

use errors::CoreError;

/// Main entry point for the Order Tracker core library.
///
/// Owns the order list, the settings record and the key-value medium they are
/// persisted to. Every mutation is applied to a copy, written to the medium,
/// and only then made visible, so a failed write leaves the tracker unchanged.
#[must_use]
pub struct OrderTracker {
    orders: Vec<Order>,
    settings: Settings,
    store: Box<dyn KeyValueStore>,
    order_service: OrderService,
    currency_service: CurrencyService,
    analytics_service: AnalyticsService,
    chart_service: ChartService,
}

impl std::fmt::Debug for OrderTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderTracker")
            .field("orders", &self.orders.len())
            .field("settings", &self.settings)
            .field("store", &self.store.name())
            .finish()
    }
}

impl OrderTracker {
    /// Load orders and settings from `store`.
    ///
    /// Never fails: missing or malformed data loads as an empty list and
    /// default settings.
    pub fn open(store: Box<dyn KeyValueStore>) -> Self {
        let orders = StorageManager::load_orders(store.as_ref());
        let settings = StorageManager::load_settings(store.as_ref());
        tracing::debug!(orders = orders.len(), currency = %settings.currency, "order tracker opened");

        Self {
            orders,
            settings,
            store,
            order_service: OrderService::new(),
            currency_service: CurrencyService::new(),
            analytics_service: AnalyticsService::new(),
            chart_service: ChartService::new(),
        }
    }

    /// Open a tracker backed by a JSON key-value file on disk.
    pub fn open_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let store = FileStore::open(path)?;
        Ok(Self::open(Box::new(store)))
    }

    /// A tracker with nothing persisted beyond the process.
    pub fn in_memory() -> Self {
        Self::open(Box::new(MemoryStore::new()))
    }

    // ── Order Management ────────────────────────────────────────────

    /// Create an order from a form draft, stamped with the active currency.
    pub fn create_order(&mut self, draft: OrderDraft) -> Result<Order, CoreError> {
        self.create_order_at(draft, Utc::now())
    }

    /// Same as [`Self::create_order`] with an explicit creation instant.
    pub fn create_order_at(
        &mut self,
        draft: OrderDraft,
        now: DateTime<Utc>,
    ) -> Result<Order, CoreError> {
        let mut next = self.orders.clone();
        let order = self
            .order_service
            .add_order(&mut next, draft, self.settings.currency, now)?;
        self.commit_orders(next)?;
        tracing::debug!(id = %order.id, amount = order.amount, currency = %order.currency, "order created");
        Ok(order)
    }

    /// Mark an order completed.
    ///
    /// Returns `true` if the order transitioned, `false` if it was already
    /// completed or does not exist. The collection is persisted either way.
    pub fn complete_order(&mut self, id: &OrderId) -> Result<bool, CoreError> {
        self.complete_order_at(id, Utc::now())
    }

    /// Same as [`Self::complete_order`] with an explicit completion instant.
    pub fn complete_order_at(&mut self, id: &OrderId, now: DateTime<Utc>) -> Result<bool, CoreError> {
        let mut next = self.orders.clone();
        let changed = self.order_service.complete_order(&mut next, id, now);
        self.commit_orders(next)?;
        tracing::debug!(%id, changed, "complete order");
        Ok(changed)
    }

    /// Delete an order, returning it if it existed.
    /// The collection is persisted either way.
    pub fn delete_order(&mut self, id: &OrderId) -> Result<Option<Order>, CoreError> {
        let mut next = self.orders.clone();
        let removed = self.order_service.delete_order(&mut next, id);
        self.commit_orders(next)?;
        tracing::debug!(%id, removed = removed.is_some(), "delete order");
        Ok(removed)
    }

    /// Get a single order by its ID.
    #[must_use]
    pub fn get_order(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| &o.id == id)
    }

    /// All orders in creation (insertion) order.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    #[must_use]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Orders for the list view: status filter plus text search, newest first.
    #[must_use]
    pub fn query_orders(&self, filter: StatusFilter, search: &str) -> Vec<&Order> {
        self.order_service.query(&self.orders, filter, search)
    }

    // ── Dashboard ───────────────────────────────────────────────────

    /// This month's figures as raw sums, using the local clock.
    #[must_use]
    pub fn monthly_stats(&self) -> MonthlyStats {
        self.monthly_stats_at(&Local::now())
    }

    /// Monthly figures for the calendar month containing `now`.
    ///
    /// Earnings add up each order's `amount` as recorded, without conversion.
    #[must_use]
    pub fn monthly_stats_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> MonthlyStats {
        self.analytics_service.monthly_stats(&self.orders, now)
    }

    /// Monthly figures with every amount converted into the active currency.
    #[must_use]
    pub fn converted_monthly_stats_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> MonthlyStats {
        self.analytics_service
            .monthly_stats_in(&self.orders, now, self.settings.currency)
    }

    /// The five most recently created orders, newest first.
    #[must_use]
    pub fn recent_orders(&self) -> Vec<&Order> {
        self.analytics_service
            .recent_orders(&self.orders, RECENT_ORDERS_LIMIT)
    }

    /// Daily, monthly and yearly income series ending today (local clock).
    #[must_use]
    pub fn income_charts(&self) -> IncomeCharts {
        self.income_charts_at(&Local::now())
    }

    #[must_use]
    pub fn income_charts_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> IncomeCharts {
        self.chart_service.income_charts(&self.orders, now)
    }

    /// Income series with every amount converted into the active currency.
    #[must_use]
    pub fn converted_income_charts_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> IncomeCharts {
        self.chart_service
            .income_charts_in(&self.orders, now, self.settings.currency)
    }

    /// A single income series ending at `now`.
    #[must_use]
    pub fn income_series_at<Tz: TimeZone>(
        &self,
        granularity: Granularity,
        now: &DateTime<Tz>,
    ) -> IncomeSeries {
        self.chart_service
            .income_series(&self.orders, granularity, now)
    }

    /// Advance/remainder split of an order using the configured percentage.
    #[must_use]
    pub fn payment_breakdown(&self, order: &Order) -> PaymentBreakdown {
        self.analytics_service
            .payment_breakdown(order, self.settings.advance_payment_percent)
    }

    /// Convert an amount between currencies at the static rates.
    #[must_use]
    pub fn convert(&self, amount: f64, from: Currency, to: Currency) -> f64 {
        self.currency_service.convert(amount, from, to)
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Switch the active currency. Existing orders keep their own currency.
    pub fn set_currency(&mut self, currency: Currency) -> Result<(), CoreError> {
        StorageManager::save_currency(self.store.as_mut(), currency)?;
        self.settings.currency = currency;
        tracing::debug!(%currency, "active currency changed");
        Ok(())
    }

    /// Apply an edit to a copy of the settings and persist it.
    ///
    /// If `edit` fails or the write fails, the current settings are kept.
    pub fn update_settings<F>(&mut self, edit: F) -> Result<(), CoreError>
    where
        F: FnOnce(&mut Settings) -> Result<(), CoreError>,
    {
        let mut next = self.settings.clone();
        edit(&mut next)?;
        StorageManager::save_settings(self.store.as_mut(), &next)?;
        self.settings = next;
        tracing::debug!("settings saved");
        Ok(())
    }

    /// Replace the company profile fields (trimmed).
    pub fn set_company_profile(
        &mut self,
        name: &str,
        phone: &str,
        email: &str,
    ) -> Result<(), CoreError> {
        self.update_settings(|s| {
            s.company_name = name.trim().to_string();
            s.company_phone = phone.trim().to_string();
            s.company_email = email.trim().to_string();
            Ok(())
        })
    }

    pub fn set_advance_payment_percent(&mut self, percent: f64) -> Result<(), CoreError> {
        self.update_settings(|s| s.set_advance_payment_percent(percent))
    }

    pub fn add_service(&mut self, name: &str) -> Result<(), CoreError> {
        self.update_settings(|s| s.add_service(name))
    }

    /// Remove a catalog entry by 0-based index, returning its name.
    pub fn remove_service(&mut self, index: usize) -> Result<String, CoreError> {
        let mut removed = String::new();
        self.update_settings(|s| {
            removed = s.remove_service(index)?;
            Ok(())
        })?;
        Ok(removed)
    }

    // ── Internal ────────────────────────────────────────────────────

    fn commit_orders(&mut self, next: Vec<Order>) -> Result<(), CoreError> {
        StorageManager::save_orders(self.store.as_mut(), &next)?;
        self.orders = next;
        Ok(())
    }
}
