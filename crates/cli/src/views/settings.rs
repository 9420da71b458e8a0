use std::io::Write;

use order_tracker_core::models::currency::Currency;
use order_tracker_core::OrderTracker;

use crate::error::Result;

/// Fields the `settings set` subcommand may change. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub company_name: Option<String>,
    pub company_phone: Option<String>,
    pub company_email: Option<String>,
    pub advance_payment: Option<f64>,
    pub currency: Option<Currency>,
}

impl SettingsPatch {
    fn is_empty(&self) -> bool {
        self.company_name.is_none()
            && self.company_phone.is_none()
            && self.company_email.is_none()
            && self.advance_payment.is_none()
            && self.currency.is_none()
    }
}

pub fn show(tracker: &OrderTracker, out: &mut impl Write) -> Result<()> {
    let settings = tracker.settings();
    let or_dash = |s: &str| if s.is_empty() { "—".to_string() } else { s.to_string() };

    writeln!(out, "Общие настройки")?;
    writeln!(out, "Компания:  {}", or_dash(&settings.company_name))?;
    writeln!(out, "Телефон:   {}", or_dash(&settings.company_phone))?;
    writeln!(out, "Email:     {}", or_dash(&settings.company_email))?;
    writeln!(out, "Аванс:     {}%", settings.advance_payment_percent)?;
    writeln!(
        out,
        "Валюта:    {} ({}, {})",
        settings.currency.code(),
        settings.currency.name(),
        settings.currency.symbol()
    )?;
    writeln!(out)?;
    writeln!(out, "Список услуг")?;
    for (i, service) in settings.services.iter().enumerate() {
        writeln!(out, "  {}. {service}", i + 1)?;
    }
    Ok(())
}

/// Apply every given field in one save; nothing is written if any field is invalid.
pub fn apply(tracker: &mut OrderTracker, patch: SettingsPatch, out: &mut impl Write) -> Result<()> {
    if patch.is_empty() {
        writeln!(out, "Нечего менять")?;
        return Ok(());
    }

    tracker.update_settings(|s| {
        if let Some(name) = &patch.company_name {
            s.company_name = name.trim().to_string();
        }
        if let Some(phone) = &patch.company_phone {
            s.company_phone = phone.trim().to_string();
        }
        if let Some(email) = &patch.company_email {
            s.company_email = email.trim().to_string();
        }
        if let Some(percent) = patch.advance_payment {
            s.set_advance_payment_percent(percent)?;
        }
        if let Some(currency) = patch.currency {
            s.currency = currency;
        }
        Ok(())
    })?;

    writeln!(out, "Настройки сохранены")?;
    Ok(())
}

pub fn add_service(tracker: &mut OrderTracker, name: &str, out: &mut impl Write) -> Result<()> {
    tracker.add_service(name)?;
    writeln!(out, "Услуга добавлена: {}", name.trim())?;
    Ok(())
}

/// Remove by the 1-based position shown in `settings show`.
pub fn remove_service(tracker: &mut OrderTracker, position: usize, out: &mut impl Write) -> Result<()> {
    let index = position.checked_sub(1).unwrap_or(usize::MAX);
    let removed = tracker.remove_service(index)?;
    writeln!(out, "Услуга удалена: {removed}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use order_tracker_core::errors::CoreError;

    #[test]
    fn show_lists_numbered_catalog() {
        let tracker = OrderTracker::in_memory();
        let mut out = Vec::<u8>::new();
        show(&tracker, &mut out).unwrap();
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("  1. Ремонт кухни"));
        assert!(printed.contains("  6. Монтаж сантехники"));
        assert!(printed.contains("Аванс:     50%"));
        assert!(printed.contains("RUB (Рубль, ₽)"));
    }

    #[test]
    fn patch_applies_all_fields() {
        let mut tracker = OrderTracker::in_memory();
        let patch = SettingsPatch {
            company_name: Some(" Мастер ".into()),
            advance_payment: Some(30.0),
            currency: Some(Currency::Kzt),
            ..SettingsPatch::default()
        };
        apply(&mut tracker, patch, &mut Vec::<u8>::new()).unwrap();
        let s = tracker.settings();
        assert_eq!(s.company_name, "Мастер");
        assert_eq!(s.advance_payment_percent, 30.0);
        assert_eq!(s.currency, Currency::Kzt);
    }

    #[test]
    fn invalid_patch_changes_nothing() {
        let mut tracker = OrderTracker::in_memory();
        let patch = SettingsPatch {
            company_name: Some("Мастер".into()),
            advance_payment: Some(250.0),
            ..SettingsPatch::default()
        };
        let result = apply(&mut tracker, patch, &mut Vec::<u8>::new());
        assert!(matches!(result, Err(AppError::Core(CoreError::Validation(_)))));
        assert_eq!(tracker.settings().company_name, "");
    }

    #[test]
    fn remove_by_position() {
        let mut tracker = OrderTracker::in_memory();
        let mut out = Vec::<u8>::new();
        remove_service(&mut tracker, 2, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("Ремонт ванной"));
        assert!(remove_service(&mut tracker, 0, &mut Vec::<u8>::new()).is_err());
    }
}
