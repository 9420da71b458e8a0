// ═══════════════════════════════════════════════════════════════════
// Storage Tests — MemoryStore, FileStore, StorageManager
// ═══════════════════════════════════════════════════════════════════

use chrono::{TimeZone, Utc};
use order_tracker_core::models::currency::Currency;
use order_tracker_core::models::order::{Order, OrderDraft};
use order_tracker_core::models::settings::{Settings, DEFAULT_ADVANCE_PERCENT, DEFAULT_SERVICES};
use order_tracker_core::storage::kv::{FileStore, KeyValueStore, MemoryStore};
use order_tracker_core::storage::manager::{
    StorageManager, ADVANCE_PAYMENT_KEY, COMPANY_NAME_KEY, CURRENCY_KEY, ORDERS_KEY, SERVICES_KEY,
};

fn sample_orders() -> Vec<Order> {
    let created = Utc.with_ymd_and_hms(2025, 4, 1, 9, 30, 0).unwrap();
    let mut done = Order::from_draft(
        OrderDraft::new("Иван", "+7 900 000 00 00", "Ремонт кухни", 150_000.0)
            .with_notes("Третий этаж"),
        Currency::Rub,
        created,
    );
    done.mark_completed(Utc.with_ymd_and_hms(2025, 4, 20, 18, 0, 0).unwrap());
    let pending = Order::from_draft(
        OrderDraft::new("Айгерим", "+7 701 000 00 00", "Монтаж электрики", 90_000.0),
        Currency::Kzt,
        created,
    );
    vec![done, pending]
}

// ═══════════════════════════════════════════════════════════════════
// MemoryStore
// ═══════════════════════════════════════════════════════════════════

mod memory_store {
    use super::*;

    #[test]
    fn starts_empty() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get("anything"), None);
        assert_eq!(store.name(), "memory");
    }

    #[test]
    fn set_get_overwrite_remove() {
        let mut store = MemoryStore::new();
        store.set("k", "v1".into()).unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v1"));

        store.set("k", "v2".into()).unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v2"));
        assert_eq!(store.len(), 1);

        store.remove("k").unwrap();
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn remove_absent_key_is_ok() {
        let mut store = MemoryStore::new();
        assert!(store.remove("missing").is_ok());
    }

    #[test]
    fn seeded_entries() {
        let store = MemoryStore::with_entries([("a", "1"), ("b", "2")]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("b").as_deref(), Some("2"));
    }
}

// ═══════════════════════════════════════════════════════════════════
// FileStore
// ═══════════════════════════════════════════════════════════════════

mod file_store {
    use super::*;

    #[test]
    fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get(ORDERS_KEY), None);
        assert_eq!(store.path(), path.as_path());
        assert!(!path.exists(), "opening must not create the file");
    }

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        {
            let mut store = FileStore::open(&path).unwrap();
            store.set("greeting", "привет".into()).unwrap();
            store.set("other", "x".into()).unwrap();
        }

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("greeting").as_deref(), Some("привет"));
        assert_eq!(store.get("other").as_deref(), Some("x"));
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("storage.json");

        let mut store = FileStore::open(&path).unwrap();
        store.set("k", "v".into()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn file_is_a_json_object_of_strings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let mut store = FileStore::open(&path).unwrap();
        store.set(CURRENCY_KEY, "KZT".into()).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed[CURRENCY_KEY], "KZT");
    }

    #[test]
    fn corrupt_file_opens_empty_and_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "{ not json").unwrap();

        let mut store = FileStore::open(&path).unwrap();
        assert_eq!(store.get(ORDERS_KEY), None);

        store.set("k", "v".into()).unwrap();
        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("k").as_deref(), Some("v"));
    }

    #[test]
    fn non_utf8_file_opens_empty_and_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, [0xff, 0xfe, b'{', b'}']).unwrap();

        let mut store = FileStore::open(&path).unwrap();
        assert_eq!(store.get(ORDERS_KEY), None);

        store.set(CURRENCY_KEY, "USD".into()).unwrap();
        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(CURRENCY_KEY).as_deref(), Some("USD"));
    }

    #[test]
    fn remove_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let mut store = FileStore::open(&path).unwrap();
        store.set("a", "1".into()).unwrap();
        store.set("b", "2".into()).unwrap();
        store.remove("a").unwrap();
        store.remove("never-there").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("a"), None);
        assert_eq!(reopened.get("b").as_deref(), Some("2"));
    }

    #[test]
    fn directory_path_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        // Reading a directory as a file fails with something other than NotFound
        let result = FileStore::open(dir.path());
        assert!(result.is_err());
    }
}

// ═══════════════════════════════════════════════════════════════════
// StorageManager — orders
// ═══════════════════════════════════════════════════════════════════

mod orders {
    use super::*;

    #[test]
    fn absent_key_loads_empty() {
        let store = MemoryStore::new();
        assert!(StorageManager::load_orders(&store).is_empty());
    }

    #[test]
    fn save_then_load_preserves_order_and_fields() {
        let mut store = MemoryStore::new();
        let orders = sample_orders();

        StorageManager::save_orders(&mut store, &orders).unwrap();
        let loaded = StorageManager::load_orders(&store);

        assert_eq!(loaded, orders);
        assert_eq!(loaded[0].client_name, "Иван");
        assert_eq!(loaded[1].currency, Currency::Kzt);
    }

    #[test]
    fn stored_as_camel_case_json_array() {
        let mut store = MemoryStore::new();
        StorageManager::save_orders(&mut store, &sample_orders()).unwrap();

        let raw = store.get(ORDERS_KEY).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let first = &value.as_array().unwrap()[0];
        assert!(first.get("clientName").is_some());
        assert!(first.get("dateCreated").is_some());
        assert!(first.get("dateCompleted").is_some());
        assert!(value[1].get("dateCompleted").is_none());
    }

    #[test]
    fn malformed_payload_loads_empty() {
        let store = MemoryStore::with_entries([(ORDERS_KEY, "[{\"broken\":")]);
        assert!(StorageManager::load_orders(&store).is_empty());
    }

    #[test]
    fn wrong_shape_loads_empty() {
        let store = MemoryStore::with_entries([(ORDERS_KEY, "{\"id\":\"1\"}")]);
        assert!(StorageManager::load_orders(&store).is_empty());
    }

    fn record(id: &str, amount: f64, completed: bool, date_completed: Option<&str>) -> serde_json::Value {
        let mut value = serde_json::json!({
            "id": id,
            "clientName": "Клиент",
            "service": "Ремонт ванной",
            "amount": amount,
            "dateCreated": "2025-04-10T12:00:00Z",
            "completed": completed,
        });
        if let Some(date) = date_completed {
            value["dateCompleted"] = date.into();
        }
        value
    }

    fn load(records: &[serde_json::Value]) -> Vec<Order> {
        let payload = serde_json::to_string(records).unwrap();
        let store = MemoryStore::with_entries([(ORDERS_KEY, payload.as_str())]);
        StorageManager::load_orders(&store)
    }

    fn ids(orders: &[Order]) -> Vec<&str> {
        orders.iter().map(|o| o.id.as_str()).collect()
    }

    #[test]
    fn negative_amount_record_is_dropped() {
        let loaded = load(&[record("ok", 10.0, false, None), record("bad", -5.0, false, None)]);
        assert_eq!(ids(&loaded), ["ok"]);
    }

    #[test]
    fn completed_without_date_is_dropped() {
        let loaded = load(&[record("bad", 10.0, true, None), record("ok", 10.0, false, None)]);
        assert_eq!(ids(&loaded), ["ok"]);
    }

    #[test]
    fn pending_with_completion_date_is_dropped() {
        let loaded = load(&[
            record("bad", 10.0, false, Some("2025-04-11T12:00:00Z")),
            record("ok", 10.0, true, Some("2025-04-11T12:00:00Z")),
        ]);
        assert_eq!(ids(&loaded), ["ok"]);
        assert!(loaded[0].completed);
    }

    #[test]
    fn completion_before_creation_is_dropped() {
        let loaded = load(&[
            record("bad", 10.0, true, Some("2025-04-09T12:00:00Z")),
            record("ok", 10.0, true, Some("2025-04-10T12:00:00Z")),
        ]);
        assert_eq!(ids(&loaded), ["ok"]);
    }

    #[test]
    fn duplicate_ids_keep_first_record() {
        let mut second = record("1", 20.0, false, None);
        second["clientName"] = "Второй".into();
        let loaded = load(&[record("1", 10.0, false, None), second, record("2", 5.0, false, None)]);

        assert_eq!(ids(&loaded), ["1", "2"]);
        assert_eq!(loaded[0].client_name, "Клиент");
        assert_eq!(loaded[0].amount, 10.0);
    }

    #[test]
    fn empty_array_round_trips() {
        let mut store = MemoryStore::new();
        StorageManager::save_orders(&mut store, &[]).unwrap();
        assert_eq!(store.get(ORDERS_KEY).as_deref(), Some("[]"));
        assert!(StorageManager::load_orders(&store).is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// StorageManager — settings
// ═══════════════════════════════════════════════════════════════════

mod settings {
    use super::*;

    #[test]
    fn empty_store_loads_defaults() {
        let store = MemoryStore::new();
        assert_eq!(StorageManager::load_settings(&store), Settings::default());
    }

    #[test]
    fn save_then_load() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            company_name: "СтройМастер".into(),
            company_phone: "+7 495 000 00 00".into(),
            company_email: "info@example.com".into(),
            advance_payment_percent: 30.0,
            services: vec!["Покраска".into(), "Плитка".into()],
            currency: Currency::Usd,
        };

        StorageManager::save_settings(&mut store, &settings).unwrap();
        assert_eq!(StorageManager::load_settings(&store), settings);
        assert_eq!(store.get(COMPANY_NAME_KEY).as_deref(), Some("СтройМастер"));
        assert_eq!(store.get(ADVANCE_PAYMENT_KEY).as_deref(), Some("30"));
        assert_eq!(store.get(CURRENCY_KEY).as_deref(), Some("USD"));
    }

    #[test]
    fn fractional_advance_round_trips() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            advance_payment_percent: 33.5,
            ..Settings::default()
        };
        StorageManager::save_settings(&mut store, &settings).unwrap();
        assert_eq!(StorageManager::load_settings(&store).advance_payment_percent, 33.5);
    }

    #[test]
    fn invalid_currency_falls_back_to_default() {
        let store = MemoryStore::with_entries([(CURRENCY_KEY, "EUR")]);
        assert_eq!(StorageManager::load_settings(&store).currency, Currency::Rub);
    }

    #[test]
    fn lowercase_currency_is_accepted() {
        let store = MemoryStore::with_entries([(CURRENCY_KEY, "kzt")]);
        assert_eq!(StorageManager::load_settings(&store).currency, Currency::Kzt);
    }

    #[test]
    fn unparseable_advance_falls_back() {
        let store = MemoryStore::with_entries([(ADVANCE_PAYMENT_KEY, "half")]);
        assert_eq!(
            StorageManager::load_settings(&store).advance_payment_percent,
            DEFAULT_ADVANCE_PERCENT
        );
    }

    #[test]
    fn out_of_range_advance_falls_back() {
        for raw in ["-5", "150", "NaN"] {
            let store = MemoryStore::with_entries([(ADVANCE_PAYMENT_KEY, raw)]);
            assert_eq!(
                StorageManager::load_settings(&store).advance_payment_percent,
                DEFAULT_ADVANCE_PERCENT,
                "value {raw}"
            );
        }
    }

    #[test]
    fn malformed_services_fall_back_to_defaults() {
        let store = MemoryStore::with_entries([(SERVICES_KEY, "not an array")]);
        let loaded = StorageManager::load_settings(&store);
        assert_eq!(loaded.services, DEFAULT_SERVICES.map(String::from).to_vec());
    }

    #[test]
    fn empty_services_fall_back_to_defaults() {
        let store = MemoryStore::with_entries([(SERVICES_KEY, "[\"  \", \"\"]")]);
        let loaded = StorageManager::load_settings(&store);
        assert_eq!(loaded.services.len(), DEFAULT_SERVICES.len());
    }

    #[test]
    fn blank_service_entries_are_dropped() {
        let store = MemoryStore::with_entries([(SERVICES_KEY, "[\" Плитка \", \"\", \"Окна\"]")]);
        let loaded = StorageManager::load_settings(&store);
        assert_eq!(loaded.services, vec!["Плитка".to_string(), "Окна".to_string()]);
    }

    #[test]
    fn save_currency_writes_only_currency() {
        let mut store = MemoryStore::new();
        StorageManager::save_currency(&mut store, Currency::Kzt).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(CURRENCY_KEY).as_deref(), Some("KZT"));
    }
}
