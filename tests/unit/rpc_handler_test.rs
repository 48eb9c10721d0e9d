//! Unit tests for the RPC handler: every JSON-RPC method dispatched by `handle_method`.
//!
//! These tests go through the same code path as the real `pagetrack-rpc`
//! binary, using an in-memory store, a temporary settings file and a manual clock.

use std::time::{Duration, Instant};

use chrono::{TimeZone, Utc};
use serde_json::json;
use tempfile::TempDir;
use tokio::sync::Mutex;

use pagetrack::app::App;
use pagetrack::managers::record_store::RecordStore;
use pagetrack::rpc_handler::{handle_method, RateLimiter};
use pagetrack::services::clock::ManualClock;
use pagetrack::services::settings_engine::SettingsEngine;
use pagetrack::types::settings::{TrackerSettings, DEFAULT_PATTERN};

const BUG_URL: &str = "https://bugs.example.org/show_bug.cgi?id=99";

/// Create a fresh App with default settings (rich mode).
async fn setup() -> (Mutex<App>, TempDir) {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let store = RecordStore::open_in_memory().await.expect("Failed to open store");
    let engine = SettingsEngine::new(Some(tmp.path().join("settings.json")));
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(), 0);
    let app = App::with_parts(store, engine, Box::new(clock)).expect("Failed to init App");
    (Mutex::new(app), tmp)
}

// ─── Ping ───

#[tokio::test]
async fn test_ping() {
    let (app, _tmp) = setup().await;
    let res = handle_method(&app, "ping", &json!({})).await.unwrap();
    assert_eq!(res, json!({"pong": true}));
}

// ─── Unknown method ───

#[tokio::test]
async fn test_unknown_method_returns_error() {
    let (app, _tmp) = setup().await;
    let res = handle_method(&app, "nonexistent.method", &json!({})).await;
    assert!(res.unwrap_err().contains("unknown method"));
}

// ─── Pages ───

#[tokio::test]
async fn test_page_open_tracks_matching_url() {
    let (app, _tmp) = setup().await;

    let res = handle_method(&app, "page.open", &json!({"url": BUG_URL})).await.unwrap();
    assert_eq!(res["outcome"], "tracked");
    assert_eq!(res["status"], "viewed");
    assert_eq!(res["identifier"], "99");
    assert_eq!(res["created"], true);
    assert_eq!(res["controls"].as_array().unwrap().len(), 7);

    let again = handle_method(&app, "page.open", &json!({"url": BUG_URL})).await.unwrap();
    assert_eq!(again["created"], false);

    let record = handle_method(&app, "page.get", &json!({"url": BUG_URL})).await.unwrap();
    assert_eq!(record["firstOpenTime"], "2024-06-01 12:00:00");
    assert_eq!(record["status"], "viewed");
}

#[tokio::test]
async fn test_page_open_skips_other_pages() {
    let (app, _tmp) = setup().await;

    let res = handle_method(&app, "page.open", &json!({"url": "https://example.com/"}))
        .await
        .unwrap();
    assert_eq!(res["outcome"], "skipped");
    assert!(res["controls"].as_array().unwrap().is_empty());

    let count = handle_method(&app, "records.count", &json!({})).await.unwrap();
    assert_eq!(count["count"], 0);
}

#[tokio::test]
async fn test_page_get_unknown_is_null() {
    let (app, _tmp) = setup().await;
    let res = handle_method(&app, "page.get", &json!({"url": "https://nowhere/"})).await.unwrap();
    assert!(res.is_null());
}

#[tokio::test]
async fn test_page_missing_url_param() {
    let (app, _tmp) = setup().await;
    let res = handle_method(&app, "page.open", &json!({})).await;
    assert_eq!(res.unwrap_err(), "missing url");
}

#[tokio::test]
async fn test_set_status() {
    let (app, _tmp) = setup().await;
    handle_method(&app, "page.open", &json!({"url": BUG_URL})).await.unwrap();

    let res = handle_method(&app, "page.set_status", &json!({"url": BUG_URL, "status": "Solved"}))
        .await
        .unwrap();
    assert_eq!(res, json!({"ok": true, "status": "solved"}));

    let record = handle_method(&app, "page.get", &json!({"url": BUG_URL})).await.unwrap();
    assert_eq!(record["status"], "solved");
    assert_eq!(record["firstSolveTime"], "2024-06-01 12:00:00");
}

#[tokio::test]
async fn test_set_status_unknown_page_and_bad_status() {
    let (app, _tmp) = setup().await;

    let res = handle_method(&app, "page.set_status", &json!({"url": BUG_URL, "status": "ignored"}))
        .await
        .unwrap();
    assert_eq!(res["ok"], false);

    let bad = handle_method(&app, "page.set_status", &json!({"url": BUG_URL, "status": "closed"})).await;
    assert_eq!(bad.unwrap_err(), "Unknown status: closed");
}

// ─── Records ───

#[tokio::test]
async fn test_records_list_export_and_clear() {
    let (app, _tmp) = setup().await;
    handle_method(&app, "page.open", &json!({"url": BUG_URL})).await.unwrap();

    let list = handle_method(&app, "records.list", &json!({})).await.unwrap();
    assert_eq!(list["items"].as_array().unwrap().len(), 1);

    let export = handle_method(&app, "records.export", &json!({})).await.unwrap();
    assert_eq!(export["notice"]["notice"], "exported");
    assert_eq!(export["export"]["rows"], 1);
    assert!(export["export"]["content"].as_str().unwrap().starts_with("URL,Bug ID,Status"));
    assert!(export["data_url"].as_str().unwrap().starts_with("data:text/csv;charset=utf-8;base64,"));

    let unconfirmed = handle_method(&app, "records.clear", &json!({})).await.unwrap();
    assert_eq!(unconfirmed["notice"]["notice"], "confirm_clear");

    let cleared = handle_method(&app, "records.clear", &json!({"confirmed": true})).await.unwrap();
    assert_eq!(cleared["message"], "Data cleared");

    let count = handle_method(&app, "records.count", &json!({})).await.unwrap();
    assert_eq!(count["count"], 0);
}

#[tokio::test]
async fn test_export_empty_store() {
    let (app, _tmp) = setup().await;
    let res = handle_method(&app, "records.export", &json!({})).await.unwrap();
    assert_eq!(res["message"], "No data to export");
    assert!(res.get("data_url").is_none());
}

// ─── UI ───

#[tokio::test]
async fn test_ui_action_set_status() {
    let (app, _tmp) = setup().await;
    handle_method(&app, "page.open", &json!({"url": BUG_URL})).await.unwrap();

    let res = handle_method(
        &app,
        "ui.action",
        &json!({"url": BUG_URL, "action": {"type": "set_status", "status": "analyzing"}}),
    )
    .await
    .unwrap();
    assert_eq!(res["message"], "Status: Analyzing");

    let controls = handle_method(&app, "ui.controls", &json!({"url": BUG_URL})).await.unwrap();
    let active: Vec<&str> = controls["items"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|c| c["active"] == true)
        .map(|c| c["id"].as_str().unwrap())
        .collect();
    assert_eq!(active, vec!["status-analyzing"]);
}

#[tokio::test]
async fn test_ui_action_invalid() {
    let (app, _tmp) = setup().await;
    let missing = handle_method(&app, "ui.action", &json!({})).await;
    assert_eq!(missing.unwrap_err(), "missing action");

    let bad = handle_method(&app, "ui.action", &json!({"action": {"type": "explode"}})).await;
    assert!(bad.unwrap_err().starts_with("invalid action"));
}

// ─── Settings ───

#[tokio::test]
async fn test_settings_get_defaults() {
    let (app, _tmp) = setup().await;
    let res = handle_method(&app, "settings.get", &json!({})).await.unwrap();
    assert_eq!(res["tracking"]["mode"], "rich");
    assert_eq!(res["export"]["filename"], "urls.csv");
}

#[tokio::test]
async fn test_settings_set_switches_mode() {
    let (app, tmp) = setup().await;

    let res = handle_method(&app, "settings.set", &json!({"key": "tracking.mode", "value": "simple"}))
        .await
        .unwrap();
    assert_eq!(res, json!({"ok": true}));
    assert!(tmp.path().join("settings.json").exists());

    let open = handle_method(&app, "page.open", &json!({"url": "https://example.com/"}))
        .await
        .unwrap();
    assert_eq!(open["outcome"], "saved");
    assert_eq!(open["inserted"], true);
    assert_eq!(open["controls"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_settings_set_rejects_unknown_key() {
    let (app, _tmp) = setup().await;
    let res = handle_method(&app, "settings.set", &json!({"key": "tracking.nope", "value": 1})).await;
    assert!(res.unwrap_err().contains("Invalid settings key"));
}

#[tokio::test]
async fn test_settings_set_rejected_pattern_is_not_saved() {
    let (app, tmp) = setup().await;
    let settings_path = tmp.path().join("settings.json");
    handle_method(&app, "settings.set", &json!({"key": "tracking.mode", "value": "rich"}))
        .await
        .unwrap();

    let res = handle_method(
        &app,
        "settings.set",
        &json!({"key": "tracking.pattern", "value": "(unclosed"}),
    )
    .await;
    assert!(res.unwrap_err().contains("Invalid settings value"));

    let on_disk: TrackerSettings =
        serde_json::from_str(&std::fs::read_to_string(&settings_path).unwrap()).unwrap();
    assert_eq!(on_disk.tracking.pattern, DEFAULT_PATTERN);

    let current = handle_method(&app, "settings.get", &json!({})).await.unwrap();
    assert_eq!(current["tracking"]["pattern"], DEFAULT_PATTERN);

    let restarted = App::new(Some(settings_path), Some(tmp.path().join("pagetrack.db"))).await;
    assert!(restarted.is_ok(), "app must still start: {:?}", restarted.err());

    let open = handle_method(&app, "page.open", &json!({"url": BUG_URL})).await.unwrap();
    assert_eq!(open["outcome"], "tracked");
}

#[tokio::test]
async fn test_settings_set_keeps_clock_when_offset_unchanged() {
    let (app, _tmp) = setup().await;
    handle_method(
        &app,
        "settings.set",
        &json!({"key": "tracking.default_status", "value": "ignored"}),
    )
    .await
    .unwrap();

    handle_method(&app, "page.open", &json!({"url": BUG_URL})).await.unwrap();
    let record = handle_method(&app, "page.get", &json!({"url": BUG_URL})).await.unwrap();
    assert_eq!(record["status"], "ignored");
    assert_eq!(record["firstOpenTime"], "2024-06-01 12:00:00");
    assert_eq!(record["firstIgnoreTime"], "2024-06-01 12:00:00");
}

// ─── Rate limiting ───

#[test]
fn test_rate_limiter_caps_each_window() {
    let mut limiter = RateLimiter::new(3);
    let start = Instant::now();

    let allowed: Vec<bool> = (0..5).map(|_| limiter.allow_at(start)).collect();
    assert_eq!(allowed, vec![true, true, true, false, false]);

    assert!(!limiter.allow_at(start + Duration::from_millis(999)));
    assert!(limiter.allow_at(start + Duration::from_secs(1)));
}
