//! RPC method handler for the pagetrack JSON-RPC bridge.
//!
//! Kept apart from `rpc_server.rs` so it can be unit-tested independently.
//! `handle_method` dispatches one method call against the shared `App`;
//! `RateLimiter` throttles the server's read loop.

use std::time::{Duration, Instant};

use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::app::App;
use crate::managers::record_store::RecordStoreTrait;
use crate::services::exporter::{self, DetachedTarget};
use crate::services::settings_engine::SettingsEngineTrait;
use crate::types::errors::StatusParseError;
use crate::types::export::ExportOutcome;
use crate::types::record::PageStatus;
use crate::types::ui::ControlAction;
use crate::ui::controls::ActionResult;

/// Requests the bridge accepts per one-second window.
pub const MAX_REQUESTS_PER_SECOND: u32 = 200;

const WINDOW: Duration = Duration::from_secs(1);

/// Fixed-window request limiter for the bridge loop.
pub struct RateLimiter {
    limit: u32,
    window: Option<(Instant, u32)>,
}

impl RateLimiter {
    pub fn new(limit: u32) -> Self {
        Self { limit, window: None }
    }

    /// Counts one request against the current window.
    pub fn allow(&mut self) -> bool {
        self.allow_at(Instant::now())
    }

    /// Same as [`allow`](Self::allow) with an explicit arrival time.
    pub fn allow_at(&mut self, now: Instant) -> bool {
        let (start, used) = match self.window {
            Some((start, used)) if now.duration_since(start) < WINDOW => (start, used),
            _ => (now, 0),
        };
        let allowed = used < self.limit;
        self.window = Some((start, used.saturating_add(1)));
        allowed
    }
}

fn str_param<'a>(params: &'a Value, name: &str) -> Result<&'a str, String> {
    params
        .get(name)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("missing {}", name))
}

/// JSON form of an action result; exports also carry a `data_url` for the host to save.
fn action_json(result: &ActionResult) -> Result<Value, String> {
    let mut value = serde_json::to_value(result).map_err(|e| e.to_string())?;
    value["message"] = json!(result.notice.message());
    if let Some(ExportOutcome::Exported { content, .. }) = &result.export {
        value["data_url"] = json!(exporter::data_url(content));
    }
    Ok(value)
}

/// Dispatch a JSON-RPC method call.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Pages ───
        "page.open" => {
            let url = str_param(params, "url")?;
            let a = app.lock().await;
            let outcome = a.open_page(url).await.map_err(|e| e.to_string())?;
            let controls = a.controls(url).await.map_err(|e| e.to_string())?;
            let mut value = serde_json::to_value(outcome).map_err(|e| e.to_string())?;
            value["controls"] = serde_json::to_value(controls).map_err(|e| e.to_string())?;
            Ok(value)
        }
        "page.get" => {
            let url = str_param(params, "url")?;
            let a = app.lock().await;
            let record = a.get(url).await.map_err(|e| e.to_string())?;
            serde_json::to_value(record).map_err(|e| e.to_string())
        }
        "page.set_status" => {
            let url = str_param(params, "url")?;
            let status: PageStatus = str_param(params, "status")?
                .parse()
                .map_err(|e: StatusParseError| e.to_string())?;
            let a = app.lock().await;
            let ok = a.set_status(url, status).await.map_err(|e| e.to_string())?;
            Ok(json!({"ok": ok, "status": status}))
        }

        // ─── Records ───
        "records.list" => {
            let a = app.lock().await;
            let records = a.store.get_all().await.map_err(|e| e.to_string())?;
            Ok(json!({"items": records}))
        }
        "records.count" => {
            let a = app.lock().await;
            let count = a.store.count().await.map_err(|e| e.to_string())?;
            Ok(json!({"count": count}))
        }
        "records.export" => {
            let a = app.lock().await;
            let result = a
                .dispatch(None, &ControlAction::Export, &DetachedTarget)
                .await
                .map_err(|e| e.to_string())?;
            action_json(&result)
        }
        "records.clear" => {
            let confirmed = params.get("confirmed").and_then(|v| v.as_bool()).unwrap_or(false);
            let a = app.lock().await;
            let result = a
                .dispatch(None, &ControlAction::Clear { confirmed }, &DetachedTarget)
                .await
                .map_err(|e| e.to_string())?;
            action_json(&result)
        }

        // ─── UI ───
        "ui.controls" => {
            let url = str_param(params, "url")?;
            let a = app.lock().await;
            let controls = a.controls(url).await.map_err(|e| e.to_string())?;
            Ok(json!({"items": controls}))
        }
        "ui.action" => {
            let action: ControlAction = serde_json::from_value(
                params.get("action").cloned().ok_or("missing action")?,
            )
            .map_err(|e| format!("invalid action: {}", e))?;
            let url = params.get("url").and_then(|v| v.as_str());
            let a = app.lock().await;
            let result = a
                .dispatch(url, &action, &DetachedTarget)
                .await
                .map_err(|e| e.to_string())?;
            action_json(&result)
        }

        // ─── Settings ───
        "settings.get" => {
            let a = app.lock().await;
            serde_json::to_value(a.settings()).map_err(|e| e.to_string())
        }
        "settings.set" => {
            let key = str_param(params, "key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            let mut a = app.lock().await;
            a.settings_engine.set_value(key, value).map_err(|e| e.to_string())?;
            a.apply_settings().map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
