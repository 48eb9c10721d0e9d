//! pagetrack RPC Server: JSON-RPC over stdin/stdout for the browser host.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"page.open", "params":{"url":"..."}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//!
//! Logs go to stderr so stdout carries protocol lines only.

use anyhow::Context;
use serde_json::{json, Value};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pagetrack::app::App;
use pagetrack::rpc_handler::{handle_method, RateLimiter, MAX_REQUESTS_PER_SECOND};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pagetrack=info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

async fn write_line(stdout: &mut io::Stdout, value: &Value) -> io::Result<()> {
    stdout.write_all(format!("{}\n", value).as_bytes()).await?;
    stdout.flush().await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let settings_path = std::env::var_os("PAGETRACK_CONFIG").map(Into::into);
    let app = Mutex::new(
        App::new(settings_path, None)
            .await
            .context("failed to initialize pagetrack")?,
    );

    let mut stdout = io::stdout();
    write_line(&mut stdout, &json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")})).await?;

    let mut rate_limiter = RateLimiter::new(MAX_REQUESTS_PER_SECOND);
    let mut lines = BufReader::new(io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "unparseable request");
                write_line(&mut stdout, &json!({"id": null, "error": format!("parse error: {}", e)})).await?;
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);

        if !rate_limiter.allow() {
            write_line(&mut stdout, &json!({"id": id, "error": "rate limit exceeded"})).await?;
            continue;
        }

        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(json!({}));

        tracing::debug!(method, "rpc request");
        let response = match handle_method(&app, method, &params).await {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => {
                tracing::warn!(method, error = %err, "rpc request failed");
                json!({"id": id, "error": err})
            }
        };
        write_line(&mut stdout, &response).await?;
    }

    Ok(())
}
