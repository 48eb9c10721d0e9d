//! pagetrack: per-URL page tracking for a browser host.
//!
//! Records one entry per visited URL with an extracted identifier, a workflow
//! status and first/last timestamps per status, and exports the entries as
//! `urls.csv`. The host drives it over the JSON-RPC bridge (`pagetrack-rpc`);
//! operators use the `pagetrack` CLI.

pub mod app;
pub mod cli;
pub mod database;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod types;
pub mod ui;
