// pagetrack shared type definitions
// Each submodule defines types used across the crate.

pub mod errors;
pub mod export;
pub mod record;
pub mod settings;
pub mod ui;
