// pagetrack services
// Services provide the tracking logic: clock, identifier extraction, status tracking, export, settings.

pub mod clock;
pub mod exporter;
pub mod identifier;
pub mod settings_engine;
pub mod status_tracker;
