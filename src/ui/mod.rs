//! pagetrack UI layer.
//!
//! The host page renders the controls; this layer decides which controls
//! exist and what their clicks do.

pub mod controls;
