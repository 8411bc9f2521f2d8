//! Configuration loader and schema types.
//!
//! This module exposes the settings that drive polling, HTTP timeouts,
//! notifications, controls and logging, plus helpers to load them from disk.

mod load;
mod schema;

pub use schema::*;
