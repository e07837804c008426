//! # Lost & Found Common Library
//!
//! Shared code for the lost & found service including:
//! - Item and claim records (`models`)
//! - Live update event types and the EventBus (`events`)
//! - SSE stream helpers (`sse`)
//! - Configuration loading (`config`)
//! - Date utilities (`time`)

pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod sse;
pub mod time;

pub use error::{Error, Result};
pub use events::{EventBus, LostFoundEvent};
