//! unwebp - replace downloaded WebP images with PNG copies
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod conversion;
pub mod error;
pub mod notifications;
pub mod processor;
pub mod service;
pub mod watch;

pub use error::{Error, Result};
