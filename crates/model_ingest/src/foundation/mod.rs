//! Foundation module - Core utilities and types
//!
//! - Math types
//! - Logging utilities

pub mod logging;
pub mod math;
