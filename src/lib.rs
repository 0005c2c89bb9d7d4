//! Bookstore Application Library
//!
//! This library provides the application modules and utilities for the
//! bookstore REST API.

pub mod modules;
pub mod utils;

/// Re-export commonly used types
pub use modules::*;
