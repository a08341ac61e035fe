//! Configuration module
//!
//! Compile-time constants and default path discovery.

pub mod defaults;
