//! Sportforged - match broadcast sports recordings to show metadata
//!
//! This library crate exposes configuration loading and batch processing
//! for the binary and for integration testing.

pub mod config;
pub mod processor;
