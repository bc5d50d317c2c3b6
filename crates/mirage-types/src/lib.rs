//! Foundation types for the mirage terminal.
//!
//! This crate contains the platform-agnostic types shared by every mirage
//! crate: error types, input events, and the terminal configuration map
//! with its defaults and value validation.

pub mod config;
pub mod error;
pub mod input;
