//! # Tarkib Support
//!
//! Shared helpers for the Tarkib DI crates.
//!
//! This crate provides:
//! - Compact rendering of fully qualified type names
//! - "Did you mean?" suggestions for unresolved registrations

pub mod rendering;
