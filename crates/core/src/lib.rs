//! Copperline Core - Shared types library.
//!
//! This crate provides common types used across all Copperline components:
//! - `crm` - The CRM engine (store, services, scheduled jobs)
//! - `cli` - Command-line tools for seeding and manual job runs
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no
//! async runtime - so every other crate can depend on it cheaply.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, phones, and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
