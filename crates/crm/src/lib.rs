//! Copperline CRM library.
//!
//! This crate provides the CRM engine as a library, allowing it to be
//! tested and reused: the SQLite-backed store, the mutation and query
//! services, the `CrmApi` facade, and the scheduled background jobs.
//!
//! The binary in this crate runs the job scheduler as a long-lived
//! daemon; `copperline-cli` drives the same library functions manually.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod jobs;
pub mod models;
pub mod scheduler;
pub mod seed;
pub mod services;
pub mod sink;
