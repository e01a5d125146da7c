//! Portcullis - Escalating Login Throttling
//!
//! This crate guards a credential-verification endpoint against brute-force
//! and credential-stuffing attacks by imposing escalating, per-origin delays
//! on repeated failed authentication attempts. All coordination happens
//! through atomic operations against a shared counter store, so many
//! processes and hosts can share one throttle without any in-process locking.

pub mod account;
pub mod clock;
pub mod config;
pub mod error;
pub mod origin;
pub mod store;
pub mod throttle;
