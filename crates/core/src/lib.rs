//! TuneNest Core - Shared types library.
//!
//! This crate provides the domain types used by the TuneNest admin
//! dashboard and its integration tests.
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and lets every validation rule be unit tested
//! without a backend.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, phone
//!   numbers and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
