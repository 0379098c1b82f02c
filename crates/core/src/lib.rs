//! Mearim Core - Shared domain types.
//!
//! This crate provides the common types used across all Mearim components:
//! - `engine` - The client-side order-session engine
//! - `cli` - Terminal front end for driving the engine
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no
//! timers. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe ids, phone numbers, prices
//!   and the payment/delivery enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
