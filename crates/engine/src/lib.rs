//! Mearim order-session engine.
//!
//! This crate is the client-side core of the Mearim gas & water delivery
//! storefront: a set of cooperating stores and a checkout state machine that
//! manage customer identity, the address book, the cart selection, order
//! history and the recurring-order suggestion, and that deterministically
//! compose the outbound WhatsApp order message.
//!
//! There is no backend. All customer state lives in a per-device persistent
//! key-value layer (see [`storage`]); the terminal action of a checkout is a
//! `wa.me` deep link handed to an external chat application for human
//! fulfillment.
//!
//! # Architecture
//!
//! - [`storage`] - Synchronous key-value persistence (memory and file backends)
//! - [`catalog`] - Static, read-only product catalog
//! - [`profile`] - The single active customer record for this device
//! - [`addresses`] - Named delivery addresses, scoped per customer phone
//! - [`history`] - Capped, most-recent-first order log per customer
//! - [`recurring`] - Reorder suggestion derived from the history
//! - [`selection`] - Transient cart of chosen catalog item ids
//! - [`checkout`] - The Idle → Configuring → Sending → AwaitingConfirmation
//!   state machine and the handoff URI
//! - [`session`] - [`session::OrderSession`], the caller-facing facade that
//!   wires the stores together
//!
//! Everything is an explicit context value: constructing two
//! [`session::OrderSession`]s over two backends yields two fully independent
//! engines, which is how the integration tests run sessions in parallel.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod addresses;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod history;
pub mod message;
pub mod profile;
pub mod recurring;
pub mod selection;
pub mod session;
pub mod storage;

pub use checkout::{CheckoutPhase, CheckoutSession, DeliveryLocation, Handoff};
pub use config::EngineConfig;
pub use error::EngineError;
pub use session::OrderSession;
