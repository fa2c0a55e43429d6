//! Core types and pure domain logic for the Grimoire character sheet manager.
//!
//! This crate is deliberately free of database and file-system dependencies.
//! Every mutation is a pure function from an old value to a new one; the
//! services in `grimoire-service` decide when to persist and publish.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod character;
pub mod display;
pub mod error;
pub mod lists;
pub mod settings;
pub mod slots;
pub mod spell;
pub mod store;

pub use error::{Error, Result};
