//! Core types and trait definitions for the Eventus event registry.
//!
//! This crate is deliberately free of HTTP, filesystem and database
//! dependencies. Every other crate depends on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod city;
pub mod error;
pub mod event;
pub mod processing;
pub mod store;

pub use city::City;
pub use error::{Error, Result, ValidationError};
pub use event::{Conference, Event, EventKind};

#[cfg(test)]
mod tests;
