//! # gemhub-entity
//!
//! Domain entity models for the GemHub ruby catalog. Every document
//! struct derives `Debug`, `Clone`, `Serialize` and `Deserialize`; every
//! closed enumeration round-trips through its stored string form and
//! rejects unknown values with a validation error.

#[macro_use]
mod macros;

pub mod category;
pub mod product;
pub mod user;
