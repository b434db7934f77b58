//! Caller identity types.

pub mod role;

pub use role::UserRole;
