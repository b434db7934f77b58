//! Core type definitions used across the GemHub workspace.

pub mod filter;
pub mod id;
pub mod pagination;
pub mod response;
pub mod sorting;

pub use filter::{FilterField, FilterOp, FilterValue};
pub use id::*;
pub use pagination::{PageRequest, PageResponse};
pub use response::{Completion, Outcome, StatusCategory};
pub use sorting::{SortDirection, SortField};
