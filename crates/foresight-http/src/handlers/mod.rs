//! HTTP handlers, one module per scoring domain.
//!
//! The domain modules are thin: each binds its feature type and pipeline
//! to the shared generic handlers in [`shared`].

pub mod campaigns;
pub mod churn;
pub mod content;
pub mod expansion;
pub mod health;
pub mod leads;
pub mod shared;

pub use shared::{BatchRequest, HistoryQuery};
