//! # Application Layer
//!
//! Services orchestrating domain logic.

pub mod service;

pub use service::BlockSyncService;
