//! # Domain Module
//!
//! Core domain types for Block Sync.

pub mod directory;
pub mod entities;
pub mod errors;
pub mod invariants;
pub mod value_objects;

pub use directory::*;
pub use entities::*;
pub use errors::*;
pub use invariants::*;
pub use value_objects::*;
