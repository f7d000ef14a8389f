//! # Adapters
//!
//! Concrete implementations of the outbound ports.

pub mod event_sinks;
pub mod http_chain;

pub use event_sinks::{ChannelEventSink, TracingEventSink};
pub use http_chain::{extract_block, HttpChainClient};
