//! Component Registry
//!
//! Fetching the remote component index and caching it in memory.
//!
//! - [`source`] - where raw entries come from (HTTP in production)
//! - [`client`] - normalization plus the TTL cache callers go through

pub mod client;
pub mod source;

pub use client::{RegistryCache, RegistryClient};
pub use source::{HttpRegistrySource, RegistrySource};
