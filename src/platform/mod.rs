//! HTTP implementation of the resource kind adapters.

pub mod client;
pub mod endpoints;

pub use client::{PlatformAdapter, PlatformClient, API_KEY_HEADER};
