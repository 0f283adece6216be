//! API module
//!
//! Transport abstraction and the HTTP client that implements it.

pub mod client;
pub mod endpoints;
pub mod transport;
pub mod types;

pub use client::ApiClient;
pub use transport::{Body, Host, Method, Transport, TransportRequest};
pub use types::*;
