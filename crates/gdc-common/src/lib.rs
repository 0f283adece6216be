//! GDC Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared plumbing for the GDC workspace members.
//!
//! # Overview
//!
//! - **Error Handling**: `CommonError` and its result alias
//! - **Environment**: typed lookups of environment variables with defaults
//! - **Logging**: `tracing` subscriber setup driven by `LogConfig`
//!
//! # Example
//!
//! ```no_run
//! use gdc_common::env::env_or;
//! use gdc_common::logging::{init_logging, LogConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let _guard = init_logging(&LogConfig::from_env()?)?;
//!     let poll_ms: u64 = env_or("GDC_POLL_INTERVAL_MS", 500)?;
//!     tracing::info!(poll_ms, "Configured poll interval");
//!     Ok(())
//! }
//! ```

pub mod env;
pub mod error;
pub mod logging;

pub use error::{CommonError, Result};
