//! genimage MCP common library
//!
//! Shared configuration, error types, model registry, tracing setup and MCP
//! server plumbing for the genimage image generation server.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod error;
pub mod models;
pub mod server;
pub mod tracing;
pub mod transport;

#[cfg(test)]
mod server_test;

pub use config::Config;
pub use error::{ConfigError, Error, Result};
pub use models::{ImageModel, ModelApi, ModelRegistry};
pub use server::{McpServerBuilder, ServerError, shutdown_channel};
pub use transport::{Transport, TransportArgs, TransportMode};
