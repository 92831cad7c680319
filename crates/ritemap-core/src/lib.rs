#![forbid(unsafe_code)]
//! ritemap-core library.
//!
//! Loads event/rite documents, classifies their settlement actions and
//! exposes each document as a [`Node`] with display metadata and children.
//!
//! # Conventions
//!
//! - **Errors**: [`ExtractError`] for extraction failures; `anyhow::Result`
//!   for config loading.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod action;
pub mod config;
pub mod error;
pub mod kind;
pub mod loader;
pub mod node;
pub mod node_id;

pub use action::{ActionResolver, Strictness};
pub use error::{ActionError, ConfigError, ErrorCode, ExtractError};
pub use kind::NodeKind;
pub use loader::{Document, Loader};
pub use node::Node;
pub use node_id::NodeId;
