//! Aladhan prayer-time and Hijri calendar tools for MCP.
//!
//! This crate holds everything behind the protocol boundary:
//! - the fixed tool catalog (`catalog`)
//! - argument validation and typed extraction (`validation`, `args`)
//! - upstream request building and the HTTP client (`request`, `client`)
//! - response formatting (`format`)
//! - the [`AladhanTools`] façade that ties them together
//!
//! It contains no transport code; the server binary owns stdio/JSON-RPC.

pub mod args;
pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod gateway;
pub mod request;
pub mod validation;

pub use gateway::AladhanTools;
