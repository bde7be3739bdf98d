//! Core abstractions for advisor-rs
//!
//! This crate defines the fundamental traits and types shared by every other
//! crate in the workspace: the `Agent` trait for LLM-backed narrators, the
//! `Context` passed through an analysis request, and the base error type.

pub mod agent;
pub mod context;
pub mod error;
pub mod logging;

pub use agent::Agent;
pub use context::Context;
pub use error::{Error, Result};
pub use logging::init_tracing;
