//! Execution context for analysis requests
//!
//! The `Context` struct provides a flexible key-value store for passing
//! request-scoped state (symbol, request id, format preferences) through
//! the analysis pipeline and into agents.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Well-known context keys for common request state
pub mod keys {
    /// Ticker symbol under analysis (e.g., "AAPL")
    pub const SYMBOL: &str = "symbol";
    /// Request ID for tracing a single analysis end to end
    pub const REQUEST_ID: &str = "request_id";
    /// Response format preference (e.g., "json", "text", "markdown")
    pub const RESPONSE_FORMAT: &str = "response_format";
}

/// Context passed to agents during execution
///
/// Supports both untyped JSON values and typed accessors for common fields.
///
/// # Example
///
/// ```
/// use advisor_core::Context;
///
/// let ctx = Context::new()
///     .with_symbol("AAPL")
///     .with_request_id("req-123");
///
/// assert_eq!(ctx.symbol(), Some("AAPL"));
/// assert_eq!(ctx.request_id(), Some("req-123"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Key-value storage for context data
    data: HashMap<String, serde_json::Value>,
}

impl Context {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    // =========== Builder Methods ===========

    /// Set the ticker symbol
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.set_symbol(symbol);
        self
    }

    /// Set the request ID
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.insert(keys::REQUEST_ID, serde_json::json!(request_id.into()));
        self
    }

    /// Set the response format preference
    pub fn with_response_format(mut self, format: impl Into<String>) -> Self {
        self.insert(keys::RESPONSE_FORMAT, serde_json::json!(format.into()));
        self
    }

    // =========== Common Accessors ===========

    /// Get the ticker symbol
    pub fn symbol(&self) -> Option<&str> {
        self.get(keys::SYMBOL).and_then(|v| v.as_str())
    }

    /// Set the ticker symbol
    pub fn set_symbol(&mut self, symbol: impl Into<String>) {
        self.insert(keys::SYMBOL, serde_json::json!(symbol.into()));
    }

    /// Get the request ID
    pub fn request_id(&self) -> Option<&str> {
        self.get(keys::REQUEST_ID).and_then(|v| v.as_str())
    }

    /// Get the response format preference
    pub fn response_format(&self) -> Option<&str> {
        self.get(keys::RESPONSE_FORMAT).and_then(|v| v.as_str())
    }

    // =========== Generic Key-Value Operations ===========

    /// Insert a value into the context
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.data.insert(key.into(), value);
    }

    /// Get a value from the context
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// Insert a typed value into the context
    ///
    /// Serializes the value to JSON before storing.
    pub fn insert_typed<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> crate::Result<()> {
        let json_value = serde_json::to_value(value).map_err(|e| {
            crate::Error::ProcessingFailed(format!("Failed to serialize context value: {e}"))
        })?;
        self.data.insert(key.into(), json_value);
        Ok(())
    }

    /// Get a typed value from the context
    ///
    /// Deserializes the JSON value into the specified type.
    pub fn get_typed<T: for<'de> Deserialize<'de>>(&self, key: &str) -> crate::Result<Option<T>> {
        match self.data.get(key) {
            None => Ok(None),
            Some(value) => {
                let typed = serde_json::from_value(value.clone()).map_err(|e| {
                    crate::Error::ProcessingFailed(format!(
                        "Failed to deserialize context value: {e}"
                    ))
                })?;
                Ok(Some(typed))
            }
        }
    }

    /// Check if a key exists in the context
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Remove a value from the context
    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.data.remove(key)
    }

    /// Get the number of entries in the context
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the context is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
