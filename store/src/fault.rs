//! Fault injection for saves.

use regex_lite::Regex;

use crate::error::{StoreError, StoreResult};

/// Rejects records whose payload matches a pattern.
#[derive(Debug, Clone)]
pub struct FaultInjector {
    pattern: Regex,
}

impl FaultInjector {
    /// Fail payloads that contain `sentinel` as a literal substring.
    pub fn sentinel(sentinel: &str) -> StoreResult<Self> {
        Self::from_pattern(&regex_lite::escape(sentinel))
    }

    /// Fail payloads matching a regular expression.
    pub fn from_pattern(pattern: &str) -> StoreResult<Self> {
        let pattern =
            Regex::new(pattern).map_err(|e| StoreError::invalid_pattern(pattern, e.to_string()))?;
        Ok(Self { pattern })
    }

    /// Check if `payload` triggers the fault.
    pub fn triggers(&self, payload: &str) -> bool {
        self.pattern.is_match(payload)
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}
