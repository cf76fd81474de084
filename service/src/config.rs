//! Service configuration.

use serde::{Deserialize, Serialize};
use txprop_transaction::{PropagationMode, TransactionConfig};

use crate::error::ServiceResult;

/// Sentinel that makes the log store reject a save.
pub const DEFAULT_LOG_FAULT_SENTINEL: &str = "bad-log";

/// Propagation per layer of a sign-up call.
///
/// `None` makes that layer non-transactional: it opens no context and its
/// store writes run in whatever context is already active, or auto-commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub service: Option<PropagationMode>,
    pub member_repository: Option<PropagationMode>,
    pub log_repository: Option<PropagationMode>,
    pub transaction: TransactionConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            service: Some(PropagationMode::JoinOrCreate),
            member_repository: Some(PropagationMode::JoinOrCreate),
            log_repository: Some(PropagationMode::JoinOrCreate),
            transaction: TransactionConfig::default(),
        }
    }
}

impl ServiceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outer and log propagation set, member repository joins.
    pub fn propagation(outer: PropagationMode, log: PropagationMode) -> Self {
        Self::new().service(Some(outer)).log_repository(Some(log))
    }

    pub fn service(mut self, mode: Option<PropagationMode>) -> Self {
        self.service = mode;
        self
    }

    pub fn member_repository(mut self, mode: Option<PropagationMode>) -> Self {
        self.member_repository = mode;
        self
    }

    pub fn log_repository(mut self, mode: Option<PropagationMode>) -> Self {
        self.log_repository = mode;
        self
    }

    pub fn transaction(mut self, config: TransactionConfig) -> Self {
        self.transaction = config;
        self
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> ServiceResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> ServiceResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
