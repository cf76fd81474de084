//! Member sign-up service.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use txprop_transaction::{PropagationMode, TransactionManager};

use crate::config::ServiceConfig;
use crate::error::ServiceResult;
use crate::repository::{transactional, LogRepository, MemberRepository};

/// How the service treats a failing log save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrchestrationMode {
    /// The failure propagates to the caller.
    V1,
    /// A validation failure is logged and swallowed.
    V2,
}

impl fmt::Display for OrchestrationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrchestrationMode::V1 => write!(f, "V1"),
            OrchestrationMode::V2 => write!(f, "V2"),
        }
    }
}

/// Saves a member, then a log entry for it.
#[derive(Debug, Clone)]
pub struct MemberService {
    members: MemberRepository,
    logs: LogRepository,
}

impl MemberService {
    pub fn new(members: MemberRepository, logs: LogRepository) -> Self {
        Self { members, logs }
    }

    /// Service over fresh in-memory stores.
    pub fn in_memory() -> ServiceResult<Self> {
        Ok(Self::new(MemberRepository::in_memory(), LogRepository::in_memory()?))
    }

    pub fn members(&self) -> &MemberRepository {
        &self.members
    }

    pub fn logs(&self) -> &LogRepository {
        &self.logs
    }

    /// Sign up `key` with the outer and log propagation given; the member
    /// repository joins.
    pub fn orchestrate(
        &self,
        mode: OrchestrationMode,
        key: &str,
        outer: PropagationMode,
        log: PropagationMode,
    ) -> ServiceResult<()> {
        self.orchestrate_with(mode, key, &ServiceConfig::propagation(outer, log))
    }

    /// Sign up `key` on a fresh transaction manager.
    pub fn orchestrate_with(
        &self,
        mode: OrchestrationMode,
        key: &str,
        config: &ServiceConfig,
    ) -> ServiceResult<()> {
        let mut tx = TransactionManager::with_config(config.transaction.clone());
        self.orchestrate_in(&mut tx, mode, key, config)
    }

    /// Sign up `key` on the caller's transaction manager.
    pub fn orchestrate_in(
        &self,
        tx: &mut TransactionManager,
        mode: OrchestrationMode,
        key: &str,
        config: &ServiceConfig,
    ) -> ServiceResult<()> {
        debug!(
            %mode,
            key,
            service = ?config.service,
            log_repository = ?config.log_repository,
            "orchestrating sign-up"
        );

        transactional(tx, config.service, |tx| {
            self.members.save(tx, config.member_repository, key)?;

            match mode {
                OrchestrationMode::V1 => {
                    self.logs.save(tx, config.log_repository, key)?;
                }
                OrchestrationMode::V2 => match self.logs.save(tx, config.log_repository, key) {
                    Ok(_) => {}
                    Err(err) if err.is_validation() => {
                        info!(key, error = %err, "log save failed, continuing");
                    }
                    Err(err) => return Err(err),
                },
            }

            Ok(())
        })
    }
}
