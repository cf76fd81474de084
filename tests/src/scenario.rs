//! Scenario definition and runner.

use txprop_journal::{JournalStats, TxnEvent};
use txprop_service::{MemberService, OrchestrationMode, ServiceConfig, ServiceResult};
use txprop_transaction::{PropagationMode, TransactionManager};

use crate::assertion::Expectation;
use crate::error::HarnessResult;

/// One sign-up call and its expected effects.
#[derive(Debug, Clone)]
pub struct Scenario {
    name: String,
    mode: OrchestrationMode,
    key: String,
    config: ServiceConfig,
    expectation: Expectation,
}

/// What a scenario run produced.
#[derive(Debug)]
pub struct Outcome {
    pub result: ServiceResult<()>,
    pub stats: JournalStats,
    pub events: Vec<TxnEvent>,
}

impl Scenario {
    /// New scenario; the key defaults to the name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            key: name.clone(),
            name,
            mode: OrchestrationMode::V1,
            config: ServiceConfig::default(),
            expectation: Expectation::new(),
        }
    }

    pub fn mode(mut self, mode: OrchestrationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn service(mut self, mode: Option<PropagationMode>) -> Self {
        self.config = self.config.service(mode);
        self
    }

    pub fn member_repository(mut self, mode: Option<PropagationMode>) -> Self {
        self.config = self.config.member_repository(mode);
        self
    }

    pub fn log_repository(mut self, mode: Option<PropagationMode>) -> Self {
        self.config = self.config.log_repository(mode);
        self
    }

    pub fn expect(mut self, f: impl FnOnce(Expectation) -> Expectation) -> Self {
        self.expectation = f(self.expectation);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run against fresh in-memory stores.
    pub fn run(&self) -> HarnessResult<Outcome> {
        let service = MemberService::in_memory()?;
        self.run_on(&service)
    }

    /// Run against an existing service, so earlier state is visible.
    pub fn run_on(&self, service: &MemberService) -> HarnessResult<Outcome> {
        crate::init_tracing();

        let mut tx = TransactionManager::with_config(self.config.transaction.clone());
        let result = service.orchestrate_in(&mut tx, self.mode, &self.key, &self.config);
        let outcome = Outcome {
            result,
            stats: tx.stats(),
            events: tx.journal().events().cloned().collect(),
        };

        self.expectation
            .check(&self.name, &self.key, service, &outcome)?;
        Ok(outcome)
    }
}

/// Event variant names, for comparing lifecycles without concrete ids.
pub fn event_kinds(events: &[TxnEvent]) -> Vec<&'static str> {
    events
        .iter()
        .map(|event| match event {
            TxnEvent::Begin { .. } => "begin",
            TxnEvent::Join { .. } => "join",
            TxnEvent::Suspend { .. } => "suspend",
            TxnEvent::Resume { .. } => "resume",
            TxnEvent::MarkRollbackOnly { .. } => "mark_rollback_only",
            TxnEvent::Commit { .. } => "commit",
            TxnEvent::Rollback { .. } => "rollback",
            TxnEvent::Release { .. } => "release",
        })
        .collect()
}
