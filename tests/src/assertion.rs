//! Expectations checked after a scenario runs.

use txprop_service::{MemberService, ServiceResult};

use crate::error::{HarnessError, HarnessResult};
use crate::scenario::Outcome;

/// What the call itself must return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedResult {
    Success,
    /// The injected log-store fault surfaced unchanged.
    Validation,
    /// Commit hit a transaction poisoned by a swallowed failure.
    InconsistentCommit,
}

impl ExpectedResult {
    fn matches(&self, result: &ServiceResult<()>) -> bool {
        match (self, result) {
            (ExpectedResult::Success, Ok(())) => true,
            (ExpectedResult::Validation, Err(err)) => err.is_validation(),
            (ExpectedResult::InconsistentCommit, Err(err)) => err.is_inconsistent_commit(),
            _ => false,
        }
    }
}

/// Expected observable state after a scenario.
#[derive(Debug, Clone, Default)]
pub struct Expectation {
    result: Option<ExpectedResult>,
    member: Option<bool>,
    log: Option<bool>,
    committed: Option<usize>,
    rolled_back: Option<usize>,
}

impl Expectation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn succeeds(mut self) -> Self {
        self.result = Some(ExpectedResult::Success);
        self
    }

    pub fn fails_with_validation(mut self) -> Self {
        self.result = Some(ExpectedResult::Validation);
        self
    }

    pub fn fails_with_inconsistent_commit(mut self) -> Self {
        self.result = Some(ExpectedResult::InconsistentCommit);
        self
    }

    pub fn member_present(mut self) -> Self {
        self.member = Some(true);
        self
    }

    pub fn member_absent(mut self) -> Self {
        self.member = Some(false);
        self
    }

    pub fn log_present(mut self) -> Self {
        self.log = Some(true);
        self
    }

    pub fn log_absent(mut self) -> Self {
        self.log = Some(false);
        self
    }

    /// Number of physical commits.
    pub fn committed(mut self, n: usize) -> Self {
        self.committed = Some(n);
        self
    }

    /// Number of physical rollbacks.
    pub fn rolled_back(mut self, n: usize) -> Self {
        self.rolled_back = Some(n);
        self
    }

    /// Check every expectation that was set.
    pub fn check(
        &self,
        scenario: &str,
        key: &str,
        service: &MemberService,
        outcome: &Outcome,
    ) -> HarnessResult<()> {
        let fail = |message: String| Err(HarnessError::assertion_failed(scenario, message));

        if let Some(expected) = self.result {
            if !expected.matches(&outcome.result) {
                return fail(format!(
                    "expected {:?}, got {:?}",
                    expected, outcome.result
                ));
            }
        }

        if let Some(present) = self.member {
            let actual = service.members().find(key).is_some();
            if actual != present {
                return fail(format!("member '{}' present: expected {}, got {}", key, present, actual));
            }
        }

        if let Some(present) = self.log {
            let actual = service.logs().find(key).is_some();
            if actual != present {
                return fail(format!("log '{}' present: expected {}, got {}", key, present, actual));
            }
        }

        if let Some(n) = self.committed {
            if outcome.stats.committed != n {
                return fail(format!(
                    "expected {} commits, got {} ({:?})",
                    n, outcome.stats.committed, outcome.events
                ));
            }
        }

        if let Some(n) = self.rolled_back {
            if outcome.stats.rolled_back != n {
                return fail(format!(
                    "expected {} rollbacks, got {} ({:?})",
                    n, outcome.stats.rolled_back, outcome.events
                ));
            }
        }

        Ok(())
    }
}
