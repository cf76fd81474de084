//! Integration test framework for txprop.
//!
//! Scenarios describe one sign-up call (mode, key, propagation per layer)
//! and what must be observable afterwards: the call's result, which records
//! are visible, and how many physical transactions committed or rolled back.

mod assertion;
mod scenario;

pub use assertion::{ExpectedResult, Expectation};
pub use error::{HarnessError, HarnessResult};
pub use scenario::{event_kinds, Outcome, Scenario};

use tracing_subscriber::EnvFilter;

/// Install a test-friendly subscriber once; later calls are no-ops.
///
/// Set `RUST_LOG=debug` to see the transaction lifecycle of a failing test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub mod prelude {
    pub use crate::{event_kinds, init_tracing, Expectation, ExpectedResult, Outcome, Scenario};
    pub use txprop_service::{MemberService, OrchestrationMode, ServiceConfig};
    pub use txprop_transaction::PropagationMode;

    pub const JOIN: Option<PropagationMode> = Some(PropagationMode::JoinOrCreate);
    pub const NEW: Option<PropagationMode> = Some(PropagationMode::AlwaysNew);
    pub const OFF: Option<PropagationMode> = None;

    /// Every per-layer setting: off, join-or-create, always-new.
    pub const ALL_SETTINGS: [Option<PropagationMode>; 3] = [OFF, JOIN, NEW];
}
