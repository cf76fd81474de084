//! txprop Service
//!
//! Member sign-up orchestration over a member store and a log store.
//!
//! Responsibilities:
//! - Wrap each layer (service, member repository, log repository) in its
//!   configured propagation, or in none
//! - V1: let a log failure propagate and roll back every owning context
//! - V2: swallow a log validation failure and continue

mod config;
mod error;
mod repository;
mod service;

pub use config::{ServiceConfig, DEFAULT_LOG_FAULT_SENTINEL};
pub use error::{ServiceError, ServiceResult};
pub use repository::{transactional, LogRepository, MemberRepository};
pub use service::{MemberService, OrchestrationMode};
