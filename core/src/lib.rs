//! txprop Core Types
//!
//! This crate provides the foundational types shared by every txprop crate:
//! - Identity types (RecordId, TxnId, ContextId)
//! - Record structures (Record, NewRecord)

mod id;
mod record;

pub use id::*;
pub use record::*;
