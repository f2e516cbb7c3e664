//! telenorm-core: vendor telemetry normalization.
//!
//! This crate turns raw JSON records from threat-intelligence and identity
//! feeds into a single canonical event shape, driven by declarative
//! per-source rule sets.
//!
//! # Architecture
//!
//! ```text
//! raw bytes ──► decode ──► SourceRuleSet (rules in order) ──► IntermediateContext ──► CanonicalEvent
//!                               │
//!                 RuleConfig ───┘ (compiled once, shared read-only)
//! ```
//!
//! Normalization is synchronous and pure; an [`Engine`] may be shared by
//! any number of threads.

pub mod config;
pub mod error;
pub mod normalizer;
pub mod types;

pub use self::config::{RuleConfig, SourceDef};
pub use error::{ConfigError, MalformedError, MalformedReason, NormalizeError, RuleError};
pub use normalizer::{Engine, SourceRuleSet};
pub use types::{
    AuthenticationStatus, CanonicalEvent, Entity, EntityKind, EventType, FileHashes, Severity,
};
