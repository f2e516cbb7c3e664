//! telenorm: rule-driven normalization of vendor security telemetry.
//!
//! This crate re-exports the core engine and the built-in feed tables so
//! that the binary and the integration tests import from one place, and
//! adds the [`pipeline`] driver that fans JSON lines out over a worker pool.
//!
//! # Architecture
//!
//! ```text
//! JSON lines ──► pipeline (spawn_blocking × workers) ──► Engine ──► canonical JSON lines
//!                                                          ▲
//!                         telenorm-feeds (built-in TOML) ──┘ + operator overlay
//! ```

pub mod pipeline;

pub use telenorm_core::{
    config, error, normalizer, types, CanonicalEvent, ConfigError, Engine, MalformedError, MalformedReason,
    NormalizeError, RuleConfig,
};
pub use telenorm_feeds::{builtin_config, engine, FeedId};
