// src/models/mod.rs

//! Domain models for the cat watcher.
//!
//! This module contains the listing records, the validated snapshot built
//! from them, and the configuration structures.

mod animal;
mod config;
mod snapshot;

// Re-export all public types
pub use animal::{AnimalRecord, RecordId};
pub use config::{
    AgeStyle, Config, Credentials, DigestConfig, LoggingConfig, MailConfig, ScheduleConfig,
    SourceConfig, StorageConfig,
};
pub use snapshot::Snapshot;
