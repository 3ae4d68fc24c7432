//! Configuration management for fsview.
//!
//! Walk settings ([`settings::Config`]) are stored as TOML and loaded at
//! startup.

pub mod settings;
