// src/config/mod.rs

//! Configuration loading and validation for pycify.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate versions and ignore patterns (`validate.rs`).
//! - Merge CLI flags, config values and environment into `Settings`
//!   (`settings.rs`).

pub mod loader;
pub mod model;
pub mod settings;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_for_directory, load_from_path};
pub use model::{CompileSection, ConfigFile, RawConfigFile, RelocateSection, RuntimeSection};
pub use settings::Settings;
