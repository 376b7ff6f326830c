// src/config/mod.rs

//! Configuration loading and validation for baker-supervisor.
//!
//! - TOML-backed data model (`model.rs`).
//! - Loading from disk (`loader.rs`).
//! - Structural validation (`validate.rs`).

pub mod duration;
pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{DEFAULT_CONFIG_FILE, default_config_path, load_and_validate, load_from_path};
pub use model::{BakerConfig, BakerSection, RawBakerConfig, ShutdownSection};
