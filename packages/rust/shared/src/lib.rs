//! Shared types, error model, and configuration for ItemSetCopier.
//!
//! This crate is the foundation depended on by all other ItemSetCopier crates.
//! It provides:
//! - [`ItemSetError`]: the unified error type
//! - Domain types ([`BuildBlock`], [`CanonicalBlock`], [`ItemSet`], [`ChampionRef`])
//! - Configuration ([`AppConfig`], [`CatalogConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CatalogConfig, CatalogSection, TranslateSection, config_dir, config_file_path,
    init_config, load_config, load_config_from,
};
pub use error::{ItemSetError, Result};
pub use types::{
    BuildBlock, BuildEntry, CanonicalBlock, CanonicalItem, ChampionRef, ItemRef, ItemSet,
    ItemSetBlock, TITLE_MAX_LENGTH, validate_title,
};
