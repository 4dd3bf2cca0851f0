//! Build sources and their adapters.
//!
//! This crate provides:
//! - [`SourceAdapter`]: site-specific extraction of a [`RawBuild`] from a retrieved page
//! - [`AdapterRegistry`]: lookup by name or detection from a build page URL
//! - [`SourceParams`]: request parameters and the validation all sites share

pub mod adapters;
pub mod params;

pub use adapters::{
    AdapterRegistry, ChampionggAdapter, MobafireAdapter, MobalyticsAdapter, OpggAdapter,
    RawBuild, SourceAdapter,
};
pub use params::{SourceParams, pick_champion, validate_params};
