//! Build normalization and the translation pipeline for ItemSetCopier.
//!
//! This crate ties the catalog and the source adapters together:
//! source document → [`RawBuild`](itemsetcopier_sources::RawBuild) →
//! [`normalize`] → [`ItemSet`](itemsetcopier_shared::ItemSet).

pub mod normalizer;
pub mod translate;

pub use normalizer::{NormalizeOptions, normalize};
pub use translate::{TranslateRequest, Translation, Translator};
