//! Template selection and fetching
//!
//! This module provides:
//! - The template choice tree (families and variants)
//! - The resolved `TemplateSpec` consumed by the fetcher
//! - Archive download and extraction over HTTP

pub mod fetcher;
pub mod spec;

pub use fetcher::{remove_vcs_metadata, TemplateFetcher};
pub use spec::{TemplateFamily, TemplateSpec, TemplateVariant, DEFAULT_VARIANT};
