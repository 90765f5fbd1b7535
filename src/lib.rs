//! Client library for the SEO Score Analyzer service
//!
//! Contains the report model, the backend API client, derived views,
//! exporters, session handling and the page controllers used by the
//! `seoanalyzer` CLI.

pub mod config;
pub mod core;

pub use crate::core::get_version;
