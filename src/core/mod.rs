//! Core domain modules shared by every front end

pub mod api;
pub mod export;
pub mod models;
pub mod pages;
pub mod session;
pub mod views;

/// Returns the current version of the `seo-analyzer` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
