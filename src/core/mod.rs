//! Core modules for the repository checker.
//!
//! The validation pipeline and everything it depends on live here.

pub mod cache;
pub mod capabilities;
pub mod config;
pub mod error;
pub mod finding;
#[cfg(feature = "png")]
pub mod logo;
pub mod mbid;
#[cfg(feature = "yaml")]
pub mod metadata;
pub mod output;
pub mod registry;
pub mod time;
pub mod validate;
