//! Git access layer.
//!
//! - `repository`: opening the repo, revision lookup, shared handle
//! - `history`: latest commit touching a path
//! - `blame`: blame runs, commit label resolution, blame page assembly

pub mod blame;
pub mod history;
pub mod repository;

pub use repository::{GitRepository, SharedRepo};
