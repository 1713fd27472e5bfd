//! Blame annotation rendering.
//!
//! - `blame`: turns attributed line runs into three index-aligned markup streams
//! - `escape`: HTML escaping for element content and attribute values
//!
//! Everything here is pure: no I/O, no shared state.

pub mod blame;
pub mod escape;

pub use blame::{validate_runs, BlameRenderer};
