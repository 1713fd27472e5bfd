//! Data transfer objects (DTOs) for API responses.
//!
//! These structs are serialized to JSON for frontend consumption.
//! - `repository`: RepositoryInfo, CommitInfo
//! - `blame`: BlameRun input runs and the BlameResponse page payload

pub mod blame;
pub mod repository;

pub use blame::*;
pub use repository::*;
