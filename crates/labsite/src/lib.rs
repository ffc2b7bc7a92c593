#![doc = include_str!("../README.md")]

// Modules the end-user will interact directly or indirectly with
pub mod data;
pub mod errors;
pub mod id;
pub mod layout;
pub mod logging;
pub mod route;
pub mod routes;
pub mod routing;
pub mod sanitize;

// Exports for end-users
pub use build::build;
pub use build::metadata::{BuildOutput, PageOutput, StaticAssetOutput};
pub use build::options::{BuildOptions, SiteMeta};
pub use data::{DataServiceOptions, DataSource, HttpSource, MemorySource};
pub use errors::{FetchError, LabsiteError};
pub use id::RecordId;

mod build;

/// Value of the `generator` meta tag of every page.
pub const GENERATOR: &str = concat!("labsite v", env!("CARGO_PKG_VERSION"));
