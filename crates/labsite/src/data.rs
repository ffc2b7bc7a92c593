//! Access to the external data service that owns projects and teaching records.
//!
//! Fetching a single record and listing every id are separate operations: routes list ids at build time
//! through [`DataSource::project_ids`] and [`DataSource::teaching_ids`], and fetch one record per page
//! through [`DataSource::project`] and [`DataSource::teaching`].
use log::warn;

use crate::errors::FetchError;
use crate::id::RecordId;

mod http;
mod memory;
pub mod models;

pub use http::{DEFAULT_TIMEOUT, DataServiceOptions, HttpSource};
pub use memory::MemorySource;
pub use models::{ProjectDetails, TeachingRecord};

/// Read-only access to the records behind the pages.
///
/// Resolvers return `Ok(None)` when the record does not exist, enumerators return an empty list when the
/// service has nothing to list. `Err` is reserved for a service that cannot be reached or misbehaves.
pub trait DataSource: Send + Sync {
    fn project(&self, id: &RecordId) -> Result<Option<ProjectDetails>, FetchError>;

    fn project_ids(&self) -> Result<Vec<RecordId>, FetchError>;

    fn teaching(&self, id: &RecordId) -> Result<Option<TeachingRecord>, FetchError>;

    fn teaching_ids(&self) -> Result<Vec<RecordId>, FetchError>;
}

/// Validates raw ids from a listing, dropping (and reporting) the ones that can't be used in a path.
pub(crate) fn collect_ids<I>(raw_ids: I, listing: &str) -> Vec<RecordId>
where
    I: IntoIterator<Item = String>,
{
    raw_ids
        .into_iter()
        .filter_map(|raw| match RecordId::parse(&raw) {
            Ok(id) => Some(id),
            Err(err) => {
                warn!(target: "fetch", "Skipping entry of {}: {}", listing, err);
                None
            }
        })
        .collect()
}
