//! Error types for labsite.
use std::fmt::{self, Debug, Formatter};
use std::path::PathBuf;
use thiserror::Error;

macro_rules! impl_debug_for_error {
    ($($t:ty),*) => {
        $(
            impl Debug for $t {
                fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                    // Errors returned from main are printed with Debug, thiserror only gives us Display.
                    write!(f, "{}", self)
                }
            }
        )*
    };
}

/// A failure talking to the data service.
///
/// An unknown record is not a `FetchError`: resolvers return `Ok(None)` for it.
#[derive(Error)]
pub enum FetchError {
    #[error("Failed to reach the data service at {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },
    #[error("Data service answered with status {status} for {url}")]
    Status { url: String, status: u16 },
    #[error("Data service returned a malformed body for {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error)]
#[error("`{0}` is not a valid record id")]
pub struct InvalidRecordId(pub String);

#[derive(Error)]
pub enum BuildError {
    #[error("Failed to list the pages of `{route}`: {source}")]
    Enumerate {
        route: String,
        #[source]
        source: FetchError,
    },
    #[error("Failed to render `{path}` (route `{route}`): {source}")]
    Render {
        route: String,
        path: String,
        #[source]
        source: FetchError,
    },
    #[error("Failed to write page file: {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum LabsiteError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl_debug_for_error!(FetchError, InvalidRecordId, BuildError);
