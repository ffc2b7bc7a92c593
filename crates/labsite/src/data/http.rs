use std::time::{Duration, Instant};

use colored::Colorize;
use log::debug;
use serde::de::DeserializeOwned;
use ureq::Agent;

use crate::data::models::IdEntry;
use crate::data::{DataSource, ProjectDetails, TeachingRecord, collect_ids};
use crate::errors::FetchError;
use crate::id::RecordId;
use crate::logging::{FormatElapsedTimeOptions, format_elapsed_time};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct DataServiceOptions {
    /// Base URL of the data service, e.g. `https://api.example.org`. A trailing slash is ignored.
    pub api_url: String,
    /// Upper bound for a whole request, connection and body included.
    pub timeout: Duration,
}

impl DataServiceOptions {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// [`DataSource`] backed by the JSON data service.
///
/// Routes used:
/// - `GET /projects`: every project, projected to ids
/// - `GET /projects/{id}`: `{ "project": …, "publications": […] }`
/// - `GET /teaching/ids`: `[{ "_id": … }]`
/// - `GET /teaching/{id}`: a teaching record
pub struct HttpSource {
    agent: Agent,
    base_url: String,
}

impl HttpSource {
    pub fn new(options: &DataServiceOptions) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(options.timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: options.api_url.trim_end_matches('/').to_string(),
        }
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        let start = Instant::now();

        let transport = |source: ureq::Error| FetchError::Transport {
            url: url.clone(),
            source: Box::new(source),
        };

        let mut response = self.agent.get(&url).call().map_err(transport)?;
        let status = response.status().as_u16();
        let body = if status == 404 {
            String::new()
        } else {
            response.body_mut().read_to_string().map_err(transport)?
        };

        debug!(target: "fetch", "{} {} {}", status, url, format_elapsed_time(start.elapsed(), &FormatElapsedTimeOptions::default()).dimmed());

        decode_response(&url, status, &body)
    }
}

/// Maps a service response to a record.
///
/// 404, an empty body and a JSON `null` all mean "no such record". Any other non-2xx status is an error.
pub(crate) fn decode_response<T: DeserializeOwned>(
    url: &str,
    status: u16,
    body: &str,
) -> Result<Option<T>, FetchError> {
    match status {
        404 => Ok(None),
        200..=299 if body.trim().is_empty() => Ok(None),
        200..=299 => serde_json::from_str::<Option<T>>(body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        }),
        _ => Err(FetchError::Status {
            url: url.to_string(),
            status,
        }),
    }
}

impl DataSource for HttpSource {
    fn project(&self, id: &RecordId) -> Result<Option<ProjectDetails>, FetchError> {
        self.get(&format!("/projects/{}", id))
    }

    fn project_ids(&self) -> Result<Vec<RecordId>, FetchError> {
        let entries: Vec<IdEntry> = self.get("/projects")?.unwrap_or_default();
        Ok(collect_ids(entries.into_iter().map(|entry| entry.id), "/projects"))
    }

    fn teaching(&self, id: &RecordId) -> Result<Option<TeachingRecord>, FetchError> {
        self.get(&format!("/teaching/{}", id))
    }

    fn teaching_ids(&self) -> Result<Vec<RecordId>, FetchError> {
        let entries: Vec<IdEntry> = self.get("/teaching/ids")?.unwrap_or_default();
        Ok(collect_ids(entries.into_iter().map(|entry| entry.id), "/teaching/ids"))
    }
}
