use std::collections::BTreeMap;

use crate::data::{DataSource, ProjectDetails, TeachingRecord, collect_ids};
use crate::errors::FetchError;
use crate::id::RecordId;

/// [`DataSource`] holding records in memory, keyed by their `_id`.
///
/// Useful for rendering pages without a running data service.
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    projects: BTreeMap<String, ProjectDetails>,
    teaching: BTreeMap<String, TeachingRecord>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(mut self, details: ProjectDetails) -> Self {
        self.projects.insert(details.project.id.clone(), details);
        self
    }

    pub fn with_teaching(mut self, record: TeachingRecord) -> Self {
        self.teaching.insert(record.id.clone(), record);
        self
    }
}

impl DataSource for MemorySource {
    fn project(&self, id: &RecordId) -> Result<Option<ProjectDetails>, FetchError> {
        Ok(self.projects.get(id.as_str()).cloned())
    }

    fn project_ids(&self) -> Result<Vec<RecordId>, FetchError> {
        Ok(collect_ids(self.projects.keys().cloned(), "projects"))
    }

    fn teaching(&self, id: &RecordId) -> Result<Option<TeachingRecord>, FetchError> {
        Ok(self.teaching.get(id.as_str()).cloned())
    }

    fn teaching_ids(&self) -> Result<Vec<RecordId>, FetchError> {
        Ok(collect_ids(self.teaching.keys().cloned(), "teaching"))
    }
}
