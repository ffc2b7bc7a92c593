use std::{path::PathBuf, time::Instant};

use crate::route::PageParams;

/// Metadata returned by [`build()`](crate::build()) for a single page.
#[derive(Debug)]
pub struct PageOutput {
    pub route: String,
    pub url: String,
    pub file_path: PathBuf,
    pub params: Option<PageParams>,
}

/// A file copied from the static directory without any processing.
#[derive(Debug)]
pub struct StaticAssetOutput {
    pub file_path: PathBuf,
    pub original_path: PathBuf,
}

/// Metadata returned by [`build()`](crate::build()) after a successful build.
#[derive(Debug)]
pub struct BuildOutput {
    pub start_time: Instant,
    pub pages: Vec<PageOutput>,
    pub static_files: Vec<StaticAssetOutput>,
}

impl BuildOutput {
    pub fn new(start_time: Instant) -> Self {
        Self {
            start_time,
            pages: Vec::new(),
            static_files: Vec::new(),
        }
    }

    pub(crate) fn add_pages(&mut self, pages: impl IntoIterator<Item = PageOutput>) {
        self.pages.extend(pages);
    }

    pub(crate) fn add_static_file(&mut self, file_path: PathBuf, original_path: PathBuf) {
        self.static_files.push(StaticAssetOutput {
            file_path,
            original_path,
        });
    }
}

impl Default for BuildOutput {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}
