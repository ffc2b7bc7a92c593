use std::path::PathBuf;

/// Site-wide values used in every page's head and footer.
#[derive(Debug, Clone)]
pub struct SiteMeta {
    pub name: String,
    pub description: String,
    /// Appended to each page's own keywords.
    pub keywords: Vec<String>,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            name: "Research Lab".to_string(),
            description: "Research projects, publications and courses.".to_string(),
            keywords: Vec::new(),
        }
    }
}

/// Options for [`build()`](crate::build()).
///
/// ## Example
/// ```rust
/// use labsite::BuildOptions;
///
/// let options = BuildOptions {
///     base_url: Some("https://lab.example.org".into()),
///     output_dir: "public".into(),
///     ..Default::default()
/// };
/// assert!(options.clean_output_dir);
/// ```
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Base URL for the site, e.g. `https://example.com`. Used for canonical URLs.
    pub base_url: Option<String>,

    pub output_dir: PathBuf,
    /// Copied as-is into the output directory when it exists.
    pub static_dir: PathBuf,

    /// Whether to remove the output directory before building, dropping pages of records that no longer exist.
    pub clean_output_dir: bool,

    pub site: SiteMeta,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            base_url: None,
            output_dir: "dist".into(),
            static_dir: "static".into(),
            clean_output_dir: true,
            site: SiteMeta::default(),
        }
    }
}
