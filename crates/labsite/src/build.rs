use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Instant,
};

use colored::{ColoredString, Colorize};
use log::{info, trace, warn};
use rayon::prelude::*;

use crate::{
    BuildOptions, BuildOutput,
    build::metadata::PageOutput,
    data::DataSource,
    errors::{BuildError, LabsiteError},
    logging::{FormatElapsedTimeOptions, format_elapsed_time, print_title},
    route::{DynamicRouteContext, PageContext, PageParams, Route, RouteExt},
    routing::RouteType,
};

pub mod metadata;
pub mod options;

/// Pre-renders every page of `routes` into [`BuildOptions::output_dir`].
///
/// Dynamic routes list their pages through [`Route::pages`] first, then every page is rendered in parallel.
/// Fails on the first page that can't be fetched or written.
pub fn build(
    routes: &[&dyn Route],
    source: &dyn DataSource,
    options: &BuildOptions,
) -> Result<BuildOutput, LabsiteError> {
    let build_start = Instant::now();
    let mut build_metadata = BuildOutput::new(build_start);

    trace!(target: "build", "Setting up required directories...");

    if options.clean_output_dir {
        match fs::remove_dir_all(&options.output_dir) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
    }
    fs::create_dir_all(&options.output_dir)?;

    info!(target: "build", "Output directory: {}", options.output_dir.display());

    print_title("generating pages");
    let pages_start = Instant::now();

    let route_format_options = FormatElapsedTimeOptions {
        additional_fn: Some(&|msg: ColoredString| {
            let formatted_msg = format!("(+{})", msg);
            if msg.fgcolor.is_none() {
                formatted_msg.dimmed()
            } else {
                formatted_msg.into()
            }
        }),
        ..Default::default()
    };

    let section_format_options = FormatElapsedTimeOptions {
        sec_red_threshold: 5,
        sec_yellow_threshold: 1,
        millis_red_threshold: None,
        millis_yellow_threshold: None,
        ..Default::default()
    };

    let route_pages = routes
        .par_iter()
        .map(|route| build_route(*route, source, options, &route_format_options))
        .collect::<Result<Vec<_>, BuildError>>()?;

    let page_count: usize = route_pages.iter().map(Vec::len).sum();
    build_metadata.add_pages(route_pages.into_iter().flatten());

    info!(target: "pages", "{}", format!("generated {} pages in {}", page_count, format_elapsed_time(pages_start.elapsed(), &section_format_options)).bold());

    if options.static_dir.exists() {
        let assets_start = Instant::now();
        print_title("copying assets");

        copy_recursively(
            &options.static_dir,
            &options.output_dir,
            &mut build_metadata,
        )?;

        info!(target: "build", "{}", format!("Assets copied in {}", format_elapsed_time(assets_start.elapsed(), &FormatElapsedTimeOptions::default())).bold());
    }

    info!(target: "SKIP_FORMAT", "{}", "");
    info!(target: "build", "{}", format!("Build completed in {}", format_elapsed_time(build_start.elapsed(), &section_format_options)).bold());

    Ok(build_metadata)
}

fn build_route(
    route: &dyn Route,
    source: &dyn DataSource,
    options: &BuildOptions,
    format_options: &FormatElapsedTimeOptions,
) -> Result<Vec<PageOutput>, BuildError> {
    match route.route_type() {
        RouteType::Static => {
            let page = build_page(route, &PageParams::default(), source, options, format_options)?;
            Ok(vec![page])
        }
        RouteType::Dynamic => {
            let pages = route
                .pages(&DynamicRouteContext { source })
                .map_err(|err| BuildError::Enumerate {
                    route: route.route_raw().to_string(),
                    source: err,
                })?;

            if pages.is_empty() {
                warn!(target: "build", "{} is a dynamic route, but its implementation of Route::pages returned an empty Vec. No pages will be generated for this route.", route.route_raw().bold());
                return Ok(Vec::new());
            }

            info!(target: "build", "{} ({} pages)", route.route_raw().bold(), pages.len());

            pages
                .par_iter()
                .map(|params| build_page(route, params, source, options, format_options))
                .collect()
        }
    }
}

fn build_page(
    route: &dyn Route,
    params: &PageParams,
    source: &dyn DataSource,
    options: &BuildOptions,
    format_options: &FormatElapsedTimeOptions,
) -> Result<PageOutput, BuildError> {
    let page_start = Instant::now();
    let url = route.url(params);

    let ctx = PageContext {
        params,
        source,
        current_path: &url,
        base_url: options.base_url.as_deref(),
        site: &options.site,
    };

    let markup = route.render(&ctx).map_err(|err| BuildError::Render {
        route: route.route_raw().to_string(),
        path: url.clone(),
        source: err,
    })?;

    let file_path = route.file_path(params, &options.output_dir);

    write_route_file(markup.into_string().as_bytes(), &file_path).map_err(|err| {
        BuildError::Write {
            path: file_path.clone(),
            source: err,
        }
    })?;

    info!(target: "pages", "{} -> {} {}", url, file_path.to_string_lossy().dimmed(), format_elapsed_time(page_start.elapsed(), format_options));

    Ok(PageOutput {
        route: route.route_raw().to_string(),
        url,
        file_path,
        params: (!params.is_empty()).then(|| params.clone()),
    })
}

fn copy_recursively(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    build_metadata: &mut BuildOutput,
) -> io::Result<()> {
    fs::create_dir_all(&destination)?;
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let filetype = entry.file_type()?;
        if filetype.is_dir() {
            copy_recursively(
                entry.path(),
                destination.as_ref().join(entry.file_name()),
                build_metadata,
            )?;
        } else {
            let target = destination.as_ref().join(entry.file_name());
            fs::copy(entry.path(), &target)?;

            build_metadata.add_static_file(target, entry.path());
        }
    }
    Ok(())
}

fn write_route_file(content: &[u8], file_path: &PathBuf) -> Result<(), io::Error> {
    // Create the parent directories if it doesn't exist
    if let Some(parent_dir) = file_path.parent() {
        fs::create_dir_all(parent_dir)?
    }

    fs::write(file_path, content)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::models::{Project, ProjectCategory};
    use crate::data::{MemorySource, ProjectDetails, TeachingRecord};
    use crate::errors::FetchError;
    use crate::id::RecordId;
    use crate::routes::ROUTES;
    use tempfile::tempdir;

    fn project(id: &str) -> ProjectDetails {
        ProjectDetails {
            project: Project {
                id: id.to_string(),
                title: format!("Project <em>{id}</em>"),
                description: "<p>About</p><script>alert(1)</script>".to_string(),
                image: None,
                category: ProjectCategory::Isro,
                informations: Vec::new(),
                principal_investigator: None,
                first_co_investigator: None,
                second_co_investigator: None,
            },
            publications: Vec::new(),
        }
    }

    fn teaching(id: &str) -> TeachingRecord {
        serde_json::from_str(&format!(
            r#"{{"_id": "{id}", "title": "Course {id}", "attendancePercentage": "75%"}}"#
        ))
        .unwrap()
    }

    fn options(output_dir: &Path) -> BuildOptions {
        BuildOptions {
            output_dir: output_dir.to_path_buf(),
            static_dir: output_dir.join("does-not-exist"),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_writes_one_file_per_record() {
        let dir = tempdir().unwrap();
        let dist = dir.path().join("dist");
        let source = MemorySource::new()
            .with_project(project("p1"))
            .with_project(project("p2"))
            .with_teaching(teaching("t1"));

        let output = build(ROUTES, &source, &options(&dist)).unwrap();

        // 2 projects, 1 course, the 404 page
        assert_eq!(output.pages.len(), 4);
        assert!(dist.join("projects/p1/index.html").exists());
        assert!(dist.join("projects/p2/index.html").exists());
        assert!(dist.join("teaching/t1/index.html").exists());
        assert!(dist.join("404.html").exists());

        let page = fs::read_to_string(dist.join("projects/p1/index.html")).unwrap();
        assert!(page.contains("Project <em>p1</em>"));
        assert!(!page.contains("<script>alert(1)</script>"));

        let course = fs::read_to_string(dist.join("teaching/t1/index.html")).unwrap();
        assert!(course.contains("below 75%"));
    }

    #[test]
    fn test_build_with_no_records() {
        let dir = tempdir().unwrap();
        let dist = dir.path().join("dist");

        let output = build(ROUTES, &MemorySource::new(), &options(&dist)).unwrap();

        assert_eq!(output.pages.len(), 1);
        assert!(!dist.join("projects").exists());
        assert!(!dist.join("teaching").exists());
    }

    #[test]
    fn test_build_cleans_output_dir() {
        let dir = tempdir().unwrap();
        let dist = dir.path().join("dist");
        fs::create_dir_all(dist.join("projects/stale")).unwrap();
        fs::write(dist.join("projects/stale/index.html"), "old").unwrap();

        build(ROUTES, &MemorySource::new(), &options(&dist)).unwrap();
        assert!(!dist.join("projects/stale").exists());

        fs::create_dir_all(dist.join("projects/stale")).unwrap();
        let keep = BuildOptions {
            clean_output_dir: false,
            ..options(&dist)
        };
        build(ROUTES, &MemorySource::new(), &keep).unwrap();
        assert!(dist.join("projects/stale").exists());
    }

    #[test]
    fn test_build_copies_static_dir() {
        let dir = tempdir().unwrap();
        let static_dir = dir.path().join("static");
        fs::create_dir_all(static_dir.join("img")).unwrap();
        fs::write(static_dir.join("style.css"), "body {}").unwrap();
        fs::write(static_dir.join("img/logo.svg"), "<svg/>").unwrap();

        let dist = dir.path().join("dist");
        let output = build(
            ROUTES,
            &MemorySource::new(),
            &BuildOptions {
                static_dir,
                ..options(&dist)
            },
        )
        .unwrap();

        assert_eq!(output.static_files.len(), 2);
        assert_eq!(fs::read_to_string(dist.join("style.css")).unwrap(), "body {}");
        assert!(dist.join("img/logo.svg").exists());
    }

    struct UnreachableSource;

    impl DataSource for UnreachableSource {
        fn project(&self, _id: &RecordId) -> Result<Option<ProjectDetails>, FetchError> {
            Ok(None)
        }

        fn project_ids(&self) -> Result<Vec<RecordId>, FetchError> {
            Err(FetchError::Status {
                url: "http://api.invalid/projects".to_string(),
                status: 503,
            })
        }

        fn teaching(&self, _id: &RecordId) -> Result<Option<TeachingRecord>, FetchError> {
            Ok(None)
        }

        fn teaching_ids(&self) -> Result<Vec<RecordId>, FetchError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_build_fails_when_service_is_down() {
        let dir = tempdir().unwrap();

        let err = build(ROUTES, &UnreachableSource, &options(&dir.path().join("dist"))).unwrap_err();

        assert!(matches!(
            err,
            LabsiteError::Build(BuildError::Enumerate { ref route, .. }) if route == "/projects/[id]/"
        ));
    }
}
