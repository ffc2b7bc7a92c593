use std::{
    collections::HashMap,
    path::{Path as FsPath, PathBuf},
    sync::Arc,
    time::Instant,
};

use axum::{
    Router,
    extract::{Path, State},
    handler::HandlerWithoutStateExt,
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use labsite::{
    DataSource, SiteMeta,
    layout::{not_found_page, unavailable_page},
    route::{PageContext, PageParams, Route, RouteExt},
    routing::{RouteType, to_path_template},
};
use log::{debug, error};
use tower_http::{
    services::ServeDir,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::Level;

use crate::server_utils::{
    CustomOnResponse, bind_open_port, insert_request_uri, listen_address, log_server_start,
};

/// Page served for unknown paths. Requested directly, it keeps its 404 status.
const NOT_FOUND_ROUTE: &str = "/404.html";

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn DataSource>,
    pub routes: &'static [&'static dyn Route],
    pub site: Arc<SiteMeta>,
    pub base_url: Option<Arc<str>>,
}

/// Renders every route on request, falling back to files of `static_dir`.
pub fn router(state: AppState, static_dir: &FsPath) -> Router {
    let mut router = Router::new();

    for &route in state.routes {
        let template = to_path_template(route.route_raw());
        let status = if route.route_raw() == NOT_FOUND_ROUTE {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::OK
        };

        let mut paths = vec![template.clone()];
        if template.len() > 1 && template.ends_with('/') {
            paths.push(template.trim_end_matches('/').to_string());
        }

        for path in paths {
            router = match route.route_type() {
                RouteType::Static => router.route(
                    &path,
                    get(move |State(state): State<AppState>| {
                        render_page(route, PageParams::default(), status, state)
                    }),
                ),
                RouteType::Dynamic => router.route(
                    &path,
                    get(
                        move |State(state): State<AppState>,
                              Path(params): Path<HashMap<String, String>>| {
                            render_page(route, params.into_iter().collect(), status, state)
                        },
                    ),
                ),
            };
        }
    }

    let site = state.site.clone();
    let not_found = (move || async move {
        (StatusCode::NOT_FOUND, Html(not_found_page(&site).into_string()))
    })
    .into_service();
    let serve_dir = ServeDir::new(static_dir).not_found_service(not_found);

    router
        .fallback_service(serve_dir)
        .layer(middleware::from_fn(insert_request_uri))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(CustomOnResponse),
        )
        .with_state(state)
}

async fn render_page(
    route: &'static dyn Route,
    params: PageParams,
    status: StatusCode,
    state: AppState,
) -> Response {
    let path = route.url(&params);
    let site = state.site.clone();

    let render_path = path.clone();
    let rendered = tokio::task::spawn_blocking(move || {
        let ctx = PageContext {
            params: &params,
            source: state.source.as_ref(),
            current_path: &render_path,
            base_url: state.base_url.as_deref(),
            site: &state.site,
        };

        route.render(&ctx).map(|markup| markup.into_string())
    })
    .await;

    match rendered {
        Ok(Ok(html)) => (status, Html(html)).into_response(),
        Ok(Err(err)) => {
            error!(target: "server", "Failed to render {}: {}", path, err);
            (StatusCode::BAD_GATEWAY, Html(unavailable_page(&site).into_string())).into_response()
        }
        Err(err) => {
            error!(target: "server", "Rendering {} panicked: {}", path, err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn start_server(
    state: AppState,
    static_dir: PathBuf,
    host: bool,
    port: u16,
) -> std::io::Result<()> {
    let start_time = Instant::now();

    let listener = bind_open_port(listen_address(host), port).await?;
    let local_addr = listener.local_addr()?;

    debug!(target: "server", "listening on {}", local_addr);

    let router = router(state, &static_dir);

    log_server_start(start_time, host, local_addr, "Site");

    axum::serve(listener, router.into_make_service()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use labsite::{
        FetchError, MemorySource, RecordId,
        data::{ProjectDetails, TeachingRecord},
        routes::ROUTES,
    };
    use tower::ServiceExt;

    fn teaching_source() -> MemorySource {
        MemorySource::new().with_teaching(TeachingRecord {
            id: "t1".to_string(),
            title: "Machine Learning".to_string(),
            credit_points: None,
            session: "2024-25".to_string(),
            routine: Vec::new(),
            attendance_percentage: "75%".to_string(),
            course_description: String::new(),
            teaching_learning_process: Vec::new(),
            course_objectives: Vec::new(),
            programme_objectives: Vec::new(),
            prerequisites: Vec::new(),
            syllabus: Vec::new(),
            reference_books: Vec::new(),
            other_resources: Vec::new(),
            miscellaneous: Vec::new(),
        })
    }

    fn state(source: impl DataSource + 'static) -> AppState {
        AppState {
            source: Arc::new(source),
            routes: ROUTES,
            site: Arc::new(SiteMeta::default()),
            base_url: None,
        }
    }

    async fn get_page(router: Router, uri: &str) -> (StatusCode, String) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();

        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_known_record() {
        let dir = tempfile::tempdir().unwrap();
        let router = router(state(teaching_source()), dir.path());

        let (status, body) = get_page(router.clone(), "/teaching/t1/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("below 75%"));

        let (status, body) = get_page(router, "/teaching/t1").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Machine Learning"));
    }

    #[tokio::test]
    async fn test_unknown_record_renders_loading() {
        let dir = tempfile::tempdir().unwrap();
        let router = router(state(teaching_source()), dir.path());

        let (status, body) = get_page(router, "/projects/does-not-exist/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Loading..."));
    }

    struct FailingSource;

    impl DataSource for FailingSource {
        fn project(&self, _id: &RecordId) -> Result<Option<ProjectDetails>, FetchError> {
            Err(FetchError::Status {
                url: "http://api.invalid/projects/p1".to_string(),
                status: 500,
            })
        }

        fn project_ids(&self) -> Result<Vec<RecordId>, FetchError> {
            Ok(Vec::new())
        }

        fn teaching(&self, _id: &RecordId) -> Result<Option<TeachingRecord>, FetchError> {
            Ok(None)
        }

        fn teaching_ids(&self) -> Result<Vec<RecordId>, FetchError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_service_failure_is_bad_gateway() {
        let dir = tempfile::tempdir().unwrap();
        let router = router(state(FailingSource), dir.path());

        let (status, body) = get_page(router, "/projects/p1/").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body.contains("Temporarily unavailable"));
    }

    #[tokio::test]
    async fn test_static_files_and_not_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("style.css"), "body {}").unwrap();
        let router = router(state(MemorySource::new()), dir.path());

        let (status, body) = get_page(router.clone(), "/style.css").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "body {}");

        let (status, body) = get_page(router, "/nope/").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Page not found"));
    }

    #[tokio::test]
    async fn test_not_found_page_keeps_its_status() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("404.html"), "stale build").unwrap();
        let router = router(state(MemorySource::new()), dir.path());

        let (status, body) = get_page(router, "/404.html").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Page not found"));
    }
}
