use std::path::PathBuf;
use std::time::Instant;

use axum::{
    Router,
    handler::HandlerWithoutStateExt,
    http::{StatusCode, header},
    middleware,
    response::IntoResponse,
};
use labsite::{SiteMeta, layout::not_found_page};
use log::debug;
use tokio::fs;
use tower_http::{
    services::ServeDir,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::Level;

use crate::server_utils::{
    CustomOnResponse, bind_open_port, insert_request_uri, listen_address, log_server_start,
};

/// Serves a finished build as static files, using its `404.html` for unknown paths.
pub fn router(dist_dir: PathBuf) -> Router {
    async fn handle_404(dist_dir: PathBuf) -> impl IntoResponse {
        let content = match fs::read_to_string(dist_dir.join("404.html")).await {
            Ok(custom_content) => custom_content,
            Err(_) => not_found_page(&SiteMeta::default()).into_string(),
        };

        (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            content,
        )
            .into_response()
    }

    let dist_dir_clone = dist_dir.clone();
    let service = (move || handle_404(dist_dir_clone.clone())).into_service();
    let serve_dir = ServeDir::new(dist_dir).not_found_service(service);

    Router::new()
        .fallback_service(serve_dir)
        .layer(middleware::from_fn(insert_request_uri))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(CustomOnResponse),
        )
}

pub async fn start_preview_web_server(dist_dir: PathBuf, host: bool, port: u16) -> std::io::Result<()> {
    let start_time = Instant::now();

    let listener = bind_open_port(listen_address(host), port).await?;
    let local_addr = listener.local_addr()?;

    debug!(target: "server", "listening on {}", local_addr);

    log_server_start(start_time, host, local_addr, "Preview");

    axum::serve(listener, router(dist_dir).into_make_service()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

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
    async fn test_serves_built_pages() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("projects/p1")).unwrap();
        std::fs::write(dir.path().join("projects/p1/index.html"), "<h1>p1</h1>").unwrap();

        let (status, body) = get_page(router(dir.path().to_path_buf()), "/projects/p1/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<h1>p1</h1>");
    }

    #[tokio::test]
    async fn test_not_found_uses_built_404() {
        let dir = tempfile::tempdir().unwrap();

        let (status, body) = get_page(router(dir.path().to_path_buf()), "/projects/p2/").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Page not found"));

        std::fs::write(dir.path().join("404.html"), "custom 404").unwrap();
        let (status, body) = get_page(router(dir.path().to_path_buf()), "/projects/p2/").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "custom 404");
    }
}
