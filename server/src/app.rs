use std::path::Path;

use axum::{
    Router,
    extract::{OriginalUri, Request},
    http::{HeaderValue, Method, header},
    middleware::{self, Next},
    response::Response,
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::routes;
use crate::state::AppState;

const DATA_CACHE_CONTROL: &str = "public, max-age=3600";
const IMMUTABLE_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

pub(crate) fn build_app(state: AppState) -> Router {
    let datasets = ServeDir::new(state.data_dir.as_path()).precompressed_gzip();
    let static_assets = Router::new()
        .nest_service("/data", datasets)
        .fallback_service(
            ServeDir::new(state.dist_dir.as_path())
                .precompressed_br()
                .precompressed_gzip(),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::HEAD]),
        )
        .layer(middleware::from_fn(set_static_cache_control));

    let app = Router::new().route("/api/health", axum::routing::get(routes::api::health));

    app.fallback_service(static_assets)
        .layer(CompressionLayer::new())
        .with_state(state)
}

async fn set_static_cache_control(request: Request, next: Next) -> Response {
    // Nested services see a stripped URI; match on what the browser asked for.
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.path().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());
    let mut response = next.run(request).await;

    if response.status().is_success()
        && let Some(cache_control) = cache_control_for_path(&path)
    {
        response.headers_mut().insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static(cache_control),
        );
    }

    response
}

fn cache_control_for_path(path: &str) -> Option<&'static str> {
    if path.starts_with("/data/") {
        return Some(DATA_CACHE_CONTROL);
    }

    if is_hashed_bundle_asset(path) {
        return Some(IMMUTABLE_CACHE_CONTROL);
    }

    None
}

fn is_hashed_bundle_asset(path: &str) -> bool {
    let path = Path::new(path);
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    if !matches!(ext, "wasm" | "js" | "css") {
        return false;
    }

    let Some(filename) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };

    filename
        .split(['-', '_', '.'])
        .any(|segment| segment.len() >= 8 && segment.chars().all(|c| c.is_ascii_hexdigit()))
}
