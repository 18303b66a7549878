use axum::Json;
use axum::extract::State;

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let missing = state.missing_datasets().await;
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "datasets_ready": missing.is_empty(),
        "missing_datasets": missing,
    }))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use migration_map_shared::{MIGRATION_FILE, POPULATION_FILE, TOPOLOGY_FILE};
    use tower::ServiceExt;

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "migration-map-{name}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    async fn get(state: AppState, uri: &str) -> axum::response::Response {
        crate::app::build_app(state)
            .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response")
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("read body")
            .to_bytes();
        serde_json::from_slice(&bytes).expect("parse json")
    }

    #[tokio::test]
    async fn health_reports_missing_datasets() {
        let data = scratch_dir("health-missing");
        std::fs::write(data.join(TOPOLOGY_FILE), "{}").expect("write topology");

        let response = get(AppState::new(data.join("dist"), &data), "/api/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        let health = json_body(response).await;

        assert_eq!(health["status"], "ok");
        assert_eq!(health["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(health["datasets_ready"], false);
        assert_eq!(
            health["missing_datasets"],
            serde_json::json!([MIGRATION_FILE, POPULATION_FILE])
        );
        let _ = std::fs::remove_dir_all(&data);
    }

    #[tokio::test]
    async fn datasets_are_served_with_short_cache() {
        let data = scratch_dir("health-ready");
        for file in [TOPOLOGY_FILE, MIGRATION_FILE, POPULATION_FILE] {
            std::fs::write(data.join(file), "{}").expect("write dataset");
        }
        let state = AppState::new(data.join("dist"), &data);

        let health = json_body(get(state.clone(), "/api/health").await).await;
        assert_eq!(health["datasets_ready"], true);

        let response = get(state, "/data/migration.json").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).map(|v| v.to_str().ok()),
            Some(Some("public, max-age=3600"))
        );
        assert_eq!(json_body(response).await, serde_json::json!({}));
        let _ = std::fs::remove_dir_all(&data);
    }

    #[tokio::test]
    async fn datasets_are_compressed_on_request() {
        let data = scratch_dir("gzip");
        let rows: serde_json::Value = (1990..2020)
            .map(|year| (year.to_string(), serde_json::json!({ "USA": { "Total": 1000 } })))
            .collect::<serde_json::Map<_, _>>()
            .into();
        std::fs::write(data.join(MIGRATION_FILE), rows.to_string()).expect("write dataset");

        let response = crate::app::build_app(AppState::new(data.join("dist"), &data))
            .oneshot(
                Request::get("/data/migration.json")
                    .header(header::ACCEPT_ENCODING, "gzip")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_ENCODING).map(|v| v.to_str().ok()),
            Some(Some("gzip"))
        );
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).map(|v| v.to_str().ok()),
            Some(Some("public, max-age=3600"))
        );
        let _ = std::fs::remove_dir_all(&data);
    }

    #[tokio::test]
    async fn unknown_dataset_is_not_found_without_cache_header() {
        let data = scratch_dir("health-404");
        let response = get(AppState::new(data.join("dist"), &data), "/data/nope.json").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().get(header::CACHE_CONTROL).is_none());
        let _ = std::fs::remove_dir_all(&data);
    }
}
