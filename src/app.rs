use axum::Router;
use crate::state::AppState;
use tower_http::trace::TraceLayer;

pub fn create_app(state: AppState) -> Router {
    crate::routes::configure_routes(state.clone())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::TestContext;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, creator: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(creator) = creator {
            builder = builder.header("x-creator-id", creator);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let app = create_app(TestContext::new().state);
        let res = app.oneshot(get("/api/v1/health")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn ingest_then_compose_over_http() {
        let ctx = TestContext::new();
        let app = create_app(ctx.state.clone());
        let creator = uuid::Uuid::new_v4().to_string();

        let (status, body) = send(
            app.clone(),
            post_json(
                "/api/v1/links/ingest",
                Some(&creator),
                json!({ "urls": ["https://youtu.be/abc123", "https://youtu.be/abc123", "https://www.tiktok.com/@chef/video/999"] }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let assets = body["data"]["assets"].as_array().unwrap();
        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0]["platform"], "YOUTUBE");
        assert_eq!(assets[0]["externalId"], "abc123");
        assert_eq!(assets[0]["status"], "PENDING");
        assert_eq!(assets[0]["creatorId"], creator.as_str());

        let ids: Vec<Value> = assets.iter().map(|a| a["id"].clone()).collect();
        let (status, body) = send(
            app.clone(),
            post_json("/api/v1/courses/compose", Some(&creator), json!({ "linkAssetIds": ids })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let course = &body["data"]["course"];
        assert_eq!(course["modules"].as_array().unwrap().len(), 2);
        assert_eq!(course["isPaid"], false);
        assert!(course["modules"][0]["lessons"][0]["keyPoints"].is_array());

        let slug = course["slug"].as_str().unwrap();
        let (status, body) = send(app.clone(), get(&format!("/api/v1/courses/{}", slug))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["course"]["id"], course["id"]);

        let id = ids[0].as_str().unwrap();
        let (status, body) = send(app, get(&format!("/api/v1/links/{}", id))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["asset"]["id"], ids[0]);
    }

    #[tokio::test]
    async fn missing_header_uses_demo_creator() {
        let ctx = TestContext::new();
        let app = create_app(ctx.state.clone());

        let (status, body) = send(
            app,
            post_json("/api/v1/links/ingest", None, json!({ "urls": ["https://youtu.be/abc123"] })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["data"]["assets"][0]["creatorId"],
            ctx.state.config.demo_creator_id.to_string()
        );
    }

    #[tokio::test]
    async fn maps_errors_to_status_codes() {
        let app = create_app(TestContext::new().state);

        let (status, body) = send(
            app.clone(),
            post_json("/api/v1/links/ingest", None, json!({ "urls": [] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");

        let (status, _) = send(
            app.clone(),
            post_json("/api/v1/links/ingest", None, json!({ "urls": ["nope"] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            app.clone(),
            post_json("/api/v1/links/ingest", Some("not-a-uuid"), json!({ "urls": ["https://youtu.be/abc123"] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            app.clone(),
            post_json(
                "/api/v1/courses/compose",
                None,
                json!({ "linkAssetIds": [uuid::Uuid::new_v4()], "title": "ok" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            app.clone(),
            post_json("/api/v1/courses/compose", None, json!({ "linkAssetIds": [uuid::Uuid::new_v4()] })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(app.clone(), get(&format!("/api/v1/links/{}", uuid::Uuid::new_v4()))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(app, get("/api/v1/courses/missing-course")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
