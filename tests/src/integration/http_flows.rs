//! # HTTP Flows
//!
//! Result submission and prediction through the runtime router, the way a
//! chat bot or admin client drives the service.

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use lotto_runtime::{router, AppState};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::integration::fixtures::{combo, draw, PipelineBuilder};

    async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_submitted_result_shapes_next_prediction() {
        let p = PipelineBuilder::new()
            .draws([draw(1120, [1, 2, 3, 4, 5, 6])])
            .script([
                combo([3, 11, 19, 27, 35, 42]),
                combo([5, 12, 18, 26, 33, 41]),
            ])
            .build();
        let app = router(AppState::from(&p.container));

        let (status, _) = post(
            &app,
            "/results",
            json!({"draw_no": 1121, "numbers": [42, 35, 27, 19, 11, 3], "draw_date": "2024-06-01"}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = post(&app, "/check", json!({"numbers": [3, 11, 19, 27, 35, 42]})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["previously_drawn"], true);
        assert_eq!(body["acceptable"], false);

        let (status, body) = post(&app, "/predict", json!({"count": 1, "requester": "chat-42"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["batch"]["combinations"], json!([[5, 12, 18, 26, 33, 41]]));
        assert_eq!(body["batch"]["target_draw"], 1122);
        assert_eq!(body["batch"]["requester"], "chat-42");
    }

    #[tokio::test]
    async fn test_invalid_result_is_not_stored() {
        let p = PipelineBuilder::new().build();
        let app = router(AppState::from(&p.container));

        let (status, body) = post(
            &app,
            "/results",
            json!({"draw_no": 7, "numbers": [1, 2, 3, 4, 5, 46]}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "invalid_combination");
        assert_eq!(p.store.draw_count(), 0);
    }
}
