use std::env;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    routing::get,
    Router,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;
use uuid::Uuid;

fn test_app() -> Router {
    env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    env::set_var("DATABASE_URL", "postgres://unused/test");
    env::set_var("JWT_SECRET", "test_secret_key");
    env::set_var("PUBLIC_BASE_URL", "http://localhost:3000");
    env::set_var(
        "UPLOADS_DIR",
        std::env::temp_dir().join("jobs-api-test").display().to_string(),
    );
    hiring_backend::config::init_config().expect("init config");

    let store = Arc::new(hiring_backend::store::MemoryStore::new());
    let state = hiring_backend::AppState::new(store);

    let public_api = Router::new().route(
        "/api/public/jobs/:id",
        get(hiring_backend::routes::job_routes::get_public_job),
    );
    let recruiter_api = Router::new()
        .route(
            "/api/jobs",
            get(hiring_backend::routes::job_routes::list_jobs)
                .post(hiring_backend::routes::job_routes::create_job),
        )
        .route(
            "/api/jobs/stats",
            get(hiring_backend::routes::job_routes::job_stats),
        )
        .route(
            "/api/jobs/:id",
            get(hiring_backend::routes::job_routes::get_job)
                .put(hiring_backend::routes::job_routes::update_job)
                .delete(hiring_backend::routes::job_routes::delete_job),
        )
        .layer(axum::middleware::from_fn(
            hiring_backend::middleware::auth::require_bearer_auth,
        ));

    public_api.merge(recruiter_api).with_state(state)
}

fn bearer() -> String {
    #[derive(serde::Serialize)]
    struct Claims {
        sub: String,
        exp: usize,
    }
    let exp = (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as usize;
    let token = encode(
        &Header::default(),
        &Claims {
            sub: "tester".into(),
            exp,
        },
        &EncodingKey::from_secret(
            hiring_backend::config::get_config().jwt_secret.as_bytes(),
        ),
    )
    .expect("sign token");
    format!("Bearer {}", token)
}

fn job_body(title: &str) -> JsonValue {
    json!({
        "title": title,
        "description": "Own our Rust backend services end to end",
        "performance": {
            "experience": "5 years of backend experience",
            "deliveries": "production services",
            "skills": ["rust", "postgres"]
        },
        "energy": {
            "availability": "full-time",
            "deadlines": "sprint cadence",
            "pressure": "moderate"
        },
        "culture": {
            "legal_values": ["integrity", "ownership"]
        }
    })
}

async fn body_json(resp: axum::response::Response) -> JsonValue {
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn jobs_api_end_to_end() {
    let app = test_app();
    let auth = bearer();

    // unauthenticated writes are refused
    let req = Request::builder()
        .method("POST")
        .uri("/api/jobs")
        .header("content-type", "application/json")
        .body(Body::from(job_body("Backend Engineer").to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // create: starts in draft with a derived application link
    let req = Request::builder()
        .method("POST")
        .uri("/api/jobs")
        .header("content-type", "application/json")
        .header("authorization", auth.clone())
        .body(Body::from(job_body("Backend Engineer").to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await;
    let job_id = Uuid::parse_str(created["id"].as_str().unwrap()).unwrap();
    assert_eq!(created["status"], "draft");
    assert_eq!(
        created["application_link"],
        format!("http://localhost:3000/apply/{}", job_id)
    );

    // empty title is a validation failure
    let mut invalid = job_body("");
    invalid["title"] = json!("");
    let req = Request::builder()
        .method("POST")
        .uri("/api/jobs")
        .header("content-type", "application/json")
        .header("authorization", auth.clone())
        .body(Body::from(invalid.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // drafts listing includes the new job
    let req = Request::builder()
        .method("GET")
        .uri("/api/jobs?status=draft")
        .header("authorization", auth.clone())
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let listed = body_json(resp).await;
    assert_eq!(listed["total"], 1);
    assert_eq!(listed["items"][0]["id"], created["id"]);

    // a draft is not publicly visible
    let req = Request::builder()
        .method("GET")
        .uri(format!("/api/public/jobs/{}", job_id))
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // unknown status value is rejected
    let req = Request::builder()
        .method("PUT")
        .uri(format!("/api/jobs/{}", job_id))
        .header("content-type", "application/json")
        .header("authorization", auth.clone())
        .body(Body::from(json!({"status": "archived"}).to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // publish, then the job moves between status filters
    let req = Request::builder()
        .method("PUT")
        .uri(format!("/api/jobs/{}", job_id))
        .header("content-type", "application/json")
        .header("authorization", auth.clone())
        .body(Body::from(json!({"status": "published"}).to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = body_json(resp).await;
    assert_eq!(updated["status"], "published");
    // untouched fields survive the merge-patch
    assert_eq!(updated["title"], "Backend Engineer");
    assert_eq!(updated["application_link"], created["application_link"]);

    let req = Request::builder()
        .method("GET")
        .uri("/api/jobs?status=draft")
        .header("authorization", auth.clone())
        .body(Body::empty())
        .unwrap();
    let drafts = body_json(app.clone().oneshot(req).await.unwrap()).await;
    assert_eq!(drafts["total"], 0);

    let req = Request::builder()
        .method("GET")
        .uri("/api/jobs?status=published")
        .header("authorization", auth.clone())
        .body(Body::empty())
        .unwrap();
    let published = body_json(app.clone().oneshot(req).await.unwrap()).await;
    assert_eq!(published["total"], 1);

    // now it is publicly visible
    let req = Request::builder()
        .method("GET")
        .uri(format!("/api/public/jobs/{}", job_id))
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // substring search composes with the status filter
    let req = Request::builder()
        .method("POST")
        .uri("/api/jobs")
        .header("content-type", "application/json")
        .header("authorization", auth.clone())
        .body(Body::from(job_body("Office Manager").to_string()))
        .unwrap();
    app.clone().oneshot(req).await.unwrap();

    let req = Request::builder()
        .method("GET")
        .uri("/api/jobs?search=backend&status=published")
        .header("authorization", auth.clone())
        .body(Body::empty())
        .unwrap();
    let found = body_json(app.clone().oneshot(req).await.unwrap()).await;
    assert_eq!(found["total"], 1);
    assert_eq!(found["items"][0]["title"], "Backend Engineer");

    // a page past the end is empty, total untouched
    let req = Request::builder()
        .method("GET")
        .uri("/api/jobs?page=9&per_page=10")
        .header("authorization", auth.clone())
        .body(Body::empty())
        .unwrap();
    let beyond = body_json(app.clone().oneshot(req).await.unwrap()).await;
    assert_eq!(beyond["total"], 2);
    assert_eq!(beyond["items"].as_array().unwrap().len(), 0);

    // stats reflect both postings
    let req = Request::builder()
        .method("GET")
        .uri("/api/jobs/stats")
        .header("authorization", auth.clone())
        .body(Body::empty())
        .unwrap();
    let stats = body_json(app.clone().oneshot(req).await.unwrap()).await;
    assert_eq!(stats["total"], 2);
    assert_eq!(stats["published"], 1);
    assert_eq!(stats["draft"], 1);

    // delete succeeds with no candidates attached, then the job is gone
    let req = Request::builder()
        .method("DELETE")
        .uri(format!("/api/jobs/{}", job_id))
        .header("authorization", auth.clone())
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = Request::builder()
        .method("GET")
        .uri(format!("/api/jobs/{}", job_id))
        .header("authorization", auth)
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
