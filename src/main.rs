use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use hiring_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    routes,
    store::PgStore,
    AppState,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(Arc::new(PgStore::new(pool)));

    let base_routes = Router::new().route("/health", get(routes::health::health));

    // The apply flow is open; everything else is recruiter-facing.
    let public_api = Router::new()
        .route(
            "/api/public/jobs/:id",
            get(routes::job_routes::get_public_job),
        )
        .route(
            "/api/public/candidates",
            post(routes::candidate_routes::apply),
        );

    let recruiter_api = Router::new()
        .route(
            "/api/jobs",
            get(routes::job_routes::list_jobs).post(routes::job_routes::create_job),
        )
        .route("/api/jobs/stats", get(routes::job_routes::job_stats))
        .route(
            "/api/jobs/:id",
            get(routes::job_routes::get_job)
                .put(routes::job_routes::update_job)
                .delete(routes::job_routes::delete_job),
        )
        .route(
            "/api/candidates",
            get(routes::candidate_routes::list_candidates)
                .post(routes::candidate_routes::apply),
        )
        .route(
            "/api/candidates/:id",
            get(routes::candidate_routes::get_candidate)
                .delete(routes::candidate_routes::delete_candidate),
        )
        .route(
            "/api/candidates/:id/status",
            post(routes::candidate_routes::update_candidate_status),
        )
        .route(
            "/api/candidates/:id/fit-score",
            post(routes::candidate_routes::calculate_fit_score),
        )
        .route(
            "/api/interviews",
            get(routes::interview_routes::list_interviews)
                .post(routes::interview_routes::create_interview)
                .put(routes::interview_routes::update_interview)
                .delete(routes::interview_routes::delete_interview),
        )
        .layer(axum::middleware::from_fn(
            hiring_backend::middleware::auth::require_bearer_auth,
        ));

    info!("Serving uploads from: {}", config.uploads_dir);

    let app = base_routes
        .merge(public_api)
        .merge(recruiter_api)
        .nest_service(
            "/uploads",
            tower_http::services::ServeDir::new(&config.uploads_dir),
        )
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
