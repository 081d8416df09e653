use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::routing::{any, get};
use axum::Router;
use cf_rating_predictor_backend::config::Config;
use cf_rating_predictor_backend::handlers::http::{healthz, rating_changes};
use cf_rating_predictor_backend::observability::init_telemetry;
use cf_rating_predictor_backend::services::cache::{Cache, RefreshPolicyConfig};
use cf_rating_predictor_backend::services::upstream::CodeforcesClient;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = Config::from_args();
    init_telemetry(config.verbose);

    tracing::info!("cf-rating-predictor starting up");

    let cache = Arc::new(Cache::new(RefreshPolicyConfig {
        update_rating_before: config.update_rating_before,
        update_rating_changes_after: config.update_rating_changes_after,
        clear_rating_changes_after: config.clear_rating_changes_after,
    }));

    spawn_driver(cache.clone(), config.update_interval);

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/api/contest.ratingChanges", any(rating_changes))
        .with_state(cache)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
                .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
        );

    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await
}

/// A self-driving loop rather than a strict ticker, to avoid overlapping
/// update passes when one runs long: run, then sleep whatever remains of
/// the interval, rather than firing on a fixed clock regardless of how
/// long the previous pass took.
fn spawn_driver(cache: Arc<Cache>, update_interval: std::time::Duration) {
    tokio::spawn(async move {
        let upstream = CodeforcesClient::new();
        loop {
            let started = tokio::time::Instant::now();
            let now = unix_now();

            if let Err(err) = cache.update(&upstream, now).await {
                tracing::warn!(error = %err, "refresh pass failed, retrying next tick");
            }

            let elapsed = started.elapsed();
            let remaining = update_interval.saturating_sub(elapsed);
            tokio::time::sleep(remaining).await;
        }
    });
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_secs() as i64
}
