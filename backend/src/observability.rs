//! Structured logging setup via `tracing`/`tracing-subscriber`. This
//! service has no distributed-tracing collaborator to export spans to, so
//! it wires only the `EnvFilter` + `fmt` layer pair, no OTLP exporter.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_telemetry(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
