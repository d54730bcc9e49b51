use crate::error::AppError;
use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{Resource, runtime, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber: env filter, JSON logs and, when an
/// endpoint is given, an OTLP trace exporter.
///
/// `RUST_LOG` takes precedence over `log_level`.
pub fn init_tracing(
    service_name: &str,
    log_level: &str,
    otlp_endpoint: Option<&str>,
) -> Result<(), AppError> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let tracer = match otlp_endpoint {
        Some(endpoint) => {
            let otlp_exporter = opentelemetry_otlp::new_exporter()
                .tonic()
                .with_endpoint(endpoint);

            let tracer = opentelemetry_otlp::new_pipeline()
                .tracing()
                .with_exporter(otlp_exporter)
                .with_trace_config(sdktrace::config().with_resource(Resource::new(vec![
                    KeyValue::new("service.name", service_name.to_string()),
                ])))
                .install_batch(runtime::Tokio)
                .map_err(|e| {
                    eprintln!(
                        "Failed to initialize OTLP tracer for service '{}' at endpoint '{}': {}",
                        service_name, endpoint, e
                    );
                    AppError::ConfigError(anyhow::Error::new(e))
                })?;
            Some(tracer)
        }
        None => None,
    };

    let telemetry = tracer.map(|tracer| tracing_opentelemetry::layer().with_tracer(tracer));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(telemetry)
        .with(
            tracing_subscriber::fmt::layer()
                .with_file(true)
                .with_line_number(true)
                .json()
                .flatten_event(true),
        )
        .try_init()
        .map_err(|e| AppError::InternalError(anyhow::Error::new(e)))?;

    tracing::info!(
        service = %service_name,
        otlp = otlp_endpoint.is_some(),
        "Tracing initialized"
    );
    Ok(())
}
