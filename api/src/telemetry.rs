//! Tracing subscriber setup

use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use cr_shared::config::{LogFormat, LoggingConfig};

/// Install the global subscriber
///
/// `RUST_LOG` wins over the configured level. Noisy dependencies are held at
/// `warn` unless `RUST_LOG` says otherwise.
pub fn init_tracing(config: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{},sqlx=warn,actix_server=info,lettre=warn",
            config.level
        ))
    });

    let layer: Box<dyn Layer<Registry> + Send + Sync> = match config.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_file(config.source_location)
            .with_line_number(config.source_location)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_file(config.source_location)
            .with_line_number(config.source_location)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(true)
            .with_file(config.source_location)
            .with_line_number(config.source_location)
            .boxed(),
    };

    // A second initialization (tests) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(layer.with_filter(env_filter))
        .try_init();
}
