use crate::config::{Environment, LogLevel};
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    layer::{Identity, Layered, SubscriberExt},
    util::SubscriberInitExt,
};

/// Initialize tracing subscriber with pretty formatting for development
/// and JSON formatting for production.
///
/// `RUST_LOG` takes precedence; `log_level` is the fallback filter.
pub fn setup_logging(log_level: LogLevel, environment: Environment) {
    init_subscriber(None::<Identity>, log_level, environment);
}

/// Installs the global subscriber, optionally with an extra layer (the
/// OpenTelemetry bridge) between the filter and the formatter.
pub(crate) fn init_subscriber<L>(extra: Option<L>, log_level: LogLevel, environment: Environment)
where
    L: Layer<Layered<EnvFilter, Registry>> + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level.as_str()));

    let registry = tracing_subscriber::registry().with(env_filter).with(extra);

    match environment {
        Environment::Production => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_level(true))
                .init();
        }
        Environment::Development => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_ansi(true))
                .init();
        }
    }
}
