//! Logging and OpenTelemetry metrics initialization.

use crate::LogFormat;
use bedrock_relay_error::ConfigError;
#[cfg(feature = "metrics")]
use opentelemetry::{KeyValue, global};
#[cfg(feature = "metrics")]
use opentelemetry_sdk::{
    Resource,
    metrics::{PeriodicReader, SdkMeterProvider, exporter::PushMetricExporter},
};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, instrument};
use tracing_subscriber::EnvFilter;

/// Environment variable naming the metrics exporter.
pub const EXPORTER_ENV: &str = "OTEL_EXPORTER";

/// Installs the global tracing subscriber.
///
/// The filter comes from `RUST_LOG`, defaulting to `info`.
pub fn init_tracing(format: LogFormat) -> Result<(), ConfigError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|e| ConfigError::new(format!("Failed to install log subscriber: {}", e)))
}

/// Where relay metrics are exported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExporterKind {
    /// Print to stdout
    #[default]
    Stdout,
    /// OTLP over HTTP; the endpoint comes from the standard
    /// `OTEL_EXPORTER_OTLP_*` variables
    Otlp,
}

impl ExporterKind {
    /// Reads [`EXPORTER_ENV`]; unset means stdout.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_setting(std::env::var(EXPORTER_ENV).ok().as_deref())
    }

    /// Parses an exporter setting, treating an absent or blank value as stdout.
    pub fn from_setting(setting: Option<&str>) -> Result<Self, ConfigError> {
        match setting.map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some(name) => Self::from_str(name).map_err(|_| {
                ConfigError::new(format!(
                    "Unknown {} `{}`; expected `stdout` or `otlp`",
                    EXPORTER_ENV, name
                ))
            }),
        }
    }
}

/// Keeps the meter provider alive until [`ObservabilityGuard::shutdown`].
///
/// Dropping the guard without calling `shutdown` skips the final export.
#[must_use = "call shutdown() to flush pending metrics"]
pub struct ObservabilityGuard {
    #[cfg(feature = "metrics")]
    provider: SdkMeterProvider,
}

impl std::fmt::Debug for ObservabilityGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservabilityGuard")
            .field("metrics", &cfg!(feature = "metrics"))
            .finish()
    }
}

impl ObservabilityGuard {
    /// Flushes pending metrics and stops the exporter.
    #[instrument(skip_all)]
    pub fn shutdown(self) -> Result<(), ConfigError> {
        #[cfg(feature = "metrics")]
        {
            self.provider
                .shutdown()
                .map_err(|e| ConfigError::new(format!("Metrics shutdown failed: {}", e)))?;
            info!("Metrics provider shut down");
        }
        #[cfg(not(feature = "metrics"))]
        debug!("Metrics feature disabled; nothing to shut down");
        Ok(())
    }
}

/// Installs the global meter provider that [`RelayMetrics`](crate::RelayMetrics)
/// records into.
///
/// Without the `metrics` feature nothing is installed and the guard is inert.
#[instrument(skip_all, fields(service_name, exporter = %exporter))]
pub fn init_observability(
    service_name: &'static str,
    exporter: ExporterKind,
    interval: Duration,
) -> Result<ObservabilityGuard, ConfigError> {
    #[cfg(not(feature = "metrics"))]
    {
        let _ = (exporter, interval);
        info!(service_name, "Metrics feature disabled");
        Ok(ObservabilityGuard {})
    }

    #[cfg(feature = "metrics")]
    {
        let provider = match exporter {
            ExporterKind::Stdout => build_provider(
                opentelemetry_stdout::MetricExporter::default(),
                service_name,
                interval,
            ),
            ExporterKind::Otlp => {
                let otlp = opentelemetry_otlp::MetricExporter::builder()
                    .with_http()
                    .build()
                    .map_err(|e| ConfigError::new(format!("Failed to create OTLP exporter: {}", e)))?;
                build_provider(otlp, service_name, interval)
            }
        };
        global::set_meter_provider(provider.clone());
        debug!(interval_secs = interval.as_secs(), "Meter provider installed");
        Ok(ObservabilityGuard { provider })
    }
}

#[cfg(feature = "metrics")]
fn build_provider<E: PushMetricExporter>(
    exporter: E,
    service_name: &'static str,
    interval: Duration,
) -> SdkMeterProvider {
    let reader = PeriodicReader::builder(exporter).with_interval(interval).build();
    SdkMeterProvider::builder()
        .with_resource(
            Resource::builder_empty()
                .with_attributes([KeyValue::new("service.name", service_name)])
                .build(),
        )
        .with_reader(reader)
        .build()
}
