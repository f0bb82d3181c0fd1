use std::fmt::Debug;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::level_filters::LevelFilter;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;

/// Splits an event into the record body (its `message`) and attributes.
/// `event_name` and `event_domain` are stored under their dotted names.
#[derive(Default)]
struct RecordVisitor {
    body: Option<String>,
    attributes: Map<String, Value>,
}

impl RecordVisitor {
    fn attribute(&mut self, field: &Field, value: impl Into<Value>) {
        let key = match field.name() {
            "event_name" => "event.name",
            "event_domain" => "event.domain",
            other => other,
        };
        self.attributes.insert(key.to_string(), value.into());
    }
}

impl Visit for RecordVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.body = Some(value.to_string());
        } else {
            self.attribute(field, value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        let rendered = format!("{:?}", value);
        if field.name() == "message" {
            self.body = Some(rendered);
        } else {
            self.attribute(field, rendered);
        }
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.attribute(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.attribute(field, value);
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.attribute(field, value);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.attribute(field, value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.attribute(field, value);
    }
}

#[derive(Serialize)]
struct Resource<'a> {
    #[serde(rename = "service.name")]
    service_name: &'a str,
    #[serde(rename = "service.version")]
    service_version: &'a str,
}

/// An OpenTelemetry-shaped log record, serialized as one JSON line.
#[derive(Serialize)]
struct LogRecord<'a> {
    timestamp: String,
    severity_text: &'static str,
    severity_number: u8,
    body: String,
    resource: Resource<'a>,
    attributes: Map<String, Value>,
}

/// OTel severity numbers for the lowest sub-level of each range.
fn severity_number(level: &Level) -> u8 {
    match *level {
        Level::TRACE => 1,
        Level::DEBUG => 5,
        Level::INFO => 9,
        Level::WARN => 13,
        Level::ERROR => 17,
    }
}

#[derive(Clone)]
struct JsonLineFormat {
    service_name: String,
    service_version: String,
}

impl JsonLineFormat {
    fn from_config(config: &LoggingConfig) -> Self {
        Self {
            service_name: config.service_name.clone(),
            service_version: config.service_version.clone(),
        }
    }

    fn to_record(&self, event: &Event<'_>) -> LogRecord<'_> {
        let metadata = event.metadata();
        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);
        visitor
            .attributes
            .insert("code.target".to_string(), metadata.target().into());

        LogRecord {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            severity_text: metadata.level().as_str(),
            severity_number: severity_number(metadata.level()),
            body: visitor.body.unwrap_or_else(|| metadata.name().to_string()),
            resource: Resource {
                service_name: &self.service_name,
                service_version: &self.service_version,
            },
            attributes: visitor.attributes,
        }
    }
}

impl<S, N> FormatEvent<S, N> for JsonLineFormat
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
    N: for<'writer> FormatFields<'writer> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let line = serde_json::to_string(&self.to_record(event)).map_err(|_| std::fmt::Error)?;
        writeln!(writer, "{}", line)
    }
}

/// Parse a `logging.level` string.
pub fn parse_level(level: &str) -> Option<LevelFilter> {
    match level.trim().to_lowercase().as_str() {
        "trace" => Some(LevelFilter::TRACE),
        "debug" => Some(LevelFilter::DEBUG),
        "info" => Some(LevelFilter::INFO),
        "warn" => Some(LevelFilter::WARN),
        "error" => Some(LevelFilter::ERROR),
        _ => None,
    }
}

/// Install the global subscriber. Log lines go to stderr so command output
/// on stdout stays machine-readable.
pub fn init_logging(logging_config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let level_filter = parse_level(&logging_config.level).ok_or_else(|| {
        format!(
            "Invalid logging.level '{}'. Valid values: trace, debug, info, warn, error",
            logging_config.level
        )
    })?;

    // RUST_LOG directives still apply on top of the configured level
    let filter_layer = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .from_env_lossy();

    match logging_config.format.to_lowercase().as_str() {
        "json" => tracing_subscriber::registry()
            .with(filter_layer)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .event_format(JsonLineFormat::from_config(logging_config)),
            )
            .try_init()?,
        // console, and the fallback for unknown formats
        _ => tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt::layer().with_writer(std::io::stderr).compact())
            .try_init()?,
    }
    Ok(())
}
