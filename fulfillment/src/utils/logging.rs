use std::collections::HashMap;

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_error::ErrorLayer;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::Context;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

/// Span field shown in its own column by the pretty formatter
const JOB_FIELD: &str = "job_id";

/// Fields recorded on a span, kept in the span extensions
#[derive(Debug, Clone, Default)]
pub struct SpanFields {
    pub values: HashMap<String, String>,
}

impl Visit for SpanFields {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.values.insert(field.name().to_string(), format!("{value:?}").trim_matches('"').to_string());
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.values.insert(field.name().to_string(), value.to_string());
    }
}

/// Collects span fields so the formatters can show them next to each event
pub struct FieldCollectorLayer;

impl<S> Layer<S> for FieldCollectorLayer
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
{
    fn on_new_span(&self, attrs: &tracing::span::Attributes<'_>, id: &tracing::span::Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else { return };
        let mut fields = SpanFields::default();
        attrs.record(&mut fields);
        span.extensions_mut().insert(fields);
    }

    fn on_record(&self, id: &tracing::span::Id, values: &tracing::span::Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else { return };
        let mut extensions = span.extensions_mut();
        let mut fields = extensions.remove::<SpanFields>().unwrap_or_default();
        values.record(&mut fields);
        extensions.insert(fields);
    }
}

/// Walks from the current span up to the root and returns the first `job_id` found
fn current_job<S, N>(ctx: &FmtContext<'_, S, N>) -> Option<String>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    let span = ctx.lookup_current()?;
    span.scope().find_map(|span| span.extensions().get::<SpanFields>().and_then(|f| f.values.get(JOB_FIELD).cloned()))
}

/// ANSI colors used by [`PrettyFormatter`]
struct Palette;

impl Palette {
    const TIMESTAMP: &'static str = "\x1b[96m";
    const MESSAGE: &'static str = "\x1b[97m";
    const COLUMN: &'static str = "\x1b[92m";
    const DIM: &'static str = "\x1b[90m";
    const RESET: &'static str = "\x1b[0m";

    fn level(level: &Level) -> &'static str {
        match *level {
            Level::TRACE => "\x1b[90m",
            Level::DEBUG => "\x1b[34m",
            Level::INFO => "\x1b[32m",
            Level::WARN => "\x1b[33m",
            Level::ERROR => "\x1b[31m",
        }
    }
}

/// Console formatter: `time | level | job | area | message (fields)`
pub struct PrettyFormatter;

impl PrettyFormatter {
    fn column(writer: &mut Writer<'_>, color: &str, value: impl std::fmt::Display, width: usize) -> std::fmt::Result {
        write!(writer, "{color}{value:<width$}{} {}|{} ", Palette::RESET, Palette::DIM, Palette::RESET)
    }
}

impl<S, N> FormatEvent<S, N> for PrettyFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> std::fmt::Result {
        let meta = event.metadata();
        let job = current_job(ctx).unwrap_or_else(|| "-".to_string());
        let mut visitor = PrettyFieldVisitor::default();
        event.record(&mut visitor);

        let now = Utc::now().format("%y-%m-%d %H:%M:%S");
        Self::column(&mut writer, Palette::TIMESTAMP, now, 0)?;
        Self::column(&mut writer, Palette::level(meta.level()), meta.level(), 5)?;
        Self::column(&mut writer, Palette::COLUMN, job, 16)?;
        Self::column(&mut writer, Palette::COLUMN, area_name(meta.target()), 9)?;
        write!(writer, "{}{}{}", Palette::MESSAGE, visitor.message, Palette::RESET)?;
        if !visitor.fields.is_empty() {
            write!(writer, " ({}{}{})", Palette::DIM, visitor.fields.join(", "), Palette::RESET)?;
        }
        writeln!(writer)
    }
}

#[derive(Default)]
struct PrettyFieldVisitor {
    message: String,
    fields: Vec<String>,
}

impl Visit for PrettyFieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let value = format!("{value:?}").trim_matches('"').to_string();
        match field.name() {
            "message" => self.message = value,
            // already shown in the job column
            JOB_FIELD => {}
            name => self.fields.push(format!("{name}={value}")),
        }
    }
}

/// Span fields lifted out of `fields` to the top level of each JSON line
const TOP_LEVEL_FIELDS: [&str; 2] = [JOB_FIELD, "contractor_id"];

/// One JSON object per line, for log shippers
pub struct JsonEventFormatter;

#[derive(Default)]
struct JsonFieldVisitor {
    message: Option<String>,
    fields: Map<String, Value>,
}

impl JsonFieldVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        match (field.name(), value) {
            ("message", Value::String(message)) => self.message = Some(message),
            (name, value) => {
                self.fields.insert(name.to_string(), value);
            }
        }
    }
}

impl Visit for JsonFieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.insert(field, Value::String(format!("{value:?}").trim_matches('"').to_string()));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        // NaN and infinities have no JSON representation
        self.insert(field, serde_json::Number::from_f64(value).map_or(Value::Null, Value::Number));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, value.into());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, value.into());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, value.into());
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, value.into());
    }
}

impl<S, N> FormatEvent<S, N> for JsonEventFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> std::fmt::Result {
        let meta = event.metadata();
        let mut visitor = JsonFieldVisitor::default();
        event.record(&mut visitor);

        let mut line = Map::new();
        line.insert("ts".into(), Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true).into());
        line.insert("level".into(), meta.level().as_str().into());
        line.insert("target".into(), meta.target().into());
        line.insert("area".into(), area_name(meta.target()).into());
        if let (Some(file), Some(number)) = (meta.file(), meta.line()) {
            line.insert("source".into(), format!("{file}:{number}").into());
        }
        if let Some(message) = visitor.message.take() {
            line.insert("message".into(), message.into());
        }

        let mut fields = visitor.fields;
        if let Some(span) = ctx.lookup_current() {
            fields.insert("span".into(), span.metadata().name().into());
            // walk from the root so inner spans overwrite outer ones
            for span in span.scope().from_root() {
                let extensions = span.extensions();
                let Some(span_fields) = extensions.get::<SpanFields>() else { continue };
                for (key, value) in &span_fields.values {
                    fields.insert(key.clone(), value.as_str().into());
                }
            }
        }
        for key in TOP_LEVEL_FIELDS {
            if let Some(value) = fields.remove(key) {
                line.insert(key.into(), value);
            }
        }
        if !fields.is_empty() {
            line.insert("fields".into(), Value::Object(fields));
        }

        let line = serde_json::to_string(&line).map_err(|_| std::fmt::Error)?;
        writeln!(writer, "{line}")
    }
}

/// Installs `color_eyre` and the global subscriber.
///
/// `LOG_FORMAT=json` switches the console lines to [`JsonEventFormatter`]; `RUST_LOG` overrides the
/// default `pickup_fulfillment=info` filter.
pub fn init_logging() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::builder().with_default_directive(Level::INFO.into()).parse("pickup_fulfillment=info")?,
    };

    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json");
    let fmt_layer = fmt::layer().with_target(true).with_file(true).with_line_number(true);
    let fmt_layer = if json {
        fmt_layer.event_format(JsonEventFormatter).boxed()
    } else {
        fmt_layer.event_format(PrettyFormatter).boxed()
    };

    let subscriber = Registry::default()
        .with(env_filter)
        .with(FieldCollectorLayer)
        .with(fmt_layer)
        .with(ErrorLayer::default());
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Short name of the engine area an event target belongs to
fn area_name(target: &str) -> &'static str {
    const AREAS: [(&str, &str); 6] = [
        ("fulfillment_google_places_service", "places"),
        ("fulfillment_places_client_interface", "places"),
        ("pickup_fulfillment::tracking", "tracking"),
        ("pickup_fulfillment::workflow", "workflow"),
        ("pickup_fulfillment::sites", "sites"),
        ("pickup_fulfillment::geo", "geofence"),
    ];
    match AREAS.iter().find(|(prefix, _)| target.starts_with(prefix)) {
        Some((_, area)) => *area,
        None if target.starts_with("pickup_fulfillment") => "engine",
        None => "external",
    }
}
