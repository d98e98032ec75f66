//! Tracing setup for the split config tools.
//!
//! Everything is driven by environment variables so that hosts embedding the
//! library and the `splits-config` binary share one switchboard:
//!
//! - `LOG_LEVEL`: default filter when `RUST_LOG` is unset (default `warn`)
//! - `LOG_FORMAT`: `human` or `json`
//! - `LOG_OUTPUT`: `console`, `file`, `both` or `none`
//! - `LOG_FILE_PATH`: file target for `file`/`both`
//! - `LOG_TAGS`: comma separated `key:value` span field filters (`*` matches any value)

use std::{
    collections::HashMap,
    env,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tracing::{field::Visit, span, Metadata, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::MakeWriter,
    layer::{Context, Layer},
    prelude::*,
    registry, EnvFilter,
};

const DEFAULT_LOG_FILE: &str = "/tmp/splits-config.log";

// --- Tee writer for console + file ---
struct Tee<A, B> {
    a: A,
    b: B,
}

impl<A, B> Write for Tee<A, B>
where
    A: Write,
    B: Write,
{
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let res_a = self.a.write(buf);
        let res_b = self.b.write(buf);
        res_a.or(res_b)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.a.flush()?;
        self.b.flush()
    }
}

#[derive(Clone)]
struct MakeTee<A, B> {
    make_a: A,
    make_b: B,
}

impl<'a, A, B, W1, W2> MakeWriter<'a> for MakeTee<A, B>
where
    A: MakeWriter<'a, Writer = W1>,
    B: MakeWriter<'a, Writer = W2>,
    W1: Write + 'a,
    W2: Write + 'a,
{
    type Writer = Tee<W1, W2>;
    fn make_writer(&'a self) -> Self::Writer {
        Tee {
            a: self.make_a.make_writer(),
            b: self.make_b.make_writer(),
        }
    }
}

/// Where log lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Console,
    File,
    Both,
    None,
}

impl LogOutput {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "file" => LogOutput::File,
            "both" => LogOutput::Both,
            "none" | "off" => LogOutput::None,
            _ => LogOutput::Console,
        }
    }
}

/// A `key:value` span field filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

/// Logging settings resolved from the environment.
#[derive(Debug, Clone)]
pub struct LogSettings {
    pub level: String,
    pub json: bool,
    pub output: LogOutput,
    pub file_path: PathBuf,
    pub tags: Vec<Tag>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
            output: LogOutput::Console,
            file_path: PathBuf::from(DEFAULT_LOG_FILE),
            tags: Vec::new(),
        }
    }
}

impl LogSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve settings through an arbitrary lookup; `from_env` passes `env::var`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            level: lookup("LOG_LEVEL").unwrap_or(defaults.level),
            json: lookup("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json")),
            output: lookup("LOG_OUTPUT")
                .map(|o| LogOutput::parse(&o))
                .unwrap_or(defaults.output),
            file_path: lookup("LOG_FILE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.file_path),
            tags: lookup("LOG_TAGS")
                .map(|t| parse_tags(&t))
                .unwrap_or_default(),
        }
    }
}

fn parse_tags(raw: &str) -> Vec<Tag> {
    raw.split(',')
        .filter_map(|s| {
            let mut parts = s.splitn(2, ':');
            let key = parts.next()?.trim().to_string();
            let value = parts.next()?.trim().to_string();
            if key.is_empty() {
                return None;
            }
            Some(Tag { key, value })
        })
        .collect()
}

// --- Tag-based filtering ---
struct TagFilterLayer {
    filters: Vec<Tag>,
}

impl<S> Layer<S> for TagFilterLayer
where
    S: Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
{
    fn on_new_span(&self, attrs: &span::Attributes<'_>, id: &span::Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut fields = HashMap::new();
        let mut visitor = FieldVisitor(&mut fields);
        attrs.record(&mut visitor);
        span.extensions_mut().insert(fields);
    }

    fn enabled(&self, _meta: &Metadata<'_>, ctx: Context<'_, S>) -> bool {
        if self.filters.is_empty() {
            return true;
        }

        // With tags set, events outside any span are filtered out.
        let Some(scope) = ctx.current_span().id().and_then(|id| ctx.span_scope(id)) else {
            return false;
        };

        let mut all_fields = HashMap::new();
        for span_ref in scope {
            if let Some(fields) = span_ref.extensions().get::<HashMap<String, String>>() {
                for (k, v) in fields {
                    all_fields.entry(k.clone()).or_insert_with(|| v.clone());
                }
            }
        }

        tags_match(&self.filters, &all_fields)
    }
}

fn tags_match(filters: &[Tag], fields: &HashMap<String, String>) -> bool {
    filters.iter().all(|filter| {
        fields
            .get(&filter.key)
            .is_some_and(|value| filter.value == "*" || value.contains(&filter.value))
    })
}

struct FieldVisitor<'a>(&'a mut HashMap<String, String>);

impl Visit for FieldVisitor<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0
            .insert(field.name().to_string(), format!("{value:?}"));
    }
}

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Initializes the global tracing subscriber from environment variables.
///
/// Console output goes to stderr so command output on stdout stays parseable.
/// The returned guard must be held for as long as file logging should flush.
pub fn init_subscriber() -> Option<WorkerGuard> {
    init_with(LogSettings::from_env())
}

pub fn init_with(settings: LogSettings) -> Option<WorkerGuard> {
    let env_filter = build_filter(&settings.level);
    let tag_filter_layer = TagFilterLayer {
        filters: settings.tags,
    };
    let subscriber = registry().with(env_filter).with(tag_filter_layer);

    let log_dir = settings
        .file_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("/tmp"))
        .to_path_buf();
    let log_filename = settings
        .file_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "splits-config.log".into());

    let mut guard: Option<WorkerGuard> = None;

    // try_init: a host may already own the global subscriber.
    let _ = match settings.output {
        LogOutput::Both => {
            let file_appender = tracing_appender::rolling::daily(&log_dir, &log_filename);
            let (non_blocking, worker) = tracing_appender::non_blocking(file_appender);
            guard = Some(worker);

            let tee_writer = MakeTee {
                make_a: std::io::stderr,
                make_b: non_blocking,
            };
            let fmt_layer = tracing_subscriber::fmt::layer().with_writer(tee_writer);
            if settings.json {
                subscriber.with(fmt_layer.json()).try_init()
            } else {
                subscriber.with(fmt_layer.compact()).try_init()
            }
        }
        LogOutput::Console => {
            let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
            if settings.json {
                subscriber.with(fmt_layer.json()).try_init()
            } else {
                subscriber.with(fmt_layer.compact()).try_init()
            }
        }
        LogOutput::File => {
            let file_appender = tracing_appender::rolling::daily(&log_dir, &log_filename);
            let (non_blocking, worker) = tracing_appender::non_blocking(file_appender);
            guard = Some(worker);

            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false);
            if settings.json {
                subscriber.with(fmt_layer.json()).try_init()
            } else {
                subscriber.with(fmt_layer.compact()).try_init()
            }
        }
        LogOutput::None => subscriber.try_init(),
    };

    guard
}
