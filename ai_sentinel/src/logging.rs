use std::fmt;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Single-line event format: `LEVEL module::function [span::stack]: message key=value`.
///
/// The function segment comes from the `function` field that the `log_*`
/// macros attach; plain `tracing` events fall back to the module path only.
#[derive(Debug, Default, Clone, Copy)]
pub struct SentinelFormatter;

#[derive(Default)]
struct FieldCollector {
    message: Option<String>,
    function: Option<String>,
    fields: Vec<(&'static str, String)>,
}

impl FieldCollector {
    fn store(&mut self, field: &Field, value: String) {
        match field.name() {
            "message" => self.message = Some(value),
            "function" => self.function = Some(value),
            name => self.fields.push((name, value)),
        }
    }
}

impl Visit for FieldCollector {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let rendered = format!("{value:?}");
        let unquoted = rendered
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .map(str::to_string)
            .unwrap_or(rendered);
        self.store(field, unquoted);
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.store(field, value.to_string());
    }
}

impl<S, N> FormatEvent<S, N> for SentinelFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'writer> FormatFields<'writer> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        let mut collector = FieldCollector::default();
        event.record(&mut collector);

        write!(writer, "{} ", metadata.level())?;
        match collector.function {
            // The function path already starts with the module path.
            Some(function) => write!(writer, "{function}")?,
            None => write!(
                writer,
                "{}",
                metadata.module_path().unwrap_or_else(|| metadata.target())
            )?,
        }

        if let Some(scope) = ctx.event_scope() {
            let names: Vec<&str> = scope.from_root().map(|span| span.name()).collect();
            if !names.is_empty() {
                write!(writer, " [{}]", names.join("::"))?;
            }
        }

        write!(writer, ":")?;
        if let Some(message) = collector.message {
            write!(writer, " {message}")?;
        }
        for (name, value) in collector.fields {
            write!(writer, " {name}={value}")?;
        }
        writeln!(writer)
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `default_directive`.
pub fn init_logging(default_directive: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .event_format(SentinelFormatter)
        .try_init()
        .map_err(|err| anyhow::anyhow!("Failed to install log subscriber: {err}"))
}

#[macro_export]
#[doc(hidden)]
macro_rules! __log_function_path {
    () => {{
        fn __type_name_of<T>(_value: T) -> &'static str {
            std::any::type_name::<T>()
        }
        let name = __type_name_of(|| {});
        match name.find("::{{closure") {
            Some(index) => &name[..index],
            None => name,
        }
    }};
}

#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {{
        tracing::trace!(function = %$crate::__log_function_path!(), $($arg)*);
    }};
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        tracing::debug!(function = %$crate::__log_function_path!(), $($arg)*);
    }};
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        tracing::info!(function = %$crate::__log_function_path!(), $($arg)*);
    }};
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        tracing::warn!(function = %$crate::__log_function_path!(), $($arg)*);
    }};
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        tracing::error!(function = %$crate::__log_function_path!(), $($arg)*);
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Capture {
        type Writer = Capture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture<F: FnOnce()>(emit: F) -> String {
        let sink = Capture::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(sink.clone())
            .event_format(SentinelFormatter)
            .finish();
        tracing::subscriber::with_default(subscriber, emit);
        let bytes = sink.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn macro_events_carry_function_path() {
        let output = capture(|| crate::log_warn!(view = "abc", "analysis discarded"));
        assert!(output.starts_with("WARN "), "output was: {output:?}");
        assert!(
            output.contains("ai_sentinel::logging::tests::macro_events_carry_function_path"),
            "missing function path: {output:?}"
        );
        assert!(output.contains(": analysis discarded"), "missing message: {output:?}");
        assert!(output.contains("view=abc"), "missing field: {output:?}");
    }

    #[test]
    fn plain_events_fall_back_to_module_and_show_spans() {
        let output = capture(|| {
            let span = tracing::info_span!("submit");
            let _entered = span.enter();
            tracing::info!("request started");
        });
        assert!(output.contains("INFO ai_sentinel::logging::tests"), "output was: {output:?}");
        assert!(output.contains("[submit]"), "missing span: {output:?}");
        assert!(output.contains("request started"));
    }
}
