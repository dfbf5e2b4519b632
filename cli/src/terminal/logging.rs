use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use colored::*;
use indicatif::ProgressBar;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::FormatEvent;
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

const PRINT_TARGET: &str = "glizzy::print";
const SUCCESS_TARGET: &str = "glizzy::success";

pub struct GlizzyFormatter;

impl<S, N> FormatEvent<S, N> for GlizzyFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();

        if meta.target() != PRINT_TARGET {
            let (symbol, color_func): (&str, fn(ColoredString) -> ColoredString) =
                match (*meta.level(), meta.target()) {
                    (Level::INFO, SUCCESS_TARGET) => ("[+]", |s| s.green().bold()),
                    (Level::TRACE, _) => ("[ ]", |s| s.dimmed()),
                    (Level::DEBUG, _) => ("[?]", |s| s.blue()),
                    (Level::INFO, _) => ("[*]", |s| s.cyan().bold()),
                    (Level::WARN, _) => ("[!]", |s| s.yellow().bold()),
                    _ => ("[-]", |s| s.red().bold()),
                };
            write!(writer, "{} ", color_func(symbol.into()))?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Installs the global subscriber.
///
/// Terminal output goes through `status_bar` when one is given, so log lines
/// are printed above the live status line instead of through it. With
/// `log_file`, every line is mirrored there without colour codes.
pub fn init(log_file: Option<&Path>, status_bar: Option<ProgressBar>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let terminal_layer = tracing_subscriber::fmt::layer()
        .event_format(GlizzyFormatter)
        .with_writer(move || TerminalWriter {
            status_bar: status_bar.clone(),
        });

    let file_layer = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            let writer = PlainFileWriter {
                file: Arc::new(Mutex::new(file)),
            };
            Some(
                tracing_subscriber::fmt::layer()
                    .event_format(GlizzyFormatter)
                    .with_ansi(false)
                    .with_writer(move || writer.clone()),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(terminal_layer)
        .with(file_layer)
        .try_init()
        .context("installing log subscriber")?;

    Ok(())
}

/// Writes to stdout, around the status bar when there is one.
pub struct TerminalWriter {
    status_bar: Option<ProgressBar>,
}

impl Write for TerminalWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // Raw mode disables the implicit carriage return.
        let raw = crossterm::terminal::is_raw_mode_enabled().unwrap_or(false);
        let text = String::from_utf8_lossy(buf);
        let text = if raw {
            text.replace('\n', "\r\n")
        } else {
            text.into_owned()
        };

        let emit = || {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()
        };

        match &self.status_bar {
            Some(bar) => bar.suspend(emit)?,
            None => emit()?,
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}

/// Log file sink with ANSI escape sequences removed.
#[derive(Clone)]
pub struct PlainFileWriter {
    file: Arc<Mutex<File>>,
}

impl Write for PlainFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        let stripped = console::strip_ansi_codes(&text);
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        file.write_all(stripped.as_bytes())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?
            .flush()
    }
}
