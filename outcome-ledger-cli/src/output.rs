// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use clap::{
    Args, ValueEnum,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use owo_colors::{OwoColorize, Style, style};
use std::{
    env::VarError,
    fmt,
    io::{self, BufWriter, Write},
};
use tracing::{Event, Level, Subscriber, level_filters::LevelFilter};
use tracing_subscriber::{
    Layer,
    filter::Targets,
    fmt::{FmtContext, FormatEvent, FormatFields, format},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

/// Log target for messages printed without an `error:`/`warning:` heading.
pub(crate) static NO_HEADING_TARGET: &str = "outcome_ledger_cli::no_heading";

/// Environment variable holding a log filter, such as `outcome_ledger=debug`.
static LOG_ENV: &str = "OUTCOME_LEDGER_LOG";

/// Styles for `--help` and argument errors.
pub(crate) const fn help_styles() -> Styles {
    let heading = AnsiColor::Green.on_default().effects(Effects::BOLD);
    let literal = AnsiColor::Cyan.on_default().effects(Effects::BOLD);
    Styles::styled()
        .header(heading)
        .usage(heading)
        .literal(literal)
        .placeholder(AnsiColor::Cyan.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(literal)
        .invalid(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
}

#[derive(Copy, Clone, Debug, Args)]
#[must_use]
pub(crate) struct OutputOpts {
    /// Log which results were merged and how
    #[arg(long, short, global = true, env = "OUTCOME_LEDGER_VERBOSE")]
    pub(crate) verbose: bool,

    /// Produce color output: auto, always, never
    #[arg(
        long,
        value_enum,
        default_value_t,
        hide_possible_values = true,
        global = true,
        value_name = "WHEN",
        env = "OUTCOME_LEDGER_COLOR"
    )]
    pub(crate) color: Color,
}

impl OutputOpts {
    pub(crate) fn init(self) -> OutputContext {
        init_logger(
            self.verbose,
            self.color.should_colorize(supports_color::Stream::Stderr),
        );
        OutputContext { color: self.color }
    }
}

/// Output settings chosen on the command line.
#[derive(Copy, Clone, Debug)]
#[must_use]
pub struct OutputContext {
    pub(crate) color: Color,
}

impl OutputContext {
    /// Returns styles for the summary and error messages on stderr.
    pub fn stderr_styles(&self) -> StderrStyles {
        let mut styles = StderrStyles::default();
        if self.color.should_colorize(supports_color::Stream::Stderr) {
            styles.colorize();
        }
        styles
    }

    /// Returns styles for printing records to stdout.
    pub(crate) fn record_styles(&self) -> RecordStyles {
        let mut styles = RecordStyles::default();
        if self.color.should_colorize(supports_color::Stream::Stdout) {
            styles.colorize();
        }
        styles
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
#[must_use]
pub(crate) enum Color {
    #[default]
    Auto,
    Always,
    Never,
}

impl Color {
    pub(crate) fn should_colorize(self, stream: supports_color::Stream) -> bool {
        match self {
            Color::Auto => supports_color::on_cached(stream).is_some(),
            Color::Always => true,
            Color::Never => false,
        }
    }
}

static INIT_LOGGER: std::sync::Once = std::sync::Once::new();

/// Installs the process-wide stderr logger. Later calls do nothing.
fn init_logger(verbose: bool, colorize: bool) {
    INIT_LOGGER.call_once(|| {
        let layer = tracing_subscriber::fmt::layer()
            .event_format(LogFormatter { colorize })
            .with_writer(io::stderr)
            .with_filter(log_targets(verbose));
        tracing_subscriber::registry().with(layer).init();
    });
}

fn log_targets(verbose: bool) -> Targets {
    match std::env::var(LOG_ENV) {
        Ok(filter) if !filter.is_empty() => filter
            .parse()
            .unwrap_or_else(|error| panic!("invalid {LOG_ENV} `{filter}`: {error}")),
        Err(VarError::NotUnicode(_)) => panic!("{LOG_ENV} is not UTF-8"),
        _ if verbose => Targets::new().with_default(LevelFilter::DEBUG),
        _ => Targets::new().with_default(LevelFilter::INFO),
    }
}

/// Writes each event as `heading: message` on its own line.
struct LogFormatter {
    colorize: bool,
}

impl LogFormatter {
    fn heading(&self, level: Level) -> (&'static str, Style) {
        let (heading, colored) = match level {
            Level::ERROR => ("error", style().red().bold()),
            Level::WARN => ("warning", style().yellow().bold()),
            Level::INFO => ("info", style().bold()),
            _ => ("debug", style().bold()),
        };
        if self.colorize {
            (heading, colored)
        } else {
            (heading, Style::new())
        }
    }
}

impl<S, N> FormatEvent<S, N> for LogFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        if metadata.target() != NO_HEADING_TARGET {
            let (heading, style) = self.heading(*metadata.level());
            write!(writer, "{}: ", heading.style(style))?;
        }
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Styles for messages written to stderr.
#[derive(Debug, Default)]
pub struct StderrStyles {
    pub(crate) bold: Style,
    pub(crate) count: Style,
    pub(crate) failed: Style,
}

impl StderrStyles {
    fn colorize(&mut self) {
        self.bold = style().bold();
        self.count = style().bold();
        self.failed = style().red().bold();
    }
}

/// Styles for records printed to stdout.
#[derive(Debug, Default)]
pub(crate) struct RecordStyles {
    pub(crate) failed: Style,
    pub(crate) warning: Style,
    pub(crate) passed: Style,
    pub(crate) inconclusive: Style,
    pub(crate) skipped: Style,
    pub(crate) duration: Style,
    pub(crate) id: Style,
    pub(crate) stale: Style,
}

impl RecordStyles {
    fn colorize(&mut self) {
        self.failed = style().red().bold();
        self.warning = style().yellow().bold();
        self.passed = style().green().bold();
        self.inconclusive = style().cyan().bold();
        self.skipped = style().yellow();
        self.duration = style().dimmed();
        self.id = style().dimmed();
        self.stale = style().dimmed();
    }
}

/// Where records and the summary are written.
///
/// Tests capture both streams in memory.
#[derive(Default)]
pub enum OutputWriter {
    /// Write to the process's stdout and stderr.
    #[default]
    Normal,

    /// Capture output.
    #[cfg(test)]
    Test {
        /// Captured stdout.
        stdout: Vec<u8>,

        /// Captured stderr.
        stderr: Vec<u8>,
    },
}

impl OutputWriter {
    pub(crate) fn stdout_writer(&mut self) -> Box<dyn Write + '_> {
        match self {
            Self::Normal => Box::new(BufWriter::new(io::stdout())),
            #[cfg(test)]
            Self::Test { stdout, .. } => Box::new(stdout),
        }
    }

    pub(crate) fn stderr_writer(&mut self) -> Box<dyn Write + '_> {
        match self {
            Self::Normal => Box::new(BufWriter::new(io::stderr())),
            #[cfg(test)]
            Self::Test { stderr, .. } => Box::new(stderr),
        }
    }
}
