/// Output formatting: JSON, table, id modes. TTY detection.
use std::io::{IsTerminal, Write};

use comfy_table::{Table, presets::UTF8_BORDERS_ONLY};
use serde::Serialize;

use super::args::OutputFormat;
use crate::types::{AcquisitionOutput, PairOutput, PlotOutput};

/// Resolve the effective output format, handling `--json` flag and TTY auto-detection.
#[must_use]
pub fn resolve_format(fmt: OutputFormat, json_flag: bool) -> OutputFormat {
    if json_flag {
        return OutputFormat::Json;
    }
    if fmt == OutputFormat::Auto {
        if std::io::stdout().is_terminal() {
            OutputFormat::Table
        } else {
            OutputFormat::Json
        }
    } else {
        fmt
    }
}

/// Output context passed to all formatters.
pub struct OutputCtx {
    pub format: OutputFormat,
    pub no_header: bool,
    /// When true, print stage timings to stderr.
    pub debug: bool,
}

impl OutputCtx {
    /// Construct from CLI args.
    #[must_use]
    pub fn new(fmt: OutputFormat, json_flag: bool, no_header: bool, debug: bool) -> Self {
        Self {
            format: resolve_format(fmt, json_flag),
            no_header,
            debug,
        }
    }

    /// Start a named debug timer. Prints elapsed on drop only when `--debug` is set.
    #[must_use]
    pub fn timer(&self, label: &'static str) -> DebugTimer {
        DebugTimer::new(label, self.debug)
    }

    fn table(&self, header: &[&str]) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        if !self.no_header {
            table.set_header(header.to_vec());
        }
        table
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "" }
}

// --- Acquisitions ---

/// Write acquisitions to stdout.
pub fn write_acquisitions(rows: &[AcquisitionOutput], ctx: &OutputCtx) {
    match ctx.format {
        OutputFormat::Json => print_json(rows),
        OutputFormat::Compact => print_compact_json(rows),
        OutputFormat::Ndjson => print_ndjson(rows),
        OutputFormat::Id => {
            for r in rows {
                println!("{}", r.date);
            }
        }
        OutputFormat::Table | OutputFormat::Auto => {
            let mut table = ctx.table(&["DATE", "BPERP", "PAIRS", "DROPPED"]);
            for r in rows {
                table.add_row([
                    r.date.clone(),
                    format!("{:.2}", r.bperp),
                    r.pairs.to_string(),
                    yes_no(r.dropped).to_owned(),
                ]);
            }
            println!("{table}");
        }
    }
}

// --- Pairs ---

/// Write pairs to stdout.
pub fn write_pairs(rows: &[PairOutput], ctx: &OutputCtx) {
    match ctx.format {
        OutputFormat::Json => print_json(rows),
        OutputFormat::Compact => print_compact_json(rows),
        OutputFormat::Ndjson => print_ndjson(rows),
        OutputFormat::Id => {
            for r in rows {
                println!("{}", r.date12);
            }
        }
        OutputFormat::Table | OutputFormat::Auto => {
            let mut table = ctx.table(&["DATE12", "DAYS", "BPERP", "COHERENCE", "DROPPED"]);
            for r in rows {
                table.add_row([
                    r.date12.clone(),
                    r.temporal_baseline.to_string(),
                    format!("{:.2}", r.bperp),
                    r.coherence.map_or_else(String::new, |c| format!("{c:.4}")),
                    yes_no(r.dropped).to_owned(),
                ]);
            }
            println!("{table}");
        }
    }
}

// --- Plot summary ---

/// Write the plot summary to stdout.
pub fn write_plot(result: &PlotOutput, ctx: &OutputCtx) {
    match ctx.format {
        OutputFormat::Json | OutputFormat::Auto => print_json(result),
        OutputFormat::Compact => print_compact_json(result),
        OutputFormat::Ndjson => print_ndjson(&result.figures),
        OutputFormat::Id => {
            for f in &result.figures {
                println!("{}", f.path);
            }
            if let Some(list) = &result.date12_list {
                println!("{list}");
            }
        }
        OutputFormat::Table => {
            let mut table = ctx.table(&["FIGURE", "PATH"]);
            for f in &result.figures {
                table.add_row([f.figure.as_str(), f.path.as_str()]);
            }
            if let Some(list) = &result.date12_list {
                table.add_row(["date12 list", list.as_str()]);
            }
            println!("{table}");
        }
    }
}

// --- Error output ---

/// Write a structured error to stderr.
pub fn write_error(err: &crate::types::ErrorOutput, format: OutputFormat, json_flag: bool) {
    let fmt = resolve_format(format, json_flag);
    let stderr = std::io::stderr();
    let mut out = stderr.lock();
    match fmt {
        OutputFormat::Json | OutputFormat::Compact | OutputFormat::Ndjson => {
            let s = serde_json::to_string_pretty(err).unwrap_or_default();
            let _ = writeln!(out, "{s}");
        }
        _ => {
            let _ = writeln!(out, "Error: {}", err.error.message);
        }
    }
}

// --- Debug timer ---

/// A RAII timer that logs elapsed milliseconds on drop.
///
/// Created via [`OutputCtx::timer`]. Does nothing when `debug` is false.
pub struct DebugTimer {
    label: &'static str,
    start: std::time::Instant,
    active: bool,
}

impl DebugTimer {
    #[must_use]
    fn new(label: &'static str, active: bool) -> Self {
        Self {
            label,
            start: std::time::Instant::now(),
            active,
        }
    }
}

impl Drop for DebugTimer {
    fn drop(&mut self) {
        if self.active {
            let ms = self.start.elapsed().as_secs_f64() * 1000.0;
            log::debug!("{}: {ms:.2}ms", self.label);
        }
    }
}

// --- Generic JSON helpers ---

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("JSON serialization error: {e}"),
    }
}

fn print_compact_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("JSON serialization error: {e}"),
    }
}

fn print_ndjson<T: Serialize>(values: &[T]) {
    for v in values {
        match serde_json::to_string(v) {
            Ok(s) => println!("{s}"),
            Err(e) => eprintln!("JSON serialization error: {e}"),
        }
    }
}
