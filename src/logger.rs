//! Terminal output: prefixed log lines, the watch status line, and a progress
//! counter for long task steps.
//!
//! ```ignore
//! log!("styles"; "wrote {}", path.display());
//! debug!("glob"; "{} matched {} files", pattern, n);
//!
//! let progress = ProgressLine::new("images", files.len());
//! progress.inc();
//! progress.finish();
//! ```

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::{
    io::{IsTerminal, StdoutLock, Write, stdout},
    sync::LazyLock,
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set by `--verbose`; enables `debug!` output.
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// A progress line is on screen; log lines must be printed above it.
static PROGRESS_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Print `[module] message`.
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Like `log!`, but only with `--verbose`.
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

pub fn log(module: &str, message: &str) {
    let prefix = prefix(module);
    let mut out = stdout().lock();
    // The progress line repaints below on its next increment
    if out.is_terminal() && PROGRESS_ACTIVE.load(Ordering::SeqCst) {
        clear_line(&mut out);
    }
    writeln!(out, "{prefix} {message}").ok();
    out.flush().ok();
}

/// Colour a `[module]` prefix by the kind of work it reports.
fn prefix(module: &str) -> String {
    let text = format!("[{module}]");
    match module {
        "error" => text.bright_red().bold().to_string(),
        "warning" => text.bright_magenta().bold().to_string(),
        "serve" | "reload" | "actor" => text.bright_blue().bold().to_string(),
        "watch" | "runner" => text.bright_green().bold().to_string(),
        "styles" | "scripts" | "images" | "fonts" | "clean" => {
            text.bright_cyan().bold().to_string()
        }
        _ => text.bright_yellow().bold().to_string(),
    }
}

fn clear_line(out: &mut StdoutLock<'_>) {
    execute!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
}

// ============================================================================
// status line
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Success,
    Warning,
    Failure,
}

/// Outcome of the latest watch run. A success overwrites the previous status.
pub struct WatchStatus {
    /// Lines the previous status occupied
    last_lines: usize,
}

static WATCH_STATUS: LazyLock<Mutex<WatchStatus>> =
    LazyLock::new(|| Mutex::new(WatchStatus { last_lines: 0 }));

impl WatchStatus {
    fn show(&mut self, outcome: Outcome, message: &str) {
        let symbol = match outcome {
            Outcome::Success => "✓".green().to_string(),
            Outcome::Warning => "⚠".yellow().to_string(),
            Outcome::Failure => "✗".red().to_string(),
        };

        let mut out = stdout().lock();
        if outcome == Outcome::Success && self.last_lines > 0 && out.is_terminal() {
            let lines = u16::try_from(self.last_lines).unwrap_or(u16::MAX);
            execute!(out, cursor::MoveUp(lines), Clear(ClearType::FromCursorDown)).ok();
        }

        writeln!(out, "{} {symbol} {message}", format!("[{}]", clock()).dimmed()).ok();
        out.flush().ok();
        self.last_lines = line_count(message);
    }
}

/// Wall-clock `HH:MM:SS` (UTC).
fn clock() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("{:02}:{:02}:{:02}", (secs / 3600) % 24, (secs / 60) % 60, secs % 60)
}

fn line_count(message: &str) -> usize {
    message.lines().count().max(1)
}

pub fn status_success(message: &str) {
    WATCH_STATUS.lock().show(Outcome::Success, message);
}

/// Failure summary, with the error report on the following lines.
pub fn status_error(summary: &str, detail: &str) {
    let message = if detail.is_empty() {
        summary.to_string()
    } else {
        format!("{summary}\n{detail}")
    };
    WATCH_STATUS.lock().show(Outcome::Failure, &message);
}

pub fn status_warning(message: &str) {
    WATCH_STATUS.lock().show(Outcome::Warning, message);
}

// ============================================================================
// progress
// ============================================================================

/// In-place `[images] 12/40` counter, safe to bump from rayon workers.
///
/// Without a terminal only the final count is printed.
pub struct ProgressLine {
    module: &'static str,
    total: usize,
    done: AtomicUsize,
    drawing: Mutex<()>,
}

impl ProgressLine {
    pub fn new(module: &'static str, total: usize) -> Self {
        PROGRESS_ACTIVE.store(true, Ordering::SeqCst);
        let progress = Self {
            module,
            total,
            done: AtomicUsize::new(0),
            drawing: Mutex::new(()),
        };
        progress.draw(false);
        progress
    }

    /// Count one finished item. Skips the redraw if another worker is drawing.
    pub fn inc(&self) {
        self.done.fetch_add(1, Ordering::Relaxed);
        if let Some(_guard) = self.drawing.try_lock() {
            self.draw(false);
        }
    }

    fn render(&self) -> String {
        format!("{}/{}", self.done.load(Ordering::Relaxed), self.total)
    }

    fn draw(&self, last: bool) {
        let mut out = stdout().lock();
        let line = format!("{} {}", prefix(self.module), self.render());
        if !out.is_terminal() {
            if last {
                writeln!(out, "{line}").ok();
            }
            return;
        }
        clear_line(&mut out);
        if last {
            writeln!(out, "{line}").ok();
        } else {
            write!(out, "{line}").ok();
        }
        out.flush().ok();
    }

    /// Leave the final count on screen.
    pub fn finish(self) {
        PROGRESS_ACTIVE.store(false, Ordering::SeqCst);
        {
            let _guard = self.drawing.lock();
            self.draw(true);
        }
        std::mem::forget(self);
    }
}

impl Drop for ProgressLine {
    /// Dropped without `finish` (error or shutdown): erase the partial line.
    fn drop(&mut self) {
        PROGRESS_ACTIVE.store(false, Ordering::SeqCst);
        let mut out = stdout().lock();
        if out.is_terminal() {
            clear_line(&mut out);
            out.flush().ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_count() {
        assert_eq!(line_count(""), 1);
        assert_eq!(line_count("styles (assets/scss/app.scss, 2 files in 40ms)"), 1);
        assert_eq!(
            line_count("styles failed\nstylesheet compiler failed\n  --> app.scss:3"),
            3
        );
    }

    #[test]
    fn test_progress_counts() {
        let progress = ProgressLine::new("images", 3);
        progress.inc();
        progress.inc();
        assert_eq!(progress.render(), "2/3");
        progress.finish();
    }

    #[test]
    fn test_task_prefixes_share_colour() {
        assert_eq!(prefix("styles").replace("styles", "fonts"), prefix("fonts"));
        assert_ne!(prefix("error"), prefix("styles"));
    }
}
