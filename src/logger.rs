//! Logging utilities with colored output and progress bars.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `ProgressBars` for long copy loops (the examples mirror)
//!
//! # Example
//!
//! ```ignore
//! log!("spec"; "{}", file_name);
//! log!("warn"; "CHANGELOG.md not found, skipping");
//!
//! if let Some(progress) = ProgressBars::new_filtered(&[("examples", files.len())]) {
//!     progress.inc_by_name("examples");
//! }
//! ```

use colored::{ColoredString, Colorize};
use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType, size},
};
use std::{
    io::{Write, stdout},
    sync::{
        Mutex, OnceLock,
        atomic::{AtomicUsize, Ordering},
    },
};

/// Cached terminal width (fetched once on first use)
static TERMINAL_WIDTH: OnceLock<u16> = OnceLock::new();

/// Active progress bar count (for log coordination)
static BAR_COUNT: AtomicUsize = AtomicUsize::new(0);

// ============================================================================
// Layout Constants
// ============================================================================
//
// Progress bar format: "[examples] [████░░░░] 42/100"
//                       ^--------^ ^-------^ ^----^
//                       prefix     bar       count

/// Brackets plus trailing space around a module name: "[" "]" " "
const PREFIX_OVERHEAD: usize = 3;
/// Bar wrapper plus space before the count: " [" "]" " "
const BAR_OVERHEAD: usize = 4;
const MIN_BAR_WIDTH: usize = 10;
const MAX_BAR_WIDTH: usize = 40;

#[inline]
const fn calc_prefix_len(module_len: usize) -> usize {
    module_len + PREFIX_OVERHEAD
}

/// Get terminal width, cached after first call.
/// Falls back to 120 columns if detection fails.
fn get_terminal_width() -> u16 {
    *TERMINAL_WIDTH.get_or_init(|| size().map(|(w, _)| w).unwrap_or(120))
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix.
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

// ============================================================================
// Progress Bars
// ============================================================================

/// Progress bars drawn below the log output, one terminal line each.
///
/// Bars are redrawn in place with ANSI cursor movement; `log` keeps them pinned
/// to the bottom while messages scroll above.
pub struct ProgressBars {
    bars: Vec<ProgressBar>,
    lock: Mutex<()>,
}

struct ProgressBar {
    name: &'static str,
    prefix: ColoredString,
    prefix_len: usize,
    total: usize,
    current: AtomicUsize,
    /// Row index within the progress area (0 = first bar)
    row: usize,
}

impl ProgressBars {
    /// Create progress bars for `(module_name, total_count)` pairs.
    pub fn new(modules: &[(&'static str, usize)]) -> Self {
        // Reserve terminal lines for progress bars
        let mut stdout = stdout().lock();
        for _ in 0..modules.len() {
            writeln!(stdout).ok();
        }
        stdout.flush().ok();

        BAR_COUNT.store(modules.len(), Ordering::SeqCst);

        let bars = modules
            .iter()
            .enumerate()
            .map(|(row, &(name, total))| ProgressBar {
                name,
                prefix: colorize_prefix(name, &name.to_ascii_lowercase()),
                prefix_len: calc_prefix_len(name.len()),
                total,
                current: AtomicUsize::new(0),
                row,
            })
            .collect();

        Self {
            bars,
            lock: Mutex::new(()),
        }
    }

    /// Create progress bars, filtering out modules with zero count.
    ///
    /// Returns `None` if the total count is <= 1 (a bar for one file is noise).
    pub fn new_filtered(modules: &[(&'static str, usize)]) -> Option<Self> {
        let filtered: Vec<_> = modules
            .iter()
            .filter(|(_, count)| *count > 0)
            .copied()
            .collect();
        let total: usize = filtered.iter().map(|(_, c)| c).sum();

        if total <= 1 {
            return None;
        }

        Some(Self::new(&filtered))
    }

    /// Increment progress for the bar with the given name.
    pub fn inc_by_name(&self, name: &str) {
        if let Some(bar) = self.bars.iter().find(|bar| bar.name == name) {
            let current = bar.current.fetch_add(1, Ordering::Relaxed) + 1;
            self.display(bar, current);
        }
    }

    /// Render a progress bar at its designated row.
    fn display(&self, bar: &ProgressBar, current: usize) {
        let _guard = self.lock.lock().ok();

        let progress_text = format!("{}/{}", current, bar.total);
        let bar_width = bar_width(
            get_terminal_width() as usize,
            bar.prefix_len,
            progress_text.len(),
        );
        let (filled, empty) = split_bar(current, bar.total, bar_width);
        let progress_bar: String = "█".repeat(filled) + &"░".repeat(empty);

        let mut stdout = stdout().lock();
        #[allow(clippy::cast_possible_truncation)] // Safe: bars count is always small
        let lines_up = (self.bars.len() - bar.row) as u16;
        execute!(stdout, cursor::MoveUp(lines_up)).ok();
        execute!(stdout, Clear(ClearType::CurrentLine)).ok();
        write!(stdout, "{} [{}] {}", bar.prefix, progress_bar, progress_text).ok();
        execute!(stdout, cursor::MoveDown(lines_up)).ok();
        write!(stdout, "\r").ok();
        stdout.flush().ok();
    }

    /// Clear all progress bars from the terminal.
    #[allow(clippy::cast_possible_truncation)] // Safe: bars count is always small
    pub fn finish(&self) {
        if BAR_COUNT.swap(0, Ordering::SeqCst) == 0 {
            return;
        }
        let _guard = self.lock.lock().ok();

        let mut stdout = stdout().lock();
        let bars_len = self.bars.len() as u16;

        execute!(stdout, cursor::MoveUp(bars_len)).ok();
        for _ in &self.bars {
            execute!(stdout, Clear(ClearType::CurrentLine)).ok();
            execute!(stdout, cursor::MoveDown(1)).ok();
        }
        execute!(stdout, cursor::MoveUp(bars_len)).ok();
        stdout.flush().ok();
    }
}

impl Drop for ProgressBars {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Width of the bar itself, clamped to `MIN_BAR_WIDTH..=MAX_BAR_WIDTH`.
fn bar_width(terminal_width: usize, prefix_len: usize, count_len: usize) -> usize {
    let available = terminal_width.saturating_sub(prefix_len + BAR_OVERHEAD + count_len);
    available.clamp(MIN_BAR_WIDTH, MAX_BAR_WIDTH)
}

/// Split a bar into (filled, empty) cells.
fn split_bar(current: usize, total: usize, width: usize) -> (usize, usize) {
    let filled = if total > 0 {
        (current.min(total) * width) / total
    } else {
        0
    };
    (filled, width - filled)
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix.
///
/// Automatically truncates long single-line messages to fit terminal width.
#[inline]
#[allow(clippy::cast_possible_truncation)] // Safe: bars count is always small
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module, &module.to_ascii_lowercase());
    let width = get_terminal_width() as usize;

    let mut stdout = stdout().lock();

    let bar_count = BAR_COUNT.load(Ordering::SeqCst);
    if bar_count > 0 {
        execute!(stdout, cursor::MoveUp(bar_count as u16)).ok();
        execute!(stdout, Clear(ClearType::FromCursorDown)).ok();
    }

    if message.contains('\n') {
        // Multiline output (e.g. an error chain) is never truncated
        writeln!(stdout, "{prefix} {message}").ok();
    } else {
        let max_msg_len = width.saturating_sub(calc_prefix_len(module.len()));
        writeln!(stdout, "{prefix} {}", truncate_str(message, max_msg_len)).ok();
    }

    for _ in 0..bar_count {
        writeln!(stdout).ok();
    }

    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type.
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> ColoredString {
    let prefix = format!("[{module}]");
    match module_lower {
        "source" | "git" => prefix.bright_blue().bold(),
        "done" => prefix.bright_green().bold(),
        "warn" => prefix.bright_magenta().bold(),
        "error" => prefix.bright_red().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}

/// Truncate a string to fit within `max_len` bytes on a UTF-8 boundary.
#[inline]
fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

// ============================================================================
// Tests
// ============================================================================
