//! External command execution utilities.
//!
//! Runs `git` (and anything else on `PATH`) with captured output, logging
//! stderr through `log!` after stripping known progress noise.

use crate::log;
use anyhow::{Context, Result};
use regex::Regex;
use std::{
    ffi::OsString,
    path::Path,
    process::{Command, Output},
    sync::OnceLock,
};

// ============================================================================
// Macros
// ============================================================================

/// Run an external command with arguments.
///
/// # Examples
/// ```ignore
/// // Without working directory
/// exec!(["git"]; "--version")?;
///
/// // With working directory
/// exec!(checkout; ["git"]; "pull", "--ff-only")?;
///
/// // With custom filter
/// exec!(filter=&GIT_FILTER; ["git"]; "clone", url, dest)?;
/// ```
#[macro_export]
macro_rules! exec {
    (filter=$filter:expr; $($rest:tt)*) => {
        $crate::exec_internal!($filter; $($rest)*)
    };
    ($($rest:tt)*) => {
        $crate::exec_internal!(&$crate::utils::exec::EMPTY_FILTER; $($rest)*)
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! exec_internal {
    // With working directory
    ($filter:expr; $root:expr; $cmd:expr; $($arg:expr),* $(,)?) => {
        $crate::utils::exec::exec(
            Some($root),
            &$crate::utils::exec::internal::to_cmd_vec($cmd),
            &$crate::utils::exec::internal::filter_args(&[$($crate::utils::exec::internal::to_os($arg)),*]),
            $filter,
        )
    };
    // Without working directory
    ($filter:expr; $cmd:expr; $($arg:expr),* $(,)?) => {
        $crate::utils::exec::exec(
            None,
            &$crate::utils::exec::internal::to_cmd_vec($cmd),
            &$crate::utils::exec::internal::filter_args(&[$($crate::utils::exec::internal::to_os($arg)),*]),
            $filter,
        )
    };
}

// ============================================================================
// Argument Conversion
// ============================================================================

#[doc(hidden)]
pub mod internal {
    use std::ffi::OsString;

    /// Convert to `OsString`.
    #[inline]
    pub fn to_os<S: Into<OsString>>(s: S) -> OsString {
        s.into()
    }

    /// Trait for converting to command vector.
    pub trait ToCmd {
        fn to_cmd(self) -> Vec<OsString>;
    }

    impl<const N: usize> ToCmd for [&str; N] {
        #[inline]
        fn to_cmd(self) -> Vec<OsString> {
            self.into_iter().map(OsString::from).collect()
        }
    }

    /// Convert command to Vec<OsString>.
    #[inline]
    pub fn to_cmd_vec<C: ToCmd>(cmd: C) -> Vec<OsString> {
        cmd.to_cmd()
    }

    /// Filter out empty args.
    #[inline]
    pub fn filter_args(args: &[OsString]) -> Vec<OsString> {
        args.iter().filter(|a| !a.is_empty()).cloned().collect()
    }
}

// ============================================================================
// Command Execution
// ============================================================================

/// Execute a command and capture its output.
///
/// # Errors
/// Returns error if command fails to execute or returns non-zero exit code.
pub fn exec(
    root: Option<&Path>,
    cmd: &[OsString],
    args: &[OsString],
    filter: &'static FilterRule,
) -> Result<Output> {
    let (name, mut command) = prepare(root, cmd, args)?;

    let output = command
        .output()
        .with_context(|| format!("Failed to execute `{name}`"))?;

    log_output(&name, &output, filter)?;
    Ok(output)
}

/// Prepare a Command from components.
fn prepare(root: Option<&Path>, cmd: &[OsString], args: &[OsString]) -> Result<(String, Command)> {
    let name = cmd
        .first()
        .and_then(|s| s.to_str())
        .context("Empty command")?
        .to_owned();

    let mut command = Command::new(&cmd[0]);
    command.args(&cmd[1..]).args(args);

    if let Some(dir) = root {
        command.current_dir(dir);
    }

    Ok((name, command))
}

// ============================================================================
// Output Filtering
// ============================================================================

fn strip_ansi(s: &str) -> std::borrow::Cow<'_, str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*m").expect("valid ansi regex"));
    re.replace_all(s, "")
}

/// Lines starting with any of `skip_prefixes` are dropped from logged output.
pub struct FilterRule {
    pub skip_prefixes: &'static [&'static str],
}

impl FilterRule {
    pub const fn new(skip_prefixes: &'static [&'static str]) -> Self {
        Self { skip_prefixes }
    }

    fn should_skip(&self, line: &str) -> bool {
        line.is_empty() || self.skip_prefixes.iter().any(|p| line.starts_with(p))
    }

    /// Log the lines of `output` that survive the filter as one message.
    fn log(&self, name: &str, output: &str) {
        let kept: Vec<&str> = output
            .lines()
            .filter(|line| !self.should_skip(strip_ansi(line).trim()))
            .collect();

        if !kept.is_empty() {
            log!(name; "{}", kept.join("\n"));
        }
    }
}

/// Empty filter (no skipping).
#[cfg(test)]
pub const EMPTY_FILTER: FilterRule = FilterRule::new(&[]);

/// Git reports progress on stderr even when nothing went wrong.
pub const GIT_FILTER: FilterRule = FilterRule::new(&[
    "Cloning into",
    "remote:",
    "Receiving objects",
    "Resolving deltas",
    "Updating files",
    "From ",
    " * branch",
    "Already up to date",
]);

/// Log command output, failing on non-zero exit.
fn log_output(name: &str, output: &Output, filter: &'static FilterRule) -> Result<()> {
    if !output.status.success() {
        anyhow::bail!(format_error(name, output, filter));
    }

    // On success, only stderr carries anything worth showing
    let stderr = String::from_utf8_lossy(&output.stderr);
    filter.log(name, stderr.trim());

    Ok(())
}

/// Format command error message, keeping only the lines the filter lets through.
fn format_error(name: &str, output: &Output, filter: &'static FilterRule) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);

    let detail: Vec<&str> = stderr
        .lines()
        .filter(|line| !filter.should_skip(strip_ansi(line).trim()))
        .collect();

    let mut msg = format!("Command `{name}` failed with {}", output.status);
    if !detail.is_empty() {
        msg.push('\n');
        msg.push_str(&detail.join("\n"));
    }

    let stdout = stdout.trim();
    if !stdout.is_empty() {
        msg.push_str("\nStdout:\n");
        msg.push_str(stdout);
    }
    msg
}

// ============================================================================
// Tests
// ============================================================================
