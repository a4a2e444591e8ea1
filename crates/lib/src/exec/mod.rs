//! External process execution.
//!
//! Every tool crossforge drives (package managers, tar, git, configure, make)
//! is described as a [`CommandSpec`] and run through a [`CommandRunner`],
//! which returns the exit code and captured output.

mod host;

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use host::HostRunner;

/// A complete child environment. Values are kept as `OsString` so variables
/// that aren't valid UTF-8 still reach the child unchanged.
pub type EnvMap = BTreeMap<OsString, OsString>;

/// Errors raised when a process could not be run at all.
///
/// A process that runs and exits non-zero is not an error at this level; the
/// caller inspects [`CommandOutput::success`].
#[derive(Debug, Error)]
pub enum ExecError {
  #[error("failed to spawn `{program}`: {source}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },
}

/// A single external invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
  pub program: String,
  pub args: Vec<String>,
  pub cwd: Option<PathBuf>,
  /// Complete environment for the child. `None` inherits the parent's.
  pub env: Option<EnvMap>,
}

impl CommandSpec {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: None,
      env: None,
    }
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  pub fn cwd(mut self, dir: impl AsRef<Path>) -> Self {
    self.cwd = Some(dir.as_ref().to_path_buf());
    self
  }

  pub fn env(mut self, env: &EnvMap) -> Self {
    self.env = Some(env.clone());
    self
  }

  /// Whether the argument list contains `arg` verbatim.
  pub fn has_arg(&self, arg: &str) -> bool {
    self.args.iter().any(|a| a == arg)
  }
}

impl fmt::Display for CommandSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.program)?;
    for arg in &self.args {
      write!(f, " {}", arg)?;
    }
    Ok(())
  }
}

/// Result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
  /// Exit code, `None` if the process was killed by a signal.
  pub code: Option<i32>,
  pub stdout: String,
  pub stderr: String,
}

impl CommandOutput {
  pub fn success(&self) -> bool {
    self.code == Some(0)
  }

  /// The last `lines` non-blank lines of stderr, or of stdout when stderr is
  /// empty. Tools like configure and make put the reason for a failure there.
  pub fn tail(&self, lines: usize) -> String {
    let source = if self.stderr.trim().is_empty() {
      &self.stdout
    } else {
      &self.stderr
    };
    let kept: Vec<&str> = source.lines().filter(|l| !l.trim().is_empty()).collect();
    kept[kept.len().saturating_sub(lines)..].join("\n")
  }
}

/// How much failing tool output ends up in errors and logs.
pub const OUTPUT_TAIL_LINES: usize = 20;

/// Human form of an exit code: `exit code 2`, or `killed by signal` when the
/// process has none.
pub fn describe_exit(code: Option<i32>) -> String {
  match code {
    Some(code) => format!("exit code {code}"),
    None => "killed by signal".to_string(),
  }
}

/// Runs external processes to completion.
pub trait CommandRunner {
  fn run(&self, cmd: &CommandSpec) -> impl Future<Output = Result<CommandOutput, ExecError>> + Send;
}

/// Number of parallel jobs to hand to `make`.
pub fn job_count() -> usize {
  std::thread::available_parallelism().map(|p| p.get()).unwrap_or(4)
}
