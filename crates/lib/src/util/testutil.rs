//! Test doubles for the process and download seams.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::exec::{CommandOutput, CommandRunner, CommandSpec, ExecError};
use crate::fetch::{FetchError, Fetcher};

type Responder = Box<dyn Fn(&CommandSpec) -> CommandOutput + Send + Sync>;

pub fn ok() -> CommandOutput {
  CommandOutput {
    code: Some(0),
    ..Default::default()
  }
}

pub fn ok_with_stdout(stdout: &str) -> CommandOutput {
  CommandOutput {
    code: Some(0),
    stdout: stdout.to_string(),
    stderr: String::new(),
  }
}

pub fn failed(code: i32) -> CommandOutput {
  failed_with(code, "simulated failure")
}

pub fn failed_with(code: i32, stderr: &str) -> CommandOutput {
  CommandOutput {
    code: Some(code),
    stdout: String::new(),
    stderr: stderr.to_string(),
  }
}

/// Records every command and answers from a responder. Defaults to success.
pub struct RecordingRunner {
  calls: Mutex<Vec<CommandSpec>>,
  respond: Responder,
}

impl RecordingRunner {
  pub fn new() -> Self {
    Self::with_responder(|_| ok())
  }

  pub fn with_responder(respond: impl Fn(&CommandSpec) -> CommandOutput + Send + Sync + 'static) -> Self {
    Self {
      calls: Mutex::new(Vec::new()),
      respond: Box::new(respond),
    }
  }

  pub fn calls(&self) -> Vec<CommandSpec> {
    self.calls.lock().unwrap().clone()
  }

  /// Index of the first recorded command matching `pred`.
  pub fn position(&self, pred: impl Fn(&CommandSpec) -> bool) -> Option<usize> {
    self.calls.lock().unwrap().iter().position(pred)
  }
}

impl CommandRunner for RecordingRunner {
  async fn run(&self, cmd: &CommandSpec) -> Result<CommandOutput, ExecError> {
    self.calls.lock().unwrap().push(cmd.clone());
    Ok((self.respond)(cmd))
  }
}

/// Records downloads and writes a small placeholder file to the destination.
#[derive(Default)]
pub struct RecordingFetcher {
  downloads: Mutex<Vec<(String, PathBuf)>>,
  fail: bool,
}

impl RecordingFetcher {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn failing() -> Self {
    Self {
      fail: true,
      ..Default::default()
    }
  }

  pub fn downloads(&self) -> Vec<(String, PathBuf)> {
    self.downloads.lock().unwrap().clone()
  }
}

impl Fetcher for RecordingFetcher {
  async fn download(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
    self.downloads.lock().unwrap().push((url.to_string(), dest.to_path_buf()));
    if self.fail {
      return Err(FetchError::Status {
        url: url.to_string(),
        status: 404,
      });
    }
    std::fs::write(dest, b"tarball").map_err(|source| FetchError::Write {
      path: dest.to_path_buf(),
      source,
    })
  }
}
