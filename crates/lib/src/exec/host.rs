use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use super::{CommandOutput, CommandRunner, CommandSpec, ExecError};

/// Runs commands on the host with `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostRunner {
  stream: bool,
}

impl HostRunner {
  pub fn new() -> Self {
    Self::default()
  }

  /// Let child output go straight to the terminal instead of capturing it.
  pub fn streaming(mut self, stream: bool) -> Self {
    self.stream = stream;
    self
  }
}

impl CommandRunner for HostRunner {
  async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, ExecError> {
    let mut command = Command::new(&spec.program);
    command.args(&spec.args).stdin(Stdio::null());

    if let Some(dir) = &spec.cwd {
      command.current_dir(dir);
    }

    if let Some(env) = &spec.env {
      command.env_clear().envs(env);
    }

    if self.stream {
      command.stdout(Stdio::inherit()).stderr(Stdio::inherit());
    } else {
      command.stdout(Stdio::piped()).stderr(Stdio::piped());
    }

    debug!(cmd = %spec, cwd = ?spec.cwd, "spawning process");

    let output = command.output().await.map_err(|source| ExecError::Spawn {
      program: spec.program.clone(),
      source,
    })?;

    let result = CommandOutput {
      code: output.status.code(),
      stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
      stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    if !result.success() && !result.stderr.is_empty() {
      debug!(stderr = %result.stderr.trim_end(), "command stderr");
    }

    Ok(result)
  }
}
