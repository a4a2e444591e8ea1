//! Host package manager abstraction.
//!
//! Three package managers are supported, each driven through its own command
//! line tool. [`PackageManagerKind`] describes the command shapes;
//! [`PackageManagerHandle`] is the detected manager for this process and
//! carries the one-time index refresh flag.

use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::exec::{CommandOutput, CommandRunner, CommandSpec};
use crate::platform::os::Os;

/// The package managers crossforge knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManagerKind {
  Apt,
  Pacman,
  Brew,
}

impl PackageManagerKind {
  /// Probe order on hosts where detection is needed.
  pub const PROBE_ORDER: [PackageManagerKind; 3] = [Self::Apt, Self::Pacman, Self::Brew];

  /// Canonical name, which is also the executable probed for.
  pub fn name(&self) -> &'static str {
    match self {
      Self::Apt => "apt",
      Self::Pacman => "pacman",
      Self::Brew => "brew",
    }
  }

  /// Command that refreshes the package index, if this manager needs one
  /// before installing.
  pub fn refresh_command(&self) -> Option<CommandSpec> {
    match self {
      Self::Apt => Some(CommandSpec::new("sudo").args(["apt-get", "update"])),
      Self::Pacman | Self::Brew => None,
    }
  }

  pub fn query_command(&self, package: &str) -> CommandSpec {
    match self {
      Self::Apt => CommandSpec::new("apt").args(["--installed", "list", package, "-qq"]),
      Self::Pacman => CommandSpec::new("pacman").args(["-Q", package]),
      Self::Brew => CommandSpec::new("brew").args(["list", package]),
    }
  }

  pub fn install_command(&self, package: &str) -> CommandSpec {
    match self {
      Self::Apt => CommandSpec::new("sudo").args(["apt-get", "install", "-y", package]),
      Self::Pacman => CommandSpec::new("sudo").args(["pacman", "-Sy", package, "--noconfirm"]),
      Self::Brew => CommandSpec::new("brew").args(["install", package]),
    }
  }

  /// Interpret the output of [`query_command`](Self::query_command).
  ///
  /// apt exits 0 whether or not the package is installed and marks installed
  /// entries with `[installed` (or `[installed,automatic]`, ...). pacman and
  /// brew signal absence with a non-zero exit.
  pub fn interpret_query(&self, output: &CommandOutput) -> bool {
    match self {
      Self::Apt => output.success() && output.stdout.contains("[installed"),
      Self::Pacman | Self::Brew => output.success(),
    }
  }
}

impl fmt::Display for PackageManagerKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.name())
  }
}

/// Whether `program` is an executable on `PATH`.
pub fn on_path(program: &str) -> bool {
  which::which(program).is_ok()
}

/// Pick the host package manager.
///
/// macOS always uses brew without probing. Elsewhere the first manager in
/// [`PackageManagerKind::PROBE_ORDER`] for which `probe` succeeds wins.
pub fn detect(os: Os, probe: impl Fn(&str) -> bool) -> Result<PackageManagerKind> {
  if os == Os::MacOs {
    return Ok(PackageManagerKind::Brew);
  }

  PackageManagerKind::PROBE_ORDER
    .into_iter()
    .find(|kind| probe(kind.name()))
    .ok_or(Error::NoPackageManagerFound)
}

/// The package manager detected for this process.
#[derive(Debug)]
pub struct PackageManagerHandle {
  kind: PackageManagerKind,
  index_refreshed: AtomicBool,
}

impl PackageManagerHandle {
  pub fn new(kind: PackageManagerKind) -> Self {
    Self {
      kind,
      index_refreshed: AtomicBool::new(false),
    }
  }

  pub fn kind(&self) -> PackageManagerKind {
    self.kind
  }

  pub fn name(&self) -> &'static str {
    self.kind.name()
  }

  /// Whether the one-time index refresh has already run in this process.
  pub fn index_refreshed(&self) -> bool {
    self.index_refreshed.load(Ordering::Acquire)
  }

  /// Ask the package manager whether `package` is installed.
  ///
  /// "Not installed" is `Ok(false)`; only a failure to run the tool is an error.
  pub async fn is_installed<R: CommandRunner>(&self, runner: &R, package: &str) -> Result<bool> {
    let output = runner.run(&self.kind.query_command(package)).await?;
    Ok(self.kind.interpret_query(&output))
  }

  /// Install `package`, refreshing the index first if this is the first
  /// install in the process and the manager needs it.
  pub async fn install<R: CommandRunner>(&self, runner: &R, package: &str) -> Result<()> {
    if let Some(refresh) = self.kind.refresh_command() {
      if !self.index_refreshed.swap(true, Ordering::AcqRel) {
        info!(manager = %self.kind, "refreshing package index");
        let output = runner.run(&refresh).await?;
        if !output.success() {
          warn!(manager = %self.kind, code = ?output.code, "package index refresh failed, continuing");
        }
      }
    }

    info!(package, manager = %self.kind, "installing");
    let output = runner.run(&self.kind.install_command(package)).await?;

    if !output.success() {
      return Err(Error::DependencyInstallFailed {
        package: package.to_string(),
        manager: self.kind.name(),
        code: output.code,
      });
    }

    Ok(())
  }

  /// Installation prefix of a package, where the manager can tell us.
  ///
  /// Only brew keeps packages under per-package prefixes; the others return `None`.
  pub async fn prefix<R: CommandRunner>(&self, runner: &R, package: &str) -> Result<Option<PathBuf>> {
    if self.kind != PackageManagerKind::Brew {
      return Ok(None);
    }

    let output = runner.run(&CommandSpec::new("brew").args(["--prefix", package])).await?;
    let prefix = output.stdout.trim();

    if !output.success() || prefix.is_empty() {
      warn!(package, "brew did not report a prefix");
      return Ok(None);
    }

    debug!(package, prefix, "resolved brew prefix");
    Ok(Some(PathBuf::from(prefix)))
  }
}

/// What dependency resolution did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyReport {
  pub manager: Option<PackageManagerKind>,
  pub installed: Vec<String>,
  pub already_present: Vec<String>,
}

/// Make sure every package in `packages` is installed, in list order.
///
/// Installed packages are left alone; install is never called for them.
pub async fn install_dependencies<R: CommandRunner>(
  handle: &PackageManagerHandle,
  runner: &R,
  packages: &[&str],
) -> Result<DependencyReport> {
  let mut report = DependencyReport {
    manager: Some(handle.kind()),
    ..Default::default()
  };

  for package in packages {
    if handle.is_installed(runner, package).await? {
      info!(package, "already installed");
      report.already_present.push(package.to_string());
      continue;
    }

    handle.install(runner, package).await?;
    report.installed.push(package.to_string());
  }

  Ok(report)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::util::testutil::{RecordingRunner, failed, ok, ok_with_stdout};

  #[test]
  fn macos_always_uses_brew() {
    let kind = detect(Os::MacOs, |_| panic!("macOS must not probe")).unwrap();
    assert_eq!(kind, PackageManagerKind::Brew);
  }

  #[test]
  fn detection_follows_probe_order() {
    assert_eq!(detect(Os::Linux, |_| true).unwrap(), PackageManagerKind::Apt);
    assert_eq!(
      detect(Os::Linux, |name| name == "pacman" || name == "brew").unwrap(),
      PackageManagerKind::Pacman
    );
    assert_eq!(detect(Os::Linux, |name| name == "brew").unwrap(), PackageManagerKind::Brew);
  }

  #[test]
  fn detection_fails_without_any_manager() {
    assert!(matches!(detect(Os::Linux, |_| false), Err(Error::NoPackageManagerFound)));
  }

  #[test]
  fn apt_query_reads_installed_marker() {
    let apt = PackageManagerKind::Apt;
    assert!(apt.interpret_query(&ok_with_stdout("bison/jammy,now 2:3.8.2 amd64 [installed]\n")));
    assert!(apt.interpret_query(&ok_with_stdout("flex/jammy 2.6.4 amd64 [installed,automatic]\n")));
    assert!(!apt.interpret_query(&ok_with_stdout("")));
  }

  #[test]
  fn exit_code_queries() {
    assert!(PackageManagerKind::Pacman.interpret_query(&ok()));
    assert!(!PackageManagerKind::Pacman.interpret_query(&failed(1)));
    assert!(!PackageManagerKind::Brew.interpret_query(&failed(1)));
  }

  #[tokio::test]
  async fn not_installed_is_false_not_error() {
    let runner = RecordingRunner::with_responder(|_| failed(1));
    let handle = PackageManagerHandle::new(PackageManagerKind::Pacman);

    assert!(!handle.is_installed(&runner, "gmp").await.unwrap());
  }

  #[tokio::test]
  async fn apt_refreshes_index_once_before_first_install() {
    let runner = RecordingRunner::new();
    let handle = PackageManagerHandle::new(PackageManagerKind::Apt);

    for package in ["bison", "flex", "texinfo"] {
      handle.install(&runner, package).await.unwrap();
    }

    let calls = runner.calls();
    let refreshes = calls.iter().filter(|c| c.has_arg("update")).count();
    assert_eq!(refreshes, 1);
    assert!(calls[0].has_arg("update"));
    assert!(calls[1].has_arg("bison"));
    assert!(handle.index_refreshed());
  }

  #[tokio::test]
  async fn pacman_and_brew_never_refresh() {
    for kind in [PackageManagerKind::Pacman, PackageManagerKind::Brew] {
      let runner = RecordingRunner::new();
      let handle = PackageManagerHandle::new(kind);

      handle.install(&runner, "gmp").await.unwrap();

      assert_eq!(runner.calls().len(), 1);
      assert!(!handle.index_refreshed());
    }
  }

  #[tokio::test]
  async fn failing_refresh_does_not_block_install() {
    let runner = RecordingRunner::with_responder(|cmd| if cmd.has_arg("update") { failed(100) } else { ok() });
    let handle = PackageManagerHandle::new(PackageManagerKind::Apt);

    handle.install(&runner, "flex").await.unwrap();
    assert_eq!(runner.calls().len(), 2);
  }

  #[tokio::test]
  async fn install_failure_is_fatal() {
    let runner = RecordingRunner::with_responder(|_| failed(1));
    let handle = PackageManagerHandle::new(PackageManagerKind::Brew);

    let err = handle.install(&runner, "isl").await.unwrap_err();
    assert!(matches!(
      err,
      Error::DependencyInstallFailed { ref package, manager: "brew", code: Some(1) } if package == "isl"
    ));
    assert_eq!(err.to_string(), "brew failed to install 'isl' (exit code 1)");
  }

  #[tokio::test]
  async fn resolution_skips_installed_packages() {
    let runner = RecordingRunner::with_responder(|cmd| {
      if cmd.program == "apt" && cmd.has_arg("flex") {
        ok_with_stdout("flex/jammy 2.6.4 amd64 [installed]")
      } else {
        ok()
      }
    });
    let handle = PackageManagerHandle::new(PackageManagerKind::Apt);

    let report = install_dependencies(&handle, &runner, &["bison", "flex", "texinfo"]).await.unwrap();

    assert_eq!(report.installed, vec!["bison", "texinfo"]);
    assert_eq!(report.already_present, vec!["flex"]);
    let installs: Vec<_> = runner.calls().into_iter().filter(|c| c.has_arg("install")).collect();
    assert_eq!(installs.len(), 2);
    assert!(installs.iter().all(|c| !c.has_arg("flex")));
  }

  #[tokio::test]
  async fn resolution_stops_at_first_failed_install() {
    let runner = RecordingRunner::with_responder(|_| failed(1));
    let handle = PackageManagerHandle::new(PackageManagerKind::Pacman);

    let err = install_dependencies(&handle, &runner, &["base-devel", "gmp"]).await.unwrap_err();

    assert!(matches!(err, Error::DependencyInstallFailed { ref package, .. } if package == "base-devel"));
    assert!(runner.calls().iter().all(|c| !c.has_arg("gmp")));
  }

  #[tokio::test]
  async fn brew_prefix_is_trimmed() {
    let runner = RecordingRunner::with_responder(|_| ok_with_stdout("/opt/homebrew/opt/gmp\n"));
    let handle = PackageManagerHandle::new(PackageManagerKind::Brew);

    let prefix = handle.prefix(&runner, "gmp").await.unwrap();
    assert_eq!(prefix, Some(PathBuf::from("/opt/homebrew/opt/gmp")));
  }

  #[tokio::test]
  async fn non_brew_has_no_prefix() {
    let runner = RecordingRunner::new();
    let handle = PackageManagerHandle::new(PackageManagerKind::Apt);

    assert_eq!(handle.prefix(&runner, "gmp").await.unwrap(), None);
    assert!(runner.calls().is_empty());
  }
}
