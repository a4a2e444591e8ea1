//! Build-time environment composition.

use std::ffi::{OsStr, OsString};
use std::path::Path;

use crate::exec::EnvMap;
use crate::platform::os::Os;

const BASE_FLAGS: &[&str] = &["-g", "-O2"];

/// The current process environment, byte for byte.
pub fn ambient() -> EnvMap {
  std::env::vars_os().collect()
}

/// Derive the environment every build step runs with.
///
/// Starts from `ambient`, appends optimisation flags to `CFLAGS` and
/// `CXXFLAGS`, and puts `bin_dir` first on `PATH` so later stages pick up the
/// freshly installed binutils. Everything else passes through untouched.
pub fn build_environment(mut ambient: EnvMap, os: Os, tune_for_native: bool, bin_dir: &Path) -> EnvMap {
  let mut flags: Vec<&str> = BASE_FLAGS.to_vec();
  if tune_for_native {
    flags.push(os.native_tuning_flag());
  }
  let flags = flags.join(" ");

  for var in ["CFLAGS", "CXXFLAGS"] {
    let value = append_flags(ambient.get(OsStr::new(var)), &flags);
    ambient.insert(var.into(), value);
  }

  let mut path = bin_dir.as_os_str().to_os_string();
  if let Some(existing) = ambient.get(OsStr::new("PATH")).filter(|p| !p.is_empty()) {
    path.push(":");
    path.push(existing);
  }
  ambient.insert("PATH".into(), path);

  ambient
}

fn append_flags(existing: Option<&OsString>, flags: &str) -> OsString {
  let Some(existing) = existing else {
    return flags.into();
  };

  match existing.to_str().map(str::trim) {
    Some("") => flags.into(),
    Some(text) => format!("{text} {flags}").into(),
    None => {
      let mut value = existing.clone();
      value.push(" ");
      value.push(flags);
      value
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn base() -> EnvMap {
    let mut env = EnvMap::new();
    env.insert("PATH".into(), "/usr/bin:/bin".into());
    env.insert("HOME".into(), "/home/dev".into());
    env
  }

  fn var<'a>(env: &'a EnvMap, key: &str) -> &'a OsStr {
    &env[OsStr::new(key)]
  }

  #[test]
  fn linux_tunes_with_march() {
    let env = build_environment(base(), Os::Linux, true, Path::new("/tc/bin"));
    assert_eq!(var(&env, "CFLAGS"), "-g -O2 -march=native");
    assert_eq!(var(&env, "CXXFLAGS"), "-g -O2 -march=native");
  }

  #[test]
  fn macos_tunes_with_mtune() {
    let env = build_environment(base(), Os::MacOs, true, Path::new("/tc/bin"));
    assert_eq!(var(&env, "CFLAGS"), "-g -O2 -mtune=native");
  }

  #[test]
  fn tuning_can_be_disabled() {
    let env = build_environment(base(), Os::Linux, false, Path::new("/tc/bin"));
    assert_eq!(var(&env, "CFLAGS"), "-g -O2");
  }

  #[test]
  fn existing_flags_are_kept() {
    let mut ambient = base();
    ambient.insert("CFLAGS".into(), "-pipe".into());
    let env = build_environment(ambient, Os::Linux, false, Path::new("/tc/bin"));
    assert_eq!(var(&env, "CFLAGS"), "-pipe -g -O2");
    assert_eq!(var(&env, "CXXFLAGS"), "-g -O2");
  }

  #[test]
  fn bin_dir_is_prepended_to_path() {
    let env = build_environment(base(), Os::Linux, true, Path::new("/tc/bin"));
    assert_eq!(var(&env, "PATH"), "/tc/bin:/usr/bin:/bin");
    assert_eq!(var(&env, "HOME"), "/home/dev");
  }

  #[test]
  fn missing_path_becomes_bin_dir() {
    let env = build_environment(EnvMap::new(), Os::Linux, true, Path::new("/tc/bin"));
    assert_eq!(var(&env, "PATH"), "/tc/bin");
  }

  #[cfg(unix)]
  mod non_utf8 {
    use super::*;
    use serial_test::serial;
    use std::os::unix::ffi::{OsStrExt, OsStringExt};

    fn latin1() -> OsString {
      OsString::from_vec(b"caf\xe9".to_vec())
    }

    #[test]
    fn undecodable_values_pass_through() {
      let mut ambient = base();
      ambient.insert("LOCALE_DIR".into(), latin1());
      ambient.insert("CFLAGS".into(), OsString::from_vec(b"-I/opt/caf\xe9".to_vec()));

      let env = build_environment(ambient, Os::Linux, false, Path::new("/tc/bin"));

      assert_eq!(var(&env, "LOCALE_DIR"), latin1());
      assert_eq!(var(&env, "CFLAGS").as_bytes(), b"-I/opt/caf\xe9 -g -O2");
    }

    #[test]
    #[serial]
    fn ambient_keeps_undecodable_variables() {
      temp_env::with_var("CROSSFORGE_TEST_LATIN1", Some(latin1()), || {
        let env = build_environment(ambient(), Os::Linux, true, Path::new("/tc/bin"));
        assert_eq!(var(&env, "CROSSFORGE_TEST_LATIN1"), latin1());
      });
    }
  }
}
