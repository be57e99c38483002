use std::fmt::Display;
use std::fmt::Formatter;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Which filesystem operation failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigIoOp {
  Canonicalize,
  Read,
}

impl ConfigIoOp {
  fn describe(self) -> &'static str {
    match self {
      ConfigIoOp::Canonicalize => "canonicalizing",
      ConfigIoOp::Read => "reading",
    }
  }
}

/// An I/O failure tagged with the operation and the path involved.
#[derive(Debug)]
pub struct ConfigIoError {
  pub op: ConfigIoOp,
  pub path: PathBuf,
  pub source: io::Error,
}

impl ConfigIoError {
  pub fn is_not_found(&self) -> bool {
    self.source.kind() == io::ErrorKind::NotFound
  }
}

impl Display for ConfigIoError {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "error {} {}: {}",
      self.op.describe(),
      self.path.display(),
      self.source
    )
  }
}

impl std::error::Error for ConfigIoError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    Some(&self.source)
  }
}

// Structural comparison for change detection: two errors are the same failure
// if the operation, path, and error kind agree.
impl PartialEq for ConfigIoError {
  fn eq(&self, other: &Self) -> bool {
    self.op == other.op && self.path == other.path && self.source.kind() == other.source.kind()
  }
}

impl Eq for ConfigIoError {}

impl Clone for ConfigIoError {
  fn clone(&self) -> Self {
    Self {
      op: self.op,
      path: self.path.clone(),
      source: io::Error::new(self.source.kind(), self.source.to_string()),
    }
  }
}

/// Filesystem access needed by the configuration loader.
pub trait ConfigFilesystem {
  fn canonicalize(&self, path: &Path) -> Result<PathBuf, ConfigIoError>;
  fn read_to_string(&self, path: &Path) -> Result<String, ConfigIoError>;
}

/// The real filesystem.
#[derive(Debug, Default)]
pub struct RealConfigFilesystem;

impl ConfigFilesystem for RealConfigFilesystem {
  fn canonicalize(&self, path: &Path) -> Result<PathBuf, ConfigIoError> {
    fs::canonicalize(path).map_err(|source| ConfigIoError {
      op: ConfigIoOp::Canonicalize,
      path: path.to_path_buf(),
      source,
    })
  }

  fn read_to_string(&self, path: &Path) -> Result<String, ConfigIoError> {
    fs::read_to_string(path).map_err(|source| ConfigIoError {
      op: ConfigIoOp::Read,
      path: path.to_path_buf(),
      source,
    })
  }
}

/// The process-wide real filesystem instance. Constructed lazily on first use
/// and lives for the process lifetime; there is no teardown.
pub fn real_filesystem() -> &'static RealConfigFilesystem {
  static INSTANCE: OnceLock<RealConfigFilesystem> = OnceLock::new();
  INSTANCE.get_or_init(RealConfigFilesystem::default)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn real_filesystem_is_a_singleton() {
    let first = real_filesystem() as *const RealConfigFilesystem;
    let second = real_filesystem() as *const RealConfigFilesystem;
    assert_eq!(first, second);
  }

  #[test]
  fn missing_file_reports_read_error() {
    let err = real_filesystem()
      .read_to_string(Path::new("/definitely/does/not/exist.config"))
      .unwrap_err();
    assert_eq!(err.op, ConfigIoOp::Read);
    assert!(err.is_not_found());
    assert!(err.to_string().contains("reading"));
  }

  #[test]
  fn errors_compare_structurally() {
    let a = ConfigIoError {
      op: ConfigIoOp::Read,
      path: PathBuf::from("/x"),
      source: io::Error::new(io::ErrorKind::NotFound, "gone"),
    };
    let b = a.clone();
    assert_eq!(a, b);
    let c = ConfigIoError {
      op: ConfigIoOp::Canonicalize,
      ..a.clone()
    };
    assert_ne!(a, c);
  }
}
