//! Shared diagnostics model and rendering utilities.
//!
//! The data structures here are intentionally small and deterministic so the
//! analyzer, the configuration loader, and the CLI can all report findings
//! through one channel without pulling in heavy dependencies. Producers build
//! [`Diagnostic`] values with a stable code, a severity, a primary [`Span`],
//! and optional secondary [`Label`]s; consumers either match on the code or
//! hand the diagnostic to [`render::render_diagnostic`] for caret-highlighted
//! terminal output.
//!
//! ```
//! use diagnostics::files::SimpleFiles;
//! use diagnostics::render::render_diagnostic;
//! use diagnostics::{Diagnostic, Span, TextRange};
//!
//! let mut files = SimpleFiles::new();
//! let file = files.add("example.js", "let x = 1;");
//! let diag = Diagnostic::error(
//!   "TEST0001",
//!   "an example error",
//!   Span::new(file, TextRange::new(4, 5)),
//! );
//!
//! let rendered = render_diagnostic(&files, &diag);
//! assert!(rendered.contains("TEST0001"));
//! assert!(rendered.contains("--> example.js:1:5"));
//! ```

pub mod files;
pub mod render;

use std::fmt::Display;
use std::fmt::Formatter;

/// A stable identifier for a file in a program.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct FileId(pub u32);

/// A byte range in a file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct TextRange {
  pub start: u32,
  pub end: u32,
}

impl TextRange {
  pub const fn new(start: u32, end: u32) -> Self {
    Self { start, end }
  }

  pub const fn empty(offset: u32) -> Self {
    Self {
      start: offset,
      end: offset,
    }
  }

  pub fn len(&self) -> u32 {
    self.end.saturating_sub(self.start)
  }

  pub fn is_empty(&self) -> bool {
    self.start >= self.end
  }

  /// Smallest range covering both `self` and `other`.
  pub fn cover(&self, other: TextRange) -> TextRange {
    TextRange {
      start: self.start.min(other.start),
      end: self.end.max(other.end),
    }
  }

  pub fn contains_range(&self, other: TextRange) -> bool {
    self.start <= other.start && other.end <= self.end
  }
}

/// A text range within a specific file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct Span {
  pub file: FileId,
  pub range: TextRange,
}

impl Span {
  pub const fn new(file: FileId, range: TextRange) -> Self {
    Self { file, range }
  }
}

/// Diagnostic severity. Ordered so that `Error` compares greatest, which lets
/// callers express "fail on warning or worse" as a plain comparison.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Severity {
  Help,
  Note,
  Warning,
  Error,
}

impl Severity {
  pub const fn as_str(&self) -> &'static str {
    match self {
      Severity::Error => "error",
      Severity::Warning => "warning",
      Severity::Note => "note",
      Severity::Help => "help",
    }
  }
}

impl Display for Severity {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A label attached to a diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Label {
  pub span: Span,
  pub message: String,
  pub is_primary: bool,
}

impl Label {
  pub fn new(span: Span, message: impl Into<String>, is_primary: bool) -> Self {
    Self {
      span,
      message: message.into(),
      is_primary,
    }
  }

  pub fn primary(span: Span, message: impl Into<String>) -> Self {
    Self::new(span, message, true)
  }

  pub fn secondary(span: Span, message: impl Into<String>) -> Self {
    Self::new(span, message, false)
  }
}

/// A user-facing diagnostic with optional labels and notes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
  pub code: &'static str,
  pub severity: Severity,
  pub message: String,
  pub primary: Span,
  pub labels: Vec<Label>,
  pub notes: Vec<String>,
}

impl Diagnostic {
  pub fn new(
    severity: Severity,
    code: &'static str,
    message: impl Into<String>,
    primary: Span,
  ) -> Self {
    Self {
      code,
      severity,
      message: message.into(),
      primary,
      labels: Vec::new(),
      notes: Vec::new(),
    }
  }

  pub fn error(code: &'static str, message: impl Into<String>, primary: Span) -> Self {
    Self::new(Severity::Error, code, message, primary)
  }

  pub fn warning(code: &'static str, message: impl Into<String>, primary: Span) -> Self {
    Self::new(Severity::Warning, code, message, primary)
  }

  pub fn note(code: &'static str, message: impl Into<String>, primary: Span) -> Self {
    Self::new(Severity::Note, code, message, primary)
  }

  pub fn with_label(mut self, label: Label) -> Self {
    self.labels.push(label);
    self
  }

  pub fn push_label(&mut self, label: Label) {
    self.labels.push(label);
  }

  pub fn with_note(mut self, note: impl Into<String>) -> Self {
    self.notes.push(note.into());
    self
  }
}

/// A diagnostic for a host-level failure (I/O, invalid input encoding) that has
/// no natural source position.
pub fn host_error(primary: Option<Span>, message: impl Into<String>) -> Diagnostic {
  let span = primary.unwrap_or(Span::new(FileId(0), TextRange::empty(0)));
  Diagnostic::error("HOST0001", message, span)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::files::SimpleFiles;
  use crate::render::render_diagnostic;

  #[test]
  fn render_single_line_span() {
    let mut files = SimpleFiles::new();
    let file = files.add("test.js", "let x = 1;");
    let diagnostic = Diagnostic::error(
      "TEST0001",
      "unused variable",
      Span::new(file, TextRange::new(4, 5)),
    );

    let rendered = render_diagnostic(&files, &diagnostic);
    let expected =
      "error[TEST0001]: unused variable\n --> test.js:1:5\n  |\n1 | let x = 1;\n  |     ^ unused variable\n";
    assert_eq!(rendered, expected);
  }

  #[test]
  fn render_multi_line_span() {
    let mut files = SimpleFiles::new();
    let text = "function test() {\n  return 1;\n}\n";
    let file = files.add("main.ts", text);
    let diagnostic = Diagnostic::error(
      "TEST0002",
      "broken function",
      Span::new(file, TextRange::new(0, text.len() as u32)),
    );

    let rendered = render_diagnostic(&files, &diagnostic);
    let expected = concat!(
      "error[TEST0002]: broken function\n",
      " --> main.ts:1:1\n",
      "  |\n",
      "1 | function test() {\n",
      "  | ^^^^^^^^^^^^^^^^^ broken function\n",
      "2 |   return 1;\n",
      "  | ^^^^^^^^^^^\n",
      "3 | }\n",
      "  | ^\n",
    );
    assert_eq!(rendered, expected);
  }

  #[test]
  fn stable_label_ordering() {
    let mut files = SimpleFiles::new();
    let file = files.add("order.js", "abcdef");
    let diagnostic =
      Diagnostic::warning("TEST0003", "ordering", Span::new(file, TextRange::new(2, 3)))
        .with_label(Label::secondary(
          Span::new(file, TextRange::new(4, 5)),
          "second",
        ))
        .with_label(Label::secondary(
          Span::new(file, TextRange::new(0, 1)),
          "first",
        ));

    let rendered = render_diagnostic(&files, &diagnostic);
    let first_pos = rendered.find("first").unwrap();
    let second_pos = rendered.find("second").unwrap();
    assert!(first_pos < second_pos);
  }

  #[test]
  fn severity_ordering_puts_errors_last() {
    assert!(Severity::Warning < Severity::Error);
    assert!(Severity::Note < Severity::Warning);
  }

  #[test]
  fn cover_and_contains() {
    let a = TextRange::new(2, 5);
    let b = TextRange::new(4, 9);
    assert_eq!(a.cover(b), TextRange::new(2, 9));
    assert!(a.cover(b).contains_range(a));
    assert!(!a.contains_range(b));
  }

  #[test]
  fn host_error_has_stable_code() {
    let diag = host_error(None, "failed to read stdin");
    assert_eq!(diag.code, "HOST0001");
    assert_eq!(diag.severity, Severity::Error);
  }
}
