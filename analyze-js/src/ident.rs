use diagnostics::TextRange;

/// An identifier occurrence in the source buffer.
///
/// The text borrows the input source; equality is byte-exact. Two occurrences
/// of the same name at different positions compare equal on [`text`] but carry
/// distinct spans.
///
/// [`text`]: Identifier::text
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Identifier<'a> {
  text: &'a str,
  span: TextRange,
}

impl<'a> Identifier<'a> {
  pub const fn new(text: &'a str, span: TextRange) -> Self {
    Self { text, span }
  }

  /// Builds an identifier whose span starts at `offset` and covers the text's
  /// byte length. Convenient for tests and event replay.
  pub fn at(text: &'a str, offset: u32) -> Self {
    Self {
      text,
      span: TextRange::new(offset, offset.saturating_add(text.len() as u32)),
    }
  }

  pub fn text(&self) -> &'a str {
    self.text
  }

  pub fn span(&self) -> TextRange {
    self.span
  }
}
