use crate::Diagnostic;
use crate::FileId;
use crate::Label;
use std::fmt::Write;

/// Provides access to source text for rendering diagnostics.
///
/// Returning `None` lets consumers degrade gracefully when a [`FileId`] has no
/// backing text (for example, the CLI rendering spans without `--source`).
pub trait SourceProvider {
  /// Returns the display name for a file, or `None` if the file is unknown.
  fn file_name(&self, file: FileId) -> Option<&str>;
  /// Returns the file contents, or `None` if the file is unavailable.
  fn file_text(&self, file: FileId) -> Option<&str>;
}

/// Render a diagnostic into a human-readable string with caret highlighting.
///
/// The primary span is rendered first with the diagnostic message; secondary
/// labels follow in span order, each with its own `-->` header when it refers
/// to a different file than the preceding label.
pub fn render_diagnostic(provider: &dyn SourceProvider, diagnostic: &Diagnostic) -> String {
  let mut output = String::new();

  let mut labels = Vec::with_capacity(diagnostic.labels.len() + 1);
  labels.push(Label {
    span: diagnostic.primary,
    message: diagnostic.message.clone(),
    is_primary: true,
  });
  labels.extend(diagnostic.labels.iter().cloned());
  labels.sort();

  let gutter_width = gutter_width_for(provider, &labels);

  writeln!(
    output,
    "{}[{}]: {}",
    diagnostic.severity, diagnostic.code, diagnostic.message
  )
  .unwrap();
  write_location_header(provider, &mut output, diagnostic.primary.file, {
    diagnostic.primary.range.start as usize
  });

  let mut current_file = Some(diagnostic.primary.file);
  for label in labels {
    if Some(label.span.file) != current_file {
      write_location_header(
        provider,
        &mut output,
        label.span.file,
        label.span.range.start as usize,
      );
      current_file = Some(label.span.file);
    }
    match provider.file_text(label.span.file) {
      Some(text) => render_label(text, &mut output, &label, gutter_width),
      None => render_label_placeholder(&mut output, &label, gutter_width),
    }
  }

  for note in &diagnostic.notes {
    writeln!(output, "= note: {}", note).unwrap();
  }

  output
}

fn gutter_width_for(provider: &dyn SourceProvider, labels: &[Label]) -> usize {
  let mut max_line_no = 1usize;
  for label in labels {
    if let Some(text) = provider.file_text(label.span.file) {
      let starts = line_starts(text);
      let start_line = line_index_at_offset(&starts, label.span.range.start as usize) + 1;
      let end_line =
        line_index_at_offset(&starts, label.span.range.end.saturating_sub(1) as usize) + 1;
      max_line_no = max_line_no.max(start_line).max(end_line);
    }
  }
  max_line_no.to_string().len().max(1)
}

fn write_location_header(
  provider: &dyn SourceProvider,
  output: &mut String,
  file: FileId,
  offset: usize,
) {
  let name = provider.file_name(file).unwrap_or("<unknown>");
  let (line, col) = match provider.file_text(file) {
    Some(text) => line_and_column(text, offset),
    None => (1, offset + 1),
  };
  writeln!(output, " --> {}:{}:{}", name, line, col).unwrap();
  writeln!(output, "  |").unwrap();
}

fn render_label(text: &str, output: &mut String, label: &Label, gutter_width: usize) {
  let starts = line_starts(text);
  let start_offset = (label.span.range.start as usize).min(text.len());
  let end_offset = (label.span.range.end as usize).min(text.len());
  let start_line = line_index_at_offset(&starts, start_offset);
  let end_line = line_index_at_offset(&starts, end_offset.saturating_sub(1));
  let marker = if label.is_primary { '^' } else { '-' };

  for line_idx in start_line..=end_line {
    let line_start = starts[line_idx];
    let line_end = if line_idx + 1 < starts.len() {
      starts[line_idx + 1] - 1
    } else {
      text.len()
    };

    let from = if line_idx == start_line {
      start_offset
    } else {
      line_start
    }
    .clamp(line_start, line_end);
    let to = if line_idx == end_line {
      end_offset
    } else {
      line_end
    }
    .clamp(from, line_end);

    writeln!(
      output,
      "{:>width$} | {}",
      line_idx + 1,
      &text[line_start..line_end],
      width = gutter_width
    )
    .unwrap();

    write!(output, "{:>width$} | ", "", width = gutter_width).unwrap();
    output.push_str(&" ".repeat(from - line_start));
    for _ in 0..(to - from).max(1) {
      output.push(marker);
    }
    if line_idx == start_line && !label.message.is_empty() {
      output.push(' ');
      output.push_str(&label.message);
    }
    output.push('\n');
  }
}

fn render_label_placeholder(output: &mut String, label: &Label, gutter_width: usize) {
  let marker = if label.is_primary { '^' } else { '-' };
  writeln!(
    output,
    "{:>width$} | <source unavailable>",
    "",
    width = gutter_width
  )
  .unwrap();
  write!(output, "{:>width$} | {}", "", marker, width = gutter_width).unwrap();
  write!(
    output,
    " [{}..{}]",
    label.span.range.start, label.span.range.end
  )
  .unwrap();
  if !label.message.is_empty() {
    output.push(' ');
    output.push_str(&label.message);
  }
  output.push('\n');
}

fn line_and_column(text: &str, offset: usize) -> (usize, usize) {
  let starts = line_starts(text);
  let offset = offset.min(text.len());
  let line_idx = line_index_at_offset(&starts, offset);
  (line_idx + 1, offset - starts[line_idx] + 1)
}

fn line_index_at_offset(starts: &[usize], offset: usize) -> usize {
  match starts.binary_search(&offset) {
    Ok(idx) => idx,
    Err(0) => 0,
    Err(idx) => idx - 1,
  }
}

fn line_starts(text: &str) -> Vec<usize> {
  let mut starts = vec![0];
  for (idx, ch) in text.char_indices() {
    if ch == '\n' {
      starts.push(idx + 1);
    }
  }
  starts
}
