use diagnostics::files::SimpleFiles;
use diagnostics::render::render_diagnostic;
use diagnostics::Diagnostic;
use diagnostics::Label;
use diagnostics::Span;
use diagnostics::TextRange;

fn main() {
  let mut files = SimpleFiles::new();
  let file = files.add("example.js", "let answer = 1;\nanswer = 2;\nlet answer = 3;\n");

  let diagnostic = Diagnostic::error(
    "VAR0001",
    "redeclaration of variable",
    Span::new(file, TextRange::new(32, 38)), // the second `answer`
  )
  .with_label(Label::secondary(
    Span::new(file, TextRange::new(4, 10)), // the first `answer`
    "original declaration here",
  ));

  print!("{}", render_diagnostic(&files, &diagnostic));
}
