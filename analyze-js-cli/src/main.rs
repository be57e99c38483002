use analyze_js::BlockFunctionHoisting;
use analyze_js::DeclFlags;
use analyze_js::DiagCollector;
use analyze_js::Event;
use analyze_js::GlobalDeclaredSet;
use analyze_js::Identifier;
use analyze_js::Language;
use analyze_js::VarOptions;
use analyze_js::VariableAnalyzer;
use analyze_js::VariableKind;
use anyhow::anyhow;
use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use diagnostics::files::SimpleFiles;
use diagnostics::render::render_diagnostic;
use diagnostics::render::SourceProvider;
use diagnostics::FileId;
use diagnostics::Severity;
use diagnostics::TextRange;
use lint_config::real_filesystem;
use lint_config::ConfigLoader;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;
use std::process::exit;
use tracing::debug;

/// Replays a parser's visit-event stream (NDJSON, one event object per line)
/// through the variable analyzer and prints the diagnostics.
#[derive(Parser, Debug)]
#[command(author, version)]
struct Cli {
  /// Event file to replay; `-` reads standard input.
  #[arg(default_value = "-")]
  event_file: PathBuf,

  /// Source buffer the event spans refer to, for caret rendering.
  #[arg(long)]
  source: Option<PathBuf>,

  /// Explicit configuration file (default: search ancestor directories).
  #[arg(long)]
  config_file: Option<PathBuf>,

  /// Search for the configuration near this path instead of the event file.
  #[arg(long)]
  path_for_config_search: Option<PathBuf>,

  /// Input language: js, jsx, ts, or tsx.
  #[arg(long, default_value = "js")]
  language: String,

  /// Block function hoisting semantics: strict or legacy.
  #[arg(long, default_value = "strict")]
  block_function_hoisting: String,

  /// Lowest severity that causes a nonzero exit: error, warning, or never.
  #[arg(long, default_value = "error")]
  exit_fail_on: String,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
struct RawFlags {
  initialized: bool,
  declared_in_for_init: bool,
  is_export: bool,
}

impl From<RawFlags> for DeclFlags {
  fn from(raw: RawFlags) -> Self {
    DeclFlags {
      initialized: raw.initialized,
      declared_in_for_init: raw.declared_in_for_init,
      is_export: raw.is_export,
    }
  }
}

/// The serialized event form. Spans are `[start, end]` byte offsets into the
/// source buffer.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum RawEvent {
  VariableDeclaration {
    name: String,
    span: (u32, u32),
    kind: String,
    #[serde(default)]
    flags: RawFlags,
  },
  VariableUse {
    name: String,
    span: (u32, u32),
  },
  VariableTypeUse {
    name: String,
    span: (u32, u32),
  },
  VariableAssignment {
    name: String,
    span: (u32, u32),
  },
  VariableExportUse {
    name: String,
    span: (u32, u32),
  },
  VariableDeleteUse {
    name: String,
    span: (u32, u32),
    keyword_span: (u32, u32),
  },
  VariableTypePredicateUse {
    name: String,
    span: (u32, u32),
  },
  EnterArrowScope,
  ExitArrowScope,
  EnterBlockScope,
  ExitBlockScope,
  EnterClassScope,
  ExitClassScope,
  EnterClassBodyScope,
  ExitClassBodyScope,
  EnterConditionalTypeScope,
  ExitConditionalTypeScope,
  EnterForScope,
  ExitForScope,
  EnterFunctionScope,
  ExitFunctionScope,
  EnterFunctionBodyScope,
  ExitFunctionBodyScope,
  EnterInterfaceScope,
  ExitInterfaceScope,
  EnterNamespaceScope,
  ExitNamespaceScope,
  EnterWithScope,
  ExitWithScope,
  EndOfModule,
}

fn ident(name: &str, span: (u32, u32)) -> Identifier<'_> {
  Identifier::new(name, TextRange::new(span.0, span.1))
}

fn to_event(raw: &RawEvent) -> Result<Event<'_>> {
  Ok(match raw {
    RawEvent::VariableDeclaration {
      name,
      span,
      kind,
      flags,
    } => Event::VariableDeclaration {
      ident: ident(name, *span),
      kind: kind
        .parse::<VariableKind>()
        .map_err(|_| anyhow!("unknown variable kind: {kind}"))?,
      flags: (*flags).into(),
    },
    RawEvent::VariableUse { name, span } => Event::VariableUse {
      ident: ident(name, *span),
    },
    RawEvent::VariableTypeUse { name, span } => Event::VariableTypeUse {
      ident: ident(name, *span),
    },
    RawEvent::VariableAssignment { name, span } => Event::VariableAssignment {
      ident: ident(name, *span),
    },
    RawEvent::VariableExportUse { name, span } => Event::VariableExportUse {
      ident: ident(name, *span),
    },
    RawEvent::VariableDeleteUse {
      name,
      span,
      keyword_span,
    } => Event::VariableDeleteUse {
      ident: ident(name, *span),
      keyword_span: TextRange::new(keyword_span.0, keyword_span.1),
    },
    RawEvent::VariableTypePredicateUse { name, span } => Event::VariableTypePredicateUse {
      ident: ident(name, *span),
    },
    RawEvent::EnterArrowScope => Event::EnterArrowScope,
    RawEvent::ExitArrowScope => Event::ExitArrowScope,
    RawEvent::EnterBlockScope => Event::EnterBlockScope,
    RawEvent::ExitBlockScope => Event::ExitBlockScope,
    RawEvent::EnterClassScope => Event::EnterClassScope,
    RawEvent::ExitClassScope => Event::ExitClassScope,
    RawEvent::EnterClassBodyScope => Event::EnterClassBodyScope,
    RawEvent::ExitClassBodyScope => Event::ExitClassBodyScope,
    RawEvent::EnterConditionalTypeScope => Event::EnterConditionalTypeScope,
    RawEvent::ExitConditionalTypeScope => Event::ExitConditionalTypeScope,
    RawEvent::EnterForScope => Event::EnterForScope,
    RawEvent::ExitForScope => Event::ExitForScope,
    RawEvent::EnterFunctionScope => Event::EnterFunctionScope,
    RawEvent::ExitFunctionScope => Event::ExitFunctionScope,
    RawEvent::EnterFunctionBodyScope => Event::EnterFunctionBodyScope,
    RawEvent::ExitFunctionBodyScope => Event::ExitFunctionBodyScope,
    RawEvent::EnterInterfaceScope => Event::EnterInterfaceScope,
    RawEvent::ExitInterfaceScope => Event::ExitInterfaceScope,
    RawEvent::EnterNamespaceScope => Event::EnterNamespaceScope,
    RawEvent::ExitNamespaceScope => Event::ExitNamespaceScope,
    RawEvent::EnterWithScope => Event::EnterWithScope,
    RawEvent::ExitWithScope => Event::ExitWithScope,
    RawEvent::EndOfModule => Event::EndOfModule,
  })
}

fn parse_options(cli: &Cli) -> Result<VarOptions> {
  let (language, jsx) = match cli.language.as_str() {
    "jsx" => (Language::JavaScript, true),
    "tsx" => (Language::TypeScript, true),
    other => (
      other
        .parse::<Language>()
        .map_err(|_| anyhow!("unknown language: {other}"))?,
      false,
    ),
  };
  let block_function_hoisting = cli
    .block_function_hoisting
    .parse::<BlockFunctionHoisting>()
    .map_err(|_| anyhow!("unknown hoisting mode: {}", cli.block_function_hoisting))?;
  Ok(VarOptions {
    language,
    jsx,
    strict: true,
    block_function_hoisting,
  })
}

fn load_globals(cli: &Cli) -> Result<GlobalDeclaredSet> {
  let mut loader = ConfigLoader::new(real_filesystem());
  if let Some(config_file) = &cli.config_file {
    let loaded = loader
      .load_config_file(config_file)
      .with_context(|| format!("failed to load {}", config_file.display()))?;
    debug!(path = %loaded.config_path.display(), "using explicit configuration");
    return Ok(loaded.config.build_globals());
  }

  let search_from = cli
    .path_for_config_search
    .clone()
    .or_else(|| (cli.event_file != Path::new("-")).then(|| cli.event_file.clone()));
  if let Some(search_from) = search_from {
    if let Ok(Some(loaded)) = loader.load_for_file(&search_from) {
      debug!(path = %loaded.config_path.display(), "using discovered configuration");
      return Ok(loaded.config.build_globals());
    }
  }
  Ok(analyze_js::default_globals())
}

fn read_events_text(path: &Path) -> Result<String> {
  if path == Path::new("-") {
    let mut text = String::new();
    std::io::stdin()
      .read_to_string(&mut text)
      .context("failed to read from stdin")?;
    Ok(text)
  } else {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
  }
}

/// Source provider for spans with a known file name but no available text.
struct NameOnly {
  name: String,
}

impl SourceProvider for NameOnly {
  fn file_name(&self, _file: FileId) -> Option<&str> {
    Some(&self.name)
  }

  fn file_text(&self, _file: FileId) -> Option<&str> {
    None
  }
}

fn fail_threshold(cli: &Cli) -> Result<Option<Severity>> {
  match cli.exit_fail_on.as_str() {
    "error" => Ok(Some(Severity::Error)),
    "warning" => Ok(Some(Severity::Warning)),
    "never" => Ok(None),
    other => Err(anyhow!("unknown exit-fail-on value: {other}")),
  }
}

fn run(cli: &Cli) -> Result<i32> {
  let options = parse_options(cli)?;
  let threshold = fail_threshold(cli)?;
  let globals = load_globals(cli)?;

  let events_text = read_events_text(&cli.event_file)?;
  let mut raw_events = Vec::new();
  for (line_number, line) in events_text.lines().enumerate() {
    if line.trim().is_empty() {
      continue;
    }
    let raw: RawEvent = serde_json::from_str(line)
      .with_context(|| format!("malformed event on line {}", line_number + 1))?;
    raw_events.push(raw);
  }

  let mut collector = DiagCollector::new();
  {
    let mut analyzer = VariableAnalyzer::new(&mut collector, &globals, options);
    for raw in &raw_events {
      analyzer.visit(to_event(raw)?);
    }
  }

  let source_name = cli
    .source
    .as_ref()
    .map(|path| path.display().to_string())
    .unwrap_or_else(|| "<events>".to_string());
  let file = FileId(0);
  let rendered: Vec<String> = match &cli.source {
    Some(source_path) => {
      let text = std::fs::read_to_string(source_path)
        .with_context(|| format!("failed to read {}", source_path.display()))?;
      let mut files = SimpleFiles::new();
      let file = files.add(source_name, text);
      collector
        .diags
        .iter()
        .map(|diag| render_diagnostic(&files, &diag.to_diagnostic(file)))
        .collect()
    }
    None => {
      let provider = NameOnly { name: source_name };
      collector
        .diags
        .iter()
        .map(|diag| render_diagnostic(&provider, &diag.to_diagnostic(file)))
        .collect()
    }
  };
  for output in rendered {
    eprintln!("{output}");
  }

  let failed = threshold.is_some_and(|threshold| {
    collector
      .diags
      .iter()
      .any(|diag| diag.severity() >= threshold)
  });
  Ok(if failed { 1 } else { 0 })
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  match run(&cli) {
    Ok(code) => exit(code),
    Err(err) => {
      eprintln!("error: {err:#}");
      exit(2);
    }
  }
}
