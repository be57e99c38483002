//! Property tests over generated well-scoped event streams.
//!
//! The generator is a deterministic LCG, so failures reproduce from the seed
//! printed in the assertion message.

use analyze_js::analyze_events;
use analyze_js::default_globals;
use analyze_js::DeclFlags;
use analyze_js::Diag;
use analyze_js::DiagCollector;
use analyze_js::Event;
use analyze_js::GlobalDeclaredSet;
use analyze_js::GlobalFlags;
use analyze_js::Identifier;
use analyze_js::VarOptions;
use analyze_js::VariableKind;

struct Lcg(u64);

impl Lcg {
  fn next_u32(&mut self) -> u32 {
    // PCG-style LCG constants.
    self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
    (self.0 >> 32) as u32
  }

  fn next_usize(&mut self, max_exclusive: usize) -> usize {
    if max_exclusive == 0 {
      return 0;
    }
    (self.next_u32() as usize) % max_exclusive
  }
}

// Lexical names and var names are disjoint so that a duplicated `var`
// declaration can never collide with a strict declaration of the same name.
const LEX_NAMES: &[&str] = &["a", "b", "c", "d"];
const VAR_NAMES: &[&str] = &["va", "vb", "vc"];
const LEX_KINDS: &[VariableKind] = &[
  VariableKind::Let,
  VariableKind::Const,
  VariableKind::Class,
  VariableKind::Interface,
];

struct StreamBuilder {
  events: Vec<Event<'static>>,
  next_offset: u32,
  enters: usize,
  exits: usize,
}

impl StreamBuilder {
  fn new() -> Self {
    Self {
      events: Vec::new(),
      next_offset: 0,
      enters: 0,
      exits: 0,
    }
  }

  fn ident(&mut self, name: &'static str) -> Identifier<'static> {
    let ident = Identifier::at(name, self.next_offset);
    self.next_offset += name.len() as u32 + 1;
    ident
  }

  fn declaration(&mut self, name: &'static str, kind: VariableKind) {
    let ident = self.ident(name);
    self.events.push(Event::VariableDeclaration {
      ident,
      kind,
      flags: DeclFlags::default(),
    });
  }

  fn source_len(&self) -> u32 {
    self.next_offset
  }
}

fn gen_statements(rng: &mut Lcg, builder: &mut StreamBuilder, depth: usize) {
  let count = rng.next_usize(4) + 1;
  for _ in 0..count {
    match rng.next_usize(if depth == 0 { 5 } else { 8 }) {
      0 => {
        let name = VAR_NAMES[rng.next_usize(VAR_NAMES.len())];
        let kind = if rng.next_usize(2) == 0 {
          VariableKind::Var
        } else {
          VariableKind::Function
        };
        builder.declaration(name, kind);
      }
      1 => {
        let name = LEX_NAMES[rng.next_usize(LEX_NAMES.len())];
        let kind = LEX_KINDS[rng.next_usize(LEX_KINDS.len())];
        builder.declaration(name, kind);
      }
      2 => {
        let pool = if rng.next_usize(2) == 0 {
          LEX_NAMES
        } else {
          VAR_NAMES
        };
        let ident = builder.ident(pool[rng.next_usize(pool.len())]);
        builder.events.push(Event::VariableUse { ident });
      }
      3 => {
        let ident = builder.ident(LEX_NAMES[rng.next_usize(LEX_NAMES.len())]);
        builder.events.push(Event::VariableTypeUse { ident });
      }
      4 => {
        let pool = if rng.next_usize(2) == 0 {
          LEX_NAMES
        } else {
          VAR_NAMES
        };
        let ident = builder.ident(pool[rng.next_usize(pool.len())]);
        builder.events.push(Event::VariableAssignment { ident });
      }
      5 => {
        let (enter, exit) = if rng.next_usize(2) == 0 {
          (Event::EnterBlockScope, Event::ExitBlockScope)
        } else {
          (Event::EnterForScope, Event::ExitForScope)
        };
        builder.events.push(enter);
        builder.enters += 1;
        gen_statements(rng, builder, depth - 1);
        builder.events.push(exit);
        builder.exits += 1;
      }
      6 => {
        builder.events.push(Event::EnterFunctionScope);
        builder.enters += 1;
        let params = rng.next_usize(3);
        for _ in 0..params {
          let name = LEX_NAMES[rng.next_usize(LEX_NAMES.len())];
          builder.declaration(name, VariableKind::FunctionParameter);
        }
        builder.events.push(Event::EnterFunctionBodyScope);
        builder.enters += 1;
        gen_statements(rng, builder, depth - 1);
        builder.events.push(Event::ExitFunctionBodyScope);
        builder.events.push(Event::ExitFunctionScope);
        builder.exits += 2;
      }
      _ => {
        builder.events.push(Event::EnterArrowScope);
        builder.enters += 1;
        gen_statements(rng, builder, depth - 1);
        builder.events.push(Event::ExitArrowScope);
        builder.exits += 1;
      }
    }
  }
}

fn gen_stream(seed: u64) -> StreamBuilder {
  let mut rng = Lcg(seed);
  let mut builder = StreamBuilder::new();
  gen_statements(&mut rng, &mut builder, 3);
  builder.events.push(Event::EndOfModule);
  builder
}

fn run(events: &[Event<'static>], globals: &GlobalDeclaredSet) -> Vec<Diag> {
  let mut collector = DiagCollector::new();
  analyze_events(
    events.iter().copied(),
    &mut collector,
    globals,
    VarOptions::typescript(),
  );
  collector.diags
}

#[test]
fn generated_streams_are_balanced() {
  for seed in 0..200 {
    let builder = gen_stream(seed);
    assert_eq!(builder.enters, builder.exits, "seed {seed}");
  }
}

#[test]
fn analysis_is_deterministic() {
  let globals = default_globals();
  for seed in 0..200 {
    let builder = gen_stream(seed);
    let first = run(&builder.events, &globals);
    let second = run(&builder.events, &globals);
    assert_eq!(first, second, "seed {seed}");
  }
}

#[test]
fn re_adding_a_global_with_same_properties_changes_nothing() {
  let globals = default_globals();
  let mut extended = globals.clone();
  extended.add_global("Array", GlobalFlags::default());
  extended.add_global("console", GlobalFlags::default());
  for seed in 0..100 {
    let builder = gen_stream(seed);
    assert_eq!(
      run(&builder.events, &globals),
      run(&builder.events, &extended),
      "seed {seed}"
    );
  }
}

#[test]
fn diagnostic_spans_lie_within_the_source_range() {
  let globals = default_globals();
  for seed in 0..200 {
    let builder = gen_stream(seed);
    let len = builder.source_len();
    for diag in run(&builder.events, &globals) {
      let span = diag.primary_span();
      assert!(
        span.start <= span.end && span.end <= len,
        "seed {seed}: span {span:?} outside 0..{len}"
      );
    }
  }
}

#[test]
fn duplicated_var_declaration_coalesces_without_new_diagnostics() {
  let globals = default_globals();
  for seed in 0..100 {
    let builder = gen_stream(seed);
    let Some(position) = builder.events.iter().position(|event| {
      matches!(
        event,
        Event::VariableDeclaration {
          kind: VariableKind::Var,
          ..
        }
      )
    }) else {
      continue;
    };
    let mut duplicated = builder.events.clone();
    duplicated.insert(position + 1, builder.events[position]);
    assert_eq!(
      run(&builder.events, &globals),
      run(&duplicated, &globals),
      "seed {seed}"
    );
  }
}

#[test]
fn var_hoists_to_function_scope_from_any_block_depth() {
  for seed in 0..50u64 {
    let mut rng = Lcg(seed);
    let depth = rng.next_usize(4) + 1;
    let kind = if rng.next_usize(2) == 0 {
      VariableKind::Var
    } else {
      VariableKind::Function
    };

    let mut events = vec![
      Event::EnterFunctionScope,
      Event::EnterFunctionBodyScope,
      Event::VariableUse {
        ident: Identifier::at("x", 0),
      },
    ];
    for _ in 0..depth {
      events.push(Event::EnterBlockScope);
    }
    events.push(Event::VariableDeclaration {
      ident: Identifier::at("x", 10),
      kind,
      flags: DeclFlags::default(),
    });
    for _ in 0..depth {
      events.push(Event::ExitBlockScope);
    }
    events.push(Event::ExitFunctionScope);
    events.push(Event::EndOfModule);

    let globals = default_globals();
    for diag in run(&events, &globals) {
      assert!(
        !matches!(
          diag,
          Diag::UseOfUndeclaredVariable { .. } | Diag::VariableUsedBeforeDeclaration { .. }
        ),
        "seed {seed}: hoisted {kind} produced {diag:?}"
      );
    }
  }
}

#[test]
fn value_and_type_name_spaces_do_not_satisfy_each_other() {
  let globals = default_globals();

  for kind in [VariableKind::Let, VariableKind::Const, VariableKind::Var] {
    let events = [
      Event::VariableDeclaration {
        ident: Identifier::at("n", 0),
        kind,
        flags: DeclFlags::default(),
      },
      Event::VariableTypeUse {
        ident: Identifier::at("n", 10),
      },
      Event::EndOfModule,
    ];
    let diags = run(&events, &globals);
    assert!(
      diags
        .iter()
        .any(|d| matches!(d, Diag::UseOfUndeclaredType { .. })),
      "{kind}: {diags:?}"
    );
  }

  for kind in [VariableKind::Interface, VariableKind::TypeAlias] {
    let events = [
      Event::VariableDeclaration {
        ident: Identifier::at("n", 0),
        kind,
        flags: DeclFlags::default(),
      },
      Event::VariableUse {
        ident: Identifier::at("n", 10),
      },
      Event::EndOfModule,
    ];
    let diags = run(&events, &globals);
    assert!(
      diags
        .iter()
        .any(|d| matches!(d, Diag::UseOfUndeclaredVariable { .. })),
      "{kind}: {diags:?}"
    );
  }

  for kind in [
    VariableKind::Class,
    VariableKind::Enum,
    VariableKind::Namespace,
    VariableKind::Import,
  ] {
    let events = [
      Event::VariableDeclaration {
        ident: Identifier::at("n", 0),
        kind,
        flags: DeclFlags::default(),
      },
      Event::VariableUse {
        ident: Identifier::at("n", 10),
      },
      Event::VariableTypeUse {
        ident: Identifier::at("n", 20),
      },
      Event::EndOfModule,
    ];
    assert_eq!(run(&events, &globals), [], "{kind}");
  }
}

#[test]
fn generic_parameters_are_visible_inside_their_function_only() {
  let globals = default_globals();
  let events = [
    Event::EnterFunctionScope,
    Event::VariableDeclaration {
      ident: Identifier::at("T", 0),
      kind: VariableKind::GenericParameter,
      flags: DeclFlags::default(),
    },
    Event::EnterFunctionBodyScope,
    Event::VariableTypeUse {
      ident: Identifier::at("T", 10),
    },
    Event::ExitFunctionBodyScope,
    Event::ExitFunctionScope,
    Event::VariableTypeUse {
      ident: Identifier::at("T", 20),
    },
    Event::EndOfModule,
  ];
  let diags = run(&events, &globals);
  assert_eq!(
    diags,
    [Diag::UseOfUndeclaredType {
      name: diagnostics::TextRange::new(20, 21),
    }]
  );
}
