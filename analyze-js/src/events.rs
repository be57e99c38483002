//! The parser → analyzer event ABI.
//!
//! [`Event`] fixes the vocabulary an event source must speak: one variant per
//! analyzer visit operation, emitted in depth-first syntactic order, every
//! `Enter*` paired with its `Exit*`, `EndOfModule` terminal. [`VariableAnalyzer::visit`]
//! is the thin translator from the serialized form into analyzer calls;
//! [`analyze_events`] replays a whole stream.

use crate::analyzer::VariableAnalyzer;
use crate::diag::DiagReporter;
use crate::globals::GlobalDeclaredSet;
use crate::ident::Identifier;
use crate::language::DeclFlags;
use crate::language::VarOptions;
use crate::language::VariableKind;
use diagnostics::TextRange;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event<'a> {
  VariableDeclaration {
    ident: Identifier<'a>,
    kind: VariableKind,
    flags: DeclFlags,
  },
  VariableUse {
    ident: Identifier<'a>,
  },
  VariableTypeUse {
    ident: Identifier<'a>,
  },
  VariableAssignment {
    ident: Identifier<'a>,
  },
  VariableExportUse {
    ident: Identifier<'a>,
  },
  VariableDeleteUse {
    ident: Identifier<'a>,
    keyword_span: TextRange,
  },
  VariableTypePredicateUse {
    ident: Identifier<'a>,
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

impl<'a, 'r> VariableAnalyzer<'a, 'r> {
  /// Applies one event.
  pub fn visit(&mut self, event: Event<'a>) {
    match event {
      Event::VariableDeclaration { ident, kind, flags } => {
        self.visit_variable_declaration(ident, kind, flags)
      }
      Event::VariableUse { ident } => self.visit_variable_use(ident),
      Event::VariableTypeUse { ident } => self.visit_variable_type_use(ident),
      Event::VariableAssignment { ident } => self.visit_variable_assignment(ident),
      Event::VariableExportUse { ident } => self.visit_variable_export_use(ident),
      Event::VariableDeleteUse {
        ident,
        keyword_span,
      } => self.visit_variable_delete_use(ident, keyword_span),
      Event::VariableTypePredicateUse { ident } => self.visit_variable_type_predicate_use(ident),
      Event::EnterArrowScope => self.visit_enter_arrow_scope(),
      Event::ExitArrowScope => self.visit_exit_arrow_scope(),
      Event::EnterBlockScope => self.visit_enter_block_scope(),
      Event::ExitBlockScope => self.visit_exit_block_scope(),
      Event::EnterClassScope => self.visit_enter_class_scope(),
      Event::ExitClassScope => self.visit_exit_class_scope(),
      Event::EnterClassBodyScope => self.visit_enter_class_body_scope(),
      Event::ExitClassBodyScope => self.visit_exit_class_body_scope(),
      Event::EnterConditionalTypeScope => self.visit_enter_conditional_type_scope(),
      Event::ExitConditionalTypeScope => self.visit_exit_conditional_type_scope(),
      Event::EnterForScope => self.visit_enter_for_scope(),
      Event::ExitForScope => self.visit_exit_for_scope(),
      Event::EnterFunctionScope => self.visit_enter_function_scope(),
      Event::ExitFunctionScope => self.visit_exit_function_scope(),
      Event::EnterFunctionBodyScope => self.visit_enter_function_body_scope(),
      Event::ExitFunctionBodyScope => self.visit_exit_function_body_scope(),
      Event::EnterInterfaceScope => self.visit_enter_interface_scope(),
      Event::ExitInterfaceScope => self.visit_exit_interface_scope(),
      Event::EnterNamespaceScope => self.visit_enter_namespace_scope(),
      Event::ExitNamespaceScope => self.visit_exit_namespace_scope(),
      Event::EnterWithScope => self.visit_enter_with_scope(),
      Event::ExitWithScope => self.visit_exit_with_scope(),
      Event::EndOfModule => self.visit_end_of_module(),
    }
  }
}

/// Replays an event stream through a fresh analyzer.
pub fn analyze_events<'a>(
  events: impl IntoIterator<Item = Event<'a>>,
  reporter: &mut dyn DiagReporter,
  globals: &GlobalDeclaredSet,
  options: VarOptions,
) {
  let mut analyzer = VariableAnalyzer::new(reporter, globals, options);
  for event in events {
    analyzer.visit(event);
  }
}
