//! The event-driven variable analyzer.
//!
//! The analyzer consumes the visit events a parser emits during a depth-first
//! walk of one module and reports binding, mutability, and name-space
//! violations. It is strictly single-threaded, never rejects an event stream,
//! and keeps going after every diagnostic under the most permissive
//! interpretation of the program.
//!
//! Resolution is deliberately lazy. A use is only recorded when visited; all
//! matching happens when its scope exits, because a declaration that hoists
//! over the use may not have been visited yet. Uses that do not resolve in the
//! exiting scope move to the parent scope's pending list, picking up marks
//! when they cross function or `with` boundaries; whatever is still pending
//! when the module ends resolves against the global declared set.

use crate::diag::Diag;
use crate::diag::DiagReporter;
use crate::globals::GlobalDeclaredSet;
use crate::ident::Identifier;
use crate::language::BlockFunctionHoisting;
use crate::language::DeclFlags;
use crate::language::UseKind;
use crate::language::VarOptions;
use crate::language::VariableKind;
use crate::scope::DeclaredScope;
use crate::scope::Declaration;
use crate::scope::Scope;
use crate::scope::ScopeKind;
use crate::scope::ScopeStack;
use crate::scope::Use;
use diagnostics::TextRange;
use std::collections::BTreeMap;

pub struct VariableAnalyzer<'a, 'r> {
  reporter: &'r mut dyn DiagReporter,
  globals: &'r GlobalDeclaredSet,
  options: VarOptions,
  scopes: ScopeStack<'a>,
  next_index: u32,
  reported_internal_error: bool,
}

enum MatchOutcome {
  Resolved,
  ResolvedWithDiag(Diag),
  Unmatched,
}

impl<'a, 'r> VariableAnalyzer<'a, 'r> {
  pub fn new(
    reporter: &'r mut dyn DiagReporter,
    globals: &'r GlobalDeclaredSet,
    options: VarOptions,
  ) -> Self {
    Self {
      reporter,
      globals,
      options,
      scopes: ScopeStack::new(),
      next_index: 0,
      reported_internal_error: false,
    }
  }

  // Declarations and uses.

  pub fn visit_variable_declaration(
    &mut self,
    ident: Identifier<'a>,
    kind: VariableKind,
    flags: DeclFlags,
  ) {
    let index = self.bump_index();

    if self.scopes.current_kind() == ScopeKind::Module && kind.is_strict() {
      if self.global_is_unshadowable(ident.text()) {
        self.reporter.report(Diag::RedeclarationOfGlobalVariable {
          redeclaration: ident.span(),
        });
      }
    }

    let incoming_scope = DeclaredScope::CurrentScope;
    let mut original = self.first_conflict(self.scopes.current(), ident.text(), kind, incoming_scope);
    if original.is_none() && self.scopes.current_kind() == ScopeKind::FunctionBody {
      // Parameters and generic parameters live in the function scope directly
      // above the body; a strict declaration at body top level collides with
      // them as if they shared one scope.
      if let Some(function_scope) = self.scopes.enclosing_function() {
        original = self.first_conflict(function_scope, ident.text(), kind, incoming_scope);
      }
    }
    if let Some(original_declaration) = original {
      self.reporter.report(Diag::RedeclarationOfVariable {
        redeclaration: ident.span(),
        original_declaration,
      });
    }

    self.scopes.current_mut().add_declaration(Declaration {
      ident,
      kind,
      flags,
      scope: incoming_scope,
      index,
    });
  }

  pub fn visit_variable_use(&mut self, ident: Identifier<'a>) {
    self.record_use(ident, UseKind::Value, None);
  }

  pub fn visit_variable_type_use(&mut self, ident: Identifier<'a>) {
    self.record_use(ident, UseKind::Type, None);
  }

  pub fn visit_variable_assignment(&mut self, ident: Identifier<'a>) {
    self.record_use(ident, UseKind::Assignment, None);
  }

  pub fn visit_variable_export_use(&mut self, ident: Identifier<'a>) {
    self.record_use(ident, UseKind::Export, None);
  }

  pub fn visit_variable_delete_use(&mut self, ident: Identifier<'a>, keyword_span: TextRange) {
    self.record_use(ident, UseKind::Delete, Some(keyword_span));
  }

  pub fn visit_variable_type_predicate_use(&mut self, ident: Identifier<'a>) {
    self.record_use(ident, UseKind::TypePredicate, None);
  }

  // Scope events.

  pub fn visit_enter_block_scope(&mut self) {
    self.scopes.push(ScopeKind::Block);
  }

  pub fn visit_exit_block_scope(&mut self) {
    self.exit_scope(ScopeKind::Block);
  }

  pub fn visit_enter_with_scope(&mut self) {
    self.scopes.push(ScopeKind::With);
  }

  pub fn visit_exit_with_scope(&mut self) {
    self.exit_scope(ScopeKind::With);
  }

  pub fn visit_enter_function_scope(&mut self) {
    self.scopes.push(ScopeKind::Function);
  }

  pub fn visit_enter_function_body_scope(&mut self) {
    self.scopes.push(ScopeKind::FunctionBody);
  }

  pub fn visit_exit_function_body_scope(&mut self) {
    self.exit_scope(ScopeKind::FunctionBody);
  }

  /// Exits the function scope. A still-open function body scope is drained
  /// first: parsers may close parameters and body with one exit event.
  pub fn visit_exit_function_scope(&mut self) {
    if self.scopes.current_kind() == ScopeKind::FunctionBody && self.scopes.depth() > 2 {
      self.exit_scope(ScopeKind::FunctionBody);
    }
    self.exit_scope(ScopeKind::Function);
  }

  pub fn visit_enter_arrow_scope(&mut self) {
    self.scopes.push(ScopeKind::Arrow);
  }

  pub fn visit_exit_arrow_scope(&mut self) {
    self.exit_scope(ScopeKind::Arrow);
  }

  pub fn visit_enter_class_scope(&mut self) {
    self.scopes.push(ScopeKind::Class);
  }

  pub fn visit_enter_class_body_scope(&mut self) {
    self.scopes.push(ScopeKind::ClassBody);
  }

  pub fn visit_exit_class_body_scope(&mut self) {
    self.exit_scope(ScopeKind::ClassBody);
  }

  pub fn visit_exit_class_scope(&mut self) {
    if self.scopes.current_kind() == ScopeKind::ClassBody && self.scopes.depth() > 2 {
      self.exit_scope(ScopeKind::ClassBody);
    }
    self.exit_scope(ScopeKind::Class);
  }

  pub fn visit_enter_interface_scope(&mut self) {
    self.scopes.push(ScopeKind::Interface);
  }

  pub fn visit_exit_interface_scope(&mut self) {
    self.exit_scope(ScopeKind::Interface);
  }

  pub fn visit_enter_namespace_scope(&mut self) {
    self.scopes.push(ScopeKind::Namespace);
  }

  pub fn visit_exit_namespace_scope(&mut self) {
    self.exit_scope(ScopeKind::Namespace);
  }

  pub fn visit_enter_conditional_type_scope(&mut self) {
    self.scopes.push(ScopeKind::ConditionalType);
  }

  pub fn visit_exit_conditional_type_scope(&mut self) {
    self.exit_scope(ScopeKind::ConditionalType);
  }

  pub fn visit_enter_for_scope(&mut self) {
    self.scopes.push(ScopeKind::For);
  }

  pub fn visit_exit_for_scope(&mut self) {
    self.exit_scope(ScopeKind::For);
  }

  /// Finalizes the module: remaining pending uses resolve against the global
  /// declared set.
  pub fn visit_end_of_module(&mut self) {
    while self.scopes.depth() > 1 {
      self.report_internal_error();
      let scope = self.scopes.pop().expect("depth checked above");
      self.resolve_scope_into_parent(scope);
    }
    let module = std::mem::replace(self.scopes.current_mut(), Scope::new(ScopeKind::Module));
    let Scope {
      kind: _,
      declarations,
      pending_uses,
    } = module;
    for use_ in pending_uses {
      match self.match_use(&declarations, &use_) {
        MatchOutcome::Resolved => {}
        MatchOutcome::ResolvedWithDiag(diag) => self.reporter.report(diag),
        MatchOutcome::Unmatched => self.resolve_against_globals(&use_),
      }
    }
  }

  // Internals.

  fn bump_index(&mut self) -> u32 {
    let index = self.next_index;
    self.next_index += 1;
    index
  }

  fn record_use(&mut self, ident: Identifier<'a>, kind: UseKind, delete_keyword: Option<TextRange>) {
    let index = self.bump_index();
    self.scopes.current_mut().pending_uses.push(Use {
      ident,
      kind,
      delete_keyword,
      index,
      crossed_function_boundary: false,
      crossed_with_scope: false,
    });
  }

  fn global_is_unshadowable(&self, name: &str) -> bool {
    if let Some(flags) = self.globals.find(name) {
      if !flags.shadowable {
        return true;
      }
      if self.options.strict && matches!(name, "eval" | "arguments") {
        return true;
      }
    }
    false
  }

  fn first_conflict(
    &self,
    scope: &Scope<'a>,
    name: &str,
    incoming_kind: VariableKind,
    incoming_scope: DeclaredScope,
  ) -> Option<TextRange> {
    scope
      .declarations_of(name)
      .iter()
      .find(|existing| {
        declarations_conflict(
          existing,
          incoming_kind,
          incoming_scope,
          self.options.block_function_hoisting,
        )
      })
      .map(|existing| existing.ident.span())
  }

  fn exit_scope(&mut self, expected: ScopeKind) {
    if self.scopes.current_kind() != expected || self.scopes.depth() == 1 {
      self.report_internal_error();
      return;
    }
    let scope = self.scopes.pop().expect("non-module scope present");
    self.resolve_scope_into_parent(scope);
  }

  /// Scope-exit semantics: match pending uses against the exiting scope,
  /// move unresolved ones into the parent, then hoist `var`/`function`
  /// declarations upward if the scope kind leaks them. The scope is dropped
  /// afterwards; nothing retains a reference to it.
  fn resolve_scope_into_parent(&mut self, scope: Scope<'a>) {
    let Scope {
      kind,
      declarations,
      pending_uses,
    } = scope;
    let is_function_boundary = kind.is_function_boundary();
    let is_with = kind == ScopeKind::With;

    for use_ in pending_uses {
      match self.match_use(&declarations, &use_) {
        MatchOutcome::Resolved => {}
        MatchOutcome::ResolvedWithDiag(diag) => self.reporter.report(diag),
        MatchOutcome::Unmatched => {
          if is_function_boundary && use_.kind == UseKind::TypePredicate {
            // The referenced parameter must belong to this function; do not
            // look further up.
            self.reporter.report(Diag::UseOfUndeclaredParameterInTypePredicate {
              name: use_.ident.span(),
            });
            continue;
          }
          let mut use_ = use_;
          use_.crossed_function_boundary |= is_function_boundary;
          use_.crossed_with_scope |= is_with;
          self.scopes.current_mut().pending_uses.push(use_);
        }
      }
    }

    if kind.leaks_hoistable_declarations() {
      for (_, decls) in declarations {
        let catch_bound = decls.iter().any(|d| d.kind == VariableKind::Catch);
        for decl in decls {
          if !decl.kind.is_block_hoisted() {
            continue;
          }
          if decl.kind == VariableKind::Var && catch_bound {
            // Legacy catch/var aliasing: the var binds the catch parameter
            // and goes no further.
            continue;
          }
          self.hoist_into_current(decl);
        }
      }
    }
  }

  fn hoist_into_current(&mut self, mut decl: Declaration<'a>) {
    decl.scope = DeclaredScope::DescendantScope;
    let original = self.first_conflict(
      self.scopes.current(),
      decl.ident.text(),
      decl.kind,
      decl.scope,
    );
    if let Some(original_declaration) = original {
      self.reporter.report(Diag::RedeclarationOfVariable {
        redeclaration: decl.ident.span(),
        original_declaration,
      });
    }
    self.scopes.current_mut().add_declaration(decl);
  }

  fn match_use(
    &self,
    declarations: &BTreeMap<&'a str, Vec<Declaration<'a>>>,
    use_: &Use<'a>,
  ) -> MatchOutcome {
    let Some(decls) = declarations.get(use_.ident.text()) else {
      return MatchOutcome::Unmatched;
    };
    let mut first_diag = None;
    let mut matched = false;
    for decl in decls {
      let applicable = match use_.kind {
        UseKind::Value | UseKind::Assignment | UseKind::Delete => decl.kind.declares_value(),
        UseKind::Type => decl.kind.declares_type(),
        UseKind::Export => true,
        UseKind::TypePredicate => decl.kind.is_runtime_parameter(),
      };
      if !applicable {
        continue;
      }
      matched = true;
      match self.diag_for_match(decl, use_) {
        None => return MatchOutcome::Resolved,
        Some(diag) => {
          first_diag.get_or_insert(diag);
        }
      }
    }
    if !matched {
      return MatchOutcome::Unmatched;
    }
    match first_diag {
      Some(diag) => MatchOutcome::ResolvedWithDiag(diag),
      None => MatchOutcome::Resolved,
    }
  }

  fn diag_for_match(&self, decl: &Declaration<'a>, use_: &Use<'a>) -> Option<Diag> {
    // Crossing a function boundary clears dead-zone reporting: a nested
    // function can run after the whole outer scope is initialized.
    let before = use_.index < decl.index && !use_.crossed_function_boundary;
    match use_.kind {
      UseKind::Value => {
        if use_.crossed_with_scope {
          return None;
        }
        if decl.kind == VariableKind::Function
          && decl.scope == DeclaredScope::DescendantScope
          && before
          && self.options.block_function_hoisting == BlockFunctionHoisting::Strict
        {
          return Some(Diag::FunctionCallBeforeDeclarationInBlockScope {
            use_site: use_.ident.span(),
            declaration: decl.ident.span(),
          });
        }
        if decl.kind.has_value_tdz() && before {
          return Some(Diag::VariableUsedBeforeDeclaration {
            use_site: use_.ident.span(),
            declaration: decl.ident.span(),
          });
        }
        None
      }
      UseKind::Type => {
        if decl.kind.has_type_tdz() && before {
          return Some(Diag::VariableUsedBeforeDeclaration {
            use_site: use_.ident.span(),
            declaration: decl.ident.span(),
          });
        }
        None
      }
      UseKind::Assignment => {
        if use_.crossed_with_scope {
          return None;
        }
        if decl.kind.is_import() {
          return Some(Diag::AssignmentToImportedVariable {
            assignment: use_.ident.span(),
            declaration: decl.ident.span(),
            var_kind: decl.kind,
          });
        }
        if decl.kind.is_immutable() {
          return Some(if before {
            Diag::AssignmentToConstVariableBeforeItsDeclaration {
              assignment: use_.ident.span(),
              declaration: decl.ident.span(),
            }
          } else {
            Diag::AssignmentToConstVariable {
              assignment: use_.ident.span(),
              declaration: decl.ident.span(),
              var_kind: decl.kind,
            }
          });
        }
        if decl.kind.has_value_tdz() && before {
          return Some(Diag::AssignmentBeforeVariableDeclaration {
            assignment: use_.ident.span(),
            declaration: decl.ident.span(),
          });
        }
        None
      }
      UseKind::Delete => {
        if use_.crossed_with_scope {
          return None;
        }
        let keyword = use_.delete_keyword.unwrap_or_else(|| use_.ident.span());
        Some(Diag::RedundantDeleteStatementOnVariable {
          delete_expression: keyword.cover(use_.ident.span()),
        })
      }
      UseKind::Export | UseKind::TypePredicate => None,
    }
  }

  fn resolve_against_globals(&mut self, use_: &Use<'a>) {
    let flags = self.globals.find(use_.ident.text());
    match use_.kind {
      UseKind::Value => {
        let satisfied = flags.is_some_and(|f| !f.type_only);
        if !satisfied && !use_.crossed_with_scope {
          self.reporter.report(Diag::UseOfUndeclaredVariable {
            name: use_.ident.span(),
          });
        }
      }
      UseKind::Type => {
        if flags.is_none() {
          self.reporter.report(Diag::UseOfUndeclaredType {
            name: use_.ident.span(),
          });
        }
      }
      UseKind::Assignment => {
        let satisfied = flags.is_some_and(|f| f.writable && !f.type_only);
        if !satisfied && !use_.crossed_with_scope {
          self.reporter.report(Diag::AssignmentToUndeclaredVariable {
            assignment: use_.ident.span(),
          });
        }
      }
      UseKind::Export => {
        if flags.is_none() && !use_.crossed_with_scope {
          self.reporter.report(Diag::UseOfUndeclaredVariable {
            name: use_.ident.span(),
          });
        }
      }
      UseKind::Delete => {
        if flags.is_some() && !use_.crossed_with_scope {
          let keyword = use_.delete_keyword.unwrap_or_else(|| use_.ident.span());
          self.reporter.report(Diag::RedundantDeleteStatementOnVariable {
            delete_expression: keyword.cover(use_.ident.span()),
          });
        }
      }
      UseKind::TypePredicate => {
        self.reporter.report(Diag::UseOfUndeclaredParameterInTypePredicate {
          name: use_.ident.span(),
        });
      }
    }
  }

  fn report_internal_error(&mut self) {
    debug_assert!(false, "unbalanced scope events");
    if !self.reported_internal_error {
      self.reported_internal_error = true;
      self.reporter.report(Diag::InternalError {
        span: TextRange::empty(0),
      });
    }
  }
}

/// Whether declaring `incoming_kind` where `existing` is already declared is a
/// redeclaration error.
///
/// The later arrival is always the reported `redeclaration`; `existing` the
/// `original_declaration`. The order of the checks matters: exemptions
/// (block-hoisted functions, catch/var aliasing, declaration merging) are
/// decided before the general name-space-overlap rule.
fn declarations_conflict(
  existing: &Declaration<'_>,
  incoming_kind: VariableKind,
  incoming_scope: DeclaredScope,
  hoisting: BlockFunctionHoisting,
) -> bool {
  use VariableKind::*;

  let descendant_function = |kind: VariableKind, scope: DeclaredScope| {
    kind == Function && scope == DeclaredScope::DescendantScope
  };
  // A function declaration does not hoist past its block for redeclaration
  // purposes under strict block-function hoisting.
  if hoisting == BlockFunctionHoisting::Strict
    && (descendant_function(existing.kind, existing.scope)
      || descendant_function(incoming_kind, incoming_scope))
  {
    return false;
  }

  let e = existing.kind;
  let i = incoming_kind;

  if e.is_block_hoisted() && i.is_block_hoisted() {
    return false;
  }
  if e.is_import() || i.is_import() {
    let other = if e.is_import() { i } else { e };
    return other != Interface;
  }
  if e == Catch || i == Catch {
    let other = if e == Catch { i } else { e };
    if other == Var {
      return false;
    }
    return other.declares_value();
  }
  if e.is_runtime_parameter() || i.is_runtime_parameter() {
    let other = if e.is_runtime_parameter() { i } else { e };
    if other.is_runtime_parameter() || other.is_block_hoisted() {
      return false;
    }
    // A strict declaration in the same scope as a parameter falls through to
    // the name-space rule.
  }
  if (e == Class && i == Interface) || (e == Interface && i == Class) {
    return false;
  }
  if e == Interface && i == Interface {
    return false;
  }
  if e == InferType && i == InferType {
    return false;
  }
  if e.is_type_parameter() || i.is_type_parameter() {
    let other = if e.is_type_parameter() { i } else { e };
    return other.declares_type();
  }
  if e == TypeAlias || i == TypeAlias {
    let other = if e == TypeAlias { i } else { e };
    return other.declares_type();
  }

  let value_overlap = e.declares_value() && i.declares_value();
  let type_overlap = e.declares_type() && i.declares_type();
  (value_overlap || type_overlap) && (e.is_strict() || i.is_strict())
}
