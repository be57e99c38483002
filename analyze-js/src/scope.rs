//! Lexical scopes and the scope stack.
//!
//! A [`Scope`] is the working set for one lexical region: the declarations
//! made in it (a name may carry several, subject to the redeclaration rules)
//! and the uses that have not been resolved yet. Scopes never point at each
//! other; at scope exit the analyzer drains the pending uses into the parent
//! by move and lets the scope drop.
//!
//! Declaration tables are `BTreeMap`s so any iteration over them is
//! deterministic.

use crate::ident::Identifier;
use crate::language::DeclFlags;
use crate::language::UseKind;
use crate::language::VariableKind;
use diagnostics::TextRange;
use std::collections::BTreeMap;

/// Where a declaration sits relative to the scope that now holds it.
///
/// `var` and `function` declarations hoisted out of an exited block arrive in
/// the parent tagged `DescendantScope`; some rules (block-function conflicts,
/// call-before-declaration) key off this.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeclaredScope {
  CurrentScope,
  DescendantScope,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Declaration<'a> {
  pub ident: Identifier<'a>,
  pub kind: VariableKind,
  pub flags: DeclFlags,
  pub scope: DeclaredScope,
  /// Monotone event index; compares as "textually precedes" for streams
  /// emitted in depth-first syntactic order.
  pub index: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Use<'a> {
  pub ident: Identifier<'a>,
  pub kind: UseKind,
  /// Span of the `delete` keyword for [`UseKind::Delete`] uses.
  pub delete_keyword: Option<TextRange>,
  pub index: u32,
  pub crossed_function_boundary: bool,
  pub crossed_with_scope: bool,
}

/// The structural category of a scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeKind {
  Module,
  Function,
  FunctionBody,
  Block,
  For,
  Class,
  ClassBody,
  Interface,
  Namespace,
  With,
  ConditionalType,
  Arrow,
}

impl ScopeKind {
  /// Function boundaries stop temporal-dead-zone reporting and type-predicate
  /// propagation.
  pub fn is_function_boundary(self) -> bool {
    matches!(self, ScopeKind::Function | ScopeKind::Arrow)
  }

  /// Scopes in which `var` declarations come to rest.
  pub fn allows_var_hoist(self) -> bool {
    matches!(
      self,
      ScopeKind::Module | ScopeKind::FunctionBody | ScopeKind::Arrow | ScopeKind::Namespace
    )
  }

  /// Scopes whose `var`/`function` declarations continue into the parent when
  /// the scope exits.
  pub fn leaks_hoistable_declarations(self) -> bool {
    matches!(self, ScopeKind::Block | ScopeKind::For | ScopeKind::With)
  }
}

impl Default for ScopeKind {
  fn default() -> Self {
    ScopeKind::Module
  }
}

#[derive(Debug, Default)]
pub struct Scope<'a> {
  pub kind: ScopeKind,
  pub declarations: BTreeMap<&'a str, Vec<Declaration<'a>>>,
  pub pending_uses: Vec<Use<'a>>,
}

impl<'a> Scope<'a> {
  pub fn new(kind: ScopeKind) -> Self {
    Self {
      kind,
      declarations: BTreeMap::new(),
      pending_uses: Vec::new(),
    }
  }

  pub fn declarations_of(&self, name: &str) -> &[Declaration<'a>] {
    self.declarations.get(name).map_or(&[], Vec::as_slice)
  }

  pub fn add_declaration(&mut self, declaration: Declaration<'a>) {
    self
      .declarations
      .entry(declaration.ident.text())
      .or_default()
      .push(declaration);
  }

  pub fn is_function_boundary(&self) -> bool {
    self.kind.is_function_boundary()
  }

  pub fn allows_var_hoist(&self) -> bool {
    self.kind.allows_var_hoist()
  }
}

/// Stack discipline over scopes; the module scope is the root and the leaf is
/// on top. Never empty during analysis.
#[derive(Debug)]
pub struct ScopeStack<'a> {
  scopes: Vec<Scope<'a>>,
}

impl<'a> ScopeStack<'a> {
  pub fn new() -> Self {
    Self {
      scopes: vec![Scope::new(ScopeKind::Module)],
    }
  }

  pub fn push(&mut self, kind: ScopeKind) {
    self.scopes.push(Scope::new(kind));
  }

  /// Pops the leaf scope. Returns `None` instead of popping the module root.
  pub fn pop(&mut self) -> Option<Scope<'a>> {
    if self.scopes.len() > 1 {
      self.scopes.pop()
    } else {
      None
    }
  }

  pub fn current(&self) -> &Scope<'a> {
    self.scopes.last().expect("scope stack is never empty")
  }

  pub fn current_mut(&mut self) -> &mut Scope<'a> {
    self.scopes.last_mut().expect("scope stack is never empty")
  }

  pub fn current_kind(&self) -> ScopeKind {
    self.current().kind
  }

  /// The nearest enclosing function-boundary scope, if any.
  pub fn enclosing_function(&self) -> Option<&Scope<'a>> {
    self.scopes.iter().rev().find(|s| s.is_function_boundary())
  }

  pub fn module(&self) -> &Scope<'a> {
    &self.scopes[0]
  }

  pub fn depth(&self) -> usize {
    self.scopes.len()
  }
}

impl Default for ScopeStack<'_> {
  fn default() -> Self {
    Self::new()
  }
}
