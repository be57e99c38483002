//! The analyzer's diagnostic vocabulary.
//!
//! [`Diag`] is a closed sum type: one variant per reportable condition, with
//! named span fields pointing at the participating source ranges. Keeping the
//! set closed lets every consumer match totally, and `to_diagnostic` lowers a
//! variant into the shared [`diagnostics::Diagnostic`] shape for rendering.
//!
//! The `GEN*`-coded variants are structural TypeScript findings produced by
//! the upstream parser while reading generic parameter lists; they flow
//! through the same sink so the taxonomy lives in one place.

use crate::language::VariableKind;
use diagnostics::Diagnostic;
use diagnostics::FileId;
use diagnostics::Label;
use diagnostics::Severity;
use diagnostics::Span;
use diagnostics::TextRange;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Diag {
  AssignmentBeforeVariableDeclaration {
    assignment: TextRange,
    declaration: TextRange,
  },
  AssignmentToConstVariable {
    assignment: TextRange,
    declaration: TextRange,
    var_kind: VariableKind,
  },
  AssignmentToConstVariableBeforeItsDeclaration {
    assignment: TextRange,
    declaration: TextRange,
  },
  AssignmentToImportedVariable {
    assignment: TextRange,
    declaration: TextRange,
    var_kind: VariableKind,
  },
  AssignmentToUndeclaredVariable {
    assignment: TextRange,
  },
  CommaNotAllowedBeforeFirstGenericParameter {
    unexpected_comma: TextRange,
  },
  FunctionCallBeforeDeclarationInBlockScope {
    use_site: TextRange,
    declaration: TextRange,
  },
  GenericParameterListIsEmpty {
    expected_parameter: TextRange,
  },
  GenericsNotAllowedInJavascript {
    opening_less: TextRange,
  },
  InternalError {
    span: TextRange,
  },
  MissingCommaBetweenGenericParameters {
    expected_comma: TextRange,
  },
  MultipleCommasInGenericParameterList {
    unexpected_comma: TextRange,
  },
  RedeclarationOfGlobalVariable {
    redeclaration: TextRange,
  },
  RedeclarationOfVariable {
    redeclaration: TextRange,
    original_declaration: TextRange,
  },
  RedundantDeleteStatementOnVariable {
    delete_expression: TextRange,
  },
  RequiresSpaceBetweenGreaterAndEqual {
    squiggle: TextRange,
  },
  UnexpectedColonAfterGenericDefinition {
    colon: TextRange,
  },
  UseOfUndeclaredParameterInTypePredicate {
    name: TextRange,
  },
  UseOfUndeclaredType {
    name: TextRange,
  },
  UseOfUndeclaredVariable {
    name: TextRange,
  },
  VariableUsedBeforeDeclaration {
    use_site: TextRange,
    declaration: TextRange,
  },
  VarianceKeywordsInWrongOrder {
    in_keyword: TextRange,
    out_keyword: TextRange,
  },
}

impl Diag {
  pub fn code(&self) -> &'static str {
    match self {
      Diag::RedeclarationOfVariable { .. } => "VAR0001",
      Diag::RedeclarationOfGlobalVariable { .. } => "VAR0002",
      Diag::VariableUsedBeforeDeclaration { .. } => "VAR0003",
      Diag::UseOfUndeclaredVariable { .. } => "VAR0004",
      Diag::UseOfUndeclaredType { .. } => "VAR0005",
      Diag::UseOfUndeclaredParameterInTypePredicate { .. } => "VAR0006",
      Diag::AssignmentToConstVariable { .. } => "VAR0007",
      Diag::AssignmentToConstVariableBeforeItsDeclaration { .. } => "VAR0008",
      Diag::AssignmentToImportedVariable { .. } => "VAR0009",
      Diag::AssignmentBeforeVariableDeclaration { .. } => "VAR0010",
      Diag::AssignmentToUndeclaredVariable { .. } => "VAR0011",
      Diag::FunctionCallBeforeDeclarationInBlockScope { .. } => "VAR0012",
      Diag::RedundantDeleteStatementOnVariable { .. } => "VAR0013",
      Diag::InternalError { .. } => "VAR0014",
      Diag::GenericsNotAllowedInJavascript { .. } => "GEN0001",
      Diag::GenericParameterListIsEmpty { .. } => "GEN0002",
      Diag::CommaNotAllowedBeforeFirstGenericParameter { .. } => "GEN0003",
      Diag::MultipleCommasInGenericParameterList { .. } => "GEN0004",
      Diag::MissingCommaBetweenGenericParameters { .. } => "GEN0005",
      Diag::UnexpectedColonAfterGenericDefinition { .. } => "GEN0006",
      Diag::RequiresSpaceBetweenGreaterAndEqual { .. } => "GEN0007",
      Diag::VarianceKeywordsInWrongOrder { .. } => "GEN0008",
    }
  }

  pub fn severity(&self) -> Severity {
    match self {
      Diag::RedundantDeleteStatementOnVariable { .. }
      | Diag::FunctionCallBeforeDeclarationInBlockScope { .. } => Severity::Warning,
      _ => Severity::Error,
    }
  }

  pub fn primary_span(&self) -> TextRange {
    match *self {
      Diag::AssignmentBeforeVariableDeclaration { assignment, .. }
      | Diag::AssignmentToConstVariable { assignment, .. }
      | Diag::AssignmentToConstVariableBeforeItsDeclaration { assignment, .. }
      | Diag::AssignmentToImportedVariable { assignment, .. }
      | Diag::AssignmentToUndeclaredVariable { assignment } => assignment,
      Diag::CommaNotAllowedBeforeFirstGenericParameter { unexpected_comma }
      | Diag::MultipleCommasInGenericParameterList { unexpected_comma } => unexpected_comma,
      Diag::FunctionCallBeforeDeclarationInBlockScope { use_site, .. }
      | Diag::VariableUsedBeforeDeclaration { use_site, .. } => use_site,
      Diag::GenericParameterListIsEmpty { expected_parameter } => expected_parameter,
      Diag::GenericsNotAllowedInJavascript { opening_less } => opening_less,
      Diag::InternalError { span } => span,
      Diag::MissingCommaBetweenGenericParameters { expected_comma } => expected_comma,
      Diag::RedeclarationOfGlobalVariable { redeclaration }
      | Diag::RedeclarationOfVariable { redeclaration, .. } => redeclaration,
      Diag::RedundantDeleteStatementOnVariable { delete_expression } => delete_expression,
      Diag::RequiresSpaceBetweenGreaterAndEqual { squiggle } => squiggle,
      Diag::UnexpectedColonAfterGenericDefinition { colon } => colon,
      Diag::UseOfUndeclaredParameterInTypePredicate { name }
      | Diag::UseOfUndeclaredType { name }
      | Diag::UseOfUndeclaredVariable { name } => name,
      Diag::VarianceKeywordsInWrongOrder { in_keyword, .. } => in_keyword,
    }
  }

  pub fn message(&self) -> String {
    match self {
      Diag::AssignmentBeforeVariableDeclaration { .. } => {
        "assignment before variable declaration".into()
      }
      Diag::AssignmentToConstVariable { var_kind, .. } => {
        format!("assignment to {var_kind} variable")
      }
      Diag::AssignmentToConstVariableBeforeItsDeclaration { .. } => {
        "assignment to const variable before its declaration".into()
      }
      Diag::AssignmentToImportedVariable { .. } => "assignment to imported variable".into(),
      Diag::AssignmentToUndeclaredVariable { .. } => "assignment to undeclared variable".into(),
      Diag::CommaNotAllowedBeforeFirstGenericParameter { .. } => {
        "comma is not allowed before the first generic parameter".into()
      }
      Diag::FunctionCallBeforeDeclarationInBlockScope { .. } => {
        "function called before its declaration in block scope".into()
      }
      Diag::GenericParameterListIsEmpty { .. } => {
        "generic parameter list cannot be empty".into()
      }
      Diag::GenericsNotAllowedInJavascript { .. } => {
        "generics are a TypeScript feature, not allowed in JavaScript".into()
      }
      Diag::InternalError { .. } => "internal error in variable analysis".into(),
      Diag::MissingCommaBetweenGenericParameters { .. } => {
        "missing comma between generic parameters".into()
      }
      Diag::MultipleCommasInGenericParameterList { .. } => {
        "multiple commas are not allowed in a generic parameter list".into()
      }
      Diag::RedeclarationOfGlobalVariable { .. } => "redeclaration of global variable".into(),
      Diag::RedeclarationOfVariable { .. } => "redeclaration of variable".into(),
      Diag::RedundantDeleteStatementOnVariable { .. } => {
        "redundant delete statement on variable".into()
      }
      Diag::RequiresSpaceBetweenGreaterAndEqual { .. } => {
        "TypeScript requires a space between the '>' and '=' characters".into()
      }
      Diag::UnexpectedColonAfterGenericDefinition { .. } => {
        "unexpected ':' after generic parameter definition".into()
      }
      Diag::UseOfUndeclaredParameterInTypePredicate { .. } => {
        "type predicate references an undeclared parameter".into()
      }
      Diag::UseOfUndeclaredType { .. } => "use of undeclared type".into(),
      Diag::UseOfUndeclaredVariable { .. } => "use of undeclared variable".into(),
      Diag::VariableUsedBeforeDeclaration { .. } => "variable used before declaration".into(),
      Diag::VarianceKeywordsInWrongOrder { .. } => {
        "'out in' is not allowed; write 'in out' instead".into()
      }
    }
  }

  /// Lowers into the shared diagnostic shape, attaching related spans as
  /// secondary labels.
  pub fn to_diagnostic(&self, file: FileId) -> Diagnostic {
    let primary = Span::new(file, self.primary_span());
    let mut diagnostic = Diagnostic::new(self.severity(), self.code(), self.message(), primary);
    match *self {
      Diag::AssignmentBeforeVariableDeclaration { declaration, .. }
      | Diag::AssignmentToConstVariable { declaration, .. }
      | Diag::AssignmentToConstVariableBeforeItsDeclaration { declaration, .. }
      | Diag::AssignmentToImportedVariable { declaration, .. }
      | Diag::FunctionCallBeforeDeclarationInBlockScope { declaration, .. }
      | Diag::VariableUsedBeforeDeclaration { declaration, .. } => {
        diagnostic.push_label(Label::secondary(
          Span::new(file, declaration),
          "variable declared here",
        ));
      }
      Diag::RedeclarationOfVariable {
        original_declaration,
        ..
      } => {
        diagnostic.push_label(Label::secondary(
          Span::new(file, original_declaration),
          "original declaration here",
        ));
      }
      Diag::VarianceKeywordsInWrongOrder { out_keyword, .. } => {
        diagnostic.push_label(Label::secondary(
          Span::new(file, out_keyword),
          "'out' keyword here",
        ));
      }
      _ => {}
    }
    diagnostic
  }
}

/// An append-only sink of diagnostics.
pub trait DiagReporter {
  fn report(&mut self, diag: Diag);
}

/// Collects reported diagnostics into a `Vec`, in report order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiagCollector {
  pub diags: Vec<Diag>,
}

impl DiagCollector {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_empty(&self) -> bool {
    self.diags.is_empty()
  }
}

impl DiagReporter for DiagCollector {
  fn report(&mut self, diag: Diag) {
    self.diags.push(diag);
  }
}
