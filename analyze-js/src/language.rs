//! Variable kinds, use kinds, and analysis options.
//!
//! [`VariableKind`] is the closed set of binding forms the analyzer knows
//! about. Each kind has fixed properties: which name spaces it occupies
//! (runtime value, type, or both), whether it is mutable, and how it hoists.
//! The predicates here are the single source of truth for those properties;
//! the resolution and redeclaration logic in the analyzer is written entirely
//! in terms of them.

use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

/// The binding form that introduced a declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VariableKind {
  ArrowParameter,
  Catch,
  Class,
  Const,
  Enum,
  Function,
  FunctionParameter,
  FunctionTypeParameter,
  GenericParameter,
  Import,
  ImportAlias,
  ImportType,
  IndexSignatureParameter,
  InferType,
  Interface,
  Let,
  Namespace,
  TypeAlias,
  Var,
}

impl VariableKind {
  /// Whether a declaration of this kind can satisfy a runtime (value) use.
  ///
  /// Imports are reported permissively: whether an imported name is a value,
  /// a type, or both is unknown without resolving the other module, so they
  /// satisfy both name spaces.
  pub fn declares_value(self) -> bool {
    !matches!(
      self,
      VariableKind::Interface
        | VariableKind::TypeAlias
        | VariableKind::GenericParameter
        | VariableKind::FunctionTypeParameter
        | VariableKind::InferType
    )
  }

  /// Whether a declaration of this kind can satisfy a type use.
  pub fn declares_type(self) -> bool {
    matches!(
      self,
      VariableKind::Class
        | VariableKind::Enum
        | VariableKind::Namespace
        | VariableKind::Interface
        | VariableKind::TypeAlias
        | VariableKind::GenericParameter
        | VariableKind::FunctionTypeParameter
        | VariableKind::InferType
        | VariableKind::Import
        | VariableKind::ImportAlias
        | VariableKind::ImportType
    )
  }

  /// Whether assignments to a binding of this kind are rejected.
  pub fn is_immutable(self) -> bool {
    matches!(
      self,
      VariableKind::Const | VariableKind::Class | VariableKind::Enum | VariableKind::Namespace
    ) || self.is_import()
  }

  pub fn is_import(self) -> bool {
    matches!(
      self,
      VariableKind::Import | VariableKind::ImportAlias | VariableKind::ImportType
    )
  }

  /// Runtime parameter kinds. These are the only kinds a type-predicate
  /// reference may name.
  pub fn is_runtime_parameter(self) -> bool {
    matches!(
      self,
      VariableKind::ArrowParameter
        | VariableKind::FunctionParameter
        | VariableKind::IndexSignatureParameter
    )
  }

  pub fn is_type_parameter(self) -> bool {
    matches!(
      self,
      VariableKind::GenericParameter | VariableKind::FunctionTypeParameter | VariableKind::InferType
    )
  }

  /// "Strict" declaration kinds: at most one per name per scope, conflicting
  /// with most other declarations of the same name.
  pub fn is_strict(self) -> bool {
    matches!(
      self,
      VariableKind::Let
        | VariableKind::Const
        | VariableKind::Class
        | VariableKind::Interface
        | VariableKind::Enum
        | VariableKind::Namespace
    ) || self.is_import()
  }

  /// Whether the declaration hoists across block boundaries toward the
  /// nearest var-hoist scope.
  pub fn is_block_hoisted(self) -> bool {
    matches!(self, VariableKind::Var | VariableKind::Function)
  }

  /// Whether an earlier value use of a binding of this kind is a
  /// temporal-dead-zone violation.
  pub fn has_value_tdz(self) -> bool {
    matches!(
      self,
      VariableKind::Let | VariableKind::Const | VariableKind::Class | VariableKind::Interface
    )
  }

  /// Whether an earlier type use of a binding of this kind is reported.
  pub fn has_type_tdz(self) -> bool {
    matches!(
      self,
      VariableKind::GenericParameter | VariableKind::FunctionTypeParameter
    )
  }

  pub fn as_str(self) -> &'static str {
    match self {
      VariableKind::ArrowParameter => "arrow_parameter",
      VariableKind::Catch => "catch",
      VariableKind::Class => "class",
      VariableKind::Const => "const",
      VariableKind::Enum => "enum",
      VariableKind::Function => "function",
      VariableKind::FunctionParameter => "function_parameter",
      VariableKind::FunctionTypeParameter => "function_type_parameter",
      VariableKind::GenericParameter => "generic_parameter",
      VariableKind::Import => "import",
      VariableKind::ImportAlias => "import_alias",
      VariableKind::ImportType => "import_type",
      VariableKind::IndexSignatureParameter => "index_signature_parameter",
      VariableKind::InferType => "infer_type",
      VariableKind::Interface => "interface",
      VariableKind::Let => "let",
      VariableKind::Namespace => "namespace",
      VariableKind::TypeAlias => "type_alias",
      VariableKind::Var => "var",
    }
  }
}

impl Display for VariableKind {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for VariableKind {
  type Err = ();

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Ok(match s {
      "arrow_parameter" => VariableKind::ArrowParameter,
      "catch" => VariableKind::Catch,
      "class" => VariableKind::Class,
      "const" => VariableKind::Const,
      "enum" => VariableKind::Enum,
      "function" => VariableKind::Function,
      "function_parameter" => VariableKind::FunctionParameter,
      "function_type_parameter" => VariableKind::FunctionTypeParameter,
      "generic_parameter" => VariableKind::GenericParameter,
      "import" => VariableKind::Import,
      "import_alias" => VariableKind::ImportAlias,
      "import_type" => VariableKind::ImportType,
      "index_signature_parameter" => VariableKind::IndexSignatureParameter,
      "infer_type" => VariableKind::InferType,
      "interface" => VariableKind::Interface,
      "let" => VariableKind::Let,
      "namespace" => VariableKind::Namespace,
      "type_alias" => VariableKind::TypeAlias,
      "var" => VariableKind::Var,
      _ => return Err(()),
    })
  }
}

/// How a name reference participates in resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UseKind {
  Value,
  Type,
  Assignment,
  Export,
  Delete,
  TypePredicate,
}

/// Extra facts about a declaration site.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeclFlags {
  pub initialized: bool,
  pub declared_in_for_init: bool,
  pub is_export: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Language {
  JavaScript,
  TypeScript,
}

impl FromStr for Language {
  type Err = ();

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "js" | "javascript" => Ok(Language::JavaScript),
      "ts" | "typescript" => Ok(Language::TypeScript),
      _ => Err(()),
    }
  }
}

/// Whether `function` declarations in nested blocks follow modern (strict)
/// or legacy (sloppy, fully `var`-like) hoisting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockFunctionHoisting {
  Strict,
  Legacy,
}

impl FromStr for BlockFunctionHoisting {
  type Err = ();

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "strict" => Ok(BlockFunctionHoisting::Strict),
      "legacy" => Ok(BlockFunctionHoisting::Legacy),
      _ => Err(()),
    }
  }
}

/// Per-module analysis options. Modules are strict-mode by default.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VarOptions {
  pub language: Language,
  pub jsx: bool,
  pub strict: bool,
  pub block_function_hoisting: BlockFunctionHoisting,
}

impl VarOptions {
  pub fn javascript() -> Self {
    Self {
      language: Language::JavaScript,
      jsx: false,
      strict: true,
      block_function_hoisting: BlockFunctionHoisting::Strict,
    }
  }

  pub fn typescript() -> Self {
    Self {
      language: Language::TypeScript,
      ..Self::javascript()
    }
  }
}

impl Default for VarOptions {
  fn default() -> Self {
    Self::javascript()
  }
}
