//! Scope and variable analysis for JavaScript and TypeScript.
//!
//! This crate is the semantic core of the linter. An upstream parser walks a
//! module depth-first and feeds the [`VariableAnalyzer`] a stream of visit
//! events (declarations, uses, scope boundaries); the analyzer maintains a
//! stack of lexical scopes, resolves every name use when its scope exits, and
//! reports binding, mutability, hoisting, and type-vs-value violations as
//! [`Diag`] values through a [`DiagReporter`].
//!
//! The analysis is two-pass in spirit but single-pass in mechanism: uses are
//! never resolved eagerly, because a `var` or `function` declaration visited
//! later may hoist over them. Instead each scope accumulates pending uses and
//! settles them on exit, propagating unresolved ones to its parent and, at end
//! of module, to the read-only [`GlobalDeclaredSet`].
//!
//! One analyzer instance processes one module; instances share nothing mutable
//! and may run on independent threads. Identifier text borrows the source
//! buffer, which must outlive the analyzer.

pub mod analyzer;
pub mod diag;
pub mod events;
pub mod globals;
pub mod ident;
pub mod language;
pub mod scope;

pub use analyzer::VariableAnalyzer;
pub use diag::Diag;
pub use diag::DiagCollector;
pub use diag::DiagReporter;
pub use events::analyze_events;
pub use events::Event;
pub use globals::default_globals;
pub use globals::GlobalDeclaredSet;
pub use globals::GlobalFlags;
pub use ident::Identifier;
pub use language::BlockFunctionHoisting;
pub use language::DeclFlags;
pub use language::Language;
pub use language::UseKind;
pub use language::VarOptions;
pub use language::VariableKind;
pub use scope::DeclaredScope;
pub use scope::Declaration;
pub use scope::Scope;
pub use scope::ScopeKind;
pub use scope::ScopeStack;
pub use scope::Use;
