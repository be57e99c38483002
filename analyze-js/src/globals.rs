//! The global declared set: a read-only table of ambient names.
//!
//! The set is immutable once handed to an analyzer; independent analyzers may
//! share one instance by reference. Adding a name that is already present with
//! the same properties is a no-op, so building the set is idempotent.

use std::collections::BTreeMap;

/// Properties of one global name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlobalFlags {
  /// Assignments to non-writable globals are reported.
  pub writable: bool,
  /// Module-level strict declarations of non-shadowable globals are reported.
  pub shadowable: bool,
  /// Type-only globals satisfy type uses but not value uses.
  pub type_only: bool,
}

impl Default for GlobalFlags {
  fn default() -> Self {
    Self {
      writable: true,
      shadowable: true,
      type_only: false,
    }
  }
}

/// A table mapping global names to their [`GlobalFlags`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlobalDeclaredSet {
  names: BTreeMap<String, GlobalFlags>,
}

/// Globals that are immutable bindings of the global object. They are neither
/// writable nor shadowable by module-level strict declarations.
pub const NON_WRITABLE_GLOBALS: &[&str] = &["Infinity", "NaN", "globalThis", "undefined"];

/// ECMAScript standard library globals.
pub const ECMASCRIPT_GLOBALS: &[&str] = &[
  "AggregateError",
  "Array",
  "ArrayBuffer",
  "BigInt",
  "Boolean",
  "DataView",
  "Date",
  "Error",
  "EvalError",
  "FinalizationRegistry",
  "Function",
  "JSON",
  "Map",
  "Math",
  "Number",
  "Object",
  "Promise",
  "Proxy",
  "RangeError",
  "ReferenceError",
  "Reflect",
  "RegExp",
  "Set",
  "String",
  "Symbol",
  "SyntaxError",
  "TypeError",
  "URIError",
  "WeakMap",
  "WeakRef",
  "WeakSet",
  "decodeURI",
  "decodeURIComponent",
  "encodeURI",
  "encodeURIComponent",
  "eval",
  "isFinite",
  "isNaN",
  "parseFloat",
  "parseInt",
];

/// Browser host globals.
pub const BROWSER_GLOBALS: &[&str] = &[
  "URL",
  "URLSearchParams",
  "clearInterval",
  "clearTimeout",
  "console",
  "document",
  "fetch",
  "localStorage",
  "location",
  "navigator",
  "queueMicrotask",
  "sessionStorage",
  "setInterval",
  "setTimeout",
  "window",
];

/// Node.js host globals.
pub const NODE_GLOBALS: &[&str] = &[
  "Buffer",
  "__dirname",
  "__filename",
  "console",
  "exports",
  "global",
  "module",
  "process",
  "queueMicrotask",
  "require",
  "setImmediate",
  "setInterval",
  "setTimeout",
];

impl GlobalDeclaredSet {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds one global. Re-adding a name overwrites its flags; adding the same
  /// name with the same flags changes nothing.
  pub fn add_global(&mut self, name: impl Into<String>, flags: GlobalFlags) {
    self.names.insert(name.into(), flags);
  }

  pub fn add_globals(&mut self, names: &[&str], flags: GlobalFlags) {
    for name in names {
      self.add_global(*name, flags);
    }
  }

  pub fn remove_global(&mut self, name: &str) {
    self.names.remove(name);
  }

  pub fn find(&self, name: &str) -> Option<GlobalFlags> {
    self.names.get(name).copied()
  }

  pub fn len(&self) -> usize {
    self.names.len()
  }

  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }
}

/// The default global set: ECMAScript, browser, and Node globals, with the
/// immutable bindings marked non-writable and non-shadowable.
pub fn default_globals() -> GlobalDeclaredSet {
  let mut set = GlobalDeclaredSet::new();
  set.add_globals(ECMASCRIPT_GLOBALS, GlobalFlags::default());
  set.add_globals(BROWSER_GLOBALS, GlobalFlags::default());
  set.add_globals(NODE_GLOBALS, GlobalFlags::default());
  set.add_globals(
    NON_WRITABLE_GLOBALS,
    GlobalFlags {
      writable: false,
      shadowable: false,
      type_only: false,
    },
  );
  set
}
