use analyze_js::globals::BROWSER_GLOBALS;
use analyze_js::globals::ECMASCRIPT_GLOBALS;
use analyze_js::globals::NODE_GLOBALS;
use analyze_js::globals::NON_WRITABLE_GLOBALS;
use analyze_js::GlobalDeclaredSet;
use analyze_js::GlobalFlags;
use serde::Deserialize;
use std::collections::BTreeMap;

/// The `global-groups` setting: either "all groups on/off" or an explicit
/// list of group names.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum GlobalGroups {
  All(bool),
  List(Vec<String>),
}

impl Default for GlobalGroups {
  fn default() -> Self {
    GlobalGroups::All(true)
  }
}

/// One entry under `globals`: `true`/`false` presence, or a table with
/// per-name properties.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum GlobalOverride {
  Present(bool),
  Flags {
    #[serde(default = "default_true")]
    writable: bool,
    #[serde(default = "default_true")]
    shadowable: bool,
  },
}

fn default_true() -> bool {
  true
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
struct RawConfig {
  global_groups: GlobalGroups,
  globals: BTreeMap<String, GlobalOverride>,
}

/// A parsed `quick-lint-js.config`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
  global_groups: GlobalGroups,
  globals: BTreeMap<String, GlobalOverride>,
}

impl Config {
  /// Parses the JSON configuration text.
  pub fn from_json(text: &str) -> Result<Config, serde_json::Error> {
    let raw: RawConfig = serde_json::from_str(text)?;
    Ok(Config {
      global_groups: raw.global_groups,
      globals: raw.globals,
    })
  }

  fn group_enabled(&self, name: &str) -> bool {
    match &self.global_groups {
      GlobalGroups::All(enabled) => *enabled,
      GlobalGroups::List(groups) => groups.iter().any(|g| g == name),
    }
  }

  /// Builds the global declared set this configuration describes: the enabled
  /// groups, then per-name overrides (removing names mapped to `false`).
  pub fn build_globals(&self) -> GlobalDeclaredSet {
    let mut set = GlobalDeclaredSet::new();
    if self.group_enabled("ecmascript") {
      set.add_globals(ECMASCRIPT_GLOBALS, GlobalFlags::default());
      set.add_globals(
        NON_WRITABLE_GLOBALS,
        GlobalFlags {
          writable: false,
          shadowable: false,
          type_only: false,
        },
      );
    }
    if self.group_enabled("browser") {
      set.add_globals(BROWSER_GLOBALS, GlobalFlags::default());
    }
    if self.group_enabled("node") {
      set.add_globals(NODE_GLOBALS, GlobalFlags::default());
    }

    for (name, entry) in &self.globals {
      match *entry {
        GlobalOverride::Present(true) => set.add_global(name.clone(), GlobalFlags::default()),
        GlobalOverride::Present(false) => set.remove_global(name),
        GlobalOverride::Flags {
          writable,
          shadowable,
        } => set.add_global(
          name.clone(),
          GlobalFlags {
            writable,
            shadowable,
            type_only: false,
          },
        ),
      }
    }
    set
  }
}
