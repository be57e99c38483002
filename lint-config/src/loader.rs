use crate::config::Config;
use crate::filesystem::ConfigFilesystem;
use crate::filesystem::ConfigIoError;
use ahash::AHashMap;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;

/// The well-known configuration file name searched for in ancestor
/// directories of every linted file.
pub const CONFIG_FILE_NAME: &str = "quick-lint-js.config";

/// A parsed configuration file, cached by canonical path.
///
/// A file whose JSON fails to parse still yields a loaded entry with the
/// default configuration; the parse failure is recorded, not fatal.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadedConfigFile {
  pub config_path: PathBuf,
  pub text: String,
  pub config: Config,
  pub parse_error: Option<String>,
}

/// What a watcher most recently observed for its path.
#[derive(Clone, Debug, Default, PartialEq)]
struct WatchState {
  config_path: Option<PathBuf>,
  text: Option<String>,
  error: Option<ConfigIoError>,
}

#[derive(Debug)]
struct WatchedInput {
  input_path: PathBuf,
  token: u64,
  last: WatchState,
}

#[derive(Debug)]
struct WatchedConfig {
  config_path: PathBuf,
  token: u64,
  last: WatchState,
}

/// One watched path whose resolved configuration changed across a
/// [`ConfigLoader::refresh`].
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigChange {
  pub watched_path: PathBuf,
  pub token: u64,
  pub config_path: Option<PathBuf>,
  pub config: Option<Config>,
  pub error: Option<ConfigIoError>,
}

pub struct ConfigLoader<'fs> {
  fs: &'fs dyn ConfigFilesystem,
  loaded: AHashMap<PathBuf, LoadedConfigFile>,
  watched_inputs: Vec<WatchedInput>,
  watched_configs: Vec<WatchedConfig>,
}

impl<'fs> ConfigLoader<'fs> {
  pub fn new(fs: &'fs dyn ConfigFilesystem) -> Self {
    Self {
      fs,
      loaded: AHashMap::new(),
      watched_inputs: Vec::new(),
      watched_configs: Vec::new(),
    }
  }

  /// Finds and loads the configuration governing `path`, searching `path`'s
  /// directory and its ancestors for [`CONFIG_FILE_NAME`]. Returns `None` if
  /// no configuration file exists.
  pub fn load_for_file(&mut self, path: &Path) -> Result<Option<&LoadedConfigFile>, ConfigIoError> {
    match self.find_config_for_input(path)? {
      Some(canonical) => self.load_at(canonical).map(Some),
      None => Ok(None),
    }
  }

  /// Loads an explicitly named configuration file.
  pub fn load_config_file(&mut self, path: &Path) -> Result<&LoadedConfigFile, ConfigIoError> {
    let canonical = self.fs.canonicalize(path)?;
    self.load_at(canonical)
  }

  /// Like [`load_for_file`], additionally remembering the path so that
  /// [`refresh`] reports future changes under `token`.
  ///
  /// [`load_for_file`]: ConfigLoader::load_for_file
  /// [`refresh`]: ConfigLoader::refresh
  pub fn watch_and_load_for_file(
    &mut self,
    path: &Path,
    token: u64,
  ) -> Result<Option<&LoadedConfigFile>, ConfigIoError> {
    let state = self.observe_input(path);
    self.watched_inputs.push(WatchedInput {
      input_path: path.to_path_buf(),
      token,
      last: state.clone(),
    });
    self.state_to_result(state)
  }

  /// Like [`load_config_file`], additionally watching the config path.
  ///
  /// [`load_config_file`]: ConfigLoader::load_config_file
  pub fn watch_and_load_config_file(
    &mut self,
    path: &Path,
    token: u64,
  ) -> Result<Option<&LoadedConfigFile>, ConfigIoError> {
    let state = self.observe_config(path);
    self.watched_configs.push(WatchedConfig {
      config_path: path.to_path_buf(),
      token,
      last: state.clone(),
    });
    self.state_to_result(state)
  }

  pub fn unwatch_file(&mut self, path: &Path) {
    self.watched_inputs.retain(|watch| watch.input_path != path);
    self.watched_configs.retain(|watch| watch.config_path != path);
  }

  pub fn unwatch_all_files(&mut self) {
    self.watched_inputs.clear();
    self.watched_configs.clear();
  }

  /// Re-examines every watched path against the filesystem and returns a
  /// change record for each whose resolved configuration path, content, or
  /// error differs structurally from what that watcher last observed.
  ///
  /// The loaded-config cache is rebuilt from scratch (swap-on-refresh), so
  /// each canonical path is read at most once per refresh.
  pub fn refresh(&mut self) -> Vec<ConfigChange> {
    self.loaded = AHashMap::new();
    let mut changes = Vec::new();

    for index in 0..self.watched_configs.len() {
      let path = self.watched_configs[index].config_path.clone();
      let token = self.watched_configs[index].token;
      let state = self.observe_config(&path);
      if state != self.watched_configs[index].last {
        changes.push(self.change_for(&path, token, &state));
        self.watched_configs[index].last = state;
      }
    }

    for index in 0..self.watched_inputs.len() {
      let path = self.watched_inputs[index].input_path.clone();
      let token = self.watched_inputs[index].token;
      let state = self.observe_input(&path);
      if state != self.watched_inputs[index].last {
        changes.push(self.change_for(&path, token, &state));
        self.watched_inputs[index].last = state;
      }
    }

    debug!(changes = changes.len(), "configuration refresh");
    changes
  }

  /// Number of distinct canonical configuration paths currently cached.
  pub fn cached_config_count(&self) -> usize {
    self.loaded.len()
  }

  fn find_config_for_input(&self, input: &Path) -> Result<Option<PathBuf>, ConfigIoError> {
    let start_dir = match self.fs.canonicalize(input) {
      Ok(canonical) => match canonical.parent() {
        Some(parent) => parent.to_path_buf(),
        None => canonical,
      },
      Err(err) if err.is_not_found() => {
        // The input file may not exist yet; search from its directory.
        match input.parent() {
          Some(parent) if parent.as_os_str().is_empty() => {
            self.fs.canonicalize(Path::new("."))?
          }
          Some(parent) => self.fs.canonicalize(parent)?,
          None => return Err(err),
        }
      }
      Err(err) => return Err(err),
    };

    for dir in start_dir.ancestors() {
      let candidate = dir.join(CONFIG_FILE_NAME);
      match self.fs.canonicalize(&candidate) {
        Ok(canonical) => return Ok(Some(canonical)),
        Err(err) if err.is_not_found() => continue,
        Err(err) => return Err(err),
      }
    }
    Ok(None)
  }

  fn load_at(&mut self, canonical: PathBuf) -> Result<&LoadedConfigFile, ConfigIoError> {
    if !self.loaded.contains_key(&canonical) {
      let text = self.fs.read_to_string(&canonical)?;
      let (config, parse_error) = match Config::from_json(&text) {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err.to_string())),
      };
      debug!(path = %canonical.display(), "loaded configuration");
      self.loaded.insert(
        canonical.clone(),
        LoadedConfigFile {
          config_path: canonical.clone(),
          text,
          config,
          parse_error,
        },
      );
    }
    Ok(&self.loaded[&canonical])
  }

  fn observe_input(&mut self, input: &Path) -> WatchState {
    match self.find_config_for_input(input) {
      Ok(Some(canonical)) => self.observe_at(canonical),
      Ok(None) => WatchState::default(),
      Err(error) => WatchState {
        error: Some(error),
        ..WatchState::default()
      },
    }
  }

  fn observe_config(&mut self, config_path: &Path) -> WatchState {
    match self.fs.canonicalize(config_path) {
      Ok(canonical) => self.observe_at(canonical),
      Err(error) => WatchState {
        error: Some(error),
        ..WatchState::default()
      },
    }
  }

  fn observe_at(&mut self, canonical: PathBuf) -> WatchState {
    match self.load_at(canonical.clone()) {
      Ok(loaded) => WatchState {
        config_path: Some(canonical),
        text: Some(loaded.text.clone()),
        error: None,
      },
      Err(error) => WatchState {
        error: Some(error),
        ..WatchState::default()
      },
    }
  }

  fn state_to_result(
    &mut self,
    state: WatchState,
  ) -> Result<Option<&LoadedConfigFile>, ConfigIoError> {
    if let Some(error) = state.error {
      return Err(error);
    }
    match state.config_path {
      Some(canonical) => Ok(self.loaded.get(&canonical)),
      None => Ok(None),
    }
  }

  fn change_for(&self, watched_path: &Path, token: u64, state: &WatchState) -> ConfigChange {
    let config = state
      .config_path
      .as_ref()
      .and_then(|path| self.loaded.get(path))
      .map(|loaded| loaded.config.clone());
    ConfigChange {
      watched_path: watched_path.to_path_buf(),
      token,
      config_path: state.config_path.clone(),
      config,
      error: state.error.clone(),
    }
  }
}
