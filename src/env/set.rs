use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::file::load_env_file;
use super::os::{ProcessEnv, SystemEnv};
use super::EnvError;

/// Name of the env file read by [`EnvSet::load_file`] unless overridden.
pub const DEFAULT_FILE_NAME: &str = ".env";

/// Characters stripped from both ends of every value read through an [`EnvSet`].
pub const VALUE_TRIM_CHARS: &[char] = &[' ', '\n', '\t'];

/// Layered view over the process environment.
///
/// Reads resolve in a fixed order:
///
/// 1. overrides applied with [`set`](Self::set)
/// 2. the OS environment
/// 3. values loaded from the env file
/// 4. the caller's default
///
/// Cloning deep-copies the override and file layers. The OS layer is a
/// handle, so clones keep observing the same process-wide table.
///
/// ## Example
///
/// ```no_run
/// use dragon_env::EnvSet;
///
/// let mut env = EnvSet::new();
/// env.load_file()?;
///
/// let (host, _) = env.string("DB_HOST", "localhost");
/// let port = env.int("DB_PORT", 5432).unwrap_or_else(|f| f.value);
///
/// // Visible to this accessor (and its clones) only
/// env.set(false, "DB_HOST", "10.0.0.1")?;
/// # Ok::<(), dragon_env::EnvError>(())
/// ```
#[derive(Debug, Clone)]
pub struct EnvSet<E = SystemEnv> {
    file_data: Option<HashMap<String, String>>,
    overrides: Option<HashMap<String, String>>,
    file_name: PathBuf,
    default_value: String,
    os: E,
}

impl EnvSet<SystemEnv> {
    /// Creates an accessor over the real process environment.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a new accessor builder.
    pub fn builder() -> EnvSetBuilder<SystemEnv> {
        EnvSetBuilder {
            file_name: PathBuf::from(DEFAULT_FILE_NAME),
            default_value: String::new(),
            os: SystemEnv,
        }
    }
}

impl Default for EnvSet<SystemEnv> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ProcessEnv> EnvSet<E> {
    /// Reads the env file into the file layer.
    ///
    /// A missing file is not an error; the accessor then works from the OS
    /// environment and overrides alone. Loading again replaces the file layer,
    /// but is refused once variables have been [`set`](Self::set) on top of
    /// loaded data.
    pub fn load_file(&mut self) -> Result<(), EnvError> {
        let loaded = self.file_data.as_ref().is_some_and(|data| !data.is_empty());
        if loaded && self.overrides.is_some() {
            return Err(EnvError::AlreadyLoaded);
        }

        let path =
            std::path::absolute(&self.file_name).map_err(|source| EnvError::PathResolution {
                path: self.file_name.clone(),
                source,
            })?;

        log::debug!("reading env file {}", path.display());

        if let Some(vars) = load_env_file(&path)? {
            self.file_data = Some(vars);
        }

        Ok(())
    }

    /// Resolves `key` through all layers.
    ///
    /// Override values come back exactly as set; OS and file values are
    /// trimmed of [`VALUE_TRIM_CHARS`].
    pub fn lookup(&self, key: &str) -> Option<String> {
        if let Some(value) = self
            .overrides
            .as_ref()
            .and_then(|overrides| overrides.get(key))
        {
            return Some(value.clone());
        }

        let value = self.os.var(key).or_else(|| {
            self.file_data
                .as_ref()
                .and_then(|data| data.get(key).cloned())
        })?;

        Some(value.trim_matches(VALUE_TRIM_CHARS).to_string())
    }

    /// Returns the value of `key` and whether it was found.
    ///
    /// When no layer has the key, `default` is returned as given together
    /// with `false`.
    pub fn string(&self, key: &str, default: &str) -> (String, bool) {
        match self.lookup(key) {
            Some(value) => (value, true),
            None => (default.to_string(), false),
        }
    }

    /// Like [`string`](Self::string), falling back to the accessor's default value.
    pub fn string_or_default(&self, key: &str) -> String {
        self.string(key, &self.default_value).0
    }

    /// Sets `key` for this accessor, and in the OS environment if `global` is true.
    ///
    /// The override is recorded even when the OS write fails.
    pub fn set(&mut self, global: bool, key: &str, value: &str) -> Result<(), EnvError> {
        self.overrides
            .get_or_insert_with(HashMap::new)
            .insert(key.to_string(), value.to_string());

        if global {
            self.os.set_var(key, value)?;
        }

        Ok(())
    }

    /// Removes `key` from the override and file layers.
    ///
    /// Only when neither layer held the key is it removed from the OS
    /// environment. An OS value shadowed by a local one is left in place.
    pub fn unset(&mut self, key: &str) -> Result<(), EnvError> {
        let in_overrides = self
            .overrides
            .as_mut()
            .is_some_and(|overrides| overrides.remove(key).is_some());
        let in_file = self
            .file_data
            .as_mut()
            .is_some_and(|data| data.remove(key).is_some());

        if in_overrides || in_file {
            return Ok(());
        }

        self.os.remove_var(key)
    }

    /// Variables loaded from the env file, if any were loaded.
    pub fn file_data(&self) -> Option<&HashMap<String, String>> {
        self.file_data.as_ref()
    }

    pub fn file_name(&self) -> &Path {
        &self.file_name
    }

    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    /// The OS environment handle.
    pub fn os(&self) -> &E {
        &self.os
    }

    /// Flattens every layer into one map, higher layers winning.
    pub(crate) fn merged_vars(&self) -> HashMap<String, String> {
        let mut merged = self.file_data.clone().unwrap_or_default();
        merged.extend(self.os.vars());
        if let Some(overrides) = &self.overrides {
            merged.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        merged
    }
}

/// Builder for an [`EnvSet`].
///
/// Building never touches the file system; call
/// [`load_file`](EnvSet::load_file) on the result.
#[derive(Debug)]
#[must_use = "builders do nothing until .build() is called"]
pub struct EnvSetBuilder<E> {
    file_name: PathBuf,
    default_value: String,
    os: E,
}

impl<E: ProcessEnv> EnvSetBuilder<E> {
    /// Sets the env file to read. Relative paths resolve against the
    /// working directory at load time.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.file_name = path.as_ref().to_path_buf();
        self
    }

    /// Sets the fallback used by [`EnvSet::string_or_default`].
    pub fn with_default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = value.into();
        self
    }

    /// Replaces the OS environment, e.g. with an
    /// [`InMemoryEnv`](super::InMemoryEnv) in tests.
    pub fn with_os<F: ProcessEnv>(self, os: F) -> EnvSetBuilder<F> {
        EnvSetBuilder {
            file_name: self.file_name,
            default_value: self.default_value,
            os,
        }
    }

    pub fn build(self) -> EnvSet<E> {
        EnvSet {
            file_data: None,
            overrides: None,
            file_name: self.file_name,
            default_value: self.default_value,
            os: self.os,
        }
    }
}
