//! Access to the process-wide environment table.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::EnvError;

/// The OS tier of an [`EnvSet`](super::EnvSet).
///
/// Implementations are handles: cloning one must keep pointing at the same
/// table, so that clones of an accessor observe each other's global writes.
pub trait ProcessEnv: std::fmt::Debug {
    /// Returns the value of `key`, or `None` if it is not set.
    fn var(&self, key: &str) -> Option<String>;

    fn set_var(&self, key: &str, value: &str) -> Result<(), EnvError>;

    fn remove_var(&self, key: &str) -> Result<(), EnvError>;

    /// Returns every variable currently set.
    fn vars(&self) -> Vec<(String, String)>;
}

/// Delegates to `std::env`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl ProcessEnv for SystemEnv {
    fn var(&self, key: &str) -> Option<String> {
        if validate_key(key).is_err() {
            return None;
        }
        std::env::var_os(key).map(|value| value.to_string_lossy().into_owned())
    }

    fn set_var(&self, key: &str, value: &str) -> Result<(), EnvError> {
        validate_key(key)?;
        validate_value(key, value)?;
        std::env::set_var(key, value);
        Ok(())
    }

    fn remove_var(&self, key: &str) -> Result<(), EnvError> {
        validate_key(key)?;
        std::env::remove_var(key);
        Ok(())
    }

    fn vars(&self) -> Vec<(String, String)> {
        std::env::vars_os()
            .map(|(key, value)| {
                (
                    key.to_string_lossy().into_owned(),
                    value.to_string_lossy().into_owned(),
                )
            })
            .collect()
    }
}

/// In-memory environment table.
///
/// Clones share the same table, mirroring how every accessor in a process
/// shares the real environment.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEnv {
    vars: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table pre-populated with `vars`.
    pub fn with_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let vars = vars
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self {
            vars: Arc::new(Mutex::new(vars)),
        }
    }

    fn table(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.vars.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ProcessEnv for InMemoryEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.table().get(key).cloned()
    }

    fn set_var(&self, key: &str, value: &str) -> Result<(), EnvError> {
        validate_key(key)?;
        validate_value(key, value)?;
        self.table().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_var(&self, key: &str) -> Result<(), EnvError> {
        validate_key(key)?;
        self.table().remove(key);
        Ok(())
    }

    fn vars(&self) -> Vec<(String, String)> {
        self.table()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

// std::env::set_var and remove_var panic on these inputs.
fn validate_key(key: &str) -> Result<(), EnvError> {
    let reason = if key.is_empty() {
        "key is empty"
    } else if key.contains('=') {
        "key contains '='"
    } else if key.contains('\0') {
        "key contains a NUL character"
    } else {
        return Ok(());
    };

    Err(EnvError::Platform {
        key: key.to_string(),
        reason,
    })
}

fn validate_value(key: &str, value: &str) -> Result<(), EnvError> {
    if value.contains('\0') {
        return Err(EnvError::Platform {
            key: key.to_string(),
            reason: "value contains a NUL character",
        });
    }
    Ok(())
}
