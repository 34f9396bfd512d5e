//! Typed reads on top of [`EnvSet::lookup`].

use std::fmt;

use super::os::ProcessEnv;
use super::set::{EnvSet, VALUE_TRIM_CHARS};
use super::EnvError;

/// A type that can be parsed from a trimmed, non-empty variable value.
pub trait FromEnv: Sized {
    fn from_env(key: &str, raw: &str) -> Result<Self, EnvError>;
}

macro_rules! impl_from_env_int {
    ($($ty:ty),*) => {
        $(
            impl FromEnv for $ty {
                fn from_env(key: &str, raw: &str) -> Result<Self, EnvError> {
                    raw.parse::<$ty>().map_err(|source| EnvError::InvalidInt {
                        key: key.to_string(),
                        source,
                    })
                }
            }
        )*
    };
}

impl_from_env_int!(i32, i64);

/// Parsed as `i64`, then narrowed.
impl FromEnv for isize {
    fn from_env(key: &str, raw: &str) -> Result<Self, EnvError> {
        let value = i64::from_env(key, raw)?;
        isize::try_from(value).map_err(|_| EnvError::Overflow {
            key: key.to_string(),
            value,
        })
    }
}

impl FromEnv for bool {
    fn from_env(key: &str, raw: &str) -> Result<Self, EnvError> {
        match raw {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            _ => Err(EnvError::InvalidBool(key.to_string())),
        }
    }
}

/// A failed typed read, carrying the default the caller supplied.
///
/// Converts into [`EnvError`] with `?`.
#[derive(Debug)]
pub struct Fallback<T> {
    pub value: T,
    pub error: EnvError,
}

impl<T> fmt::Display for Fallback<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("using fallback value")
    }
}

impl<T: fmt::Debug> std::error::Error for Fallback<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl<T> From<Fallback<T>> for EnvError {
    fn from(fallback: Fallback<T>) -> Self {
        fallback.error
    }
}

/// Collapses a typed read into its value, real or fallback.
pub trait OrFallback<T> {
    fn or_fallback(self) -> T;
}

impl<T> OrFallback<T> for Result<T, Fallback<T>> {
    fn or_fallback(self) -> T {
        match self {
            Ok(value) => value,
            Err(fallback) => fallback.value,
        }
    }
}

impl<E: ProcessEnv> EnvSet<E> {
    /// Reads `key` as `T`.
    ///
    /// Fails with [`EnvError::NotSet`] when no layer has the key and with
    /// [`EnvError::Empty`] when its trimmed value is empty. Every failure
    /// hands back `default`.
    pub fn get<T: FromEnv>(&self, key: &str, default: T) -> Result<T, Fallback<T>> {
        let parsed = match self.lookup(key) {
            None => Err(EnvError::NotSet(key.to_string())),
            Some(raw) => match raw.trim_matches(VALUE_TRIM_CHARS) {
                "" => Err(EnvError::Empty(key.to_string())),
                trimmed => T::from_env(key, trimmed),
            },
        };

        parsed.map_err(|error| Fallback {
            value: default,
            error,
        })
    }

    /// Native-width integer; values that don't fit fail with [`EnvError::Overflow`].
    pub fn int(&self, key: &str, default: isize) -> Result<isize, Fallback<isize>> {
        self.get(key, default)
    }

    pub fn int32(&self, key: &str, default: i32) -> Result<i32, Fallback<i32>> {
        self.get(key, default)
    }

    pub fn int64(&self, key: &str, default: i64) -> Result<i64, Fallback<i64>> {
        self.get(key, default)
    }

    /// Accepts `1`, `t`, `true` and `0`, `f`, `false` in lower, upper or title case.
    pub fn bool(&self, key: &str, default: bool) -> Result<bool, Fallback<bool>> {
        self.get(key, default)
    }

    /// Returns a getter bound to `default` that never fails.
    pub fn defaulted<'a, T>(&'a self, default: T) -> impl Fn(&str) -> T + 'a
    where
        T: FromEnv + Clone + 'a,
    {
        move |key| self.get(key, default.clone()).or_fallback()
    }

    pub fn default_str<'a>(&'a self, default: &str) -> impl Fn(&str) -> String + 'a {
        let default = default.to_string();
        move |key| self.string(key, &default).0
    }

    pub fn default_int(&self, default: isize) -> impl Fn(&str) -> isize + '_ {
        self.defaulted(default)
    }

    pub fn default_bool(&self, default: bool) -> impl Fn(&str) -> bool + '_ {
        self.defaulted(default)
    }

    pub fn default_int32(&self, default: i32) -> impl Fn(&str) -> i32 + '_ {
        self.defaulted(default)
    }

    pub fn default_int64(&self, default: i64) -> impl Fn(&str) -> i64 + '_ {
        self.defaulted(default)
    }
}
