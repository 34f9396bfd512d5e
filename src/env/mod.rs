//! Layered environment variable access.

mod de;
mod error;
mod file;
mod log_level;
mod os;
mod set;
mod typed;

pub use error::EnvError;
pub use file::{parse_env_file, FILE_TRIM_CHARS};
pub use log_level::{LogLevel, ParseLogLevelError, LOG_LEVEL_VAR};
pub use os::{InMemoryEnv, ProcessEnv, SystemEnv};
pub use set::{EnvSet, EnvSetBuilder, DEFAULT_FILE_NAME, VALUE_TRIM_CHARS};
pub use typed::{Fallback, FromEnv, OrFallback};
