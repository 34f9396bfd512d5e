//! Typed access to environment variables, layered over an optional `.env`
//! file and in-memory overrides.

pub mod env;

pub use env::{
    EnvError, EnvSet, Fallback, InMemoryEnv, LogLevel, OrFallback, ProcessEnv, SystemEnv,
};
