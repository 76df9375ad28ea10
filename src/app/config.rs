//! Environment configuration.
//!
//! `.env` is loaded once at startup; real environment variables win over it.

use crate::error::AppError;

pub const LOG_VAR: &str = "COORDFIX_LOG";
pub const THREADS_VAR: &str = "COORDFIX_THREADS";

const DEFAULT_LOG_FILTER: &str = "info";

/// Settings that do not come from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// `tracing` filter directive, e.g. `info` or `coordfix=debug`.
    pub log_filter: String,
    /// Default worker count for `batch`.
    pub threads: Option<usize>,
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let log_filter = lookup(LOG_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        let threads = match lookup(THREADS_VAR).map(|v| v.trim().to_string()) {
            None => None,
            Some(v) if v.is_empty() => None,
            Some(v) => Some(parse_threads(&v)?),
        };

        Ok(Self { log_filter, threads })
    }
}

fn parse_threads(v: &str) -> Result<usize, AppError> {
    match v.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(AppError::input(format!("{THREADS_VAR} must be a positive integer, got '{v}'."))),
    }
}

/// Validate a thread count given on the command line.
pub fn check_threads(threads: Option<usize>) -> Result<Option<usize>, AppError> {
    match threads {
        Some(0) => Err(AppError::input("--threads must be > 0.")),
        other => Ok(other),
    }
}
