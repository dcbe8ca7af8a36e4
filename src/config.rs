//! Configuration
//!
//! Environment-driven configuration with validated defaults. Values mirror
//! the settings the engine was tuned with: a 3000-character page budget,
//! ten pages per read window, one-hour cache TTL and a thirty-day progress
//! retention window.

use std::env;
use std::time::Duration;

use crate::error::{ReaderError, Result};

/// Default page budget in characters
const DEFAULT_PAGE_BUDGET: i64 = 3000;
/// Default maximum pages returned per read request
const DEFAULT_MAX_PAGES_PER_REQUEST: usize = 10;
/// Default cache TTL in seconds
const DEFAULT_CACHE_TTL_SECS: u64 = 3600;
/// Default transformed-page cache capacity
const DEFAULT_TRANSFORMED_CAPACITY: usize = 500;
/// Default progress retention in days
const DEFAULT_PROGRESS_RETENTION_DAYS: i64 = 30;

/// Pagination settings
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// Soft character budget per page
    pub page_budget: usize,
    /// Maximum pages returned per read request
    pub max_pages_per_request: usize,
}

/// Cache settings
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL applied to cached page sets and structures
    pub ttl: Duration,
    /// Capacity of the bounded transformed-page cache
    pub transformed_capacity: usize,
}

/// Progress retention settings
#[derive(Debug, Clone)]
pub struct ProgressConfig {
    /// Whether progress is recorded at all
    pub enabled: bool,
    /// Days a progress row survives from its write timestamp
    pub retention_days: i64,
}

/// Engine configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub pagination: PaginationConfig,
    pub cache: CacheConfig,
    pub progress: ProgressConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pagination: PaginationConfig {
                page_budget: DEFAULT_PAGE_BUDGET as usize,
                max_pages_per_request: DEFAULT_MAX_PAGES_PER_REQUEST,
            },
            cache: CacheConfig {
                ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
                transformed_capacity: DEFAULT_TRANSFORMED_CAPACITY,
            },
            progress: ProgressConfig {
                enabled: true,
                retention_days: DEFAULT_PROGRESS_RETENTION_DAYS,
            },
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Reads a `.env` file if present. A non-positive `LECTERN_PAGE_BUDGET`
    /// is a configuration error, never clamped.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let page_budget = parse_var("LECTERN_PAGE_BUDGET", DEFAULT_PAGE_BUDGET)?;
        if page_budget <= 0 {
            return Err(ReaderError::BudgetConfiguration(page_budget));
        }

        let max_pages_per_request = parse_var(
            "LECTERN_MAX_PAGES_PER_REQUEST",
            DEFAULT_MAX_PAGES_PER_REQUEST as i64,
        )?;
        let ttl_secs = parse_var("LECTERN_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS as i64)?;
        let transformed_capacity = parse_var(
            "LECTERN_TRANSFORMED_CACHE_CAPACITY",
            DEFAULT_TRANSFORMED_CAPACITY as i64,
        )?;
        let retention_days = parse_var(
            "LECTERN_PROGRESS_RETENTION_DAYS",
            DEFAULT_PROGRESS_RETENTION_DAYS,
        )?;
        let progress_enabled = match env::var("LECTERN_SAVE_READING_PROGRESS") {
            Ok(v) => !matches!(v.to_lowercase().as_str(), "0" | "false" | "no"),
            Err(_) => true,
        };

        Ok(Self {
            pagination: PaginationConfig {
                page_budget: page_budget as usize,
                max_pages_per_request: max_pages_per_request.max(1) as usize,
            },
            cache: CacheConfig {
                ttl: Duration::from_secs(ttl_secs.max(0) as u64),
                transformed_capacity: transformed_capacity.max(1) as usize,
            },
            progress: ProgressConfig {
                enabled: progress_enabled,
                retention_days: retention_days.max(0),
            },
        })
    }
}

fn parse_var(name: &str, default: i64) -> Result<i64> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<i64>()
            .map_err(|e| ReaderError::Config(format!("{name}: {e}"))),
        Err(_) => Ok(default),
    }
}
