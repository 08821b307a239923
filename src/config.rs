//! Cache policy configuration.
//!
//! A policy can be declared in TOML instead of composing validators by hand:
//!
//! ```toml
//! cache_errors = false
//! expiration = "5m"
//! refresh_every = 10
//! combine = "any"
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::{AddContext, CacheError};
use crate::validator::{
    all_of, any_of, BoxValidator, CallCount, NoCache, TimedWindow, Validator,
};
use crate::{log_debug, log_info, Result};

pub trait ConfigProperties {
    fn cache_errors(&self) -> bool {
        false
    }
    /// Time window after which the memo is stale, e.g. `"30s"`.
    fn expiration(&self) -> Option<&str> {
        None
    }
    /// Number of reads a fetched value is served for.
    fn refresh_every(&self) -> Option<u32> {
        None
    }
    fn combine(&self) -> Combine {
        Combine::Any
    }
    fn no_cache(&self) -> bool {
        false
    }
}

/// How the configured policies are joined.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Combine {
    #[default]
    Any,
    All,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    cache_errors: bool,
    expiration: Option<String>,
    refresh_every: Option<u32>,
    #[serde(default)]
    combine: Combine,
    #[serde(default)]
    no_cache: bool,
}

impl Config {
    pub fn new<T: Read>(mut reader: T) -> Result<Self> {
        let mut data = String::new();
        reader
            .read_to_string(&mut data)
            .err_context("Unable to read cache configuration")?;
        Config::parse(&data)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log_info!("Loading cache configuration from {}", path.display());
        let f = File::open(path).err_context(format!(
            "Unable to open cache configuration file {}",
            path.display()
        ))?;
        Config::new(f)
    }

    fn parse(data: &str) -> Result<Self> {
        let config: Config = toml::from_str(data).map_err(|err| {
            CacheError::ConfigurationError(format!("Invalid cache configuration: {err}"))
        })?;
        // Surface bad time formats at load time rather than on first use.
        if let Some(expiration) = &config.expiration {
            TimedWindow::try_from(expiration.as_str())?;
        }
        Ok(config)
    }
}

impl ConfigProperties for Config {
    fn cache_errors(&self) -> bool {
        self.cache_errors
    }

    fn expiration(&self) -> Option<&str> {
        self.expiration.as_deref()
    }

    fn refresh_every(&self) -> Option<u32> {
        self.refresh_every
    }

    fn combine(&self) -> Combine {
        self.combine
    }

    fn no_cache(&self) -> bool {
        self.no_cache
    }
}

/// Turns configured policies into a validator. `None` when nothing beyond
/// manual invalidation is configured. `no_cache` wins over everything else.
pub fn build_validator(config: &dyn ConfigProperties) -> Result<Option<BoxValidator>> {
    if config.no_cache() {
        log_debug!("Cache policy: no caching");
        return Ok(Some(NoCache.boxed()));
    }
    let timed = match config.expiration() {
        Some(expiration) => Some(TimedWindow::try_from(expiration)?.boxed()),
        None => None,
    };
    let counted = config
        .refresh_every()
        .map(|threshold| CallCount::new(threshold).boxed());
    if timed.is_none() && counted.is_none() {
        log_debug!("Cache policy: manual invalidation only");
        return Ok(None);
    }
    log_debug!(
        "Cache policy: expiration {:?}, refresh every {:?} reads, combined with {:?}",
        config.expiration(),
        config.refresh_every(),
        config.combine()
    );
    let validator = match config.combine() {
        Combine::Any => any_of([timed, counted]).boxed(),
        Combine::All => all_of([timed, counted]).boxed(),
    };
    Ok(Some(validator))
}
