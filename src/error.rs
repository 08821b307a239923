use std::fmt::{self, Debug, Display};
use std::ops::Deref;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CacheError {
    #[error("Time conversion error: {0}")]
    TimeConversionError(String),
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Context cancelled")]
    Cancelled,
    #[error("Context deadline exceeded")]
    DeadlineExceeded,
}

/// Error returned by a fetch function as memoized by the cache, together with
/// the value the same fetch produced, if any. Cloning it hands out the same
/// underlying error, so every caller served from the memo observes the exact
/// error the fetch produced.
#[derive(Clone)]
pub struct FetchError<T = ()> {
    error: Arc<anyhow::Error>,
    value: Option<T>,
}

impl<T> FetchError<T> {
    pub fn new(error: anyhow::Error, value: Option<T>) -> Self {
        FetchError {
            error: Arc::new(error),
            value,
        }
    }

    pub fn inner(&self) -> &anyhow::Error {
        &self.error
    }

    /// Value the failing fetch returned alongside its error.
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<T> {
        self.value
    }

    /// True if both handles point to the error of the same fetch.
    pub fn same_fetch(&self, other: &FetchError<T>) -> bool {
        Arc::ptr_eq(&self.error, &other.error)
    }
}

impl<T> From<anyhow::Error> for FetchError<T> {
    fn from(err: anyhow::Error) -> Self {
        FetchError::new(err, None)
    }
}

impl<T> Deref for FetchError<T> {
    type Target = anyhow::Error;

    fn deref(&self) -> &Self::Target {
        &self.error
    }
}

impl<T> Display for FetchError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&*self.error, f)
    }
}

impl<T> Debug for FetchError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Debug::fmt(&*self.error, f)
    }
}

impl<T> std::error::Error for FetchError<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.error.source()
    }
}

pub trait AddContext<T, E>: Context<T, E> {
    fn err_context<C: Display + Send + Sync + 'static>(self, msg: C) -> Result<T, anyhow::Error>
    where
        Self: Sized,
    {
        self.with_context(|| msg.to_string())
    }
}

impl<U, T, E> AddContext<T, E> for U where U: Context<T, E> {}

pub fn gen<T: AsRef<str>>(msg: T) -> anyhow::Error {
    anyhow!(msg.as_ref().to_string())
}
