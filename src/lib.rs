//! Refresh-on-demand value cache.
//!
//! A [`Cache`] wraps an expensive or fallible fetch function and memoizes its
//! result. Whether a read is served from the memo or triggers a new fetch is
//! decided by a [`Validator`], a small state machine that can be composed
//! with others through [`validator::AnyOf`] and [`validator::AllOf`].

pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod test;
pub mod time;
pub mod validator;
pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;

pub use cache::{cached_fetcher, Cache, CacheOptions, Fetcher, IntoFetched};
pub use context::Context;
pub use error::FetchError;
pub use validator::{BoxValidator, Validator};

#[macro_use]
extern crate log;

#[macro_use]
extern crate derive_builder;
