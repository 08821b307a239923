//! Single-slot memoizing cache in front of a fetch function.
//!
//! [`Cache::get`] asks the cache validator whether the memoized result is
//! stale and only then runs the fetch function. The validator is the user
//! supplied one OR'ed with a private manual trigger that backs
//! [`Cache::invalidate`] and the error retry policy.

use std::sync::{Arc, Mutex};

use crate::config::{self, ConfigProperties};
use crate::context::Context;
use crate::error::FetchError;
use crate::validator::{any_of, AnyOf, BoxValidator, Manual, Validator};
use crate::{log_debug, log_warn, Error, Result};

/// Retrieval function wrapped by a cache. Receives the caller's context
/// untouched.
pub type Fetcher<T> =
    Box<dyn FnMut(&Context) -> std::result::Result<T, FetchError<T>> + Send>;

/// What a fetch function may return. A plain `Result<T>` carries either a
/// value or an error. A `(T, Option<Error>)` pair hands back a value even
/// when the fetch also reports an error; the cache memoizes and returns both.
pub trait IntoFetched {
    type Value;

    fn into_fetched(self) -> std::result::Result<Self::Value, FetchError<Self::Value>>;
}

impl<T> IntoFetched for Result<T> {
    type Value = T;

    fn into_fetched(self) -> std::result::Result<T, FetchError<T>> {
        self.map_err(FetchError::from)
    }
}

impl<T> IntoFetched for (T, Option<Error>) {
    type Value = T;

    fn into_fetched(self) -> std::result::Result<T, FetchError<T>> {
        match self {
            (value, None) => Ok(value),
            (value, Some(err)) => Err(FetchError::new(err, Some(value))),
        }
    }
}

#[derive(Builder)]
#[builder(pattern = "owned")]
pub struct CacheOptions {
    /// Extra staleness policy on top of the manual trigger. Without one, the
    /// cache refreshes on first use and after `invalidate` only.
    #[builder(setter(strip_option), default)]
    validator: Option<BoxValidator>,
    /// Keep failed fetches memoized like successful ones. When off, every read
    /// after a failure fetches again.
    #[builder(default)]
    cache_errors: bool,
}

impl CacheOptions {
    pub fn builder() -> CacheOptionsBuilder {
        CacheOptionsBuilder::default()
    }
}

struct State<T> {
    last: Option<std::result::Result<T, FetchError<T>>>,
    // AnyOf(user validator, manual)
    validator: AnyOf,
    fetcher: Fetcher<T>,
}

pub struct Cache<T> {
    state: Mutex<State<T>>,
    // Second handle on the manual trigger inside `State::validator`. Only
    // touched while the state lock is held.
    manual: Arc<Mutex<Manual>>,
    cache_errors: bool,
}

fn mark_stale(manual: &Mutex<Manual>) {
    manual
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .invalidate();
}

impl<T: Clone + 'static> Cache<T> {
    pub fn new<F, R>(mut fetcher: F, validator: Option<BoxValidator>, cache_errors: bool) -> Self
    where
        F: FnMut(&Context) -> R + Send + 'static,
        R: IntoFetched<Value = T> + 'static,
    {
        let manual = Arc::new(Mutex::new(Manual::new()));
        Cache {
            state: Mutex::new(State {
                last: None,
                validator: any_of([validator, Some(manual.clone().boxed())]),
                fetcher: Box::new(move |ctx: &Context| fetcher(ctx).into_fetched()),
            }),
            manual,
            cache_errors,
        }
    }

    pub fn with_options<F, R>(fetcher: F, options: CacheOptions) -> Self
    where
        F: FnMut(&Context) -> R + Send + 'static,
        R: IntoFetched<Value = T> + 'static,
    {
        Cache::new(fetcher, options.validator, options.cache_errors)
    }

    /// Builds a cache whose policy comes from configuration.
    pub fn from_config<F, R>(fetcher: F, config: &dyn ConfigProperties) -> Result<Self>
    where
        F: FnMut(&Context) -> R + Send + 'static,
        R: IntoFetched<Value = T> + 'static,
    {
        let validator = config::build_validator(config)?;
        Ok(Cache::new(fetcher, validator, config.cache_errors()))
    }

    /// Returns the memoized result, running the fetch function first if the
    /// validator reports it stale. Blocks while another `get` or `invalidate`
    /// on the same cache is in progress, so at most one fetch runs at a time.
    pub fn get(&self, ctx: &Context) -> std::result::Result<T, FetchError<T>> {
        // A fetch that panicked never reached the memo or the validator, so
        // the state behind a poisoned lock is still consistent.
        let mut guard = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let state = &mut *guard;

        let stale = state.validator.should_fetch();
        let last = match state.last.as_ref() {
            Some(last) if !stale => {
                log_debug!("Serving memoized result");
                last.clone()
            }
            _ => {
                log_debug!("Memoized result is stale, fetching");
                let fetched = (state.fetcher)(ctx);
                state.last = Some(fetched.clone());
                state.validator.on_fetch();
                fetched
            }
        };

        if let Err(err) = &last {
            if !self.cache_errors {
                log_warn!("Fetch failed, retrying on next get: {}", err);
                mark_stale(&self.manual);
            }
        }
        last
    }

    /// Forces the next `get` to run the fetch function.
    pub fn invalidate(&self) {
        let _state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        log_debug!("Cache invalidated");
        mark_stale(&self.manual);
    }

    pub fn cache_errors(&self) -> bool {
        self.cache_errors
    }
}

/// Wraps `fetcher` in a cache and hands back its `get` as a plain function,
/// for callers that only need a drop-in replacement fetch function.
pub fn cached_fetcher<T, F, R>(
    fetcher: F,
    validator: Option<BoxValidator>,
    cache_errors: bool,
) -> impl Fn(&Context) -> std::result::Result<T, FetchError<T>> + Send + Sync
where
    T: Clone + Send + 'static,
    F: FnMut(&Context) -> R + Send + 'static,
    R: IntoFetched<Value = T> + 'static,
{
    let cache = Cache::new(fetcher, validator, cache_errors);
    move |ctx: &Context| cache.get(ctx)
}
