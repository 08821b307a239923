//! Staleness policies deciding when a cache has to call its fetch function.
//!
//! A [`Validator`] is asked [`Validator::should_fetch`] before every read and
//! told [`Validator::on_fetch`] after every refresh. Validators are plain
//! in-memory state machines and never fail. They are combined with
//! [`AnyOf`] and [`AllOf`].

use std::sync::{Arc, Mutex};

pub mod call_count;
pub mod compose;
pub mod manual;
pub mod nocache;
pub mod timed;

pub use call_count::CallCount;
pub use compose::{all_of, any_of, AllOf, AnyOf};
pub use manual::Manual;
pub use nocache::NoCache;
pub use timed::TimedWindow;

pub trait Validator {
    /// Whether the memoized value is stale and the fetch function must run.
    fn should_fetch(&mut self) -> bool;
    /// Called once the fetch function has run and its result is memoized.
    fn on_fetch(&mut self);

    fn boxed(self) -> BoxValidator
    where
        Self: Sized + Send + 'static,
    {
        Box::new(self)
    }
}

pub type BoxValidator = Box<dyn Validator + Send>;

impl<V: Validator + ?Sized> Validator for Box<V> {
    fn should_fetch(&mut self) -> bool {
        (**self).should_fetch()
    }

    fn on_fetch(&mut self) {
        (**self).on_fetch()
    }
}

// Lets callers keep a handle on a validator they hand over to a cache, or
// share one policy between several caches.
impl<V: Validator> Validator for Arc<Mutex<V>> {
    fn should_fetch(&mut self) -> bool {
        self.lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .should_fetch()
    }

    fn on_fetch(&mut self) {
        self.lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .on_fetch()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::MockValidator;

    #[test]
    fn test_shared_validator_observes_calls() {
        let shared = Arc::new(Mutex::new(MockValidator::fresh()));
        let mut handle = shared.clone();
        assert!(!handle.should_fetch());
        handle.on_fetch();
        let mock = shared.lock().unwrap();
        assert_eq!(1, mock.should_fetch_calls);
        assert_eq!(1, mock.on_fetch_calls);
    }

    #[test]
    fn test_boxed_validator_delegates() {
        let mut validator = NoCache.boxed();
        assert!(validator.should_fetch());
        validator.on_fetch();
        assert!(validator.should_fetch());
    }
}
