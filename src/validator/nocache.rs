use crate::validator::Validator;

/// Always refreshes. Handing it to a cache turns memoization off.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl Validator for NoCache {
    fn should_fetch(&mut self) -> bool {
        true
    }

    fn on_fetch(&mut self) {}
}
