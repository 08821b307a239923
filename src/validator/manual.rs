use crate::validator::Validator;

/// Refreshes only when told to through [`Manual::invalidate`]. Starts out
/// stale so the first read always fetches.
#[derive(Debug, Clone, PartialEq)]
pub struct Manual {
    should_fetch: bool,
}

impl Default for Manual {
    fn default() -> Self {
        Self { should_fetch: true }
    }
}

impl Manual {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forces the next `should_fetch` to report stale. Idempotent.
    pub fn invalidate(&mut self) {
        self.should_fetch = true;
    }
}

impl Validator for Manual {
    fn should_fetch(&mut self) -> bool {
        self.should_fetch
    }

    fn on_fetch(&mut self) {
        self.should_fetch = false;
    }
}
