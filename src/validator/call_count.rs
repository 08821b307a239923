use crate::validator::Validator;

/// Refreshes on every `threshold`-th call to `should_fetch` since the last
/// fetch, so a fetched value is handed out `threshold` times before it is
/// replaced. A threshold of 0 or 1 refreshes on every call.
#[derive(Debug, Clone, PartialEq)]
pub struct CallCount {
    calls: u32,
    threshold: u32,
}

impl CallCount {
    pub fn new(threshold: u32) -> Self {
        Self {
            calls: 0,
            threshold,
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}

impl Validator for CallCount {
    fn should_fetch(&mut self) -> bool {
        self.calls = self.calls.saturating_add(1);
        self.calls >= self.threshold
    }

    fn on_fetch(&mut self) {
        self.calls = 0;
    }
}
