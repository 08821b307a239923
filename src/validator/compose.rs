use crate::log_trace;
use crate::validator::{BoxValidator, Validator};

/// Refreshes when any child says the value is stale. With no children it
/// never asks for a refresh.
#[derive(Default)]
pub struct AnyOf {
    validators: Vec<BoxValidator>,
}

/// Refreshes only when every child says the value is stale. With no
/// children it always asks for a refresh.
#[derive(Default)]
pub struct AllOf {
    validators: Vec<BoxValidator>,
}

/// Builds an [`AnyOf`] from optional validators, skipping the absent ones.
pub fn any_of<I>(validators: I) -> AnyOf
where
    I: IntoIterator<Item = Option<BoxValidator>>,
{
    AnyOf::new(validators.into_iter().flatten().collect())
}

/// Builds an [`AllOf`] from optional validators, skipping the absent ones.
pub fn all_of<I>(validators: I) -> AllOf
where
    I: IntoIterator<Item = Option<BoxValidator>>,
{
    AllOf::new(validators.into_iter().flatten().collect())
}

impl AnyOf {
    pub fn new(validators: Vec<BoxValidator>) -> Self {
        Self { validators }
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl AllOf {
    pub fn new(validators: Vec<BoxValidator>) -> Self {
        Self { validators }
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

// `on_fetch` always reaches every child, also the ones that did not ask for
// the refresh, so their clocks and counters restart with the new value.
fn notify_all(validators: &mut [BoxValidator]) {
    for validator in validators.iter_mut() {
        validator.on_fetch();
    }
}

impl Validator for AnyOf {
    fn should_fetch(&mut self) -> bool {
        let stale = self.validators.iter_mut().any(|v| v.should_fetch());
        log_trace!("AnyOf over {} validators stale: {}", self.len(), stale);
        stale
    }

    fn on_fetch(&mut self) {
        notify_all(&mut self.validators);
    }
}

impl Validator for AllOf {
    fn should_fetch(&mut self) -> bool {
        let stale = self.validators.iter_mut().all(|v| v.should_fetch());
        log_trace!("AllOf over {} validators stale: {}", self.len(), stale);
        stale
    }

    fn on_fetch(&mut self) {
        notify_all(&mut self.validators);
    }
}
