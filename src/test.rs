#[cfg(test)]
pub mod utils {
    use crate::{error, validator::Validator, Result};
    use lazy_static::lazy_static;
    use log::{Level, LevelFilter, Metadata, Record};
    use std::{
        fmt::Write,
        sync::{
            atomic::{AtomicU32, Ordering},
            Arc, Mutex,
        },
    };

    /// Validator with a scripted answer that records how it was driven.
    #[derive(Debug, Default)]
    pub struct MockValidator {
        answer: bool,
        pub should_fetch_calls: u32,
        pub on_fetch_calls: u32,
    }

    impl MockValidator {
        pub fn answering(answer: bool) -> Self {
            Self {
                answer,
                ..Default::default()
            }
        }

        pub fn stale() -> Self {
            Self::answering(true)
        }

        pub fn fresh() -> Self {
            Self::answering(false)
        }

        pub fn set_answer(&mut self, answer: bool) {
            self.answer = answer;
        }
    }

    impl Validator for MockValidator {
        fn should_fetch(&mut self) -> bool {
            self.should_fetch_calls += 1;
            self.answer
        }

        fn on_fetch(&mut self) {
            self.on_fetch_calls += 1;
        }
    }

    /// Fetch function returning 1, 2, 3... on every real invocation, or
    /// failing with that call number when `fail` is set. The returned counter
    /// reports how many times the fetch actually ran.
    pub fn counting_fetcher(
        fail: bool,
    ) -> (
        impl FnMut(&crate::context::Context) -> Result<u32> + Send + 'static,
        Arc<AtomicU32>,
    ) {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let fetcher = move |_: &crate::context::Context| {
            let call = counter.fetch_add(1, Ordering::SeqCst) + 1;
            if fail {
                return Err(error::gen(format!("error {call}")));
            }
            Ok(call)
        };
        (fetcher, calls)
    }

    /// Per thread fake monotonic clock for time based validators.
    pub mod fake_clock {
        use std::cell::Cell;
        use std::time::{Duration, Instant};

        thread_local! {
            static BASE: Instant = Instant::now();
            static OFFSET: Cell<Duration> = const { Cell::new(Duration::ZERO) };
        }

        pub fn now() -> Instant {
            BASE.with(|base| *base + OFFSET.with(|offset| offset.get()))
        }

        pub fn advance(by: Duration) {
            OFFSET.with(|offset| offset.set(offset.get() + by));
        }
    }

    struct TestLogger;

    lazy_static! {
        pub static ref LOG_BUFFER: Mutex<String> = Mutex::new(String::new());
    }

    impl log::Log for TestLogger {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= Level::Trace
        }

        fn log(&self, record: &Record) {
            if self.enabled(record.metadata()) {
                let mut buffer = LOG_BUFFER.lock().unwrap();
                writeln!(buffer, "{} - {}", record.level(), record.args())
                    .expect("Failed to write to log buffer");
            }
        }

        fn flush(&self) {}
    }

    pub fn init_test_logger() {
        let logger = TestLogger;
        log::set_boxed_logger(Box::new(logger)).unwrap_or(());
        log::set_max_level(LevelFilter::Trace);
    }
}
