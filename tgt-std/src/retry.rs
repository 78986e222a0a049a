use std::fmt::Display;
use std::thread;
use std::time::Duration;

/// Fixed pause between attempts, no upper bound on the number of attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Block the calling thread until `attempt` succeeds
    pub fn retry_forever<T, E, F>(&self, what: &str, mut attempt: F) -> T
    where
        E: Display,
        F: FnMut() -> Result<T, E>,
    {
        let mut failures: u64 = 0;
        loop {
            match attempt() {
                Ok(value) => {
                    if failures > 0 {
                        log::info!("{} succeeded after {} failed attempts", what, failures);
                    }
                    return value;
                }
                Err(e) => {
                    failures += 1;
                    log::warn!(
                        "{} failed (attempt {}): {}, retrying in {:?}",
                        what,
                        failures,
                        e,
                        self.delay
                    );
                    self.wait();
                }
            }
        }
    }

    pub fn wait(&self) {
        thread::sleep(self.delay);
    }
}
