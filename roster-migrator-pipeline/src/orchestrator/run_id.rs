use std::sync::atomic::{AtomicI64, Ordering};

use roster_migrator_shared::types::RunId;

/// Issues run identities from the wall clock in milliseconds.
///
/// An identity is never reused within a process: when the clock has not
/// advanced (or went backwards) the previous value is bumped by one.
#[derive(Debug, Default)]
pub struct RunIdGenerator {
    last: AtomicI64,
}

impl RunIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> RunId {
        self.next_at(chrono::Utc::now().timestamp_millis())
    }

    fn next_at(&self, now_millis: i64) -> RunId {
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now_millis.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        RunId(now_millis.max(previous + 1))
    }
}
