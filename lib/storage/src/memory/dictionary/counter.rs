use quadstore_encoding::{DictionaryError, DictionaryResult};
use std::sync::atomic::{AtomicU32, Ordering};

/// Hands out consecutive counter values below a fixed limit.
#[derive(Debug)]
pub(super) struct IdCounter {
    /// Contains the next free value.
    next: AtomicU32,
    /// The first value that is never handed out.
    limit: u32,
}

impl IdCounter {
    pub(super) fn new(first: u32, limit: u32) -> Self {
        Self {
            next: AtomicU32::new(first),
            limit,
        }
    }

    /// Returns the next free value.
    ///
    /// Returns [DictionaryError::Exhausted] once the limit is reached. The counter does not advance
    /// in that case.
    pub(super) fn allocate(&self) -> DictionaryResult<u32> {
        self.next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |next| {
                (next < self.limit).then(|| next + 1)
            })
            .map_err(|_| DictionaryError::Exhausted)
    }
}
