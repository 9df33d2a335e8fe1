use std::{
    sync::{
        Condvar, Mutex, PoisonError, RwLock,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use crate::foundation::error::{MovieColorError, MovieColorResult};
use crate::reduce::reducer::Unit;

/// Ordered, append-only sequence of reduced frames shared by one producer and many readers.
///
/// Readers only ever observe whole units and a length that never decreases. Once
/// [`mark_complete`](Self::mark_complete) or [`abort`](Self::abort) has been called the
/// sequence is sealed and further pushes are rejected.
#[derive(Debug, Default)]
pub struct BarSequence {
    units: RwLock<Vec<Unit>>,
    complete: AtomicBool,
    aborted: AtomicBool,
    ready: Mutex<bool>,
    ready_cv: Condvar,
}

impl BarSequence {
    /// Create an empty, open sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `unit` and return the new length.
    pub fn push(&self, unit: Unit) -> MovieColorResult<usize> {
        if self.is_sealed() {
            return Err(MovieColorError::validation(
                "cannot append to a sealed bar sequence",
            ));
        }
        let len = {
            let mut units = self.units.write().unwrap_or_else(PoisonError::into_inner);
            units.push(unit);
            units.len()
        };
        if len == 1 {
            self.signal_ready();
        }
        Ok(len)
    }

    /// Current number of units.
    pub fn len(&self) -> usize {
        self.units
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// `true` while no unit has been appended.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clone the units from index `start` to the current end.
    ///
    /// The read lock is released before returning, so callers can render the copy freely.
    pub fn snapshot_from(&self, start: usize) -> Vec<Unit> {
        let units = self.units.read().unwrap_or_else(PoisonError::into_inner);
        units.get(start..).map(<[Unit]>::to_vec).unwrap_or_default()
    }

    /// Clone every unit appended so far.
    pub fn snapshot(&self) -> Vec<Unit> {
        self.snapshot_from(0)
    }

    /// Record that the producer reached end-of-stream.
    ///
    /// Returns `true` for the call that flipped the flag; later calls are no-ops.
    pub fn mark_complete(&self) -> bool {
        let flipped = self
            .complete
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if flipped {
            self.signal_ready();
        }
        flipped
    }

    /// `true` once the producer reached end-of-stream. The length is final from then on.
    pub fn is_complete(&self) -> bool {
        self.complete.load(Ordering::Acquire)
    }

    /// Seal the sequence after a terminal producer failure, waking any waiter.
    pub fn abort(&self) {
        self.aborted.store(true, Ordering::Release);
        self.signal_ready();
    }

    /// `true` if the producer gave up before completing.
    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::Acquire)
    }

    /// `true` once no more units will ever be appended.
    pub fn is_sealed(&self) -> bool {
        self.is_complete() || self.is_aborted()
    }

    /// Block until the first unit arrives or the sequence is sealed.
    ///
    /// Returns `true` if at least one unit is available.
    pub fn wait_ready(&self) -> bool {
        let guard = self.ready.lock().unwrap_or_else(PoisonError::into_inner);
        let _guard = self
            .ready_cv
            .wait_while(guard, |ready| !*ready)
            .unwrap_or_else(PoisonError::into_inner);
        !self.is_empty()
    }

    /// Like [`wait_ready`](Self::wait_ready) but gives up after `timeout`.
    pub fn wait_ready_timeout(&self, timeout: Duration) -> bool {
        let guard = self.ready.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = self
            .ready_cv
            .wait_timeout_while(guard, timeout, |ready| !*ready)
            .unwrap_or_else(PoisonError::into_inner);
        !self.is_empty()
    }

    fn signal_ready(&self) {
        let mut ready = self.ready.lock().unwrap_or_else(PoisonError::into_inner);
        if !*ready {
            *ready = true;
            self.ready_cv.notify_all();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/bars.rs"]
mod tests;
