use std::sync::atomic::{AtomicI64, Ordering};

use shared::domain::{clamp_to_range, CounterOp};

/// The single shared, range-bounded integer.
///
/// Every mutation is one atomic read-modify-write with the clamp folded into
/// it, so concurrent callers can neither lose updates nor push the value out
/// of `[COUNTER_MIN, COUNTER_MAX]`. Share it behind an `Arc`.
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicI64,
}

/// Value before and after one operation, observed by the same atomic step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub previous: i64,
    pub value: i64,
}

impl Transition {
    /// True when a mutation left the value where it was, e.g. pressed against a bound.
    pub fn is_unchanged(&self) -> bool {
        self.previous == self.value
    }
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the counter at `seed`, clamped into range.
    pub fn with_value(seed: i64) -> Self {
        Self {
            value: AtomicI64::new(clamp_to_range(seed)),
        }
    }

    pub fn increment(&self) -> i64 {
        self.transition(CounterOp::Increment).value
    }

    pub fn decrement(&self) -> i64 {
        self.transition(CounterOp::Decrement).value
    }

    pub fn read(&self) -> i64 {
        self.value.load(Ordering::SeqCst)
    }

    pub fn reset(&self) -> i64 {
        self.transition(CounterOp::Reset).value
    }

    pub fn apply(&self, op: CounterOp) -> i64 {
        self.transition(op).value
    }

    pub fn transition(&self, op: CounterOp) -> Transition {
        match op {
            CounterOp::Increment => self.update(|current| current.saturating_add(1)),
            CounterOp::Decrement => self.update(|current| current.saturating_sub(1)),
            CounterOp::Read => {
                let value = self.read();
                Transition {
                    previous: value,
                    value,
                }
            }
            CounterOp::Reset => Transition {
                previous: self.value.swap(0, Ordering::SeqCst),
                value: 0,
            },
        }
    }

    fn update(&self, step: impl Fn(i64) -> i64) -> Transition {
        let outcome = self
            .value
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                Some(clamp_to_range(step(current)))
            });
        // The closure never returns `None`, so both arms carry the previous value.
        let previous = match outcome {
            Ok(previous) | Err(previous) => previous,
        };
        Transition {
            previous,
            value: clamp_to_range(step(previous)),
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
