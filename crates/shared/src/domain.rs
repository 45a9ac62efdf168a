use serde::{Deserialize, Serialize};

/// Lowest value the counter can ever hold.
pub const COUNTER_MIN: i64 = -10_001;
/// Highest value the counter can ever hold.
pub const COUNTER_MAX: i64 = 10_001;

/// Pins `value` into `[COUNTER_MIN, COUNTER_MAX]`.
pub fn clamp_to_range(value: i64) -> i64 {
    value.clamp(COUNTER_MIN, COUNTER_MAX)
}

pub fn is_in_range(value: i64) -> bool {
    (COUNTER_MIN..=COUNTER_MAX).contains(&value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterOp {
    Increment,
    Decrement,
    Read,
    Reset,
}

impl CounterOp {
    pub const ALL: [CounterOp; 4] = [
        CounterOp::Increment,
        CounterOp::Decrement,
        CounterOp::Read,
        CounterOp::Reset,
    ];

    pub fn route(self) -> &'static str {
        match self {
            CounterOp::Increment => "/increment",
            CounterOp::Decrement => "/decrement",
            CounterOp::Read => "/value",
            CounterOp::Reset => "/reset",
        }
    }

    pub fn is_mutation(self) -> bool {
        !matches!(self, CounterOp::Read)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CounterOp::Increment => "increment",
            CounterOp::Decrement => "decrement",
            CounterOp::Read => "read",
            CounterOp::Reset => "reset",
        }
    }
}

impl std::fmt::Display for CounterOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
