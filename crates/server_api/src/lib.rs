use std::sync::Arc;

use counter::Counter;
use shared::{
    domain::CounterOp,
    protocol::{CounterResponse, ServiceInfo},
};
use tracing::{debug, info};

#[derive(Clone, Default)]
pub struct ApiContext {
    pub counter: Arc<Counter>,
}

impl ApiContext {
    pub fn new(counter: Counter) -> Self {
        Self {
            counter: Arc::new(counter),
        }
    }
}

pub fn service_info() -> ServiceInfo {
    ServiceInfo::default()
}

pub fn increment(ctx: &ApiContext, submitted: Option<i64>) -> CounterResponse {
    apply(ctx, CounterOp::Increment, submitted)
}

pub fn decrement(ctx: &ApiContext, submitted: Option<i64>) -> CounterResponse {
    apply(ctx, CounterOp::Decrement, submitted)
}

pub fn read(ctx: &ApiContext, submitted: Option<i64>) -> CounterResponse {
    apply(ctx, CounterOp::Read, submitted)
}

pub fn reset(ctx: &ApiContext) -> CounterResponse {
    apply(ctx, CounterOp::Reset, None)
}

/// Runs `op` against the shared counter.
///
/// `submitted` is whatever the client believes the counter to be. It never
/// feeds into the result; the server-held value is authoritative.
pub fn apply(ctx: &ApiContext, op: CounterOp, submitted: Option<i64>) -> CounterResponse {
    let step = ctx.counter.transition(op);
    if let Some(submitted) = submitted {
        if submitted != step.previous {
            debug!(%op, submitted, authoritative = step.previous, "ignoring stale client value");
        }
    }

    match op {
        CounterOp::Reset => info!(previous = step.previous, "counter reset"),
        CounterOp::Read => debug!(value = step.value, "counter read"),
        _ if step.is_unchanged() => debug!(%op, value = step.value, "counter saturated at bound"),
        _ => debug!(%op, value = step.value, "counter updated"),
    }
    CounterResponse { value: step.value }
}
