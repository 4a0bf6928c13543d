use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

pub type MethodName = String;
pub type CallArgs = Vec<serde_json::Value>;

static BATCH_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// One remote procedure invocation: a method name plus its arguments in
/// positional order. Immutable once queued.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcCall {
    pub method: MethodName,
    pub args: CallArgs,
}

impl RpcCall {
    pub fn new(method: impl Into<String>, args: CallArgs) -> Self {
        RpcCall {
            method: method.into(),
            args,
        }
    }
}

/// A combined request: every call queued at flush time, shipped as one
/// frame. Call order within the batch is the order of submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchRequest {
    pub id: u64,
    pub calls: Vec<RpcCall>,
}

impl BatchRequest {
    pub fn new(calls: Vec<RpcCall>) -> Self {
        BatchRequest {
            id: next_batch_id(),
            calls,
        }
    }
}

pub(crate) fn next_batch_id() -> u64 {
    BATCH_ID_COUNTER.fetch_add(1, Ordering::SeqCst)
}
