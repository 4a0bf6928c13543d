pub mod acks;
pub mod calls;
pub mod error;

pub use acks::BatchAck;
pub use calls::{BatchRequest, CallArgs, MethodName, RpcCall};
pub use error::{Result, VizlinkError};
