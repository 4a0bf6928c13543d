use serde::Serialize;

use crate::protocol::error::Result;
use crate::protocol::{BatchAck, BatchRequest, RpcCall};

/// JSON codec for the batch/acknowledgement exchange.
///
/// Batches are encoded from a borrowed slice so the flush engine can
/// retransmit the same queue snapshot without cloning it per attempt.
///
/// # Example
///
/// ```
/// use vizlink_common::transport::JsonCodec;
/// use vizlink_common::protocol::RpcCall;
/// use serde_json::json;
///
/// let calls = vec![RpcCall::new("graph.clear", vec![])];
/// let encoded = JsonCodec::encode_batch(9, &calls).unwrap();
/// let decoded = JsonCodec::decode_batch(&encoded).unwrap();
/// assert_eq!(decoded.id, 9);
/// assert_eq!(decoded.calls, calls);
/// ```
pub struct JsonCodec;

/// Borrowed view of a batch, serialized with the same shape as
/// [`BatchRequest`].
#[derive(Serialize)]
struct BatchFrame<'a> {
    id: u64,
    calls: &'a [RpcCall],
}

impl JsonCodec {
    /// Encode a batch of calls to bytes.
    pub fn encode_batch(id: u64, calls: &[RpcCall]) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&BatchFrame { id, calls })?)
    }

    /// Decode a batch from bytes.
    pub fn decode_batch(data: &[u8]) -> Result<BatchRequest> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Encode an acknowledgement to bytes.
    pub fn encode_ack(ack: &BatchAck) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(ack)?)
    }

    /// Decode an acknowledgement from bytes.
    pub fn decode_ack(data: &[u8]) -> Result<BatchAck> {
        Ok(serde_json::from_slice(data)?)
    }
}
