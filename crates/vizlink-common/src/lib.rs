//! Vizlink Common Types and Transport
//!
//! This crate provides the protocol definitions and TCP transport layer
//! shared by the vizlink graph-visualization client.
//!
//! # Overview
//!
//! Vizlink is a client-side facade over a remote graph-visualization
//! server. Callers mutate vertices and edges through typed handles; every
//! mutation becomes one remote procedure call, and calls are accumulated
//! and shipped to the server as combined requests. This crate contains the
//! pieces both halves of that conversation agree on:
//!
//! - **Protocol Layer**: call, batch and acknowledgement types, plus the
//!   error taxonomy
//! - **Transport Layer**: a framed TCP connection with JSON serialization
//!
//! # Architecture
//!
//! The wire protocol is deliberately simple:
//! - **Transport**: one TCP connection per session, dialed lazily
//! - **Serialization**: JSON
//! - **Message Format**: `[4-byte length prefix as u32 big-endian] + [JSON data]`
//! - **Max Message Size**: 16 MB (prevents memory exhaustion)
//!
//! # Example
//!
//! ```no_run
//! use vizlink_common::{Connection, RpcCall};
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() -> vizlink_common::Result<()> {
//! let mut conn = Connection::new("127.0.0.1", 20738);
//! let calls = vec![RpcCall::new("graph.new_vertex_w_id", vec![json!(1)])];
//! let ack = conn.send_batch(&calls).await?;
//! assert_eq!(ack.accepted, 1);
//! # Ok(())
//! # }
//! ```

pub mod protocol;
pub mod transport;

pub use protocol::*;
pub use transport::Connection;
