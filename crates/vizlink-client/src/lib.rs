//! Vizlink Client
//!
//! A batching client for a remote graph-visualization server. Vertices and
//! edges are manipulated through typed handles; every mutation becomes one
//! remote procedure call, and calls are accumulated in a session-wide
//! queue and shipped as combined requests, amortizing round-trip cost and
//! riding out transient connection loss.
//!
//! # Overview
//!
//! - [`Session`] owns the call queue, the identifier allocator and the
//!   connection, and flushes the queue when it grows past a threshold,
//!   when the periodic flusher fires, at [`Session::clear`], and at
//!   [`Session::shutdown`].
//! - [`Vertex`] and [`Edge`] are thin handles that translate attribute
//!   mutations into queued calls through their session.
//!
//! Calls reach the server in exactly the order they were submitted. A
//! connection the server drops mid-flush is replaced and the same batch is
//! retransmitted, indefinitely by default (see
//! [`SessionConfig::max_flush_retries`]).
//!
//! # Example
//!
//! ```no_run
//! use vizlink_client::{Session, SessionConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> vizlink_client::Result<()> {
//! let session = Session::new(SessionConfig::default());
//!
//! let a = session.new_vertex().await?;
//! let b = session.new_vertex().await?;
//! a.set_label("a").await?;
//! b.set_label("b").await?;
//!
//! let edge = session.new_edge(&a, &b).await?;
//! edge.set_arrow(true).await?;
//!
//! a.draw().await?;
//! b.draw().await?;
//! edge.draw().await?;
//!
//! session.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod graph;
pub mod session;

mod flusher;
mod methods;

pub use graph::{Edge, Vertex};
pub use session::{Session, SessionConfig};
pub use vizlink_common::protocol::{Result, RpcCall, VizlinkError};
