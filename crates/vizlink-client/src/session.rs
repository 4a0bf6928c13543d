use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use vizlink_common::protocol::{Result, RpcCall, VizlinkError};
use vizlink_common::transport::Connection;

use crate::flusher::Flusher;
use crate::graph::{Edge, Vertex};
use crate::methods;

/// Port the visualization server listens on by default.
pub const DEFAULT_PORT: u16 = 20738;

/// Queue length at which `submit` forces a flush.
pub const DEFAULT_BATCH_THRESHOLD: usize = 256;

/// Session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub host: String,
    pub port: u16,
    /// How long the background flusher sleeps between flushes.
    pub flush_interval: Duration,
    /// Queue length that forces a flush from inside [`Session::submit`].
    pub batch_threshold: usize,
    /// Reconnect attempts per flush before giving up; `None` retries
    /// forever, favoring eventual delivery over bounded latency.
    pub max_flush_retries: Option<u32>,
    /// Pause between replacing a reset connection and retransmitting.
    pub retry_backoff: Duration,
    /// Reconnect attempts allowed for the final flush during shutdown, so
    /// process exit cannot hang on an unreachable server.
    pub shutdown_retries: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            flush_interval: Duration::from_secs(1),
            batch_threshold: DEFAULT_BATCH_THRESHOLD,
            max_flush_retries: None,
            retry_backoff: Duration::from_millis(100),
            shutdown_retries: 3,
        }
    }
}

/// Queue and connection, guarded together by one lock: a flush owns both
/// for its whole duration, so no submit can interleave with a batch in
/// flight and no two flushes can overlap.
struct State {
    pool: Vec<RpcCall>,
    conn: Connection,
}

pub(crate) struct Shared {
    pub(crate) config: SessionConfig,
    state: Mutex<State>,
    next_id: AtomicI32,
    shutdown: watch::Sender<bool>,
    flusher: std::sync::Mutex<Option<JoinHandle<()>>>,
}

impl Shared {
    pub(crate) async fn flush(&self, retry_limit: Option<u32>) -> Result<()> {
        let mut state = self.state.lock().await;
        self.flush_locked(&mut state, retry_limit).await
    }

    /// Drains the queue as one combined request.
    ///
    /// The queue is cleared only once the server acknowledged the batch;
    /// on a reset the connection is replaced and the identical batch is
    /// retransmitted. Any other transport failure propagates and leaves
    /// the queue intact.
    async fn flush_locked(&self, state: &mut State, retry_limit: Option<u32>) -> Result<()> {
        if state.pool.is_empty() {
            return Ok(());
        }

        let mut attempts: u32 = 0;
        loop {
            match state.conn.send_batch(&state.pool).await {
                Ok(_) => {
                    debug!(calls = state.pool.len(), "batch delivered");
                    state.pool.clear();
                    return Ok(());
                }
                Err(VizlinkError::ConnectionReset) => {
                    attempts += 1;
                    if let Some(max) = retry_limit {
                        if attempts > max {
                            return Err(VizlinkError::ConnectionReset);
                        }
                    }
                    warn!(
                        attempt = attempts,
                        addr = state.conn.addr(),
                        "connection reset during flush, reconnecting"
                    );
                    state.conn = Connection::new(&self.config.host, self.config.port);
                    if !self.config.retry_backoff.is_zero() {
                        tokio::time::sleep(self.config.retry_backoff).await;
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        if *self.shutdown.borrow() {
            return;
        }
        let pending = self.state.get_mut().pool.len();
        if pending > 0 {
            warn!(
                pending,
                "session dropped with undelivered calls, call shutdown() to flush before exit"
            );
        }
    }
}

/// Handle to one batching session against a visualization server.
///
/// Cheap to clone; every clone shares the same queue, identifier counter
/// and connection. Must be created from within a tokio runtime, since
/// construction spawns the periodic flusher task.
///
/// # Example
///
/// ```no_run
/// use vizlink_client::{RpcCall, Session, SessionConfig};
/// use serde_json::json;
///
/// # #[tokio::main]
/// # async fn main() -> vizlink_client::Result<()> {
/// let session = Session::new(SessionConfig::default());
///
/// let id = session.next_id();
/// session
///     .submit(RpcCall::new("graph.new_vertex_w_id", vec![json!(id)]))
///     .await?;
///
/// session.shutdown().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Session {
    shared: Arc<Shared>,
}

impl Session {
    /// Creates a session and spawns its periodic flusher.
    ///
    /// No I/O happens here: the connection is dialed on the first flush
    /// that has calls to deliver.
    pub fn new(config: SessionConfig) -> Self {
        let (shutdown, shutdown_rx) = watch::channel(false);
        let conn = Connection::new(&config.host, config.port);
        let interval = config.flush_interval;

        let shared = Arc::new(Shared {
            config,
            state: Mutex::new(State {
                pool: Vec::new(),
                conn,
            }),
            next_id: AtomicI32::new(i32::MIN),
            shutdown,
            flusher: std::sync::Mutex::new(None),
        });

        let flusher = Flusher::new(Arc::downgrade(&shared), interval, shutdown_rx);
        let handle = flusher.spawn();
        *shared.flusher.lock().unwrap() = Some(handle);

        Session { shared }
    }

    /// Allocates a fresh entity identifier.
    ///
    /// A single atomic increment-and-read: values handed to concurrent
    /// callers are pairwise distinct and strictly increasing. Performs no
    /// I/O and cannot fail, so handles are usable before the server has
    /// acknowledged anything. The first identifier of a session is one
    /// above the signed-32-bit floor the wire encoding requires.
    pub fn next_id(&self) -> i32 {
        self.shared.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Appends one call to the queue.
    ///
    /// When the queue reaches [`SessionConfig::batch_threshold`] the same
    /// call synchronously flushes it before returning, so once every N
    /// submissions this blocks on network I/O. Only the flush it triggered
    /// itself can make `submit` fail.
    pub async fn submit(&self, call: RpcCall) -> Result<()> {
        let mut state = self.shared.state.lock().await;
        state.pool.push(call);
        if state.pool.len() >= self.shared.config.batch_threshold {
            self.shared
                .flush_locked(&mut state, self.shared.config.max_flush_retries)
                .await?;
        }
        Ok(())
    }

    /// Transmits everything queued as one combined request.
    ///
    /// Flushing an empty queue is a no-op: no connection is dialed, no
    /// frame is written, and the call cannot fail.
    pub async fn flush(&self) -> Result<()> {
        self.shared
            .flush(self.shared.config.max_flush_retries)
            .await
    }

    /// Removes every vertex and edge from the server.
    ///
    /// Calls queued before `clear` are flushed first so the server
    /// observes them, then the clear itself is delivered in its own
    /// immediately-flushed batch.
    pub async fn clear(&self) -> Result<()> {
        let mut state = self.shared.state.lock().await;
        let retry_limit = self.shared.config.max_flush_retries;

        self.shared.flush_locked(&mut state, retry_limit).await?;
        state.pool.push(RpcCall::new(methods::CLEAR, Vec::new()));
        self.shared.flush_locked(&mut state, retry_limit).await
    }

    /// Stops the periodic flusher and performs one final best-effort
    /// flush of whatever accumulated below the threshold.
    ///
    /// Idempotent: the first call wins, later calls return immediately.
    /// The final flush bounds its reconnect attempts by
    /// [`SessionConfig::shutdown_retries`].
    pub async fn shutdown(&self) -> Result<()> {
        if self.shared.shutdown.send_replace(true) {
            return Ok(());
        }

        let handle = self.shared.flusher.lock().unwrap().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }

        self.shared
            .flush(Some(self.shared.config.shutdown_retries))
            .await
    }

    /// Creates a vertex on the server and returns its handle.
    pub async fn new_vertex(&self) -> Result<Vertex> {
        Vertex::create(self.clone()).await
    }

    /// Creates an edge between two vertices and returns its handle.
    pub async fn new_edge(&self, from: &Vertex, to: &Vertex) -> Result<Edge> {
        Edge::create(self.clone(), from, to).await
    }
}
