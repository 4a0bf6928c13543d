#![allow(dead_code)]

// Shared test double: an in-process stand-in for the visualization server.
//
// Accepts framed batches, records them in arrival order, and acknowledges
// each one. Can be told to drop the first N accepted connections (to
// simulate connection resets) or to reject every batch with an error.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

use vizlink_client::SessionConfig;
use vizlink_common::protocol::{BatchAck, RpcCall};
use vizlink_common::transport::{read_frame, write_frame, JsonCodec};

pub struct MockServer {
    pub host: String,
    pub port: u16,
    batches: Arc<Mutex<Vec<Vec<RpcCall>>>>,
}

pub struct MockServerBuilder {
    drop_connections: usize,
    reject_with: Option<String>,
}

impl MockServer {
    pub async fn start() -> Self {
        Self::builder().start().await
    }

    pub fn builder() -> MockServerBuilder {
        MockServerBuilder {
            drop_connections: 0,
            reject_with: None,
        }
    }

    /// Every batch received so far, in arrival order.
    pub async fn batches(&self) -> Vec<Vec<RpcCall>> {
        self.batches.lock().await.clone()
    }

    /// Every call received so far, flattened across batches.
    pub async fn calls(&self) -> Vec<RpcCall> {
        self.batches.lock().await.iter().flatten().cloned().collect()
    }

    /// A session config pointing at this server, with the periodic
    /// flusher parked out of the way so tests control every flush.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            host: self.host.clone(),
            port: self.port,
            flush_interval: Duration::from_secs(3600),
            retry_backoff: Duration::from_millis(10),
            ..SessionConfig::default()
        }
    }
}

impl MockServerBuilder {
    /// Drop the first `n` accepted connections without answering,
    /// simulating a server that resets the client.
    pub fn drop_connections(mut self, n: usize) -> Self {
        self.drop_connections = n;
        self
    }

    /// Acknowledge every batch with an error instead of accepting it.
    pub fn reject_with(mut self, error: &str) -> Self {
        self.reject_with = Some(error.to_string());
        self
    }

    pub async fn start(self) -> MockServer {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let batches: Arc<Mutex<Vec<Vec<RpcCall>>>> = Arc::new(Mutex::new(Vec::new()));
        let drop_left = Arc::new(AtomicUsize::new(self.drop_connections));
        let recorded = batches.clone();
        let reject = self.reject_with;

        tokio::spawn(async move {
            loop {
                let Ok((socket, _)) = listener.accept().await else {
                    return;
                };

                if drop_left.load(Ordering::SeqCst) > 0 {
                    drop_left.fetch_sub(1, Ordering::SeqCst);
                    drop(socket);
                    continue;
                }

                let recorded = recorded.clone();
                let reject = reject.clone();
                tokio::spawn(async move {
                    serve(socket, recorded, reject).await;
                });
            }
        });

        MockServer {
            host: addr.ip().to_string(),
            port: addr.port(),
            batches,
        }
    }
}

async fn serve(
    mut socket: TcpStream,
    recorded: Arc<Mutex<Vec<Vec<RpcCall>>>>,
    reject: Option<String>,
) {
    while let Ok(frame) = read_frame(&mut socket).await {
        let Ok(batch) = JsonCodec::decode_batch(&frame) else {
            return;
        };

        let ack = match &reject {
            Some(error) => BatchAck::rejected(batch.id, error.clone()),
            None => {
                let accepted = batch.calls.len();
                recorded.lock().await.push(batch.calls);
                BatchAck::accepted(batch.id, accepted)
            }
        };

        let Ok(encoded) = JsonCodec::encode_ack(&ack) else {
            return;
        };
        if write_frame(&mut socket, &encoded).await.is_err() {
            return;
        }
    }
}
