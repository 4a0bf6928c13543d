use std::net::ToSocketAddrs;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

use crate::protocol::calls::next_batch_id;
use crate::protocol::error::{Result, VizlinkError};
use crate::protocol::{BatchAck, RpcCall};
use crate::transport::codec::JsonCodec;

/// Hard cap on a single frame, requests and acknowledgements alike.
pub const MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024; // 16 MB

/// A single live connection to the visualization server.
///
/// Construction is cheap and performs no I/O: the TCP stream is dialed on
/// the first [`send_batch`](Self::send_batch). Exactly one connection is
/// held per session; a connection that failed is discarded and replaced by
/// its owner, never repaired in place.
///
/// # Wire Protocol
///
/// Each combined request is one frame: a 4-byte length prefix (big-endian
/// u32) followed by the JSON-encoded batch. The server answers every batch
/// with a single acknowledgement frame in the same format:
///
/// ```text
/// [4-byte length] [JSON data]
/// ```
///
/// # Example
///
/// ```no_run
/// use vizlink_common::transport::Connection;
/// use vizlink_common::protocol::RpcCall;
/// use serde_json::json;
///
/// # #[tokio::main]
/// # async fn main() -> vizlink_common::Result<()> {
/// let mut conn = Connection::new("127.0.0.1", 20738);
/// let calls = vec![RpcCall::new("graph.clear", vec![])];
/// conn.send_batch(&calls).await?;
/// # Ok(())
/// # }
/// ```
pub struct Connection {
    addr: String,
    stream: Option<TcpStream>,
}

impl Connection {
    /// Creates a connection handle for `host:port` without dialing it.
    /// Reachability failures surface on the first send.
    pub fn new(host: &str, port: u16) -> Self {
        Connection {
            addr: format!("{}:{}", host, port),
            stream: None,
        }
    }

    /// The endpoint this connection points at, as `host:port`.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Sends `calls` as one combined request and waits for the server's
    /// acknowledgement.
    ///
    /// # Errors
    ///
    /// - [`VizlinkError::ConnectionReset`] when the peer dropped an
    ///   established stream; the caller may retry on a fresh connection
    /// - [`VizlinkError::Connection`] when the endpoint cannot be dialed
    /// - [`VizlinkError::Rejected`] when the server acknowledged the batch
    ///   with an error
    /// - [`VizlinkError::InvalidResponse`] on a malformed or mismatched
    ///   acknowledgement
    pub async fn send_batch(&mut self, calls: &[RpcCall]) -> Result<BatchAck> {
        let result = self.send_batch_inner(calls).await;
        if result.is_err() {
            // a stream that failed mid-exchange cannot carry the next frame
            self.stream = None;
        }
        result
    }

    async fn send_batch_inner(&mut self, calls: &[RpcCall]) -> Result<BatchAck> {
        let stream = match self.stream.take() {
            Some(stream) => stream,
            None => {
                let stream = dial(&self.addr).await?;
                debug!(addr = %self.addr, "connection established");
                stream
            }
        };
        let stream = self.stream.insert(stream);

        let id = next_batch_id();
        let encoded = JsonCodec::encode_batch(id, calls)?;
        write_frame(stream, &encoded).await?;

        let reply = read_frame(stream).await?;
        let ack = JsonCodec::decode_ack(&reply)?;

        if ack.id != id {
            return Err(VizlinkError::InvalidResponse(format!(
                "acknowledgement carries id {} but batch {} was sent",
                ack.id, id
            )));
        }
        if let Some(error) = ack.error {
            return Err(VizlinkError::Rejected(error));
        }
        Ok(ack)
    }
}

/// Writes one length-prefixed frame.
///
/// Wire format: `[4-byte length as u32 big-endian] + [data]`
pub async fn write_frame(stream: &mut TcpStream, data: &[u8]) -> Result<()> {
    let len = data.len() as u32;

    stream
        .write_all(&len.to_be_bytes())
        .await
        .map_err(map_io_error)?;
    stream.write_all(data).await.map_err(map_io_error)?;
    stream.flush().await.map_err(map_io_error)?;

    Ok(())
}

/// Reads one length-prefixed frame.
///
/// Wire format: `[4-byte length as u32 big-endian] + [data]`
///
/// # Errors
///
/// Returns an error if the frame exceeds [`MAX_MESSAGE_SIZE`] or the
/// stream fails mid-read.
pub async fn read_frame(stream: &mut TcpStream) -> Result<Vec<u8>> {
    let mut len_buf = [0u8; 4];
    stream
        .read_exact(&mut len_buf)
        .await
        .map_err(map_io_error)?;

    let len = u32::from_be_bytes(len_buf) as usize;
    if len > MAX_MESSAGE_SIZE {
        return Err(VizlinkError::InvalidResponse(format!(
            "frame too large: {} bytes (max {} bytes)",
            len, MAX_MESSAGE_SIZE
        )));
    }

    let mut buf = vec![0u8; len];
    stream.read_exact(&mut buf).await.map_err(map_io_error)?;

    Ok(buf)
}

/// Resolves the address and connects to the first endpoint that accepts.
async fn dial(addr: &str) -> Result<TcpStream> {
    let socket_addrs = addr
        .to_socket_addrs()
        .map_err(|e| VizlinkError::Connection(format!("Invalid address '{}': {}", addr, e)))?;

    let mut last_err = None;
    for socket_addr in socket_addrs {
        match TcpStream::connect(&socket_addr).await {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(e),
        }
    }

    Err(VizlinkError::Connection(format!(
        "Failed to connect to {}: {}",
        addr,
        last_err
            .map(|e| e.to_string())
            .unwrap_or_else(|| "Unknown error".to_string())
    )))
}

/// Map IO errors on an established stream to the error taxonomy.
///
/// Reset-class kinds (the peer dropped the connection under us) become
/// [`VizlinkError::ConnectionReset`], the one failure the flush engine
/// retries. Everything else stays fatal.
fn map_io_error(err: std::io::Error) -> VizlinkError {
    match err.kind() {
        std::io::ErrorKind::ConnectionReset
        | std::io::ErrorKind::ConnectionAborted
        | std::io::ErrorKind::BrokenPipe
        | std::io::ErrorKind::NotConnected
        | std::io::ErrorKind::UnexpectedEof => VizlinkError::ConnectionReset,
        _ => VizlinkError::Io(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::net::TcpListener;

    async fn unused_port() -> u16 {
        // bind and immediately drop to find a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    }

    #[test]
    fn test_construction_performs_no_io() {
        let conn = Connection::new("host.invalid", 20738);
        assert_eq!(conn.addr(), "host.invalid:20738");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_a_fatal_connection_error() {
        let port = unused_port().await;
        let mut conn = Connection::new("127.0.0.1", port);

        let err = conn
            .send_batch(&[RpcCall::new("graph.clear", vec![])])
            .await
            .unwrap_err();

        assert!(matches!(err, VizlinkError::Connection(_)));
    }

    #[tokio::test]
    async fn test_peer_dropping_the_stream_is_a_reset() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            // accept and drop without answering
            let _ = listener.accept().await;
        });

        let mut conn = Connection::new("127.0.0.1", port);
        let err = conn
            .send_batch(&[RpcCall::new("graph.clear", vec![])])
            .await
            .unwrap_err();

        assert!(matches!(err, VizlinkError::ConnectionReset));
    }

    #[tokio::test]
    async fn test_frame_round_trip() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let frame = read_frame(&mut socket).await.unwrap();
            write_frame(&mut socket, &frame).await.unwrap();
        });

        let mut stream = TcpStream::connect(addr).await.unwrap();
        write_frame(&mut stream, b"{\"probe\":true}").await.unwrap();
        let echoed = read_frame(&mut stream).await.unwrap();

        assert_eq!(echoed, b"{\"probe\":true}");
    }

    #[tokio::test]
    async fn test_send_batch_checks_the_acknowledgement_id() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let _ = read_frame(&mut socket).await.unwrap();
            // answer with an ack for a batch nobody sent
            let ack = JsonCodec::encode_ack(&BatchAck::accepted(u64::MAX, 1)).unwrap();
            write_frame(&mut socket, &ack).await.unwrap();
        });

        let mut conn = Connection::new("127.0.0.1", port);
        let err = conn
            .send_batch(&[RpcCall::new("graph.new_vertex_w_id", vec![json!(1)])])
            .await
            .unwrap_err();

        assert!(matches!(err, VizlinkError::InvalidResponse(_)));
    }
}
