//! Draws a twelve-vertex ring on a visualization server running on the
//! default port.
//!
//! ```bash
//! cargo run --example ring
//! ```

use anyhow::Result;
use vizlink_client::{Session, SessionConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let session = Session::new(SessionConfig::default());
    session.clear().await?;

    let mut vertices = Vec::new();
    for i in 0..12 {
        let vertex = session.new_vertex().await?;
        vertex.set_label(&format!("v{}", i)).await?;
        vertex.set_color("#4060ff").await?;
        vertex.set_shape("sphere").await?;
        vertex.draw().await?;
        vertices.push(vertex);
    }

    for i in 0..vertices.len() {
        let from = &vertices[i];
        let to = &vertices[(i + 1) % vertices.len()];
        let edge = session.new_edge(from, to).await?;
        edge.set_arrow(true).await?;
        edge.draw().await?;
    }

    session.shutdown().await?;
    Ok(())
}
