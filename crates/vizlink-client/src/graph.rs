//! Vertex and edge handles.
//!
//! Handles are thin: they carry an identifier and a session clone, and
//! every mutation is one queued remote call. Attribute values travel as
//! strings; the server decides what they mean, and nothing here validates
//! them.

use serde_json::json;

use vizlink_common::protocol::{Result, RpcCall};

use crate::methods;
use crate::session::Session;

/// A vertex known to the visualization server.
///
/// New vertices start hidden; call [`draw`](Self::draw) once their
/// attributes are staged.
pub struct Vertex {
    id: i32,
    session: Session,
}

impl Vertex {
    pub(crate) async fn create(session: Session) -> Result<Self> {
        let id = session.next_id();
        session
            .submit(RpcCall::new(methods::NEW_VERTEX, vec![json!(id)]))
            .await?;
        let vertex = Vertex { id, session };
        vertex.hide().await?;
        Ok(vertex)
    }

    /// Identifier issued by the session's allocator.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Deletes the vertex from the server.
    pub async fn remove(self) -> Result<()> {
        self.session
            .submit(RpcCall::new(methods::REMOVE_VERTEX, vec![json!(self.id)]))
            .await
    }

    /// Sets one attribute.
    pub async fn set_attribute(&self, name: &str, value: impl ToString) -> Result<()> {
        self.session
            .submit(RpcCall::new(
                methods::SET_VERTEX_ATTRIBUTE,
                vec![json!(self.id), json!(name), json!(value.to_string())],
            ))
            .await
    }

    /// Sets several attributes, one call per pair, in iteration order.
    pub async fn set_attributes<'a, I, V>(&self, attrs: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, V)>,
        V: ToString,
    {
        for (name, value) in attrs {
            self.set_attribute(name, value).await?;
        }
        Ok(())
    }

    pub async fn set_color(&self, color: &str) -> Result<()> {
        self.set_attribute("color", color).await
    }

    pub async fn set_shape(&self, shape: &str) -> Result<()> {
        self.set_attribute("shape", shape).await
    }

    pub async fn set_shape_detail(&self, detail: u32) -> Result<()> {
        self.set_attribute("shapedetail", detail).await
    }

    pub async fn set_label(&self, label: &str) -> Result<()> {
        self.set_attribute("label", label).await
    }

    pub async fn set_label_position(&self, position: &str) -> Result<()> {
        self.set_attribute("labelpos", position).await
    }

    pub async fn set_size(&self, size: f64) -> Result<()> {
        self.set_attribute("size", size).await
    }

    pub async fn set_font_color(&self, color: &str) -> Result<()> {
        self.set_attribute("fontcolor", color).await
    }

    // TODO: the server only ships Helvetica and Times Roman; reject other families here
    pub async fn set_font_family(&self, family: &str) -> Result<()> {
        self.set_attribute("fontfamily", family).await
    }

    pub async fn set_font_size(&self, size: u32) -> Result<()> {
        self.set_attribute("fontsize", size).await
    }

    /// Makes the vertex visible.
    pub async fn draw(&self) -> Result<()> {
        self.set_attribute("visible", "true").await
    }

    /// Hides the vertex without removing it.
    pub async fn hide(&self) -> Result<()> {
        self.set_attribute("visible", "false").await
    }

    /// Registers a URL the server calls back on left double-click.
    pub async fn set_double_click_callback(&self, url: &str) -> Result<()> {
        self.set_attribute("callback_left_doubleclick", url).await
    }
}

/// An edge between two vertices.
///
/// Like vertices, edges start hidden until [`draw`](Self::draw).
pub struct Edge {
    id: i32,
    session: Session,
}

impl Edge {
    pub(crate) async fn create(session: Session, from: &Vertex, to: &Vertex) -> Result<Self> {
        let id = session.next_id();
        session
            .submit(RpcCall::new(
                methods::NEW_EDGE,
                vec![json!(id), json!(from.id()), json!(to.id())],
            ))
            .await?;
        let edge = Edge { id, session };
        edge.hide().await?;
        Ok(edge)
    }

    /// Identifier issued by the session's allocator.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Deletes the edge from the server.
    pub async fn remove(self) -> Result<()> {
        self.session
            .submit(RpcCall::new(methods::REMOVE_EDGE, vec![json!(self.id)]))
            .await
    }

    /// Sets one attribute.
    pub async fn set_attribute(&self, name: &str, value: impl ToString) -> Result<()> {
        self.session
            .submit(RpcCall::new(
                methods::SET_EDGE_ATTRIBUTE,
                vec![json!(self.id), json!(name), json!(value.to_string())],
            ))
            .await
    }

    /// Sets several attributes, one call per pair, in iteration order.
    pub async fn set_attributes<'a, I, V>(&self, attrs: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, V)>,
        V: ToString,
    {
        for (name, value) in attrs {
            self.set_attribute(name, value).await?;
        }
        Ok(())
    }

    pub async fn set_color(&self, color: &str) -> Result<()> {
        self.set_attribute("color", color).await
    }

    pub async fn set_label(&self, label: &str) -> Result<()> {
        self.set_attribute("label", label).await
    }

    pub async fn set_label_position(&self, position: &str) -> Result<()> {
        self.set_attribute("labelpos", position).await
    }

    pub async fn set_font_color(&self, color: &str) -> Result<()> {
        self.set_attribute("fontcolor", color).await
    }

    pub async fn set_font_family(&self, family: &str) -> Result<()> {
        self.set_attribute("fontfamily", family).await
    }

    pub async fn set_font_size(&self, size: u32) -> Result<()> {
        self.set_attribute("fontsize", size).await
    }

    pub async fn set_strength(&self, strength: f64) -> Result<()> {
        self.set_attribute("strength", strength).await
    }

    pub async fn set_orientation_weight(&self, weight: f64) -> Result<()> {
        self.set_attribute("orientationweight", weight).await
    }

    pub async fn set_width(&self, width: f64) -> Result<()> {
        self.set_attribute("width", width).await
    }

    pub async fn set_arrow(&self, arrow: bool) -> Result<()> {
        self.set_attribute("arrow", arrow).await
    }

    pub async fn set_show_strain(&self, show: bool) -> Result<()> {
        self.set_attribute("showstrain", show).await
    }

    /// Makes the edge visible.
    pub async fn draw(&self) -> Result<()> {
        self.set_attribute("visible", "true").await
    }

    /// Hides the edge without removing it.
    pub async fn hide(&self) -> Result<()> {
        self.set_attribute("visible", "false").await
    }
}
