//! Remote procedure names understood by the visualization server.

pub(crate) const NEW_VERTEX: &str = "graph.new_vertex_w_id";
pub(crate) const REMOVE_VERTEX: &str = "graph.remove_vertex";
pub(crate) const SET_VERTEX_ATTRIBUTE: &str = "graph.set_vertex_attribute";

pub(crate) const NEW_EDGE: &str = "graph.new_edge_w_id";
pub(crate) const REMOVE_EDGE: &str = "graph.remove_edge";
pub(crate) const SET_EDGE_ATTRIBUTE: &str = "graph.set_edge_attribute";

pub(crate) const CLEAR: &str = "graph.clear";
