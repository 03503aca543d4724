// src/graph/mod.rs

//! Task/data lock graph for visualizing which jobs read and write what.
//!
//! - [`lock_graph`] builds the bipartite graph from a job registry.
//! - [`render`] maps nodes and edges to visual attributes and feeds them to a
//!   [`GraphSink`], with [`DotSink`] producing Graphviz DOT.

pub mod lock_graph;
pub mod render;

pub use lock_graph::{
    DataNode, EdgeKind, GraphOptions, LockEdge, LockGraph, LockNode, TaskNode, data_node_id,
    task_node_id,
};
pub use render::{DotSink, GraphSink, GraphStyle, RenderEdge, RenderNode};
