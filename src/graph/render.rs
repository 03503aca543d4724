// src/graph/render.rs

use std::fmt::Write as _;

use crate::graph::lock_graph::{EdgeKind, LockGraph, LockNode};
use crate::job::variant_for;

const DATA_FILL: &str = "#d2e3f3";
const FONT_COLOR: &str = "#000000";

/// Visual attributes of one node as handed to a sink.
///
/// `label` is an HTML-like label body (Graphviz `label=<...>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderNode {
    pub name: String,
    pub label: String,
    pub shape: String,
    pub fill_color: String,
    pub font_color: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderEdge {
    pub source: String,
    pub dest: String,
    pub style: String,
}

/// Consumer of a rendered graph (an image backend, a DOT writer, ...).
pub trait GraphSink {
    fn node(&mut self, node: &RenderNode);
    fn edge(&mut self, edge: &RenderEdge);
}

type NodeAttr = Box<dyn Fn(&LockNode) -> String>;

/// Per-node attribute overrides. Anything left unset uses the defaults:
/// tasks are ellipses labelled with the job name and primary resource and
/// filled by kind, data nodes are pale blue boxes.
#[derive(Default)]
pub struct GraphStyle {
    label: Option<NodeAttr>,
    shape: Option<NodeAttr>,
    fill_color: Option<NodeAttr>,
    font_color: Option<NodeAttr>,
}

impl GraphStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, f: impl Fn(&LockNode) -> String + 'static) -> Self {
        self.label = Some(Box::new(f));
        self
    }

    pub fn with_shape(mut self, f: impl Fn(&LockNode) -> String + 'static) -> Self {
        self.shape = Some(Box::new(f));
        self
    }

    pub fn with_fill_color(mut self, f: impl Fn(&LockNode) -> String + 'static) -> Self {
        self.fill_color = Some(Box::new(f));
        self
    }

    pub fn with_font_color(mut self, f: impl Fn(&LockNode) -> String + 'static) -> Self {
        self.font_color = Some(Box::new(f));
        self
    }

    fn render_node(&self, node: &LockNode) -> RenderNode {
        let pick = |attr: &Option<NodeAttr>, default: fn(&LockNode) -> String| match attr {
            Some(f) => f(node),
            None => default(node),
        };
        RenderNode {
            name: node.id().to_string(),
            label: pick(&self.label, default_label),
            shape: pick(&self.shape, default_shape),
            fill_color: pick(&self.fill_color, default_fill_color),
            font_color: pick(&self.font_color, |_| FONT_COLOR.to_string()),
        }
    }
}

impl std::fmt::Debug for GraphStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphStyle")
            .field("label", &self.label.is_some())
            .field("shape", &self.shape.is_some())
            .field("fill_color", &self.fill_color.is_some())
            .field("font_color", &self.font_color.is_some())
            .finish()
    }
}

fn default_label(node: &LockNode) -> String {
    match node {
        LockNode::Task(t) => format!(
            "{}<br/>{}",
            escape_html(&t.job),
            escape_html(t.primary_resource.as_deref().unwrap_or(""))
        ),
        LockNode::Data(d) => escape_html(&d.resource),
    }
}

fn default_shape(node: &LockNode) -> String {
    match node {
        LockNode::Task(_) => "ellipse".to_string(),
        LockNode::Data(_) => "box".to_string(),
    }
}

fn default_fill_color(node: &LockNode) -> String {
    match node {
        LockNode::Task(t) => variant_for(t.kind).fill_color.to_string(),
        LockNode::Data(_) => DATA_FILL.to_string(),
    }
}

fn edge_style(kind: EdgeKind) -> &'static str {
    match kind {
        EdgeKind::Task => "dotted",
        EdgeKind::Data => "solid",
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

impl LockGraph {
    /// Feed every node, then every edge, to `sink` in insertion order.
    pub fn render<S: GraphSink + ?Sized>(&self, style: &GraphStyle, sink: &mut S) {
        for node in self.nodes() {
            sink.node(&style.render_node(node));
        }
        for edge in self.edges() {
            sink.edge(&RenderEdge {
                source: edge.source.to_string(),
                dest: edge.dest.to_string(),
                style: edge_style(edge.kind).to_string(),
            });
        }
    }
}

/// Sink producing a Graphviz `digraph` document.
#[derive(Debug, Clone)]
pub struct DotSink {
    out: String,
}

impl DotSink {
    pub fn new(name: &str) -> Self {
        let name = escape_dot(name);
        let mut out = String::new();
        let _ = writeln!(out, "digraph \"{name}\" {{");
        let _ = writeln!(out, "  label=\"{name}\";");
        Self { out }
    }

    /// Close the document and return it.
    pub fn finish(mut self) -> String {
        self.out.push_str("}\n");
        self.out
    }
}

impl GraphSink for DotSink {
    fn node(&mut self, node: &RenderNode) {
        let _ = write!(
            self.out,
            "  \"{}\" [label=<{}>, shape={}, style=filled",
            escape_dot(&node.name),
            node.label,
            node.shape
        );
        if !node.fill_color.is_empty() {
            let _ = write!(self.out, ", fillcolor=\"{}\"", escape_dot(&node.fill_color));
        }
        let _ = writeln!(self.out, ", fontcolor=\"{}\"];", escape_dot(&node.font_color));
    }

    fn edge(&mut self, edge: &RenderEdge) {
        let _ = writeln!(
            self.out,
            "  \"{}\" -> \"{}\" [style={}];",
            escape_dot(&edge.source),
            escape_dot(&edge.dest),
            edge.style
        );
    }
}

fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
