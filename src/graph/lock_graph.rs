// src/graph/lock_graph.rs

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use tracing::{debug, warn};

use crate::job::{JobRegistry, JobSpec};
use crate::task::TaskId;
use crate::types::JobKind;

/// A job that declares at least one lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskNode {
    pub id: String,
    pub job: String,
    pub kind: JobKind,
    pub primary_resource: Option<String>,
}

/// A resource named by one or more locks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataNode {
    pub id: String,
    pub resource: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockNode {
    Task(TaskNode),
    Data(DataNode),
}

impl LockNode {
    pub fn id(&self) -> &str {
        match self {
            LockNode::Task(t) => &t.id,
            LockNode::Data(d) => &d.id,
        }
    }

    pub fn is_task(&self) -> bool {
        matches!(self, LockNode::Task(_))
    }
}

/// Edge type.
///
/// - `Data`: data → task for a read, task → data for a write.
/// - `Task`: prerequisite → dependent (only with `include_task_edges`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    Task,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockEdge<'a> {
    pub source: &'a str,
    pub dest: &'a str,
    pub kind: EdgeKind,
}

#[derive(Debug, Clone, Default)]
pub struct GraphOptions {
    /// Only include jobs whose scope shares a segment with this list.
    /// Empty means every job.
    pub namespaces: Vec<String>,
    /// Also draw prerequisite → dependent edges between task nodes.
    pub include_task_edges: bool,
}

/// Bipartite task/data graph. Node and edge order follow insertion order.
#[derive(Debug, Clone, Default)]
pub struct LockGraph {
    graph: DiGraph<LockNode, EdgeKind>,
    index: HashMap<String, NodeIndex>,
}

impl LockGraph {
    /// Build the graph in one pass over the registry's specs.
    pub fn build(registry: &JobRegistry, options: &GraphOptions) -> Self {
        let mut lg = LockGraph::default();

        // First pass: one node per selected job.
        let mut selected: Vec<(&JobSpec, NodeIndex)> = Vec::new();
        let mut task_nodes: HashMap<TaskId, NodeIndex> = HashMap::new();
        for spec in registry.specs() {
            if spec.lock_count() == 0 || !in_namespaces(spec, &options.namespaces) {
                continue;
            }
            let id = lg.free_task_id(spec.name());
            let idx = lg.insert(LockNode::Task(TaskNode {
                id,
                job: spec.name().to_string(),
                kind: spec.kind(),
                primary_resource: spec.primary_resource().map(|s| s.to_string()),
            }));
            task_nodes.insert(spec.task(), idx);
            selected.push((spec, idx));
        }

        // Second pass: edges, creating data nodes on first sighting.
        for (spec, task_idx) in selected {
            if options.include_task_edges {
                for prereq in spec.prerequisites() {
                    let Some(dep) = registry.tasks().resolve(prereq, spec.scope()) else {
                        continue;
                    };
                    if let Some(&dep_idx) = task_nodes.get(&dep) {
                        lg.graph.add_edge(dep_idx, task_idx, EdgeKind::Task);
                    }
                }
            }
            for resource in spec.read_locks() {
                let data_idx = lg.data_node(resource);
                lg.graph.add_edge(data_idx, task_idx, EdgeKind::Data);
            }
            for resource in spec.write_locks() {
                let data_idx = lg.data_node(resource);
                lg.graph.add_edge(task_idx, data_idx, EdgeKind::Data);
            }
        }

        debug!(
            nodes = lg.graph.node_count(),
            edges = lg.graph.edge_count(),
            "built lock graph"
        );
        lg
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &LockNode> {
        self.graph.node_weights()
    }

    pub fn node(&self, id: &str) -> Option<&LockNode> {
        self.index.get(id).map(|idx| &self.graph[*idx])
    }

    pub fn edges(&self) -> impl Iterator<Item = LockEdge<'_>> {
        self.graph.edge_references().map(move |e| LockEdge {
            source: self.graph[e.source()].id(),
            dest: self.graph[e.target()].id(),
            kind: *e.weight(),
        })
    }

    fn insert(&mut self, node: LockNode) -> NodeIndex {
        let id = node.id().to_string();
        let idx = self.graph.add_node(node);
        self.index.insert(id, idx);
        idx
    }

    /// Jobs whose names differ only in punctuation share a base id; later
    /// ones get the first free numeric suffix.
    fn free_task_id(&self, job_name: &str) -> String {
        let base = task_node_id(job_name);
        if !self.index.contains_key(&base) {
            return base;
        }
        let id = (2..)
            .map(|n| format!("{base}{n}"))
            .find(|candidate| !self.index.contains_key(candidate))
            .unwrap_or(base);
        warn!(job = %job_name, node = %id, "task node id already taken; using a suffixed id");
        id
    }

    fn data_node(&mut self, resource: &str) -> NodeIndex {
        let id = data_node_id(resource);
        if let Some(&idx) = self.index.get(&id) {
            return idx;
        }
        self.insert(LockNode::Data(DataNode {
            id,
            resource: resource.to_string(),
        }))
    }
}

/// Node id for a job: `TASK` plus the alphanumeric characters of its name.
pub fn task_node_id(job_name: &str) -> String {
    format!("TASK{}", alphanumeric(job_name))
}

/// Node id for a resource: `DATA` plus its alphanumeric characters.
pub fn data_node_id(resource: &str) -> String {
    format!("DATA{}", alphanumeric(resource))
}

fn alphanumeric(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

fn in_namespaces(spec: &JobSpec, namespaces: &[String]) -> bool {
    namespaces.is_empty() || spec.scope().iter().any(|s| namespaces.contains(s))
}
