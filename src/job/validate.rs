// src/job/validate.rs

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::errors::{AzkabanError, Result};
use crate::job::registry::JobRegistry;
use crate::task::TaskId;

/// Resolve every prerequisite in the registry and reject dependency cycles.
///
/// The scheduler refuses cyclic flows, so catching them here means a bad
/// `Jobs.toml` fails before any file is written.
pub fn check_acyclic(registry: &JobRegistry) -> Result<()> {
    let tasks = registry.tasks();

    // Edge direction: prerequisite -> dependent.
    let mut graph: DiGraphMap<TaskId, ()> = DiGraphMap::new();

    for spec in registry.specs() {
        graph.add_node(spec.task());
        for prereq in spec.prerequisites() {
            let dep = tasks.resolve(prereq, spec.scope()).ok_or_else(|| {
                AzkabanError::UnresolvedDependency {
                    job: spec.name().to_string(),
                    dependency: prereq.clone(),
                }
            })?;
            if dep == spec.task() {
                return Err(AzkabanError::DependencyCycle(format!(
                    "job '{}' depends on itself",
                    spec.name()
                )));
            }
            graph.add_edge(dep, spec.task(), ());
        }
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(AzkabanError::DependencyCycle(format!(
            "cycle detected in job dependencies involving '{}'",
            tasks.name(cycle.node_id())
        ))),
    }
}
