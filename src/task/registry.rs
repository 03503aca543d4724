// src/task/registry.rs

use std::collections::HashMap;

use tracing::trace;

use crate::errors::{AzkabanError, Result};

/// Separator between namespace segments in a qualified task name.
pub const SCOPE_SEPARATOR: char = ':';

/// Sigil that moves a lookup one enclosing scope outward.
const PARENT_SIGIL: char = '^';

/// Opaque handle to a registered task. Indices are assigned in declaration
/// order and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(usize);

impl TaskId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct TaskEntry {
    name: String,
    scope: Vec<String>,
    prerequisites: Vec<String>,
}

/// Resolves a prerequisite name, as written by the user, to the qualified
/// name of a registered task.
pub trait DependencyResolver {
    fn resolve_name(&self, name: &str, scope: &[String]) -> Option<String>;
}

/// Registry of every declared task for one build invocation.
#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    entries: Vec<TaskEntry>,
    by_name: HashMap<String, TaskId>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task under its qualified name (e.g. `"etl:daily:load"`).
    ///
    /// The scope is every segment except the last one.
    pub fn register(&mut self, name: &str, prerequisites: Vec<String>) -> Result<TaskId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AzkabanError::ConfigError(
                "task name must not be empty".to_string(),
            ));
        }
        if self.by_name.contains_key(name) {
            return Err(AzkabanError::DuplicateJob(name.to_string()));
        }

        let mut segments: Vec<String> = name
            .split(SCOPE_SEPARATOR)
            .map(|s| s.to_string())
            .collect();
        segments.pop();

        let id = TaskId(self.entries.len());
        self.entries.push(TaskEntry {
            name: name.to_string(),
            scope: segments,
            prerequisites,
        });
        self.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn name(&self, id: TaskId) -> &str {
        &self.entries[id.0].name
    }

    pub fn scope(&self, id: TaskId) -> &[String] {
        &self.entries[id.0].scope
    }

    pub fn prerequisites(&self, id: TaskId) -> &[String] {
        &self.entries[id.0].prerequisites
    }

    pub fn get(&self, qualified_name: &str) -> Option<TaskId> {
        self.by_name.get(qualified_name).copied()
    }

    /// All task ids in declaration order.
    pub fn ids(&self) -> impl Iterator<Item = TaskId> + '_ {
        (0..self.entries.len()).map(TaskId)
    }

    /// Find the nearest task called `name`, starting at `scope` and walking
    /// outward to the top level.
    ///
    /// Each leading `^` drops one segment from the end of `scope` before the
    /// search begins, so `^sibling` from `[a, b]` searches `a:sibling` and
    /// then `sibling`.
    pub fn resolve(&self, name: &str, scope: &[String]) -> Option<TaskId> {
        let ups = name.chars().take_while(|c| *c == PARENT_SIGIL).count();
        let bare = &name[ups..];
        if bare.is_empty() {
            return None;
        }
        let base = &scope[..scope.len().saturating_sub(ups)];

        for n in (0..=base.len()).rev() {
            let candidate = qualify(&base[..n], bare);
            trace!(name, candidate = %candidate, "trying scoped lookup");
            if let Some(id) = self.by_name.get(&candidate) {
                return Some(*id);
            }
        }
        None
    }
}

impl DependencyResolver for TaskRegistry {
    fn resolve_name(&self, name: &str, scope: &[String]) -> Option<String> {
        self.resolve(name, scope).map(|id| self.name(id).to_string())
    }
}

fn qualify(scope: &[String], name: &str) -> String {
    if scope.is_empty() {
        return name.to_string();
    }
    let mut out = scope.join(":");
    out.push(SCOPE_SEPARATOR);
    out.push_str(name);
    out
}
