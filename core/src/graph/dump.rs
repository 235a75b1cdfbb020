//! Serialisable snapshot of an entity and everything downstream of it.

use super::{EntityId, EntityKind, EntityState, Graph, GraphResult, Node};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DumpEntry {
    pub id: EntityId,
    pub name: String,
    pub kind: EntityKind,
    pub variant: &'static str,
    pub state: EntityState,
    /// Shortest dependency distance from the dump root.
    pub depth: usize,
    pub inputs: Vec<EntityId>,
    pub failure: Option<String>,
}

impl DumpEntry {
    fn new(id: EntityId, node: &Node, depth: usize) -> Self {
        Self {
            id,
            name: node.name.clone(),
            kind: node.construction.kind(),
            variant: node.construction.variant_name(),
            state: node.state,
            depth,
            inputs: node.construction.upstream(),
            failure: node.failure.map(|f| f.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DependencyDump {
    pub root: DumpEntry,
    /// Transitive dependents in breadth-first order.
    pub dependents: Vec<DumpEntry>,
}

impl DependencyDump {
    pub fn ids(&self) -> Vec<EntityId> {
        std::iter::once(self.root.id)
            .chain(self.dependents.iter().map(|e| e.id))
            .collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for DependencyDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in std::iter::once(&self.root).chain(self.dependents.iter()) {
            write!(
                f,
                "{:indent$}{} {} [{}::{}] {:?}",
                "",
                entry.name,
                entry.id,
                entry.kind,
                entry.variant,
                entry.state,
                indent = entry.depth * 2
            )?;
            if let Some(failure) = &entry.failure {
                write!(f, ": {}", failure)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Graph {
    pub fn dependency_dump(&self, id: impl Into<EntityId>) -> GraphResult<DependencyDump> {
        let id = id.into();
        let root = DumpEntry::new(id, self.node(id)?, 0);
        let mut dependents = Vec::new();
        for (dependent, depth) in self.breadth_first(id) {
            dependents.push(DumpEntry::new(dependent, self.node(dependent)?, depth));
        }
        Ok(DependencyDump { root, dependents })
    }
}
