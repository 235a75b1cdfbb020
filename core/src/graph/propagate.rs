//! Recomputation and ordered propagation.

use super::{EntityId, EntityState, Failure, Graph};
use crate::construct::ComputeContext;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use tracing::{debug, debug_span, trace};

/// Outcome of recomputing a single entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagate {
    Success,
    Failure,
}

/// What one mutation did to the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateReport {
    /// Entities whose adapter ran, in execution order.
    pub recomputed: Vec<EntityId>,
    /// Recomputed entities whose adapter reported a geometric failure.
    pub failed: Vec<EntityId>,
    /// Entities marked in error because an input was, without running.
    pub propagated: Vec<EntityId>,
}

impl UpdateReport {
    pub fn recompute_count(&self, id: EntityId) -> usize {
        self.recomputed.iter().filter(|r| **r == id).count()
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.propagated.is_empty()
    }
}

impl Graph {
    /// Run one entity's adapter against the current outputs of its inputs.
    ///
    /// An entity with an input that is not valid is marked as a propagated
    /// failure without running. On failure the previous outputs are kept.
    pub(crate) fn apply(&mut self, id: EntityId, report: &mut UpdateReport) -> Propagate {
        let tolerance = self.tolerance;
        let result = {
            let Ok(node) = self.node(id) else {
                return Propagate::Failure;
            };
            let blocked = node
                .construction
                .upstream()
                .into_iter()
                .find(|input| !matches!(self.node(*input).map(|n| n.state), Ok(EntityState::Valid)));
            match blocked {
                Some(from) => Err(Failure::Propagated { from }),
                None => {
                    let ctx = ComputeContext::new(&*self, &tolerance);
                    node.construction.compute(&ctx).map_err(Failure::Geometric)
                }
            }
        };

        let Ok(node) = self.node_mut(id) else {
            return Propagate::Failure;
        };
        match result {
            Ok(outputs) => {
                node.revision += 1;
                node.outputs = Some(outputs);
                node.state = EntityState::Valid;
                node.failure = None;
                report.recomputed.push(id);
                trace!(%id, name = %node.name, "recomputed");
                Propagate::Success
            }
            Err(failure @ Failure::Geometric(_)) => {
                node.revision += 1;
                node.state = EntityState::Error;
                node.failure = Some(failure);
                report.recomputed.push(id);
                report.failed.push(id);
                debug!(%id, name = %node.name, %failure, "computation failed");
                Propagate::Failure
            }
            Err(failure @ Failure::Propagated { .. }) => {
                node.state = EntityState::Error;
                node.failure = Some(failure);
                report.propagated.push(id);
                debug!(%id, name = %node.name, %failure, "failure propagated");
                Propagate::Failure
            }
        }
    }

    /// Recompute `root`, then every transitive dependent exactly once, each
    /// after all of its inputs.
    pub(crate) fn update_from(&mut self, root: EntityId) -> UpdateReport {
        let span = debug_span!("update", %root);
        let _enter = span.enter();

        let order = self.propagation_order(root);
        let mut report = UpdateReport::default();
        for id in order {
            self.apply(id, &mut report);
        }
        debug!(
            recomputed = report.recomputed.len(),
            failed = report.failed.len(),
            propagated = report.propagated.len(),
            "update finished"
        );
        report
    }

    /// `root` followed by its transitive dependents in topological order
    /// (Kahn's algorithm over the affected subgraph).
    pub(crate) fn propagation_order(&self, root: EntityId) -> Vec<EntityId> {
        let affected = self.breadth_first(root);
        let mut in_degree: HashMap<EntityId, usize> = affected.iter().map(|(id, _)| (*id, 0)).collect();
        for (id, _) in &affected {
            if let Ok(node) = self.node(*id) {
                let count = node
                    .construction
                    .upstream()
                    .iter()
                    .filter(|input| **input == root || in_degree.contains_key(*input))
                    .count();
                in_degree.insert(*id, count);
            }
        }

        let mut order = Vec::with_capacity(affected.len() + 1);
        let mut ready = VecDeque::from([root]);
        while let Some(id) = ready.pop_front() {
            order.push(id);
            let Ok(node) = self.node(id) else {
                continue;
            };
            for dependent in &node.dependents {
                if let Some(remaining) = in_degree.get_mut(dependent) {
                    *remaining -= 1;
                    if *remaining == 0 {
                        ready.push_back(*dependent);
                    }
                }
            }
        }
        order
    }
}
