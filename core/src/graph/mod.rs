//! Entity arena and dependency graph.
//!
//! Entities live in generational slots. Each node stores its construction
//! (which names its inputs), its last computed outputs and the handles of the
//! entities built on it. Inputs are owning edges: an entity cannot be removed
//! while something depends on it. The `dependents` lists are traversal-only
//! and are kept in sync on removal.

mod dump;
mod id;
mod propagate;

#[cfg(test)]
mod tests_graph;
#[cfg(test)]
mod tests_propagation;

pub use dump::{DependencyDump, DumpEntry};
pub use id::{AngleId, CircleId, ComponentsId, EntityId, EntityKind, LineId, PointId, VectorId};
pub use propagate::{Propagate, UpdateReport};

use crate::construct::{
    check_signature, Arg, ConstructResult, Construction, OutputSource, Outputs, PointConstruction, SignatureError,
    Variant, VectorConstruction,
};
use crate::geometry::{GeometryError, Point2, Vector2};
use crate::tolerance::{self, Tolerance, ToleranceError};
use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphError {
    #[error("Unknown entity {0}")]
    UnknownEntity(EntityId),

    #[error("Entity {id} still has {count} dependent(s)")]
    HasDependents { id: EntityId, count: usize },

    #[error("Entity {0} has never been computed successfully")]
    NotComputed(EntityId),

    #[error(transparent)]
    Signature(#[from] SignatureError),
}

pub type GraphResult<T> = Result<T, GraphError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntityState {
    /// Created, first computation not finished yet.
    Uninitialized,
    Valid,
    Error,
}

/// Why an entity is in the error state.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Failure {
    #[error("{0}")]
    Geometric(GeometryError),

    #[error("Input {from} is in error")]
    Propagated { from: EntityId },
}

/// Raw value pushed into a free entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FreeValue {
    Point(Point2),
    Vector(Vector2),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) name: String,
    pub(crate) construction: Construction,
    pub(crate) outputs: Option<Outputs>,
    pub(crate) state: EntityState,
    pub(crate) failure: Option<Failure>,
    pub(crate) dependents: Vec<EntityId>,
    /// Number of adapter runs.
    pub(crate) revision: u64,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Owner of every entity. All mutations take `&mut self` and finish their
/// propagation before returning.
#[derive(Debug, Clone)]
pub struct Graph {
    slots: Vec<Slot>,
    free_slots: Vec<u32>,
    tolerance: Tolerance,
    len: usize,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// Empty graph using the current process-wide tolerance.
    pub fn new() -> Self {
        Self::with_tolerance(tolerance::global())
    }

    pub fn with_tolerance(tolerance: Tolerance) -> Self {
        Self {
            slots: Vec::new(),
            free_slots: Vec::new(),
            tolerance,
            len: 0,
        }
    }

    pub fn tolerance(&self) -> &Tolerance {
        &self.tolerance
    }

    /// Used by every later computation; nothing is recomputed here.
    pub fn set_tolerance(&mut self, tolerance: Tolerance) -> Result<(), ToleranceError> {
        tolerance.validate()?;
        self.tolerance = tolerance;
        Ok(())
    }

    // =========================================================================
    // Construction
    // =========================================================================

    /// Dynamic construction path: a variant tag plus an ordered argument list.
    pub fn construct(&mut self, variant: Variant, args: &[Arg], name: Option<&str>) -> ConstructResult<EntityId> {
        check_signature(variant.name(), &variant.signature(), args, |id| self.kind_of(id))?;
        let construction = variant.build(args)?;
        Ok(self.attach(construction, name))
    }

    /// Typed construction path, validated against the same signature table.
    pub(crate) fn insert(&mut self, construction: Construction, name: Option<&str>) -> ConstructResult<EntityId> {
        let variant = construction.variant();
        check_signature(variant.name(), &variant.signature(), &construction.args(), |id| self.kind_of(id))?;
        Ok(self.attach(construction, name))
    }

    fn attach(&mut self, construction: Construction, name: Option<&str>) -> EntityId {
        let id = self.allocate();
        let upstream = construction.upstream();
        for input in &upstream {
            if let Some(node) = self.node_slot_mut(*input) {
                node.dependents.push(id);
            }
        }

        let name = name.map_or_else(|| format!("{}{}", construction.kind(), id.index), str::to_owned);
        debug!(%id, name = %name, variant = %construction.variant(), inputs = upstream.len(), "entity constructed");
        self.slots[id.index as usize].node = Some(Node {
            name,
            construction,
            outputs: None,
            state: EntityState::Uninitialized,
            failure: None,
            dependents: Vec::new(),
            revision: 0,
        });
        self.len += 1;

        let mut report = UpdateReport::default();
        self.apply(id, &mut report);
        id
    }

    fn allocate(&mut self) -> EntityId {
        match self.free_slots.pop() {
            Some(index) => EntityId::new(index, self.slots[index as usize].generation),
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    node: None,
                });
                EntityId::new(index, 0)
            }
        }
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Overwrite the raw value of a free point or vector, then recompute it
    /// and everything downstream.
    pub fn set_free_value(&mut self, id: EntityId, value: FreeValue) -> ConstructResult<UpdateReport> {
        let finite = match value {
            FreeValue::Point(p) => p.x.is_finite() && p.y.is_finite(),
            FreeValue::Vector(v) => v.x.is_finite() && v.y.is_finite(),
        };
        let node = self.node_slot_mut(id).ok_or(SignatureError::Unknown(id))?;
        match (&mut node.construction, value) {
            (Construction::Point(PointConstruction::Free { coord }), FreeValue::Point(p)) if finite => *coord = p,
            (Construction::Vector(VectorConstruction::Free { components }), FreeValue::Vector(v)) if finite => {
                *components = v
            }
            (c, value) if c.is_free() => {
                let matches_kind = matches!(
                    (&*c, value),
                    (Construction::Point(_), FreeValue::Point(_)) | (Construction::Vector(_), FreeValue::Vector(_))
                );
                if matches_kind {
                    return Err(SignatureError::NonFiniteValue { id });
                }
                return Err(SignatureError::FreeValueKind { id, expected: c.kind() });
            }
            (c, _) => {
                return Err(SignatureError::NotFree {
                    id,
                    variant: c.variant_name(),
                })
            }
        }
        Ok(self.update_from(id))
    }

    /// Recompute one entity and propagate to its dependents.
    pub fn recompute(&mut self, id: EntityId) -> GraphResult<UpdateReport> {
        self.node(id)?;
        Ok(self.update_from(id))
    }

    /// Remove an entity nothing depends on.
    pub fn remove(&mut self, id: impl Into<EntityId>) -> GraphResult<()> {
        let id = id.into();
        let count = self.node(id)?.dependents.len();
        if count > 0 {
            warn!(%id, count, "refusing to remove entity with dependents");
            return Err(GraphError::HasDependents { id, count });
        }
        self.detach(id);
        Ok(())
    }

    /// Remove an entity and all of its transitive dependents, dependents
    /// first. Returns the removed handles in removal order.
    pub fn remove_cascade(&mut self, id: impl Into<EntityId>) -> GraphResult<Vec<EntityId>> {
        let id = id.into();
        self.node(id)?;
        let mut order = self.propagation_order(id);
        order.reverse();
        for removed in &order {
            self.detach(*removed);
        }
        debug!(%id, removed = order.len(), "cascade removal");
        Ok(order)
    }

    fn detach(&mut self, id: EntityId) {
        let slot = &mut self.slots[id.index as usize];
        let Some(node) = slot.node.take() else {
            return;
        };
        slot.generation = slot.generation.wrapping_add(1);
        self.free_slots.push(id.index);
        self.len -= 1;
        for input in node.construction.upstream() {
            if let Some(upstream) = self.node_slot_mut(input) {
                upstream.dependents.retain(|d| *d != id);
            }
        }
        debug!(%id, name = %node.name, "entity removed");
    }

    pub fn rename(&mut self, id: impl Into<EntityId>, name: &str) -> GraphResult<()> {
        let id = id.into();
        self.node_mut(id)?.name = name.to_owned();
        Ok(())
    }

    // =========================================================================
    // Read API
    // =========================================================================

    pub fn contains(&self, id: impl Into<EntityId>) -> bool {
        self.node(id.into()).is_ok()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Live entities in slot order.
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.node.as_ref().map(|_| EntityId::new(index as u32, slot.generation))
        })
    }

    pub fn kind(&self, id: impl Into<EntityId>) -> GraphResult<EntityKind> {
        Ok(self.node(id.into())?.construction.kind())
    }

    pub fn name(&self, id: impl Into<EntityId>) -> GraphResult<&str> {
        Ok(&self.node(id.into())?.name)
    }

    pub fn state(&self, id: impl Into<EntityId>) -> GraphResult<EntityState> {
        Ok(self.node(id.into())?.state)
    }

    pub fn is_error(&self, id: impl Into<EntityId>) -> GraphResult<bool> {
        Ok(self.state(id)? == EntityState::Error)
    }

    /// Why the entity is in error; `None` when it is valid.
    pub fn last_failure(&self, id: impl Into<EntityId>) -> GraphResult<Option<Failure>> {
        Ok(self.node(id.into())?.failure)
    }

    /// Last successfully computed outputs, kept while the entity is in error.
    pub fn outputs(&self, id: impl Into<EntityId>) -> GraphResult<Option<&Outputs>> {
        Ok(self.node(id.into())?.outputs.as_ref())
    }

    pub fn construction(&self, id: impl Into<EntityId>) -> GraphResult<&Construction> {
        Ok(&self.node(id.into())?.construction)
    }

    pub fn variant(&self, id: impl Into<EntityId>) -> GraphResult<Variant> {
        Ok(self.construction(id)?.variant())
    }

    pub fn variant_name(&self, id: impl Into<EntityId>) -> GraphResult<&'static str> {
        Ok(self.construction(id)?.variant_name())
    }

    pub fn inputs(&self, id: impl Into<EntityId>) -> GraphResult<Vec<Arg>> {
        Ok(self.construction(id)?.args())
    }

    pub fn dependents(&self, id: impl Into<EntityId>) -> GraphResult<&[EntityId]> {
        Ok(&self.node(id.into())?.dependents)
    }

    pub fn revision(&self, id: impl Into<EntityId>) -> GraphResult<u64> {
        Ok(self.node(id.into())?.revision)
    }

    /// Every entity that transitively depends on `id`, breadth-first,
    /// each listed once, `id` itself excluded.
    pub fn transitive_dependents(&self, id: impl Into<EntityId>) -> GraphResult<Vec<EntityId>> {
        let id = id.into();
        self.node(id)?;
        Ok(self.breadth_first(id).into_iter().map(|(d, _)| d).collect())
    }

    /// Breadth-first walk of `dependents` links with the depth at which each
    /// entity is first reached.
    pub(crate) fn breadth_first(&self, root: EntityId) -> Vec<(EntityId, usize)> {
        let mut seen = HashSet::from([root]);
        let mut queue = VecDeque::from([(root, 0)]);
        let mut found = Vec::new();
        while let Some((id, depth)) = queue.pop_front() {
            let Ok(node) = self.node(id) else {
                continue;
            };
            for dependent in &node.dependents {
                if seen.insert(*dependent) {
                    found.push((*dependent, depth + 1));
                    queue.push_back((*dependent, depth + 1));
                }
            }
        }
        found
    }

    pub(crate) fn typed_outputs<T: 'static>(&self, id: EntityId, pick: fn(&Outputs) -> Option<&T>) -> GraphResult<&T> {
        self.node(id)?
            .outputs
            .as_ref()
            .and_then(pick)
            .ok_or(GraphError::NotComputed(id))
    }

    fn kind_of(&self, id: EntityId) -> Option<EntityKind> {
        self.node(id).ok().map(|n| n.construction.kind())
    }

    pub(crate) fn node(&self, id: EntityId) -> GraphResult<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
            .ok_or(GraphError::UnknownEntity(id))
    }

    pub(crate) fn node_mut(&mut self, id: EntityId) -> GraphResult<&mut Node> {
        self.node_slot_mut(id).ok_or(GraphError::UnknownEntity(id))
    }

    fn node_slot_mut(&mut self, id: EntityId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }
}

impl OutputSource for Graph {
    fn outputs_of(&self, id: EntityId) -> Option<&Outputs> {
        self.node(id).ok().and_then(|n| n.outputs.as_ref())
    }
}
