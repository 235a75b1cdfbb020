//! `MultipleComponents`: ordered entity collections and their combinators.

use super::signature::{ArgReader, ANY, COMPONENTS, PAIR_PREDICATE, PREDICATE};
use super::{Adapter, Arg, ComputeContext, ConstructResult, Construction, Outputs, Signature, SignatureError, VariantTag};
use crate::geometry::GeometryResult;
use crate::graph::{ComponentsId, EntityId, EntityKind, Graph, GraphResult};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

type MemberTest = dyn Fn(&Outputs) -> bool + Send + Sync;
type PairTest = dyn Fn(&Outputs, &Outputs) -> bool + Send + Sync;

/// Labelled membership test over a member's current outputs.
#[derive(Clone)]
pub struct Predicate {
    label: String,
    test: Arc<MemberTest>,
}

impl Predicate {
    pub fn new(label: impl Into<String>, test: impl Fn(&Outputs) -> bool + Send + Sync + 'static) -> Self {
        Self {
            label: label.into(),
            test: Arc::new(test),
        }
    }

    /// Keep members of one kind.
    pub fn of_kind(kind: EntityKind) -> Self {
        Self::new(format!("kind == {}", kind), move |outputs| outputs.kind() == kind)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn test(&self, outputs: &Outputs) -> bool {
        (self.test)(outputs)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Predicate").field(&self.label).finish()
    }
}

/// Labelled test over an unordered pair of members.
#[derive(Clone)]
pub struct PairPredicate {
    label: String,
    test: Arc<PairTest>,
}

impl PairPredicate {
    pub fn new(
        label: impl Into<String>,
        test: impl Fn(&Outputs, &Outputs) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            test: Arc::new(test),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn test(&self, a: &Outputs, b: &Outputs) -> bool {
        (self.test)(a, b)
    }
}

impl fmt::Debug for PairPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PairPredicate").field(&self.label).finish()
    }
}

impl From<Predicate> for Arg {
    fn from(p: Predicate) -> Self {
        Arg::Predicate(p)
    }
}

impl From<PairPredicate> for Arg {
    fn from(p: PairPredicate) -> Self {
        Arg::PairPredicate(p)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ComponentsOutputs {
    pub members: Vec<EntityId>,
    /// Accepted pairs, for pair filters only.
    pub pairs: Vec<(EntityId, EntityId)>,
}

impl ComponentsOutputs {
    fn of_members(members: Vec<EntityId>) -> Self {
        Self {
            members,
            pairs: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentsVariant {
    List,
    Filter,
    PairFilter,
    Union,
    Intersection,
    Difference,
}

impl VariantTag for ComponentsVariant {
    const KIND: EntityKind = EntityKind::Components;

    fn name(self) -> &'static str {
        match self {
            Self::List => "List",
            Self::Filter => "Filter",
            Self::PairFilter => "PairFilter",
            Self::Union => "Union",
            Self::Intersection => "Intersection",
            Self::Difference => "Difference",
        }
    }

    fn signature(self) -> Signature {
        match self {
            Self::List => Signature::variadic(&[ANY], ANY),
            Self::Filter => Signature::fixed(&[COMPONENTS, PREDICATE]),
            Self::PairFilter => Signature::fixed(&[COMPONENTS, PAIR_PREDICATE]),
            Self::Union | Self::Intersection | Self::Difference => Signature::fixed(&[COMPONENTS, COMPONENTS]),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ComponentsConstruction {
    /// Identity list of one or more entities of any kind.
    List { members: Vec<EntityId> },
    Filter { source: ComponentsId, predicate: Predicate },
    /// Every unordered pair `(i < j)` of source members accepted by the
    /// predicate. Members are the distinct entities of accepted pairs.
    PairFilter { source: ComponentsId, predicate: PairPredicate },
    Union { first: ComponentsId, second: ComponentsId },
    Intersection { first: ComponentsId, second: ComponentsId },
    /// Members of `first` absent from `second`.
    Difference { first: ComponentsId, second: ComponentsId },
}

impl Adapter for ComponentsConstruction {
    type Variant = ComponentsVariant;

    fn variant(&self) -> ComponentsVariant {
        match self {
            Self::List { .. } => ComponentsVariant::List,
            Self::Filter { .. } => ComponentsVariant::Filter,
            Self::PairFilter { .. } => ComponentsVariant::PairFilter,
            Self::Union { .. } => ComponentsVariant::Union,
            Self::Intersection { .. } => ComponentsVariant::Intersection,
            Self::Difference { .. } => ComponentsVariant::Difference,
        }
    }

    fn args(&self) -> Vec<Arg> {
        match self {
            Self::List { members } => members.iter().map(|id| Arg::Entity(*id)).collect(),
            Self::Filter { source, predicate } => vec![source.id().into(), predicate.clone().into()],
            Self::PairFilter { source, predicate } => vec![source.id().into(), predicate.clone().into()],
            Self::Union { first, second } | Self::Intersection { first, second } | Self::Difference { first, second } => {
                vec![first.id().into(), second.id().into()]
            }
        }
    }

    fn from_args(variant: ComponentsVariant, args: &[Arg]) -> Result<Self, SignatureError> {
        let mut r = ArgReader::new(variant.name(), args);
        let built = match variant {
            ComponentsVariant::List => Self::List {
                members: r.rest_entities()?,
            },
            ComponentsVariant::Filter => Self::Filter {
                source: r.components()?,
                predicate: r.predicate()?,
            },
            ComponentsVariant::PairFilter => Self::PairFilter {
                source: r.components()?,
                predicate: r.pair_predicate()?,
            },
            ComponentsVariant::Union => Self::Union {
                first: r.components()?,
                second: r.components()?,
            },
            ComponentsVariant::Intersection => Self::Intersection {
                first: r.components()?,
                second: r.components()?,
            },
            ComponentsVariant::Difference => Self::Difference {
                first: r.components()?,
                second: r.components()?,
            },
        };
        r.finish()?;
        Ok(built)
    }

    fn compute(&self, ctx: &ComputeContext<'_>) -> GeometryResult<Outputs> {
        let outputs = match self {
            Self::List { members } => {
                let mut distinct: Vec<EntityId> = Vec::with_capacity(members.len());
                for id in members {
                    if !distinct.contains(id) {
                        distinct.push(*id);
                    }
                }
                ComponentsOutputs::of_members(distinct)
            }
            Self::Filter { source, predicate } => {
                let mut kept = Vec::new();
                for id in &ctx.components(*source)?.members {
                    if predicate.test(ctx.outputs(*id)?) {
                        kept.push(*id);
                    }
                }
                ComponentsOutputs::of_members(kept)
            }
            Self::PairFilter { source, predicate } => {
                let members = &ctx.components(*source)?.members;
                let mut pairs = Vec::new();
                let mut distinct: Vec<EntityId> = Vec::new();
                for (i, a) in members.iter().enumerate() {
                    for b in &members[i + 1..] {
                        if predicate.test(ctx.outputs(*a)?, ctx.outputs(*b)?) {
                            pairs.push((*a, *b));
                            for id in [a, b] {
                                if !distinct.contains(id) {
                                    distinct.push(*id);
                                }
                            }
                        }
                    }
                }
                ComponentsOutputs {
                    members: distinct,
                    pairs,
                }
            }
            Self::Union { first, second } => {
                let mut members = ctx.components(*first)?.members.clone();
                for id in &ctx.components(*second)?.members {
                    if !members.contains(id) {
                        members.push(*id);
                    }
                }
                ComponentsOutputs::of_members(members)
            }
            Self::Intersection { first, second } => {
                let other = &ctx.components(*second)?.members;
                let members = ctx.components(*first)?.members.iter().filter(|id| other.contains(id)).copied().collect();
                ComponentsOutputs::of_members(members)
            }
            Self::Difference { first, second } => {
                let other = &ctx.components(*second)?.members;
                let members = ctx.components(*first)?.members.iter().filter(|id| !other.contains(id)).copied().collect();
                ComponentsOutputs::of_members(members)
            }
        };
        Ok(Outputs::Components(outputs))
    }
}

impl Graph {
    /// Identity list over `members`, which may be of any kind.
    pub fn components(&mut self, members: &[EntityId]) -> ConstructResult<ComponentsId> {
        self.insert_components(ComponentsConstruction::List {
            members: members.to_vec(),
        })
    }

    pub fn filter_components(&mut self, source: ComponentsId, predicate: Predicate) -> ConstructResult<ComponentsId> {
        self.insert_components(ComponentsConstruction::Filter { source, predicate })
    }

    pub fn pair_filter_components(&mut self, source: ComponentsId, predicate: PairPredicate) -> ConstructResult<ComponentsId> {
        self.insert_components(ComponentsConstruction::PairFilter { source, predicate })
    }

    pub fn union_components(&mut self, first: ComponentsId, second: ComponentsId) -> ConstructResult<ComponentsId> {
        self.insert_components(ComponentsConstruction::Union { first, second })
    }

    pub fn intersect_components(&mut self, first: ComponentsId, second: ComponentsId) -> ConstructResult<ComponentsId> {
        self.insert_components(ComponentsConstruction::Intersection { first, second })
    }

    pub fn difference_components(&mut self, first: ComponentsId, second: ComponentsId) -> ConstructResult<ComponentsId> {
        self.insert_components(ComponentsConstruction::Difference { first, second })
    }

    fn insert_components(&mut self, construction: ComponentsConstruction) -> ConstructResult<ComponentsId> {
        self.insert(Construction::Components(construction), None).map(ComponentsId)
    }

    /// Current ordered member list of an aggregate.
    pub fn members(&self, id: ComponentsId) -> GraphResult<&[EntityId]> {
        Ok(&self.typed_outputs(id.0, Outputs::as_components)?.members)
    }

    /// Accepted pairs of a pair filter; empty for other aggregates.
    pub fn pairs(&self, id: ComponentsId) -> GraphResult<&[(EntityId, EntityId)]> {
        Ok(&self.typed_outputs(id.0, Outputs::as_components)?.pairs)
    }
}
