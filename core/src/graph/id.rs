use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable handle to an entity in a [`super::Graph`].
///
/// Handles are generational: once an entity is removed its slot may be
/// reused, but the old handle never resolves to the new occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl EntityId {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.generation == 0 {
            write!(f, "#{}", self.index)
        } else {
            write!(f, "#{}v{}", self.index, self.generation)
        }
    }
}

/// The kind of an entity, which fixes its output attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Point,
    Line,
    Circle,
    Angle,
    Vector,
    Components,
}

impl EntityKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::Line => "line",
            Self::Circle => "circle",
            Self::Angle => "angle",
            Self::Vector => "vector",
            Self::Components => "components",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

macro_rules! typed_handle {
    ($(#[$meta:meta])* $name:ident => $kind:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub(crate) EntityId);

        impl $name {
            pub const KIND: EntityKind = EntityKind::$kind;

            pub fn id(self) -> EntityId {
                self.0
            }
        }

        impl From<$name> for EntityId {
            fn from(handle: $name) -> EntityId {
                handle.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", EntityKind::$kind, self.0)
            }
        }
    };
}

typed_handle!(
    /// Handle to a point entity.
    PointId => Point
);
typed_handle!(
    /// Handle to a segment, ray or infinite line.
    LineId => Line
);
typed_handle!(CircleId => Circle);
typed_handle!(AngleId => Angle);
typed_handle!(VectorId => Vector);
typed_handle!(
    /// Handle to a `MultipleComponents` aggregate.
    ComponentsId => Components
);
