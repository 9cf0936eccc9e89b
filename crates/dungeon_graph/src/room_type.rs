// SPDX-License-Identifier: MIT OR Apache-2.0
//! Room type descriptors and the catalog they are looked up from.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Topological role of a room type.
///
/// The layout builder only cares about these five roles, so every capability
/// flag is derived from the variant instead of being stored separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomKind {
    /// Placeholder for a node whose type has not been chosen yet
    None,
    /// Root of the dungeon
    Entrance,
    /// Connector between rooms
    Corridor,
    /// Terminal room of the dungeon
    BossRoom,
    /// Any other room
    StandardRoom,
}

impl RoomKind {
    /// Whether this is the unassigned placeholder
    pub fn is_none(self) -> bool {
        matches!(self, Self::None)
    }

    /// Whether this is an entrance
    pub fn is_entrance(self) -> bool {
        matches!(self, Self::Entrance)
    }

    /// Whether this is a corridor
    pub fn is_corridor(self) -> bool {
        match self {
            Self::Corridor => true,
            Self::None | Self::Entrance | Self::BossRoom | Self::StandardRoom => false,
        }
    }

    /// Whether this is a boss room
    pub fn is_boss_room(self) -> bool {
        matches!(self, Self::BossRoom)
    }
}

/// A room type descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomType {
    /// Display name, unique within a catalog
    pub name: String,
    /// Topological role
    pub kind: RoomKind,
    /// Whether the editor offers this type in its type picker
    #[serde(default = "default_display")]
    pub display_in_editor: bool,
}

fn default_display() -> bool {
    true
}

impl RoomType {
    /// Create a new display-eligible room type
    pub fn new(name: impl Into<String>, kind: RoomKind) -> Self {
        Self {
            name: name.into(),
            kind,
            display_in_editor: true,
        }
    }

    /// Hide this type from the editor's type picker
    pub fn hidden(mut self) -> Self {
        self.display_in_editor = false;
        self
    }

    /// Whether this is the unassigned placeholder
    pub fn is_none(&self) -> bool {
        self.kind.is_none()
    }

    /// Whether this is an entrance
    pub fn is_entrance(&self) -> bool {
        self.kind.is_entrance()
    }

    /// Whether this is a corridor
    pub fn is_corridor(&self) -> bool {
        self.kind.is_corridor()
    }

    /// Whether this is a boss room
    pub fn is_boss_room(&self) -> bool {
        self.kind.is_boss_room()
    }
}

/// An entry of the editor's type picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayEntry<'a> {
    /// Position of the type in the catalog
    pub catalog_index: usize,
    /// Display name
    pub name: &'a str,
}

/// Ordered collection of room types, loaded once before any graph is edited
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<RoomType>", into = "Vec<RoomType>")]
pub struct RoomTypeCatalog {
    types: IndexMap<String, RoomType>,
}

impl RoomTypeCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a room type, replacing any type of the same name in place
    pub fn register(&mut self, room_type: RoomType) {
        self.types.insert(room_type.name.clone(), room_type);
    }

    /// Get a room type by name
    pub fn get(&self, name: &str) -> Option<&RoomType> {
        self.types.get(name)
    }

    /// Get a room type by catalog position
    pub fn type_at(&self, index: usize) -> Option<&RoomType> {
        self.types.get_index(index).map(|(_, t)| t)
    }

    /// Get the catalog position of a type name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.types.get_index_of(name)
    }

    /// Get all room types in catalog order
    pub fn types(&self) -> impl Iterator<Item = &RoomType> {
        self.types.values()
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Get the types of a given kind
    pub fn types_of_kind(&self, kind: RoomKind) -> impl Iterator<Item = &RoomType> {
        self.types.values().filter(move |t| t.kind == kind)
    }

    /// The first unassigned placeholder type
    pub fn none_type(&self) -> Option<&RoomType> {
        self.types_of_kind(RoomKind::None).next()
    }

    /// The first entrance type
    pub fn entrance_type(&self) -> Option<&RoomType> {
        self.types_of_kind(RoomKind::Entrance).next()
    }

    /// Types offered by the editor's type picker.
    ///
    /// Only display-eligible types are returned, each paired with its catalog
    /// position so a picker selection maps back through [`Self::type_at`].
    pub fn display_types(&self) -> Vec<DisplayEntry<'_>> {
        self.types
            .values()
            .enumerate()
            .filter(|(_, t)| t.display_in_editor)
            .map(|(catalog_index, t)| DisplayEntry {
                catalog_index,
                name: &t.name,
            })
            .collect()
    }

    /// Serialize to RON text
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Deserialize from RON text
    pub fn from_ron(s: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }
}

impl From<Vec<RoomType>> for RoomTypeCatalog {
    fn from(types: Vec<RoomType>) -> Self {
        let mut catalog = Self::new();
        for room_type in types {
            catalog.register(room_type);
        }
        catalog
    }
}

impl From<RoomTypeCatalog> for Vec<RoomType> {
    fn from(catalog: RoomTypeCatalog) -> Self {
        catalog.types.into_values().collect()
    }
}

/// Create the stock dungeon room type catalog
pub fn create_dungeon_catalog() -> RoomTypeCatalog {
    let mut catalog = RoomTypeCatalog::new();

    catalog.register(RoomType::new("None", RoomKind::None).hidden());
    catalog.register(RoomType::new("Entrance", RoomKind::Entrance));

    // Directional corridors are chosen by the layout builder, never by hand
    catalog.register(RoomType::new("Corridor", RoomKind::Corridor));
    catalog.register(RoomType::new("Corridor NS", RoomKind::Corridor).hidden());
    catalog.register(RoomType::new("Corridor EW", RoomKind::Corridor).hidden());

    catalog.register(RoomType::new("Small Room", RoomKind::StandardRoom));
    catalog.register(RoomType::new("Medium Room", RoomKind::StandardRoom));
    catalog.register(RoomType::new("Large Room", RoomKind::StandardRoom));
    catalog.register(RoomType::new("Chest Room Small", RoomKind::StandardRoom));
    catalog.register(RoomType::new("Chest Room Medium", RoomKind::StandardRoom));
    catalog.register(RoomType::new("Chest Room Large", RoomKind::StandardRoom));

    catalog.register(RoomType::new("Boss Room", RoomKind::BossRoom));

    catalog
}
