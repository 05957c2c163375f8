//! Entities and the generational [`EntityStore`] that owns them.
//!
//! Maps never own entities. They keep [`EntityId`] handles and resolve them
//! against a store at render time, so an entity destroyed elsewhere simply
//! stops resolving instead of dangling.

use delve_core::{Color, Point};

/// Drawing precedence. Higher orders are drawn later, on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RenderOrder {
    Corpse = 0,
    Item = 1,
    #[default]
    Actor = 2,
}

/// Something that stands on the map and has a glyph.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entity {
    pub name: String,
    pub pos: Point,
    pub glyph: char,
    pub color: Color,
    pub render_order: RenderOrder,
}

impl Entity {
    pub fn new(name: impl Into<String>, pos: Point, glyph: char, color: Color) -> Self {
        Self {
            name: name.into(),
            pos,
            glyph,
            color,
            render_order: RenderOrder::default(),
        }
    }

    /// Set the render order (builder).
    pub fn with_render_order(mut self, order: RenderOrder) -> Self {
        self.render_order = order;
        self
    }
}

/// Handle to an entity inside an [`EntityStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId {
    index: u32,
    generation: u32,
}

impl EntityId {
    /// Slot index, stable for the lifetime of the entity.
    #[inline]
    pub fn index(self) -> u32 {
        self.index
    }

    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    entity: Option<Entity>,
}

/// Owns entities and hands out generational [`EntityId`]s.
///
/// Removed slots are recycled with a bumped generation, so an old handle
/// never resolves to the entity that later takes its slot.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `entity` and return its handle.
    pub fn insert(&mut self, entity: Entity) -> EntityId {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entity = Some(entity);
            return EntityId {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            entity: Some(entity),
        });
        EntityId {
            index,
            generation: 0,
        }
    }

    /// Remove and return the entity behind `id`, if it is still alive.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let entity = slot.entity.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(entity)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.entity.as_ref())
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.entity.as_mut())
    }

    #[inline]
    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live entities.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Live entities with their handles, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            s.entity.as_ref().map(|e| {
                (
                    EntityId {
                        index: i as u32,
                        generation: s.generation,
                    },
                    e,
                )
            })
        })
    }
}
