//! Accessor traits implemented by `#[derive(Entity)]`
//!
//! [`Resource`] is object safe so the mapper can walk nested values of
//! different types through `&dyn Resource`. [`Entity`] adds the constructors
//! needed to build result lists.

use super::Descriptor;

/// Read view of one mapped field
pub enum FieldValue<'a> {
    Text(&'a str),
    Bool(bool),
    TextList(&'a [String]),
    Entity(&'a dyn Resource),
    EntityList(Vec<&'a dyn Resource>),
}

impl FieldValue<'_> {
    /// True if the field would be skipped by serialization
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Bool(b) => !b,
            FieldValue::TextList(items) => items.is_empty(),
            FieldValue::Entity(value) => value.is_empty(),
            FieldValue::EntityList(items) => items.is_empty(),
        }
    }
}

/// Write view of one mapped field
pub enum FieldSlot<'a> {
    Text(&'a mut String),
    Bool(&'a mut bool),
    TextList(&'a mut Vec<String>),
    Entity(&'a mut dyn Resource),
    EntityList(&'a mut dyn ResourceList),
}

/// A value that can be mapped to and from triples
pub trait Resource: Send + Sync {
    /// Static mapping metadata of the value's type
    fn descriptor(&self) -> &'static Descriptor;

    /// Current id; `None` when the type declares no id field
    fn id(&self) -> Option<&str>;

    /// Overwrite the id. Returns false when the type has no id field.
    fn set_id(&mut self, id: String) -> bool;

    /// Reset every field to its default
    fn clear(&mut self);

    /// Read a mapped field by name
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;

    /// Write a mapped field by name
    fn field_mut(&mut self, name: &str) -> Option<FieldSlot<'_>>;

    /// True when the id and every mapped field are empty
    fn is_empty(&self) -> bool {
        if self.id().map_or(false, |id| !id.is_empty()) {
            return false;
        }
        self.descriptor()
            .fields
            .iter()
            .all(|f| self.field(f.name).map_or(true, |v| v.is_empty()))
    }

    /// Id if set and non-empty
    fn assigned_id(&self) -> Option<&str> {
        self.id().filter(|id| !id.is_empty())
    }
}

/// Growable list of nested values behind a `dyn` boundary
pub trait ResourceList: Send + Sync {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a default element and return it for population
    fn push_default(&mut self) -> &mut dyn Resource;

    /// Mutable view of every element
    fn items_mut(&mut self) -> Vec<&mut dyn Resource>;

    fn clear(&mut self);
}

/// A concrete mapped type
pub trait Entity: Resource + Default + 'static {
    /// Static mapping metadata
    fn type_descriptor() -> &'static Descriptor;
}

impl<T: Entity> ResourceList for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn push_default(&mut self) -> &mut dyn Resource {
        self.push(T::default());
        let last = Vec::len(self) - 1;
        &mut self[last]
    }

    fn items_mut(&mut self) -> Vec<&mut dyn Resource> {
        self.iter_mut().map(|v| v as &mut dyn Resource).collect()
    }

    fn clear(&mut self) {
        Vec::clear(self)
    }
}
