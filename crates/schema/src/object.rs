//! The object-schema catalog.
//!
//! Object shapes are interned into an arena keyed by type identity, so a
//! nested type reachable through several fields exists exactly once and
//! walks over the schema graph terminate. The arena admits no cycles:
//! a field can only reference an object that was interned before it.

use std::collections::{HashMap, HashSet};

/// Identity of an object type: its declared name plus the namespace it
/// came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey {
    pub type_name: String,
    pub namespace: String,
}

/// Handle to an interned [`ObjectInfo`] inside its [`SchemaCatalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(usize);

/// How a field is shaped on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Simple,
    Object,
    ArrayOfObjects,
    ArrayOfPrimitives,
    /// Externally defined well-known type: selectable as a whole, never
    /// by sub-field.
    Opaque,
}

/// One field of an object schema. `object` is set exactly for the
/// `Object` and `ArrayOfObjects` kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectField {
    pub name: String,
    pub wire_name: String,
    pub kind: FieldKind,
    pub object: Option<ObjectId>,
}

impl ObjectField {
    pub fn simple(name: &str, wire_name: &str) -> ObjectField {
        ObjectField {
            name: name.to_owned(),
            wire_name: wire_name.to_owned(),
            kind: FieldKind::Simple,
            object: None,
        }
    }

    pub fn object(name: &str, wire_name: &str, object: ObjectId) -> ObjectField {
        ObjectField {
            name: name.to_owned(),
            wire_name: wire_name.to_owned(),
            kind: FieldKind::Object,
            object: Some(object),
        }
    }

    pub fn object_array(name: &str, wire_name: &str, object: ObjectId) -> ObjectField {
        ObjectField {
            name: name.to_owned(),
            wire_name: wire_name.to_owned(),
            kind: FieldKind::ArrayOfObjects,
            object: Some(object),
        }
    }

    pub fn primitive_array(name: &str, wire_name: &str) -> ObjectField {
        ObjectField {
            name: name.to_owned(),
            wire_name: wire_name.to_owned(),
            kind: FieldKind::ArrayOfPrimitives,
            object: None,
        }
    }

    pub fn opaque(name: &str, wire_name: &str) -> ObjectField {
        ObjectField {
            name: name.to_owned(),
            wire_name: wire_name.to_owned(),
            kind: FieldKind::Opaque,
            object: None,
        }
    }
}

/// An interned object shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    pub type_name: String,
    pub namespace: String,
    pub sub_fields: Vec<ObjectField>,
}

impl ObjectInfo {
    pub fn key(&self) -> ObjectKey {
        ObjectKey {
            type_name: self.type_name.clone(),
            namespace: self.namespace.clone(),
        }
    }

    pub fn field_by_wire_name(&self, wire_name: &str) -> Option<&ObjectField> {
        self.sub_fields.iter().find(|f| f.wire_name == wire_name)
    }
}

#[derive(Debug, Default)]
pub struct SchemaCatalog {
    objects: Vec<ObjectInfo>,
    index: HashMap<ObjectKey, ObjectId>,
}

impl SchemaCatalog {
    pub fn new() -> SchemaCatalog {
        SchemaCatalog::default()
    }

    /// Intern an object shape. A key seen before returns the existing id
    /// with the existing fields untouched; the first registration wins.
    pub fn object(
        &mut self,
        type_name: &str,
        namespace: &str,
        sub_fields: Vec<ObjectField>,
    ) -> ObjectId {
        let key = ObjectKey {
            type_name: type_name.to_owned(),
            namespace: namespace.to_owned(),
        };
        if let Some(&id) = self.index.get(&key) {
            return id;
        }
        let id = ObjectId(self.objects.len());
        self.objects.push(ObjectInfo {
            type_name: key.type_name.clone(),
            namespace: key.namespace.clone(),
            sub_fields,
        });
        self.index.insert(key, id);
        id
    }

    pub fn lookup(&self, type_name: &str, namespace: &str) -> Option<ObjectId> {
        self.index
            .get(&ObjectKey {
                type_name: type_name.to_owned(),
                namespace: namespace.to_owned(),
            })
            .copied()
    }

    pub fn get(&self, id: ObjectId) -> &ObjectInfo {
        &self.objects[id.0]
    }

    pub(crate) fn get_mut(&mut self, id: ObjectId) -> &mut ObjectInfo {
        &mut self.objects[id.0]
    }

    /// Every object reachable from `roots`, depth-first in field order,
    /// each exactly once.
    pub fn reachable_from(&self, roots: &[ObjectId]) -> Vec<ObjectId> {
        let mut seen = HashSet::new();
        let mut result = Vec::new();
        for &root in roots {
            self.collect_reachable(root, &mut seen, &mut result);
        }
        result
    }

    fn collect_reachable(
        &self,
        id: ObjectId,
        seen: &mut HashSet<ObjectId>,
        result: &mut Vec<ObjectId>,
    ) {
        if !seen.insert(id) {
            return;
        }
        result.push(id);
        for field in &self.get(id).sub_fields {
            if let Some(sub) = field.object {
                self.collect_reachable(sub, seen, result);
            }
        }
    }
}
