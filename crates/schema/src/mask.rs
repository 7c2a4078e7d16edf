//! Schema-checked field masks applied to JSON documents.
//!
//! A mask is resolved selector text validated against a catalog: every
//! path segment must exist at its level by wire name, and sub-selections
//! are only legal under object-shaped fields. Application is a pure
//! "keep" copy over `serde_json::Value`.

use fieldmask_core::{resolve, FieldError, FieldInfo, FieldOptions};
use serde_json::{Map, Value};

use crate::object::{FieldKind, ObjectId, SchemaCatalog};

/// A validated field mask for one root object type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMask {
    infos: Vec<FieldInfo>,
}

impl FieldMask {
    /// Resolve `selectors` and validate the result against the schema
    /// rooted at `root`.
    pub fn new<S: AsRef<str>>(
        catalog: &SchemaCatalog,
        root: ObjectId,
        selectors: &[S],
        options: FieldOptions,
    ) -> Result<FieldMask, FieldError> {
        let infos = resolve(selectors, options)?;
        check_against_schema(catalog, root, &infos)?;
        Ok(FieldMask { infos })
    }

    /// Wrap an already-resolved tree without schema validation, for
    /// masks whose selectors were checked elsewhere.
    pub fn from_field_infos(infos: Vec<FieldInfo>) -> FieldMask {
        FieldMask { infos }
    }

    pub fn field_infos(&self) -> &[FieldInfo] {
        &self.infos
    }

    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    /// Copy `value`, keeping only the masked fields.
    ///
    /// An empty mask keeps everything. A leaf selection keeps the whole
    /// subtree under its key. Arrays are masked element-wise, objects
    /// key-wise; keys absent from the document are simply not produced.
    pub fn apply(&self, value: &Value) -> Value {
        if self.infos.is_empty() {
            return value.clone();
        }
        mask_value(value, &self.infos)
    }
}

fn check_against_schema(
    catalog: &SchemaCatalog,
    id: ObjectId,
    infos: &[FieldInfo],
) -> Result<(), FieldError> {
    let object = catalog.get(id);
    for info in infos {
        let field = object
            .field_by_wire_name(&info.name)
            .ok_or_else(|| FieldError::FieldNotFound(info.name.clone()))?;

        if let Some(first_sub) = info.sub_fields.first() {
            match (field.kind, field.object) {
                (FieldKind::Object | FieldKind::ArrayOfObjects, Some(sub)) => {
                    check_against_schema(catalog, sub, &info.sub_fields)
                        .map_err(|err| err.with_parent(&info.name))?;
                }
                _ => {
                    return Err(FieldError::FieldNotFound(first_sub.name.clone())
                        .with_parent(&info.name));
                }
            }
        }
    }
    Ok(())
}

fn mask_value(value: &Value, infos: &[FieldInfo]) -> Value {
    match value {
        Value::Object(map) => {
            let mut kept = Map::new();
            for info in infos {
                if let Some(sub_value) = map.get(&info.name) {
                    let masked = if info.sub_fields.is_empty() {
                        sub_value.clone()
                    } else {
                        mask_value(sub_value, &info.sub_fields)
                    };
                    kept.insert(info.name.clone(), masked);
                }
            }
            Value::Object(kept)
        }
        Value::Array(items) => {
            Value::Array(items.iter().map(|item| mask_value(item, infos)).collect())
        }
        other => other.clone(),
    }
}
