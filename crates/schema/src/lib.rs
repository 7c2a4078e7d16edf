//! Object-schema catalog, field selection, and JSON mask application.
//!
//! [`SchemaCatalog`] interns message shapes by type identity. On top of
//! it sit two consumers of resolved selector trees:
//!
//! - [`select_fields`] prunes a catalog down to configured selections,
//!   merging by object identity across roots
//! - [`FieldMask`] validates request selectors against a catalog and
//!   applies the resulting mask to `serde_json::Value` documents

pub mod mask;
pub mod object;
pub mod select;

pub use mask::FieldMask;
pub use object::{FieldKind, ObjectField, ObjectId, ObjectInfo, ObjectKey, SchemaCatalog};
pub use select::{select_fields, MessageSelection};
