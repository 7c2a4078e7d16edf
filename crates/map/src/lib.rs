//! Typed field position maps and cross-schema mapping.
//!
//! A schema family declares its fields through [`FieldSchema`], and
//! [`FieldMap`] assigns each one a dense ordinal in declaration order.
//! The map answers structural queries (parents, children, names, struct
//! tags) and translates resolved selector trees into ordinals. On top
//! of two maps, a [`Mapper`] records which destination fields are
//! affected when a source field changes.
//!
//! Entry points:
//!
//! - [`ordinal_type!`] declares the per-family ordinal newtype
//! - [`FieldMap::with_tags`] walks a schema family once and validates
//!   its declaration
//! - [`Mapper::builder`] collects [`MappingRule`]s between two maps

pub mod decl;
pub mod field_map;
pub mod mapper;

pub use decl::{FieldSchema, Ordinal, StructDecl};
pub use field_map::FieldMap;
pub use mapper::{Mapper, MapperBuilder, MappingRule};

/// Declares an ordinal newtype for one schema family: a `Copy` wrapper
/// over the position index with an [`Ordinal`] implementation. Distinct
/// families get distinct types so their handles cannot be mixed up.
#[macro_export]
macro_rules! ordinal_type {
    ($($(#[$meta:meta])* $vis:vis struct $name:ident;)+) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            $vis struct $name(i64);

            impl $crate::Ordinal for $name {
                fn from_index(index: i64) -> Self {
                    $name(index)
                }

                fn index(self) -> i64 {
                    self.0
                }
            }
        )+
    };
}
