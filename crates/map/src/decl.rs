//! Schema declaration: how a struct family claims its field ordinals.
//!
//! A schema type implements [`FieldSchema`] and describes itself through
//! a [`StructDecl`]: the struct's own root first, then every member in
//! declaration order, nested structs recursively. Ordinals are handed
//! out densely in visit order, so the layout of a schema fully
//! determines its numbering.
//!
//! Declaration mistakes (no root, a missing struct tag) are programming
//! errors and panic; nothing here is driven by runtime input.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// An ordinal-typed field handle: a one-line newtype over an integer,
/// one distinct type per schema family, so handles from different
/// families cannot be mixed up. See [`ordinal_type!`](crate::ordinal_type).
pub trait Ordinal: Copy + Eq + Hash + Debug {
    /// Construct from a 1-based position index.
    fn from_index(index: i64) -> Self;

    /// The 1-based position index.
    fn index(self) -> i64;
}

/// A struct family that can declare its fields.
///
/// `declare` must be deterministic and must claim the root before any
/// member; the map constructor re-runs it at shifted starting ordinals
/// to verify that `root` really returns the claimed root.
pub trait FieldSchema<F: Ordinal>: Sized {
    fn declare(decl: &mut StructDecl<'_, F>) -> Self;

    fn root(&self) -> F;
}

/// Recording state shared by every [`StructDecl`] level of one walk.
pub(crate) struct Walker<F: Ordinal> {
    next: i64,
    record: bool,
    tag_kinds: Vec<String>,
    pub(crate) parents: Vec<Option<F>>,
    pub(crate) field_names: Vec<String>,
    pub(crate) tag_values: HashMap<String, Vec<String>>,
}

impl<F: Ordinal> Walker<F> {
    pub(crate) fn new(tag_kinds: &[&str], start: i64, record: bool) -> Walker<F> {
        let tag_kinds: Vec<String> = tag_kinds.iter().map(|k| (*k).to_owned()).collect();
        let tag_values = tag_kinds
            .iter()
            .map(|kind| (kind.clone(), Vec::new()))
            .collect();
        Walker {
            next: start,
            record,
            tag_kinds,
            parents: Vec::new(),
            field_names: Vec::new(),
            tag_values,
        }
    }

    pub(crate) fn tag_kinds(&self) -> &[String] {
        &self.tag_kinds
    }

    fn next_index(&mut self) -> i64 {
        let index = self.next;
        self.next += 1;
        index
    }

    /// Tag values for the top-level root, which sits inside no field.
    fn blank_tags(&self) -> Vec<(String, String)> {
        self.tag_kinds
            .iter()
            .map(|kind| (kind.clone(), String::new()))
            .collect()
    }

    /// Pick out the configured tag kinds, panicking on a missing one.
    fn validate_tags(&self, full_name: &str, tags: &[(&str, &str)]) -> Vec<(String, String)> {
        let mut validated = Vec::with_capacity(self.tag_kinds.len());
        for kind in &self.tag_kinds {
            let value = tags
                .iter()
                .find(|(k, _)| *k == kind.as_str())
                .map(|(_, v)| *v);
            match value {
                Some(value) => validated.push((kind.clone(), value.to_owned())),
                None => panic!("missing struct tag {:?} for field {:?}", kind, full_name),
            }
        }
        validated
    }

    fn record_field(&mut self, parent: Option<F>, name: &str, tags: &[(String, String)]) {
        if !self.record {
            return;
        }
        self.parents.push(parent);
        self.field_names.push(name.to_owned());
        for (kind, value) in tags {
            if let Some(values) = self.tag_values.get_mut(kind) {
                values.push(value.clone());
            }
        }
    }
}

/// One level of a schema declaration.
pub struct StructDecl<'w, F: Ordinal> {
    walker: &'w mut Walker<F>,
    parent: Option<F>,
    struct_root: Option<F>,
    path: String,
    decl_name: String,
    decl_tags: Vec<(String, String)>,
}

impl<'w, F: Ordinal> StructDecl<'w, F> {
    /// Claim this level's root ordinal. Must come before any member.
    pub fn root(&mut self) -> F {
        if self.struct_root.is_some() {
            duplicated_root_panic(&self.path);
        }
        let root = F::from_index(self.walker.next_index());
        self.struct_root = Some(root);
        let decl_name = std::mem::take(&mut self.decl_name);
        let decl_tags = std::mem::take(&mut self.decl_tags);
        self.walker.record_field(self.parent, &decl_name, &decl_tags);
        root
    }

    /// Declare a plain member field.
    pub fn leaf(&mut self, name: &str, tags: &[(&str, &str)]) -> F {
        let struct_root = self.require_root();
        let full_name = self.member_path(name);
        let validated = self.walker.validate_tags(&full_name, tags);
        let field = F::from_index(self.walker.next_index());
        self.walker.record_field(Some(struct_root), name, &validated);
        field
    }

    /// Declare a nested struct member, descending into its declaration.
    pub fn nested<S: FieldSchema<F>>(&mut self, name: &str, tags: &[(&str, &str)]) -> S {
        let struct_root = self.require_root();
        let full_name = self.member_path(name);
        let decl_tags = self.walker.validate_tags(&full_name, tags);

        let mut child = StructDecl {
            walker: &mut *self.walker,
            parent: Some(struct_root),
            struct_root: None,
            path: full_name,
            decl_name: name.to_owned(),
            decl_tags,
        };
        let schema = S::declare(&mut child);
        if child.struct_root.is_none() {
            missing_root_panic(&child.path);
        }
        schema
    }

    fn require_root(&self) -> F {
        match self.struct_root {
            Some(root) => root,
            None => missing_root_panic(&self.path),
        }
    }

    fn member_path(&self, name: &str) -> String {
        if self.path.is_empty() {
            name.to_owned()
        } else {
            format!("{}.{}", self.path, name)
        }
    }
}

/// Run one full declaration walk, returning the schema value and its
/// claimed root.
pub(crate) fn declare_top<F: Ordinal, T: FieldSchema<F>>(walker: &mut Walker<F>) -> (T, F) {
    let decl_tags = walker.blank_tags();
    let mut top = StructDecl {
        walker,
        parent: None,
        struct_root: None,
        path: String::new(),
        decl_name: String::new(),
        decl_tags,
    };
    let mapping = T::declare(&mut top);
    match top.struct_root {
        Some(root) => (mapping, root),
        None => missing_root_panic(""),
    }
}

fn missing_root_panic(path: &str) -> ! {
    if path.is_empty() {
        panic!("missing field \"Root\" for root of struct");
    }
    panic!("missing field \"Root\" for field {:?}", path);
}

fn duplicated_root_panic(path: &str) -> ! {
    if path.is_empty() {
        panic!("duplicated field \"Root\" for root of struct");
    }
    panic!("duplicated field \"Root\" for field {:?}", path);
}
