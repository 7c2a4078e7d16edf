//! The field position map: dense ordinals with parent/child structure,
//! names, tags, and selector translation.

use std::collections::HashMap;
use std::sync::OnceLock;

use fieldmask_core::{FieldError, FieldInfo};

use crate::decl::{declare_top, FieldSchema, Ordinal, Walker};

/// Position map over one schema family `T` with ordinal type `F`.
///
/// Construction walks `T`'s declaration, assigning ordinals `1..=N` in
/// depth-first declaration order (a struct's root right before its
/// members), then re-runs the walk at shifted starting ordinals to catch
/// a `root` accessor that does not return the claimed root.
pub struct FieldMap<F: Ordinal, T> {
    mapping: T,
    root: F,
    parents: Vec<Option<F>>,
    children: Vec<Vec<F>>,
    field_names: Vec<String>,
    tag_kinds: Vec<String>,
    tag_values: HashMap<String, Vec<String>>,
    tag_index: OnceLock<HashMap<String, TagNode<F>>>,
}

struct TagNode<F> {
    field: F,
    children: HashMap<String, TagNode<F>>,
}

impl<F: Ordinal, T: FieldSchema<F>> FieldMap<F, T> {
    pub fn new() -> FieldMap<F, T> {
        FieldMap::with_tags(&[])
    }

    /// Build the map and collect the given struct-tag kinds for every
    /// field. Declaring a field without one of the kinds panics.
    pub fn with_tags(tag_kinds: &[&str]) -> FieldMap<F, T> {
        let mut walker = Walker::new(tag_kinds, 1, true);
        let (mapping, root) = declare_top::<F, T>(&mut walker);
        if mapping.root() != root {
            panic!("invalid root implementation");
        }

        // A constant root accessor would pass the base-1 walk above, so
        // probe a few shifted bases as well.
        for base in [3, 7, 13, 31] {
            let mut probe = Walker::new(tag_kinds, base, false);
            let (probe_mapping, _) = declare_top::<F, T>(&mut probe);
            if probe_mapping.root() != F::from_index(base) {
                panic!("invalid root implementation");
            }
        }

        let count = walker.parents.len();
        let mut children: Vec<Vec<F>> = vec![Vec::new(); count];
        for (i, parent) in walker.parents.iter().enumerate() {
            if let Some(parent) = parent {
                let slot = (parent.index() - 1) as usize;
                children[slot].push(F::from_index(i as i64 + 1));
            }
        }
        let tag_kinds = walker.tag_kinds().to_vec();

        FieldMap {
            mapping,
            root,
            parents: walker.parents,
            children,
            field_names: walker.field_names,
            tag_kinds,
            tag_values: walker.tag_values,
            tag_index: OnceLock::new(),
        }
    }
}

impl<F: Ordinal, T: FieldSchema<F>> Default for FieldMap<F, T> {
    fn default() -> FieldMap<F, T> {
        FieldMap::new()
    }
}

impl<F: Ordinal, T> FieldMap<F, T> {
    fn slot(&self, field: F) -> usize {
        (field.index() - 1) as usize
    }

    /// The schema value carrying every declared ordinal.
    pub fn mapping(&self) -> &T {
        &self.mapping
    }

    /// The top-level root ordinal, always index 1.
    pub fn root(&self) -> F {
        self.root
    }

    /// Total number of ordinals, the `N` of `1..=N`.
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn is_struct(&self, field: F) -> bool {
        !self.children[self.slot(field)].is_empty()
    }

    /// Direct children in declaration order; a nested struct is
    /// represented by its root.
    pub fn children_of(&self, field: F) -> &[F] {
        &self.children[self.slot(field)]
    }

    /// The enclosing struct's root, `None` for the top-level root.
    pub fn parent_of(&self, field: F) -> Option<F> {
        self.parents[self.slot(field)]
    }

    /// The field itself, its parent, and so on up to and including the
    /// top-level root.
    pub fn ancestors_of(&self, field: F) -> Vec<F> {
        let mut result = vec![field];
        let mut current = field;
        while let Some(parent) = self.parent_of(current) {
            result.push(parent);
            current = parent;
        }
        result
    }

    /// Bare field name; for a nested struct's root, the struct field's
    /// name in its parent. Empty for the top-level root.
    pub fn field_name(&self, field: F) -> &str {
        &self.field_names[self.slot(field)]
    }

    /// Dot-joined names from just below the top-level root down to
    /// `field`.
    pub fn full_field_name(&self, field: F) -> String {
        self.join_to_root(field, |f| self.field_name(f))
    }

    /// The collected value of `kind` for `field`.
    ///
    /// # Panics
    ///
    /// When `kind` was not configured at construction.
    pub fn tag(&self, kind: &str, field: F) -> &str {
        &self.tag_table(kind)[self.slot(field)]
    }

    /// Dot-joined tag values from just below the top-level root down to
    /// `field`.
    pub fn full_tag(&self, kind: &str, field: F) -> String {
        let table = self.tag_table(kind);
        self.join_to_root(field, |f| table[self.slot(f)].as_str())
    }

    fn tag_table(&self, kind: &str) -> &[String] {
        match self.tag_values.get(kind) {
            Some(values) => values,
            None => panic!("unknown struct tag {:?}", kind),
        }
    }

    fn join_to_root<'a>(&'a self, field: F, name_of: impl Fn(F) -> &'a str) -> String {
        let mut full = String::new();
        let mut current = field;
        loop {
            let name = name_of(current);
            if full.is_empty() {
                full = name.to_owned();
            } else {
                full = format!("{}.{}", name, full);
            }
            match self.parent_of(current) {
                Some(parent) if parent != self.root => current = parent,
                _ => return full,
            }
        }
    }

    /// Copy of the parent table, indexed by ordinal minus one.
    pub(crate) fn parent_table(&self) -> Vec<Option<F>> {
        self.parents.clone()
    }

    /// Translate a resolved selector tree into ordinals, matching each
    /// level by the collected values of `kind`. A leaf selection yields
    /// the matched field itself (a struct's root for struct fields); a
    /// parent selection descends without yielding the parent.
    ///
    /// # Panics
    ///
    /// When `kind` was not configured at construction.
    pub fn from_selected_fields(
        &self,
        kind: &str,
        infos: &[FieldInfo],
    ) -> Result<Vec<F>, FieldError> {
        let index = self.tag_index();
        let Some(node) = index.get(kind) else {
            panic!("unknown struct tag {:?}", kind);
        };
        let mut result = Vec::with_capacity(infos.len());
        collect_selected(node, infos, &mut result)?;
        Ok(result)
    }

    fn tag_index(&self) -> &HashMap<String, TagNode<F>> {
        self.tag_index.get_or_init(|| {
            let mut index = HashMap::new();
            for kind in &self.tag_kinds {
                index.insert(kind.clone(), self.build_tag_node(kind, self.root));
            }
            index
        })
    }

    fn build_tag_node(&self, kind: &str, field: F) -> TagNode<F> {
        let mut children = HashMap::new();
        for &child in self.children_of(field) {
            children.insert(
                self.tag(kind, child).to_owned(),
                self.build_tag_node(kind, child),
            );
        }
        TagNode { field, children }
    }
}

fn collect_selected<F: Ordinal>(
    node: &TagNode<F>,
    infos: &[FieldInfo],
    result: &mut Vec<F>,
) -> Result<(), FieldError> {
    for info in infos {
        let sub = node
            .children
            .get(&info.name)
            .ok_or_else(|| FieldError::FieldNotFound(info.name.clone()))?;
        if info.sub_fields.is_empty() {
            result.push(sub.field);
        } else {
            collect_selected(sub, &info.sub_fields, result)
                .map_err(|err| err.with_parent(&info.name))?;
        }
    }
    Ok(())
}
