//! Applying resolved field selections onto a schema catalog.
//!
//! Selections are keyed by object identity, not by path: when the same
//! nested type is reachable through several fields, whatever is selected
//! for it anywhere applies to it everywhere. An object no selection ever
//! restricts keeps all of its fields.

use std::collections::{HashMap, HashSet};

use fieldmask_core::FieldInfo;

use crate::object::{FieldKind, ObjectId, SchemaCatalog};

/// One root object and the fields it is limited to. An empty list means
/// every field of the root (and everything below) is kept.
#[derive(Debug, Clone)]
pub struct MessageSelection {
    pub root: ObjectId,
    pub limited_to: Vec<FieldInfo>,
}

impl MessageSelection {
    pub fn new(root: ObjectId, limited_to: Vec<FieldInfo>) -> MessageSelection {
        MessageSelection { root, limited_to }
    }

    pub fn keep_all(root: ObjectId) -> MessageSelection {
        MessageSelection {
            root,
            limited_to: Vec::new(),
        }
    }
}

struct FieldSelector {
    selected: HashMap<ObjectId, HashSet<String>>,
}

impl FieldSelector {
    fn new() -> FieldSelector {
        FieldSelector {
            selected: HashMap::new(),
        }
    }

    /// Record the selected wire names for `id` and recurse into nested
    /// objects. Sub-selections under a field with no nested object are
    /// ignored here; the schema-checked mask constructor rejects them.
    ///
    /// Panics when a selection names a field the object does not declare.
    /// Selections come from the program's own configuration, so that is
    /// a programming error, not input to recover from.
    fn mark(
        &mut self,
        catalog: &SchemaCatalog,
        id: ObjectId,
        limited_to: &[FieldInfo],
        prefix: &str,
    ) {
        for info in limited_to {
            self.selected
                .entry(id)
                .or_default()
                .insert(info.name.clone());

            let Some(field) = catalog.get(id).field_by_wire_name(&info.name) else {
                panic!("not found field '{}{}'", prefix, info.name);
            };
            if let Some(sub) = field.object {
                let sub_prefix = format!("{}{}.", prefix, info.name);
                self.mark(catalog, sub, &info.sub_fields, &sub_prefix);
            }
        }
    }

    fn allow_all(&self, id: ObjectId) -> bool {
        self.selected.get(&id).map_or(true, HashSet::is_empty)
    }

    fn allows(&self, id: ObjectId, wire_name: &str) -> bool {
        self.selected
            .get(&id)
            .map_or(false, |set| set.contains(wire_name))
    }

    /// Prune one object to its selected fields. A kept object-typed field
    /// whose target is unrestricted collapses to a plain field: the whole
    /// sub-object is kept, so its link carries no information any more.
    fn keep_selected(&self, catalog: &mut SchemaCatalog, id: ObjectId) {
        if self.allow_all(id) {
            return;
        }

        let fields = catalog.get(id).sub_fields.clone();
        let mut kept = Vec::with_capacity(fields.len());
        for mut field in fields {
            if !self.allows(id, &field.wire_name) {
                continue;
            }
            if let Some(sub) = field.object {
                if self.allow_all(sub) {
                    field.object = None;
                    field.kind = FieldKind::Simple;
                }
            }
            kept.push(field);
        }
        catalog.get_mut(id).sub_fields = kept;
    }
}

/// Prune every object reachable from the selections down to its selected
/// fields, merging selections by object identity first.
///
/// # Panics
///
/// When a selection names a field its object does not declare, with the
/// full dotted path of the offending name.
pub fn select_fields(catalog: &mut SchemaCatalog, selections: &[MessageSelection]) {
    let mut selector = FieldSelector::new();
    for selection in selections {
        selector.mark(catalog, selection.root, &selection.limited_to, "");
    }

    let roots: Vec<ObjectId> = selections.iter().map(|s| s.root).collect();
    for id in catalog.reachable_from(&roots) {
        selector.keep_selected(catalog, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectField;
    use fieldmask_core::FieldInfo;

    const NS: &str = "catalog.v1";

    fn provider_catalog() -> (SchemaCatalog, ObjectId) {
        let mut catalog = SchemaCatalog::new();
        let provider = catalog.object(
            "ProviderInfo",
            NS,
            vec![
                ObjectField::simple("Id", "id"),
                ObjectField::simple("Name", "name"),
                ObjectField::simple("Logo", "logo"),
                ObjectField::simple("ImageUrl", "imageUrl"),
            ],
        );
        (catalog, provider)
    }

    #[test]
    fn no_restriction_keeps_everything() {
        let (mut catalog, provider) = provider_catalog();
        select_fields(&mut catalog, &[MessageSelection::keep_all(provider)]);
        assert_eq!(catalog.get(provider).sub_fields.len(), 4);
    }

    #[test]
    fn restriction_keeps_only_selected_fields() {
        let (mut catalog, provider) = provider_catalog();
        select_fields(
            &mut catalog,
            &[MessageSelection::new(
                provider,
                vec![FieldInfo::leaf("id"), FieldInfo::leaf("logo")],
            )],
        );
        assert_eq!(
            catalog.get(provider).sub_fields,
            vec![
                ObjectField::simple("Id", "id"),
                ObjectField::simple("Logo", "logo"),
            ],
        );
    }

    fn product_catalog() -> (SchemaCatalog, ObjectId, ObjectId) {
        let mut catalog = SchemaCatalog::new();
        let provider = catalog.object(
            "ProviderInfo",
            NS,
            vec![
                ObjectField::simple("Id", "id"),
                ObjectField::simple("Name", "name"),
            ],
        );
        let product = catalog.object(
            "Product",
            NS,
            vec![
                ObjectField::simple("Sku", "sku"),
                ObjectField::object("Provider", "provider", provider),
                ObjectField::opaque("Quantity", "quantity"),
                ObjectField::opaque("Stocks", "stocks"),
            ],
        );
        (catalog, product, provider)
    }

    #[test]
    fn selections_merge_by_object_identity() {
        let (mut catalog, product, provider) = product_catalog();

        // One selection leaves the provider unrestricted, the other
        // restricts it through the product; the restriction wins.
        select_fields(
            &mut catalog,
            &[
                MessageSelection::keep_all(provider),
                MessageSelection::new(
                    product,
                    vec![
                        FieldInfo::leaf("sku"),
                        FieldInfo::with_sub_fields(
                            "provider",
                            vec![FieldInfo::leaf("name")],
                        ),
                        FieldInfo::leaf("stocks"),
                    ],
                ),
            ],
        );

        assert_eq!(
            catalog.get(provider).sub_fields,
            vec![ObjectField::simple("Name", "name")],
        );
        assert_eq!(
            catalog.get(product).sub_fields,
            vec![
                ObjectField::simple("Sku", "sku"),
                ObjectField::object("Provider", "provider", provider),
                ObjectField::opaque("Stocks", "stocks"),
            ],
        );
    }

    #[test]
    fn bare_object_selection_collapses_the_field() {
        let (mut catalog, product, provider) = product_catalog();

        select_fields(
            &mut catalog,
            &[
                MessageSelection::keep_all(provider),
                MessageSelection::new(
                    product,
                    vec![
                        FieldInfo::leaf("sku"),
                        FieldInfo::leaf("provider"),
                        FieldInfo::leaf("stocks"),
                    ],
                ),
            ],
        );

        // The provider object stays unrestricted, so the field that
        // pointed at it becomes a plain copy-all field.
        assert_eq!(
            catalog.get(product).sub_fields,
            vec![
                ObjectField::simple("Sku", "sku"),
                ObjectField::simple("Provider", "provider"),
                ObjectField::opaque("Stocks", "stocks"),
            ],
        );
        assert_eq!(catalog.get(provider).sub_fields.len(), 2);
    }

    #[test]
    fn deep_selection_prunes_every_level() {
        let mut catalog = SchemaCatalog::new();
        let option = catalog.object(
            "Option",
            NS,
            vec![
                ObjectField::simple("Code", "code"),
                ObjectField::simple("Name", "name"),
            ],
        );
        let attribute = catalog.object(
            "Attribute",
            NS,
            vec![
                ObjectField::simple("Id", "id"),
                ObjectField::simple("Code", "code"),
                ObjectField::simple("Name", "name"),
                ObjectField::object_array("Options", "options", option),
            ],
        );
        let product = catalog.object(
            "Product",
            NS,
            vec![
                ObjectField::simple("Sku", "sku"),
                ObjectField::object_array("Attributes", "attributes", attribute),
            ],
        );

        select_fields(
            &mut catalog,
            &[MessageSelection::new(
                product,
                vec![FieldInfo::with_sub_fields(
                    "attributes",
                    vec![
                        FieldInfo::leaf("name"),
                        FieldInfo::with_sub_fields(
                            "options",
                            vec![FieldInfo::leaf("code")],
                        ),
                    ],
                )],
            )],
        );

        assert_eq!(
            catalog.get(product).sub_fields,
            vec![ObjectField::object_array("Attributes", "attributes", attribute)],
        );
        assert_eq!(
            catalog.get(attribute).sub_fields,
            vec![
                ObjectField::simple("Name", "name"),
                ObjectField::object_array("Options", "options", option),
            ],
        );
        assert_eq!(
            catalog.get(option).sub_fields,
            vec![ObjectField::simple("Code", "code")],
        );
    }

    #[test]
    #[should_panic(expected = "not found field 'xxyy'")]
    fn unknown_field_panics() {
        let (mut catalog, provider) = provider_catalog();
        select_fields(
            &mut catalog,
            &[MessageSelection::new(provider, vec![FieldInfo::leaf("xxyy")])],
        );
    }

    #[test]
    #[should_panic(expected = "not found field 'attributes.options.hello'")]
    fn unknown_nested_field_panics_with_the_full_path() {
        let mut catalog = SchemaCatalog::new();
        let option = catalog.object(
            "Option",
            NS,
            vec![
                ObjectField::simple("Code", "code"),
                ObjectField::simple("Name", "name"),
            ],
        );
        let attribute = catalog.object(
            "Attribute",
            NS,
            vec![
                ObjectField::simple("Name", "name"),
                ObjectField::object_array("Options", "options", option),
            ],
        );
        let product = catalog.object(
            "Product",
            NS,
            vec![ObjectField::object_array("Attributes", "attributes", attribute)],
        );

        select_fields(
            &mut catalog,
            &[MessageSelection::new(
                product,
                vec![FieldInfo::with_sub_fields(
                    "attributes",
                    vec![
                        FieldInfo::leaf("name"),
                        FieldInfo::with_sub_fields(
                            "options",
                            vec![FieldInfo::leaf("code"), FieldInfo::leaf("hello")],
                        ),
                    ],
                )],
            )],
        );
    }
}
