//! End-to-end masking tests: a product catalog, request selectors coming
//! in as strings, and JSON documents going out pruned.

use fieldmask_core::{FieldError, FieldOptions};
use fieldmask_schema::{FieldMask, ObjectField, ObjectId, SchemaCatalog};
use serde_json::{json, Value};

const NS: &str = "catalog.v1";

fn build_catalog() -> (SchemaCatalog, ObjectId) {
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
    let provider = catalog.object(
        "Provider",
        NS,
        vec![
            ObjectField::simple("Id", "id"),
            ObjectField::simple("Name", "name"),
            ObjectField::simple("ImageUrl", "imageUrl"),
        ],
    );
    let product = catalog.object(
        "Product",
        NS,
        vec![
            ObjectField::simple("Sku", "sku"),
            ObjectField::simple("Name", "name"),
            ObjectField::object("Provider", "provider", provider),
            ObjectField::object_array("Attributes", "attributes", attribute),
            ObjectField::primitive_array("Tags", "tags"),
            ObjectField::opaque("CreatedAt", "createdAt"),
        ],
    );
    (catalog, product)
}

fn product_doc() -> Value {
    json!({
        "sku": "SKU001",
        "name": "Keyboard",
        "provider": {
            "id": 41,
            "name": "Provider Name",
            "imageUrl": "http://example.com/img",
        },
        "attributes": [
            {
                "id": 31,
                "code": "color",
                "name": "Color",
                "options": [
                    { "code": "red", "name": "Red" },
                    { "code": "black", "name": "Black" },
                ],
            },
        ],
        "tags": ["mechanical", "rgb"],
        "createdAt": "2023-02-01T00:00:00Z",
    })
}

#[test]
fn mask_keeps_requested_fields_end_to_end() {
    let (catalog, product) = build_catalog();
    let mask = FieldMask::new(
        &catalog,
        product,
        &["sku", "provider.{id|name}"],
        FieldOptions::default(),
    )
    .unwrap();

    assert_eq!(
        mask.apply(&product_doc()),
        json!({
            "sku": "SKU001",
            "provider": { "id": 41, "name": "Provider Name" },
        }),
    );
}

#[test]
fn empty_selector_list_keeps_the_whole_document() {
    let (catalog, product) = build_catalog();
    let mask = FieldMask::new(&catalog, product, &[] as &[&str], FieldOptions::default())
        .unwrap();
    assert_eq!(mask.apply(&product_doc()), product_doc());
}

#[test]
fn array_fields_mask_element_wise() {
    let (catalog, product) = build_catalog();
    let mask = FieldMask::new(
        &catalog,
        product,
        &["attributes.{code|options.name}", "tags"],
        FieldOptions::default(),
    )
    .unwrap();

    assert_eq!(
        mask.apply(&product_doc()),
        json!({
            "attributes": [
                {
                    "code": "color",
                    "options": [ { "name": "Red" }, { "name": "Black" } ],
                },
            ],
            "tags": ["mechanical", "rgb"],
        }),
    );
}

#[test]
fn unknown_fields_are_rejected() {
    let (catalog, product) = build_catalog();

    let err = FieldMask::new(
        &catalog,
        product,
        &["provider.invalid"],
        FieldOptions::default(),
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "fieldmask: field not found or not allowed 'provider.invalid'",
    );

    let err = FieldMask::new(
        &catalog,
        product,
        &["sku.invalid"],
        FieldOptions::default(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        FieldError::FieldNotFound("sku.invalid".to_owned()),
    );

    let err = FieldMask::new(
        &catalog,
        product,
        &["attributes.options.code.invalid"],
        FieldOptions::default(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        FieldError::FieldNotFound("attributes.options.code.invalid".to_owned()),
    );
}

#[test]
fn resolution_limits_apply_before_schema_checking() {
    let (catalog, product) = build_catalog();

    let err = FieldMask::new(
        &catalog,
        product,
        &["sku", "name", "provider"],
        FieldOptions::default().with_max_fields(2),
    )
    .unwrap_err();
    assert_eq!(err, FieldError::ExceededMaxFields);

    let err = FieldMask::new(
        &catalog,
        product,
        &["attributes.options.code"],
        FieldOptions::default().with_max_field_depth(2),
    )
    .unwrap_err();
    assert_eq!(err, FieldError::ExceededMaxDepth);
}

#[test]
fn allow_list_applies_before_schema_checking() {
    let (catalog, product) = build_catalog();

    let options = FieldOptions::default()
        .with_limited_to_fields(["sku", "provider.{id|name}"]);
    let err = FieldMask::new(&catalog, product, &["name"], options).unwrap_err();
    assert_eq!(err, FieldError::FieldNotFound("name".to_owned()));

    let options = FieldOptions::default()
        .with_limited_to_fields(["sku", "provider.{id|name}"]);
    let mask = FieldMask::new(&catalog, product, &["provider.id"], options).unwrap();
    assert_eq!(
        mask.apply(&product_doc()),
        json!({ "provider": { "id": 41 } }),
    );
}

#[test]
fn duplicated_selectors_are_rejected() {
    let (catalog, product) = build_catalog();
    let err = FieldMask::new(
        &catalog,
        product,
        &["provider.name", "provider.name"],
        FieldOptions::default(),
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "fieldmask: duplicated field 'provider.name'",
    );
}

#[test]
fn null_and_absent_values_round_trip_quietly() {
    let (catalog, product) = build_catalog();
    let mask = FieldMask::new(
        &catalog,
        product,
        &["sku", "provider.{id|name}"],
        FieldOptions::default(),
    )
    .unwrap();

    // Absent provider: the key is simply not produced.
    assert_eq!(
        mask.apply(&json!({ "sku": "S1" })),
        json!({ "sku": "S1" }),
    );

    // Null provider stays null rather than turning into an object.
    assert_eq!(
        mask.apply(&json!({ "sku": "S1", "provider": null })),
        json!({ "sku": "S1", "provider": null }),
    );
}
