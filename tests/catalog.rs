// Integration tests for catalog-described record types and configured rules
use fieldmap::{Catalog, Error, FieldKind, Mapping, Passthrough, SchemaBuilder};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

const SHOP: &str = r#"
records:
  Product:
    - { ident: name, tag: "name,text", type: string }
    - { ident: sku, tag: "sku,keyword", type: string }
    - { ident: price, tag: price, type: f64 }
    - { ident: stock, tag: stock, type: u32 }
    - { ident: cost, tag: "-", type: f64 }
    - { ident: category, tag: category, type: { optional: { record: Category } } }
    - { ident: variants, tag: variants, type: { list: { record: Product } } }
  Category:
    - { ident: title, tag: title, type: string }
    - { ident: parent, tag: parent, type: { optional: { record: Category } } }
rules:
  - kind: text
    analyzer: english
    sub_fields:
      raw: { type: keyword, ignore_above: 256 }
  - { name: sku, doc_values: false }
  - { kind: object, max_depth: 0, params: { dynamic: strict } }
"#;

fn write_catalog(dir: &TempDir, file: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(file);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_yaml_file_and_build() {
    let dir = TempDir::new().unwrap();
    let path = write_catalog(&dir, "shop.yaml", SHOP);
    let catalog = Catalog::load(&path).unwrap();

    let shape = catalog.shape("Product").unwrap();
    let props = SchemaBuilder::new(2).build(&shape).unwrap();

    assert_eq!(
        props.names(),
        vec!["name", "sku", "price", "stock", "category", "variants"]
    );
    assert_eq!(props.get("price").unwrap().kind, FieldKind::Float);
    assert_eq!(props.get("stock").unwrap().kind, FieldKind::Integer);
    assert_eq!(props.get("variants").unwrap().kind, FieldKind::Nested);

    let category = props.get("category").unwrap();
    assert_eq!(category.kind, FieldKind::Object);
    assert_eq!(category.properties.names(), vec!["title", "parent"]);
    // depth limit 2: the parent category is emitted flat
    assert!(category.properties.get("parent").unwrap().properties.is_empty());
}

#[test]
fn test_rules_customize_output() {
    let catalog = Catalog::from_yaml(SHOP).unwrap();
    let shape = catalog.shape("Product").unwrap();
    let props = SchemaBuilder::new(2)
        .with_hook(catalog.rules().clone())
        .build(&shape)
        .unwrap();

    let doc = serde_json::to_value(&props).unwrap();
    assert_eq!(
        doc["name"],
        json!({
            "type": "text",
            "analyzer": "english",
            "fields": { "raw": { "type": "keyword", "ignore_above": 256 } }
        })
    );
    assert_eq!(doc["sku"], json!({ "type": "keyword", "doc_values": false }));
    assert_eq!(doc["category"]["dynamic"], json!("strict"));
    // max_depth 0: nested levels are left alone
    assert_eq!(doc["category"]["properties"]["title"]["analyzer"], json!("english"));
    assert!(doc["variants"]["properties"]["category"].get("dynamic").is_none());
}

#[test]
fn test_json_catalog_by_extension() {
    let dir = TempDir::new().unwrap();
    let path = write_catalog(
        &dir,
        "events.json",
        r#"{
            "records": {
                "Event": [
                    { "ident": "at", "tag": "at,date", "type": "string" },
                    { "ident": "payload", "tag": "payload", "type": "any" },
                    { "ident": "readings", "tag": "readings", "type": { "array": { "of": "f32", "len": 8 } } }
                ]
            }
        }"#,
    );

    let catalog = Catalog::load(&path).unwrap();
    let shape = catalog.shape("Event").unwrap();
    let mapping = SchemaBuilder::new(3).build_mapping(&shape).unwrap();

    assert_eq!(
        serde_json::to_value(&mapping).unwrap(),
        json!({
            "mappings": {
                "properties": {
                    "at": { "type": "date" },
                    "readings": { "type": "nested" }
                }
            }
        })
    );
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = Catalog::load(&dir.path().join("missing.yaml"));
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_unknown_rule_kind_rejected() {
    let doc = "records: {}\nrules:\n  - { kind: keywrod, index: false }\n";
    assert!(matches!(Catalog::from_yaml(doc), Err(Error::Catalog(_))));
}

#[test]
fn test_misspelt_sub_field_kind_rejected() {
    let doc = "records: {}\nrules:\n  - kind: text\n    sub_fields:\n      raw: { type: keywrod }\n";
    assert!(matches!(Catalog::from_yaml(doc), Err(Error::Catalog(_))));

    let deep = "records: {}\nrules:\n  - kind: object\n    sub_fields:\n      meta:\n        type: object\n        properties:\n          id: { type: keyword, fields: { n: { type: lnog } } }\n";
    assert!(matches!(Catalog::from_yaml(deep), Err(Error::Catalog(_))));
}

#[test]
fn test_wrapped_json_keeps_declaration_order() {
    let catalog = Catalog::from_yaml(
        "records:\n  Doc:\n    - { ident: zeta, tag: zeta, type: string }\n    - { ident: alpha, tag: alpha, type: string }\n",
    )
    .unwrap();
    let shape = catalog.shape("Doc").unwrap();
    let mapping = SchemaBuilder::new(3).build_mapping(&shape).unwrap();

    assert_eq!(
        serde_json::to_string(&mapping).unwrap(),
        r#"{"mappings":{"properties":{"zeta":{"type":"text"},"alpha":{"type":"text"}}}}"#
    );
}

#[test]
fn test_self_reference_with_large_limit_terminates() {
    let catalog = Catalog::from_yaml(SHOP).unwrap();
    let shape = catalog.shape("Category").unwrap();
    let props = SchemaBuilder::new(16)
        .with_hook(Passthrough)
        .build(&shape)
        .unwrap();

    let mut depth = 0;
    let mut level = &props;
    while let Some(parent) = level.get("parent") {
        if parent.properties.is_empty() {
            break;
        }
        depth += 1;
        level = &parent.properties;
    }
    assert_eq!(depth, 15);
}

#[test]
fn test_wrapped_yaml_output() {
    let catalog = Catalog::from_yaml(SHOP).unwrap();
    let shape = catalog.shape("Category").unwrap();
    let mapping: Mapping = SchemaBuilder::new(1).build_mapping(&shape).unwrap();

    let yaml = serde_yaml::to_string(&mapping).unwrap();
    let expected = "mappings:\n  properties:\n    title:\n      type: text\n    parent:\n      type: object\n";
    assert_eq!(yaml, expected);
}

#[test]
fn test_demo_catalog_builds() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/blog.yaml");
    let catalog = Catalog::load(&path).unwrap();
    let shape = catalog.shape("Post").unwrap();
    let props = SchemaBuilder::new(3)
        .with_hook(catalog.rules().clone())
        .build(&shape)
        .unwrap();

    assert_eq!(
        props.names(),
        vec!["title", "slug", "published_at", "likes", "author", "comments"]
    );
    assert_eq!(
        props.get("published_at").and_then(|f| f.format.as_deref()),
        Some("strict_date_optional_time")
    );
    let replies = props
        .get("comments")
        .and_then(|c| c.properties.get("replies"))
        .unwrap();
    assert_eq!(replies.properties.names(), vec!["body", "author", "replies"]);
}
