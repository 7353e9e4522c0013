//! Record types loaded from a catalog document
//!
//! A catalog describes record types in YAML or JSON, for use where the Rust
//! types are not at hand (the command-line tool). Fields keep their document
//! order; record references are resolved by name, so self-referential and
//! mutually recursive types are allowed.
//!
//! ```yaml
//! records:
//!   Article:
//!     - { ident: title, tag: "title,text", type: string }
//!     - { ident: tags, tag: tags, type: { list: string } }
//!     - { ident: author, tag: author, type: { record: Person } }
//!   Person:
//!     - { ident: name, tag: "name,keyword", type: string }
//! rules:
//!   - { kind: text, sub_fields: { raw: { type: keyword, ignore_above: 256 } } }
//! ```

use crate::error::{Error, Result};
use crate::rules::RuleSet;
use crate::shape::{FieldDef, RecordSource, RecordType, Shape};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Raw catalog document.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogDocument {
    pub records: BTreeMap<String, Vec<FieldSpec>>,

    #[serde(default)]
    pub rules: RuleSet,
}

/// One field of a catalog record.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSpec {
    pub ident: String,

    #[serde(default)]
    pub tag: Option<String>,

    #[serde(rename = "type")]
    pub ty: TypeSpec,
}

/// Field type as written in a catalog.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TypeSpec {
    /// Scalar name: `bool`, `i32`, `u64`, `f64`, `string`, `any`, ...
    Scalar(String),
    Composite(Composite),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Composite {
    List(Box<TypeSpec>),
    Array(ArraySpec),
    /// Map with string keys
    Map(Box<TypeSpec>),
    Optional(Box<TypeSpec>),
    Record(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArraySpec {
    pub of: Box<TypeSpec>,
    pub len: usize,
}

fn scalar_shape(name: &str) -> Option<Shape> {
    let shape = match name {
        "bool" | "boolean" => Shape::Bool,
        "i8" => Shape::Int(8),
        "i16" => Shape::Int(16),
        "i32" => Shape::Int(32),
        "i64" | "int" => Shape::Int(64),
        "i128" => Shape::Int(128),
        "u8" => Shape::Uint(8),
        "u16" => Shape::Uint(16),
        "u32" => Shape::Uint(32),
        "u64" | "uint" => Shape::Uint(64),
        "u128" => Shape::Uint(128),
        "f32" => Shape::Float(32),
        "f64" | "float" => Shape::Float(64),
        "complex" => Shape::Complex,
        "string" | "str" | "char" => Shape::Str,
        "any" => Shape::Interface,
        "channel" | "function" | "unsupported" => Shape::Unsupported(name.to_string()),
        _ => return None,
    };
    Some(shape)
}

struct CatalogInner {
    records: BTreeMap<String, Vec<FieldSpec>>,
}

/// Shape for a catalog type; record references share the catalog handle.
fn to_shape(catalog: &Arc<CatalogInner>, ty: &TypeSpec) -> Shape {
    match ty {
        // names are checked when the catalog is loaded
        TypeSpec::Scalar(name) => {
            scalar_shape(name).unwrap_or_else(|| Shape::Unsupported(name.clone()))
        }
        TypeSpec::Composite(Composite::List(elem)) => Shape::slice(to_shape(catalog, elem)),
        TypeSpec::Composite(Composite::Array(spec)) => {
            Shape::array(to_shape(catalog, &spec.of), spec.len)
        }
        TypeSpec::Composite(Composite::Map(value)) => {
            Shape::map(Shape::Str, to_shape(catalog, value))
        }
        TypeSpec::Composite(Composite::Optional(inner)) => {
            Shape::pointer(to_shape(catalog, inner))
        }
        TypeSpec::Composite(Composite::Record(name)) => {
            Shape::Record(RecordType::from_source(CatalogRecord {
                catalog: Arc::clone(catalog),
                name: name.clone(),
            }))
        }
    }
}

impl CatalogInner {
    fn check(&self, record: &str, field: &str, ty: &TypeSpec) -> Result<()> {
        match ty {
            TypeSpec::Scalar(name) => {
                if scalar_shape(name).is_none() {
                    return Err(Error::Catalog(format!(
                        "{record}.{field}: unknown type '{name}'"
                    )));
                }
            }
            TypeSpec::Composite(Composite::List(inner))
            | TypeSpec::Composite(Composite::Map(inner))
            | TypeSpec::Composite(Composite::Optional(inner)) => {
                self.check(record, field, inner)?;
            }
            TypeSpec::Composite(Composite::Array(spec)) => {
                self.check(record, field, &spec.of)?;
            }
            TypeSpec::Composite(Composite::Record(name)) => {
                if !self.records.contains_key(name) {
                    return Err(Error::UnknownRecord(format!("{name} (referenced by {record}.{field})")));
                }
            }
        }
        Ok(())
    }
}

/// A record type backed by a catalog entry.
struct CatalogRecord {
    catalog: Arc<CatalogInner>,
    name: String,
}

impl RecordSource for CatalogRecord {
    fn name(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> Vec<FieldDef> {
        self.catalog
            .records
            .get(&self.name)
            .map(|fields| {
                fields
                    .iter()
                    .map(|spec| FieldDef {
                        ident: spec.ident.clone(),
                        tag: spec.tag.clone(),
                        shape: to_shape(&self.catalog, &spec.ty),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Validated set of record types plus the customization rules shipped with them.
#[derive(Clone)]
pub struct Catalog {
    inner: Arc<CatalogInner>,
    rules: RuleSet,
}

impl Catalog {
    /// Load a catalog file: JSON when the extension is `.json`, YAML otherwise.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        if path.extension().is_some_and(|e| e == "json") {
            Self::from_json(&text)
        } else {
            Self::from_yaml(&text)
        }
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        Self::from_document(serde_yaml::from_str(text)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Self::from_document(serde_json::from_str(text)?)
    }

    /// Validate a parsed document: every type name must be known and every
    /// record reference must point at a record of the catalog.
    pub fn from_document(doc: CatalogDocument) -> Result<Self> {
        let inner = CatalogInner {
            records: doc.records,
        };

        for (record, fields) in &inner.records {
            for field in fields {
                inner.check(record, &field.ident, &field.ty)?;
            }
        }
        doc.rules.validate()?;

        debug!(
            records = inner.records.len(),
            rules = doc.rules.len(),
            "catalog loaded"
        );

        Ok(Self {
            inner: Arc::new(inner),
            rules: doc.rules,
        })
    }

    /// Record names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.inner.records.keys().map(String::as_str).collect()
    }

    /// Shape of the named record type.
    pub fn shape(&self, name: &str) -> Result<Shape> {
        if !self.inner.records.contains_key(name) {
            return Err(Error::UnknownRecord(name.to_string()));
        }
        Ok(to_shape(
            &self.inner,
            &TypeSpec::Composite(Composite::Record(name.to_string())),
        ))
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}
