//! Field-type objects and their document form
//!
//! Serializes to the Elasticsearch mapping layout: every field is an object
//! with a `"type"` key, aggregate kinds carry `"properties"` and multi-fields
//! live under `"fields"`.

use crate::kind::FieldKind;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Mapping of a single field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldType {
    #[serde(rename = "type")]
    pub kind: FieldKind,

    /// Child fields of `object` and `nested` kinds
    #[serde(skip_serializing_if = "Properties::is_empty", default)]
    pub properties: Properties,

    /// Multi-fields: the same value indexed a second way
    #[serde(skip_serializing_if = "Properties::is_empty", default)]
    pub fields: Properties,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub analyzer: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub search_analyzer: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub index: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub doc_values: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub store: Option<bool>,

    /// Date format for `date` and `date_nanos`
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub ignore_above: Option<u32>,

    /// Any other mapping parameter, passed through verbatim
    #[serde(flatten)]
    pub params: BTreeMap<String, serde_json::Value>,
}

impl FieldType {
    /// Bare mapping of the given kind, no parameters set.
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            properties: Properties::new(),
            fields: Properties::new(),
            analyzer: None,
            search_analyzer: None,
            index: None,
            doc_values: None,
            store: None,
            format: None,
            ignore_above: None,
            params: BTreeMap::new(),
        }
    }

    /// Default mapping for a kind.
    ///
    /// Returns `None` for the invalid sentinel and for kinds that are not
    /// valid without a mandatory parameter (`alias`, `join`, `scaled_float`,
    /// `dense_vector`).
    pub fn default_for(kind: FieldKind) -> Option<Self> {
        match kind {
            FieldKind::Text
            | FieldKind::Keyword
            | FieldKind::ConstantKeyword
            | FieldKind::Wildcard
            | FieldKind::MatchOnlyText
            | FieldKind::SearchAsYouType
            | FieldKind::Completion
            | FieldKind::Long
            | FieldKind::Integer
            | FieldKind::Short
            | FieldKind::Byte
            | FieldKind::Double
            | FieldKind::Float
            | FieldKind::HalfFloat
            | FieldKind::UnsignedLong
            | FieldKind::Boolean
            | FieldKind::Date
            | FieldKind::DateNanos
            | FieldKind::Binary
            | FieldKind::Ip
            | FieldKind::Version
            | FieldKind::IntegerRange
            | FieldKind::LongRange
            | FieldKind::FloatRange
            | FieldKind::DoubleRange
            | FieldKind::DateRange
            | FieldKind::IpRange
            | FieldKind::Object
            | FieldKind::Nested
            | FieldKind::Flattened
            | FieldKind::GeoPoint
            | FieldKind::GeoShape
            | FieldKind::Point
            | FieldKind::Shape
            | FieldKind::Percolator
            | FieldKind::RankFeature
            | FieldKind::RankFeatures
            | FieldKind::SparseVector
            | FieldKind::Histogram => Some(Self::new(kind)),
            // token_count is invalid without an analyzer
            FieldKind::TokenCount => Some(Self::new(kind).with_analyzer("standard")),
            FieldKind::Alias
            | FieldKind::Join
            | FieldKind::ScaledFloat
            | FieldKind::DenseVector
            | FieldKind::Invalid => None,
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, field: FieldType) -> Self {
        self.properties.push(name, field);
        self
    }

    pub fn with_sub_field(mut self, name: impl Into<String>, field: FieldType) -> Self {
        self.fields.push(name, field);
        self
    }

    pub fn with_analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.analyzer = Some(analyzer.into());
        self
    }

    pub fn with_ignore_above(mut self, limit: u32) -> Self {
        self.ignore_above = Some(limit);
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// A named field of the mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField {
    pub name: String,
    pub field_type: FieldType,
}

/// Ordered list of mapped fields.
///
/// Keeps fields in the order they were produced. When serialized as a map, a
/// later field with the same name replaces the earlier one in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties(Vec<SchemaField>);

impl Properties {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, name: impl Into<String>, field_type: FieldType) {
        self.0.push(SchemaField {
            name: name.into(),
            field_type,
        });
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SchemaField> {
        self.0.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|f| f.name.as_str()).collect()
    }

    /// Field with the given name; the last one wins on duplicates.
    pub fn get(&self, name: &str) -> Option<&FieldType> {
        self.0
            .iter()
            .rev()
            .find(|f| f.name == name)
            .map(|f| &f.field_type)
    }

    /// Keyed view with duplicates collapsed, in first-appearance order.
    pub fn deduplicated(&self) -> Vec<(&str, &FieldType)> {
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut entries: Vec<(&str, &FieldType)> = Vec::with_capacity(self.0.len());

        for field in &self.0 {
            match positions.get(field.name.as_str()) {
                Some(&pos) => entries[pos].1 = &field.field_type,
                None => {
                    positions.insert(field.name.as_str(), entries.len());
                    entries.push((field.name.as_str(), &field.field_type));
                }
            }
        }

        entries
    }
}

impl IntoIterator for Properties {
    type Item = SchemaField;
    type IntoIter = std::vec::IntoIter<SchemaField>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Properties {
    type Item = &'a SchemaField;
    type IntoIter = std::slice::Iter<'a, SchemaField>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<SchemaField> for Properties {
    fn from_iter<I: IntoIterator<Item = SchemaField>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for Properties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = self.deduplicated();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (name, field_type) in entries {
            map.serialize_entry(name, field_type)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Properties {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PropertiesVisitor;

        impl<'de> Visitor<'de> for PropertiesVisitor {
            type Value = Properties;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to field mappings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut properties = Properties::new();
                while let Some((name, field_type)) = access.next_entry::<String, FieldType>()? {
                    properties.push(name, field_type);
                }
                Ok(properties)
            }
        }

        deserializer.deserialize_map(PropertiesVisitor)
    }
}

/// Complete index mapping document: `{"mappings": {"properties": {...}}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Mapping {
    pub properties: Properties,
}

impl Mapping {
    pub fn new(properties: Properties) -> Self {
        Self { properties }
    }
}

impl Serialize for Mapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Inner<'a> {
            properties: &'a Properties,
        }

        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(
            "mappings",
            &Inner {
                properties: &self.properties,
            },
        )?;
        map.end()
    }
}
