//! Customization rules read from configuration
//!
//! A [`RuleSet`] is a [`Customize`] hook built from data instead of code. Each
//! rule selects fields by kind, name and depth, and sets mapping parameters on
//! every field it matches. Rules run in document order, so a later rule can
//! override an earlier one.

use crate::error::{Error, Result};
use crate::hook::Customize;
use crate::kind::FieldKind;
use crate::mapping::{FieldType, Properties};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    /// Only fields of this kind
    #[serde(default)]
    pub kind: Option<FieldKind>,

    /// Only fields with this target name
    #[serde(default)]
    pub name: Option<String>,

    /// Only fields at this depth or shallower
    #[serde(default)]
    pub max_depth: Option<usize>,

    #[serde(default)]
    pub analyzer: Option<String>,

    #[serde(default)]
    pub search_analyzer: Option<String>,

    #[serde(default)]
    pub index: Option<bool>,

    #[serde(default)]
    pub doc_values: Option<bool>,

    #[serde(default)]
    pub store: Option<bool>,

    #[serde(default)]
    pub ignore_above: Option<u32>,

    #[serde(default)]
    pub format: Option<String>,

    /// Multi-fields appended to the matched field
    #[serde(default)]
    pub sub_fields: Properties,

    #[serde(default)]
    pub params: BTreeMap<String, serde_json::Value>,
}

impl Rule {
    pub fn matches(&self, name: &str, depth: usize, kind: FieldKind) -> bool {
        self.kind.map_or(true, |k| k == kind)
            && self.name.as_deref().map_or(true, |n| n == name)
            && self.max_depth.map_or(true, |d| depth <= d)
    }

    pub fn apply(&self, mut field: FieldType) -> FieldType {
        if let Some(analyzer) = &self.analyzer {
            field.analyzer = Some(analyzer.clone());
        }
        if let Some(analyzer) = &self.search_analyzer {
            field.search_analyzer = Some(analyzer.clone());
        }
        if let Some(format) = &self.format {
            field.format = Some(format.clone());
        }
        field.index = self.index.or(field.index);
        field.doc_values = self.doc_values.or(field.doc_values);
        field.store = self.store.or(field.store);
        field.ignore_above = self.ignore_above.or(field.ignore_above);

        for sub in &self.sub_fields {
            field = field.with_sub_field(sub.name.clone(), sub.field_type.clone());
        }
        for (key, value) in &self.params {
            field = field.with_param(key.clone(), value.clone());
        }

        field
    }
}

/// Ordered list of rules.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct RuleSet(Vec<Rule>);

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self(rules)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reject rules that name an unknown kind, either as their selector or
    /// anywhere inside their multi-fields.
    pub fn validate(&self) -> Result<()> {
        for (i, rule) in self.0.iter().enumerate() {
            if rule.kind == Some(FieldKind::Invalid) {
                return Err(Error::Catalog(format!(
                    "rule #{} selects an unrecognized kind",
                    i + 1
                )));
            }
            if let Some(path) = first_invalid(&rule.sub_fields) {
                return Err(Error::Catalog(format!(
                    "rule #{}: sub-field '{}' has an unrecognized type",
                    i + 1,
                    path
                )));
            }
        }
        Ok(())
    }
}

/// Dotted path of the first field with an invalid kind, looking through
/// `properties` and `fields` at every level.
fn first_invalid(properties: &Properties) -> Option<String> {
    for field in properties {
        let ty = &field.field_type;
        if ty.kind == FieldKind::Invalid {
            return Some(field.name.clone());
        }
        if let Some(inner) = first_invalid(&ty.properties).or_else(|| first_invalid(&ty.fields)) {
            return Some(format!("{}.{}", field.name, inner));
        }
    }
    None
}

impl Customize for RuleSet {
    fn customize(&self, name: &str, depth: usize, kind: FieldKind, field: FieldType) -> FieldType {
        self.0
            .iter()
            .filter(|rule| rule.matches(name, depth, kind))
            .fold(field, |field, rule| rule.apply(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(yaml: &str) -> RuleSet {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_matching() {
        let rule = Rule {
            kind: Some(FieldKind::Text),
            max_depth: Some(1),
            ..Rule::default()
        };
        assert!(rule.matches("a", 0, FieldKind::Text));
        assert!(rule.matches("b", 1, FieldKind::Text));
        assert!(!rule.matches("a", 2, FieldKind::Text));
        assert!(!rule.matches("a", 0, FieldKind::Keyword));
    }

    #[test]
    fn test_rules_apply_in_order() {
        let set = rules(
            r#"
- kind: text
  analyzer: standard
  sub_fields:
    raw: { type: keyword, ignore_above: 256 }
- name: title
  analyzer: english
  params: { norms: false }
"#,
        );

        let title = set.customize("title", 0, FieldKind::Text, FieldType::new(FieldKind::Text));
        assert_eq!(title.analyzer.as_deref(), Some("english"));
        assert_eq!(
            title.fields.get("raw").and_then(|f| f.ignore_above),
            Some(256)
        );
        assert_eq!(title.params.get("norms"), Some(&serde_json::json!(false)));

        let body = set.customize("body", 0, FieldKind::Text, FieldType::new(FieldKind::Text));
        assert_eq!(body.analyzer.as_deref(), Some("standard"));
        assert!(body.params.is_empty());
    }

    #[test]
    fn test_unmatched_fields_untouched() {
        let set = rules("- { kind: date, format: epoch_millis }");
        let field = FieldType::new(FieldKind::Long);
        assert_eq!(set.customize("ts", 0, FieldKind::Long, field.clone()), field);
    }

    #[test]
    fn test_validate_rejects_unknown_kind() {
        assert!(rules("- { kind: txet, analyzer: english }").validate().is_err());
        assert!(rules("- { kind: text }").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_sub_field_type() {
        let err = rules("- { kind: text, sub_fields: { raw: { type: keywrod } } }")
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("raw"));

        let err = rules(
            "- { kind: object, sub_fields: { meta: { type: object, properties: { id: { type: keyword, fields: { n: { type: lnog } } } } } } }",
        )
        .validate()
        .unwrap_err();
        assert!(err.to_string().contains("meta.id.n"), "{err}");

        assert!(rules("- { kind: text, sub_fields: { raw: { type: keyword } } }")
            .validate()
            .is_ok());
    }
}
