//! Field-type kinds recognised by the mapping builder
//!
//! Every kind has one canonical lowercase snake_case name, the same string an
//! annotation uses to pick it explicitly. Lookup never fails: an unknown name
//! decodes to [`FieldKind::Invalid`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Category of a mapped field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum FieldKind {
    /// Reserved sentinel: "no usable kind"
    Invalid = 0,
    Text,
    Keyword,
    ConstantKeyword,
    Wildcard,
    MatchOnlyText,
    SearchAsYouType,
    Completion,
    Long,
    Integer,
    Short,
    Byte,
    Double,
    Float,
    HalfFloat,
    ScaledFloat,
    UnsignedLong,
    Boolean,
    Date,
    DateNanos,
    Binary,
    Ip,
    Version,
    IntegerRange,
    LongRange,
    FloatRange,
    DoubleRange,
    DateRange,
    IpRange,
    Object,
    Nested,
    Flattened,
    GeoPoint,
    GeoShape,
    Point,
    Shape,
    TokenCount,
    Percolator,
    Join,
    Alias,
    RankFeature,
    RankFeatures,
    DenseVector,
    SparseVector,
    Histogram,
}

/// Every valid kind with its canonical name, in discriminant order.
const KINDS: &[(FieldKind, &str)] = &[
    (FieldKind::Text, "text"),
    (FieldKind::Keyword, "keyword"),
    (FieldKind::ConstantKeyword, "constant_keyword"),
    (FieldKind::Wildcard, "wildcard"),
    (FieldKind::MatchOnlyText, "match_only_text"),
    (FieldKind::SearchAsYouType, "search_as_you_type"),
    (FieldKind::Completion, "completion"),
    (FieldKind::Long, "long"),
    (FieldKind::Integer, "integer"),
    (FieldKind::Short, "short"),
    (FieldKind::Byte, "byte"),
    (FieldKind::Double, "double"),
    (FieldKind::Float, "float"),
    (FieldKind::HalfFloat, "half_float"),
    (FieldKind::ScaledFloat, "scaled_float"),
    (FieldKind::UnsignedLong, "unsigned_long"),
    (FieldKind::Boolean, "boolean"),
    (FieldKind::Date, "date"),
    (FieldKind::DateNanos, "date_nanos"),
    (FieldKind::Binary, "binary"),
    (FieldKind::Ip, "ip"),
    (FieldKind::Version, "version"),
    (FieldKind::IntegerRange, "integer_range"),
    (FieldKind::LongRange, "long_range"),
    (FieldKind::FloatRange, "float_range"),
    (FieldKind::DoubleRange, "double_range"),
    (FieldKind::DateRange, "date_range"),
    (FieldKind::IpRange, "ip_range"),
    (FieldKind::Object, "object"),
    (FieldKind::Nested, "nested"),
    (FieldKind::Flattened, "flattened"),
    (FieldKind::GeoPoint, "geo_point"),
    (FieldKind::GeoShape, "geo_shape"),
    (FieldKind::Point, "point"),
    (FieldKind::Shape, "shape"),
    (FieldKind::TokenCount, "token_count"),
    (FieldKind::Percolator, "percolator"),
    (FieldKind::Join, "join"),
    (FieldKind::Alias, "alias"),
    (FieldKind::RankFeature, "rank_feature"),
    (FieldKind::RankFeatures, "rank_features"),
    (FieldKind::DenseVector, "dense_vector"),
    (FieldKind::SparseVector, "sparse_vector"),
    (FieldKind::Histogram, "histogram"),
];

fn name_table() -> &'static HashMap<&'static str, FieldKind> {
    static TABLE: OnceLock<HashMap<&'static str, FieldKind>> = OnceLock::new();
    TABLE.get_or_init(|| KINDS.iter().map(|&(kind, name)| (name, kind)).collect())
}

impl FieldKind {
    /// Look up a kind by canonical name. Unknown names yield [`FieldKind::Invalid`].
    pub fn decode(name: &str) -> Self {
        name_table().get(name).copied().unwrap_or(Self::Invalid)
    }

    /// Canonical name of this kind.
    pub fn name(self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            // KINDS is indexed by discriminant - 1
            kind => KINDS[kind as usize - 1].1,
        }
    }

    /// Kind for a raw discriminant, if it is in range.
    pub fn from_index(index: u16) -> Option<Self> {
        if index == 0 {
            return Some(Self::Invalid);
        }
        KINDS.get(usize::from(index) - 1).map(|&(kind, _)| kind)
    }

    pub fn is_valid(self) -> bool {
        self != Self::Invalid
    }

    /// Kinds that carry nested `properties`.
    pub fn is_aggregate(self) -> bool {
        matches!(self, Self::Object | Self::Nested)
    }

    /// All valid kinds, in declaration order.
    pub fn all() -> impl Iterator<Item = FieldKind> {
        KINDS.iter().map(|&(kind, _)| kind)
    }
}

/// Display label for a raw discriminant.
///
/// Out-of-range values get a synthetic `FieldKind(<n>)` label instead of failing.
pub fn kind_label(index: u16) -> Cow<'static, str> {
    match FieldKind::from_index(index) {
        Some(kind) => Cow::Borrowed(kind.name()),
        None => Cow::Owned(format!("FieldKind({index})")),
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::decode(s))
    }
}

impl Serialize for FieldKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for FieldKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::decode(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for &(kind, name) in KINDS {
            assert_eq!(FieldKind::decode(name), kind);
            assert_eq!(FieldKind::decode(name).name(), name);
        }
    }

    #[test]
    fn test_table_matches_discriminants() {
        for (i, &(kind, _)) in KINDS.iter().enumerate() {
            assert_eq!(kind as usize, i + 1);
            assert_eq!(FieldKind::from_index(kind as u16), Some(kind));
        }
    }

    #[test]
    fn test_unknown_names_decode_to_invalid() {
        for name in ["", "txt", "Text", " text", "invalid", "nested,", "geo-point"] {
            assert_eq!(FieldKind::decode(name), FieldKind::Invalid);
        }
    }

    #[test]
    fn test_kind_label_is_total() {
        assert_eq!(kind_label(FieldKind::GeoPoint as u16), "geo_point");
        assert_eq!(kind_label(0), "invalid");
        assert_eq!(kind_label(999), "FieldKind(999)");
        assert_eq!(FieldKind::from_index(999), None);
    }

    #[test]
    fn test_serde_uses_canonical_name() {
        let json = serde_json::to_string(&FieldKind::DateNanos).unwrap();
        assert_eq!(json, "\"date_nanos\"");
        let kind: FieldKind = serde_json::from_str("\"geo_shape\"").unwrap();
        assert_eq!(kind, FieldKind::GeoShape);
        let kind: FieldKind = serde_json::from_str("\"bogus\"").unwrap();
        assert_eq!(kind, FieldKind::Invalid);
    }

    #[test]
    fn test_parse_and_display() {
        let kind: FieldKind = "keyword".parse().unwrap();
        assert_eq!(kind, FieldKind::Keyword);
        assert_eq!(kind.to_string(), "keyword");
        assert!(FieldKind::Nested.is_aggregate());
        assert!(!FieldKind::Flattened.is_aggregate());
        assert_eq!(FieldKind::all().count(), KINDS.len());
    }
}
