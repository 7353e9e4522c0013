//! Per-field mapping annotations
//!
//! An annotation is the tag string attached to a field: `name` or
//! `name,kind`. A lone `-` excludes the field.

/// Marker that excludes a field from the mapping
pub const EXCLUDE: &str = "-";

/// Parsed annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Name of the field in the mapping; the source identifier when `None`
    pub name: Option<String>,
    /// Explicit kind name; inferred from the shape when `None`
    pub kind: Option<String>,
}

impl Annotation {
    /// Parse an annotation. Returns `None` for the exclusion marker and for a
    /// blank tag, which counts as no annotation at all.
    ///
    /// Components are trimmed and anything after the second comma is ignored.
    pub fn parse(tag: &str) -> Option<Self> {
        let trimmed = tag.trim();
        if trimmed.is_empty() || trimmed == EXCLUDE {
            return None;
        }

        let mut parts = tag.split(',').map(str::trim);
        let name = parts.next().filter(|s| !s.is_empty()).map(ToString::to_string);
        let kind = parts.next().filter(|s| !s.is_empty()).map(ToString::to_string);

        Some(Self { name, kind })
    }

    /// Target name, falling back to the source identifier.
    pub fn target_name<'a>(&'a self, ident: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(ident)
    }
}
