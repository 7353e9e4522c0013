//! Kind inference for fields annotated without an explicit kind

use crate::kind::FieldKind;
use crate::shape::Shape;
use tracing::trace;

/// Best-guess kind for a field's declared shape.
///
/// Indirections are unwrapped first. Dynamically typed and unsupported shapes
/// resolve to `None`: such fields are left out of the mapping.
pub fn resolve_from_shape(shape: &Shape) -> Option<FieldKind> {
    let kind = match shape.unwrap_indirection() {
        Shape::Bool => FieldKind::Boolean,
        Shape::Int(_) | Shape::Uint(_) => FieldKind::Integer,
        Shape::Float(_) | Shape::Complex => FieldKind::Float,
        Shape::Str => FieldKind::Text,
        Shape::Slice(elem) if matches!(elem.unwrap_indirection(), Shape::Record(_)) => {
            trace!(elem = %elem, "list of records flagged as nested");
            FieldKind::Nested
        }
        Shape::Array { .. } | Shape::Slice(_) => FieldKind::Nested,
        Shape::Map { .. } | Shape::Record(_) => FieldKind::Object,
        Shape::Pointer(_) | Shape::Interface | Shape::Unsupported(_) => return None,
    };
    Some(kind)
}
