//! Mapping construction from record shapes
//!
//! Walks a record type's fields in declaration order, decodes or infers each
//! field's kind, builds its default mapping (recursing into object and nested
//! fields while the depth limit allows) and passes it through the
//! customization hook.

use crate::annotation::Annotation;
use crate::error::{Error, Result};
use crate::hook::{Customize, Passthrough};
use crate::kind::FieldKind;
use crate::mapping::{FieldType, Mapping, Properties};
use crate::resolve::resolve_from_shape;
use crate::shape::{Describe, FieldDef, RecordType, Shape};
use tracing::{debug, trace};

/// Build the mapping for a record (or list of records) shape.
///
/// Fields of a record at depth `d` that are objects or nested get their own
/// properties only when `d + 1 < depth_limit`; past that point they are
/// emitted without properties.
pub fn build(input: &Shape, depth_limit: usize, hook: &dyn Customize) -> Result<Properties> {
    let record = input.collection_record().ok_or_else(|| Error::InputShape {
        shape: input.label(),
    })?;

    Walker { depth_limit, hook }.walk(record, 0)
}

/// Configured mapping builder.
#[derive(Debug, Clone)]
pub struct SchemaBuilder<H = Passthrough> {
    depth_limit: usize,
    hook: H,
}

impl SchemaBuilder<Passthrough> {
    pub fn new(depth_limit: usize) -> Self {
        Self {
            depth_limit,
            hook: Passthrough,
        }
    }
}

impl<H: Customize> SchemaBuilder<H> {
    /// Replace the customization hook.
    pub fn with_hook<H2: Customize>(self, hook: H2) -> SchemaBuilder<H2> {
        SchemaBuilder {
            depth_limit: self.depth_limit,
            hook,
        }
    }

    pub fn build(&self, input: &Shape) -> Result<Properties> {
        build(input, self.depth_limit, &self.hook)
    }

    pub fn build_for<T: Describe + ?Sized>(&self) -> Result<Properties> {
        self.build(&T::shape())
    }

    /// Build and wrap in a full mapping document.
    pub fn build_mapping(&self, input: &Shape) -> Result<Mapping> {
        self.build(input).map(Mapping::new)
    }
}

struct Walker<'a> {
    depth_limit: usize,
    hook: &'a dyn Customize,
}

impl Walker<'_> {
    fn walk(&self, record: &RecordType, depth: usize) -> Result<Properties> {
        debug!(record = record.name(), depth, "mapping record");

        let mut properties = Properties::new();
        for field in record.fields() {
            if let Some((name, field_type)) = self.map_field(&field, depth)? {
                properties.push(name, field_type);
            }
        }

        Ok(properties)
    }

    /// Mapping for one field, or `None` when the field is left out.
    fn map_field(&self, field: &FieldDef, depth: usize) -> Result<Option<(String, FieldType)>> {
        let Some(annotation) = field.tag.as_deref().and_then(Annotation::parse) else {
            trace!(field = %field.ident, "not annotated or excluded");
            return Ok(None);
        };

        let name = annotation.target_name(&field.ident).to_string();

        let kind = match annotation.kind.as_deref() {
            Some(kind_name) => FieldKind::decode(kind_name),
            None => match resolve_from_shape(&field.shape) {
                Some(kind) => kind,
                None => {
                    debug!(field = %field.ident, shape = %field.shape, "no kind for shape, skipping");
                    return Ok(None);
                }
            },
        };

        if !kind.is_valid() {
            debug!(field = %field.ident, tag = ?field.tag, "invalid kind, skipping");
            return Ok(None);
        }

        let mut field_type = FieldType::default_for(kind).ok_or_else(|| Error::UnrecognizedKind {
            field: name.clone(),
            kind,
        })?;

        if kind.is_aggregate() {
            if depth + 1 < self.depth_limit {
                if let Some(inner) = field.shape.nested_record() {
                    field_type.properties = self.walk(inner, depth + 1)?;
                }
            } else {
                trace!(field = %name, depth, "depth limit reached");
            }
        }

        trace!(field = %name, %kind, depth, "mapped");
        let field_type = self.hook.customize(&name, depth, kind, field_type);

        Ok(Some((name, field_type)))
    }
}
