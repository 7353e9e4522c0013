//! fieldmap: derive search-index field mappings from record types
//!
//! Each annotated field of a record type becomes a mapped field: the kind is
//! taken from the annotation (`"name,kind"`) or inferred from the field's
//! shape, object and nested fields recurse into their record type up to a
//! depth limit, and a caller-supplied hook can rewrite every mapping before it
//! is emitted.
//!
//! ```
//! use fieldmap::{Describe, FieldDef, FieldKind, FieldType, RecordType, SchemaBuilder, Shape};
//!
//! struct Comment;
//! struct Post;
//!
//! impl Describe for Comment {
//!     fn shape() -> Shape {
//!         Shape::Record(RecordType::new_static("Comment", || {
//!             vec![FieldDef::of::<String>("body").tag("body")]
//!         }))
//!     }
//! }
//!
//! impl Describe for Post {
//!     fn shape() -> Shape {
//!         Shape::Record(RecordType::new_static("Post", || {
//!             vec![
//!                 FieldDef::of::<String>("title").tag("title,text"),
//!                 FieldDef::of::<String>("slug").tag("slug,keyword"),
//!                 FieldDef::of::<u32>("likes").tag("likes"),
//!                 FieldDef::of::<Vec<Comment>>("comments").tag("comments,nested"),
//!                 FieldDef::of::<String>("secret").tag("-"),
//!             ]
//!         }))
//!     }
//! }
//!
//! let raw = |_: &str, _: usize, kind: FieldKind, field: FieldType| match kind {
//!     FieldKind::Text => field.with_sub_field("raw", FieldType::new(FieldKind::Keyword)),
//!     _ => field,
//! };
//!
//! let properties = SchemaBuilder::new(3).with_hook(raw).build_for::<Post>().unwrap();
//! assert_eq!(properties.names(), vec!["title", "slug", "likes", "comments"]);
//! assert_eq!(properties.get("likes").unwrap().kind, FieldKind::Integer);
//! assert_eq!(properties.get("comments").unwrap().properties.len(), 1);
//! ```

pub mod annotation;
pub mod builder;
pub mod catalog;
pub mod error;
pub mod hook;
pub mod kind;
pub mod mapping;
pub mod resolve;
pub mod rules;
pub mod shape;

pub use annotation::Annotation;
pub use builder::{build, SchemaBuilder};
pub use catalog::Catalog;
pub use error::{Error, Result};
pub use hook::{Customize, Passthrough};
pub use kind::{kind_label, FieldKind};
pub use mapping::{FieldType, Mapping, Properties, SchemaField};
pub use resolve::resolve_from_shape;
pub use rules::{Rule, RuleSet};
pub use shape::{Describe, FieldDef, RecordSource, RecordType, Shape};
