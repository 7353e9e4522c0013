//! Structural description of record types
//!
//! A [`Shape`] says how a field is represented (a scalar, an aggregate, a
//! record, an indirection) without carrying any value. Record types list their
//! fields through a [`RecordSource`]: either a static descriptor function
//! written next to the Rust type, or a type loaded from a catalog document.
//!
//! ```
//! use fieldmap::shape::{Describe, FieldDef, RecordType, Shape};
//!
//! struct Author {
//!     name: String,
//!     age: u8,
//! }
//!
//! impl Describe for Author {
//!     fn shape() -> Shape {
//!         Shape::Record(RecordType::new_static("Author", || {
//!             vec![
//!                 FieldDef::of::<String>("name").tag("name,keyword"),
//!                 FieldDef::of::<u8>("age").tag("age"),
//!             ]
//!         }))
//!     }
//! }
//!
//! assert_eq!(Shape::of::<Vec<Author>>().label(), "list<Author>");
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Declared representation of a field.
#[derive(Debug, Clone)]
pub enum Shape {
    Bool,
    /// Signed integer of the given bit width
    Int(u16),
    /// Unsigned integer of the given bit width
    Uint(u16),
    /// Floating point number of the given bit width
    Float(u16),
    Complex,
    /// Character sequence
    Str,
    /// Fixed-size aggregate
    Array { elem: Box<Shape>, len: usize },
    /// Variable-size aggregate
    Slice(Box<Shape>),
    /// Keyed aggregate
    Map { key: Box<Shape>, value: Box<Shape> },
    Record(RecordType),
    /// Pointer, reference, box or optional value
    Pointer(Box<Shape>),
    /// Dynamically typed value
    Interface,
    /// Channels, functions and other values with no index representation
    Unsupported(String),
}

impl Shape {
    pub fn of<T: Describe + ?Sized>() -> Self {
        T::shape()
    }

    pub fn slice(elem: Shape) -> Self {
        Self::Slice(Box::new(elem))
    }

    pub fn array(elem: Shape, len: usize) -> Self {
        Self::Array {
            elem: Box::new(elem),
            len,
        }
    }

    pub fn map(key: Shape, value: Shape) -> Self {
        Self::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn pointer(inner: Shape) -> Self {
        Self::Pointer(Box::new(inner))
    }

    /// Strip every pointer layer.
    pub fn unwrap_indirection(&self) -> &Shape {
        let mut shape = self;
        while let Self::Pointer(inner) = shape {
            shape = inner;
        }
        shape
    }

    /// Record reached through indirections or through a variable-size aggregate.
    ///
    /// This is what a top-level input has to resolve to.
    pub fn collection_record(&self) -> Option<&RecordType> {
        match self.unwrap_indirection() {
            Self::Record(record) => Some(record),
            Self::Slice(elem) => match elem.unwrap_indirection() {
                Self::Record(record) => Some(record),
                _ => None,
            },
            _ => None,
        }
    }

    /// Record whose fields become the properties of an object or nested field.
    ///
    /// Like [`Shape::collection_record`] but also looks through fixed-size arrays.
    pub fn nested_record(&self) -> Option<&RecordType> {
        match self.unwrap_indirection() {
            Self::Array { elem, .. } => match elem.unwrap_indirection() {
                Self::Record(record) => Some(record),
                _ => None,
            },
            shape => shape.collection_record(),
        }
    }

    /// Short human-readable label, used in errors and logs.
    pub fn label(&self) -> String {
        match self {
            Self::Bool => "bool".to_string(),
            Self::Int(bits) => format!("i{bits}"),
            Self::Uint(bits) => format!("u{bits}"),
            Self::Float(bits) => format!("f{bits}"),
            Self::Complex => "complex".to_string(),
            Self::Str => "string".to_string(),
            Self::Array { elem, len } => format!("[{}; {len}]", elem.label()),
            Self::Slice(elem) => format!("list<{}>", elem.label()),
            Self::Map { key, value } => format!("map<{}, {}>", key.label(), value.label()),
            Self::Record(record) => record.name().to_string(),
            Self::Pointer(inner) => format!("&{}", inner.label()),
            Self::Interface => "any".to_string(),
            Self::Unsupported(what) => what.clone(),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// One field of a record type, in declaration order.
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Identifier of the field in the source type
    pub ident: String,
    /// Raw annotation, e.g. `"title,text"`; `None` means the field is not mapped
    pub tag: Option<String>,
    pub shape: Shape,
}

impl FieldDef {
    pub fn new(ident: impl Into<String>, shape: Shape) -> Self {
        Self {
            ident: ident.into(),
            tag: None,
            shape,
        }
    }

    pub fn of<T: Describe + ?Sized>(ident: impl Into<String>) -> Self {
        Self::new(ident, T::shape())
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

/// Provider of a record type's field list.
pub trait RecordSource: Send + Sync {
    /// Name of the record type
    fn name(&self) -> &str;
    /// Fields in declaration order
    fn fields(&self) -> Vec<FieldDef>;
}

/// Record type described by a plain function, evaluated on demand so that
/// self-referential types can be described.
struct StaticRecord {
    name: &'static str,
    fields: fn() -> Vec<FieldDef>,
}

impl RecordSource for StaticRecord {
    fn name(&self) -> &str {
        self.name
    }

    fn fields(&self) -> Vec<FieldDef> {
        (self.fields)()
    }
}

/// Handle to a record type.
#[derive(Clone)]
pub struct RecordType(Arc<dyn RecordSource>);

impl RecordType {
    pub fn new_static(name: &'static str, fields: fn() -> Vec<FieldDef>) -> Self {
        Self(Arc::new(StaticRecord { name, fields }))
    }

    pub fn from_source(source: impl RecordSource + 'static) -> Self {
        Self(Arc::new(source))
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }

    pub fn fields(&self) -> Vec<FieldDef> {
        self.0.fields()
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecordType").field(&self.name()).finish()
    }
}

/// Types that can report their own [`Shape`].
pub trait Describe {
    fn shape() -> Shape;
}

macro_rules! describe_as {
    ($shape:expr => $($ty:ty),+) => {
        $(
            impl Describe for $ty {
                fn shape() -> Shape {
                    $shape
                }
            }
        )+
    };
}

describe_as!(Shape::Bool => bool);
describe_as!(Shape::Int(8) => i8);
describe_as!(Shape::Int(16) => i16);
describe_as!(Shape::Int(32) => i32);
describe_as!(Shape::Int(64) => i64, isize);
describe_as!(Shape::Int(128) => i128);
describe_as!(Shape::Uint(8) => u8);
describe_as!(Shape::Uint(16) => u16);
describe_as!(Shape::Uint(32) => u32);
describe_as!(Shape::Uint(64) => u64, usize);
describe_as!(Shape::Uint(128) => u128);
describe_as!(Shape::Float(32) => f32);
describe_as!(Shape::Float(64) => f64);
describe_as!(Shape::Str => String, str, char);
describe_as!(Shape::Interface => serde_json::Value);
describe_as!(Shape::Unsupported("()".to_string()) => ());

impl<T: Describe + ?Sized> Describe for &T {
    fn shape() -> Shape {
        Shape::pointer(T::shape())
    }
}

impl<T: Describe + ?Sized> Describe for Box<T> {
    fn shape() -> Shape {
        Shape::pointer(T::shape())
    }
}

impl<T: Describe + ?Sized> Describe for Rc<T> {
    fn shape() -> Shape {
        Shape::pointer(T::shape())
    }
}

impl<T: Describe + ?Sized> Describe for Arc<T> {
    fn shape() -> Shape {
        Shape::pointer(T::shape())
    }
}

impl<T: Describe> Describe for Option<T> {
    fn shape() -> Shape {
        Shape::pointer(T::shape())
    }
}

impl<T: Describe> Describe for [T] {
    fn shape() -> Shape {
        Shape::slice(T::shape())
    }
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn shape() -> Shape {
        Shape::array(T::shape(), N)
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn shape() -> Shape {
        Shape::slice(T::shape())
    }
}

impl<T: Describe> Describe for VecDeque<T> {
    fn shape() -> Shape {
        Shape::slice(T::shape())
    }
}

impl<T: Describe, S> Describe for HashSet<T, S> {
    fn shape() -> Shape {
        Shape::slice(T::shape())
    }
}

impl<T: Describe> Describe for BTreeSet<T> {
    fn shape() -> Shape {
        Shape::slice(T::shape())
    }
}

impl<K: Describe, V: Describe, S> Describe for HashMap<K, V, S> {
    fn shape() -> Shape {
        Shape::map(K::shape(), V::shape())
    }
}

impl<K: Describe, V: Describe> Describe for BTreeMap<K, V> {
    fn shape() -> Shape {
        Shape::map(K::shape(), V::shape())
    }
}

impl<T> Describe for std::sync::mpsc::Sender<T> {
    fn shape() -> Shape {
        Shape::Unsupported("channel".to_string())
    }
}

impl<T> Describe for std::sync::mpsc::Receiver<T> {
    fn shape() -> Shape {
        Shape::Unsupported("channel".to_string())
    }
}
