//! Customization hooks applied to every produced field mapping

use crate::kind::FieldKind;
use crate::mapping::FieldType;

/// Rewrites a field mapping before it is added to the output.
///
/// Called once per emitted field, after its properties have been built, with
/// the target name, the depth of the record level the field belongs to and
/// the resolved kind. The returned mapping is used as-is.
pub trait Customize {
    fn customize(&self, name: &str, depth: usize, kind: FieldKind, field: FieldType) -> FieldType;

    /// Run `next` on the output of this hook.
    fn then<B: Customize>(self, next: B) -> Chain<Self, B>
    where
        Self: Sized,
    {
        Chain(self, next)
    }
}

/// Identity hook.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Customize for Passthrough {
    fn customize(&self, _name: &str, _depth: usize, _kind: FieldKind, field: FieldType) -> FieldType {
        field
    }
}

impl<F> Customize for F
where
    F: Fn(&str, usize, FieldKind, FieldType) -> FieldType,
{
    fn customize(&self, name: &str, depth: usize, kind: FieldKind, field: FieldType) -> FieldType {
        self(name, depth, kind, field)
    }
}

/// Two hooks applied in sequence.
#[derive(Debug, Clone)]
pub struct Chain<A, B>(A, B);

impl<A: Customize, B: Customize> Customize for Chain<A, B> {
    fn customize(&self, name: &str, depth: usize, kind: FieldKind, field: FieldType) -> FieldType {
        let field = self.0.customize(name, depth, kind, field);
        self.1.customize(name, depth, kind, field)
    }
}
