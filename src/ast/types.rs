//! Type AST nodes (`spec.md` §3 "Type" family).

use crate::position::Range;

/// A type annotation: an optional leading `@` resource marker plus the
/// underlying [`Type`]. `spec.md` §3: "Reference (auth? &T)" and the
/// `@` resource marker are both surface syntax that decorate a `Type`;
/// `is_resource` captures the `@` (only legal at the start of a type
/// annotation, per `spec.md` §4.3).
#[derive(Debug, Clone)]
pub struct TypeAnnotation {
    pub is_resource: bool,
    pub ty: Type,
    pub range: Range,
}

impl TypeAnnotation {
    pub fn new(is_resource: bool, ty: Type, range: Range) -> Self {
        TypeAnnotation { is_resource, ty, range }
    }

    /// A zero-width placeholder used when a function declaration omits
    /// its return type (`spec.md` §4.7): "synthesize an empty nominal-type
    /// placeholder positioned at the end of the parameter list, with
    /// `is_resource=false`."
    pub fn empty_at(range: Range) -> Self {
        TypeAnnotation {
            is_resource: false,
            ty: Type::Nominal {
                identifiers: Vec::new(),
                range,
            },
            range,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Type {
    /// A type referenced by name, possibly with `.`-separated nested
    /// identifiers (`Foo.Bar.Baz`).
    Nominal { identifiers: Vec<String>, range: Range },
    /// `[T]`
    VariableSized { element: Box<Type>, range: Range },
    /// `[T; N]`
    ConstantSized {
        element: Box<Type>,
        size: num_bigint::BigInt,
        range: Range,
    },
    /// `{K: V}`
    Dictionary {
        key: Box<Type>,
        value: Box<Type>,
        range: Range,
    },
    /// `T?`
    Optional { inner: Box<Type>, range: Range },
    /// `auth? &T`
    Reference {
        auth: bool,
        inner: Box<Type>,
        range: Range,
    },
    /// `T{U, V, ...}` or a bare `{U, V, ...}` (no restricted base type).
    Restricted {
        restricted: Option<Box<Type>>,
        restrictions: Vec<Type>,
        range: Range,
    },
    /// `((A, B) -> C)`-shaped function type.
    Function {
        parameter_types: Vec<TypeAnnotation>,
        return_type: Box<TypeAnnotation>,
        range: Range,
    },
    /// `T<A, B, ...>`
    Instantiation {
        base: Box<Type>,
        type_arguments: Vec<Type>,
        range: Range,
    },
}

impl Type {
    pub fn range(&self) -> Range {
        match self {
            Type::Nominal { range, .. }
            | Type::VariableSized { range, .. }
            | Type::ConstantSized { range, .. }
            | Type::Dictionary { range, .. }
            | Type::Optional { range, .. }
            | Type::Reference { range, .. }
            | Type::Restricted { range, .. }
            | Type::Function { range, .. }
            | Type::Instantiation { range, .. } => *range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    #[test]
    fn empty_type_annotation_is_not_a_resource() {
        let range = Range::empty_at(Position::new(4, 1, 4));
        let annotation = TypeAnnotation::empty_at(range);
        assert!(!annotation.is_resource);
        match annotation.ty {
            Type::Nominal { identifiers, .. } => assert!(identifiers.is_empty()),
            _ => panic!("expected nominal placeholder"),
        }
    }
}
