//! Type resolver: declared type → closed category set.

use crate::ast::Accessor;
use crate::config::RuntimeSymbols;
use crate::model::TypeRef;

/// Closed set of categories a property type can fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCategory {
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Char,
    Float,
    Double,
    Str,
    Serializable,
    Parcelable,
    Provider,
    Object,
}

impl TypeCategory {
    pub fn is_primitive(self) -> bool {
        self.primitive_accessor().is_some()
    }

    /// Typed bundle accessor for the eight primitive categories.
    pub fn primitive_accessor(self) -> Option<Accessor> {
        match self {
            TypeCategory::Bool => Some(Accessor::Boolean),
            TypeCategory::Byte => Some(Accessor::Byte),
            TypeCategory::Short => Some(Accessor::Short),
            TypeCategory::Int => Some(Accessor::Int),
            TypeCategory::Long => Some(Accessor::Long),
            TypeCategory::Char => Some(Accessor::Char),
            TypeCategory::Float => Some(Accessor::Float),
            TypeCategory::Double => Some(Accessor::Double),
            _ => None,
        }
    }
}

const PRIMITIVES: &[(&str, TypeCategory)] = &[
    ("kotlin.Boolean", TypeCategory::Bool),
    ("kotlin.Byte", TypeCategory::Byte),
    ("kotlin.Short", TypeCategory::Short),
    ("kotlin.Int", TypeCategory::Int),
    ("kotlin.Long", TypeCategory::Long),
    ("kotlin.Char", TypeCategory::Char),
    ("kotlin.Float", TypeCategory::Float),
    ("kotlin.Double", TypeCategory::Double),
    ("java.lang.Boolean", TypeCategory::Bool),
    ("java.lang.Byte", TypeCategory::Byte),
    ("java.lang.Short", TypeCategory::Short),
    ("java.lang.Integer", TypeCategory::Int),
    ("java.lang.Long", TypeCategory::Long),
    ("java.lang.Character", TypeCategory::Char),
    ("java.lang.Float", TypeCategory::Float),
    ("java.lang.Double", TypeCategory::Double),
];

const STRINGS: &[&str] = &["kotlin.String", "java.lang.String"];

/// Maps declared types to categories. First match wins:
/// provider > primitive > string > serializable > parcelable > object.
#[derive(Debug, Clone)]
pub struct TypeResolver {
    provider_capability: String,
    serializable: String,
    parcelable: String,
}

impl TypeResolver {
    pub fn new(symbols: &RuntimeSymbols) -> Self {
        Self {
            provider_capability: symbols.provider_capability.clone(),
            serializable: symbols.serializable.clone(),
            parcelable: symbols.parcelable.clone(),
        }
    }

    pub fn resolve(&self, ty: &TypeRef) -> TypeCategory {
        if ty.is_subtype_of(&self.provider_capability) {
            return TypeCategory::Provider;
        }
        if let Some((_, category)) = PRIMITIVES.iter().find(|(name, _)| *name == ty.qualified_name) {
            return *category;
        }
        if STRINGS.contains(&ty.qualified_name.as_str()) {
            return TypeCategory::Str;
        }
        if ty.is_subtype_of(&self.serializable) {
            return TypeCategory::Serializable;
        }
        if ty.is_subtype_of(&self.parcelable) {
            return TypeCategory::Parcelable;
        }
        TypeCategory::Object
    }
}

impl Default for TypeResolver {
    fn default() -> Self {
        Self::new(&RuntimeSymbols::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROVIDER: &str = "com.alibaba.android.arouter.facade.template.IProvider";

    #[test]
    fn test_primitives_and_boxed() {
        let resolver = TypeResolver::default();
        assert_eq!(resolver.resolve(&TypeRef::new("kotlin.Int")), TypeCategory::Int);
        assert_eq!(resolver.resolve(&TypeRef::new("kotlin.Boolean").nullable()), TypeCategory::Bool);
        assert_eq!(resolver.resolve(&TypeRef::new("java.lang.Integer")), TypeCategory::Int);
        assert_eq!(resolver.resolve(&TypeRef::new("kotlin.Char")), TypeCategory::Char);
        assert!(TypeCategory::Double.is_primitive());
        assert!(!TypeCategory::Str.is_primitive());
    }

    #[test]
    fn test_provider_takes_priority() {
        let resolver = TypeResolver::default();
        // A provider that is also serializable and parcelable is still a provider.
        let ty = TypeRef::new("com.example.HelloService")
            .with_supertype("java.io.Serializable")
            .with_supertype("android.os.Parcelable")
            .with_supertype(PROVIDER);
        assert_eq!(resolver.resolve(&ty), TypeCategory::Provider);
        assert_eq!(resolver.resolve(&TypeRef::new(PROVIDER)), TypeCategory::Provider);
    }

    #[test]
    fn test_serializable_before_parcelable() {
        let resolver = TypeResolver::default();
        let both = TypeRef::new("com.example.Card")
            .with_supertype("android.os.Parcelable")
            .with_supertype("java.io.Serializable");
        assert_eq!(resolver.resolve(&both), TypeCategory::Serializable);

        let parcel = TypeRef::new("com.example.Card").with_supertype("android.os.Parcelable");
        assert_eq!(resolver.resolve(&parcel), TypeCategory::Parcelable);
    }

    #[test]
    fn test_strings_and_objects() {
        let resolver = TypeResolver::default();
        assert_eq!(resolver.resolve(&TypeRef::new("kotlin.String")), TypeCategory::Str);
        let list = TypeRef::new("kotlin.collections.List").with_argument(TypeRef::new("com.example.User"));
        assert_eq!(resolver.resolve(&list), TypeCategory::Object);
    }
}
