//! Input model: annotated properties as handed over by the discovery source.
//!
//! Everything here is plain data. Symbol resolution (supertypes, nullability,
//! owning class) has already been done by the host compiler; the generator only
//! reads it.

use serde::{Deserialize, Serialize};

/// A declared type, e.g. `kotlin.collections.List<com.example.User?>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef {
    pub qualified_name: String,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<TypeRef>,
    /// Transitive supertypes, by qualified name.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supertypes: Vec<String>,
}

impl TypeRef {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            nullable: false,
            arguments: Vec::new(),
            supertypes: Vec::new(),
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn with_argument(mut self, argument: TypeRef) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn with_supertype(mut self, supertype: impl Into<String>) -> Self {
        self.supertypes.push(supertype.into());
        self
    }

    pub fn simple_name(&self) -> &str {
        simple_name(&self.qualified_name)
    }

    pub fn package(&self) -> &str {
        package_of(&self.qualified_name)
    }

    /// True if this type is `qualified_name` itself or lists it as a supertype.
    pub fn is_subtype_of(&self, qualified_name: &str) -> bool {
        self.qualified_name == qualified_name || self.supertypes.iter().any(|s| s == qualified_name)
    }

    /// The same type with top-level nullability dropped (used for casts and type tokens).
    pub fn non_null(&self) -> TypeRef {
        Self {
            nullable: false,
            ..self.clone()
        }
    }
}

/// Segment after the last `.`
pub fn simple_name(qualified_name: &str) -> &str {
    qualified_name
        .rsplit_once('.')
        .map_or(qualified_name, |(_, name)| name)
}

/// Everything before the last `.`, or `""` for the default package.
pub fn package_of(qualified_name: &str) -> &str {
    qualified_name
        .rsplit_once('.')
        .map_or("", |(package, _)| package)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Internal,
    Private,
}

/// Role of the owning class, derived from its route metadata.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[serde(alias = "activity")]
    Screen,
    #[serde(alias = "fragment")]
    ScreenFragment,
    #[serde(alias = "provider")]
    ServiceConsumer,
    #[default]
    Unknown,
}

impl Role {
    /// Screens and screen fragments own an argument source; nothing else does.
    pub fn has_argument_source(self) -> bool {
        matches!(self, Role::Screen | Role::ScreenFragment)
    }
}

/// The class that declares an annotated property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRef {
    pub qualified_name: String,
    /// Explicit package; needed for nested classes where the last `.` is not the package boundary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(default)]
    pub role: Role,
    /// Source file the class was declared in (provenance for incremental builds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
}

impl ClassRef {
    pub fn new(qualified_name: impl Into<String>, role: Role) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            package: None,
            role,
            source_file: None,
        }
    }

    pub fn with_source_file(mut self, path: impl Into<String>) -> Self {
        self.source_file = Some(path.into());
        self
    }

    pub fn simple_name(&self) -> &str {
        simple_name(&self.qualified_name)
    }

    pub fn package(&self) -> &str {
        self.package
            .as_deref()
            .unwrap_or_else(|| package_of(&self.qualified_name))
    }

    /// The owner as a type reference, for casts in generated code.
    pub fn as_type(&self) -> TypeRef {
        TypeRef::new(self.qualified_name.clone())
    }
}

/// Arguments of the `@Autowired` annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Autowired {
    /// Service path or bundle key. Empty means "not given".
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub desc: Option<String>,
}

impl Autowired {
    /// The explicit key, if one was given and is non-empty.
    pub fn key(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedProperty {
    pub name: String,
    #[serde(rename = "type")]
    pub declared_type: TypeRef,
    #[serde(default)]
    pub visibility: Visibility,
    /// `None` when the property is declared outside a class body.
    #[serde(default)]
    pub owner: Option<ClassRef>,
    #[serde(default)]
    pub annotation: Autowired,
}

impl AnnotatedProperty {
    pub fn new(name: impl Into<String>, declared_type: TypeRef, owner: ClassRef) -> Self {
        Self {
            name: name.into(),
            declared_type,
            visibility: Visibility::Public,
            owner: Some(owner),
            annotation: Autowired::default(),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.annotation.name = Some(key.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.annotation.required = true;
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn is_nullable(&self) -> bool {
        self.declared_type.nullable
    }

    /// Bundle key: the explicit annotation name, else the field name.
    pub fn bundle_key(&self) -> &str {
        self.annotation.key().unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_split_on_last_dot() {
        let ty = TypeRef::new("com.example.model.User");
        assert_eq!(ty.simple_name(), "User");
        assert_eq!(ty.package(), "com.example.model");

        let bare = TypeRef::new("User");
        assert_eq!(bare.simple_name(), "User");
        assert_eq!(bare.package(), "");
    }

    #[test]
    fn test_explicit_package_wins_for_nested_classes() {
        let mut owner = ClassRef::new("com.example.Outer.InnerActivity", Role::Screen);
        assert_eq!(owner.package(), "com.example.Outer");
        owner.package = Some("com.example".to_string());
        assert_eq!(owner.package(), "com.example");
        assert_eq!(owner.simple_name(), "InnerActivity");
    }

    #[test]
    fn test_bundle_key_falls_back_to_field_name() {
        let owner = ClassRef::new("com.example.MainActivity", Role::Screen);
        let plain = AnnotatedProperty::new("userId", TypeRef::new("kotlin.Int"), owner.clone());
        assert_eq!(plain.bundle_key(), "userId");

        let empty = plain.clone().with_key("");
        assert_eq!(empty.bundle_key(), "userId");

        let keyed = plain.with_key("uid");
        assert_eq!(keyed.bundle_key(), "uid");
    }

    #[test]
    fn test_role_aliases_deserialize() {
        let role: Role = serde_json::from_str("\"activity\"").unwrap();
        assert_eq!(role, Role::Screen);
        let role: Role = serde_json::from_str("\"fragment\"").unwrap();
        assert_eq!(role, Role::ScreenFragment);
        let role: Role = serde_json::from_str("\"service_consumer\"").unwrap();
        assert_eq!(role, Role::ServiceConsumer);
    }
}
