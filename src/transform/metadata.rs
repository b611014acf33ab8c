use std::collections::{BTreeSet, HashMap};

use crate::model::{package_of, simple_name};

/// Packages Kotlin imports into every file.
const DEFAULT_IMPORTS: &[&str] = &[
    "kotlin",
    "kotlin.annotation",
    "kotlin.collections",
    "kotlin.comparisons",
    "kotlin.io",
    "kotlin.ranges",
    "kotlin.sequences",
    "kotlin.text",
    "java.lang",
];

/// True if `qualified_name` is visible by simple name without an import.
pub fn is_implicit(qualified_name: &str, package: &str) -> bool {
    let owner_package = package_of(qualified_name);
    owner_package == package || DEFAULT_IMPORTS.contains(&owner_package)
}

/// Metadata collected by analysis plugins and used by the generator
#[derive(Debug, Clone, Default)]
pub struct UnitMetadata {
    /// Every type referenced by qualified name.
    pub types: BTreeSet<String>,
    pub uses_registry: bool,
    pub uses_log: bool,
    pub uses_type_wrapper: bool,
}

impl UnitMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reference(&mut self, qualified_name: &str) {
        if qualified_name.contains('.') {
            self.types.insert(qualified_name.to_string());
        }
    }

    /// Types a unit living in `package` may spell by simple name.
    ///
    /// Each simple name has one claimant: types of `package` itself, then
    /// default-imported types, then everything else in lexical order. Every
    /// other type with the same simple name stays fully qualified.
    pub fn simple_names(&self, package: &str) -> BTreeSet<String> {
        let same_package = self.types.iter().filter(|name| package_of(name) == package);
        let defaults = self
            .types
            .iter()
            .filter(|name| package_of(name) != package && is_implicit(name, package));
        let explicit = self.types.iter().filter(|name| !is_implicit(name, package));

        let mut claimed: HashMap<&str, &str> = HashMap::new();
        for name in same_package.chain(defaults).chain(explicit) {
            claimed.entry(simple_name(name)).or_insert(name);
        }
        claimed.into_values().map(str::to_string).collect()
    }

    /// Import set for a unit living in `package`: the simple-name claimants
    /// that are not visible without an import.
    pub fn imports(&self, package: &str) -> BTreeSet<String> {
        self.simple_names(package)
            .into_iter()
            .filter(|name| !is_implicit(name, package))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_package_and_defaults_are_not_imported() {
        let mut metadata = UnitMetadata::new();
        metadata.reference("com.example.MainActivity");
        metadata.reference("kotlin.collections.List");
        metadata.reference("kotlin.String");
        metadata.reference("com.example.model.User");

        let imports = metadata.imports("com.example");
        assert_eq!(imports.into_iter().collect::<Vec<_>>(), ["com.example.model.User"]);
    }

    #[test]
    fn test_simple_name_collision_keeps_first() {
        let mut metadata = UnitMetadata::new();
        metadata.reference("com.b.User");
        metadata.reference("com.a.User");
        metadata.reference("com.example.Card");
        metadata.reference("com.other.Card");

        let imports = metadata.imports("com.example");
        assert!(imports.contains("com.a.User"));
        assert!(!imports.contains("com.b.User"));
        // Same-package Card shadows the foreign one.
        assert!(!imports.contains("com.other.Card"));
    }

    #[test]
    fn test_same_package_type_shadows_default_import() {
        let mut metadata = UnitMetadata::new();
        metadata.reference("kotlin.collections.List");
        metadata.reference("com.example.List");

        let simple = metadata.simple_names("com.example");
        assert!(simple.contains("com.example.List"));
        assert!(!simple.contains("kotlin.collections.List"));
        assert!(metadata.imports("com.example").is_empty());
    }

    #[test]
    fn test_unqualified_names_are_ignored() {
        let mut metadata = UnitMetadata::new();
        metadata.reference("T");
        assert!(metadata.types.is_empty());
    }
}
