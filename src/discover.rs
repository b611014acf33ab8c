//! Annotation discovery: turn a symbol manifest into annotated properties.
//!
//! The host compiler exports the symbols it resolved as JSON:
//!
//! ```json
//! {
//!   "symbols": [
//!     {
//!       "kind": "property",
//!       "name": "userId",
//!       "type": { "qualified_name": "kotlin.Int" },
//!       "owner": { "qualified_name": "com.example.MainActivity", "role": "activity" },
//!       "annotations": [
//!         { "qualified_name": "com.alibaba.android.arouter.facade.annotation.Autowired",
//!           "arguments": { "required": true } }
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::GenerateError;
use crate::model::{AnnotatedProperty, Autowired, ClassRef, TypeRef, Visibility};

/// Supplies the annotated properties of one generation pass, in discovery order.
pub trait PropertySource {
    fn discover(&self, marker: &str) -> Result<Vec<AnnotatedProperty>, GenerateError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Property,
    Class,
    Function,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnnotationUse {
    pub qualified_name: String,
    #[serde(default)]
    pub arguments: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestSymbol {
    pub kind: SymbolKind,
    pub name: String,
    #[serde(rename = "type", default)]
    pub declared_type: Option<TypeRef>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub owner: Option<ClassRef>,
    #[serde(default)]
    pub annotations: Vec<AnnotationUse>,
}

/// Symbols exported from one compilation unit (or a whole module).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    /// Where the manifest was read from, for error messages.
    #[serde(skip)]
    pub origin: String,
    #[serde(default)]
    pub symbols: Vec<ManifestSymbol>,
}

impl Manifest {
    pub fn parse(json: &str, origin: impl Into<String>) -> Result<Self, GenerateError> {
        let origin = origin.into();
        let mut manifest: Manifest = serde_json::from_str(json).map_err(|source| GenerateError::Manifest {
            path: origin.clone(),
            source,
        })?;
        manifest.origin = origin;
        Ok(manifest)
    }

    pub fn load(path: &Path) -> Result<Self, GenerateError> {
        let json = fs::read_to_string(path).map_err(|err| GenerateError::io(path, err))?;
        Self::parse(&json, path.display().to_string())
    }

    fn annotation_args(&self, symbol: &ManifestSymbol, marker: &str) -> Result<Option<Autowired>, GenerateError> {
        let Some(annotation) = symbol.annotations.iter().find(|a| a.qualified_name == marker) else {
            return Ok(None);
        };
        if annotation.arguments.is_null() {
            return Ok(Some(Autowired::default()));
        }
        serde_json::from_value(annotation.arguments.clone())
            .map(Some)
            .map_err(|source| GenerateError::Manifest {
                path: format!("{} (symbol '{}')", self.origin, symbol.name),
                source,
            })
    }
}

impl PropertySource for Manifest {
    fn discover(&self, marker: &str) -> Result<Vec<AnnotatedProperty>, GenerateError> {
        let mut properties = Vec::new();
        for symbol in &self.symbols {
            if symbol.kind != SymbolKind::Property {
                if symbol.annotations.iter().any(|a| a.qualified_name == marker) {
                    tracing::debug!(symbol = %symbol.name, kind = ?symbol.kind, "skipping non-property annotated symbol");
                }
                continue;
            }
            let Some(annotation) = self.annotation_args(symbol, marker)? else {
                continue;
            };
            let Some(declared_type) = symbol.declared_type.clone() else {
                return Err(GenerateError::InvalidSymbol {
                    origin: self.origin.clone(),
                    symbol: symbol.name.clone(),
                    reason: "property has no declared type".to_string(),
                });
            };
            properties.push(AnnotatedProperty {
                name: symbol.name.clone(),
                declared_type,
                visibility: symbol.visibility,
                owner: symbol.owner.clone(),
                annotation,
            });
        }
        Ok(properties)
    }
}

/// Several manifests discovered as one pass: manifest order, then symbol order.
#[derive(Debug, Clone, Default)]
pub struct ManifestSet {
    pub manifests: Vec<Manifest>,
}

impl ManifestSet {
    pub fn new(manifests: Vec<Manifest>) -> Self {
        Self { manifests }
    }

    pub fn load_all<P: AsRef<Path>>(paths: &[P]) -> Result<Self, GenerateError> {
        let manifests = paths
            .iter()
            .map(|path| Manifest::load(path.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { manifests })
    }
}

impl PropertySource for ManifestSet {
    fn discover(&self, marker: &str) -> Result<Vec<AnnotatedProperty>, GenerateError> {
        let mut properties = Vec::new();
        for manifest in &self.manifests {
            properties.extend(manifest.discover(marker)?);
        }
        Ok(properties)
    }
}

/// Properties that were already discovered elsewhere.
impl PropertySource for [AnnotatedProperty] {
    fn discover(&self, _marker: &str) -> Result<Vec<AnnotatedProperty>, GenerateError> {
        Ok(self.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;

    const MARKER: &str = "com.alibaba.android.arouter.facade.annotation.Autowired";

    const MANIFEST: &str = r#"{
        "symbols": [
            {
                "kind": "property",
                "name": "userId",
                "type": { "qualified_name": "kotlin.Int" },
                "owner": { "qualified_name": "com.example.MainActivity", "role": "activity" },
                "annotations": [ { "qualified_name": "com.alibaba.android.arouter.facade.annotation.Autowired" } ]
            },
            {
                "kind": "property",
                "name": "title",
                "type": { "qualified_name": "kotlin.String", "nullable": true },
                "owner": { "qualified_name": "com.example.MainActivity", "role": "activity" },
                "annotations": [ { "qualified_name": "com.example.Other" } ]
            },
            {
                "kind": "class",
                "name": "MainActivity",
                "annotations": [ { "qualified_name": "com.alibaba.android.arouter.facade.annotation.Autowired" } ]
            },
            {
                "kind": "property",
                "name": "hello",
                "type": { "qualified_name": "com.example.HelloService" },
                "visibility": "internal",
                "owner": { "qualified_name": "com.example.MainActivity", "role": "activity" },
                "annotations": [ {
                    "qualified_name": "com.alibaba.android.arouter.facade.annotation.Autowired",
                    "arguments": { "name": "/service/hello", "required": true }
                } ]
            }
        ]
    }"#;

    #[test]
    fn test_only_marked_properties_are_discovered() {
        let manifest = Manifest::parse(MANIFEST, "inline").unwrap();
        let properties = manifest.discover(MARKER).unwrap();

        let names: Vec<_> = properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["userId", "hello"]);
        assert_eq!(properties[0].owner.as_ref().unwrap().role, Role::Screen);
        assert_eq!(properties[1].visibility, Visibility::Internal);
        assert_eq!(properties[1].annotation.key(), Some("/service/hello"));
        assert!(properties[1].annotation.required);
    }

    #[test]
    fn test_set_preserves_manifest_order() {
        let first = Manifest::parse(MANIFEST, "a.json").unwrap();
        let second = Manifest::parse(
            r#"{"symbols": [{
                "kind": "property", "name": "extra",
                "type": { "qualified_name": "kotlin.Long" },
                "annotations": [ { "qualified_name": "com.alibaba.android.arouter.facade.annotation.Autowired" } ]
            }]}"#,
            "b.json",
        )
        .unwrap();
        let properties = ManifestSet::new(vec![second, first]).discover(MARKER).unwrap();

        let names: Vec<_> = properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["extra", "userId", "hello"]);
        assert!(properties[0].owner.is_none());
    }

    #[test]
    fn test_property_without_type_is_invalid() {
        let manifest = Manifest::parse(
            r#"{"symbols": [{
                "kind": "property", "name": "broken",
                "annotations": [ { "qualified_name": "com.alibaba.android.arouter.facade.annotation.Autowired" } ]
            }]}"#,
            "broken.json",
        )
        .unwrap();
        let err = manifest.discover(MARKER).unwrap_err();
        assert!(matches!(err, GenerateError::InvalidSymbol { .. }));
    }

    #[test]
    fn test_marked_non_property_with_odd_arguments_is_skipped() {
        let manifest = Manifest::parse(
            r#"{"symbols": [
                {
                    "kind": "function", "name": "onCreate",
                    "annotations": [ {
                        "qualified_name": "com.alibaba.android.arouter.facade.annotation.Autowired",
                        "arguments": { "required": "sometimes" }
                    } ]
                },
                {
                    "kind": "property", "name": "count",
                    "type": { "qualified_name": "kotlin.Int" },
                    "annotations": [ { "qualified_name": "com.alibaba.android.arouter.facade.annotation.Autowired" } ]
                }
            ]}"#,
            "odd.json",
        )
        .unwrap();
        let properties = manifest.discover(MARKER).unwrap();
        assert_eq!(properties.len(), 1);
        assert_eq!(properties[0].name, "count");
    }

    #[test]
    fn test_malformed_json_names_origin() {
        let err = Manifest::parse("{ not json", "bad.json").unwrap_err();
        assert!(err.to_string().contains("bad.json"));
    }
}
