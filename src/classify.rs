//! Property classifier: validate annotated properties and group them by owner.

use std::collections::HashMap;

use crate::error::{ErrorKind, UsageError};
use crate::model::{AnnotatedProperty, ClassRef, Visibility};

/// All annotated properties of one owning class, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectionGroup {
    pub owner: ClassRef,
    pub properties: Vec<AnnotatedProperty>,
}

/// Group properties by owning class.
///
/// Groups come out in order of first appearance and properties keep their
/// discovery order inside a group. The first ineligible property aborts.
pub fn classify(properties: Vec<AnnotatedProperty>) -> Result<Vec<InjectionGroup>, UsageError> {
    let mut groups: Vec<InjectionGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for property in properties {
        let owner = match &property.owner {
            Some(owner) => owner.clone(),
            None => {
                return Err(UsageError::new(
                    ErrorKind::MissingOwner,
                    format!(
                        "Property [{}] annotated with @Autowired must be declared inside a class!",
                        property.name
                    ),
                    &property.name,
                )
                .with_help("move the property into the activity, fragment or service that uses it"));
            }
        };

        if property.visibility == Visibility::Private {
            return Err(UsageError::new(
                ErrorKind::PrivateField,
                format!(
                    "The inject fields CAN NOT BE 'private'!!! please check field [{}] in class [{}]",
                    property.name, owner.qualified_name
                ),
                &property.name,
            )
            .with_owner(&owner.qualified_name)
            .with_source_file(owner.source_file.as_deref())
            .with_help("generated injectors assign fields from outside the class; drop the `private` modifier"));
        }

        match index.get(&owner.qualified_name) {
            Some(&slot) => groups[slot].properties.push(property),
            None => {
                index.insert(owner.qualified_name.clone(), groups.len());
                groups.push(InjectionGroup {
                    owner,
                    properties: vec![property],
                });
            }
        }
    }

    tracing::info!(groups = groups.len(), "@Autowired classification finished");
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Role, TypeRef};

    fn screen() -> ClassRef {
        ClassRef::new("com.example.MainActivity", Role::Screen)
    }

    fn fragment() -> ClassRef {
        ClassRef::new("com.example.DetailFragment", Role::ScreenFragment)
    }

    fn int_field(name: &str, owner: ClassRef) -> AnnotatedProperty {
        AnnotatedProperty::new(name, TypeRef::new("kotlin.Int"), owner)
    }

    #[test]
    fn test_groups_by_owner_in_discovery_order() {
        let properties = vec![
            int_field("a", screen()),
            int_field("b", fragment()),
            int_field("c", screen()),
            int_field("d", fragment()),
        ];
        let groups = classify(properties).unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].owner.qualified_name, "com.example.MainActivity");
        let names: Vec<_> = groups[0].properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["a", "c"]);
        let names: Vec<_> = groups[1].properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["b", "d"]);
    }

    #[test]
    fn test_every_property_lands_in_exactly_one_group() {
        let properties: Vec<_> = (0..10)
            .map(|i| {
                let owner = if i % 3 == 0 { screen() } else { fragment() };
                int_field(&format!("f{i}"), owner)
            })
            .collect();
        let groups = classify(properties).unwrap();

        let mut seen: Vec<String> = groups
            .iter()
            .flat_map(|g| g.properties.iter().map(|p| p.name.clone()))
            .collect();
        seen.sort();
        let mut expected: Vec<String> = (0..10).map(|i| format!("f{i}")).collect();
        expected.sort();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_private_field_is_rejected() {
        let properties = vec![
            int_field("ok", screen()),
            int_field("secret", screen()).with_visibility(Visibility::Private),
        ];
        let err = classify(properties).unwrap_err();
        assert_eq!(err.kind, ErrorKind::PrivateField);
        assert_eq!(err.field, "secret");
        assert!(err.message.contains("com.example.MainActivity"));
    }

    #[test]
    fn test_protected_and_internal_are_eligible() {
        let properties = vec![
            int_field("a", screen()).with_visibility(Visibility::Protected),
            int_field("b", screen()).with_visibility(Visibility::Internal),
        ];
        assert_eq!(classify(properties).unwrap()[0].properties.len(), 2);
    }

    #[test]
    fn test_missing_owner_is_rejected() {
        let mut orphan = int_field("orphan", screen());
        orphan.owner = None;
        let err = classify(vec![orphan]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingOwner);
    }

    #[test]
    fn test_empty_input_has_no_groups() {
        assert!(classify(Vec::new()).unwrap().is_empty());
    }
}
