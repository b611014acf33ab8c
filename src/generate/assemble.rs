//! Unit assembler: one owner + its field injections → one generated unit.

use std::collections::BTreeSet;

use super::dispatch::FieldInjection;
use crate::ast::Stmt;
use crate::config::{Config, Naming, RuntimeSymbols};
use crate::model::ClassRef;
use crate::transform::standard_plugins;

/// A finished injector, ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    pub target: ClassRef,
    pub generated_class_name: String,
    /// Statements run before any field is touched.
    pub prelude: Vec<Stmt>,
    /// Field injections in discovery order.
    pub injections: Vec<FieldInjection>,
    pub imports: BTreeSet<String>,
    /// Qualified names spelled by simple name (imports included).
    pub simple_names: BTreeSet<String>,
}

impl GeneratedUnit {
    pub fn target_class_name(&self) -> &str {
        self.target.simple_name()
    }

    pub fn package(&self) -> &str {
        self.target.package()
    }

    pub fn qualified_name(&self) -> String {
        match self.package() {
            "" => self.generated_class_name.clone(),
            package => format!("{package}.{}", self.generated_class_name),
        }
    }

    /// Every statement of the injection routine, in execution order.
    pub fn statements(&self) -> Vec<&Stmt> {
        let mut statements: Vec<&Stmt> = self.prelude.iter().collect();
        for injection in &self.injections {
            statements.extend(&injection.statements);
            statements.extend(&injection.required_check);
        }
        statements
    }

    pub fn required_field_checks(&self) -> Vec<&Stmt> {
        self.injections
            .iter()
            .filter_map(|injection| injection.required_check.as_ref())
            .collect()
    }
}

pub struct Assembler {
    naming: Naming,
    symbols: RuntimeSymbols,
}

impl Assembler {
    pub fn new(config: &Config) -> Self {
        Self {
            naming: config.naming.clone(),
            symbols: config.runtime.clone(),
        }
    }

    pub fn generated_class_name(&self, owner: &ClassRef) -> String {
        format!("{}{}", owner.simple_name(), self.naming.suffix)
    }

    pub fn assemble(&self, owner: &ClassRef, injections: Vec<FieldInjection>) -> GeneratedUnit {
        let prelude = vec![
            Stmt::ResolveDeserializer,
            Stmt::BindTarget {
                owner: owner.as_type(),
                message: format!(
                    "The target that needs to be injected must be {}, please check your code!",
                    owner.simple_name()
                ),
            },
        ];

        let mut transformer = standard_plugins(&self.symbols);
        transformer.transform(&prelude);
        for injection in &injections {
            transformer.transform(&injection.statements);
            if let Some(check) = &injection.required_check {
                transformer.transform(std::slice::from_ref(check));
            }
        }
        let mut metadata = transformer.metadata;
        metadata.reference(&self.symbols.injector_interface);

        let unit = GeneratedUnit {
            target: owner.clone(),
            generated_class_name: self.generated_class_name(owner),
            imports: metadata.imports(owner.package()),
            simple_names: metadata.simple_names(owner.package()),
            prelude,
            injections,
        };
        tracing::info!(
            target_class = %owner.qualified_name,
            generated = %unit.generated_class_name,
            fields = unit.injections.len(),
            "assembled injector"
        );
        unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::dispatch::dispatch;
    use crate::model::{AnnotatedProperty, Role, TypeRef};
    use crate::resolve::TypeCategory;

    #[test]
    fn test_prelude_resolves_deserializer_then_binds_target() {
        let owner = ClassRef::new("com.example.MainActivity", Role::Screen);
        let unit = Assembler::new(&Config::default()).assemble(&owner, Vec::new());

        assert_eq!(unit.generated_class_name, "MainActivity$$ARouter$$Autowired");
        assert_eq!(unit.qualified_name(), "com.example.MainActivity$$ARouter$$Autowired");
        assert_eq!(unit.prelude[0], Stmt::ResolveDeserializer);
        assert!(matches!(&unit.prelude[1], Stmt::BindTarget { message, .. } if message.contains("MainActivity")));
        assert!(unit.imports.contains("com.alibaba.android.arouter.facade.template.ISyringe"));
        assert!(unit.imports.contains("com.alibaba.android.arouter.launcher.ARouter"));
        assert!(!unit.imports.contains("android.util.Log"));
    }

    #[test]
    fn test_required_checks_follow_their_field() {
        let owner = ClassRef::new("com.example.TestFragment", Role::ScreenFragment);
        let a = AnnotatedProperty::new("name", TypeRef::new("kotlin.String"), owner.clone()).required();
        let b = AnnotatedProperty::new("count", TypeRef::new("kotlin.Int"), owner.clone());
        let injections = vec![
            dispatch(&a, TypeCategory::Str, &owner).unwrap(),
            dispatch(&b, TypeCategory::Int, &owner).unwrap(),
        ];
        let unit = Assembler::new(&Config::default()).assemble(&owner, injections);

        let statements = unit.statements();
        assert_eq!(statements.len(), 2 + 1 + 1 + 1);
        assert!(matches!(statements[3], Stmt::Require { field, .. } if field == "name"));
        assert_eq!(unit.required_field_checks().len(), 1);
        assert!(unit.imports.contains("android.util.Log"));
    }
}
