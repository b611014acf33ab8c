use super::{UnitMetadata, Visitor};
use crate::ast::{Expr, Failure, Stmt};
use crate::config::RuntimeSymbols;

/// Detects which runtime helpers the injector calls
pub struct RuntimeDetectionPlugin {
    symbols: RuntimeSymbols,
}

impl RuntimeDetectionPlugin {
    pub fn new(symbols: RuntimeSymbols) -> Self {
        Self { symbols }
    }

    fn use_registry(&self, metadata: &mut UnitMetadata) {
        metadata.uses_registry = true;
        metadata.reference(&self.symbols.registry);
    }

    fn use_log(&self, metadata: &mut UnitMetadata) {
        metadata.uses_log = true;
        metadata.reference(&self.symbols.log_facility);
    }
}

impl Visitor for RuntimeDetectionPlugin {
    fn enter(&mut self, stmt: &Stmt, metadata: &mut UnitMetadata) -> bool {
        match stmt {
            Stmt::ResolveDeserializer => {
                self.use_registry(metadata);
                metadata.reference(&self.symbols.serialization_service);
            }
            Stmt::Log(_) => self.use_log(metadata),
            Stmt::Require {
                failure: Failure::Diagnostic(_),
                ..
            } => self.use_log(metadata),
            _ => {}
        }
        for expr in stmt.exprs() {
            match expr {
                Expr::ServiceByType(_) | Expr::ServiceByName { .. } => self.use_registry(metadata),
                Expr::Deserialize { .. } => {
                    metadata.uses_type_wrapper = true;
                    metadata.reference(&self.symbols.type_wrapper);
                }
                _ => {}
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Condition;
    use crate::model::TypeRef;
    use crate::transform::Transformer;

    #[test]
    fn test_log_detected_inside_nested_branches() {
        let statements = vec![Stmt::If {
            condition: Condition::DeserializerAvailable,
            then_branch: vec![],
            else_branch: Some(vec![Stmt::Log("missing".to_string())]),
        }];
        let mut transformer = Transformer::new().add(RuntimeDetectionPlugin::new(RuntimeSymbols::default()));
        let metadata = transformer.transform(&statements);

        assert!(metadata.uses_log);
        assert!(metadata.types.contains("android.util.Log"));
        assert!(!metadata.uses_registry);
    }

    #[test]
    fn test_deserialize_pulls_in_type_wrapper() {
        let statements = vec![Stmt::Scoped {
            subject: Expr::Deserialize {
                raw: "res".to_string(),
                ty: TypeRef::new("com.example.User"),
            },
            body: vec![],
        }];
        let mut transformer = Transformer::new().add(RuntimeDetectionPlugin::new(RuntimeSymbols::default()));
        let metadata = transformer.transform(&statements);

        assert!(metadata.uses_type_wrapper);
        assert!(metadata.types.contains("com.alibaba.android.arouter.facade.model.TypeWrapper"));
    }
}
