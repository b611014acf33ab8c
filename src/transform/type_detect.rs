use super::{UnitMetadata, Visitor};
use crate::ast::{Expr, Stmt};
use crate::model::TypeRef;

/// Records every declared type the injector mentions, type arguments included
pub struct TypeDetectionPlugin;

impl Visitor for TypeDetectionPlugin {
    fn enter(&mut self, stmt: &Stmt, metadata: &mut UnitMetadata) -> bool {
        if let Stmt::BindTarget { owner, .. } = stmt {
            reference_type(owner, metadata);
        }
        for expr in stmt.exprs() {
            match expr {
                Expr::ReadSerializable { ty, .. }
                | Expr::ReadParcelable { ty, .. }
                | Expr::ServiceByType(ty)
                | Expr::ServiceByName { ty, .. }
                | Expr::Deserialize { ty, .. } => reference_type(ty, metadata),
                _ => {}
            }
        }
        true
    }
}

fn reference_type(ty: &TypeRef, metadata: &mut UnitMetadata) {
    metadata.reference(&ty.qualified_name);
    for argument in &ty.arguments {
        reference_type(argument, metadata);
    }
}
