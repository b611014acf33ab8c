mod metadata;
mod runtime_detect;
mod type_detect;

pub use metadata::{UnitMetadata, is_implicit};
pub use runtime_detect::RuntimeDetectionPlugin;
pub use type_detect::TypeDetectionPlugin;

use crate::ast::Stmt;
use crate::config::RuntimeSymbols;

/// Visitor trait for statement-tree analysis
pub trait Visitor {
    /// Called before visiting children. Return `false` to skip children.
    fn enter(&mut self, _stmt: &Stmt, _metadata: &mut UnitMetadata) -> bool {
        true
    }

    /// Called after visiting children.
    fn exit(&mut self, _stmt: &Stmt, _metadata: &mut UnitMetadata) {}
}

/// Runs a series of plugins over a unit's statements
pub struct Transformer {
    plugins: Vec<Box<dyn Visitor>>,
    pub metadata: UnitMetadata,
}

impl Transformer {
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
            metadata: UnitMetadata::new(),
        }
    }

    pub fn add<V: Visitor + 'static>(mut self, visitor: V) -> Self {
        self.plugins.push(Box::new(visitor));
        self
    }

    pub fn transform(&mut self, statements: &[Stmt]) -> &UnitMetadata {
        for plugin in &mut self.plugins {
            Self::visit_stmts(statements, plugin.as_mut(), &mut self.metadata);
        }

        &self.metadata
    }

    fn visit_stmts(statements: &[Stmt], visitor: &mut dyn Visitor, metadata: &mut UnitMetadata) {
        for stmt in statements {
            if visitor.enter(stmt, metadata) {
                for children in stmt.children() {
                    Self::visit_stmts(children, visitor, metadata);
                }
            }
            visitor.exit(stmt, metadata);
        }
    }
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a transformer with the standard plugins
pub fn standard_plugins(symbols: &RuntimeSymbols) -> Transformer {
    Transformer::new()
        .add(TypeDetectionPlugin)
        .add(RuntimeDetectionPlugin::new(symbols.clone()))
}
