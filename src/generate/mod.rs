mod assemble;
mod dispatch;
mod kotlin;
mod output;

pub use assemble::{Assembler, GeneratedUnit};
pub use dispatch::{CastKind, FieldInjection, Strategy, dispatch};
pub use kotlin::{KotlinGenerator, ident, string_literal};
pub use output::{Mapping, Output};

/// Generation result
#[derive(Debug, Clone)]
pub struct GenerateResult {
    pub code: String,
    pub mappings: Vec<Mapping>,
}

/// Generator trait - renders an assembled unit to source text
pub trait Generator {
    fn generate(&self, unit: &GeneratedUnit) -> GenerateResult;
}
