//! End-to-end generation pass.
//!
//! A pass is all-or-nothing: every group is classified, resolved, dispatched and
//! rendered before the first file reaches the sink, so a fatal error anywhere
//! leaves the sink untouched.

use crate::classify::classify;
use crate::config::Config;
use crate::discover::PropertySource;
use crate::emit::{EmissionSink, EmitOutcome, GeneratedFile};
use crate::error::GenerateError;
use crate::generate::{Assembler, GeneratedUnit, Generator, KotlinGenerator, dispatch};
use crate::model::AnnotatedProperty;
use crate::resolve::TypeResolver;

/// What a pass produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub written: Vec<String>,
    pub unchanged: Vec<String>,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.written.len() + self.unchanged.len()
    }
}

pub struct Pipeline {
    config: Config,
    resolver: TypeResolver,
    assembler: Assembler,
    generator: KotlinGenerator,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self {
            resolver: TypeResolver::new(&config.runtime),
            assembler: Assembler::new(&config),
            generator: KotlinGenerator::new(config.clone()),
            config,
        }
    }

    /// Pipeline with the built-in ARouter configuration
    pub fn standard() -> Self {
        Self::new(Config::default())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Classify, resolve and dispatch; one unit per owning class.
    pub fn assemble(&self, properties: Vec<AnnotatedProperty>) -> Result<Vec<GeneratedUnit>, GenerateError> {
        if properties.is_empty() {
            return Ok(Vec::new());
        }
        tracing::info!(fields = properties.len(), "found autowired fields, start processing");

        let groups = classify(properties)?;
        let mut units = Vec::with_capacity(groups.len());
        for group in groups {
            tracing::info!(
                owner = %group.owner.simple_name(),
                fields = group.properties.len(),
                "processing injection group"
            );
            let injections = group
                .properties
                .iter()
                .map(|property| {
                    let category = self.resolver.resolve(&property.declared_type);
                    dispatch(property, category, &group.owner)
                })
                .collect::<Result<Vec<_>, _>>()?;
            units.push(self.assembler.assemble(&group.owner, injections));
        }
        Ok(units)
    }

    /// Render a single unit.
    pub fn render(&self, unit: &GeneratedUnit) -> GeneratedFile {
        let result = self.generator.generate(unit);
        GeneratedFile {
            package: unit.package().to_string(),
            class_name: unit.generated_class_name.clone(),
            code: result.code,
            origin: unit.target.source_file.clone(),
            mappings: result.mappings,
        }
    }

    /// Assemble and render every unit of the pass.
    pub fn compile(&self, properties: Vec<AnnotatedProperty>) -> Result<Vec<GeneratedFile>, GenerateError> {
        let units = self.assemble(properties)?;
        Ok(units.iter().map(|unit| self.render(unit)).collect())
    }

    /// Discover, compile and hand every file to `sink`.
    pub fn run<S>(&self, source: &S, sink: &dyn EmissionSink) -> Result<RunSummary, GenerateError>
    where
        S: PropertySource + ?Sized,
    {
        let properties = source.discover(&self.config.runtime.autowired_annotation)?;
        let files = self.compile(properties)?;

        let mut summary = RunSummary::default();
        for file in &files {
            let path = file.relative_path().to_string_lossy().into_owned();
            match sink.emit(file)? {
                EmitOutcome::Written => summary.written.push(path),
                EmitOutcome::Unchanged => summary.unchanged.push(path),
            }
        }
        tracing::info!(
            written = summary.written.len(),
            unchanged = summary.unchanged.len(),
            "autowired processing finished"
        );
        Ok(summary)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::standard()
    }
}

/// Generate injectors for `properties` with the default configuration.
pub fn generate(properties: Vec<AnnotatedProperty>) -> Result<Vec<GeneratedFile>, GenerateError> {
    Pipeline::standard().compile(properties)
}
