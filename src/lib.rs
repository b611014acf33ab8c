//! Autowired field-injection code generator.
//!
//! Annotated properties come in from a discovery source, get grouped by owning
//! class, and every group becomes one Kotlin injector whose `inject(target)`
//! fills the fields from the service registry, the screen's arguments, or the
//! optional JSON deserializer.
//!
//! ```text
//! discover → classify → resolve + dispatch (per field) → assemble → render → emit
//! ```

pub mod ast;
pub mod classify;
pub mod config;
pub mod discover;
pub mod emit;
pub mod error;
pub mod generate;
pub mod model;
pub mod pipeline;
pub mod resolve;
pub mod transform;

pub use classify::{InjectionGroup, classify};
pub use config::Config;
pub use discover::{Manifest, ManifestSet, PropertySource};
pub use emit::{EmissionSink, EmitOutcome, FileSink, GeneratedFile, MemorySink};
pub use error::{ErrorKind, GenerateError, UsageError};
pub use generate::{FieldInjection, GeneratedUnit, Strategy};
pub use model::{AnnotatedProperty, Autowired, ClassRef, Role, TypeRef, Visibility};
pub use pipeline::{Pipeline, RunSummary, generate};
pub use resolve::{TypeCategory, TypeResolver};
