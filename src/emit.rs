//! Emission sinks: where rendered injectors end up.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;

use crate::error::GenerateError;
use crate::generate::Mapping;

pub const PROVENANCE_FILE: &str = ".autowire-provenance.json";

/// One rendered source file plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFile {
    pub package: String,
    pub class_name: String,
    pub code: String,
    /// Source file of the owning class, if known.
    pub origin: Option<String>,
    pub mappings: Vec<Mapping>,
}

impl GeneratedFile {
    /// `com/example/MainActivity$$ARouter$$Autowired.kt`
    pub fn relative_path(&self) -> PathBuf {
        let mut path: PathBuf = self.package.split('.').filter(|segment| !segment.is_empty()).collect();
        path.push(format!("{}.kt", self.class_name));
        path
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitOutcome {
    Written,
    /// Identical content was already on disk.
    Unchanged,
}

/// Accepts finished files. Distinct files may be emitted concurrently.
pub trait EmissionSink: Send + Sync {
    fn emit(&self, file: &GeneratedFile) -> Result<EmitOutcome, GenerateError>;
}

/// Writes files under a root directory and keeps a provenance index
/// (generated path → originating source file).
pub struct FileSink {
    root: PathBuf,
    provenance: Mutex<BTreeMap<String, Option<String>>>,
}

impl FileSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            provenance: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write the provenance index next to the generated sources.
    pub fn write_provenance(&self) -> Result<PathBuf, GenerateError> {
        let path = self.root.join(PROVENANCE_FILE);
        let index = match self.provenance.lock() {
            Ok(index) => index.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        let json = serde_json::to_string_pretty(&index)?;
        fs::create_dir_all(&self.root).map_err(|err| GenerateError::io(&self.root, err))?;
        fs::write(&path, json + "\n").map_err(|err| GenerateError::io(&path, err))?;
        Ok(path)
    }

    fn record(&self, relative: &Path, origin: Option<&str>) {
        let key = relative.to_string_lossy().replace('\\', "/");
        let mut index = match self.provenance.lock() {
            Ok(index) => index,
            Err(poisoned) => poisoned.into_inner(),
        };
        index.insert(key, origin.map(str::to_string));
    }
}

impl EmissionSink for FileSink {
    fn emit(&self, file: &GeneratedFile) -> Result<EmitOutcome, GenerateError> {
        let relative = file.relative_path();
        let path = self.root.join(&relative);

        if fs::read_to_string(&path).is_ok_and(|existing| existing == file.code) {
            tracing::debug!(path = %path.display(), "generated file unchanged");
            self.record(&relative, file.origin.as_deref());
            return Ok(EmitOutcome::Unchanged);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| GenerateError::io(parent, err))?;
        }
        fs::write(&path, &file.code).map_err(|err| GenerateError::io(&path, err))?;
        self.record(&relative, file.origin.as_deref());
        tracing::info!(path = %path.display(), origin = ?file.origin, "wrote injector");
        Ok(EmitOutcome::Written)
    }
}

/// Keeps emitted files in memory.
#[derive(Default)]
pub struct MemorySink {
    files: Mutex<Vec<GeneratedFile>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_files(self) -> Vec<GeneratedFile> {
        match self.files.into_inner() {
            Ok(files) => files,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl EmissionSink for MemorySink {
    fn emit(&self, file: &GeneratedFile) -> Result<EmitOutcome, GenerateError> {
        let mut files = match self.files.lock() {
            Ok(files) => files,
            Err(poisoned) => poisoned.into_inner(),
        };
        files.push(file.clone());
        Ok(EmitOutcome::Written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path_follows_package() {
        let file = GeneratedFile {
            package: "com.example.ui".to_string(),
            class_name: "MainActivity$$ARouter$$Autowired".to_string(),
            code: String::new(),
            origin: None,
            mappings: Vec::new(),
        };
        assert_eq!(
            file.relative_path(),
            Path::new("com/example/ui/MainActivity$$ARouter$$Autowired.kt")
        );

        let bare = GeneratedFile {
            package: String::new(),
            ..file
        };
        assert_eq!(bare.relative_path(), Path::new("MainActivity$$ARouter$$Autowired.kt"));
    }

    #[test]
    fn test_failed_write_is_not_recorded() {
        let dir = tempfile::TempDir::new().unwrap();
        // A plain file where the package directory should go.
        fs::write(dir.path().join("com"), "not a directory").unwrap();
        let sink = FileSink::new(dir.path());
        let file = GeneratedFile {
            package: "com.example".to_string(),
            class_name: "MainActivity$$ARouter$$Autowired".to_string(),
            code: "class X\n".to_string(),
            origin: Some("MainActivity.kt".to_string()),
            mappings: Vec::new(),
        };

        assert!(sink.emit(&file).is_err());
        let index = fs::read_to_string(sink.write_provenance().unwrap()).unwrap();
        assert_eq!(index.trim(), "{}");
    }
}
