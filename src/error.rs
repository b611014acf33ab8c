use std::path::PathBuf;

use thiserror::Error;

use crate::resolve::TypeCategory;

/// Kind of usage error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    PrivateField,
    MissingOwner,
    UnsupportedOwnerRole,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::PrivateField => "Private injected field",
            ErrorKind::MissingOwner => "Property without owning class",
            ErrorKind::UnsupportedOwnerRole => "Unsupported owner role",
        }
    }
}

/// A misuse of the annotation that aborts the whole pass.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct UsageError {
    pub kind: ErrorKind,
    pub message: String,
    pub field: String,
    pub owner: Option<String>,
    pub source_file: Option<String>,
    pub help: Option<String>,
}

impl UsageError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            field: field.into(),
            owner: None,
            source_file: None,
            help: None,
        }
    }

    /// Attach the owning class (qualified name)
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Attach the file the owner was declared in
    pub fn with_source_file(mut self, path: Option<&str>) -> Self {
        self.source_file = path.map(str::to_string);
        self
    }

    /// Add help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Render the error as a diagnostic block
    pub fn render(&self) -> String {
        self.render_inner(false)
    }

    /// Render the error with ANSI color codes
    pub fn render_color(&self) -> String {
        self.render_inner(true)
    }

    fn render_inner(&self, color: bool) -> String {
        let red = if color { "\x1b[1;31m" } else { "" };
        let dim = if color { "\x1b[2m" } else { "" };
        let cyan = if color { "\x1b[1;38;5;73m" } else { "" };
        let reset = if color { "\x1b[0m" } else { "" };

        let mut output = String::new();
        output.push('\n');

        let location = match &self.owner {
            Some(owner) => format!("{owner}.{}", self.field),
            None => self.field.clone(),
        };
        match &self.source_file {
            Some(file) => output.push_str(&format!(" {dim}at:{reset} {location} ({file})\n")),
            None => output.push_str(&format!(" {dim}at:{reset} {location}\n")),
        }

        output.push_str(&format!("{red}error:{reset} {}: {}\n", self.kind.as_str(), self.message));

        if let Some(ref help) = self.help {
            output.push('\n');
            for (i, help_line) in help.lines().enumerate() {
                if i == 0 {
                    output.push_str(&format!(" {cyan}help:{reset} {help_line}\n"));
                } else {
                    output.push_str(&format!("       {help_line}\n"));
                }
            }
        }

        output.push('\n');
        output
    }
}

/// Error during a generation pass
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Usage(#[from] UsageError),

    /// The type resolver and the strategy dispatcher disagree about the category set.
    #[error("internal error: no injection strategy for category {category:?} (field '{field}')")]
    UnreachableCategory { category: TypeCategory, field: String },

    #[error("invalid symbol manifest {path}: {source}")]
    Manifest {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid symbol '{symbol}' in {origin}: {reason}")]
    InvalidSymbol {
        origin: String,
        symbol: String,
        reason: String,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl GenerateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenerateError::Io {
            path: path.into(),
            source,
        }
    }

    /// Render for a terminal; usage errors get the full diagnostic block
    pub fn render(&self, color: bool) -> String {
        match self {
            GenerateError::Usage(err) if color => err.render_color(),
            GenerateError::Usage(err) => err.render(),
            other if color => format!("\x1b[1;31merror\x1b[0m: \x1b[1m{other}\x1b[0m\n"),
            other => format!("error: {other}\n"),
        }
    }
}

impl From<figment::Error> for GenerateError {
    fn from(err: figment::Error) -> Self {
        GenerateError::Config(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_includes_location_and_help() {
        let err = UsageError::new(ErrorKind::PrivateField, "cannot inject private field", "token")
            .with_owner("com.example.LoginActivity")
            .with_source_file(Some("app/src/LoginActivity.kt"))
            .with_help("drop the `private` modifier");

        let rendered = err.render();
        assert!(rendered.contains("at: com.example.LoginActivity.token (app/src/LoginActivity.kt)"));
        assert!(rendered.contains("error: Private injected field: cannot inject private field"));
        assert!(rendered.contains("help: drop the `private` modifier"));
        assert!(!rendered.contains("\x1b["));
    }

    #[test]
    fn test_render_color_uses_ansi() {
        let err = UsageError::new(ErrorKind::MissingOwner, "no owner", "orphan");
        assert!(err.render_color().contains("\x1b[1;31merror:"));
    }

    #[test]
    fn test_display_is_message() {
        let err = UsageError::new(ErrorKind::MissingOwner, "no owner", "orphan");
        assert_eq!(err.to_string(), "no owner");
        let wrapped: GenerateError = err.into();
        assert_eq!(wrapped.to_string(), "no owner");
    }
}
