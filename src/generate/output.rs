use serde::Serialize;

const INDENT: &str = "    ";

/// Generated line → injected field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mapping {
    /// Zero-based line in the generated file.
    pub gen_line: usize,
    pub field: String,
}

/// Output buffer that accumulates generated code with mappings
pub struct Output {
    lines: Vec<String>,
    current_line: String,
    indent: usize,
    mappings: Vec<Mapping>,
}

impl Output {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            current_line: String::new(),
            indent: 0,
            mappings: Vec::new(),
        }
    }

    /// Add text to the current line, indenting it if the line is fresh
    pub fn push(&mut self, text: &str) {
        if self.current_line.is_empty() {
            for _ in 0..self.indent {
                self.current_line.push_str(INDENT);
            }
        }
        self.current_line.push_str(text);
    }

    /// Terminate the current line
    pub fn newline(&mut self) {
        self.lines.push(std::mem::take(&mut self.current_line));
    }

    /// Add a complete line
    pub fn line(&mut self, text: &str) {
        self.push(text);
        self.newline();
    }

    /// Add a line and indent everything after it
    pub fn open(&mut self, text: &str) {
        self.line(text);
        self.indent += 1;
    }

    /// Dedent and add a closing line
    pub fn close(&mut self, text: &str) {
        self.indent = self.indent.saturating_sub(1);
        self.line(text);
    }

    /// Dedent for one line, then indent again (`} else {`)
    pub fn reopen(&mut self, text: &str) {
        self.close(text);
        self.indent += 1;
    }

    /// Attribute the next line to `field`
    pub fn map_field(&mut self, field: &str) {
        self.mappings.push(Mapping {
            gen_line: self.lines.len(),
            field: field.to_string(),
        });
    }

    /// Finish and return the generated code, newline-terminated
    pub fn finish(mut self) -> (String, Vec<Mapping>) {
        if !self.current_line.is_empty() {
            self.newline();
        }

        let mut code = self.lines.join("\n");
        code.push('\n');
        (code, self.mappings)
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
