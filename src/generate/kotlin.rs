use super::{GenerateResult, Generator, GeneratedUnit, Output};
use crate::ast::*;
use crate::config::Config;
use crate::model::{TypeRef, simple_name};

const TARGET: &str = "target";
const SUBSTITUTE: &str = "substitute";
const DESERIALIZER: &str = "serializationService";
const INJECT_METHOD: &str = "inject";

const HARD_KEYWORDS: &[&str] = &[
    "as", "break", "class", "continue", "do", "else", "false", "for", "fun", "if", "in", "interface", "is",
    "null", "object", "package", "return", "super", "this", "throw", "true", "try", "typealias", "typeof",
    "val", "var", "when", "while",
];

/// Renders injectors as Kotlin source
pub struct KotlinGenerator {
    config: Config,
}

impl KotlinGenerator {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    fn emit_header(&self, unit: &GeneratedUnit, output: &mut Output) {
        if !unit.package().is_empty() {
            output.line(&format!("package {}", unit.package()));
            output.newline();
        }

        if !unit.imports.is_empty() {
            for import in &unit.imports {
                output.line(&format!("import {import}"));
            }
            output.newline();
        }

        output.line("/**");
        for line in self.config.naming.header.lines() {
            output.line(&format!(" * {line}"));
        }
        output.line(" */");
    }

    fn emit_stmts(&self, ctx: &Names<'_>, stmts: &[Stmt], output: &mut Output) {
        for stmt in stmts {
            self.emit_stmt(ctx, stmt, output);
        }
    }

    fn emit_stmt(&self, ctx: &Names<'_>, stmt: &Stmt, output: &mut Output) {
        let runtime = &self.config.runtime;
        match stmt {
            Stmt::ResolveDeserializer => {
                output.line(&format!(
                    "{DESERIALIZER} = {}.getInstance().navigation({}::class.java)",
                    ctx.name(&runtime.registry),
                    ctx.name(&runtime.serialization_service)
                ));
            }
            Stmt::BindTarget { owner, message } => {
                output.line(&format!(
                    "val {SUBSTITUTE} = ({TARGET} as? {}) ?: throw IllegalStateException({})",
                    ctx.type_name(owner),
                    string_literal(message)
                ));
            }
            Stmt::Assign { field, value } => {
                output.line(&format!("{SUBSTITUTE}.{} = {}", ident(field), self.expr(ctx, value)));
            }
            Stmt::Local { name, value } => {
                output.line(&format!("val {} = {}", ident(name), self.expr(ctx, value)));
            }
            Stmt::Scoped { subject, body } => {
                output.open(&format!("{}?.let {{", self.expr(ctx, subject)));
                self.emit_stmts(ctx, body, output);
                output.close("}");
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                output.open(&format!("if ({}) {{", condition_text(condition)));
                self.emit_stmts(ctx, then_branch, output);
                if let Some(else_branch) = else_branch {
                    output.reopen("} else {");
                    self.emit_stmts(ctx, else_branch, output);
                }
                output.close("}");
            }
            Stmt::Require { field, failure } => {
                output.open(&format!(
                    "if ({}) {{",
                    condition_text(&Condition::FieldIsNull(field.clone()))
                ));
                match failure {
                    Failure::Fatal(message) => {
                        output.line(&format!("throw RuntimeException({})", string_literal(message)));
                    }
                    Failure::Diagnostic(message) => output.line(&self.log(ctx, message)),
                }
                output.close("}");
            }
            Stmt::Log(message) => output.line(&self.log(ctx, message)),
        }
    }

    fn log(&self, ctx: &Names<'_>, message: &str) -> String {
        format!(
            "{}.e({}, {})",
            ctx.name(&self.config.runtime.log_facility),
            string_literal(&self.config.runtime.log_tag),
            string_literal(message)
        )
    }

    fn expr(&self, ctx: &Names<'_>, expr: &Expr) -> String {
        let registry = ctx.name(&self.config.runtime.registry);
        match expr {
            Expr::It => "it".to_string(),
            Expr::Source(source) => source_text(*source).to_string(),
            Expr::Read {
                accessor,
                key,
                fallback,
            } => match fallback {
                Some(field) => format!(
                    "it.{}({}, {SUBSTITUTE}.{})",
                    accessor_name(*accessor),
                    string_literal(key),
                    ident(field)
                ),
                None => format!("it.{}({})", accessor_name(*accessor), string_literal(key)),
            },
            Expr::ReadString { source, key } => {
                format!("{}?.getString({})", source_text(*source), string_literal(key))
            }
            Expr::ReadSerializable { source, key, ty } => {
                let read = match source {
                    ArgumentSource::IntentExtras => "intent?.getSerializableExtra",
                    ArgumentSource::Arguments => "arguments?.getSerializable",
                };
                format!(
                    "({SUBSTITUTE}.{read}({}) as? {})",
                    string_literal(key),
                    ctx.type_name(ty)
                )
            }
            Expr::ReadParcelable { source, key, ty } => {
                let read = match source {
                    ArgumentSource::IntentExtras => "intent?.getParcelableExtra",
                    ArgumentSource::Arguments => "arguments?.getParcelable",
                };
                format!("{SUBSTITUTE}.{read}<{}>({})", ctx.type_name(ty), string_literal(key))
            }
            Expr::ServiceByType(ty) => {
                // Class literals cannot carry type arguments.
                format!("{registry}.getInstance().navigation({}::class.java)", ctx.name(&ty.qualified_name))
            }
            Expr::ServiceByName { key, ty, nullable } => format!(
                "{registry}.getInstance().build({}).navigation() {} {}",
                string_literal(key),
                if *nullable { "as?" } else { "as" },
                ctx.type_name(ty)
            ),
            Expr::Deserialize { raw, ty } => {
                let ty = ctx.type_name(ty);
                format!(
                    "{DESERIALIZER}?.parseObject<{ty}>({}, (object : {}<{ty}>() {{}}).type)",
                    ident(raw),
                    ctx.name(&self.config.runtime.type_wrapper)
                )
            }
        }
    }
}

impl Generator for KotlinGenerator {
    fn generate(&self, unit: &GeneratedUnit) -> GenerateResult {
        let runtime = &self.config.runtime;
        let ctx = Names { unit };
        let mut output = Output::new();

        self.emit_header(unit, &mut output);
        output.open(&format!(
            "public class {} : {} {{",
            ident(&unit.generated_class_name),
            ctx.name(&runtime.injector_interface)
        ));
        output.line(&format!(
            "private var {DESERIALIZER}: {}? = null",
            ctx.name(&runtime.serialization_service)
        ));
        output.newline();
        output.open(&format!("override fun {INJECT_METHOD}({TARGET}: Any?) {{"));
        self.emit_stmts(&ctx, &unit.prelude, &mut output);
        for injection in &unit.injections {
            output.map_field(&injection.field);
            self.emit_stmts(&ctx, &injection.statements, &mut output);
            if let Some(check) = &injection.required_check {
                self.emit_stmt(&ctx, check, &mut output);
            }
        }
        output.close("}");
        output.close("}");

        let (code, mappings) = output.finish();
        GenerateResult { code, mappings }
    }
}

/// Decides how a qualified name is spelled inside one unit.
struct Names<'a> {
    unit: &'a GeneratedUnit,
}

impl Names<'_> {
    fn name(&self, qualified_name: &str) -> String {
        if self.unit.simple_names.contains(qualified_name) {
            simple_name(qualified_name).to_string()
        } else {
            qualified_name.to_string()
        }
    }

    fn type_name(&self, ty: &TypeRef) -> String {
        let mut rendered = self.name(&ty.qualified_name);
        if !ty.arguments.is_empty() {
            let arguments: Vec<String> = ty.arguments.iter().map(|arg| self.type_name(arg)).collect();
            rendered.push('<');
            rendered.push_str(&arguments.join(", "));
            rendered.push('>');
        }
        if ty.nullable {
            rendered.push('?');
        }
        rendered
    }
}

fn source_text(source: ArgumentSource) -> &'static str {
    match source {
        ArgumentSource::IntentExtras => "substitute.intent?.extras",
        ArgumentSource::Arguments => "substitute.arguments",
    }
}

fn accessor_name(accessor: Accessor) -> &'static str {
    match accessor {
        Accessor::Boolean => "getBoolean",
        Accessor::Byte => "getByte",
        Accessor::Short => "getShort",
        Accessor::Int => "getInt",
        Accessor::Long => "getLong",
        Accessor::Char => "getChar",
        Accessor::Float => "getFloat",
        Accessor::Double => "getDouble",
        Accessor::String => "getString",
    }
}

fn condition_text(condition: &Condition) -> String {
    match condition {
        Condition::ContainsKey(key) => format!("it.containsKey({})", string_literal(key)),
        Condition::NotNullOrEmpty(name) => format!("!{}.isNullOrEmpty()", ident(name)),
        Condition::DeserializerAvailable => format!("{DESERIALIZER} != null"),
        Condition::FieldIsNull(field) => format!("{SUBSTITUTE}.{} == null", ident(field)),
    }
}

/// Kotlin string literal with escapes for quotes, backslashes and templates.
pub fn string_literal(value: &str) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push('"');
    for c in value.chars() {
        match c {
            '"' => literal.push_str("\\\""),
            '\\' => literal.push_str("\\\\"),
            '$' => literal.push_str("\\$"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\t' => literal.push_str("\\t"),
            c => literal.push(c),
        }
    }
    literal.push('"');
    literal
}

/// Identifier, backtick-quoted when it is a keyword or not a plain identifier.
pub fn ident(name: &str) -> String {
    let mut chars = name.chars();
    let plain = chars
        .next()
        .is_some_and(|first| first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_');
    if plain && !HARD_KEYWORDS.contains(&name) {
        name.to_string()
    } else {
        format!("`{name}`")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_literal_escapes_templates() {
        assert_eq!(string_literal("a\"b"), "\"a\\\"b\"");
        assert_eq!(string_literal("$name"), "\"\\$name\"");
        assert_eq!(string_literal("c:\\d"), "\"c:\\\\d\"");
    }

    #[test]
    fn test_ident_quotes_dollar_names_and_keywords() {
        assert_eq!(ident("userId"), "userId");
        assert_eq!(ident("MainActivity$$ARouter$$Autowired"), "`MainActivity$$ARouter$$Autowired`");
        assert_eq!(ident("in"), "`in`");
        assert_eq!(ident("9lives"), "`9lives`");
    }
}
