//! Statement tree for generated injectors.
//!
//! Nodes describe *what* the injector does, not how the target language spells
//! it. The Kotlin generator is the only place that knows the syntax.

use crate::model::{Role, TypeRef};

/// Where screen-like owners read their arguments from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentSource {
    /// Extras of the launching intent (screens).
    IntentExtras,
    /// Arguments bundle (screen fragments).
    Arguments,
}

impl ArgumentSource {
    pub fn for_role(role: Role) -> Option<Self> {
        match role {
            Role::Screen => Some(ArgumentSource::IntentExtras),
            Role::ScreenFragment => Some(ArgumentSource::Arguments),
            Role::ServiceConsumer | Role::Unknown => None,
        }
    }
}

/// Typed bundle accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessor {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Char,
    Float,
    Double,
    String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Value bound by the enclosing [`Stmt::Scoped`] block.
    It,
    /// The owner's argument bundle, itself nullable.
    Source(ArgumentSource),
    /// Typed read from the bound bundle; `fallback` is a field passed as default.
    Read {
        accessor: Accessor,
        key: String,
        fallback: Option<String>,
    },
    /// Nullable string read straight from the argument source.
    ReadString { source: ArgumentSource, key: String },
    /// Raw serializable read followed by a checked cast.
    ReadSerializable {
        source: ArgumentSource,
        key: String,
        ty: TypeRef,
    },
    ReadParcelable {
        source: ArgumentSource,
        key: String,
        ty: TypeRef,
    },
    ServiceByType(TypeRef),
    /// By-name lookup followed by a downcast to `ty`; a safe cast when the
    /// field itself is nullable.
    ServiceByName { key: String, ty: TypeRef, nullable: bool },
    /// Deserialize the string held in local `raw` into `ty`.
    Deserialize { raw: String, ty: TypeRef },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// The bound bundle contains `key`.
    ContainsKey(String),
    NotNullOrEmpty(String),
    DeserializerAvailable,
    FieldIsNull(String),
}

/// What a failed required-field check does at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// Throw; the injector call fails.
    Fatal(String),
    /// Log and carry on.
    Diagnostic(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// Look up the optional deserializer service once per injector call.
    ResolveDeserializer,
    /// Cast the untyped target to the owner type or fail with `message`.
    BindTarget { owner: TypeRef, message: String },
    Assign { field: String, value: Expr },
    Local { name: String, value: Expr },
    /// Run `body` with the value of `subject` bound, only if it is non-null.
    Scoped { subject: Expr, body: Vec<Stmt> },
    If {
        condition: Condition,
        then_branch: Vec<Stmt>,
        else_branch: Option<Vec<Stmt>>,
    },
    /// Required-field validation.
    Require { field: String, failure: Failure },
    Log(String),
}

impl Stmt {
    /// Child statement lists, in source order.
    pub fn children(&self) -> Vec<&[Stmt]> {
        match self {
            Stmt::Scoped { body, .. } => vec![body.as_slice()],
            Stmt::If {
                then_branch,
                else_branch,
                ..
            } => {
                let mut children = vec![then_branch.as_slice()];
                if let Some(else_branch) = else_branch {
                    children.push(else_branch.as_slice());
                }
                children
            }
            Stmt::ResolveDeserializer
            | Stmt::BindTarget { .. }
            | Stmt::Assign { .. }
            | Stmt::Local { .. }
            | Stmt::Require { .. }
            | Stmt::Log(_) => Vec::new(),
        }
    }

    /// Expressions held directly by this statement.
    pub fn exprs(&self) -> Vec<&Expr> {
        match self {
            Stmt::Assign { value, .. } | Stmt::Local { value, .. } => vec![value],
            Stmt::Scoped { subject, .. } => vec![subject],
            _ => Vec::new(),
        }
    }
}
