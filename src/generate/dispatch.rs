//! Strategy dispatcher: one property → the statements that inject it.

use crate::ast::{Accessor, ArgumentSource, Condition, Expr, Failure, Stmt};
use crate::error::{ErrorKind, GenerateError, UsageError};
use crate::model::{AnnotatedProperty, ClassRef};
use crate::resolve::TypeCategory;

/// Local holding the raw string handed to the deserializer.
const RAW_LOCAL: &str = "res";

/// Injection strategy for a single property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Service-registry lookup. Works for any owner role.
    Provider,
    Primitive(Accessor),
    Str,
    /// Raw read plus checked cast.
    Cast(CastKind),
    /// String read handed to the optional deserializer.
    Object,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastKind {
    Serializable,
    Parcelable,
}

impl Strategy {
    /// `None` means the category has no strategy, which the resolver must never produce.
    pub fn select(category: TypeCategory) -> Option<Self> {
        match category {
            TypeCategory::Provider => Some(Strategy::Provider),
            TypeCategory::Bool
            | TypeCategory::Byte
            | TypeCategory::Short
            | TypeCategory::Int
            | TypeCategory::Long
            | TypeCategory::Char
            | TypeCategory::Float
            | TypeCategory::Double => category.primitive_accessor().map(Strategy::Primitive),
            TypeCategory::Str => Some(Strategy::Str),
            TypeCategory::Serializable => Some(Strategy::Cast(CastKind::Serializable)),
            TypeCategory::Parcelable => Some(Strategy::Cast(CastKind::Parcelable)),
            TypeCategory::Object => Some(Strategy::Object),
        }
    }
}

/// Statements injecting one field, plus its validation if the field is required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInjection {
    pub field: String,
    pub category: TypeCategory,
    pub strategy: Strategy,
    pub statements: Vec<Stmt>,
    pub required_check: Option<Stmt>,
}

pub fn dispatch(
    property: &AnnotatedProperty,
    category: TypeCategory,
    owner: &ClassRef,
) -> Result<FieldInjection, GenerateError> {
    let strategy = Strategy::select(category).ok_or_else(|| GenerateError::UnreachableCategory {
        category,
        field: property.name.clone(),
    })?;
    let source = || argument_source(property, owner);

    let statements = match strategy {
        Strategy::Provider => provider(property),
        Strategy::Primitive(accessor) => primitive(property, source()?, accessor),
        Strategy::Str => string(property, source()?),
        Strategy::Cast(kind) => cast(property, source()?, kind),
        Strategy::Object => object(property, source()?, owner),
    };

    tracing::debug!(
        field = %property.name,
        owner = %owner.simple_name(),
        ?category,
        "dispatched injection strategy"
    );

    Ok(FieldInjection {
        field: property.name.clone(),
        category,
        strategy,
        statements,
        required_check: required_check(property, category, strategy, owner),
    })
}

fn argument_source(property: &AnnotatedProperty, owner: &ClassRef) -> Result<ArgumentSource, UsageError> {
    ArgumentSource::for_role(owner.role).ok_or_else(|| {
        UsageError::new(
            ErrorKind::UnsupportedOwnerRole,
            format!(
                "The field [{}] need autowired from intent, its parent must be activity or fragment!",
                property.name
            ),
            &property.name,
        )
        .with_owner(&owner.qualified_name)
        .with_source_file(owner.source_file.as_deref())
        .with_help(format!(
            "owner role is {:?}; only service providers can be injected outside screens",
            owner.role
        ))
    })
}

fn provider(property: &AnnotatedProperty) -> Vec<Stmt> {
    let ty = property.declared_type.non_null();
    let value = match property.annotation.key() {
        None => Expr::ServiceByType(ty),
        Some(key) => Expr::ServiceByName {
            key: key.to_string(),
            ty,
            nullable: property.is_nullable(),
        },
    };
    vec![Stmt::Assign {
        field: property.name.clone(),
        value,
    }]
}

fn primitive(property: &AnnotatedProperty, source: ArgumentSource, accessor: Accessor) -> Vec<Stmt> {
    let key = property.bundle_key().to_string();
    let body = if property.is_nullable() {
        // No usable default for a nullable primitive, so only read when present.
        vec![Stmt::If {
            condition: Condition::ContainsKey(key.clone()),
            then_branch: vec![Stmt::Assign {
                field: property.name.clone(),
                value: Expr::Read {
                    accessor,
                    key,
                    fallback: None,
                },
            }],
            else_branch: None,
        }]
    } else {
        vec![Stmt::Assign {
            field: property.name.clone(),
            value: Expr::Read {
                accessor,
                key,
                fallback: Some(property.name.clone()),
            },
        }]
    };
    vec![Stmt::Scoped {
        subject: Expr::Source(source),
        body,
    }]
}

fn string(property: &AnnotatedProperty, source: ArgumentSource) -> Vec<Stmt> {
    vec![Stmt::Scoped {
        subject: Expr::Source(source),
        body: vec![Stmt::Assign {
            field: property.name.clone(),
            value: Expr::Read {
                accessor: Accessor::String,
                key: property.bundle_key().to_string(),
                fallback: Some(property.name.clone()),
            },
        }],
    }]
}

fn cast(property: &AnnotatedProperty, source: ArgumentSource, kind: CastKind) -> Vec<Stmt> {
    let key = property.bundle_key().to_string();
    let ty = property.declared_type.non_null();
    let subject = match kind {
        CastKind::Serializable => Expr::ReadSerializable { source, key, ty },
        CastKind::Parcelable => Expr::ReadParcelable { source, key, ty },
    };
    vec![Stmt::Scoped {
        subject,
        body: vec![Stmt::Assign {
            field: property.name.clone(),
            value: Expr::It,
        }],
    }]
}

fn object(property: &AnnotatedProperty, source: ArgumentSource, owner: &ClassRef) -> Vec<Stmt> {
    let message = format!(
        "You want automatic inject the field '{}' in class '{}', then you should implement 'SerializationService' to support object auto inject!",
        property.name,
        owner.simple_name()
    );
    let deserialize = Stmt::Scoped {
        subject: Expr::Deserialize {
            raw: RAW_LOCAL.to_string(),
            ty: property.declared_type.non_null(),
        },
        body: vec![Stmt::Assign {
            field: property.name.clone(),
            value: Expr::It,
        }],
    };
    vec![Stmt::If {
        condition: Condition::DeserializerAvailable,
        then_branch: vec![
            Stmt::Local {
                name: RAW_LOCAL.to_string(),
                value: Expr::ReadString {
                    source,
                    key: property.bundle_key().to_string(),
                },
            },
            Stmt::If {
                condition: Condition::NotNullOrEmpty(RAW_LOCAL.to_string()),
                then_branch: vec![deserialize],
                else_branch: None,
            },
        ],
        else_branch: Some(vec![Stmt::Log(message)]),
    }]
}

/// Primitives always hold a value and are never validated.
fn required_check(
    property: &AnnotatedProperty,
    category: TypeCategory,
    strategy: Strategy,
    owner: &ClassRef,
) -> Option<Stmt> {
    if !property.annotation.required || category.is_primitive() {
        return None;
    }
    let failure = if strategy == Strategy::Provider {
        Failure::Fatal(format!(
            "The field '{}' is null, in class '{}' !",
            property.name,
            owner.simple_name()
        ))
    } else {
        Failure::Diagnostic(format!(
            "The field '{}' in class '{}' is null!",
            property.name,
            owner.simple_name()
        ))
    };
    Some(Stmt::Require {
        field: property.name.clone(),
        failure,
    })
}
