//! # Schema Resolver Trait
//!
//! The contract between path queries and whatever knows the class model.
//! A query asks two things of it: which type a field of a given owner type
//! has, and whether a token names a class a path may start from.
//!
//! ## Implementations
//!
//! | Resolver | Module | Description |
//! |----------|--------|-------------|
//! | `Model` | `model` | In-memory class model, built in code or loaded from JSON |

pub mod model;

pub use model::{ClassDescriptor, FieldDescriptor, FieldKind, Model};

/// Why a schema lookup failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("unknown type '{0}'")]
    UnknownType(String),

    #[error("type '{owner}' has no field '{field}'")]
    UnknownField { owner: String, field: String },
}

/// Read-only view of a class model.
///
/// Resolvers are long-lived and shared between many queries, so they are
/// held behind an `Arc` and must be `Send + Sync`. Queries never mutate them.
pub trait SchemaResolver: Send + Sync + 'static {
    /// Name of the model. Two queries are bound to the same schema when
    /// their resolvers report the same name.
    fn name(&self) -> &str;

    /// Whether `type_name` is a class a path may start from.
    fn is_root_type(&self, type_name: &str) -> bool;

    /// Type of `field` on `owner`.
    fn resolve_field_type(&self, owner: &str, field: &str) -> Result<String, ResolveError>;
}
