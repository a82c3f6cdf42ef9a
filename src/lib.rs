//! # pathquery — Path-Based Query Model
//!
//! Queries over a typed class model, built by naming dot-separated field
//! traversals ("paths"), constraining any of them and picking some as
//! output columns ("view"). An external engine compiles and runs the result.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `SchemaResolver` is the contract between queries and the class model
//! 2. **Parents by path**: nodes refer to their parent by path string, never by reference
//! 3. **All or nothing**: a failed resolution leaves the query unchanged
//! 4. **No execution**: the engine only reads `nodes`/`view` and writes `info`
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use pathquery::{ClassDescriptor, Constraint, ConstraintOp, Model, PathQuery, Value};
//!
//! # fn example() -> pathquery::Result<()> {
//! let model = Model::new("company")
//!     .with_class(ClassDescriptor::new("Employee").with_reference("department", "Department"))
//!     .with_class(ClassDescriptor::new("Department").with_attribute("name", "String"));
//!
//! let mut query = PathQuery::new(Arc::new(model));
//! query.add_node("Employee.department.name")?;
//! query.set_view(["Employee.department.name"]);
//! query
//!     .node_mut("Employee.department")
//!     .expect("materialized by add_node")
//!     .add_constraint(Constraint::new(ConstraintOp::In, "myDeptBag"));
//!
//! assert_eq!(query.bag_names(), vec![&Value::from("myDeptBag")]);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod schema;
pub mod query;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    PathNode, Constraint, ConstraintOp, BagOps, Value,
    ResultsInfo, InfoStatus,
};

// ============================================================================
// Re-exports: Schema
// ============================================================================

pub use schema::{
    SchemaResolver, ResolveError,
    Model, ClassDescriptor, FieldDescriptor, FieldKind,
};

// ============================================================================
// Re-exports: Query
// ============================================================================

pub use query::PathQuery;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed path '{path}': {reason}")]
    MalformedPath { path: String, reason: String },

    #[error("Unresolved path '{path}': {source}")]
    UnresolvedPath {
        path: String,
        #[source]
        source: ResolveError,
    },

    #[error("Unknown constraint operation: {0}")]
    UnknownOperation(String),

    #[error("Execution info already recorded for this query")]
    InfoAlreadySet,

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
