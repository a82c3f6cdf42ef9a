//! # Path Query Model
//!
//! The data a path query is made of: path strings, the nodes they name,
//! the constraints on those nodes and the statistics an engine records.
//!
//! This module is pure data — no I/O, no engine, no shared state.

pub mod path;
pub mod node;
pub mod constraint;
pub mod value;
pub mod info;

pub use node::PathNode;
pub use constraint::{BagOps, Constraint, ConstraintOp};
pub use value::Value;
pub use info::{InfoStatus, ResultsInfo};
