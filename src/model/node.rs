//! Node in the path tree.

use super::{path, Constraint};
use crate::schema::SchemaResolver;
use crate::{Error, Result};

/// One position in a query's path tree.
///
/// The parent is held as its path string, not as a reference: it is looked
/// up in the owning query when needed, which keeps nodes independently
/// copyable between trees.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathNode {
    path: String,
    parent: Option<String>,
    field_name: String,
    type_name: String,
    constraints: Vec<Constraint>,
}

impl PathNode {
    /// A root node. The token is both the field name and the type; the schema
    /// is not consulted.
    pub fn root(type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Self {
            path: type_name.clone(),
            parent: None,
            field_name: type_name.clone(),
            type_name,
            constraints: Vec::new(),
        }
    }

    /// A child of `parent` reached through `field_name`, typed by the schema.
    pub fn child(parent: &PathNode, field_name: &str, schema: &dyn SchemaResolver) -> Result<Self> {
        let path = path::join(&parent.path, field_name);
        let type_name = schema
            .resolve_field_type(&parent.type_name, field_name)
            .map_err(|source| Error::UnresolvedPath { path: path.clone(), source })?;
        Ok(Self {
            path,
            parent: Some(parent.path.clone()),
            field_name: field_name.to_string(),
            type_name,
            constraints: Vec::new(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path of the parent node, `None` for a root.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// The path minus its last segment, `None` for a root.
    pub fn prefix(&self) -> Option<&str> {
        path::prefix(&self.path)
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Overwrite the resolved type.
    pub fn set_type(&mut self, type_name: impl Into<String>) {
        self.type_name = type_name.into();
    }

    pub fn depth(&self) -> usize {
        path::depth(&self.path)
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// The live constraint list.
    pub fn constraints_mut(&mut self) -> &mut Vec<Constraint> {
        &mut self.constraints
    }

    pub fn add_constraint(&mut self, constraint: Constraint) -> &mut Self {
        self.constraints.push(constraint);
        self
    }

    /// Copy type and constraints of `self` onto a freshly built node.
    ///
    /// The target keeps its own parent link; only the recorded type and the
    /// constraint list come from `self`.
    pub fn copy_onto(&self, target: &mut PathNode) {
        target.type_name = self.type_name.clone();
        target.constraints = self.constraints.clone();
    }
}
