//! # Path Query
//!
//! A query is a tree of [`PathNode`]s keyed by path, a view (the paths
//! selected as output columns) and, once an engine has run it, a
//! [`ResultsInfo`].
//!
//! ```text
//! add_node("Employee.department.name")
//!   → "Employee"                   (root, materialized)
//!   → "Employee.department"        (Department, materialized)
//!   → "Employee.department.name"   (String, returned)
//! ```
//!
//! Every dotted key's prefix is itself a key: adding a deep path creates
//! whatever ancestors are missing, in root-to-leaf order, so iterating
//! `nodes()` always yields a parent before any of its children.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use indexmap::IndexMap;

use crate::model::{path, BagOps, Constraint, PathNode, ResultsInfo, Value};
use crate::schema::{ResolveError, SchemaResolver};
use crate::{Error, Result};

/// A path-based query bound to one schema.
pub struct PathQuery {
    schema: Arc<dyn SchemaResolver>,
    nodes: IndexMap<String, PathNode>,
    view: Vec<String>,
    info: Option<ResultsInfo>,
}

impl PathQuery {
    /// An empty query over `schema`.
    pub fn new(schema: Arc<dyn SchemaResolver>) -> Self {
        Self {
            schema,
            nodes: IndexMap::new(),
            view: Vec::new(),
            info: None,
        }
    }

    pub fn schema(&self) -> &Arc<dyn SchemaResolver> {
        &self.schema
    }

    // ========================================================================
    // Nodes
    // ========================================================================

    /// All nodes, in insertion order.
    pub fn nodes(&self) -> &IndexMap<String, PathNode> {
        &self.nodes
    }

    pub fn node(&self, path: &str) -> Option<&PathNode> {
        self.nodes.get(path)
    }

    pub fn node_mut(&mut self, path: &str) -> Option<&mut PathNode> {
        self.nodes.get_mut(path)
    }

    pub fn contains_node(&self, path: &str) -> bool {
        self.nodes.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node `node` hangs off, looked up in this query.
    pub fn parent_of(&self, node: &PathNode) -> Option<&PathNode> {
        node.parent().and_then(|p| self.nodes.get(p))
    }

    /// Direct children of `path`, in insertion order.
    pub fn children_of<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a PathNode> + 'a {
        self.nodes.values().filter(move |n| n.parent() == Some(path))
    }

    /// Add a node for `path`, creating any missing ancestors first.
    ///
    /// Nothing is inserted unless every segment resolves. Adding a path that
    /// is already present replaces its node with a fresh one (constraints on
    /// the old node are dropped); the entry keeps its position and
    /// descendants stay linked, since they refer to it by path.
    pub fn add_node(&mut self, path: &str) -> Result<&mut PathNode> {
        path::validate(path)?;

        let mut ancestors = Vec::new();
        let node = self.plan_node(path, &mut ancestors)?;

        for ancestor in ancestors {
            tracing::debug!(path = ancestor.path(), type_name = ancestor.type_name(), "materialized ancestor");
            self.nodes.insert(ancestor.path().to_string(), ancestor);
        }
        if self.nodes.contains_key(path) {
            tracing::debug!(path, "replacing existing node");
        }
        let (index, _) = self.nodes.insert_full(path.to_string(), node);
        Ok(&mut self.nodes[index])
    }

    /// Build the node for `path`, pushing any ancestors that have to be
    /// created along with it onto `pending`, root first.
    fn plan_node(&self, path: &str, pending: &mut Vec<PathNode>) -> Result<PathNode> {
        let Some(prefix) = path::prefix(path) else {
            if !self.schema.is_root_type(path) {
                return Err(Error::UnresolvedPath {
                    path: path.to_string(),
                    source: ResolveError::UnknownType(path.to_string()),
                });
            }
            return Ok(PathNode::root(path));
        };
        let field_name = path::last_segment(path);

        if let Some(parent) = self.nodes.get(prefix) {
            return PathNode::child(parent, field_name, self.schema.as_ref());
        }

        let parent = self.plan_node(prefix, pending)?;
        let node = PathNode::child(&parent, field_name, self.schema.as_ref())?;
        pending.push(parent);
        Ok(node)
    }

    // ========================================================================
    // Bags
    // ========================================================================

    /// Operands of every `IN` / `NOT IN` constraint.
    pub fn bag_names(&self) -> Vec<&Value> {
        self.bag_names_with(&BagOps::default())
    }

    /// Operands of every constraint whose operation is in `ops`, node by node
    /// in insertion order, then constraint order within a node.
    pub fn bag_names_with(&self, ops: &BagOps) -> Vec<&Value> {
        self.nodes
            .values()
            .flat_map(PathNode::constraints)
            .filter(|c| ops.contains(c.op()))
            .map(Constraint::value)
            .collect()
    }

    // ========================================================================
    // View
    // ========================================================================

    pub fn view(&self) -> &[String] {
        &self.view
    }

    /// The live view. Entries are not checked against `nodes`.
    pub fn view_mut(&mut self) -> &mut Vec<String> {
        &mut self.view
    }

    pub fn set_view<I, S>(&mut self, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.view = paths.into_iter().map(Into::into).collect();
    }

    pub fn add_view(&mut self, path: impl Into<String>) {
        self.view.push(path.into());
    }

    // ========================================================================
    // Execution info
    // ========================================================================

    pub fn info(&self) -> Option<&ResultsInfo> {
        self.info.as_ref()
    }

    /// Record execution statistics. Only the first call succeeds.
    pub fn set_info(&mut self, info: ResultsInfo) -> Result<()> {
        if self.info.is_some() {
            return Err(Error::InfoAlreadySet);
        }
        self.info = Some(info);
        Ok(())
    }

    // ========================================================================
    // Cloning
    // ========================================================================

    /// A structurally equal, fully independent copy bound to the same schema.
    ///
    /// Each node is rebuilt against the copy's own parent node and then
    /// stamped with the type recorded on the original, so a schema that
    /// changed since the original was built cannot retype the copy. Fails if
    /// a field no longer resolves at all. Execution info is not copied.
    pub fn try_clone(&self) -> Result<PathQuery> {
        tracing::trace!(nodes = self.nodes.len(), "cloning path query");
        let mut query = PathQuery::new(Arc::clone(&self.schema));
        for (key, node) in &self.nodes {
            let copy = query.copy_node(node)?;
            query.nodes.insert(key.clone(), copy);
        }
        query.view = self.view.clone();
        Ok(query)
    }

    fn copy_node(&self, node: &PathNode) -> Result<PathNode> {
        let mut copy = match node.prefix().and_then(|p| self.nodes.get(p)) {
            Some(parent) => PathNode::child(parent, node.field_name(), self.schema.as_ref())?,
            None => PathNode::root(node.type_name()),
        };
        node.copy_onto(&mut copy);
        Ok(copy)
    }
}

// ============================================================================
// Structural equality
// ============================================================================

impl PartialEq for PathQuery {
    fn eq(&self, other: &Self) -> bool {
        self.schema.name() == other.schema.name()
            && self.nodes == other.nodes
            && self.view == other.view
    }
}

impl Eq for PathQuery {}

impl Hash for PathQuery {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.schema.name().hash(state);
        // Map equality ignores insertion order, so the hash must too.
        let mut entries: Vec<(&String, &PathNode)> = self.nodes.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.hash(state);
        self.view.hash(state);
    }
}

impl fmt::Debug for PathQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathQuery")
            .field("schema", &self.schema.name())
            .field("nodes", &self.nodes)
            .field("view", &self.view)
            .field("info", &self.info)
            .finish()
    }
}
