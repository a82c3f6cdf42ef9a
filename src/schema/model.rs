//! In-memory class model.
//!
//! This is the reference implementation of `SchemaResolver`.
//! A model is a named set of classes; each class declares attribute fields
//! (scalar typed, terminal in a path) and reference / collection fields
//! (typed by another class of the model, traversable).
//!
//! Models are built in code with the `with_*` builders or loaded from a
//! JSON model file:
//!
//! ```json
//! {
//!   "name": "company",
//!   "classes": [
//!     { "name": "Employee",
//!       "attributes": { "name": "String", "age": "Integer" },
//!       "references": { "department": "Department" } },
//!     { "name": "Department",
//!       "attributes": { "name": "String" },
//!       "collections": { "employees": "Employee" } }
//!   ]
//! }
//! ```

use std::path::Path;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::{ResolveError, SchemaResolver};
use crate::{Error, Result};

// ============================================================================
// Field & class descriptors
// ============================================================================

/// How a field relates its owner to its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    /// Scalar value; paths end here.
    Attribute,
    /// Single-valued link to another class.
    Reference,
    /// Many-valued link to another class.
    Collection,
}

/// A field declared on a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    pub type_name: String,
}

impl FieldDescriptor {
    pub fn is_attribute(&self) -> bool {
        self.kind == FieldKind::Attribute
    }
}

/// A class of the model and its fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDescriptor {
    name: String,
    fields: HashMap<String, FieldDescriptor>,
}

impl ClassDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), fields: HashMap::new() }
    }

    pub fn with_attribute(self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.with_field(name, FieldKind::Attribute, type_name)
    }

    pub fn with_reference(self, name: impl Into<String>, class: impl Into<String>) -> Self {
        self.with_field(name, FieldKind::Reference, class)
    }

    pub fn with_collection(self, name: impl Into<String>, class: impl Into<String>) -> Self {
        self.with_field(name, FieldKind::Collection, class)
    }

    fn with_field(mut self, name: impl Into<String>, kind: FieldKind, type_name: impl Into<String>) -> Self {
        let name = name.into();
        self.fields.insert(name.clone(), FieldDescriptor { name, kind, type_name: type_name.into() });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.values()
    }
}

// ============================================================================
// Model
// ============================================================================

/// A named class model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    name: String,
    classes: HashMap<String, ClassDescriptor>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), classes: HashMap::new() }
    }

    pub fn with_class(mut self, class: ClassDescriptor) -> Self {
        self.classes.insert(class.name.clone(), class);
        self
    }

    pub fn class(&self, name: &str) -> Option<&ClassDescriptor> {
        self.classes.get(name)
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassDescriptor> {
        self.classes.values()
    }

    /// Field descriptor for `owner.field`.
    pub fn field(&self, owner: &str, field: &str) -> std::result::Result<&FieldDescriptor, ResolveError> {
        let class = self
            .classes
            .get(owner)
            .ok_or_else(|| ResolveError::UnknownType(owner.to_string()))?;
        class.field(field).ok_or_else(|| ResolveError::UnknownField {
            owner: owner.to_string(),
            field: field.to_string(),
        })
    }

    /// Check that every reference and collection points at a declared class.
    pub fn validate(&self) -> Result<()> {
        for class in self.classes.values() {
            for field in class.fields.values() {
                if !field.is_attribute() && !self.classes.contains_key(&field.type_name) {
                    return Err(Error::Schema(format!(
                        "{}.{} refers to undeclared class '{}'",
                        class.name, field.name, field.type_name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON model definition.
    pub fn from_json(json: &str) -> Result<Self> {
        let def: ModelDef = serde_json::from_str(json)?;
        let model = Model::from(def);
        model.validate()?;
        tracing::debug!(model = %model.name, classes = model.classes.len(), "loaded model");
        Ok(model)
    }

    /// Read a JSON model file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    /// Serialize to the JSON model format.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&ModelDef::from(self))?)
    }
}

impl SchemaResolver for Model {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_root_type(&self, type_name: &str) -> bool {
        self.classes.contains_key(type_name)
    }

    fn resolve_field_type(&self, owner: &str, field: &str) -> std::result::Result<String, ResolveError> {
        self.field(owner, field).map(|f| f.type_name.clone())
    }
}

// ============================================================================
// JSON model format
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct ModelDef {
    name: String,
    #[serde(default)]
    classes: Vec<ClassDef>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ClassDef {
    name: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    attributes: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    references: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    collections: HashMap<String, String>,
}

impl From<ModelDef> for Model {
    fn from(def: ModelDef) -> Self {
        def.classes.into_iter().fold(Model::new(def.name), |model, class| {
            let mut desc = ClassDescriptor::new(class.name);
            for (name, ty) in class.attributes {
                desc = desc.with_attribute(name, ty);
            }
            for (name, ty) in class.references {
                desc = desc.with_reference(name, ty);
            }
            for (name, ty) in class.collections {
                desc = desc.with_collection(name, ty);
            }
            model.with_class(desc)
        })
    }
}

impl From<&Model> for ModelDef {
    fn from(model: &Model) -> Self {
        let mut classes: Vec<ClassDef> = model
            .classes
            .values()
            .map(|class| {
                let mut def = ClassDef {
                    name: class.name.clone(),
                    attributes: HashMap::new(),
                    references: HashMap::new(),
                    collections: HashMap::new(),
                };
                for field in class.fields.values() {
                    let bucket = match field.kind {
                        FieldKind::Attribute => &mut def.attributes,
                        FieldKind::Reference => &mut def.references,
                        FieldKind::Collection => &mut def.collections,
                    };
                    bucket.insert(field.name.clone(), field.type_name.clone());
                }
                def
            })
            .collect();
        classes.sort_by(|a, b| a.name.cmp(&b.name));
        ModelDef { name: model.name.clone(), classes }
    }
}
