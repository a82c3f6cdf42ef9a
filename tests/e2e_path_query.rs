//! End-to-end tests for building path queries.
//!
//! Each test builds a query against an in-memory `Model`, then checks
//! node materialization, constraints, views and bag extraction.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use pathquery::{
    BagOps, ClassDescriptor, Constraint, ConstraintOp, Error, Model, PathQuery, ResolveError,
    SchemaResolver, Value,
};
use pretty_assertions::assert_eq;

// ============================================================================
// Helper: the Employee / Department model.
// ============================================================================

fn company() -> Arc<Model> {
    Arc::new(
        Model::new("company")
            .with_class(
                ClassDescriptor::new("Employee")
                    .with_attribute("name", "String")
                    .with_attribute("age", "Integer")
                    .with_reference("department", "Department"),
            )
            .with_class(
                ClassDescriptor::new("Department")
                    .with_attribute("name", "String")
                    .with_collection("employees", "Employee"),
            ),
    )
}

fn keys(q: &PathQuery) -> Vec<&str> {
    q.nodes().keys().map(String::as_str).collect()
}

fn hash_of(q: &PathQuery) -> u64 {
    let mut h = DefaultHasher::new();
    q.hash(&mut h);
    h.finish()
}

// ============================================================================
// 1. The Employee.department.name walkthrough
// ============================================================================

#[test]
fn test_employee_department_walkthrough() {
    let mut q = PathQuery::new(company());

    q.add_node("Employee").unwrap();
    let leaf = q.add_node("Employee.department.name").unwrap();
    assert_eq!(leaf.type_name(), "String");

    assert_eq!(keys(&q), vec!["Employee", "Employee.department", "Employee.department.name"]);
    assert_eq!(q.node("Employee.department").unwrap().type_name(), "Department");

    q.set_view(["Employee.department.name"]);
    assert_eq!(q.view(), &["Employee.department.name".to_string()]);

    q.node_mut("Employee.department")
        .unwrap()
        .add_constraint(Constraint::new(ConstraintOp::Equals, "Sales"));
    assert!(q.bag_names().is_empty());

    q.node_mut("Employee.department")
        .unwrap()
        .add_constraint(Constraint::new(ConstraintOp::In, "myDeptBag"));
    assert_eq!(q.bag_names(), vec![&Value::from("myDeptBag")]);
}

// ============================================================================
// 2. Ancestor materialization without explicit registration
// ============================================================================

#[test]
fn test_deep_add_creates_every_ancestor() {
    let mut q = PathQuery::new(company());
    q.add_node("Employee.department.employees.department.name").unwrap();

    assert_eq!(
        keys(&q),
        vec![
            "Employee",
            "Employee.department",
            "Employee.department.employees",
            "Employee.department.employees.department",
            "Employee.department.employees.department.name",
        ]
    );
    for node in q.nodes().values() {
        match node.prefix() {
            Some(prefix) => {
                assert!(q.contains_node(prefix), "missing ancestor {prefix}");
                assert_eq!(q.parent_of(node).unwrap().path(), prefix);
            }
            None => assert!(node.is_root()),
        }
    }
}

#[test]
fn test_existing_ancestors_are_reused() {
    let mut q = PathQuery::new(company());
    q.add_node("Employee.department")
        .unwrap()
        .add_constraint(Constraint::new(ConstraintOp::IsNotNull, Value::Null));
    q.add_node("Employee.department.name").unwrap();

    assert_eq!(q.len(), 3);
    assert_eq!(q.node("Employee.department").unwrap().constraints().len(), 1);
}

// ============================================================================
// 3. Failures
// ============================================================================

#[test]
fn test_unknown_field_reports_full_path() {
    let mut q = PathQuery::new(company());
    match q.add_node("Employee.department.budget") {
        Err(Error::UnresolvedPath { path, source }) => {
            assert_eq!(path, "Employee.department.budget");
            assert_eq!(
                source,
                ResolveError::UnknownField { owner: "Department".into(), field: "budget".into() }
            );
        }
        other => panic!("expected UnresolvedPath, got {other:?}"),
    }
    assert!(q.is_empty(), "a failed add must not leave partial ancestors");
}

#[test]
fn test_traversing_an_attribute_fails() {
    let mut q = PathQuery::new(company());
    let err = q.add_node("Employee.name.length").unwrap_err();
    assert!(matches!(
        err,
        Error::UnresolvedPath { source: ResolveError::UnknownType(ref t), .. } if t == "String"
    ));
}

#[test]
fn test_malformed_paths() {
    let mut q = PathQuery::new(company());
    for bad in ["", "Employee.", ".Employee", "Employee..department"] {
        assert!(
            matches!(q.add_node(bad), Err(Error::MalformedPath { .. })),
            "{bad:?} should be malformed"
        );
    }
    assert!(q.is_empty());
}

#[test]
fn test_error_messages() {
    let mut q = PathQuery::new(company());
    let err = q.add_node("Employee.salary").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unresolved path 'Employee.salary': type 'Employee' has no field 'salary'"
    );
}

// ============================================================================
// 4. View is unchecked
// ============================================================================

#[test]
fn test_view_allows_duplicates_and_dangling_paths() {
    let mut q = PathQuery::new(company());
    q.add_node("Employee.name").unwrap();
    q.add_view("Employee.name");
    q.add_view("Employee.name");
    q.view_mut().push("Department.name".into());
    assert_eq!(q.view().len(), 3);
}

// ============================================================================
// 5. Bags
// ============================================================================

#[test]
fn test_bag_names_with_custom_ops() {
    let mut q = PathQuery::new(company());
    q.add_node("Employee.name")
        .unwrap()
        .add_constraint(Constraint::new(ConstraintOp::Contains, "watchlist"))
        .add_constraint(Constraint::new(ConstraintOp::In, "staff"));

    let ops = BagOps::new([ConstraintOp::Contains]);
    assert_eq!(q.bag_names_with(&ops), vec![&Value::from("watchlist")]);
    assert_eq!(q.bag_names(), vec![&Value::from("staff")]);
}

#[test]
fn test_removing_constraint_removes_bag() {
    let mut q = PathQuery::new(company());
    q.add_node("Employee")
        .unwrap()
        .add_constraint(Constraint::new(ConstraintOp::In, "staff"));
    q.node_mut("Employee").unwrap().constraints_mut().clear();
    assert!(q.bag_names().is_empty());
}

// ============================================================================
// 6. Equality and hashing
// ============================================================================

fn build(schema: Arc<Model>, view: &[&str]) -> PathQuery {
    let mut q = PathQuery::new(schema);
    q.add_node("Employee.department.name")
        .unwrap()
        .add_constraint(Constraint::new(ConstraintOp::Matches, "S%"));
    q.add_node("Employee.age")
        .unwrap()
        .add_constraint(Constraint::new(ConstraintOp::GreaterThan, 30));
    q.set_view(view.iter().copied());
    q
}

#[test]
fn test_identical_queries_are_equal() {
    let schema = company();
    let a = build(schema.clone(), &["Employee.age", "Employee.department.name"]);
    let b = build(schema, &["Employee.age", "Employee.department.name"]);
    assert_eq!(a, a);
    assert_eq!(a, b);
    assert_eq!(b, a);
    assert_eq!(hash_of(&a), hash_of(&b));
}

#[test]
fn test_view_order_matters() {
    let schema = company();
    let a = build(schema.clone(), &["Employee.age", "Employee.department.name"]);
    let b = build(schema, &["Employee.department.name", "Employee.age"]);
    assert_ne!(a, b);
}

#[test]
fn test_constraint_difference_breaks_equality() {
    let schema = company();
    let a = build(schema.clone(), &["Employee.age"]);
    let mut b = build(schema, &["Employee.age"]);
    b.node_mut("Employee.age").unwrap().constraints_mut()[0] =
        Constraint::new(ConstraintOp::GreaterThan, 31);
    assert_ne!(a, b);
}

#[test]
fn test_different_schema_breaks_equality() {
    let a = build(company(), &["Employee.age"]);
    let other = Model::new("company-v2")
        .with_class(
            ClassDescriptor::new("Employee")
                .with_attribute("age", "Integer")
                .with_reference("department", "Department"),
        )
        .with_class(ClassDescriptor::new("Department").with_attribute("name", "String"));
    let b = build(Arc::new(other), &["Employee.age"]);
    assert_eq!(a.nodes(), b.nodes());
    assert_ne!(a, b);
}

#[test]
fn test_schema_is_shared_not_copied() {
    let schema = company();
    let q = PathQuery::new(schema.clone());
    assert_eq!(q.schema().name(), "company");
    assert_eq!(Arc::strong_count(&schema), 2);
}
