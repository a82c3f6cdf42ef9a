//! Constraints attached to path nodes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use super::Value;
use crate::{Error, Result};

/// Constraint operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintOp {
    Equals,
    NotEquals,
    LessThan,
    LessThanEquals,
    GreaterThan,
    GreaterThanEquals,
    Matches,
    DoesNotMatch,
    IsNull,
    IsNotNull,
    Contains,
    DoesNotContain,
    /// Membership in a named bag.
    In,
    /// Non-membership in a named bag.
    NotIn,
}

impl ConstraintOp {
    pub const ALL: [ConstraintOp; 14] = [
        ConstraintOp::Equals,
        ConstraintOp::NotEquals,
        ConstraintOp::LessThan,
        ConstraintOp::LessThanEquals,
        ConstraintOp::GreaterThan,
        ConstraintOp::GreaterThanEquals,
        ConstraintOp::Matches,
        ConstraintOp::DoesNotMatch,
        ConstraintOp::IsNull,
        ConstraintOp::IsNotNull,
        ConstraintOp::Contains,
        ConstraintOp::DoesNotContain,
        ConstraintOp::In,
        ConstraintOp::NotIn,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            ConstraintOp::Equals => "=",
            ConstraintOp::NotEquals => "!=",
            ConstraintOp::LessThan => "<",
            ConstraintOp::LessThanEquals => "<=",
            ConstraintOp::GreaterThan => ">",
            ConstraintOp::GreaterThanEquals => ">=",
            ConstraintOp::Matches => "LIKE",
            ConstraintOp::DoesNotMatch => "NOT LIKE",
            ConstraintOp::IsNull => "IS NULL",
            ConstraintOp::IsNotNull => "IS NOT NULL",
            ConstraintOp::Contains => "CONTAINS",
            ConstraintOp::DoesNotContain => "DOES NOT CONTAIN",
            ConstraintOp::In => "IN",
            ConstraintOp::NotIn => "NOT IN",
        }
    }

    /// Unary operations ignore their operand.
    pub fn is_unary(&self) -> bool {
        matches!(self, ConstraintOp::IsNull | ConstraintOp::IsNotNull)
    }
}

impl fmt::Display for ConstraintOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for ConstraintOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ").to_ascii_uppercase();
        ConstraintOp::ALL
            .into_iter()
            .find(|op| op.symbol() == normalized)
            .ok_or_else(|| Error::UnknownOperation(s.to_string()))
    }
}

/// An operation applied to an operand, attached to a path node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Constraint {
    op: ConstraintOp,
    value: Value,
}

impl Constraint {
    pub fn new(op: ConstraintOp, value: impl Into<Value>) -> Self {
        Self { op, value: value.into() }
    }

    pub fn op(&self) -> ConstraintOp {
        self.op
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.op.is_unary() {
            write!(f, "{}", self.op)
        } else {
            write!(f, "{} {}", self.op, self.value)
        }
    }
}

/// The set of operations that test membership in a bag.
///
/// Supplied by whoever owns the bag machinery; the query model only asks
/// whether a constraint's operation is in the set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BagOps(SmallVec<[ConstraintOp; 4]>);

impl BagOps {
    pub fn new(ops: impl IntoIterator<Item = ConstraintOp>) -> Self {
        ops.into_iter().collect()
    }

    pub fn contains(&self, op: ConstraintOp) -> bool {
        self.0.contains(&op)
    }

    pub fn iter(&self) -> impl Iterator<Item = ConstraintOp> + '_ {
        self.0.iter().copied()
    }
}

impl Default for BagOps {
    fn default() -> Self {
        Self(smallvec![ConstraintOp::In, ConstraintOp::NotIn])
    }
}

impl FromIterator<ConstraintOp> for BagOps {
    fn from_iter<I: IntoIterator<Item = ConstraintOp>>(iter: I) -> Self {
        let mut ops: SmallVec<[ConstraintOp; 4]> = SmallVec::new();
        for op in iter {
            if !ops.contains(&op) {
                ops.push(op);
            }
        }
        Self(ops)
    }
}
