//! Objectives and the values candidates achieve in them.

use std::{cmp::Ordering, fmt};

use crate::score::{Score, INFEASIBLE_SCORE};

/// Optimization direction of an [`Objective`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub enum Sign {
  /// Lower values are better.
  #[default]
  Min,
  /// Higher values are better.
  Max,
}

impl fmt::Display for Sign {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Sign::Min => write!(f, "MIN"),
      Sign::Max => write!(f, "MAX"),
    }
  }
}

/// A named optimization goal.
///
/// Objectives are ordered by name first, so a collection keyed by objectives
/// has the same order for every candidate of an optimization run.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Objective {
  name: String,
  sign: Sign,
}

impl Objective {
  /// Creates a new objective.
  pub fn new(name: impl Into<String>, sign: Sign) -> Self {
    Self {
      name: name.into(),
      sign,
    }
  }

  /// Creates an objective to be minimized.
  pub fn min(name: impl Into<String>) -> Self {
    Self::new(name, Sign::Min)
  }

  /// Creates an objective to be maximized.
  pub fn max(name: impl Into<String>) -> Self {
    Self::new(name, Sign::Max)
  }

  /// Returns the name of the objective.
  pub fn name(&self) -> &str {
    &self.name
  }

  /// Returns the optimization direction of the objective.
  pub fn sign(&self) -> Sign {
    self.sign
  }

  /// Transforms `value` into a minimization score: missing values become
  /// [`INFEASIBLE_SCORE`], values of maximized objectives are negated.
  pub fn minimize(&self, value: &Value) -> Score {
    match (value.as_f64(), self.sign) {
      (None, _) => INFEASIBLE_SCORE,
      (Some(v), Sign::Max) => -v,
      (Some(v), Sign::Min) => v,
    }
  }
}

impl From<&str> for Objective {
  fn from(name: &str) -> Self {
    Self::min(name)
  }
}

impl fmt::Display for Objective {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}({})", self.name, self.sign)
  }
}

/// A value achieved in some objective.
///
/// Values compare numerically regardless of their representation. An
/// infeasible value is greater (worse) than any present value.
#[derive(Clone, Copy, Debug, Default)]
pub enum Value {
  /// A floating point value.
  Double(f64),
  /// An integer value.
  Integer(i64),
  /// No value, e.g. the candidate violates a constraint.
  #[default]
  Infeasible,
}

impl Value {
  /// Returns the numeric value, or `None` if the value is infeasible.
  pub fn as_f64(&self) -> Option<f64> {
    match *self {
      Value::Double(v) => Some(v),
      Value::Integer(v) => Some(v as f64),
      Value::Infeasible => None,
    }
  }

  /// Returns `true` if there is no value.
  pub fn is_infeasible(&self) -> bool {
    self.as_f64().is_none()
  }
}

impl PartialEq for Value {
  fn eq(&self, other: &Self) -> bool {
    self.partial_cmp(other) == Some(Ordering::Equal)
  }
}

impl PartialOrd for Value {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    match (self.as_f64(), other.as_f64()) {
      (Some(a), Some(b)) => a.partial_cmp(&b),
      (Some(_), None) => Some(Ordering::Less),
      (None, Some(_)) => Some(Ordering::Greater),
      (None, None) => Some(Ordering::Equal),
    }
  }
}

impl From<f64> for Value {
  fn from(value: f64) -> Self {
    Value::Double(value)
  }
}

impl From<i64> for Value {
  fn from(value: i64) -> Self {
    Value::Integer(value)
  }
}

impl From<i32> for Value {
  fn from(value: i32) -> Self {
    Value::Integer(value.into())
  }
}

impl From<Option<f64>> for Value {
  fn from(value: Option<f64>) -> Self {
    value.map_or(Value::Infeasible, Value::Double)
  }
}

impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Value::Double(v) => write!(f, "{v}"),
      Value::Integer(v) => write!(f, "{v}"),
      Value::Infeasible => write!(f, "infeasible"),
    }
  }
}
