//! Minimization vectors and the Pareto relations defined on them.
//!
//! Every comparison in this crate happens on slices of [`Score`]s, the
//! objective values of a candidate already transformed so that lower is
//! better in each dimension. See [`Objectives::array`] for the transformation.
//!
//! [`Objectives::array`]: crate::objectives::Objectives::array

use std::cmp::Ordering;

/// An alias for a transformed objective value. The lower - the better.
pub type Score = f64;

/// The score that stands in for a missing or infeasible objective value.
/// No feasible score is worse than this one.
pub const INFEASIBLE_SCORE: Score = f64::MAX;

/// Describes pareto dominance for slices of `Score`s.
///
/// All methods expect both slices to have the same length.
///
/// # Panics
///
/// Every method panics if the slices differ in length.
pub trait ParetoDominance {
  /// Returns `Less` if `self` dominates `other`, `Greater` if `other`
  /// dominates `self`, otherwise `Equal`. `Equal` therefore means that
  /// the vectors are either identical or mutually non-dominated.
  fn dominance(&self, other: &Self) -> Ordering;

  /// Returns `true` if `self` is no worse than `other` in every dimension and
  /// strictly better in at least one.
  fn dominates(&self, other: &Self) -> bool {
    self.dominance(other) == Ordering::Less
  }

  /// Returns `true` if `self` is no worse than `other` in every dimension.
  fn weakly_dominates(&self, other: &Self) -> bool;

  /// Returns `true` if all components are equal.
  fn equals_by_value(&self, other: &Self) -> bool;

  /// Euclidean distance between two vectors.
  fn distance(&self, other: &Self) -> f64;
}

fn check_dimensions(a: &[Score], b: &[Score]) {
  assert_eq!(
    a.len(),
    b.len(),
    "objective vectors differ in length: {} and {}",
    a.len(),
    b.len()
  );
}

impl ParetoDominance for [Score] {
  fn dominance(&self, other: &Self) -> Ordering {
    check_dimensions(self, other);
    let mut ord = Ordering::Equal;
    for (a, b) in self.iter().zip(other) {
      // NaN is neither better nor worse
      match (ord, a.partial_cmp(b).unwrap_or(Ordering::Equal)) {
        (Ordering::Equal, next_ord) => ord = next_ord,
        (Ordering::Greater, Ordering::Less)
        | (Ordering::Less, Ordering::Greater) => return Ordering::Equal,
        _ => {}
      }
    }
    ord
  }

  fn weakly_dominates(&self, other: &Self) -> bool {
    check_dimensions(self, other);
    !self.iter().zip(other).any(|(a, b)| b < a)
  }

  fn equals_by_value(&self, other: &Self) -> bool {
    check_dimensions(self, other);
    self.iter().zip(other).all(|(a, b)| a == b)
  }

  fn distance(&self, other: &Self) -> f64 {
    check_dimensions(self, other);
    self
      .iter()
      .zip(other)
      .map(|(a, b)| (a - b) * (a - b))
      .sum::<f64>()
      .sqrt()
  }
}
