//! The objective values of a single candidate.

use std::{
  collections::{btree_map, BTreeMap},
  fmt,
  sync::OnceLock,
};

use crate::{
  objective::{Objective, Value},
  score::{ParetoDominance, Score},
};

/// An ordered mapping of [`Objective`]s to the [`Value`]s a candidate achieves
/// in them.
///
/// Comparisons between `Objectives` are performed on the *minimization
/// array*: one [`Score`] per entry, in objective order, where infeasible
/// values are replaced with [`INFEASIBLE_SCORE`] and values of maximized
/// objectives are negated. The array is built on first use and cached until
/// the next [`add`](Objectives::add). Readers on other threads never observe
/// a partially built array.
///
/// All `Objectives` compared with each other are expected to have the same
/// set of objectives. Comparing `Objectives` with a different number of
/// entries panics.
///
/// [`INFEASIBLE_SCORE`]: crate::score::INFEASIBLE_SCORE
#[derive(Clone, Default)]
pub struct Objectives {
  entries: BTreeMap<Objective, Value>,
  array: OnceLock<Vec<Score>>,
}

impl Objectives {
  /// Creates empty `Objectives`.
  pub fn new() -> Self {
    Self::default()
  }

  /// Sets `value` for `objective`, replacing a previous value.
  pub fn add(&mut self, objective: Objective, value: impl Into<Value>) {
    self.entries.insert(objective, value.into());
    self.array = OnceLock::new();
  }

  /// Builder form of [`add`](Objectives::add).
  pub fn with(mut self, objective: Objective, value: impl Into<Value>) -> Self {
    self.add(objective, value);
    self
  }

  /// Copies every entry of `other` into `self`.
  pub fn add_all(&mut self, other: &Objectives) {
    self
      .entries
      .extend(other.entries.iter().map(|(o, v)| (o.clone(), *v)));
    self.array = OnceLock::new();
  }

  /// Returns the value achieved in `objective`.
  pub fn get(&self, objective: &Objective) -> Option<&Value> {
    self.entries.get(objective)
  }

  /// Iterates over objectives in order.
  pub fn keys(&self) -> impl Iterator<Item = &Objective> {
    self.entries.keys()
  }

  /// Iterates over values in objective order.
  pub fn values(&self) -> impl Iterator<Item = &Value> {
    self.entries.values()
  }

  /// Iterates over `(objective, value)` pairs in objective order.
  pub fn iter(&self) -> btree_map::Iter<'_, Objective, Value> {
    self.entries.iter()
  }

  /// Returns the number of objectives.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Returns `true` if there are no objectives.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Returns the minimization array.
  pub fn array(&self) -> &[Score] {
    self.array.get_or_init(|| {
      self
        .entries
        .iter()
        .map(|(objective, value)| objective.minimize(value))
        .collect()
    })
  }

  /// Returns `true` if `self` is no worse than `other` in every objective.
  pub fn weakly_dominates(&self, other: &Objectives) -> bool {
    self.array().weakly_dominates(other.array())
  }

  /// Returns `true` if `self` is no worse than `other` in every objective and
  /// strictly better in at least one.
  pub fn dominates(&self, other: &Objectives) -> bool {
    self.array().dominates(other.array())
  }

  /// Returns `true` if both minimization arrays are equal.
  pub fn equals_by_value(&self, other: &Objectives) -> bool {
    self.array().equals_by_value(other.array())
  }

  /// Euclidean distance between both minimization arrays.
  pub fn distance(&self, other: &Objectives) -> f64 {
    self.array().distance(other.array())
  }
}

impl PartialEq for Objectives {
  fn eq(&self, other: &Self) -> bool {
    self.entries == other.entries
  }
}

impl fmt::Debug for Objectives {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_map().entries(self.entries.iter()).finish()
  }
}

impl fmt::Display for Objectives {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, (objective, value)) in self.entries.iter().enumerate() {
      if i > 0 {
        write!(f, " ")?;
      }
      write!(f, "{objective}={value}")?;
    }
    Ok(())
  }
}

impl FromIterator<(Objective, Value)> for Objectives {
  fn from_iter<T: IntoIterator<Item = (Objective, Value)>>(iter: T) -> Self {
    Self {
      entries: iter.into_iter().collect(),
      array: OnceLock::new(),
    }
  }
}

impl<'a> IntoIterator for &'a Objectives {
  type Item = (&'a Objective, &'a Value);
  type IntoIter = btree_map::Iter<'a, Objective, Value>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::score::INFEASIBLE_SCORE;

  fn two(a: f64, b: f64) -> Objectives {
    Objectives::new()
      .with(Objective::min("a"), a)
      .with(Objective::min("b"), b)
  }

  #[test]
  fn test_array_follows_objective_order_and_sign() {
    let objectives = Objectives::new()
      .with(Objective::max("profit"), 3.0)
      .with(Objective::min("cost"), 2.0)
      .with(Objective::min("area"), Value::Infeasible);
    assert_eq!(objectives.array(), &[INFEASIBLE_SCORE, 2.0, -3.0]);
    assert_eq!(
      objectives.to_string(),
      "area(MIN)=infeasible cost(MIN)=2 profit(MAX)=3"
    );
  }

  #[test]
  fn test_add_invalidates_array() {
    let mut objectives = two(1.0, 2.0);
    assert_eq!(objectives.array(), &[1.0, 2.0]);
    objectives.add(Objective::min("b"), 5.0);
    assert_eq!(objectives.array(), &[1.0, 5.0]);
    objectives.add(Objective::max("c"), 1.0);
    assert_eq!(objectives.array(), &[1.0, 5.0, -1.0]);
    assert_eq!(objectives.len(), 3);

    let mut merged = Objectives::new();
    assert!(merged.is_empty());
    assert!(merged.array().is_empty());
    merged.add_all(&objectives);
    assert_eq!(merged.array(), objectives.array());
    assert_eq!(merged, objectives);
  }

  #[test]
  fn test_relations() {
    let a = two(1.0, 1.0);
    let b = two(1.0, 2.0);
    let c = two(2.0, 0.5);
    assert!(a.dominates(&b));
    assert!(!b.dominates(&a));
    assert!(!a.dominates(&c) && !c.dominates(&a));
    assert!(a.weakly_dominates(&two(1.0, 1.0)));
    assert!(!a.dominates(&two(1.0, 1.0)));
    assert!(a.equals_by_value(&two(1.0, 1.0)));
    assert_eq!(a.distance(&two(4.0, 5.0)), 5.0);
  }

  #[test]
  fn test_maximized_objective_is_compared_in_minimization_terms() {
    let better = Objectives::new().with(Objective::max("profit"), 10.0);
    let worse = Objectives::new().with(Objective::max("profit"), 3.0);
    let infeasible =
      Objectives::new().with(Objective::max("profit"), Value::Infeasible);
    assert!(better.dominates(&worse));
    assert!(worse.dominates(&infeasible));
  }

  #[test]
  fn test_cached_array_is_shared_between_threads() {
    let objectives = two(3.0, 4.0);
    std::thread::scope(|s| {
      for _ in 0..4 {
        s.spawn(|| assert_eq!(objectives.array(), &[3.0, 4.0]));
      }
    });
  }

  #[test]
  #[should_panic(expected = "objective vectors differ in length")]
  fn test_mismatched_objectives_panic() {
    let three = two(1.0, 1.0).with(Objective::min("c"), 1.0);
    two(0.0, 0.0).dominates(&three);
  }
}
