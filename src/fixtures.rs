//! Candidates used across unit tests.

use std::hash::{Hash, Hasher};

use crate::{
  candidate::Candidate,
  objective::Objective,
  objectives::Objectives,
};

/// A candidate identified by `id`; objectives are minimized and named
/// `f00`, `f01`, ... in vector order.
#[derive(Clone, Debug)]
pub struct Solution {
  pub id: usize,
  pub objectives: Objectives,
}

impl Solution {
  pub fn new(id: usize, values: &[f64]) -> Self {
    let objectives = values
      .iter()
      .enumerate()
      .map(|(i, v)| (Objective::min(format!("f{i:02}")), (*v).into()))
      .collect();
    Self { id, objectives }
  }
}

impl PartialEq for Solution {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

impl Eq for Solution {}

impl Hash for Solution {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.id.hash(state);
  }
}

impl Candidate for Solution {
  fn objectives(&self) -> &Objectives {
    &self.objectives
  }
}

/// Numbers solutions in the order of `values`.
pub fn solutions<const N: usize>(values: &[[f64; N]]) -> Vec<Solution> {
  values
    .iter()
    .enumerate()
    .map(|(id, v)| Solution::new(id, v))
    .collect()
}

/// Returns the ids of `selected`, sorted.
pub fn ids<'a>(selected: impl IntoIterator<Item = &'a Solution>) -> Vec<usize> {
  let mut ids: Vec<_> = selected.into_iter().map(|s| s.id).collect();
  ids.sort_unstable();
  ids
}
