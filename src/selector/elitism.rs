//! A scalarizing selector that ignores Pareto dominance.

use itertools::Itertools;
use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};
use typed_builder::TypedBuilder;

use super::{check_mating_pool, check_survivors, Selector};
use crate::{candidate::Candidate, score::Score};

/// Ranks candidates by the sum of their minimization array.
///
/// Parents are drawn uniformly at random with replacement. The candidates
/// with the largest sums are removed first; equal sums are removed in
/// population order.
#[derive(TypedBuilder, Debug)]
pub struct Elitism {
  /// Source of randomness for parent selection.
  #[builder(default = StdRng::from_entropy())]
  rng: StdRng,
}

impl Default for Elitism {
  fn default() -> Self {
    Self::builder().build()
  }
}

fn scalarize<C: Candidate>(candidate: &C) -> Score {
  candidate.objectives().array().iter().sum()
}

impl<C: Candidate> Selector<C> for Elitism {
  fn initialize(&mut self, _capacity: usize) {}

  fn select_mating_pool<'a>(
    &mut self,
    count: usize,
    population: &'a [C],
  ) -> Vec<&'a C> {
    check_mating_pool(count, population.len());
    (0..count)
      .map(|_| &population[self.rng.gen_range(0..population.len())])
      .collect()
  }

  fn select_survivors<'a>(
    &mut self,
    count: usize,
    population: &'a [C],
  ) -> Vec<&'a C> {
    check_survivors(count, population.len());
    debug!("removing {count} of {} candidates", population.len());
    population
      .iter()
      .map(|candidate| (candidate, scalarize(candidate)))
      .sorted_by(|(_, a), (_, b)| b.total_cmp(a))
      .take(count)
      .map(|(candidate, _)| candidate)
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::fixtures::{ids, solutions};

  #[test]
  fn test_largest_sums_go_first() {
    let population =
      solutions(&[[1.0, 1.0], [3.0, 0.0], [0.0, 0.5], [2.0, 2.0]]);
    let mut selector = Elitism::builder().rng(StdRng::seed_from_u64(0)).build();
    assert!(selector.select_survivors(0, &population).is_empty());
    assert_eq!(ids(selector.select_survivors(1, &population)), vec![3]);
    assert_eq!(ids(selector.select_survivors(2, &population)), vec![1, 3]);
    assert_eq!(
      ids(selector.select_survivors(3, &population)),
      vec![0, 1, 3]
    );
  }

  #[test]
  fn test_mating_pool_is_uniform() {
    let population = solutions(&[[0.0, 0.0], [9.0, 9.0]]);
    let mut selector = Elitism::builder().rng(StdRng::seed_from_u64(3)).build();
    let parents = selector.select_mating_pool(400, &population);
    assert_eq!(parents.len(), 400);
    let worst = parents.iter().filter(|s| s.id == 1).count();
    assert!((100..300).contains(&worst), "worst chosen {worst} times");
  }
}
