//! Mating and environmental selection.

pub mod elitism;
pub mod nsga;
pub mod spea;

/// Chooses parents and victims among the candidates of a population.
///
/// The optimization loop calls [`initialize`](Selector::initialize) once,
/// then each generation calls [`select_survivors`](Selector::select_survivors)
/// to trim an oversized population and
/// [`select_mating_pool`](Selector::select_mating_pool) to pick parents for
/// the next offspring. A selector never modifies the population; it only
/// returns references into it.
pub trait Selector<C> {
  /// Prepares the selector for populations of at most `capacity` candidates.
  fn initialize(&mut self, capacity: usize);

  /// Returns `count` candidates drawn with replacement from `population`,
  /// favoring better ranked and more isolated candidates.
  ///
  /// # Panics
  ///
  /// Panics if `population` is empty while `count > 0`.
  fn select_mating_pool<'a>(
    &mut self,
    count: usize,
    population: &'a [C],
  ) -> Vec<&'a C>;

  /// Returns exactly `count` distinct candidates of `population` that should
  /// be **removed** from it. The rest of the population survives.
  ///
  /// # Panics
  ///
  /// Panics if `count` exceeds the size of `population`.
  fn select_survivors<'a>(
    &mut self,
    count: usize,
    population: &'a [C],
  ) -> Vec<&'a C>;
}

impl<C, S: Selector<C> + ?Sized> Selector<C> for Box<S> {
  fn initialize(&mut self, capacity: usize) {
    (**self).initialize(capacity)
  }

  fn select_mating_pool<'a>(
    &mut self,
    count: usize,
    population: &'a [C],
  ) -> Vec<&'a C> {
    (**self).select_mating_pool(count, population)
  }

  fn select_survivors<'a>(
    &mut self,
    count: usize,
    population: &'a [C],
  ) -> Vec<&'a C> {
    (**self).select_survivors(count, population)
  }
}

pub(crate) fn check_mating_pool(count: usize, population_size: usize) {
  assert!(
    count == 0 || population_size > 0,
    "cannot select {count} parents from an empty population"
  );
}

pub(crate) fn check_survivors(count: usize, population_size: usize) {
  assert!(
    count <= population_size,
    "cannot remove {count} candidates from a population of {population_size}"
  );
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use proptest::{collection::vec, prelude::*};
  use rand::{rngs::StdRng, Rng, SeedableRng};

  use super::{elitism::Elitism, nsga::Nsga2, spea::Spea2, *};
  use crate::{
    density::{Crowding, FrontDensity, Hypervolume},
    fixtures::{ids, Solution},
  };

  fn selectors() -> Vec<Box<dyn Selector<Solution>>> {
    vec![
      Box::new(
        Nsga2::builder()
          .indicator(FrontDensity::Hypervolume(Hypervolume::default()))
          .rng(StdRng::seed_from_u64(1))
          .build(),
      ),
      Box::new(
        Nsga2::builder()
          .indicator(Crowding)
          .tournament(3)
          .rng(StdRng::seed_from_u64(2))
          .build(),
      ),
      Box::new(Spea2::builder().rng(StdRng::seed_from_u64(3)).build()),
      Box::new(Elitism::builder().rng(StdRng::seed_from_u64(4)).build()),
    ]
  }

  fn check_postconditions(
    selector: &mut dyn Selector<Solution>,
    population: &[Solution],
    mating: usize,
    removals: usize,
  ) -> Result<(), TestCaseError> {
    let parents = selector.select_mating_pool(mating, population);
    prop_assert_eq!(parents.len(), mating);
    for p in parents {
      prop_assert!(population.contains(p));
    }

    let removed = selector.select_survivors(removals, population);
    prop_assert_eq!(removed.len(), removals);
    let distinct: HashSet<usize> = removed.iter().map(|s| s.id).collect();
    prop_assert_eq!(distinct.len(), removals);
    for r in removed {
      prop_assert!(population.contains(r));
    }
    Ok(())
  }

  #[test]
  fn test_generational_loop() {
    let mut rng = StdRng::seed_from_u64(42);
    for mut selector in selectors() {
      let mut next_id = 0;
      let mut offspring = |rng: &mut StdRng| {
        next_id += 1;
        let x: f64 = rng.gen_range(0.0..1.0);
        let y: f64 = rng.gen_range(0.0..1.0);
        Solution::new(next_id, &[x, 1.0 - x + y, y * y])
      };

      selector.initialize(20);
      let mut population: Vec<Solution> =
        (0..20).map(|_| offspring(&mut rng)).collect();
      for _ in 0..15 {
        let parents = selector.select_mating_pool(10, &population).len();
        assert_eq!(parents, 10);
        population.extend((0..parents).map(|_| offspring(&mut rng)));

        let removed = ids(selector.select_survivors(10, &population));
        assert_eq!(removed.len(), 10);
        population.retain(|s| removed.binary_search(&s.id).is_err());
        assert_eq!(population.len(), 20);
      }
    }
  }

  #[test]
  fn test_empty_selections() {
    for mut selector in selectors() {
      selector.initialize(4);
      assert!(selector.select_mating_pool(0, &[]).is_empty());
      assert!(selector.select_survivors(0, &[]).is_empty());
    }
  }

  #[test]
  fn test_too_many_removals_panic() {
    let population = vec![Solution::new(0, &[1.0]), Solution::new(1, &[2.0])];
    for mut selector in selectors() {
      selector.initialize(2);
      let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        selector.select_survivors(3, &population)
      }));
      assert!(result.is_err());
    }
  }

  proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn selections_have_requested_sizes(
      values in vec(vec(0u8..8, 2), 1..16),
      mating in 0usize..20,
      removals in 0usize..16,
    ) {
      let population: Vec<Solution> = values
        .iter()
        .enumerate()
        .map(|(id, v)| {
          let v: Vec<f64> = v.iter().copied().map(f64::from).collect();
          Solution::new(id, &v)
        })
        .collect();
      let removals = removals.min(population.len());
      for mut selector in selectors() {
        selector.initialize(population.len());
        check_postconditions(
          selector.as_mut(),
          &population,
          mating,
          removals,
        )?;
      }
    }
  }
}
