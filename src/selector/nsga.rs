//! NSGA-II selection: non-dominated sorting with a density tie-breaker.

use itertools::Itertools;
use log::{debug, trace};
use rand::{rngs::StdRng, Rng, SeedableRng};
use typed_builder::TypedBuilder;

use super::{check_mating_pool, check_survivors, Selector};
use crate::{
  candidate::Candidate,
  density::DensityIndicator,
  front::NonDominatedFronts,
  objectives::Objectives,
};

/// Rank based selector of the NSGA-II algorithm.
///
/// On every call the population is sorted into non-dominated fronts. A
/// candidate's rank is the index of its front. Density values of a front are
/// obtained from the [`DensityIndicator`] the first time they are needed
/// during a call.
///
/// Parents are chosen in tournaments of `tournament` contestants drawn with
/// replacement: the lower rank wins, and among equal ranks the larger density
/// value wins. Candidates are removed front by front starting from the worst
/// one. The first front that cannot be removed as a whole loses its members
/// with the lowest density values.
///
/// The selector keeps no state between calls.
///
/// # Example
///
/// ```
/// use mosel::prelude::*;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut nsga = Nsga2::builder()
///   .indicator(Hypervolume::default())
///   .tournament(2)
///   .rng(StdRng::seed_from_u64(7))
///   .build();
///
/// let population: Vec<Objectives> = [[1.0, 4.0], [2.0, 2.0], [3.0, 3.0]]
///   .iter()
///   .map(|[x, y]| {
///     Objectives::new()
///       .with(Objective::min("x"), *x)
///       .with(Objective::min("y"), *y)
///   })
///   .collect();
///
/// Selector::<Objectives>::initialize(&mut nsga, 3);
/// let removed = nsga.select_survivors(1, &population);
/// assert_eq!(removed, vec![&population[2]]);
/// ```
#[derive(TypedBuilder, Debug)]
pub struct Nsga2<D: DensityIndicator> {
  #[builder(
    default = 2,
    setter(
      transform = |tournament: usize| {
        assert!(tournament > 0, "tournament needs at least one contestant");
        tournament
      },
      doc = "
Sets the number of contestants per tournament. Defaults to 2.

# Panics

Panics if `tournament` is 0.",
    )
  )]
  tournament: usize,
  /// Density indicator that breaks ties between equally ranked candidates.
  indicator: D,
  /// Source of randomness for tournaments.
  #[builder(default = StdRng::from_entropy())]
  rng: StdRng,
}

impl<D: DensityIndicator> Nsga2<D> {
  /// Returns the number of contestants per tournament.
  pub fn tournament(&self) -> usize {
    self.tournament
  }

  /// Returns the density indicator.
  pub fn indicator(&self) -> &D {
    &self.indicator
  }
}

impl<C: Candidate, D: DensityIndicator> Selector<C> for Nsga2<D> {
  fn initialize(&mut self, capacity: usize) {
    trace!("nsga-ii initialized for {capacity} candidates");
  }

  fn select_mating_pool<'a>(
    &mut self,
    count: usize,
    population: &'a [C],
  ) -> Vec<&'a C> {
    check_mating_pool(count, population.len());
    if count == 0 {
      return Vec::new();
    }

    let mut ranking = Ranking::new(population, &self.indicator);
    debug!(
      "selecting {count} parents from {} candidates in {} fronts",
      population.len(),
      ranking.fronts.len()
    );

    (0..count)
      .map(|_| {
        let mut winner = self.rng.gen_range(0..population.len());
        for _ in 1..self.tournament {
          let contestant = self.rng.gen_range(0..population.len());
          if ranking.prefers(contestant, winner) {
            winner = contestant;
          }
        }
        &population[winner]
      })
      .collect()
  }

  fn select_survivors<'a>(
    &mut self,
    count: usize,
    population: &'a [C],
  ) -> Vec<&'a C> {
    check_survivors(count, population.len());
    if count == 0 {
      return Vec::new();
    }

    let fronts = NonDominatedFronts::new(population);
    debug!(
      "removing {count} of {} candidates in {} fronts",
      population.len(),
      fronts.len()
    );

    let mut removed = Vec::with_capacity(count);
    for front in fronts.iter().rev() {
      let remaining = count - removed.len();
      if remaining == 0 {
        break;
      }
      if front.len() <= remaining {
        removed.extend(front.iter().map(|&i| &population[i]));
        continue;
      }

      trace!("truncating a front of {} to {remaining}", front.len());
      let density = front_density(&self.indicator, population, front);
      removed.extend(
        front
          .iter()
          .zip(density)
          .sorted_by(|(_, a), (_, b)| a.total_cmp(b))
          .take(remaining)
          .map(|(&i, _)| &population[i]),
      );
    }

    debug_assert_eq!(removed.len(), count);
    removed
  }
}

fn front_density<C: Candidate, D: DensityIndicator>(
  indicator: &D,
  population: &[C],
  front: &[usize],
) -> Vec<f64> {
  let objectives: Vec<&Objectives> =
    front.iter().map(|&i| population[i].objectives()).collect();
  indicator.density_values(&objectives)
}

/// Ranks and lazily computed densities of one population.
struct Ranking<'a, C, D> {
  population: &'a [C],
  indicator: &'a D,
  fronts: NonDominatedFronts,
  // position of each candidate within its front
  positions: Vec<usize>,
  // density values per front, aligned with the front's members
  densities: Vec<Option<Vec<f64>>>,
}

impl<'a, C: Candidate, D: DensityIndicator> Ranking<'a, C, D> {
  fn new(population: &'a [C], indicator: &'a D) -> Self {
    let fronts = NonDominatedFronts::new(population);
    let mut positions = vec![0; population.len()];
    for front in fronts.iter() {
      for (pos, &i) in front.iter().enumerate() {
        positions[i] = pos;
      }
    }
    Self {
      population,
      indicator,
      densities: vec![None; fronts.len()],
      fronts,
      positions,
    }
  }

  fn density(&mut self, index: usize) -> f64 {
    let rank = self.fronts.rank(index);
    let values = self.densities[rank].get_or_insert_with(|| {
      front_density(self.indicator, self.population, self.fronts.front(rank))
    });
    values[self.positions[index]]
  }

  /// Returns `true` if candidate `a` wins a tournament against `b`.
  fn prefers(&mut self, a: usize, b: usize) -> bool {
    if a == b {
      return false;
    }
    let (rank_a, rank_b) = (self.fronts.rank(a), self.fronts.rank(b));
    rank_a < rank_b || (rank_a == rank_b && self.density(a) > self.density(b))
  }
}
