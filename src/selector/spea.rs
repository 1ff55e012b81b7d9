//! SPEA2 selection: strength based fitness with nearest neighbour truncation.

mod classes;

use std::{collections::VecDeque, hash::Hash};

use itertools::Itertools;
use log::{debug, trace};
use rand::{rngs::StdRng, Rng, SeedableRng};
use typed_builder::TypedBuilder;

use self::classes::{ClassId, Classes};
use super::{check_mating_pool, check_survivors, Selector};
use crate::candidate::Candidate;

/// Selector of the SPEA2 algorithm.
///
/// Candidates with identical minimization arrays are grouped into classes.
/// The selector remembers the classes and the distances between them from one
/// call to the next and only reconciles them with the changes of the
/// population, so candidates must keep their objectives unchanged while they
/// are part of the population. Candidates of a population are told apart by
/// `Eq` and `Hash` and must be distinct.
///
/// The *strength* of a class is the number of candidates it dominates. The
/// *raw fitness* of a class sums `strength * size` over every class
/// dominating it; non-dominated classes have a raw fitness of 0.
///
/// Parents are chosen in tournaments where the lower fitness wins and the
/// larger distance to the closest other class breaks ties. Dominated
/// candidates are removed first, worst fitness first. Non-dominated candidates
/// are removed from the largest classes first, and among equally large
/// classes by truncating the one closest to its neighbours.
#[derive(TypedBuilder, Debug)]
pub struct Spea2<C> {
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
  /// Source of randomness for tournaments.
  #[builder(default = StdRng::from_entropy())]
  rng: StdRng,
  #[builder(default, setter(skip))]
  classes: Classes<C>,
}

impl<C: Candidate + Clone + Eq + Hash> Spea2<C> {
  /// Returns the number of contestants per tournament.
  pub fn tournament(&self) -> usize {
    self.tournament
  }

  /// Returns the number of candidates `candidate` dominates, as of the last
  /// call, or `None` if the candidate is not tracked.
  pub fn strength(&self, candidate: &C) -> Option<usize> {
    let id = self.classes.class_of(candidate)?;
    Some(self.classes.get(id).strength)
  }

  /// Returns the raw fitness of `candidate` as of the last call, or `None`
  /// if the candidate is not tracked. A raw fitness of 0 means the candidate
  /// is non-dominated.
  pub fn raw_fitness(&self, candidate: &C) -> Option<usize> {
    let id = self.classes.class_of(candidate)?;
    Some(self.classes.get(id).fitness)
  }

  /// Returns the number of tracked classes of equal candidates.
  pub fn class_count(&self) -> usize {
    self.classes.len()
  }

  /// Groups `population` by class, keeping population order inside classes.
  fn members<'a>(&self, population: &'a [C]) -> Vec<VecDeque<&'a C>> {
    let mut members = vec![VecDeque::new(); self.classes.slot_count()];
    for candidate in population {
      if let Some(id) = self.classes.class_of(candidate) {
        members[id].push_back(candidate);
      }
    }
    members
  }

  /// Returns `true` if class `a` wins a tournament against class `b`.
  fn prefers(&self, a: ClassId, b: ClassId) -> bool {
    if a == b {
      return false;
    }
    let (fitness_a, fitness_b) =
      (self.classes.get(a).fitness, self.classes.get(b).fitness);
    fitness_a < fitness_b
      || (fitness_a == fitness_b
        && self.classes.min_distance(a) > self.classes.min_distance(b))
  }

  /// Removes `count` candidates of non-dominated classes: members of the
  /// largest classes go first, ties between classes are truncated by
  /// distance.
  fn truncate_non_dominated<'a>(
    &self,
    count: usize,
    members: &mut [VecDeque<&'a C>],
  ) -> Vec<&'a C> {
    let mut remaining: Vec<ClassId> = self
      .classes
      .iter()
      .filter(|(_, class)| class.fitness == 0)
      .map(|(id, _)| id)
      .collect();
    let mut removed = Vec::with_capacity(count);

    while removed.len() < count {
      let Some(largest) = remaining.iter().map(|&id| members[id].len()).max()
      else {
        break;
      };
      let candidates: Vec<ClassId> = remaining
        .iter()
        .copied()
        .filter(|&id| members[id].len() == largest)
        .collect();

      let needed = count - removed.len();
      let victims = if candidates.len() <= needed {
        candidates
      } else {
        trace!(
          "truncating {} classes of {largest} to {needed}",
          candidates.len()
        );
        self.nearest(needed, &candidates)
      };

      for id in victims {
        removed.extend(members[id].pop_front());
        if members[id].is_empty() {
          remaining.retain(|&other| other != id);
        }
      }
    }

    removed
  }

  /// Picks `count` of `candidates` one at a time: the class closest to its
  /// nearest neighbour, ties broken by the second nearest neighbour and so
  /// on. Each picked class no longer counts as a neighbour of the others.
  fn nearest(&self, count: usize, candidates: &[ClassId]) -> Vec<ClassId> {
    debug_assert!(candidates.len() > count);
    let distance = |a: ClassId, b: ClassId| self.classes.distance(a, b);

    // each candidate with the other candidates sorted by distance
    let mut neighbours: Vec<(ClassId, Vec<ClassId>)> = candidates
      .iter()
      .map(|&a| {
        let sorted = candidates
          .iter()
          .copied()
          .filter(|&b| b != a)
          .sorted_by(|&x, &y| distance(a, x).total_cmp(&distance(a, y)))
          .collect();
        (a, sorted)
      })
      .collect();

    let mut picked = Vec::with_capacity(count);
    while picked.len() < count {
      let mut closest: Vec<usize> = (0..neighbours.len()).collect();
      let kth = |pos: usize, k: usize| {
        let (id, sorted) = &neighbours[pos];
        distance(*id, sorted[k])
      };
      for k in 0..neighbours.len() - 1 {
        let min = closest
          .iter()
          .map(|&pos| kth(pos, k))
          .fold(f64::MAX, f64::min);
        closest.retain(|&pos| kth(pos, k) <= min);
        if closest.len() == 1 {
          break;
        }
      }

      let (id, _) = neighbours.remove(closest[0]);
      for (_, sorted) in &mut neighbours {
        sorted.retain(|&other| other != id);
      }
      picked.push(id);
    }
    picked
  }
}

impl<C: Candidate + Clone + Eq + Hash> Selector<C> for Spea2<C> {
  fn initialize(&mut self, capacity: usize) {
    trace!("spea2 initialized for {capacity} candidates");
    self.classes = Classes::with_capacity(capacity);
  }

  fn select_mating_pool<'a>(
    &mut self,
    count: usize,
    population: &'a [C],
  ) -> Vec<&'a C> {
    check_mating_pool(count, population.len());
    self.classes.update(population);
    if count == 0 {
      return Vec::new();
    }

    let class_of = |candidate: &C| self.classes.class_of(candidate);
    let ids: Vec<ClassId> = population.iter().filter_map(class_of).collect();
    debug_assert_eq!(ids.len(), population.len());

    let mut parents = Vec::with_capacity(count);
    for _ in 0..count {
      let mut winner = self.rng.gen_range(0..population.len());
      for _ in 1..self.tournament {
        let contestant = self.rng.gen_range(0..population.len());
        if self.prefers(ids[contestant], ids[winner]) {
          winner = contestant;
        }
      }
      parents.push(&population[winner]);
    }
    parents
  }

  fn select_survivors<'a>(
    &mut self,
    count: usize,
    population: &'a [C],
  ) -> Vec<&'a C> {
    check_survivors(count, population.len());
    self.classes.update(population);
    if count == 0 {
      return Vec::new();
    }

    let mut members = self.members(population);
    let dominated: Vec<ClassId> = self
      .classes
      .iter()
      .filter(|(_, class)| class.fitness > 0)
      .sorted_by(|(_, a), (_, b)| b.fitness.cmp(&a.fitness))
      .map(|(id, _)| id)
      .collect();
    let dominated_count: usize =
      dominated.iter().map(|&id| members[id].len()).sum();
    debug!(
      "removing {count} of {} candidates, {dominated_count} dominated",
      population.len()
    );

    let mut removed: Vec<&'a C> = dominated
      .iter()
      .flat_map(|&id| members[id].iter().copied())
      .take(count)
      .collect();
    if removed.len() < count {
      let needed = count - removed.len();
      removed.extend(self.truncate_non_dominated(needed, &mut members));
    }

    debug_assert_eq!(removed.len(), count);
    removed
  }
}
