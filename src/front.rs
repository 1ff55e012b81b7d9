//! Fast non-dominated sorting of candidates into Pareto fronts.

use std::cmp::Ordering;

use itertools::Itertools;

use crate::{candidate::Candidate, score::ParetoDominance};

// index of a candidate in the sorted slice
type CandidateIndex = usize;
// number of a candidate's dominators
type DominanceCounter = usize;
// indices of candidates dominated by a candidate
type DominanceList = Vec<CandidateIndex>;

/// Candidates grouped into non-dominated fronts.
///
/// Front `0` holds the candidates no other candidate dominates, front `1` the
/// ones that are non-dominated once front `0` is removed, and so on. The index
/// of a candidate's front is its *rank*. Fronts refer to candidates by their
/// index in the sorted slice.
///
/// Sorting is `O(m * n^2)` for `n` candidates with `m` objectives.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct NonDominatedFronts {
  fronts: Vec<Vec<CandidateIndex>>,
  ranks: Vec<usize>,
}

impl NonDominatedFronts {
  /// Sorts `candidates` into non-dominated fronts.
  ///
  /// # Panics
  ///
  /// Panics if the candidates have different numbers of objectives.
  pub fn new<C: Candidate>(candidates: &[C]) -> Self {
    let n = candidates.len();
    let mut dominance_lists: Vec<DominanceList> = vec![Vec::new(); n];
    let mut dominance_counters: Vec<DominanceCounter> = vec![0; n];

    // for each unique pair of candidates `p` and `q`...
    for (p_idx, q_idx) in (0..n).tuple_combinations() {
      let p = candidates[p_idx].objectives().array();
      let q = candidates[q_idx].objectives().array();
      match p.dominance(q) {
        // `p` dominates `q`
        Ordering::Less => {
          dominance_lists[p_idx].push(q_idx);
          dominance_counters[q_idx] += 1;
        }
        // `q` dominates `p`
        Ordering::Greater => {
          dominance_lists[q_idx].push(p_idx);
          dominance_counters[p_idx] += 1;
        }
        Ordering::Equal => {}
      }
    }

    let mut ranks = vec![usize::MAX; n];
    let mut fronts = Vec::new();
    let mut current: Vec<CandidateIndex> =
      (0..n).filter(|&i| dominance_counters[i] == 0).collect();

    while !current.is_empty() {
      let mut next = Vec::new();
      for &p_idx in &current {
        ranks[p_idx] = fronts.len();
        for &q_idx in &dominance_lists[p_idx] {
          dominance_counters[q_idx] -= 1;
          if dominance_counters[q_idx] == 0 {
            next.push(q_idx);
          }
        }
      }
      fronts.push(std::mem::replace(&mut current, next));
    }

    debug_assert!(
      ranks.iter().all(|&r| r != usize::MAX),
      "every candidate must be assigned to a front"
    );

    Self { fronts, ranks }
  }

  /// Returns the number of fronts.
  pub fn len(&self) -> usize {
    self.fronts.len()
  }

  /// Returns `true` if no candidates were sorted.
  pub fn is_empty(&self) -> bool {
    self.fronts.is_empty()
  }

  /// Returns candidate indices of the front with the given rank.
  ///
  /// # Panics
  ///
  /// Panics if there is no such front.
  pub fn front(&self, rank: usize) -> &[CandidateIndex] {
    &self.fronts[rank]
  }

  /// Iterates over fronts from best to worst.
  pub fn iter(
    &self,
  ) -> impl DoubleEndedIterator<Item = &[CandidateIndex]> + ExactSizeIterator {
    self.fronts.iter().map(Vec::as_slice)
  }

  /// Returns the rank of the candidate at `index`.
  pub fn rank(&self, index: CandidateIndex) -> usize {
    self.ranks[index]
  }

  /// Returns ranks of all candidates in slice order.
  pub fn ranks(&self) -> &[usize] {
    &self.ranks
  }

  /// Returns the members of `front` that are best in at least one objective.
  /// On ties, the member that comes first in `front` wins. The result keeps
  /// the order of `front` and holds no duplicates.
  pub fn extreme_candidates<C: Candidate>(
    candidates: &[C],
    front: &[CandidateIndex],
  ) -> Vec<CandidateIndex> {
    let Some(&first) = front.first() else {
      return Vec::new();
    };
    let m = candidates[first].objectives().len();
    let best: Vec<CandidateIndex> = (0..m)
      .map(|dim| {
        front
          .iter()
          .copied()
          .min_by(|&a, &b| {
            let a = candidates[a].objectives().array()[dim];
            let b = candidates[b].objectives().array()[dim];
            a.total_cmp(&b)
          })
          .unwrap_or(first)
      })
      .collect();
    front.iter().copied().filter(|i| best.contains(i)).collect()
  }
}

#[cfg(test)]
mod tests {
  use proptest::{collection::vec, prelude::*};

  use super::*;
  use crate::fixtures::{solutions, Solution};

  #[test]
  fn test_single_candidate() {
    let fronts = NonDominatedFronts::new(&solutions(&[[1.0, 2.0]]));
    assert_eq!(fronts.len(), 1);
    assert_eq!(fronts.front(0), &[0]);
    assert_eq!(fronts.rank(0), 0);
  }

  #[test]
  fn test_empty() {
    let fronts = NonDominatedFronts::new::<Solution>(&[]);
    assert!(fronts.is_empty());
    assert!(fronts.ranks().is_empty());
  }

  #[test]
  fn test_mixed_fronts() {
    let population = solutions(&[
      [1.0, 5.0], // front 0
      [3.0, 3.0], // front 0
      [5.0, 1.0], // front 0
      [4.0, 4.0], // dominated by 1
      [6.0, 6.0], // dominated by 3
      [3.0, 3.0], // equal to 1, front 0
    ]);
    let fronts = NonDominatedFronts::new(&population);
    assert_eq!(fronts.len(), 3);
    assert_eq!(fronts.ranks(), &[0, 0, 0, 1, 2, 0]);
    assert_eq!(fronts.front(0), &[0, 1, 2, 5]);
    assert_eq!(fronts.front(1), &[3]);
    assert_eq!(fronts.front(2), &[4]);
    assert_eq!(fronts.iter().rev().next(), Some(&[4][..]));
  }

  #[test]
  fn test_chain() {
    let population =
      solutions(&[[3.0, 3.0, 3.0], [1.0, 1.0, 1.0], [2.0, 2.0, 2.0]]);
    let fronts = NonDominatedFronts::new(&population);
    assert_eq!(fronts.ranks(), &[2, 0, 1]);
  }

  #[test]
  fn test_extreme_candidates() {
    let population = solutions(&[
      [2.0, 2.0, 2.0],
      [1.0, 5.0, 5.0],
      [5.0, 1.0, 1.0],
      [1.0, 6.0, 4.0],
    ]);
    let front = [0, 1, 2, 3];
    assert_eq!(
      NonDominatedFronts::extreme_candidates(&population, &front),
      vec![1, 2]
    );
    assert!(
      NonDominatedFronts::extreme_candidates(&population, &[]).is_empty()
    );
  }

  proptest! {
    #[test]
    fn fronts_partition_the_population(
      values in vec(vec(0u8..6, 3), 1..30)
    ) {
      let population: Vec<Solution> = values
        .iter()
        .enumerate()
        .map(|(id, v)| {
          let v: Vec<f64> = v.iter().copied().map(f64::from).collect();
          Solution::new(id, &v)
        })
        .collect();
      let fronts = NonDominatedFronts::new(&population);
      let dominates = |a: usize, b: usize| {
        population[a].objectives.dominates(&population[b].objectives)
      };

      let mut seen: Vec<_> = fronts.iter().flatten().copied().collect();
      seen.sort_unstable();
      prop_assert_eq!(seen, (0..population.len()).collect::<Vec<_>>());

      for (rank, front) in fronts.iter().enumerate() {
        prop_assert!(!front.is_empty());
        for &i in front {
          prop_assert_eq!(fronts.rank(i), rank);
          let dominated_by_same_or_worse = (0..population.len())
            .filter(|&j| fronts.rank(j) >= rank)
            .any(|j| dominates(j, i));
          prop_assert!(!dominated_by_same_or_worse);
          if rank > 0 {
            let dominated_by_better = fronts
              .front(rank - 1)
              .iter()
              .any(|&j| dominates(j, i));
            prop_assert!(dominated_by_better);
          }
        }
      }
    }
  }
}
