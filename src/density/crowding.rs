//! Crowding distance from the NSGA-II paper by Deb et al.

use itertools::Itertools;

use super::{check_front, DensityIndicator};
use crate::objectives::Objectives;

/// Crowding distance of the members of a front.
///
/// For each objective, members are sorted by their score. If the scores
/// spread, both extreme members get `f64::MAX` and every other member adds the
/// normalized distance between its two neighbours. Objectives without spread
/// contribute nothing, so a front of one member has a crowding distance of 0.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Crowding;

impl DensityIndicator for Crowding {
  fn density_values(&self, front: &[&Objectives]) -> Vec<f64> {
    check_front(front);
    let mut distances = vec![0.0; front.len()];
    let m = front[0].len();

    for dim in 0..m {
      let score = |i: usize| front[i].array()[dim];
      let order: Vec<usize> = (0..front.len())
        .sorted_by(|&a, &b| score(a).total_cmp(&score(b)))
        .collect();
      let (Some(&min_idx), Some(&max_idx)) = (order.first(), order.last())
      else {
        continue;
      };
      let spread = score(max_idx) - score(min_idx);
      if spread <= 0.0 {
        continue;
      }
      distances[min_idx] = f64::MAX;
      distances[max_idx] = f64::MAX;
      for (prev, idx, next) in order.iter().copied().tuple_windows() {
        if distances[idx] != f64::MAX {
          distances[idx] += (score(next) - score(prev)) / spread;
        }
      }
    }

    distances
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::fixtures::solutions;

  fn crowding<const N: usize>(values: &[[f64; N]]) -> Vec<f64> {
    let population = solutions(values);
    let front: Vec<_> = population.iter().map(|s| &s.objectives).collect();
    Crowding.density_values(&front)
  }

  #[test]
  fn test_singleton() {
    assert_eq!(crowding(&[[1.0, 2.0]]), vec![0.0]);
  }

  #[test]
  fn test_extremes_are_unbounded() {
    let d = crowding(&[[5.0, 1.0], [1.0, 5.0], [3.0, 3.0], [2.0, 4.0]]);
    assert_eq!(d[0], f64::MAX);
    assert_eq!(d[1], f64::MAX);
    // neighbours (2,4) and (5,1) in both objectives
    assert!((d[2] - 1.5).abs() < 1e-12);
    // neighbours (1,5) and (3,3)
    assert!((d[3] - 1.0).abs() < 1e-12);
  }

  #[test]
  fn test_no_spread() {
    assert_eq!(crowding(&[[1.0, 1.0], [1.0, 1.0]]), vec![0.0, 0.0]);
  }

  #[test]
  #[should_panic(expected = "empty front")]
  fn test_empty_front() {
    Crowding.density_values(&[]);
  }
}
