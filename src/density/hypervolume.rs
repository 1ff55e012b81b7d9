//! Hypervolume contribution of the members of a front.
//!
//! The front is normalized to the unit cube using its own bounds and then
//! inverted against a nadir point at `1 + offset` in every dimension, which
//! turns minimization into maximization with strictly positive coordinates.
//! The density of a member is the volume that would be lost if the member were
//! removed from the front.
//!
//! For two objectives the contributions follow directly from the sorted front.
//! For more objectives the total volume is computed with the slicing algorithm
//! of Zitzler and Thiele, once for the whole front and once per member with
//! that member left out.

use itertools::Itertools;
use log::trace;
use rayon::prelude::*;
use typed_builder::TypedBuilder;

use super::{check_front, DensityIndicator};
use crate::{objectives::Objectives, score::Score};

/// A point of a normalized and inverted front.
type Point = Vec<f64>;

/// Hypervolume contribution density indicator.
#[derive(Clone, Copy, PartialEq, Debug, TypedBuilder)]
pub struct Hypervolume {
  #[builder(
    default = Hypervolume::DEFAULT_OFFSET,
    setter(
      transform = |offset: f64| {
        assert!(
          offset.is_finite() && offset >= 0.0,
          "hypervolume offset must be finite and non-negative"
        );
        offset
      },
      doc = "
Sets the margin between the normalized front and the nadir point.

# Panics

Panics if `offset` is negative or not finite.",
    )
  )]
  offset: f64,
}

impl Hypervolume {
  /// The default margin between the normalized front and the nadir point.
  pub const DEFAULT_OFFSET: f64 = 1.0;

  /// Creates a hypervolume indicator with the given nadir `offset`.
  ///
  /// # Panics
  ///
  /// Panics if `offset` is negative or not finite.
  pub fn new(offset: f64) -> Self {
    Self::builder().offset(offset).build()
  }

  /// Returns the margin between the normalized front and the nadir point.
  pub fn offset(&self) -> f64 {
    self.offset
  }

  /// Returns the hypervolume of the normalized and inverted `front`.
  ///
  /// # Panics
  ///
  /// Panics if `front` is empty.
  pub fn total(&self, front: &[&Objectives]) -> f64 {
    check_front(front);
    let points = self.prepare(front);
    let dimensions = points[0].len();
    let refs: Vec<&[f64]> = points.iter().map(Vec::as_slice).collect();
    hypervolume(&refs, dimensions)
  }

  fn prepare(&self, front: &[&Objectives]) -> Vec<Point> {
    let scores: Vec<&[Score]> = front.iter().map(|o| o.array()).collect();
    invert(normalize(&scores), self.offset)
  }
}

impl Default for Hypervolume {
  fn default() -> Self {
    Self::builder().build()
  }
}

impl DensityIndicator for Hypervolume {
  fn density_values(&self, front: &[&Objectives]) -> Vec<f64> {
    check_front(front);
    let points = self.prepare(front);
    match points[0].len() {
      0 | 1 => vec![0.0; points.len()],
      2 => contributions_2d(&points),
      _ => contributions_nd(&points),
    }
  }
}

/// Scales every dimension to `[0, 1]` using the bounds of `front`. A dimension
/// without spread is scaled as if its maximum were one above its minimum.
fn normalize(front: &[&[Score]]) -> Vec<Point> {
  let m = front[0].len();
  let mut min = vec![f64::MAX; m];
  let mut max = vec![-f64::MAX; m];
  for p in front {
    for dim in 0..m {
      min[dim] = min[dim].min(p[dim]);
      max[dim] = max[dim].max(p[dim]);
    }
  }
  for dim in 0..m {
    if min[dim] == max[dim] {
      max[dim] += 1.0;
    }
  }

  front
    .iter()
    .map(|p| {
      (0..m)
        .map(|dim| (p[dim] - min[dim]) / (max[dim] - min[dim]))
        .collect()
    })
    .collect()
}

/// Mirrors normalized points at the nadir point `1 + offset`.
fn invert(front: Vec<Point>, offset: f64) -> Vec<Point> {
  let nadir = 1.0 + offset;
  front
    .into_iter()
    .map(|p| p.into_iter().map(|v| nadir - v).collect())
    .collect()
}

/// Exclusive area of each point of a two-dimensional front: the rectangle
/// between a point and its neighbours in the front sorted by the first
/// coordinate.
fn contributions_2d(points: &[Point]) -> Vec<f64> {
  let order: Vec<usize> = (0..points.len())
    .sorted_by(|&a, &b| points[a][0].total_cmp(&points[b][0]))
    .collect();

  let mut contributions = vec![0.0; points.len()];
  for (pos, &idx) in order.iter().enumerate() {
    let prev_x = pos.checked_sub(1).map_or(0.0, |prev| points[order[prev]][0]);
    let next_y = order.get(pos + 1).map_or(0.0, |&next| points[next][1]);
    contributions[idx] = (points[idx][0] - prev_x) * (points[idx][1] - next_y);
  }
  contributions
}

/// Volume lost per point when it is left out of the front.
fn contributions_nd(points: &[Point]) -> Vec<f64> {
  let m = points[0].len();
  let refs: Vec<&[f64]> = points.iter().map(Vec::as_slice).collect();
  let total = hypervolume(&refs, m);
  trace!("front of {} points spans a hypervolume of {total}", refs.len());

  (0..refs.len())
    .into_par_iter()
    .map(|excluded| {
      let rest: Vec<&[f64]> = refs
        .iter()
        .enumerate()
        .filter_map(|(i, p)| (i != excluded).then_some(*p))
        .collect();
      (total - hypervolume(&rest, m)).max(0.0)
    })
    .collect()
}

/// Hypervolume of a maximization `front` with respect to the origin, taking
/// only the first `dimensions` coordinates of each point into account.
fn hypervolume(front: &[&[f64]], dimensions: usize) -> f64 {
  match dimensions {
    0 => 0.0,
    1 => front.iter().map(|p| p[0]).fold(0.0, f64::max),
    _ => {
      let last = dimensions - 1;
      let mut front = front.to_vec();
      let mut volume = 0.0;
      let mut distance = 0.0;
      while !front.is_empty() {
        let non_dominated = filter_non_dominated(&front, last);
        let slice = hypervolume(&non_dominated, last);
        let next = front.iter().map(|p| p[last]).fold(f64::MAX, f64::min);
        volume += slice * (next - distance);
        distance = next;
        front.retain(|p| p[last] > distance);
      }
      volume
    }
  }
}

/// Returns points not dominated by any other point in their first
/// `dimensions` coordinates.
fn filter_non_dominated<'a>(
  front: &[&'a [f64]],
  dimensions: usize,
) -> Vec<&'a [f64]> {
  let mut non_dominated: Vec<&[f64]> = Vec::new();
  for &p in front {
    if non_dominated.iter().any(|q| dominates(q, p, dimensions)) {
      continue;
    }
    non_dominated.retain(|q| !dominates(p, q, dimensions));
    non_dominated.push(p);
  }
  non_dominated
}

/// Maximization dominance over the first `dimensions` coordinates.
fn dominates(p: &[f64], q: &[f64], dimensions: usize) -> bool {
  let mut strictly = false;
  for dim in 0..dimensions {
    if p[dim] < q[dim] {
      return false;
    }
    if p[dim] > q[dim] {
      strictly = true;
    }
  }
  strictly
}
