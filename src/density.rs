//! Density indicators that rank the members of a single front.
//!
//! A density indicator estimates how valuable each member of a front of
//! mutually non-dominated candidates is for the diversity of that front.
//! Selectors use it to break ties between equally ranked candidates: a larger
//! value marks a more isolated, more valuable member that is preferred as a
//! parent and removed last.

pub mod crowding;
pub mod hypervolume;

pub use crowding::Crowding;
pub use hypervolume::Hypervolume;

use crate::objectives::Objectives;

/// Estimates the density of members of a front.
pub trait DensityIndicator {
  /// Returns one finite, non-negative value per member of `front`, in the
  /// order of `front`. The larger the value, the more worth keeping the
  /// member is.
  ///
  /// # Panics
  ///
  /// Implementations panic if `front` is empty.
  fn density_values(&self, front: &[&Objectives]) -> Vec<f64>;
}

impl<D: DensityIndicator + ?Sized> DensityIndicator for &D {
  fn density_values(&self, front: &[&Objectives]) -> Vec<f64> {
    (**self).density_values(front)
  }
}

impl<D: DensityIndicator + ?Sized> DensityIndicator for Box<D> {
  fn density_values(&self, front: &[&Objectives]) -> Vec<f64> {
    (**self).density_values(front)
  }
}

/// A density indicator chosen at run time.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum FrontDensity {
  /// Hypervolume contribution.
  Hypervolume(Hypervolume),
  /// Crowding distance.
  Crowding(Crowding),
}

impl Default for FrontDensity {
  fn default() -> Self {
    FrontDensity::Hypervolume(Hypervolume::default())
  }
}

impl DensityIndicator for FrontDensity {
  fn density_values(&self, front: &[&Objectives]) -> Vec<f64> {
    match self {
      FrontDensity::Hypervolume(hv) => hv.density_values(front),
      FrontDensity::Crowding(c) => c.density_values(front),
    }
  }
}

pub(crate) fn check_front(front: &[&Objectives]) {
  assert!(!front.is_empty(), "cannot estimate density of an empty front");
}
