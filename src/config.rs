//! Selectors chosen by configuration at construction time.
//!
//! [`SelectorConfig`] names a selector and its parameters. Building it yields
//! an [`AnySelector`], which an optimization loop can use through the
//! [`Selector`] trait without knowing the chosen implementation.
//!
//! ```
//! use mosel::prelude::*;
//!
//! let config = SelectorConfig::builder()
//!   .kind(SelectorKind::Nsga2)
//!   .density(DensityKind::Crowding)
//!   .seed(42)
//!   .build();
//! let selector = config.build_selector::<Objectives>().unwrap();
//! assert_eq!(selector.kind(), SelectorKind::Nsga2);
//!
//! let invalid = SelectorConfig::builder().tournament(0).build();
//! assert_eq!(
//!   invalid.build_selector::<Objectives>().unwrap_err(),
//!   ConfigError::EmptyTournament
//! );
//! ```

use std::{fmt, hash::Hash};

use rand::{rngs::StdRng, SeedableRng};
use typed_builder::TypedBuilder;

use crate::{
  candidate::Candidate,
  density::{Crowding, FrontDensity, Hypervolume},
  error::ConfigError,
  selector::{elitism::Elitism, nsga::Nsga2, spea::Spea2, Selector},
};

/// Available selector implementations.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum SelectorKind {
  /// Non-dominated sorting with a density tie-breaker.
  #[default]
  Nsga2,
  /// Strength based fitness with nearest neighbour truncation.
  Spea2,
  /// Sum of objective values.
  Elitism,
}

impl fmt::Display for SelectorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SelectorKind::Nsga2 => write!(f, "NSGA-II"),
      SelectorKind::Spea2 => write!(f, "SPEA2"),
      SelectorKind::Elitism => write!(f, "Elitism"),
    }
  }
}

/// Available density indicators for NSGA-II.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum DensityKind {
  /// Hypervolume contribution.
  #[default]
  Hypervolume,
  /// Crowding distance.
  Crowding,
}

/// Parameters of a selector.
#[derive(Clone, PartialEq, Debug, TypedBuilder)]
pub struct SelectorConfig {
  /// Selector implementation. Defaults to NSGA-II.
  #[builder(default)]
  pub kind: SelectorKind,
  /// Contestants per tournament of NSGA-II and SPEA2. Defaults to 2.
  #[builder(default = 2)]
  pub tournament: usize,
  /// Density indicator of NSGA-II. Defaults to hypervolume.
  #[builder(default)]
  pub density: DensityKind,
  /// Nadir offset of the hypervolume indicator.
  #[builder(default = Hypervolume::DEFAULT_OFFSET)]
  pub offset: f64,
  /// Seed for reproducible tournaments; random if absent.
  #[builder(default, setter(strip_option))]
  pub seed: Option<u64>,
}

impl Default for SelectorConfig {
  fn default() -> Self {
    Self::builder().build()
  }
}

impl SelectorConfig {
  /// Checks the parameters.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.tournament == 0 {
      return Err(ConfigError::EmptyTournament);
    }
    if !self.offset.is_finite() || self.offset < 0.0 {
      return Err(ConfigError::InvalidOffset(self.offset));
    }
    Ok(())
  }

  /// Builds the configured selector for candidates of type `C`.
  pub fn build_selector<C>(&self) -> Result<AnySelector<C>, ConfigError> {
    self.validate()?;
    let rng = match self.seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_entropy(),
    };
    let selector = match self.kind {
      SelectorKind::Nsga2 => {
        let indicator = match self.density {
          DensityKind::Hypervolume => {
            FrontDensity::Hypervolume(Hypervolume::new(self.offset))
          }
          DensityKind::Crowding => FrontDensity::Crowding(Crowding),
        };
        AnySelector::Nsga2(
          Nsga2::builder()
            .tournament(self.tournament)
            .indicator(indicator)
            .rng(rng)
            .build(),
        )
      }
      SelectorKind::Spea2 => AnySelector::Spea2(
        Spea2::builder()
          .tournament(self.tournament)
          .rng(rng)
          .build(),
      ),
      SelectorKind::Elitism => {
        AnySelector::Elitism(Elitism::builder().rng(rng).build())
      }
    };
    Ok(selector)
  }
}

/// One of the selectors of this crate.
#[derive(Debug)]
pub enum AnySelector<C> {
  /// NSGA-II with a density indicator chosen at run time.
  Nsga2(Nsga2<FrontDensity>),
  /// SPEA2.
  Spea2(Spea2<C>),
  /// Elitism.
  Elitism(Elitism),
}

impl<C> AnySelector<C> {
  /// Returns the kind of the selector.
  pub fn kind(&self) -> SelectorKind {
    match self {
      AnySelector::Nsga2(_) => SelectorKind::Nsga2,
      AnySelector::Spea2(_) => SelectorKind::Spea2,
      AnySelector::Elitism(_) => SelectorKind::Elitism,
    }
  }
}

impl<C: Candidate + Clone + Eq + Hash> Selector<C> for AnySelector<C> {
  fn initialize(&mut self, capacity: usize) {
    match self {
      AnySelector::Nsga2(s) => Selector::<C>::initialize(s, capacity),
      AnySelector::Spea2(s) => s.initialize(capacity),
      AnySelector::Elitism(s) => Selector::<C>::initialize(s, capacity),
    }
  }

  fn select_mating_pool<'a>(
    &mut self,
    count: usize,
    population: &'a [C],
  ) -> Vec<&'a C> {
    match self {
      AnySelector::Nsga2(s) => s.select_mating_pool(count, population),
      AnySelector::Spea2(s) => s.select_mating_pool(count, population),
      AnySelector::Elitism(s) => s.select_mating_pool(count, population),
    }
  }

  fn select_survivors<'a>(
    &mut self,
    count: usize,
    population: &'a [C],
  ) -> Vec<&'a C> {
    match self {
      AnySelector::Nsga2(s) => s.select_survivors(count, population),
      AnySelector::Spea2(s) => s.select_survivors(count, population),
      AnySelector::Elitism(s) => s.select_survivors(count, population),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::fixtures::{ids, solutions, Solution};

  #[test]
  fn test_defaults() {
    let config = SelectorConfig::default();
    assert_eq!(config.kind, SelectorKind::Nsga2);
    assert_eq!(config.tournament, 2);
    assert_eq!(config.density, DensityKind::Hypervolume);
    assert_eq!(config.offset, 1.0);
    assert_eq!(config.seed, None);
    assert_eq!(config.validate(), Ok(()));
  }

  #[test]
  fn test_invalid_configs() {
    let config = SelectorConfig::builder().tournament(0).build();
    assert_eq!(config.validate(), Err(ConfigError::EmptyTournament));

    let config = SelectorConfig::builder().offset(-0.5).build();
    assert_eq!(
      config.build_selector::<Solution>().unwrap_err(),
      ConfigError::InvalidOffset(-0.5)
    );
    assert_eq!(
      ConfigError::InvalidOffset(f64::NAN).to_string(),
      "hypervolume offset must be finite and non-negative, got NaN"
    );
  }

  #[test]
  fn test_builds_each_kind() {
    let population =
      solutions(&[[1.0, 1.0], [2.0, 2.0], [3.0, 3.0], [0.0, 5.0]]);
    for kind in [
      SelectorKind::Nsga2,
      SelectorKind::Spea2,
      SelectorKind::Elitism,
    ] {
      let config = SelectorConfig::builder().kind(kind).seed(1).build();
      let mut selector = config.build_selector::<Solution>().unwrap();
      assert_eq!(selector.kind(), kind);
      selector.initialize(population.len());
      assert_eq!(selector.select_mating_pool(5, &population).len(), 5);
      assert_eq!(ids(selector.select_survivors(1, &population)), vec![2]);
    }
  }

  #[test]
  fn test_density_choice() {
    let config = SelectorConfig::builder()
      .density(DensityKind::Crowding)
      .build();
    let Ok(AnySelector::Nsga2(nsga)) = config.build_selector::<Solution>()
    else {
      panic!("expected NSGA-II");
    };
    assert_eq!(nsga.indicator(), &FrontDensity::Crowding(Crowding));

    let config = SelectorConfig::builder().offset(0.5).build();
    let Ok(AnySelector::Nsga2(nsga)) = config.build_selector::<Solution>()
    else {
      panic!("expected NSGA-II");
    };
    assert_eq!(
      nsga.indicator(),
      &FrontDensity::Hypervolume(Hypervolume::new(0.5))
    );
  }

  #[test]
  fn test_seeded_selectors_repeat_themselves() {
    let population = solutions(&[[1.0, 4.0], [2.0, 2.0], [4.0, 1.0]]);
    let config = SelectorConfig::builder().seed(7).build();
    let mut a = config.build_selector::<Solution>().unwrap();
    let mut b = config.build_selector::<Solution>().unwrap();
    assert_eq!(
      a.select_mating_pool(20, &population),
      b.select_mating_pool(20, &population)
    );
  }
}
