//! **MOSEL** is the selection engine of a Multi-Objective evolutionary
//! optimizer. It decides, generation after generation, which candidate
//! solutions reproduce and which of them die when candidates are compared on
//! several, possibly conflicting, objectives at once.
//!
//! Here's a [quick start example](#example) for the impatient.
//!
//! This crate deliberately stays out of everything around selection: how a
//! candidate is encoded, how its objectives are evaluated, how offspring are
//! created, and how the population is stored. Those belong to the
//! optimization loop that drives a [`Selector`].
//!
//! # Objectives
//!
//! Each evaluated candidate carries [`Objectives`]: an ordered mapping from
//! [`Objective`]s, each minimized or maximized, to the [`Value`]s achieved in
//! them. For comparisons, objectives are turned into a *minimization array*
//! where lower is better in every dimension. Pareto dominance, equality and
//! distance between candidates are defined on these arrays (see [`score`]).
//!
//! Make your own candidate type selectable by implementing [`Candidate`].
//!
//! # Selectors
//!
//! A [`Selector`] is initialized once with the largest population size it
//! will see. Then, every generation, the optimization loop asks it for
//! candidates to remove with [`select_survivors`] and for parents with
//! [`select_mating_pool`]. This crate features three implementations:
//!
//! |                 | Rank                       | Tie-breaker                   | State between calls         |
//! |:----------------|:---------------------------|:------------------------------|:----------------------------|
//! | [`Nsga2`]       | non-dominated front        | [`DensityIndicator`]          | none                        |
//! | [`Spea2`]       | strength based raw fitness | distance to nearest neighbour | classes and their distances |
//! | [`Elitism`]     | sum of objective values    | population order              | none                        |
//!
//! [NSGA-II] breaks ties inside a front with a density indicator, either the
//! [`Hypervolume`] contribution of each member or its [`Crowding`] distance.
//! [SPEA-II] remembers candidates across calls so that distances between them
//! are computed only once.
//!
//! If the selector should be picked by configuration rather than in code,
//! build it from a [`SelectorConfig`].
//!
//! # Logging
//!
//! Selectors report what they do through the [`log`] facade. No logger is
//! installed by this crate.
//!
//! # Example
//!
//! A minimal generational loop for a toy problem with two objectives.
//! ```
//! use mosel::prelude::*;
//! use rand::{rngs::StdRng, Rng, SeedableRng};
//!
//! // evaluates candidate `x` against `f1(x) = x^2` and `f2(x) = (x - 2)^2`
//! let evaluate = |x: f64| {
//!   Objectives::new()
//!     .with(Objective::min("f1"), x.powi(2))
//!     .with(Objective::min("f2"), (x - 2.0).powi(2))
//! };
//!
//! let mut rng = StdRng::seed_from_u64(0);
//! let mut population: Vec<Objectives> =
//!   (0..20).map(|i| evaluate(i as f64 - 10.0)).collect();
//!
//! let mut selector = Nsga2::builder()
//!   .indicator(Hypervolume::default())
//!   .rng(StdRng::seed_from_u64(1))
//!   .build();
//! Selector::<Objectives>::initialize(&mut selector, 30);
//!
//! for _ in 0..50 {
//!   // a real optimizer would recombine and mutate the parents
//!   let offspring: Vec<Objectives> = selector
//!     .select_mating_pool(10, &population)
//!     .into_iter()
//!     .map(|_| evaluate(rng.gen_range(-10.0..10.0)))
//!     .collect();
//!   population.extend(offspring);
//!
//!   let removed: Vec<usize> = selector
//!     .select_survivors(10, &population)
//!     .into_iter()
//!     .map(|r| population.iter().position(|c| std::ptr::eq(c, r)).unwrap())
//!     .collect();
//!   population = population
//!     .into_iter()
//!     .enumerate()
//!     .filter(|(i, _)| !removed.contains(i))
//!     .map(|(_, c)| c)
//!     .collect();
//! }
//! assert_eq!(population.len(), 20);
//! ```
//!
//! [`select_survivors`]: Selector::select_survivors
//! [`select_mating_pool`]: Selector::select_mating_pool
//! [`Nsga2`]: crate::selector::nsga::Nsga2
//! [`Spea2`]: crate::selector::spea::Spea2
//! [`Elitism`]: crate::selector::elitism::Elitism
//! [`Candidate`]: crate::candidate::Candidate
//! [`Objective`]: crate::objective::Objective
//! [`Value`]: crate::objective::Value
//! [`Objectives`]: crate::objectives::Objectives
//! [`DensityIndicator`]: crate::density::DensityIndicator
//! [`Hypervolume`]: crate::density::Hypervolume
//! [`Crowding`]: crate::density::Crowding
//! [`SelectorConfig`]: crate::config::SelectorConfig
//! [`score`]: crate::score
//! [NSGA-II]: https://sci2s.ugr.es/sites/default/files/files/Teaching/OtherPostGraduateCourses/Metaheuristicas/Deb_NSGAII.pdf
//! [SPEA-II]: https://www.research-collection.ethz.ch/bitstream/handle/20.500.11850/145755/eth-24689-01.pdf

#![warn(missing_docs)]

pub mod candidate;
pub mod config;
pub mod density;
pub mod error;
pub mod front;
pub mod objective;
pub mod objectives;
pub mod score;
pub mod selector;

#[cfg(test)]
mod fixtures;

pub use selector::Selector;

/// Items needed to set up and drive a selector.
pub mod prelude {
  pub use crate::{
    candidate::Candidate,
    config::{AnySelector, DensityKind, SelectorConfig, SelectorKind},
    density::{Crowding, DensityIndicator, FrontDensity, Hypervolume},
    error::ConfigError,
    front::NonDominatedFronts,
    objective::{Objective, Sign, Value},
    objectives::Objectives,
    score::{ParetoDominance, Score},
    selector::{elitism::Elitism, nsga::Nsga2, spea::Spea2, Selector},
  };
}
