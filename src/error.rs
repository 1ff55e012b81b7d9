//! Errors reported when building selectors from a configuration.

use thiserror::Error;

/// An invalid [`SelectorConfig`](crate::config::SelectorConfig).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
  /// A tournament without contestants cannot pick a parent.
  #[error("tournament needs at least one contestant")]
  EmptyTournament,
  /// The hypervolume nadir offset must be finite and non-negative.
  #[error("hypervolume offset must be finite and non-negative, got {0}")]
  InvalidOffset(f64),
}
