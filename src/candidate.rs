//! Read-only access to the objectives of a candidate solution.

use std::{rc::Rc, sync::Arc};

use crate::objectives::Objectives;

/// A candidate solution that has been evaluated.
///
/// Selectors only ever read the objectives of a candidate. Implement this
/// trait for your own individual type, or hand out `Rc`/`Arc` handles to it:
/// the trait is implemented for references and smart pointers of candidates.
///
/// The objectives of a candidate are expected to stay unchanged once the
/// candidate has been passed to a selector.
pub trait Candidate {
  /// Returns the objectives of the candidate.
  fn objectives(&self) -> &Objectives;
}

impl Candidate for Objectives {
  fn objectives(&self) -> &Objectives {
    self
  }
}

impl<C: Candidate + ?Sized> Candidate for &C {
  fn objectives(&self) -> &Objectives {
    (**self).objectives()
  }
}

impl<C: Candidate + ?Sized> Candidate for Box<C> {
  fn objectives(&self) -> &Objectives {
    (**self).objectives()
  }
}

impl<C: Candidate + ?Sized> Candidate for Rc<C> {
  fn objectives(&self) -> &Objectives {
    (**self).objectives()
  }
}

impl<C: Candidate + ?Sized> Candidate for Arc<C> {
  fn objectives(&self) -> &Objectives {
    (**self).objectives()
  }
}
