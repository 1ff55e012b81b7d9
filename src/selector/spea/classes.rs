//! Equivalence classes of candidates tracked by SPEA2 across generations.

use std::{
  collections::{HashMap, HashSet, VecDeque},
  hash::Hash,
};

use log::{debug, trace, warn};

use crate::{
  candidate::Candidate,
  score::{ParetoDominance, Score},
};

/// Handle of a class slot, also its row in the distance matrix.
pub(crate) type ClassId = usize;

/// Candidates sharing the same minimization array.
#[derive(Clone, Debug)]
pub(crate) struct Class {
  pub scores: Vec<Score>,
  pub size: usize,
  pub strength: usize,
  pub fitness: usize,
}

impl Class {
  fn new(scores: Vec<Score>) -> Self {
    Self {
      scores,
      size: 1,
      strength: 0,
      fitness: 0,
    }
  }
}

/// A slot arena of classes with a dense distance matrix between slots.
///
/// Slots of dissolved classes are recycled in the order they were freed.
/// The arena grows beyond its initial capacity when needed.
#[derive(Debug)]
pub(crate) struct Classes<C> {
  slots: Vec<Option<Class>>,
  free: VecDeque<ClassId>,
  distances: Vec<Vec<f64>>,
  index: HashMap<C, ClassId>,
  capacity: usize,
  fitness_dirty: bool,
}

impl<C> Default for Classes<C> {
  fn default() -> Self {
    Self {
      slots: Vec::new(),
      free: VecDeque::new(),
      distances: Vec::new(),
      index: HashMap::new(),
      capacity: 0,
      fitness_dirty: false,
    }
  }
}

impl<C: Candidate + Clone + Eq + Hash> Classes<C> {
  /// Creates an empty arena with `capacity` preallocated slots.
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      slots: vec![None; capacity],
      free: (0..capacity).collect(),
      distances: vec![vec![0.0; capacity]; capacity],
      index: HashMap::with_capacity(capacity),
      capacity,
      fitness_dirty: false,
    }
  }

  /// Returns the number of live classes.
  pub fn len(&self) -> usize {
    self.slots.len() - self.free.len()
  }

  /// Returns the number of tracked candidates.
  pub fn candidate_count(&self) -> usize {
    self.index.len()
  }

  /// Returns the number of slots, live or free.
  pub fn slot_count(&self) -> usize {
    self.slots.len()
  }

  /// Returns the class a candidate belongs to.
  pub fn class_of(&self, candidate: &C) -> Option<ClassId> {
    self.index.get(candidate).copied()
  }

  /// Returns the live class in slot `id`.
  ///
  /// # Panics
  ///
  /// Panics if the slot is free.
  pub fn get(&self, id: ClassId) -> &Class {
    self.slots[id]
      .as_ref()
      .unwrap_or_else(|| panic!("class slot {id} is free"))
  }

  /// Iterates over live classes in slot order.
  pub fn iter(&self) -> impl Iterator<Item = (ClassId, &Class)> {
    self
      .slots
      .iter()
      .enumerate()
      .filter_map(|(id, slot)| slot.as_ref().map(|class| (id, class)))
  }

  /// Returns the distance between two classes.
  pub fn distance(&self, a: ClassId, b: ClassId) -> f64 {
    self.distances[a][b]
  }

  /// Returns the distance from class `id` to the closest other class, or
  /// `f64::MAX` if there is no other class.
  pub fn min_distance(&self, id: ClassId) -> f64 {
    self
      .iter()
      .filter(|&(other, _)| other != id)
      .map(|(other, _)| self.distance(id, other))
      .fold(f64::MAX, f64::min)
  }

  /// Brings the tracked candidates in line with `population` and recomputes
  /// strength and fitness if anything changed.
  pub fn update(&mut self, population: &[C]) {
    let present: HashSet<&C> = population.iter().collect();
    let mut gone: Vec<(ClassId, C)> = self
      .index
      .iter()
      .filter(|(candidate, _)| !present.contains(candidate))
      .map(|(candidate, &id)| (id, candidate.clone()))
      .collect();
    // keeps the order of freed slots independent of hashing
    gone.sort_by_key(|&(id, _)| id);

    let mut added = 0;
    for (_, candidate) in &gone {
      self.remove(candidate);
    }
    for candidate in population {
      if !self.index.contains_key(candidate) {
        self.add(candidate.clone());
        added += 1;
      }
    }
    if !gone.is_empty() || added > 0 {
      debug!(
        "tracking {} candidates in {} classes: {} removed, {added} added",
        self.candidate_count(),
        self.len(),
        gone.len()
      );
    }

    debug_assert_eq!(
      self.candidate_count(),
      present.len(),
      "tracked candidates must match the population"
    );

    if self.fitness_dirty {
      self.assign_fitness();
      self.fitness_dirty = false;
    }
  }

  /// Starts tracking `candidate`, merging it into a class with an identical
  /// minimization array if there is one.
  pub fn add(&mut self, candidate: C) {
    let scores = candidate.objectives().array();
    let mut row = Vec::with_capacity(self.len());
    let mut equal = None;
    for (other, class) in self.iter() {
      let distance = scores.distance(&class.scores);
      if distance == 0.0 {
        equal = Some(other);
        break;
      }
      row.push((other, distance));
    }

    let id = match equal {
      Some(id) => {
        trace!("merging a candidate into class {id}");
        if let Some(class) = self.slots[id].as_mut() {
          class.size += 1;
        }
        id
      }
      None => {
        let id = self.allocate();
        for (other, distance) in row {
          self.distances[id][other] = distance;
          self.distances[other][id] = distance;
        }
        self.distances[id][id] = 0.0;
        self.slots[id] = Some(Class::new(scores.to_vec()));
        id
      }
    };

    self.index.insert(candidate, id);
    self.fitness_dirty = true;
  }

  /// Stops tracking `candidate`. Its class is dissolved once it has no
  /// members left.
  pub fn remove(&mut self, candidate: &C) {
    let Some(id) = self.index.remove(candidate) else {
      return;
    };
    let dissolved = match self.slots[id].as_mut() {
      Some(class) if class.size > 1 => {
        class.size -= 1;
        false
      }
      _ => true,
    };
    if dissolved {
      self.slots[id] = None;
      self.free.push_back(id);
    }
    self.fitness_dirty = true;
  }

  /// Recomputes strength and raw fitness of every class.
  ///
  /// The strength of a class is the number of candidates it dominates. The
  /// raw fitness of a class is the sum of `strength * size` over all classes
  /// dominating it, so non-dominated classes have a fitness of 0.
  pub fn assign_fitness(&mut self) {
    let live: Vec<ClassId> = self.iter().map(|(id, _)| id).collect();
    let dominates = |a: ClassId, b: ClassId| {
      self.get(a).scores.dominates(&self.get(b).scores)
    };

    let strengths: Vec<usize> = live
      .iter()
      .map(|&a| {
        live
          .iter()
          .filter(|&&b| a != b && dominates(a, b))
          .map(|&b| self.get(b).size)
          .sum()
      })
      .collect();
    let fitnesses: Vec<usize> = live
      .iter()
      .map(|&a| {
        live
          .iter()
          .zip(&strengths)
          .filter(|(&b, _)| a != b && dominates(b, a))
          .map(|(&b, &strength)| strength * self.get(b).size)
          .sum()
      })
      .collect();

    let assigned = live.into_iter().zip(strengths).zip(fitnesses);
    for ((id, strength), fitness) in assigned {
      if let Some(class) = self.slots[id].as_mut() {
        class.strength = strength;
        class.fitness = fitness;
      }
    }
  }

  fn allocate(&mut self) -> ClassId {
    if let Some(id) = self.free.pop_front() {
      return id;
    }

    let id = self.slots.len();
    if id == self.capacity {
      warn!(
        "more than {} distinct candidates, growing class storage",
        self.capacity
      );
    }
    self.slots.push(None);
    for row in &mut self.distances {
      row.push(0.0);
    }
    self.distances.push(vec![0.0; id + 1]);
    id
  }
}
