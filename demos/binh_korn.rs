use std::hash::{Hash, Hasher};

use mosel::prelude::*;
use rand::prelude::*;
use rand_distr::Normal;

// a candidate solution: a point `(x, y)` and its evaluated objectives
#[derive(Clone, Debug)]
struct Individual {
  id: usize,
  x: f64,
  y: f64,
  objectives: Objectives,
}

impl Individual {
  // objective functions f1(x, y) = 4x^2 + 4y^2 and
  // f2(x, y) = (x - 5)^2 + (y - 5)^2, subject to 0 <= x <= 5, 0 <= y <= 3
  fn new(id: usize, x: f64, y: f64) -> Self {
    let x = x.clamp(0.0, 5.0);
    let y = y.clamp(0.0, 3.0);
    let objectives = Objectives::new()
      .with(Objective::min("f1"), 4.0 * x.powi(2) + 4.0 * y.powi(2))
      .with(
        Objective::min("f2"),
        (x - 5.0).powi(2) + (y - 5.0).powi(2),
      );
    Self {
      id,
      x,
      y,
      objectives,
    }
  }
}

impl PartialEq for Individual {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

impl Eq for Individual {}

impl Hash for Individual {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.id.hash(state);
  }
}

impl Candidate for Individual {
  fn objectives(&self) -> &Objectives {
    &self.objectives
  }
}

fn main() {
  // pick a selector by name: `nsga2` (default), `spea2` or `elitism`
  let kind = match std::env::args().nth(1).as_deref() {
    Some("spea2") => SelectorKind::Spea2,
    Some("elitism") => SelectorKind::Elitism,
    _ => SelectorKind::Nsga2,
  };
  let config = SelectorConfig::builder().kind(kind).seed(42).build();
  let mut selector = config
    .build_selector::<Individual>()
    .unwrap_or_else(|e| panic!("invalid configuration: {e}"));

  let mut rng = StdRng::seed_from_u64(7);
  let normal = Normal::new(0.0, 0.3).unwrap();
  let population_size = 100;
  let offspring_size = 50;

  let mut next_id = 0;
  let mut population: Vec<Individual> = (0..population_size)
    .map(|_| {
      next_id += 1;
      Individual::new(next_id, rng.gen_range(0.0..5.0), rng.gen_range(0.0..3.0))
    })
    .collect();
  selector.initialize(population_size + offspring_size);

  for _ in 0..100 {
    // arithmetic crossover of two parents followed by gaussian mutation
    let parents: Vec<(f64, f64)> = selector
      .select_mating_pool(offspring_size * 2, &population)
      .into_iter()
      .map(|p| (p.x, p.y))
      .collect();
    for pair in parents.chunks(2) {
      let r: f64 = rng.gen_range(0.0..1.0);
      let x = pair[0].0 + r * (pair[1].0 - pair[0].0);
      let y = pair[0].1 + r * (pair[1].1 - pair[0].1);
      next_id += 1;
      population.push(Individual::new(
        next_id,
        x + normal.sample(&mut rng),
        y + normal.sample(&mut rng),
      ));
    }

    let removed: Vec<usize> = selector
      .select_survivors(offspring_size, &population)
      .into_iter()
      .map(|i| i.id)
      .collect();
    population.retain(|i| !removed.contains(&i.id));
  }

  let fronts = NonDominatedFronts::new(&population);
  println!(
    "{kind}: {} of {} solutions are Pareto optimal",
    fronts.front(0).len(),
    population.len()
  );
  println!("   f1    |   f2    ");
  for i in fronts.front(0).iter().take(10) {
    let scores = population[*i].objectives.array();
    println!("{:8.4} | {:8.4}", scores[0], scores[1]);
  }
  println!("   ...   |   ...   ");
}
