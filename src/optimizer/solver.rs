//! Seeded local-search solver for `AllocationModel`.
//!
//! Each worker builds a feasible assignment greedily, then improves it with
//! single-student moves and pairwise swaps under simulated annealing. Moves
//! that would leave the class-size band are never taken, so every visited
//! state is feasible. The search stops at the iteration cap or the wall-clock
//! budget, whichever comes first.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::time::{Duration, Instant};
use tracing::debug;

use super::model::AllocationModel;

/// Iterations between wall-clock checks.
const CLOCK_STRIDE: u64 = 128;

/// Search limits and seeding, derived from `OptimizerConfig::solver_settings`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverSettings {
    pub time_budget: Duration,
    pub seed: u64,
    pub workers: usize,
    pub max_iterations: u64,
}

/// Best assignment found by one worker.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Class index per student.
    pub classes: Vec<usize>,
    pub objective: f64,
    pub iterations: u64,
    pub worker: usize,
}

pub struct LocalSearchSolver {
    settings: SolverSettings,
}

impl LocalSearchSolver {
    pub fn new(settings: SolverSettings) -> Self {
        Self { settings }
    }

    /// Returns `None` only when the class-size band cannot be satisfied.
    pub fn solve(&self, model: &AllocationModel) -> Option<Solution> {
        let n = model.n_students();
        let k = model.n_classes();
        if !model.band().is_satisfiable(n, k) {
            return None;
        }

        let workers = self.settings.workers.max(1);
        let solutions: Vec<Solution> = (0..workers)
            .into_par_iter()
            .filter_map(|w| self.run_worker(model, w))
            .collect();

        // Strictly greater keeps the lowest worker on equal objectives.
        let mut best: Option<Solution> = None;
        for s in solutions {
            match &best {
                Some(b) if s.objective <= b.objective => {}
                _ => best = Some(s),
            }
        }
        best
    }

    fn run_worker(&self, model: &AllocationModel, worker: usize) -> Option<Solution> {
        let seed = self.settings.seed.wrapping_add(worker as u64);
        let mut rng = StdRng::seed_from_u64(seed);

        let mut classes = construct(model, &mut rng)?;
        let n = model.n_students();
        let k = model.n_classes();
        let band = model.band();

        let mut sizes = vec![0usize; k];
        for &c in &classes {
            sizes[c] += 1;
        }

        let mut current = model.objective(&classes);
        let mut best = current;
        let mut best_classes = classes.clone();
        let initial = current;

        let max_iterations = self.settings.max_iterations;
        let t0 = model.pair_weight_scale();
        let started = Instant::now();
        let mut iterations = 0u64;

        if n >= 2 && k >= 2 {
            while iterations < max_iterations {
                if iterations % CLOCK_STRIDE == 0 && started.elapsed() >= self.settings.time_budget {
                    break;
                }
                let progress = iterations as f64 / max_iterations as f64;
                let temperature = t0 * (1.0 - progress).powi(2);
                iterations += 1;

                if rng.gen_bool(0.5) {
                    let s = rng.gen_range(0..n);
                    let from = classes[s];
                    let mut to = rng.gen_range(0..k - 1);
                    if to >= from {
                        to += 1;
                    }
                    if sizes[from] <= band.min_size || sizes[to] >= band.max_size {
                        continue;
                    }
                    let delta = model.move_delta(&classes, s, to);
                    if accept(delta, temperature, &mut rng) {
                        classes[s] = to;
                        sizes[from] -= 1;
                        sizes[to] += 1;
                        current += delta;
                    } else {
                        continue;
                    }
                } else {
                    let a = rng.gen_range(0..n);
                    let b = rng.gen_range(0..n);
                    if classes[a] == classes[b] {
                        continue;
                    }
                    let delta = model.swap_delta(&classes, a, b);
                    if accept(delta, temperature, &mut rng) {
                        classes.swap(a, b);
                        current += delta;
                    } else {
                        continue;
                    }
                }

                if current > best {
                    best = current;
                    best_classes.clone_from(&classes);
                }
            }
        }

        let objective = model.objective(&best_classes);
        debug!(
            "Worker {} (seed {}): objective {:.3} -> {:.3} after {} iterations in {:?}",
            worker,
            seed,
            initial,
            objective,
            iterations,
            started.elapsed()
        );
        Some(Solution {
            classes: best_classes,
            objective,
            iterations,
            worker,
        })
    }
}

fn accept(delta: f64, temperature: f64, rng: &mut StdRng) -> bool {
    if delta >= 0.0 {
        return true;
    }
    temperature > 0.0 && rng.gen::<f64>() < (delta / temperature).exp()
}

/// Greedy feasible start. Class capacities start at the band minimum and are
/// raised round-robin until they cover every student; students are then
/// placed in shuffled order into the open class with the best marginal gain.
fn construct(model: &AllocationModel, rng: &mut StdRng) -> Option<Vec<usize>> {
    let n = model.n_students();
    let k = model.n_classes();
    let band = model.band();

    let mut capacity = vec![band.min_size; k];
    let mut remaining = n.checked_sub(band.min_size * k)?;
    while remaining > 0 {
        let mut grew = false;
        for cap in capacity.iter_mut() {
            if remaining == 0 {
                break;
            }
            if *cap < band.max_size {
                *cap += 1;
                remaining -= 1;
                grew = true;
            }
        }
        if !grew {
            return None;
        }
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);

    let mut placed: Vec<Option<usize>> = vec![None; n];
    let mut sizes = vec![0usize; k];
    for &s in &order {
        let mut choice: Option<(usize, f64)> = None;
        for c in 0..k {
            if sizes[c] >= capacity[c] {
                continue;
            }
            let gain = model.unary(s, c)
                + model
                    .neighbours(s)
                    .iter()
                    .filter(|(t, _)| placed[*t] == Some(c))
                    .map(|(_, w)| w)
                    .sum::<f64>();
            match choice {
                Some((_, g)) if gain <= g => {}
                _ => choice = Some((c, gain)),
            }
        }
        let (c, _) = choice?;
        placed[s] = Some(c);
        sizes[c] += 1;
    }

    placed.into_iter().collect()
}
