//! Random-search weight optimizer
//!
//! A population of random cost models is scored every generation. The best
//! model ever seen is kept, and each candidate is independently rerolled
//! with probability `mutation_rate`. There is no crossover and no
//! selection pressure on the population itself; only the best-ever record
//! improves.
//!
//! Candidates are scored in parallel, then best tracking and mutation run
//! in candidate order. A seeded run is therefore reproducible regardless of
//! thread count.

use crate::algorithms::weights::CostModel;
use crate::error::{Error, Result};
use crate::optimize::dataset::TrainingSet;
use crate::optimize::fitness::FitnessEvaluator;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Optimizer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Candidates per generation (default 50)
    pub population_size: usize,

    /// Generations to run (default 100)
    pub generations: usize,

    /// Per-candidate probability of a full reroll after scoring (default 0.1)
    pub mutation_rate: f64,

    /// RNG seed; `None` seeds from OS entropy
    pub seed: Option<u64>,

    /// Wall-clock limit, checked between generations
    pub time_budget: Option<Duration>,

    /// Score candidates on rayon (default true)
    pub parallel: bool,

    /// Run on a dedicated pool of this many threads instead of the global pool
    pub workers: Option<usize>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 100,
            mutation_rate: 0.1,
            seed: None,
            time_budget: None,
            parallel: true,
            workers: None,
        }
    }
}

impl OptimizerConfig {
    #[must_use]
    pub fn with_population_size(mut self, population_size: usize) -> Self {
        self.population_size = population_size;
        self
    }

    #[must_use]
    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    #[must_use]
    pub fn with_mutation_rate(mut self, mutation_rate: f64) -> Self {
        self.mutation_rate = mutation_rate;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Check that every setting is in range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] describing the first bad setting.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(Error::invalid_config("population_size must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(Error::invalid_config(format!(
                "mutation_rate must be in [0, 1], got {}",
                self.mutation_rate
            )));
        }
        if self.workers == Some(0) {
            return Err(Error::invalid_config("workers must be at least 1"));
        }
        Ok(())
    }
}

/// Outcome of an optimizer run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Best cost model seen
    pub best: CostModel,
    /// Fitness of `best`
    pub best_fitness: f64,
    /// Generations completed
    pub generations_run: usize,
    /// Best-ever fitness after each completed generation; never decreases
    pub history: Vec<f64>,
    /// Whether the time budget or the stop flag ended the run
    pub stopped_early: bool,
}

/// Drives a [`FitnessEvaluator`] over generations of random cost models.
///
/// # Example
///
/// ```
/// use soft_bisim::optimize::{FitnessEvaluator, OptimizerConfig, TrainingSet, WeightOptimizer};
///
/// let set = TrainingSet::from_positive_pairs([("Schwarz", "Schwartz"), ("Juan", "Huan")]);
/// let evaluator = FitnessEvaluator::new(&set).unwrap();
/// let config = OptimizerConfig::default()
///     .with_population_size(8)
///     .with_generations(5)
///     .with_seed(7);
/// let result = WeightOptimizer::new(config).unwrap().run(&evaluator).unwrap();
/// assert_eq!(result.history.len(), 5);
/// ```
#[derive(Debug)]
pub struct WeightOptimizer {
    config: OptimizerConfig,
    stop: Arc<AtomicBool>,
}

impl WeightOptimizer {
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `config` fails validation.
    pub fn new(config: OptimizerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    #[must_use]
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Flag that ends a running optimization at the next generation boundary
    /// when set to `true`.
    #[must_use]
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Run the configured number of generations.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if a dedicated thread pool was
    /// requested and could not be built.
    pub fn run(&self, evaluator: &FitnessEvaluator) -> Result<OptimizationResult> {
        match self.config.workers {
            Some(workers) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .build()
                    .map_err(|e| Error::invalid_config(format!("failed to create thread pool: {e}")))?;
                Ok(pool.install(|| self.evolve(evaluator)))
            }
            None => Ok(self.evolve(evaluator)),
        }
    }

    fn score_population(&self, population: &[CostModel], evaluator: &FitnessEvaluator) -> Vec<f64> {
        if self.config.parallel {
            population.par_iter().map(|w| evaluator.evaluate(w)).collect()
        } else {
            population.iter().map(|w| evaluator.evaluate(w)).collect()
        }
    }

    fn out_of_budget(&self, started: Instant) -> bool {
        if self.stop.load(Ordering::Relaxed) {
            log::warn!("Optimization stopped by request");
            return true;
        }
        match self.config.time_budget {
            Some(budget) if started.elapsed() >= budget => {
                log::warn!("Optimization time budget of {:?} exhausted", budget);
                true
            }
            _ => false,
        }
    }

    fn evolve(&self, evaluator: &FitnessEvaluator) -> OptimizationResult {
        let config = &self.config;
        let started = Instant::now();
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut population: Vec<CostModel> = (0..config.population_size)
            .map(|_| CostModel::random(&mut rng))
            .collect();
        let mut best = population[0];
        let mut best_fitness = evaluator.evaluate(&best);

        log::info!(
            "Optimizing cost model: {} pairs, population {}, {} generations",
            evaluator.len(),
            config.population_size,
            config.generations
        );

        let mut history = Vec::with_capacity(config.generations);
        let mut stopped_early = false;

        for generation in 0..config.generations {
            if self.out_of_budget(started) {
                stopped_early = true;
                break;
            }

            let scores = self.score_population(&population, evaluator);

            let mut mutations = 0usize;
            for (candidate, score) in population.iter_mut().zip(scores) {
                if score > best_fitness {
                    log::trace!("Generation {}: new best {:.6} (was {:.6})", generation, score, best_fitness);
                    best_fitness = score;
                    best = *candidate;
                }
                if rng.gen::<f64>() < config.mutation_rate {
                    *candidate = CostModel::random(&mut rng);
                    mutations += 1;
                }
            }

            history.push(best_fitness);
            log::debug!(
                "Generation {}: best {:.6}, {} mutations",
                generation,
                best_fitness,
                mutations
            );
        }

        log::info!(
            "Optimization finished after {} generations in {:?}: best fitness {:.6}",
            history.len(),
            started.elapsed(),
            best_fitness
        );

        OptimizationResult {
            best,
            best_fitness,
            generations_run: history.len(),
            history,
            stopped_early,
        }
    }
}

/// Optimize a cost model for `set` with default settings otherwise.
///
/// # Errors
///
/// Returns [`Error::EmptyTrainingSet`] for an empty set and
/// [`Error::InvalidConfig`] for a zero population.
pub fn optimize_weights(set: &TrainingSet, generations: usize, population_size: usize) -> Result<CostModel> {
    let config = OptimizerConfig::default()
        .with_generations(generations)
        .with_population_size(population_size);
    let optimizer = WeightOptimizer::new(config)?;
    let evaluator = FitnessEvaluator::new(set)?;
    Ok(optimizer.run(&evaluator)?.best)
}
