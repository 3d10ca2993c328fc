//! Cost model tuning
//!
//! A labeled [`TrainingSet`] is prepared once into a [`FitnessEvaluator`],
//! which a [`WeightOptimizer`] then drives over many candidate cost models.

pub mod dataset;
pub mod fitness;
pub mod genetic;

pub use dataset::{LabeledPair, TrainingSet};
pub use fitness::{fitness, FitnessEvaluator, FitnessObjective};
pub use genetic::{optimize_weights, OptimizationResult, OptimizerConfig, WeightOptimizer};
