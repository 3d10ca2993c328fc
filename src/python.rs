//! Python bindings, built with the `python` feature.

use crate::algorithms::bigram::{bigram_to_string, extract_bigrams as rust_extract_bigrams};
use crate::algorithms::language::detect_language as rust_detect_language;
use crate::algorithms::normalize::{normalize_name as rust_normalize_name, NormalizationMode};
use crate::algorithms::similarity::ScoreMode;
use crate::algorithms::soft_bisim::SoftBisim;
use crate::algorithms::weights::{CostModel, COST_COUNT};
use crate::batch::{self, MatchResult};
use crate::error::Error;
use crate::optimize::{FitnessEvaluator, OptimizationResult, OptimizerConfig, TrainingSet, WeightOptimizer};
use pyo3::create_exception;
use pyo3::prelude::*;
use std::time::Duration;

// SoftBisimError (base)
//   └── ValidationError - bad costs, config values or training data
create_exception!(soft_bisim, SoftBisimError, pyo3::exceptions::PyException);
create_exception!(soft_bisim, ValidationError, SoftBisimError);

impl From<Error> for PyErr {
    fn from(err: Error) -> PyErr {
        match err {
            Error::InvalidCost { .. }
            | Error::EmptyTrainingSet
            | Error::MissingLabel(_)
            | Error::InvalidConfig(_)
            | Error::Parse { .. } => ValidationError::new_err(err.to_string()),
            Error::Json(_) | Error::Io(_) => SoftBisimError::new_err(err.to_string()),
        }
    }
}

/// Edit cost coefficients.
#[pyclass(name = "CostModel", module = "soft_bisim._core")]
#[derive(Clone, Copy, Debug)]
pub struct PyCostModel {
    inner: CostModel,
}

#[pymethods]
impl PyCostModel {
    #[new]
    #[pyo3(signature = (
        match_cost=0.0, replace=1.0, insert=1.0, delete=1.0, transposition=1.0,
        merge=1.0, split=1.0, case_change=1.0, phonetic_change=1.0
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        match_cost: f64,
        replace: f64,
        insert: f64,
        delete: f64,
        transposition: f64,
        merge: f64,
        split: f64,
        case_change: f64,
        phonetic_change: f64,
    ) -> PyResult<Self> {
        let inner = CostModel::new(
            match_cost,
            replace,
            insert,
            delete,
            transposition,
            merge,
            split,
            case_change,
            phonetic_change,
        )?;
        Ok(Self { inner })
    }

    #[staticmethod]
    fn balanced() -> Self {
        Self {
            inner: CostModel::balanced(),
        }
    }

    /// Build from nine values in field order.
    #[staticmethod]
    fn from_list(values: Vec<f64>) -> PyResult<Self> {
        let array: [f64; COST_COUNT] = values.try_into().map_err(|v: Vec<f64>| {
            ValidationError::new_err(format!("expected {} costs, got {}", COST_COUNT, v.len()))
        })?;
        let inner = CostModel::from_array(array);
        inner.validate()?;
        Ok(Self { inner })
    }

    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        Ok(Self {
            inner: CostModel::from_json(json)?,
        })
    }

    fn to_json(&self) -> PyResult<String> {
        Ok(self.inner.to_json()?)
    }

    fn to_list(&self) -> Vec<f64> {
        self.inner.to_array().to_vec()
    }

    #[getter]
    fn match_cost(&self) -> f64 {
        self.inner.match_cost
    }

    #[getter]
    fn replace(&self) -> f64 {
        self.inner.replace
    }

    #[getter]
    fn insert(&self) -> f64 {
        self.inner.insert
    }

    #[getter]
    fn delete(&self) -> f64 {
        self.inner.delete
    }

    #[getter]
    fn transposition(&self) -> f64 {
        self.inner.transposition
    }

    #[getter]
    fn merge(&self) -> f64 {
        self.inner.merge
    }

    #[getter]
    fn split(&self) -> f64 {
        self.inner.split
    }

    #[getter]
    fn case_change(&self) -> f64 {
        self.inner.case_change
    }

    #[getter]
    fn phonetic_change(&self) -> f64 {
        self.inner.phonetic_change
    }

    fn __repr__(&self) -> String {
        let w = &self.inner;
        format!(
            "CostModel(match={:.3}, replace={:.3}, insert={:.3}, delete={:.3}, transposition={:.3}, \
             merge={:.3}, split={:.3}, case_change={:.3}, phonetic_change={:.3})",
            w.match_cost,
            w.replace,
            w.insert,
            w.delete,
            w.transposition,
            w.merge,
            w.split,
            w.case_change,
            w.phonetic_change
        )
    }

    fn __eq__(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

/// Result of `optimize_weights`.
#[pyclass(name = "OptimizationResult", module = "soft_bisim._core")]
#[derive(Clone, Debug)]
pub struct PyOptimizationResult {
    inner: OptimizationResult,
}

#[pymethods]
impl PyOptimizationResult {
    #[getter]
    fn best(&self) -> PyCostModel {
        PyCostModel {
            inner: self.inner.best,
        }
    }

    #[getter]
    fn best_fitness(&self) -> f64 {
        self.inner.best_fitness
    }

    #[getter]
    fn generations_run(&self) -> usize {
        self.inner.generations_run
    }

    #[getter]
    fn history(&self) -> Vec<f64> {
        self.inner.history.clone()
    }

    #[getter]
    fn stopped_early(&self) -> bool {
        self.inner.stopped_early
    }

    fn to_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.inner).map_err(|e| Error::from(e).into())
    }

    fn __repr__(&self) -> String {
        format!(
            "OptimizationResult(best_fitness={:.4}, generations_run={}, stopped_early={})",
            self.inner.best_fitness, self.inner.generations_run, self.inner.stopped_early
        )
    }
}

#[pymethods]
impl MatchResult {
    fn __repr__(&self) -> String {
        match self.id {
            Some(id) => format!("MatchResult(text='{}', score={:.3}, id={})", self.text, self.score, id),
            None => format!("MatchResult(text='{}', score={:.3})", self.text, self.score),
        }
    }
}

fn build_scorer(
    weights: Option<PyCostModel>,
    normalize: &str,
    clamp: bool,
) -> PyResult<SoftBisim<NormalizationMode>> {
    let mode = NormalizationMode::parse(normalize).ok_or_else(|| {
        ValidationError::new_err(format!(
            "Unknown normalization mode '{}'. Valid: phonetic, lowercase, raw",
            normalize
        ))
    })?;
    let weights = weights.map_or_else(CostModel::balanced, |w| w.inner);
    let score_mode = if clamp { ScoreMode::Clamped } else { ScoreMode::Raw };
    Ok(SoftBisim::with_normalizer(weights, mode)?.with_score_mode(score_mode))
}

/// Soft-Bisim distance between two names.
#[pyfunction]
#[pyo3(signature = (a, b, weights=None, normalize="phonetic"))]
fn soft_bisim_distance(a: &str, b: &str, weights: Option<PyCostModel>, normalize: &str) -> PyResult<f64> {
    Ok(build_scorer(weights, normalize, false)?.distance(a, b))
}

/// Soft-Bisim similarity between two names; unbounded below unless `clamp`.
#[pyfunction]
#[pyo3(signature = (a, b, weights=None, normalize="phonetic", clamp=false))]
fn soft_bisim_similarity(
    a: &str,
    b: &str,
    weights: Option<PyCostModel>,
    normalize: &str,
    clamp: bool,
) -> PyResult<f64> {
    Ok(build_scorer(weights, normalize, clamp)?.score(a, b))
}

/// Language tag the heuristic detector assigns to `name`.
#[pyfunction]
fn detect_language(name: &str) -> &'static str {
    rust_detect_language(name).as_str()
}

/// Phonetically normalized form of `name`.
#[pyfunction]
fn normalize_name(name: &str) -> String {
    rust_normalize_name(name).into_string()
}

/// Adjacent character pairs of `s`.
#[pyfunction]
fn extract_bigrams(s: &str) -> Vec<String> {
    rust_extract_bigrams(s).iter().map(bigram_to_string).collect()
}

/// Optimize a cost model for a list of `(left, right)` matching pairs.
///
/// The GIL is released while the optimizer runs.
#[pyfunction]
#[pyo3(signature = (
    pairs, generations=100, population_size=50, mutation_rate=0.1,
    seed=None, time_budget=None, workers=None
))]
#[allow(clippy::too_many_arguments)]
fn optimize_weights(
    py: Python<'_>,
    pairs: Vec<(String, String)>,
    generations: usize,
    population_size: usize,
    mutation_rate: f64,
    seed: Option<u64>,
    time_budget: Option<f64>,
    workers: Option<usize>,
) -> PyResult<PyOptimizationResult> {
    let mut config = OptimizerConfig::default()
        .with_generations(generations)
        .with_population_size(population_size)
        .with_mutation_rate(mutation_rate);
    config.seed = seed;
    config.workers = workers;
    if let Some(secs) = time_budget {
        let budget = Duration::try_from_secs_f64(secs)
            .map_err(|_| ValidationError::new_err(format!("time_budget must be a non-negative number of seconds, got {}", secs)))?;
        config = config.with_time_budget(budget);
    }

    let set = TrainingSet::from_positive_pairs(pairs);
    let inner = py.allow_threads(|| -> crate::Result<OptimizationResult> {
        let optimizer = WeightOptimizer::new(config)?;
        let evaluator = FitnessEvaluator::new(&set)?;
        optimizer.run(&evaluator)
    })?;
    Ok(PyOptimizationResult { inner })
}

/// Top matches for `query` among `choices`, best first.
#[pyfunction]
#[pyo3(signature = (query, choices, weights=None, limit=10, min_similarity=0.0, normalize="phonetic"))]
fn extract(
    py: Python<'_>,
    query: &str,
    choices: Vec<String>,
    weights: Option<PyCostModel>,
    limit: usize,
    min_similarity: f64,
    normalize: &str,
) -> PyResult<Vec<MatchResult>> {
    let scorer = build_scorer(weights, normalize, false)?;
    Ok(py.allow_threads(|| batch::extract(&scorer, query, &choices, limit, min_similarity)))
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let py = m.py();
    m.add("SoftBisimError", py.get_type::<SoftBisimError>())?;
    m.add("ValidationError", py.get_type::<ValidationError>())?;

    m.add_class::<PyCostModel>()?;
    m.add_class::<PyOptimizationResult>()?;
    m.add_class::<MatchResult>()?;

    m.add_function(wrap_pyfunction!(soft_bisim_distance, m)?)?;
    m.add_function(wrap_pyfunction!(soft_bisim_similarity, m)?)?;
    m.add_function(wrap_pyfunction!(detect_language, m)?)?;
    m.add_function(wrap_pyfunction!(normalize_name, m)?)?;
    m.add_function(wrap_pyfunction!(extract_bigrams, m)?)?;
    m.add_function(wrap_pyfunction!(optimize_weights, m)?)?;
    m.add_function(wrap_pyfunction!(extract, m)?)?;
    Ok(())
}
