//! Property tests for the alignment, scoring and optimizer invariants.

use proptest::prelude::*;
use soft_bisim::algorithms::bigram::{bigram_count, extract_bigrams};
use soft_bisim::algorithms::soft_bisim::{alignment_matrix, weighted_bigram_distance};
use soft_bisim::{
    CostModel, FitnessEvaluator, OptimizerConfig, ScoreMode, SoftBisim, TrainingSet, WeightOptimizer,
};

fn costs() -> impl Strategy<Value = CostModel> {
    prop::array::uniform9(0.0f64..2.0).prop_map(CostModel::from_array)
}

fn name() -> impl Strategy<Value = String> {
    "[a-zA-Zа-яА-Я]{0,10}"
}

fn distance(a: &str, b: &str, w: &CostModel) -> f64 {
    weighted_bigram_distance(&extract_bigrams(a), &extract_bigrams(b), w)
}

proptest! {
    /// Aligning a sequence with itself walks the diagonal.
    #[test]
    fn identity_costs_one_match_per_bigram(s in name(), w in costs()) {
        let expected = bigram_count(&s) as f64 * w.match_cost;
        prop_assert!((distance(&s, &s, &w) - expected).abs() < 1e-9);
    }

    #[test]
    fn symmetric_when_insert_equals_delete(a in name(), b in name(), w in costs()) {
        let w = CostModel { delete: w.insert, ..w };
        prop_assert!((distance(&a, &b, &w) - distance(&b, &a, &w)).abs() < 1e-9);
    }

    #[test]
    fn empty_side_costs_inserts_or_deletes(s in name(), w in costs()) {
        let n = bigram_count(&s) as f64;
        prop_assert!((distance("", &s, &w) - n * w.insert).abs() < 1e-9);
        prop_assert!((distance(&s, "", &w) - n * w.delete).abs() < 1e-9);
    }

    #[test]
    fn rolling_rows_match_full_matrix(a in name(), b in name(), w in costs()) {
        let ba = extract_bigrams(&a);
        let bb = extract_bigrams(&b);
        let full = alignment_matrix(&ba, &bb, &w);
        prop_assert!((full.distance() - weighted_bigram_distance(&ba, &bb, &w)).abs() < 1e-9);
    }

    /// Raising one coefficient never makes any alignment cheaper.
    #[test]
    fn distance_is_monotone_in_each_cost(
        a in name(),
        b in name(),
        w in costs(),
        index in 0usize..9,
        bump in 0.0f64..3.0,
    ) {
        let mut raised = w.to_array();
        raised[index] += bump;
        let raised = CostModel::from_array(raised);
        prop_assert!(distance(&a, &b, &raised) >= distance(&a, &b, &w) - 1e-9);
    }

    #[test]
    fn similarity_bounds(a in name(), b in name(), w in costs()) {
        let w = CostModel { match_cost: 0.0, ..w };
        let raw = SoftBisim::new(w).unwrap();
        prop_assert!(raw.score(&a, &b) <= 1.0);

        let clamped = raw.with_score_mode(ScoreMode::Clamped);
        let s = clamped.score(&a, &b);
        prop_assert!((0.0..=1.0).contains(&s));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn best_fitness_never_decreases(
        pairs in prop::collection::vec((name(), name()), 1..6),
        seed in any::<u64>(),
    ) {
        let set = TrainingSet::from_positive_pairs(pairs);
        let evaluator = FitnessEvaluator::new(&set).unwrap();
        let config = OptimizerConfig::default()
            .with_population_size(6)
            .with_generations(8)
            .with_seed(seed);
        let result = WeightOptimizer::new(config).unwrap().run(&evaluator).unwrap();

        prop_assert_eq!(result.history.len(), 8);
        for w in result.history.windows(2) {
            prop_assert!(w[1] >= w[0]);
        }
    }
}
