use soft_bisim::algorithms::bigram::extract_bigrams;
use soft_bisim::algorithms::soft_bisim::weighted_bigram_distance;
use soft_bisim::metrics::evaluate_threshold;
use soft_bisim::{
    detect_language, soft_bisim_similarity, CostModel, FitnessEvaluator, FitnessObjective, LabeledPair,
    LanguageTag, OptimizerConfig, SoftBisim, TrainingSet, WeightOptimizer,
};

const TRAINING_TSV: &str = "\
# left\tright\tmatching
Schwarz\tSchwartz\t1
Шварц\tSwarz\t1
Kowalczyk\tKovalchik\t1
Juan\tHuan\t1
Müller\tMueller\t1
Schwarz\tKowalczyk\t0
Juan\tAbramowitz\t0
Müller\tHernández\t0
";

#[test]
fn spelling_variants_score_near_one() {
    let w = CostModel::balanced();
    assert!(soft_bisim_similarity("Schwarz", "Schwartz", &w) > 0.95);
    assert!(soft_bisim_similarity("Шварц", "Swarz", &w) > 0.95);
}

#[test]
fn languages_are_detected() {
    assert_eq!(detect_language("Schwarz"), LanguageTag::German);
    assert_eq!(detect_language("Kowalczyk"), LanguageTag::Polish);
    assert_eq!(detect_language("Hernandez"), LanguageTag::Spanish);
    assert_eq!(detect_language("Шварц"), LanguageTag::Russian);
    assert_eq!(detect_language("כהן"), LanguageTag::Hebrew);
    assert_eq!(detect_language("Smith"), LanguageTag::Generic);
}

#[test]
fn bigram_swap_priced_as_one_transposition() {
    let swapped_a = [['x', 'y'], ['y', 'x']];
    let swapped_b = [['y', 'x'], ['x', 'y']];
    let w = CostModel {
        transposition: 0.3,
        ..CostModel::balanced()
    };
    assert!(weighted_bigram_distance(&swapped_a, &swapped_b, &w) < 2.0 * w.replace);
    assert_eq!(
        weighted_bigram_distance(&extract_bigrams("abcd"), &extract_bigrams("abdc"), &w),
        2.0 * w.replace
    );
}

#[test]
fn optimize_then_evaluate() {
    let set = TrainingSet::from_tsv(TRAINING_TSV).unwrap();
    assert_eq!(set.positive_count(), 5);
    assert_eq!(set.negative_count(), 3);

    let evaluator = FitnessEvaluator::new(&set)
        .unwrap()
        .with_objective(FitnessObjective::Separation)
        .unwrap();
    let config = OptimizerConfig::default()
        .with_population_size(20)
        .with_generations(10)
        .with_seed(2024);
    let result = WeightOptimizer::new(config).unwrap().run(&evaluator).unwrap();
    assert!(result.best_fitness > 0.0);

    let json = result.best.to_json().unwrap();
    let restored = CostModel::from_json(&json).unwrap();
    assert_eq!(restored, result.best);

    let scorer = SoftBisim::new(restored).unwrap();
    let cm = evaluate_threshold(&scorer, &set, 0.5);
    assert_eq!(cm.total(), set.len());
}

#[test]
fn training_set_from_json() {
    let set = TrainingSet::from_json_str(r#"[["Шварц", "Swarz"], {"left": "a", "right": "b", "matching": false}]"#).unwrap();
    assert_eq!(set.pairs()[0], LabeledPair::positive("Шварц", "Swarz"));
    assert_eq!(set.pairs()[1], LabeledPair::negative("a", "b"));
}
