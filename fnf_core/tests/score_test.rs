use fnf_core::config::JudgeConfig;
use fnf_core::gameplay::{ClearKind, Rating, ScoreState};

#[test]
fn test_hits_add_score_and_combo() {
    let mut score = ScoreState::default();
    score.on_hit(Rating::Sick);
    score.on_hit(Rating::Good);
    score.on_hit(Rating::Shit);

    assert_eq!(score.score(), 350 + 200 + 50);
    assert_eq!(score.combo(), 3);
    assert_eq!(score.max_combo(), 3);
    assert_eq!(score.rating_counts().get(Rating::Good), 1);
    assert_eq!(score.rating_counts().total(), 3);
}

#[test]
fn test_miss_resets_combo_but_keeps_max() {
    let mut score = ScoreState::default();
    score.on_hit(Rating::Sick);
    score.on_hit(Rating::Sick);
    score.on_miss();

    assert_eq!(score.combo(), 0);
    assert_eq!(score.max_combo(), 2);
    assert_eq!(score.misses(), 1);

    score.on_hit(Rating::Bad);
    assert_eq!(score.combo(), 1);
    assert_eq!(score.max_combo(), 2);
}

#[test]
fn test_sustain_tick_only_adds_score() {
    let mut score = ScoreState::default();
    score.on_sustain_tick(5);
    score.on_sustain_tick(10);

    assert_eq!(score.score(), 15);
    assert_eq!(score.combo(), 0);
    assert_eq!(score.rating_counts().total(), 0);
}

#[test]
fn test_accuracy_weights() {
    let mut score = ScoreState::default();
    assert_eq!(score.accuracy(), 0.0);

    score.on_hit(Rating::Sick); // 1.0
    score.on_hit(Rating::Bad); // 0.5
    score.on_miss(); // 0.0
    score.on_hit(Rating::Good); // 0.75

    assert!((score.accuracy() - 2.25 / 4.0).abs() < 1e-9);
}

#[test]
fn test_health_is_clamped() {
    let mut score = ScoreState::default();
    for _ in 0..100 {
        score.on_hit(Rating::Sick);
    }
    assert_eq!(score.health(), 2.0);

    for _ in 0..100 {
        score.on_miss();
    }
    assert_eq!(score.health(), 0.0);
}

#[test]
fn test_clear_kinds() {
    let mut score = ScoreState::default();
    assert_eq!(score.clear_kind(), ClearKind::None);

    score.on_hit(Rating::Sick);
    assert_eq!(score.clear_kind(), ClearKind::Sfc);

    score.on_hit(Rating::Good);
    assert_eq!(score.clear_kind(), ClearKind::Gfc);

    score.on_hit(Rating::Shit);
    assert_eq!(score.clear_kind(), ClearKind::Fc);

    score.on_miss();
    assert_eq!(score.clear_kind(), ClearKind::Clear);
}

#[test]
fn test_reset_restores_start() {
    let mut score = ScoreState::default();
    score.on_hit(Rating::Sick);
    score.on_miss();
    score.on_sustain_tick(20);
    score.reset();

    let snapshot = score.snapshot();
    assert_eq!(snapshot.score, 0);
    assert_eq!(snapshot.combo, 0);
    assert_eq!(snapshot.max_combo, 0);
    assert_eq!(snapshot.misses, 0);
    assert_eq!(snapshot.health, 1.0);
    assert_eq!(snapshot.clear, ClearKind::None);
}

#[test]
fn test_scores_follow_config() {
    let mut config = JudgeConfig::default();
    config.sick.score = 500;
    let mut score = ScoreState::new(&config);
    score.on_hit(Rating::Sick);
    assert_eq!(score.score(), 500);
}

#[test]
fn test_snapshot_serializes_camel_case() {
    let mut score = ScoreState::default();
    score.on_hit(Rating::Sick);
    let value = serde_json::to_value(score.snapshot()).unwrap();
    assert_eq!(value["maxCombo"], 1);
    assert_eq!(value["ratingCounts"]["sick"], 1);
    assert_eq!(value["clear"], "SFC");
}
