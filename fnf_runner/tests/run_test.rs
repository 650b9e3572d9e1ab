use std::{env, fs};

use fnf_core::chart::Lane;
use fnf_core::config::JudgeConfig;
use fnf_core::gameplay::{ClearKind, JudgeEvent, Rating};
use fnf_core::input::events::Phase;
use fnf_runner::{load_chart_from_str, load_config_from_path, load_inputs_from_str, run, RunOptions};

const CHART: &str = r#"{
    "song": {
        "song": "Tutorial",
        "bpm": 100,
        "speed": 1,
        "notes": [
            { "mustHitSection": true, "sectionNotes": [[1000, 0, 0], [2000, 3, 0], [1500, 2, 400]] },
            { "mustHitSection": false, "sectionNotes": [[3000, 1, 300]] }
        ]
    }
}"#;

fn options(frame_ms: f64) -> RunOptions {
    RunOptions {
        frame_ms,
        ..RunOptions::default()
    }
}

#[test]
fn test_load_chart_from_str() {
    let chart = load_chart_from_str(CHART).unwrap();
    assert_eq!(chart.meta.title, "Tutorial");
    assert_eq!(chart.len(), 4);

    let summary = chart.summary();
    assert_eq!(summary.player_notes, 3);
    assert_eq!(summary.opponent_notes, 1);
}

#[test]
fn test_invalid_chart_keeps_error_code() {
    let err = load_chart_from_str(r#"{ "notes": [{ "sectionNotes": [[0, 12, 0]] }] }"#).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("invalid chart"), "{message}");
    assert!(message.contains("E2002"), "{message}");
}

#[test]
fn test_malformed_json_is_reported() {
    let err = load_chart_from_str("{ not json").unwrap_err();
    assert!(format!("{err:#}").contains("failed to parse chart json"));
}

#[test]
fn test_autoplay_run_is_perfect() {
    let chart = load_chart_from_str(CHART).unwrap();
    let report = run(
        chart,
        JudgeConfig::default(),
        &RunOptions {
            autoplay: true,
            ..options(10.0)
        },
    )
    .unwrap();

    assert_eq!(report.result.misses, 0);
    assert_eq!(report.result.rating_counts.sick, 3);
    assert_eq!(report.result.clear, ClearKind::Sfc);
    assert!(report.result.score > 3 * 350);

    let opponent_hits = report
        .events
        .iter()
        .filter(|e| matches!(e.event, JudgeEvent::OpponentHit { .. }))
        .count();
    assert_eq!(opponent_hits, 1);
}

#[test]
fn test_replay_hits_and_misses() {
    let chart = load_chart_from_str(CHART).unwrap();
    let inputs = load_inputs_from_str(
        r#"[
            { "time": 1050, "lane": "left", "phase": "up" },
            { "time": 1000, "lane": "left", "phase": "down" }
        ]"#,
    )
    .unwrap();
    assert_eq!(inputs[0].phase, Phase::Down);

    let report = run(
        chart,
        JudgeConfig::default(),
        &RunOptions {
            inputs,
            ..options(10.0)
        },
    )
    .unwrap();

    let first = &report.events[0];
    assert_eq!(first.at, 1000.0);
    assert_eq!(
        first.event,
        JudgeEvent::Hit {
            note: 0,
            rating: Rating::Sick,
            time_diff: 0.0
        }
    );

    // The Up hold at 1500 and the Right tap at 2000 were never pressed.
    assert_eq!(report.result.misses, 2);
    assert_eq!(report.result.score, 350);
    assert_eq!(report.result.max_combo, 1);
    assert_eq!(report.result.clear, ClearKind::Clear);
}

#[test]
fn test_countdown_delays_first_note() {
    let chart = load_chart_from_str(CHART).unwrap();
    let report = run(
        chart,
        JudgeConfig::default(),
        &RunOptions {
            autoplay: true,
            countdown_beats: 4,
            ..options(10.0)
        },
    )
    .unwrap();

    // 4 beats at 100 bpm is 2400ms of lead-in
    assert!(report.frames > 240 + 300);
    assert_eq!(report.events[0].at, 1000.0);
}

#[test]
fn test_zero_frame_is_rejected() {
    let chart = load_chart_from_str(CHART).unwrap();
    assert!(run(chart, JudgeConfig::default(), &options(0.0)).is_err());
}

#[test]
fn test_input_script_rejects_unknown_lane() {
    let err = load_inputs_from_str(r#"[{ "time": 0, "lane": "middle", "phase": "down" }]"#).unwrap_err();
    assert!(format!("{err:#}").contains("failed to parse input script"));
}

#[test]
fn test_input_script_lanes() {
    let inputs = load_inputs_from_str(r#"[{ "time": 5, "lane": "right", "phase": "up" }]"#).unwrap();
    assert_eq!(inputs[0].lane, Lane::Right);
    assert_eq!(inputs[0].time, 5.0);
}

#[test]
fn test_load_config_from_path() {
    let dir = env::temp_dir();
    let path = dir.join(format!("fnf_runner_config_{}.json", std::process::id()));
    fs::write(&path, r#"{ "ghost_tapping": false, "sustain_bonus": 10 }"#).unwrap();
    let config = load_config_from_path(&path).unwrap();
    assert!(!config.ghost_tapping);
    assert_eq!(config.sustain_bonus, 10);
    assert_eq!(config.sick.window_ms, 45.0);

    fs::write(&path, r#"{ "sustain_bonus_interval_ms": 0 }"#).unwrap();
    let err = load_config_from_path(&path).unwrap_err();
    assert!(format!("{err:#}").contains("invalid config"));

    let _ = fs::remove_file(&path);
}
