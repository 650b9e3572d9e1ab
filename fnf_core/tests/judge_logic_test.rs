#[cfg(test)]
mod tests {
    use fnf_core::chart::{Chart, ChartMeta, Lane, Note};
    use fnf_core::gameplay::judge::JudgeMachine;
    use fnf_core::gameplay::{NoteStates, Rating};

    fn note(strum_time: f64, lane: Lane, is_player_note: bool) -> Note {
        Note {
            strum_time,
            lane,
            sustain_length: 0.0,
            is_player_note,
            section: 0,
        }
    }

    fn create_test_chart() -> Chart {
        // Note 0: 1000ms, Left, player
        // Note 1: 1000ms, Up, opponent
        // Note 2: 1500ms, Down, player
        // Note 3: 2000ms, Left, player
        let notes = vec![
            note(1000.0, Lane::Left, true),
            note(1000.0, Lane::Up, false),
            note(1500.0, Lane::Down, true),
            note(2000.0, Lane::Left, true),
        ];
        Chart::new(ChartMeta::default(), notes).unwrap()
    }

    #[test]
    fn test_sick_judgment() {
        let chart = create_test_chart();
        let states = NoteStates::new(chart.len());
        let mut judge = JudgeMachine::default();

        let result = judge
            .find_note_to_hit(Lane::Left, 1000.0, &chart, &states)
            .expect("Should trigger judgment");

        assert_eq!(result.rating, Rating::Sick);
        assert_eq!(result.note_index, 0);
        assert_eq!(result.delta, 0.0);
    }

    #[test]
    fn test_late_good_judgment() {
        let chart = create_test_chart();
        let states = NoteStates::new(chart.len());
        let mut judge = JudgeMachine::default();

        // 80ms late: outside sick (45), inside good (90)
        let result = judge
            .find_note_to_hit(Lane::Left, 1080.0, &chart, &states)
            .expect("Should trigger judgment");
        assert_eq!(result.rating, Rating::Good);
        assert_eq!(result.note_index, 0);
        assert_eq!(result.delta, 80.0);
    }

    #[test]
    fn test_early_shit_judgment() {
        let chart = create_test_chart();
        let states = NoteStates::new(chart.len());
        let mut judge = JudgeMachine::default();

        // 150ms early: outside bad (135), inside shit (180)
        let result = judge
            .find_note_to_hit(Lane::Left, 850.0, &chart, &states)
            .expect("Should trigger judgment");
        assert_eq!(result.rating, Rating::Shit);
        assert_eq!(result.delta, -150.0);
    }

    #[test]
    fn test_too_early_is_ignored() {
        let chart = create_test_chart();
        let states = NoteStates::new(chart.len());
        let mut judge = JudgeMachine::default();

        assert!(judge.find_note_to_hit(Lane::Left, 500.0, &chart, &states).is_none());
        // Cursor stays on the first Left note
        assert_eq!(judge.next_note_index[Lane::Left.index()], 0);
    }

    #[test]
    fn test_opponent_notes_are_not_hittable() {
        let chart = create_test_chart();
        let states = NoteStates::new(chart.len());
        let mut judge = JudgeMachine::default();

        // Only an opponent note sits on Up
        assert!(judge.find_note_to_hit(Lane::Up, 1000.0, &chart, &states).is_none());
    }

    #[test]
    fn test_lanes_are_independent() {
        let chart = create_test_chart();
        let states = NoteStates::new(chart.len());
        let mut judge = JudgeMachine::default();

        // Down note is at 1500; a Right press at the same time finds nothing
        assert!(judge.find_note_to_hit(Lane::Right, 1500.0, &chart, &states).is_none());
        let result = judge.find_note_to_hit(Lane::Down, 1500.0, &chart, &states).unwrap();
        assert_eq!(result.note_index, 2);
    }

    #[test]
    fn test_nearest_note_wins() {
        let notes = vec![note(1000.0, Lane::Right, true), note(1100.0, Lane::Right, true)];
        let chart = Chart::new(ChartMeta::default(), notes).unwrap();
        let states = NoteStates::new(chart.len());
        let mut judge = JudgeMachine::default();

        // 80ms after the first, 20ms before the second
        let result = judge.find_note_to_hit(Lane::Right, 1080.0, &chart, &states).unwrap();
        assert_eq!(result.note_index, 1);
        assert_eq!(result.rating, Rating::Sick);
    }

    #[test]
    fn test_equidistant_tie_goes_to_earlier_note() {
        let notes = vec![note(1000.0, Lane::Right, true), note(1100.0, Lane::Right, true)];
        let chart = Chart::new(ChartMeta::default(), notes).unwrap();
        let states = NoteStates::new(chart.len());
        let mut judge = JudgeMachine::default();

        let result = judge.find_note_to_hit(Lane::Right, 1050.0, &chart, &states).unwrap();
        assert_eq!(result.note_index, 0);
    }

    #[test]
    fn test_window_edge_is_inclusive() {
        let chart = create_test_chart();
        let states = NoteStates::new(chart.len());
        let mut judge = JudgeMachine::default();

        let result = judge.find_note_to_hit(Lane::Left, 1180.0, &chart, &states).unwrap();
        assert_eq!(result.rating, Rating::Shit);
        assert!(judge.find_note_to_hit(Lane::Left, 1180.5, &chart, &states).is_none());
    }

    #[test]
    fn test_miss_detection() {
        let chart = create_test_chart();
        let states = NoteStates::new(chart.len());
        let mut judge = JudgeMachine::default();

        // Exactly 180ms late is still hittable
        assert!(judge.check_misses(1180.0, &chart, &states).is_empty());

        let misses = judge.check_misses(1181.0, &chart, &states);
        assert_eq!(misses.len(), 1);
        assert_eq!(misses[0].note_index, 0);
        assert_eq!(misses[0].late_by, 181.0);
    }

    #[test]
    fn test_miss_detection_ignores_opponent_and_future_notes() {
        let chart = create_test_chart();
        let states = NoteStates::new(chart.len());
        let mut judge = JudgeMachine::default();

        // 1700: note 0 is 700ms late, note 2 is 200ms late, note 3 is ahead.
        let misses = judge.check_misses(1700.0, &chart, &states);
        let indices: Vec<usize> = misses.iter().map(|m| m.note_index).collect();
        assert_eq!(indices, vec![0, 2]);
    }
}
