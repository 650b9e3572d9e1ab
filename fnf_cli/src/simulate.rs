use std::fmt::Write;

use fnf_core::chart::Chart;

/// Text timeline of a chart: one row per note start or hold end, opponent
/// lanes on the left and player lanes on the right.
///
/// `N` tap, `H` hold head, `|` holding, `#` hold end, `.` empty.
pub fn render_timeline(chart: &Chart) -> String {
    let mut out = String::new();

    let mut time_points: Vec<f64> = chart
        .notes
        .iter()
        .flat_map(|n| [n.strum_time, n.end_time()])
        .collect();
    time_points.sort_by(f64::total_cmp);
    time_points.dedup();

    if time_points.is_empty() {
        out.push_str("Chart is empty.\n");
        return out;
    }

    let _ = writeln!(
        out,
        "{} ({} notes, last note ends at {:.1}ms)",
        if chart.meta.title.is_empty() { "untitled" } else { chart.meta.title.as_str() },
        chart.len(),
        chart.last_note_end()
    );
    out.push_str(" Time(ms) | opponent | player  \n");
    out.push_str("          | L D U R  | L D U R \n");
    out.push_str("----------|----------|---------\n");

    // End time of the hold shown on each [side][lane], 0 = opponent.
    let mut holding: [[Option<f64>; 4]; 2] = [[None; 4]; 2];
    let mut next = 0;

    for &t in &time_points {
        let mut cells = [['.'; 4]; 2];

        for (side, lanes) in holding.iter_mut().enumerate() {
            for (lane, slot) in lanes.iter_mut().enumerate() {
                match *slot {
                    Some(end) if end <= t => {
                        cells[side][lane] = '#';
                        *slot = None;
                    }
                    Some(_) => cells[side][lane] = '|',
                    None => {}
                }
            }
        }

        while let Some(note) = chart.notes.get(next).filter(|n| n.strum_time == t) {
            let side = usize::from(note.is_player_note);
            let lane = note.lane.index();
            if note.is_hold() {
                cells[side][lane] = 'H';
                holding[side][lane] = Some(note.end_time());
            } else {
                cells[side][lane] = 'N';
            }
            next += 1;
        }

        let _ = writeln!(out, "{t:>9.1} | {}  | {}", lane_string(&cells[0]), lane_string(&cells[1]));
    }

    out
}

fn lane_string(cells: &[char; 4]) -> String {
    cells.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use fnf_core::chart::{ChartMeta, Lane, Note};

    fn note(strum_time: f64, lane: Lane, sustain_length: f64, is_player_note: bool) -> Note {
        Note {
            strum_time,
            lane,
            sustain_length,
            is_player_note,
            section: 0,
        }
    }

    #[test]
    fn empty_chart() {
        let chart = Chart::new(ChartMeta::default(), vec![]).unwrap();
        assert_eq!(render_timeline(&chart), "Chart is empty.\n");
    }

    #[test]
    fn holds_span_rows() {
        let chart = Chart::new(
            ChartMeta::default(),
            vec![
                note(0.0, Lane::Left, 0.0, false),
                note(100.0, Lane::Up, 200.0, true),
                note(200.0, Lane::Right, 0.0, true),
            ],
        )
        .unwrap();

        let text = render_timeline(&chart);
        let rows: Vec<&str> = text.lines().skip(4).collect();
        assert_eq!(
            rows,
            vec![
                "      0.0 | N . . .  | . . . .",
                "    100.0 | . . . .  | . . H .",
                "    200.0 | . . . .  | . . | N",
                "    300.0 | . . . .  | . . # .",
            ]
        );
    }
}
