use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
struct Args {
    path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let song = fnf_runner::load_song_from_path(&args.path)?;
    println!("song={}", song.song);
    println!("bpm={}", song.bpm);
    println!("speed={}", song.speed);
    println!("sections={}", song.notes.len());

    let chart = fnf_runner::load_chart_from_path(&args.path)?;
    let summary = chart.summary();
    println!("player_notes={}", summary.player_notes);
    println!("opponent_notes={}", summary.opponent_notes);
    println!("last_note_end_ms={}", summary.last_note_end_ms);
    Ok(())
}
