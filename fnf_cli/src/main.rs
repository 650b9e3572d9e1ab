mod simulate;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use fnf_core::config::JudgeConfig;
use fnf_runner::{RunOptions, RunReport};
use fnf_schema::ChartDocument;
use serde_json::json;

#[derive(Debug, Parser)]
#[command(name = "funkin")]
#[command(about = "Chart inspection and headless judgment runs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a chart summary as JSON.
    Inspect { chart: PathBuf },
    /// Print a lane-by-lane text timeline.
    Timeline { chart: PathBuf },
    /// Rewrite a chart in the wrapped `{ "song": ... }` layout.
    Convert {
        chart: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Play every player note with the bot and print the result.
    Autoplay {
        chart: PathBuf,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Play a recorded input script against a chart.
    Replay {
        chart: PathBuf,
        inputs: PathBuf,
        #[command(flatten)]
        run: RunArgs,
    },
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Judge config JSON; missing fields use the defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = 60.0)]
    fps: f64,
    #[arg(long, default_value_t = 0)]
    countdown: u32,
    /// Include every judgment event in the output.
    #[arg(long)]
    events: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Inspect { chart } => {
            let chart = fnf_runner::load_chart_from_path(&chart)?;
            print_json(&chart.summary())?;
        }
        Command::Timeline { chart } => {
            let chart = fnf_runner::load_chart_from_path(&chart)?;
            print!("{}", simulate::render_timeline(&chart));
        }
        Command::Convert { chart, output } => {
            let song = fnf_runner::load_song_from_path(&chart)?;
            // Validate before writing anything.
            fnf_core::Chart::from_song(&song).with_context(|| format!("invalid chart: {}", chart.display()))?;

            let doc = ChartDocument::Wrapped { song };
            let json = serde_json::to_string_pretty(&doc).context("failed to serialize chart")?;
            let out_path = output.unwrap_or_else(|| default_output_path(&chart));
            fs::write(&out_path, json).with_context(|| format!("failed to write: {}", out_path.display()))?;
        }
        Command::Autoplay { chart, run } => {
            let report = play(&chart, &run, true, Vec::new())?;
            print_report(&report, run.events)?;
        }
        Command::Replay { chart, inputs, run } => {
            let inputs = fnf_runner::load_inputs_from_path(&inputs)?;
            let report = play(&chart, &run, false, inputs)?;
            print_report(&report, run.events)?;
        }
    }

    Ok(())
}

fn play(
    chart: &Path,
    args: &RunArgs,
    autoplay: bool,
    inputs: Vec<fnf_runner::ScriptedInput>,
) -> anyhow::Result<RunReport> {
    if !(args.fps.is_finite() && args.fps > 0.0) {
        anyhow::bail!("--fps must be > 0, got {}", args.fps);
    }
    let config = match &args.config {
        Some(path) => fnf_runner::load_config_from_path(path)?,
        None => JudgeConfig::default(),
    };
    let chart = fnf_runner::load_chart_from_path(chart)?;
    log::info!("loaded \"{}\": {} notes", chart.meta.title, chart.len());

    let options = RunOptions {
        frame_ms: 1000.0 / args.fps,
        autoplay,
        countdown_beats: args.countdown,
        inputs,
    };
    fnf_runner::run(chart, config, &options).context("run failed")
}

fn print_report(report: &RunReport, with_events: bool) -> anyhow::Result<()> {
    if with_events {
        print_json(report)
    } else {
        print_json(&json!({
            "chart": report.chart,
            "frames": report.frames,
            "result": report.result,
        }))
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}

fn default_output_path(input: &Path) -> PathBuf {
    let mut out = input.to_path_buf();
    out.set_extension("converted.json");
    out
}
