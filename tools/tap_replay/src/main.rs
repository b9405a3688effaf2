use std::{
    fs::{self, File},
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use multitap::{
    input::MAX_POINTERS, EventType, GestureState, InputSample, NoRequireFailures, PointerPoint,
    Recognizer, RecognizerHost, RecordingSink, SiblingsPending, TapConfig, TapRecognizer,
};

/// Trailing time replayed after the last sample so pending timers can fire.
const TAIL_MS: u64 = 300;

#[derive(Debug, Parser)]
#[command(name = "tap_replay")]
#[command(about = "Replay a pointer sample trace through the tap recognizer")]
struct Cli {
    /// CSV trace: ms,event,pointers,delta_ms,distance,x,y
    trace: PathBuf,
    /// TOML file with a [tap] table; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the required tap count.
    #[arg(long)]
    taps: Option<u32>,
    /// Report pending require-failure siblings so recognition is deferred.
    #[arg(long = "require-failures")]
    require_failures: bool,
    /// Compare output against this file and fail on mismatch.
    #[arg(long)]
    expect: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => TapConfig::from_path(path)?,
        None => TapConfig::default(),
    };
    if let Some(taps) = cli.taps {
        config.taps = taps;
    }

    let samples = parse_trace(&cli.trace)?;
    let lines = replay(config, &samples, cli.require_failures)?;

    match &cli.expect {
        Some(path) => compare_expected(path, &lines),
        None => {
            for line in &lines {
                println!("{line}");
            }
            Ok(())
        }
    }
}

fn parse_event(label: &str) -> Result<EventType> {
    Ok(match label {
        "start" => EventType::START,
        "move" => EventType::MOVE,
        "end" => EventType::END,
        "cancel" => EventType::CANCEL,
        other => bail!("unknown event `{other}`"),
    })
}

fn parse_line(line: &str) -> Result<InputSample> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != 7 {
        bail!("expected 7 fields, got {}", fields.len());
    }
    let ms: u64 = fields[0].parse().context("ms")?;
    let event_type = parse_event(fields[1])?;
    let pointers: usize = fields[2].parse().context("pointers")?;
    let delta_ms: u64 = fields[3].parse().context("delta_ms")?;
    let distance: f32 = fields[4].parse().context("distance")?;
    let x: f32 = fields[5].parse().context("x")?;
    let y: f32 = fields[6].parse().context("y")?;

    if pointers == 0 || pointers > MAX_POINTERS {
        bail!("pointers must be within 1..={MAX_POINTERS}");
    }
    let contacts = vec![PointerPoint::new(x, y); pointers];
    Ok(InputSample::with_pointers(
        event_type, ms, delta_ms, distance, &contacts,
    ))
}

fn parse_trace(path: &Path) -> Result<Vec<InputSample>> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut samples = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("read {}", path.display()))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("ms,") {
            continue;
        }
        let sample = parse_line(line)
            .with_context(|| format!("{}:{}: `{line}`", path.display(), idx + 1))?;
        samples.push(sample);
    }
    Ok(samples)
}

struct Replay {
    recognizer: TapRecognizer,
    sink: RecordingSink,
    state: GestureState,
    lines: Vec<String>,
}

impl Replay {
    fn advance(&mut self, now_ms: u64) {
        let deadline = self.recognizer.pending_timer().map(|timer| timer.deadline_ms);
        if self.recognizer.advance(now_ms).is_some() {
            let at = deadline.unwrap_or(now_ms);
            self.observe(at);
            self.recognizer.emit(&mut self.sink);
            self.flush_events();
        }
    }

    fn observe(&mut self, now_ms: u64) {
        let state = self.recognizer.state();
        if state != self.state {
            self.lines.push(format!("state,{now_ms},{}", state.label()));
            self.state = state;
        }
    }

    fn flush_events(&mut self) {
        for (name, payload) in self.sink.drain() {
            self.lines.push(format!(
                "event,{},{},{},{},{}",
                payload.sample.time_stamp,
                name,
                payload.tap_count,
                payload.sample.center.x,
                payload.sample.center.y
            ));
        }
    }
}

fn replay(
    config: TapConfig,
    samples: &[InputSample],
    require_failures: bool,
) -> Result<Vec<String>> {
    let recognizer = TapRecognizer::new(config)?;
    let host: &dyn RecognizerHost = if require_failures {
        &SiblingsPending
    } else {
        &NoRequireFailures
    };
    let mut replay = Replay {
        recognizer,
        sink: RecordingSink::new(),
        state: GestureState::Possible,
        lines: vec!["event,ms,kind,tap_count,x,y".into()],
    };

    for sample in samples {
        replay.advance(sample.time_stamp);
        let state = replay.recognizer.process(sample, host);
        replay.observe(sample.time_stamp);
        if state == GestureState::Recognized {
            replay.recognizer.emit(&mut replay.sink);
            replay.flush_events();
        }
        log::debug!(
            "replay: ms={} event={} state={} count={}",
            sample.time_stamp,
            sample.event_type.label(),
            state.label(),
            replay.recognizer.tap_count()
        );
    }

    if let Some(last) = samples.last() {
        replay.advance(last.time_stamp.saturating_add(TAIL_MS));
    }

    Ok(replay.lines)
}

fn compare_expected(path: &Path, lines: &[String]) -> Result<()> {
    let expected = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let expected: Vec<&str> = expected
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let mut mismatches = 0usize;
    for idx in 0..expected.len().max(lines.len()) {
        let want = expected.get(idx).copied().unwrap_or("<missing>");
        let got = lines.get(idx).map(String::as_str).unwrap_or("<missing>");
        if want != got {
            mismatches += 1;
            eprintln!("line {}: expected `{want}`, got `{got}`", idx + 1);
        }
    }
    if mismatches > 0 {
        bail!("{mismatches} line(s) differ from {}", path.display());
    }
    println!("ok: {} line(s) match {}", lines.len(), path.display());
    Ok(())
}
