use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use tracing_subscriber::EnvFilter;

use posture_tracker::config::Config;
use posture_tracker::pose::LandmarkSet;
use posture_tracker::summary::SessionSummary;
use posture_tracker::tracker::PosturePipeline;

const CONFIG_PATH: &str = "posture.toml";

struct Args {
    input: Option<String>,
    config: String,
}

fn parse_args() -> Result<Args> {
    let mut input = None;
    let mut config = CONFIG_PATH.to_string();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                config = args.next().context("--config needs a path")?;
            }
            "-" => input = None,
            _ if arg.starts_with('-') => bail!("unknown option: {}", arg),
            _ => input = Some(arg),
        }
    }
    Ok(Args { input, config })
}

/// 1行 = 1フレーム。`null` は検出なし
fn parse_line(line: &str) -> Result<Option<LandmarkSet>> {
    let frame: Option<LandmarkSet> = serde_json::from_str(line)?;
    Ok(frame)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = parse_args()?;
    let config = Config::load_or_default(&args.config);
    tracing::info!(
        window = config.posture.window_size,
        threshold_deg = config.posture.threshold_deg,
        visibility = config.posture.visibility_threshold,
        "posture replay starting"
    );

    let mut pipeline = PosturePipeline::new(&config.posture).context("invalid posture config")?;
    let mut summary = SessionSummary::from_config(&config.posture);

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("failed to open {}", path))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };
    let mut out = BufWriter::new(io::stdout().lock());

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let landmarks = match parse_line(line) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!("line {}: skipping malformed frame: {}", line_no + 1, e);
                continue;
            }
        };

        let result = pipeline.process_frame(landmarks.as_ref());
        summary.record(landmarks.as_ref(), &result);
        serde_json::to_writer(&mut out, &result)?;
        writeln!(out)?;
    }

    let report = summary.report();
    tracing::info!(
        frames = report.total_frames,
        coverage = report.pose_coverage,
        score = report.overall_score,
        "replay finished"
    );
    serde_json::to_writer(&mut out, &serde_json::json!({ "summary": report }))?;
    writeln!(out)?;
    out.flush()?;

    Ok(())
}
