use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;

use rflayout::document::HeadlessDocument;
use rflayout::logging::{init_logging, LoggingConfig};
use rflayout::platform::{ElementQuery, EmulatedViewport, EventDispatcher, EventKind};
use rflayout::{LayoutConfig, LayoutSynchronizer, Viewport};

/// Run the layout synchronizer against an HTML file and report the result.
#[derive(Parser, Debug)]
#[command(name = "rflayout", version, about)]
struct Cli {
    /// HTML document to load
    html: PathBuf,

    /// Initial viewport width in px
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Initial viewport height in px
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured breakpoint
    #[arg(long)]
    breakpoint: Option<f64>,

    /// Event to dispatch after ready: `resize:W`, `resize:WxH` or `rotate`
    #[arg(long = "then", value_name = "STEP", value_parser = parse_step)]
    steps: Vec<Step>,

    /// Print the full document snapshot after the last step
    #[arg(long)]
    snapshot: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Resize { width: u32, height: Option<u32> },
    Rotate,
}

fn parse_step(s: &str) -> Result<Step, String> {
    if s == "rotate" {
        return Ok(Step::Rotate);
    }
    let dims = s
        .strip_prefix("resize:")
        .ok_or_else(|| format!("unknown step '{}'", s))?;
    let parse = |v: &str| v.parse::<u32>().map_err(|e| format!("bad dimension '{}': {}", v, e));
    match dims.split_once('x') {
        Some((w, h)) => Ok(Step::Resize { width: parse(w)?, height: Some(parse(h)?) }),
        None => Ok(Step::Resize { width: parse(dims)?, height: None }),
    }
}

#[derive(Serialize)]
struct StepReport {
    event: EventKind,
    width: u32,
    height: u32,
    marker_present: bool,
    spacer_height: Option<String>,
}

#[derive(Serialize)]
struct Report {
    steps: Vec<StepReport>,
    fingerprint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    snapshot: Option<rflayout::document::DocumentSnapshot>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(LoggingConfig::from_verbosity(cli.verbose));

    let mut config = match &cli.config {
        Some(path) => LayoutConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => LayoutConfig::default(),
    };
    if let Some(bp) = cli.breakpoint {
        config.breakpoint = bp;
    }
    config.validate().context("invalid configuration")?;

    let doc = Arc::new(
        HeadlessDocument::from_path(&cli.html)
            .with_context(|| format!("reading {}", cli.html.display()))?,
    );
    let viewport = Arc::new(EmulatedViewport::new(Viewport {
        width: cli.width,
        height: cli.height,
    }));

    let container = config.container.clone();
    let marker = config.marker_class.clone();
    let spacer = ElementQuery::id(config.spacer_id.clone());

    let sync = Arc::new(LayoutSynchronizer::new(config, viewport.clone(), doc.clone()));
    let mut dispatcher = EventDispatcher::new();
    LayoutSynchronizer::bind(sync, &mut dispatcher);

    let mut steps = Vec::new();
    let report_step = |event: EventKind| {
        let vp = viewport.metrics();
        StepReport {
            event,
            width: vp.width,
            height: vp.height,
            marker_present: doc
                .find(&container)
                .map(|n| n.classes.iter().any(|c| *c == marker))
                .unwrap_or(false),
            spacer_height: doc
                .find(&spacer)
                .and_then(|n| n.style_value("height").map(str::to_string)),
        }
    };

    dispatcher.dispatch(EventKind::Ready);
    steps.push(report_step(EventKind::Ready));
    for step in &cli.steps {
        let event = match *step {
            Step::Resize { width, height } => {
                viewport.resize(width, height.unwrap_or(viewport.metrics().height));
                EventKind::Resize
            }
            Step::Rotate => {
                viewport.rotate();
                EventKind::OrientationChange
            }
        };
        dispatcher.dispatch(event);
        steps.push(report_step(event));
    }
    log::info!("dispatched {} event(s)", steps.len());

    let report = Report {
        steps,
        fingerprint: doc.fingerprint()?,
        snapshot: cli.snapshot.then(|| doc.snapshot()),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
