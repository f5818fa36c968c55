mod config;
mod player;
mod server;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use ds_core::{AnalysisSummary, Engine, Phase, RemoteImageSource, Session, analyze, compose};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::player::Player;

/// Upper bound on `frames` output, one hour at 60 fps.
const MAX_FRAMES: f64 = 216_000.0;

#[derive(Parser)]
#[command(
    name = "ducksearch",
    version,
    about = "The search engine that thinks very hard and then shows you ducks"
)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed the random source for reproducible output
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the JSON API and static file server
    Serve,

    /// Analyze a query and print its thinking scripts
    Analyze {
        /// Query text
        query: String,

        /// Which script to print
        #[arg(long, value_enum, default_value_t = PhaseArg::All)]
        phase: PhaseArg,

        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Play a full search run in the terminal
    Play {
        /// Query text
        query: String,

        /// Playback speed multiplier
        #[arg(long, default_value_t = 1.0)]
        speed: f64,
    },

    /// Emit animation frames as JSON lines
    Frames {
        /// Query that seeds the flying content
        query: String,

        /// Seconds of animation to render
        #[arg(long, default_value_t = 2.0)]
        seconds: f64,

        /// Frames per second
        #[arg(long, default_value_t = 30)]
        fps: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PhaseArg {
    Instant,
    Deep,
    Thinking,
    All,
}

impl PhaseArg {
    fn phases(self) -> &'static [Phase] {
        match self {
            PhaseArg::Instant => &[Phase::Instant],
            PhaseArg::Deep => &[Phase::Deep],
            PhaseArg::Thinking => &[Phase::Thinking],
            PhaseArg::All => &[Phase::Instant, Phase::Deep, Phase::Thinking],
        }
    }
}

fn phase_name(phase: Phase) -> &'static str {
    match phase {
        Phase::Instant => "instant",
        Phase::Deep => "deep",
        Phase::Thinking => "thinking",
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn make_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config =
        Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    match &cli.command {
        Commands::Serve => server::serve(&config).await,
        Commands::Analyze { query, phase, json } => cmd_analyze(&config, query, *phase, *json),
        Commands::Play { query, speed } => cmd_play(&config, query, *speed).await,
        Commands::Frames {
            query,
            seconds,
            fps,
        } => cmd_frames(&config, query, *seconds, *fps),
    }
}

fn cmd_analyze(config: &Config, query: &str, phase: PhaseArg, as_json: bool) -> Result<()> {
    if query.trim().is_empty() {
        bail!("query must not be empty");
    }
    let mut rng = make_rng(config.seed);
    let features = analyze(query);
    let summary = AnalysisSummary::from_features(&features);
    let scripts: Vec<(Phase, Vec<String>)> = phase
        .phases()
        .iter()
        .map(|&p| (p, compose(&features, p, &mut rng)))
        .collect();

    let mut out = std::io::stdout().lock();
    if as_json {
        let mut payload = json!({
            "query": query,
            "analysis": summary,
            "features": features,
        });
        for (p, lines) in &scripts {
            payload[format!("{}Messages", phase_name(*p))] = json!(lines);
        }
        serde_json::to_writer_pretty(&mut out, &payload)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "query:         {query}")?;
    writeln!(out, "keywords:      {}", summary.keywords)?;
    writeln!(out, "question type: {}", summary.question_type)?;
    writeln!(out, "topics:        {}", summary.topics)?;
    writeln!(out, "ambiguous:     {}", summary.ambiguous)?;
    writeln!(out, "modifiers:     {}", summary.modifiers)?;
    for (p, lines) in &scripts {
        writeln!(out, "\n[{}]", phase_name(*p))?;
        for line in lines {
            writeln!(out, "{line}")?;
        }
    }
    Ok(())
}

async fn cmd_play(config: &Config, query: &str, speed: f64) -> Result<()> {
    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("ctrl-c received, stopping playback");
                cancel.cancel();
            }
        })
    };

    let mut player = Player::new(std::io::stdout(), speed, 30, cancel)?;
    let mut session = Session::new(config.pacing.to_pacing());
    let mut rng = make_rng(config.seed);
    let result = player.play(&mut session, query, &mut rng).await;
    watcher.abort();
    result
}

fn cmd_frames(config: &Config, query: &str, seconds: f64, fps: u32) -> Result<()> {
    if !(seconds.is_finite() && seconds >= 0.0) {
        bail!("seconds must be a non-negative number, got {seconds}");
    }
    if fps == 0 {
        bail!("fps must be at least 1");
    }
    let count = (seconds * fps as f64).round();
    if count > MAX_FRAMES {
        bail!("{count} frames requested, the limit is {MAX_FRAMES}");
    }
    let count = count as u64;

    let mut engine = Engine::new(1280.0, 720.0, RemoteImageSource, make_rng(config.seed));
    engine.start(Some(query))?;

    let mut out = std::io::stdout().lock();
    for i in 1..=count {
        let t = i as f64 / fps as f64;
        let Some(frame) = engine.tick(t) else {
            break;
        };
        serde_json::to_writer(&mut out, &frame)?;
        writeln!(out)?;
    }
    engine.stop();
    tracing::debug!(frames = count, "frames written");
    Ok(())
}
