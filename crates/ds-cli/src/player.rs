//! Terminal playback of one search run.
//!
//! Walks the session timeline in real time (optionally sped up), ticking the
//! tunnel engine during the deep phase and printing cues as they come due.
//! Any failure ends in the fallback reveal; ctrl-c abandons the run.

use std::fmt;
use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use ds_core::session::{Cue, LANDING_MESSAGES, Stage, input_progress, typing_hint};
use ds_core::{Engine, RemoteImageSource, RevealSet, RunScript, Session, Step};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tokio_util::sync::CancellationToken;

const CANVAS: (f64, f64) = (1280.0, 720.0);

/// Slowest accepted playback; below this the scaled holds stop being
/// meaningful durations.
pub const MIN_SPEED: f64 = 1e-3;

#[derive(Debug)]
struct Interrupted;

impl fmt::Display for Interrupted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "interrupted")
    }
}

impl std::error::Error for Interrupted {}

pub struct Player<W: Write> {
    out: W,
    speed: f64,
    fps: u32,
    cancel: CancellationToken,
}

impl<W: Write> Player<W> {
    pub fn new(out: W, speed: f64, fps: u32, cancel: CancellationToken) -> Result<Self> {
        if !(speed.is_finite() && speed > 0.0) {
            bail!("speed must be a positive number, got {speed}");
        }
        if speed < MIN_SPEED {
            bail!("speed must be at least {MIN_SPEED}, got {speed}");
        }
        if fps == 0 {
            bail!("fps must be at least 1");
        }
        Ok(Self {
            out,
            speed,
            fps,
            cancel,
        })
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn scaled(&self, d: Duration) -> Result<Duration> {
        Duration::try_from_secs_f64(d.as_secs_f64() / self.speed)
            .with_context(|| format!("{d:?} at speed {} is not a valid duration", self.speed))
    }

    async fn hold(&self, d: Duration) -> Result<()> {
        let d = self.scaled(d)?;
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(Interrupted.into()),
            _ = tokio::time::sleep(d) => Ok(()),
        }
    }

    /// Play `query` from the landing screen to the reveal.
    pub async fn play(
        &mut self,
        session: &mut Session,
        query: &str,
        rng: &mut SmallRng,
    ) -> Result<()> {
        let hold = session.pacing().instant_interval / 2;
        for message in LANDING_MESSAGES {
            writeln!(self.out, "{message}")?;
            if let Err(e) = self.hold(hold).await {
                return self.abandoned(e);
            }
        }
        self.show_typing(query)?;

        let run = session.begin(query, rng)?;
        let engine_rng = SmallRng::from_rng(rng);
        let outcome = self.run_steps(&run, engine_rng).await;

        match outcome {
            Ok(()) => {
                let set = session.finish(run.id, rng)?;
                self.show_reveal(&set)?;
            }
            Err(e) if e.is::<Interrupted>() => {
                session.fail(run.id)?;
                return self.abandoned(e);
            }
            Err(e) => {
                tracing::warn!("playback failed: {e:#}");
                let set = session.fail(run.id)?;
                let delay = self.scaled(session.pacing().fallback_delay)?;
                tokio::time::sleep(delay).await;
                self.show_reveal(&set)?;
            }
        }
        Ok(())
    }

    fn abandoned(&mut self, e: anyhow::Error) -> Result<()> {
        tracing::info!("playback {e}");
        writeln!(self.out, "\nSearch abandoned.")?;
        Ok(())
    }

    /// Replays the input stage, printing a hint whenever it changes.
    fn show_typing(&mut self, query: &str) -> Result<()> {
        let mut last = None;
        for len in 1..=query.chars().count() {
            let hint = typing_hint(len);
            if hint != last
                && let Some(text) = hint
            {
                writeln!(self.out, "[{:>3.0}%] {text}", input_progress(len) * 100.0)?;
            }
            last = hint;
        }
        Ok(())
    }

    async fn run_steps(&mut self, run: &RunScript, engine_rng: SmallRng) -> Result<()> {
        for step in &run.steps {
            match step {
                Step::Show {
                    stage,
                    message,
                    hold,
                } => {
                    if *stage == Stage::InstantCheck {
                        writeln!(self.out, "{message}")?;
                    }
                    self.hold(*hold).await?;
                }
                Step::Pause(d) => self.hold(*d).await?,
                Step::Animate { duration, cues } => {
                    writeln!(self.out)?;
                    self.animate(run.query(), *duration, cues, engine_rng.clone())
                        .await?;
                }
                Step::Reveal => {}
            }
        }
        Ok(())
    }

    async fn animate(
        &mut self,
        query: &str,
        duration: Duration,
        cues: &[Cue],
        rng: SmallRng,
    ) -> Result<()> {
        let mut engine = Engine::new(CANVAS.0, CANVAS.1, RemoteImageSource, rng);
        engine.start(Some(query))?;

        let real = self.scaled(duration)?;
        let ticks = ((real.as_secs_f64() * self.fps as f64).ceil() as u64).max(1);
        let frame_gap = Duration::from_secs(1).div_f64(self.fps as f64);
        let mut next_cue = 0;
        let mut peak_sprites = 0;

        for i in 1..=ticks {
            let sim = duration.mul_f64(i as f64 / ticks as f64);
            let Some(frame) = engine.tick(sim.as_secs_f64()) else {
                bail!("animation stopped unexpectedly");
            };
            peak_sprites = peak_sprites.max(engine.sprites().len());
            tracing::trace!(time = frame.time, commands = frame.commands.len(), "frame");

            while let Some(cue) = cues.get(next_cue)
                && cue.at <= sim
            {
                writeln!(self.out, "  {}", cue.message)?;
                next_cue += 1;
            }

            if i < ticks {
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => {
                        engine.stop();
                        return Err(Interrupted.into());
                    }
                    _ = tokio::time::sleep(frame_gap) => {}
                }
            }
        }
        for cue in &cues[next_cue..] {
            writeln!(self.out, "  {}", cue.message)?;
        }

        engine.stop();
        tracing::debug!(ticks, peak_sprites, "deep animation finished");
        Ok(())
    }

    fn show_reveal(&mut self, set: &RevealSet) -> Result<()> {
        writeln!(self.out, "\n{}", set.title)?;
        writeln!(self.out, "{}", set.subtitle)?;
        for duck in &set.ducks {
            writeln!(self.out, "  🦆 {} - {}", duck.caption, duck.url)?;
        }
        writeln!(self.out, "{}", set.message)?;
        Ok(())
    }
}
