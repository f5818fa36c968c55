//! Presentation session: the single-run guard and the scripted timeline.
//!
//! A run goes landing → input → instant check → pause → deep check → reveal.
//! The session only computes what to show and for how long; a front-end
//! plays the steps. While one run is active every new `begin` is rejected.

use std::time::Duration;

use rand::Rng;
use uuid::Uuid;

use crate::classify::{QueryFeatures, analyze};
use crate::compose::{compose_deep, compose_instant};
use crate::error::{CoreError, Result};
use crate::reveal::{RevealSet, fallback_reveal, reveal};

pub const LANDING_MESSAGES: &[&str] = &["Wake up, Internet...", "Initializing the Web..."];

/// Input length at which the capture progress bar is full.
const FULL_INPUT_LEN: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Landing,
    Input,
    InstantCheck,
    DeepCheck,
    Reveal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub instant_interval: Duration,
    pub pause_after_instant: Duration,
    pub deep_duration: Duration,
    pub fallback_delay: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            instant_interval: Duration::from_secs(3),
            pause_after_instant: Duration::from_secs(2),
            deep_duration: Duration::from_secs(30),
            fallback_delay: Duration::from_secs(2),
        }
    }
}

/// A message surfaced `at` into the deep-check animation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    pub at: Duration,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Show {
        stage: Stage,
        message: String,
        hold: Duration,
    },
    Pause(Duration),
    Animate { duration: Duration, cues: Vec<Cue> },
    Reveal,
}

#[derive(Debug, Clone)]
pub struct RunScript {
    pub id: Uuid,
    pub features: QueryFeatures,
    pub instant: Vec<String>,
    pub deep: Vec<String>,
    pub steps: Vec<Step>,
}

impl RunScript {
    pub fn query(&self) -> &str {
        &self.features.raw_query
    }

    pub fn total_duration(&self) -> Duration {
        self.steps
            .iter()
            .map(|s| match s {
                Step::Show { hold, .. } => *hold,
                Step::Pause(d) => *d,
                Step::Animate { duration, .. } => *duration,
                Step::Reveal => Duration::ZERO,
            })
            .sum()
    }
}

/// Deep messages spread over the animation with some slack at the end.
fn deep_cues(deep: &[String], duration: Duration) -> Vec<Cue> {
    let interval = duration / (deep.len() as u32 + 5);
    deep.iter()
        .zip(1u32..)
        .map(|(message, i)| Cue {
            at: interval * i,
            message: message.clone(),
        })
        .collect()
}

#[derive(Debug)]
struct ActiveRun {
    id: Uuid,
    query: String,
}

#[derive(Debug, Default)]
pub struct Session {
    pacing: Pacing,
    active: Option<ActiveRun>,
}

impl Session {
    pub fn new(pacing: Pacing) -> Self {
        Self {
            pacing,
            active: None,
        }
    }

    pub fn pacing(&self) -> Pacing {
        self.pacing
    }

    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    /// Analyze `query` and produce its timeline, claiming the session.
    pub fn begin(&mut self, query: &str, rng: &mut impl Rng) -> Result<RunScript> {
        let query = query.trim();
        if query.is_empty() {
            return Err(CoreError::EmptyQuery);
        }
        if let Some(active) = &self.active {
            tracing::debug!(active = %active.query, "rejecting query while a run is active");
            return Err(CoreError::RunInProgress);
        }

        let features = analyze(query);
        let instant = compose_instant(&features);
        let deep = compose_deep(&features, rng);

        let mut steps: Vec<Step> = instant
            .iter()
            .map(|message| Step::Show {
                stage: Stage::InstantCheck,
                message: message.clone(),
                hold: self.pacing.instant_interval,
            })
            .collect();
        steps.push(Step::Pause(self.pacing.pause_after_instant));
        steps.push(Step::Animate {
            duration: self.pacing.deep_duration,
            cues: deep_cues(&deep, self.pacing.deep_duration),
        });
        steps.push(Step::Reveal);

        let id = Uuid::new_v4();
        tracing::info!(%id, query, "search run started");
        self.active = Some(ActiveRun {
            id,
            query: query.to_string(),
        });

        Ok(RunScript {
            id,
            features,
            instant,
            deep,
            steps,
        })
    }

    fn release(&mut self, id: Uuid) -> Result<()> {
        match &self.active {
            Some(active) if active.id == id => {
                self.active = None;
                Ok(())
            }
            _ => Err(CoreError::UnknownRun(id)),
        }
    }

    /// Complete a run normally.
    pub fn finish(&mut self, id: Uuid, rng: &mut impl Rng) -> Result<RevealSet> {
        self.release(id)?;
        tracing::info!(%id, "search run revealed");
        Ok(reveal(rng))
    }

    /// Abandon a run after a failure. The caller shows the returned set after
    /// `pacing().fallback_delay`.
    pub fn fail(&mut self, id: Uuid) -> Result<RevealSet> {
        self.release(id)?;
        tracing::warn!(%id, "search run failed, showing fallback ducks");
        Ok(fallback_reveal())
    }
}

/// Thought shown while the user is still typing.
pub fn typing_hint(input_len: usize) -> Option<&'static str> {
    match input_len {
        0 => None,
        1..=4 => Some("Detecting input..."),
        5..=9 => Some("Analyzing query structure..."),
        _ => Some("Preparing to send query to backend..."),
    }
}

/// Capture progress in [0, 1].
pub fn input_progress(input_len: usize) -> f64 {
    (input_len as f64 / FULL_INPUT_LEN as f64).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(13)
    }

    #[test]
    fn test_single_active_run() {
        let mut session = Session::default();
        let mut rng = rng();
        let run = session.begin("best pizza", &mut rng).unwrap();
        assert!(session.is_busy());
        assert_eq!(
            session.begin("another", &mut rng).unwrap_err(),
            CoreError::RunInProgress
        );

        let set = session.finish(run.id, &mut rng).unwrap();
        assert_eq!(set.ducks.len(), 6);
        assert!(!session.is_busy());
        assert!(session.begin("another", &mut rng).is_ok());
    }

    #[test]
    fn test_blank_query_rejected_without_claiming() {
        let mut session = Session::default();
        assert_eq!(
            session.begin("   ", &mut rng()).unwrap_err(),
            CoreError::EmptyQuery
        );
        assert!(!session.is_busy());
    }

    #[test]
    fn test_stale_id_rejected() {
        let mut session = Session::default();
        let mut rng = rng();
        let run = session.begin("bank", &mut rng).unwrap();
        let stale = Uuid::new_v4();
        assert_eq!(
            session.fail(stale).unwrap_err(),
            CoreError::UnknownRun(stale)
        );
        assert!(session.is_busy());
        let fallback = session.fail(run.id).unwrap();
        assert_eq!(fallback.ducks.len(), 3);
        assert!(session.finish(run.id, &mut rng).is_err());
    }

    #[test]
    fn test_timeline_shape() {
        let mut session = Session::default();
        let run = session.begin("Where is the best apple?", &mut rng()).unwrap();

        let shows = run
            .steps
            .iter()
            .filter(|s| matches!(s, Step::Show { .. }))
            .count();
        assert_eq!(shows, run.instant.len());
        assert_eq!(run.steps.last(), Some(&Step::Reveal));

        // 5 instant lines x 3s + 2s pause + 30s animation
        assert_eq!(run.total_duration(), Duration::from_secs(47));
    }

    #[test]
    fn test_deep_cues_ordered_within_animation() {
        let mut session = Session::default();
        let run = session.begin("cheap car", &mut rng()).unwrap();
        let Some(Step::Animate { duration, cues }) = run
            .steps
            .iter()
            .find(|s| matches!(s, Step::Animate { .. }))
        else {
            panic!("missing animation step");
        };
        assert_eq!(cues.len(), run.deep.len());
        assert!(cues.windows(2).all(|w| w[0].at < w[1].at));
        assert!(cues.last().unwrap().at < *duration);
    }

    #[test]
    fn test_typing_hints() {
        assert_eq!(typing_hint(0), None);
        assert_eq!(typing_hint(3), Some("Detecting input..."));
        assert_eq!(typing_hint(7), Some("Analyzing query structure..."));
        assert_eq!(
            typing_hint(42),
            Some("Preparing to send query to backend...")
        );
        assert_eq!(input_progress(15), 0.5);
        assert_eq!(input_progress(90), 1.0);
    }
}
