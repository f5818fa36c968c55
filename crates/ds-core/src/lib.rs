//! DuckSearch core: a parody search engine that never searches.
//!
//! A query is normalized and classified with fixed lookup tables, the
//! classification drives scripted "thinking" messages for an instant and a
//! deep phase, a procedural tunnel animation plays during the deep phase,
//! and the run ends by revealing placeholder duck images.
//!
//! Zero I/O. Randomness is always injected so callers can seed it.

pub mod animation;
pub mod classify;
pub mod compose;
pub mod constants;
pub mod error;
pub mod reveal;
pub mod session;
pub mod tables;
pub mod tokenizer;

pub use animation::{Engine, Frame, ImageSource, RemoteImageSource, RenderCommand};
pub use classify::{AmbiguousHit, AnalysisSummary, QueryFeatures, analyze, classify};
pub use compose::{
    Phase, compose, compose_deep, compose_instant, compose_overlay, compose_thinking,
};
pub use error::{CoreError, Result};
pub use reveal::{Duck, RevealSet, fallback_reveal, reveal};
pub use session::{Pacing, RunScript, Session, Stage, Step};
pub use tables::{Modifier, QuestionType, Topic};
pub use tokenizer::normalize;
