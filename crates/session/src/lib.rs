//! blockgrid session crate - the controller that drives one game and reports
//! what happened to an injected sink.

mod config;
mod error;
mod session;
mod sink;

pub use config::SessionConfig;
pub use error::SessionError;
pub use session::{DragState, PlacementOutcome, Session};
pub use sink::{NoopSink, RecordingSink, SessionEvent, SessionSink, TextLogSink};
