//! Session events and the sinks that observe them.

use std::cell::RefCell;
use std::rc::Rc;

use blockgrid_core::{Piece, Position};
use blockgrid_engine::ScoreResult;

#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    GameStarted,
    BlocksGenerated { pieces: Vec<Piece>, guaranteed: bool },
    PiecePlaced {
        piece: Piece,
        position: Position,
        score: ScoreResult,
    },
    LinesCleared { lines: u32, combo: u32 },
    GameOver { score: u64 },
    Reset,
}

pub trait SessionSink {
    /// Called after the session state for `event` is already updated.
    fn on_event(&mut self, _event: &SessionEvent) {}
}

#[derive(Default)]
pub struct NoopSink;

impl SessionSink for NoopSink {}

/// Collects human-readable lines. Clones share one buffer, so a caller can
/// keep a handle after boxing the sink into a session.
#[derive(Clone, Debug, Default)]
pub struct TextLogSink {
    lines: Rc<RefCell<Vec<String>>>,
}

impl TextLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    pub fn text(&self) -> String {
        self.lines.borrow().join("\n")
    }

    pub fn clear(&self) {
        self.lines.borrow_mut().clear();
    }

    fn push(&self, line: String) {
        self.lines.borrow_mut().push(line);
    }
}

impl SessionSink for TextLogSink {
    fn on_event(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::GameStarted => self.push("Game started".to_string()),
            SessionEvent::BlocksGenerated { pieces, guaranteed } => {
                let header = if *guaranteed {
                    "Generated blocks (solvable set):"
                } else {
                    "Generated blocks:"
                };
                self.push(header.to_string());
                for piece in pieces {
                    self.push(format!(
                        "  {} ({})",
                        piece.kind,
                        piece.difficulty.as_str()
                    ));
                    for row in shape_rows(piece) {
                        self.push(format!("    {row}"));
                    }
                }
            }
            SessionEvent::PiecePlaced {
                piece,
                position,
                score,
            } => self.push(format!(
                "Placed {} at ({}, {}) for {} points",
                piece.kind, position.x, position.y, score.total_points
            )),
            SessionEvent::LinesCleared { lines, combo } => {
                self.push(format!("Cleared {lines} line(s), combo x{combo}"))
            }
            SessionEvent::GameOver { score } => self.push(format!("Game over with {score} points")),
            SessionEvent::Reset => self.push("Session reset".to_string()),
        }
    }
}

fn shape_rows(piece: &Piece) -> Vec<String> {
    let shape = &piece.shape;
    (0..shape.height())
        .map(|dy| {
            (0..shape.width())
                .map(|dx| if shape.is_filled(dx, dy) { '#' } else { '.' })
                .collect()
        })
        .collect()
}

/// Keeps typed events. Clones share one buffer.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    events: Rc<RefCell<Vec<SessionEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn take(&self) -> Vec<SessionEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }
}

impl SessionSink for RecordingSink {
    fn on_event(&mut self, event: &SessionEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
